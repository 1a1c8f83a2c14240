#![forbid(unsafe_code)]

//! Item records: the data model behind each row.
//!
//! Records serialize to the JSON shape settings panels exchange:
//!
//! ```json
//! {
//!   "id": "example.com",
//!   "dataset": {"access": "example.com", "whitelist": true},
//!   "texts": {"domain": "example.com", "cookienum": "3 Cookies"},
//!   "titles": {"domain": "example.com"},
//!   "subItems": [{"id": "session", "texts": {"name": "session"}}]
//! }
//! ```
//!
//! Every field is optional on input. Dataset, text and title values may be
//! strings, booleans or numbers; non-strings are stored in their JSON text
//! form (`true` becomes `"true"`), the way `data-*` attributes would hold them.

use crate::error::RecordError;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// String-to-string attribute map.
pub type StringMap = BTreeMap<String, String>;

/// One item or sub-item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    /// Caller-assigned identifier, unique among siblings.
    #[serde(default)]
    pub id: String,
    /// `data-*` values copied onto the rendered node.
    #[serde(default, deserialize_with = "scalar_map")]
    pub dataset: StringMap,
    /// Text for template slots, keyed by `data-text` marker.
    #[serde(default, deserialize_with = "scalar_map")]
    pub texts: StringMap,
    /// Tooltips for template slots, keyed by `data-text` marker.
    #[serde(default, deserialize_with = "scalar_map")]
    pub titles: StringMap,
    /// Nested records. `None` means the item has no sub-list at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_items: Option<Vec<ItemRecord>>,
}

impl ItemRecord {
    /// Create a record with the given id and no content.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Add a `data-*` value.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dataset.insert(key.into(), value.into());
        self
    }

    /// Add slot text.
    #[must_use]
    pub fn with_text(mut self, slot: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(slot.into(), text.into());
        self
    }

    /// Add a slot tooltip.
    #[must_use]
    pub fn with_title(mut self, slot: impl Into<String>, title: impl Into<String>) -> Self {
        self.titles.insert(slot.into(), title.into());
        self
    }

    /// Replace the sub-items.
    #[must_use]
    pub fn with_sub_items(mut self, items: impl IntoIterator<Item = ItemRecord>) -> Self {
        self.sub_items = Some(items.into_iter().collect());
        self
    }

    /// Number of sub-items (0 when absent).
    #[must_use]
    pub fn sub_item_count(&self) -> usize {
        self.sub_items.as_ref().map_or(0, Vec::len)
    }

    /// Decode one record.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decode a JSON array of records.
pub fn records_from_json(json: &str) -> Result<Vec<ItemRecord>, RecordError> {
    Ok(serde_json::from_str(json)?)
}

fn scalar_map<'de, D>(deserializer: D) -> Result<StringMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    let mut map = StringMap::new();
    for (key, value) in raw.unwrap_or_default() {
        let text = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Null => continue,
            other => {
                return Err(de::Error::custom(format_args!(
                    "value for `{key}` must be a string, number or boolean, got {other}"
                )));
            }
        };
        map.insert(key, text);
    }
    Ok(map)
}
