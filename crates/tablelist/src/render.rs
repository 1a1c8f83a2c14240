#![forbid(unsafe_code)]

//! Mounting and unmounting records as nodes.
//!
//! The renderer owns the two templates and turns records into list items
//! at a given position. It never consults the model; callers pass the
//! model index, and the node tree under the list mirrors that order.

use crate::dom::{Document, NodeId, Tag};
use crate::record::ItemRecord;
use crate::template::Template;

/// `tabindex` of the single keyboard entry point.
pub const TABBABLE: &str = "0";
/// `tabindex` of every other row.
pub const NOT_TABBABLE: &str = "-1";

/// Dataset key holding the record id.
pub const ID_KEY: &str = "id";
/// Dataset key set on items whose sub-list is present.
pub const EXPANDED_KEY: &str = "expanded";

/// Stamps records into a [`Document`].
#[derive(Debug, Clone)]
pub struct Renderer {
    item: Template,
    sub_item: Template,
}

impl Renderer {
    /// Create a renderer from the item and sub-item templates.
    #[must_use]
    pub fn new(item: Template, sub_item: Template) -> Self {
        Self { item, sub_item }
    }

    /// Mount a top-level record at `index` of `list`.
    ///
    /// Sub-items already present on the record are mounted as well.
    pub fn mount_item(
        &self,
        doc: &mut Document,
        list: NodeId,
        record: &ItemRecord,
        index: usize,
    ) -> NodeId {
        let li = self.item.instantiate(doc);
        populate(doc, li, record);
        let tabindex = if doc.children(list).is_empty() {
            TABBABLE
        } else {
            NOT_TABBABLE
        };
        doc.set_attribute(li, "tabindex", tabindex);

        let reference = doc.child_at(list, index);
        doc.insert_before(list, li, reference);
        if index == 0 {
            retab_head(doc, list);
        }

        if let Some(subs) = record.sub_items.as_deref() {
            for (i, sub) in subs.iter().enumerate() {
                self.mount_sub_item(doc, li, sub, i);
            }
        }
        li
    }

    /// Remove the top-level node at `index` of `list`.
    pub fn unmount_item(&self, doc: &mut Document, list: NodeId, index: usize) -> bool {
        let Some(li) = doc.child_at(list, index) else {
            return false;
        };
        doc.remove_child(list, li);
        if index == 0 {
            retab_head(doc, list);
        }
        true
    }

    /// Mount a sub-record at `index` of `parent`'s sub-list.
    ///
    /// Creates the sub-list on first use and flags the parent as expanded.
    /// Returns the new node and whether the container was created.
    pub fn mount_sub_item(
        &self,
        doc: &mut Document,
        parent: NodeId,
        record: &ItemRecord,
        index: usize,
    ) -> (NodeId, bool) {
        let li = self.sub_item.instantiate(doc);
        populate(doc, li, record);
        doc.set_attribute(li, "tabindex", NOT_TABBABLE);

        let (container, created) = match sub_list(doc, parent) {
            Some(ul) => (ul, false),
            None => {
                let ul = doc.create_element(Tag::List);
                doc.append_child(parent, ul);
                doc.set_data(parent, EXPANDED_KEY, "true");
                (ul, true)
            }
        };
        let reference = doc.child_at(container, index);
        doc.insert_before(container, li, reference);
        (li, created)
    }

    /// Remove the sub-item at `index` under `parent`.
    ///
    /// Returns `Some(true)` when the sub-list became empty and was removed,
    /// `Some(false)` when it still has rows, and `None` when nothing matched.
    pub fn unmount_sub_item(
        &self,
        doc: &mut Document,
        parent: NodeId,
        index: usize,
    ) -> Option<bool> {
        let container = sub_list(doc, parent)?;
        let li = doc.child_at(container, index)?;
        doc.remove_child(container, li);
        if doc.children(container).is_empty() {
            remove_sub_list(doc, parent);
            Some(true)
        } else {
            Some(false)
        }
    }
}

/// The nested list of a mounted item.
#[must_use]
pub fn sub_list(doc: &Document, item: NodeId) -> Option<NodeId> {
    doc.child_with_tag(item, Tag::List)
}

/// Drop an item's sub-list and its expanded flag.
pub fn remove_sub_list(doc: &mut Document, item: NodeId) -> bool {
    doc.remove_data(item, EXPANDED_KEY);
    match sub_list(doc, item) {
        Some(ul) => doc.remove_child(item, ul),
        None => false,
    }
}

/// Write a record's id, dataset, texts, and titles onto `li`.
pub fn populate(doc: &mut Document, li: NodeId, record: &ItemRecord) {
    doc.set_data(li, ID_KEY, record.id.as_str());
    for (key, value) in &record.dataset {
        doc.set_data(li, key.as_str(), value.as_str());
    }
    for (name, text) in &record.texts {
        if let Some(slot) = doc.text_slot(li, name) {
            doc.set_text(slot, text.as_str());
        }
    }
    for (name, title) in &record.titles {
        if let Some(slot) = doc.text_slot(li, name) {
            doc.set_attribute(slot, "title", title.as_str());
        }
    }
}

/// Keep the first top-level row as the only tabbable one.
fn retab_head(doc: &mut Document, list: NodeId) {
    if let Some(first) = doc.child_at(list, 0) {
        doc.set_attribute(first, "tabindex", TABBABLE);
    }
    if let Some(second) = doc.child_at(list, 1) {
        doc.set_attribute(second, "tabindex", NOT_TABBABLE);
    }
}
