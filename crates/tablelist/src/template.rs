#![forbid(unsafe_code)]

//! Row templates.
//!
//! A [`Template`] describes the node tree stamped out for every mounted
//! record. Its root is always a list item; descendants marked with a
//! `data-text` name receive the record's text and title for that name.
//!
//! # Example
//!
//! ```
//! use tablelist::template::{Template, TemplateNode};
//!
//! let item = Template::new(
//!     TemplateNode::list_item().child(
//!         TemplateNode::block()
//!             .child(TemplateNode::slot("domain"))
//!             .child(TemplateNode::slot("cookienum"))
//!             .child(TemplateNode::button("delete")),
//!     ),
//! )
//! .unwrap();
//! assert_eq!(item.slot_names(), vec!["domain", "cookienum"]);
//! ```

use crate::dom::{Document, NodeId, Tag};
use crate::error::TemplateError;

/// A node in a template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNode {
    tag: Tag,
    dataset: Vec<(String, String)>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<TemplateNode>,
}

impl TemplateNode {
    /// A bare node of the given kind.
    #[must_use]
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            dataset: Vec::new(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// A list item, the required template root.
    #[must_use]
    pub fn list_item() -> Self {
        Self::new(Tag::ListItem)
    }

    /// A grouping box.
    #[must_use]
    pub fn block() -> Self {
        Self::new(Tag::Block)
    }

    /// A text slot filled from `texts[name]` and `titles[name]`.
    #[must_use]
    pub fn slot(name: impl Into<String>) -> Self {
        Self::new(Tag::Text).data("text", name)
    }

    /// A button dispatching the named action.
    #[must_use]
    pub fn button(action: impl Into<String>) -> Self {
        Self::new(Tag::Button).data("action", action)
    }

    /// Add a `data-*` entry.
    #[must_use]
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dataset.push((key.into(), value.into()));
        self
    }

    /// Add a plain attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Set static text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child.
    #[must_use]
    pub fn child(mut self, node: TemplateNode) -> Self {
        self.children.push(node);
        self
    }

    /// Node kind.
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    fn build(&self, doc: &mut Document) -> NodeId {
        let id = doc.create_element(self.tag);
        for (key, value) in &self.dataset {
            doc.set_data(id, key.as_str(), value.as_str());
        }
        for (name, value) in &self.attributes {
            doc.set_attribute(id, name.as_str(), value.as_str());
        }
        if let Some(text) = &self.text {
            doc.set_text(id, text.as_str());
        }
        for child in &self.children {
            let child_id = child.build(doc);
            doc.append_child(id, child_id);
        }
        id
    }

    fn collect_slots<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some((_, name)) = self.dataset.iter().find(|(k, _)| k == "text") {
            out.push(name);
        }
        for child in &self.children {
            child.collect_slots(out);
        }
    }
}

/// A validated template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    root: TemplateNode,
}

impl Template {
    /// Validate and wrap a template tree.
    pub fn new(root: TemplateNode) -> Result<Self, TemplateError> {
        if root.tag != Tag::ListItem {
            return Err(TemplateError::RootNotListItem { found: root.tag });
        }
        Ok(Self { root })
    }

    /// A one-row template with a text slot per name, laid out in order.
    #[must_use]
    pub fn with_slots<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let row = names
            .into_iter()
            .fold(TemplateNode::block(), |row, name| {
                row.child(TemplateNode::slot(name))
            });
        Self {
            root: TemplateNode::list_item().child(row),
        }
    }

    /// The root node description.
    #[must_use]
    pub fn root(&self) -> &TemplateNode {
        &self.root
    }

    /// `data-text` names in document order.
    #[must_use]
    pub fn slot_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.root.collect_slots(&mut names);
        names
    }

    /// Stamp a detached copy into `doc`, returning its list item.
    pub fn instantiate(&self, doc: &mut Document) -> NodeId {
        self.root.build(doc)
    }
}
