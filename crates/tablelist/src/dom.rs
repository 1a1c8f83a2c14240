#![forbid(unsafe_code)]

//! Retained node tree backing the list rendering.
//!
//! A [`Document`] is a generational arena of [`Element`]s. It mirrors the
//! small part of a browser DOM the list relies on: ordered children,
//! `data-*` datasets, plain attributes, text content, and one document-wide
//! active (focused) element.
//!
//! Node handles are generational, so a [`NodeId`] taken before a node was
//! removed never resolves to whatever reuses its slot later.

use std::collections::BTreeMap;
use std::fmt;

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Element kinds used by list and templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// An ordered container of list items (`<ul>`).
    List,
    /// A list entry (`<li>`); the focusable unit of the widget.
    ListItem,
    /// A generic grouping box (`<div>`).
    Block,
    /// Inline text (`<span>`).
    Text,
    /// A clickable control (`<button>`).
    Button,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "ul",
            Self::ListItem => "li",
            Self::Block => "div",
            Self::Text => "span",
            Self::Button => "button",
        };
        f.write_str(name)
    }
}

/// A single node.
#[derive(Debug, Clone)]
pub struct Element {
    tag: Tag,
    dataset: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            dataset: BTreeMap::new(),
            attributes: BTreeMap::new(),
            text: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Element kind.
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// `data-*` entries, keyed without the `data-` prefix.
    #[must_use]
    pub fn dataset(&self) -> &BTreeMap<String, String> {
        &self.dataset
    }

    /// Look up one `data-*` entry.
    #[must_use]
    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    /// Look up a plain attribute such as `title` or `tabindex`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Own text content, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Parent element, `None` for detached nodes and roots.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child elements in order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// An element is focusable when it carries a `tabindex`.
    #[must_use]
    pub fn is_focusable(&self) -> bool {
        self.attributes.contains_key("tabindex")
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// Arena of elements plus the active element.
#[derive(Debug, Clone, Default)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    active: Option<NodeId>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// True when no elements are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        let element = Some(Element::new(tag));
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.element = element;
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot {
                generation: 0,
                element,
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Resolve a handle.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.element.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.element.as_mut())
    }

    /// Whether the handle still refers to a live element.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    // ------------------------------------------------------------------
    // Attributes and content
    // ------------------------------------------------------------------

    /// Set a `data-*` entry.
    pub fn set_data(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.dataset.insert(key.into(), value.into());
        }
    }

    /// Remove a `data-*` entry, returning its previous value.
    pub fn remove_data(&mut self, id: NodeId, key: &str) -> Option<String> {
        self.get_mut(id).and_then(|el| el.dataset.remove(key))
    }

    /// Read a `data-*` entry.
    #[must_use]
    pub fn data(&self, id: NodeId, key: &str) -> Option<&str> {
        self.get(id).and_then(|el| el.data(key))
    }

    /// Set a plain attribute.
    pub fn set_attribute(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.attributes.insert(name.into(), value.into());
        }
    }

    /// Read a plain attribute.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id).and_then(|el| el.attribute(name))
    }

    /// Replace the element's own text.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.text = Some(text.into());
        }
    }

    // ------------------------------------------------------------------
    // Tree structure
    // ------------------------------------------------------------------

    /// Children of `id` (empty for unknown handles).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |el| el.children.as_slice())
    }

    /// Child at `index`.
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// First child.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Last child.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|el| el.parent)
    }

    /// Position of `id` among its siblings.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Following sibling.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.child_at(parent, index + 1)
    }

    /// Preceding sibling.
    #[must_use]
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .and_then(|prev| self.child_at(parent, prev))
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if node == ancestor {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    /// Append a detached `child` to `parent`.
    ///
    /// Returns `false` when either handle is stale or `child` is attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Insert a detached `child` before `reference`, or append when
    /// `reference` is `None` or not a child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> bool {
        if parent == child || !self.contains(parent) {
            return false;
        }
        match self.get(child) {
            Some(el) if el.parent.is_none() => {}
            _ => return false,
        }
        let position = reference.and_then(|r| self.children(parent).iter().position(|&c| c == r));
        if let Some(el) = self.get_mut(parent) {
            match position {
                Some(at) => el.children.insert(at, child),
                None => el.children.push(child),
            }
        }
        if let Some(el) = self.get_mut(child) {
            el.parent = Some(parent);
        }
        true
    }

    /// Detach `child` from `parent` and free its whole subtree.
    ///
    /// Clears the active element when it lived inside the removed subtree.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        if let Some(active) = self.active
            && self.is_inclusive_ancestor(child, active)
        {
            self.active = None;
        }
        if let Some(el) = self.get_mut(parent) {
            el.children.retain(|&c| c != child);
        }
        self.free_subtree(child);
        true
    }

    /// Remove every child of `parent`.
    pub fn clear_children(&mut self, parent: NodeId) {
        let children = self.children(parent).to_vec();
        for child in children.into_iter().rev() {
            self.remove_child(parent, child);
        }
    }

    fn free_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slots.get_mut(id.index as usize) else {
                continue;
            };
            if slot.generation != id.generation {
                continue;
            }
            if let Some(el) = slot.element.take() {
                stack.extend(el.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// First descendant of `root` (pre-order, excluding `root`) matching `pred`.
    #[must_use]
    pub fn find_descendant(
        &self,
        root: NodeId,
        mut pred: impl FnMut(&Element) -> bool,
    ) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let el = self.get(id)?;
            if pred(el) {
                return Some(id);
            }
            stack.extend(el.children.iter().rev().copied());
        }
        None
    }

    /// First descendant whose `data-text` marker equals `name`.
    #[must_use]
    pub fn text_slot(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.find_descendant(root, |el| el.data("text") == Some(name))
    }

    /// First direct child with the given tag.
    #[must_use]
    pub fn child_with_tag(&self, id: NodeId, tag: Tag) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|el| el.tag == tag))
    }

    /// Nearest strict ancestor matching `pred`.
    #[must_use]
    pub fn closest_ancestor(
        &self,
        id: NodeId,
        mut pred: impl FnMut(&Element) -> bool,
    ) -> Option<NodeId> {
        let mut cursor = self.parent(id);
        while let Some(node) = cursor {
            let el = self.get(node)?;
            if pred(el) {
                return Some(node);
            }
            cursor = el.parent;
        }
        None
    }

    /// Concatenated text of `root`'s subtree, skipping nested lists.
    ///
    /// Non-empty texts are joined by `separator` in document order.
    #[must_use]
    pub fn text_content(&self, root: NodeId, separator: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(el) = self.get(id) else { continue };
            if id != root && el.tag == Tag::List {
                continue;
            }
            if let Some(text) = el.text.as_deref().filter(|t| !t.is_empty()) {
                parts.push(text);
            }
            stack.extend(el.children.iter().rev().copied());
        }
        parts.join(separator)
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Currently focused element.
    #[must_use]
    pub fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|&id| self.contains(id))
    }

    /// Focus a focusable element. Returns whether focus moved there.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if self.get(id).is_some_and(Element::is_focusable) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    /// Drop focus.
    pub fn blur(&mut self) {
        self.active = None;
    }
}
