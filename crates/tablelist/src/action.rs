#![forbid(unsafe_code)]

//! Row actions dispatched by row content.
//!
//! Content inside a row (keyboard handling, buttons) reports intent as an
//! [`Action`] plus the node it happened on. The list resolves which record
//! and level the node belongs to and moves focus accordingly.

use crate::dom::{Document, NodeId, Tag};
use crate::navigator::Direction;
use crate::render::ID_KEY;
use std::str::FromStr;

/// A sibling navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Focus the following row (`next-sibling`).
    NextSibling,
    /// Focus the preceding row (`previous-sibling`).
    PreviousSibling,
}

impl Action {
    /// Focus direction the action maps to.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::NextSibling => Direction::Next,
            Self::PreviousSibling => Direction::Previous,
        }
    }

    /// Wire name of the action.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NextSibling => "next-sibling",
            Self::PreviousSibling => "previous-sibling",
        }
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next-sibling" => Ok(Self::NextSibling),
            "previous-sibling" => Ok(Self::PreviousSibling),
            _ => Err(()),
        }
    }
}

fn is_record_row(el: &crate::dom::Element) -> bool {
    el.tag() == Tag::ListItem && el.data(ID_KEY).is_some()
}

/// The row `node` belongs to: itself if it is a row, else its nearest row ancestor.
#[must_use]
pub fn owning_row(doc: &Document, node: NodeId) -> Option<NodeId> {
    if doc.get(node).is_some_and(is_record_row) {
        return Some(node);
    }
    doc.closest_ancestor(node, is_record_row)
}

/// Id of the row enclosing `node`'s row, `None` at top level.
#[must_use]
pub fn parent_item_id(doc: &Document, node: NodeId) -> Option<String> {
    let row = doc.closest_ancestor(node, is_record_row)?;
    doc.data(row, ID_KEY).map(str::to_owned)
}
