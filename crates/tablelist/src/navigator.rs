#![forbid(unsafe_code)]

//! Directional focus resolution.
//!
//! Given a target row and the container it lives in, [`select`] decides
//! which row receives focus. `Next`/`Previous` step to the adjacent sibling
//! and wrap to the other end of the same container; `Start`/`End` jump to
//! the container's edges even when the target row does not exist.

use crate::dom::{Document, NodeId};
use std::fmt;
use std::str::FromStr;

/// Direction of a focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Following sibling, wrapping to the first.
    Next,
    /// Preceding sibling, wrapping to the last.
    Previous,
    /// First row of the container.
    Start,
    /// Last row of the container.
    End,
}

impl Direction {
    /// Parse the lowercase name; unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Edge to wrap to when stepping off the end.
    #[must_use]
    pub const fn wrap_edge(self) -> Self {
        match self {
            Self::Next | Self::Start => Self::Start,
            Self::Previous | Self::End => Self::End,
        }
    }
}

/// Unknown direction name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError(String);

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown focus direction `{}`", self.0)
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(Self::Next),
            "previous" => Ok(Self::Previous),
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            other => Err(ParseDirectionError(other.to_owned())),
        }
    }
}

/// Move focus and return the newly focused row.
///
/// * `target` - the row the request is relative to, if it resolved.
/// * `container` - the list holding `target`'s siblings.
/// * `direction` - `None` focuses `target` itself.
pub fn select(
    doc: &mut Document,
    target: Option<NodeId>,
    container: Option<NodeId>,
    direction: Option<Direction>,
) -> Option<NodeId> {
    let next = match direction {
        None => target?,
        Some(dir @ (Direction::Next | Direction::Previous)) => {
            let target = target?;
            let sibling = if dir == Direction::Next {
                doc.next_sibling(target)
            } else {
                doc.previous_sibling(target)
            };
            match sibling {
                Some(sibling) => sibling,
                None => return select(doc, Some(target), container, Some(dir.wrap_edge())),
            }
        }
        Some(Direction::Start) => doc.first_child(container?)?,
        Some(Direction::End) => doc.last_child(container?)?,
    };
    doc.focus(next).then_some(next)
}
