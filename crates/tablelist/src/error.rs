#![forbid(unsafe_code)]

//! Construction and input errors.
//!
//! Runtime list operations never fail; lookups that miss return `None` or
//! `false`. Errors only arise while building the widget or parsing records.

use crate::dom::Tag;
use std::fmt;

/// Problems with the item or sub-item template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template root must be a list item.
    RootNotListItem {
        /// Tag found at the root instead.
        found: Tag,
    },
    /// Two templates (item, sub-item) are required.
    MissingTemplate {
        /// How many were supplied.
        found: usize,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotListItem { found } => {
                write!(f, "template root must be <li>, found <{found}>")
            }
            Self::MissingTemplate { found } => {
                write!(f, "expected item and sub-item templates, found {found}")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// Invalid [`TableListConfig`](crate::config::TableListConfig) values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The scroll batch size must be at least one record.
    ZeroLoadAmount,
    /// The scroll trigger ratio must lie in `(0, 1]`.
    ScrollRatioOutOfRange(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLoadAmount => write!(f, "load amount must be greater than zero"),
            Self::ScrollRatioOutOfRange(ratio) => {
                write!(f, "scroll load ratio {ratio} is outside (0, 1]")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure to decode item records.
#[derive(Debug)]
pub enum RecordError {
    /// Malformed JSON or a shape that is not a record.
    Json(serde_json::Error),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid item record: {err}"),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Any error produced by this crate.
#[derive(Debug)]
pub enum Error {
    /// See [`TemplateError`].
    Template(TemplateError),
    /// See [`ConfigError`].
    Config(ConfigError),
    /// See [`RecordError`].
    Record(RecordError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(err) => err.fmt(f),
            Self::Config(err) => err.fmt(f),
            Self::Record(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Template(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Record(err) => Some(err),
        }
    }
}

impl From<TemplateError> for Error {
    fn from(err: TemplateError) -> Self {
        Self::Template(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<RecordError> for Error {
    fn from(err: RecordError) -> Self {
        Self::Record(err)
    }
}
