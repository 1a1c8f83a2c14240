#![forbid(unsafe_code)]

//! A virtualized two-level list widget.
//!
//! Records are kept sorted and rendered from templates into a small node
//! tree. Rows move focus among siblings with wrap-around, sub-items nest one
//! level under their parent, and top-level rows mount in batches as the
//! viewport scrolls.

pub mod action;
pub mod config;
pub mod dom;
pub mod error;
pub mod navigator;
pub mod paint;
pub mod record;
pub mod render;
pub mod scroll;
pub mod sort;
pub mod table_list;
pub mod template;

pub use action::Action;
pub use config::TableListConfig;
pub use dom::{Document, NodeId, Tag};
pub use error::{ConfigError, Error, RecordError, TemplateError};
pub use navigator::Direction;
pub use record::{ItemRecord, records_from_json};
pub use sort::{SortFn, natural_cmp};
pub use table_list::{EventResult, TableList};
pub use template::{Template, TemplateNode};

pub use tablelist_core::event::{Event, KeyCode, KeyEvent, MouseEvent, MouseEventKind};
pub use tablelist_core::geometry::Rect;
