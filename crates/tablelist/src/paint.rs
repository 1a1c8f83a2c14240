#![forbid(unsafe_code)]

//! Row layout and text painting.
//!
//! Every mounted item and sub-item occupies one row. Rows are laid out in
//! document order, sub-items indented under their parent, and painted as
//! width-bounded strings.

use crate::dom::{Document, NodeId};
use crate::render::sub_list;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Separator between slot texts on one row.
const SLOT_GAP: &str = "  ";

/// One laid-out row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// The row's list item.
    pub node: NodeId,
    /// 0 for items, 1 for sub-items.
    pub depth: u8,
}

/// Lay out every mounted row under `list`.
#[must_use]
pub fn layout(doc: &Document, list: NodeId) -> Vec<Row> {
    let mut rows = Vec::with_capacity(doc.children(list).len());
    for &item in doc.children(list) {
        rows.push(Row {
            node: item,
            depth: 0,
        });
        if let Some(ul) = sub_list(doc, item) {
            rows.extend(doc.children(ul).iter().map(|&node| Row { node, depth: 1 }));
        }
    }
    rows
}

/// Number of rows [`layout`] would produce.
#[must_use]
pub fn row_count(doc: &Document, list: NodeId) -> usize {
    doc.children(list)
        .iter()
        .map(|&item| 1 + sub_list(doc, item).map_or(0, |ul| doc.children(ul).len()))
        .sum()
}

/// Painting parameters.
#[derive(Debug, Clone, Copy)]
pub struct PaintStyle<'a> {
    /// Columns per depth level.
    pub indent: u16,
    /// Prefix for the focused row; other rows get blanks of equal width.
    pub focus_marker: &'a str,
}

/// Paint `rows` into strings no wider than `width` columns.
#[must_use]
pub fn paint_rows(
    doc: &Document,
    rows: &[Row],
    width: u16,
    style: PaintStyle<'_>,
) -> Vec<String> {
    let active = doc.active_element();
    let marker_width = style.focus_marker.width();
    rows.iter()
        .map(|row| {
            let mut line = String::new();
            let indent = usize::from(style.indent) * usize::from(row.depth);
            line.extend(std::iter::repeat_n(' ', indent));
            if Some(row.node) == active {
                line.push_str(style.focus_marker);
            } else {
                line.extend(std::iter::repeat_n(' ', marker_width));
            }
            line.push_str(&doc.text_content(row.node, SLOT_GAP));
            truncate_to_width(&line, usize::from(width))
        })
        .collect()
}

/// Cut `text` at a grapheme boundary so it fits in `max` columns.
#[must_use]
pub fn truncate_to_width(text: &str, max: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w > max {
            break;
        }
        used += w;
        out.push_str(grapheme);
    }
    out
}
