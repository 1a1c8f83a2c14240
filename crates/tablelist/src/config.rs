#![forbid(unsafe_code)]

//! Widget configuration.

use crate::error::ConfigError;

/// Tunables for [`TableList`](crate::TableList).
///
/// # Example
///
/// ```
/// use tablelist::config::TableListConfig;
///
/// let config = TableListConfig::default()
///     .with_load_amount(100)
///     .with_viewport_height(20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableListConfig {
    /// Records mounted per scroll-triggered batch, and the initial window.
    pub load_amount: usize,
    /// Scroll position (bottom edge / content height) that triggers loading.
    pub scroll_load_ratio: f64,
    /// Visible rows.
    pub viewport_height: u16,
    /// Indentation of sub-item rows, in columns.
    pub sub_item_indent: u16,
    /// Prefix painted before the focused row.
    pub focus_marker: String,
    /// Rows moved per mouse wheel notch.
    pub wheel_step: usize,
}

impl Default for TableListConfig {
    fn default() -> Self {
        Self {
            load_amount: Self::DEFAULT_LOAD_AMOUNT,
            scroll_load_ratio: Self::DEFAULT_SCROLL_LOAD_RATIO,
            viewport_height: 12,
            sub_item_indent: 2,
            focus_marker: "> ".to_owned(),
            wheel_step: 3,
        }
    }
}

impl TableListConfig {
    /// Default batch size.
    pub const DEFAULT_LOAD_AMOUNT: usize = 50;
    /// Default scroll trigger.
    pub const DEFAULT_SCROLL_LOAD_RATIO: f64 = 0.8;

    /// Set the batch size.
    #[must_use]
    pub fn with_load_amount(mut self, amount: usize) -> Self {
        self.load_amount = amount;
        self
    }

    /// Set the scroll trigger ratio.
    #[must_use]
    pub fn with_scroll_load_ratio(mut self, ratio: f64) -> Self {
        self.scroll_load_ratio = ratio;
        self
    }

    /// Set the number of visible rows.
    #[must_use]
    pub fn with_viewport_height(mut self, rows: u16) -> Self {
        self.viewport_height = rows;
        self
    }

    /// Set the sub-item indentation.
    #[must_use]
    pub fn with_sub_item_indent(mut self, columns: u16) -> Self {
        self.sub_item_indent = columns;
        self
    }

    /// Set the focus marker.
    #[must_use]
    pub fn with_focus_marker(mut self, marker: impl Into<String>) -> Self {
        self.focus_marker = marker.into();
        self
    }

    /// Set the wheel step.
    #[must_use]
    pub fn with_wheel_step(mut self, rows: usize) -> Self {
        self.wheel_step = rows;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.load_amount == 0 {
            return Err(ConfigError::ZeroLoadAmount);
        }
        // NaN fails both comparisons.
        if !(self.scroll_load_ratio > 0.0 && self.scroll_load_ratio <= 1.0) {
            return Err(ConfigError::ScrollRatioOutOfRange(self.scroll_load_ratio));
        }
        Ok(())
    }
}
