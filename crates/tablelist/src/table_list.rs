#![forbid(unsafe_code)]

//! The list widget.
//!
//! [`TableList`] keeps an ordered, two-level record model and a rendered
//! node tree in step. Only a prefix of the top-level records is mounted;
//! the window grows as the viewport scrolls towards the end. Focus moves
//! between rows of the same level and wraps at the edges.
//!
//! # Example
//!
//! ```
//! use tablelist::{ItemRecord, TableList, Template};
//!
//! let mut list = TableList::new(
//!     Template::with_slots(["domain", "cookienum"]),
//!     Template::with_slots(["name", "value"]),
//! );
//! let records = (0..300).map(|i| {
//!     ItemRecord::new(format!("example{i}")).with_text("domain", format!("example{i}.com"))
//! });
//! list.add_items(records, None);
//! assert_eq!(list.len(), 300);
//! assert_eq!(list.mounted_count(None), 50);
//! ```

use crate::action::{self, Action};
use crate::config::TableListConfig;
use crate::dom::{Document, NodeId, Tag};
use crate::error::{ConfigError, Error, TemplateError};
use crate::navigator::{self, Direction};
use crate::paint::{self, PaintStyle};
use crate::record::{ItemRecord, records_from_json};
use crate::render::{self, ID_KEY, Renderer, sub_list};
use crate::scroll::{ScrollLoader, ScrollState};
use crate::sort::{self, SortFn};
use crate::template::Template;
use std::fmt;
use tablelist_core::event::{Event, KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use tablelist_core::geometry::Rect;
use tablelist_core::{debug, debug_span, trace, warn};

/// Outcome of [`TableList::handle_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The list has no use for the event.
    Ignored,
    /// The list handled the event; hosts must not apply default behavior.
    Consumed,
}

#[derive(Debug, Clone)]
struct Entry {
    record: ItemRecord,
    mounted: bool,
}

/// Virtualized two-level list.
pub struct TableList {
    config: TableListConfig,
    loader: ScrollLoader,
    renderer: Renderer,
    doc: Document,
    list: NodeId,
    entries: Vec<Entry>,
    loaded: usize,
    sort: Option<SortFn>,
    scroll: ScrollState,
}

impl fmt::Debug for TableList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableList")
            .field("config", &self.config)
            .field("len", &self.entries.len())
            .field("loaded", &self.loaded)
            .field("sorted", &self.sort.is_some())
            .field("scroll", &self.scroll)
            .finish_non_exhaustive()
    }
}

impl TableList {
    /// Create a list with default configuration and natural id ordering.
    #[must_use]
    pub fn new(item_template: Template, sub_item_template: Template) -> Self {
        let config = TableListConfig::default();
        let mut doc = Document::new();
        let list = doc.create_element(Tag::List);
        Self {
            loader: ScrollLoader::new(config.load_amount, config.scroll_load_ratio),
            scroll: ScrollState::new(config.viewport_height),
            config,
            renderer: Renderer::new(item_template, sub_item_template),
            doc,
            list,
            entries: Vec::new(),
            loaded: 0,
            sort: Some(sort::default_sort()),
        }
    }

    /// Create a list from the host's templates: item first, sub-item second.
    ///
    /// Extra templates are ignored.
    pub fn from_templates(
        templates: impl IntoIterator<Item = Template>,
    ) -> Result<Self, TemplateError> {
        let mut templates = templates.into_iter();
        match (templates.next(), templates.next()) {
            (Some(item), Some(sub_item)) => Ok(Self::new(item, sub_item)),
            (first, _) => Err(TemplateError::MissingTemplate {
                found: usize::from(first.is_some()),
            }),
        }
    }

    /// Build a list from the host's templates and a configuration in one step.
    ///
    /// # Example
    ///
    /// ```
    /// use tablelist::{Error, TableList, TableListConfig, Template};
    ///
    /// let templates = [Template::with_slots(["domain"]), Template::with_slots(["name"])];
    /// let list = TableList::try_new(templates, TableListConfig::default().with_load_amount(10))?;
    /// assert_eq!(list.config().load_amount, 10);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn try_new(
        templates: impl IntoIterator<Item = Template>,
        config: TableListConfig,
    ) -> Result<Self, Error> {
        Ok(Self::from_templates(templates)?.with_config(config)?)
    }

    /// Apply a validated configuration.
    pub fn with_config(mut self, config: TableListConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.loader = ScrollLoader::new(config.load_amount, config.scroll_load_ratio);
        self.scroll = ScrollState::new(config.viewport_height);
        self.config = config;
        Ok(self)
    }

    /// Replace the comparator; `None` keeps insertion order.
    #[must_use]
    pub fn with_sort(mut self, sort: Option<SortFn>) -> Self {
        self.sort = sort;
        self
    }

    /// Replace the comparator. Takes effect on the next insertion.
    pub fn set_sort(&mut self, sort: Option<SortFn>) {
        self.sort = sort;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &TableListConfig {
        &self.config
    }

    /// The rendered node tree.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The top-level list node.
    #[must_use]
    pub fn list_node(&self) -> NodeId {
        self.list
    }

    /// Number of top-level records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of mounted top-level records (the load window).
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// Top-level records in order.
    pub fn items(&self) -> impl Iterator<Item = &ItemRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    /// Mounted rows at top level, or under `parent_id`.
    #[must_use]
    pub fn mounted_count(&self, parent_id: Option<&str>) -> usize {
        self.container(parent_id)
            .map_or(0, |c| self.doc.children(c).len())
    }

    /// Ids of mounted rows at top level, or under `parent_id`, in order.
    #[must_use]
    pub fn mounted_ids(&self, parent_id: Option<&str>) -> Vec<String> {
        self.container(parent_id).map_or_else(Vec::new, |c| {
            self.doc
                .children(c)
                .iter()
                .filter_map(|&n| self.doc.data(n, ID_KEY).map(str::to_owned))
                .collect()
        })
    }

    /// Id of the focused row and of its parent row, if any.
    #[must_use]
    pub fn focused_item(&self) -> Option<(String, Option<String>)> {
        let active = self.doc.active_element()?;
        let row = action::owning_row(&self.doc, active)?;
        let id = self.doc.data(row, ID_KEY)?.to_owned();
        Some((id, action::parent_item_id(&self.doc, row)))
    }

    /// First visible row.
    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll.offset()
    }

    /// Total rendered rows.
    #[must_use]
    pub fn content_rows(&self) -> usize {
        paint::row_count(&self.doc, self.list)
    }

    // ========================================================================
    // Model operations
    // ========================================================================

    /// Insert records at top level, or under `parent_id`.
    ///
    /// Top-level records mount only inside the load window; sub-items mount
    /// whenever their parent is mounted. Returns `false` when `parent_id`
    /// names no record.
    pub fn add_items<I>(&mut self, records: I, parent_id: Option<&str>) -> bool
    where
        I: IntoIterator<Item = ItemRecord>,
    {
        let records: Vec<ItemRecord> = records.into_iter().collect();
        let _span = debug_span!(
            "table_list.add_items",
            count = records.len(),
            parent = parent_id.unwrap_or_default()
        )
        .entered();
        match parent_id {
            None => {
                self.add_top_level(records);
                true
            }
            Some(parent_id) => self.add_sub_items(records, parent_id),
        }
    }

    /// [`add_items`](Self::add_items) from a JSON array of records.
    ///
    /// Nothing is inserted when the JSON does not decode.
    pub fn add_items_json(&mut self, json: &str, parent_id: Option<&str>) -> Result<bool, Error> {
        let records = records_from_json(json)?;
        Ok(self.add_items(records, parent_id))
    }

    fn add_top_level(&mut self, records: Vec<ItemRecord>) {
        let window = self.loader.insert_window(self.loaded);
        let base = self.entries.len();
        for (offset, mut record) in records.into_iter().enumerate() {
            prepare_record(&mut record, base + offset);
            self.entries.push(Entry {
                record,
                mounted: false,
            });
        }
        if let Some(sort) = &self.sort {
            self.entries.sort_by(|a, b| sort(&a.record, &b.record));
        }

        // Mounted rows must stay a prefix even when new records sort in
        // ahead of them.
        let last_mounted = self
            .entries
            .iter()
            .rposition(|e| e.mounted)
            .map_or(0, |i| i + 1);
        let fill = window.max(last_mounted).min(self.entries.len());
        for index in 0..fill {
            if !self.entries[index].mounted {
                self.mount_entry(index);
            }
        }
        debug!(loaded = self.loaded, total = self.entries.len(), "top-level insert");
    }

    fn add_sub_items(&mut self, records: Vec<ItemRecord>, parent_id: &str) -> bool {
        let Some(parent_index) = self.index_of(parent_id) else {
            debug!(parent = parent_id, "sub-item insert into unknown parent");
            return false;
        };

        let entry = &mut self.entries[parent_index];
        let existing = entry.record.sub_items.take().unwrap_or_default();
        let base = existing.len();
        let mut tagged: Vec<(bool, ItemRecord)> =
            existing.into_iter().map(|r| (false, r)).collect();
        for (offset, mut record) in records.into_iter().enumerate() {
            prepare_record(&mut record, base + offset);
            tagged.push((true, record));
        }
        if let Some(sort) = &self.sort {
            tagged.sort_by(|a, b| sort(&a.1, &b.1));
        }
        let fresh: Vec<usize> = tagged
            .iter()
            .enumerate()
            .filter_map(|(i, (is_new, _))| is_new.then_some(i))
            .collect();
        let subs: Vec<ItemRecord> = tagged.into_iter().map(|(_, r)| r).collect();
        entry.record.sub_items = (!subs.is_empty()).then_some(subs);

        let Some(parent_node) = self.mounted_node(parent_index) else {
            return true;
        };
        let mut created = false;
        if let Some(subs) = self.entries[parent_index].record.sub_items.as_deref() {
            for &index in &fresh {
                let (_, new_container) =
                    self.renderer
                        .mount_sub_item(&mut self.doc, parent_node, &subs[index], index);
                created |= new_container;
            }
        }
        if created {
            let container = sub_list(&self.doc, parent_node);
            let focused = navigator::select(&mut self.doc, None, container, Some(Direction::Start));
            self.after_focus(focused);
        }
        true
    }

    fn mount_entry(&mut self, index: usize) {
        self.renderer
            .mount_item(&mut self.doc, self.list, &self.entries[index].record, index);
        self.entries[index].mounted = true;
        self.loaded += 1;
        trace!(index, id = self.entries[index].record.id.as_str(), "mounted");
    }

    /// Remove a record at top level, or a sub-item of `parent_id`.
    ///
    /// A focused row hands focus to its next sibling first. Removing the last
    /// sub-item drops the parent's sub-list entirely.
    pub fn remove_item(&mut self, id: &str, parent_id: Option<&str>) -> bool {
        let _span = debug_span!(
            "table_list.remove_item",
            id,
            parent = parent_id.unwrap_or_default()
        )
        .entered();
        let removed = match parent_id {
            None => self.remove_top_level(id),
            Some(parent_id) => self.remove_sub_item(id, parent_id),
        };
        if removed {
            self.reclamp();
        }
        removed
    }

    fn remove_top_level(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if let Some(node) = self.mounted_node(index) {
            if self.doc.active_element() == Some(node) {
                self.select_item(id, None, Some(Direction::Next));
            }
            self.renderer.unmount_item(&mut self.doc, self.list, index);
            self.loaded -= 1;
        }
        self.entries.remove(index);
        true
    }

    fn remove_sub_item(&mut self, id: &str, parent_id: &str) -> bool {
        let Some(parent_index) = self.index_of(parent_id) else {
            return false;
        };
        let Some(index) = sub_index(&self.entries[parent_index].record, id) else {
            return false;
        };
        if let Some(parent_node) = self.mounted_node(parent_index) {
            let node = sub_list(&self.doc, parent_node).and_then(|ul| self.doc.child_at(ul, index));
            if node.is_some() && node == self.doc.active_element() {
                self.select_item(id, Some(parent_id), Some(Direction::Next));
            }
            self.renderer
                .unmount_sub_item(&mut self.doc, parent_node, index);
        }
        let record = &mut self.entries[parent_index].record;
        if let Some(subs) = record.sub_items.as_mut() {
            subs.remove(index);
            if subs.is_empty() {
                record.sub_items = None;
            }
        }
        true
    }

    /// Replace a record, keeping focus on it if it was focused.
    ///
    /// Returns whether the old record existed.
    pub fn update_item(&mut self, record: ItemRecord, id: &str, parent_id: Option<&str>) -> bool {
        let was_focused = self
            .get_item_elem(id, parent_id)
            .is_some_and(|node| self.doc.active_element() == Some(node));
        let new_id = record.id.clone();
        let removed = self.remove_item(id, parent_id);
        self.add_items([record], parent_id);
        if was_focused {
            self.select_item(&new_id, parent_id, None);
        }
        removed
    }

    /// With an id, drop that record's sub-items; without, drop everything.
    ///
    /// Returns `false` only when `id` names no record.
    pub fn empty(&mut self, id: Option<&str>) -> bool {
        let _span = debug_span!("table_list.empty", id = id.unwrap_or_default()).entered();
        match id {
            Some(id) => {
                let Some(index) = self.index_of(id) else {
                    return false;
                };
                self.entries[index].record.sub_items = None;
                if let Some(node) = self.mounted_node(index) {
                    render::remove_sub_list(&mut self.doc, node);
                }
                self.reclamp();
            }
            None => {
                self.doc.clear_children(self.list);
                self.entries.clear();
                self.loaded = 0;
                self.scroll.reset();
            }
        }
        true
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// A copy of the record, at top level or under `parent_id`.
    #[must_use]
    pub fn get_item(&self, id: &str, parent_id: Option<&str>) -> Option<ItemRecord> {
        self.find(id, parent_id).cloned()
    }

    /// Position of the record within its level.
    #[must_use]
    pub fn get_item_index(&self, id: &str, parent_id: Option<&str>) -> Option<usize> {
        match parent_id {
            None => self.index_of(id),
            Some(parent_id) => {
                let parent = self.index_of(parent_id)?;
                sub_index(&self.entries[parent].record, id)
            }
        }
    }

    /// The mounted node for the record, `None` when absent or not mounted.
    #[must_use]
    pub fn get_item_elem(&self, id: &str, parent_id: Option<&str>) -> Option<NodeId> {
        match parent_id {
            None => self.index_of(id).and_then(|i| self.mounted_node(i)),
            Some(parent_id) => {
                let parent = self.index_of(parent_id)?;
                let index = sub_index(&self.entries[parent].record, id)?;
                let ul = sub_list(&self.doc, self.mounted_node(parent)?)?;
                self.doc.child_at(ul, index)
            }
        }
    }

    fn find(&self, id: &str, parent_id: Option<&str>) -> Option<&ItemRecord> {
        match parent_id {
            None => self.index_of(id).map(|i| &self.entries[i].record),
            Some(parent_id) => {
                let parent = &self.entries[self.index_of(parent_id)?].record;
                parent.sub_items.as_deref()?.iter().find(|r| r.id == id)
            }
        }
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.record.id == id)
    }

    fn mounted_node(&self, index: usize) -> Option<NodeId> {
        if self.entries.get(index)?.mounted {
            self.doc.child_at(self.list, index)
        } else {
            None
        }
    }

    fn container(&self, parent_id: Option<&str>) -> Option<NodeId> {
        match parent_id {
            None => Some(self.list),
            Some(parent_id) => sub_list(&self.doc, self.get_item_elem(parent_id, None)?),
        }
    }

    // ========================================================================
    // Focus
    // ========================================================================

    /// Focus a row, or move focus relative to it.
    ///
    /// Without a direction the row itself is focused. `Next`/`Previous` wrap
    /// within the row's level; `Start`/`End` work even when `id` does not
    /// resolve. Returns the newly focused node.
    pub fn select_item(
        &mut self,
        id: &str,
        parent_id: Option<&str>,
        direction: Option<Direction>,
    ) -> Option<NodeId> {
        let target = self.get_item_elem(id, parent_id);
        let container = self.container(parent_id);
        let focused = navigator::select(&mut self.doc, target, container, direction);
        self.after_focus(focused);
        focused
    }

    /// Run a row action raised on `node` or one of its descendants.
    pub fn dispatch_action(&mut self, action: Action, node: NodeId) -> Option<NodeId> {
        let row = action::owning_row(&self.doc, node)?;
        let id = self.doc.data(row, ID_KEY)?.to_owned();
        let parent = action::parent_item_id(&self.doc, row);
        trace!(action = action.name(), id = id.as_str(), "action");
        self.select_item(&id, parent.as_deref(), Some(action.direction()))
    }

    /// [`dispatch_action`](Self::dispatch_action) by wire name; unknown names are ignored.
    pub fn dispatch_action_named(&mut self, name: &str, node: NodeId) -> Option<NodeId> {
        let action = name.parse::<Action>().ok()?;
        self.dispatch_action(action, node)
    }

    fn after_focus(&mut self, focused: Option<NodeId>) {
        let Some(node) = focused else { return };
        let rows = paint::layout(&self.doc, self.list);
        let Some(row) = rows.iter().position(|r| r.node == node) else {
            return;
        };
        if self.scroll.reveal(row, rows.len()) {
            self.on_scroll();
        }
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    /// Scroll to a row offset. Returns how many records were mounted.
    pub fn scroll_to(&mut self, offset: usize) -> usize {
        let content = self.content_rows();
        self.scroll.scroll_to(offset, content);
        self.on_scroll()
    }

    /// Scroll by `delta` rows. Returns how many records were mounted.
    pub fn scroll_by(&mut self, delta: isize) -> usize {
        let content = self.content_rows();
        self.scroll.scroll_by(delta, content);
        self.on_scroll()
    }

    /// Change the number of visible rows. Returns how many records were mounted.
    pub fn set_viewport_height(&mut self, rows: u16) -> usize {
        let content = self.content_rows();
        self.scroll.resize(rows, content);
        self.config.viewport_height = rows;
        self.on_scroll()
    }

    fn on_scroll(&mut self) -> usize {
        let metrics = self.scroll.metrics(self.content_rows());
        if !self
            .loader
            .should_load(metrics, self.loaded, self.entries.len())
        {
            return 0;
        }
        let batch = self.loader.next_batch(self.loaded, self.entries.len());
        let _span = debug_span!(
            "table_list.scroll_load",
            from = batch.start,
            to = batch.end
        )
        .entered();
        let count = batch.len();
        for index in batch {
            self.mount_entry(index);
        }
        count
    }

    fn reclamp(&mut self) {
        let content = self.content_rows();
        self.scroll.resize(self.scroll.viewport(), content);
    }

    // ========================================================================
    // Input and painting
    // ========================================================================

    /// React to an input event.
    ///
    /// Up and Down are always consumed so the host does not scroll; they move
    /// focus between siblings of the focused row. Ctrl-modified keys are left
    /// to the host. Mouse coordinates are relative to the list's top-left
    /// cell; a resize sets the viewport to the new height.
    pub fn handle_event(&mut self, event: &Event) -> EventResult {
        match event {
            Event::Key(key) if key.is_down() && !key.ctrl() => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize { height, .. } => {
                self.set_viewport_height(*height);
                EventResult::Consumed
            }
            Event::Focus(false) => {
                self.doc.blur();
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> EventResult {
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                let action = if key.code == KeyCode::Down {
                    Action::NextSibling
                } else {
                    Action::PreviousSibling
                };
                if let Some(active) = self.doc.active_element() {
                    self.dispatch_action(action, active);
                }
                EventResult::Consumed
            }
            KeyCode::Home | KeyCode::End => {
                let direction = if key.code == KeyCode::Home {
                    Direction::Start
                } else {
                    Direction::End
                };
                let container = self
                    .doc
                    .active_element()
                    .and_then(|active| action::owning_row(&self.doc, active))
                    .and_then(|row| self.doc.parent(row))
                    .unwrap_or(self.list);
                let focused =
                    navigator::select(&mut self.doc, None, Some(container), Some(direction));
                self.after_focus(focused);
                EventResult::Consumed
            }
            KeyCode::PageUp | KeyCode::PageDown => {
                let page = isize::try_from(self.scroll.viewport()).unwrap_or(isize::MAX);
                let delta = if key.code == KeyCode::PageDown { page } else { -page };
                self.scroll_by(delta);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> EventResult {
        let step = isize::try_from(self.config.wheel_step).unwrap_or(isize::MAX);
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.scroll_by(-step);
                EventResult::Consumed
            }
            MouseEventKind::ScrollDown => {
                self.scroll_by(step);
                EventResult::Consumed
            }
            MouseEventKind::Click => {
                let viewport = Rect::from_size(u16::MAX, self.scroll.viewport());
                if !viewport.contains(mouse.x, mouse.y) {
                    return EventResult::Ignored;
                }
                let rows = paint::layout(&self.doc, self.list);
                let index = self.scroll.offset() + usize::from(mouse.y);
                match rows.get(index) {
                    Some(row) => {
                        self.doc.focus(row.node);
                        EventResult::Consumed
                    }
                    _ => EventResult::Ignored,
                }
            }
        }
    }

    /// Paint the visible rows that fit in `area`.
    #[must_use]
    pub fn paint(&self, area: Rect) -> Vec<String> {
        if area.is_empty() {
            return Vec::new();
        }
        let rows = paint::layout(&self.doc, self.list);
        let mut visible = self.scroll.visible(rows.len());
        visible.end = visible.end.min(visible.start + usize::from(area.height));
        let style = PaintStyle {
            indent: self.config.sub_item_indent,
            focus_marker: &self.config.focus_marker,
        };
        paint::paint_rows(&self.doc, &rows[visible], area.width, style)
    }
}

fn sub_index(parent: &ItemRecord, id: &str) -> Option<usize> {
    parent.sub_items.as_deref()?.iter().position(|r| r.id == id)
}

/// Normalize a record on its way into the model.
///
/// Missing ids fall back to the record's position in its sequence, and an
/// empty sub-item list means no sub-list at all.
fn prepare_record(record: &mut ItemRecord, position: usize) {
    if record.id.is_empty() {
        record.id = position.to_string();
        warn!(position, "record without id, using its position");
    }
    if record.sub_items.as_ref().is_some_and(Vec::is_empty) {
        record.sub_items = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablelist_core::event::Modifiers;

    fn list() -> TableList {
        TableList::new(
            Template::with_slots(["domain", "cookienum"]),
            Template::with_slots(["name", "value"]),
        )
    }

    fn records(prefix: &str, n: usize) -> Vec<ItemRecord> {
        (0..n)
            .map(|i| {
                ItemRecord::new(format!("{prefix}{i}"))
                    .with_data("access", format!("{prefix}{i}.com"))
                    .with_text("domain", format!("{prefix}{i}.com"))
            })
            .collect()
    }

    fn focused(list: &TableList) -> Option<String> {
        list.focused_item().map(|(id, _)| id)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code))
    }

    #[test]
    fn from_templates_needs_two() {
        let err = TableList::from_templates([Template::with_slots(["a"])]).unwrap_err();
        assert_eq!(err, TemplateError::MissingTemplate { found: 1 });
        let err = TableList::from_templates(Vec::new()).unwrap_err();
        assert_eq!(err, TemplateError::MissingTemplate { found: 0 });
        assert!(
            TableList::from_templates([Template::with_slots(["a"]), Template::with_slots(["b"])])
                .is_ok()
        );
    }

    #[test]
    fn try_new_reports_template_and_config_errors() {
        let err = TableList::try_new([Template::with_slots(["a"])], TableListConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Template(TemplateError::MissingTemplate { found: 1 })
        ));

        let templates = [Template::with_slots(["a"]), Template::with_slots(["b"])];
        let config = TableListConfig::default().with_scroll_load_ratio(1.5);
        let err = TableList::try_new(templates, config).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ScrollRatioOutOfRange(_))));
    }

    #[test]
    fn json_insertion_reports_record_errors() {
        let mut list = list();
        let err = list.add_items_json("{not json", None).unwrap_err();
        assert!(matches!(err, Error::Record(_)));
        assert!(list.is_empty());

        let added = list
            .add_items_json(r#"[{"id": "b"}, {"id": "a"}]"#, None)
            .unwrap();
        assert!(added);
        assert_eq!(list.mounted_ids(None), ["a", "b"]);
        assert!(!list.add_items_json("[]", Some("missing")).unwrap());
    }

    #[test]
    fn with_config_validates() {
        let err = list()
            .with_config(TableListConfig::default().with_load_amount(0))
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroLoadAmount);
    }

    #[test]
    fn initial_window_is_load_amount() {
        let mut list = list();
        list.add_items(records("example", 300), None);
        assert_eq!(list.len(), 300);
        assert_eq!(list.loaded(), 50);
        assert_eq!(list.mounted_count(None), 50);
        assert_eq!(list.mounted_ids(None)[..3], ["example0", "example1", "example2"]);
    }

    #[test]
    fn small_insert_mounts_everything() {
        let mut list = list();
        list.add_items(records("x", 7), None);
        assert_eq!(list.mounted_count(None), 7);
    }

    #[test]
    fn insert_keeps_sorted_dom_order() {
        let mut list = list();
        list.add_items(records("b", 3), None);
        list.add_items([ItemRecord::new("a"), ItemRecord::new("b10"), ItemRecord::new("b1x")], None);
        let ids: Vec<_> = list.items().map(|r| r.id.clone()).collect();
        assert_eq!(ids, ["a", "b0", "b1", "b1x", "b2", "b10"]);
        assert_eq!(list.mounted_ids(None), ids);
    }

    #[test]
    fn insert_ahead_of_window_keeps_prefix() {
        let mut list = list()
            .with_config(TableListConfig::default().with_load_amount(5))
            .unwrap();
        list.add_items(records("m", 8), None);
        assert_eq!(list.loaded(), 5);
        list.add_items(records("a", 7), None);
        // Old rows stay mounted; every new row ahead of them mounts too.
        assert_eq!(list.loaded(), 12);
        let ids: Vec<_> = list.items().take(12).map(|r| r.id.clone()).collect();
        assert_eq!(list.mounted_ids(None), ids);
    }

    #[test]
    fn insert_without_sort_appends() {
        let mut list = list().with_sort(None);
        list.add_items([ItemRecord::new("z"), ItemRecord::new("a")], None);
        assert_eq!(list.mounted_ids(None), ["z", "a"]);
    }

    #[test]
    fn missing_ids_use_position() {
        let mut list = list().with_sort(None);
        list.add_items([ItemRecord::new("first"), ItemRecord::default()], None);
        assert_eq!(list.get_item_index("1", None), Some(1));
    }

    #[test]
    fn first_row_is_the_only_tab_stop() {
        let mut list = list();
        list.add_items(records("k", 3), None);
        list.add_items([ItemRecord::new("a")], None);
        let doc = list.document();
        let tabs: Vec<_> = doc
            .children(list.list_node())
            .iter()
            .map(|&n| doc.attribute(n, "tabindex").unwrap())
            .collect();
        assert_eq!(tabs, ["0", "-1", "-1", "-1"]);

        list.remove_item("a", None);
        let first = list.get_item_elem("k0", None).unwrap();
        assert_eq!(list.document().attribute(first, "tabindex"), Some("0"));
    }

    #[test]
    fn sub_items_mount_sorted_and_take_focus() {
        let mut list = list();
        list.add_items(records("example", 3), None);
        assert!(list.add_items(records("sub", 2), Some("example1")));
        assert_eq!(focused(&list).as_deref(), Some("sub0"));
        list.add_items([ItemRecord::new("sub05")], Some("example1"));
        assert_eq!(list.mounted_ids(Some("example1")), ["sub0", "sub1", "sub05"]);
        let parent = list.get_item_elem("example1", None).unwrap();
        assert_eq!(list.document().data(parent, "expanded"), Some("true"));
    }

    #[test]
    fn sub_items_under_unknown_parent_are_rejected() {
        let mut list = list();
        assert!(!list.add_items(records("s", 2), Some("nope")));
        assert!(list.is_empty());
    }

    #[test]
    fn unmounted_parent_mounts_sub_items_later() {
        let mut list = list();
        list.add_items(records("example", 60), None);
        list.add_items(records("sub", 2), Some("example55"));
        assert_eq!(list.get_item("example55", None).unwrap().sub_item_count(), 2);
        assert_eq!(list.get_item_elem("sub0", Some("example55")), None);

        list.scroll_to(usize::MAX);
        assert_eq!(list.loaded(), 60);
        assert_eq!(list.mounted_ids(Some("example55")), ["sub0", "sub1"]);
    }

    #[test]
    fn lookups_miss_cleanly() {
        let mut list = list();
        list.add_items(records("example", 3), None);
        list.add_items(records("sub", 2), Some("example0"));
        assert_eq!(list.get_item_index("nope", None), None);
        assert_eq!(list.get_item_index("sub1", Some("example0")), Some(1));
        assert_eq!(list.get_item_index("sub1", Some("example2")), None);
        assert_eq!(list.get_item_index("sub1", Some("missing")), None);
        assert!(list.get_item("sub9", Some("example0")).is_none());
        assert!(list.get_item_elem("nope", None).is_none());
    }

    #[test]
    fn get_item_returns_independent_copy() {
        let mut list = list();
        list.add_items(records("example", 2), None);
        let mut copy = list.get_item("example1", None).unwrap();
        copy.texts.insert("domain".into(), "changed".into());
        copy.id.push('!');
        assert_eq!(
            list.get_item("example1", None).unwrap().texts["domain"],
            "example1.com"
        );
    }

    #[test]
    fn remove_shrinks_window_and_model() {
        let mut list = list();
        list.add_items(records("example", 300), None);
        assert!(list.remove_item("example1", None));
        assert!(!list.remove_item("example1", None));
        assert_eq!(list.get_item_index("example1", None), None);
        assert_eq!(list.loaded(), 49);
        assert_eq!(list.mounted_count(None), 49);
        assert!(!list.remove_item("example299", Some("example0")));
        assert!(list.remove_item("example299", None));
        assert_eq!(list.loaded(), 49);
    }

    #[test]
    fn removing_focused_row_moves_focus_next() {
        let mut list = list();
        list.add_items(records("example", 3), None);
        list.select_item("example1", None, None);
        list.remove_item("example1", None);
        assert_eq!(focused(&list).as_deref(), Some("example2"));
        list.remove_item("example2", None);
        assert_eq!(focused(&list).as_deref(), Some("example0"));
    }

    #[test]
    fn removing_last_sub_item_drops_sub_list() {
        let mut list = list();
        list.add_items(records("example", 2), None);
        list.add_items(records("sub", 1), Some("example0"));
        assert!(list.remove_item("sub0", Some("example0")));
        assert_eq!(list.get_item("example0", None).unwrap().sub_items, None);
        let parent = list.get_item_elem("example0", None).unwrap();
        assert_eq!(sub_list(list.document(), parent), None);
        assert_eq!(list.document().data(parent, "expanded"), None);
        assert_eq!(list.mounted_count(Some("example0")), 0);
    }

    #[test]
    fn update_replaces_and_keeps_focus() {
        let mut list = list();
        list.add_items(records("example", 3), None);
        list.select_item("example1", None, None);
        let replacement = ItemRecord::new("example1").with_text("domain", "renamed");
        assert!(list.update_item(replacement.clone(), "example1", None));
        assert_eq!(list.get_item("example1", None), Some(replacement));
        assert_eq!(focused(&list).as_deref(), Some("example1"));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn update_of_sub_item() {
        let mut list = list();
        list.add_items(records("example", 1), None);
        list.add_items(records("sub", 3), Some("example0"));
        list.update_item(ItemRecord::new("sub9"), "sub0", Some("example0"));
        assert_eq!(list.mounted_ids(Some("example0")), ["sub1", "sub2", "sub9"]);
    }

    #[test]
    fn empty_with_id_clears_only_sub_items() {
        let mut list = list();
        list.add_items(records("example", 3), None);
        list.add_items(records("sub", 3), Some("example1"));
        assert!(list.empty(Some("example1")));
        assert_eq!(list.len(), 3);
        assert_eq!(list.get_item("example1", None).unwrap().sub_items, None);
        assert_eq!(list.mounted_count(Some("example1")), 0);
        assert!(!list.empty(Some("missing")));
    }

    #[test]
    fn empty_without_id_resets() {
        let mut list = list();
        list.add_items(records("example", 120), None);
        list.scroll_to(usize::MAX);
        list.empty(None);
        assert!(list.is_empty());
        assert_eq!(list.loaded(), 0);
        assert_eq!(list.mounted_count(None), 0);
        assert_eq!(list.document().len(), 1);

        list.add_items(records("again", 2), None);
        let first = list.get_item_elem("again0", None).unwrap();
        assert_eq!(list.document().attribute(first, "tabindex"), Some("0"));
    }

    #[test]
    fn scroll_loads_one_batch_past_threshold() {
        let mut list = list();
        list.add_items(records("example", 120), None);
        assert_eq!(list.scroll_to(10), 0);
        assert_eq!(list.loaded(), 50);
        assert_eq!(list.scroll_to(40), 50);
        assert_eq!(list.loaded(), 100);
        assert_eq!(list.scroll_to(usize::MAX), 20);
        assert_eq!(list.loaded(), 120);
        assert_eq!(list.scroll_to(usize::MAX), 0);
    }

    #[test]
    fn select_wraps_within_level() {
        let mut list = list();
        list.add_items(records("example", 3), None);
        list.add_items(records("sub", 3), Some("example0"));

        list.select_item("example2", None, Some(Direction::Next));
        assert_eq!(focused(&list).as_deref(), Some("example0"));
        list.select_item("example0", None, Some(Direction::Previous));
        assert_eq!(focused(&list).as_deref(), Some("example2"));
        list.select_item("sub2", Some("example0"), Some(Direction::Next));
        assert_eq!(focused(&list).as_deref(), Some("sub0"));
        list.select_item("ignored", Some("example0"), Some(Direction::End));
        assert_eq!(focused(&list).as_deref(), Some("sub2"));
    }

    #[test]
    fn select_unknown_is_noop() {
        let mut list = list();
        list.add_items(records("example", 3), None);
        list.select_item("example1", None, None);
        assert_eq!(list.select_item("nope", None, None), None);
        assert_eq!(list.select_item("nope", None, Some(Direction::Next)), None);
        assert_eq!(focused(&list).as_deref(), Some("example1"));
    }

    #[test]
    fn arrow_keys_walk_siblings() {
        let mut list = list();
        list.add_items(records("example", 3), None);
        assert_eq!(list.handle_event(&key(KeyCode::Down)), EventResult::Consumed);
        assert_eq!(focused(&list), None);

        list.select_item("example1", None, None);
        list.handle_event(&key(KeyCode::Down));
        assert_eq!(focused(&list).as_deref(), Some("example2"));
        list.handle_event(&key(KeyCode::Down));
        assert_eq!(focused(&list).as_deref(), Some("example0"));
        list.handle_event(&key(KeyCode::Up));
        assert_eq!(focused(&list).as_deref(), Some("example2"));
        list.handle_event(&key(KeyCode::Home));
        assert_eq!(focused(&list).as_deref(), Some("example0"));
        list.handle_event(&key(KeyCode::End));
        assert_eq!(focused(&list).as_deref(), Some("example2"));
        assert_eq!(list.handle_event(&key(KeyCode::Char('x'))), EventResult::Ignored);
    }

    #[test]
    fn focus_scrolls_into_view_and_loads() {
        let mut list = list();
        list.add_items(records("example", 100), None);
        list.select_item("example49", None, None);
        assert_eq!(list.scroll_offset(), 38);
        assert_eq!(list.loaded(), 100);
    }

    #[test]
    fn actions_from_nested_nodes() {
        let mut list = list();
        list.add_items(records("example", 2), None);
        list.add_items(records("sub", 2), Some("example0"));
        let sub0 = list.get_item_elem("sub0", Some("example0")).unwrap();
        let slot = list.document().text_slot(sub0, "name");
        let origin = slot.unwrap_or(sub0);
        assert!(list.dispatch_action_named("next-sibling", origin).is_some());
        assert_eq!(focused(&list).as_deref(), Some("sub1"));
        assert_eq!(list.dispatch_action_named("sideways", origin), None);
    }

    #[test]
    fn resize_reclamps_and_loads() {
        let mut list = list()
            .with_config(
                TableListConfig::default()
                    .with_load_amount(5)
                    .with_viewport_height(2),
            )
            .unwrap();
        list.add_items(records("example", 20), None);
        assert_eq!(list.loaded(), 5);

        let resize = Event::Resize {
            width: 80,
            height: 40,
        };
        assert_eq!(list.handle_event(&resize), EventResult::Consumed);
        assert_eq!(list.config().viewport_height, 40);
        assert_eq!(list.loaded(), 10);
        assert_eq!(list.scroll_offset(), 0);
    }

    #[test]
    fn focus_loss_blurs_and_ctrl_keys_pass_through() {
        let mut list = list();
        list.add_items(records("example", 3), None);
        list.select_item("example1", None, None);

        let ctrl_down = Event::Key(KeyEvent::new(KeyCode::Down).with_modifiers(Modifiers::CTRL));
        assert_eq!(list.handle_event(&ctrl_down), EventResult::Ignored);
        assert_eq!(focused(&list).as_deref(), Some("example1"));

        assert_eq!(list.handle_event(&Event::Focus(true)), EventResult::Ignored);
        assert_eq!(list.handle_event(&Event::Focus(false)), EventResult::Consumed);
        assert_eq!(focused(&list), None);
    }

    #[test]
    fn mouse_wheel_and_click() {
        let mut list = list();
        list.add_items(records("example", 30), None);
        let wheel = Event::Mouse(MouseEvent::new(MouseEventKind::ScrollDown, 0, 0));
        assert_eq!(list.handle_event(&wheel), EventResult::Consumed);
        assert_eq!(list.scroll_offset(), 3);

        let click = Event::Mouse(MouseEvent::new(MouseEventKind::Click, 4, 2));
        assert_eq!(list.handle_event(&click), EventResult::Consumed);
        assert_eq!(focused(&list).as_deref(), Some("example5"));

        let outside = Event::Mouse(MouseEvent::new(MouseEventKind::Click, 0, 40));
        assert_eq!(list.handle_event(&outside), EventResult::Ignored);
    }

    #[test]
    fn paint_shows_visible_rows() {
        let mut list = list()
            .with_config(TableListConfig::default().with_viewport_height(3))
            .unwrap();
        list.add_items(records("example", 5), None);
        list.add_items(records("sub", 1), Some("example0"));
        let lines = list.paint(Rect::from_size(30, 10));
        assert_eq!(lines, vec!["  example0.com", "  > ", "  example1.com"]);
        assert_eq!(list.paint(Rect::from_size(8, 2)), vec!["  exampl", "  > "]);
        assert!(list.paint(Rect::from_size(0, 2)).is_empty());
    }
}
