//! Output of a render pass.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use listview_core::{ItemId, RowKey};

/// Kind of a rendered child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Header,
    SectionHeader,
    Row,
    Separator,
    Footer,
}

/// One child of the scroll content, in render order.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderEntry<V> {
    pub kind: EntryKind,
    /// Stable key: `header`, `footer`, `s_{section}`, `r_{section}_{row}`
    /// or `sep_{section}_{row}`.
    pub key: String,
    /// Owning row for rows and separators.
    pub row_key: Option<RowKey>,
    /// Whether the host has to redraw this child. Header, footer and
    /// separators are always redrawn.
    pub should_update: bool,
    pub content: V,
}

impl<V> RenderEntry<V> {
    pub fn is_row(&self) -> bool {
        self.kind == EntryKind::Row
    }
}

pub(crate) fn header_key() -> String {
    "header".to_owned()
}

pub(crate) fn footer_key() -> String {
    "footer".to_owned()
}

pub(crate) fn section_header_key(section_id: &ItemId) -> String {
    format!("s_{section_id}")
}

pub(crate) fn row_entry_key(key: &RowKey) -> String {
    format!("r_{}", key.combo_key())
}

pub(crate) fn separator_key(key: &RowKey) -> String {
    format!("sep_{}", key.combo_key())
}

/// Children produced by [`ListView::render`](crate::ListView::render).
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPass<V> {
    pub entries: Vec<RenderEntry<V>>,
    /// User sticky indices followed by the index of every section header.
    pub sticky_header_indices: Vec<usize>,
    pub rendered_rows: usize,
    pub total_rows: usize,
}

impl<V> RenderPass<V> {
    pub fn rows(&self) -> impl Iterator<Item = &RenderEntry<V>> {
        self.entries.iter().filter(|entry| entry.is_row())
    }

    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    pub fn entry(&self, key: &str) -> Option<&RenderEntry<V>> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.key.as_str()).collect()
    }
}

#[derive(Debug, Default)]
struct HighlightState {
    row: RefCell<Option<RowKey>>,
    changed: Cell<bool>,
}

/// Shared handle through which row callbacks highlight a row.
///
/// A change takes effect on the next render pass; the pass that is running
/// keeps the highlight it started with.
#[derive(Clone, Debug, Default)]
pub struct HighlightRow {
    state: Rc<HighlightState>,
}

impl HighlightRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlight(&self, section_id: impl Into<ItemId>, row_id: impl Into<ItemId>) {
        self.set(Some(RowKey::new(section_id, row_id)));
    }

    pub fn clear(&self) {
        self.set(None);
    }

    pub fn current(&self) -> Option<RowKey> {
        self.state.row.borrow().clone()
    }

    pub fn is_highlighted(&self, key: &RowKey) -> bool {
        self.state.row.borrow().as_ref() == Some(key)
    }

    /// Whether the highlight changed since the last call.
    pub fn take_changed(&self) -> bool {
        self.state.changed.replace(false)
    }

    fn set(&self, row: Option<RowKey>) {
        let mut current = self.state.row.borrow_mut();
        if *current != row {
            log::trace!("highlighted row: {:?} -> {:?}", *current, row);
            *current = row;
            self.state.changed.set(true);
        }
    }
}
