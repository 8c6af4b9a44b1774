//! Section and row identifiers.

use std::fmt;
use std::rc::Rc;

/// Identifier of a section or of a row within its section.
///
/// Data sources may identify sections and rows either by number or by string,
/// mirroring the way list data usually arrives (array indices or record ids).
/// String ids are reference counted so cloning an id is always cheap.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemId {
    Int(i64),
    Str(Rc<str>),
}

impl ItemId {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ItemId::Int(value) => Some(*value),
            ItemId::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ItemId::Int(_) => None,
            ItemId::Str(value) => Some(value),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(value) => write!(f, "{value}"),
            ItemId::Str(value) => f.write_str(value),
        }
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        ItemId::Str(Rc::from(value))
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        ItemId::Str(Rc::from(value))
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        ItemId::Int(value)
    }
}

impl From<i32> for ItemId {
    fn from(value: i32) -> Self {
        ItemId::Int(i64::from(value))
    }
}

impl From<u32> for ItemId {
    fn from(value: u32) -> Self {
        ItemId::Int(i64::from(value))
    }
}

impl From<usize> for ItemId {
    fn from(value: usize) -> Self {
        ItemId::Int(value as i64)
    }
}

/// Full identity of a row: its section id plus its row id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub section_id: ItemId,
    pub row_id: ItemId,
}

impl RowKey {
    pub fn new(section_id: impl Into<ItemId>, row_id: impl Into<ItemId>) -> Self {
        Self {
            section_id: section_id.into(),
            row_id: row_id.into(),
        }
    }

    /// Combined `"{section}_{row}"` form used as the render key of a row.
    pub fn combo_key(&self) -> String {
        format!("{}_{}", self.section_id, self.row_id)
    }

    /// Returns true if this key addresses `row_id` inside `section_id`.
    pub fn matches(&self, section_id: &ItemId, row_id: &ItemId) -> bool {
        &self.section_id == section_id && &self.row_id == row_id
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.section_id, self.row_id)
    }
}
