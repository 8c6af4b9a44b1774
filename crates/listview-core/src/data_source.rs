//! Data source contract for list views.
//!
//! This module defines the [`ListDataSource`] trait through which the list
//! queries section/row identity, row content and staleness, plus
//! [`DataSource`], an immutable snapshot implementation that computes the
//! staleness flags by diffing against the snapshot it was cloned from.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::collections::map::{HashMap, HashSet};
use crate::ids::{ItemId, RowKey};

/// Section id used by [`DataSource::clone_with_rows`].
pub const DEFAULT_SECTION_ID: &str = "s1";

/// Allocates a process-unique snapshot version.
pub fn next_data_source_version() -> u64 {
    static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);
    NEXT_VERSION.fetch_add(1, Ordering::Relaxed)
}

/// Provides everything the list needs to know about its rows.
///
/// Implementations must be immutable per [`version`](Self::version): any
/// change to the underlying data has to produce a new value with a new
/// version rather than mutate the published one.
pub trait ListDataSource {
    type Row;
    type SectionHeader;

    /// Identity of this snapshot. Two values with the same version describe
    /// the same rows.
    fn version(&self) -> u64;

    fn section_count(&self) -> usize;

    fn section_id(&self, section_index: usize) -> Option<&ItemId>;

    /// Row ids of a section in display order. Empty for unknown sections.
    fn row_ids(&self, section_index: usize) -> &[ItemId];

    fn row_data(&self, section_index: usize, row_index: usize) -> Option<&Self::Row>;

    fn section_header_data(&self, section_index: usize) -> Option<&Self::SectionHeader>;

    /// Whether the row changed relative to the previous snapshot.
    fn row_should_update(&self, section_index: usize, row_index: usize) -> bool;

    /// Whether the section header changed relative to the previous snapshot.
    fn section_header_should_update(&self, section_index: usize) -> bool;

    /// Total number of rows across all sections.
    fn row_count(&self) -> usize {
        (0..self.section_count())
            .map(|section| self.row_ids(section).len())
            .sum()
    }

    /// Rows plus one slot per section header.
    fn row_and_section_count(&self) -> usize {
        self.row_count() + self.section_count()
    }

    fn section_lengths(&self) -> Vec<usize> {
        (0..self.section_count())
            .map(|section| self.row_ids(section).len())
            .collect()
    }

    /// Row id of the `index`-th row when all sections are flattened.
    fn row_id_for_flat_index(&self, index: usize) -> Option<&ItemId> {
        let mut remaining = index;
        for section in 0..self.section_count() {
            let rows = self.row_ids(section);
            if remaining < rows.len() {
                return rows.get(remaining);
            }
            remaining -= rows.len();
        }
        None
    }

    /// Section id owning the `index`-th row when all sections are flattened.
    fn section_id_for_flat_index(&self, index: usize) -> Option<&ItemId> {
        let mut remaining = index;
        for section in 0..self.section_count() {
            let len = self.row_ids(section).len();
            if remaining < len {
                return self.section_id(section);
            }
            remaining -= len;
        }
        None
    }
}

/// Input description of one section for [`DataSource::clone_with_rows_and_sections`].
#[derive(Clone, Debug)]
pub struct Section<T, H = ()> {
    pub id: ItemId,
    pub header: Option<H>,
    pub rows: Vec<(ItemId, T)>,
}

impl<T, H> Section<T, H> {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            header: None,
            rows: Vec::new(),
        }
    }

    pub fn header(mut self, header: H) -> Self {
        self.header = Some(header);
        self
    }

    pub fn row(mut self, id: impl Into<ItemId>, data: T) -> Self {
        self.rows.push((id.into(), data));
        self
    }

    /// Appends rows identified by their position in `rows`, continuing the
    /// numbering of rows already in the section.
    pub fn indexed_rows(mut self, rows: impl IntoIterator<Item = T>) -> Self {
        let offset = self.rows.len();
        self.rows.extend(
            rows.into_iter()
                .enumerate()
                .map(|(index, data)| (ItemId::from(offset + index), data)),
        );
        self
    }
}

struct SectionSnapshot<T, H> {
    id: ItemId,
    header: Option<H>,
    row_ids: Vec<ItemId>,
    rows: Vec<T>,
    dirty_rows: Vec<bool>,
    header_dirty: bool,
}

struct Snapshot<T, H> {
    version: u64,
    sections: Vec<SectionSnapshot<T, H>>,
    row_count: usize,
}

/// Immutable, sectioned row snapshot.
///
/// A `DataSource` is created empty with [`DataSource::new`] and then
/// re-published with [`clone_with_rows`](Self::clone_with_rows) or
/// [`clone_with_rows_and_sections`](Self::clone_with_rows_and_sections).
/// Each clone diffs its rows against the snapshot it was cloned from using
/// the `row_has_changed` predicate, which is how the list decides which rows
/// need to be rendered again. Cloning the handle itself is cheap: the
/// snapshot is shared behind an `Rc`.
pub struct DataSource<T, H = ()> {
    snapshot: Rc<Snapshot<T, H>>,
    row_has_changed: Rc<dyn Fn(&T, &T) -> bool>,
    section_header_has_changed: Option<Rc<dyn Fn(&H, &H) -> bool>>,
}

impl<T, H> Clone for DataSource<T, H> {
    fn clone(&self) -> Self {
        Self {
            snapshot: Rc::clone(&self.snapshot),
            row_has_changed: Rc::clone(&self.row_has_changed),
            section_header_has_changed: self.section_header_has_changed.clone(),
        }
    }
}

impl<T, H> std::fmt::Debug for DataSource<T, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSource")
            .field("version", &self.snapshot.version)
            .field("sections", &self.snapshot.sections.len())
            .field("row_count", &self.snapshot.row_count)
            .finish_non_exhaustive()
    }
}

impl<T, H> DataSource<T, H> {
    /// Creates an empty data source.
    ///
    /// `row_has_changed(old, new)` decides whether a row that keeps its id
    /// across two snapshots must be rendered again.
    pub fn new(row_has_changed: impl Fn(&T, &T) -> bool + 'static) -> Self {
        Self {
            snapshot: Rc::new(Snapshot {
                version: next_data_source_version(),
                sections: Vec::new(),
                row_count: 0,
            }),
            row_has_changed: Rc::new(row_has_changed),
            section_header_has_changed: None,
        }
    }

    /// Sets the predicate used to diff section headers. Without it a header
    /// is only considered changed when its section is new or the header was
    /// added or removed.
    pub fn with_section_header_has_changed(
        mut self,
        section_header_has_changed: impl Fn(&H, &H) -> bool + 'static,
    ) -> Self {
        self.section_header_has_changed = Some(Rc::new(section_header_has_changed));
        self
    }

    /// Publishes a single-section snapshot whose row ids are the row indices.
    pub fn clone_with_rows(&self, rows: impl IntoIterator<Item = T>) -> Self {
        let section = Section::new(DEFAULT_SECTION_ID).indexed_rows(rows);
        self.clone_with_rows_and_sections(std::iter::once(section))
    }

    /// Publishes a new snapshot made of `sections`, diffed against `self`.
    ///
    /// Duplicate section ids, and duplicate row ids within a section, keep
    /// their first occurrence.
    pub fn clone_with_rows_and_sections(
        &self,
        sections: impl IntoIterator<Item = Section<T, H>>,
    ) -> Self {
        let previous = &self.snapshot;
        let previous_sections: HashMap<&ItemId, usize> = previous
            .sections
            .iter()
            .enumerate()
            .map(|(index, section)| (&section.id, index))
            .collect();

        let mut seen_sections: HashSet<ItemId> = HashSet::default();
        let mut snapshots = Vec::new();
        let mut row_count = 0;

        for section in sections {
            if !seen_sections.insert(section.id.clone()) {
                log::warn!("duplicate section id `{}` dropped from data source", section.id);
                continue;
            }

            let previous_section = previous_sections
                .get(&section.id)
                .map(|&index| &previous.sections[index]);

            let header_dirty = match previous_section {
                None => true,
                Some(prev) => match (&prev.header, &section.header) {
                    (Some(old), Some(new)) => self
                        .section_header_has_changed
                        .as_ref()
                        .is_some_and(|changed| changed(old, new)),
                    (None, None) => false,
                    _ => true,
                },
            };

            let previous_rows: HashMap<&ItemId, usize> = previous_section
                .map(|prev| {
                    prev.row_ids
                        .iter()
                        .enumerate()
                        .map(|(index, id)| (id, index))
                        .collect()
                })
                .unwrap_or_default();

            let mut seen_rows: HashSet<ItemId> = HashSet::default();
            let mut row_ids = Vec::with_capacity(section.rows.len());
            let mut rows = Vec::with_capacity(section.rows.len());
            let mut dirty_rows = Vec::with_capacity(section.rows.len());

            for (row_id, data) in section.rows {
                if !seen_rows.insert(row_id.clone()) {
                    log::warn!(
                        "duplicate row id `{}` in section `{}` dropped from data source",
                        row_id,
                        section.id
                    );
                    continue;
                }
                let dirty = match (previous_section, previous_rows.get(&row_id)) {
                    (Some(prev), Some(&index)) => (self.row_has_changed)(&prev.rows[index], &data),
                    _ => true,
                };
                row_ids.push(row_id);
                rows.push(data);
                dirty_rows.push(dirty);
            }

            row_count += row_ids.len();
            snapshots.push(SectionSnapshot {
                id: section.id,
                header: section.header,
                row_ids,
                rows,
                dirty_rows,
                header_dirty,
            });
        }

        Self {
            snapshot: Rc::new(Snapshot {
                version: next_data_source_version(),
                sections: snapshots,
                row_count,
            }),
            row_has_changed: Rc::clone(&self.row_has_changed),
            section_header_has_changed: self.section_header_has_changed.clone(),
        }
    }

    /// Index of the section with the given id.
    pub fn section_index(&self, section_id: &ItemId) -> Option<usize> {
        self.snapshot
            .sections
            .iter()
            .position(|section| &section.id == section_id)
    }

    /// Looks a row up by its full key.
    pub fn row_by_key(&self, key: &RowKey) -> Option<&T> {
        let section = &self.snapshot.sections[self.section_index(&key.section_id)?];
        let row_index = section.row_ids.iter().position(|id| id == &key.row_id)?;
        section.rows.get(row_index)
    }

    /// True when both handles share the same published snapshot.
    pub fn is_same_snapshot(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.snapshot, &other.snapshot)
    }
}

impl<T, H> ListDataSource for DataSource<T, H> {
    type Row = T;
    type SectionHeader = H;

    fn version(&self) -> u64 {
        self.snapshot.version
    }

    fn section_count(&self) -> usize {
        self.snapshot.sections.len()
    }

    fn section_id(&self, section_index: usize) -> Option<&ItemId> {
        self.snapshot
            .sections
            .get(section_index)
            .map(|section| &section.id)
    }

    fn row_ids(&self, section_index: usize) -> &[ItemId] {
        self.snapshot
            .sections
            .get(section_index)
            .map(|section| section.row_ids.as_slice())
            .unwrap_or(&[])
    }

    fn row_data(&self, section_index: usize, row_index: usize) -> Option<&T> {
        self.snapshot.sections.get(section_index)?.rows.get(row_index)
    }

    fn section_header_data(&self, section_index: usize) -> Option<&H> {
        self.snapshot.sections.get(section_index)?.header.as_ref()
    }

    fn row_should_update(&self, section_index: usize, row_index: usize) -> bool {
        self.snapshot
            .sections
            .get(section_index)
            .and_then(|section| section.dirty_rows.get(row_index))
            .copied()
            .unwrap_or(false)
    }

    fn section_header_should_update(&self, section_index: usize) -> bool {
        self.snapshot
            .sections
            .get(section_index)
            .is_some_and(|section| section.header_dirty)
    }

    fn row_count(&self) -> usize {
        self.snapshot.row_count
    }
}
