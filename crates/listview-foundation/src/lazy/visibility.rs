//! Visible-row tracking.

use listview_core::collections::map::{HashMap, HashSet};
use listview_core::collections::OrderedMap;
use listview_core::{ItemId, PixelRange, RowKey};

/// `section_id -> (row_id -> visible)`, in render order.
///
/// The current state only ever stores `true` entries.
pub type VisibleRows = OrderedMap<ItemId, OrderedMap<ItemId, bool>>;

/// Same shape as [`VisibleRows`]; `true` means the row entered the viewport,
/// `false` that it left.
pub type ChangedRows = OrderedMap<ItemId, OrderedMap<ItemId, bool>>;

/// Intersects rendered row layouts with the viewport and reports deltas.
#[derive(Clone, Debug, Default)]
pub struct VisibleRowTracker {
    visible: VisibleRows,
    visible_count: usize,
}

impl VisibleRowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes visibility for `rendered_rows` against `viewport`.
    ///
    /// A row is visible when its entry in `layouts` shares at least one pixel
    /// with the viewport. Rows that were visible and are no longer rendered
    /// leave the viewport. An invalid viewport leaves the state untouched and
    /// reports no change.
    pub fn update_visibility<'a, I>(
        &mut self,
        rendered_rows: I,
        viewport: PixelRange,
        layouts: &HashMap<RowKey, PixelRange>,
    ) -> (&VisibleRows, ChangedRows)
    where
        I: IntoIterator<Item = &'a RowKey>,
    {
        let mut changed = ChangedRows::new();
        if !viewport.is_valid() {
            log::trace!("skipping visibility update for invalid viewport {viewport:?}");
            return (&self.visible, changed);
        }

        let mut next = VisibleRows::new();
        let mut next_count = 0;
        for key in rendered_rows {
            let visible = layouts
                .get(key)
                .is_some_and(|layout| layout.is_valid() && layout.overlaps(&viewport));
            let was_visible = self.is_visible(key);
            if visible {
                next.entry(key.section_id.clone())
                    .or_default()
                    .insert(key.row_id.clone(), true);
                next_count += 1;
            }
            if visible != was_visible {
                record(&mut changed, key, visible);
            }
        }

        // Rows that dropped out of the rendered extent.
        for (section_id, rows) in &self.visible {
            for row_id in rows.keys() {
                let still_listed = next
                    .get(section_id)
                    .is_some_and(|rows| rows.contains_key(row_id));
                let already_reported = changed
                    .get(section_id)
                    .is_some_and(|rows| rows.contains_key(row_id));
                if !still_listed && !already_reported {
                    changed
                        .entry(section_id.clone())
                        .or_default()
                        .insert(row_id.clone(), false);
                }
            }
        }

        self.visible = next;
        self.visible_count = next_count;
        (&self.visible, changed)
    }

    /// Drops visible rows missing from `rendered_rows` without measuring
    /// anything. Used when no viewport is known yet.
    pub fn retain_rendered<'a, I>(&mut self, rendered_rows: I) -> ChangedRows
    where
        I: IntoIterator<Item = &'a RowKey>,
    {
        let mut changed = ChangedRows::new();
        if self.visible_count == 0 {
            return changed;
        }
        let rendered: HashSet<&RowKey> = rendered_rows.into_iter().collect();
        let mut dropped = 0;
        for (section_id, rows) in self.visible.iter_mut() {
            rows.retain(|row_id, _| {
                let key = RowKey::new(section_id.clone(), row_id.clone());
                if rendered.contains(&key) {
                    return true;
                }
                changed
                    .entry(section_id.clone())
                    .or_default()
                    .insert(row_id.clone(), false);
                dropped += 1;
                false
            });
        }
        self.visible.retain(|_, rows| !rows.is_empty());
        self.visible_count -= dropped;
        changed
    }

    pub fn visible_rows(&self) -> &VisibleRows {
        &self.visible
    }

    pub fn visible_row_count(&self) -> usize {
        self.visible_count
    }

    pub fn is_visible(&self, key: &RowKey) -> bool {
        self.visible
            .get(&key.section_id)
            .and_then(|rows| rows.get(&key.row_id))
            .copied()
            .unwrap_or(false)
    }

    /// Forgets all visibility state without reporting it.
    pub fn clear(&mut self) {
        self.visible.clear();
        self.visible_count = 0;
    }
}

fn record(changed: &mut ChangedRows, key: &RowKey, visible: bool) {
    changed
        .entry(key.section_id.clone())
        .or_default()
        .insert(key.row_id.clone(), visible);
}
