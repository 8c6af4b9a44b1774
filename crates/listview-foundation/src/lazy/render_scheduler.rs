//! Incremental render scheduler.
//!
//! Provides [`IncrementalRenderScheduler`], which owns the number of leading
//! rows that are materialized and grows it a page at a time.

use listview_core::ListDataSource;

use super::end_reached::{EndReachedLatch, DEFAULT_END_REACHED_THRESHOLD};

/// Rows rendered on mount. Enough for a first screen on a phone.
pub const DEFAULT_INITIAL_LIST_SIZE: usize = 10;

/// Rows added per growth pass.
pub const DEFAULT_PAGE_SIZE: usize = 1;

/// How far ahead of the viewport rows are rendered, in pixels.
pub const DEFAULT_SCROLL_RENDER_AHEAD_DISTANCE: f32 = 1000.0;

/// Paging configuration for the scheduler.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSchedulerConfig {
    /// Rows rendered on mount, so the first screen appears in one pass.
    pub initial_list_size: usize,

    /// Rows added per growth pass.
    pub page_size: usize,

    /// Distance from the end of rendered content, in pixels, below which
    /// another page is rendered.
    pub scroll_render_ahead_distance: f32,

    /// Distance from the end of all content, in pixels, at which the
    /// end-reached notification fires.
    pub on_end_reached_threshold: f32,
}

impl Default for RenderSchedulerConfig {
    fn default() -> Self {
        Self {
            initial_list_size: DEFAULT_INITIAL_LIST_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            scroll_render_ahead_distance: DEFAULT_SCROLL_RENDER_AHEAD_DISTANCE,
            on_end_reached_threshold: DEFAULT_END_REACHED_THRESHOLD,
        }
    }
}

impl RenderSchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_list_size(mut self, rows: usize) -> Self {
        self.initial_list_size = rows;
        self
    }

    pub fn page_size(mut self, rows: usize) -> Self {
        self.page_size = rows;
        self
    }

    pub fn scroll_render_ahead_distance(mut self, pixels: f32) -> Self {
        self.scroll_render_ahead_distance = pixels;
        self
    }

    pub fn on_end_reached_threshold(mut self, pixels: f32) -> Self {
        self.on_end_reached_threshold = pixels;
        self
    }
}

/// Outcome of a growth request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncrementalRender {
    /// The rendered extent grew; a growth pass is now pending.
    Grew { from: usize, to: usize },
    /// A growth pass is already pending for this tick.
    Coalesced,
    /// Every row is already rendered.
    Exhausted,
    /// The viewport is not close enough to the rendered end.
    NotNeeded,
}

impl IncrementalRender {
    pub fn grew(&self) -> bool {
        matches!(self, IncrementalRender::Grew { .. })
    }
}

/// Result of handing the scheduler a new data source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataSourceUpdate {
    pub previous_rendered_rows: usize,
    pub rendered_rows: usize,
    pub total_rows: usize,
    /// False when the snapshot version did not change.
    pub version_changed: bool,
    /// Some row inside the rendered extent is stale and must be drawn again.
    pub needs_rerender: bool,
}

impl DataSourceUpdate {
    /// The new snapshot was smaller than the rendered extent.
    pub fn clamped(&self) -> bool {
        self.rendered_rows < self.previous_rendered_rows
    }
}

/// Decides how many leading rows (in section/row order) are materialized.
///
/// The count starts at `min(initial_list_size, total)`, grows by
/// `page_size` per growth pass and never exceeds the row total of the active
/// snapshot. Growth passes are coalesced: once a page was added, further
/// requests are no-ops until [`complete_pending_pass`] is called from the
/// next scheduling tick. That spreads the cost of a huge data source over
/// many frames instead of one.
///
/// [`complete_pending_pass`]: Self::complete_pending_pass
#[derive(Clone, Debug)]
pub struct IncrementalRenderScheduler {
    config: RenderSchedulerConfig,
    rendered_rows: usize,
    total_rows: usize,
    version: Option<u64>,
    pending_growth: bool,
    end_reached: EndReachedLatch,
}

impl IncrementalRenderScheduler {
    pub fn new(config: RenderSchedulerConfig) -> Self {
        let end_reached = EndReachedLatch::new(config.on_end_reached_threshold);
        Self {
            config,
            rendered_rows: 0,
            total_rows: 0,
            version: None,
            pending_growth: false,
            end_reached,
        }
    }

    pub fn config(&self) -> &RenderSchedulerConfig {
        &self.config
    }

    /// Sets up the rendered extent for a freshly mounted list.
    pub fn initialize<D>(&mut self, data_source: &D)
    where
        D: ListDataSource + ?Sized,
    {
        self.total_rows = data_source.row_count();
        self.rendered_rows = self.config.initial_list_size.min(self.total_rows);
        self.version = Some(data_source.version());
        self.pending_growth = false;
        self.end_reached.rearm();
        log::debug!(
            "list initialized: rendering {} of {} rows (version {})",
            self.rendered_rows,
            self.total_rows,
            data_source.version()
        );
    }

    /// Adopts a new snapshot.
    ///
    /// The rendered count becomes `min(max(rendered, initial_list_size),
    /// new_total)`: rows already on screen stay rendered unless the new
    /// snapshot no longer has them.
    pub fn on_data_source_changed<D>(&mut self, data_source: &D) -> DataSourceUpdate
    where
        D: ListDataSource + ?Sized,
    {
        let previous_rendered_rows = self.rendered_rows;
        let version = data_source.version();
        if self.version == Some(version) {
            return DataSourceUpdate {
                previous_rendered_rows,
                rendered_rows: self.rendered_rows,
                total_rows: self.total_rows,
                version_changed: false,
                needs_rerender: false,
            };
        }

        self.version = Some(version);
        self.total_rows = data_source.row_count();
        self.rendered_rows = self
            .rendered_rows
            .max(self.config.initial_list_size)
            .min(self.total_rows);

        let needs_rerender = has_stale_rows(data_source, self.rendered_rows);
        if self.rendered_rows < previous_rendered_rows {
            log::debug!(
                "data source shrank: rendered rows clamped {} -> {}",
                previous_rendered_rows,
                self.rendered_rows
            );
        }

        DataSourceUpdate {
            previous_rendered_rows,
            rendered_rows: self.rendered_rows,
            total_rows: self.total_rows,
            version_changed: true,
            needs_rerender,
        }
    }

    /// Renders one more page unless a growth pass is already pending.
    pub fn request_incremental_render(&mut self) -> IncrementalRender {
        if self.rendered_rows >= self.total_rows {
            return IncrementalRender::Exhausted;
        }
        if self.pending_growth {
            return IncrementalRender::Coalesced;
        }

        let from = self.rendered_rows;
        let to = from.saturating_add(self.config.page_size).min(self.total_rows);
        self.rendered_rows = to;
        self.pending_growth = true;
        // New rows lengthen the content; a later end-of-list crossing is new.
        self.end_reached.rearm();
        log::debug!("paging in rows {from}..{to} of {}", self.total_rows);
        IncrementalRender::Grew { from, to }
    }

    /// Clears the pending flag at the start of a new scheduling tick.
    /// Returns whether a pass was pending.
    pub fn complete_pending_pass(&mut self) -> bool {
        std::mem::replace(&mut self.pending_growth, false)
    }

    /// Requests another page when the unrendered tail is within
    /// `scroll_render_ahead_distance`.
    pub fn on_scroll_range_near_end(&mut self, distance_remaining: f32) -> IncrementalRender {
        if self.rendered_rows >= self.total_rows {
            return IncrementalRender::Exhausted;
        }
        // NaN compares false and falls through to NotNeeded.
        if distance_remaining <= self.config.scroll_render_ahead_distance {
            self.request_incremental_render()
        } else {
            IncrementalRender::NotNeeded
        }
    }

    /// Returns true exactly once per crossing of `on_end_reached_threshold`
    /// for a given content length.
    pub fn on_scroll_near_content_end(
        &mut self,
        distance_remaining: f32,
        content_length: f32,
    ) -> bool {
        let fire = self.end_reached.observe(distance_remaining, content_length);
        if fire {
            log::debug!(
                "end reached: {distance_remaining}px left of {content_length}px content"
            );
        }
        fire
    }

    pub fn rendered_rows(&self) -> usize {
        self.rendered_rows
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn remaining_rows(&self) -> usize {
        self.total_rows.saturating_sub(self.rendered_rows)
    }

    pub fn is_fully_rendered(&self) -> bool {
        self.rendered_rows >= self.total_rows
    }

    pub fn version(&self) -> Option<u64> {
        self.version
    }
}

fn has_stale_rows<D>(data_source: &D, rendered_rows: usize) -> bool
where
    D: ListDataSource + ?Sized,
{
    let mut seen = 0;
    for section in 0..data_source.section_count() {
        for row in 0..data_source.row_ids(section).len() {
            if seen >= rendered_rows {
                return false;
            }
            if data_source.row_should_update(section, row) {
                return true;
            }
            seen += 1;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use listview_core::DataSource;

    fn rows(count: u32) -> DataSource<u32> {
        DataSource::new(|a: &u32, b: &u32| a != b).clone_with_rows(0..count)
    }

    fn scheduler(initial: usize, page: usize) -> IncrementalRenderScheduler {
        IncrementalRenderScheduler::new(
            RenderSchedulerConfig::new()
                .initial_list_size(initial)
                .page_size(page),
        )
    }

    #[test]
    fn test_initialize_clamps_to_total() {
        for (initial, total, expected) in [(10, 100, 10), (10, 3, 3), (0, 5, 0), (7, 0, 0)] {
            let mut scheduler = scheduler(initial, 5);
            scheduler.initialize(&rows(total));
            assert_eq!(scheduler.rendered_rows(), expected);
        }
    }

    #[test]
    fn test_growth_scenario() {
        let mut scheduler = scheduler(10, 5);
        scheduler.initialize(&rows(100));
        assert_eq!(scheduler.rendered_rows(), 10);

        assert_eq!(
            scheduler.request_incremental_render(),
            IncrementalRender::Grew { from: 10, to: 15 }
        );
        assert_eq!(scheduler.rendered_rows(), 15);

        let mut passes = 0;
        loop {
            scheduler.complete_pending_pass();
            match scheduler.request_incremental_render() {
                IncrementalRender::Grew { .. } => passes += 1,
                IncrementalRender::Exhausted => break,
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(passes, 17);
        assert_eq!(scheduler.rendered_rows(), 100);
        assert!(scheduler.is_fully_rendered());
    }

    #[test]
    fn test_requests_within_one_tick_coalesce() {
        let mut scheduler = scheduler(10, 5);
        scheduler.initialize(&rows(100));

        assert!(scheduler.request_incremental_render().grew());
        for _ in 0..10 {
            assert_eq!(
                scheduler.request_incremental_render(),
                IncrementalRender::Coalesced
            );
        }
        assert_eq!(scheduler.rendered_rows(), 15);

        assert!(scheduler.complete_pending_pass());
        assert!(!scheduler.complete_pending_pass());
        assert!(scheduler.request_incremental_render().grew());
        assert_eq!(scheduler.rendered_rows(), 20);
    }

    #[test]
    fn test_last_page_is_clamped() {
        let mut scheduler = scheduler(10, 5);
        scheduler.initialize(&rows(12));
        assert_eq!(
            scheduler.request_incremental_render(),
            IncrementalRender::Grew { from: 10, to: 12 }
        );
    }

    #[test]
    fn test_data_source_shrink_clamps() {
        let mut scheduler = scheduler(10, 5);
        let first = rows(100);
        scheduler.initialize(&first);
        scheduler.request_incremental_render();
        scheduler.complete_pending_pass();
        scheduler.request_incremental_render();
        assert_eq!(scheduler.rendered_rows(), 20);

        let smaller = first.clone_with_rows(0..5);
        let update = scheduler.on_data_source_changed(&smaller);
        assert_eq!(update.rendered_rows, 5);
        assert_eq!(update.previous_rendered_rows, 20);
        assert!(update.clamped());
        assert_eq!(scheduler.rendered_rows(), 5);
        assert_eq!(scheduler.total_rows(), 5);
    }

    #[test]
    fn test_data_source_growth_keeps_rendered_rows() {
        let mut scheduler = scheduler(10, 5);
        let first = rows(12);
        scheduler.initialize(&first);
        scheduler.request_incremental_render();
        assert_eq!(scheduler.rendered_rows(), 12);

        let update = scheduler.on_data_source_changed(&first.clone_with_rows(0..50));
        assert_eq!(update.rendered_rows, 12);
        assert!(!update.clamped());
        assert!(!scheduler.is_fully_rendered());
    }

    #[test]
    fn test_same_version_is_a_no_op() {
        let mut scheduler = scheduler(10, 5);
        let ds = rows(30);
        scheduler.initialize(&ds);
        let update = scheduler.on_data_source_changed(&ds.clone());
        assert!(!update.version_changed);
        assert!(!update.needs_rerender);
        assert_eq!(update.rendered_rows, 10);
    }

    #[test]
    fn test_stale_rows_inside_extent_need_rerender() {
        let mut scheduler = scheduler(3, 1);
        let first = rows(10);
        scheduler.initialize(&first);

        let tail_changed: Vec<u32> = (0..9).chain(std::iter::once(99)).collect();
        let update = scheduler.on_data_source_changed(&first.clone_with_rows(tail_changed.clone()));
        assert!(!update.needs_rerender);
        assert_eq!(update.rendered_rows, 3);

        let second = first.clone_with_rows(tail_changed);
        let head_changed: Vec<u32> = std::iter::once(42).chain(1..9).chain(std::iter::once(99)).collect();
        let update = scheduler.on_data_source_changed(&second.clone_with_rows(head_changed));
        assert!(update.needs_rerender);
        assert_eq!(update.rendered_rows, 3);
    }

    #[test]
    fn test_scroll_range_near_end_respects_ahead_distance() {
        let mut scheduler = IncrementalRenderScheduler::new(
            RenderSchedulerConfig::new()
                .initial_list_size(10)
                .page_size(5)
                .scroll_render_ahead_distance(200.0),
        );
        scheduler.initialize(&rows(100));

        assert_eq!(
            scheduler.on_scroll_range_near_end(500.0),
            IncrementalRender::NotNeeded
        );
        assert_eq!(
            scheduler.on_scroll_range_near_end(f32::NAN),
            IncrementalRender::NotNeeded
        );
        assert!(scheduler.on_scroll_range_near_end(200.0).grew());
        assert_eq!(
            scheduler.on_scroll_range_near_end(10.0),
            IncrementalRender::Coalesced
        );
    }

    #[test]
    fn test_end_reached_rearms_after_page_in() {
        let mut scheduler = IncrementalRenderScheduler::new(
            RenderSchedulerConfig::new()
                .initial_list_size(1)
                .page_size(1)
                .on_end_reached_threshold(100.0),
        );
        scheduler.initialize(&rows(3));

        assert!(scheduler.on_scroll_near_content_end(10.0, 500.0));
        assert!(!scheduler.on_scroll_near_content_end(10.0, 500.0));
        scheduler.request_incremental_render();
        assert!(scheduler.on_scroll_near_content_end(10.0, 500.0));
    }
}
