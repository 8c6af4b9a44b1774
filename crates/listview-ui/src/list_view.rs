//! The list view component shell.

use listview_core::collections::map::{HashMap, HashSet};
use listview_core::{Due, ItemId, ListDataSource, PixelRange, RowKey, TimerSet};
use listview_foundation::lazy::{
    ChangedRows, DataSourceUpdate, IncrementalRender, IncrementalRenderScheduler,
    VisibleRowTracker, VisibleRows,
};
use listview_foundation::scroll::{
    ChildFrame, ContentSizeEvent, LayoutEvent, ScrollEvent, ScrollEventAdapter, ScrollGeometry,
};
use web_time::Instant;

use crate::entries::{
    footer_key, header_key, row_entry_key, section_header_key, separator_key, EntryKind,
    HighlightRow, RenderEntry, RenderPass,
};
use crate::props::ListViewProps;
use crate::surface::{NativeProps, NodeHandle, ScrollResponder, ScrollSurface, ScrollSurfaceConfig};

/// Work parked until a later frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Continuation {
    /// Ends the growth pass started by a page-in and re-checks the geometry.
    GrowthPass,
    /// Re-measures after mount or a data source change.
    MeasureScrollProps,
}

/// Rendered extent and highlight as seen by the next render pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderState {
    pub rendered_rows: usize,
    pub highlighted_row: Option<RowKey>,
}

/// Diagnostics snapshot returned by [`ListView::get_metrics`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListViewMetrics {
    /// Last content length reported by the host, zero before the first one.
    pub content_length: f32,
    pub total_rows: usize,
    pub rendered_rows: usize,
    pub visible_row_count: usize,
}

/// Scrolling list that renders its data source incrementally.
///
/// The host owns the frame loop. It forwards scroll, layout and content-size
/// events, calls [`on_frame`](Self::on_frame) once per frame and runs
/// [`render`](Self::render) whenever `on_frame` reports that the rendered
/// children changed.
///
/// ```rust,ignore
/// let mut list = ListView::new(props, surface);
/// loop {
///     list.on_scroll(next_scroll_event());
///     if list.on_frame(Instant::now()) {
///         host.commit(list.render());
///     }
/// }
/// ```
pub struct ListView<D: ListDataSource, V, S: ScrollSurface> {
    props: ListViewProps<D, V>,
    surface: S,
    scheduler: IncrementalRenderScheduler,
    tracker: VisibleRowTracker,
    adapter: ScrollEventAdapter,
    timers: TimerSet<Continuation>,
    highlight: HighlightRow,
    /// Row key of every child of the last render pass; `None` for chrome
    /// and separators.
    child_rows: Vec<Option<RowKey>>,
    row_layouts: HashMap<RowKey, PixelRange>,
    applied_config: ScrollSurfaceConfig,
    prev_rendered_rows: usize,
    version_dirty: bool,
    needs_render: bool,
    last_frame: Option<Instant>,
    mounted: bool,
}

impl<D: ListDataSource, V, S: ScrollSurface> ListView<D, V, S> {
    /// Mounts the list on `surface`.
    pub fn new(props: ListViewProps<D, V>, mut surface: S) -> Self {
        let mut scheduler = IncrementalRenderScheduler::new(props.scheduler.clone());
        scheduler.initialize(&props.data_source);

        let applied_config = props.surface.clone();
        surface.apply_config(&applied_config);

        let mut timers = TimerSet::new();
        timers.schedule(Due::NextFrame, Continuation::MeasureScrollProps);

        Self {
            adapter: ScrollEventAdapter::new(props.orientation()),
            props,
            surface,
            scheduler,
            tracker: VisibleRowTracker::new(),
            timers,
            highlight: HighlightRow::new(),
            child_rows: Vec::new(),
            row_layouts: HashMap::default(),
            applied_config,
            prev_rendered_rows: 0,
            version_dirty: false,
            needs_render: true,
            last_frame: None,
            mounted: true,
        }
    }

    /// Produces the ordered children for the current rendered extent.
    pub fn render(&mut self) -> RenderPass<V> {
        // The pass draws the highlight it started with; changes made by
        // `render_row` mark the next pass.
        let highlighted = self.highlight.current();
        self.highlight.take_changed();

        let ListViewProps {
            data_source,
            render_row,
            render_header,
            render_footer,
            render_section_header,
            render_separator,
            surface: base_config,
            ..
        } = &mut self.props;

        let rendered_rows = self.scheduler.rendered_rows();
        let prev_rendered_rows = self.prev_rendered_rows;
        let version_dirty = self.version_dirty;

        let mut entries = Vec::with_capacity(rendered_rows * 2 + 2);
        let mut sticky_header_indices = base_config.sticky_header_indices.clone();

        if let Some(render_header) = render_header.as_mut() {
            entries.push(RenderEntry {
                kind: EntryKind::Header,
                key: header_key(),
                row_key: None,
                should_update: true,
                content: render_header(),
            });
        }

        let section_count = data_source.section_count();
        let last_filled_section = (0..section_count)
            .rev()
            .find(|&section| !data_source.row_ids(section).is_empty());

        let mut row_index = 0;
        for section in 0..section_count {
            if row_index >= rendered_rows {
                break;
            }
            let row_ids = data_source.row_ids(section);
            if row_ids.is_empty() {
                continue;
            }
            let Some(section_id) = data_source.section_id(section) else {
                log::warn!("section {section} has rows but no id, skipped");
                continue;
            };

            if let Some(render_section_header) = render_section_header.as_mut() {
                sticky_header_indices.push(entries.len());
                let should_update = row_index >= prev_rendered_rows
                    || (version_dirty && data_source.section_header_should_update(section));
                entries.push(RenderEntry {
                    kind: EntryKind::SectionHeader,
                    key: section_header_key(section_id),
                    row_key: None,
                    should_update,
                    content: render_section_header(
                        data_source.section_header_data(section),
                        section_id,
                    ),
                });
            }

            let is_last_section = Some(section) == last_filled_section;
            for (row, row_id) in row_ids.iter().enumerate() {
                if row_index >= rendered_rows {
                    break;
                }
                let Some(row_data) = data_source.row_data(section, row) else {
                    log::warn!("row `{row_id}` of section `{section_id}` has no data, skipped");
                    continue;
                };
                let key = RowKey::new(section_id.clone(), row_id.clone());
                let should_update = row_index >= prev_rendered_rows
                    || (version_dirty && data_source.row_should_update(section, row));
                entries.push(RenderEntry {
                    kind: EntryKind::Row,
                    key: row_entry_key(&key),
                    row_key: Some(key.clone()),
                    should_update,
                    content: render_row(row_data, section_id, row_id, &self.highlight),
                });

                let is_last_row = row + 1 == row_ids.len();
                if let Some(render_separator) = render_separator.as_mut() {
                    if !is_last_row || is_last_section {
                        let adjacent_row_highlighted = adjacent_to_highlight(
                            highlighted.as_ref(),
                            section_id,
                            row_id,
                            row_ids.get(row + 1),
                        );
                        entries.push(RenderEntry {
                            kind: EntryKind::Separator,
                            key: separator_key(&key),
                            row_key: Some(key),
                            should_update: true,
                            content: render_separator(section_id, row_id, adjacent_row_highlighted),
                        });
                    }
                }
                row_index += 1;
            }
        }

        if let Some(render_footer) = render_footer.as_mut() {
            entries.push(RenderEntry {
                kind: EntryKind::Footer,
                key: footer_key(),
                row_key: None,
                should_update: true,
                content: render_footer(),
            });
        }

        let total_rows = data_source.row_count();
        let config = ScrollSurfaceConfig {
            sticky_header_indices: sticky_header_indices.clone(),
            ..base_config.clone()
        };

        self.child_rows = entries
            .iter()
            .map(|entry| if entry.is_row() { entry.row_key.clone() } else { None })
            .collect();
        let live: HashSet<&RowKey> = self.child_rows.iter().flatten().collect();
        self.row_layouts.retain(|key, _| live.contains(key));

        if config != self.applied_config {
            log::debug!(
                "surface config changed, sticky headers {:?}",
                config.sticky_header_indices
            );
            self.surface.apply_config(&config);
            self.applied_config = config;
        }

        self.prev_rendered_rows = rendered_rows;
        self.version_dirty = false;
        self.needs_render = false;
        self.refresh_visible_rows();
        log::trace!(
            "render pass: {} entries, {rendered_rows}/{total_rows} rows, {} left to page in",
            entries.len(),
            self.scheduler.remaining_rows()
        );

        RenderPass {
            entries,
            sticky_header_indices,
            rendered_rows,
            total_rows,
        }
    }

    /// Runs one scheduling tick. Returns true when [`render`](Self::render)
    /// must run before the frame is presented.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        if !self.mounted {
            return false;
        }
        self.last_frame = Some(now);

        let due = self.timers.take_due(now);

        if let Some(output) = self.adapter.take_pending() {
            self.apply_child_frames(&output.child_frames);
            if let Some(geometry) = output.geometry {
                self.update_visible_rows(geometry);
                if !self.maybe_call_on_end_reached(geometry) {
                    self.render_more_rows_if_needed(geometry);
                }
            }
        }

        for continuation in due {
            match continuation {
                Continuation::GrowthPass => {
                    self.scheduler.complete_pending_pass();
                    self.measure_and_update_scroll_props();
                }
                Continuation::MeasureScrollProps => self.measure_and_update_scroll_props(),
            }
        }

        if self.highlight.take_changed() {
            self.needs_render = true;
        }
        self.needs_render
    }

    pub fn on_scroll(&mut self, event: ScrollEvent) {
        if self.mounted {
            self.adapter.push_scroll(event);
        }
    }

    pub fn on_layout(&mut self, event: LayoutEvent) {
        if self.mounted {
            self.adapter.push_layout(event);
        }
    }

    pub fn on_content_size_change(&mut self, event: ContentSizeEvent) {
        if self.mounted {
            self.adapter.push_content_size(event);
        }
    }

    /// Measurements of rendered children, indexed like the last render pass.
    pub fn on_child_layout(&mut self, frames: impl IntoIterator<Item = ChildFrame>) {
        if self.mounted {
            self.adapter.push_child_frames(frames);
        }
    }

    /// Replaces the data source, keeping as much of the rendered extent as
    /// the new snapshot allows.
    pub fn set_data_source(&mut self, data_source: D) -> DataSourceUpdate {
        let update = self.scheduler.on_data_source_changed(&data_source);
        self.props.data_source = data_source;
        if !self.mounted || !update.version_changed {
            return update;
        }

        self.version_dirty = true;
        self.needs_render = true;
        let due = self.props.scheduling_tick.due_from(self.now());
        self.timers.schedule(due, Continuation::MeasureScrollProps);
        log::debug!(
            "data source replaced: {} -> {} rendered rows of {}",
            update.previous_rendered_rows,
            update.rendered_rows,
            update.total_rows
        );
        update
    }

    /// Pages in more rows unless a growth pass is already pending.
    pub fn request_incremental_render(&mut self) -> IncrementalRender {
        if !self.mounted {
            return IncrementalRender::NotNeeded;
        }
        let result = self.scheduler.request_incremental_render();
        if result.grew() {
            self.schedule_growth_pass();
        }
        result
    }

    /// Scrolls the surface to `(x, y)`; arguments follow the `(y, x)` order
    /// of the list's public contract.
    pub fn scroll_to(&mut self, y: f32, x: f32) {
        self.surface
            .scroll_responder()
            .scroll_responder_scroll_to(x, y, true);
    }

    pub fn get_scroll_responder(&mut self) -> &mut dyn ScrollResponder {
        self.surface.scroll_responder()
    }

    pub fn set_native_props(&mut self, props: NativeProps) {
        self.surface.set_native_props(props);
    }

    pub fn get_inner_view_node(&self) -> Option<NodeHandle> {
        self.surface.inner_view_node()
    }

    pub fn get_metrics(&self) -> ListViewMetrics {
        ListViewMetrics {
            content_length: self
                .adapter
                .geometry()
                .map(|geometry| geometry.content_length)
                .unwrap_or(0.0),
            total_rows: self.props.data_source.row_count(),
            rendered_rows: self.scheduler.rendered_rows(),
            visible_row_count: self.tracker.visible_row_count(),
        }
    }

    /// Tears the list down. Pending work is cancelled and later events are
    /// ignored.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.timers.cancel_all();
        self.needs_render = false;
        log::debug!("list unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Host events or continuations are waiting for a frame.
    pub fn has_pending_work(&self) -> bool {
        self.mounted && (!self.timers.is_empty() || self.adapter.has_pending())
    }

    /// Handle passed to `render_row`, usable from outside a render pass.
    pub fn highlight_handle(&self) -> HighlightRow {
        self.highlight.clone()
    }

    pub fn render_state(&self) -> RenderState {
        RenderState {
            rendered_rows: self.scheduler.rendered_rows(),
            highlighted_row: self.highlight.current(),
        }
    }

    pub fn visible_rows(&self) -> &VisibleRows {
        self.tracker.visible_rows()
    }

    pub fn scheduler(&self) -> &IncrementalRenderScheduler {
        &self.scheduler
    }

    pub fn props(&self) -> &ListViewProps<D, V> {
        &self.props
    }

    pub fn data_source(&self) -> &D {
        &self.props.data_source
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn now(&self) -> Instant {
        self.last_frame.unwrap_or_else(Instant::now)
    }

    fn schedule_growth_pass(&mut self) {
        self.needs_render = true;
        let due = self.props.scheduling_tick.due_from(self.now());
        self.timers.schedule(due, Continuation::GrowthPass);
    }

    fn measure_and_update_scroll_props(&mut self) {
        let Some(geometry) = self.adapter.geometry() else {
            return;
        };
        self.update_visible_rows(geometry);
        if !self.maybe_call_on_end_reached(geometry) {
            self.render_more_rows_if_needed(geometry);
        }
    }

    fn apply_child_frames(&mut self, frames: &[ChildFrame]) {
        let orientation = self.adapter.orientation();
        for frame in frames {
            match self.child_rows.get(frame.index) {
                Some(Some(key)) => {
                    self.row_layouts
                        .insert(key.clone(), orientation.range_of(frame.frame));
                }
                Some(None) => {}
                None => log::trace!("frame for unknown child {}", frame.index),
            }
        }
    }

    /// Re-checks visibility against the children of the last render pass so
    /// rows that are no longer rendered stop counting as visible.
    fn refresh_visible_rows(&mut self) {
        match self.adapter.geometry() {
            Some(geometry) => self.update_visible_rows(geometry),
            None => {
                let changed = self.tracker.retain_rendered(self.child_rows.iter().flatten());
                self.notify_visible_rows(changed);
            }
        }
    }

    fn update_visible_rows(&mut self, geometry: ScrollGeometry) {
        let rendered = self.child_rows.iter().flatten();
        let (_, changed) =
            self.tracker
                .update_visibility(rendered, geometry.viewport(), &self.row_layouts);
        self.notify_visible_rows(changed);
    }

    fn notify_visible_rows(&mut self, changed: ChangedRows) {
        if changed.is_empty() {
            return;
        }
        log::trace!("visible rows changed: {changed:?}");
        if let Some(on_change_visible_rows) = self.props.on_change_visible_rows.as_mut() {
            on_change_visible_rows(self.tracker.visible_rows(), &changed);
        }
    }

    /// Fires `on_end_reached` once every row is rendered and the viewport is
    /// within the threshold of the end.
    fn maybe_call_on_end_reached(&mut self, geometry: ScrollGeometry) -> bool {
        let Some(on_end_reached) = self.props.on_end_reached.as_mut() else {
            return false;
        };
        if !self.scheduler.is_fully_rendered() {
            return false;
        }
        let fired = self
            .scheduler
            .on_scroll_near_content_end(geometry.distance_from_end(), geometry.content_length);
        if fired {
            on_end_reached(Some(geometry));
        }
        fired
    }

    fn render_more_rows_if_needed(&mut self, geometry: ScrollGeometry) {
        // Empty content still pages in; a collapsed viewport does not.
        if geometry.visible_length <= 0.0 {
            return;
        }
        if self
            .scheduler
            .on_scroll_range_near_end(geometry.distance_from_end())
            .grew()
        {
            self.schedule_growth_pass();
        }
    }
}

fn adjacent_to_highlight(
    highlighted: Option<&RowKey>,
    section_id: &ItemId,
    row_id: &ItemId,
    next_row_id: Option<&ItemId>,
) -> bool {
    let Some(highlighted) = highlighted else {
        return false;
    };
    highlighted.section_id == *section_id
        && (highlighted.row_id == *row_id || Some(&highlighted.row_id) == next_row_id)
}

impl<D: ListDataSource, V, S: ScrollSurface> Drop for ListView<D, V, S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
