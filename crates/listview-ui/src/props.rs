//! Caller-facing configuration of a list view.

use std::fmt;

use listview_core::{ItemId, ListDataSource, SchedulingTick};
use listview_foundation::lazy::{
    ChangedRows, RenderSchedulerConfig, VisibleRows, DEFAULT_END_REACHED_THRESHOLD,
    DEFAULT_INITIAL_LIST_SIZE, DEFAULT_PAGE_SIZE, DEFAULT_SCROLL_RENDER_AHEAD_DISTANCE,
};
use listview_foundation::scroll::{Orientation, ScrollGeometry};
use web_time::Duration;

use crate::entries::HighlightRow;
use crate::error::ListViewError;
use crate::surface::{ScrollSurfaceConfig, DEFAULT_SCROLL_EVENT_THROTTLE};

/// `render_row(row, section_id, row_id, highlight)`.
pub type RenderRowFn<R, V> = Box<dyn FnMut(&R, &ItemId, &ItemId, &HighlightRow) -> V>;

/// `render_separator(section_id, row_id, adjacent_row_highlighted)`.
pub type RenderSeparatorFn<V> = Box<dyn FnMut(&ItemId, &ItemId, bool) -> V>;

/// `render_section_header(header, section_id)`.
pub type RenderSectionHeaderFn<H, V> = Box<dyn FnMut(Option<&H>, &ItemId) -> V>;

pub type RenderChromeFn<V> = Box<dyn FnMut() -> V>;

/// Receives the geometry that triggered the notification, if any.
pub type OnEndReachedFn = Box<dyn FnMut(Option<ScrollGeometry>)>;

/// `on_change_visible_rows(visible_rows, changed_rows)`.
pub type OnChangeVisibleRowsFn = Box<dyn FnMut(&VisibleRows, &ChangedRows)>;

/// Validated props of a [`ListView`](crate::ListView).
pub struct ListViewProps<D: ListDataSource, V> {
    pub(crate) data_source: D,
    pub(crate) render_row: RenderRowFn<D::Row, V>,
    pub(crate) render_header: Option<RenderChromeFn<V>>,
    pub(crate) render_footer: Option<RenderChromeFn<V>>,
    pub(crate) render_section_header: Option<RenderSectionHeaderFn<D::SectionHeader, V>>,
    pub(crate) render_separator: Option<RenderSeparatorFn<V>>,
    pub(crate) on_end_reached: Option<OnEndReachedFn>,
    pub(crate) on_change_visible_rows: Option<OnChangeVisibleRowsFn>,
    pub(crate) scheduler: RenderSchedulerConfig,
    pub(crate) surface: ScrollSurfaceConfig,
    pub(crate) scheduling_tick: SchedulingTick,
}

impl<D: ListDataSource, V> ListViewProps<D, V> {
    pub fn builder(data_source: D) -> ListViewPropsBuilder<D, V> {
        ListViewPropsBuilder::new(data_source)
    }

    pub fn data_source(&self) -> &D {
        &self.data_source
    }

    pub fn scheduler_config(&self) -> &RenderSchedulerConfig {
        &self.scheduler
    }

    pub fn surface_config(&self) -> &ScrollSurfaceConfig {
        &self.surface
    }

    pub fn scheduling_tick(&self) -> SchedulingTick {
        self.scheduling_tick
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_horizontal(self.surface.horizontal)
    }
}

impl<D: ListDataSource, V> fmt::Debug for ListViewProps<D, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListViewProps")
            .field("version", &self.data_source.version())
            .field("scheduler", &self.scheduler)
            .field("surface", &self.surface)
            .field("scheduling_tick", &self.scheduling_tick)
            .field("render_header", &self.render_header.is_some())
            .field("render_footer", &self.render_footer.is_some())
            .field("render_section_header", &self.render_section_header.is_some())
            .field("render_separator", &self.render_separator.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ListViewProps`].
///
/// Defaults: 10 initial rows, pages of 1 row, 1000 px render-ahead and
/// end-reached distances, 50 ms scroll event throttle, clipped subview
/// removal on, vertical axis, animation-frame scheduling.
pub struct ListViewPropsBuilder<D: ListDataSource, V> {
    data_source: D,
    render_row: Option<RenderRowFn<D::Row, V>>,
    render_header: Option<RenderChromeFn<V>>,
    render_footer: Option<RenderChromeFn<V>>,
    render_section_header: Option<RenderSectionHeaderFn<D::SectionHeader, V>>,
    render_separator: Option<RenderSeparatorFn<V>>,
    on_end_reached: Option<OnEndReachedFn>,
    on_change_visible_rows: Option<OnChangeVisibleRowsFn>,
    initial_list_size: usize,
    page_size: usize,
    scroll_render_ahead_distance: f32,
    on_end_reached_threshold: f32,
    remove_clipped_subviews: bool,
    sticky_header_indices: Vec<usize>,
    scroll_event_throttle: Duration,
    horizontal: bool,
    scheduling_tick: SchedulingTick,
}

impl<D: ListDataSource, V> ListViewPropsBuilder<D, V> {
    pub fn new(data_source: D) -> Self {
        Self {
            data_source,
            render_row: None,
            render_header: None,
            render_footer: None,
            render_section_header: None,
            render_separator: None,
            on_end_reached: None,
            on_change_visible_rows: None,
            initial_list_size: DEFAULT_INITIAL_LIST_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            scroll_render_ahead_distance: DEFAULT_SCROLL_RENDER_AHEAD_DISTANCE,
            on_end_reached_threshold: DEFAULT_END_REACHED_THRESHOLD,
            remove_clipped_subviews: true,
            sticky_header_indices: Vec::new(),
            scroll_event_throttle: DEFAULT_SCROLL_EVENT_THROTTLE,
            horizontal: false,
            scheduling_tick: SchedulingTick::default(),
        }
    }

    pub fn render_row(
        mut self,
        render_row: impl FnMut(&D::Row, &ItemId, &ItemId, &HighlightRow) -> V + 'static,
    ) -> Self {
        self.render_row = Some(Box::new(render_row));
        self
    }

    pub fn render_header(mut self, render_header: impl FnMut() -> V + 'static) -> Self {
        self.render_header = Some(Box::new(render_header));
        self
    }

    pub fn render_footer(mut self, render_footer: impl FnMut() -> V + 'static) -> Self {
        self.render_footer = Some(Box::new(render_footer));
        self
    }

    pub fn render_section_header(
        mut self,
        render_section_header: impl FnMut(Option<&D::SectionHeader>, &ItemId) -> V + 'static,
    ) -> Self {
        self.render_section_header = Some(Box::new(render_section_header));
        self
    }

    pub fn render_separator(
        mut self,
        render_separator: impl FnMut(&ItemId, &ItemId, bool) -> V + 'static,
    ) -> Self {
        self.render_separator = Some(Box::new(render_separator));
        self
    }

    pub fn on_end_reached(
        mut self,
        on_end_reached: impl FnMut(Option<ScrollGeometry>) + 'static,
    ) -> Self {
        self.on_end_reached = Some(Box::new(on_end_reached));
        self
    }

    pub fn on_change_visible_rows(
        mut self,
        on_change_visible_rows: impl FnMut(&VisibleRows, &ChangedRows) + 'static,
    ) -> Self {
        self.on_change_visible_rows = Some(Box::new(on_change_visible_rows));
        self
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

    pub fn remove_clipped_subviews(mut self, remove: bool) -> Self {
        self.remove_clipped_subviews = remove;
        self
    }

    pub fn sticky_header_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.sticky_header_indices = indices.into_iter().collect();
        self
    }

    pub fn scroll_event_throttle(mut self, throttle: Duration) -> Self {
        self.scroll_event_throttle = throttle;
        self
    }

    pub fn horizontal(mut self, horizontal: bool) -> Self {
        self.horizontal = horizontal;
        self
    }

    pub fn scheduling_tick(mut self, tick: SchedulingTick) -> Self {
        self.scheduling_tick = tick;
        self
    }

    /// Validates the configuration.
    pub fn build(self) -> Result<ListViewProps<D, V>, ListViewError> {
        let render_row = self.render_row.ok_or(ListViewError::MissingRenderRow)?;
        if self.page_size == 0 {
            return Err(ListViewError::ZeroPageSize);
        }
        check_distance("scroll_render_ahead_distance", self.scroll_render_ahead_distance)?;
        check_distance("on_end_reached_threshold", self.on_end_reached_threshold)?;

        Ok(ListViewProps {
            data_source: self.data_source,
            render_row,
            render_header: self.render_header,
            render_footer: self.render_footer,
            render_section_header: self.render_section_header,
            render_separator: self.render_separator,
            on_end_reached: self.on_end_reached,
            on_change_visible_rows: self.on_change_visible_rows,
            scheduler: RenderSchedulerConfig::new()
                .initial_list_size(self.initial_list_size)
                .page_size(self.page_size)
                .scroll_render_ahead_distance(self.scroll_render_ahead_distance)
                .on_end_reached_threshold(self.on_end_reached_threshold),
            surface: ScrollSurfaceConfig {
                horizontal: self.horizontal,
                scroll_event_throttle: self.scroll_event_throttle,
                remove_clipped_subviews: self.remove_clipped_subviews,
                sticky_header_indices: self.sticky_header_indices,
            },
            scheduling_tick: self.scheduling_tick,
        })
    }
}

fn check_distance(name: &'static str, value: f32) -> Result<(), ListViewError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ListViewError::InvalidThreshold { name, value })
    }
}
