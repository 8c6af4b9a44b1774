use listview_core::{ListDataSource, Point, Rect, Size};
use listview_foundation::lazy::DataSourceUpdate;
use listview_foundation::scroll::{ChildFrame, ContentSizeEvent, LayoutEvent, Orientation, ScrollEvent};
use listview_ui::{EntryKind, ListView, ListViewProps, RenderPass};

use crate::clock::VirtualClock;
use crate::surface::RecordingScrollSurface;

/// Frames [`ListViewTestRule::await_idle`] runs before giving up.
pub const MAX_SETTLE_FRAMES: usize = 100;

/// Layout where every child kind has a fixed extent along the scroll axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformLayout {
    pub viewport_length: f32,
    pub cross_length: f32,
    pub row_extent: f32,
    pub separator_extent: f32,
    /// Header, footer and section headers.
    pub chrome_extent: f32,
}

impl UniformLayout {
    pub fn new(viewport_length: f32, row_extent: f32) -> Self {
        Self {
            viewport_length,
            cross_length: 320.0,
            row_extent,
            separator_extent: 0.0,
            chrome_extent: row_extent,
        }
    }

    pub fn separator_extent(mut self, extent: f32) -> Self {
        self.separator_extent = extent;
        self
    }

    pub fn chrome_extent(mut self, extent: f32) -> Self {
        self.chrome_extent = extent;
        self
    }

    fn extent_of(&self, kind: EntryKind) -> f32 {
        match kind {
            EntryKind::Row => self.row_extent,
            EntryKind::Separator => self.separator_extent,
            EntryKind::Header | EntryKind::SectionHeader | EntryKind::Footer => {
                self.chrome_extent
            }
        }
    }
}

/// Drives a [`ListView`] frame by frame on a virtual clock.
///
/// With a [`UniformLayout`] the rule plays the host: after every render pass
/// it measures the children and reports their frames and the content size
/// back to the list.
pub struct ListViewTestRule<D: ListDataSource, V> {
    list: ListView<D, V, RecordingScrollSurface>,
    clock: VirtualClock,
    layout: Option<UniformLayout>,
    last_pass: Option<RenderPass<V>>,
    offset: f32,
    content_length: f32,
    frames: usize,
}

impl<D: ListDataSource, V> ListViewTestRule<D, V> {
    pub fn new(props: ListViewProps<D, V>) -> Self {
        Self::with_surface(props, RecordingScrollSurface::new())
    }

    pub fn with_surface(props: ListViewProps<D, V>, surface: RecordingScrollSurface) -> Self {
        Self {
            list: ListView::new(props, surface),
            clock: VirtualClock::new(),
            layout: None,
            last_pass: None,
            offset: 0.0,
            content_length: 0.0,
            frames: 0,
        }
    }

    /// Lays children out uniformly and reports the viewport.
    pub fn with_uniform_layout(mut self, layout: UniformLayout) -> Self {
        self.layout = Some(layout);
        self.layout_viewport(layout.viewport_length);
        self
    }

    /// Reports a new viewport length.
    pub fn layout_viewport(&mut self, viewport_length: f32) {
        let cross = self.layout.map_or(320.0, |layout| layout.cross_length);
        if let Some(layout) = self.layout.as_mut() {
            layout.viewport_length = viewport_length;
        }
        let size = self.axis_size(viewport_length, cross);
        self.list.on_layout(LayoutEvent {
            layout: Rect::new(0.0, 0.0, size.width, size.height),
        });
    }

    /// Runs one frame. Returns true when it produced a render pass.
    pub fn frame(&mut self) -> bool {
        let now = self.clock.advance_frame();
        self.frames += 1;
        if !self.list.on_frame(now) {
            return false;
        }
        let pass = self.list.render();
        self.lay_out(&pass);
        self.last_pass = Some(pass);
        true
    }

    /// Runs frames until the list neither renders nor has pending work.
    pub fn await_idle(&mut self) {
        let mut i = 0;
        while self.frame() || self.list.has_pending_work() {
            i += 1;
            if i > MAX_SETTLE_FRAMES {
                panic!("List failed to settle after {MAX_SETTLE_FRAMES} frames");
            }
        }
    }

    /// Reports a scroll to `offset` with the current viewport and content.
    pub fn scroll_to_offset(&mut self, offset: f32) {
        let layout = self
            .layout
            .unwrap_or_else(|| panic!("scroll_to_offset needs a uniform layout"));
        self.offset = offset;
        let content_offset = match self.orientation() {
            Orientation::Vertical => Point::new(0.0, offset),
            Orientation::Horizontal => Point::new(offset, 0.0),
        };
        self.list.on_scroll(ScrollEvent::new(
            content_offset,
            self.axis_size(layout.viewport_length, layout.cross_length),
            self.axis_size(self.content_length, layout.cross_length),
        ));
    }

    /// Scrolls so the end of the rendered content touches the viewport end.
    pub fn scroll_to_end(&mut self) {
        let viewport = self.layout.map_or(0.0, |layout| layout.viewport_length);
        self.scroll_to_offset((self.content_length - viewport).max(0.0));
    }

    pub fn set_data_source(&mut self, data_source: D) -> DataSourceUpdate {
        self.list.set_data_source(data_source)
    }

    pub fn list(&self) -> &ListView<D, V, RecordingScrollSurface> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<D, V, RecordingScrollSurface> {
        &mut self.list
    }

    pub fn surface(&self) -> &RecordingScrollSurface {
        self.list.surface()
    }

    pub fn last_pass(&self) -> Option<&RenderPass<V>> {
        self.last_pass.as_ref()
    }

    /// Keys of the last render pass, in order.
    pub fn rendered_keys(&self) -> Vec<String> {
        self.last_pass
            .as_ref()
            .map(|pass| pass.entries.iter().map(|entry| entry.key.clone()).collect())
            .unwrap_or_default()
    }

    pub fn rendered_row_count(&self) -> usize {
        self.last_pass.as_ref().map_or(0, RenderPass::row_count)
    }

    pub fn content_length(&self) -> f32 {
        self.content_length
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut VirtualClock {
        &mut self.clock
    }

    pub fn frames_run(&self) -> usize {
        self.frames
    }

    fn orientation(&self) -> Orientation {
        self.list.props().orientation()
    }

    fn axis_size(&self, along: f32, across: f32) -> Size {
        match self.orientation() {
            Orientation::Vertical => Size::new(across, along),
            Orientation::Horizontal => Size::new(along, across),
        }
    }

    fn lay_out(&mut self, pass: &RenderPass<V>) {
        let Some(layout) = self.layout else {
            return;
        };
        let horizontal = self.orientation() == Orientation::Horizontal;
        let mut position = 0.0;
        let mut frames = Vec::with_capacity(pass.entries.len());
        for (index, entry) in pass.entries.iter().enumerate() {
            let extent = layout.extent_of(entry.kind);
            let frame = if horizontal {
                Rect::new(position, 0.0, extent, layout.cross_length)
            } else {
                Rect::new(0.0, position, layout.cross_length, extent)
            };
            frames.push(ChildFrame::new(index, frame));
            position += extent;
        }
        self.content_length = position;
        log::trace!("laid out {} children, content length {position}", frames.len());

        self.list.on_child_layout(frames);
        let size = self.axis_size(position, layout.cross_length);
        self.list.on_content_size_change(ContentSizeEvent {
            width: size.width,
            height: size.height,
        });
    }
}
