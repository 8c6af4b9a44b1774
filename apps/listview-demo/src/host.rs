//! A headless host: fixed-extent layout and a surface that logs what the
//! list asks of it.

use listview_core::{Point, Rect, Size};
use listview_ui::{
    ChildFrame, ContentSizeEvent, EntryKind, LayoutEvent, ListDataSource, ListView,
    ListViewProps, NativeProps, NodeHandle, RenderPass, ScrollEvent, ScrollResponder,
    ScrollSurface, ScrollSurfaceConfig,
};
use web_time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16);
const WIDTH: f32 = 360.0;
const MAX_FRAMES: usize = 1_000;

#[derive(Debug, Default)]
pub struct LoggingResponder;

impl ScrollResponder for LoggingResponder {
    fn scroll_responder_scroll_to(&mut self, x: f32, y: f32, animated: bool) {
        log::info!("surface: scroll to ({x}, {y}), animated: {animated}");
    }
}

#[derive(Debug, Default)]
pub struct LoggingSurface {
    responder: LoggingResponder,
}

impl ScrollSurface for LoggingSurface {
    fn apply_config(&mut self, config: &ScrollSurfaceConfig) {
        log::info!(
            "surface: sticky headers {:?}, throttle {:?}",
            config.sticky_header_indices,
            config.scroll_event_throttle
        );
    }

    fn scroll_responder(&mut self) -> &mut dyn ScrollResponder {
        &mut self.responder
    }

    fn set_native_props(&mut self, props: NativeProps) {
        log::info!("surface: native props {props:?}");
    }

    fn inner_view_node(&self) -> Option<NodeHandle> {
        Some(NodeHandle(1))
    }
}

/// Vertical host with a fixed viewport height and per-kind child extents.
pub struct HeadlessHost<D: ListDataSource, V> {
    list: ListView<D, V, LoggingSurface>,
    viewport: f32,
    content: f32,
    offset: f32,
    now: Instant,
}

impl<D: ListDataSource, V> HeadlessHost<D, V> {
    pub fn mount(props: ListViewProps<D, V>, viewport: f32) -> Self {
        let mut list = ListView::new(props, LoggingSurface::default());
        list.on_layout(LayoutEvent {
            layout: Rect::new(0.0, 0.0, WIDTH, viewport),
        });
        Self {
            list,
            viewport,
            content: 0.0,
            offset: 0.0,
            now: Instant::now(),
        }
    }

    pub fn list(&self) -> &ListView<D, V, LoggingSurface> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<D, V, LoggingSurface> {
        &mut self.list
    }

    /// Runs frames until the list has nothing left to do. Returns the number
    /// of render passes.
    pub fn settle(&mut self) -> usize {
        let mut passes = 0;
        for _ in 0..MAX_FRAMES {
            self.now += FRAME;
            if self.list.on_frame(self.now) {
                let pass = self.list.render();
                self.lay_out(&pass);
                passes += 1;
            } else if !self.list.has_pending_work() {
                return passes;
            }
        }
        log::warn!("list still busy after {MAX_FRAMES} frames");
        passes
    }

    pub fn scroll_to(&mut self, offset: f32) {
        self.offset = offset.clamp(0.0, (self.content - self.viewport).max(0.0));
        self.list.on_scroll(ScrollEvent::new(
            Point::new(0.0, self.offset),
            Size::new(WIDTH, self.viewport),
            Size::new(WIDTH, self.content),
        ));
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_to(f32::MAX);
    }

    fn lay_out(&mut self, pass: &RenderPass<V>) {
        let mut y = 0.0;
        let mut frames = Vec::with_capacity(pass.entries.len());
        for (index, entry) in pass.entries.iter().enumerate() {
            let extent = match entry.kind {
                EntryKind::Row => 72.0,
                EntryKind::Separator => 1.0,
                EntryKind::SectionHeader => 32.0,
                EntryKind::Header | EntryKind::Footer => 56.0,
            };
            frames.push(ChildFrame::new(index, Rect::new(0.0, y, WIDTH, extent)));
            y += extent;
        }
        self.content = y;
        self.list.on_child_layout(frames);
        self.list.on_content_size_change(ContentSizeEvent {
            width: WIDTH,
            height: y,
        });
    }
}
