//! Scroll event adaptation.
//!
//! Hosts report scroll, layout and content-size changes as plain event
//! values. [`ScrollEventAdapter`] folds every event received between two
//! scheduling ticks into the latest geometry, so a burst of scroll events
//! costs one visibility pass instead of one per event.

use listview_core::{PixelRange, Point, Rect, Size};
use smallvec::SmallVec;

/// Scroll axis of the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn from_horizontal(horizontal: bool) -> Self {
        if horizontal {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    pub fn offset_of(self, point: Point) -> f32 {
        match self {
            Orientation::Vertical => point.y,
            Orientation::Horizontal => point.x,
        }
    }

    pub fn length_of(self, size: Size) -> f32 {
        match self {
            Orientation::Vertical => size.height,
            Orientation::Horizontal => size.width,
        }
    }

    /// Projects a frame onto the scroll axis.
    pub fn range_of(self, frame: Rect) -> PixelRange {
        PixelRange::from_origin(self.offset_of(frame.origin()), self.length_of(frame.size()))
    }
}

/// Measured frame of one child of the scroll content, by child index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildFrame {
    pub index: usize,
    pub frame: Rect,
}

impl ChildFrame {
    pub fn new(index: usize, frame: Rect) -> Self {
        Self { index, frame }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollEvent {
    pub content_offset: Point,
    pub layout_measurement: Size,
    pub content_size: Size,
    pub updated_child_frames: Vec<ChildFrame>,
}

impl ScrollEvent {
    pub fn new(content_offset: Point, layout_measurement: Size, content_size: Size) -> Self {
        Self {
            content_offset,
            layout_measurement,
            content_size,
            updated_child_frames: Vec::new(),
        }
    }

    pub fn with_child_frames(mut self, frames: impl IntoIterator<Item = ChildFrame>) -> Self {
        self.updated_child_frames.extend(frames);
        self
    }
}

/// Layout of the scroll surface itself.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutEvent {
    pub layout: Rect,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContentSizeEvent {
    pub width: f32,
    pub height: f32,
}

impl ContentSizeEvent {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Scroll position along the list axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollGeometry {
    pub offset: f32,
    pub visible_length: f32,
    pub content_length: f32,
}

impl ScrollGeometry {
    /// Pixels left to scroll before the end of the rendered content.
    pub fn distance_from_end(&self) -> f32 {
        self.content_length - self.visible_length - self.offset
    }

    pub fn viewport(&self) -> PixelRange {
        PixelRange::from_origin(self.offset, self.visible_length)
    }
}

/// Everything collected since the previous [`ScrollEventAdapter::take_pending`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdapterOutput {
    /// Latest complete geometry, or `None` when some dimension is still
    /// unknown.
    pub geometry: Option<ScrollGeometry>,
    /// Merged child frames, latest measurement per index, sorted by index.
    pub child_frames: Vec<ChildFrame>,
}

/// Debounces host events down to the latest scroll geometry.
#[derive(Clone, Debug, Default)]
pub struct ScrollEventAdapter {
    orientation: Orientation,
    offset: Option<f32>,
    visible_length: Option<f32>,
    content_length: Option<f32>,
    child_frames: SmallVec<[ChildFrame; 8]>,
    dirty: bool,
}

impl ScrollEventAdapter {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn push_scroll(&mut self, event: ScrollEvent) {
        let axis = self.orientation;
        self.set_offset(axis.offset_of(event.content_offset));
        if event.layout_measurement.is_valid() {
            self.set_visible_length(axis.length_of(event.layout_measurement));
        }
        if event.content_size.is_valid() {
            self.set_content_length(axis.length_of(event.content_size));
        }
        for frame in event.updated_child_frames {
            self.merge_child_frame(frame);
        }
        self.dirty = true;
    }

    pub fn push_layout(&mut self, event: LayoutEvent) {
        if !event.layout.is_valid() {
            log::warn!("ignoring layout event with invalid frame {:?}", event.layout);
            return;
        }
        self.set_visible_length(self.orientation.length_of(event.layout.size()));
        self.dirty = true;
    }

    pub fn push_content_size(&mut self, event: ContentSizeEvent) {
        let size = event.size();
        if !size.is_valid() {
            log::warn!("ignoring content size event with invalid size {size:?}");
            return;
        }
        self.set_content_length(self.orientation.length_of(size));
        self.dirty = true;
    }

    /// Child measurements reported outside of a scroll event.
    pub fn push_child_frames(&mut self, frames: impl IntoIterator<Item = ChildFrame>) {
        for frame in frames {
            if self.merge_child_frame(frame) {
                self.dirty = true;
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.dirty
    }

    /// Latest complete geometry regardless of whether it was already taken.
    pub fn geometry(&self) -> Option<ScrollGeometry> {
        Some(ScrollGeometry {
            offset: self.offset.unwrap_or(0.0),
            visible_length: self.visible_length?,
            content_length: self.content_length?,
        })
    }

    /// Drains the events collected since the last call.
    pub fn take_pending(&mut self) -> Option<AdapterOutput> {
        if !std::mem::replace(&mut self.dirty, false) {
            return None;
        }
        let mut child_frames: Vec<ChildFrame> = self.child_frames.drain(..).collect();
        child_frames.sort_by_key(|frame| frame.index);
        Some(AdapterOutput {
            geometry: self.geometry(),
            child_frames,
        })
    }

    /// Drops every recorded dimension, e.g. after the surface was replaced.
    pub fn reset(&mut self) {
        *self = Self::new(self.orientation);
    }

    fn set_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.offset = Some(offset);
        } else {
            log::warn!("ignoring non-finite scroll offset {offset}");
        }
    }

    fn set_visible_length(&mut self, length: f32) {
        self.visible_length = Some(length);
    }

    fn set_content_length(&mut self, length: f32) {
        self.content_length = Some(length);
    }

    fn merge_child_frame(&mut self, frame: ChildFrame) -> bool {
        if !frame.frame.is_valid() {
            log::trace!("dropping invalid frame for child {}", frame.index);
            return false;
        }
        match self
            .child_frames
            .iter_mut()
            .find(|existing| existing.index == frame.index)
        {
            Some(existing) => *existing = frame,
            None => self.child_frames.push(frame),
        }
        true
    }
}
