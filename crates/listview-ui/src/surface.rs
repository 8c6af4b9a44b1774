//! Host scroll surface contract.
//!
//! The list never owns native views. It configures a [`ScrollSurface`]
//! supplied by the host and forwards imperative calls to it; the host feeds
//! scroll, layout and content-size events back as plain values.

use std::fmt;

use indexmap::IndexMap;
use web_time::Duration;

/// Default minimum spacing between two scroll events, as sent to the host.
pub const DEFAULT_SCROLL_EVENT_THROTTLE: Duration = Duration::from_millis(50);

/// Opaque handle to a native view node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub u64);

/// Value of a single native property.
#[derive(Clone, Debug, PartialEq)]
pub enum NativeValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for NativeValue {
    fn from(value: bool) -> Self {
        NativeValue::Bool(value)
    }
}

impl From<f64> for NativeValue {
    fn from(value: f64) -> Self {
        NativeValue::Number(value)
    }
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        NativeValue::Text(value.to_owned())
    }
}

impl From<String> for NativeValue {
    fn from(value: String) -> Self {
        NativeValue::Text(value)
    }
}

/// Props pushed straight to the native view, bypassing a render pass.
pub type NativeProps = IndexMap<String, NativeValue>;

/// Configuration the list sends to its scroll surface.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollSurfaceConfig {
    pub horizontal: bool,
    pub scroll_event_throttle: Duration,
    pub remove_clipped_subviews: bool,
    /// Child indices that stick to the leading edge while scrolled past.
    pub sticky_header_indices: Vec<usize>,
}

impl Default for ScrollSurfaceConfig {
    fn default() -> Self {
        Self {
            horizontal: false,
            scroll_event_throttle: DEFAULT_SCROLL_EVENT_THROTTLE,
            remove_clipped_subviews: true,
            sticky_header_indices: Vec::new(),
        }
    }
}

/// Imperative scrolling delegate of a surface.
pub trait ScrollResponder {
    fn scroll_responder_scroll_to(&mut self, x: f32, y: f32, animated: bool);
}

/// The host scroll view a list renders into.
pub trait ScrollSurface {
    /// Called whenever the list's surface configuration changes.
    fn apply_config(&mut self, config: &ScrollSurfaceConfig);

    fn scroll_responder(&mut self) -> &mut dyn ScrollResponder;

    fn set_native_props(&mut self, props: NativeProps);

    /// Node that hosts the list's children, once the host created it.
    fn inner_view_node(&self) -> Option<NodeHandle>;
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
