use listview_ui::{NativeProps, NodeHandle, ScrollResponder, ScrollSurface, ScrollSurfaceConfig};

/// One `scroll_responder_scroll_to` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollToCall {
    pub x: f32,
    pub y: f32,
    pub animated: bool,
}

#[derive(Debug, Default)]
pub struct RecordingScrollResponder {
    pub calls: Vec<ScrollToCall>,
}

impl ScrollResponder for RecordingScrollResponder {
    fn scroll_responder_scroll_to(&mut self, x: f32, y: f32, animated: bool) {
        self.calls.push(ScrollToCall { x, y, animated });
    }
}

/// Scroll surface that records everything the list sends to it.
#[derive(Debug, Default)]
pub struct RecordingScrollSurface {
    pub configs: Vec<ScrollSurfaceConfig>,
    pub native_props: Vec<NativeProps>,
    pub responder: RecordingScrollResponder,
    pub inner_node: Option<NodeHandle>,
}

impl RecordingScrollSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inner_node(mut self, node: NodeHandle) -> Self {
        self.inner_node = Some(node);
        self
    }

    pub fn last_config(&self) -> Option<&ScrollSurfaceConfig> {
        self.configs.last()
    }

    pub fn scroll_calls(&self) -> &[ScrollToCall] {
        &self.responder.calls
    }
}

impl ScrollSurface for RecordingScrollSurface {
    fn apply_config(&mut self, config: &ScrollSurfaceConfig) {
        self.configs.push(config.clone());
    }

    fn scroll_responder(&mut self) -> &mut dyn ScrollResponder {
        &mut self.responder
    }

    fn set_native_props(&mut self, props: NativeProps) {
        self.native_props.push(props);
    }

    fn inner_view_node(&self) -> Option<NodeHandle> {
        self.inner_node
    }
}
