//! List view component for the incremental list toolkit.
//!
//! [`ListView`] composes the scheduler, visibility tracker and scroll event
//! adapter from `listview-foundation` with caller-supplied render callbacks
//! and a host [`ScrollSurface`].

mod entries;
mod error;
mod list_view;
mod props;
mod surface;

pub use entries::{EntryKind, HighlightRow, RenderEntry, RenderPass};
pub use error::ListViewError;
pub use list_view::{ListView, ListViewMetrics, RenderState};
pub use props::{
    ListViewProps, ListViewPropsBuilder, OnChangeVisibleRowsFn, OnEndReachedFn, RenderChromeFn,
    RenderRowFn, RenderSectionHeaderFn, RenderSeparatorFn,
};
pub use surface::{
    NativeProps, NativeValue, NodeHandle, ScrollResponder, ScrollSurface, ScrollSurfaceConfig,
    DEFAULT_SCROLL_EVENT_THROTTLE,
};

pub use listview_core::{DataSource, ItemId, ListDataSource, RowKey, SchedulingTick, Section};
pub use listview_foundation::lazy::{ChangedRows, DataSourceUpdate, IncrementalRender, VisibleRows};
pub use listview_foundation::scroll::{
    ChildFrame, ContentSizeEvent, LayoutEvent, Orientation, ScrollEvent, ScrollGeometry,
};
