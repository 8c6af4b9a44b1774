//! Scheduling building blocks for list views.
//!
//! [`lazy`] decides how many rows are materialized and which of them are on
//! screen; [`scroll`] turns host events into the geometry those decisions
//! need. Neither module renders anything.

pub mod lazy;
pub mod scroll;

pub use lazy::{
    ChangedRows, DataSourceUpdate, EndReachedLatch, IncrementalRender,
    IncrementalRenderScheduler, RenderSchedulerConfig, VisibleRowTracker, VisibleRows,
};
pub use scroll::{
    AdapterOutput, ChildFrame, ContentSizeEvent, LayoutEvent, Orientation, ScrollEvent,
    ScrollEventAdapter, ScrollGeometry,
};
