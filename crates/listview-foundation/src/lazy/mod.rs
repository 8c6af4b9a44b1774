//! Incremental rendering for list views.
//!
//! Only a prefix of the data source is materialized at any time. This module
//! decides how long that prefix is and which of its rows are on screen.
//!
//! # Architecture
//!
//! - [`IncrementalRenderScheduler`] - owns the rendered row count and grows it
//!   one page per scheduling tick
//! - [`EndReachedLatch`] - fires the end-reached notification once per
//!   content length
//! - [`VisibleRowTracker`] - intersects row layouts with the viewport and
//!   reports visibility deltas
//!
//! # Example
//!
//! ```rust,ignore
//! let mut scheduler = IncrementalRenderScheduler::new(RenderSchedulerConfig::default());
//! scheduler.initialize(&data_source);
//! if scheduler.on_scroll_range_near_end(geometry.distance_from_end()).grew() {
//!     // render again, then call complete_pending_pass() on the next tick
//! }
//! ```

mod end_reached;
mod render_scheduler;
mod visibility;

pub use end_reached::*;
pub use render_scheduler::*;
pub use visibility::*;
