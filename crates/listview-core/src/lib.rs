//! Core types for the incremental list view.
//!
//! - [`ItemId`] / [`RowKey`] identify sections and rows.
//! - [`ListDataSource`] is the contract the list consumes; [`DataSource`] is
//!   the immutable, diffing snapshot shipped with it.
//! - [`TimerSet`] and [`SchedulingTick`] carry deferred work between frames.

pub mod collections;
pub mod data_source;
pub mod frame;
pub mod geometry;
pub mod ids;

pub use data_source::{
    next_data_source_version, DataSource, ListDataSource, Section, DEFAULT_SECTION_ID,
};
pub use frame::{Due, SchedulingTick, TimerId, TimerSet};
pub use geometry::{PixelRange, Point, Rect, Size};
pub use ids::{ItemId, RowKey};
