//! Android platform modules for the incremental list toolkit.
//!
//! The dialogs themselves live on the native side; this crate owns their
//! request/response contract.

pub mod pickers;

pub use pickers::{
    DatePicker, DatePickerMode, DatePickerOptions, DatePickerResult, NativeDialogModule,
    NativeMap, NativeRejection, PickerError, TimePicker, TimePickerOptions, TimePickerResult,
};
