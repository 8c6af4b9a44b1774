//! Modal pickers backed by native dialog modules.
//!
//! Every picker turns typed options into a [`NativeMap`] request, awaits the
//! module and decodes the `{action, ...}` response. A response whose action
//! is [`DISMISSED_ACTION`] decodes to `Dismissed` with every other field
//! discarded.

use std::ops::RangeInclusive;

mod date;
mod native;
mod time;

pub use date::{DatePicker, DatePickerMode, DatePickerOptions, DatePickerResult, DATE_SET_ACTION};
pub use native::{
    ImmediateModule, NativeArg, NativeDialogModule, NativeMap, NativeRejection, ACTION_KEY,
    DISMISSED_ACTION,
};
pub use time::{TimePicker, TimePickerOptions, TimePickerResult, TIME_SET_ACTION};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickerError {
    #[error("native dialog rejected the request: {0}")]
    Rejected(#[from] NativeRejection),
    #[error("invalid `{option}` option: {reason}")]
    InvalidOption { option: &'static str, reason: String },
    #[error("unknown dialog action `{0}`")]
    UnknownAction(String),
    #[error("dialog response is missing `{0}`")]
    MissingField(&'static str),
    #[error("dialog response field `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },
}

fn field_in_range(
    response: &NativeMap,
    field: &'static str,
    range: RangeInclusive<i64>,
) -> Result<u32, PickerError> {
    let value = response
        .get_int(field)
        .ok_or(PickerError::MissingField(field))?;
    if !range.contains(&value) {
        return Err(PickerError::OutOfRange { field, value });
    }
    u32::try_from(value).map_err(|_| PickerError::OutOfRange { field, value })
}
