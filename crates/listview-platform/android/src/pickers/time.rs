//! Standard Android time picker dialog.

use super::native::{NativeDialogModule, NativeMap, ACTION_KEY, DISMISSED_ACTION};
use super::PickerError;

/// Action reported when the user picked a time.
pub const TIME_SET_ACTION: &str = "timeSetAction";

/// What the dialog shows initially. Unset fields fall back to the current
/// time and the locale's clock format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimePickerOptions {
    /// 0..=23
    pub hour: Option<u32>,
    /// 0..=59
    pub minute: Option<u32>,
    /// `false` shows an AM/PM chooser.
    pub is_24_hour: Option<bool>,
}

impl TimePickerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hour(mut self, hour: u32) -> Self {
        self.hour = Some(hour);
        self
    }

    pub fn minute(mut self, minute: u32) -> Self {
        self.minute = Some(minute);
        self
    }

    pub fn is_24_hour(mut self, is_24_hour: bool) -> Self {
        self.is_24_hour = Some(is_24_hour);
        self
    }

    fn to_request(self) -> Result<NativeMap, PickerError> {
        let mut request = NativeMap::new();
        if let Some(hour) = self.hour {
            if hour > 23 {
                return Err(PickerError::InvalidOption {
                    option: "hour",
                    reason: format!("{hour} is not in 0..=23"),
                });
            }
            request.insert("hour", hour);
        }
        if let Some(minute) = self.minute {
            if minute > 59 {
                return Err(PickerError::InvalidOption {
                    option: "minute",
                    reason: format!("{minute} is not in 0..=59"),
                });
            }
            request.insert("minute", minute);
        }
        if let Some(is_24_hour) = self.is_24_hour {
            request.insert("is24Hour", is_24_hour);
        }
        Ok(request)
    }
}

/// Outcome of a time picker dialog. Always check the variant before
/// reading a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimePickerResult {
    TimeSet { hour: u32, minute: u32 },
    Dismissed,
}

impl TimePickerResult {
    pub fn action(&self) -> &'static str {
        match self {
            TimePickerResult::TimeSet { .. } => TIME_SET_ACTION,
            TimePickerResult::Dismissed => DISMISSED_ACTION,
        }
    }

    fn from_response(response: &NativeMap) -> Result<Self, PickerError> {
        let action = response
            .get_str(ACTION_KEY)
            .ok_or(PickerError::MissingField(ACTION_KEY))?;
        match action {
            TIME_SET_ACTION => Ok(TimePickerResult::TimeSet {
                hour: super::field_in_range(response, "hour", 0..=23)?,
                minute: super::field_in_range(response, "minute", 0..=59)?,
            }),
            DISMISSED_ACTION => {
                if response.len() > 1 {
                    log::trace!("dropping fields of dismissed time picker response");
                }
                Ok(TimePickerResult::Dismissed)
            }
            other => Err(PickerError::UnknownAction(other.to_owned())),
        }
    }
}

/// Opens the time picker through a native dialog module.
#[derive(Clone, Debug)]
pub struct TimePicker<M> {
    module: M,
}

impl<M: NativeDialogModule> TimePicker<M> {
    pub fn new(module: M) -> Self {
        Self { module }
    }

    /// Shows the dialog and waits until it closes.
    ///
    /// Options are validated before the dialog is requested. A native
    /// rejection surfaces as [`PickerError::Rejected`].
    pub async fn open(&self, options: TimePickerOptions) -> Result<TimePickerResult, PickerError> {
        let request = options.to_request()?;
        log::debug!("opening time picker with {request:?}");
        let response = self.module.open(request).await?;
        TimePickerResult::from_response(&response)
    }
}
