//! Standard Android date picker dialog.

use chrono::{Datelike, NaiveDate, NaiveTime};

use super::native::{NativeDialogModule, NativeMap, ACTION_KEY, DISMISSED_ACTION};
use super::PickerError;

/// Action reported when the user picked a date.
pub const DATE_SET_ACTION: &str = "dateSetAction";

/// Presentation of the date dialog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DatePickerMode {
    Calendar,
    Spinner,
    #[default]
    Default,
}

impl DatePickerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DatePickerMode::Calendar => "calendar",
            DatePickerMode::Spinner => "spinner",
            DatePickerMode::Default => "default",
        }
    }
}

/// Initial date and bounds of the dialog. Dates cross the bridge as
/// milliseconds since the epoch at UTC midnight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DatePickerOptions {
    pub date: Option<NaiveDate>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub mode: DatePickerMode,
}

impl DatePickerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn min_date(mut self, date: NaiveDate) -> Self {
        self.min_date = Some(date);
        self
    }

    pub fn max_date(mut self, date: NaiveDate) -> Self {
        self.max_date = Some(date);
        self
    }

    pub fn mode(mut self, mode: DatePickerMode) -> Self {
        self.mode = mode;
        self
    }

    fn to_request(self) -> Result<NativeMap, PickerError> {
        if let (Some(min), Some(max)) = (self.min_date, self.max_date) {
            if min > max {
                return Err(PickerError::InvalidOption {
                    option: "minDate",
                    reason: format!("{min} is after maxDate {max}"),
                });
            }
        }

        let mut request = NativeMap::new();
        for (key, date) in [
            ("date", self.date),
            ("minDate", self.min_date),
            ("maxDate", self.max_date),
        ] {
            if let Some(date) = date {
                request.insert(key, epoch_millis(date));
            }
        }
        request.insert("mode", self.mode.as_str());
        Ok(request)
    }
}

fn epoch_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::default()).and_utc().timestamp_millis()
}

/// Outcome of a date picker dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatePickerResult {
    /// `month` is 1-based.
    DateSet { year: i32, month: u32, day: u32 },
    Dismissed,
}

impl DatePickerResult {
    pub fn action(&self) -> &'static str {
        match self {
            DatePickerResult::DateSet { .. } => DATE_SET_ACTION,
            DatePickerResult::Dismissed => DISMISSED_ACTION,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match *self {
            DatePickerResult::DateSet { year, month, day } => NaiveDate::from_ymd_opt(year, month, day),
            DatePickerResult::Dismissed => None,
        }
    }

    fn from_response(response: &NativeMap) -> Result<Self, PickerError> {
        let action = response
            .get_str(ACTION_KEY)
            .ok_or(PickerError::MissingField(ACTION_KEY))?;
        match action {
            DATE_SET_ACTION => {
                let year = response
                    .get_int("year")
                    .ok_or(PickerError::MissingField("year"))?;
                let year = i32::try_from(year)
                    .map_err(|_| PickerError::OutOfRange { field: "year", value: year })?;
                // The native side reports months from zero.
                let month = super::field_in_range(response, "month", 0..=11)? + 1;
                let day = super::field_in_range(response, "day", 1..=31)?;
                let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(
                    PickerError::OutOfRange {
                        field: "day",
                        value: i64::from(day),
                    },
                )?;
                Ok(DatePickerResult::DateSet {
                    year: date.year(),
                    month: date.month(),
                    day: date.day(),
                })
            }
            DISMISSED_ACTION => {
                if response.len() > 1 {
                    log::trace!("dropping fields of dismissed date picker response");
                }
                Ok(DatePickerResult::Dismissed)
            }
            other => Err(PickerError::UnknownAction(other.to_owned())),
        }
    }
}

/// Opens the date picker through a native dialog module.
#[derive(Clone, Debug)]
pub struct DatePicker<M> {
    module: M,
}

impl<M: NativeDialogModule> DatePicker<M> {
    pub fn new(module: M) -> Self {
        Self { module }
    }

    pub async fn open(&self, options: DatePickerOptions) -> Result<DatePickerResult, PickerError> {
        let request = options.to_request()?;
        log::debug!("opening date picker with {request:?}");
        let response = self.module.open(request).await?;
        DatePickerResult::from_response(&response)
    }
}
