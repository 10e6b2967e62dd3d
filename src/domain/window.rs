//! Date window over which consents are fetched
//!
//! Callers supply two calendar dates; the window runs from the first instant
//! of the start date to the last millisecond of the end date in a given time
//! zone (the local zone for the CLI).

use super::errors::ExporterError;
use super::result::Result;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};

/// Inclusive date range, built once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start_date: NaiveDate,
    end_date: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateWindow {
    /// Builds the window using the machine's local time zone
    pub fn local(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
        Self::in_timezone(start_date, end_date, &Local)
    }

    /// Builds the window with day boundaries taken in `tz`
    ///
    /// # Errors
    ///
    /// Returns a validation error if `end_date` precedes `start_date` or a
    /// boundary does not exist in `tz`.
    pub fn in_timezone<Tz: TimeZone>(
        start_date: NaiveDate,
        end_date: NaiveDate,
        tz: &Tz,
    ) -> Result<Self> {
        if end_date < start_date {
            return Err(ExporterError::Validation(format!(
                "end date {end_date} is before start date {start_date}"
            )));
        }

        let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
            .ok_or_else(|| ExporterError::Other("invalid end-of-day time".to_string()))?;

        let start = tz
            .from_local_datetime(&start_date.and_time(NaiveTime::MIN))
            .earliest()
            .ok_or_else(|| {
                ExporterError::Validation(format!("start of {start_date} does not exist locally"))
            })?
            .with_timezone(&Utc);
        let end = tz
            .from_local_datetime(&end_date.and_time(end_of_day))
            .latest()
            .ok_or_else(|| {
                ExporterError::Validation(format!("end of {end_date} does not exist locally"))
            })?
            .with_timezone(&Utc);

        Ok(Self {
            start_date,
            end_date,
            start,
            end,
        })
    }

    /// First instant of the window
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Last instant of the window
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Calendar date the window starts on
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Calendar date the window ends on
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Window start as sent to the API (`2024-01-01T00:00:00.000Z`)
    pub fn start_iso(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Window end as sent to the API (`2024-01-31T23:59:59.999Z`)
    pub fn end_iso(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Parses a caller-supplied date
///
/// Accepts a plain `YYYY-MM-DD` date or an RFC 3339 timestamp, in which case
/// the calendar date in the local time zone is used.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(input)
        .map(|ts| ts.with_timezone(&Local).date_naive())
        .map_err(|_| {
            ExporterError::Configuration(format!(
                "Invalid date '{input}'. Expected YYYY-MM-DD or an RFC 3339 timestamp"
            ))
        })
}
