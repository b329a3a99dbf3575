use chrono::{Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A naive wall-clock timestamp attached to a task.
///
/// Values are immutable: every transformation returns a new `Time`. When
/// `recurrence` is set, `date` is the first occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub date: NaiveDateTime,
    /// Whether the hour/minute of `date` were written explicitly
    pub has_time_of_day: bool,
    /// Days between repetitions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<u32>,
    /// Reserved for closed recurrence ranges; never populated by the parser
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDateTime>,
}

impl Time {
    /// A date-only time at midnight
    pub fn from_date(date: NaiveDate) -> Self {
        Time {
            date: date.and_time(NaiveTime::MIN),
            has_time_of_day: false,
            recurrence: None,
            until: None,
        }
    }

    /// A time on `date` at `hour:minute`
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Option<Self> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
        Some(Time {
            date: date.and_time(time),
            has_time_of_day: true,
            recurrence: None,
            until: None,
        })
    }

    /// The current local wall-clock time, truncated to the minute
    pub fn now(has_time_of_day: bool) -> Self {
        let now = Local::now().naive_local();
        let date = if has_time_of_day {
            now.with_second(0)
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(now)
        } else {
            now.date().and_time(NaiveTime::MIN)
        };
        Time {
            date,
            has_time_of_day,
            recurrence: None,
            until: None,
        }
    }

    /// The calendar day of this time, ignoring time of day
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    pub fn with_recurrence(self, days: u32) -> Self {
        Time {
            recurrence: Some(days),
            ..self
        }
    }

    /// Move by whole calendar days, keeping the time of day.
    /// Saturates at chrono's representable range.
    pub fn shift_by_days(self, days: i64) -> Self {
        let date = Duration::try_days(days)
            .and_then(|d| self.date.checked_add_signed(d))
            .unwrap_or(self.date);
        Time { date, ..self }
    }

    /// Move by calendar months. Days past the end of the target month clamp to
    /// its last day (Jan 31 + 1 month = Feb 28/29).
    pub fn shift_by_months(self, months: i32) -> Self {
        let shifted = if months >= 0 {
            self.date.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.date.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        Time {
            date: shifted.unwrap_or(self.date),
            ..self
        }
    }
}
