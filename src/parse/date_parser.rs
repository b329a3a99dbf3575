use chrono::{Datelike, Duration, Months, NaiveDate, NaiveTime, Weekday};

use crate::model::time::Time;

/// Weekday names as written in date expressions, Sunday first
pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const WEEKDAY_VALUES: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// The pieces of a date expression before they are combined into a `Time`.
///
/// Sub-tokens may appear in any order; the time of day is applied to the date
/// only once everything has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateDraft {
    pub date: NaiveDate,
    /// Hour and minute as written, before normalization
    pub time_of_day: Option<(i64, i64)>,
    /// Weekday name as written. Carries no meaning for the result.
    pub weekday: Option<Weekday>,
    pub recurrence: Option<u32>,
}

impl DateDraft {
    /// Combine into a `Time`. Out-of-range clock values roll over through
    /// calendar arithmetic (`24:00` is midnight of the next day).
    pub fn finish(&self) -> Option<Time> {
        let midnight = self.date.and_time(NaiveTime::MIN);
        let (date, has_time_of_day) = match self.time_of_day {
            Some((hour, minute)) => {
                let dt = midnight
                    .checked_add_signed(Duration::try_hours(hour)?)?
                    .checked_add_signed(Duration::try_minutes(minute)?)?;
                (dt, true)
            }
            None => (midnight, false),
        };
        Some(Time {
            date,
            has_time_of_day,
            recurrence: self.recurrence,
            until: None,
        })
    }

    /// Whether a weekday name was written that disagrees with the date
    pub fn weekday_mismatch(&self) -> bool {
        self.weekday.is_some_and(|w| w != self.date.weekday())
    }
}

/// Strip exactly one matching pair of `<>` or `[]`
pub fn strip_brackets(s: &str) -> &str {
    if let Some(inner) = s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        return inner;
    }
    if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        return inner;
    }
    s
}

/// Parse a date expression such as `<2024-03-15 Fri 10:30 ++1w>`.
///
/// Returns `None` if the expression is empty, contains no date, or has a
/// sub-token that is not a date, clock time, weekday name or recurrence.
pub fn parse_date(expr: &str) -> Option<Time> {
    parse_date_draft(expr)?.finish()
}

/// Parse a date expression without combining it, keeping the written weekday
pub fn parse_date_draft(expr: &str) -> Option<DateDraft> {
    let mut date = None;
    let mut time_of_day = None;
    let mut weekday = None;
    let mut recurrence = None;
    let mut seen_any = false;

    for part in strip_brackets(expr).split(' ').filter(|p| !p.is_empty()) {
        seen_any = true;
        if let Some(d) = try_parse_date(part) {
            date = Some(d);
        } else if let Some(t) = try_parse_time(part) {
            time_of_day = Some(t);
        } else if let Some(w) = try_parse_weekday(part) {
            weekday = Some(w);
        } else if let Some(r) = try_parse_recurrence(part) {
            recurrence = Some(r);
        } else {
            return None;
        }
    }

    if !seen_any {
        return None;
    }

    Some(DateDraft {
        date: date?,
        time_of_day,
        weekday,
        recurrence,
    })
}

/// `YYYY-MM-DD`. Components are not range-checked against the calendar:
/// `2024-02-30` is March 1st and `2024-13-01` is January 1st 2025.
pub fn try_parse_date(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return None;
    };
    let year: i32 = year.parse().ok()?;
    let month: i64 = month.parse().ok()?;
    let day: i64 = day.parse().ok()?;
    normalize_date(year, month, day)
}

fn normalize_date(year: i32, month: i64, day: i64) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let months = month.checked_sub(1)?;
    let in_month = if months >= 0 {
        first.checked_add_months(Months::new(u32::try_from(months).ok()?))?
    } else {
        first.checked_sub_months(Months::new(u32::try_from(-months).ok()?))?
    };
    in_month.checked_add_signed(Duration::try_days(day.checked_sub(1)?)?)
}

/// `HH:MM`
pub fn try_parse_time(s: &str) -> Option<(i64, i64)> {
    let (hour, minute) = s.split_once(':')?;
    if minute.contains(':') {
        return None;
    }
    Some((hour.parse().ok()?, minute.parse().ok()?))
}

/// Three-letter English weekday, case-sensitive
pub fn try_parse_weekday(s: &str) -> Option<Weekday> {
    let index = WEEKDAYS.iter().position(|&d| d == s)?;
    Some(WEEKDAY_VALUES[index])
}

/// `++Nd` or `++Nw`, returning the interval in days
pub fn try_parse_recurrence(s: &str) -> Option<u32> {
    let body = s.strip_prefix("++")?;
    let unit = body.chars().last()?;
    let count = &body[..body.len() - unit.len_utf8()];
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let count: u32 = count.parse().ok()?;
    let unit_days = match unit {
        'd' => 1,
        'w' => 7,
        _ => return None,
    };
    count.checked_mul(unit_days)
}
