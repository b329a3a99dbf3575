use chrono::NaiveDate;

use crate::model::todo::TodoItem;

/// Signed number of whole calendar days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Whether `todo` falls on `day`.
///
/// Non-recurring todos match only their own calendar day. Recurring todos
/// match every `recurrence` days from their first date onward, never before
/// it. A recurrence of zero days matches only the first date.
pub fn occurs_on_day(todo: &TodoItem, day: NaiveDate) -> bool {
    let Some(time) = &todo.date else {
        return false;
    };
    let first = time.day();

    match time.recurrence {
        None | Some(0) => first == day,
        Some(interval) => {
            let diff = days_between(first, day);
            diff >= 0 && diff % i64::from(interval) == 0
        }
    }
}

/// The first day on or after `from` on which `todo` occurs
pub fn next_occurrence(todo: &TodoItem, from: NaiveDate) -> Option<NaiveDate> {
    let time = todo.date.as_ref()?;
    let first = time.day();

    match time.recurrence {
        None | Some(0) => (first >= from).then_some(first),
        Some(_) if first >= from => Some(first),
        Some(interval) => {
            let interval = i64::from(interval);
            let elapsed = days_between(first, from);
            let steps = (elapsed + interval - 1) / interval;
            first.checked_add_signed(chrono::Duration::try_days(steps * interval)?)
        }
    }
}
