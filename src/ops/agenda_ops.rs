use std::cmp::Ordering;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::model::agenda::{Agenda, AgendaDay, AgendaView, CalendarCell};
use crate::model::todo::TodoItem;
use crate::ops::priority::priority_ordering;
use crate::ops::recurrence::occurs_on_day;

/// Calendar grid size: enough rows for any month
const CALENDAR_ROWS: usize = 6;

fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

fn clock(todo: &TodoItem) -> Option<NaiveTime> {
    todo.date
        .as_ref()
        .filter(|t| t.has_time_of_day)
        .map(|t| t.date.time())
}

/// Most urgent first, then timed entries by clock, then untimed, then by
/// file and line
fn agenda_order(a: &TodoItem, b: &TodoItem) -> Ordering {
    priority_ordering(b.priority.as_deref(), a.priority.as_deref())
        .then_with(|| match (clock(a), clock(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| by_location(a, b))
}

fn by_location(a: &TodoItem, b: &TodoItem) -> Ordering {
    a.location
        .file
        .cmp(&b.location.file)
        .then(a.location.line.cmp(&b.location.line))
}

/// Todos occurring on `day`, in agenda order
pub fn todos_on_day(todos: &[TodoItem], day: NaiveDate) -> Vec<&TodoItem> {
    let mut hits: Vec<&TodoItem> = todos.iter().filter(|t| occurs_on_day(t, day)).collect();
    hits.sort_by(|a, b| agenda_order(a, b));
    hits
}

/// One entry per day from `date - days_before` to `date + days_after`
/// inclusive. Days with nothing on them are kept. The window is clamped to
/// the dates chrono can represent.
pub fn daily_weekly(
    todos: &[TodoItem],
    date: NaiveDate,
    days_before: u32,
    days_after: u32,
) -> Vec<AgendaDay<'_>> {
    let first = add_days(date, -i64::from(days_before)).unwrap_or(NaiveDate::MIN);
    let last = add_days(date, i64::from(days_after)).unwrap_or(NaiveDate::MAX);
    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| AgendaDay {
            date: day,
            todos: todos_on_day(todos, day),
        })
        .collect()
}

/// Every `TODO`-flagged task, most urgent first
pub fn global_todo(todos: &[TodoItem]) -> Vec<&TodoItem> {
    let mut open: Vec<&TodoItem> = todos.iter().filter(|t| t.flag == "TODO").collect();
    open.sort_by(|a, b| {
        priority_ordering(b.priority.as_deref(), a.priority.as_deref())
            .then_with(|| by_location(a, b))
    });
    open
}

/// Six Sunday-first weeks covering the month of `month`, padded with days
/// of the neighbouring months
pub fn calendar_month(
    todos: &[TodoItem],
    month: NaiveDate,
    today: NaiveDate,
) -> Vec<Vec<CalendarCell<'_>>> {
    let Some(first) = month.with_day(1) else {
        return Vec::new();
    };
    let lead = i64::from(first.weekday().num_days_from_sunday());

    (0..CALENDAR_ROWS)
        .map(|row| {
            (0..7)
                .filter_map(|col| {
                    let offset = (row * 7 + col) as i64 - lead;
                    let date = add_days(first, offset)?;
                    Some(CalendarCell {
                        day: date.day(),
                        date,
                        in_month: date.month() == first.month() && date.year() == first.year(),
                        is_today: date == today,
                        todos: todos_on_day(todos, date),
                    })
                })
                .collect()
        })
        .collect()
}

/// Render `view` over `todos`
pub fn build<'a>(view: &AgendaView, todos: &'a [TodoItem], today: NaiveDate) -> Agenda<'a> {
    match view {
        AgendaView::DailyWeekly {
            date,
            days_before_showing,
            days_after_showing,
        } => Agenda::DailyWeekly(daily_weekly(
            todos,
            *date,
            *days_before_showing,
            *days_after_showing,
        )),
        AgendaView::GlobalTodo => Agenda::GlobalTodo(global_todo(todos)),
        AgendaView::Calendar { month } => Agenda::Calendar(calendar_month(todos, *month, today)),
    }
}
