use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::todo::TodoItem;

/// Which agenda the host is showing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgendaView {
    /// A window of days around `date`
    DailyWeekly {
        date: NaiveDate,
        days_before_showing: u32,
        days_after_showing: u32,
    },
    /// Every open TODO regardless of date
    GlobalTodo,
    /// A month grid; only the year and month of `month` matter
    Calendar { month: NaiveDate },
}

/// One day of a daily/weekly agenda
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaDay<'a> {
    pub date: NaiveDate,
    pub todos: Vec<&'a TodoItem>,
}

/// One cell of a month calendar grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarCell<'a> {
    /// Day-of-month number shown in the cell
    pub day: u32,
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub todos: Vec<&'a TodoItem>,
}

/// The rendered content of an agenda view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "entries", rename_all = "snake_case")]
pub enum Agenda<'a> {
    DailyWeekly(Vec<AgendaDay<'a>>),
    GlobalTodo(Vec<&'a TodoItem>),
    /// Six rows of seven cells, Sunday first
    Calendar(Vec<Vec<CalendarCell<'a>>>),
}
