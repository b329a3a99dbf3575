use chrono::NaiveDate;
use serde::Serialize;

use crate::model::agenda::{AgendaDay, CalendarCell};
use crate::model::time::Time;
use crate::model::todo::TodoItem;
use crate::parse::date_parser::WEEKDAYS;
use crate::parse::date_serializer::{format_clock, format_date};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TodoJson {
    pub flag: String,
    pub name: String,
    pub file: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateJson>,
}

#[derive(Serialize)]
pub struct DateJson {
    /// Canonical `<...>` form
    pub canonical: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_days: Option<u32>,
}

#[derive(Serialize)]
pub struct AgendaDayJson {
    pub date: String,
    pub todos: Vec<TodoJson>,
}

#[derive(Serialize)]
pub struct CalendarCellJson {
    pub date: String,
    pub day: u32,
    pub in_month: bool,
    pub is_today: bool,
    pub todos: Vec<TodoJson>,
}

#[derive(Serialize)]
pub struct CalendarJson {
    pub month: String,
    pub weeks: Vec<Vec<CalendarCellJson>>,
}

#[derive(Serialize)]
pub struct EditJson {
    pub file: String,
    pub line: usize,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn date_to_json(time: &Time) -> DateJson {
    DateJson {
        canonical: format_date(time),
        date: time.day().format("%Y-%m-%d").to_string(),
        time: time.has_time_of_day.then(|| format_clock(time)),
        recurrence_days: time.recurrence,
    }
}

pub fn todo_to_json(todo: &TodoItem) -> TodoJson {
    TodoJson {
        flag: todo.flag.clone(),
        name: todo.name.clone(),
        file: todo.location.file.clone(),
        line: todo.location.line,
        priority: todo.priority.clone(),
        date: todo.date.as_ref().map(date_to_json),
    }
}

pub fn day_to_json(day: &AgendaDay) -> AgendaDayJson {
    AgendaDayJson {
        date: day.date.format("%Y-%m-%d").to_string(),
        todos: day.todos.iter().map(|t| todo_to_json(t)).collect(),
    }
}

pub fn calendar_to_json(month: NaiveDate, grid: &[Vec<CalendarCell>]) -> CalendarJson {
    CalendarJson {
        month: month.format("%Y-%m").to_string(),
        weeks: grid
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| CalendarCellJson {
                        date: cell.date.format("%Y-%m-%d").to_string(),
                        day: cell.day,
                        in_month: cell.in_month,
                        is_today: cell.is_today,
                        todos: cell.todos.iter().map(|t| todo_to_json(t)).collect(),
                    })
                    .collect()
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `FLAG [#P] name`, the part of a task every listing shows
fn format_headline(todo: &TodoItem) -> String {
    let mut out = todo.flag.clone();
    if let Some(p) = &todo.priority {
        out.push_str(&format!(" [{}]", p));
    }
    if !todo.name.is_empty() {
        out.push(' ');
        out.push_str(&todo.name);
    }
    out
}

fn format_location(todo: &TodoItem) -> String {
    format!("({}:{})", todo.location.file, todo.location.line)
}

/// Format a single task as a one-line summary
pub fn format_todo_line(todo: &TodoItem) -> String {
    let date = todo
        .date
        .as_ref()
        .map(|t| format!(" {}", format_date(t)))
        .unwrap_or_default();
    format!("{}{}  {}", format_headline(todo), date, format_location(todo))
}

/// One entry under an agenda day: clock column, then the task
pub fn format_agenda_entry(todo: &TodoItem) -> String {
    let clock = todo
        .date
        .as_ref()
        .filter(|t| t.has_time_of_day)
        .map(format_clock)
        .unwrap_or_default();
    let repeat = if todo.date.as_ref().is_some_and(|t| t.recurrence.is_some()) {
        " (repeats)"
    } else {
        ""
    };
    format!(
        "  {:<5}  {}{}  {}",
        clock,
        format_headline(todo),
        repeat,
        format_location(todo)
    )
}

/// `Fri 2024-03-15`
pub fn format_day_header(date: NaiveDate) -> String {
    date.format("%a %Y-%m-%d").to_string()
}

pub fn format_agenda_day(day: &AgendaDay) -> Vec<String> {
    let mut lines = vec![format_day_header(day.date)];
    for todo in &day.todos {
        lines.push(format_agenda_entry(todo));
    }
    lines
}

/// A month grid. Days with tasks carry a `*`, today is bracketed, and days
/// outside the month are blank. Tasks of the month are listed below.
pub fn format_calendar(month: NaiveDate, grid: &[Vec<CalendarCell>]) -> Vec<String> {
    let mut lines = vec![month.format("%B %Y").to_string()];
    let header: String = WEEKDAYS.iter().map(|w| format!(" {} ", &w[..2])).collect();
    lines.push(header.trim_end().to_string());

    for row in grid {
        let cells: String = row
            .iter()
            .map(|cell| {
                if !cell.in_month {
                    "    ".to_string()
                } else if cell.is_today {
                    format!("[{:>2}]", cell.day)
                } else if cell.todos.is_empty() {
                    format!(" {:>2} ", cell.day)
                } else {
                    format!(" {:>2}*", cell.day)
                }
            })
            .collect();
        lines.push(cells.trim_end().to_string());
    }

    for cell in grid.iter().flatten().filter(|c| c.in_month && !c.todos.is_empty()) {
        lines.push(String::new());
        lines.push(format_day_header(cell.date));
        for todo in &cell.todos {
            lines.push(format_agenda_entry(todo));
        }
    }
    lines
}

/// Normalize a priority filter: `A` and `#A` both mean `#A`
pub fn normalize_priority(p: &str) -> String {
    if p.starts_with('#') {
        p.to_string()
    } else {
        format!("#{}", p)
    }
}
