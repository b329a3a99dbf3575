use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::bus::{AgendaBus, AgendaEvent};
use crate::io::config_io;
use crate::io::document_io::{self, Document, display_name};
use crate::io::watcher::{DocumentWatcher, FileEvent};
use crate::model::agenda::{Agenda, AgendaView};
use crate::model::config::Config;
use crate::model::time::Time;
use crate::model::todo::Direction;
use crate::ops::agenda_ops;
use crate::ops::check::{self, CheckError, CheckWarning};
use crate::ops::index::TodoIndex;
use crate::ops::line_ops::{self, LineEdit};
use crate::parse::date_parser::{parse_date, parse_date_draft};
use crate::parse::date_serializer::format_date;
use crate::parse::tokenizer::tokenize;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// How often `watch` wakes up when nothing changes
const WATCH_TICK: Duration = Duration::from_millis(500);
/// Widest `agenda --before/--after`, about ten years
const MAX_WINDOW_DAYS: u32 = 3660;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let cwd = std::env::current_dir()?;
    let config = config_io::load_config(cli.config.as_deref(), &cwd)?;

    match cli.command {
        // Read commands
        Commands::List(args) => cmd_list(args, &config, json),
        Commands::Agenda(args) => cmd_agenda(args, &config, json),
        Commands::Todo(args) => cmd_todo(args, &config, json),
        Commands::Calendar(args) => cmd_calendar(args, &config, json),
        Commands::Date(args) => cmd_date(args, json),
        Commands::Check(args) => cmd_check(args, &config, json),
        Commands::Flags(args) => cmd_flags(args, &config, cli.config.as_deref(), &cwd, json),

        // Write commands
        Commands::Edit(args) => cmd_edit(args, &config, json),

        // Long-running
        Commands::Watch(args) => cmd_watch(args, &config),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn today() -> NaiveDate {
    Time::now(false).day()
}

fn scan_paths(paths: &PathsArgs) -> Vec<PathBuf> {
    if paths.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths.paths.clone()
    }
}

fn load_documents(paths: &PathsArgs, config: &Config) -> Result<Vec<Document>, Box<dyn std::error::Error>> {
    let files = document_io::collect_files(&scan_paths(paths), &config.files)?;
    Ok(document_io::read_all(&files))
}

/// Extract every document into a fresh index
fn load_index(paths: &PathsArgs, config: &Config) -> Result<TodoIndex, Box<dyn std::error::Error>> {
    let mut index = TodoIndex::new();
    for doc in load_documents(paths, config)? {
        index.replace_file(&doc.name(), doc.todos(&config.flags.vocabulary));
    }
    Ok(index)
}

/// A day given as any date expression, e.g. `2024-03-15`
fn parse_day(expr: &str) -> Result<NaiveDate, String> {
    parse_date(expr)
        .map(|t| t.day())
        .ok_or_else(|| format!("invalid date '{}'", expr))
}

/// `YYYY-MM`, or a month offset from this month such as `+1` or `-2`
fn parse_month(s: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    if s.starts_with('+') || s.starts_with('-') {
        let months: i32 = s
            .parse()
            .map_err(|_| format!("invalid month offset '{}'", s))?;
        return Ok(Time::from_date(today).shift_by_months(months).day());
    }
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .map_err(|_| format!("invalid month '{}' (expected YYYY-MM)", s))
}

fn daily_view(date: Option<&str>, before: Option<u32>, after: Option<u32>, config: &Config) -> Result<AgendaView, String> {
    let days_before_showing = before.unwrap_or(config.agenda.days_before_showing);
    let days_after_showing = after.unwrap_or(config.agenda.days_after_showing);
    if days_before_showing > MAX_WINDOW_DAYS || days_after_showing > MAX_WINDOW_DAYS {
        return Err(format!(
            "agenda window too large (at most {} days each side)",
            MAX_WINDOW_DAYS
        ));
    }
    Ok(AgendaView::DailyWeekly {
        date: match date {
            Some(d) => parse_day(d)?,
            None => today(),
        },
        days_before_showing,
        days_after_showing,
    })
}

fn print_agenda(view: &AgendaView, index: &TodoIndex, json: bool) -> CmdResult {
    let agenda = agenda_ops::build(view, index.todos(), today());

    match &agenda {
        Agenda::DailyWeekly(days) => {
            if json {
                let out: Vec<_> = days.iter().map(day_to_json).collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for (i, day) in days.iter().enumerate() {
                    if i > 0 {
                        println!();
                    }
                    for line in format_agenda_day(day) {
                        println!("{}", line);
                    }
                }
            }
        }
        Agenda::GlobalTodo(todos) => {
            if json {
                let out: Vec<_> = todos.iter().map(|t| todo_to_json(t)).collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for todo in todos {
                    println!("{}", format_todo_line(todo));
                }
            }
        }
        Agenda::Calendar(grid) => {
            let month = match view {
                AgendaView::Calendar { month } => *month,
                _ => today(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&calendar_to_json(month, grid))?);
            } else {
                for line in format_calendar(month, grid) {
                    println!("{}", line);
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, config: &Config, json: bool) -> CmdResult {
    let index = load_index(&args.paths, config)?;
    let grep = args.grep.as_deref().map(Regex::new).transpose()?;
    let priority = args.priority.as_deref().map(normalize_priority);

    let todos: Vec<_> = index
        .todos()
        .iter()
        .filter(|t| args.flag.as_ref().is_none_or(|f| &t.flag == f))
        .filter(|t| priority.as_ref().is_none_or(|p| t.priority.as_ref() == Some(p)))
        .filter(|t| grep.as_ref().is_none_or(|re| re.is_match(&t.name)))
        .collect();

    if json {
        let out: Vec<_> = todos.iter().map(|t| todo_to_json(t)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for todo in todos {
            println!("{}", format_todo_line(todo));
        }
    }
    Ok(())
}

fn cmd_agenda(args: AgendaArgs, config: &Config, json: bool) -> CmdResult {
    let view = daily_view(args.date.as_deref(), args.before, args.after, config)?;
    let index = load_index(&args.paths, config)?;
    print_agenda(&view, &index, json)
}

fn cmd_todo(args: PathsArgs, config: &Config, json: bool) -> CmdResult {
    let index = load_index(&args, config)?;
    print_agenda(&AgendaView::GlobalTodo, &index, json)
}

fn cmd_calendar(args: CalendarArgs, config: &Config, json: bool) -> CmdResult {
    let month = match args.month.as_deref() {
        Some(m) => parse_month(m, today())?,
        None => today(),
    };
    let index = load_index(&args.paths, config)?;
    print_agenda(&AgendaView::Calendar { month }, &index, json)
}

fn cmd_date(args: DateArgs, json: bool) -> CmdResult {
    let expr = args.expr.join(" ");
    let draft = parse_date_draft(&expr).ok_or_else(|| format!("invalid date expression '{}'", expr))?;
    if draft.weekday_mismatch() {
        log::warn!("weekday in '{}' does not match the date; ignoring it", expr);
    }
    let time = draft
        .finish()
        .ok_or_else(|| format!("date out of range: '{}'", expr))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&date_to_json(&time))?);
    } else {
        println!("{}", format_date(&time));
    }
    Ok(())
}

fn cmd_check(args: PathsArgs, config: &Config, json: bool) -> CmdResult {
    let mut result = check::CheckResult {
        valid: true,
        ..Default::default()
    };
    for doc in load_documents(&args, config)? {
        result.merge(check::check_document(&doc.lines, &doc.name(), &config.flags.vocabulary));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if !result.errors.is_empty() {
            println!("Errors:");
            for err in &result.errors {
                match err {
                    CheckError::BadDate { file, line, text } => {
                        println!("  {}:{} unparseable date: {}", file, line, text);
                    }
                }
            }
        }
        if !result.warnings.is_empty() {
            if !result.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &result.warnings {
                match warn {
                    CheckWarning::WeekdayMismatch {
                        file,
                        line,
                        written,
                        actual,
                    } => {
                        println!("  {}:{} weekday is {} but the date is a {}", file, line, written, actual);
                    }
                    CheckWarning::NonCanonicalDate {
                        file,
                        line,
                        text,
                        canonical,
                    } => {
                        println!("  {}:{} {} is normally written {}", file, line, text, canonical);
                    }
                    CheckWarning::IgnoredDate { file, line, text } => {
                        println!("  {}:{} extra date ignored: {}", file, line, text);
                    }
                    CheckWarning::UnknownPriority { file, line, text } => {
                        println!("  {}:{} unknown priority: {}", file, line, text);
                    }
                    CheckWarning::UnterminatedGroup { file, line } => {
                        println!("  {}:{} unclosed bracket", file, line);
                    }
                }
            }
        }
        if result.valid {
            println!("✓ documents are valid");
        } else {
            println!("✗ documents have errors");
        }
    }
    Ok(())
}

fn cmd_flags(
    args: FlagsCmd,
    config: &Config,
    explicit: Option<&Path>,
    cwd: &Path,
    json: bool,
) -> CmdResult {
    match args.action {
        None => {
            let flags: Vec<&str> = config.flags.vocabulary.iter().collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&flags)?);
            } else {
                for flag in flags {
                    println!("{}", flag);
                }
            }
        }
        Some(FlagsAction::Add { name }) => {
            if tokenize(&name).len() != 1 || name.contains(['<', '[']) {
                return Err(format!("invalid flag '{}': must be a single word", name).into());
            }
            let path = config_io::config_path(explicit, cwd);
            let (_, mut doc) = config_io::read_config(&path)?;
            if config_io::add_flag(&mut doc, &name) {
                config_io::write_config(&path, &doc)?;
                println!("added {}", name);
            } else {
                println!("{} is already a flag", name);
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn direction(back: bool) -> Direction {
    if back { Direction::Backward } else { Direction::Forward }
}

fn edit_for(action: &EditAction, line: &str, config: &Config) -> Result<Option<LineEdit>, String> {
    let flags = &config.flags.vocabulary;
    Ok(match action {
        EditAction::ToggleFlag => line_ops::toggle_flag(line),
        EditAction::CycleFlag { back } => line_ops::cycle_flag(line, flags, direction(*back)),
        EditAction::CyclePriority { back } => {
            line_ops::cycle_priority_edit(line, flags, direction(*back))
        }
        EditAction::ShiftDate { days, at: Some(column) } => {
            line_ops::shift_date_at(line, *column, *days)
        }
        EditAction::ShiftDate { days, at: None } => tokenize(line)
            .iter()
            .find(|t| t.is_date())
            .and_then(|t| line_ops::offset_date(t, *days)),
        EditAction::Increment { column, delta } => line_ops::increment_at(line, *column, *delta),
        EditAction::SetDate { expr } => {
            let expr = expr.join(" ");
            let time = parse_date(&expr).ok_or_else(|| format!("invalid date expression '{}'", expr))?;
            line_ops::set_date(line, &time)
        }
    })
}

fn cmd_edit(args: EditArgs, config: &Config, json: bool) -> CmdResult {
    let mut doc = document_io::read_document(&args.file)?;
    let line = args
        .line
        .checked_sub(1)
        .and_then(|idx| doc.lines.get(idx))
        .ok_or_else(|| format!("{}: no line {}", args.file.display(), args.line))?;

    let edit = edit_for(&args.action, line, config)?
        .ok_or_else(|| format!("nothing to change on {}:{}", args.file.display(), args.line))?;
    let text = document_io::rewrite_line(&mut doc, args.line, &edit)?;

    if json {
        let out = EditJson {
            file: doc.name(),
            line: args.line,
            text,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Watch
// ---------------------------------------------------------------------------

fn cmd_watch(args: WatchArgs, config: &Config) -> CmdResult {
    // notify reports absolute paths, so index under the same names
    let root = std::fs::canonicalize(args.dir.as_deref().unwrap_or(Path::new(".")))?;
    let paths = PathsArgs {
        paths: vec![root.clone()],
    };
    let mut view = daily_view(args.date.as_deref(), None, None, config)?;

    let mut bus = AgendaBus::new();
    let rx = bus.subscribe();
    let mut index = load_index(&paths, config)?;
    let watcher = DocumentWatcher::start(&root, &config.files)?;
    bus.publish(AgendaEvent::OpenAgenda(None));

    loop {
        for event in watcher.wait(WATCH_TICK) {
            match event {
                FileEvent::Changed(changed) => {
                    // Some platforms report both ends of a rename as a change
                    let (present, gone): (Vec<_>, Vec<_>) =
                        changed.into_iter().partition(|p| p.exists());
                    if !gone.is_empty() {
                        for path in &gone {
                            index.remove_file(&display_name(path));
                        }
                        bus.publish(AgendaEvent::OpenAgenda(None));
                    }
                    for doc in document_io::read_all(&present) {
                        bus.publish(AgendaEvent::ReplaceTodos {
                            file: doc.name(),
                            todos: doc.todos(&config.flags.vocabulary),
                        });
                    }
                }
                FileEvent::Removed(removed) => {
                    for path in removed {
                        index.remove_file(&display_name(&path));
                    }
                    bus.publish(AgendaEvent::OpenAgenda(None));
                }
            }
        }

        let mut redraw = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                AgendaEvent::ReplaceTodos { file, todos } => {
                    index.replace_file(&file, todos);
                    redraw = true;
                }
                AgendaEvent::SetView(v) => {
                    view = v;
                    redraw = true;
                }
                AgendaEvent::OpenAgenda(v) => {
                    if let Some(v) = v {
                        view = v;
                    }
                    redraw = true;
                }
            }
        }

        if redraw {
            println!("--- {} ---", chrono::Local::now().format("%H:%M:%S"));
            print_agenda(&view, &index, false)?;
        }
    }
}
