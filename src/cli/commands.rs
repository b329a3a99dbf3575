use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "oa", about = concat!("orgenda v", env!("CARGO_PKG_VERSION"), " - agendas from plain-text outlines"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file to use instead of ./orgenda.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks found in documents
    List(ListArgs),
    /// Show the daily/weekly agenda
    Agenda(AgendaArgs),
    /// Show every open TODO, most urgent first
    Todo(PathsArgs),
    /// Show a month calendar
    Calendar(CalendarArgs),
    /// Parse a date expression and print its canonical form
    Date(DateArgs),
    /// Report malformed dates and priorities
    Check(PathsArgs),
    /// Rewrite one task line in place
    Edit(EditArgs),
    /// Re-print the agenda whenever documents change
    Watch(WatchArgs),
    /// List task flags, or add one to the config
    Flags(FlagsCmd),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct PathsArgs {
    /// Files or directories to scan (default: current directory)
    pub paths: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub paths: PathsArgs,
    /// Only tasks with this flag
    #[arg(long)]
    pub flag: Option<String>,
    /// Only tasks with this priority (A, B, C or #A, #B, #C)
    #[arg(long)]
    pub priority: Option<String>,
    /// Only tasks whose name matches this regex
    #[arg(long, value_name = "REGEX")]
    pub grep: Option<String>,
}

#[derive(Args)]
pub struct AgendaArgs {
    #[command(flatten)]
    pub paths: PathsArgs,
    /// Center day (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Days shown before the center day (default: from config)
    #[arg(long)]
    pub before: Option<u32>,
    /// Days shown after the center day (default: from config)
    #[arg(long)]
    pub after: Option<u32>,
}

#[derive(Args)]
pub struct CalendarArgs {
    #[command(flatten)]
    pub paths: PathsArgs,
    /// Month to show as YYYY-MM (default: this month)
    #[arg(long)]
    pub month: Option<String>,
}

#[derive(Args)]
pub struct DateArgs {
    /// Date expression, e.g. "2024-03-15 10:30 ++1w"
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub expr: Vec<String>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct EditArgs {
    /// Document to edit
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    #[command(subcommand)]
    pub action: EditAction,
}

#[derive(Subcommand)]
pub enum EditAction {
    /// Swap TODO and DONE
    ToggleFlag,
    /// Step the flag: none, TODO, DONE, none
    CycleFlag {
        /// Step backward instead
        #[arg(long)]
        back: bool,
    },
    /// Step the priority: none, A, B, C, none
    CyclePriority {
        /// Step backward instead
        #[arg(long)]
        back: bool,
    },
    /// Move the task's date by whole days
    ShiftDate {
        #[arg(allow_hyphen_values = true)]
        days: i64,
        /// Shift the date token at this column (0-based) instead of the first
        #[arg(long, value_name = "COLUMN")]
        at: Option<usize>,
    },
    /// Add to the number at a column inside a date, rolling over as needed
    Increment {
        /// Column (0-based) of a digit inside the date
        column: usize,
        #[arg(allow_hyphen_values = true, default_value_t = 1)]
        delta: i64,
    },
    /// Replace the task's date, or append one
    SetDate {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expr: Vec<String>,
    },
}

#[derive(Args)]
pub struct WatchArgs {
    /// Directory to watch (default: current directory)
    pub dir: Option<PathBuf>,
    /// Center day (default: today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct FlagsCmd {
    #[command(subcommand)]
    pub action: Option<FlagsAction>,
}

#[derive(Subcommand)]
pub enum FlagsAction {
    /// Add a flag to the vocabulary in the config file
    Add {
        name: String,
    },
}
