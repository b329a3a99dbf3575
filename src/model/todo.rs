use serde::{Deserialize, Serialize};

use super::time::Time;

/// The character that starts every task line
pub const MARKER: &str = "*";

/// Flags recognized when no configuration overrides them
pub const DEFAULT_FLAGS: [&str; 9] = [
    "TODO",
    "DONE",
    "WAITING",
    "CANCELLED",
    "SCHEDULED",
    "DEADLINE",
    "CLOSED",
    "BLOCKED",
    "POSTPONED",
];

/// Where a task was found
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    /// 1-based line number
    pub line: usize,
}

/// A task extracted from one outline line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub flag: String,
    pub name: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Time>,
    /// Bracket content of the priority token, e.g. `#A`. Not validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// The set of words accepted as a task flag. Order does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagVocabulary(Vec<String>);

impl FlagVocabulary {
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FlagVocabulary(flags.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.iter().any(|f| f == word)
    }

    /// Add a flag; returns false if it was already present
    pub fn insert(&mut self, flag: &str) -> bool {
        if self.contains(flag) {
            return false;
        }
        self.0.push(flag.to_string());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }
}

impl Default for FlagVocabulary {
    fn default() -> Self {
        FlagVocabulary::new(DEFAULT_FLAGS)
    }
}

/// Direction for the cycling commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Flag state as seen by the cycle command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagState {
    /// A marker line without a flag
    Unflagged,
    Todo,
    Done,
    /// Any other vocabulary flag (WAITING, BLOCKED, ...)
    Other,
}

impl FlagState {
    pub fn from_flag(flag: Option<&str>) -> FlagState {
        match flag {
            None => FlagState::Unflagged,
            Some("TODO") => FlagState::Todo,
            Some("DONE") => FlagState::Done,
            Some(_) => FlagState::Other,
        }
    }

    /// Transition table: forward `Unflagged → Todo → Done → Unflagged`,
    /// backward the reverse. `Other` enters the cycle at `Todo` going forward
    /// and at `Done` going backward.
    pub fn next(self, direction: Direction) -> FlagState {
        match (self, direction) {
            (FlagState::Unflagged, Direction::Forward) => FlagState::Todo,
            (FlagState::Todo, Direction::Forward) => FlagState::Done,
            (FlagState::Done, Direction::Forward) => FlagState::Unflagged,
            (FlagState::Other, Direction::Forward) => FlagState::Todo,
            (FlagState::Unflagged, Direction::Backward) => FlagState::Done,
            (FlagState::Todo, Direction::Backward) => FlagState::Unflagged,
            (FlagState::Done, Direction::Backward) => FlagState::Todo,
            (FlagState::Other, Direction::Backward) => FlagState::Done,
        }
    }

    /// The flag word written for this state, if any
    pub fn word(self) -> Option<&'static str> {
        match self {
            FlagState::Todo => Some("TODO"),
            FlagState::Done => Some("DONE"),
            FlagState::Unflagged | FlagState::Other => None,
        }
    }
}
