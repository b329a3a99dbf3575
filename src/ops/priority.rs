use std::cmp::Ordering;

use crate::model::todo::Direction;

/// Ascending urgency. `D` is accepted as an explicit lowest priority.
const PRIORITY_ORDER: [&str; 4] = ["D", "#C", "#B", "#A"];

/// A recognized priority tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    A,
    B,
    C,
}

impl Priority {
    /// Parse bracket content such as `#A`
    pub fn from_tag(tag: &str) -> Option<Priority> {
        match tag {
            "#A" => Some(Priority::A),
            "#B" => Some(Priority::B),
            "#C" => Some(Priority::C),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Priority::A => "#A",
            Priority::B => "#B",
            Priority::C => "#C",
        }
    }
}

fn rank(priority: Option<&str>) -> i32 {
    priority
        .and_then(|p| PRIORITY_ORDER.iter().position(|&o| o == p))
        .map_or(-1, |i| i as i32)
}

/// Positive if `a` is more urgent than `b`, negative if less, zero if equal.
/// Absent and unrecognized priorities rank lowest.
pub fn priority_cmp(a: Option<&str>, b: Option<&str>) -> i32 {
    rank(a) - rank(b)
}

/// `priority_cmp` as an `Ordering`, for sorting
pub fn priority_ordering(a: Option<&str>, b: Option<&str>) -> Ordering {
    rank(a).cmp(&rank(b))
}

/// The 4-cycle `none → A → B → C → none`, or its reverse going backward
pub fn cycle_priority(current: Option<Priority>, direction: Direction) -> Option<Priority> {
    match (current, direction) {
        (None, Direction::Forward) => Some(Priority::A),
        (Some(Priority::A), Direction::Forward) => Some(Priority::B),
        (Some(Priority::B), Direction::Forward) => Some(Priority::C),
        (Some(Priority::C), Direction::Forward) => None,
        (None, Direction::Backward) => Some(Priority::C),
        (Some(Priority::C), Direction::Backward) => Some(Priority::B),
        (Some(Priority::B), Direction::Backward) => Some(Priority::A),
        (Some(Priority::A), Direction::Backward) => None,
    }
}
