//! Single-line rewrites behind the editing commands.
//!
//! Nothing here touches a buffer. Each function inspects one line and returns
//! a [`LineEdit`] in character offsets; the host applies it.

use serde::Serialize;

use crate::model::time::Time;
use crate::model::todo::{Direction, FlagState, FlagVocabulary, MARKER};
use crate::model::token::Token;
use crate::ops::priority::{Priority, cycle_priority};
use crate::parse::date_parser::{parse_date, strip_brackets};
use crate::parse::date_serializer::format_date;
use crate::parse::span::CharSpan;
use crate::parse::todo_parser::task_flag;
use crate::parse::tokenizer::{is_separator, tokenize};

/// Replace the characters in `span` with `replacement`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineEdit {
    pub span: CharSpan,
    pub replacement: String,
}

impl LineEdit {
    pub fn new(span: CharSpan, replacement: impl Into<String>) -> Self {
        LineEdit {
            span,
            replacement: replacement.into(),
        }
    }

    pub fn apply(&self, line: &str) -> String {
        let range = self.span.byte_range(line);
        let mut out = String::with_capacity(line.len() + self.replacement.len());
        out.push_str(&line[..range.start]);
        out.push_str(&self.replacement);
        out.push_str(&line[range.end..]);
        out
    }
}

/// The token whose span contains `cursor`
pub fn token_at(tokens: &[Token], cursor: usize) -> Option<&Token> {
    tokens.iter().find(|t| t.span.contains(cursor))
}

fn starts_with_marker(tokens: &[Token]) -> bool {
    tokens.first().is_some_and(|t| t.value == MARKER)
}

/// Swap `TODO` and `DONE` on a task line
pub fn toggle_flag(line: &str) -> Option<LineEdit> {
    let tokens = tokenize(line);
    if !starts_with_marker(&tokens) {
        return None;
    }
    let flag = tokens.get(1)?;
    let replacement = match flag.value.as_str() {
        "TODO" => "DONE",
        "DONE" => "TODO",
        _ => return None,
    };
    Some(LineEdit::new(flag.span, replacement))
}

/// Step the flag of a marker line through [`FlagState`].
///
/// Removing a flag also removes the whitespace after it, or the whitespace
/// before it when nothing follows. Adding one to an unflagged line inserts it
/// right after the marker.
pub fn cycle_flag(line: &str, flags: &FlagVocabulary, direction: Direction) -> Option<LineEdit> {
    let tokens = tokenize(line);
    if !starts_with_marker(&tokens) {
        return None;
    }
    let current = tokens.get(1).filter(|t| flags.contains(&t.value));
    let next = FlagState::from_flag(current.map(|t| t.value.as_str())).next(direction);

    match (current, next.word()) {
        (Some(token), Some(word)) => Some(LineEdit::new(token.span, word)),
        (Some(token), None) => {
            let end = skip_blank_forward(line, token.span.end);
            let start = if end >= line.chars().count() {
                skip_blank_backward(line, token.span.start)
            } else {
                token.span.start
            };
            Some(LineEdit::new(CharSpan::new(start, end), ""))
        }
        (None, Some(word)) => Some(LineEdit::new(
            CharSpan::at(tokens[0].span.end),
            format!(" {}", word),
        )),
        (None, None) => None,
    }
}

/// Step the first priority token through the none/A/B/C cycle.
///
/// Dropping to no priority removes the token and collapses the spaces around
/// it. A task line without a priority token gets one after its flag.
pub fn cycle_priority_edit(
    line: &str,
    flags: &FlagVocabulary,
    direction: Direction,
) -> Option<LineEdit> {
    let tokens = tokenize(line);

    if let Some(token) = tokens.iter().find(|t| t.is_priority()) {
        let current = Priority::from_tag(strip_brackets(&token.value));
        return Some(match cycle_priority(current, direction) {
            Some(p) => LineEdit::new(token.span, format!("[{}]", p.tag())),
            None => {
                let start = skip_blank_backward(line, token.span.start);
                let end = skip_blank_forward(line, token.span.end);
                let replacement = if end >= line.chars().count() || start == 0 {
                    ""
                } else {
                    " "
                };
                LineEdit::new(CharSpan::new(start, end), replacement)
            }
        });
    }

    task_flag(&tokens, flags)?;
    let inserted = cycle_priority(None, direction)?;
    Some(LineEdit::new(
        CharSpan::at(tokens[1].span.end),
        format!(" [{}]", inserted.tag()),
    ))
}

fn skip_blank_forward(line: &str, from: usize) -> usize {
    from + line.chars().skip(from).take_while(|&c| is_separator(c)).count()
}

fn skip_blank_backward(line: &str, from: usize) -> usize {
    let before: Vec<char> = line.chars().take(from).collect();
    from - before.iter().rev().take_while(|&&c| is_separator(c)).count()
}

/// Move a date token by whole days and rewrite it in canonical form.
///
/// # Panics
///
/// If `token` is not a date token. Passing any other token is a caller bug.
pub fn offset_date(token: &Token, days: i64) -> Option<LineEdit> {
    assert!(
        token.is_date(),
        "offset_date called on {:?} token {:?}",
        token.kind,
        token.value
    );
    let time = parse_date(&token.value)?;
    Some(LineEdit::new(
        token.span,
        format_date(&time.shift_by_days(days)),
    ))
}

/// Move the date under the cursor by whole days
pub fn shift_date_at(line: &str, cursor: usize, days: i64) -> Option<LineEdit> {
    let tokens = tokenize(line);
    let token = token_at(&tokens, cursor).filter(|t| t.is_date())?;
    offset_date(token, days)
}

/// Add `delta` to the number under the cursor inside a date token, then
/// rewrite the token canonically so overflow rolls into the next unit
/// (day 31 + 1 becomes the 1st of the next month).
pub fn increment_at(line: &str, cursor: usize, delta: i64) -> Option<LineEdit> {
    let tokens = tokenize(line);
    let token = token_at(&tokens, cursor).filter(|t| t.is_date())?;
    let chars: Vec<char> = line.chars().collect();

    let mut start = cursor;
    let mut end = cursor;
    while start > token.span.start && chars[start - 1].is_ascii_digit() {
        start -= 1;
    }
    while end < token.span.end && chars[end].is_ascii_digit() {
        end += 1;
    }
    if start == end {
        return None;
    }

    let digits: String = chars[start..end].iter().collect();
    let number = digits.parse::<i64>().ok()?.checked_add(delta)?;

    let mut edited: String = chars[token.span.start..start].iter().collect();
    edited.push_str(&number.to_string());
    edited.extend(&chars[end..token.span.end]);

    let time = parse_date(&edited)?;
    Some(LineEdit::new(token.span, format_date(&time)))
}

/// Set the date of a task line: replace its first date token, or append one
pub fn set_date(line: &str, time: &Time) -> Option<LineEdit> {
    let tokens = tokenize(line);
    if !starts_with_marker(&tokens) {
        return None;
    }
    let formatted = format_date(time);

    if let Some(token) = tokens.iter().find(|t| t.is_date()) {
        return Some(LineEdit::new(token.span, formatted));
    }

    let len = line.chars().count();
    let replacement = if line.ends_with(' ') {
        formatted
    } else {
        format!(" {}", formatted)
    };
    Some(LineEdit::new(CharSpan::at(len), replacement))
}

/// The parsed first date of a marker line
pub fn task_date(line: &str) -> Option<Time> {
    let tokens = tokenize(line);
    if !starts_with_marker(&tokens) {
        return None;
    }
    let token = tokens.iter().find(|t| t.is_date())?;
    parse_date(&token.value)
}
