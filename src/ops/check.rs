use chrono::{Datelike, Weekday};
use serde::Serialize;

use crate::model::todo::FlagVocabulary;
use crate::ops::priority::Priority;
use crate::parse::date_parser::{WEEKDAYS, parse_date_draft, strip_brackets};
use crate::parse::date_serializer::format_date;
use crate::parse::todo_parser::task_flag;
use crate::parse::tokenizer::{has_unterminated_group, tokenize};

/// Structured result from `oa check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

impl CheckResult {
    /// Fold another file's result into this one
    pub fn merge(&mut self, other: CheckResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.valid = self.errors.is_empty();
    }
}

/// A problem that loses information: the task will show up without its date.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// A date-shaped token that does not parse
    #[serde(rename = "bad_date")]
    BadDate {
        file: String,
        line: usize,
        text: String,
    },
}

/// A validation warning (non-critical issue).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Written weekday disagrees with the date
    #[serde(rename = "weekday_mismatch")]
    WeekdayMismatch {
        file: String,
        line: usize,
        written: String,
        actual: String,
    },
    /// Date parses but is not in canonical form
    #[serde(rename = "non_canonical_date")]
    NonCanonicalDate {
        file: String,
        line: usize,
        text: String,
        canonical: String,
    },
    /// Only the first date of a line is used
    #[serde(rename = "ignored_date")]
    IgnoredDate {
        file: String,
        line: usize,
        text: String,
    },
    /// Bracket content that is neither a date nor `#A`/`#B`/`#C`
    #[serde(rename = "unknown_priority")]
    UnknownPriority {
        file: String,
        line: usize,
        text: String,
    },
    /// A `[` or `<` that is never closed; its text is dropped
    #[serde(rename = "unterminated_group")]
    UnterminatedGroup { file: String, line: usize },
}

fn weekday_name(w: Weekday) -> String {
    WEEKDAYS[w.num_days_from_sunday() as usize].to_string()
}

/// Check the task lines of one document.
///
/// This is a read-only operation. Lines that are not task lines are skipped.
pub fn check_document<S: AsRef<str>>(
    lines: &[S],
    file: &str,
    flags: &FlagVocabulary,
) -> CheckResult {
    let mut result = CheckResult::default();

    for (idx, line) in lines.iter().enumerate() {
        check_line(line.as_ref(), file, idx + 1, flags, &mut result);
    }

    result.valid = result.errors.is_empty();
    result
}

fn check_line(
    line: &str,
    file: &str,
    line_no: usize,
    flags: &FlagVocabulary,
    result: &mut CheckResult,
) {
    let tokens = tokenize(line);
    if task_flag(&tokens, flags).is_none() {
        return;
    }

    if has_unterminated_group(line) {
        result.warnings.push(CheckWarning::UnterminatedGroup {
            file: file.to_string(),
            line: line_no,
        });
    }

    let mut date_seen = false;
    for token in &tokens[2..] {
        if token.is_priority() {
            if Priority::from_tag(strip_brackets(&token.value)).is_none() {
                result.warnings.push(CheckWarning::UnknownPriority {
                    file: file.to_string(),
                    line: line_no,
                    text: token.value.clone(),
                });
            }
            continue;
        }
        if !token.is_date() {
            continue;
        }

        if date_seen {
            result.warnings.push(CheckWarning::IgnoredDate {
                file: file.to_string(),
                line: line_no,
                text: token.value.clone(),
            });
            continue;
        }
        date_seen = true;

        let Some(draft) = parse_date_draft(&token.value) else {
            result.errors.push(CheckError::BadDate {
                file: file.to_string(),
                line: line_no,
                text: token.value.clone(),
            });
            continue;
        };

        // Well-formed, but the clock pushes it out of range
        let Some(time) = draft.finish() else {
            result.errors.push(CheckError::BadDate {
                file: file.to_string(),
                line: line_no,
                text: token.value.clone(),
            });
            continue;
        };

        if let Some(written) = draft.weekday.filter(|_| draft.weekday_mismatch()) {
            result.warnings.push(CheckWarning::WeekdayMismatch {
                file: file.to_string(),
                line: line_no,
                written: weekday_name(written),
                actual: weekday_name(draft.date.weekday()),
            });
        } else {
            let canonical = format_date(&time);
            if canonical != token.value {
                result.warnings.push(CheckWarning::NonCanonicalDate {
                    file: file.to_string(),
                    line: line_no,
                    text: token.value.clone(),
                    canonical,
                });
            }
        }
    }
}
