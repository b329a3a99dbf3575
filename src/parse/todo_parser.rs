use crate::model::todo::{FlagVocabulary, Location, MARKER, TodoItem};
use crate::model::token::{Token, TokenKind};
use crate::parse::date_parser::{parse_date, strip_brackets};
use crate::parse::tokenizer::tokenize;

/// Parse one line as a task using the default flag vocabulary.
/// The location line is left at 0; see [`extract_document`].
pub fn extract(line: &str) -> Option<TodoItem> {
    extract_with(line, &FlagVocabulary::default())
}

/// Parse one line as a task: `* FLAG [#P] words <date> words`.
///
/// Returns `None` for anything that is not a marker followed by a known flag.
pub fn extract_with(line: &str, flags: &FlagVocabulary) -> Option<TodoItem> {
    let tokens = tokenize(line);
    let flag = task_flag(&tokens, flags)?;

    let mut words = Vec::new();
    let mut date = None;
    let mut date_seen = false;
    let mut priority = None;

    for token in &tokens[2..] {
        match token.kind {
            TokenKind::Word => words.push(token.value.as_str()),
            TokenKind::Date => {
                // Only the first date token counts, even when it fails to parse
                if !date_seen {
                    date_seen = true;
                    date = parse_date(&token.value);
                }
            }
            TokenKind::Priority => {
                priority = Some(strip_brackets(&token.value).to_string());
            }
        }
    }

    Some(TodoItem {
        flag: flag.to_string(),
        name: words.join(" "),
        location: Location {
            file: String::new(),
            line: 0,
        },
        date,
        priority,
    })
}

/// The flag of a task line's tokens, if the line is a task line
pub fn task_flag<'a>(tokens: &'a [Token], flags: &FlagVocabulary) -> Option<&'a str> {
    match tokens {
        [marker, flag, ..] if marker.value == MARKER && flags.contains(&flag.value) => {
            Some(flag.value.as_str())
        }
        _ => None,
    }
}

/// Extract every task of a document, in line order, with 1-based line numbers
pub fn extract_document<S: AsRef<str>>(lines: &[S], file: &str) -> Vec<TodoItem> {
    extract_document_with(lines, file, &FlagVocabulary::default())
}

pub fn extract_document_with<S: AsRef<str>>(
    lines: &[S],
    file: &str,
    flags: &FlagVocabulary,
) -> Vec<TodoItem> {
    let todos: Vec<TodoItem> = lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let mut todo = extract_with(line.as_ref(), flags)?;
            todo.location = Location {
                file: file.to_string(),
                line: idx + 1,
            };
            log::trace!("{}:{} {} {:?}", file, idx + 1, todo.flag, todo.name);
            Some(todo)
        })
        .collect();
    log::debug!("extracted {} todos from {} lines of {}", todos.len(), lines.len(), file);
    todos
}

/// Extract from raw file contents, splitting on `\n` only
pub fn extract_text(contents: &str, file: &str, flags: &FlagVocabulary) -> Vec<TodoItem> {
    let lines: Vec<&str> = contents.split('\n').collect();
    extract_document_with(&lines, file, flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_full_line() {
        let todo = extract("* TODO [#A] Buy milk <2024-03-15>").unwrap();
        assert_eq!(todo.flag, "TODO");
        assert_eq!(todo.name, "Buy milk");
        assert_eq!(todo.priority.as_deref(), Some("#A"));
        assert_eq!(
            todo.date.unwrap().day(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_extract_rejects_non_task_lines() {
        assert!(extract("Just a note").is_none());
        assert!(extract("* NOTASTATE text").is_none());
        assert!(extract("*").is_none());
        assert!(extract("- TODO dash marker").is_none());
        assert!(extract("*TODO no space").is_none());
    }

    #[test]
    fn test_extract_minimal() {
        let todo = extract("* DONE").unwrap();
        assert_eq!(todo.flag, "DONE");
        assert_eq!(todo.name, "");
        assert_eq!(todo.date, None);
        assert_eq!(todo.priority, None);
    }

    #[test]
    fn test_mixed_order_tokens() {
        let todo = extract("* WAITING <2024-03-15 10:00> reply [#C] from Bob").unwrap();
        assert_eq!(todo.name, "reply from Bob");
        assert_eq!(todo.priority.as_deref(), Some("#C"));
        assert!(todo.date.unwrap().has_time_of_day);
    }

    #[test]
    fn test_invalid_priority_content_kept_verbatim() {
        let todo = extract("* TODO [foo] thing").unwrap();
        assert_eq!(todo.priority.as_deref(), Some("foo"));
    }

    #[test]
    fn test_unparseable_date_token_is_absent() {
        let todo = extract("* TODO thing <someday>").unwrap();
        assert_eq!(todo.date, None);
        assert_eq!(todo.name, "thing");
    }

    #[test]
    fn test_first_date_token_wins() {
        let todo = extract("* TODO a <2024-01-01> b <2024-02-02>").unwrap();
        assert_eq!(
            todo.date.unwrap().day(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(todo.name, "a b");
    }

    #[test]
    fn test_square_date_is_date_not_priority() {
        let todo = extract("* SCHEDULED review [2024-03-15 Fri]").unwrap();
        assert_eq!(todo.priority, None);
        assert!(todo.date.is_some());
    }

    #[test]
    fn test_custom_vocabulary() {
        let flags = FlagVocabulary::new(["NEXT"]);
        assert!(extract_with("* NEXT call", &flags).is_some());
        assert!(extract_with("* TODO call", &flags).is_none());
    }

    #[test]
    fn test_extract_document_locations() {
        let lines = [
            "# Groceries",
            "* TODO Buy milk",
            "some prose",
            "* DONE Buy eggs <2024-03-14>",
            "",
        ];
        let todos = extract_document(&lines, "notes/shop.md");
        assert_eq!(todos.len(), 2);
        assert_eq!(
            todos[0].location,
            Location {
                file: "notes/shop.md".to_string(),
                line: 2,
            }
        );
        assert_eq!(todos[1].location.line, 4);
        assert_eq!(todos[1].name, "Buy eggs");
    }

    #[test]
    fn test_extract_document_is_idempotent() {
        let text = "* TODO a <2024-01-01 ++1w>\n* DONE [#B] b\nnot a task\n";
        let flags = FlagVocabulary::default();
        let first = extract_text(text, "a.md", &flags);
        let second = extract_text(text, "a.md", &flags);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_extract_text_handles_crlf() {
        let todos = extract_text("* TODO one\r\n* TODO two\r\n", "w.md", &FlagVocabulary::default());
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].name, "one");
        assert_eq!(todos[1].location.line, 2);
    }
}
