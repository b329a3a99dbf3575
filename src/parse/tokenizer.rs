use crate::model::token::{Token, TokenKind};
use crate::parse::date_parser::parse_date;
use crate::parse::span::CharSpan;

/// Scanner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InSquareBrackets,
    InAngleBrackets,
}

/// The token being accumulated. `kind` is provisional while a bracket group
/// is open and is settled when the group closes.
struct Pending {
    value: String,
    start: usize,
    kind: TokenKind,
}

impl Pending {
    fn new() -> Self {
        Pending {
            value: String::new(),
            start: 0,
            kind: TokenKind::Word,
        }
    }

    fn begin(&mut self, start: usize, kind: TokenKind) {
        self.value.clear();
        self.start = start;
        self.kind = kind;
    }

    /// Emit the pending token ending at `end` (exclusive), if it is non-empty
    fn flush(&mut self, end: usize, tokens: &mut Vec<Token>) {
        if self.value.is_empty() {
            return;
        }
        tokens.push(Token {
            value: std::mem::take(&mut self.value),
            kind: self.kind,
            span: CharSpan::new(self.start, end),
        });
        self.kind = TokenKind::Word;
    }
}

pub(crate) fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Split one line into words, keeping `[...]` and `<...>` groups whole.
///
/// A `<...>` group is always a date. A `[...]` group is a date if its content
/// parses as one, otherwise a priority. A group still open at the end of the
/// line is dropped.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pending = Pending::new();
    let mut state = State::Normal;
    let mut len = 0;

    for (i, c) in line.chars().enumerate() {
        len = i + 1;
        match state {
            State::Normal => {
                if is_separator(c) {
                    pending.flush(i, &mut tokens);
                    continue;
                }
                match c {
                    '[' => {
                        pending.flush(i, &mut tokens);
                        pending.begin(i, TokenKind::Priority);
                        state = State::InSquareBrackets;
                    }
                    '<' => {
                        pending.flush(i, &mut tokens);
                        pending.begin(i, TokenKind::Date);
                        state = State::InAngleBrackets;
                    }
                    _ if pending.value.is_empty() => pending.begin(i, TokenKind::Word),
                    _ => {}
                }
                pending.value.push(c);
            }
            State::InSquareBrackets => {
                pending.value.push(c);
                if c == ']' {
                    pending.kind = if parse_date(&pending.value).is_some() {
                        TokenKind::Date
                    } else {
                        TokenKind::Priority
                    };
                    pending.flush(i + 1, &mut tokens);
                    state = State::Normal;
                }
            }
            State::InAngleBrackets => {
                pending.value.push(c);
                if c == '>' {
                    pending.flush(i + 1, &mut tokens);
                    state = State::Normal;
                }
            }
        }
    }

    if state == State::Normal {
        pending.flush(len, &mut tokens);
    } else {
        log::trace!("dropping unterminated group {:?}", pending.value);
    }

    tokens
}

/// Whether `line` ends inside an unterminated bracket group
pub fn has_unterminated_group(line: &str) -> bool {
    let mut closer = None;
    for c in line.chars() {
        match closer {
            None => match c {
                '[' => closer = Some(']'),
                '<' => closer = Some('>'),
                _ => {}
            },
            Some(close) if c == close => closer = None,
            Some(_) => {}
        }
    }
    closer.is_some()
}
