pub mod date_parser;
pub mod date_serializer;
pub mod span;
pub mod todo_parser;
pub mod tokenizer;

pub use date_parser::{parse_date, parse_date_draft};
pub use date_serializer::format_date;
pub use todo_parser::{extract, extract_document, extract_text};
pub use tokenizer::tokenize;
