use indexmap::IndexMap;

use crate::model::todo::TodoItem;

/// Todos grouped by the file they were extracted from.
///
/// Files keep the order in which they were first seen. Replacing a file's
/// todos discards everything previously recorded for it.
#[derive(Debug, Default, Clone)]
pub struct TodoIndex {
    files: IndexMap<String, Vec<TodoItem>>,
    /// Flattened view, rebuilt on every change
    all: Vec<TodoItem>,
}

impl TodoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last writer wins: `todos` become the only records for `file`
    pub fn replace_file(&mut self, file: &str, todos: Vec<TodoItem>) {
        log::debug!("index: {} now has {} todos", file, todos.len());
        self.files.insert(file.to_string(), todos);
        self.rebuild();
    }

    /// Forget a file. Returns its todos if it was indexed.
    pub fn remove_file(&mut self, file: &str) -> Option<Vec<TodoItem>> {
        let removed = self.files.shift_remove(file);
        if removed.is_some() {
            log::debug!("index: dropped {}", file);
            self.rebuild();
        }
        removed
    }

    /// Every indexed todo, grouped by file in first-seen order
    pub fn todos(&self) -> &[TodoItem] {
        &self.all
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn file_todos(&self, file: &str) -> Option<&[TodoItem]> {
        self.files.get(file).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    fn rebuild(&mut self) {
        self.all = self.files.values().flatten().cloned().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::todo_parser::extract_document;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_replace_is_last_writer_wins() {
        let mut index = TodoIndex::new();
        index.replace_file("a.md", extract_document(&["* TODO one", "* TODO two"], "a.md"));
        assert_eq!(index.len(), 2);

        index.replace_file("a.md", extract_document(&["* DONE three"], "a.md"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.todos()[0].name, "three");
    }

    #[test]
    fn test_files_keep_first_seen_order() {
        let mut index = TodoIndex::new();
        index.replace_file("b.md", extract_document(&["* TODO b"], "b.md"));
        index.replace_file("a.md", extract_document(&["* TODO a"], "a.md"));
        index.replace_file("b.md", extract_document(&["* TODO b2"], "b.md"));

        assert_eq!(index.files().collect::<Vec<_>>(), vec!["b.md", "a.md"]);
        let names: Vec<&str> = index.todos().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["b2", "a"]);
    }

    #[test]
    fn test_remove_file() {
        let mut index = TodoIndex::new();
        index.replace_file("a.md", extract_document(&["* TODO a"], "a.md"));
        index.replace_file("b.md", extract_document(&["* TODO b"], "b.md"));

        let removed = index.remove_file("a.md").unwrap();
        assert_eq!(removed.len(), 1);
        assert!(index.file_todos("a.md").is_none());
        assert_eq!(index.len(), 1);
        assert!(index.remove_file("missing.md").is_none());
    }

    #[test]
    fn test_empty_replacement_keeps_file_known() {
        let mut index = TodoIndex::new();
        index.replace_file("a.md", Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.file_todos("a.md"), Some(&[][..]));
    }
}
