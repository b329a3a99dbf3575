use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::config::FilesConfig;
use crate::model::todo::{FlagVocabulary, TodoItem};
use crate::ops::line_ops::LineEdit;
use crate::parse::todo_parser::extract_document_with;

/// Error type for reading and rewriting documents
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("{path}: no line {line} (document has {len} lines)")]
    NoSuchLine {
        path: PathBuf,
        line: usize,
        len: usize,
    },
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

/// A document read from disk, split into lines on `\n`
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

/// Path as shown in todo locations, without a leading `./`
pub fn display_name(path: &Path) -> String {
    path.strip_prefix(".").unwrap_or(path).display().to_string()
}

impl Document {
    pub fn name(&self) -> String {
        display_name(&self.path)
    }

    pub fn todos(&self, flags: &FlagVocabulary) -> Vec<TodoItem> {
        extract_document_with(&self.lines, &self.name(), flags)
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

pub fn read_document(path: &Path) -> Result<Document, DocumentError> {
    let text = fs::read_to_string(path).map_err(|e| DocumentError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Document {
        path: path.to_path_buf(),
        lines: text.split('\n').map(str::to_string).collect(),
    })
}

/// Expand the given paths into the documents to scan.
///
/// Files are taken as given. Directories are walked recursively, keeping
/// files whose extension is configured; hidden entries are skipped. The
/// result is sorted and free of duplicates.
pub fn collect_files(paths: &[PathBuf], files: &FilesConfig) -> Result<Vec<PathBuf>, DocumentError> {
    let mut found = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_dir(path, files, &mut found)?;
        } else if path.exists() {
            found.push(path.clone());
        } else {
            return Err(DocumentError::ReadError {
                path: path.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
            });
        }
    }
    found.sort();
    found.dedup();
    log::debug!("collected {} documents", found.len());
    Ok(found)
}

fn walk_dir(dir: &Path, files: &FilesConfig, found: &mut Vec<PathBuf>) -> Result<(), DocumentError> {
    let entries = fs::read_dir(dir).map_err(|e| DocumentError::ReadError {
        path: dir.to_path_buf(),
        source: e,
    })?;
    for entry in entries {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if hidden {
            continue;
        }
        if path.is_dir() {
            walk_dir(&path, files, found)?;
        } else if files.matches(&path) {
            found.push(path);
        } else {
            log::trace!("skipping {}", path.display());
        }
    }
    Ok(())
}

/// Read every path, skipping (with a warning) files that cannot be read
pub fn read_all(paths: &[PathBuf]) -> Vec<Document> {
    paths
        .iter()
        .filter_map(|path| match read_document(path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Apply `edit` to the 1-based `line` of `doc` and write the whole document
/// back to its path. The edit lands on the text `doc` holds, whatever the
/// file contains now. Returns the new line.
pub fn rewrite_line(doc: &mut Document, line: usize, edit: &LineEdit) -> Result<String, DocumentError> {
    let path = doc.path.clone();
    let len = doc.lines.len();
    let target = line
        .checked_sub(1)
        .and_then(|idx| doc.lines.get_mut(idx))
        .ok_or_else(|| DocumentError::NoSuchLine {
            path: path.clone(),
            line,
            len,
        })?;

    let updated = edit.apply(target);
    target.clone_from(&updated);
    atomic_write(&path, doc.text().as_bytes()).map_err(|e| DocumentError::WriteError {
        path: path.clone(),
        source: e,
    })?;
    log::info!("{}:{} rewritten", path.display(), line);
    Ok(updated)
}
