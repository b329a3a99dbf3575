use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::model::config::FilesConfig;

/// Events sent from the file watcher to the agenda loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// One or more documents were created or modified.
    Changed(Vec<PathBuf>),
    /// One or more documents were removed.
    Removed(Vec<PathBuf>),
}

/// A file system watcher for a directory of outline documents.
pub struct DocumentWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

/// Whether `path` is a document worth re-scanning
fn is_document(path: &Path, root: &Path, files: &FilesConfig) -> bool {
    if !path.starts_with(root) {
        return false;
    }
    // Editor swap files and the like
    let hidden = path
        .strip_prefix(root)
        .map(|rel| {
            rel.components()
                .any(|c| c.as_os_str().to_str().is_some_and(|s| s.starts_with('.')))
        })
        .unwrap_or(true);
    !hidden && files.matches(path)
}

/// Turn a raw notify event into the events the loop cares about
fn classify(event: Event, root: &Path, files: &FilesConfig) -> Vec<FileEvent> {
    let relevant = |paths: Vec<PathBuf>| -> Vec<PathBuf> {
        paths
            .into_iter()
            .filter(|p| is_document(p, root, files))
            .collect()
    };

    let events = match event.kind {
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            vec![FileEvent::Removed(relevant(event.paths))]
        }
        // notify orders the paths of a paired rename as [from, to]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut paths = event.paths.into_iter();
            let from: Vec<PathBuf> = paths.next().into_iter().collect();
            vec![
                FileEvent::Removed(relevant(from)),
                FileEvent::Changed(relevant(paths.collect())),
            ]
        }
        EventKind::Create(_) | EventKind::Modify(_) => vec![FileEvent::Changed(relevant(event.paths))],
        _ => return Vec::new(),
    };

    events
        .into_iter()
        .filter(|e| match e {
            FileEvent::Changed(p) | FileEvent::Removed(p) => !p.is_empty(),
        })
        .collect()
}

impl DocumentWatcher {
    /// Start watching `root` recursively for documents with a configured
    /// extension. Call `poll()` or `wait()` to receive events.
    pub fn start(root: &Path, files: &FilesConfig) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let root_owned = root.to_path_buf();
        let files_owned = files.clone();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(e) => {
                        log::warn!("watch error: {}", e);
                        return;
                    }
                };
                for evt in classify(event, &root_owned, &files_owned) {
                    log::debug!("file event: {:?}", evt);
                    let _ = tx.send(evt);
                }
            },
            Config::default(),
        )?;

        watcher.watch(root, RecursiveMode::Recursive)?;
        log::info!("watching {}", root.display());
        Ok(DocumentWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll for pending file events.
    /// Returns all queued events (may be empty).
    pub fn poll(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Block up to `timeout` for the next event, then drain the rest
    pub fn wait(&self, timeout: Duration) -> Vec<FileEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(first) => {
                let mut events = vec![first];
                events.extend(self.poll());
                events
            }
            Err(_) => Vec::new(),
        }
    }
}
