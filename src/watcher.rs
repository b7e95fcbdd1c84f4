//! File system watcher for watch mode

use crate::config::DEFAULT_EXTENSIONS;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

const DEBOUNCE_MS: u64 = 300;

/// Directories that never hold drafts
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules"];

/// Watches a draft file or directory and emits changed draft paths
pub struct DraftWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<notify::Event>>,
    extensions: Vec<String>,
    /// Set when watching a single file; other files in its directory are ignored
    only: Option<PathBuf>,
}

fn is_create_or_modify(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

impl DraftWatcher {
    /// Start watching with the default draft extensions
    pub fn watch(path: &Path) -> notify::Result<Self> {
        let extensions: Vec<String> = DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
        Self::watch_with_extensions(path, &extensions)
    }

    /// Start watching the given path (file or directory)
    pub fn watch_with_extensions(path: &Path, extensions: &[String]) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default().with_poll_interval(Duration::from_millis(DEBOUNCE_MS)),
        )?;

        let only = if path.is_dir() {
            watcher.watch(path, RecursiveMode::Recursive)?;
            None
        } else {
            let parent = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
            Some(path.to_path_buf())
        };

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            extensions: extensions.to_vec(),
            only,
        })
    }

    /// Check if the path is a draft we care about
    pub fn is_draft_file(p: &Path, extensions: &[String]) -> bool {
        let Some(name) = p.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if p
            .components()
            .any(|c| SKIPPED_DIRS.iter().any(|d| c.as_os_str() == *d))
        {
            return false;
        }
        let name = name.to_lowercase();
        extensions
            .iter()
            .any(|ext| name.ends_with(&ext.to_lowercase()))
    }

    fn wanted(&self, p: &Path) -> bool {
        match &self.only {
            Some(only) => p.file_name() == only.file_name(),
            None => Self::is_draft_file(p, &self.extensions),
        }
    }

    fn collect_event(&self, event: &notify::Event, into: &mut HashSet<PathBuf>) {
        if !is_create_or_modify(&event.kind) {
            return;
        }
        into.extend(event.paths.iter().filter(|p| self.wanted(p)).cloned());
    }

    /// Wait for the next batch of changes (debounced). Blocks until at least one change, then drains for DEBOUNCE_MS.
    pub fn next_changes(&self) -> Vec<PathBuf> {
        let mut all = HashSet::new();

        match self.receiver.recv_timeout(Duration::from_secs(3600)) {
            Ok(Ok(event)) => self.collect_event(&event, &mut all),
            Ok(Err(e)) => {
                tracing::warn!("watch error: {}", e);
                return vec![];
            }
            Err(_) => return vec![],
        }

        // Debounce: collect further events for a short time
        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS));
        while let Ok(ev) = self.receiver.try_recv() {
            if let Ok(event) = ev {
                self.collect_event(&event, &mut all);
            }
        }

        let mut paths: Vec<PathBuf> = all.into_iter().collect();
        paths.sort();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};

    fn defaults() -> Vec<String> {
        DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_is_draft_file_default_extensions() {
        let ext = defaults();
        assert!(DraftWatcher::is_draft_file(Path::new("post.txt"), &ext));
        assert!(DraftWatcher::is_draft_file(Path::new("thread.md"), &ext));
        assert!(DraftWatcher::is_draft_file(Path::new("notes.markdown"), &ext));
        assert!(DraftWatcher::is_draft_file(Path::new("launch.post"), &ext));
        assert!(DraftWatcher::is_draft_file(Path::new("LOUD.TXT"), &ext));
    }

    #[test]
    fn test_is_draft_file_non_drafts() {
        let ext = defaults();
        assert!(!DraftWatcher::is_draft_file(Path::new("main.rs"), &ext));
        assert!(!DraftWatcher::is_draft_file(Path::new("package.json"), &ext));
        assert!(!DraftWatcher::is_draft_file(Path::new(""), &ext));
    }

    #[test]
    fn test_skipped_directories() {
        let ext = defaults();
        assert!(!DraftWatcher::is_draft_file(
            Path::new("node_modules/pkg/README.md"),
            &ext
        ));
        assert!(!DraftWatcher::is_draft_file(
            Path::new("repo/.git/COMMIT_EDITMSG.txt"),
            &ext
        ));
    }

    #[test]
    fn test_custom_extensions() {
        let ext = vec![".draft".to_string()];
        assert!(DraftWatcher::is_draft_file(Path::new("a.draft"), &ext));
        assert!(!DraftWatcher::is_draft_file(Path::new("a.txt"), &ext));
    }

    #[test]
    fn test_is_create_or_modify() {
        assert!(is_create_or_modify(&EventKind::Create(CreateKind::File)));
        assert!(is_create_or_modify(&EventKind::Modify(ModifyKind::Data(
            notify::event::DataChange::Content
        ))));
        assert!(!is_create_or_modify(&EventKind::Remove(RemoveKind::File)));
    }

    #[test]
    fn test_collect_event_filters_drafts() {
        let dir = tempfile::TempDir::new().unwrap();
        let watcher = DraftWatcher::watch(dir.path()).unwrap();

        let event = notify::Event {
            kind: EventKind::Create(CreateKind::File),
            paths: vec![
                PathBuf::from("drafts/post.txt"),
                PathBuf::from("drafts/image.png"),
                PathBuf::from("drafts/thread.md"),
            ],
            attrs: Default::default(),
        };
        let mut paths = HashSet::new();
        watcher.collect_event(&event, &mut paths);
        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&PathBuf::from("drafts/post.txt")));

        let remove = notify::Event {
            kind: EventKind::Remove(RemoveKind::File),
            paths: vec![PathBuf::from("drafts/other.txt")],
            attrs: Default::default(),
        };
        let mut paths = HashSet::new();
        watcher.collect_event(&remove, &mut paths);
        assert!(paths.is_empty());
    }

    #[test]
    fn test_single_file_watch_only_reports_that_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("post.txt");
        std::fs::write(&file, "draft").unwrap();
        let watcher = DraftWatcher::watch(&file).unwrap();

        let event = notify::Event {
            kind: EventKind::Modify(ModifyKind::Any),
            paths: vec![file.clone(), dir.path().join("sibling.txt")],
            attrs: Default::default(),
        };
        let mut paths = HashSet::new();
        watcher.collect_event(&event, &mut paths);
        assert_eq!(paths.into_iter().collect::<Vec<_>>(), vec![file]);
    }

    #[test]
    fn test_watch_creates_watcher() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(DraftWatcher::watch(dir.path()).is_ok());
    }
}
