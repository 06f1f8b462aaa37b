use crate::error::Result;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time;

/// Quiet period before pending repositories are flushed
pub const DEBOUNCE_WINDOW: Duration = Duration::from_secs(5);

/// How often the pending set is checked
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Debounce bookkeeping for repository change events.
///
/// Events accumulate into a pending set; the set drains at most once per
/// debounce window, so a burst of saves triggers one reindex per
/// repository.
#[derive(Debug)]
pub struct DebouncedChanges {
    pending: BTreeSet<String>,
    last_drained: Instant,
}

impl DebouncedChanges {
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            pending: BTreeSet::new(),
            last_drained: now,
        }
    }

    /// Record a change in a repository
    pub fn record(&mut self, repo_name: impl Into<String>) {
        self.pending.insert(repo_name.into());
    }

    /// Take everything pending if the debounce window has elapsed
    pub fn drain_ready(&mut self, now: Instant) -> Vec<String> {
        if self.pending.is_empty() || now.duration_since(self.last_drained) < DEBOUNCE_WINDOW {
            return Vec::new();
        }
        self.last_drained = now;
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    /// Number of repositories with unflushed changes
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Attribute a changed path to a repository under the watch root.
///
/// The repository is the first path component below the root; files
/// sitting directly in the root belong to no repository.
#[must_use]
pub fn repo_for_event(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut components = relative.components();
    let first = components.next()?;
    // Single component means a stray file at the root, not a repository
    components.next()?;
    match first {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    }
}

/// Filesystem watcher over a directory of repositories.
///
/// Wraps a notify watcher and yields debounced batches of repository
/// names that saw changes.
pub struct RepoWatcher {
    root: PathBuf,
    rx: mpsc::UnboundedReceiver<PathBuf>,
    changes: DebouncedChanges,
    _watcher: RecommendedWatcher,
}

impl RepoWatcher {
    /// Start watching `root` recursively
    pub fn start(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher =
            notify::recommended_watcher(move |result: notify::Result<Event>| match result {
                Ok(event) => {
                    for path in event.paths {
                        // Directory-level events are noise; files drive reindexing
                        if path.is_dir() {
                            continue;
                        }
                        let _ = tx.send(path);
                    }
                }
                Err(e) => log::warn!("Watch error: {e}"),
            })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        log::info!("Started watching for changes in {}", root.display());

        Ok(Self {
            root,
            rx,
            changes: DebouncedChanges::new(Instant::now()),
            _watcher: watcher,
        })
    }

    /// Wait for the next debounced batch of changed repositories.
    ///
    /// Returns an empty batch only when the underlying watcher has shut
    /// down.
    pub async fn next_changed(&mut self) -> Vec<String> {
        let mut tick = time::interval(POLL_INTERVAL);
        tick.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                maybe_path = self.rx.recv() => {
                    match maybe_path {
                        Some(path) => {
                            if let Some(repo) = repo_for_event(&self.root, &path) {
                                log::debug!("Change in '{repo}': {}", path.display());
                                self.changes.record(repo);
                            }
                        }
                        None => return Vec::new(),
                    }
                }
                _ = tick.tick() => {
                    let ready = self.changes.drain_ready(Instant::now());
                    if !ready.is_empty() {
                        return ready;
                    }
                }
            }
        }
    }
}
