//! File-backed change feed.
//!
//! Endpoints are directory roots and the watch key is a path relative to a
//! root. The first root containing the file is watched. Subscribing emits the
//! current content as an initial batch, then one batch per file change.

use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::watch::feed::{ChangeFeed, FeedError, Subscription, WatchEvent};

type BatchResult = Result<Vec<WatchEvent>, FeedError>;

/// A [`ChangeFeed`] over local files.
#[derive(Debug, Clone, Default)]
pub struct FileFeed;

impl FileFeed {
    pub fn new() -> Self {
        Self
    }
}

impl ChangeFeed for FileFeed {
    type Subscription = FileSubscription;

    async fn subscribe(&self, endpoints: &[String], key: &str) -> Result<FileSubscription, FeedError> {
        let path = resolve(endpoints, key).ok_or_else(|| {
            FeedError::Transport(format!("watch key '{key}' not found under {endpoints:?}"))
        })?;
        FileSubscription::open(path, key.to_string())
    }
}

/// First `root/key` that exists.
fn resolve(endpoints: &[String], key: &str) -> Option<PathBuf> {
    let relative = key.trim_start_matches('/');
    endpoints
        .iter()
        .map(|root| Path::new(root).join(relative))
        .find(|candidate| candidate.is_file())
}

/// A live watch on one file.
pub struct FileSubscription {
    // Kept alive for the lifetime of the subscription; dropping it stops the watch.
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<BatchResult>,
}

impl FileSubscription {
    fn open(path: PathBuf, key: String) -> Result<Self, FeedError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let initial_tx = tx.clone();
        let initial_key = key.clone();

        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let target = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let batch = match res {
                    Ok(event) => match event_batch(&event, &target, &key) {
                        Some(batch) => batch,
                        None => return,
                    },
                    Err(e) => Err(FeedError::Transport(e.to_string())),
                };
                let _ = tx.send(batch);
            },
            Config::default(),
        )
        .map_err(|e| FeedError::Transport(e.to_string()))?;

        watcher
            .watch(&parent, RecursiveMode::NonRecursive)
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        // Read after the watch is in place so no change slips in between.
        let initial = read_event(&path, &initial_key);
        let _ = initial_tx.send(initial.map(|event| vec![event]));

        tracing::info!(path = ?path, "File feed watching");
        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }
}

impl Subscription for FileSubscription {
    async fn next_batch(&mut self) -> BatchResult {
        self.rx.recv().await.unwrap_or(Err(FeedError::Closed))
    }
}

/// Translate a notify event into a feed batch, if it concerns `target`.
fn event_batch(event: &Event, target: &Path, key: &str) -> Option<BatchResult> {
    let touches_target = event
        .paths
        .iter()
        .any(|p| p.file_name().is_some() && p.file_name() == target.file_name());
    if !touches_target {
        return None;
    }

    if event.kind.is_remove() {
        return Some(Ok(vec![WatchEvent::delete(key)]));
    }
    if event.kind.is_create() || event.kind.is_modify() {
        return Some(read_event(target, key).map(|e| vec![e]));
    }
    None
}

fn read_event(path: &Path, key: &str) -> Result<WatchEvent, FeedError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(WatchEvent::put(key, String::from_utf8_lossy(&bytes))),
        Err(e) => Err(FeedError::Transport(format!("failed to read {}: {e}", path.display()))),
    }
}
