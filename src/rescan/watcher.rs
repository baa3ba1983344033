use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::WatchSettings;

use super::debounce::Debouncer;
use super::mounts::{MountError, MountTable, VolumeChange};

/// Sent when the library should be rescanned. The watcher never scans itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescanRequest {
    /// Net volume change since the previous request.
    pub change: VolumeChange,
}

/// Poll-to-poll state: last mount snapshot, pending change and the debounce timer.
#[derive(Debug)]
pub struct WatchState {
    roots: Vec<PathBuf>,
    last: BTreeSet<PathBuf>,
    pending: VolumeChange,
    debouncer: Debouncer,
}

impl WatchState {
    pub fn new(roots: Vec<PathBuf>, initial: BTreeSet<PathBuf>, debounce: Duration) -> Self {
        Self {
            roots: roots.into_iter().map(absolute_root).collect(),
            last: initial,
            pending: VolumeChange::default(),
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Feed one mount snapshot taken at `now`.
    pub fn observe(&mut self, current: BTreeSet<PathBuf>, now: Instant) {
        let change = VolumeChange::between(&self.last, &current);
        if change.is_empty() {
            return;
        }

        if change.affects(&self.roots, &self.last, &current) {
            log::info!(
                "library volume change: {} mounted, {} unmounted",
                change.added.len(),
                change.removed.len()
            );
            self.pending.merge(change);
            self.debouncer.poke(now);
        } else {
            log::debug!("ignoring volume change outside the library: {change:?}");
        }
        self.last = current;
    }

    /// A request once the debounce period has passed without further library changes.
    pub fn due(&mut self, now: Instant) -> Option<RescanRequest> {
        self.debouncer.fire(now).then(|| RescanRequest {
            change: std::mem::take(&mut self.pending),
        })
    }
}

/// Mount points are absolute, so a relative root is anchored at the working directory.
fn absolute_root(root: PathBuf) -> PathBuf {
    if root.is_absolute() {
        return root;
    }
    std::path::absolute(&root).unwrap_or_else(|e| {
        log::warn!("cannot resolve library root {}: {e}", root.display());
        root
    })
}

/// Background thread polling the mount table.
pub struct VolumeWatcher {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl VolumeWatcher {
    /// Start watching. The first snapshot is taken here so an unreadable mount
    /// table is reported to the caller instead of failing silently in the thread.
    pub fn spawn(
        roots: Vec<PathBuf>,
        settings: &WatchSettings,
        mut table: Box<dyn MountTable>,
        tx: Sender<RescanRequest>,
    ) -> Result<Self, MountError> {
        let initial = table.mounted_roots()?;
        let poll = Duration::from_millis(settings.poll_interval_ms.max(1));
        let mut state = WatchState::new(roots, initial, Duration::from_millis(settings.debounce_ms));

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = thread::spawn(move || {
            let mut failing = false;
            while !stop_flag.load(Ordering::Relaxed) {
                thread::park_timeout(poll);
                if stop_flag.load(Ordering::Relaxed) {
                    break;
                }

                let now = Instant::now();
                match table.mounted_roots() {
                    Ok(current) => {
                        failing = false;
                        state.observe(current, now);
                    }
                    Err(e) => {
                        if !failing {
                            log::warn!("volume watcher: {e}");
                        }
                        failing = true;
                    }
                }

                if let Some(request) = state.due(now) {
                    if tx.send(request).is_err() {
                        log::debug!("rescan receiver gone, stopping volume watcher");
                        break;
                    }
                }
            }
        });

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

impl Drop for VolumeWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
