//! Rescan trigger: notices removable volumes holding library roots coming and
//! going, and asks for a rescan once things settle.
//!
//! Detection polls the mount table. Bursts of changes are coalesced by a
//! debouncer, so the receiver sees one request per burst.

mod debounce;
mod mounts;
mod watcher;

pub use debounce::Debouncer;
pub use mounts::{MountError, MountTable, ProcMounts, VolumeChange, mount_root_for, parse_mounts};
pub use watcher::{RescanRequest, VolumeWatcher, WatchState};
