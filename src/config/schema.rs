use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tuneshelf/config.toml` or `~/.config/tuneshelf/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TUNESHELF__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub watch: WatchSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Root directories to index, scanned in this order.
    pub roots: Vec<PathBuf>,
    /// Whether to follow symlinks during scanning.
    ///
    /// Directory loops reached through links are detected by the walker and skipped.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Whether `.ogg` files are considered. Only Ogg streams carrying Vorbis are kept.
    pub ogg: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            follow_links: true,
            include_hidden: true,
            max_depth: None,
            ogg: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    /// Keep running after the first scan and rescan when volumes come and go.
    pub enabled: bool,
    /// How often the mount table is polled (milliseconds).
    pub poll_interval_ms: u64,
    /// Quiet period after the last volume change before a rescan is requested (milliseconds).
    pub debounce_ms: u64,
    /// Mount table in `/proc/self/mounts` format.
    pub mounts_file: PathBuf,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            poll_interval_ms: 1000,
            debounce_ms: 1000,
            mounts_file: PathBuf::from("/proc/self/mounts"),
        }
    }
}
