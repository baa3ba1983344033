use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MountError {
    #[error("cannot read mount table {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Source of the currently mounted volume roots.
pub trait MountTable: Send {
    fn mounted_roots(&mut self) -> Result<BTreeSet<PathBuf>, MountError>;
}

/// Mount table in `/proc/self/mounts` (fstab) format.
#[derive(Debug, Clone)]
pub struct ProcMounts {
    path: PathBuf,
}

impl ProcMounts {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ProcMounts {
    fn default() -> Self {
        Self::new("/proc/self/mounts")
    }
}

impl MountTable for ProcMounts {
    fn mounted_roots(&mut self) -> Result<BTreeSet<PathBuf>, MountError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| MountError::Read {
            path: self.path.clone(),
            source,
        })?;
        Ok(parse_mounts(&contents))
    }
}

/// Mount points (second field) of every well-formed line.
pub fn parse_mounts(contents: &str) -> BTreeSet<PathBuf> {
    contents
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(|field| PathBuf::from(unescape_octal(field)))
        .collect()
}

/// Decode the `\ooo` escapes the kernel uses for blanks and backslashes in mount points.
fn unescape_octal(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
                let value = digits.iter().fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                if let Ok(byte) = u8::try_from(value) {
                    out.push(byte);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// The mount point `path` lives on: the longest mount point that is a prefix of it.
pub fn mount_root_for<'m>(path: &Path, mounts: &'m BTreeSet<PathBuf>) -> Option<&'m PathBuf> {
    mounts
        .iter()
        .filter(|m| path.starts_with(m))
        .max_by_key(|m| m.components().count())
}

/// Mount points that appeared or disappeared between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeChange {
    pub added: BTreeSet<PathBuf>,
    pub removed: BTreeSet<PathBuf>,
}

impl VolumeChange {
    pub fn between(before: &BTreeSet<PathBuf>, now: &BTreeSet<PathBuf>) -> Self {
        Self {
            added: now.difference(before).cloned().collect(),
            removed: before.difference(now).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Whether a volume holding one of `roots` came or went. Roots are
    /// resolved against both snapshots so a vanished volume still counts.
    pub fn affects(
        &self,
        roots: &[PathBuf],
        before: &BTreeSet<PathBuf>,
        now: &BTreeSet<PathBuf>,
    ) -> bool {
        let all: BTreeSet<PathBuf> = before.union(now).cloned().collect();
        roots
            .iter()
            .filter_map(|root| mount_root_for(root, &all))
            .any(|m| self.added.contains(m) || self.removed.contains(m))
    }

    /// Fold a later change into this one.
    pub fn merge(&mut self, later: VolumeChange) {
        for m in later.added {
            if !self.removed.remove(&m) {
                self.added.insert(m);
            }
        }
        for m in later.removed {
            if !self.added.remove(&m) {
                self.removed.insert(m);
            }
        }
    }
}
