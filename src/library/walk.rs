use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

/// Bytes inspected when checking that an `.ogg` file carries Vorbis.
const SNIFF_LEN: usize = 64;
const OGG_SYNC: &[u8] = b"OggS";
const VORBIS_ID: &[u8] = b"\x01vorbis";

/// Container formats the scanner indexes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
    OggVorbis,
}

impl AudioFormat {
    /// Classify by extension (case-insensitive). Ogg is only a claim until sniffed.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            "ogg" => Some(Self::OggVorbis),
            _ => None,
        }
    }
}

/// A file the walker accepted for tag extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub format: AudioFormat,
}

/// True when `head` holds an Ogg page followed by a Vorbis identification header.
pub fn is_vorbis_header(head: &[u8]) -> bool {
    let Some(sync) = find(head, OGG_SYNC) else {
        return false;
    };
    find(&head[sync + OGG_SYNC.len()..], VORBIS_ID).is_some()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn sniff_vorbis(path: &Path) -> bool {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    match File::open(path).and_then(|f| f.take(SNIFF_LEN as u64).read_to_end(&mut head)) {
        Ok(_) => is_vorbis_header(&head),
        Err(e) => {
            log::debug!("cannot sniff {}: {e}", path.display());
            false
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn classify(path: &Path, settings: &LibrarySettings) -> Option<AudioFormat> {
    match AudioFormat::from_path(path)? {
        AudioFormat::OggVorbis if !settings.ogg => None,
        AudioFormat::OggVorbis => sniff_vorbis(path).then_some(AudioFormat::OggVorbis),
        format => Some(format),
    }
}

/// Walk one root lazily. A root that is missing or not a directory yields nothing.
pub fn walk_root<'a>(
    root: &'a Path,
    settings: &'a LibrarySettings,
) -> impl Iterator<Item = Candidate> + 'a {
    let entries = root.is_dir().then(|| {
        let mut walker = WalkDir::new(root).follow_links(settings.follow_links);
        if let Some(d) = settings.max_depth {
            walker = walker.max_depth(d);
        }
        walker.into_iter().filter_entry(move |e| {
            settings.include_hidden || e.depth() == 0 || !is_hidden(e.path())
        })
    });
    if entries.is_none() {
        log::debug!("skipping library root {}: not a directory", root.display());
    }

    entries
        .into_iter()
        .flatten()
        .filter_map(move |e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                // permission denied, vanished entries and symlink loops alike
                log::debug!("error while scanning {}, skipping an entry: {err}", root.display());
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter_map(move |e| {
            let format = classify(e.path(), settings)?;
            Some(Candidate {
                path: e.into_path(),
                format,
            })
        })
}

/// Walk every root in order, chaining their candidates.
pub fn walk<'a>(
    roots: &'a [PathBuf],
    settings: &'a LibrarySettings,
) -> impl Iterator<Item = Candidate> + 'a {
    roots.iter().flat_map(move |root| walk_root(root, settings))
}
