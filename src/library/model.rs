use std::path::{Path, PathBuf};

/// Artist label used for albums whose tracks disagree on the artist.
pub const VARIOUS_ARTISTS: &str = "various artists";

/// One playable audio file that survived normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    /// The first entry is authoritative.
    pub artists: Vec<String>,
    /// Album title after defaulting; the grouping key is derived from it.
    pub album: String,
    pub track_no: u32,
}

impl Track {
    pub fn artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or_default()
    }
}

/// Tracks sharing a case-insensitive album title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    /// Casing of the first track that created the album.
    pub title: String,
    /// Empty when `various_artists` is set, otherwise the single shared artist.
    pub artists: Vec<String>,
    pub various_artists: bool,
    /// Ascending by `track_no`.
    pub tracks: Vec<Track>,
}

impl Album {
    pub(crate) fn new(title: String) -> Self {
        Self {
            title,
            artists: Vec::new(),
            various_artists: false,
            tracks: Vec::new(),
        }
    }

    /// The artist shown for the album: the shared artist, or "various artists".
    pub fn artist_label(&self) -> &str {
        if self.various_artists {
            VARIOUS_ARTISTS
        } else {
            self.artists.first().map(String::as_str).unwrap_or_default()
        }
    }

    /// "Artist - Title", the label albums are listed and sorted by.
    pub fn display(&self) -> String {
        format!("{} - {}", self.artist_label(), self.title)
    }

    /// Track label within this album. Compilations carry the track artist.
    pub fn track_label(&self, track: &Track) -> String {
        if self.various_artists {
            format!("{} - {}", track.artist(), track.title)
        } else {
            track.title.clone()
        }
    }
}

/// Counters collected during one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Files that passed the extension (and Ogg content) filter.
    pub candidates: usize,
    /// Files the tag reader could not open or parse.
    pub unreadable: usize,
    pub rejected_missing_artist: usize,
    pub rejected_missing_title: usize,
    pub rejected_track_number: usize,
    pub accepted: usize,
}

impl ScanStats {
    pub fn rejected(&self) -> usize {
        self.rejected_missing_artist + self.rejected_missing_title + self.rejected_track_number
    }
}

/// Position of a track inside a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackPosition {
    pub album: usize,
    pub track: usize,
}

/// The sorted output of one scan. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub(crate) albums: Vec<Album>,
    pub(crate) stats: ScanStats,
}

impl Catalog {
    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    pub fn track_count(&self) -> usize {
        self.albums.iter().map(|a| a.tracks.len()).sum()
    }

    pub fn track(&self, pos: TrackPosition) -> Option<&Track> {
        self.albums.get(pos.album)?.tracks.get(pos.track)
    }

    /// Find a track by its exact path, e.g. to re-bind the playing track after a rescan.
    pub fn locate(&self, path: &Path) -> Option<TrackPosition> {
        self.albums.iter().enumerate().find_map(|(ai, album)| {
            album
                .tracks
                .iter()
                .position(|t| t.path == path)
                .map(|ti| TrackPosition {
                    album: ai,
                    track: ti,
                })
        })
    }
}
