//! Per-file acceptance policy.
//!
//! A raw record runs through an ordered list of stages. Each stage may repair
//! the record or reject it; the first rejection wins. Rejections are routine
//! (spoken word, ringtones, broken tags) and are not errors.

use std::fmt;

use super::model::Track;
use super::tags::RawRecord;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// No artist in the artist field nor in any artist-like property.
    MissingArtist,
    MissingTitle,
    /// Named album without a track number: its position in the album is unknown.
    AmbiguousTrackNumber,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MissingArtist => "no artist",
            Self::MissingTitle => "no title",
            Self::AmbiguousTrackNumber => "album track without a track number",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(RejectReason),
}

pub type Stage = fn(&mut RawRecord) -> Verdict;

pub fn require_artist(record: &mut RawRecord) -> Verdict {
    if record.artist.is_empty() {
        Verdict::Reject(RejectReason::MissingArtist)
    } else {
        Verdict::Accept
    }
}

pub fn require_title(record: &mut RawRecord) -> Verdict {
    if record.title.is_empty() {
        Verdict::Reject(RejectReason::MissingTitle)
    } else {
        Verdict::Accept
    }
}

/// A missing track number is only tolerated for standalone tracks: no album,
/// or an album named exactly like the title (a single). Those become track 1.
pub fn repair_track_number(record: &mut RawRecord) -> Verdict {
    if record.track_no != 0 {
        return Verdict::Accept;
    }
    if record.album.is_empty() || record.album == record.title {
        record.track_no = 1;
        Verdict::Accept
    } else {
        Verdict::Reject(RejectReason::AmbiguousTrackNumber)
    }
}

/// A track without an album becomes its own single-track album.
pub fn default_album(record: &mut RawRecord) -> Verdict {
    if record.album.is_empty() {
        record.album = record.title.clone();
    }
    Verdict::Accept
}

pub const PIPELINE: &[Stage] = &[
    require_artist,
    require_title,
    repair_track_number,
    default_album,
];

/// Run every stage over `record` and build the track, or report why it was dropped.
pub fn normalize(mut record: RawRecord) -> Result<Track, RejectReason> {
    for stage in PIPELINE {
        if let Verdict::Reject(reason) = stage(&mut record) {
            return Err(reason);
        }
    }

    Ok(Track {
        path: record.path,
        title: record.title,
        artists: vec![record.artist],
        album: record.album,
        track_no: record.track_no,
    })
}
