use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lofty::error::LoftyError;
use lofty::file::{FileType, TaggedFile};
use lofty::prelude::{Accessor, TaggedFileExt};
use lofty::tag::{ItemKey, Tag, TagType};
use thiserror::Error;

use super::walk::{AudioFormat, Candidate};

/// Metadata pulled from one file before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub path: PathBuf,
    /// Empty when neither the artist field nor any artist-like property was set.
    pub artist: String,
    pub title: String,
    pub album: String,
    /// 0 means absent.
    pub track_no: u32,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot read tags: {0}")]
    Lofty(#[from] LoftyError),

    #[error("expected a {expected:?} container, found {found:?}")]
    FormatMismatch { expected: FileType, found: FileType },
}

/// Tag contents in reader-independent form.
///
/// `properties` is the generic key/value map: every text item of every tag the
/// reader consulted, grouped by key name. Keys iterate in byte order, so the
/// artist fallback does not depend on how a tag happens to order its items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSnapshot {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    pub track: Option<u32>,
    pub properties: BTreeMap<String, Vec<String>>,
}

impl TagSnapshot {
    /// Snapshot `tags`, reading the primary fields from the first one.
    pub fn from_tags(tags: &[&Tag]) -> Self {
        let mut snapshot = Self::default();

        if let Some(primary) = tags.first() {
            snapshot.artist = primary.artist().map(|v| v.into_owned());
            snapshot.title = primary.title().map(|v| v.into_owned());
            snapshot.album = primary.album().map(|v| v.into_owned());
            snapshot.track = primary.track();
        }

        for tag in tags {
            for item in tag.items() {
                let Some(text) = item.value().text() else {
                    continue;
                };
                snapshot.push_property(item_key_name(item.key()), text.to_string());
            }
        }

        snapshot
    }

    pub fn push_property(&mut self, key: String, value: String) {
        self.properties.entry(key).or_default().push(value);
    }

    /// Artist fallback chain: the artist field, then the first value of the
    /// first property (in key order) whose lowercased key contains "artist".
    pub fn resolve_artist(&self) -> String {
        let artist = self.artist.as_deref().map(trim).unwrap_or_default();
        if !artist.is_empty() {
            return artist.to_string();
        }

        self.properties
            .iter()
            .filter(|(key, _)| key.to_lowercase().contains("artist"))
            .find_map(|(_, values)| values.first())
            .map(|v| trim(v).to_string())
            .unwrap_or_default()
    }

    pub fn into_record(self, path: PathBuf) -> RawRecord {
        let artist = self.resolve_artist();
        let field = |v: Option<String>| v.as_deref().map(trim).unwrap_or_default().to_string();

        RawRecord {
            path,
            artist,
            title: field(self.title),
            album: field(self.album),
            track_no: self.track.unwrap_or(0),
        }
    }
}

/// Name of a tag item in the property map: the native key for items the tag
/// library could not map, the variant name of the generic key otherwise.
fn item_key_name(key: &ItemKey) -> String {
    match key {
        ItemKey::Unknown(native) => native.clone(),
        mapped => format!("{mapped:?}"),
    }
}

/// Strip ASCII whitespace (space, tab, newline, carriage return, form feed, vertical tab).
pub fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b')
}

/// Reads one container kind into a [`RawRecord`].
pub trait TagReader: Sync {
    /// Tags to consult, best first.
    fn tags<'f>(&self, file: &'f TaggedFile) -> Result<Vec<&'f Tag>, ExtractError>;

    fn extract(&self, path: &Path) -> Result<RawRecord, ExtractError> {
        let file = lofty::read_from_path(path)?;
        let tags = self.tags(&file)?;
        Ok(TagSnapshot::from_tags(&tags).into_record(path.to_path_buf()))
    }
}

/// Any format the tag library recognizes: the primary tag first, then the rest.
pub struct GenericReader;

impl TagReader for GenericReader {
    fn tags<'f>(&self, file: &'f TaggedFile) -> Result<Vec<&'f Tag>, ExtractError> {
        let mut tags: Vec<&Tag> = Vec::new();
        if let Some(primary) = file.primary_tag() {
            tags.push(primary);
        }
        for tag in file.tags() {
            if !tags.iter().any(|t| t.tag_type() == tag.tag_type()) {
                tags.push(tag);
            }
        }
        Ok(tags)
    }
}

/// RIFF/WAVE: ID3v2 chunk first, then the INFO list.
pub struct WavReader;

impl TagReader for WavReader {
    fn tags<'f>(&self, file: &'f TaggedFile) -> Result<Vec<&'f Tag>, ExtractError> {
        expect_type(file, FileType::Wav)?;
        Ok([TagType::Id3v2, TagType::RiffInfo]
            .into_iter()
            .filter_map(|t| file.tag(t))
            .collect())
    }
}

/// Ogg Vorbis: Vorbis comments only.
pub struct VorbisReader;

impl TagReader for VorbisReader {
    fn tags<'f>(&self, file: &'f TaggedFile) -> Result<Vec<&'f Tag>, ExtractError> {
        expect_type(file, FileType::Vorbis)?;
        Ok(file.tag(TagType::VorbisComments).into_iter().collect())
    }
}

fn expect_type(file: &TaggedFile, expected: FileType) -> Result<(), ExtractError> {
    let found = file.file_type();
    if found == expected {
        Ok(())
    } else {
        Err(ExtractError::FormatMismatch { expected, found })
    }
}

static GENERIC: GenericReader = GenericReader;
static WAV: WavReader = WavReader;
static VORBIS: VorbisReader = VorbisReader;

pub fn reader_for(format: AudioFormat) -> &'static dyn TagReader {
    match format {
        AudioFormat::Wav => &WAV,
        AudioFormat::OggVorbis => &VORBIS,
        AudioFormat::Mp3 | AudioFormat::Flac => &GENERIC,
    }
}

pub fn extract(candidate: &Candidate) -> Result<RawRecord, ExtractError> {
    reader_for(candidate.format).extract(&candidate.path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lofty::tag::{ItemValue, TagItem};

    fn snapshot(artist: Option<&str>, properties: Vec<(&str, Vec<&str>)>) -> TagSnapshot {
        TagSnapshot {
            artist: artist.map(str::to_string),
            title: Some("  Title\t".into()),
            album: Some("\nAlbum ".into()),
            track: Some(4),
            properties: properties
                .into_iter()
                .map(|(k, vs)| (k.to_string(), vs.into_iter().map(str::to_string).collect()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn trim_strips_ascii_whitespace_only() {
        assert_eq!(trim(" \t\r\n\x0b\x0cabc \x0b"), "abc");
        assert_eq!(trim("\u{a0}abc\u{a0}"), "\u{a0}abc\u{a0}");
        assert_eq!(trim("   "), "");
    }

    #[test]
    fn artist_field_wins_over_properties() {
        let s = snapshot(Some(" Primary "), vec![("AlbumArtist", vec!["Other"])]);
        assert_eq!(s.resolve_artist(), "Primary");
    }

    #[test]
    fn blank_artist_falls_back_to_first_artist_like_property() {
        let s = snapshot(
            Some("   "),
            vec![
                ("Genre", vec!["Rock"]),
                ("ALBUMARTIST", vec![" Fallback ", "Second"]),
                ("ArtistSort", vec!["Later"]),
            ],
        );
        assert_eq!(s.resolve_artist(), "Fallback");
    }

    #[test]
    fn property_keys_are_matched_case_insensitively() {
        let s = snapshot(None, vec![("Performer", vec!["No"]), ("ORIGARTIST", vec!["Yes"])]);
        assert_eq!(s.resolve_artist(), "Yes");
    }

    #[test]
    fn no_artist_anywhere_resolves_empty() {
        let s = snapshot(None, vec![("Genre", vec!["Rock"]), ("Comment", vec!["artist unknown"])]);
        assert_eq!(s.resolve_artist(), "");
    }

    #[test]
    fn into_record_trims_fields_and_defaults_track_number() {
        let mut s = snapshot(Some("A"), vec![]);
        s.track = None;
        let record = s.into_record(PathBuf::from("/m/a.mp3"));
        assert_eq!(
            record,
            RawRecord {
                path: PathBuf::from("/m/a.mp3"),
                artist: "A".into(),
                title: "Title".into(),
                album: "Album".into(),
                track_no: 0,
            }
        );
    }

    #[test]
    fn push_property_groups_values_by_key() {
        let mut s = TagSnapshot::default();
        s.push_property("TITLE".into(), "t".into());
        s.push_property("ARTIST".into(), "a".into());
        s.push_property("ARTIST".into(), "b".into());
        let entries: Vec<(&str, Vec<&str>)> = s
            .properties
            .iter()
            .map(|(k, vs)| (k.as_str(), vs.iter().map(String::as_str).collect()))
            .collect();
        assert_eq!(entries, vec![("ARTIST", vec!["a", "b"]), ("TITLE", vec!["t"])]);
    }

    #[test]
    fn fallback_picks_the_lowest_artist_like_key_not_the_first_seen() {
        let mut s = TagSnapshot::default();
        s.push_property("TrackArtist".into(), " Seen First ".into());
        s.push_property("AlbumArtist".into(), " Sorted First ".into());
        assert_eq!(s.resolve_artist(), "Sorted First");
    }

    #[test]
    fn item_key_name_keeps_native_keys_verbatim() {
        let native = TagItem::new(
            ItemKey::Unknown("TXXX:\"Band\" \\ Artists".to_string()),
            ItemValue::Text("x".to_string()),
        );
        assert_eq!(item_key_name(native.key()), "TXXX:\"Band\" \\ Artists");

        let mapped = TagItem::new(ItemKey::AlbumArtist, ItemValue::Text("x".to_string()));
        assert_eq!(item_key_name(mapped.key()), "AlbumArtist");
    }

    #[test]
    fn from_tags_collects_items_of_every_consulted_tag() {
        let mut id3 = Tag::new(TagType::Id3v2);
        id3.set_title("Song".to_string());
        let mut comments = Tag::new(TagType::VorbisComments);
        assert!(comments.insert_text(ItemKey::AlbumArtist, "Band".to_string()));

        let s = TagSnapshot::from_tags(&[&id3, &comments]);
        assert_eq!(s.title.as_deref(), Some("Song"));
        assert_eq!(s.artist, None);
        assert_eq!(s.properties.get("AlbumArtist"), Some(&vec!["Band".to_string()]));
        assert_eq!(s.resolve_artist(), "Band");
    }

    #[test]
    fn readers_reject_containers_of_another_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mislabelled.ogg");
        std::fs::write(&path, crate::library::test_fixtures::wav_bytes()).unwrap();

        let candidate = Candidate {
            path,
            format: AudioFormat::OggVorbis,
        };
        match extract(&candidate) {
            Err(ExtractError::FormatMismatch { expected, found }) => {
                assert_eq!(expected, FileType::Vorbis);
                assert_eq!(found, FileType::Wav);
            }
            other => panic!("expected a container mismatch, got {other:?}"),
        }
    }
}
