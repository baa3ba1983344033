use std::collections::{BTreeSet, HashMap};

use super::model::{Album, Track};

/// Grouping key for album titles. ASCII-only case folding; the sort key uses the same.
pub fn album_key(title: &str) -> String {
    title.to_ascii_lowercase()
}

/// Folds normalized tracks into albums keyed by case-insensitive title.
///
/// The key index only lives as long as the aggregator; [`finish`](Self::finish)
/// hands back the albums in first-seen order.
#[derive(Debug, Default)]
pub struct AlbumAggregator {
    albums: Vec<Album>,
    index: HashMap<String, usize>,
}

impl AlbumAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, track: Track) {
        let key = album_key(&track.album);
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                let idx = self.albums.len();
                self.albums.push(Album::new(track.album.clone()));
                self.index.insert(key, idx);
                idx
            }
        };
        self.albums[idx].tracks.push(track);
    }

    /// Resolve artists and order tracks in every album.
    pub fn finish(self) -> Vec<Album> {
        let mut albums = self.albums;
        for album in &mut albums {
            finalize(album);
        }
        albums
    }
}

fn finalize(album: &mut Album) {
    let artists: BTreeSet<&str> = album.tracks.iter().map(Track::artist).collect();

    if artists.len() == 1 {
        album.artists = artists.into_iter().map(str::to_string).collect();
        album.various_artists = false;
    } else {
        album.artists.clear();
        album.various_artists = true;
    }

    // stable: equal numbers keep discovery order
    album.tracks.sort_by_key(|t| t.track_no);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn track(artist: &str, album: &str, title: &str, no: u32) -> Track {
        Track {
            path: PathBuf::from(format!("/m/{album}/{title}.mp3")),
            title: title.into(),
            artists: vec![artist.into()],
            album: album.into(),
            track_no: no,
        }
    }

    #[test]
    fn groups_case_insensitively_and_keeps_first_casing() {
        let mut agg = AlbumAggregator::new();
        agg.add(track("A", "Abbey Road", "Come Together", 1));
        agg.add(track("A", "ABBEY ROAD", "Something", 2));
        agg.add(track("A", "Let It Be", "Two of Us", 1));

        let albums = agg.finish();
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].title, "Abbey Road");
        assert_eq!(albums[0].tracks.len(), 2);
        assert_eq!(albums[1].title, "Let It Be");
    }

    #[test]
    fn non_ascii_case_is_not_folded() {
        let mut agg = AlbumAggregator::new();
        agg.add(track("A", "Été", "x", 1));
        agg.add(track("A", "éTÉ", "y", 2));
        agg.add(track("A", "ÉTÉ", "z", 3));
        assert_eq!(agg.finish().len(), 3);
    }

    #[test]
    fn single_artist_album_keeps_artist() {
        let mut agg = AlbumAggregator::new();
        agg.add(track("The Beatles", "Abbey Road", "a", 1));
        agg.add(track("The Beatles", "Abbey Road", "b", 3));
        agg.add(track("The Beatles", "Abbey Road", "c", 2));

        let album = &agg.finish()[0];
        assert!(!album.various_artists);
        assert_eq!(album.artists, vec!["The Beatles".to_string()]);
        let numbers: Vec<u32> = album.tracks.iter().map(|t| t.track_no).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn distinct_artists_make_a_compilation() {
        let mut agg = AlbumAggregator::new();
        agg.add(track("Artist B", "Now", "b", 2));
        agg.add(track("Artist A", "Now", "a", 1));

        let album = &agg.finish()[0];
        assert!(album.various_artists);
        assert!(album.artists.is_empty());
        assert_eq!(album.tracks[0].title, "a");
        assert_eq!(album.tracks[1].title, "b");
    }

    #[test]
    fn artist_comparison_is_exact() {
        let mut agg = AlbumAggregator::new();
        agg.add(track("Queen", "Innuendo", "a", 1));
        agg.add(track("QUEEN", "Innuendo", "b", 2));
        assert!(agg.finish()[0].various_artists);
    }

    #[test]
    fn equal_track_numbers_keep_discovery_order() {
        let mut agg = AlbumAggregator::new();
        agg.add(track("A", "Disc Set", "first", 1));
        agg.add(track("A", "Disc Set", "second", 1));
        agg.add(track("A", "Disc Set", "zero", 0));
        agg.add(track("A", "Disc Set", "third", 1));

        let titles: Vec<String> = agg.finish()[0]
            .tracks
            .iter()
            .map(|t| t.title.clone())
            .collect();
        assert_eq!(titles, vec!["zero", "first", "second", "third"]);
    }
}
