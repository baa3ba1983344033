use super::model::Catalog;

/// One album in a search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumMatch {
    /// Position of the album in the catalog.
    pub album: usize,
    /// The query hit the artist label or the album title, so every track is listed.
    pub whole_album: bool,
    /// Positions of the listed tracks within the album.
    pub tracks: Vec<usize>,
}

impl Catalog {
    /// Case-insensitive substring search over artist labels, album titles and track labels.
    ///
    /// An empty (or blank) query lists everything.
    pub fn search(&self, query: &str) -> Vec<AlbumMatch> {
        let q = query.trim().to_lowercase();

        self.albums
            .iter()
            .enumerate()
            .filter_map(|(ai, album)| {
                let whole_album = q.is_empty()
                    || album.artist_label().to_lowercase().contains(&q)
                    || album.title.to_lowercase().contains(&q);

                let tracks: Vec<usize> = album
                    .tracks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| {
                        whole_album || album.track_label(t).to_lowercase().contains(&q)
                    })
                    .map(|(ti, _)| ti)
                    .collect();

                if whole_album || !tracks.is_empty() {
                    Some(AlbumMatch {
                        album: ai,
                        whole_album,
                        tracks,
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}
