//! Library scanner: walks roots, reads tags and builds the album catalog.
//!
//! Data flow: roots -> [`walk`] -> [`extract`] -> [`normalize`] ->
//! [`AlbumAggregator`] -> [`sort_albums`] -> [`Catalog`].
//!
//! A scan never fails. Unreadable roots, directories and files are skipped,
//! and the result may simply be empty.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::LibrarySettings;

mod aggregate;
mod model;
mod normalize;
mod search;
mod sort;
mod tags;
mod walk;

pub use aggregate::{AlbumAggregator, album_key};
pub use model::*;
pub use normalize::{RejectReason, Verdict, normalize};
pub use search::AlbumMatch;
pub use sort::{sort_albums, sort_key};
pub use tags::{ExtractError, RawRecord, TagReader, TagSnapshot, extract, reader_for};
pub use walk::{AudioFormat, Candidate, walk};

/// Shared, atomically replaced reference to the current catalog.
pub type CatalogHandle = Arc<Mutex<Arc<Catalog>>>;

/// Build a catalog from already-extracted records, keeping the counters in `stats`.
pub fn build_catalog(
    records: impl IntoIterator<Item = RawRecord>,
    mut stats: ScanStats,
) -> Catalog {
    let mut aggregator = AlbumAggregator::new();

    for record in records {
        let path = record.path.clone();
        match normalize(record) {
            Ok(track) => {
                stats.accepted += 1;
                aggregator.add(track);
            }
            Err(reason) => {
                log::trace!("not indexing {}: {reason}", path.display());
                match reason {
                    RejectReason::MissingArtist => stats.rejected_missing_artist += 1,
                    RejectReason::MissingTitle => stats.rejected_missing_title += 1,
                    RejectReason::AmbiguousTrackNumber => stats.rejected_track_number += 1,
                }
            }
        }
    }

    let mut albums = aggregator.finish();
    sort_albums(&mut albums);

    Catalog { albums, stats }
}

/// Scan `roots` and return a freshly built, sorted catalog.
pub fn scan(roots: &[PathBuf], settings: &LibrarySettings) -> Catalog {
    let mut stats = ScanStats::default();

    let records: Vec<RawRecord> = walk(roots, settings)
        .filter_map(|candidate| {
            stats.candidates += 1;
            match extract(&candidate) {
                Ok(record) => Some(record),
                Err(e) => {
                    stats.unreadable += 1;
                    log::debug!("skipping {}: {e}", candidate.path.display());
                    None
                }
            }
        })
        .collect();

    let catalog = build_catalog(records, stats);
    let stats = catalog.stats();
    log::info!(
        "scan complete: {} albums, {} tracks ({} candidates, {} unreadable, {} rejected)",
        catalog.len(),
        catalog.track_count(),
        stats.candidates,
        stats.unreadable,
        stats.rejected()
    );
    catalog
}

/// Owner of the current catalog.
///
/// Every [`scan`](Library::scan) builds a new catalog off to the side and then
/// publishes it in one step. Readers holding an older `Arc<Catalog>` keep a
/// consistent but stale view.
pub struct Library {
    settings: LibrarySettings,
    current: CatalogHandle,
}

impl Library {
    pub fn new(settings: LibrarySettings) -> Self {
        Self {
            settings,
            current: Arc::new(Mutex::new(Arc::new(Catalog::default()))),
        }
    }

    pub fn settings(&self) -> &LibrarySettings {
        &self.settings
    }

    /// Handle other threads can use to read the latest published catalog.
    pub fn handle(&self) -> CatalogHandle {
        self.current.clone()
    }

    /// Rebuild the catalog from `roots` and publish it.
    pub fn scan(&self, roots: &[PathBuf]) -> Arc<Catalog> {
        let catalog = Arc::new(scan(roots, &self.settings));
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = catalog.clone();
        catalog
    }

    /// The current catalog.
    pub fn albums(&self) -> Arc<Catalog> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod test_fixtures;
