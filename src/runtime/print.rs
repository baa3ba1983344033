use std::fmt::Write;

use tuneshelf::library::{AlbumMatch, Catalog};

/// Print the whole catalog, or only what `query` matches.
pub fn show(catalog: &Catalog, query: Option<&str>) {
    let out = match query {
        Some(q) => render_matches(catalog, &catalog.search(q)),
        None => render_catalog(catalog),
    };
    print!("{out}");
}

pub fn render_catalog(catalog: &Catalog) -> String {
    let all: Vec<AlbumMatch> = catalog.search("");
    render_matches(catalog, &all)
}

/// One line per album, tracks indented beneath with their numbers.
pub fn render_matches(catalog: &Catalog, matches: &[AlbumMatch]) -> String {
    let mut out = String::new();
    for m in matches {
        let Some(album) = catalog.albums().get(m.album) else {
            continue;
        };
        let _ = writeln!(out, "{}", album.display());
        for &ti in &m.tracks {
            if let Some(track) = album.tracks.get(ti) {
                let _ = writeln!(out, "  {:>2}. {}", track.track_no, album.track_label(track));
            }
        }
    }
    out
}
