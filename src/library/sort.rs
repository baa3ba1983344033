use super::model::Album;

/// Display-order key: lowercased "artist - title", with compilations under
/// the literal "various artists".
pub fn sort_key(album: &Album) -> String {
    album.display().to_ascii_lowercase()
}

/// Stable sort by [`sort_key`]; albums with equal keys keep their prior order.
pub fn sort_albums(albums: &mut [Album]) {
    albums.sort_by_cached_key(sort_key);
}
