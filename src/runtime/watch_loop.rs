use std::path::PathBuf;
use std::sync::mpsc;

use tuneshelf::config::Settings;
use tuneshelf::library::Library;
use tuneshelf::rescan::{ProcMounts, RescanRequest, VolumeWatcher};

use super::print;

/// Block, rescanning and reprinting whenever a library volume comes or goes.
pub fn run(
    library: &Library,
    roots: &[PathBuf],
    settings: &Settings,
    query: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel::<RescanRequest>();
    let watcher = VolumeWatcher::spawn(
        roots.to_vec(),
        &settings.watch,
        Box::new(ProcMounts::new(&settings.watch.mounts_file)),
        tx,
    )?;
    log::info!("watching volumes for {} library root(s)", roots.len());

    while let Ok(request) = rx.recv() {
        log::debug!("rescan requested: {:?}", request.change);
        let catalog = library.scan(roots);
        print::show(&catalog, query);
    }

    watcher.stop();
    Ok(())
}
