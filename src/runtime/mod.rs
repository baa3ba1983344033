use std::env;
use std::path::PathBuf;

use tuneshelf::config::Settings;
use tuneshelf::library::Library;

mod args;
mod print;
mod watch_loop;

use args::Args;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(env::args().skip(1))?;
    let settings = Settings::load_or_default();
    let roots = resolve_roots(&args, &settings);

    let library = Library::new(settings.library.clone());
    let catalog = library.scan(&roots);
    print::show(&catalog, args.find.as_deref());

    if args.watch || settings.watch.enabled {
        watch_loop::run(&library, &roots, &settings, args.find.as_deref())?;
    }

    Ok(())
}

/// Roots given on the command line win over configured ones; with neither,
/// the current directory is indexed.
fn resolve_roots(args: &Args, settings: &Settings) -> Vec<PathBuf> {
    if !args.roots.is_empty() {
        return args.roots.clone();
    }
    if !settings.library.roots.is_empty() {
        return settings.library.roots.clone();
    }
    vec![env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
}
