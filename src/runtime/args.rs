use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("--find needs a query")]
    MissingQuery,
    #[error("unknown option {0} (usage: tuneshelf [--watch] [--find QUERY] [ROOT...])")]
    UnknownOption(String),
}

/// Command line: flags anywhere, everything else is a root directory.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub watch: bool,
    pub find: Option<String>,
    pub roots: Vec<PathBuf>,
}

impl Args {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut out = Args::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--watch" | "-w" => out.watch = true,
                "--find" | "-f" => out.find = Some(args.next().ok_or(ArgsError::MissingQuery)?),
                // everything after `--` is a root, even if it looks like a flag
                "--" => out.roots.extend(args.by_ref().map(PathBuf::from)),
                s if s.starts_with('-') && s.len() > 1 => {
                    return Err(ArgsError::UnknownOption(arg));
                }
                _ => out.roots.push(PathBuf::from(arg)),
            }
        }

        Ok(out)
    }
}
