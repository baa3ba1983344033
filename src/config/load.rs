use std::env;
use std::path::PathBuf;

use ::config::{Config, ConfigError, Environment, File};

use super::schema::Settings;

const ENV_PREFIX: &str = "TUNESHELF";
const CONFIG_PATH_VAR: &str = "TUNESHELF_CONFIG_PATH";
const APP_DIR: &str = "tuneshelf";

impl Settings {
    /// Struct defaults, overlaid by the config file if there is one, overlaid
    /// by `TUNESHELF__<SECTION>__<KEY>` variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = resolve_config_path() {
            log::debug!("config file: {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.watch.poll_interval_ms == 0 {
            return Err("watch.poll_interval_ms must be at least 1".to_string());
        }
        Ok(())
    }

    /// [`Settings::load`] plus [`Settings::validate`]. Any failure is logged
    /// and the defaults are used instead; scanning never depends on a config file.
    pub fn load_or_default() -> Self {
        Self::load()
            .map_err(|e| e.to_string())
            .and_then(|s| s.validate().map(|()| s))
            .unwrap_or_else(|reason| {
                log::warn!("ignoring configuration, using defaults: {reason}");
                Self::default()
            })
    }
}

/// `TUNESHELF_CONFIG_PATH` when set, otherwise [`default_config_path`].
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `tuneshelf/config.toml` under `$XDG_CONFIG_HOME`, or under `~/.config`.
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join(APP_DIR).join("config.toml"))
}
