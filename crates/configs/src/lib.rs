//! # configs
//!
//! Layered runtime settings: built-in defaults, then an optional
//! `config/recipe-box.toml`, then `RECIPE_BOX__*` environment variables
//! (after `.env` is loaded, if present).
//!
//! Nested keys use a double underscore, e.g. `RECIPE_BOX__HOME__RECENT_LIMIT=8`.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use domains::DefaultImages;
use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "RECIPE_BOX";
const CONFIG_FILE: &str = "config/recipe-box";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Fallback `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Pause before a random suggestion is fetched, so a loading state can show
    pub suggestion_delay_ms: u64,
    pub home: HomeSettings,
    pub media: MediaSettings,
    /// JSON array of suggestion documents loaded at startup
    #[serde(default)]
    pub suggestions_seed: Option<PathBuf>,
    #[serde(default)]
    pub default_images: DefaultImages,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HomeSettings {
    pub recent_limit: usize,
    pub highlight_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    pub root: PathBuf,
    pub url_prefix: String,
}

impl Settings {
    /// Loads `.env`, the optional config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
        }

        let config = defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Self::finish(config)
    }

    /// Defaults overlaid with a TOML document. Ignores the environment.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config = defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::finish(config)
    }

    pub fn suggestion_delay(&self) -> Duration {
        Duration::from_millis(self.suggestion_delay_ms)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.home.recent_limit == 0 || self.home.highlight_limit == 0 {
            return Err(ConfigError::Invalid("home limits must be positive".into()));
        }
        if self.media.url_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("media.url_prefix must not be empty".into()));
        }
        Ok(())
    }
}

fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("log_filter", "info")?
        .set_default("suggestion_delay_ms", 2000)?
        .set_default("home.recent_limit", 5)?
        .set_default("home.highlight_limit", 11)?
        .set_default("media.root", "./data/uploads")?
        .set_default("media.url_prefix", "/static/uploads")?)
}
