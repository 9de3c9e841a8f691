//! Layered settings: defaults, file, `CERTUTIL_*` environment, command line

use crate::error::Result;
use config::{Config, Environment, File, Map};
use credential_store::StoreConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const ENV_PREFIX: &str = "CERTUTIL";

/// File read from the working directory when no `--config` is given
const IMPLICIT_CONFIG_FILE: &str = "certutil";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub store: StoreConfig,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive, e.g. `warn` or `retention_engine=debug`
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

/// Command line values that take precedence over every other layer
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub store_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CliError::Settings`] when an explicit configuration
    /// file is missing or any layer fails to parse.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        Self::load_with_env(overrides, None)
    }

    /// Load settings with `env` standing in for the process environment.
    ///
    /// # Errors
    ///
    /// See [`Settings::load`].
    pub fn load_with_env(overrides: &Overrides, env: Option<Map<String, String>>) -> Result<Self> {
        let file = match &overrides.config_file {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::with_name(IMPLICIT_CONFIG_FILE).required(false),
        };

        let mut builder = Config::builder()
            .set_default("store.type", "pem-directory")?
            .set_default("store.path", path_value(&default_store_path()))?
            .set_default("logging.level", "warn")?
            .set_default("logging.format", "compact")?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            );

        if let Some(dir) = &overrides.store_dir {
            builder = builder
                .set_override("store.type", "pem-directory")?
                .set_override("store.path", path_value(dir))?;
        }
        if overrides.verbose {
            builder = builder.set_override("logging.level", "debug")?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}

/// `<data dir>/certificates`, or `./certificates` without a home directory
pub fn default_store_path() -> PathBuf {
    ProjectDirs::from("", "", "certutil").map_or_else(
        || PathBuf::from("certificates"),
        |dirs| dirs.data_dir().join("certificates"),
    )
}

fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
