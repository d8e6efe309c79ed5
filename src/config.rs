// config.rs

use config::{Config, ConfigError, Environment, File};
use log::{debug, LevelFilter};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CLIENT_NAME: &str = "midistate";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const ENV_PREFIX: &str = "MIDISTATE";

/// Runtime settings of the monitor.
///
/// Sources, lowest precedence first: built-in defaults, an optional TOML
/// file, `MIDISTATE_*` environment variables. Command line flags are applied
/// on top by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Client name registered with the MIDI driver
    pub client_name: String,
    pub log_level: String,
    /// Substring of the input port name to bind to
    pub device: Option<String>,
    /// Print the device snapshot as JSON on every state change
    pub print_json: bool,
}

impl Settings {
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("client_name", DEFAULT_CLIENT_NAME)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .set_default("print_json", false)?;

        if let Some(path) = config_path {
            debug!("Reading settings from {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_name.trim().is_empty() {
            return Err(ConfigError::Message(
                "client_name must not be empty".to_string(),
            ));
        }
        self.level_filter().map(|_| ())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::Message(format!("unknown log level '{}'", self.log_level)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            device: None,
            print_json: false,
        }
    }
}
