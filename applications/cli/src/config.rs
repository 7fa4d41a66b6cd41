//! CLI configuration
//!
//! Read from an optional `amuzz.toml`, then overridden by `AMUZZ_*`
//! environment variables (nested keys use `__`, e.g. `AMUZZ_BACKEND__URL`).

use crate::error::{CliError, Result};
use amuzz_client::ClientConfig;
use amuzz_core::AuthToken;
use amuzz_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "amuzz.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default = "default_player")]
    pub player: PlayerSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendSettings {
    #[serde(default = "default_backend_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthSettings {
    /// Bearer token for the playlist endpoints
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSettings {
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f32,

    /// Source tag used on playlist events published by this tool
    #[serde(default = "default_source")]
    pub source: String,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with AMUZZ_)
        settings = settings.add_source(
            config::Environment::with_prefix("AMUZZ")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.backend.url)
            .map_err(|e| CliError::Config(format!("backend.url is invalid: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CliError::Config(
                "backend.url must start with http:// or https://".to_string(),
            ));
        }

        if self.backend.timeout_secs == 0 || self.backend.connect_timeout_secs == 0 {
            return Err(CliError::Config("timeouts must be at least 1 second".to_string()));
        }

        if !(0.0..=1.0).contains(&self.player.initial_volume) {
            return Err(CliError::Config(format!(
                "player.initial_volume must be between 0 and 1, got {}",
                self.player.initial_volume
            )));
        }

        if self.player.source.trim().is_empty() {
            return Err(CliError::Config("player.source cannot be empty".to_string()));
        }

        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.backend.url.clone())
            .with_timeout(Duration::from_secs(self.backend.timeout_secs))
            .with_connect_timeout(Duration::from_secs(self.backend.connect_timeout_secs))
    }

    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            initial_volume: self.player.initial_volume,
            ..PlayerConfig::default()
        }
    }

    /// Bearer token, required by every playlist command
    pub fn token(&self) -> Result<AuthToken> {
        let token = self.auth.token.trim();
        if token.is_empty() {
            return Err(CliError::Config(
                "auth token is required (set AMUZZ_AUTH__TOKEN or --token)".to_string(),
            ));
        }
        Ok(AuthToken::new(token))
    }
}

// Default values
fn default_backend() -> BackendSettings {
    BackendSettings {
        url: default_backend_url(),
        timeout_secs: default_timeout_secs(),
        connect_timeout_secs: default_connect_timeout_secs(),
    }
}

fn default_backend_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_player() -> PlayerSettings {
    PlayerSettings {
        initial_volume: default_initial_volume(),
        source: default_source(),
    }
}

fn default_initial_volume() -> f32 {
    1.0
}

fn default_source() -> String {
    "cli".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            auth: AuthSettings::default(),
            player: default_player(),
        }
    }
}
