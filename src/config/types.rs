//! Core configuration types and loading.

use serde::Deserialize;
use spachat_proto::AvatarStyle;
use std::path::Path;
use thiserror::Error;

use super::defaults::*;
use super::validation::{ValidationError, validate};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", format_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Model configuration.
///
/// Every section is optional; an empty file yields [`Config::default`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Anonymous placeholder and client id generation.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Style given to a freshly logged-in user until the backend confirms.
    #[serde(default)]
    pub avatar: AvatarConfig,
    /// Chat room settings.
    #[serde(default)]
    pub chat: ChatConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// Identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Fixed client id of the anonymous placeholder (default: "a0").
    #[serde(default = "default_anon_id")]
    pub anon_id: String,
    /// Display name of the anonymous placeholder (default: "anonymous").
    #[serde(default = "default_anon_name")]
    pub anon_name: String,
    /// Prefix of generated client ids (default: "c").
    #[serde(default = "default_client_id_prefix")]
    pub client_id_prefix: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            anon_id: default_anon_id(),
            anon_name: default_anon_name(),
            client_id_prefix: default_client_id_prefix(),
        }
    }
}

/// Default avatar for pending logins.
#[derive(Debug, Clone, Deserialize)]
pub struct AvatarConfig {
    #[serde(default = "default_avatar_top")]
    pub top: i32,
    #[serde(default = "default_avatar_left")]
    pub left: i32,
    #[serde(default = "default_avatar_background")]
    pub background_color: String,
}

impl AvatarConfig {
    /// The style a new login starts with.
    pub fn default_style(&self) -> AvatarStyle {
        AvatarStyle::new(self.top, self.left, self.background_color.clone())
    }
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            top: default_avatar_top(),
            left: default_avatar_left(),
            background_color: default_avatar_background(),
        }
    }
}

/// Chat room configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Room named in the `joinchat` intent (default: "lobby").
    #[serde(default = "default_room")]
    pub room: String,
    /// Outgoing intent queue capacity for channel transports (default: 64).
    #[serde(default = "default_transport_capacity")]
    pub transport_capacity: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            room: default_room(),
            transport_capacity: default_transport_capacity(),
        }
    }
}
