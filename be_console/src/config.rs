//! Console configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use bracket_engine::{ConfigError, EngineConfig};

/// Complete console configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Chat group the console acts in
    pub group_id: String,
    /// User recorded as organizer of created tournaments
    pub organizer_id: String,
    /// Keep JSON snapshots of every committed mutation
    pub snapshots: bool,
    /// Engine limits
    pub engine: EngineConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            group_id: "console".to_string(),
            organizer_id: "organizer".to_string(),
            snapshots: false,
            engine: EngineConfig::default(),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables
    ///
    /// - `CONSOLE_GROUP_ID` (default: `console`)
    /// - `CONSOLE_ORGANIZER_ID` (default: `organizer`)
    /// - `CONSOLE_SNAPSHOTS` (default: `false`)
    /// - engine limits, see [`EngineConfig::from_env`]
    ///
    /// # Errors
    ///
    /// Returns error if the loaded values fail validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            group_id: std::env::var("CONSOLE_GROUP_ID").unwrap_or(defaults.group_id),
            organizer_id: std::env::var("CONSOLE_ORGANIZER_ID").unwrap_or(defaults.organizer_id),
            snapshots: parse_env_or("CONSOLE_SNAPSHOTS", defaults.snapshots),
            engine: EngineConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.group_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "CONSOLE_GROUP_ID".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.organizer_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "CONSOLE_ORGANIZER_ID".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        self.engine.validate()
    }
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
