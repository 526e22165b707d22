//! Engine configuration.
//!
//! Limits applied when tournaments are created and participants register.

use serde::{Deserialize, Serialize};

/// Hard floor for the participant minimum: a bracket needs two sides.
pub const MIN_BRACKET_PARTICIPANTS: usize = 2;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound for `max_teams`; larger requests are clamped (default: 64)
    pub max_teams_cap: usize,

    /// Participants required to start (default: 2)
    pub min_participants: usize,

    /// Display names are truncated to this many characters (default: 50)
    pub max_display_name_len: usize,

    /// Team names are truncated to this many characters (default: 30)
    pub max_team_name_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_teams_cap: 64,
            min_participants: MIN_BRACKET_PARTICIPANTS,
            max_display_name_len: 50,
            max_team_name_len: 30,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - `TOURNEY_MAX_TEAMS_CAP` (default: 64)
    /// - `TOURNEY_MIN_PARTICIPANTS` (default: 2)
    /// - `TOURNEY_MAX_DISPLAY_NAME_LEN` (default: 50)
    /// - `TOURNEY_MAX_TEAM_NAME_LEN` (default: 30)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_teams_cap: parse_env_or("TOURNEY_MAX_TEAMS_CAP", defaults.max_teams_cap),
            min_participants: parse_env_or("TOURNEY_MIN_PARTICIPANTS", defaults.min_participants),
            max_display_name_len: parse_env_or(
                "TOURNEY_MAX_DISPLAY_NAME_LEN",
                defaults.max_display_name_len,
            ),
            max_team_name_len: parse_env_or(
                "TOURNEY_MAX_TEAM_NAME_LEN",
                defaults.max_team_name_len,
            ),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_participants < MIN_BRACKET_PARTICIPANTS {
            return Err(ConfigError::Invalid {
                var: "TOURNEY_MIN_PARTICIPANTS".to_string(),
                reason: format!("Must be at least {MIN_BRACKET_PARTICIPANTS}"),
            });
        }

        if self.max_teams_cap < self.min_participants {
            return Err(ConfigError::Invalid {
                var: "TOURNEY_MAX_TEAMS_CAP".to_string(),
                reason: format!(
                    "Must be at least the participant minimum ({})",
                    self.min_participants
                ),
            });
        }

        if self.max_display_name_len == 0 {
            return Err(ConfigError::Invalid {
                var: "TOURNEY_MAX_DISPLAY_NAME_LEN".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.max_team_name_len == 0 {
            return Err(ConfigError::Invalid {
                var: "TOURNEY_MAX_TEAM_NAME_LEN".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
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
