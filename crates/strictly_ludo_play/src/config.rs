//! Play configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strictly_ludo::{GameMode, PolicyKind, SeatNames};
use tracing::{debug, info, instrument};

/// Display names per color; unset colors keep the mode's default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct NameOverrides {
    /// Red seat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    red: Option<String>,
    /// Green seat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    green: Option<String>,
    /// Yellow seat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    yellow: Option<String>,
    /// Blue seat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blue: Option<String>,
}

impl NameOverrides {
    /// In seat order, ready for [`strictly_ludo::Match::start_named`].
    pub fn seat_names(&self) -> SeatNames {
        [
            self.red.clone(),
            self.green.clone(),
            self.yellow.clone(),
            self.blue.clone(),
        ]
    }
}

/// Configuration for a console session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct PlayConfig {
    /// How seats are filled.
    #[serde(default)]
    mode: GameMode,

    /// Seed for dice and computer choices; entropy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[setters(strip_option)]
    seed: Option<u64>,

    /// Policy for computer seats.
    #[serde(default)]
    policy: PolicyKind,

    /// Pause between a computer seat deciding to roll and the roll.
    #[serde(default = "default_roll_delay_ms")]
    roll_delay_ms: u64,

    /// Pause between a computer seat choosing a token and the move.
    #[serde(default = "default_think_delay_ms")]
    think_delay_ms: u64,

    /// Let the move policy play human seats too.
    #[serde(default)]
    autoplay: bool,

    /// Display name overrides.
    #[serde(default)]
    names: NameOverrides,
}

#[instrument]
fn default_roll_delay_ms() -> u64 {
    600
}

#[instrument]
fn default_think_delay_ms() -> u64 {
    900
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            seed: None,
            policy: PolicyKind::default(),
            roll_delay_ms: default_roll_delay_ms(),
            think_delay_ms: default_think_delay_ms(),
            autoplay: false,
            names: NameOverrides::default(),
        }
    }
}

impl PlayConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(mode = %config.mode, policy = %config.policy, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Serializes back to TOML.
    #[instrument(skip(self))]
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize config: {}", e)))
    }

    /// Roll pacing as a duration.
    pub fn roll_delay(&self) -> Duration {
        Duration::from_millis(self.roll_delay_ms)
    }

    /// Move pacing as a duration.
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    /// Seed for the computer seats' policy, kept apart from the dice seed.
    pub fn policy_seed(&self) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(1))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file).unwrap();
        let config = PlayConfig::from_file(file.path()).unwrap();
        assert_eq!(config, PlayConfig::default());
        assert_eq!(config.roll_delay(), Duration::from_millis(600));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "mode = \"two-player-human\"\nseed = 7\n\n[names]\nyellow = \"Grace\""
        )
        .unwrap();
        let config = PlayConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.mode(), GameMode::TwoPlayerHuman);
        assert_eq!(*config.seed(), Some(7));
        assert_eq!(*config.policy(), PolicyKind::Random);
        assert_eq!(*config.think_delay_ms(), 900);
        assert_eq!(
            config.names().seat_names(),
            [None, None, Some("Grace".to_string()), None]
        );
    }

    #[test]
    fn test_bad_mode_is_reported_with_location() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode = \"three-player\"").unwrap();
        let err = PlayConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlayConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, PlayConfig::default());
    }

    #[test]
    fn test_toml_round_trip_and_setters() {
        let config = PlayConfig::default()
            .with_mode(GameMode::FourPlayerHuman)
            .with_seed(3)
            .with_policy(PolicyKind::Heuristic)
            .with_autoplay(true);
        let text = config.to_toml().unwrap();
        let back: PlayConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
        assert_ne!(config.policy_seed(), Some(3));
    }
}
