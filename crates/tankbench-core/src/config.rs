//! Benchmark configuration (TOML).
//!
//! Every tuning constant of the analysis lives here rather than in the code,
//! so a run can be re-tuned without a rebuild and tests can build analyzers
//! with different settings side by side.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::AnalyzerConfig;
use crate::context::ContextConfig;
use crate::turn::TurnGateConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    pub turns_per_game: u32,
    pub games_per_session: u32,
    /// Move steps per turn; larger agent requests are capped.
    pub max_move_steps: u32,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            turns_per_game: 10,
            games_per_session: 1,
            max_move_steps: 4,
        }
    }
}

/// Starting aim and the ranges the game accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimConfig {
    pub start_angle: i32,
    pub start_power: i32,
    pub max_angle: i32,
    pub max_power: i32,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            start_angle: 45,
            start_power: 50,
            max_angle: 360,
            max_power: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub analyzer: AnalyzerConfig,
    pub context: ContextConfig,
    pub turn_gate: TurnGateConfig,
    pub episode: EpisodeConfig,
    pub aim: AimConfig,
    pub logging: LoggingConfig,
}

impl BenchConfig {
    /// Read and validate a config file; a missing file means defaults.
    ///
    /// Runs before logging is installed, so callers report the fallback.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, message: &str| ConfigError::Invalid {
            field,
            message: message.to_string(),
        };

        let opponent = &self.analyzer.opponent;
        for (field, fraction) in [
            ("analyzer.opponent.x_fraction", opponent.x_fraction),
            ("analyzer.opponent.y_fraction", opponent.y_fraction),
        ] {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(invalid(field, "must be within [0, 1]"));
            }
        }
        if self.analyzer.tolerance_px < 0 {
            return Err(invalid("analyzer.tolerance_px", "must not be negative"));
        }
        if self.analyzer.hit.margin == 0 {
            return Err(invalid("analyzer.hit.margin", "must be positive"));
        }
        if self.context.max_history == 0 {
            return Err(invalid("context.max_history", "must be at least 1"));
        }
        if self.context.render_recent == 0 {
            return Err(invalid("context.render_recent", "must be at least 1"));
        }
        if let TurnGateConfig::Motion(motion) = &self.turn_gate {
            if motion.fps == 0 {
                return Err(invalid("turn_gate.fps", "must be positive"));
            }
            if motion.stable_frames == 0 {
                return Err(invalid("turn_gate.stable_frames", "must be at least 1"));
            }
        }
        if self.episode.games_per_session == 0 {
            return Err(invalid("episode.games_per_session", "must be at least 1"));
        }
        let aim = &self.aim;
        if !(0..=aim.max_angle).contains(&aim.start_angle) {
            return Err(invalid("aim.start_angle", "must be within [0, max_angle]"));
        }
        if !(0..=aim.max_power).contains(&aim.start_power) {
            return Err(invalid("aim.start_power", "must be within [0, max_power]"));
        }
        Ok(())
    }
}
