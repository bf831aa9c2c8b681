//! Simulation configuration, loaded from JSON.

use std::path::Path;

use arena_collision::CollisionConfig;
use arena_math::Aabb;
use arena_system::TickConfig;
use serde::{Deserialize, Serialize};

/// Errors raised while loading a [`SimulationConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but a value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for [`MovementSystem`](crate::MovementSystem).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Speed limit applied to every moving body.
    pub max_speed: Option<f32>,
    /// Fraction of velocity lost per second.
    pub friction: f32,
    /// Playable area. Bodies are clamped inside it and lose the velocity
    /// component along any axis they hit.
    pub bounds: Option<Aabb>,
}

/// Top-level simulation configuration.
///
/// Every section is optional in JSON and falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Tick rate and frame pacing.
    pub tick: TickConfig,
    /// Broad phase, gating, and overlap resolution.
    pub collision: CollisionConfig,
    /// Velocity integration.
    pub movement: MovementConfig,
}

impl SimulationConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tick_rate = self.tick.tick_rate;
        if !(tick_rate.is_finite() && tick_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tick.tick_rate must be positive, got {tick_rate}"
            )));
        }
        if self.tick.max_steps_per_frame == 0 {
            return Err(ConfigError::Invalid(
                "tick.max_steps_per_frame must be at least 1".to_owned(),
            ));
        }

        let cell_size = self.collision.cell_size;
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "collision.cell_size must be positive, got {cell_size}"
            )));
        }

        if let Some(max_speed) = self.movement.max_speed
            && (max_speed.is_nan() || max_speed < 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "movement.max_speed must not be negative, got {max_speed}"
            )));
        }
        let friction = self.movement.friction;
        if friction.is_nan() || friction < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "movement.friction must not be negative, got {friction}"
            )));
        }
        if let Some(bounds) = &self.movement.bounds
            && !bounds.min.cmple(bounds.max).all()
        {
            return Err(ConfigError::Invalid(
                "movement.bounds min must not exceed max".to_owned(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use arena_collision::GatingPolicy;
    use arena_math::Vec2;

    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = SimulationConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = SimulationConfig::from_json_str(
            r#"{
                "tick": { "tick_rate": 30.0 },
                "collision": { "cell_size": 20.0, "gating": "either" },
                "movement": { "max_speed": 300.0, "bounds": { "min": [0.0, 0.0], "max": [800.0, 600.0] } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.tick.tick_rate, 30.0);
        assert_eq!(config.tick.max_steps_per_frame, 5);
        assert_eq!(config.collision.cell_size, 20.0);
        assert_eq!(config.collision.gating, GatingPolicy::Either);
        assert_eq!(config.movement.max_speed, Some(300.0));
        assert_eq!(
            config.movement.bounds,
            Some(Aabb::new(Vec2::ZERO, Vec2::new(800.0, 600.0)))
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        for json in [
            r#"{"tick": {"tick_rate": 0.0}}"#,
            r#"{"tick": {"max_steps_per_frame": 0}}"#,
            r#"{"collision": {"cell_size": -1.0}}"#,
            r#"{"movement": {"max_speed": -5.0}}"#,
            r#"{"movement": {"friction": -0.5}}"#,
            r#"{"movement": {"bounds": {"min": [10.0, 0.0], "max": [0.0, 10.0]}}}"#,
        ] {
            let err = SimulationConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{json}: {err}");
        }
    }

    #[test]
    fn test_parse_error() {
        let err = SimulationConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SimulationConfig::from_json_file("/nonexistent/arena.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
