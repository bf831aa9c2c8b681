//! Tick loop configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the fixed-timestep tick loop.
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// Upper bound on fixed steps taken for one frame in
    /// [`TickLoop::advance`](crate::TickLoop::advance).
    pub max_steps_per_frame: u32,
}

impl TickConfig {
    /// Length of one tick in seconds.
    #[must_use]
    pub fn fixed_dt(&self) -> f64 {
        1.0 / self.tick_rate
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
            max_steps_per_frame: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TickConfig = serde_json::from_str(r#"{"tick_rate": 30.0}"#).unwrap();
        assert_eq!(config.tick_rate, 30.0);
        assert_eq!(config.max_ticks, 0);
        assert_eq!(config.max_steps_per_frame, 5);
    }

    #[test]
    fn test_fixed_dt() {
        let config = TickConfig {
            tick_rate: 4.0,
            ..TickConfig::default()
        };
        assert_eq!(config.fixed_dt(), 0.25);
    }
}
