//! Session configuration
//!
//! Every field has a default, so a caller can pass `{}` or a partial JSON
//! document and only override what it cares about.

use serde::Deserialize;

use crate::error::{PilotError, Result};
use crate::smoothing::Sensitivity;

/// Temporal smoother thresholds
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Raw classifications below this confidence count as misses
    pub min_confidence: f32,
    /// Number of recent classifications that must agree
    pub consistency_frames: usize,
    /// Minimum seconds between two confirmed changes
    pub cooldown_secs: f64,
    /// Capacity of the classification history ring buffer
    pub max_history: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.7,
            consistency_frames: 5,
            cooldown_secs: 0.5,
            max_history: 30,
        }
    }
}

/// Drone simulator parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Commands below this confidence are ignored
    pub command_gate: f32,
    pub takeoff_altitude: f32,
    /// Hover keeps altitude inside [hover_altitude_min, hover_altitude_max]
    pub hover_altitude_min: f32,
    pub hover_altitude_max: f32,
    /// Velocity added per tick by a continuous command
    pub acceleration: f32,
    /// Multiplicative drag applied to every velocity component per tick
    pub drag: f32,
    /// Per-axis velocity limit before the speed multiplier
    pub max_velocity: f32,
    /// Horizontal damping applied per tick while hovering
    pub hover_damping: f32,
    /// Continuous commands expire after this many seconds without refresh
    pub command_timeout_secs: f64,
    /// x and y are clamped to [-boundary, boundary]
    pub horizontal_boundary: f32,
    /// z is clamped to [0, ceiling]
    pub ceiling: f32,
    /// Flight seconds that drain the battery from 100 to 0
    pub full_discharge_secs: f64,
    pub history_capacity: usize,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            command_gate: 0.7,
            takeoff_altitude: 2.0,
            hover_altitude_min: 1.5,
            hover_altitude_max: 3.0,
            acceleration: 0.05,
            drag: 0.92,
            max_velocity: 0.5,
            hover_damping: 0.8,
            command_timeout_secs: 1.5,
            horizontal_boundary: 50.0,
            ceiling: 30.0,
            full_discharge_secs: 600.0,
            history_capacity: 50,
        }
    }
}

/// Pipeline-level settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Seconds without a hand before a held stable gesture is dropped
    pub detection_timeout_secs: f64,
    /// Optional preset applied on top of `smoothing`
    pub sensitivity: Option<Sensitivity>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detection_timeout_secs: 2.0,
            sensitivity: None,
        }
    }
}

/// Complete configuration for one pilot session
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    pub smoothing: SmoothingConfig,
    pub vehicle: VehicleConfig,
    pub pipeline: PipelineConfig,
}

impl PilotConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: PilotConfig = serde_json::from_str(json)?;
        if let Some(level) = config.pipeline.sensitivity {
            level.apply_to(&mut config.smoothing);
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject values the smoother or simulator cannot run with
    pub fn validate(&self) -> Result<()> {
        let s = &self.smoothing;
        if s.consistency_frames == 0 {
            return Err(invalid("smoothing.consistency_frames must be at least 1"));
        }
        if s.max_history < s.consistency_frames {
            return Err(invalid("smoothing.max_history must be >= consistency_frames"));
        }
        if !(0.0..=1.0).contains(&s.min_confidence) {
            return Err(invalid("smoothing.min_confidence must be within [0, 1]"));
        }
        if s.cooldown_secs < 0.0 {
            return Err(invalid("smoothing.cooldown_secs must not be negative"));
        }

        let v = &self.vehicle;
        if !(v.drag > 0.0 && v.drag < 1.0) {
            return Err(invalid("vehicle.drag must be within (0, 1)"));
        }
        if !(v.hover_damping > 0.0 && v.hover_damping <= 1.0) {
            return Err(invalid("vehicle.hover_damping must be within (0, 1]"));
        }
        if v.max_velocity <= 0.0 || v.acceleration <= 0.0 {
            return Err(invalid("vehicle.max_velocity and acceleration must be positive"));
        }
        if v.horizontal_boundary <= 0.0 || v.ceiling <= 0.0 {
            return Err(invalid("vehicle boundaries must be positive"));
        }
        if v.hover_altitude_min > v.hover_altitude_max {
            return Err(invalid("vehicle.hover_altitude_min exceeds hover_altitude_max"));
        }
        if v.full_discharge_secs <= 0.0 || v.command_timeout_secs <= 0.0 {
            return Err(invalid("vehicle durations must be positive"));
        }
        if v.history_capacity == 0 {
            return Err(invalid("vehicle.history_capacity must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> PilotError {
    PilotError::InvalidConfig(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = PilotConfig::from_json("{}").unwrap();
        assert_eq!(config, PilotConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = PilotConfig::from_json(r#"{"vehicle": {"max_velocity": 1.0}}"#).unwrap();
        assert_eq!(config.vehicle.max_velocity, 1.0);
        assert_eq!(config.vehicle.drag, 0.92);
        assert_eq!(config.smoothing.consistency_frames, 5);
    }

    #[test]
    fn test_sensitivity_preset_overrides_smoothing() {
        let config = PilotConfig::from_json(r#"{"pipeline": {"sensitivity": "high"}}"#).unwrap();
        assert_eq!(config.smoothing.consistency_frames, 3);
        assert_eq!(config.smoothing.min_confidence, 0.6);
        assert_eq!(config.smoothing.cooldown_secs, 0.3);
    }

    #[test]
    fn test_rejects_bad_drag() {
        let err = PilotConfig::from_json(r#"{"vehicle": {"drag": 1.5}}"#).unwrap_err();
        assert!(matches!(err, PilotError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_history_smaller_than_window() {
        let json = r#"{"smoothing": {"consistency_frames": 8, "max_history": 4}}"#;
        assert!(PilotConfig::from_json(json).is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = PilotConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, PilotError::Json(_)));
    }
}
