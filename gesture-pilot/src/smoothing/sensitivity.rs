//! Sensitivity presets
//!
//! Each level is a coordinated triple of (min confidence, consistency
//! window, cooldown). Looser windows react faster and flicker more.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::SmoothingConfig;
use crate::error::PilotError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// Very stable
    Low,
    #[default]
    Medium,
    /// Most responsive
    High,
}

impl Sensitivity {
    /// (min confidence, consistency frames, cooldown seconds)
    pub fn thresholds(&self) -> (f32, usize, f64) {
        match self {
            Sensitivity::Low => (0.8, 8, 1.0),
            Sensitivity::Medium => (0.7, 5, 0.5),
            Sensitivity::High => (0.6, 3, 0.3),
        }
    }

    /// Overwrite the triple, leaving `max_history` alone
    pub fn apply_to(&self, config: &mut SmoothingConfig) {
        let (min_confidence, consistency_frames, cooldown_secs) = self.thresholds();
        config.min_confidence = min_confidence;
        config.consistency_frames = consistency_frames;
        config.cooldown_secs = cooldown_secs;
    }

    /// Preset whose triple equals the given thresholds, if any
    pub fn matching(config: &SmoothingConfig) -> Option<Self> {
        [Sensitivity::Low, Sensitivity::Medium, Sensitivity::High]
            .into_iter()
            .find(|level| {
                let (min_confidence, consistency_frames, cooldown_secs) = level.thresholds();
                config.min_confidence == min_confidence
                    && config.consistency_frames == consistency_frames
                    && config.cooldown_secs == cooldown_secs
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::Low => "low",
            Sensitivity::Medium => "medium",
            Sensitivity::High => "high",
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sensitivity {
    type Err = PilotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Sensitivity::Low),
            "medium" => Ok(Sensitivity::Medium),
            "high" => Ok(Sensitivity::High),
            other => Err(PilotError::InvalidSensitivity(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("low".parse::<Sensitivity>().unwrap(), Sensitivity::Low);
        assert_eq!("high".parse::<Sensitivity>().unwrap(), Sensitivity::High);
        assert!(matches!(
            "extreme".parse::<Sensitivity>(),
            Err(PilotError::InvalidSensitivity(_))
        ));
    }

    #[test]
    fn test_medium_matches_default_config() {
        let mut config = SmoothingConfig {
            min_confidence: 0.1,
            consistency_frames: 1,
            cooldown_secs: 9.0,
            max_history: 30,
        };
        Sensitivity::Medium.apply_to(&mut config);
        assert_eq!(config, SmoothingConfig::default());
    }

    #[test]
    fn test_matching_preset() {
        assert_eq!(
            Sensitivity::matching(&SmoothingConfig::default()),
            Some(Sensitivity::Medium)
        );

        let mut config = SmoothingConfig::default();
        Sensitivity::High.apply_to(&mut config);
        assert_eq!(Sensitivity::matching(&config), Some(Sensitivity::High));

        config.consistency_frames = 4;
        assert_eq!(Sensitivity::matching(&config), None);
    }

    #[test]
    fn test_presets_trade_stability_for_speed() {
        let (low_conf, low_frames, low_cool) = Sensitivity::Low.thresholds();
        let (high_conf, high_frames, high_cool) = Sensitivity::High.thresholds();
        assert!(low_conf > high_conf);
        assert!(low_frames > high_frames);
        assert!(low_cool > high_cool);
    }
}
