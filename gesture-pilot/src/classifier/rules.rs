//! Priority-ordered gesture rules
//!
//! Rules run most-specific-first and the first match wins. The order of
//! `RULES` is part of the behavior: moving an entry changes which label a
//! pose receives.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use super::features::FeatureBundle;
use super::landmarks::Finger;
use super::model::Gesture;

/// Thumb-index tip distance below which the hand is pinching
pub const PINCH_DISTANCE: f32 = 0.05;
/// |thumb direction x| needed to call it pointing sideways
pub const LATERAL_THRESHOLD: f32 = 0.5;
/// Lateral component must beat the vertical one by this factor
pub const LATERAL_DOMINANCE: f32 = 1.2;
/// Palm yaw (degrees) that counts as strongly sideways
pub const STRONG_YAW_DEG: f32 = 45.0;
/// |hand direction y| needed for up/down
pub const VERTICAL_DIRECTION: f32 = 0.6;
/// |pitch| (degrees) that also counts as up/down
pub const STRONG_PITCH_DEG: f32 = 55.0;
/// Spread above this is an open "stop" palm, at or below it a flat "go" hand
pub const STOP_SPREAD: f32 = 0.10;
/// Facing-viewer band for the forward gesture
pub const FORWARD_MIN_PITCH_DEG: f32 = 60.0;
pub const FORWARD_MAX_YAW_DEG: f32 = 25.0;

/// One entry of the cascade
pub struct Rule {
    pub name: &'static str,
    pub gesture: Gesture,
    /// Returns the confidence when the rule matches
    pub evaluate: fn(&FeatureBundle) -> Option<f32>,
}

/// The cascade, highest priority first
pub const RULES: [Rule; 8] = [
    Rule { name: "pinch", gesture: Gesture::Land, evaluate: land },
    Rule { name: "fist", gesture: Gesture::Back, evaluate: back },
    Rule { name: "thumb_left", gesture: Gesture::Left, evaluate: left },
    Rule { name: "thumb_right", gesture: Gesture::Right, evaluate: right },
    Rule { name: "point_up", gesture: Gesture::Up, evaluate: up },
    Rule { name: "point_down", gesture: Gesture::Down, evaluate: down },
    Rule { name: "open_palm", gesture: Gesture::Stop, evaluate: stop },
    Rule { name: "flat_hand", gesture: Gesture::Forward, evaluate: forward },
];

/// Output of one classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub gesture: Option<Gesture>,
    pub confidence: f32,
}

impl ClassificationResult {
    pub const NONE: ClassificationResult = ClassificationResult {
        gesture: None,
        confidence: 0.0,
    };
}

/// Run the cascade without touching any statistics
pub fn evaluate_rules(features: &FeatureBundle) -> ClassificationResult {
    for rule in &RULES {
        if let Some(confidence) = (rule.evaluate)(features) {
            trace!(rule = rule.name, gesture = %rule.gesture, confidence, "rule matched");
            return ClassificationResult {
                gesture: Some(rule.gesture),
                confidence: confidence.clamp(0.0, 1.0),
            };
        }
    }
    ClassificationResult::NONE
}

fn four_fingers_extended(f: &FeatureBundle) -> bool {
    [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky]
        .iter()
        .all(|&finger| f.is_extended(finger))
}

fn land(f: &FeatureBundle) -> Option<f32> {
    let pinching = f.is_extended(Finger::Thumb)
        && f.is_extended(Finger::Index)
        && f.distances.thumb_index < PINCH_DISTANCE;
    let others = f.is_extended(Finger::Middle)
        && f.is_extended(Finger::Ring)
        && f.is_extended(Finger::Pinky);
    (pinching && others).then_some(0.95)
}

fn back(f: &FeatureBundle) -> Option<f32> {
    if f.extended_count != 0 {
        return None;
    }
    Some(if f.palm_normal.facing_away { 0.98 } else { 0.95 })
}

/// Thumb alone, pointing sideways. `sign` is -1 for left, +1 for right.
fn thumb_sideways(f: &FeatureBundle, sign: f32) -> bool {
    if !f.only_extended(Finger::Thumb) {
        return false;
    }
    let lateral = f.thumb_direction.x * sign;
    let dominant = f.thumb_direction.x.abs() > f.thumb_direction.y.abs() * LATERAL_DOMINANCE;
    let pointing = lateral > LATERAL_THRESHOLD && dominant;
    let yawed = f.palm_orientation.yaw * sign > STRONG_YAW_DEG;
    pointing || yawed
}

fn left(f: &FeatureBundle) -> Option<f32> {
    thumb_sideways(f, -1.0).then_some(0.93)
}

fn right(f: &FeatureBundle) -> Option<f32> {
    thumb_sideways(f, 1.0).then_some(0.93)
}

fn pointing_up(f: &FeatureBundle) -> bool {
    f.hand_direction.y < -VERTICAL_DIRECTION || f.palm_orientation.pitch > STRONG_PITCH_DEG
}

fn up(f: &FeatureBundle) -> Option<f32> {
    if !pointing_up(f) || !f.is_extended(Finger::Index) {
        return None;
    }
    let others_closed = !f.is_extended(Finger::Middle)
        && !f.is_extended(Finger::Ring)
        && !f.is_extended(Finger::Pinky);
    if !others_closed {
        return None;
    }
    if f.is_extended(Finger::Thumb) {
        Some(0.90)
    } else {
        Some(0.94)
    }
}

fn down(f: &FeatureBundle) -> Option<f32> {
    let pointing_down =
        f.hand_direction.y > VERTICAL_DIRECTION || f.palm_orientation.pitch < -STRONG_PITCH_DEG;
    (f.extended_count >= 1 && pointing_down).then_some(0.91)
}

fn stop(f: &FeatureBundle) -> Option<f32> {
    let open = f.extended_count >= 4 && four_fingers_extended(f);
    (open && f.finger_spread > STOP_SPREAD).then_some(0.96)
}

fn forward(f: &FeatureBundle) -> Option<f32> {
    if f.extended_count < 4 || f.finger_spread > STOP_SPREAD {
        return None;
    }
    let o = f.palm_orientation;
    if o.pitch <= FORWARD_MIN_PITCH_DEG || o.yaw.abs() >= FORWARD_MAX_YAW_DEG {
        return None;
    }
    // Back of the hand toward the camera is not a "go" palm
    if f.palm_normal.facing_away {
        return None;
    }
    Some(if f.palm_normal.facing_viewer { 0.94 } else { 0.90 })
}

/// Snapshot of classification counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierStats {
    pub total_classifications: u64,
    pub gesture_counts: BTreeMap<&'static str, u64>,
    /// Empty until something has been classified
    pub gesture_percentages: BTreeMap<&'static str, f64>,
}

/// Rule cascade plus a running tally of emitted labels
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    counts: [u64; Gesture::COUNT],
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one frame and count the emitted label
    pub fn classify(&mut self, features: &FeatureBundle) -> ClassificationResult {
        let result = evaluate_rules(features);
        if let Some(gesture) = result.gesture {
            self.counts[gesture.index()] += 1;
        }
        result
    }

    pub fn count(&self, gesture: Gesture) -> u64 {
        self.counts[gesture.index()]
    }

    pub fn stats(&self) -> ClassifierStats {
        let total: u64 = self.counts.iter().sum();
        let gesture_counts = Gesture::ALL
            .iter()
            .map(|g| (g.as_str(), self.count(*g)))
            .collect();
        let gesture_percentages = if total > 0 {
            Gesture::ALL
                .iter()
                .map(|g| (g.as_str(), self.count(*g) as f64 / total as f64 * 100.0))
                .collect()
        } else {
            BTreeMap::new()
        };

        ClassifierStats {
            total_classifications: total,
            gesture_counts,
            gesture_percentages,
        }
    }

    pub fn reset_stats(&mut self) {
        self.counts = [0; Gesture::COUNT];
    }
}
