//! Classifier module - rule-based gesture recognition
//!
//! Landmarks → geometric features → ordered rule cascade.

mod angles;
mod features;
mod landmarks;
mod model;
mod rules;

pub use angles::joint_angle;
pub use features::{
    extract_features, FeatureBundle, FingerDistances, PalmNormal, PalmOrientation, ThumbPosition,
};
pub use landmarks::{Finger, JointFrame, FINGERTIPS, FLAT_LEN, JOINT_COUNT};
pub use model::{gesture_catalog, Command, Gesture, GestureInfo, GESTURE_NAMES};
pub use rules::{
    evaluate_rules, ClassificationResult, ClassifierStats, GestureClassifier, Rule, RULES,
};

#[cfg(test)]
pub(crate) use features::test_hands;
