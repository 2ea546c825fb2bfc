//! Landmark intake from JavaScript
//!
//! MediaPipe Hands results arrive as a flat Float32Array of 63 values
//! (21 landmarks × x, y, z). An empty array means no hand this frame.

use crate::classifier::JointFrame;
use crate::error::Result;

/// Parse one frame of hand landmarks
///
/// `Ok(None)` for an empty buffer, an error for any other wrong length.
pub fn parse_landmarks(data: &[f32]) -> Result<Option<JointFrame>> {
    if data.is_empty() {
        return Ok(None);
    }
    JointFrame::from_flat(data).map(Some)
}

/// Reject frames carrying NaN/inf coordinates, treating them as no hand
pub fn finite_frame(frame: Option<JointFrame>) -> Option<JointFrame> {
    frame.filter(|f| f.joints().iter().all(|j| j.iter().all(|c| c.is_finite())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FLAT_LEN;
    use crate::error::PilotError;

    #[test]
    fn test_empty_is_no_hand() {
        assert!(parse_landmarks(&[]).unwrap().is_none());
    }

    #[test]
    fn test_full_frame() {
        let data: Vec<f32> = (0..FLAT_LEN).map(|i| i as f32 / 100.0).collect();
        let frame = parse_landmarks(&data).unwrap().unwrap();
        assert_eq!(frame.joint(1).x, 0.03);
    }

    #[test]
    fn test_wrong_length() {
        let err = parse_landmarks(&[0.5; 99]).unwrap_err();
        assert!(matches!(
            err,
            PilotError::InvalidLandmarks { len: 99, expected: 63 }
        ));
    }

    #[test]
    fn test_non_finite_dropped() {
        let mut data = vec![0.5; FLAT_LEN];
        data[10] = f32::NAN;
        let frame = parse_landmarks(&data).unwrap();
        assert!(frame.is_some());
        assert!(finite_frame(frame).is_none());

        let frame = parse_landmarks(&[0.5; FLAT_LEN]).unwrap();
        assert!(finite_frame(frame).is_some());
    }
}
