//! Joint angle calculation using dot product
//!
//! Angle at the middle point of three joints, e.g. MCP→PIP→tip for a finger.

use nalgebra::Vector3;

/// Calculate the angle at `joint` in degrees
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
///
/// Returns angle in degrees:
/// - 0° = folded back onto itself
/// - 180° = fully straight
pub fn joint_angle(parent: Vector3<f32>, joint: Vector3<f32>, child: Vector3<f32>) -> f32 {
    let v1 = parent - joint;
    let v2 = child - joint;

    let mag1 = v1.norm();
    let mag2 = v2.norm();

    // Handle degenerate case
    if mag1 < 0.0001 || mag2 < 0.0001 {
        return 180.0; // Assume straight if we can't calculate
    }

    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_finger() {
        let angle = joint_angle(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, -0.5, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
        );
        assert!((angle - 180.0).abs() < 1.0);
    }

    #[test]
    fn test_right_angle_in_depth() {
        let angle = joint_angle(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.5, 0.0, 0.0),
            Vector3::new(0.5, 0.0, 0.5),
        );
        assert!((angle - 90.0).abs() < 1.0);
    }

    #[test]
    fn test_degenerate_is_straight() {
        let p = Vector3::new(0.3, 0.3, 0.0);
        assert_eq!(joint_angle(p, p, Vector3::new(0.5, 0.5, 0.0)), 180.0);
    }
}
