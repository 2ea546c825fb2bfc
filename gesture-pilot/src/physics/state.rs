//! Vehicle state - shared data structure for the flight model

use nalgebra::Vector3;
use serde::Serialize;

/// Attitude in degrees
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

/// Raw physical state of the simulated drone
///
/// Axes: x lateral (right +), y forward, z altitude.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleState {
    pub position: Vector3<f32>,

    /// Units per tick
    pub velocity: Vector3<f32>,

    /// Cosmetic tilt derived from velocity
    pub rotation: Rotation,

    pub is_flying: bool,

    /// Percent, 0-100
    pub battery: f32,

    /// Cumulative path length
    pub distance_traveled: f32,

    /// Seconds spent airborne
    pub flight_time: f64,
}

impl VehicleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speed magnitude of the vehicle
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }

    pub fn altitude(&self) -> f32 {
        self.position.z
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            rotation: Rotation::default(),
            is_flying: false,
            battery: 100.0,
            distance_traveled: 0.0,
            flight_time: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = VehicleState::new();
        assert_eq!(state.position, Vector3::zeros());
        assert_eq!(state.battery, 100.0);
        assert!(!state.is_flying);
        assert_eq!(state.speed(), 0.0);
    }

    #[test]
    fn test_speed_and_altitude() {
        let state = VehicleState {
            position: Vector3::new(0.0, 0.0, 2.5),
            velocity: Vector3::new(0.3, 0.4, 0.0),
            ..VehicleState::default()
        };
        assert!((state.speed() - 0.5).abs() < 1e-6);
        assert_eq!(state.altitude(), 2.5);
    }
}
