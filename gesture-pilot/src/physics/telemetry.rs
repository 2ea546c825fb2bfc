//! Telemetry records
//!
//! Read-only snapshots built from `VehicleState`, rounded for display.

use nalgebra::Vector3;
use serde::Serialize;

use crate::classifier::{Command, Gesture};

use super::state::{Rotation, VehicleState};

/// Round to `decimals` places
pub fn round_to(value: f32, decimals: i32) -> f32 {
    let scale = 10f32.powi(decimals);
    (value * scale).round() / scale
}

fn round_f64(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Plain `{x, y, z}` record
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn rounded(v: &Vector3<f32>, decimals: i32) -> Self {
        Self {
            x: round_to(v.x, decimals),
            y: round_to(v.y, decimals),
            z: round_to(v.z, decimals),
        }
    }
}

impl From<&Vector3<f32>> for Vec3 {
    fn from(v: &Vector3<f32>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl Rotation {
    fn rounded(&self) -> Self {
        Self {
            pitch: round_to(self.pitch, 1),
            yaw: round_to(self.yaw, 1),
            roll: round_to(self.roll, 1),
        }
    }
}

/// One accepted command in the flight log
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Controller clock, seconds
    pub timestamp: f64,
    pub command: Command,
    pub position: Vec3,
    pub rotation: Rotation,
}

impl HistoryEntry {
    pub fn record(timestamp: f64, command: Command, state: &VehicleState) -> Self {
        Self {
            timestamp: round_f64(timestamp, 3),
            command,
            position: Vec3::rounded(&state.position, 2),
            rotation: state.rotation.rounded(),
        }
    }
}

/// Full status record returned after every command and on query
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VehicleStatus {
    pub position: Vec3,
    pub rotation: Rotation,
    pub velocity: Vec3,
    pub is_flying: bool,
    pub battery: f32,
    pub speed: f32,
    pub altitude: f32,
    pub distance_traveled: f32,
    pub flight_time: f64,
    pub command_history: Vec<HistoryEntry>,
    pub current_command: Option<Gesture>,
    pub speed_multiplier: f32,
}

impl VehicleStatus {
    pub fn snapshot(
        state: &VehicleState,
        history: Vec<HistoryEntry>,
        current_command: Option<Gesture>,
        speed_multiplier: f32,
    ) -> Self {
        Self {
            position: Vec3::rounded(&state.position, 2),
            rotation: state.rotation.rounded(),
            velocity: Vec3::from(&state.velocity),
            is_flying: state.is_flying,
            battery: round_to(state.battery, 1),
            speed: round_to(state.speed(), 2),
            altitude: round_to(state.altitude(), 2),
            distance_traveled: round_to(state.distance_traveled, 2),
            flight_time: round_f64(state.flight_time, 2),
            command_history: history,
            current_command,
            speed_multiplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(99.96, 1), 100.0);
        assert_eq!(round_to(1.234, 2), 1.23);
    }

    #[test]
    fn test_snapshot_rounds_fields() {
        let state = VehicleState {
            position: Vector3::new(1.23456, -2.0, 2.0049),
            velocity: Vector3::new(0.0, 0.1234, 0.0),
            battery: 87.654,
            flight_time: 74.0777,
            is_flying: true,
            ..VehicleState::default()
        };
        let status = VehicleStatus::snapshot(&state, Vec::new(), Some(Gesture::Forward), 1.0);
        assert_eq!(status.position.x, 1.23);
        assert_eq!(status.altitude, 2.0);
        assert_eq!(status.battery, 87.7);
        assert_eq!(status.speed, 0.12);
        assert_eq!(status.flight_time, 74.08);
    }

    #[test]
    fn test_velocity_is_not_rounded() {
        let state = VehicleState {
            velocity: Vector3::new(0.0004, -0.00002, 0.3),
            ..VehicleState::default()
        };
        let status = VehicleStatus::snapshot(&state, Vec::new(), None, 1.0);
        assert_eq!(status.velocity.x, 0.0004);
        assert_eq!(status.velocity.y, -0.00002);
        assert_eq!(status.velocity.z, 0.3);
    }

    #[test]
    fn test_status_serializes_names() {
        let state = VehicleState::default();
        let entry = HistoryEntry::record(1.5, Command::Gesture(Gesture::Stop), &state);
        let status = VehicleStatus::snapshot(&state, vec![entry], Some(Gesture::Forward), 1.5);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["current_command"], "go_forward");
        assert_eq!(json["command_history"][0]["command"], "stop");
        assert_eq!(json["position"]["z"], 0.0);
        assert_eq!(json["speed_multiplier"], 1.5);
    }
}
