//! Drone flight model
//!
//! Commands only change intent (flying flag, active continuous command).
//! Motion comes from `advance`, which runs every tick whether or not a new
//! command arrived.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::buffer::RingBuffer;
use crate::classifier::{Command, Gesture};
use crate::config::VehicleConfig;

use super::state::VehicleState;
use super::telemetry::{HistoryEntry, VehicleStatus};

/// Speed multiplier limits
pub const MIN_SPEED_MULTIPLIER: f32 = 0.5;
pub const MAX_SPEED_MULTIPLIER: f32 = 2.0;

/// History entries included in a status snapshot
pub const STATUS_HISTORY: usize = 10;

/// Tilt in degrees at full speed
const MAX_TILT_DEG: f32 = 15.0;

/// How a command was handled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutcome {
    Executed,
    LowConfidence,
    NotFlying,
    NotRecognized,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommandResponse {
    /// Label as received
    pub command: String,
    pub outcome: CommandOutcome,
    pub message: String,
}

impl CommandResponse {
    fn new(command: &str, outcome: CommandOutcome, message: impl Into<String>) -> Self {
        Self {
            command: command.to_string(),
            outcome,
            message: message.into(),
        }
    }

    pub fn executed(&self) -> bool {
        self.outcome == CommandOutcome::Executed
    }
}

/// Continuous command currently driving the vehicle
#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveCommand {
    gesture: Gesture,
    /// Controller clock when last (re)confirmed
    refreshed_at: f64,
}

pub struct VehicleController {
    config: VehicleConfig,
    state: VehicleState,
    active: Option<ActiveCommand>,
    history: RingBuffer<HistoryEntry>,
    speed_multiplier: f32,
    /// Sum of every `advance` dt
    clock: f64,
    battery_warned: bool,
}

impl VehicleController {
    pub fn new(config: VehicleConfig) -> Self {
        let history = RingBuffer::new(config.history_capacity);
        Self {
            config,
            state: VehicleState::new(),
            active: None,
            history,
            speed_multiplier: 1.0,
            clock: 0.0,
            battery_warned: false,
        }
    }

    /// Apply a command at the given confidence
    ///
    /// Rejections are returned as outcomes, never as errors. Callers read
    /// `status()` for the resulting state.
    pub fn apply_command(&mut self, command: Command, confidence: f32) -> CommandResponse {
        let name = command.as_str();

        if !(confidence >= self.config.command_gate) {
            debug!(command = name, confidence, "command ignored, low confidence");
            return CommandResponse::new(
                name,
                CommandOutcome::LowConfidence,
                format!("Confidence {:.2} below threshold", confidence),
            );
        }

        let gesture = match command {
            Command::Reset => {
                self.reset();
                return CommandResponse::new(name, CommandOutcome::Executed, "Vehicle reset");
            }
            Command::Gesture(g) => g,
        };

        let message = match gesture {
            Gesture::Stop if !self.state.is_flying => {
                self.take_off();
                "Taking off".to_string()
            }
            Gesture::Stop => {
                self.activate(Gesture::Stop);
                "Hovering".to_string()
            }
            _ if !self.state.is_flying => {
                debug!(command = name, "command rejected, not flying");
                return CommandResponse::new(name, CommandOutcome::NotFlying, "Drone is not flying");
            }
            Gesture::Land => {
                self.land();
                "Landing".to_string()
            }
            g => {
                self.activate(g);
                format!("Executing {}", g)
            }
        };

        self.history
            .push(HistoryEntry::record(self.clock, command, &self.state));

        CommandResponse::new(name, CommandOutcome::Executed, message)
    }

    /// Parse a label then apply it
    pub fn apply_label(&mut self, label: &str, confidence: f32) -> CommandResponse {
        match label.parse::<Command>() {
            Ok(command) => self.apply_command(command, confidence),
            Err(e) => {
                debug!(label, "command not recognized");
                CommandResponse::new(label, CommandOutcome::NotRecognized, e.to_string())
            }
        }
    }

    fn take_off(&mut self) {
        self.state.is_flying = true;
        self.state.position.z = self.config.takeoff_altitude;
        self.state.velocity.fill(0.0);
        self.active = None;
        info!(altitude = self.config.takeoff_altitude, "takeoff");
    }

    fn land(&mut self) {
        self.state.is_flying = false;
        self.state.velocity.fill(0.0);
        self.state.position.z = 0.0;
        self.active = None;
        info!(
            x = self.state.position.x,
            y = self.state.position.y,
            "landed"
        );
    }

    fn activate(&mut self, gesture: Gesture) {
        self.active = Some(ActiveCommand {
            gesture,
            refreshed_at: self.clock,
        });
    }

    /// Refresh the active command if it matches `gesture`
    pub fn keep_alive(&mut self, gesture: Gesture) -> bool {
        match self.active.as_mut() {
            Some(active) if active.gesture == gesture => {
                active.refreshed_at = self.clock;
                true
            }
            _ => false,
        }
    }

    /// Cancel a movement command if it is the active one
    pub fn stop_movement(&mut self, direction: &str) -> CommandResponse {
        let gesture = match direction.parse::<Gesture>() {
            Ok(g) if g.is_movement() => g,
            _ => {
                return CommandResponse::new(
                    direction,
                    CommandOutcome::NotRecognized,
                    format!("'{}' is not a movement direction", direction),
                )
            }
        };

        if self.active.map(|a| a.gesture) == Some(gesture) {
            self.active = None;
            debug!(direction, "movement stopped");
            CommandResponse::new(direction, CommandOutcome::Executed, "Movement stopped")
        } else {
            CommandResponse::new(direction, CommandOutcome::Executed, "Movement was not active")
        }
    }

    /// Clamped to [0.5, 2.0]; non-finite values are ignored
    pub fn set_speed_multiplier(&mut self, multiplier: f32) -> f32 {
        if multiplier.is_finite() {
            self.speed_multiplier = multiplier.clamp(MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER);
            let limit = self.velocity_limit();
            self.state
                .velocity
                .apply(|v| *v = v.clamp(-limit, limit));
        }
        self.speed_multiplier
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    fn velocity_limit(&self) -> f32 {
        self.config.max_velocity * self.speed_multiplier
    }

    /// Integrate one tick of `dt` seconds
    pub fn advance(&mut self, dt: f64) {
        let dt = if dt > 0.0 { dt } else { 0.0 };
        self.clock += dt;

        if let Some(active) = self.active {
            if self.clock - active.refreshed_at > self.config.command_timeout_secs {
                debug!(command = %active.gesture, "continuous command timed out");
                self.active = None;
            }
        }

        if self.state.is_flying {
            if let Some(active) = self.active {
                self.apply_thrust(active.gesture);
            }
        }

        let limit = self.velocity_limit();
        let drag = self.config.drag;
        let velocity = &mut self.state.velocity;
        *velocity *= drag;
        velocity.apply(|v| *v = v.clamp(-limit, limit));

        let previous = self.state.position;
        self.state.position += self.state.velocity;
        self.enforce_bounds();

        self.state.distance_traveled += (self.state.position - previous).norm();

        if self.state.is_flying {
            self.state.flight_time += dt;
            self.update_battery();
        }

        self.state.rotation.pitch = MAX_TILT_DEG * self.state.velocity.y / limit;
        self.state.rotation.roll = MAX_TILT_DEG * self.state.velocity.x / limit;
    }

    fn apply_thrust(&mut self, gesture: Gesture) {
        let accel = self.config.acceleration * self.speed_multiplier;
        let v = &mut self.state.velocity;
        match gesture {
            Gesture::Forward => v.y += accel,
            Gesture::Back => v.y -= accel,
            Gesture::Left => v.x -= accel,
            Gesture::Right => v.x += accel,
            Gesture::Up => v.z += accel,
            Gesture::Down => v.z -= accel,
            Gesture::Stop => {
                let damping = self.config.hover_damping;
                v.x *= damping;
                v.y *= damping;

                let z = self.state.position.z;
                if z < self.config.hover_altitude_min {
                    v.z += accel;
                } else if z > self.config.hover_altitude_max {
                    v.z -= accel;
                } else {
                    v.z *= damping;
                }
            }
            Gesture::Land => {}
        }
    }

    /// Clamp position to the flight volume, zeroing velocity on each clamped axis
    fn enforce_bounds(&mut self) {
        let bound = self.config.horizontal_boundary;
        let ceiling = self.config.ceiling;
        let VehicleState {
            position, velocity, ..
        } = &mut self.state;

        for axis in 0..2 {
            if position[axis] > bound {
                position[axis] = bound;
                velocity[axis] = 0.0;
            } else if position[axis] < -bound {
                position[axis] = -bound;
                velocity[axis] = 0.0;
            }
        }

        if position.z < 0.0 {
            position.z = 0.0;
            velocity.z = 0.0;
        } else if position.z > ceiling {
            position.z = ceiling;
            velocity.z = 0.0;
        }
    }

    fn update_battery(&mut self) {
        let drained = self.state.flight_time / self.config.full_discharge_secs * 100.0;
        self.state.battery = (100.0 - drained).clamp(0.0, 100.0) as f32;

        if self.state.battery <= 0.0 && !self.battery_warned {
            self.battery_warned = true;
            warn!(flight_time = self.state.flight_time, "battery depleted");
        }
    }

    /// Reinitialise every field
    pub fn reset(&mut self) {
        self.state = VehicleState::new();
        self.active = None;
        self.history.clear();
        self.speed_multiplier = 1.0;
        self.clock = 0.0;
        self.battery_warned = false;
        info!("vehicle reset");
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn current_command(&self) -> Option<Gesture> {
        self.active.map(|a| a.gesture)
    }

    /// Full history, oldest first
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn status(&self) -> VehicleStatus {
        VehicleStatus::snapshot(
            &self.state,
            self.history.recent(STATUS_HISTORY).cloned().collect(),
            self.current_command(),
            self.speed_multiplier,
        )
    }
}

impl Default for VehicleController {
    fn default() -> Self {
        Self::new(VehicleConfig::default())
    }
}
