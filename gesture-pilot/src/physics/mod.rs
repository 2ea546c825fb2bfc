//! Physics module - drone flight model and telemetry
//!
//! Re-exports only. All logic in submodules.

mod state;
mod telemetry;
mod vehicle;

pub use state::{Rotation, VehicleState};
pub use telemetry::{round_to, HistoryEntry, Vec3, VehicleStatus};
pub use vehicle::{
    CommandOutcome, CommandResponse, VehicleController, MAX_SPEED_MULTIPLIER,
    MIN_SPEED_MULTIPLIER, STATUS_HISTORY,
};
