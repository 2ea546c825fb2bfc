//! Smoothing module - turns per-frame classifications into stable gestures

mod sensitivity;
mod temporal;

pub use sensitivity::Sensitivity;
pub use temporal::{SmoothedGesture, SmootherStats, TemporalSmoother};
