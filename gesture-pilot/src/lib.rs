//! Gesture Pilot - hand-gesture drone control
//!
//! Hand landmarks → features → rule classifier → temporal smoother → drone
//! simulator. The core is plain Rust; `bridge` exposes it to JS via wasm.
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - Re-exports and the wasm start hook

mod bridge;
mod buffer;
pub mod classifier;
pub mod config;
pub mod error;
pub mod physics;
pub mod session;
pub mod smoothing;

use wasm_bindgen::prelude::*;

pub use bridge::{parse_landmarks, PilotHandle};
pub use buffer::RingBuffer;
pub use classifier::{extract_features, Command, FeatureBundle, Gesture, GestureClassifier, JointFrame};
pub use config::PilotConfig;
pub use error::{PilotError, Result};
pub use physics::{CommandOutcome, VehicleController, VehicleStatus};
pub use session::{FrameReport, PilotSession};
pub use smoothing::{Sensitivity, TemporalSmoother};

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    console_log!(
        "✅ gesture-pilot {} loaded ({} gestures)",
        env!("CARGO_PKG_VERSION"),
        Gesture::COUNT
    );
}
