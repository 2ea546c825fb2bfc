//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod handle;
mod landmarks;

pub use handle::PilotHandle;
pub use landmarks::parse_landmarks;
