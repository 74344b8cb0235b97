//! Token emulator crate providing device emulation functionality.
//!
//! This crate contains a firmware-faithful state machine for the hardware
//! token, used by integration tests to exercise the bridge end to end
//! without a device on the bench.

pub mod link;
pub mod state_machine;

pub use link::emit_report;
pub use state_machine::{DEFAULT_ADMIN_PIN, TIME_STEP_SECONDS, TokenEmulator};
