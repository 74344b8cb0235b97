//! State synchronization between a hardware token and its API bridge.
//!
//! The crate is split along the one-way flow of device data:
//!
//! - [`supervisor`] owns the serial connection, heals it when it drops, and
//!   pumps raw lines through the decoder.
//! - [`reducer`] folds decoded events into the single shared
//!   [`DeviceState`] record.
//! - [`facade`] serves reads and commands from that record without ever
//!   blocking on the device.
//!
//! The design trades freshness guarantees for availability: every query is
//! answered from the last state the device reported, so a briefly unplugged
//! token degrades to stale answers instead of errors. The one hard freshness
//! rule is the OTP validity window, which is enforced against a monotonic
//! clock at read time.
//!
//! # Example
//!
//! ```no_run
//! use tokenbridge_device::{AnyPortProvider, SerialPortProvider};
//! use tokenbridge_sync::{SyncConfig, Synchronizer};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sync = Synchronizer::new(
//!     AnyPortProvider::Serial(SerialPortProvider::new()),
//!     SyncConfig::default(),
//! );
//! let bridge = sync.handle();
//! tokio::spawn(sync.run());
//!
//! // `bridge` clones cheaply into every request handler.
//! let status = bridge.full_status();
//! println!("connected: {}", status.connected);
//! # }
//! ```

pub mod config;
pub mod facade;
pub mod reducer;
pub mod state;
pub mod supervisor;

pub use config::SyncConfig;
pub use facade::{BridgeHandle, WriterSlot};
pub use state::{
    ConnectionInfo, DeviceState, DeviceSummary, OtpView, SharedState, StatusSnapshot, TamperStatus,
};
pub use supervisor::{ConnectionState, Synchronizer};
