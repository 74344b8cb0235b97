//! Transport-agnostic HTTP surface for the token bridge.
//!
//! This crate defines the complete API contract — routes as `handle_*`
//! methods, typed bodies, and the error-to-status mapping — without binding
//! to any particular HTTP framework. An embedder wires routes to handlers:
//!
//! ```no_run
//! use tokenbridge_device::{AnyPortProvider, SerialPortProvider};
//! use tokenbridge_server::{BridgeServer, parse_consume_param};
//! use tokenbridge_sync::{SyncConfig, Synchronizer};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sync = Synchronizer::new(
//!     AnyPortProvider::Serial(SerialPortProvider::new()),
//!     SyncConfig::default(),
//! );
//! let server = BridgeServer::new(sync.handle());
//! tokio::spawn(sync.run());
//!
//! // In a route for `GET /otp`:
//! let consume = parse_consume_param(Some("true"));
//! match server.handle_otp(consume) {
//!     Ok(view) => { /* 200 with the serialized view */ }
//!     Err(error) => { /* error.status_code() with error.body() */ }
//! }
//! # }
//! ```

pub mod api;
pub mod error;
pub mod handler;

pub use api::{
    FlushResponse, HealthResponse, ProvisionRequest, ProvisionResponse, ResetRequest,
    ResetResponse, SyncTimeResponse,
};
pub use error::{ApiError, ApiResult, ErrorBody};
pub use handler::{BridgeServer, parse_consume_param};

pub use tokenbridge_sync::{DeviceSummary, OtpView, StatusSnapshot, TamperStatus};
