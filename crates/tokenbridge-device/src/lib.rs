//! Device transport layer for the hardware token bridge.
//!
//! This crate provides trait-based abstractions for the line-oriented
//! serial link between the bridge and a token, enabling substitution
//! between mock implementations (for development and testing) and real
//! serial hardware.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native
//!   `async fn` in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Split halves**: A channel is consumed into independent reader and
//!   writer halves, so the read loop and command dispatch never contend
//!   for one object.
//! - **Poll-bounded reads**: [`LineReader::read_line`] distinguishes an
//!   idle poll window (`Ok(None)`) from a dead connection (`Err`), which
//!   is what lets the supervisor treat silence as normal and failure as a
//!   reconnect trigger.
//!
//! # Choosing an Implementation
//!
//! Real deployments use [`discovery::SerialPortProvider`], which
//! enumerates the host's serial ports and opens the one that looks like a
//! token. Tests and hardware-less development use
//! [`mock::MockPortProvider`] with scripted [`mock::MockLineChannel`]s.
//! Both are carried by the [`channels::AnyPortProvider`] wrapper so the
//! supervisor code is identical either way.
//!
//! [`LineReader::read_line`]: traits::LineReader::read_line

pub mod channels;
pub mod discovery;
pub mod error;
pub mod mock;
pub mod serial;
pub mod traits;

// Re-export commonly used types for convenience
pub use channels::{AnyLineChannel, AnyLineReader, AnyLineWriter, AnyPortProvider};
pub use discovery::SerialPortProvider;
pub use error::{ChannelError, ChannelResult};
pub use mock::{MockChannelHandle, MockLineChannel, MockPortProvider};
pub use traits::{LineChannel, LineReader, LineWriter, PortProvider};
