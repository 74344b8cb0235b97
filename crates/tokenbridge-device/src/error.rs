//! Error types for serial channel operations.
//!
//! This module defines error types specific to the transport layer: opening
//! ports, reading and writing framed lines, and channel teardown. Higher
//! layers translate these into domain errors where a caller-facing answer
//! is required.

/// Result type alias for channel operations.
pub type ChannelResult<T> = std::result::Result<T, ChannelError>;

/// Errors that can occur while talking to a token over a serial channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The serial port could not be opened.
    #[error("Failed to open {port}: {message}")]
    Open { port: String, message: String },

    /// The underlying stream reported an I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel was closed by the peer or torn down locally.
    #[error("Channel closed")]
    Closed,
}

impl ChannelError {
    /// Create a new open error for the given port.
    pub fn open(port: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Open {
            port: port.into(),
            message: message.into(),
        }
    }
}
