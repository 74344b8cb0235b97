//! Transport trait definitions.
//!
//! This module defines the trait interfaces for line-oriented token
//! transports. These traits establish the contract between the state
//! synchronizer and the physical (or simulated) device link, enabling easy
//! substitution between mock and real serial implementations.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::channels::AnyLineChannel;
use crate::error::ChannelResult;

/// Receiving half of a line-oriented channel.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`, which is an opaque type that cannot be used in trait objects
/// (Edition 2024 RPITIT). You cannot use `Box<dyn LineReader>`.
///
/// For dynamic dispatch, use the enum wrappers from the
/// [`channels`](crate::channels) module:
///
/// ```
/// use tokenbridge_device::channels::AnyLineReader;
/// use tokenbridge_device::mock::MockLineChannel;
/// use tokenbridge_device::traits::{LineChannel, LineReader};
///
/// # async fn example() -> tokenbridge_device::ChannelResult<()> {
/// let (channel, handle) = MockLineChannel::new();
/// let (reader, _writer) = channel.split();
/// let mut any_reader = AnyLineReader::Mock(reader);
///
/// handle.push_line("HEARTBEAT:OK").await?;
/// let line = any_reader.read_line().await?;
/// assert_eq!(line.as_deref(), Some("HEARTBEAT:OK"));
/// # Ok(())
/// # }
/// ```
pub trait LineReader: Send {
    /// Read the next complete line from the device.
    ///
    /// Returns `Ok(Some(line))` when a line arrived, with the trailing
    /// newline (and any carriage return) already stripped. Returns
    /// `Ok(None)` when the poll window elapsed without a complete line;
    /// callers are expected to simply poll again.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream failed or was closed.
    /// Either condition means the connection is gone and must be
    /// re-established.
    async fn read_line(&mut self) -> ChannelResult<Option<String>>;
}

/// Sending half of a line-oriented channel.
///
/// Implementations append the line terminator themselves; callers pass the
/// bare command text.
pub trait LineWriter: Send {
    /// Write one command line to the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream failed or was closed.
    async fn write_line(&mut self, line: &str) -> ChannelResult<()>;
}

/// A bidirectional line channel that can be split into its two halves.
///
/// Splitting lets the connection supervisor own the reader for its poll
/// loop while the writer is parked in a shared slot for command dispatch.
pub trait LineChannel: Send {
    /// Receiving half produced by [`split`](Self::split).
    type Reader: LineReader;

    /// Sending half produced by [`split`](Self::split).
    type Writer: LineWriter;

    /// Consume the channel, producing independent reader and writer halves.
    fn split(self) -> (Self::Reader, Self::Writer);
}

/// Discovery and connection factory for token devices.
///
/// The supervisor never names a port itself; it asks the provider which
/// port looks like a token and then asks it to open that port. Real
/// deployments use [`SerialPortProvider`](crate::discovery::SerialPortProvider);
/// tests and development setups use
/// [`MockPortProvider`](crate::mock::MockPortProvider).
pub trait PortProvider: Send {
    /// Locate the most plausible token port, if any is present.
    ///
    /// Returns `None` when no candidate port exists right now. This is not
    /// an error; the caller retries later.
    async fn discover(&self) -> Option<String>;

    /// Open a channel to the given port at the given baud rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be opened, for example because
    /// it disappeared between discovery and open or is held by another
    /// process.
    async fn open(&self, port: &str, baud_rate: u32) -> ChannelResult<AnyLineChannel>;
}
