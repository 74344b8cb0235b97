//! Enum wrappers for channel dispatch.
//!
//! This module provides enum wrappers that enable the use of native async
//! traits with concrete type dispatch, avoiding the object-safety
//! limitations while maintaining zero-cost abstractions.
//!
//! # Enum Dispatch Pattern
//!
//! Native `async fn` in traits (RPITIT - Rust Edition 2024) are not
//! object-safe, so we cannot use `Box<dyn LineReader>`. Instead, enums
//! provide concrete type dispatch at compile time:
//!
//! - Zero-cost abstraction (monomorphization at compile-time)
//! - Type-safe extensibility
//! - Support for feature flags (conditional compilation)
//!
//! # Examples
//!
//! ```
//! use tokenbridge_device::channels::AnyLineChannel;
//! use tokenbridge_device::mock::MockLineChannel;
//!
//! let (channel, _handle) = MockLineChannel::new();
//! let any_channel = AnyLineChannel::Mock(channel);
//!
//! // Can now be split and used polymorphically through the channel traits
//! ```

use crate::discovery::SerialPortProvider;
use crate::error::ChannelResult;
use crate::mock::{MockLineChannel, MockLineReader, MockLineWriter, MockPortProvider};
use crate::serial::{SerialLineChannel, SerialLineReader, SerialLineWriter};
use crate::traits::{LineChannel, LineReader, LineWriter, PortProvider};

/// Enum wrapper for channel dispatch.
///
/// Produced by [`PortProvider::open`]; split into [`AnyLineReader`] and
/// [`AnyLineWriter`] halves before use.
#[non_exhaustive]
pub enum AnyLineChannel {
    /// Real token over a serial port.
    Serial(SerialLineChannel),

    /// Mock channel for development and testing.
    Mock(MockLineChannel),
}

impl LineChannel for AnyLineChannel {
    type Reader = AnyLineReader;
    type Writer = AnyLineWriter;

    fn split(self) -> (Self::Reader, Self::Writer) {
        match self {
            Self::Serial(channel) => {
                let (reader, writer) = channel.split();
                (AnyLineReader::Serial(reader), AnyLineWriter::Serial(writer))
            }
            Self::Mock(channel) => {
                let (reader, writer) = channel.split();
                (AnyLineReader::Mock(reader), AnyLineWriter::Mock(writer))
            }
        }
    }
}

/// Enum wrapper for reader dispatch.
#[non_exhaustive]
pub enum AnyLineReader {
    /// Real token over a serial port.
    Serial(SerialLineReader),

    /// Mock reader for development and testing.
    Mock(MockLineReader),
}

impl LineReader for AnyLineReader {
    async fn read_line(&mut self) -> ChannelResult<Option<String>> {
        match self {
            Self::Serial(reader) => reader.read_line().await,
            Self::Mock(reader) => reader.read_line().await,
        }
    }
}

/// Enum wrapper for writer dispatch.
#[non_exhaustive]
pub enum AnyLineWriter {
    /// Real token over a serial port.
    Serial(SerialLineWriter),

    /// Mock writer for development and testing.
    Mock(MockLineWriter),
}

impl LineWriter for AnyLineWriter {
    async fn write_line(&mut self, line: &str) -> ChannelResult<()> {
        match self {
            Self::Serial(writer) => writer.write_line(line).await,
            Self::Mock(writer) => writer.write_line(line).await,
        }
    }
}

/// Enum wrapper for port provider dispatch.
#[non_exhaustive]
pub enum AnyPortProvider {
    /// Operating-system serial enumeration.
    Serial(SerialPortProvider),

    /// Scripted provider for development and testing.
    Mock(MockPortProvider),
}

impl PortProvider for AnyPortProvider {
    async fn discover(&self) -> Option<String> {
        match self {
            Self::Serial(provider) => provider.discover().await,
            Self::Mock(provider) => provider.discover().await,
        }
    }

    async fn open(&self, port: &str, baud_rate: u32) -> ChannelResult<AnyLineChannel> {
        match self {
            Self::Serial(provider) => provider.open(port, baud_rate).await,
            Self::Mock(provider) => provider.open(port, baud_rate).await,
        }
    }
}
