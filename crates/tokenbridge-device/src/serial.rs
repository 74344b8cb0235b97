//! Serial implementation of the line channel.
//!
//! This module wraps a [`tokio_serial::SerialStream`] in the line codec and
//! exposes it through the transport traits. Reads are framed by
//! [`LineCodec`] and bounded by a poll timeout so the supervisor's read
//! loop can observe shutdown without blocking forever on a silent device.

use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokenbridge_core::constants::READ_POLL_MILLIS;
use tokenbridge_protocol::LineCodec;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tokio_util::codec::Framed;

use crate::error::{ChannelError, ChannelResult};
use crate::traits::{LineChannel, LineReader, LineWriter};

/// A token connected through a serial port.
///
/// The channel owns the port exclusively for its lifetime. Dropping both
/// halves releases the port so a later reconnection attempt can reopen it.
///
/// # Examples
///
/// ```no_run
/// use tokenbridge_core::constants::SERIAL_BAUD_RATE;
/// use tokenbridge_device::serial::SerialLineChannel;
/// use tokenbridge_device::traits::{LineChannel, LineReader};
///
/// # async fn example() -> tokenbridge_device::ChannelResult<()> {
/// let channel = SerialLineChannel::open("/dev/ttyUSB0", SERIAL_BAUD_RATE)?;
/// let (mut reader, _writer) = channel.split();
///
/// while let Some(line) = reader.read_line().await? {
///     println!("device said: {line}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct SerialLineChannel {
    framed: Framed<SerialStream, LineCodec>,
}

impl SerialLineChannel {
    /// Open the given port at the given baud rate.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Open`] if the operating system refuses the
    /// port, for example because it vanished after discovery or is held by
    /// another process.
    pub fn open(port: &str, baud_rate: u32) -> ChannelResult<Self> {
        let stream = tokio_serial::new(port, baud_rate)
            .open_native_async()
            .map_err(|e| ChannelError::open(port, e.to_string()))?;

        Ok(Self {
            framed: Framed::new(stream, LineCodec::new()),
        })
    }
}

impl LineChannel for SerialLineChannel {
    type Reader = SerialLineReader;
    type Writer = SerialLineWriter;

    fn split(self) -> (Self::Reader, Self::Writer) {
        let (sink, stream) = self.framed.split();
        (SerialLineReader { stream }, SerialLineWriter { sink })
    }
}

/// Receiving half of a [`SerialLineChannel`].
pub struct SerialLineReader {
    stream: SplitStream<Framed<SerialStream, LineCodec>>,
}

impl LineReader for SerialLineReader {
    async fn read_line(&mut self) -> ChannelResult<Option<String>> {
        let poll_window = Duration::from_millis(READ_POLL_MILLIS);

        match tokio::time::timeout(poll_window, self.stream.next()).await {
            // Idle poll window; not an error, the caller polls again.
            Err(_) => Ok(None),
            Ok(None) => Err(ChannelError::Closed),
            Ok(Some(Ok(line))) => Ok(Some(line)),
            Ok(Some(Err(e))) => Err(ChannelError::Io(e)),
        }
    }
}

/// Sending half of a [`SerialLineChannel`].
pub struct SerialLineWriter {
    sink: SplitSink<Framed<SerialStream, LineCodec>, String>,
}

impl LineWriter for SerialLineWriter {
    async fn write_line(&mut self, line: &str) -> ChannelResult<()> {
        self.sink
            .send(line.to_owned())
            .await
            .map_err(ChannelError::Io)
    }
}
