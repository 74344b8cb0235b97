//! Mock channel implementations for testing and development.
//!
//! This module provides a simulated token link that can be driven
//! programmatically without physical hardware: tests feed device output
//! through a handle and observe every command the bridge writes.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::channels::AnyLineChannel;
use crate::error::{ChannelError, ChannelResult};
use crate::traits::{LineChannel, LineReader, LineWriter, PortProvider};

/// Channel capacity for both directions of a mock link.
const MOCK_CHANNEL_CAPACITY: usize = 32;

/// Mock line channel for testing and development.
///
/// The channel simulates a connected token. Lines pushed through the
/// [`MockChannelHandle`] appear on the reader half; lines written to the
/// writer half are captured and can be awaited from the handle.
///
/// Dropping the handle closes both directions: the reader reports
/// [`ChannelError::Closed`] and subsequent writes fail, which is exactly
/// how an unplugged token presents.
///
/// # Examples
///
/// ```
/// use tokenbridge_device::mock::MockLineChannel;
/// use tokenbridge_device::traits::{LineChannel, LineReader, LineWriter};
///
/// #[tokio::main]
/// async fn main() -> tokenbridge_device::ChannelResult<()> {
///     let (channel, mut handle) = MockLineChannel::new();
///     let (mut reader, mut writer) = channel.split();
///
///     handle.push_line("STATUS:READY").await?;
///     assert_eq!(reader.read_line().await?.as_deref(), Some("STATUS:READY"));
///
///     writer.write_line("SYNC_TIME 1700000000").await?;
///     assert_eq!(
///         handle.next_written().await.as_deref(),
///         Some("SYNC_TIME 1700000000")
///     );
///
///     Ok(())
/// }
/// ```
pub struct MockLineChannel {
    reader: MockLineReader,
    writer: MockLineWriter,
}

impl MockLineChannel {
    /// Create a new mock channel.
    ///
    /// Returns a tuple of (MockLineChannel, MockChannelHandle) where the
    /// handle plays the role of the device firmware.
    pub fn new() -> (Self, MockChannelHandle) {
        let (feed_tx, feed_rx) = mpsc::channel(MOCK_CHANNEL_CAPACITY);
        let (written_tx, written_rx) = mpsc::channel(MOCK_CHANNEL_CAPACITY);

        let channel = Self {
            reader: MockLineReader { feed_rx },
            writer: MockLineWriter { written_tx },
        };

        let handle = MockChannelHandle {
            feed_tx,
            written_rx,
        };

        (channel, handle)
    }
}

impl LineChannel for MockLineChannel {
    type Reader = MockLineReader;
    type Writer = MockLineWriter;

    fn split(self) -> (Self::Reader, Self::Writer) {
        (self.reader, self.writer)
    }
}

/// Receiving half of a [`MockLineChannel`].
pub struct MockLineReader {
    feed_rx: mpsc::Receiver<ChannelResult<String>>,
}

impl LineReader for MockLineReader {
    async fn read_line(&mut self) -> ChannelResult<Option<String>> {
        match self.feed_rx.recv().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e)) => Err(e),
            None => Err(ChannelError::Closed),
        }
    }
}

/// Sending half of a [`MockLineChannel`].
pub struct MockLineWriter {
    written_tx: mpsc::Sender<String>,
}

impl LineWriter for MockLineWriter {
    async fn write_line(&mut self, line: &str) -> ChannelResult<()> {
        self.written_tx
            .send(line.to_owned())
            .await
            .map_err(|_| ChannelError::Closed)
    }
}

/// Handle for driving a mock channel.
///
/// The handle is the "firmware side" of the link: it emits status lines
/// into the reader half and receives every command the bridge writes.
pub struct MockChannelHandle {
    feed_tx: mpsc::Sender<ChannelResult<String>>,
    written_rx: mpsc::Receiver<String>,
}

impl MockChannelHandle {
    /// Emit one status line on the reader half.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader half has been dropped.
    pub async fn push_line(&self, line: impl Into<String>) -> ChannelResult<()> {
        self.feed_tx
            .send(Ok(line.into()))
            .await
            .map_err(|_| ChannelError::Closed)
    }

    /// Make the next read fail with an I/O error.
    ///
    /// The handle itself stays usable, so a test can observe writes made
    /// before the failure or feed a replacement channel afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader half has been dropped.
    pub async fn fail_read(&self, message: impl Into<String>) -> ChannelResult<()> {
        let failure = ChannelError::Io(std::io::Error::other(message.into()));
        self.feed_tx
            .send(Err(failure))
            .await
            .map_err(|_| ChannelError::Closed)
    }

    /// Await the next line the bridge wrote to the device.
    ///
    /// Returns `None` once the writer half has been dropped and all
    /// captured lines were consumed.
    pub async fn next_written(&mut self) -> Option<String> {
        self.written_rx.recv().await
    }
}

/// Port provider that hands out pre-scripted mock channels.
///
/// Each successful [`open`](PortProvider::open) call pops the next queued
/// channel, so a test scripts an entire connect / die / reconnect sequence
/// by queueing one channel per expected connection. Discovery reports no
/// port once the queue is empty.
///
/// The provider is cheaply cloneable; clones share the same queue, letting
/// a test keep one clone to queue replacement channels while the supervisor
/// owns another.
#[derive(Clone, Default)]
pub struct MockPortProvider {
    channels: Arc<Mutex<VecDeque<MockLineChannel>>>,
}

impl MockPortProvider {
    /// Port name reported by mock discovery.
    pub const PORT_NAME: &'static str = "/dev/mock-token";

    /// Create a provider with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a channel for the next connection attempt.
    pub fn queue_channel(&self, channel: MockLineChannel) {
        self.channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(channel);
    }

    /// Convenience: queue a fresh channel and return its handle.
    pub fn queue_connection(&self) -> MockChannelHandle {
        let (channel, handle) = MockLineChannel::new();
        self.queue_channel(channel);
        handle
    }

    fn pop_channel(&self) -> Option<MockLineChannel> {
        self.channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }

    fn is_empty(&self) -> bool {
        self.channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_empty()
    }
}

impl PortProvider for MockPortProvider {
    async fn discover(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(Self::PORT_NAME.to_string())
        }
    }

    async fn open(&self, port: &str, _baud_rate: u32) -> ChannelResult<AnyLineChannel> {
        self.pop_channel()
            .map(AnyLineChannel::Mock)
            .ok_or_else(|| ChannelError::open(port, "no scripted channel queued"))
    }
}
