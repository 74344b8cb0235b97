//! Connection supervision and the serial read loop.
//!
//! The supervisor runs a single endless task: find a port, open it, settle,
//! sync the device clock, then pump lines into the reducer until the
//! connection dies. Every failure lands back in the same retry path with a
//! fixed delay; there is no backoff and no retry cap, because the device
//! being unplugged for an hour is normal operation, not an error budget.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tokenbridge_device::{
    AnyLineChannel, AnyPortProvider, ChannelResult, LineChannel, LineReader, PortProvider,
};
use tokenbridge_protocol::{Event, LineDecoder};
use tokio::time::sleep;
use tracing::{debug, info, trace, warn};

use crate::config::SyncConfig;
use crate::facade::{BridgeHandle, WriterSlot};
use crate::reducer;
use crate::state::{ConnectionInfo, DeviceState, SharedState};

/// Lifecycle of the serial link, as the supervisor tracks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No link; the supervisor is between attempts.
    Disconnected,
    /// A candidate port was found and is being opened.
    Connecting,
    /// The link is up and the read loop is running.
    Connected,
}

impl ConnectionState {
    /// Whether the lifecycle permits moving to `next` from here.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        matches!(
            (self, next),
            (ConnectionState::Disconnected, ConnectionState::Connecting)
                | (ConnectionState::Connecting, ConnectionState::Connected)
                | (ConnectionState::Connecting, ConnectionState::Disconnected)
                | (ConnectionState::Connected, ConnectionState::Disconnected)
        )
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        f.write_str(name)
    }
}

/// Owns the connection loop and the shared state it feeds.
///
/// Construct one, take a [`BridgeHandle`] for the serving side, then hand
/// the synchronizer to the runtime:
///
/// ```no_run
/// use tokenbridge_device::{AnyPortProvider, SerialPortProvider};
/// use tokenbridge_sync::{SyncConfig, Synchronizer};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let sync = Synchronizer::new(
///     AnyPortProvider::Serial(SerialPortProvider::new()),
///     SyncConfig::default(),
/// );
/// let bridge = sync.handle();
/// tokio::spawn(sync.run());
/// # drop(bridge);
/// # }
/// ```
pub struct Synchronizer {
    provider: AnyPortProvider,
    config: SyncConfig,
    state: SharedState,
    writer: WriterSlot,
    connection: ConnectionState,
}

impl Synchronizer {
    pub fn new(provider: AnyPortProvider, config: SyncConfig) -> Self {
        Self {
            provider,
            config,
            state: Arc::new(Mutex::new(DeviceState::default())),
            writer: Arc::new(tokio::sync::Mutex::new(None)),
            connection: ConnectionState::Disconnected,
        }
    }

    /// A facade over the state this supervisor maintains.
    pub fn handle(&self) -> BridgeHandle {
        BridgeHandle::new(self.state.clone(), self.writer.clone(), self.config)
    }

    /// Runs the connection loop forever.
    pub async fn run(mut self) {
        info!(baud = self.config.baud_rate, "device synchronizer started");
        loop {
            let Some(port) = self.provider.discover().await else {
                trace!("no candidate port; retrying");
                sleep(self.config.reconnect_delay).await;
                continue;
            };

            self.transition(ConnectionState::Connecting);
            match self.provider.open(&port, self.config.baud_rate).await {
                Ok(channel) => {
                    if let Err(error) = self.serve(&port, channel).await {
                        warn!(port = %port, %error, "connection lost");
                    }
                }
                Err(error) => warn!(port = %port, %error, "connection failed"),
            }

            self.teardown().await;
            sleep(self.config.reconnect_delay).await;
        }
    }

    /// Brings one opened channel into service and pumps it until it fails.
    async fn serve(&mut self, port: &str, channel: AnyLineChannel) -> ChannelResult<()> {
        let (mut reader, writer) = channel.split();

        // The device resets when the port opens; anything sent before it
        // finishes booting is lost.
        sleep(self.config.connect_settle).await;

        {
            let mut state = self.state.lock();
            state.connection_info = Some(ConnectionInfo {
                port: port.to_string(),
                baud_rate: self.config.baud_rate,
                connected_at: Utc::now(),
            });
            state.connected = true;
        }
        *self.writer.lock().await = Some(writer);
        self.transition(ConnectionState::Connected);
        info!(port = %port, baud = self.config.baud_rate, "device connected");

        if let Err(error) = self.handle().trigger_time_sync().await {
            // Not fatal; the sync can be re-triggered over the API.
            warn!(%error, "time sync handshake failed");
        }

        loop {
            if let Some(line) = reader.read_line().await? {
                self.ingest(&line);
            }
        }
    }

    /// Decodes one raw line and folds it into the state.
    fn ingest(&self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }
        trace!(line = %line, "serial line");

        let event = LineDecoder::decode(line);
        match &event {
            Event::TamperAlert => warn!("tamper alert reported"),
            // The code itself stays out of the logs.
            Event::Otp(_) => debug!("otp received"),
            Event::Unrecognized(_) => {}
            other => debug!(event = ?other, "device event"),
        }
        reducer::apply(&mut self.state.lock(), event);
    }

    async fn teardown(&mut self) {
        *self.writer.lock().await = None;
        self.state.lock().connected = false;
        self.transition(ConnectionState::Disconnected);
    }

    fn transition(&mut self, next: ConnectionState) {
        debug_assert!(
            self.connection.can_transition_to(next),
            "invalid connection transition {} -> {next}",
            self.connection
        );
        debug!(from = %self.connection, to = %next, "connection state");
        self.connection = next;
    }
}
