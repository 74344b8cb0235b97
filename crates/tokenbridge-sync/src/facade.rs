//! Caller-facing operations on the synchronized state.
//!
//! A [`BridgeHandle`] is a cheap clone of three `Arc`s; the HTTP layer keeps
//! one per request handler while the supervisor keeps feeding the state
//! behind it. Reads never touch the serial port. Commands go through the
//! shared writer slot and are confirmed optimistically: send, wait out the
//! command settle window, then inspect what the device reported back.

use chrono::Utc;
use tokenbridge_core::{DomainError, Result, SecretHex, UserId};
use tokenbridge_device::{AnyLineWriter, ChannelResult, LineWriter};
use tokenbridge_protocol::Command;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::state::{DeviceSummary, OtpView, SharedState, StatusSnapshot, TamperStatus};

/// Writer half of the active connection, if any.
///
/// The supervisor installs a writer after the connect settle window and
/// clears the slot when the connection dies. Commands hold this lock only
/// for the duration of a single write, never across a settle wait.
pub type WriterSlot = std::sync::Arc<tokio::sync::Mutex<Option<AnyLineWriter>>>;

/// Shared entry point for everything the bridge exposes about the token.
#[derive(Clone)]
pub struct BridgeHandle {
    state: SharedState,
    writer: WriterSlot,
    config: SyncConfig,
}

impl BridgeHandle {
    pub(crate) fn new(state: SharedState, writer: WriterSlot, config: SyncConfig) -> Self {
        Self {
            state,
            writer,
            config,
        }
    }

    /// Retrieves the current OTP, optionally consuming it.
    ///
    /// The returned view reflects the state before this call: the first
    /// consuming read of a fresh code reports `consumed: false`, and only
    /// later reads see `true`.
    ///
    /// # Errors
    ///
    /// [`DomainError::Locked`] while the device is tamper-locked,
    /// [`DomainError::NotAvailable`] when no OTP exists or it has aged out,
    /// [`DomainError::AlreadyConsumed`] on a second consuming read.
    pub fn otp(&self, consume: bool) -> Result<OtpView> {
        let mut state = self.state.lock();
        if state.tamper.locked {
            return Err(DomainError::Locked);
        }
        let Some(otp) = state.otp.clone() else {
            return Err(DomainError::NotAvailable);
        };
        if !state.otp_available(self.config.otp_ttl) {
            return Err(DomainError::NotAvailable);
        }
        if consume && state.otp_consumed {
            return Err(DomainError::AlreadyConsumed);
        }

        let view = OtpView {
            otp,
            generated_at: state.otp_generated_at,
            expires_in: state.otp_expires_in(self.config.otp_ttl),
            consumed: state.otp_consumed,
            time_step: state.time_step,
            user_id: state.user_id.clone(),
        };
        if consume {
            state.otp_consumed = true;
            debug!("otp consumed");
        }
        Ok(view)
    }

    /// Drops the cached OTP and its time step, returning the discarded code.
    ///
    /// Idempotent; flushing an empty cache returns `None`.
    pub fn flush_otp(&self) -> Option<String> {
        let mut state = self.state.lock();
        let previous = state.otp.take();
        state.otp_issued_at = None;
        state.otp_generated_at = None;
        state.otp_consumed = false;
        state.time_step = None;
        if previous.is_some() {
            debug!("otp flushed");
        }
        previous
    }

    /// Current tamper flags. Infallible; defaults before the first report.
    pub fn tamper_status(&self) -> TamperStatus {
        self.state.lock().tamper.clone()
    }

    /// Full status view. Infallible; answers even before the first connect.
    pub fn full_status(&self) -> StatusSnapshot {
        self.state.lock().snapshot(self.config.otp_ttl)
    }

    /// Condensed device view.
    ///
    /// # Errors
    ///
    /// [`DomainError::NotConnected`] until a connection has been recorded.
    /// Once one has, this keeps answering with the last-known link details
    /// after a disconnect.
    pub fn device_info(&self) -> Result<DeviceSummary> {
        self.state.lock().summary().ok_or(DomainError::NotConnected)
    }

    /// Writes identity and secret to the token, then waits for confirmation.
    ///
    /// # Errors
    ///
    /// [`DomainError::NotConnected`] when no channel is open or the write
    /// fails, [`DomainError::ProvisioningFailed`] when the device has not
    /// confirmed within the settle window.
    pub async fn provision(&self, user_id: UserId, secret_hex: SecretHex) -> Result<()> {
        info!(user_id = %user_id, "provisioning token");
        self.send(&Command::Provision {
            user_id,
            secret_hex,
        })
        .await?;
        sleep(self.config.command_settle).await;

        if self.state.lock().provisioned {
            Ok(())
        } else {
            warn!("device did not confirm provisioning");
            Err(DomainError::ProvisioningFailed)
        }
    }

    /// Asks the device to clear its tamper lockout with the given PIN.
    ///
    /// # Errors
    ///
    /// [`DomainError::NotConnected`] when no channel is open,
    /// [`DomainError::Unauthorized`] when the device stays locked after the
    /// settle window, which is all a rejected PIN looks like from here.
    pub async fn reset_lockout(&self, pin: impl Into<String>) -> Result<()> {
        self.send(&Command::Reset { pin: pin.into() }).await?;
        sleep(self.config.command_settle).await;

        let mut state = self.state.lock();
        if state.tamper.locked {
            warn!("lockout reset rejected by device");
            return Err(DomainError::Unauthorized);
        }
        state.tamper.detected = false;
        info!("tamper lockout cleared");
        Ok(())
    }

    /// Re-sends the wall-clock handshake.
    ///
    /// A no-op success when no channel is open; the supervisor syncs on the
    /// next connect anyway.
    ///
    /// # Errors
    ///
    /// Propagates the channel error when the write itself fails.
    pub async fn trigger_time_sync(&self) -> ChannelResult<()> {
        let mut slot = self.writer.lock().await;
        let Some(writer) = slot.as_mut() else {
            debug!("time sync skipped; no device connected");
            return Ok(());
        };
        let unix_seconds = Utc::now().timestamp();
        writer
            .write_line(&Command::SyncTime { unix_seconds }.encode())
            .await?;
        info!(unix_seconds, "time sync sent");
        Ok(())
    }

    async fn send(&self, command: &Command) -> Result<()> {
        let mut slot = self.writer.lock().await;
        let Some(writer) = slot.as_mut() else {
            return Err(DomainError::NotConnected);
        };
        if let Err(error) = writer.write_line(&command.encode()).await {
            // The supervisor notices the dead link through its reader and
            // tears the slot down; here it just means the command was lost.
            warn!(command = command.verb(), %error, "command write failed");
            return Err(DomainError::NotConnected);
        }
        debug!(command = command.verb(), "command sent");
        Ok(())
    }
}
