//! In-memory mirror of the token state.
//!
//! The synchronizer owns a single [`DeviceState`] record behind one mutex and
//! keeps it current from the device's serial feed. Every read the facade
//! serves comes from this record, so a while after the cable is yanked the
//! bridge still answers with the last state it observed (flagged
//! `connected: false`).
//!
//! OTP freshness is tracked with two clocks on purpose: a monotonic
//! [`Instant`] drives the validity window (wall-clock jumps must not extend
//! or shorten an OTP's life), while a [`DateTime<Utc>`] is kept purely for
//! display in API responses.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokenbridge_core::DeviceStatus;
use tokio::time::Instant;

/// Shared handle to the device record.
///
/// A plain mutex rather than a reader/writer lock: the hottest read path
/// (OTP retrieval) mutates the record when it consumes, and the critical
/// sections are a handful of field assignments.
pub type SharedState = Arc<Mutex<DeviceState>>;

/// Everything the bridge knows about the token, reduced from serial lines.
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    /// Most recent OTP code reported by the device, if any.
    pub otp: Option<String>,
    /// Monotonic issue time of [`otp`](Self::otp); basis for expiry checks.
    pub otp_issued_at: Option<Instant>,
    /// Wall-clock issue time, reported back to API clients.
    pub otp_generated_at: Option<DateTime<Utc>>,
    /// Whether the current OTP has been handed out destructively.
    pub otp_consumed: bool,
    /// TOTP time step counter reported alongside the OTP.
    pub time_step: Option<i64>,
    /// Identity the token was provisioned for.
    pub user_id: Option<String>,
    /// Latest self-reported device status.
    pub status: DeviceStatus,
    /// Device confirmed a completed provisioning.
    pub provisioned: bool,
    /// Device found its secure storage at boot.
    pub eeprom_available: bool,
    /// Device acknowledged a clock sync.
    pub time_synced: bool,
    pub tamper: TamperStatus,
    /// Details of the current or last serial connection. Never cleared once
    /// set; `connected` says whether it is live.
    pub connection_info: Option<ConnectionInfo>,
    pub connected: bool,
}

impl DeviceState {
    /// True when an OTP exists and is still inside its validity window.
    ///
    /// Consumption is deliberately ignored here; a consumed-but-fresh OTP
    /// still counts as available for status reporting.
    pub fn otp_available(&self, ttl: Duration) -> bool {
        match (&self.otp, self.otp_issued_at) {
            (Some(_), Some(issued_at)) => issued_at.elapsed() <= ttl,
            _ => false,
        }
    }

    /// Whole seconds the current OTP has left, zero once expired or absent.
    pub fn otp_expires_in(&self, ttl: Duration) -> u64 {
        self.otp_issued_at
            .map(|issued_at| ttl.saturating_sub(issued_at.elapsed()).as_secs())
            .unwrap_or(0)
    }

    /// Full status view, always answerable even before the first connect.
    pub fn snapshot(&self, ttl: Duration) -> StatusSnapshot {
        StatusSnapshot {
            device: self.connection_info.clone(),
            connected: self.connected,
            status: self.status.clone(),
            provisioned: self.provisioned,
            eeprom_available: self.eeprom_available,
            time_synced: self.time_synced,
            user_id: self.user_id.clone(),
            tamper: self.tamper.clone(),
            otp_available: self.otp_available(ttl),
            otp_consumed: self.otp_consumed,
        }
    }

    /// Condensed device view, `None` until a connection has been recorded.
    pub fn summary(&self) -> Option<DeviceSummary> {
        let device = self.connection_info.clone()?;
        Some(DeviceSummary {
            device,
            connected: self.connected,
            status: self.status.clone(),
            provisioned: self.provisioned,
            eeprom_available: self.eeprom_available,
            time_synced: self.time_synced,
            tamper_locked: self.tamper.locked,
            user_id: self.user_id.clone(),
        })
    }
}

/// Tamper bookkeeping for the token.
///
/// `detected` records that the sensor fired; `locked` tracks whether the
/// device currently refuses OTP operations. The two diverge: a status report
/// of `READY` unlocks the device while the detection flag stays set until an
/// explicit reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TamperStatus {
    pub detected: bool,
    pub count: i64,
    /// Wall-clock time of the last tamper alert.
    #[serde(rename = "timestamp")]
    pub detected_at: Option<DateTime<Utc>>,
    pub locked: bool,
}

/// Where and how the serial link was established.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub port: String,
    #[serde(rename = "baud")]
    pub baud_rate: u32,
    pub connected_at: DateTime<Utc>,
}

/// One OTP retrieval result.
///
/// `consumed` reflects the state *before* the retrieval: a consuming read of
/// a fresh OTP reports `false` and only subsequent reads see `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpView {
    pub otp: String,
    pub generated_at: Option<DateTime<Utc>>,
    /// Whole seconds of validity remaining at the time of the read.
    pub expires_in: u64,
    pub consumed: bool,
    pub time_step: Option<i64>,
    pub user_id: Option<String>,
}

/// Full bridge status as served to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub device: Option<ConnectionInfo>,
    pub connected: bool,
    pub status: DeviceStatus,
    pub provisioned: bool,
    pub eeprom_available: bool,
    #[serde(rename = "time_sync")]
    pub time_synced: bool,
    pub user_id: Option<String>,
    pub tamper: TamperStatus,
    pub otp_available: bool,
    pub otp_consumed: bool,
}

/// Condensed device information, only meaningful after a first connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub device: ConnectionInfo,
    pub connected: bool,
    pub status: DeviceStatus,
    pub provisioned: bool,
    pub eeprom_available: bool,
    #[serde(rename = "time_sync")]
    pub time_synced: bool,
    pub tamper_locked: bool,
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ttl() -> Duration {
        Duration::from_secs(90)
    }

    #[test]
    fn default_state_has_nothing_to_offer() {
        let state = DeviceState::default();

        assert!(!state.otp_available(ttl()));
        assert_eq!(state.otp_expires_in(ttl()), 0);
        assert!(state.summary().is_none());
        assert_eq!(state.status, DeviceStatus::Unknown);
    }

    #[test]
    fn snapshot_is_total_before_first_connect() {
        let snapshot = DeviceState::default().snapshot(ttl());

        assert!(snapshot.device.is_none());
        assert!(!snapshot.connected);
        assert!(!snapshot.otp_available);
        assert_eq!(snapshot.status, DeviceStatus::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn otp_expires_after_ttl() {
        let mut state = DeviceState::default();
        state.otp = Some("123456".into());
        state.otp_issued_at = Some(Instant::now());

        assert!(state.otp_available(ttl()));
        assert_eq!(state.otp_expires_in(ttl()), 90);

        tokio::time::advance(Duration::from_secs(89)).await;
        assert!(state.otp_available(ttl()));
        assert_eq!(state.otp_expires_in(ttl()), 1);

        // The boundary itself is still valid; one more second is not.
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(state.otp_available(ttl()));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!state.otp_available(ttl()));
        assert_eq!(state.otp_expires_in(ttl()), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn consumption_does_not_affect_availability() {
        let mut state = DeviceState::default();
        state.otp = Some("123456".into());
        state.otp_issued_at = Some(Instant::now());
        state.otp_consumed = true;

        assert!(state.otp_available(ttl()));
        let snapshot = state.snapshot(ttl());
        assert!(snapshot.otp_available);
        assert!(snapshot.otp_consumed);
    }

    #[test]
    fn summary_reports_last_known_connection() {
        let mut state = DeviceState::default();
        state.connection_info = Some(ConnectionInfo {
            port: "/dev/ttyUSB0".into(),
            baud_rate: 115_200,
            connected_at: Utc::now(),
        });
        state.connected = false;

        let summary = state.summary().unwrap();
        assert_eq!(summary.device.port, "/dev/ttyUSB0");
        assert!(!summary.connected);
    }

    #[test]
    fn tamper_status_wire_format_uses_timestamp_key() {
        let status = TamperStatus {
            detected: true,
            count: 3,
            detected_at: None,
            locked: true,
        };

        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(
            value,
            json!({"detected": true, "count": 3, "timestamp": null, "locked": true})
        );
    }

    #[test]
    fn connection_info_wire_format_uses_baud_key() {
        let info = ConnectionInfo {
            port: "/dev/ttyACM0".into(),
            baud_rate: 115_200,
            connected_at: Utc::now(),
        };

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["port"], "/dev/ttyACM0");
        assert_eq!(value["baud"], 115_200);
        assert!(value["connected_at"].is_string());
    }

    #[test]
    fn snapshot_wire_format_uses_time_sync_key() {
        let mut state = DeviceState::default();
        state.time_synced = true;

        let value = serde_json::to_value(state.snapshot(ttl())).unwrap();
        assert_eq!(value["time_sync"], true);
        assert!(value.get("time_synced").is_none());
        assert_eq!(value["device"], serde_json::Value::Null);
    }
}
