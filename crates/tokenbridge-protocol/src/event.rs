//! Typed events decoded from device status lines.
//!
//! Every line the token pushes maps to exactly one [`Event`] variant; lines
//! the bridge does not understand map to [`Event::Unrecognized`] and are
//! applied as no-ops downstream. The decoder in [`crate::decoder`] is the
//! only producer.

use tokenbridge_core::DeviceStatus;

/// One decoded device status line.
///
/// Variants carry exactly the payload their line reports; interpretation
/// (which state fields change, lock derivation) happens in the reducer, not
/// here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `OTP:` — a freshly generated one-time password.
    Otp(String),

    /// `TIME_STEP:` — the 30-second step counter the OTP was derived from.
    TimeStep(i64),

    /// `USER_ID:` — the identity the token is provisioned for.
    UserId(String),

    /// `STATUS:` — coarse device status report.
    Status(DeviceStatus),

    /// `PROVISIONED:` — whether the token holds a provisioning record.
    Provisioned(bool),

    /// `EEPROM:` — whether the storage chip self-test passed.
    Eeprom(bool),

    /// `TIME_SYNC:` — whether the last time synchronization succeeded.
    TimeSync(bool),

    /// `TAMPER_COUNT:` — lifetime tamper event counter.
    TamperCount(i64),

    /// `TAMPER:DETECTED` / `TAMPER ALERT` — the mesh was broken right now.
    TamperAlert,

    /// `RESET:SUCCESS` — an operator reset was accepted by the device.
    ResetSuccess,

    /// `HEARTBEAT:` — periodic liveness report carrying a status payload.
    Heartbeat(DeviceStatus),

    /// Any line matching none of the known patterns, kept for trace logging.
    Unrecognized(String),
}

impl Event {
    /// Returns `true` if this event carries no recognized meaning.
    #[inline]
    #[must_use]
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Event::Unrecognized(_))
    }
}
