//! Device status line decoder.
//!
//! This module converts one raw text line from the token into a typed
//! [`Event`]. Decoding is total: there is no error path, and any line the
//! bridge does not understand becomes [`Event::Unrecognized`] so the read
//! loop can never be killed by a misbehaving device.
//!
//! # Line Format
//!
//! The token pushes self-describing ASCII lines, one report per line:
//!
//! ```text
//! OTP:482913
//! TIME_STEP:58812345
//! STATUS:READY
//! EEPROM:DETECTED
//! HEARTBEAT:LOCKED
//! ```
//!
//! Matching is by literal prefix, except for the tamper alert and reset
//! acknowledgement, which are matched as substrings because older firmware
//! embeds them mid-line (`!! TAMPER ALERT !!`). All matching is
//! case-sensitive and first-match-wins, in the order the rules appear in
//! [`LineDecoder::decode`].
//!
//! # Malformed Payloads
//!
//! Numeric payloads that fail to parse (`TIME_STEP:abc`) decode to
//! [`Event::Unrecognized`]: the line is dropped silently rather than
//! surfaced as an error, matching the device contract that protocol noise
//! must never disturb accumulated state.
//!
//! # Examples
//!
//! ```
//! use tokenbridge_protocol::{Event, LineDecoder};
//!
//! assert_eq!(
//!     LineDecoder::decode("OTP:482913"),
//!     Event::Otp("482913".to_string())
//! );
//! assert_eq!(LineDecoder::decode("PROVISIONED:YES"), Event::Provisioned(true));
//! assert_eq!(LineDecoder::decode("PROVISIONED:NO"), Event::Provisioned(false));
//!
//! // Unknown lines never fail
//! assert!(LineDecoder::decode("BOOT v2.1 (build 77)").is_unrecognized());
//! ```

use crate::event::Event;
use tokenbridge_core::{
    DeviceStatus,
    constants::{EEPROM_AVAILABLE_VALUES, TIME_SYNC_OK_VALUES},
};

/// Decoder for device status lines.
///
/// Stateless; each line decodes independently of every other line.
pub struct LineDecoder;

impl LineDecoder {
    /// Decode one trimmed line into an [`Event`].
    ///
    /// Never fails. The caller is expected to hand in text that already went
    /// through lossy UTF-8 conversion; this function works purely on `str`.
    ///
    /// # Matching Order
    ///
    /// Prefix rules are checked first (`OTP:`, `TIME_STEP:`, `USER_ID:`,
    /// `STATUS:`, `PROVISIONED:`, `EEPROM:`, `TIME_SYNC:`, `TAMPER_COUNT:`),
    /// then the two substring rules (`TAMPER:DETECTED`/`TAMPER ALERT`,
    /// `RESET:SUCCESS`), then `HEARTBEAT:`. The order matters: a line like
    /// `STATUS:TAMPERED` must decode as a status report, not an alert.
    ///
    /// # Examples
    ///
    /// ```
    /// use tokenbridge_protocol::{Event, LineDecoder};
    /// use tokenbridge_core::DeviceStatus;
    ///
    /// assert_eq!(
    ///     LineDecoder::decode("STATUS:LOCKED"),
    ///     Event::Status(DeviceStatus::Locked)
    /// );
    /// assert_eq!(LineDecoder::decode("!! TAMPER ALERT !!"), Event::TamperAlert);
    /// assert_eq!(LineDecoder::decode("TIME_STEP:xyz").is_unrecognized(), true);
    /// ```
    #[must_use]
    pub fn decode(line: &str) -> Event {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix("OTP:") {
            return Event::Otp(rest.trim().to_string());
        }

        if let Some(rest) = line.strip_prefix("TIME_STEP:") {
            return match rest.trim().parse::<i64>() {
                Ok(step) => Event::TimeStep(step),
                Err(_) => Event::Unrecognized(line.to_string()),
            };
        }

        if let Some(rest) = line.strip_prefix("USER_ID:") {
            return Event::UserId(rest.trim().to_string());
        }

        if let Some(rest) = line.strip_prefix("STATUS:") {
            return Event::Status(DeviceStatus::parse(rest.trim()));
        }

        if let Some(rest) = line.strip_prefix("PROVISIONED:") {
            return Event::Provisioned(rest.trim() == "YES");
        }

        if let Some(rest) = line.strip_prefix("EEPROM:") {
            let value = rest.trim();
            return Event::Eeprom(EEPROM_AVAILABLE_VALUES.contains(&value));
        }

        if let Some(rest) = line.strip_prefix("TIME_SYNC:") {
            let value = rest.trim();
            return Event::TimeSync(TIME_SYNC_OK_VALUES.contains(&value));
        }

        if let Some(rest) = line.strip_prefix("TAMPER_COUNT:") {
            return match rest.trim().parse::<i64>() {
                Ok(count) => Event::TamperCount(count),
                Err(_) => Event::Unrecognized(line.to_string()),
            };
        }

        if line.contains("TAMPER:DETECTED") || line.contains("TAMPER ALERT") {
            return Event::TamperAlert;
        }

        if line.contains("RESET:SUCCESS") {
            return Event::ResetSuccess;
        }

        if let Some(rest) = line.strip_prefix("HEARTBEAT:") {
            return Event::Heartbeat(DeviceStatus::parse(rest.trim()));
        }

        Event::Unrecognized(line.to_string())
    }
}
