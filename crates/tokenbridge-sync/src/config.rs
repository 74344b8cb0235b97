//! Timing and link parameters for the synchronizer.

use std::time::Duration;

use tokenbridge_core::constants::{
    COMMAND_SETTLE_MILLIS, CONNECT_SETTLE_MILLIS, OTP_TTL_SECONDS, RECONNECT_DELAY_SECONDS,
    SERIAL_BAUD_RATE,
};

/// Knobs for the connection loop and the OTP window.
///
/// The defaults mirror what the device firmware expects; deployments
/// normally run them unchanged. Tests shrink the delays instead of waiting
/// out real settle windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Line speed used for every connection attempt.
    pub baud_rate: u32,
    /// How long a reported OTP stays valid.
    pub otp_ttl: Duration,
    /// Pause between connection attempts after a failure or missing device.
    pub reconnect_delay: Duration,
    /// Grace period after opening the port; the device resets on open and
    /// drops anything sent while it boots.
    pub connect_settle: Duration,
    /// Wait after sending a command before checking the state for its echo.
    pub command_settle: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            baud_rate: SERIAL_BAUD_RATE,
            otp_ttl: Duration::from_secs(OTP_TTL_SECONDS),
            reconnect_delay: Duration::from_secs(RECONNECT_DELAY_SECONDS),
            connect_settle: Duration::from_millis(CONNECT_SETTLE_MILLIS),
            command_settle: Duration::from_millis(COMMAND_SETTLE_MILLIS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_firmware_contract() {
        let config = SyncConfig::default();

        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.otp_ttl, Duration::from_secs(90));
        assert_eq!(config.reconnect_delay, Duration::from_secs(3));
        assert_eq!(config.connect_settle, Duration::from_millis(2_000));
        assert_eq!(config.command_settle, Duration::from_millis(1_000));
    }
}
