//! Commands the bridge writes to the device.
//!
//! The token accepts exactly three commands, each a single newline-terminated
//! ASCII line (the newline is added by the channel codec, not here):
//!
//! ```text
//! SYNC_TIME <unix-seconds>
//! PROVISION <user_id>:<secret_hex>
//! RESET <pin>
//! ```
//!
//! No command produces a direct reply; the device reports outcomes through
//! its regular status lines, which is why command issuers wait a settle delay
//! and then re-check the state record.

use tokenbridge_core::{SecretHex, UserId};

/// One outbound command line.
#[derive(Debug, Clone)]
pub enum Command {
    /// Push the host's Unix time to the device clock.
    SyncTime { unix_seconds: i64 },

    /// Store an identity and TOTP secret in the token's EEPROM.
    Provision {
        user_id: UserId,
        secret_hex: SecretHex,
    },

    /// Clear a tamper lockout with the admin PIN.
    Reset { pin: String },
}

impl Command {
    /// Render the wire line for this command, without the trailing newline.
    ///
    /// # Examples
    ///
    /// ```
    /// use tokenbridge_protocol::Command;
    /// use tokenbridge_core::{SecretHex, UserId};
    ///
    /// let cmd = Command::SyncTime { unix_seconds: 1_700_000_000 };
    /// assert_eq!(cmd.encode(), "SYNC_TIME 1700000000");
    ///
    /// let cmd = Command::Provision {
    ///     user_id: UserId::new("alice").unwrap(),
    ///     secret_hex: SecretHex::new("deadbeef").unwrap(),
    /// };
    /// assert_eq!(cmd.encode(), "PROVISION alice:deadbeef");
    /// ```
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Command::SyncTime { unix_seconds } => format!("SYNC_TIME {unix_seconds}"),
            Command::Provision {
                user_id,
                secret_hex,
            } => format!("PROVISION {}:{}", user_id.as_str(), secret_hex.as_str()),
            Command::Reset { pin } => format!("RESET {pin}"),
        }
    }

    /// The command verb, for log fields that must not carry payloads.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Command::SyncTime { .. } => "SYNC_TIME",
            Command::Provision { .. } => "PROVISION",
            Command::Reset { .. } => "RESET",
        }
    }
}
