use crate::{
    constants::{MAX_SECRET_HEX_LENGTH, MAX_USER_ID_LENGTH},
    error::ValidationError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse device status as reported on `STATUS:` and `HEARTBEAT:` lines.
///
/// The firmware vocabulary is open-ended; the four well-known states get
/// their own variants and anything else is carried verbatim in
/// [`DeviceStatus::Other`]. Matching is case-sensitive: `STATUS:ready` does
/// not mean [`DeviceStatus::Ready`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceStatus {
    /// No status line has been seen yet.
    Unknown,
    Ready,
    Locked,
    Tampered,
    /// Any other status string, kept verbatim.
    Other(String),
}

impl DeviceStatus {
    /// Parse a device-reported status value.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "UNKNOWN" => DeviceStatus::Unknown,
            "READY" => DeviceStatus::Ready,
            "LOCKED" => DeviceStatus::Locked,
            "TAMPERED" => DeviceStatus::Tampered,
            other => DeviceStatus::Other(other.to_string()),
        }
    }

    /// The wire representation of this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            DeviceStatus::Unknown => "UNKNOWN",
            DeviceStatus::Ready => "READY",
            DeviceStatus::Locked => "LOCKED",
            DeviceStatus::Tampered => "TAMPERED",
            DeviceStatus::Other(s) => s,
        }
    }

    /// Returns `true` for the statuses that imply a tamper lockout.
    #[inline]
    #[must_use]
    pub fn is_locking(&self) -> bool {
        matches!(self, DeviceStatus::Locked | DeviceStatus::Tampered)
    }

    /// Returns `true` if the device reported itself ready.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, DeviceStatus::Ready)
    }
}

impl Default for DeviceStatus {
    fn default() -> Self {
        DeviceStatus::Unknown
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for DeviceStatus {
    fn from(value: String) -> Self {
        DeviceStatus::parse(&value)
    }
}

impl From<DeviceStatus> for String {
    fn from(status: DeviceStatus) -> Self {
        status.as_str().to_string()
    }
}

/// User identifier bound to a provisioned token.
///
/// Travels on the wire inside `PROVISION <user_id>:<secret_hex>`, so the
/// separator characters of that frame (colon, whitespace) are rejected here
/// rather than corrupting the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Create a user identifier with validation.
    ///
    /// The input is trimmed before validation.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidUserId`] if the identifier is empty,
    /// non-ASCII, longer than [`MAX_USER_ID_LENGTH`], or contains a colon or
    /// whitespace.
    pub fn new(id: &str) -> Result<Self, ValidationError> {
        let id = id.trim();

        if id.is_empty() {
            return Err(ValidationError::invalid_user_id("must not be empty"));
        }
        if id.len() > MAX_USER_ID_LENGTH {
            return Err(ValidationError::invalid_user_id(format!(
                "must be at most {MAX_USER_ID_LENGTH} chars, got {}",
                id.len()
            )));
        }
        if !id.is_ascii() {
            return Err(ValidationError::invalid_user_id("must be ASCII"));
        }
        if id.contains(':') || id.chars().any(|c| c.is_whitespace()) {
            return Err(ValidationError::invalid_user_id(
                "must not contain ':' or whitespace",
            ));
        }

        Ok(UserId(id.to_string()))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, ValidationError> {
        UserId::new(s)
    }
}

/// Hex-encoded provisioning secret.
///
/// The bridge never decodes or verifies the secret; it only guards the wire
/// format. Debug output is redacted so the secret cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHex(String);

impl SecretHex {
    /// Create a provisioning secret with validation.
    ///
    /// The input is trimmed before validation.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidSecretHex`] if the value is empty,
    /// has an odd number of digits, exceeds [`MAX_SECRET_HEX_LENGTH`], or
    /// contains a non-hex character.
    pub fn new(secret: &str) -> Result<Self, ValidationError> {
        let secret = secret.trim();

        if secret.is_empty() {
            return Err(ValidationError::invalid_secret_hex("must not be empty"));
        }
        if secret.len() > MAX_SECRET_HEX_LENGTH {
            return Err(ValidationError::invalid_secret_hex(format!(
                "must be at most {MAX_SECRET_HEX_LENGTH} chars, got {}",
                secret.len()
            )));
        }
        if secret.len() % 2 != 0 {
            return Err(ValidationError::invalid_secret_hex(
                "must be an even number of hex digits",
            ));
        }
        if !secret.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::invalid_secret_hex(
                "must contain hex digits only",
            ));
        }

        Ok(SecretHex(secret.to_string()))
    }

    /// Get the hex string for command encoding.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretHex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SecretHex(<{} digits>)", self.0.len())
    }
}

impl std::str::FromStr for SecretHex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, ValidationError> {
        SecretHex::new(s)
    }
}
