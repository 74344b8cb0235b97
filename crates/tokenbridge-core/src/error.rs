use thiserror::Error;

/// Domain-level failures returned to facade callers.
///
/// Each variant corresponds to exactly one HTTP status in the bridge's route
/// contract; transport failures never appear here directly — the supervisor
/// recovers them and callers observe at most a transient [`NotConnected`].
///
/// [`NotConnected`]: DomainError::NotConnected
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    /// Tamper lockout is active; the device refuses OTP retrieval.
    #[error("Device is locked due to tamper detection")]
    Locked,

    /// No OTP is cached, or the cached OTP has outlived its TTL.
    #[error("No valid OTP available")]
    NotAvailable,

    /// The cached OTP was already handed out with consumption semantics.
    #[error("OTP already consumed")]
    AlreadyConsumed,

    /// The device did not report `provisioned` within the settle window.
    #[error("Provisioning failed")]
    ProvisioningFailed,

    /// The device stayed locked after a reset attempt (wrong PIN, or the
    /// reset was ignored).
    #[error("Invalid PIN or reset failed")]
    Unauthorized,

    /// No serial channel is open (or none has ever been).
    #[error("Device not connected")]
    NotConnected,
}

/// Rejections raised while validating caller-supplied identifiers before any
/// device traffic happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid user id: {reason}")]
    InvalidUserId { reason: String },

    #[error("Invalid secret: {reason}")]
    InvalidSecretHex { reason: String },

    #[error("PIN required")]
    MissingPin,
}

impl ValidationError {
    pub fn invalid_user_id(reason: impl Into<String>) -> Self {
        ValidationError::InvalidUserId {
            reason: reason.into(),
        }
    }

    pub fn invalid_secret_hex(reason: impl Into<String>) -> Self {
        ValidationError::InvalidSecretHex {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
