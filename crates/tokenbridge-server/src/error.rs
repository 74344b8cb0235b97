//! Error type for the API layer and its status-code mapping.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokenbridge_core::{DomainError, ValidationError};
use tokenbridge_device::ChannelError;

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Anything a handler can fail with, ready to become an HTTP response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bridge operation failure; carries its own status semantics.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request payload rejected before reaching the device.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Channel write failure surfaced directly (time sync only).
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Domain(DomainError::Locked) => 423,
            ApiError::Domain(DomainError::NotAvailable) => 404,
            ApiError::Domain(DomainError::AlreadyConsumed) => 410,
            ApiError::Domain(DomainError::ProvisioningFailed) => 500,
            ApiError::Domain(DomainError::Unauthorized) => 401,
            ApiError::Domain(DomainError::NotConnected) => 503,
            ApiError::Validation(_) => 400,
            ApiError::Channel(_) => 500,
        }
    }

    /// Next step for the operator, where one exists.
    pub fn operator_hint(&self) -> Option<&'static str> {
        match self {
            ApiError::Domain(DomainError::Locked) => Some("Reset device to generate OTPs"),
            ApiError::Domain(DomainError::NotAvailable) => {
                Some("Press button on hardware token to generate OTP")
            }
            ApiError::Domain(DomainError::AlreadyConsumed) => {
                Some("Generate new OTP on hardware token")
            }
            _ => None,
        }
    }

    /// The JSON body for this error.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
            message: self.operator_hint().map(str::to_string),
        }
    }
}

/// Wire shape of every error response.
///
/// `message` is the operator hint and is omitted from the JSON entirely when
/// there is none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
