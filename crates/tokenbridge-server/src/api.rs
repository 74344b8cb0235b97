//! Typed request and response bodies for the HTTP surface.
//!
//! Field names here are wire contract; clients parse them literally. Status
//! and OTP views come straight from `tokenbridge-sync`, which already
//! serializes with the contract key names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokenbridge_core::VERSION;
use tokenbridge_core::constants::SERVICE_NAME;

/// `GET /health` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn now() -> Self {
        Self {
            status: "ok".to_string(),
            service: SERVICE_NAME.to_string(),
            version: VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// `POST /provision` payload.
///
/// Fields default to empty so that absent and empty keys reject the same
/// way, with a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub secret_hex: String,
}

/// `POST /provision` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionResponse {
    pub success: bool,
    pub message: String,
    pub user_id: String,
}

impl ProvisionResponse {
    pub fn confirmed(user_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message: "Device provisioned successfully".to_string(),
            user_id: user_id.into(),
        }
    }
}

/// `POST /reset` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub pin: String,
}

/// `POST /reset` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetResponse {
    pub message: String,
    pub locked: bool,
}

impl ResetResponse {
    pub fn unlocked() -> Self {
        Self {
            message: "Device reset successful".to_string(),
            locked: false,
        }
    }
}

/// `POST /flush` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushResponse {
    pub message: String,
    pub flushed_otp: Option<String>,
}

impl FlushResponse {
    pub fn flushed(flushed_otp: Option<String>) -> Self {
        Self {
            message: "OTP cache flushed".to_string(),
            flushed_otp,
        }
    }
}

/// `POST /sync_time` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTimeResponse {
    pub message: String,
}

impl SyncTimeResponse {
    pub fn sent() -> Self {
        Self {
            message: "Time sync sent to device".to_string(),
        }
    }
}
