//! Request handlers for the bridge endpoints.
//!
//! One `handle_*` per route, transport-agnostic: the embedding HTTP server
//! deserializes the request body, calls the handler, and turns the result
//! into a response with [`ApiError::status_code`] and [`ApiError::body`]
//! on the failure path.

use tokenbridge_core::{SecretHex, UserId, ValidationError};
use tokenbridge_sync::{BridgeHandle, DeviceSummary, OtpView, StatusSnapshot, TamperStatus};

use crate::api::{
    FlushResponse, HealthResponse, ProvisionRequest, ProvisionResponse, ResetRequest,
    ResetResponse, SyncTimeResponse,
};
use crate::error::{ApiError, ApiResult};

/// Handler set over one bridge. Clones share the same underlying state.
#[derive(Clone)]
pub struct BridgeServer {
    bridge: BridgeHandle,
}

impl BridgeServer {
    pub fn new(bridge: BridgeHandle) -> Self {
        Self { bridge }
    }

    /// `GET /health` — liveness and identity, independent of the device.
    pub fn handle_health(&self) -> HealthResponse {
        HealthResponse::now()
    }

    /// `GET /device` — condensed device summary; 503 until first connect.
    pub fn handle_device(&self) -> ApiResult<DeviceSummary> {
        Ok(self.bridge.device_info()?)
    }

    /// `GET /status` — full status; always 200.
    pub fn handle_status(&self) -> StatusSnapshot {
        self.bridge.full_status()
    }

    /// `GET /otp?consume=` — current OTP view, optionally consuming.
    pub fn handle_otp(&self, consume: bool) -> ApiResult<OtpView> {
        Ok(self.bridge.otp(consume)?)
    }

    /// `POST /flush` — drop the cached OTP; always 200.
    pub fn handle_flush(&self) -> FlushResponse {
        FlushResponse::flushed(self.bridge.flush_otp())
    }

    /// `GET /tamper` — the tamper sub-record; always 200.
    pub fn handle_tamper(&self) -> TamperStatus {
        self.bridge.tamper_status()
    }

    /// `POST /provision` — validate, write to the device, confirm.
    pub async fn handle_provision(
        &self,
        request: ProvisionRequest,
    ) -> ApiResult<ProvisionResponse> {
        let user_id = UserId::new(&request.user_id)?;
        let secret_hex = SecretHex::new(&request.secret_hex)?;
        let accepted = user_id.as_str().to_string();

        self.bridge.provision(user_id, secret_hex).await?;
        Ok(ProvisionResponse::confirmed(accepted))
    }

    /// `POST /reset` — clear the tamper lockout with the admin PIN.
    pub async fn handle_reset(&self, request: ResetRequest) -> ApiResult<ResetResponse> {
        if request.pin.is_empty() {
            return Err(ValidationError::MissingPin.into());
        }
        self.bridge.reset_lockout(request.pin).await?;
        Ok(ResetResponse::unlocked())
    }

    /// `POST /sync_time` — re-send the clock handshake.
    pub async fn handle_sync_time(&self) -> ApiResult<SyncTimeResponse> {
        self.bridge.trigger_time_sync().await?;
        Ok(SyncTimeResponse::sent())
    }
}

/// Interprets the `consume` query parameter: the literal string `true`,
/// case-insensitively; anything else, or no parameter, is a plain read.
pub fn parse_consume_param(value: Option<&str>) -> bool {
    value.is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tokenbridge_device::{AnyPortProvider, MockPortProvider};
    use tokenbridge_sync::{SyncConfig, Synchronizer};

    /// A server whose supervisor never ran: no device, empty state.
    fn cold_server() -> BridgeServer {
        let sync = Synchronizer::new(
            AnyPortProvider::Mock(MockPortProvider::new()),
            SyncConfig::default(),
        );
        BridgeServer::new(sync.handle())
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some("true"), true)]
    #[case(Some("TRUE"), true)]
    #[case(Some("True"), true)]
    #[case(Some("false"), false)]
    #[case(Some("1"), false)]
    #[case(Some(""), false)]
    fn consume_param_parsing(#[case] value: Option<&str>, #[case] expected: bool) {
        assert_eq!(parse_consume_param(value), expected);
    }

    #[test]
    fn health_answers_without_a_device() {
        let response = cold_server().handle_health();
        assert_eq!(response.status, "ok");
        assert_eq!(response.service, "hardware-token-bridge");
    }

    #[test]
    fn device_is_unavailable_before_first_connect() {
        let error = cold_server().handle_device().unwrap_err();
        assert_eq!(error.status_code(), 503);
        assert_eq!(error.body().error, "Device not connected");
        assert_eq!(error.body().message, None);
    }

    #[test]
    fn status_is_total_before_first_connect() {
        let status = cold_server().handle_status();
        assert!(!status.connected);
        assert!(status.device.is_none());
        assert!(!status.otp_available);
    }

    #[test]
    fn otp_miss_carries_the_operator_hint() {
        let error = cold_server().handle_otp(false).unwrap_err();
        assert_eq!(error.status_code(), 404);

        let body = error.body();
        assert_eq!(body.error, "No valid OTP available");
        assert_eq!(
            body.message.as_deref(),
            Some("Press button on hardware token to generate OTP")
        );
    }

    #[test]
    fn flush_on_an_empty_cache_still_succeeds() {
        let response = cold_server().handle_flush();
        assert_eq!(response.message, "OTP cache flushed");
        assert_eq!(response.flushed_otp, None);
    }

    #[test]
    fn tamper_defaults_before_any_report() {
        let tamper = cold_server().handle_tamper();
        assert!(!tamper.detected);
        assert!(!tamper.locked);
        assert_eq!(tamper.count, 0);
    }

    #[rstest]
    #[case("", "deadbeef")]
    #[case("   ", "deadbeef")]
    #[case("alice", "")]
    #[case("alice", "xyz")]
    #[case("alice", "abc")]
    #[case("alice:colon", "deadbeef")]
    #[tokio::test]
    async fn provision_rejects_bad_payloads(#[case] user_id: &str, #[case] secret_hex: &str) {
        let request = ProvisionRequest {
            user_id: user_id.to_string(),
            secret_hex: secret_hex.to_string(),
        };

        let error = cold_server().handle_provision(request).await.unwrap_err();
        assert_eq!(error.status_code(), 400);
    }

    #[tokio::test]
    async fn provision_without_a_device_is_unavailable() {
        let request = ProvisionRequest {
            user_id: "alice".to_string(),
            secret_hex: "deadbeef".to_string(),
        };

        let error = cold_server().handle_provision(request).await.unwrap_err();
        assert_eq!(error.status_code(), 503);
    }

    #[tokio::test]
    async fn reset_requires_a_pin() {
        let error = cold_server()
            .handle_reset(ResetRequest::default())
            .await
            .unwrap_err();
        assert_eq!(error.status_code(), 400);
        assert_eq!(error.body().error, "PIN required");
    }

    #[tokio::test]
    async fn reset_without_a_device_is_unavailable() {
        let request = ResetRequest {
            pin: "1234".to_string(),
        };

        let error = cold_server().handle_reset(request).await.unwrap_err();
        assert_eq!(error.status_code(), 503);
    }

    #[tokio::test]
    async fn sync_time_without_a_device_is_a_quiet_success() {
        let response = cold_server().handle_sync_time().await.unwrap();
        assert_eq!(response.message, "Time sync sent to device");
    }
}
