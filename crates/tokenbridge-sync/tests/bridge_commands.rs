//! End-to-end command flows against the firmware emulator.
//!
//! The emulator stays owned by the test, which pumps each exchange by hand:
//! await what the bridge wrote, let the emulator answer, push the reply
//! lines back. That keeps every exchange visible in the test body and makes
//! the settle-window confirmation logic fully deterministic under the
//! paused clock.

use std::time::Duration;

use tokenbridge_core::{DeviceStatus, DomainError, SecretHex, UserId};
use tokenbridge_device::{AnyPortProvider, MockChannelHandle, MockPortProvider};
use tokenbridge_emulator::{TIME_STEP_SECONDS, TokenEmulator, emit_report};
use tokenbridge_sync::{BridgeHandle, SyncConfig, Synchronizer};
use tokio::time::advance;

async fn eventually(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(30), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("condition not met before timeout");
}

/// Connects a bridge to a freshly booted emulator and completes the
/// time-sync handshake.
async fn bridge_with_token() -> (BridgeHandle, MockChannelHandle, TokenEmulator) {
    let provider = MockPortProvider::new();
    let mut device = provider.queue_connection();
    let sync = Synchronizer::new(AnyPortProvider::Mock(provider), SyncConfig::default());
    let bridge = sync.handle();
    tokio::spawn(sync.run());

    let mut token = TokenEmulator::new();
    let handshake = token
        .serve_next(&mut device)
        .await
        .expect("device link")
        .expect("handshake");
    assert!(handshake.starts_with("SYNC_TIME "));
    token.announce_boot(&device).await.expect("boot banner");
    eventually(|| {
        let status = bridge.full_status();
        status.status == DeviceStatus::Ready && status.time_synced
    })
    .await;

    (bridge, device, token)
}

/// Provisions the token through the bridge, pumping the exchange.
async fn provision_alice(
    bridge: &BridgeHandle,
    device: &mut MockChannelHandle,
    token: &mut TokenEmulator,
) {
    let pending = tokio::spawn({
        let bridge = bridge.clone();
        async move {
            bridge
                .provision(
                    UserId::new("alice").expect("valid user"),
                    SecretHex::new("deadbeefcafe").expect("valid secret"),
                )
                .await
        }
    });

    let command = token
        .serve_next(device)
        .await
        .expect("device link")
        .expect("provision command");
    assert_eq!(command, "PROVISION alice:deadbeefcafe");

    pending
        .await
        .expect("provision task")
        .expect("provisioning confirmed");
}

#[tokio::test(start_paused = true)]
async fn provision_flows_end_to_end() {
    let (bridge, mut device, mut token) = bridge_with_token().await;
    assert!(!bridge.full_status().provisioned);

    provision_alice(&bridge, &mut device, &mut token).await;

    assert!(token.is_provisioned());
    assert_eq!(token.stored_secret(), Some("deadbeefcafe"));
    let status = bridge.full_status();
    assert!(status.provisioned);
    assert_eq!(status.user_id.as_deref(), Some("alice"));
}

#[tokio::test(start_paused = true)]
async fn otp_lifecycle_from_button_press_to_expiry() {
    let (bridge, mut device, mut token) = bridge_with_token().await;
    provision_alice(&bridge, &mut device, &mut token).await;

    let report = token.press_button();
    let code = report[0]
        .strip_prefix("OTP:")
        .expect("otp report line")
        .to_string();
    emit_report(&device, report).await.expect("push report");
    eventually(|| bridge.full_status().otp_available).await;

    // Peeking does not consume.
    let peek = bridge.otp(false).expect("peek");
    assert_eq!(peek.otp, code);
    assert!(!peek.consumed);
    assert_eq!(
        peek.time_step,
        token.clock().map(|clock| clock / TIME_STEP_SECONDS)
    );

    let consumed = bridge.otp(true).expect("consuming read");
    assert!(!consumed.consumed);
    assert!(bridge.otp(false).expect("peek after consume").consumed);
    assert_eq!(bridge.otp(true), Err(DomainError::AlreadyConsumed));

    // A second press hands out a fresh, different code.
    let report = token.press_button();
    let fresh = report[0].strip_prefix("OTP:").expect("otp line").to_string();
    assert_ne!(fresh, code);
    emit_report(&device, report).await.expect("push report");
    eventually(|| {
        bridge
            .otp(false)
            .is_ok_and(|view| view.otp == fresh && !view.consumed)
    })
    .await;

    // Flushing discards it; expiry takes care of the rest.
    assert_eq!(bridge.flush_otp().as_deref(), Some(fresh.as_str()));
    assert_eq!(bridge.otp(false), Err(DomainError::NotAvailable));

    emit_report(&device, token.press_button())
        .await
        .expect("push report");
    eventually(|| bridge.full_status().otp_available).await;
    advance(Duration::from_secs(91)).await;
    assert_eq!(bridge.otp(false), Err(DomainError::NotAvailable));
    assert!(!bridge.full_status().otp_available);
}

#[tokio::test(start_paused = true)]
async fn tamper_lockout_bounces_wrong_pins() {
    let (bridge, mut device, mut token) = bridge_with_token().await;
    provision_alice(&bridge, &mut device, &mut token).await;

    emit_report(&device, token.trigger_tamper())
        .await
        .expect("push alert");
    eventually(|| bridge.full_status().tamper.locked).await;

    let tamper = bridge.tamper_status();
    assert!(tamper.detected);
    assert_eq!(tamper.count, 1);
    assert!(tamper.detected_at.is_some());
    assert_eq!(bridge.otp(false), Err(DomainError::Locked));
    assert!(bridge.device_info().expect("summary").tamper_locked);

    // Wrong PIN: the device answers with a line the bridge ignores, so the
    // lockout stands and the reset is unauthorized.
    let pending = tokio::spawn({
        let bridge = bridge.clone();
        async move { bridge.reset_lockout("9999").await }
    });
    let command = token
        .serve_next(&mut device)
        .await
        .expect("device link")
        .expect("reset command");
    assert_eq!(command, "RESET 9999");
    assert_eq!(
        pending.await.expect("reset task"),
        Err(DomainError::Unauthorized)
    );
    assert!(bridge.full_status().tamper.locked);

    // Right PIN: the device unlocks and the detection flag clears with it.
    let pending = tokio::spawn({
        let bridge = bridge.clone();
        async move { bridge.reset_lockout("1234").await }
    });
    token
        .serve_next(&mut device)
        .await
        .expect("device link")
        .expect("reset command");
    pending.await.expect("reset task").expect("reset accepted");

    let tamper = bridge.tamper_status();
    assert!(!tamper.locked);
    assert!(!tamper.detected);
    assert_eq!(tamper.count, 1);
    assert_eq!(bridge.full_status().status, DeviceStatus::Ready);
}

#[tokio::test(start_paused = true)]
async fn manual_time_sync_reaches_the_token() {
    let (bridge, mut device, mut token) = bridge_with_token().await;
    let synced_at = token.clock().expect("handshake synced the clock");

    bridge.trigger_time_sync().await.expect("trigger sync");
    let line = token
        .serve_next(&mut device)
        .await
        .expect("device link")
        .expect("sync command");
    let epoch = line
        .strip_prefix("SYNC_TIME ")
        .expect("sync verb")
        .parse::<i64>()
        .expect("epoch argument");

    assert_eq!(token.clock(), Some(epoch));
    assert!(epoch >= synced_at);
    assert!(bridge.full_status().time_synced);
}
