//! Applies decoded device events to the shared state record.
//!
//! Each event touches only the fields it is about; everything else keeps its
//! last-known value. The rules here are intentionally last-write-wins: a
//! `STATUS:READY` after a tamper alert unlocks the device again, because the
//! device itself is the authority on whether it is currently locked out.

use chrono::Utc;
use tokenbridge_core::DeviceStatus;
use tokenbridge_protocol::Event;
use tokio::time::Instant;

use crate::state::DeviceState;

/// Folds one event into the state record.
///
/// Must be called with the state lock held; the reducer itself takes no
/// locks and never blocks.
pub fn apply(state: &mut DeviceState, event: Event) {
    match event {
        Event::Otp(otp) => {
            state.otp = Some(otp);
            state.otp_issued_at = Some(Instant::now());
            state.otp_generated_at = Some(Utc::now());
            // A fresh code re-arms consumption even if the previous one was
            // already handed out.
            state.otp_consumed = false;
        }
        Event::TimeStep(step) => state.time_step = Some(step),
        Event::UserId(user_id) => state.user_id = Some(user_id),
        Event::Status(status) => {
            state.tamper.locked = status.is_locking();
            state.status = status;
        }
        Event::Provisioned(provisioned) => state.provisioned = provisioned,
        Event::Eeprom(available) => state.eeprom_available = available,
        Event::TimeSync(synced) => state.time_synced = synced,
        Event::TamperCount(count) => state.tamper.count = count,
        Event::TamperAlert => {
            state.tamper.detected = true;
            state.tamper.detected_at = Some(Utc::now());
            state.tamper.locked = true;
        }
        Event::ResetSuccess => {
            state.tamper.detected = false;
            state.tamper.locked = false;
        }
        Event::Heartbeat(status) => match status {
            // A locked heartbeat carries the same weight as a status report.
            DeviceStatus::Locked => {
                state.status = DeviceStatus::Locked;
                state.tamper.locked = true;
            }
            // A ready heartbeat refreshes the status but does not unlock;
            // only a status report or a reset may do that.
            DeviceStatus::Ready => state.status = DeviceStatus::Ready,
            _ => {}
        },
        Event::Unrecognized(_) => {}
    }
}
