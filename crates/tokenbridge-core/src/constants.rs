//! Fixed configuration constants for the token bridge.
//!
//! This module centralizes every tunable the bridge relies on: the serial
//! link parameters, the OTP validity window, the supervisor's retry cadence,
//! and the settle delays inserted after write commands. None of these values
//! are persisted or runtime-configurable; they describe the contract between
//! the bridge and the token firmware.
//!
//! # Device Protocol
//!
//! The token pushes one ASCII status line per message:
//!
//! ```text
//! OTP:482913
//! STATUS:READY
//! TAMPER_COUNT:2
//! HEARTBEAT:LOCKED
//! ```
//!
//! and accepts three newline-terminated commands:
//!
//! ```text
//! SYNC_TIME <unix-seconds>
//! PROVISION <user_id>:<secret_hex>
//! RESET <pin>
//! ```
//!
//! # Timing Model
//!
//! | Constant | Purpose |
//! |----------|---------|
//! | [`OTP_TTL_SECONDS`] | validity window of a cached OTP |
//! | [`RECONNECT_DELAY_SECONDS`] | pause between connection attempts |
//! | [`CONNECT_SETTLE_MILLIS`] | wait after opening the port, before the handshake |
//! | [`COMMAND_SETTLE_MILLIS`] | wait after a command write, before checking state |
//! | [`READ_POLL_MILLIS`] | read-loop poll timeout (an idle poll is not an error) |

// ============================================================================
// Serial Link
// ============================================================================

/// Serial baud rate for the token's USB bridge chip.
///
/// # Value: 115200
///
/// All shipped firmware revisions open the UART at this rate; it is not
/// negotiable at runtime.
///
/// # Examples
///
/// ```
/// use tokenbridge_core::constants::SERIAL_BAUD_RATE;
///
/// assert_eq!(SERIAL_BAUD_RATE, 115_200);
/// ```
pub const SERIAL_BAUD_RATE: u32 = 115_200;

/// Maximum accepted length of one protocol line (bytes).
///
/// Lines longer than this indicate a desynchronized or hostile peer and are
/// truncated at the codec layer rather than buffered without bound. The
/// longest legitimate line is an `OTP:` payload well under 100 bytes.
///
/// # Value: 512 bytes
pub const MAX_LINE_LENGTH: usize = 512;

/// USB description fragments identifying common serial bridge chips.
///
/// Port discovery prefers the first enumerated port whose description
/// contains one of these fragments (matched case-insensitively), falling
/// back to the first available port when none match.
///
/// # Examples
///
/// ```
/// use tokenbridge_core::constants::PORT_DESCRIPTION_KEYWORDS;
///
/// let description = "CP2102 USB to UART Bridge Controller".to_lowercase();
/// assert!(
///     PORT_DESCRIPTION_KEYWORDS
///         .iter()
///         .any(|k| description.contains(k))
/// );
/// ```
pub const PORT_DESCRIPTION_KEYWORDS: &[&str] = &["cp210", "ch340", "uart", "usb", "serial"];

// ============================================================================
// OTP Validity
// ============================================================================

/// Validity window of a cached OTP, measured from the moment the `OTP:` line
/// arrived (seconds).
///
/// # Value: 90 seconds
///
/// The firmware derives codes over 30-second steps; three steps of slack
/// absorbs clock drift between token and host. After this window the bridge
/// reports the OTP as unavailable regardless of consumption state.
///
/// # Examples
///
/// ```
/// use tokenbridge_core::constants::OTP_TTL_SECONDS;
/// use std::time::Duration;
///
/// let ttl = Duration::from_secs(OTP_TTL_SECONDS);
/// assert_eq!(ttl.as_secs(), 90);
/// ```
pub const OTP_TTL_SECONDS: u64 = 90;

// ============================================================================
// Supervisor Timing
// ============================================================================

/// Fixed pause between reconnection attempts (seconds).
///
/// # Value: 3 seconds
///
/// The supervisor retries at this fixed interval forever; there is no
/// exponential backoff. A token can be unplugged and replugged at any time
/// and the bridge is expected to pick it up within a few seconds.
pub const RECONNECT_DELAY_SECONDS: u64 = 3;

/// Wait after opening the serial port before any traffic (milliseconds).
///
/// # Value: 2000 ms
///
/// Opening the port resets most bridge chips (DTR toggles the MCU); the
/// firmware needs this long to finish booting before it can observe the
/// time-sync handshake.
pub const CONNECT_SETTLE_MILLIS: u64 = 2000;

/// Wait after writing a command before checking the resulting state
/// (milliseconds).
///
/// # Value: 1000 ms
///
/// Provisioning and reset are fire-and-forget writes; the device reports the
/// outcome asynchronously via status lines. Commands wait this long, then
/// re-read the state record to decide success.
pub const COMMAND_SETTLE_MILLIS: u64 = 1000;

/// Read-loop poll timeout (milliseconds).
///
/// # Value: 1000 ms
///
/// A poll that yields no line within this window is treated as idle, not as
/// an error; the loop simply polls again.
pub const READ_POLL_MILLIS: u64 = 1000;

// ============================================================================
// Device Vocabularies
// ============================================================================

/// `EEPROM:` payloads that report the storage chip as usable.
///
/// Matched exactly and case-sensitively; firmware revisions have used all
/// four spellings.
///
/// # Examples
///
/// ```
/// use tokenbridge_core::constants::EEPROM_AVAILABLE_VALUES;
///
/// assert!(EEPROM_AVAILABLE_VALUES.contains(&"DETECTED"));
/// assert!(!EEPROM_AVAILABLE_VALUES.contains(&"detected"));
/// ```
pub const EEPROM_AVAILABLE_VALUES: &[&str] = &["DETECTED", "AVAILABLE", "FOUND", "OK"];

/// `TIME_SYNC:` payloads that acknowledge a successful synchronization.
///
/// Matched exactly and case-sensitively.
pub const TIME_SYNC_OK_VALUES: &[&str] = &["SUCCESS", "YES", "OK"];

// ============================================================================
// Identity Limits
// ============================================================================

/// Maximum length of a user identifier (characters).
///
/// The identifier is stored verbatim in the token's EEPROM record; the
/// firmware reserves this many bytes for it.
///
/// # Value: 64 characters
pub const MAX_USER_ID_LENGTH: usize = 64;

/// Maximum length of a hex-encoded provisioning secret (characters).
///
/// # Value: 128 characters (a 64-byte secret)
pub const MAX_SECRET_HEX_LENGTH: usize = 128;

// ============================================================================
// Service Identity
// ============================================================================

/// Service identity string reported by the health surface.
///
/// # Examples
///
/// ```
/// use tokenbridge_core::constants::SERVICE_NAME;
///
/// assert_eq!(SERVICE_NAME, "hardware-token-bridge");
/// ```
pub const SERVICE_NAME: &str = "hardware-token-bridge";
