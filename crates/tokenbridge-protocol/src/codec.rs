//! Tokio codec for the device's line-oriented framing.
//!
//! `LineCodec` turns a raw byte stream into trimmed text lines and renders
//! outbound command lines with their terminating newline. It is the framing
//! layer beneath the serial channel: `Framed<SerialStream, LineCodec>`.
//!
//! # Overview
//!
//! - [`Decoder`]: splits on `\n`, strips a trailing `\r`, and converts
//!   lossily from UTF-8 — a token glitching mid-byte must never produce a
//!   stream error, only a mangled line that the decoder upstairs will drop
//!   as unrecognized.
//! - [`Encoder`]: appends `\n` to an outbound line.
//!
//! # Oversized Lines
//!
//! A peer that stops sending newlines would otherwise grow the read buffer
//! without bound. Lines longer than the configured maximum are discarded
//! wholesale (silently, like any other protocol noise) and the codec resumes
//! at the next newline.
//!
//! # Usage
//!
//! ```
//! use bytes::BytesMut;
//! use tokio_util::codec::Decoder;
//! use tokenbridge_protocol::LineCodec;
//!
//! let mut codec = LineCodec::new();
//! let mut buf = BytesMut::from(&b"STATUS:READY\r\nOTP:123"[..]);
//!
//! assert_eq!(codec.decode(&mut buf).unwrap(), Some("STATUS:READY".to_string()));
//! assert_eq!(codec.decode(&mut buf).unwrap(), None); // partial line stays buffered
//! ```

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use tokenbridge_core::constants::MAX_LINE_LENGTH;

/// Newline-delimited text codec with lossy UTF-8 decoding.
#[derive(Debug)]
pub struct LineCodec {
    /// Maximum accepted line length (bytes, excluding the newline).
    max_line_length: usize,

    /// Set while skipping the remainder of an oversized line.
    discarding: bool,
}

impl LineCodec {
    /// Create a codec with the default maximum line length.
    pub fn new() -> Self {
        Self {
            max_line_length: MAX_LINE_LENGTH,
            discarding: false,
        }
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self {
            max_line_length,
            discarding: false,
        }
    }

    /// Get the configured maximum line length.
    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = std::io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if self.discarding {
                // Drop bytes until the oversized line finally terminates.
                match src.iter().position(|&b| b == b'\n') {
                    Some(pos) => {
                        src.advance(pos + 1);
                        self.discarding = false;
                    }
                    None => {
                        src.clear();
                        return Ok(None);
                    }
                }
                continue;
            }

            match src.iter().position(|&b| b == b'\n') {
                Some(pos) if pos > self.max_line_length => {
                    // Complete but oversized: discard and keep scanning.
                    src.advance(pos + 1);
                }
                Some(pos) => {
                    let mut line = src.split_to(pos + 1);
                    line.truncate(pos);
                    if line.last() == Some(&b'\r') {
                        line.truncate(line.len() - 1);
                    }
                    return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
                }
                None if src.len() > self.max_line_length => {
                    src.clear();
                    self.discarding = true;
                    return Ok(None);
                }
                None => return Ok(None),
            }
        }
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = std::io::Error;

    fn encode(&mut self, line: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = line.as_ref();
        dst.reserve(line.len() + 1);
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(b"\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_single_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"OTP:123456\n"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), Some("OTP:123456".to_string()));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_decode_strips_carriage_return() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"STATUS:READY\r\n"[..]);

        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some("STATUS:READY".to_string())
        );
    }

    #[test]
    fn test_decode_multiple_lines_in_buffer() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"A:1\nB:2\nC:3\n"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), Some("A:1".to_string()));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("B:2".to_string()));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("C:3".to_string()));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_decode_partial_line_waits_for_newline() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"OTP:48"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"2913\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("OTP:482913".to_string()));
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy_not_fatal() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"OTP:12\xff34\n"[..]);

        let line = codec.decode(&mut buf).unwrap().unwrap();
        assert!(line.starts_with("OTP:12"));
        assert!(line.contains('\u{FFFD}'));
    }

    #[test]
    fn test_decode_empty_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"\n"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), Some(String::new()));
    }

    #[test]
    fn test_oversized_line_is_discarded_silently() {
        let mut codec = LineCodec::with_max_line_length(8);
        let mut buf = BytesMut::from(&b"AAAAAAAAAAAAAAAA\nSTATUS:X\n"[..]);

        // The oversized line vanishes; the next line decodes normally.
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("STATUS:X".to_string()));
    }

    #[test]
    fn test_oversized_line_across_reads() {
        let mut codec = LineCodec::with_max_line_length(8);
        let mut buf = BytesMut::from(&b"AAAAAAAAAAAAAAAA"[..]);

        // No newline yet and over budget: codec enters discard mode.
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.is_empty());

        buf.extend_from_slice(b"AAAA\nOTP:1\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("OTP:1".to_string()));
    }

    #[test]
    fn test_encode_appends_newline() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec.encode("SYNC_TIME 1700000000", &mut buf).unwrap();
        assert_eq!(&buf[..], b"SYNC_TIME 1700000000\n");
    }

    #[test]
    fn test_encode_then_decode_roundtrip() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec.encode("RESET 4242", &mut buf).unwrap();
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("RESET 4242".to_string()));
    }
}
