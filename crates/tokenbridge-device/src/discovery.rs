//! Serial port discovery.
//!
//! This module locates the token among the host's serial ports. Bridge
//! chips (CP210x, CH340 and friends) advertise recognizable USB product
//! strings; discovery prefers the first port whose description mentions
//! one of the known fragments and falls back to the first enumerated port
//! so that a bench setup with a single adapter still connects.

use serialport::{SerialPortInfo, SerialPortType};
use tokenbridge_core::constants::PORT_DESCRIPTION_KEYWORDS;
use tracing::{debug, warn};

use crate::channels::AnyLineChannel;
use crate::error::ChannelResult;
use crate::serial::SerialLineChannel;
use crate::traits::PortProvider;

/// Port provider backed by the operating system's serial enumeration.
#[derive(Debug, Clone, Default)]
pub struct SerialPortProvider;

impl SerialPortProvider {
    /// Create a new provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PortProvider for SerialPortProvider {
    async fn discover(&self) -> Option<String> {
        let ports = match serialport::available_ports() {
            Ok(ports) => ports,
            Err(e) => {
                warn!(error = %e, "serial port enumeration failed");
                return None;
            }
        };

        let picked = pick_port(&ports);
        match &picked {
            Some(port) => debug!(port = %port, candidates = ports.len(), "port selected"),
            None => debug!("no serial ports present"),
        }
        picked
    }

    async fn open(&self, port: &str, baud_rate: u32) -> ChannelResult<AnyLineChannel> {
        let channel = SerialLineChannel::open(port, baud_rate)?;
        Ok(AnyLineChannel::Serial(channel))
    }
}

/// Pick the most plausible token port from an enumeration snapshot.
///
/// The first port whose description contains one of
/// [`PORT_DESCRIPTION_KEYWORDS`] (case-insensitively) wins; when nothing
/// matches, the first port in the snapshot is returned instead. An empty
/// snapshot yields `None`.
#[must_use]
pub fn pick_port(ports: &[SerialPortInfo]) -> Option<String> {
    ports
        .iter()
        .find(|info| {
            let description = describe(info).to_lowercase();
            PORT_DESCRIPTION_KEYWORDS
                .iter()
                .any(|keyword| description.contains(keyword))
        })
        .or_else(|| ports.first())
        .map(|info| info.port_name.clone())
}

/// Flatten a port's identifying strings into one searchable description.
///
/// USB ports contribute their manufacturer and product strings; every port
/// contributes its device path, which on Linux already distinguishes USB
/// adapters (`/dev/ttyUSB0`) from motherboard UARTs (`/dev/ttyS0`).
fn describe(info: &SerialPortInfo) -> String {
    match &info.port_type {
        SerialPortType::UsbPort(usb) => {
            let mut parts = vec![info.port_name.as_str()];
            if let Some(manufacturer) = usb.manufacturer.as_deref() {
                parts.push(manufacturer);
            }
            if let Some(product) = usb.product.as_deref() {
                parts.push(product);
            }
            parts.join(" ")
        }
        _ => info.port_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serialport::UsbPortInfo;

    fn usb_port(name: &str, manufacturer: Option<&str>, product: Option<&str>) -> SerialPortInfo {
        SerialPortInfo {
            port_name: name.to_string(),
            port_type: SerialPortType::UsbPort(UsbPortInfo {
                vid: 0x10C4,
                pid: 0xEA60,
                serial_number: None,
                manufacturer: manufacturer.map(String::from),
                product: product.map(String::from),
            }),
        }
    }

    fn bare_port(name: &str) -> SerialPortInfo {
        SerialPortInfo {
            port_name: name.to_string(),
            port_type: SerialPortType::Unknown,
        }
    }

    #[test]
    fn test_pick_port_empty() {
        assert_eq!(pick_port(&[]), None);
    }

    #[rstest]
    #[case::cp210("CP2102 USB to UART Bridge Controller")]
    #[case::ch340("USB2.0-Serial CH340")]
    #[case::generic_uart("FTDI UART adapter")]
    #[case::lowercase("usb serial converter")]
    fn test_pick_port_matches_known_descriptions(#[case] product: &str) {
        let ports = vec![
            bare_port("/dev/ttyS0"),
            usb_port("/dev/cu.token", None, Some(product)),
        ];
        assert_eq!(pick_port(&ports), Some("/dev/cu.token".to_string()));
    }

    #[test]
    fn test_pick_port_matches_manufacturer_string() {
        let ports = vec![
            bare_port("/dev/ttyS0"),
            usb_port("/dev/cu.token", Some("Silicon Labs UART"), None),
        ];
        assert_eq!(pick_port(&ports), Some("/dev/cu.token".to_string()));
    }

    #[test]
    fn test_pick_port_matches_device_path() {
        // No product strings at all, the path itself names the bus.
        let ports = vec![bare_port("/dev/ttyS0"), bare_port("/dev/ttyUSB0")];
        assert_eq!(pick_port(&ports), Some("/dev/ttyUSB0".to_string()));
    }

    #[test]
    fn test_pick_port_falls_back_to_first() {
        let ports = vec![bare_port("/dev/ttyS0"), bare_port("/dev/ttyS1")];
        assert_eq!(pick_port(&ports), Some("/dev/ttyS0".to_string()));
    }

    #[test]
    fn test_pick_port_prefers_match_over_position() {
        let ports = vec![
            bare_port("/dev/ttyS0"),
            usb_port("/dev/ttyACM3", None, Some("CH340 serial")),
            usb_port("/dev/ttyACM4", None, Some("CP2102N")),
        ];
        // First matching port wins even though an equally good one follows.
        assert_eq!(pick_port(&ports), Some("/dev/ttyACM3".to_string()));
    }
}
