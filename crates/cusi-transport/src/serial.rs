use std::time::Duration;

use serialport::SerialPortType;
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::DeviceStream;

/// Baud rate spoken by the device firmware.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// How long a single read waits for more bytes before the device is
/// considered idle.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(200);

/// Settings applied when a port is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    /// Line speed in bits per second. Default: 115200.
    pub baud_rate: u32,
    /// Per-read timeout. Default: 200 ms.
    pub read_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// A serial port discovered on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// OS name of the port (`/dev/ttyUSB0`, `COM3`, ...).
    pub name: String,
    /// Short description of the port type.
    pub kind: String,
}

/// Open `port` with the given settings.
pub fn open(port: &str, config: &SerialConfig) -> Result<DeviceStream> {
    let inner = serialport::new(port, config.baud_rate)
        .timeout(config.read_timeout)
        .open()
        .map_err(|source| TransportError::Open {
            port: port.to_string(),
            source,
        })?;

    info!(port, baud = config.baud_rate, timeout = ?config.read_timeout, "opened serial port");
    Ok(DeviceStream::new(port, inner))
}

/// List the serial ports available on this host.
pub fn available_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports().map_err(TransportError::Enumerate)?;
    debug!(count = ports.len(), "enumerated serial ports");

    Ok(ports
        .into_iter()
        .map(|port| PortInfo {
            kind: port_kind(&port.port_type),
            name: port.port_name,
        })
        .collect())
}

fn port_kind(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => match &usb.product {
            Some(product) => format!("usb {:04x}:{:04x} {product}", usb.vid, usb.pid),
            None => format!("usb {:04x}:{:04x}", usb.vid, usb.pid),
        },
        SerialPortType::PciPort => "pci".to_string(),
        SerialPortType::BluetoothPort => "bluetooth".to_string(),
        SerialPortType::Unknown => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_firmware() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.read_timeout, Duration::from_millis(200));
    }

    #[test]
    #[cfg(unix)]
    fn open_missing_port_reports_port_name() {
        let err = open("/dev/cusi-no-such-port", &SerialConfig::default()).unwrap_err();
        match &err {
            TransportError::Open { port, .. } => assert_eq!(port, "/dev/cusi-no-such-port"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("/dev/cusi-no-such-port"));
    }

    #[test]
    fn port_kind_names() {
        assert_eq!(port_kind(&SerialPortType::PciPort), "pci");
        assert_eq!(port_kind(&SerialPortType::BluetoothPort), "bluetooth");
        assert_eq!(port_kind(&SerialPortType::Unknown), "unknown");
    }
}
