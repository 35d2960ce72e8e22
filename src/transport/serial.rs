use std::io::{self, Read};

use bytes::BytesMut;
use serialport::SerialPort;
use tracing::debug;

use crate::core::{Error, Result};
use super::{ByteSource, LineSettings};

/// Rower attached through a serial port
pub struct SerialSource {
    /// Serial port the rower writes to
    port: Box<dyn SerialPort>,
}

impl SerialSource {
    /// Opens a serial device with the protocol's line settings
    pub fn open(device_path: &str) -> Result<Self> {
        let line = LineSettings::PROTOCOL_3;
        let port = serialport::new(device_path, line.baud_rate)
            .data_bits(line.data_bits)
            .parity(line.parity)
            .stop_bits(line.stop_bits)
            .flow_control(line.flow_control)
            .timeout(line.timeout)
            .open()
            .map_err(|e| Error::transport(format!("Failed to open rower device {}: {}", device_path, e)))?;

        debug!(device = device_path, "opened serial port");
        Ok(SerialSource { port })
    }

    /// Wraps a port that is already open
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        SerialSource { port }
    }
}

impl ByteSource for SerialSource {
    fn configure(&mut self, line: &LineSettings) -> Result<()> {
        self.port.set_baud_rate(line.baud_rate)?;
        self.port.set_data_bits(line.data_bits)?;
        self.port.set_parity(line.parity)?;
        self.port.set_stop_bits(line.stop_bits)?;
        self.port.set_flow_control(line.flow_control)?;
        self.port.set_timeout(line.timeout)?;
        Ok(())
    }

    fn read_available(&mut self, dst: &mut BytesMut) -> Result<usize> {
        let available = self.port.bytes_to_read()? as usize;
        if available == 0 {
            return Ok(0);
        }

        let start = dst.len();
        dst.resize(start + available, 0);

        match self.port.read(&mut dst[start..]) {
            Ok(n) => {
                dst.truncate(start + n);
                Ok(n)
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                dst.truncate(start);
                Ok(0)
            }
            Err(e) => {
                dst.truncate(start);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires a rower on the serial port
    fn test_open_and_configure() {
        let mut source = SerialSource::open("/dev/ttyUSB0").unwrap();
        source.configure(&LineSettings::PROTOCOL_3).unwrap();

        let mut buffer = BytesMut::new();
        let n = source.read_available(&mut buffer).unwrap();
        assert_eq!(buffer.len(), n);
    }

    #[test]
    fn test_open_missing_device() {
        let result = SerialSource::open("/dev/coxwire-does-not-exist");
        assert!(matches!(result, Err(Error::Transport(_))));
    }
}
