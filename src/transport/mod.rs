//! Byte transports feeding the decoder
//!
//! A transport only has to do two things: accept the protocol's fixed line
//! settings and hand over whatever bytes it has already received without
//! waiting for more. [`SerialSource`] talks to real hardware,
//! [`MemorySource`] replays bytes pushed through a [`MemoryFeed`].

use std::time::Duration;

use bytes::BytesMut;
use serialport::{DataBits, FlowControl, Parity, StopBits};

use crate::core::Result;

mod memory;
mod serial;

pub use self::memory::{MemoryFeed, MemorySource};
pub use self::serial::SerialSource;

/// Serial line parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSettings {
    /// Bits per second
    pub baud_rate: u32,
    /// Data bits per character
    pub data_bits: DataBits,
    /// Parity checking mode
    pub parity: Parity,
    /// Stop bits per character
    pub stop_bits: StopBits,
    /// Flow control mode
    pub flow_control: FlowControl,
    /// Read timeout
    pub timeout: Duration,
}

impl LineSettings {
    /// Fixed settings of the protocol 3 rower link
    pub const PROTOCOL_3: LineSettings = LineSettings {
        baud_rate: 1200,
        data_bits: DataBits::Eight,
        parity: Parity::None,
        stop_bits: StopBits::One,
        flow_control: FlowControl::None,
        timeout: Duration::from_millis(100),
    };
}

/// Non-blocking source of raw protocol bytes
pub trait ByteSource {
    /// Applies line settings to the underlying link
    fn configure(&mut self, line: &LineSettings) -> Result<()>;

    /// Appends every byte already received to `dst`
    ///
    /// Returns the number of bytes appended, which is zero when nothing is
    /// waiting. Must not block waiting for bytes that have not arrived.
    fn read_available(&mut self, dst: &mut BytesMut) -> Result<usize>;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn configure(&mut self, line: &LineSettings) -> Result<()> {
        (**self).configure(line)
    }

    fn read_available(&mut self, dst: &mut BytesMut) -> Result<usize> {
        (**self).read_available(dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_line_settings() {
        let line = LineSettings::PROTOCOL_3;
        assert_eq!(line.baud_rate, 1200);
        assert_eq!(line.data_bits, DataBits::Eight);
        assert_eq!(line.parity, Parity::None);
        assert_eq!(line.stop_bits, StopBits::One);
        assert_eq!(line.flow_control, FlowControl::None);
        assert_eq!(line.timeout, Duration::from_millis(100));
    }
}
