use bytes::Bytes;

/// Opcodes of the wired rower protocol
///
/// Every frame starts with one of these bytes; the opcode alone decides how
/// many payload bytes follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Heart rate, one byte
    Pulse = 0xFB,
    /// Stroke boundary, recovery phase begins, no payload
    Stroke = 0xFC,
    /// Pull phase begins, two bytes of battery voltage
    Pull = 0xFD,
    /// Distance increment in decimeters, one byte
    Distance = 0xFE,
    /// Stroke rate and speed, one byte each
    StrokeRate = 0xFF,
}

impl Opcode {
    /// Looks up the opcode for a byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0xFB => Some(Opcode::Pulse),
            0xFC => Some(Opcode::Stroke),
            0xFD => Some(Opcode::Pull),
            0xFE => Some(Opcode::Distance),
            0xFF => Some(Opcode::StrokeRate),
            _ => None,
        }
    }

    /// Wire value of the opcode
    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Number of payload bytes following the opcode
    pub fn payload_len(self) -> usize {
        match self {
            Opcode::Stroke => 0,
            Opcode::Pulse | Opcode::Distance => 1,
            Opcode::Pull | Opcode::StrokeRate => 2,
        }
    }

    /// Builds the frame for this opcode from its payload
    ///
    /// Only the first `payload_len` bytes of `payload` are looked at.
    pub fn frame(self, payload: [u8; 2]) -> Frame {
        match self {
            Opcode::Pulse => Frame::Pulse(payload[0]),
            Opcode::Stroke => Frame::Stroke,
            Opcode::Pull => Frame::Pull { voltage: payload },
            Opcode::Distance => Frame::Distance(payload[0]),
            Opcode::StrokeRate => Frame::StrokeRate {
                rate: payload[0],
                speed: payload[1],
            },
        }
    }
}

/// One decoded protocol frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Heart rate in beats per minute
    Pulse(u8),
    /// A stroke finished and the recovery phase begins
    Stroke,
    /// The pull phase begins; the voltage bytes are not interpreted
    Pull { voltage: [u8; 2] },
    /// Distance covered since the previous frame, in decimeters
    Distance(u8),
    /// Stroke rate in strokes per minute and speed in decimeters per second
    StrokeRate { rate: u8, speed: u8 },
    /// A byte that is not a known opcode
    Unrecognized(u8),
}

impl Frame {
    /// Opcode byte leading this frame on the wire
    pub fn opcode_byte(&self) -> u8 {
        match self {
            Frame::Pulse(_) => Opcode::Pulse.byte(),
            Frame::Stroke => Opcode::Stroke.byte(),
            Frame::Pull { .. } => Opcode::Pull.byte(),
            Frame::Distance(_) => Opcode::Distance.byte(),
            Frame::StrokeRate { .. } => Opcode::StrokeRate.byte(),
            Frame::Unrecognized(byte) => *byte,
        }
    }

    /// Total length of the frame on the wire
    pub fn wire_len(&self) -> usize {
        1 + Opcode::from_byte(self.opcode_byte()).map_or(0, Opcode::payload_len)
    }
}

/// A frame together with the exact bytes it was decoded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Decoded frame
    pub frame: Frame,
    /// Opcode and payload as received
    pub bytes: Bytes,
}
