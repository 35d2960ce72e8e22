//! Protocol implementation module
//!
//! This module defines the frames of the wired rower protocol, their codec,
//! and the stateful decoder turning a byte stream into measurements.
//!
//! Every frame is one opcode byte followed by a payload whose length depends
//! on the opcode alone:
//!
//! | Opcode | Payload | Meaning |
//! |--------|---------|---------|
//! | `0xFB` | 1 | heart rate |
//! | `0xFC` | 0 | stroke finished, recovery begins |
//! | `0xFD` | 2 | pull begins (battery voltage, unused) |
//! | `0xFE` | 1 | distance increment in decimeters |
//! | `0xFF` | 2 | stroke rate, speed in decimeters per second |

pub mod codec;
pub mod cursor;
pub mod decoder;
pub mod frame;
pub mod session;

pub use self::codec::FrameCodec;
pub use self::cursor::ByteCursor;
pub use self::decoder::{ProtocolDecoder, TransferOutcome, TransferReport};
pub use self::frame::{Frame, Opcode, RawFrame};
pub use self::session::SessionState;
