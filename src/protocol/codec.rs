use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::core::Error;
use super::cursor::ByteCursor;
use super::frame::{Frame, Opcode, RawFrame};

/// Codec for the opcode-framed rower protocol
///
/// Decoding leaves the buffer untouched until a whole frame is present, so
/// a frame split across two reads is picked up once the rest arrives.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec;

impl FrameCodec {
    /// Creates a new frame codec
    pub fn new() -> Self {
        FrameCodec
    }
}

impl Decoder for FrameCodec {
    type Item = RawFrame;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let mut cursor = ByteCursor::new(&src[..]);

        let opcode = match cursor.next() {
            Some(byte) => byte,
            // Nothing buffered
            None => return Ok(None),
        };

        let frame = match Opcode::from_byte(opcode) {
            Some(op) => {
                let mut payload = [0u8; 2];
                for slot in payload.iter_mut().take(op.payload_len()) {
                    match cursor.next() {
                        Some(byte) => *slot = byte,
                        // Need more data to complete the payload
                        None => return Ok(None),
                    }
                }
                op.frame(payload)
            }
            None => Frame::Unrecognized(opcode),
        };

        let len = cursor.consumed().len();
        let bytes = src.split_to(len).freeze();

        Ok(Some(RawFrame { frame, bytes }))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = Error;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if let Frame::Unrecognized(byte) = item {
            if Opcode::from_byte(byte).is_some() {
                return Err(Error::protocol(format!(
                    "Byte {:#04X} is a known opcode and cannot be sent as unrecognized",
                    byte
                )));
            }
        }

        dst.reserve(item.wire_len());
        dst.put_u8(item.opcode_byte());

        match item {
            Frame::Pulse(value) | Frame::Distance(value) => dst.put_u8(value),
            Frame::Pull { voltage } => dst.put_slice(&voltage),
            Frame::StrokeRate { rate, speed } => {
                dst.put_u8(rate);
                dst.put_u8(speed);
            }
            Frame::Stroke | Frame::Unrecognized(_) => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(codec: &mut FrameCodec, buffer: &mut BytesMut) -> Vec<Frame> {
        let mut frames = Vec::new();
        while let Some(raw) = codec.decode(buffer).unwrap() {
            frames.push(raw.frame);
        }
        frames
    }

    #[test]
    fn test_decode_stroke_rate() {
        let mut codec = FrameCodec::new();
        let mut buffer = BytesMut::from(&[0xFF, 0x1E, 0x05][..]);

        let raw = codec.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(raw.frame, Frame::StrokeRate { rate: 30, speed: 5 });
        assert_eq!(&raw.bytes[..], &[0xFF, 0x1E, 0x05]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_incomplete_frame_is_retained() {
        let mut codec = FrameCodec::new();
        let mut buffer = BytesMut::from(&[0xFC, 0xFD, 0x01][..]);

        let frames = decode_all(&mut codec, &mut buffer);
        assert_eq!(frames, vec![Frame::Stroke]);
        assert_eq!(&buffer[..], &[0xFD, 0x01]);

        // The rest of the pull frame arrives later
        buffer.extend_from_slice(&[0x02]);
        let raw = codec.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(raw.frame, Frame::Pull { voltage: [0x01, 0x02] });
        assert_eq!(&raw.bytes[..], &[0xFD, 0x01, 0x02]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_unrecognized_byte_is_single_frame() {
        let mut codec = FrameCodec::new();
        let mut buffer = BytesMut::from(&[0xAA, 0xFB, 0x50][..]);

        let frames = decode_all(&mut codec, &mut buffer);
        assert_eq!(frames, vec![Frame::Unrecognized(0xAA), Frame::Pulse(0x50)]);
    }

    #[test]
    fn test_decode_never_fails() {
        let mut codec = FrameCodec::new();
        for byte in 0..=u8::MAX {
            let mut buffer = BytesMut::from(&[byte][..]);
            let decoded = codec.decode(&mut buffer);
            assert!(decoded.is_ok(), "byte {:#04X} failed to decode", byte);

            // Lone opcodes with a payload stay buffered
            let expected_left = match Opcode::from_byte(byte) {
                Some(op) if op.payload_len() > 0 => 1,
                _ => 0,
            };
            assert_eq!(buffer.len(), expected_left);
        }
    }

    #[test]
    fn test_encode_sequence() {
        let mut codec = FrameCodec::new();
        let mut bytes = BytesMut::new();

        codec.encode(Frame::Pulse(72), &mut bytes).unwrap();
        codec.encode(Frame::Stroke, &mut bytes).unwrap();
        codec.encode(Frame::Pull { voltage: [0x0C, 0x80] }, &mut bytes).unwrap();
        codec.encode(Frame::Distance(25), &mut bytes).unwrap();
        codec.encode(Frame::StrokeRate { rate: 28, speed: 40 }, &mut bytes).unwrap();

        assert_eq!(
            &bytes[..],
            &[0xFB, 72, 0xFC, 0xFD, 0x0C, 0x80, 0xFE, 25, 0xFF, 28, 40]
        );
    }

    #[test]
    fn test_encode_rejects_opcode_as_unrecognized() {
        let mut codec = FrameCodec::new();
        let mut bytes = BytesMut::new();

        assert!(codec.encode(Frame::Unrecognized(0xFC), &mut bytes).is_err());
        assert!(codec.encode(Frame::Unrecognized(0x10), &mut bytes).is_ok());
        assert_eq!(&bytes[..], &[0x10]);
    }
}
