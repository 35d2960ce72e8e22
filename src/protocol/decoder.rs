use std::time::{Duration, Instant};

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{debug, info, trace, warn};

use crate::core::{DecoderConfig, Measurement, MeasurementUpdate, PROTOCOL_VERSION};
use crate::phase::{Phase, StrokePhaseTracker};
use crate::time::{Clock, SystemClock};
use crate::trace::TraceSink;
use crate::transport::{ByteSource, LineSettings};
use crate::util::hex_string;
use super::codec::FrameCodec;
use super::frame::Frame;
use super::session::SessionState;

/// Initial capacity of the receive buffer
const RECV_BUFFER_CAPACITY: usize = 256;

/// Result of a call to [`ProtocolDecoder::transfer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Called again before the throttle interval elapsed; nothing happened
    Throttled,
    /// A decode pass ran
    Decoded(TransferReport),
}

impl TransferOutcome {
    /// Returns whether the call was skipped by the throttle
    pub fn is_throttled(&self) -> bool {
        matches!(self, TransferOutcome::Throttled)
    }
}

/// What a decode pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Frames consumed, unrecognized bytes included
    pub frames: usize,
    /// Bytes that were not a known opcode
    pub unrecognized: usize,
    /// Bytes of an incomplete frame kept for the next pass
    pub pending: usize,
    /// Changes applied to the measurement
    pub update: MeasurementUpdate,
}

/// Decoder for the wired rower's protocol 3
///
/// Owns the receive buffer, the session accumulators and the throttle. The
/// caller polls [`transfer`](Self::transfer) with its measurement; each
/// pass that is not throttled drains the transport and applies every
/// complete frame. An incomplete trailing frame stays buffered and is
/// finished on a later pass.
pub struct ProtocolDecoder<S, T, P, C = SystemClock> {
    /// Transport delivering raw bytes
    source: S,
    /// Receiver of raw frame traces
    trace: T,
    /// Consumer of stroke phase transitions
    tracker: P,
    /// Time source for throttling and duration
    clock: C,
    /// Frame codec
    codec: FrameCodec,
    /// Bytes received but not yet decoded
    buffer: BytesMut,
    /// Session accumulators
    session: SessionState,
}

impl<S, T, P> ProtocolDecoder<S, T, P, SystemClock>
where
    S: ByteSource,
    T: TraceSink,
    P: StrokePhaseTracker,
{
    /// Creates a decoder timed by the system clock
    pub fn new(source: S, trace: T, tracker: P, config: &DecoderConfig) -> Self {
        Self::with_clock(source, trace, tracker, config, SystemClock)
    }
}

impl<S, T, P, C> ProtocolDecoder<S, T, P, C>
where
    S: ByteSource,
    T: TraceSink,
    P: StrokePhaseTracker,
    C: Clock,
{
    /// Creates a decoder timed by `clock`
    ///
    /// Applies the protocol's line settings to the transport. A transport
    /// that refuses them is logged and used as is.
    pub fn with_clock(mut source: S, mut trace: T, tracker: P, config: &DecoderConfig, clock: C) -> Self {
        if let Err(e) = source.configure(&LineSettings::PROTOCOL_3) {
            warn!(error = %e, "failed to configure transport");
        }

        trace.comment(&format!("protocol {}", PROTOCOL_VERSION));

        let session = SessionState::new(clock.now(), config.throttle);

        ProtocolDecoder {
            source,
            trace,
            tracker,
            clock,
            codec: FrameCodec::new(),
            buffer: BytesMut::with_capacity(RECV_BUFFER_CAPACITY),
            session,
        }
    }

    /// Starts a new session
    ///
    /// Zeroes the distance, restarts the duration and clears the phase
    /// tracker. Bytes already received are kept.
    pub fn reset(&mut self) {
        let now = self.clock.now();
        self.session.reset(now);
        self.tracker.clear(now);
        info!("session reset");
    }

    /// Runs one decode pass unless throttled
    ///
    /// On a pass, drains the transport, applies every complete frame to
    /// `measurement` and recomputes its duration. A throttled call reads
    /// nothing and leaves `measurement` untouched.
    pub fn transfer(&mut self, measurement: &mut Measurement) -> TransferOutcome {
        let now = self.clock.now();
        if !self.session.begin_pass(now) {
            return TransferOutcome::Throttled;
        }

        self.fill_buffer();

        let mut report = TransferReport::default();
        // The caller's record is only written once the pass is complete
        let mut working = measurement.clone();

        // FrameCodec::decode only ever returns Ok
        while let Ok(Some(raw)) = self.codec.decode(&mut self.buffer) {
            let mut frame_update = MeasurementUpdate::default();
            let phase = self.decode_frame(raw.frame, &mut frame_update);
            frame_update.apply_to(&mut working);
            report.update.merge(&frame_update);
            report.frames += 1;

            // The tracker sees the measurement as of this frame
            if let Some(phase) = phase {
                self.tracker.on_phase(phase, &mut working, now);
            }

            self.trace.on_input(&hex_string(&raw.bytes));
            if let Frame::Unrecognized(_) = raw.frame {
                report.unrecognized += 1;
                self.trace.comment("unrecognized");
            }
        }

        report.pending = self.buffer.len();
        if report.pending > 0 {
            trace!(pending = report.pending, "incomplete frame kept for next pass");
        }

        working.duration = self.session.duration_secs(now);
        *measurement = working;

        TransferOutcome::Decoded(report)
    }

    /// Applies one frame to the session and records its effect
    ///
    /// Returns the stroke phase the frame starts, if any.
    fn decode_frame(&mut self, frame: Frame, update: &mut MeasurementUpdate) -> Option<Phase> {
        match frame {
            Frame::Pulse(pulse) => update.pulse = Some(pulse),
            Frame::Stroke => {
                update.strokes_added += 1;
                return Some(Phase::Recovery);
            }
            // Battery voltage is not used
            Frame::Pull { .. } => return Some(Phase::Pull),
            Frame::Distance(subunits) => {
                update.distance = Some(self.session.add_distance(subunits));
            }
            Frame::StrokeRate { rate, speed } => {
                update.stroke_rate = Some(rate);
                update.speed = Some(u16::from(speed) * 10);
            }
            Frame::Unrecognized(byte) => debug!(byte, "unrecognized opcode"),
        }
        None
    }

    /// Moves everything the transport has received into the buffer
    fn fill_buffer(&mut self) {
        match self.source.read_available(&mut self.buffer) {
            Ok(0) => {}
            Ok(n) => trace!(bytes = n, "received"),
            Err(e) => warn!(error = %e, "transport read failed"),
        }
    }

    /// Minimum spacing between decode passes
    pub fn throttle(&self) -> Duration {
        self.session.throttle()
    }

    /// Changes the throttle; takes effect on the next call to `transfer`
    pub fn set_throttle(&mut self, throttle: Duration) {
        self.session.set_throttle(throttle);
    }

    /// Instant the current session started
    pub fn session_start(&self) -> Instant {
        self.session.start()
    }

    /// Distance since session start in decimeters
    pub fn distance_subunits(&self) -> u32 {
        self.session.distance_subunits()
    }

    /// Bytes of an incomplete frame waiting for the rest
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// The trace sink
    pub fn trace(&self) -> &T {
        &self.trace
    }

    /// The phase tracker
    pub fn tracker(&self) -> &P {
        &self.tracker
    }

    /// The transport
    pub fn source(&self) -> &S {
        &self.source
    }
}
