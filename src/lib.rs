//! coxwire: decoder for the wired rowing machine serial protocol
//!
//! The rower streams single-byte opcodes with short payloads over a 1200 baud
//! serial line. This library buffers that stream, decodes complete frames and
//! keeps a caller-owned [`Measurement`] up to date with pulse, strokes, stroke
//! rate, speed, distance and session duration.
//!
//! ```no_run
//! use coxwire::{DecoderConfig, Measurement, ProtocolDecoder};
//! use coxwire::phase::NoopPhaseTracker;
//! use coxwire::trace::LogTrace;
//! use coxwire::transport::SerialSource;
//!
//! let config = DecoderConfig::default();
//! let source = SerialSource::open(&config.device).unwrap();
//! let mut decoder = ProtocolDecoder::new(source, LogTrace, NoopPhaseTracker, &config);
//! decoder.reset();
//!
//! let mut measurement = Measurement::default();
//! loop {
//!     decoder.transfer(&mut measurement);
//!     std::thread::sleep(std::time::Duration::from_millis(20));
//! }
//! ```

pub mod core;
pub mod phase;
pub mod protocol;
pub mod time;
pub mod trace;
pub mod transport;
mod util;

// Re-export commonly used items
pub use crate::core::{DecoderConfig, Error, Measurement, MeasurementUpdate, Result};
pub use crate::protocol::{ProtocolDecoder, TransferOutcome, TransferReport};
pub use crate::util::hex_string;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
