//! Core types for the wired rower protocol
//!
//! This module contains the measurement record, configuration and error
//! types shared by the rest of the library.

use std::time::Duration;

pub mod error;
pub mod serde;
pub mod types;

pub use self::error::{Error, Result};
pub use self::types::{DecoderConfig, Measurement, MeasurementUpdate};

/// Protocol version spoken by the wired rower
pub const PROTOCOL_VERSION: u8 = 3;

/// Default minimum spacing between decode passes
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(50);

/// Largest throttle a configuration may ask for
pub const MAX_THROTTLE: Duration = Duration::from_secs(10);
