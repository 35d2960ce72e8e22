use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Snapshot of the rower's performance values
///
/// Owned by the caller and updated in place by the decoder. Fields the
/// protocol does not carry are never written by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Heart rate in beats per minute, as sent by the device
    pub pulse: u8,
    /// Strokes since session start
    pub strokes: u32,
    /// Strokes per minute
    pub stroke_rate: u8,
    /// Speed in centimeters per second
    pub speed: u16,
    /// Distance since session start in whole meters
    pub distance: u32,
    /// Seconds since session start
    pub duration: u32,
    /// Drive to recovery ratio, maintained by the phase tracker
    pub stroke_ratio: u8,
}

/// Field changes collected during one decode pass
///
/// `None` leaves the corresponding measurement field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementUpdate {
    /// Latest pulse reading
    pub pulse: Option<u8>,
    /// Number of stroke boundaries seen
    pub strokes_added: u32,
    /// Latest stroke rate
    pub stroke_rate: Option<u8>,
    /// Latest speed
    pub speed: Option<u16>,
    /// Latest cumulative distance in meters
    pub distance: Option<u32>,
}

impl MeasurementUpdate {
    /// Returns whether applying this update would change nothing
    pub fn is_empty(&self) -> bool {
        *self == MeasurementUpdate::default()
    }

    /// Folds a later update into this one
    ///
    /// Values present in `later` win; stroke counts add up.
    pub fn merge(&mut self, later: &MeasurementUpdate) {
        self.pulse = later.pulse.or(self.pulse);
        self.strokes_added = self.strokes_added.saturating_add(later.strokes_added);
        self.stroke_rate = later.stroke_rate.or(self.stroke_rate);
        self.speed = later.speed.or(self.speed);
        self.distance = later.distance.or(self.distance);
    }

    /// Writes the collected changes into a measurement
    pub fn apply_to(&self, measurement: &mut Measurement) {
        if let Some(pulse) = self.pulse {
            measurement.pulse = pulse;
        }
        measurement.strokes = measurement.strokes.saturating_add(self.strokes_added);
        if let Some(stroke_rate) = self.stroke_rate {
            measurement.stroke_rate = stroke_rate;
        }
        if let Some(speed) = self.speed {
            measurement.speed = speed;
        }
        if let Some(distance) = self.distance {
            measurement.distance = distance;
        }
    }
}

/// Configuration for the decoder and its serial line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Serial device the rower is attached to
    pub device: String,
    /// Minimum spacing between decode passes
    #[serde(serialize_with = "super::serde::serialize_millis")]
    #[serde(deserialize_with = "super::serde::deserialize_millis")]
    pub throttle: Duration,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            device: "/dev/ttyUSB0".to_string(),
            throttle: super::DEFAULT_THROTTLE,
        }
    }
}

impl DecoderConfig {
    /// Checks that the configuration is usable
    ///
    /// A zero throttle is accepted and disables rate limiting.
    pub fn validate(&self) -> Result<()> {
        if self.device.trim().is_empty() {
            return Err(Error::config("Serial device path is empty"));
        }

        if self.throttle > super::MAX_THROTTLE {
            return Err(Error::config(format!(
                "Throttle of {}ms exceeds maximum of {}ms",
                self.throttle.as_millis(),
                super::MAX_THROTTLE.as_millis()
            )));
        }

        Ok(())
    }
}
