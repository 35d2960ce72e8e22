//! Stroke phase notifications
//!
//! The rower signals when the recovery of a stroke begins and when the next
//! pull begins. A [`StrokePhaseTracker`] turns those instants into cadence
//! figures such as [`Measurement::stroke_ratio`].

use std::time::Instant;

use crate::core::Measurement;

/// Phase of a rowing stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Handle travels back towards the flywheel
    Recovery,
    /// Handle is pulled
    Pull,
}

/// Consumer of stroke phase transitions
pub trait StrokePhaseTracker {
    /// Forgets all timing state; a session starts at `at`
    fn clear(&mut self, at: Instant);

    /// The recovery phase began at `at`
    fn on_recovery_begin(&mut self, measurement: &mut Measurement, at: Instant);

    /// The pull phase began at `at`
    fn on_pull_begin(&mut self, measurement: &mut Measurement, at: Instant);

    /// Dispatches a phase transition to the matching callback
    fn on_phase(&mut self, phase: Phase, measurement: &mut Measurement, at: Instant) {
        match phase {
            Phase::Recovery => self.on_recovery_begin(measurement, at),
            Phase::Pull => self.on_pull_begin(measurement, at),
        }
    }
}

/// Tracker that ignores all transitions
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPhaseTracker;

impl StrokePhaseTracker for NoopPhaseTracker {
    fn clear(&mut self, _at: Instant) {}

    fn on_recovery_begin(&mut self, _measurement: &mut Measurement, _at: Instant) {}

    fn on_pull_begin(&mut self, _measurement: &mut Measurement, _at: Instant) {}
}

impl<P: StrokePhaseTracker + ?Sized> StrokePhaseTracker for Box<P> {
    fn clear(&mut self, at: Instant) {
        (**self).clear(at)
    }

    fn on_recovery_begin(&mut self, measurement: &mut Measurement, at: Instant) {
        (**self).on_recovery_begin(measurement, at)
    }

    fn on_pull_begin(&mut self, measurement: &mut Measurement, at: Instant) {
        (**self).on_pull_begin(measurement, at)
    }
}
