use std::time::{Duration, Instant};

use crate::util::whole_secs;

/// Decimeters per meter
const SUBUNITS_PER_METER: u32 = 10;

/// Session accumulators and throttle bookkeeping owned by the decoder
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Instant the current session started
    start: Instant,
    /// Distance since session start in decimeters
    distance_subunits: u32,
    /// Instant of the last decode pass that was not throttled
    last_decode: Option<Instant>,
    /// Minimum spacing between decode passes
    throttle: Duration,
}

impl SessionState {
    /// Starts a session at `now`
    pub fn new(now: Instant, throttle: Duration) -> Self {
        SessionState {
            start: now,
            distance_subunits: 0,
            last_decode: None,
            throttle,
        }
    }

    /// Begins a new session at `now`
    ///
    /// Throttle bookkeeping is left alone, it concerns the link rather than
    /// the session.
    pub fn reset(&mut self, now: Instant) {
        self.start = now;
        self.distance_subunits = 0;
    }

    /// Decides whether a decode pass may run at `now`
    ///
    /// Only a pass that is let through records its time.
    pub fn begin_pass(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_decode {
            if now.saturating_duration_since(last) < self.throttle {
                return false;
            }
        }
        self.last_decode = Some(now);
        true
    }

    /// Adds a distance increment and returns the total in whole meters
    pub fn add_distance(&mut self, subunits: u8) -> u32 {
        self.distance_subunits = self.distance_subunits.saturating_add(u32::from(subunits));
        self.distance_meters()
    }

    /// Distance since session start in whole meters
    pub fn distance_meters(&self) -> u32 {
        self.distance_subunits / SUBUNITS_PER_METER
    }

    /// Distance since session start in decimeters
    pub fn distance_subunits(&self) -> u32 {
        self.distance_subunits
    }

    /// Whole seconds between session start and `now`
    pub fn duration_secs(&self, now: Instant) -> u32 {
        whole_secs(now.saturating_duration_since(self.start))
    }

    /// Instant the current session started
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Instant of the last decode pass
    pub fn last_decode(&self) -> Option<Instant> {
        self.last_decode
    }

    /// Minimum spacing between decode passes
    pub fn throttle(&self) -> Duration {
        self.throttle
    }

    /// Changes the throttle; the next pass is checked against the new value
    pub fn set_throttle(&mut self, throttle: Duration) {
        self.throttle = throttle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_window() {
        let t0 = Instant::now();
        let mut session = SessionState::new(t0, Duration::from_millis(50));

        // The first pass always runs
        assert!(session.begin_pass(t0));
        assert!(!session.begin_pass(t0 + Duration::from_millis(49)));
        // A throttled pass does not move the window
        assert_eq!(session.last_decode(), Some(t0));
        assert!(session.begin_pass(t0 + Duration::from_millis(50)));
        assert_eq!(session.last_decode(), Some(t0 + Duration::from_millis(50)));
    }

    #[test]
    fn test_zero_throttle_never_blocks() {
        let t0 = Instant::now();
        let mut session = SessionState::new(t0, Duration::ZERO);
        assert!(session.begin_pass(t0));
        assert!(session.begin_pass(t0));
    }

    #[test]
    fn test_distance_truncates_to_meters() {
        let mut session = SessionState::new(Instant::now(), Duration::ZERO);
        assert_eq!(session.add_distance(5), 0);
        assert_eq!(session.add_distance(5), 1);
        assert_eq!(session.add_distance(255), 26);
        assert_eq!(session.distance_subunits(), 265);
    }

    #[test]
    fn test_reset_starts_new_session() {
        let t0 = Instant::now();
        let mut session = SessionState::new(t0, Duration::from_millis(50));
        session.add_distance(120);
        assert!(session.begin_pass(t0));

        let t1 = t0 + Duration::from_millis(3_500);
        assert_eq!(session.duration_secs(t1), 3);

        session.reset(t1);
        assert_eq!(session.distance_subunits(), 0);
        assert_eq!(session.duration_secs(t1), 0);
        assert_eq!(session.start(), t1);
        assert_eq!(session.last_decode(), Some(t0));
    }
}
