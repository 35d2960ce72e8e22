//! Diagnostic trace of the raw protocol stream
//!
//! The decoder reports every frame it consumes as a hex string and adds free
//! text comments for anything noteworthy, such as bytes it does not
//! understand. [`LogTrace`] forwards to `tracing`; [`RecordingTrace`] keeps
//! the events for later inspection.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

/// Receiver of raw frame traces
pub trait TraceSink {
    /// Called with the hex form of each consumed frame, e.g. `"FF 1E 05"`
    fn on_input(&mut self, hex: &str);

    /// Called with a diagnostic comment
    fn comment(&mut self, text: &str);
}

/// Trace sink logging through `tracing` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn on_input(&mut self, hex: &str) {
        debug!(target: "coxwire::trace", input = hex);
    }

    fn comment(&mut self, text: &str) {
        debug!(target: "coxwire::trace", "# {}", text);
    }
}

/// Single entry of a recorded trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// Hex form of a consumed frame
    Input(String),
    /// Diagnostic comment
    Comment(String),
}

/// Trace sink that remembers everything it is given
///
/// Clones share one event list.
#[derive(Debug, Clone, Default)]
pub struct RecordingTrace {
    events: Arc<Mutex<Vec<TraceEvent>>>,
}

impl RecordingTrace {
    /// Creates an empty recording
    pub fn new() -> Self {
        RecordingTrace::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TraceEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All events in the order they were received
    pub fn events(&self) -> Vec<TraceEvent> {
        self.lock().clone()
    }

    /// Only the frame inputs
    pub fn inputs(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                TraceEvent::Input(hex) => Some(hex.clone()),
                TraceEvent::Comment(_) => None,
            })
            .collect()
    }

    /// Only the comments
    pub fn comments(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                TraceEvent::Comment(text) => Some(text.clone()),
                TraceEvent::Input(_) => None,
            })
            .collect()
    }

    /// Forgets all recorded events
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl TraceSink for RecordingTrace {
    fn on_input(&mut self, hex: &str) {
        self.lock().push(TraceEvent::Input(hex.to_string()));
    }

    fn comment(&mut self, text: &str) {
        self.lock().push(TraceEvent::Comment(text.to_string()));
    }
}

impl<T: TraceSink + ?Sized> TraceSink for Box<T> {
    fn on_input(&mut self, hex: &str) {
        (**self).on_input(hex)
    }

    fn comment(&mut self, text: &str) {
        (**self).comment(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_keeps_order() {
        let recording = RecordingTrace::new();
        let mut sink = recording.clone();

        sink.comment("protocol 3");
        sink.on_input("AA");
        sink.comment("unrecognized");

        assert_eq!(
            recording.events(),
            vec![
                TraceEvent::Comment("protocol 3".to_string()),
                TraceEvent::Input("AA".to_string()),
                TraceEvent::Comment("unrecognized".to_string()),
            ]
        );
        assert_eq!(recording.inputs(), vec!["AA".to_string()]);
        assert_eq!(recording.comments().len(), 2);

        recording.clear();
        assert!(recording.events().is_empty());
    }
}
