use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::BytesMut;

use crate::core::{Error, Result};
use super::{ByteSource, LineSettings};

/// State shared between a source and its feeds
#[derive(Debug, Default)]
struct Shared {
    /// Bytes pushed but not yet read
    pending: BytesMut,
    /// Settings from the last `configure` call
    line: Option<LineSettings>,
    /// Whether reads should fail
    failing: bool,
}

/// Handle for pushing bytes into a [`MemorySource`]
#[derive(Debug, Clone, Default)]
pub struct MemoryFeed {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryFeed {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes bytes available to the next read
    pub fn push(&self, bytes: &[u8]) {
        self.lock().pending.extend_from_slice(bytes);
    }

    /// Number of bytes pushed but not yet read
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Line settings the source was configured with, if any
    pub fn line_settings(&self) -> Option<LineSettings> {
        self.lock().line
    }

    /// Makes subsequent reads fail until switched off again
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }
}

/// In-memory transport for replays and tests
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    feed: MemoryFeed,
}

impl MemorySource {
    /// Creates an empty source
    pub fn new() -> Self {
        MemorySource::default()
    }

    /// Creates a source already holding `bytes`
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let source = MemorySource::new();
        source.feed.push(bytes);
        source
    }

    /// Returns a handle that pushes into this source
    pub fn feed(&self) -> MemoryFeed {
        self.feed.clone()
    }
}

impl ByteSource for MemorySource {
    fn configure(&mut self, line: &LineSettings) -> Result<()> {
        self.feed.lock().line = Some(*line);
        Ok(())
    }

    fn read_available(&mut self, dst: &mut BytesMut) -> Result<usize> {
        let mut shared = self.feed.lock();
        if shared.failing {
            return Err(Error::transport("Memory source is set to fail"));
        }

        let n = shared.pending.len();
        dst.extend_from_slice(&shared.pending.split());
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_and_drain() {
        let mut source = MemorySource::with_bytes(&[0xFC]);
        let feed = source.feed();
        feed.push(&[0xFB, 0x40]);
        assert_eq!(feed.pending(), 3);

        let mut buffer = BytesMut::new();
        assert_eq!(source.read_available(&mut buffer).unwrap(), 3);
        assert_eq!(&buffer[..], &[0xFC, 0xFB, 0x40]);
        assert_eq!(feed.pending(), 0);

        // Nothing left, nothing appended
        assert_eq!(source.read_available(&mut buffer).unwrap(), 0);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_records_line_settings() {
        let mut source = MemorySource::new();
        let feed = source.feed();
        assert_eq!(feed.line_settings(), None);

        source.configure(&LineSettings::PROTOCOL_3).unwrap();
        assert_eq!(feed.line_settings(), Some(LineSettings::PROTOCOL_3));
    }

    #[test]
    fn test_failing_reads_keep_bytes() {
        let mut source = MemorySource::with_bytes(&[0xFC]);
        let feed = source.feed();
        feed.set_failing(true);

        let mut buffer = BytesMut::new();
        assert!(source.read_available(&mut buffer).is_err());
        assert_eq!(feed.pending(), 1);

        feed.set_failing(false);
        assert_eq!(source.read_available(&mut buffer).unwrap(), 1);
    }
}
