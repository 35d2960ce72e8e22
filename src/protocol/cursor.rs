/// Non-destructive cursor over buffered bytes
///
/// Reading through the cursor never removes anything from the underlying
/// buffer; the caller decides how much to discard once a frame is known to
/// be complete. `consumed` returns the bytes read since the previous call,
/// which is what gets traced for a frame.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    /// Bytes currently buffered
    bytes: &'a [u8],
    /// Index of the next byte to read
    position: usize,
    /// Index `consumed` was last taken at
    checkpoint: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor at the start of `bytes`
    pub fn new(bytes: &'a [u8]) -> Self {
        ByteCursor {
            bytes,
            position: 0,
            checkpoint: 0,
        }
    }

    /// Returns whether another byte is already buffered
    pub fn has_next(&self) -> bool {
        self.position < self.bytes.len()
    }

    /// Bytes read since the last checkpoint; moves the checkpoint forward
    pub fn consumed(&mut self) -> &'a [u8] {
        let consumed = &self.bytes[self.checkpoint..self.position];
        self.checkpoint = self.position;
        consumed
    }

    /// Number of bytes read so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes still unread
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }
}

impl Iterator for ByteCursor<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.position)?;
        self.position += 1;
        Some(byte)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}
