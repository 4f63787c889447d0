//! In-memory [`Stream`] implementation.

use crate::{stream::Stream, Result};

/// A growable in-memory byte stream with a read/write cursor.
///
/// Writes overwrite bytes at the cursor and extend the buffer when they run past its end.
/// An optional size limit makes writes beyond it short, which is how callers (and tests)
/// model a full transport.
///
/// # Examples
///
/// ```rust
/// use attrsettings::{MemoryStream, Stream};
///
/// let mut stream = MemoryStream::with_limit(3);
/// assert_eq!(stream.write(&[1, 2, 3, 4])?, 3);
/// assert_eq!(stream.as_bytes(), &[1, 2, 3]);
/// # Ok::<(), attrsettings::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    data: Vec<u8>,
    position: usize,
    limit: Option<usize>,
}

impl MemoryStream {
    /// Create an empty stream
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stream with preallocated capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        MemoryStream {
            data: Vec::with_capacity(capacity),
            position: 0,
            limit: None,
        }
    }

    /// Create an empty stream that accepts at most `limit` bytes in total
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        MemoryStream {
            data: Vec::new(),
            position: 0,
            limit: Some(limit),
        }
    }

    /// Create a stream positioned at the start of `data`
    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Self {
        MemoryStream {
            data,
            position: 0,
            limit: None,
        }
    }

    /// Move the cursor to `position`.
    ///
    /// # Errors
    /// Returns [`crate::Error::IndexOutOfRange`] if `position` is past the end of the data.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(crate::Error::IndexOutOfRange {
                index: position,
                len: self.data.len(),
            });
        }

        self.position = position;
        Ok(())
    }

    /// Current cursor position
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes between the cursor and the end of the data
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Total number of bytes held
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the stream holds no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All bytes held by the stream, independent of the cursor
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the stream and return its bytes
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl Stream for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let count = buf.len().min(self.remaining());
        buf[..count].copy_from_slice(&self.data[self.position..self.position + count]);
        self.position += count;
        Ok(count)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let count = match self.limit {
            Some(limit) => data.len().min(limit.saturating_sub(self.position)),
            None => data.len(),
        };

        let end = self.position + count;
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.position..end].copy_from_slice(&data[..count]);
        self.position = end;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_partial() -> Result<()> {
        let mut stream = MemoryStream::from_bytes(vec![1, 2, 3]);
        let mut buf = [0u8; 2];
        assert_eq!(stream.read(&mut buf)?, 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(stream.read(&mut buf)?, 1);
        assert_eq!(buf[0], 3);
        assert_eq!(stream.read(&mut buf)?, 0);
        Ok(())
    }

    #[test]
    fn write_overwrites_and_extends() -> Result<()> {
        let mut stream = MemoryStream::from_bytes(vec![9, 9, 9]);
        stream.seek(2)?;
        assert_eq!(stream.write(&[1, 2])?, 2);
        assert_eq!(stream.as_bytes(), &[9, 9, 1, 2]);
        assert_eq!(stream.position(), 4);
        assert_eq!(stream.remaining(), 0);
        Ok(())
    }

    #[test]
    fn seek_bounds() {
        let mut stream = MemoryStream::from_bytes(vec![0; 4]);
        assert!(stream.seek(4).is_ok());
        assert!(stream.seek(5).is_err());
    }

    #[test]
    fn limit_shortens_writes() -> Result<()> {
        let mut stream = MemoryStream::with_limit(2);
        assert_eq!(stream.write(&[1])?, 1);
        assert_eq!(stream.write(&[2, 3])?, 1);
        assert_eq!(stream.write(&[4])?, 0);
        assert_eq!(stream.into_inner(), vec![1, 2]);
        Ok(())
    }
}
