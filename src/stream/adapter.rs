//! [`Stream`] adapter for `std::io` transports (files, sockets, cursors).

use std::io::{ErrorKind, Read, Write};

use crate::{stream::Stream, Result};

/// Wraps any `Read + Write` transport as a [`Stream`].
///
/// Interrupted system calls are retried; every other I/O error is surfaced as
/// [`crate::Error::FileError`].
///
/// # Examples
///
/// ```rust
/// use attrsettings::{Endian, IoStream, StreamExt};
/// use std::io::Cursor;
///
/// let mut stream = IoStream::new(Cursor::new(Vec::new()));
/// stream.write_value(1u16, Endian::Big)?;
/// assert_eq!(stream.into_inner().into_inner(), vec![0, 1]);
/// # Ok::<(), attrsettings::Error>(())
/// ```
#[derive(Debug)]
pub struct IoStream<T> {
    inner: T,
}

impl<T> IoStream<T> {
    /// Wrap a transport
    pub fn new(inner: T) -> Self {
        IoStream { inner }
    }

    /// Access the wrapped transport
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably access the wrapped transport
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap the transport
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + Write> Stream for IoStream<T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.inner.read(buf) {
                Ok(count) => return Ok(count),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        loop {
            match self.inner.write(data) {
                Ok(count) => return Ok(count),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Endian, StreamExt};
    use std::io::Cursor;

    #[test]
    fn cursor_roundtrip() -> Result<()> {
        let mut stream = IoStream::new(Cursor::new(Vec::new()));
        stream.write_prefixed_string("blend", Endian::Big)?;
        stream.write_value(0.25f32, Endian::Big)?;

        stream.get_mut().set_position(0);
        assert_eq!(stream.read_prefixed_string(Endian::Big, 16)?, "blend");
        assert_eq!(stream.read_value::<f32>(Endian::Big)?, 0.25);
        assert!(stream.read_value::<u8>(Endian::Big).is_err());
        Ok(())
    }

    #[test]
    fn fixed_buffer_short_write() {
        let mut backing = [0u8; 3];
        let mut stream = IoStream::new(Cursor::new(&mut backing[..]));
        assert!(stream.write_value(1u32, Endian::Little).is_err());
    }
}
