//! Byte-oriented stream abstraction used by the binary attribute codec.
//!
//! A [`Stream`] only moves raw bytes and may report short transfers. The [`StreamExt`]
//! extension, available on every stream including `dyn Stream`, layers the strict,
//! endian-aware field helpers on top: a short transfer of any field is turned into
//! [`crate::Error::TruncatedStream`].
//!
//! # Key Components
//!
//! - [`Stream`] - The transport trait (read / write byte counts)
//! - [`StreamExt`] - Exact transfers, primitive values, length-prefixed strings
//! - [`MemoryStream`] - Growable in-memory cursor
//! - [`IoStream`] - Adapter over any `std::io::Read + Write` transport
//!
//! # Examples
//!
//! ```rust
//! use attrsettings::{Endian, MemoryStream, StreamExt};
//!
//! let mut stream = MemoryStream::new();
//! stream.write_value(7u32, Endian::Big)?;
//! stream.write_prefixed_string("speed", Endian::Big)?;
//!
//! stream.seek(0)?;
//! assert_eq!(stream.read_value::<u32>(Endian::Big)?, 7);
//! assert_eq!(stream.read_prefixed_string(Endian::Big, 64)?, "speed");
//! # Ok::<(), attrsettings::Error>(())
//! ```

mod adapter;
mod io;
mod memory;

pub use adapter::IoStream;
pub use io::{read_at, write_at, Endian, StreamIO};
pub use memory::MemoryStream;

use crate::{Error::TruncatedStream, Result};

/// A byte transport.
///
/// Implementations transfer as many bytes as they can and report the count; returning fewer
/// bytes than requested (including zero) is not an error at this layer.
pub trait Stream {
    /// Read up to `buf.len()` bytes into `buf`, returning the number of bytes read.
    ///
    /// # Errors
    /// Returns an error if the underlying transport fails.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write up to `data.len()` bytes from `data`, returning the number of bytes written.
    ///
    /// # Errors
    /// Returns an error if the underlying transport fails.
    fn write(&mut self, data: &[u8]) -> Result<usize>;
}

/// Strict, endian-aware field access on top of any [`Stream`].
pub trait StreamExt: Stream {
    /// Fill `buf` completely.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedStream`] if the stream ends early.
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let read = self.read(&mut buf[filled..])?;
            if read == 0 {
                return Err(TruncatedStream {
                    expected: buf.len(),
                    actual: filled,
                });
            }
            filled += read;
        }
        Ok(())
    }

    /// Write all of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedStream`] if the stream stops accepting bytes.
    fn write_all_bytes(&mut self, data: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < data.len() {
            let count = self.write(&data[written..])?;
            if count == 0 {
                return Err(TruncatedStream {
                    expected: data.len(),
                    actual: written,
                });
            }
            written += count;
        }
        Ok(())
    }

    /// Read a primitive value in the given byte order.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedStream`] on a short read.
    fn read_value<T: StreamIO>(&mut self, endian: Endian) -> Result<T> {
        let mut buf = [0u8; 8];
        let len = std::mem::size_of::<T>();
        self.read_exact_bytes(&mut buf[..len])?;

        let mut offset = 0;
        read_at(&buf[..len], &mut offset, endian)
    }

    /// Write a primitive value in the given byte order.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedStream`] on a short write.
    fn write_value<T: StreamIO>(&mut self, value: T, endian: Endian) -> Result<()> {
        let bytes = value.to_bytes(endian);
        self.write_all_bytes(bytes.as_ref())
    }

    /// Read a `u32` length prefixed UTF-8 string.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedStream`] on a short read, or [`crate::Error::Malformed`]
    /// if the length exceeds `max_len` or the bytes are not valid UTF-8.
    fn read_prefixed_string(&mut self, endian: Endian, max_len: u32) -> Result<String> {
        let len = self.read_value::<u32>(endian)?;
        if len > max_len {
            return Err(malformed_error!(
                "String length {} exceeds the limit of {}",
                len,
                max_len
            ));
        }
        if len == 0 {
            return Ok(String::new());
        }

        let mut bytes = vec![0u8; len as usize];
        self.read_exact_bytes(&mut bytes)?;
        String::from_utf8(bytes).map_err(|e| malformed_error!("Invalid UTF-8 string - {}", e))
    }

    /// Write a `u32` length prefixed UTF-8 string.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedStream`] on a short write, or [`crate::Error::Malformed`]
    /// if the string is longer than `u32::MAX` bytes.
    fn write_prefixed_string(&mut self, value: &str, endian: Endian) -> Result<()> {
        let len = u32::try_from(value.len())
            .map_err(|_| malformed_error!("String of {} bytes is too long", value.len()))?;
        self.write_value(len, endian)?;
        if len > 0 {
            self.write_all_bytes(value.as_bytes())?;
        }
        Ok(())
    }
}

impl<S: Stream + ?Sized> StreamExt for S {}

/// Serialized size of a `u32` length prefixed string.
#[must_use]
pub fn prefixed_string_size(value: &str) -> usize {
    std::mem::size_of::<u32>() + value.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn exact_read_reports_truncation() {
        let mut stream = MemoryStream::from_bytes(vec![1, 2, 3]);
        let mut buf = [0u8; 4];
        let result = stream.read_exact_bytes(&mut buf);
        assert!(matches!(
            result,
            Err(Error::TruncatedStream {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn values_through_dyn_stream() -> Result<()> {
        let mut memory = MemoryStream::new();
        {
            let stream: &mut dyn Stream = &mut memory;
            stream.write_value(0x0102u16, Endian::Big)?;
            stream.write_value(-3i32, Endian::Little)?;
            stream.write_value(2.5f64, Endian::Big)?;
        }
        assert_eq!(&memory.as_bytes()[..2], &[0x01, 0x02]);

        memory.seek(0)?;
        let stream: &mut dyn Stream = &mut memory;
        assert_eq!(stream.read_value::<u16>(Endian::Big)?, 0x0102);
        assert_eq!(stream.read_value::<i32>(Endian::Little)?, -3);
        assert_eq!(stream.read_value::<f64>(Endian::Big)?, 2.5);
        Ok(())
    }

    #[test]
    fn prefixed_strings() -> Result<()> {
        let mut stream = MemoryStream::new();
        stream.write_prefixed_string("", Endian::Little)?;
        stream.write_prefixed_string("héllo", Endian::Little)?;
        assert_eq!(stream.len(), 4 + prefixed_string_size("héllo"));

        stream.seek(0)?;
        assert_eq!(stream.read_prefixed_string(Endian::Little, 64)?, "");
        assert_eq!(stream.read_prefixed_string(Endian::Little, 64)?, "héllo");
        Ok(())
    }

    #[test]
    fn prefixed_string_limits() -> Result<()> {
        let mut stream = MemoryStream::new();
        stream.write_prefixed_string("too long", Endian::Big)?;
        stream.seek(0)?;
        assert!(matches!(
            stream.read_prefixed_string(Endian::Big, 4),
            Err(Error::Malformed { .. })
        ));

        let mut stream = MemoryStream::from_bytes(vec![2, 0, 0, 0, 0xC3, 0x28]);
        assert!(matches!(
            stream.read_prefixed_string(Endian::Little, 64),
            Err(Error::Malformed { .. })
        ));

        let mut stream = MemoryStream::from_bytes(vec![5, 0, 0, 0, b'a', b'b']);
        assert!(matches!(
            stream.read_prefixed_string(Endian::Little, 64),
            Err(Error::TruncatedStream {
                expected: 5,
                actual: 2
            })
        ));
        Ok(())
    }

    #[test]
    fn short_write_fails() {
        let mut stream = MemoryStream::with_limit(6);
        assert!(stream.write_value(1u32, Endian::Little).is_ok());
        let result = stream.write_value(1u32, Endian::Little);
        assert!(matches!(
            result,
            Err(Error::TruncatedStream {
                expected: 4,
                actual: 2
            })
        ));
    }
}
