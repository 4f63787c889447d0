//! Byte order and safe slice reading/writing for attribute payloads.
//!
//! This module provides the endian-aware primitive codec used by every binary field of the
//! attribute settings format. It implements bounds-checked operations for reading and writing
//! primitive types from/to byte buffers with both little-endian and big-endian support.
//!
//! # Key Components
//!
//! - [`StreamIO`] - Trait defining endian-aware conversion for primitive types
//! - [`Endian`] - Byte order selector passed to every binary operation
//! - [`read_at`] / [`write_at`] - Offset-tracking slice access in a chosen byte order
//!
//! # Supported Types
//! The [`StreamIO`] trait is implemented for:
//! - **Unsigned integers**: `u8`, `u16`, `u32`, `u64`
//! - **Signed integers**: `i8`, `i16`, `i32`, `i64`
//! - **Floating point**: `f32`, `f64`
//!
//! # Examples
//!
//! ```rust
//! use attrsettings::stream::{read_at, write_at, Endian};
//!
//! let mut data = [0u8; 6];
//! let mut offset = 0;
//! write_at(&mut data, &mut offset, 2u16, Endian::Big)?;
//! write_at(&mut data, &mut offset, 1u32, Endian::Little)?;
//! assert_eq!(data, [0x00, 0x02, 0x01, 0x00, 0x00, 0x00]);
//!
//! offset = 0;
//! let first: u16 = read_at(&data, &mut offset, Endian::Big)?;
//! let second: u32 = read_at(&data, &mut offset, Endian::Little)?;
//! assert_eq!((first, second), (2, 1));
//! # Ok::<(), attrsettings::Error>(())
//! ```
//!
//! # Error Handling
//!
//! All functions return [`crate::Result`] and fail with [`crate::Error::TruncatedStream`] if
//! there are insufficient bytes in the buffer to complete the operation.

use strum::{Display, EnumIter};

use crate::{Error::TruncatedStream, Result};

/// Byte order applied to every multi-byte field of a binary payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum Endian {
    /// Least significant byte first
    #[default]
    Little,
    /// Most significant byte first
    Big,
}

impl Endian {
    /// The byte order of the running platform.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }
}

/// Trait for implementing type-specific binary conversion in either byte order.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array required for that particular type (e.g., `[u8; 4]` for `u32`).
pub trait StreamIO: Sized + Copy {
    /// Byte array type holding the encoded form of this numeric type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
    /// Read T from a byte buffer in big-endian
    fn from_be_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
    /// Write T to a byte buffer in big-endian
    fn to_be_bytes(self) -> Self::Bytes;

    /// Decode from `bytes` using the given byte order
    fn from_bytes(bytes: Self::Bytes, endian: Endian) -> Self {
        match endian {
            Endian::Little => Self::from_le_bytes(bytes),
            Endian::Big => Self::from_be_bytes(bytes),
        }
    }

    /// Encode into bytes using the given byte order
    fn to_bytes(self, endian: Endian) -> Self::Bytes {
        match endian {
            Endian::Little => self.to_le_bytes(),
            Endian::Big => self.to_be_bytes(),
        }
    }
}

macro_rules! impl_stream_io {
    ($($ty:ty),* $(,)?) => {
        $(
            impl StreamIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }

                fn to_be_bytes(self) -> Self::Bytes {
                    <$ty>::to_be_bytes(self)
                }
            }
        )*
    };
}

impl_stream_io!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Safely reads a value of type `T` at `offset` in the given byte order.
///
/// The offset is advanced by the number of bytes read.
///
/// # Errors
/// Returns [`crate::Error::TruncatedStream`] if there are insufficient bytes.
pub fn read_at<T: StreamIO>(data: &[u8], offset: &mut usize, endian: Endian) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let available = data.len().saturating_sub(*offset);
    if type_len > available {
        return Err(TruncatedStream {
            expected: type_len,
            actual: available,
        });
    }

    let Ok(read) = data[*offset..*offset + type_len].try_into() else {
        return Err(TruncatedStream {
            expected: type_len,
            actual: available,
        });
    };

    *offset += type_len;

    Ok(T::from_bytes(read, endian))
}

/// Safely writes a value of type `T` at `offset` in the given byte order.
///
/// The offset is advanced by the number of bytes written.
///
/// # Errors
/// Returns [`crate::Error::TruncatedStream`] if the buffer is too small.
pub fn write_at<T: StreamIO>(
    data: &mut [u8],
    offset: &mut usize,
    value: T,
    endian: Endian,
) -> Result<()> {
    let type_len = std::mem::size_of::<T>();
    let available = data.len().saturating_sub(*offset);
    if type_len > available {
        return Err(TruncatedStream {
            expected: type_len,
            actual: available,
        });
    }

    let bytes = value.to_bytes(endian);
    data[*offset..*offset + type_len].copy_from_slice(bytes.as_ref());
    *offset += type_len;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_le_u16() {
        let mut offset = 0;
        let result: u16 = read_at(&TEST_BUFFER, &mut offset, Endian::Little).unwrap();
        assert_eq!(result, 0x0201);
        assert_eq!(offset, 2);
    }

    #[test]
    fn read_be_u32() {
        let mut offset = 0;
        let result: u32 = read_at(&TEST_BUFFER, &mut offset, Endian::Big).unwrap();
        assert_eq!(result, 0x01020304);
    }

    #[test]
    fn read_le_u64() {
        let mut offset = 0;
        let result: u64 = read_at(&TEST_BUFFER, &mut offset, Endian::Little).unwrap();
        assert_eq!(result, 0x0807060504030201);
    }

    #[test]
    fn read_be_i16() {
        let mut offset = 0;
        let result: i16 = read_at(&[0xFF, 0xFE], &mut offset, Endian::Big).unwrap();
        assert_eq!(result, -2);
    }

    #[test]
    fn read_le_f32() {
        let mut offset = 0;
        let result: f32 = read_at(&1.5f32.to_le_bytes(), &mut offset, Endian::Little).unwrap();
        assert_eq!(result, 1.5);
    }

    #[test]
    fn read_sequential() {
        let mut offset = 0;
        let first: u8 = read_at(&TEST_BUFFER, &mut offset, Endian::Big).unwrap();
        let second: u16 = read_at(&TEST_BUFFER, &mut offset, Endian::Big).unwrap();
        let third: u32 = read_at(&TEST_BUFFER, &mut offset, Endian::Little).unwrap();
        assert_eq!(first, 0x01);
        assert_eq!(second, 0x0203);
        assert_eq!(third, 0x07060504);
        assert_eq!(offset, 7);
    }

    #[test]
    fn write_both_orders() {
        let mut data = [0u8; 8];
        let mut offset = 0;
        write_at(&mut data, &mut offset, 0x0102u16, Endian::Big).unwrap();
        write_at(&mut data, &mut offset, 0x0102u16, Endian::Little).unwrap();
        write_at(&mut data, &mut offset, -1i32, Endian::Little).unwrap();
        assert_eq!(data, [0x01, 0x02, 0x02, 0x01, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(offset, 8);
    }

    #[test]
    fn errors() {
        let mut offset = 6;
        let result = read_at::<u32>(&TEST_BUFFER, &mut offset, Endian::Little);
        assert!(matches!(
            result,
            Err(Error::TruncatedStream {
                expected: 4,
                actual: 2
            })
        ));
        assert_eq!(offset, 6);

        let mut data = [0u8; 3];
        let mut offset = 0;
        assert!(write_at(&mut data, &mut offset, 1u32, Endian::Big).is_err());
        assert_eq!(offset, 0);

        let mut offset = 42;
        assert!(read_at::<u8>(&TEST_BUFFER, &mut offset, Endian::Big).is_err());
    }

    #[test]
    fn native_matches_platform() {
        let value = 0x0102_0304u32;
        let native = value.to_bytes(Endian::native());
        assert_eq!(native, value.to_ne_bytes());
    }
}
