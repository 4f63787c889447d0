use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Decoding errors (binary or text) are always surfaced through this type; the library never
/// aborts the process on malformed input. Recoverable inconsistencies, such as a type mismatch
/// during [`crate::AttributeSettings::init_from`], are logged instead and do not produce an error.
///
/// # Error Categories
///
/// ## Stream Errors
/// - [`Error::TruncatedStream`] - A byte transfer moved fewer bytes than required
/// - [`Error::UnsupportedVersion`] - Unknown binary format version
/// - [`Error::Malformed`] - Structurally invalid binary or text input
/// - [`Error::FileError`] - I/O errors from an underlying transport
///
/// ## Text Decoding Errors
/// - [`Error::MissingParameter`] - A required `-key` is absent
///
/// ## Attribute Errors
/// - [`Error::UnknownAttributeType`] - The factory has no kind for a type string
/// - [`Error::UnknownAttributeTypeId`] - The factory has no kind for a type tag
/// - [`Error::TypeMismatch`] - Two attributes of different kinds were combined
///
/// ## Access Errors
/// - [`Error::FlagIndexOutOfRange`] - Flag bit index outside the 16-bit field
/// - [`Error::IndexOutOfRange`] - Combo value index outside the list
/// - [`Error::InvalidHandle`] - Stale or foreign [`crate::AttributeHandle`]
///
/// # Examples
///
/// ```rust
/// use attrsettings::{AttributeFactory, AttributeSettings, Endian, Error, MemoryStream, StringIdPool};
/// use std::sync::Arc;
///
/// let pool = Arc::new(StringIdPool::new());
/// let factory = AttributeFactory::with_builtin();
/// let mut settings = AttributeSettings::new(pool);
///
/// let mut stream = MemoryStream::from_bytes(vec![7]);
/// match settings.read(&mut stream, Endian::Little, &factory) {
///     Err(Error::UnsupportedVersion(version)) => assert_eq!(version, 7),
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A stream transfer was short.
    ///
    /// Every fixed-size field and every length-prefixed string must be transferred in full;
    /// partial fields are never tolerated.
    #[error("Truncated stream - expected {expected} bytes, transferred {actual}")]
    TruncatedStream {
        /// Number of bytes the field required
        expected: usize,
        /// Number of bytes actually transferred
        actual: usize,
    },

    /// The binary payload announced a format version this library cannot decode.
    #[error("Unsupported attribute settings version - {0}")]
    UnsupportedVersion(u8),

    /// The input is damaged and could not be decoded.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A parameter required by the text encoding was not present.
    #[error("Missing required parameter '-{0}'")]
    MissingParameter(String),

    /// The attribute factory does not know the given type string.
    #[error("Unknown attribute type '{0}'")]
    UnknownAttributeType(String),

    /// The attribute factory does not know the given type tag.
    #[error("Unknown attribute type id - 0x{0:08x}")]
    UnknownAttributeTypeId(u32),

    /// Two attributes of different concrete kinds were combined.
    #[error("Attribute type mismatch - expected {expected}, found {found}")]
    TypeMismatch {
        /// Type string of the receiving attribute
        expected: &'static str,
        /// Type string of the offending attribute
        found: &'static str,
    },

    /// A flag bit index outside of the 16-bit flag field was supplied.
    #[error("Flag index {0} is out of range (0..16)")]
    FlagIndexOutOfRange(u32),

    /// An index into a list was out of range.
    #[error("Index {index} is out of range (len {len})")]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// The length of the list
        len: usize,
    },

    /// An attribute handle no longer refers to a live node.
    #[error("Attribute handle is stale or does not belong to this graph")]
    InvalidHandle,

    /// File I/O error.
    ///
    /// Wraps standard I/O errors raised by an [`crate::IoStream`] transport.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}
