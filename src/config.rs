//! Codec configuration for attribute settings
//!
//! This module groups the knobs of the binary codec, the text codec and the tooltip renderer.
//! The defaults reproduce the established wire formats exactly; the presets trade
//! compatibility for canonical output or tighter decode limits.

use crate::{settings::CURRENT_VERSION, stream::Endian};

/// Configuration for encoding and decoding [`crate::AttributeSettings`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Byte order of every multi-byte binary field
    pub endian: Endian,

    /// Binary layout version produced by `write_with` (1 or 2)
    /// Version 1 has no flags field
    pub binary_version: u8,

    /// Terminate `-comboValues` with a `;` after the last entry (default: true)
    /// When set, decoding strips exactly one trailing `;` before splitting
    pub trailing_combo_separator: bool,

    /// Maximum number of characters of a value preview in tooltips (default: 100)
    pub tooltip_preview_len: usize,

    /// Maximum byte length of a decoded string
    pub max_string_len: u32,

    /// Maximum number of decoded combo values
    pub max_combo_values: u32,

    /// Maximum payload size of a decoded full attribute block
    pub max_attribute_size: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            endian: Endian::Little,
            binary_version: CURRENT_VERSION,
            trailing_combo_separator: true,
            tooltip_preview_len: 100,
            max_string_len: 16 * 1024 * 1024,
            max_combo_values: 1024 * 1024,
            max_attribute_size: 64 * 1024 * 1024,
        }
    }
}

impl CodecConfig {
    /// Creates a configuration producing the version 1 binary layout
    ///
    /// Flags are not stored by this layout and read back as zero.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            binary_version: 1,
            ..Self::default()
        }
    }

    /// Creates a configuration producing canonical text
    ///
    /// Combo values are joined without a trailing separator. Text produced this way must be
    /// decoded with the same configuration.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            trailing_combo_separator: false,
            ..Self::default()
        }
    }

    /// Creates a configuration with small decode limits for untrusted input
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_string_len: 4096,
            max_combo_values: 1024,
            max_attribute_size: 64 * 1024,
            ..Self::default()
        }
    }

    /// Same configuration with another byte order
    #[must_use]
    pub fn with_endian(self, endian: Endian) -> Self {
        Self { endian, ..self }
    }
}
