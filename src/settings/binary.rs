//! Versioned binary encoding of [`AttributeSettings`].
//!
//! # Layout
//!
//! Every multi-byte field uses the byte order chosen by the caller. Strings are a `u32` byte
//! length followed by UTF-8 bytes.
//!
//! ```text
//! version:        u8   (1 or 2)
//! flags:          u16  (version 2 only)
//! internal_name:  string
//! name:           string
//! description:    string
//! interface_type: u32
//! combo_count:    u32
//! combo_values:   string * combo_count
//! default_value:  full attribute block
//! min_value:      full attribute block
//! max_value:      full attribute block
//! ```

use crate::{
    attribute::{full_attribute_size, read_full_attribute, write_full_attribute, AttributeFactory},
    config::CodecConfig,
    settings::{AttributeFlags, AttributeSettings, Slot},
    stream::{prefixed_string_size, Endian, Stream, StreamExt},
    Error, Result,
};

/// Binary layout version written by default
pub const CURRENT_VERSION: u8 = 2;

fn check_version(version: u8) -> Result<()> {
    match version {
        1 | 2 => Ok(()),
        other => Err(Error::UnsupportedVersion(other)),
    }
}

impl AttributeSettings {
    /// Write the current binary layout.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedStream`] if the stream stops accepting bytes, or an error from
    /// encoding one of the values.
    pub fn write(&self, stream: &mut dyn Stream, endian: Endian) -> Result<()> {
        self.write_with(stream, &CodecConfig::default().with_endian(endian))
    }

    /// Write the binary layout selected by `config`.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedVersion`] if `config.binary_version` is not 1 or 2, or any
    /// error [`AttributeSettings::write`] returns.
    pub fn write_with(&self, stream: &mut dyn Stream, config: &CodecConfig) -> Result<()> {
        let version = config.binary_version;
        check_version(version)?;
        let endian = config.endian;

        stream.write_value(version, endian)?;
        if version >= 2 {
            stream.write_value(self.flags.bits(), endian)?;
        }

        stream.write_prefixed_string(self.internal_name(), endian)?;
        stream.write_prefixed_string(self.name(), endian)?;
        stream.write_prefixed_string(&self.description, endian)?;
        stream.write_value(self.interface_type, endian)?;

        let count = u32::try_from(self.combo_values.len())
            .map_err(|_| malformed_error!("Too many combo values - {}", self.combo_values.len()))?;
        stream.write_value(count, endian)?;
        for value in self.combo_value_strings() {
            stream.write_prefixed_string(value, endian)?;
        }

        for slot in [Slot::Default, Slot::Min, Slot::Max] {
            write_full_attribute(stream, endian, self.value(slot))?;
        }
        Ok(())
    }

    /// Read either binary layout, replacing the content of `self`.
    ///
    /// On failure the record is reset to the empty state (the parent is kept).
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedVersion`] for an unknown version byte,
    /// [`Error::TruncatedStream`] if the stream ends early, or [`Error::Malformed`] /
    /// [`Error::UnknownAttributeTypeId`] for invalid content.
    pub fn read(
        &mut self,
        stream: &mut dyn Stream,
        endian: Endian,
        factory: &AttributeFactory,
    ) -> Result<()> {
        self.read_with(stream, factory, &CodecConfig::default().with_endian(endian))
    }

    /// Read either binary layout with the byte order and decode limits of `config`.
    ///
    /// # Errors
    /// See [`AttributeSettings::read`]. Strings, combo lists and value payloads larger than the
    /// limits of `config` are [`Error::Malformed`].
    pub fn read_with(
        &mut self,
        stream: &mut dyn Stream,
        factory: &AttributeFactory,
        config: &CodecConfig,
    ) -> Result<()> {
        self.reset();
        if let Err(error) = self.read_fields(stream, factory, config) {
            log::error!(
                "Failed to read attribute settings '{}': {}",
                self.internal_name(),
                error
            );
            self.reset();
            return Err(error);
        }
        Ok(())
    }

    fn read_fields(
        &mut self,
        stream: &mut dyn Stream,
        factory: &AttributeFactory,
        config: &CodecConfig,
    ) -> Result<()> {
        let endian = config.endian;

        let version = stream.read_value::<u8>(endian)?;
        check_version(version)?;
        if version == 1 {
            log::debug!("Reading legacy version 1 attribute settings");
        } else {
            let bits = stream.read_value::<u16>(endian)?;
            self.flags = AttributeFlags::from_bits_retain(bits);
        }

        let internal_name = stream.read_prefixed_string(endian, config.max_string_len)?;
        self.set_internal_name(&internal_name);
        let name = stream.read_prefixed_string(endian, config.max_string_len)?;
        self.set_name(&name);
        self.description = stream.read_prefixed_string(endian, config.max_string_len)?;
        self.interface_type = stream.read_value::<u32>(endian)?;

        let count = stream.read_value::<u32>(endian)?;
        if count > config.max_combo_values {
            return Err(malformed_error!(
                "Combo value count {} exceeds the limit of {}",
                count,
                config.max_combo_values
            ));
        }
        for _ in 0..count {
            let value = stream.read_prefixed_string(endian, config.max_string_len)?;
            self.add_combo_value(&value);
        }

        for slot in [Slot::Default, Slot::Min, Slot::Max] {
            let value = read_full_attribute(stream, endian, factory, config.max_attribute_size)?;
            self.set_value(slot, value);
        }
        Ok(())
    }

    /// Exact number of bytes [`AttributeSettings::write`] produces
    #[must_use]
    pub fn calc_stream_size(&self) -> usize {
        self.stream_size(CURRENT_VERSION)
    }

    /// Exact number of bytes the given binary layout version produces
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedVersion`] if `version` is not 1 or 2.
    pub fn calc_stream_size_for_version(&self, version: u8) -> Result<usize> {
        check_version(version)?;
        Ok(self.stream_size(version))
    }

    fn stream_size(&self, version: u8) -> usize {
        let mut size = std::mem::size_of::<u8>();
        if version >= 2 {
            size += std::mem::size_of::<u16>();
        }

        size += prefixed_string_size(self.internal_name());
        size += prefixed_string_size(self.name());
        size += prefixed_string_size(&self.description);
        size += std::mem::size_of::<u32>() * 2;
        size += self
            .combo_value_strings()
            .map(prefixed_string_size)
            .sum::<usize>();

        for slot in [Slot::Default, Slot::Min, Slot::Max] {
            size += full_attribute_size(self.value(slot));
        }
        size
    }
}
