//! Polymorphic attribute values.
//!
//! An [`Attribute`] is a single typed value (float, vector, string, ...) with a fixed
//! capability set: cloning, same-kind copying, text and binary encoding, and scaling. The
//! settings core never inspects concrete kinds; it only compares [`Attribute::type_tag`]s.
//!
//! # Key Components
//!
//! - [`Attribute`] - The capability trait every value kind implements
//! - [`AttributeKind`] - The built-in kinds and their type tags / type strings
//! - [`AttributeFactory`] - Creates values from a type string or a type tag
//! - [`AttributeGraph`] - Arena of nested values with generation-checked handles
//!
//! # Full Attribute Blocks
//!
//! In binary payloads a value is stored as a self-describing block:
//!
//! ```text
//! type_tag: u32 | data_size: u32 | data_version: u8 | payload: [u8; data_size]
//! ```
//!
//! An absent value is written as the single `u32` [`NO_ATTRIBUTE`].

mod factory;
mod graph;
mod types;

pub use factory::{AttributeConstructor, AttributeFactory};
pub use graph::{AttributeGraph, AttributeHandle};
pub use types::{
    AttributeBool, AttributeFloat, AttributeInt32, AttributeKind, AttributeString,
    AttributeVector3,
};

use std::{any::Any, fmt};

use crate::{
    stream::{Endian, MemoryStream, Stream, StreamExt},
    Result,
};

/// Type tag written in place of a full attribute block when no value is present
pub const NO_ATTRIBUTE: u32 = u32::MAX;

/// Size of the fixed header of a present full attribute block
const FULL_ATTRIBUTE_HEADER: usize = 4 + 4 + 1;

/// Capability set of a typed attribute value.
pub trait Attribute: fmt::Debug + Send + Sync + Any {
    /// Numeric identifier of the concrete kind
    fn type_tag(&self) -> u32;

    /// Textual identifier of the concrete kind, as accepted by [`AttributeFactory`]
    fn type_string(&self) -> &'static str;

    /// Deep copy into a new owned value
    fn clone_box(&self) -> Box<dyn Attribute>;

    /// Copy the value of `other` into `self`, keeping `self`'s identity.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeMismatch`] if `other` is of another kind.
    fn init_from(&mut self, other: &dyn Attribute) -> Result<()>;

    /// Encode the value as text
    ///
    /// # Errors
    /// Returns an error if the value has no text form.
    fn convert_to_string(&self) -> Result<String>;

    /// Decode the value from text
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `value` is not a valid encoding.
    fn init_from_string(&mut self, value: &str) -> Result<()>;

    /// Multiply the value by `factor`. Kinds without a meaningful scale ignore it.
    fn scale(&mut self, _factor: f32) {}

    /// Number of payload bytes written by [`Attribute::write_data`]
    fn data_size(&self) -> usize;

    /// Payload layout version written into the full attribute block
    fn data_version(&self) -> u8 {
        1
    }

    /// Write the payload
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedStream`] on a short write.
    fn write_data(&self, stream: &mut dyn Stream, endian: Endian) -> Result<()>;

    /// Read a payload of `size` bytes written with layout `version`
    ///
    /// # Errors
    /// Returns an error on a short read, an unknown layout version or an invalid payload.
    fn read_data(
        &mut self,
        stream: &mut dyn Stream,
        endian: Endian,
        version: u8,
        size: u32,
    ) -> Result<()>;

    /// Value equality; values of different kinds are never equal
    fn equals(&self, other: &dyn Attribute) -> bool;

    /// Upcast for downcasting to the concrete kind
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete kind
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl Clone for Box<dyn Attribute> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Serialized size of a full attribute block, including the absent case
#[must_use]
pub fn full_attribute_size(attribute: Option<&dyn Attribute>) -> usize {
    match attribute {
        None => std::mem::size_of::<u32>(),
        Some(value) => FULL_ATTRIBUTE_HEADER + value.data_size(),
    }
}

/// Write a full attribute block (or the absent marker).
///
/// # Errors
/// Returns [`crate::Error::TruncatedStream`] on a short write, or [`crate::Error::Malformed`]
/// if the payload does not fit a `u32` size.
pub fn write_full_attribute(
    stream: &mut dyn Stream,
    endian: Endian,
    attribute: Option<&dyn Attribute>,
) -> Result<()> {
    let Some(value) = attribute else {
        return stream.write_value(NO_ATTRIBUTE, endian);
    };

    let size = u32::try_from(value.data_size())
        .map_err(|_| malformed_error!("Attribute payload of {} bytes is too large", value.data_size()))?;

    stream.write_value(value.type_tag(), endian)?;
    stream.write_value(size, endian)?;
    stream.write_value(value.data_version(), endian)?;
    value.write_data(stream, endian)
}

/// Read a full attribute block, creating the value through `factory`.
///
/// Returns `Ok(None)` for the absent marker. The payload must be consumed exactly.
///
/// # Errors
/// Returns [`crate::Error::TruncatedStream`] on a short read,
/// [`crate::Error::UnknownAttributeTypeId`] if the factory cannot create the kind, or
/// [`crate::Error::Malformed`] if the payload exceeds `max_size` or is not consumed exactly.
pub fn read_full_attribute(
    stream: &mut dyn Stream,
    endian: Endian,
    factory: &AttributeFactory,
    max_size: u32,
) -> Result<Option<Box<dyn Attribute>>> {
    let type_tag = stream.read_value::<u32>(endian)?;
    if type_tag == NO_ATTRIBUTE {
        return Ok(None);
    }

    let size = stream.read_value::<u32>(endian)?;
    let version = stream.read_value::<u8>(endian)?;
    if size > max_size {
        return Err(malformed_error!(
            "Attribute payload of {} bytes exceeds the limit of {}",
            size,
            max_size
        ));
    }

    let mut value = factory
        .create_by_type_tag(type_tag)
        .ok_or(crate::Error::UnknownAttributeTypeId(type_tag))?;

    let mut payload = vec![0u8; size as usize];
    stream.read_exact_bytes(&mut payload)?;

    let mut data = MemoryStream::from_bytes(payload);
    value.read_data(&mut data, endian, version, size)?;
    if data.remaining() != 0 {
        return Err(malformed_error!(
            "{} payload left {} of {} bytes unread",
            value.type_string(),
            data.remaining(),
            size
        ));
    }

    Ok(Some(value))
}
