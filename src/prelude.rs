//! # attrsettings Prelude
//!
//! The types needed to build, encode and decode attribute settings.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all attrsettings operations
pub use crate::Error;

/// The result type used throughout attrsettings
pub use crate::Result;

/// Codec configuration and presets
pub use crate::CodecConfig;

// ================================================================================================
// Settings
// ================================================================================================

pub use crate::{AttributeFlags, AttributeSettings, Slot, DEFAULT_INTERFACE_TYPE};

// ================================================================================================
// Attribute Values
// ================================================================================================

pub use crate::{
    Attribute, AttributeBool, AttributeFactory, AttributeFloat, AttributeGraph, AttributeHandle,
    AttributeInt32, AttributeKind, AttributeString, AttributeVector3,
};

// ================================================================================================
// Services and Streams
// ================================================================================================

pub use crate::{Endian, IoStream, MemoryStream, Stream, StreamExt, StringId, StringIdPool};
