// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # attrsettings
//!
//! Self-describing metadata records for typed, configurable attribute values.
//!
//! An [`AttributeSettings`] describes one configurable parameter of an animation graph node:
//! its internal and display names, a description, the UI widget kind used to edit it, the legal
//! choices of an enumeration, a 16-bit flag set, and optional default, minimum and maximum
//! values. Records can be encoded in a versioned, endian-selectable binary layout and in a
//! `-key {value}` text form, and they link to the enclosing attribute through generation-checked
//! handles for hierarchical naming.
//!
//! ## Features
//!
//! - **Binary codec** - Layout versions 1 and 2, little or big endian, exact size calculation
//! - **Text codec** - Brace-delimited `-key {value}` encoding with strict required keys
//! - **Copy policies** - Deep clone, releasing assignment and type-preserving merge
//! - **Safe hierarchy** - Parent links are validated handles into an [`AttributeGraph`]
//! - **Shared interning** - Names and combo values are interned in a thread-safe [`StringIdPool`]
//!
//! ## Quick Start
//!
//! ```rust
//! use attrsettings::prelude::*;
//! use std::sync::Arc;
//!
//! let pool = Arc::new(StringIdPool::new());
//! let factory = AttributeFactory::with_builtin();
//!
//! let mut settings = AttributeSettings::with_internal_name(Arc::clone(&pool), "blendWeight");
//! settings.set_name("Blend Weight");
//! settings.set_interface_type(1);
//! settings.set_default_value(Some(Box::new(AttributeFloat::new(0.5))));
//! settings.set_min_value(Some(Box::new(AttributeFloat::new(0.0))));
//! settings.set_max_value(Some(Box::new(AttributeFloat::new(1.0))));
//!
//! let text = settings.convert_to_string()?;
//! let mut decoded = AttributeSettings::new(pool);
//! decoded.init_from_string(&text, &factory)?;
//! assert_eq!(decoded, settings);
//! # Ok::<(), attrsettings::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result`]. Decoding never panics on malformed input, and a
//! failed decode resets the record instead of leaving it half populated. Recoverable
//! inconsistencies during [`AttributeSettings::init_from`] are reported through the `log`
//! facade; the library never installs a logger itself.
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//!
//! # Fuzz the binary decoder
//! cargo +nightly fuzz run settings --release
//! ```
#[macro_use]
pub(crate) mod error;

mod commandline;
mod config;
mod pool;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use attrsettings::prelude::*;
/// use std::sync::Arc;
///
/// let settings = AttributeSettings::with_internal_name(Arc::new(StringIdPool::new()), "speed");
/// assert_eq!(settings.name(), "speed");
/// ```
pub mod prelude;

/// Byte streams and endian-aware primitive encoding
pub mod stream;

/// Attribute values, the attribute factory and the attribute graph
pub mod attribute;

/// The attribute settings record and its encodings
pub mod settings;

/// `attrsettings` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `attrsettings` Error type
///
/// # Examples
///
/// ```rust
/// use attrsettings::{AttributeFactory, AttributeSettings, Error, StringIdPool};
/// use std::sync::Arc;
///
/// let factory = AttributeFactory::with_builtin();
/// let mut settings = AttributeSettings::new(Arc::new(StringIdPool::new()));
/// match settings.init_from_string("-internalName {speed} -flags 0", &factory) {
///     Err(Error::MissingParameter(name)) => assert_eq!(name, "interfaceType"),
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
pub use error::Error;

pub use attribute::{
    Attribute, AttributeBool, AttributeConstructor, AttributeFactory, AttributeFloat,
    AttributeGraph, AttributeHandle, AttributeInt32, AttributeKind, AttributeString,
    AttributeVector3,
};
pub use commandline::{CommandLine, Parameter};
pub use config::CodecConfig;
pub use pool::{StringId, StringIdPool};
pub use settings::{AttributeFlags, AttributeSettings, Slot, DEFAULT_INTERFACE_TYPE};
pub use stream::{Endian, IoStream, MemoryStream, Stream, StreamExt, StreamIO};
