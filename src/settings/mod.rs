//! Metadata records describing configurable attributes.
//!
//! An [`AttributeSettings`] describes one configurable parameter: its identity (internal name,
//! display name, description), the UI widget kind it is edited with, the legal choices of an
//! enumeration, a small flag set, and up to three owned [`Attribute`] values (default, minimum,
//! maximum).
//!
//! # Key Components
//!
//! - [`AttributeSettings`] - The record and its copy policies
//! - [`AttributeFlags`] - Typed view of the 16-bit flag field
//! - [`Slot`] - Selects the default, minimum or maximum value
//!
//! # Encodings
//!
//! The record has a versioned binary encoding ([`AttributeSettings::write`] /
//! [`AttributeSettings::read`]) and a `-key {value}` text encoding
//! ([`AttributeSettings::convert_to_string`] / [`AttributeSettings::init_from_string`]).
//! A failed decode never leaves a half-populated record behind: the record is reset to the
//! empty state (keeping its parent) and the error is returned.
//!
//! # Copy Policies
//!
//! - [`Clone`] creates an independent deep copy without the parent link
//! - [`AttributeSettings::assign_from`] replaces every field, releasing the previous values
//! - [`AttributeSettings::init_from`] merges, keeping existing values where the kinds agree
//!
//! # Examples
//!
//! ```rust
//! use attrsettings::{AttributeFactory, AttributeFloat, AttributeSettings, Endian, MemoryStream, StringIdPool};
//! use std::sync::Arc;
//!
//! let pool = Arc::new(StringIdPool::new());
//! let factory = AttributeFactory::with_builtin();
//!
//! let mut settings = AttributeSettings::with_internal_name(Arc::clone(&pool), "speed");
//! settings.set_interface_type(3);
//! settings.add_combo_value("slow");
//! settings.add_combo_value("fast");
//! settings.set_default_value(Some(Box::new(AttributeFloat::new(1.5))));
//!
//! let mut stream = MemoryStream::new();
//! settings.write(&mut stream, Endian::Little)?;
//! stream.seek(0)?;
//!
//! let mut decoded = AttributeSettings::new(pool);
//! decoded.read(&mut stream, Endian::Little, &factory)?;
//! assert_eq!(decoded.num_combo_values(), 2);
//! assert_eq!(decoded.combo_value(0)?, "slow");
//! assert_eq!(decoded, settings);
//! # Ok::<(), attrsettings::Error>(())
//! ```

mod binary;
mod flags;
mod text;
mod tooltip;

pub use binary::CURRENT_VERSION;
pub use flags::{
    AttributeFlags, FLAGINDEX_REFERENCES_OTHER_ATTRIBUTE, FLAGINDEX_REINIT_GUI_ON_VALUE_CHANGE,
    FLAGINDEX_REINIT_OBJECT_ON_VALUE_CHANGE,
};

use std::{fmt, sync::Arc};

use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::{
    attribute::{Attribute, AttributeGraph, AttributeHandle},
    pool::{StringId, StringIdPool},
    Error, Result,
};

/// Interface type of settings that do not select a specific widget
pub const DEFAULT_INTERFACE_TYPE: u32 = u32::MAX;

/// One of the three value slots of an [`AttributeSettings`].
///
/// The `Display` form is the text encoding key of the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, IntoStaticStr)]
pub enum Slot {
    /// Default value
    #[strum(serialize = "defaultValue")]
    Default,
    /// Lower bound
    #[strum(serialize = "minValue")]
    Min,
    /// Upper bound
    #[strum(serialize = "maxValue")]
    Max,
}

impl Slot {
    /// Text encoding key, without the leading dash
    #[must_use]
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Human readable name used in log messages
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Slot::Default => "default",
            Slot::Min => "minimum",
            Slot::Max => "maximum",
        }
    }
}

/// Metadata record of one configurable attribute.
///
/// Names and combo values are interned in the [`StringIdPool`] the record was created with.
/// The default, minimum and maximum values are exclusively owned; the parent is a
/// generation-checked handle into the [`AttributeGraph`] owning the enclosing attribute.
pub struct AttributeSettings {
    pool: Arc<StringIdPool>,
    name_id: StringId,
    internal_name_id: StringId,
    description: String,
    interface_type: u32,
    combo_values: Vec<StringId>,
    flags: AttributeFlags,
    default_value: Option<Box<dyn Attribute>>,
    min_value: Option<Box<dyn Attribute>>,
    max_value: Option<Box<dyn Attribute>>,
    parent: Option<AttributeHandle>,
}

impl AttributeSettings {
    /// Create an empty record
    #[must_use]
    pub fn new(pool: Arc<StringIdPool>) -> Self {
        AttributeSettings {
            pool,
            name_id: StringId::INVALID,
            internal_name_id: StringId::INVALID,
            description: String::new(),
            interface_type: DEFAULT_INTERFACE_TYPE,
            combo_values: Vec::new(),
            flags: AttributeFlags::empty(),
            default_value: None,
            min_value: None,
            max_value: None,
            parent: None,
        }
    }

    /// Create a record with an internal name; the display name falls back to it
    #[must_use]
    pub fn with_internal_name(pool: Arc<StringIdPool>, internal_name: &str) -> Self {
        let mut settings = Self::new(pool);
        settings.set_internal_name(internal_name);
        settings
    }

    /// The string pool names and combo values are interned in
    #[must_use]
    pub fn pool(&self) -> &Arc<StringIdPool> {
        &self.pool
    }

    /// Return to the empty state. The parent link is kept.
    pub fn reset(&mut self) {
        self.name_id = StringId::INVALID;
        self.internal_name_id = StringId::INVALID;
        self.description.clear();
        self.interface_type = DEFAULT_INTERFACE_TYPE;
        self.combo_values.clear();
        self.flags = AttributeFlags::empty();
        self.default_value = None;
        self.min_value = None;
        self.max_value = None;
    }

    /// Replace every field with a deep copy of `other`'s.
    ///
    /// The previously owned values are released first. The parent link of `self` is kept.
    pub fn assign_from(&mut self, other: &AttributeSettings) {
        self.default_value = None;
        self.min_value = None;
        self.max_value = None;

        self.copy_fields_from(other);
        self.default_value = other.default_value.clone();
        self.min_value = other.min_value.clone();
        self.max_value = other.max_value.clone();
    }

    /// Merge `other` into `self`.
    ///
    /// Identity, description, interface type, combo values and flags are copied. For each value
    /// slot:
    /// - an empty slot receives a clone of `other`'s value (or stays empty)
    /// - an occupied slot with a value of the same kind in `other` is updated in place
    /// - an occupied slot is left untouched if `other`'s value has another kind or is absent,
    ///   which is logged as a warning
    pub fn init_from(&mut self, other: &AttributeSettings) {
        self.copy_fields_from(other);

        for slot in [Slot::Default, Slot::Min, Slot::Max] {
            let source = other.value(slot);
            let internal_name = self.internal_name().to_string();
            let target = self.slot_entry(slot);

            if target.is_none() {
                *target = source.map(|value| value.clone_box());
                continue;
            }
            let Some(current) = target.as_deref_mut() else {
                continue;
            };

            match source {
                None => {
                    log::warn!(
                        "Attribute settings '{}' - source has no {} value, keeping the current one",
                        internal_name,
                        slot.label()
                    );
                }
                Some(source) if source.type_tag() != current.type_tag() => {
                    log::warn!(
                        "Attribute settings '{}' - {} value type mismatch ({} vs {}), keeping the current value",
                        internal_name,
                        slot.label(),
                        current.type_string(),
                        source.type_string()
                    );
                }
                Some(source) => {
                    if let Err(error) = current.init_from(source) {
                        log::warn!(
                            "Attribute settings '{}' - failed to copy the {} value: {}",
                            internal_name,
                            slot.label(),
                            error
                        );
                    }
                }
            }
        }
    }

    fn copy_fields_from(&mut self, other: &AttributeSettings) {
        self.name_id = self.import_id(other, other.name_id);
        self.internal_name_id = self.import_id(other, other.internal_name_id);
        self.description.clone_from(&other.description);
        self.interface_type = other.interface_type;
        self.flags = other.flags;
        self.combo_values = other
            .combo_values
            .iter()
            .map(|id| self.import_id(other, *id))
            .collect();
    }

    /// Translate an id of `other`'s pool into this record's pool
    fn import_id(&self, other: &AttributeSettings, id: StringId) -> StringId {
        if !id.is_valid() || Arc::ptr_eq(&self.pool, &other.pool) {
            id
        } else {
            self.pool.generate_id_for_string(other.pool.name(id))
        }
    }

    // -- Identity --

    /// Set the internal (machine) name
    pub fn set_internal_name(&mut self, name: &str) {
        self.internal_name_id = self.pool.generate_id_for_string(name);
    }

    /// Set the display name
    pub fn set_name(&mut self, name: &str) {
        self.name_id = self.pool.generate_id_for_string(name);
    }

    /// Internal name, empty if unset
    #[must_use]
    pub fn internal_name(&self) -> &str {
        self.pool.name(self.internal_name_id)
    }

    /// Display name; the internal name if no display name was set
    #[must_use]
    pub fn name(&self) -> &str {
        if self.name_id.is_valid() {
            self.pool.name(self.name_id)
        } else {
            self.internal_name()
        }
    }

    /// Interned id of the display name, [`StringId::INVALID`] if unset
    #[must_use]
    pub fn name_id(&self) -> StringId {
        self.name_id
    }

    /// Interned id of the internal name, [`StringId::INVALID`] if unset
    #[must_use]
    pub fn internal_name_id(&self) -> StringId {
        self.internal_name_id
    }

    /// Set the description
    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    /// Description, empty if unset
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// UI widget kind
    #[must_use]
    pub fn interface_type(&self) -> u32 {
        self.interface_type
    }

    /// Set the UI widget kind
    pub fn set_interface_type(&mut self, interface_type: u32) {
        self.interface_type = interface_type;
    }

    // -- Combo values --

    /// Interned ids of the combo values in display order
    #[must_use]
    pub fn combo_values(&self) -> &[StringId] {
        &self.combo_values
    }

    /// Mutable access to the combo value ids
    pub fn combo_values_mut(&mut self) -> &mut Vec<StringId> {
        &mut self.combo_values
    }

    /// Resolved combo values in display order
    pub fn combo_value_strings(&self) -> impl Iterator<Item = &str> {
        self.combo_values.iter().map(|id| self.pool.name(*id))
    }

    /// Number of combo values
    #[must_use]
    pub fn num_combo_values(&self) -> usize {
        self.combo_values.len()
    }

    /// Resolved combo value at `index`
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `index` is past the end.
    pub fn combo_value(&self, index: usize) -> Result<&str> {
        self.combo_values
            .get(index)
            .map(|id| self.pool.name(*id))
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.combo_values.len(),
            })
    }

    /// Append a combo value
    pub fn add_combo_value(&mut self, value: &str) {
        let id = self.pool.generate_id_for_string(value);
        self.combo_values.push(id);
    }

    /// Replace the combo value at `index`
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `index` is past the end.
    pub fn set_combo_value(&mut self, index: usize, value: &str) -> Result<()> {
        let len = self.combo_values.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        self.combo_values[index] = self.pool.generate_id_for_string(value);
        Ok(())
    }

    /// Reserve room for `additional` combo values
    pub fn reserve_combo_values(&mut self, additional: usize) {
        self.combo_values.reserve(additional);
    }

    /// Resize the combo list; new entries resolve to the empty string
    pub fn resize_combo_values(&mut self, len: usize) {
        self.combo_values.resize(len, StringId::INVALID);
    }

    // -- Value slots --

    /// Value in `slot`
    #[must_use]
    pub fn value(&self, slot: Slot) -> Option<&dyn Attribute> {
        match slot {
            Slot::Default => self.default_value.as_deref(),
            Slot::Min => self.min_value.as_deref(),
            Slot::Max => self.max_value.as_deref(),
        }
    }

    /// Mutable value in `slot`
    pub fn value_mut(&mut self, slot: Slot) -> Option<&mut (dyn Attribute + 'static)> {
        self.slot_entry(slot).as_deref_mut()
    }

    /// Store `value` in `slot`, dropping the previous value
    pub fn set_value(&mut self, slot: Slot, value: Option<Box<dyn Attribute>>) {
        *self.slot_entry(slot) = value;
    }

    /// Store `value` in `slot` and hand the previous value back to the caller
    pub fn replace_value(
        &mut self,
        slot: Slot,
        value: Option<Box<dyn Attribute>>,
    ) -> Option<Box<dyn Attribute>> {
        std::mem::replace(self.slot_entry(slot), value)
    }

    /// Remove and return the value in `slot`
    pub fn take_value(&mut self, slot: Slot) -> Option<Box<dyn Attribute>> {
        self.slot_entry(slot).take()
    }

    fn slot_entry(&mut self, slot: Slot) -> &mut Option<Box<dyn Attribute>> {
        match slot {
            Slot::Default => &mut self.default_value,
            Slot::Min => &mut self.min_value,
            Slot::Max => &mut self.max_value,
        }
    }

    /// Default value
    #[must_use]
    pub fn default_value(&self) -> Option<&dyn Attribute> {
        self.value(Slot::Default)
    }

    /// Mutable default value
    pub fn default_value_mut(&mut self) -> Option<&mut (dyn Attribute + 'static)> {
        self.value_mut(Slot::Default)
    }

    /// Set the default value, dropping the previous one
    pub fn set_default_value(&mut self, value: Option<Box<dyn Attribute>>) {
        self.set_value(Slot::Default, value);
    }

    /// Set the default value, returning the previous one
    pub fn replace_default_value(
        &mut self,
        value: Option<Box<dyn Attribute>>,
    ) -> Option<Box<dyn Attribute>> {
        self.replace_value(Slot::Default, value)
    }

    /// Remove and return the default value
    pub fn take_default_value(&mut self) -> Option<Box<dyn Attribute>> {
        self.take_value(Slot::Default)
    }

    /// Minimum value
    #[must_use]
    pub fn min_value(&self) -> Option<&dyn Attribute> {
        self.value(Slot::Min)
    }

    /// Mutable minimum value
    pub fn min_value_mut(&mut self) -> Option<&mut (dyn Attribute + 'static)> {
        self.value_mut(Slot::Min)
    }

    /// Set the minimum value, dropping the previous one
    pub fn set_min_value(&mut self, value: Option<Box<dyn Attribute>>) {
        self.set_value(Slot::Min, value);
    }

    /// Set the minimum value, returning the previous one
    pub fn replace_min_value(
        &mut self,
        value: Option<Box<dyn Attribute>>,
    ) -> Option<Box<dyn Attribute>> {
        self.replace_value(Slot::Min, value)
    }

    /// Remove and return the minimum value
    pub fn take_min_value(&mut self) -> Option<Box<dyn Attribute>> {
        self.take_value(Slot::Min)
    }

    /// Maximum value
    #[must_use]
    pub fn max_value(&self) -> Option<&dyn Attribute> {
        self.value(Slot::Max)
    }

    /// Mutable maximum value
    pub fn max_value_mut(&mut self) -> Option<&mut (dyn Attribute + 'static)> {
        self.value_mut(Slot::Max)
    }

    /// Set the maximum value, dropping the previous one
    pub fn set_max_value(&mut self, value: Option<Box<dyn Attribute>>) {
        self.set_value(Slot::Max, value);
    }

    /// Set the maximum value, returning the previous one
    pub fn replace_max_value(
        &mut self,
        value: Option<Box<dyn Attribute>>,
    ) -> Option<Box<dyn Attribute>> {
        self.replace_value(Slot::Max, value)
    }

    /// Remove and return the maximum value
    pub fn take_max_value(&mut self) -> Option<Box<dyn Attribute>> {
        self.take_value(Slot::Max)
    }

    /// Scale the default value. Minimum and maximum are never scaled.
    pub fn scale(&mut self, factor: f32) {
        if let Some(value) = self.default_value.as_deref_mut() {
            value.scale(factor);
        }
    }

    // -- Parent --

    /// Attribute that encloses the attribute described by this record
    #[must_use]
    pub fn parent(&self) -> Option<AttributeHandle> {
        self.parent
    }

    /// Returns true if a parent is set
    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Set or clear the parent
    pub fn set_parent(&mut self, parent: Option<AttributeHandle>) {
        self.parent = parent;
    }

    /// Settings describing the parent attribute within its own parent.
    ///
    /// Walks a single level: parent, the parent's parent, then the settings stored there for
    /// the parent. Returns `None` if any link is missing or stale.
    #[must_use]
    pub fn find_parent_settings<'g>(&self, graph: &'g AttributeGraph) -> Option<&'g AttributeSettings> {
        let parent = self.parent?;
        let grandparent = graph.parent_of(parent)?;
        let index = graph.find_attribute_index_by_value(grandparent, parent)?;
        graph.child_attribute_settings(grandparent, index)
    }
}

impl Clone for AttributeSettings {
    fn clone(&self) -> Self {
        let mut settings = AttributeSettings::new(Arc::clone(&self.pool));
        settings.assign_from(self);
        settings
    }
}

fn values_equal(a: Option<&dyn Attribute>, b: Option<&dyn Attribute>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.equals(b),
        _ => false,
    }
}

impl PartialEq for AttributeSettings {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
            && self.internal_name() == other.internal_name()
            && self.description == other.description
            && self.interface_type == other.interface_type
            && self.flags == other.flags
            && self.combo_value_strings().eq(other.combo_value_strings())
            && [Slot::Default, Slot::Min, Slot::Max]
                .into_iter()
                .all(|slot| values_equal(self.value(slot), other.value(slot)))
    }
}

impl fmt::Debug for AttributeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeSettings")
            .field("internal_name", &self.internal_name())
            .field("name", &self.name())
            .field("description", &self.description)
            .field("interface_type", &self.interface_type)
            .field("flags", &self.flags)
            .field("combo_values", &self.combo_value_strings().collect::<Vec<_>>())
            .field("default_value", &self.default_value)
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .field("parent", &self.parent)
            .finish()
    }
}
