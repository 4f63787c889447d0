//! Flag field of [`AttributeSettings`] and its named bits.

use bitflags::bitflags;

use crate::{settings::AttributeSettings, Error, Result};

/// Bit index of [`AttributeFlags::REINIT_GUI_ON_VALUE_CHANGE`]
pub const FLAGINDEX_REINIT_GUI_ON_VALUE_CHANGE: u32 = 0;
/// Bit index of [`AttributeFlags::REINIT_OBJECT_ON_VALUE_CHANGE`]
pub const FLAGINDEX_REINIT_OBJECT_ON_VALUE_CHANGE: u32 = 1;
/// Bit index of [`AttributeFlags::REFERENCES_OTHER_ATTRIBUTE`]
pub const FLAGINDEX_REFERENCES_OTHER_ATTRIBUTE: u32 = 2;

const FLAG_BITS: u32 = u16::BITS;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Flag field of attribute settings. Bits without a name are kept as-is.
    pub struct AttributeFlags: u16 {
        /// The editing GUI is rebuilt when the value changes
        const REINIT_GUI_ON_VALUE_CHANGE = 1 << FLAGINDEX_REINIT_GUI_ON_VALUE_CHANGE;
        /// The owning object is reinitialized when the value changes
        const REINIT_OBJECT_ON_VALUE_CHANGE = 1 << FLAGINDEX_REINIT_OBJECT_ON_VALUE_CHANGE;
        /// The value refers to another attribute
        const REFERENCES_OTHER_ATTRIBUTE = 1 << FLAGINDEX_REFERENCES_OTHER_ATTRIBUTE;

        const _ = !0;
    }
}

fn bit(index: u32) -> Result<AttributeFlags> {
    if index >= FLAG_BITS {
        return Err(Error::FlagIndexOutOfRange(index));
    }
    Ok(AttributeFlags::from_bits_retain(1 << index))
}

impl AttributeSettings {
    /// All flags
    #[must_use]
    pub fn flags(&self) -> AttributeFlags {
        self.flags
    }

    /// Replace all flags
    pub fn set_flags(&mut self, flags: AttributeFlags) {
        self.flags = flags;
    }

    /// Raw 16-bit flag field
    #[must_use]
    pub fn flag_bits(&self) -> u16 {
        self.flags.bits()
    }

    /// Replace the raw 16-bit flag field
    pub fn set_flag_bits(&mut self, bits: u16) {
        self.flags = AttributeFlags::from_bits_retain(bits);
    }

    /// State of the flag bit at `index`
    ///
    /// # Errors
    /// Returns [`Error::FlagIndexOutOfRange`] for an index of 16 or more.
    pub fn flag(&self, index: u32) -> Result<bool> {
        Ok(self.flags.contains(bit(index)?))
    }

    /// Set or clear the flag bit at `index`
    ///
    /// # Errors
    /// Returns [`Error::FlagIndexOutOfRange`] for an index of 16 or more.
    pub fn set_flag(&mut self, index: u32, enabled: bool) -> Result<()> {
        self.flags.set(bit(index)?, enabled);
        Ok(())
    }

    /// Returns true if the editing GUI is rebuilt on value changes
    #[must_use]
    pub fn reinit_gui_on_value_change(&self) -> bool {
        self.flags
            .contains(AttributeFlags::REINIT_GUI_ON_VALUE_CHANGE)
    }

    /// Rebuild the editing GUI on value changes
    pub fn set_reinit_gui_on_value_change(&mut self, enabled: bool) {
        self.flags
            .set(AttributeFlags::REINIT_GUI_ON_VALUE_CHANGE, enabled);
    }

    /// Returns true if the owning object is reinitialized on value changes
    #[must_use]
    pub fn reinit_object_on_value_change(&self) -> bool {
        self.flags
            .contains(AttributeFlags::REINIT_OBJECT_ON_VALUE_CHANGE)
    }

    /// Reinitialize the owning object on value changes
    pub fn set_reinit_object_on_value_change(&mut self, enabled: bool) {
        self.flags
            .set(AttributeFlags::REINIT_OBJECT_ON_VALUE_CHANGE, enabled);
    }

    /// Returns true if the value refers to another attribute
    #[must_use]
    pub fn references_other_attribute(&self) -> bool {
        self.flags
            .contains(AttributeFlags::REFERENCES_OTHER_ATTRIBUTE)
    }

    /// Mark the value as referring to another attribute
    pub fn set_references_other_attribute(&mut self, enabled: bool) {
        self.flags
            .set(AttributeFlags::REFERENCES_OTHER_ATTRIBUTE, enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::StringIdPool;
    use std::sync::Arc;

    fn settings() -> AttributeSettings {
        AttributeSettings::new(Arc::new(StringIdPool::new()))
    }

    #[test]
    fn every_bit_roundtrips() -> Result<()> {
        for index in 0..16 {
            let mut s = settings();
            s.set_flag_bits(0b1010_0101_1100_0011);
            let before = s.flag_bits();

            s.set_flag(index, true)?;
            assert!(s.flag(index)?);
            assert_eq!(s.flag_bits() & !(1 << index), before & !(1 << index));

            s.set_flag(index, false)?;
            assert!(!s.flag(index)?);
            assert_eq!(s.flag_bits() | (before & (1 << index)), before);
        }
        Ok(())
    }

    #[test]
    fn index_out_of_range() {
        let mut s = settings();
        assert!(matches!(s.flag(16), Err(Error::FlagIndexOutOfRange(16))));
        assert!(matches!(
            s.set_flag(31, true),
            Err(Error::FlagIndexOutOfRange(31))
        ));
        assert_eq!(s.flag_bits(), 0);
    }

    #[test]
    fn named_accessors() -> Result<()> {
        let mut s = settings();
        s.set_references_other_attribute(true);
        assert!(s.flag(FLAGINDEX_REFERENCES_OTHER_ATTRIBUTE)?);
        assert_eq!(s.flags(), AttributeFlags::REFERENCES_OTHER_ATTRIBUTE);

        s.set_reinit_gui_on_value_change(true);
        s.set_reinit_object_on_value_change(true);
        assert_eq!(s.flag_bits(), 0b111);
        assert!(s.reinit_gui_on_value_change());
        assert!(s.reinit_object_on_value_change());

        s.set_reinit_gui_on_value_change(false);
        assert!(!s.flag(FLAGINDEX_REINIT_GUI_ON_VALUE_CHANGE)?);
        assert!(s.references_other_attribute());
        Ok(())
    }

    #[test]
    fn unknown_bits_are_retained() {
        let mut s = settings();
        s.set_flag_bits(0x8001);
        assert_eq!(s.flags().bits(), 0x8001);
        assert!(s.reinit_gui_on_value_change());
    }
}
