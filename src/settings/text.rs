//! `-key {value}` text encoding of [`AttributeSettings`].
//!
//! ```text
//! -name {Speed} -internalName {speed} -comboValues {slow;fast;} -interfaceType 3 -flags 0 -defaultValue {-type AttributeFloat -value {1.5} }
//! ```
//!
//! Keys are written in a fixed order. Name, internal name, description and combo values are
//! omitted when empty, and a value slot is omitted when it holds no value. On decode, omitted
//! fields reset to empty; `-interfaceType` and `-flags` are required.

use std::fmt::Write;

use crate::{
    attribute::{Attribute, AttributeFactory},
    commandline::CommandLine,
    config::CodecConfig,
    settings::{AttributeFlags, AttributeSettings, Slot},
    Error, Result,
};

const COMBO_SEPARATOR: char = ';';

impl AttributeSettings {
    /// Encode as text with the default configuration.
    ///
    /// # Errors
    /// Returns the error of the first value that cannot be encoded as text.
    pub fn convert_to_string(&self) -> Result<String> {
        self.convert_to_string_with(&CodecConfig::default())
    }

    /// Encode as text.
    ///
    /// # Errors
    /// Returns the error of the first value that cannot be encoded as text, or
    /// [`Error::Malformed`] if a field would not survive decoding: unbalanced braces in any
    /// braced field, or a `;` inside a combo value.
    pub fn convert_to_string_with(&self, config: &CodecConfig) -> Result<String> {
        self.encode_text(config).map_err(|error| {
            log::error!(
                "Failed to convert attribute settings '{}' to a string: {}",
                self.internal_name(),
                error
            );
            error
        })
    }

    fn encode_text(&self, config: &CodecConfig) -> Result<String> {
        let mut out = String::with_capacity(256);

        for (key, value) in [
            ("name", self.name()),
            ("internalName", self.internal_name()),
            ("description", self.description()),
        ] {
            if !value.is_empty() {
                check_braces(key, value)?;
                let _ = write!(out, "-{key} {{{value}}} ");
            }
        }

        if !self.combo_values.is_empty() {
            let mut joined = String::new();
            for (index, value) in self.combo_value_strings().enumerate() {
                if value.contains(COMBO_SEPARATOR) {
                    return Err(malformed_error!(
                        "Combo value {} contains the separator '{}' - '{}'",
                        index,
                        COMBO_SEPARATOR,
                        value
                    ));
                }
                check_braces("comboValues", value)?;
                if index > 0 {
                    joined.push(COMBO_SEPARATOR);
                }
                joined.push_str(value);
            }

            out.push_str("-comboValues {");
            out.push_str(&joined);
            if config.trailing_combo_separator {
                out.push(COMBO_SEPARATOR);
            }
            out.push_str("} ");
        }

        let _ = write!(
            out,
            "-interfaceType {} -flags {} ",
            self.interface_type,
            self.flags.bits()
        );

        for slot in [Slot::Default, Slot::Min, Slot::Max] {
            let Some(value) = self.value(slot) else {
                continue;
            };

            let encoded = value.convert_to_string()?;
            check_braces(slot.key(), &encoded)?;
            let _ = write!(
                out,
                "-{} {{-type {} -value {{{}}} }} ",
                slot.key(),
                value.type_string(),
                encoded
            );
        }

        Ok(out)
    }

    /// Decode text with the default configuration, replacing the content of `self`.
    ///
    /// On failure the record is reset to the empty state (the parent is kept).
    ///
    /// # Errors
    /// Returns [`Error::MissingParameter`] if `-interfaceType`, `-flags` or a nested `-type` /
    /// `-value` is absent, [`Error::UnknownAttributeType`] if the factory cannot create a value
    /// kind, or [`Error::Malformed`] for invalid text.
    pub fn init_from_string(&mut self, text: &str, factory: &AttributeFactory) -> Result<()> {
        self.init_from_string_with(text, factory, &CodecConfig::default())
    }

    /// Decode text produced with `config`.
    ///
    /// # Errors
    /// See [`AttributeSettings::init_from_string`].
    pub fn init_from_string_with(
        &mut self,
        text: &str,
        factory: &AttributeFactory,
        config: &CodecConfig,
    ) -> Result<()> {
        self.reset();
        if let Err(error) = self.parse_text(text, factory, config) {
            log::error!(
                "Failed to init attribute settings '{}' from a string: {}",
                self.internal_name(),
                error
            );
            self.reset();
            return Err(error);
        }
        Ok(())
    }

    fn parse_text(&mut self, text: &str, factory: &AttributeFactory, config: &CodecConfig) -> Result<()> {
        let cmd = CommandLine::parse(text)?;

        self.set_internal_name(cmd.value_or("internalName", ""));
        match cmd.value("name") {
            Some(name) if !name.is_empty() => self.set_name(name),
            _ => {}
        }
        self.set_description(cmd.value_or("description", ""));

        let interface_type = cmd
            .value_as_i64("interfaceType")?
            .ok_or_else(|| Error::MissingParameter("interfaceType".to_string()))?;
        // -1 is accepted as an alias of the default interface type
        if interface_type < i64::from(i32::MIN) || interface_type > i64::from(u32::MAX) {
            return Err(malformed_error!(
                "Interface type {} is out of range",
                interface_type
            ));
        }
        self.interface_type = interface_type as u32;

        let flags = cmd
            .value_as_i64("flags")?
            .ok_or_else(|| Error::MissingParameter("flags".to_string()))?;
        let bits = u16::try_from(flags)
            .map_err(|_| malformed_error!("Flags value {} is out of range", flags))?;
        self.flags = AttributeFlags::from_bits_retain(bits);

        if let Some(combos) = cmd.value("comboValues") {
            let list = if config.trailing_combo_separator {
                if combos.is_empty() {
                    None
                } else {
                    Some(combos.strip_suffix(COMBO_SEPARATOR).unwrap_or(combos))
                }
            } else {
                Some(combos)
            };

            if let Some(list) = list {
                for value in list.split(COMBO_SEPARATOR) {
                    self.add_combo_value(value);
                }
            }
        }

        for slot in [Slot::Default, Slot::Min, Slot::Max] {
            let value = match cmd.value(slot.key()) {
                Some(block) if !block.is_empty() => Some(parse_value(block, factory)?),
                _ => None,
            };
            self.set_value(slot, value);
        }
        Ok(())
    }
}

/// Braced content must nest, otherwise it would end its block early on decode
fn check_braces(key: &str, value: &str) -> Result<()> {
    let mut depth = 0usize;
    for c in value.bytes() {
        match c {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    malformed_error!("Unbalanced '}}' in '-{}' value '{}'", key, value)
                })?;
            }
            _ => {}
        }
    }

    if depth == 0 {
        Ok(())
    } else {
        Err(malformed_error!("Unbalanced '{{' in '-{}' value '{}'", key, value))
    }
}

/// Decode a nested `-type T -value {V}` block
fn parse_value(block: &str, factory: &AttributeFactory) -> Result<Box<dyn Attribute>> {
    let cmd = CommandLine::parse(block)?;

    let type_string = cmd.value_or("type", "");
    if type_string.is_empty() {
        return Err(Error::MissingParameter("type".to_string()));
    }
    let encoded = cmd
        .value("value")
        .ok_or_else(|| Error::MissingParameter("value".to_string()))?;

    let mut value = factory
        .create_by_type_string(type_string)
        .ok_or_else(|| Error::UnknownAttributeType(type_string.to_string()))?;
    value.init_from_string(encoded)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        attribute::{AttributeBool, AttributeFloat, AttributeInt32, AttributeString, AttributeVector3},
        pool::StringIdPool,
        settings::DEFAULT_INTERFACE_TYPE,
    };
    use std::sync::Arc;

    fn pool() -> Arc<StringIdPool> {
        Arc::new(StringIdPool::new())
    }

    fn speed(pool: &Arc<StringIdPool>) -> AttributeSettings {
        let mut settings = AttributeSettings::with_internal_name(Arc::clone(pool), "speed");
        settings.set_name("Speed");
        settings.set_interface_type(3);
        settings.add_combo_value("slow");
        settings.add_combo_value("fast");
        settings.set_default_value(Some(Box::new(AttributeFloat::new(1.5))));
        settings
    }

    #[test]
    fn encoded_form() -> Result<()> {
        let pool = pool();
        let mut settings = speed(&pool);
        settings.set_max_value(Some(Box::new(AttributeInt32::new(-4))));

        assert_eq!(
            settings.convert_to_string()?,
            "-name {Speed} -internalName {speed} -comboValues {slow;fast;} -interfaceType 3 -flags 0 \
             -defaultValue {-type AttributeFloat -value {1.5} } -maxValue {-type AttributeInt32 -value {-4} } "
        );
        assert_eq!(
            settings.convert_to_string_with(&CodecConfig::canonical())?,
            "-name {Speed} -internalName {speed} -comboValues {slow;fast} -interfaceType 3 -flags 0 \
             -defaultValue {-type AttributeFloat -value {1.5} } -maxValue {-type AttributeInt32 -value {-4} } "
        );
        Ok(())
    }

    #[test]
    fn empty_record_encoding() -> Result<()> {
        let settings = AttributeSettings::new(pool());
        assert_eq!(
            settings.convert_to_string()?,
            "-interfaceType 4294967295 -flags 0 "
        );
        Ok(())
    }

    #[test]
    fn roundtrip() -> Result<()> {
        let pool = pool();
        let factory = AttributeFactory::with_builtin();
        let mut original = speed(&pool);
        original.set_description("Walk speed in { m/s }");
        original.set_flag_bits(0x0006);
        original.set_min_value(Some(Box::new(AttributeVector3::new([0.0, -1.5, 2.0]))));
        original.set_max_value(Some(Box::new(AttributeString::new(" padded "))));

        let text = original.convert_to_string()?;
        let mut decoded = AttributeSettings::new(Arc::clone(&pool));
        decoded.init_from_string(&text, &factory)?;
        assert_eq!(decoded, original);
        Ok(())
    }

    #[test]
    fn combo_lists_with_empty_entries() -> Result<()> {
        let pool = pool();
        let factory = AttributeFactory::with_builtin();

        for entries in [vec![""], vec!["a", ""], vec!["", " ", "b"], vec!["single"]] {
            for config in [CodecConfig::default(), CodecConfig::canonical()] {
                let mut original = AttributeSettings::new(Arc::clone(&pool));
                for entry in &entries {
                    original.add_combo_value(entry);
                }

                let text = original.convert_to_string_with(&config)?;
                let mut decoded = AttributeSettings::new(Arc::clone(&pool));
                decoded.init_from_string_with(&text, &factory, &config)?;
                assert_eq!(
                    decoded.combo_value_strings().collect::<Vec<_>>(),
                    entries,
                    "{text}"
                );
            }
        }
        Ok(())
    }

    #[test]
    fn name_falls_back_when_absent() -> Result<()> {
        let factory = AttributeFactory::with_builtin();
        let mut settings = AttributeSettings::new(pool());
        settings.init_from_string("-internalName {pose} -interfaceType 0 -flags 1", &factory)?;
        assert_eq!(settings.name(), "pose");
        assert_eq!(settings.interface_type(), 0);
        assert!(settings.reinit_gui_on_value_change());

        settings.init_from_string("-interfaceType -1 -flags 0", &factory)?;
        assert_eq!(settings.internal_name(), "");
        assert_eq!(settings.name(), "");
        assert_eq!(settings.interface_type(), DEFAULT_INTERFACE_TYPE);
        Ok(())
    }

    #[test]
    fn required_parameters() {
        let pool = pool();
        let factory = AttributeFactory::with_builtin();

        for text in [
            "-internalName {speed} -flags 0",
            "-internalName {speed} -interfaceType 3",
            "-internalName {speed} -interfaceType -flags 0",
        ] {
            let mut settings = speed(&pool);
            assert!(settings.init_from_string(text, &factory).is_err(), "{text}");
            assert_eq!(settings, AttributeSettings::new(Arc::clone(&pool)));
        }

        let mut settings = AttributeSettings::new(Arc::clone(&pool));
        assert!(matches!(
            settings.init_from_string("-flags 0", &factory),
            Err(Error::MissingParameter(ref name)) if name == "interfaceType"
        ));
        assert!(matches!(
            settings.init_from_string("-interfaceType 1", &factory),
            Err(Error::MissingParameter(ref name)) if name == "flags"
        ));
    }

    #[test]
    fn out_of_range_numbers() {
        let factory = AttributeFactory::with_builtin();
        let mut settings = AttributeSettings::new(pool());
        assert!(settings
            .init_from_string("-interfaceType 1 -flags 65536", &factory)
            .is_err());
        assert!(settings
            .init_from_string("-interfaceType 1 -flags -1", &factory)
            .is_err());
        assert!(settings
            .init_from_string("-interfaceType 4294967296 -flags 0", &factory)
            .is_err());
    }

    #[test]
    fn slot_failures_roll_back() {
        let pool = pool();
        let factory = AttributeFactory::with_builtin();
        let head = "-internalName {speed} -interfaceType 3 -flags 0 \
                    -defaultValue {-type AttributeFloat -value {1} } ";

        let cases = [
            ("-minValue {-value {1}}", "type"),
            ("-minValue {-type AttributeFloat}", "value"),
            ("-maxValue {-type AttributeMatrix -value {1}}", "unknown"),
            ("-maxValue {-type AttributeFloat -value {fast}}", "malformed"),
        ];

        for (tail, kind) in cases {
            let mut settings = speed(&pool);
            let result = settings.init_from_string(&format!("{head}{tail}"), &factory);
            match kind {
                "type" | "value" => assert!(
                    matches!(result, Err(Error::MissingParameter(ref name)) if name == kind)
                ),
                "unknown" => assert!(matches!(result, Err(Error::UnknownAttributeType(_)))),
                _ => assert!(matches!(result, Err(Error::Malformed { .. }))),
            }
            assert!(settings.default_value().is_none());
            assert!(settings.min_value().is_none());
            assert_eq!(settings.internal_name(), "");
        }
    }

    #[test]
    fn absent_slots_are_cleared() -> Result<()> {
        let pool = pool();
        let factory = AttributeFactory::with_builtin();
        let mut settings = speed(&pool);
        settings.set_max_value(Some(Box::new(AttributeBool::new(true))));

        settings.init_from_string(
            "-internalName {speed} -interfaceType 3 -flags 0 -minValue {-type AttributeBool -value {1}}",
            &factory,
        )?;
        assert!(settings.default_value().is_none());
        assert!(settings.min_value().unwrap().equals(&AttributeBool::new(true)));
        assert!(settings.max_value().is_none());
        assert_eq!(settings.num_combo_values(), 0);
        Ok(())
    }

    #[test]
    fn empty_value_is_present() -> Result<()> {
        let factory = AttributeFactory::with_builtin();
        let mut settings = AttributeSettings::new(pool());
        settings.init_from_string(
            "-interfaceType 0 -flags 0 -defaultValue {-type AttributeString -value {} }",
            &factory,
        )?;
        assert!(settings
            .default_value()
            .unwrap()
            .equals(&AttributeString::new("")));
        Ok(())
    }

    #[test]
    fn malformed_text() {
        let factory = AttributeFactory::with_builtin();
        let mut settings = AttributeSettings::new(pool());
        assert!(matches!(
            settings.init_from_string("-interfaceType 0 -flags 0 -name {open", &factory),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn unbalanced_braces_are_not_encoded() {
        let pool = pool();
        let mut settings = speed(&pool);
        settings.set_description("x} -flags {9");
        assert!(matches!(
            settings.convert_to_string(),
            Err(Error::Malformed { .. })
        ));

        let mut settings = speed(&pool);
        settings.set_name("open {");
        assert!(matches!(
            settings.convert_to_string(),
            Err(Error::Malformed { .. })
        ));

        let mut settings = speed(&pool);
        settings.set_default_value(Some(Box::new(AttributeString::new("a}b"))));
        assert!(matches!(
            settings.convert_to_string(),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn balanced_braces_roundtrip() -> Result<()> {
        let pool = pool();
        let factory = AttributeFactory::with_builtin();
        let mut settings = speed(&pool);
        settings.set_description("uses {nested {braces}} -flags {9}");
        settings.set_default_value(Some(Box::new(AttributeString::new("{a} {b}"))));

        let text = settings.convert_to_string()?;
        let mut decoded = AttributeSettings::new(Arc::clone(&pool));
        decoded.init_from_string(&text, &factory)?;
        assert_eq!(decoded.description(), "uses {nested {braces}} -flags {9}");
        assert_eq!(decoded.flags(), settings.flags());
        assert!(decoded
            .default_value()
            .unwrap()
            .equals(&AttributeString::new("{a} {b}")));
        Ok(())
    }

    #[test]
    fn combo_separator_in_value() {
        let pool = pool();
        let mut settings = speed(&pool);
        settings.add_combo_value("a;b");
        assert!(matches!(
            settings.convert_to_string(),
            Err(Error::Malformed { .. })
        ));
    }
}
