//! Built-in attribute value kinds.

use std::any::Any;

use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr, IntoStaticStr};

use crate::{
    attribute::Attribute,
    stream::{Endian, Stream, StreamExt},
    Error, Result,
};

/// The attribute kinds shipped with this crate.
///
/// The discriminant is the type tag written into full attribute blocks; the serialized name
/// is the type string used by the text encoding.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    FromRepr,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u32)]
pub enum AttributeKind {
    /// Single precision float
    #[strum(serialize = "AttributeFloat")]
    Float = 0x0000_0001,
    /// Signed 32-bit integer
    #[strum(serialize = "AttributeInt32")]
    Int32 = 0x0000_0002,
    /// UTF-8 string
    #[strum(serialize = "AttributeString")]
    String = 0x0000_0003,
    /// Boolean
    #[strum(serialize = "AttributeBool")]
    Bool = 0x0000_0004,
    /// Three single precision floats
    #[strum(serialize = "AttributeVector3")]
    Vector3 = 0x0000_0006,
}

impl AttributeKind {
    /// Type tag of this kind
    #[must_use]
    pub fn tag(self) -> u32 {
        self as u32
    }

    /// Type string of this kind
    #[must_use]
    pub fn type_string(self) -> &'static str {
        self.into()
    }

    /// Create a default-valued attribute of this kind
    #[must_use]
    pub fn create(self) -> Box<dyn Attribute> {
        match self {
            AttributeKind::Float => Box::new(AttributeFloat::default()),
            AttributeKind::Int32 => Box::new(AttributeInt32::default()),
            AttributeKind::String => Box::new(AttributeString::default()),
            AttributeKind::Bool => Box::new(AttributeBool::default()),
            AttributeKind::Vector3 => Box::new(AttributeVector3::default()),
        }
    }
}

fn check_version(kind: AttributeKind, version: u8) -> Result<()> {
    if version == 1 {
        Ok(())
    } else {
        Err(malformed_error!(
            "Unsupported {} payload version {}",
            kind,
            version
        ))
    }
}

fn parse_f32(kind: AttributeKind, text: &str) -> Result<f32> {
    text.trim()
        .parse::<f32>()
        .map_err(|_| malformed_error!("Invalid {} value '{}'", kind, text))
}

/// Boilerplate shared by every built-in kind: identity, cloning, same-kind copies, equality.
macro_rules! impl_attribute_common {
    ($kind:expr) => {
        fn type_tag(&self) -> u32 {
            $kind.tag()
        }

        fn type_string(&self) -> &'static str {
            $kind.type_string()
        }

        fn clone_box(&self) -> Box<dyn Attribute> {
            Box::new(self.clone())
        }

        fn init_from(&mut self, other: &dyn Attribute) -> Result<()> {
            match other.as_any().downcast_ref::<Self>() {
                Some(source) => {
                    self.clone_from(source);
                    Ok(())
                }
                None => Err(Error::TypeMismatch {
                    expected: self.type_string(),
                    found: other.type_string(),
                }),
            }
        }

        fn equals(&self, other: &dyn Attribute) -> bool {
            other
                .as_any()
                .downcast_ref::<Self>()
                .is_some_and(|other| self == other)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    };
}

/// Single precision float attribute
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeFloat {
    value: f32,
}

impl AttributeFloat {
    /// Create with an initial value
    #[must_use]
    pub fn new(value: f32) -> Self {
        AttributeFloat { value }
    }

    /// Current value
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Replace the value
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
    }
}

impl Attribute for AttributeFloat {
    impl_attribute_common!(AttributeKind::Float);

    fn convert_to_string(&self) -> Result<String> {
        Ok(self.value.to_string())
    }

    fn init_from_string(&mut self, value: &str) -> Result<()> {
        self.value = parse_f32(AttributeKind::Float, value)?;
        Ok(())
    }

    fn scale(&mut self, factor: f32) {
        self.value *= factor;
    }

    fn data_size(&self) -> usize {
        4
    }

    fn write_data(&self, stream: &mut dyn Stream, endian: Endian) -> Result<()> {
        stream.write_value(self.value, endian)
    }

    fn read_data(
        &mut self,
        stream: &mut dyn Stream,
        endian: Endian,
        version: u8,
        _size: u32,
    ) -> Result<()> {
        check_version(AttributeKind::Float, version)?;
        self.value = stream.read_value(endian)?;
        Ok(())
    }
}

/// Signed 32-bit integer attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeInt32 {
    value: i32,
}

impl AttributeInt32 {
    /// Create with an initial value
    #[must_use]
    pub fn new(value: i32) -> Self {
        AttributeInt32 { value }
    }

    /// Current value
    #[must_use]
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Replace the value
    pub fn set_value(&mut self, value: i32) {
        self.value = value;
    }
}

impl Attribute for AttributeInt32 {
    impl_attribute_common!(AttributeKind::Int32);

    fn convert_to_string(&self) -> Result<String> {
        Ok(self.value.to_string())
    }

    fn init_from_string(&mut self, value: &str) -> Result<()> {
        self.value = value
            .trim()
            .parse::<i32>()
            .map_err(|_| malformed_error!("Invalid {} value '{}'", AttributeKind::Int32, value))?;
        Ok(())
    }

    fn data_size(&self) -> usize {
        4
    }

    fn write_data(&self, stream: &mut dyn Stream, endian: Endian) -> Result<()> {
        stream.write_value(self.value, endian)
    }

    fn read_data(
        &mut self,
        stream: &mut dyn Stream,
        endian: Endian,
        version: u8,
        _size: u32,
    ) -> Result<()> {
        check_version(AttributeKind::Int32, version)?;
        self.value = stream.read_value(endian)?;
        Ok(())
    }
}

/// Boolean attribute, encoded as `1` / `0`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBool {
    value: bool,
}

impl AttributeBool {
    /// Create with an initial value
    #[must_use]
    pub fn new(value: bool) -> Self {
        AttributeBool { value }
    }

    /// Current value
    #[must_use]
    pub fn value(&self) -> bool {
        self.value
    }

    /// Replace the value
    pub fn set_value(&mut self, value: bool) {
        self.value = value;
    }
}

impl Attribute for AttributeBool {
    impl_attribute_common!(AttributeKind::Bool);

    fn convert_to_string(&self) -> Result<String> {
        Ok(if self.value { "1" } else { "0" }.to_string())
    }

    fn init_from_string(&mut self, value: &str) -> Result<()> {
        let text = value.trim();
        self.value = if text == "1" || text.eq_ignore_ascii_case("true") {
            true
        } else if text == "0" || text.eq_ignore_ascii_case("false") {
            false
        } else {
            return Err(malformed_error!(
                "Invalid {} value '{}'",
                AttributeKind::Bool,
                value
            ));
        };
        Ok(())
    }

    fn data_size(&self) -> usize {
        1
    }

    fn write_data(&self, stream: &mut dyn Stream, endian: Endian) -> Result<()> {
        stream.write_value(u8::from(self.value), endian)
    }

    fn read_data(
        &mut self,
        stream: &mut dyn Stream,
        endian: Endian,
        version: u8,
        _size: u32,
    ) -> Result<()> {
        check_version(AttributeKind::Bool, version)?;
        self.value = stream.read_value::<u8>(endian)? != 0;
        Ok(())
    }
}

/// String attribute. The text encoding is the string itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeString {
    value: String,
}

impl AttributeString {
    /// Create with an initial value
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        AttributeString {
            value: value.into(),
        }
    }

    /// Current value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

impl Attribute for AttributeString {
    impl_attribute_common!(AttributeKind::String);

    fn convert_to_string(&self) -> Result<String> {
        Ok(self.value.clone())
    }

    fn init_from_string(&mut self, value: &str) -> Result<()> {
        self.value = value.to_string();
        Ok(())
    }

    fn data_size(&self) -> usize {
        4 + self.value.len()
    }

    fn write_data(&self, stream: &mut dyn Stream, endian: Endian) -> Result<()> {
        stream.write_prefixed_string(&self.value, endian)
    }

    fn read_data(
        &mut self,
        stream: &mut dyn Stream,
        endian: Endian,
        version: u8,
        size: u32,
    ) -> Result<()> {
        check_version(AttributeKind::String, version)?;
        self.value = stream.read_prefixed_string(endian, size.saturating_sub(4))?;
        Ok(())
    }
}

/// Three component float vector, encoded as `x,y,z`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeVector3 {
    value: [f32; 3],
}

impl AttributeVector3 {
    /// Create with an initial value
    #[must_use]
    pub fn new(value: [f32; 3]) -> Self {
        AttributeVector3 { value }
    }

    /// Current value
    #[must_use]
    pub fn value(&self) -> [f32; 3] {
        self.value
    }

    /// Replace the value
    pub fn set_value(&mut self, value: [f32; 3]) {
        self.value = value;
    }
}

impl Attribute for AttributeVector3 {
    impl_attribute_common!(AttributeKind::Vector3);

    fn convert_to_string(&self) -> Result<String> {
        let [x, y, z] = self.value;
        Ok(format!("{x},{y},{z}"))
    }

    fn init_from_string(&mut self, value: &str) -> Result<()> {
        let parts: Vec<&str> = value.split(',').collect();
        if parts.len() != 3 {
            return Err(malformed_error!(
                "Invalid {} value '{}' - expected 3 components",
                AttributeKind::Vector3,
                value
            ));
        }

        for (slot, part) in self.value.iter_mut().zip(parts) {
            *slot = parse_f32(AttributeKind::Vector3, part)?;
        }
        Ok(())
    }

    fn scale(&mut self, factor: f32) {
        for component in &mut self.value {
            *component *= factor;
        }
    }

    fn data_size(&self) -> usize {
        12
    }

    fn write_data(&self, stream: &mut dyn Stream, endian: Endian) -> Result<()> {
        for component in self.value {
            stream.write_value(component, endian)?;
        }
        Ok(())
    }

    fn read_data(
        &mut self,
        stream: &mut dyn Stream,
        endian: Endian,
        version: u8,
        _size: u32,
    ) -> Result<()> {
        check_version(AttributeKind::Vector3, version)?;
        for component in &mut self.value {
            *component = stream.read_value(endian)?;
        }
        Ok(())
    }
}
