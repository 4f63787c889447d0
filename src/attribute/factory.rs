//! Registry that creates attribute values by type string or type tag.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::attribute::{Attribute, AttributeKind};

/// Constructor producing a default-valued attribute of one kind
pub type AttributeConstructor = fn() -> Box<dyn Attribute>;

struct Registration {
    type_string: &'static str,
    constructor: AttributeConstructor,
}

/// Creates [`Attribute`] values from the identifiers found in encoded settings.
///
/// Type strings are matched ASCII case-insensitively. A tag and a type string each belong to at
/// most one registration: registering either again replaces every earlier registration that
/// used it.
///
/// # Examples
///
/// ```rust
/// use attrsettings::{AttributeFactory, AttributeKind};
///
/// let factory = AttributeFactory::with_builtin();
/// let value = factory.create_by_type_string("AttributeFloat").unwrap();
/// assert_eq!(value.type_tag(), AttributeKind::Float.tag());
/// assert!(factory.create_by_type_string("AttributeMatrix").is_none());
/// ```
#[derive(Default)]
pub struct AttributeFactory {
    by_tag: HashMap<u32, Registration>,
    by_name: HashMap<String, u32>,
}

impl AttributeFactory {
    /// Create a factory without any registered kind
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory with every [`AttributeKind`] registered
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut factory = Self::new();
        for kind in AttributeKind::iter() {
            let constructor: AttributeConstructor = match kind {
                AttributeKind::Float => || AttributeKind::Float.create(),
                AttributeKind::Int32 => || AttributeKind::Int32.create(),
                AttributeKind::String => || AttributeKind::String.create(),
                AttributeKind::Bool => || AttributeKind::Bool.create(),
                AttributeKind::Vector3 => || AttributeKind::Vector3.create(),
            };
            factory.register(kind.tag(), kind.type_string(), constructor);
        }
        factory
    }

    /// Register a kind under its type tag and type string
    pub fn register(
        &mut self,
        type_tag: u32,
        type_string: &'static str,
        constructor: AttributeConstructor,
    ) {
        let key = type_string.to_ascii_lowercase();
        if let Some(owner) = self.by_name.get(&key).copied() {
            if owner != type_tag {
                log::debug!("Type string '{type_string}' moves from tag {owner:#x} to {type_tag:#x}");
                self.by_tag.remove(&owner);
            }
        }

        if let Some(previous) = self.by_tag.insert(
            type_tag,
            Registration {
                type_string,
                constructor,
            },
        ) {
            let previous_key = previous.type_string.to_ascii_lowercase();
            if self.by_name.get(&previous_key) == Some(&type_tag) {
                self.by_name.remove(&previous_key);
            }
        }
        self.by_name.insert(key, type_tag);
    }

    /// Create a value from its type string, `None` if unknown
    #[must_use]
    pub fn create_by_type_string(&self, type_string: &str) -> Option<Box<dyn Attribute>> {
        let tag = self.by_name.get(&type_string.to_ascii_lowercase())?;
        self.create_by_type_tag(*tag)
    }

    /// Create a value from its type tag, `None` if unknown
    #[must_use]
    pub fn create_by_type_tag(&self, type_tag: u32) -> Option<Box<dyn Attribute>> {
        self.by_tag
            .get(&type_tag)
            .map(|registration| (registration.constructor)())
    }

    /// Returns true if `type_tag` is registered
    #[must_use]
    pub fn contains(&self, type_tag: u32) -> bool {
        self.by_tag.contains_key(&type_tag)
    }

    /// Returns true if `type_string` is registered
    #[must_use]
    pub fn contains_type_string(&self, type_string: &str) -> bool {
        self.by_name
            .contains_key(&type_string.to_ascii_lowercase())
    }

    /// Registered type strings, sorted
    #[must_use]
    pub fn type_strings(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.by_tag.values().map(|r| r.type_string).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered kinds
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// Returns true if no kind is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

impl std::fmt::Debug for AttributeFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeFactory")
            .field("types", &self.type_strings())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeInt32;
    use strum::EnumCount;

    #[test]
    fn builtin_kinds() {
        let factory = AttributeFactory::with_builtin();
        assert_eq!(factory.len(), AttributeKind::COUNT);
        assert!(factory.contains(AttributeKind::Vector3.tag()));
        assert!(factory.contains_type_string("attributebool"));

        let value = factory.create_by_type_string("ATTRIBUTEINT32").unwrap();
        assert_eq!(value.type_string(), "AttributeInt32");
        assert!(factory.create_by_type_tag(0x1234).is_none());
        assert_eq!(
            factory.type_strings(),
            vec![
                "AttributeBool",
                "AttributeFloat",
                "AttributeInt32",
                "AttributeString",
                "AttributeVector3"
            ]
        );
    }

    #[test]
    fn empty_factory() {
        let factory = AttributeFactory::new();
        assert!(factory.is_empty());
        assert!(factory.create_by_type_string("AttributeFloat").is_none());
    }

    #[test]
    fn register_replaces_tag() {
        let mut factory = AttributeFactory::new();
        factory.register(100, "Counter", || Box::new(AttributeInt32::new(0)));
        assert!(factory.create_by_type_string("counter").is_some());

        factory.register(100, "Tally", || Box::new(AttributeInt32::new(0)));
        assert_eq!(factory.len(), 1);
        assert!(!factory.contains_type_string("Counter"));
        assert!(factory.create_by_type_string("Tally").is_some());
    }

    #[test]
    fn register_moves_type_string() {
        let mut factory = AttributeFactory::new();
        factory.register(1, "Alpha", || Box::new(AttributeInt32::new(1)));
        factory.register(2, "Alpha", || Box::new(AttributeInt32::new(2)));
        assert_eq!(factory.len(), 1);
        assert!(!factory.contains(1));

        factory.register(1, "Beta", || Box::new(AttributeInt32::new(3)));
        assert_eq!(factory.len(), 2);
        assert!(factory.contains(2));

        let alpha = factory.create_by_type_string("alpha").unwrap();
        assert!(alpha.equals(&AttributeInt32::new(2)));
        let beta = factory.create_by_type_string("Beta").unwrap();
        assert!(beta.equals(&AttributeInt32::new(3)));
        assert_eq!(factory.type_strings(), vec!["Alpha", "Beta"]);
    }
}
