//! Interned string identifiers shared by attribute settings.
//!
//! Names and combo values are stored as small [`StringId`] handles that resolve through a
//! [`StringIdPool`]. The pool is a shared service: it is passed explicitly (usually as an
//! `Arc<StringIdPool>`) to every settings object, so tests can use isolated pools.
//!
//! Interning works through `&self` and is safe from multiple threads. The forward index
//! (string to id) lives in a [`DashMap`], the reverse table (id to string) in an append-only
//! [`boxcar::Vec`], so resolved names stay borrowable while other threads keep interning.

use std::fmt;

use dashmap::DashMap;

/// Handle of an interned string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StringId(pub u32);

impl StringId {
    /// Sentinel value meaning "unset". It always resolves to the empty string.
    pub const INVALID: StringId = StringId(u32::MAX);

    /// Raw id value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns true unless this is [`StringId::INVALID`]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl Default for StringId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "StringId({})", self.0)
        } else {
            write!(f, "StringId(INVALID)")
        }
    }
}

/// Thread-safe string interning pool.
///
/// # Examples
///
/// ```rust
/// use attrsettings::{StringId, StringIdPool};
///
/// let pool = StringIdPool::new();
/// let id = pool.generate_id_for_string("speed");
/// assert_eq!(pool.generate_id_for_string("speed"), id);
/// assert_eq!(pool.name(id), "speed");
/// assert_eq!(pool.name(StringId::INVALID), "");
/// ```
#[derive(Default)]
pub struct StringIdPool {
    ids: DashMap<String, StringId>,
    names: boxcar::Vec<String>,
}

impl StringIdPool {
    /// Create an empty pool
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `value` and return its id. Interning the same string again yields the same id.
    ///
    /// The empty string is a regular entry and receives a valid id.
    pub fn generate_id_for_string(&self, value: &str) -> StringId {
        if let Some(id) = self.ids.get(value) {
            return *id;
        }

        *self
            .ids
            .entry(value.to_string())
            .or_insert_with(|| StringId(self.names.push(value.to_string()) as u32))
    }

    /// Resolve an id to its string.
    ///
    /// [`StringId::INVALID`] and ids unknown to this pool resolve to the empty string.
    #[must_use]
    pub fn name(&self, id: StringId) -> &str {
        if !id.is_valid() {
            return "";
        }

        self.names
            .get(id.0 as usize)
            .map_or("", String::as_str)
    }

    /// Look up the id of an already interned string without interning it
    #[must_use]
    pub fn find(&self, value: &str) -> Option<StringId> {
        self.ids.get(value).map(|id| *id)
    }

    /// Number of interned strings
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.count()
    }

    /// Returns true if nothing has been interned yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for StringIdPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringIdPool")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn intern_is_idempotent() {
        let pool = StringIdPool::new();
        let a = pool.generate_id_for_string("blend");
        let b = pool.generate_id_for_string("weight");
        assert_ne!(a, b);
        assert_eq!(pool.generate_id_for_string("blend"), a);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.name(b), "weight");
    }

    #[test]
    fn empty_string_is_valid() {
        let pool = StringIdPool::new();
        let id = pool.generate_id_for_string("");
        assert!(id.is_valid());
        assert_eq!(pool.name(id), "");
        assert_eq!(pool.find(""), Some(id));
    }

    #[test]
    fn unknown_ids_resolve_empty() {
        let pool = StringIdPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.name(StringId::INVALID), "");
        assert_eq!(pool.name(StringId(12)), "");
        assert_eq!(pool.find("missing"), None);
        assert_eq!(format!("{:?}", StringId::default()), "StringId(INVALID)");
    }

    #[test]
    fn concurrent_interning() {
        let pool = Arc::new(StringIdPool::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    (0..64)
                        .map(|i| pool.generate_id_for_string(&format!("name{}", i % 16)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let results: Vec<Vec<StringId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for result in &results[1..] {
            assert_eq!(result, &results[0]);
        }
        assert_eq!(pool.len(), 16);
        for (i, id) in results[0].iter().take(16).enumerate() {
            assert_eq!(pool.name(*id), format!("name{i}"));
        }
    }
}
