//! Arena of nested attribute values.
//!
//! Compound attributes own child values, and each child is described by an
//! [`AttributeSettings`] stored beside it in the parent. Settings refer back to the parent
//! through an [`AttributeHandle`] instead of a pointer; the handle carries a generation counter,
//! so a handle to a removed node stops resolving even after its slot has been reused.

use std::fmt;

use crate::{
    attribute::Attribute,
    settings::AttributeSettings,
    Error, Result,
};

/// Handle to a node of an [`AttributeGraph`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeHandle {
    idx: u32,
    generation: u32,
}

impl AttributeHandle {
    /// Slot index, for diagnostics
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Generation counter of the slot at creation time
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for AttributeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttributeHandle({}@gen{})", self.idx, self.generation)
    }
}

#[derive(Debug)]
struct Node {
    value: Box<dyn Attribute>,
    parent: Option<AttributeHandle>,
    // `children[i]` is described by `child_settings[i]`
    children: Vec<AttributeHandle>,
    child_settings: Vec<AttributeSettings>,
}

#[derive(Debug)]
struct Entry {
    generation: u32,
    node: Option<Node>,
}

/// Owning store of attribute values and their parent / child topology.
///
/// # Examples
///
/// ```rust
/// use attrsettings::{AttributeFloat, AttributeGraph, AttributeSettings, AttributeString, StringIdPool};
/// use std::sync::Arc;
///
/// let pool = Arc::new(StringIdPool::new());
/// let mut graph = AttributeGraph::new();
///
/// let material = graph.insert_root(Box::new(AttributeString::new("steel")));
/// let settings = AttributeSettings::with_internal_name(Arc::clone(&pool), "roughness");
/// let roughness = graph.add_child(material, Box::new(AttributeFloat::new(0.4)), settings)?;
///
/// assert_eq!(graph.parent_of(roughness), Some(material));
/// assert_eq!(graph.settings_of(roughness).unwrap().internal_name(), "roughness");
/// # Ok::<(), attrsettings::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct AttributeGraph {
    entries: Vec<Entry>,
    free_list: Vec<u32>,
    len: usize,
}

impl AttributeGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value without a parent
    pub fn insert_root(&mut self, value: Box<dyn Attribute>) -> AttributeHandle {
        self.allocate(Node {
            value,
            parent: None,
            children: Vec::new(),
            child_settings: Vec::new(),
        })
    }

    /// Insert `value` as the last child of `parent`, described by `settings`.
    ///
    /// The parent of `settings` is set to `parent`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHandle`] if `parent` is not a live node.
    pub fn add_child(
        &mut self,
        parent: AttributeHandle,
        value: Box<dyn Attribute>,
        mut settings: AttributeSettings,
    ) -> Result<AttributeHandle> {
        if !self.contains(parent) {
            return Err(Error::InvalidHandle);
        }

        settings.set_parent(Some(parent));
        let child = self.allocate(Node {
            value,
            parent: Some(parent),
            children: Vec::new(),
            child_settings: Vec::new(),
        });

        let node = self.node_mut(parent).ok_or(Error::InvalidHandle)?;
        node.children.push(child);
        node.child_settings.push(settings);
        Ok(child)
    }

    /// Remove a node together with its subtree and return its value.
    ///
    /// The node is detached from its parent, dropping the settings that described it.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHandle`] if `handle` is not a live node.
    pub fn remove(&mut self, handle: AttributeHandle) -> Result<Box<dyn Attribute>> {
        let parent = self.node(handle).ok_or(Error::InvalidHandle)?.parent;

        if let Some(parent) = parent {
            if let Some(node) = self.node_mut(parent) {
                if let Some(index) = node.children.iter().position(|c| *c == handle) {
                    node.children.remove(index);
                    node.child_settings.remove(index);
                }
            }
        }

        let mut pending = vec![handle];
        let mut removed = None;
        while let Some(current) = pending.pop() {
            let Some(node) = self.release(current) else {
                continue;
            };
            pending.extend(node.children.iter().copied());
            if current == handle {
                removed = Some(node.value);
            }
        }

        removed.ok_or(Error::InvalidHandle)
    }

    /// Returns true if `handle` refers to a live node
    #[must_use]
    pub fn contains(&self, handle: AttributeHandle) -> bool {
        self.node(handle).is_some()
    }

    /// Value of a node
    #[must_use]
    pub fn get(&self, handle: AttributeHandle) -> Option<&dyn Attribute> {
        self.node(handle).map(|node| node.value.as_ref())
    }

    /// Mutable value of a node
    pub fn get_mut(&mut self, handle: AttributeHandle) -> Option<&mut (dyn Attribute + 'static)> {
        self.node_mut(handle).map(|node| node.value.as_mut())
    }

    /// Parent of a node, `None` for roots and stale handles
    #[must_use]
    pub fn parent_of(&self, handle: AttributeHandle) -> Option<AttributeHandle> {
        self.node(handle)?.parent
    }

    /// Children of a node in insertion order
    #[must_use]
    pub fn children(&self, handle: AttributeHandle) -> &[AttributeHandle] {
        self.node(handle)
            .map_or(&[][..], |node| node.children.as_slice())
    }

    /// Position of `child` within the children of `parent`
    #[must_use]
    pub fn find_attribute_index_by_value(
        &self,
        parent: AttributeHandle,
        child: AttributeHandle,
    ) -> Option<usize> {
        self.node(parent)?.children.iter().position(|c| *c == child)
    }

    /// Settings describing the child at `index` of `parent`
    #[must_use]
    pub fn child_attribute_settings(
        &self,
        parent: AttributeHandle,
        index: usize,
    ) -> Option<&AttributeSettings> {
        self.node(parent)?.child_settings.get(index)
    }

    /// Mutable settings describing the child at `index` of `parent`
    pub fn child_attribute_settings_mut(
        &mut self,
        parent: AttributeHandle,
        index: usize,
    ) -> Option<&mut AttributeSettings> {
        self.node_mut(parent)?.child_settings.get_mut(index)
    }

    /// Settings describing a node within its parent, `None` for roots
    #[must_use]
    pub fn settings_of(&self, handle: AttributeHandle) -> Option<&AttributeSettings> {
        let parent = self.parent_of(handle)?;
        let index = self.find_attribute_index_by_value(parent, handle)?;
        self.child_attribute_settings(parent, index)
    }

    /// Dot separated internal names from the outermost described ancestor down to `handle`,
    /// e.g. `materialList.myMaterial.specularColor`. Unnamed levels are skipped.
    #[must_use]
    pub fn build_hierarchical_name(&self, handle: AttributeHandle) -> String {
        let mut names = Vec::new();
        let mut current = self.settings_of(handle);
        while let Some(settings) = current {
            let name = settings.internal_name();
            if !name.is_empty() {
                names.push(name);
            }
            current = settings.find_parent_settings(self);
        }

        names.reverse();
        names.join(".")
    }

    /// Number of live nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the graph has no live node
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn allocate(&mut self, node: Node) -> AttributeHandle {
        self.len += 1;
        if let Some(idx) = self.free_list.pop() {
            let entry = &mut self.entries[idx as usize];
            entry.node = Some(node);
            return AttributeHandle {
                idx,
                generation: entry.generation,
            };
        }

        let idx = self.entries.len() as u32;
        self.entries.push(Entry {
            generation: 0,
            node: Some(node),
        });
        AttributeHandle { idx, generation: 0 }
    }

    fn release(&mut self, handle: AttributeHandle) -> Option<Node> {
        let entry = self.entries.get_mut(handle.idx as usize)?;
        if entry.generation != handle.generation {
            return None;
        }

        let node = entry.node.take()?;
        // Bump so handles to this slot fail validation once it is reused.
        entry.generation = entry.generation.wrapping_add(1);
        self.free_list.push(handle.idx);
        self.len -= 1;
        Some(node)
    }

    fn node(&self, handle: AttributeHandle) -> Option<&Node> {
        self.entries
            .get(handle.idx as usize)
            .filter(|entry| entry.generation == handle.generation)?
            .node
            .as_ref()
    }

    fn node_mut(&mut self, handle: AttributeHandle) -> Option<&mut Node> {
        self.entries
            .get_mut(handle.idx as usize)
            .filter(|entry| entry.generation == handle.generation)?
            .node
            .as_mut()
    }
}
