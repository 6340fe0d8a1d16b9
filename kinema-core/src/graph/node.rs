//! Graph Nodes
//!
//! This module defines the node type that wraps each component in the
//! dependency graph.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use super::component::Component;
use crate::dirt::DirtMask;

/// Unique identifier for a component in the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Generate a new unique component ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u64> for ComponentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Most components have only a handful of edges.
pub(crate) type EdgeList = SmallVec<[ComponentId; 4]>;

/// A component in the dependency graph, with its dirt and edges.
pub struct Node {
    /// Unique identifier for this node.
    id: ComponentId,

    component: Box<dyn Component>,

    /// Dirt accumulated since the last update pass.
    dirt: DirtMask,

    /// Whether `on_added_dirty` has already run.
    added: bool,

    /// Components this one depends on (parents in the DAG).
    dependencies: EdgeList,

    /// Components that depend on this one (children in the DAG).
    dependents: EdgeList,
}

impl Node {
    /// Wrap a component. New nodes start filthy so their first pass runs.
    pub fn new(component: Box<dyn Component>) -> Self {
        Self {
            id: ComponentId::new(),
            component,
            dirt: DirtMask::filthy(),
            added: false,
            dependencies: EdgeList::new(),
            dependents: EdgeList::new(),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn component(&self) -> &dyn Component {
        self.component.as_ref()
    }

    pub fn component_mut(&mut self) -> &mut dyn Component {
        self.component.as_mut()
    }

    pub(crate) fn into_component(self) -> Box<dyn Component> {
        self.component
    }

    pub fn dirt(&self) -> DirtMask {
        self.dirt
    }

    pub fn is_clean(&self) -> bool {
        self.dirt.is_none()
    }

    pub fn is_added(&self) -> bool {
        self.added
    }

    pub(crate) fn mark_added(&mut self) {
        self.added = true;
    }

    /// Combine `reasons` into this node's dirt.
    ///
    /// Returns the reasons that were not already set. The component's
    /// `on_dirty` hook fires when those intersect its interest.
    pub fn add_dirt(&mut self, reasons: DirtMask) -> DirtMask {
        let next = self.dirt.combine(reasons);
        let added = next.intersect(self.dirt.invert());
        if added.is_none() {
            return added;
        }
        self.dirt = next;

        if added.has(self.component.dirt_interest()) {
            self.component.on_dirty(added);
        }
        added
    }

    /// Take the accumulated dirt, leaving the node clean.
    pub fn take_dirt(&mut self) -> DirtMask {
        std::mem::take(&mut self.dirt)
    }

    /// Add a dependency (a component this one reads from).
    pub fn add_dependency(&mut self, id: ComponentId) {
        if !self.dependencies.contains(&id) {
            self.dependencies.push(id);
        }
    }

    pub fn remove_dependency(&mut self, id: ComponentId) {
        self.dependencies.retain(|dep| *dep != id);
    }

    pub fn dependencies(&self) -> &[ComponentId] {
        &self.dependencies
    }

    /// Add a dependent (a component that reads from this one).
    pub fn add_dependent(&mut self, id: ComponentId) {
        if !self.dependents.contains(&id) {
            self.dependents.push(id);
        }
    }

    pub fn remove_dependent(&mut self, id: ComponentId) {
        self.dependents.retain(|dep| *dep != id);
    }

    pub fn dependents(&self) -> &[ComponentId] {
        &self.dependents
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("component", &self.component.name())
            .field("dirt", &self.dirt)
            .field("added", &self.added)
            .field("dependencies", &self.dependencies)
            .field("dependents", &self.dependents)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirt::DirtReason;
    use std::any::Any;

    /// Records every `on_dirty` call.
    #[derive(Default)]
    struct Recorder {
        interest: Option<DirtMask>,
        seen: Vec<DirtMask>,
    }

    impl Component for Recorder {
        fn dirt_interest(&self) -> DirtMask {
            self.interest.unwrap_or_else(DirtMask::filthy)
        }

        fn on_dirty(&mut self, added: DirtMask) {
            self.seen.push(added);
        }

        fn update(&mut self, _dirt: DirtMask) {}

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn recorder(node: &Node) -> &Recorder {
        node.component().as_any().downcast_ref().unwrap()
    }

    #[test]
    fn component_ids_are_unique() {
        let id1 = ComponentId::new();
        let id2 = ComponentId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn new_node_starts_filthy() {
        let node = Node::new(Box::new(Recorder::default()));
        assert!(node.dirt().is_filthy());
        assert!(!node.is_added());
    }

    #[test]
    fn add_dirt_reports_only_new_reasons() {
        let mut node = Node::new(Box::new(Recorder::default()));
        node.take_dirt();
        assert!(node.is_clean());

        let added = node.add_dirt(DirtReason::Path.into());
        assert!(added.has(DirtReason::Path));
        assert!(added.has(DirtReason::Components));

        // Path is already set; only Paint is new.
        let added = node.add_dirt(DirtMask::from(DirtReason::Path) | DirtReason::Paint);
        assert!(added.has(DirtReason::Paint));
        assert!(!added.has(DirtReason::Path));

        assert!(node.add_dirt(DirtReason::Path.into()).is_none());
        assert_eq!(recorder(&node).seen.len(), 2);
    }

    #[test]
    fn on_dirty_respects_interest() {
        let mut node = Node::new(Box::new(Recorder {
            interest: Some(DirtReason::Parameters.into()),
            ..Recorder::default()
        }));
        node.take_dirt();

        node.add_dirt(DirtReason::Transform.into());
        assert!(recorder(&node).seen.is_empty());

        node.add_dirt(DirtReason::Parameters.into());
        assert_eq!(recorder(&node).seen.len(), 1);
        assert!(recorder(&node).seen[0].has(DirtReason::Parameters));
    }

    #[test]
    fn dependency_management() {
        let mut node = Node::new(Box::new(Recorder::default()));
        let dep1 = ComponentId::new();
        let dep2 = ComponentId::new();

        node.add_dependency(dep1);
        node.add_dependency(dep2);
        node.add_dependency(dep1);

        assert!(node.dependencies().contains(&dep1));
        assert!(node.dependencies().contains(&dep2));
        assert_eq!(node.dependencies().len(), 2);

        node.remove_dependency(dep1);
        assert!(!node.dependencies().contains(&dep1));
        assert_eq!(node.dependencies().len(), 1);
    }
}
