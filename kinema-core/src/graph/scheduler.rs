//! Update Scheduler
//!
//! The scheduler owns the components of a graph, accumulates their dirt, and
//! runs update passes in dependency order.
//!
//! # Algorithm
//!
//! 1. `add_dirt` combines reasons into a component's mask. With `recurse`,
//!    the same reasons are pushed breadth-first to every transitive
//!    dependent. A component that already has every reason stops the push
//!    there, so each frame touches each edge at most once.
//! 2. `update` walks the components in topological order (dependencies
//!    before dependents). Each dirty component gets its one-time
//!    `on_added_dirty` hook if it has never been updated, then `update` with
//!    its accumulated dirt, and is left clean.
//!
//! The topological order is cached and only recomputed after the graph's
//! shape changes.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use super::component::Component;
use super::node::{ComponentId, Node};
use crate::dirt::DirtMask;
use crate::error::{Error, Result};

/// Components visited by one update pass, in the order they were updated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub updated: Vec<ComponentId>,
}

impl UpdateReport {
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.updated.contains(&id)
    }

    /// Position of `id` in the pass, if it was updated.
    pub fn position(&self, id: ComponentId) -> Option<usize> {
        self.updated.iter().position(|&updated| updated == id)
    }
}

/// The update scheduler manages the dependency graph and coordinates updates.
#[derive(Default)]
pub struct UpdateScheduler {
    /// All nodes in the graph, in insertion order.
    nodes: IndexMap<ComponentId, Node>,

    /// Cached topological order; `None` after any change to the graph shape.
    order: Option<Vec<ComponentId>>,
}

impl UpdateScheduler {
    /// Create a new empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component to the graph. It starts filthy.
    pub fn add_component(&mut self, component: Box<dyn Component>) -> ComponentId {
        let node = Node::new(component);
        let id = node.id();
        trace!(?id, component = node.component().name(), "added component");
        self.nodes.insert(id, node);
        self.order = None;
        id
    }

    /// Remove a component and every edge involving it.
    pub fn remove_component(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        let node = self.nodes.shift_remove(&id)?;

        for dep_id in node.dependencies() {
            if let Some(dep) = self.nodes.get_mut(dep_id) {
                dep.remove_dependent(id);
            }
        }
        for dependent_id in node.dependents() {
            if let Some(dependent) = self.nodes.get_mut(dependent_id) {
                dependent.remove_dependency(id);
            }
        }

        self.order = None;
        Some(node.into_component())
    }

    pub fn node(&self, id: ComponentId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// The component `id`, if it exists and is a `T`.
    pub fn component<T: Component + 'static>(&self, id: ComponentId) -> Option<&T> {
        self.nodes.get(&id)?.component().as_any().downcast_ref()
    }

    pub fn component_mut<T: Component + 'static>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.nodes
            .get_mut(&id)?
            .component_mut()
            .as_any_mut()
            .downcast_mut()
    }

    /// Current dirt of `id`.
    pub fn dirt(&self, id: ComponentId) -> Option<DirtMask> {
        self.nodes.get(&id).map(Node::dirt)
    }

    /// Whether any component is waiting for an update pass.
    pub fn has_dirt(&self) -> bool {
        self.nodes.values().any(|node| !node.is_clean())
    }

    /// Declare that `dependent` reads from `dependency`.
    pub fn add_dependency(
        &mut self,
        dependency: ComponentId,
        dependent: ComponentId,
    ) -> Result<()> {
        self.require(dependency)?;
        self.require(dependent)?;

        if let Some(dep_node) = self.nodes.get_mut(&dependency) {
            dep_node.add_dependent(dependent);
        }
        if let Some(dependent_node) = self.nodes.get_mut(&dependent) {
            dependent_node.add_dependency(dependency);
        }
        self.order = None;
        Ok(())
    }

    pub fn remove_dependency(&mut self, dependency: ComponentId, dependent: ComponentId) {
        if let Some(dep_node) = self.nodes.get_mut(&dependency) {
            dep_node.remove_dependent(dependent);
        }
        if let Some(dependent_node) = self.nodes.get_mut(&dependent) {
            dependent_node.remove_dependency(dependency);
        }
        self.order = None;
    }

    /// Add `reasons` to the dirt of `id`, and with `recurse` to every
    /// component that transitively depends on it.
    ///
    /// Returns `false` if `id` already had every reason.
    pub fn add_dirt(
        &mut self,
        id: ComponentId,
        reasons: impl Into<DirtMask>,
        recurse: bool,
    ) -> Result<bool> {
        self.require(id)?;
        let reasons = reasons.into();

        let mut changed = false;
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([id]);

        while let Some(node_id) = queue.pop_front() {
            if !visited.insert(node_id) {
                continue;
            }
            let Some(node) = self.nodes.get_mut(&node_id) else {
                continue;
            };

            let added = node.add_dirt(reasons);
            if added.is_none() {
                continue;
            }
            trace!(id = ?node_id, ?added, "dirt added");

            if node_id == id {
                changed = true;
            }
            if recurse {
                queue.extend(node.dependents().iter().copied());
            }
        }

        Ok(changed)
    }

    /// Mutate component `id` and route the change through the dirt system.
    ///
    /// `reasons` are added with propagation to dependents after `edit`
    /// returns.
    pub fn edit<T, R, F>(
        &mut self,
        id: ComponentId,
        reasons: impl Into<DirtMask>,
        edit: F,
    ) -> Result<R>
    where
        T: Component + 'static,
        F: FnOnce(&mut T) -> R,
    {
        let component = self
            .component_mut::<T>(id)
            .ok_or(Error::UnknownComponent(id))?;
        let output = edit(component);
        self.add_dirt(id, reasons, true)?;
        Ok(output)
    }

    /// Run one update pass over every dirty component.
    ///
    /// An error from a component's `on_added_dirty` aborts the pass; that
    /// component and everything after it keep their dirt.
    pub fn update(&mut self) -> Result<UpdateReport> {
        let order = self.sorted()?;
        let mut report = UpdateReport::default();

        for id in order {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            if node.is_clean() {
                continue;
            }

            if !node.is_added() {
                node.component_mut().on_added_dirty()?;
                node.mark_added();
            }

            let dirt = node.take_dirt();
            node.component_mut().update(dirt);
            report.updated.push(id);
        }

        debug!(updated = report.updated.len(), "update pass complete");
        Ok(report)
    }

    /// Components in dependency order.
    pub fn sorted(&mut self) -> Result<Vec<ComponentId>> {
        if let Some(order) = &self.order {
            return Ok(order.clone());
        }
        let order = self.topological_sort()?;
        self.order = Some(order.clone());
        Ok(order)
    }

    /// Kahn's algorithm over the whole graph.
    fn topological_sort(&self) -> Result<Vec<ComponentId>> {
        let mut in_degree: HashMap<ComponentId, usize> = HashMap::new();
        let mut result = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::new();

        for (&id, node) in &self.nodes {
            let degree = node
                .dependencies()
                .iter()
                .filter(|dep| self.nodes.contains_key(*dep))
                .count();
            in_degree.insert(id, degree);
            if degree == 0 {
                queue.push_back(id);
            }
        }

        while let Some(id) = queue.pop_front() {
            result.push(id);

            if let Some(node) = self.nodes.get(&id) {
                for dependent_id in node.dependents() {
                    if let Some(degree) = in_degree.get_mut(dependent_id) {
                        *degree = degree.saturating_sub(1);
                        if *degree == 0 {
                            queue.push_back(*dependent_id);
                        }
                    }
                }
            }
        }

        if result.len() < self.nodes.len() {
            let remaining = self.nodes.len() - result.len();
            warn!(remaining, "dependency cycle in component graph");
            return Err(Error::DependencyCycle { remaining });
        }
        Ok(result)
    }

    /// Get the total number of components in the graph.
    pub fn component_count(&self) -> usize {
        self.nodes.len()
    }

    fn require(&self, id: ComponentId) -> Result<()> {
        if self.nodes.contains_key(&id) {
            Ok(())
        } else {
            Err(Error::UnknownComponent(id))
        }
    }
}
