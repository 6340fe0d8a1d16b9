//! Component Graph
//!
//! This module implements the dependency graph that decides which components
//! recompute in a frame, and in what order.
//!
//! # Overview
//!
//! The graph is a directed acyclic graph (DAG) where:
//!
//! - Nodes wrap [`Component`]s together with their accumulated [`DirtMask`]
//! - Edges represent dependencies: if B reads from A, there is an edge from
//!   A to B
//!
//! Dirt enters through [`UpdateScheduler::add_dirt`] and travels along the
//! edges. An update pass then visits only the dirty components, dependencies
//! first.
//!
//! [`DirtMask`]: crate::dirt::DirtMask

mod component;
mod node;
mod scheduler;

pub use component::Component;
pub use node::{ComponentId, Node};
pub use scheduler::{UpdateReport, UpdateScheduler};
