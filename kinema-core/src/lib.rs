//! Kinema Core
//!
//! This crate provides the update core for the Kinema animation runtime.
//! It implements:
//!
//! - Component dirt: a set of invalidation reasons per component
//! - A dependency-ordered update scheduler that propagates dirt
//! - Cubic-bezier timing curves inverted through a lookup table and a
//!   Newton-Raphson / bisection solver
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `dirt`: [`DirtReason`] and the [`DirtMask`] set algebra
//! - `graph`: the [`Component`] contract and the [`UpdateScheduler`]
//! - `interp`: [`CubicInterpolator`] and its [`SolverConfig`]
//! - `import`: attaching components to an artboard during construction
//!
//! # Example
//!
//! ```rust
//! use kinema_core::{ArtboardImporter, CubicInterpolator, DirtReason, ImportStack};
//!
//! let mut artboard = ArtboardImporter::new();
//! let mut stack = ImportStack::with_artboard(&mut artboard);
//! let ease = CubicInterpolator::new(0.42, 0.0, 0.58, 1.0).import(&mut stack)?;
//!
//! let mut scheduler = artboard.finish();
//! scheduler.update()?;
//!
//! let curve = scheduler.component::<CubicInterpolator>(ease).unwrap();
//! assert!((curve.get_t(0.5) - 0.5).abs() < 1e-4);
//!
//! // Control point edits go through the dirt system.
//! scheduler.edit::<CubicInterpolator, _, _>(ease, DirtReason::Parameters, |c| c.set_x1(0.1))?;
//! scheduler.update()?;
//! # Ok::<(), kinema_core::Error>(())
//! ```

pub mod dirt;
pub mod error;
pub mod graph;
pub mod import;
pub mod interp;

pub use dirt::{DirtMask, DirtReason};
pub use error::{Error, Result, StatusCode};
pub use graph::{Component, ComponentId, UpdateReport, UpdateScheduler};
pub use import::{ArtboardImporter, ImportStack};
pub use interp::{CubicInterpolator, SharedInterpolator, Solution, SolveMethod, SolverConfig};
