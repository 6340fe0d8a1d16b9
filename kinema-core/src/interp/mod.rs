//! Interpolators
//!
//! Timing curves that map linear animation progress to eased progress.
//!
//! - [`CubicInterpolator`]: cubic-bezier curve inverted through a lookup
//!   table and a Newton-Raphson / bisection solver
//! - [`SharedInterpolator`]: a curve that can be rebuilt while other threads
//!   keep querying it
//! - [`SolverConfig`]: per-curve numeric tuning

mod config;
mod cubic;
mod shared;

pub use config::SolverConfig;
pub use cubic::{calc_bezier, slope, CubicInterpolator, Solution, SolveMethod, SPLINE_TABLE_SIZE};
pub use shared::SharedInterpolator;
