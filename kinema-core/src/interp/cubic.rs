//! Cubic Interpolator
//!
//! A cubic-bezier timing curve with fixed endpoints `(0, 0)` and `(1, 1)` and
//! two control points `(x1, y1)`, `(x2, y2)`.
//!
//! # Inversion
//!
//! Animations are sampled by linear time, so an eased progress `x` has to be
//! mapped back to the curve parameter `t` with `x(t) == x`. The x-coordinate
//! is pre-sampled at `N` uniformly spaced parameters. A query then:
//!
//! 1. Scans the table for the interval bracketing `x` and interpolates
//!    linearly inside it for an initial guess.
//! 2. Refines with Newton-Raphson when the curve is steep enough there.
//! 3. Returns the guess as-is on an exactly flat slope.
//! 4. Otherwise bisects the bracketing interval.
//!
//! Results are only meaningful for monotonic curves, i.e. `x1, x2 ∈ [0, 1]`.
//! Other control points may produce a non-monotonic table; that input domain
//! is left unspecified.

use std::any::Any;

use tracing::{debug, trace};

use super::config::SolverConfig;
use crate::dirt::{DirtMask, DirtReason};
use crate::error::Result;
use crate::graph::{Component, ComponentId};
use crate::import::ImportStack;

/// Default number of samples in the lookup table.
pub const SPLINE_TABLE_SIZE: usize = 11;

/// Returns x(t) given t, x1, and x2, or y(t) given t, y1, and y2.
#[inline]
pub fn calc_bezier(t: f32, a1: f32, a2: f32) -> f32 {
    (((1.0 - 3.0 * a2 + 3.0 * a1) * t + (3.0 * a2 - 6.0 * a1)) * t + (3.0 * a1)) * t
}

/// Returns dx/dt given t, x1, and x2, or dy/dt given t, y1, and y2.
#[inline]
pub fn slope(t: f32, a1: f32, a2: f32) -> f32 {
    3.0 * (1.0 - 3.0 * a2 + 3.0 * a1) * t * t + 2.0 * (3.0 * a2 - 6.0 * a1) * t + (3.0 * a1)
}

/// Which branch of the solver produced a [`Solution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMethod {
    /// Newton-Raphson refinement of the table guess.
    Newton,
    /// The slope at the table guess was exactly zero; returned unrefined.
    Flat,
    /// Bisection of the bracketing table interval.
    Bisection,
}

/// The parameter found for a query, and how it was found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub t: f32,
    pub method: SolveMethod,
    /// Refinement steps actually performed.
    pub iterations: u32,
}

/// A cubic-bezier timing curve with an `N`-sample inverse lookup table.
#[derive(Debug, Clone)]
pub struct CubicInterpolator<const N: usize = SPLINE_TABLE_SIZE> {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,

    config: SolverConfig,

    /// `table[i] == calc_bezier(i * STEP, x1, x2)` once built.
    table: [f32; N],

    /// The `(x1, x2)` the table was last built from. `None` until the first
    /// build.
    built_for: Option<(f32, f32)>,

    rebuilds: u32,
}

impl CubicInterpolator {
    /// Create an unbuilt curve with the default table resolution.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::from_points(x1, y1, x2, y2)
    }
}

impl<const N: usize> CubicInterpolator<N> {
    const TABLE_IS_USABLE: () = assert!(N >= 3, "spline table needs at least three samples");

    /// Parameter distance between two table samples.
    pub const STEP: f32 = 1.0 / (N - 1) as f32;

    /// Create an unbuilt curve with a table of `N` samples.
    pub fn from_points(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let () = Self::TABLE_IS_USABLE;

        Self {
            x1,
            y1,
            x2,
            y2,
            config: SolverConfig::default(),
            table: [0.0; N],
            built_for: None,
            rebuilds: 0,
        }
    }

    /// Use `config` for every subsequent query.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn x1(&self) -> f32 {
        self.x1
    }

    pub fn y1(&self) -> f32 {
        self.y1
    }

    pub fn x2(&self) -> f32 {
        self.x2
    }

    pub fn y2(&self) -> f32 {
        self.y2
    }

    /// Control points as `[x1, y1, x2, y2]`.
    pub fn control_points(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    // The setters only store the coordinate. The table is rebuilt when the
    // owning graph delivers `DirtReason::Parameters`.

    pub fn set_x1(&mut self, value: f32) {
        self.x1 = value;
    }

    pub fn set_y1(&mut self, value: f32) {
        self.y1 = value;
    }

    pub fn set_x2(&mut self, value: f32) {
        self.x2 = value;
    }

    pub fn set_y2(&mut self, value: f32) {
        self.y2 = value;
    }

    /// Whether the table has been built at least once.
    pub fn is_built(&self) -> bool {
        self.built_for.is_some()
    }

    /// Whether the x control coordinates changed since the last build.
    pub fn is_stale(&self) -> bool {
        self.built_for != Some((self.x1, self.x2))
    }

    /// How many times the table has been built.
    pub fn rebuild_count(&self) -> u32 {
        self.rebuilds
    }

    pub fn table(&self) -> &[f32; N] {
        &self.table
    }

    /// Recompute every table sample from the current control points.
    pub fn build_table(&mut self) {
        let (x1, x2) = (self.x1, self.x2);
        for (i, value) in self.table.iter_mut().enumerate() {
            *value = calc_bezier(i as f32 * Self::STEP, x1, x2);
        }
        self.built_for = Some((x1, x2));
        self.rebuilds += 1;

        debug!(x1, x2, samples = N, rebuilds = self.rebuilds, "built spline table");
    }

    /// The curve parameter `t` whose x-coordinate is `x`.
    pub fn get_t(&self, x: f32) -> f32 {
        self.solve(x).t
    }

    /// Like [`get_t`](Self::get_t), also reporting the solver branch taken.
    pub fn solve(&self, x: f32) -> Solution {
        debug_assert!(self.is_built(), "queried a cubic interpolator before its table was built");

        let (x1, x2) = (self.x1, self.x2);
        let config = &self.config;

        // Largest sample not past `x`, never the final one.
        let last_sample = N - 1;
        let mut current = 1;
        while current != last_sample && self.table[current] <= x {
            current += 1;
        }
        current -= 1;

        let mut interval_start = current as f32 * Self::STEP;
        let dist = (x - self.table[current]) / (self.table[current + 1] - self.table[current]);
        let mut guess = interval_start + dist * Self::STEP;

        let initial_slope = slope(guess, x1, x2);

        if initial_slope >= config.newton_min_slope {
            let mut iterations = 0;
            while iterations < config.newton_iterations {
                let current_slope = slope(guess, x1, x2);
                if current_slope == 0.0 {
                    break;
                }
                guess -= (calc_bezier(guess, x1, x2) - x) / current_slope;
                iterations += 1;
            }
            trace!(x, t = guess, iterations, "newton");
            Solution {
                t: guess,
                method: SolveMethod::Newton,
                iterations,
            }
        } else if initial_slope == 0.0 {
            trace!(x, t = guess, "flat slope");
            Solution {
                t: guess,
                method: SolveMethod::Flat,
                iterations: 0,
            }
        } else {
            let mut interval_end = interval_start + Self::STEP;
            let mut iterations = 0;
            let t = loop {
                let mid = interval_start + (interval_end - interval_start) / 2.0;
                let residual = calc_bezier(mid, x1, x2) - x;
                if residual > 0.0 {
                    interval_end = mid;
                } else {
                    interval_start = mid;
                }
                iterations += 1;

                if residual.abs() <= config.subdivision_precision
                    || iterations >= config.subdivision_max_iterations
                {
                    break mid;
                }
            };
            trace!(x, t, iterations, "bisection");
            Solution {
                t,
                method: SolveMethod::Bisection,
                iterations,
            }
        }
    }

    /// Eased progress for linear progress `x`.
    pub fn transform(&self, x: f32) -> f32 {
        calc_bezier(self.get_t(x), self.y1, self.y2)
    }

    /// Blend from `from` to `to` by the eased progress of `x`.
    pub fn transform_value(&self, from: f32, to: f32, x: f32) -> f32 {
        from + (to - from) * self.transform(x)
    }
}

impl<const N: usize> CubicInterpolator<N> {
    /// Attach this curve to the artboard being imported.
    ///
    /// Fails with [`Error::MissingObject`](crate::Error::MissingObject) when
    /// the stack has no artboard; the curve is then dropped unattached.
    pub fn import(self, stack: &mut ImportStack<'_>) -> Result<ComponentId> {
        let artboard = stack.artboard()?;
        Ok(artboard.add_component(Box::new(self)))
    }
}

impl<const N: usize> Component for CubicInterpolator<N> {
    fn name(&self) -> &str {
        "CubicInterpolator"
    }

    fn dirt_interest(&self) -> DirtMask {
        DirtReason::Parameters.into()
    }

    fn on_dirty(&mut self, added: DirtMask) {
        trace!(?added, x1 = self.x1, x2 = self.x2, "control points dirtied");
    }

    fn on_added_dirty(&mut self) -> Result<()> {
        self.build_table();
        Ok(())
    }

    fn update(&mut self, dirt: DirtMask) {
        if dirt.has(DirtReason::Parameters) && self.is_stale() {
            self.build_table();
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
