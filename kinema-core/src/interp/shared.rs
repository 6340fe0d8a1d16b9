//! Shared Interpolator
//!
//! Hosts that drive the graph from several threads wrap a curve in a
//! [`SharedInterpolator`]. Rebuilds happen on a private copy that is swapped
//! in under the write lock, so a reader never observes a half-written table.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::cubic::{CubicInterpolator, SPLINE_TABLE_SIZE};

/// A reference-counted cubic interpolator safe to query across threads.
#[derive(Debug)]
pub struct SharedInterpolator<const N: usize = SPLINE_TABLE_SIZE> {
    inner: Arc<RwLock<CubicInterpolator<N>>>,
}

impl<const N: usize> SharedInterpolator<N> {
    /// Share `curve`, building its table first if it has never been built.
    pub fn new(mut curve: CubicInterpolator<N>) -> Self {
        if !curve.is_built() {
            curve.build_table();
        }
        Self {
            inner: Arc::new(RwLock::new(curve)),
        }
    }

    pub fn get_t(&self, x: f32) -> f32 {
        self.inner.read().get_t(x)
    }

    pub fn transform(&self, x: f32) -> f32 {
        self.inner.read().transform(x)
    }

    /// A copy of the current curve.
    pub fn snapshot(&self) -> CubicInterpolator<N> {
        self.inner.read().clone()
    }

    /// Apply `edit` to a copy of the curve, rebuild the copy's table, and
    /// publish it.
    pub fn rebuild_with<F>(&self, edit: F)
    where
        F: FnOnce(&mut CubicInterpolator<N>),
    {
        let mut next = self.snapshot();
        edit(&mut next);
        next.build_table();

        *self.inner.write() = next;
        debug!("published rebuilt spline table");
    }
}

impl<const N: usize> Clone for SharedInterpolator<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
