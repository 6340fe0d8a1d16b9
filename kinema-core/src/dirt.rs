//! Component Dirt
//!
//! Every component in the graph carries a [`DirtMask`]: the set of reasons it
//! needs to recompute this frame. Masks are plain values, combined across a
//! frame and cleared once the component has updated.
//!
//! # Escalation
//!
//! Dirt is never silent. [`DirtMask::combine`] enforces that any reason other
//! than [`DirtReason::Components`] also raises `Components` (so the update
//! cycle runs), and that any reason other than the two base reasons also
//! raises [`DirtReason::Dependents`]. Raw masks built with `From<DirtReason>`
//! are not escalated; they are the arguments fed into `combine`.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, BitXor, Not};

use flagset::{flags, FlagSet};

flags! {
    /// Why a component needs to recompute.
    pub enum DirtReason: u16 {
        /// Dependents of this component need to be visited.
        Dependents,
        /// General flag for dirty components. If this is up, the update
        /// cycle runs. Applied automatically with any other dirt.
        Components,
        /// Draw order needs to be re-computed.
        DrawOrder,
        /// Path is dirty and needs to be rebuilt.
        Path,
        /// Vertices have changed, re-order cached lists.
        Vertices,
        /// Local transform needs recomputing. Usually implies
        /// `WorldTransform` as well.
        Transform,
        /// World transform needs recomputing.
        WorldTransform,
        /// Stored render opacity needs to be updated.
        RenderOpacity,
        /// Stored paint needs rebuilding, or an update cycle is wanted so
        /// painting occurs.
        Paint,
        /// Gradient stops need to be re-ordered.
        Stops,
        /// Control parameters (e.g. interpolator control points) changed.
        Parameters,
    }
}

/// A set of [`DirtReason`]s.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DirtMask(FlagSet<DirtReason>);

impl DirtMask {
    /// No dirt.
    pub fn none() -> Self {
        Self(FlagSet::default())
    }

    /// Every reason set. Forces a full recomputation.
    pub fn filthy() -> Self {
        Self(FlagSet::full())
    }

    /// Build a mask from raw bits, dropping bits that name no reason.
    pub fn from_bits_truncate(bits: u16) -> Self {
        Self(FlagSet::new_truncated(bits))
    }

    /// The raw bit representation.
    pub fn bits(self) -> u16 {
        self.0.bits()
    }

    pub fn is_none(self) -> bool {
        self.0.is_empty()
    }

    pub fn is_filthy(self) -> bool {
        self == Self::filthy()
    }

    /// Union of two masks, with the escalation rule applied.
    pub fn combine(self, other: impl Into<DirtMask>) -> Self {
        let mut set = self.0 | other.into().0;

        let components = FlagSet::from(DirtReason::Components);
        let base = components | FlagSet::from(DirtReason::Dependents);

        if !(set & !components).is_empty() {
            set |= components;
        }
        if !(set & !base).is_empty() {
            set |= FlagSet::from(DirtReason::Dependents);
        }

        Self(set)
    }

    /// Reasons present in both masks.
    pub fn intersect(self, other: impl Into<DirtMask>) -> Self {
        Self(self.0 & other.into().0)
    }

    /// Reasons present in exactly one of the masks.
    pub fn difference(self, other: impl Into<DirtMask>) -> Self {
        Self(self.0 ^ other.into().0)
    }

    /// Complement over the defined reasons.
    pub fn invert(self) -> Self {
        Self(FlagSet::full() & !self.0)
    }

    /// Whether any of `reasons` is set.
    pub fn has(self, reasons: impl Into<DirtMask>) -> bool {
        !self.intersect(reasons).is_none()
    }

    /// This mask with `reasons` cleared.
    pub fn without(self, reasons: impl Into<DirtMask>) -> Self {
        self.intersect(reasons.into().invert())
    }

    /// Iterate over the reasons in this mask, lowest bit first.
    pub fn reasons(self) -> impl Iterator<Item = DirtReason> {
        self.0.into_iter()
    }
}

impl Default for DirtMask {
    fn default() -> Self {
        Self::none()
    }
}

impl From<DirtReason> for DirtMask {
    fn from(reason: DirtReason) -> Self {
        Self(FlagSet::from(reason))
    }
}

impl fmt::Debug for DirtMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_filthy() {
            return f.write_str("DirtMask(Filthy)");
        }
        f.debug_tuple("DirtMask")
            .field(&self.reasons().collect::<Vec<_>>())
            .finish()
    }
}

impl<R: Into<DirtMask>> BitOr<R> for DirtMask {
    type Output = DirtMask;

    fn bitor(self, rhs: R) -> DirtMask {
        self.combine(rhs)
    }
}

impl<R: Into<DirtMask>> BitOrAssign<R> for DirtMask {
    fn bitor_assign(&mut self, rhs: R) {
        *self = self.combine(rhs);
    }
}

impl<R: Into<DirtMask>> BitAnd<R> for DirtMask {
    type Output = DirtMask;

    fn bitand(self, rhs: R) -> DirtMask {
        self.intersect(rhs)
    }
}

impl<R: Into<DirtMask>> BitXor<R> for DirtMask {
    type Output = DirtMask;

    fn bitxor(self, rhs: R) -> DirtMask {
        self.difference(rhs)
    }
}

impl Not for DirtMask {
    type Output = DirtMask;

    fn not(self) -> DirtMask {
        self.invert()
    }
}
