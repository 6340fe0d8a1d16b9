//! The contract between a scene-graph component and the update scheduler.

use std::any::Any;

use crate::dirt::DirtMask;
use crate::error::Result;

/// A node of the scene graph that recomputes in response to dirt.
///
/// The scheduler owns components as trait objects. `as_any` / `as_any_mut`
/// let hosts get the concrete type back.
pub trait Component: Send {
    /// Human-readable type name, used in logs.
    fn name(&self) -> &str {
        "Component"
    }

    /// Reasons whose arrival should trigger [`on_dirty`](Self::on_dirty).
    fn dirt_interest(&self) -> DirtMask {
        DirtMask::filthy()
    }

    /// Called when dirt intersecting [`dirt_interest`](Self::dirt_interest)
    /// is newly added. `added` holds only the reasons that were not already
    /// set.
    fn on_dirty(&mut self, _added: DirtMask) {}

    /// Called exactly once, the first time the component takes part in an
    /// update pass, before its first [`update`](Self::update).
    fn on_added_dirty(&mut self) -> Result<()> {
        Ok(())
    }

    /// Recompute for the dirt accumulated since the last pass.
    fn update(&mut self, dirt: DirtMask);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
