//! Graph Import
//!
//! While a scene is being constructed, objects that must live inside an
//! artboard are attached through an [`ImportStack`]. The stack is passed down
//! explicitly; an object importing without an enclosing artboard fails with
//! [`Error::MissingObject`] and is left out of the graph.

use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::graph::{Component, ComponentId, UpdateScheduler};

/// Collects the components of one artboard while it is imported.
#[derive(Default)]
pub struct ArtboardImporter {
    scheduler: UpdateScheduler,
}

impl ArtboardImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a component. It will be included in the artboard's first
    /// update pass.
    pub fn add_component(&mut self, component: Box<dyn Component>) -> ComponentId {
        let id = self.scheduler.add_component(component);
        trace!(?id, "artboard importer attached component");
        id
    }

    /// Declare that `dependent` reads from `dependency`.
    pub fn add_dependency(
        &mut self,
        dependency: ComponentId,
        dependent: ComponentId,
    ) -> Result<()> {
        self.scheduler.add_dependency(dependency, dependent)
    }

    pub fn component_count(&self) -> usize {
        self.scheduler.component_count()
    }

    /// Finish the import and hand over the artboard's scheduler.
    pub fn finish(self) -> UpdateScheduler {
        self.scheduler
    }
}

/// The enclosing scopes available to an object being imported.
#[derive(Default)]
pub struct ImportStack<'a> {
    artboard: Option<&'a mut ArtboardImporter>,
}

impl<'a> ImportStack<'a> {
    /// A stack with no enclosing artboard.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artboard(artboard: &'a mut ArtboardImporter) -> Self {
        Self {
            artboard: Some(artboard),
        }
    }

    /// The enclosing artboard importer.
    pub fn artboard(&mut self) -> Result<&mut ArtboardImporter> {
        match self.artboard.as_deref_mut() {
            Some(artboard) => Ok(artboard),
            None => {
                warn!("import requires an enclosing artboard");
                Err(Error::MissingObject("artboard importer"))
            }
        }
    }

    /// Attach any component to the enclosing artboard.
    pub fn attach(&mut self, component: Box<dyn Component>) -> Result<ComponentId> {
        Ok(self.artboard()?.add_component(component))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatusCode;
    use crate::interp::CubicInterpolator;

    #[test]
    fn import_without_artboard_is_missing_object() {
        let mut stack = ImportStack::new();
        let result = CubicInterpolator::new(0.42, 0.0, 0.58, 1.0).import(&mut stack);

        let err = result.unwrap_err();
        assert!(matches!(err, Error::MissingObject(_)));
        assert_eq!(err.status(), StatusCode::MissingObject);
    }

    #[test]
    fn import_attaches_to_artboard() {
        let mut artboard = ArtboardImporter::new();
        let id = {
            let mut stack = ImportStack::with_artboard(&mut artboard);
            CubicInterpolator::new(0.42, 0.0, 0.58, 1.0)
                .import(&mut stack)
                .unwrap()
        };
        assert_eq!(artboard.component_count(), 1);

        let scheduler = artboard.finish();
        let curve = scheduler.component::<CubicInterpolator>(id).unwrap();
        assert!(!curve.is_built());
        assert!(scheduler.dirt(id).unwrap().is_filthy());
    }
}
