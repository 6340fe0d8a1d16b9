//! Error Types
//!
//! Structural failures (a missing import context, an unknown component, a
//! cyclic dependency graph) are reported through [`Error`]. Numerical edge
//! cases inside the easing solver are ordinary algorithm branches and never
//! surface here.

use thiserror::Error;

use crate::graph::ComponentId;

/// Errors produced while building or updating a component graph.
#[derive(Debug, Error)]
pub enum Error {
    /// A required enclosing object was not present in the import context.
    #[error("missing required {0} in import context")]
    MissingObject(&'static str),

    /// The component id is not registered with the scheduler.
    #[error("unknown component {0:?}")]
    UnknownComponent(ComponentId),

    /// The dependency graph contains a cycle, so no update order exists.
    #[error("dependency cycle detected: {remaining} components could not be ordered")]
    DependencyCycle { remaining: usize },

    /// A solver configuration value is out of range.
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),

    /// A solver configuration document could not be parsed.
    #[error("failed to parse solver configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse status reported to hosts that speak status codes instead of
/// `Result`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    MissingObject,
    InvalidObject,
}

impl Error {
    /// The status code a host should see for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::MissingObject(_) => StatusCode::MissingObject,
            Error::UnknownComponent(_)
            | Error::DependencyCycle { .. }
            | Error::InvalidConfig(_)
            | Error::ConfigParse(_) => StatusCode::InvalidObject,
        }
    }
}

impl<T> From<&Result<T>> for StatusCode {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => StatusCode::Ok,
            Err(err) => err.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_object_maps_to_its_status() {
        let result: Result<()> = Err(Error::MissingObject("artboard importer"));
        assert_eq!(StatusCode::from(&result), StatusCode::MissingObject);
    }

    #[test]
    fn ok_maps_to_ok() {
        let result: Result<u32> = Ok(7);
        assert_eq!(StatusCode::from(&result), StatusCode::Ok);
    }

    #[test]
    fn messages_name_the_problem() {
        let err = Error::DependencyCycle { remaining: 3 };
        assert!(err.to_string().contains("3 components"));
    }
}
