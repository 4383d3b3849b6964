//! Error types for the benchmark toolkit.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

//------------ Error ----------------------------------------------------------

/// An error constructing or exporting a benchmark run.
///
/// Individual query failures are never reported through this type. They are
/// recorded in the [`Measurement`][crate::measurement::Measurement] they
/// belong to instead.
#[derive(Clone, Debug)]
pub enum Error {
    /// The engine was constructed without any providers.
    NoProviders,

    /// The engine was constructed without any domains.
    NoDomains,

    /// A provider key is not present in the registry.
    UnknownProvider(String),

    /// Writing an export file gave an error.
    Io(Arc<std::io::Error>),

    /// Serializing measurements gave an error.
    Json(Arc<serde_json::Error>),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Error::NoProviders => {
                write!(f, "at least one provider is required")
            }
            Error::NoDomains => {
                write!(f, "at least one domain is required")
            }
            Error::UnknownProvider(key) => {
                write!(f, "unknown provider '{}'", key)
            }
            Error::Io(err) => write!(f, "error writing export file: {}", err),
            Error::Json(err) => {
                write!(f, "error serializing measurements: {}", err)
            }
        }
    }
}

impl error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(Arc::new(err))
    }
}
