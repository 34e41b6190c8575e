//! Error taxonomy for the compilation pipeline.
//!
//! Every failure is fatal to the invocation: the pipeline either completes one
//! deterministic pass or aborts with one of these errors. Each variant carries
//! enough context (document key path, element id, or file path) for the
//! operator to fix the offending input.

use std::path::PathBuf;

/// Errors produced by configuration loading, resolution, and output writing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required key is missing or a value has the wrong shape.
    #[error("schema error at `{path}`: {message}")]
    Schema { path: String, message: String },

    /// An element references a cube definition that does not exist.
    #[error("element `{element}` references unknown cube `{cube}`")]
    UnknownReference { element: String, cube: String },

    /// The per-cuboid style lists disagree with the cube definition's
    /// mapping-entry count.
    #[error(
        "element `{element}`: cube definition has {expected} mapping entries, \
         but got {colors} color sets and {line_widths} line widths"
    )]
    ArityMismatch {
        element: String,
        expected: usize,
        colors: usize,
        line_widths: usize,
    },

    /// The output skeleton does not contain the substitution marker.
    #[error("marker `{marker}` not found in skeleton `{}`", path.display())]
    MarkerNotFound { path: PathBuf, marker: String },

    /// A file could not be read or written.
    #[error("io error on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
