//! Error kinds raised while reordering GAMESS matrices into the host basis convention.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;

/// Enumerated type for the fatal errors of a single basis-reordering invocation.
///
/// None of these are retried: each aborts the invocation and is propagated to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum EfpGamessError {
    /// The GAMESS result file could not be found or opened.
    MissingInputFile(PathBuf),

    /// A group or dataset is absent from the GAMESS result file. The associated values are the
    /// group path and the dataset name (empty if the group itself is missing).
    MissingDataset { group: String, dataset: String },

    /// The input data are malformed, *e.g.* a packed triangle of the wrong length.
    MalformedInput(String),

    /// Matrix dimensions disagree with each other or with the basis sizes of the wavefunction.
    DimensionMismatch(String),

    /// The transformation-matrix provider failed or returned nothing.
    ExternalProviderFailure(String),

    /// A basis shell has an angular momentum for which no transformation is defined.
    UnsupportedAngularMomentum(u32),

    /// A procedure option has an invalid value.
    InvalidOption { key: String, reason: String },

    /// No procedure has been registered under the requested name.
    UnknownProcedure(String),
}

impl EfpGamessError {
    /// Returns `true` if the error arises from invalid caller-supplied data rather than from a
    /// missing resource or a failing collaborator.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            EfpGamessError::MalformedInput(_)
                | EfpGamessError::DimensionMismatch(_)
                | EfpGamessError::UnsupportedAngularMomentum(_)
                | EfpGamessError::InvalidOption { .. }
        )
    }
}

impl fmt::Display for EfpGamessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EfpGamessError::MissingInputFile(path) => {
                write!(f, "Input file `{}` not found or unreadable.", path.display())
            }
            EfpGamessError::MissingDataset { group, dataset } => {
                if dataset.is_empty() {
                    write!(f, "Group `{group}` not found in input file.")
                } else {
                    write!(f, "Dataset `{dataset}` not found in group `{group}`.")
                }
            }
            EfpGamessError::MalformedInput(msg) => write!(f, "Malformed input: {msg}"),
            EfpGamessError::DimensionMismatch(msg) => write!(f, "Dimension mismatch: {msg}"),
            EfpGamessError::ExternalProviderFailure(msg) => {
                write!(f, "Transformation-matrix provider failure: {msg}")
            }
            EfpGamessError::UnsupportedAngularMomentum(l) => write!(
                f,
                "Shells with angular momentum l = {l} are not supported (maximum l = 3)."
            ),
            EfpGamessError::InvalidOption { key, reason } => {
                write!(f, "Invalid value for option `{key}`: {reason}")
            }
            EfpGamessError::UnknownProcedure(name) => {
                write!(f, "No procedure named `{name}` has been registered.")
            }
        }
    }
}

impl Error for EfpGamessError {}
