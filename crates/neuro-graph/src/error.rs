//! Graph error and anomaly types.

use thiserror::Error;

/// Errors and anomalies raised while building the page graph.
///
/// Only [`GraphError::PageNotFound`] is ever returned to callers. The other
/// variants describe a single skipped reference and are handed to the
/// registry's [`Diagnostics`](crate::Diagnostics) sink instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error(
        "Unexpected: {page} is referenced from {from} as backlink in the metadata index, \
         but page for {from} has not yet been registered. The backlink was skipped."
    )]
    UnregisteredBacklink { page: String, from: String },

    #[error(
        "Unexpected: {page} references {target} in field '{field}', \
         but it was not found in the metadata index. The reference was skipped."
    )]
    UnresolvedFieldReference {
        page: String,
        target: String,
        field: String,
    },

    #[error(
        "Unexpected: link {from} -> {to} is listed in the metadata index, \
         but one of its pages is not registered. The link was skipped."
    )]
    MissingLinkEndpoint { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, GraphError>;
