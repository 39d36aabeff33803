use crate::codec::CodecError;
use crate::store::StoreError;
use crate::validate::ValidationError;

/// Errors surfaced by the domain service.
///
/// The variants are discriminated so an API layer can map them onto status
/// codes: validation failures are client errors, `NotFound` and
/// `DeleteConflict` are 404s, and everything else is a server failure.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The input failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No record matched the requested id.
    #[error("no shelter found with id {0}")]
    NotFound(String),

    /// A delete was attempted against a record that does not exist.
    #[error("cannot delete shelter {0}: it does not exist")]
    DeleteConflict(String),

    /// The storage collaborator failed; `context` names the operation.
    #[error("{context}: {source}")]
    Storage {
        /// What the service was doing when the failure surfaced.
        context: String,
        /// The underlying storage failure.
        #[source]
        source: StoreError,
    },

    /// A persisted record could not be decoded.
    #[error("failed to decode shelter record: {0}")]
    Decode(#[from] CodecError),
}

impl Error {
    pub(crate) fn storage(context: impl Into<String>, source: StoreError) -> Self {
        Error::Storage { context: context.into(), source }
    }
}

/// Result type for the domain service.
pub type Result<T> = std::result::Result<T, Error>;
