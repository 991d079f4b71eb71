use thiserror::Error;

/// Failures surfaced by a host storage backend.
///
/// A missing record is not an error at this layer; getters return `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend refused or failed the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored record could not be decoded into its type.
    #[error("cannot decode {namespace} record: {reason}")]
    Decode {
        namespace: &'static str,
        reason: String,
    },
}
