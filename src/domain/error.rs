/// Failures a storage backend reports back to its caller.
///
/// Both variants are argument-validation failures; the caller decides
/// whether they abort the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    // ---
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("required argument `{0}` was not provided")]
    NullInput(&'static str),
}

impl StorageError {
    // ---
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        // ---
        StorageError::InvalidArgument(msg.into())
    }
}

/// Turns an absent argument into [`StorageError::NullInput`].
pub(crate) fn require<T>(value: Option<T>, name: &'static str) -> Result<T, StorageError> {
    // ---
    value.ok_or(StorageError::NullInput(name))
}
