use thiserror::Error;

/// Failures of a [`SessionStorage`](crate::storage::SessionStorage) backend.
///
/// The gate never surfaces these to the user: an unreadable store is
/// treated as "no session" and the login form is shown instead.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Rejections when parsing a hex-encoded credential digest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Digest must be {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Digest contains non-hex character {0:?}")]
    InvalidCharacter(char),
}
