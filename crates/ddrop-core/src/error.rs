use thiserror::Error;

pub type ShareResult<T> = Result<T, ShareError>;

/// Failure taxonomy for one share operation.
///
/// Every variant is terminal for the operation it occurs in: there is no
/// silent retry, and the orchestrator maps each one to a single
/// human-readable message. Variants never carry key material or raw
/// cryptographic error detail.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The fragment failed structural validation. Surfaced before any
    /// network call is made.
    #[error("invalid share link: {0}")]
    InvalidLinkFormat(String),

    /// The store has no blob under this identifier. Expected when a
    /// single-use link is replayed, not a system fault.
    #[error("object not found or already retrieved")]
    NotFoundOrAlreadyConsumed,

    /// The blob is structurally too short to contain the salt+nonce header.
    #[error("encrypted blob too short: {len} bytes (minimum {min})")]
    MalformedBlob { len: usize, min: usize },

    /// Authentication tag mismatch or truncated ciphertext. Deliberately
    /// ambiguous between a wrong key and corrupted data.
    #[error("decryption failed")]
    DecryptionFailed,

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
