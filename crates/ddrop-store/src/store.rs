use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

use ddrop_core::ShareResult;

/// Upload progress callback: percent complete in `[0,100]`, called zero or
/// more times with monotonically non-decreasing values.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Opaque blob storage with single-read-then-delete semantics.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store a blob, returning its store-assigned identifier.
    ///
    /// The identifier is opaque and never contains `/` (it is embedded
    /// verbatim as the first share-link segment).
    async fn store(&self, blob: Bytes, progress: Option<ProgressFn>) -> ShareResult<String>;

    /// Take a blob out of the store.
    ///
    /// At most one call per identifier ever succeeds; every later call
    /// (including a concurrent loser) fails with
    /// [`ddrop_core::ShareError::NotFoundOrAlreadyConsumed`].
    async fn retrieve(&self, id: &str) -> ShareResult<Bytes>;
}
