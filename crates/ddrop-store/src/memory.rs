//! In-memory object store for tests and local single-process use

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use ddrop_core::{ShareError, ShareResult};

use crate::store::{ObjectStore, ProgressFn};

/// In-memory store with take-and-delete retrieval.
///
/// One mutex guards the map, so a retrieve is an atomic take: when two
/// receivers race on the same identifier, exactly one removes the entry and
/// the other observes not-found.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held (test visibility).
    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.lock().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn store(&self, blob: Bytes, progress: Option<ProgressFn>) -> ShareResult<String> {
        let id = Uuid::new_v4().simple().to_string();

        if let Some(ref progress) = progress {
            progress(0);
        }
        self.objects.lock().await.insert(id.clone(), blob);
        if let Some(ref progress) = progress {
            progress(100);
        }

        tracing::debug!(%id, "blob stored in memory");
        Ok(id)
    }

    async fn retrieve(&self, id: &str) -> ShareResult<Bytes> {
        match self.objects.lock().await.remove(id) {
            Some(blob) => {
                tracing::debug!(%id, "blob taken from memory store");
                Ok(blob)
            }
            None => Err(ShareError::NotFoundOrAlreadyConsumed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_store_retrieve_roundtrip() {
        let store = MemoryStore::new();
        let id = store.store(Bytes::from_static(b"blob"), None).await.unwrap();

        assert!(!id.contains('/'), "identifier must be link-segment safe");
        assert_eq!(store.retrieve(&id).await.unwrap(), Bytes::from_static(b"blob"));
    }

    #[tokio::test]
    async fn test_second_retrieve_is_not_found() {
        let store = MemoryStore::new();
        let id = store.store(Bytes::from_static(b"once"), None).await.unwrap();

        store.retrieve(&id).await.unwrap();
        for _ in 0..3 {
            let result = store.retrieve(&id).await;
            assert!(matches!(result, Err(ShareError::NotFoundOrAlreadyConsumed)));
        }
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let result = store.retrieve("no-such-id").await;
        assert!(matches!(result, Err(ShareError::NotFoundOrAlreadyConsumed)));
    }

    #[tokio::test]
    async fn test_concurrent_retrieve_single_winner() {
        let store = Arc::new(MemoryStore::new());
        let id = store.store(Bytes::from_static(b"race"), None).await.unwrap();

        let wins = Arc::new(AtomicUsize::new(0));
        let mut tasks = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            let id = id.clone();
            let wins = wins.clone();
            tasks.push(tokio::spawn(async move {
                if store.retrieve(&id).await.is_ok() {
                    wins.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(wins.load(Ordering::SeqCst), 1, "race must have exactly one winner");
    }

    #[tokio::test]
    async fn test_progress_reaches_completion() {
        let store = MemoryStore::new();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_cb = seen.clone();
        let progress: ProgressFn = Arc::new(move |pct| {
            seen_cb.lock().unwrap().push(pct);
        });

        store
            .store(Bytes::from_static(b"blob"), Some(progress))
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "progress must be non-decreasing");
        assert_eq!(*seen.last().unwrap(), 100);
    }
}
