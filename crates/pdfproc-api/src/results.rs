//! Transient result store
//!
//! Results are kept in a bounded LRU so the spreadsheet export reads the
//! displayed data instead of invoking the remote function again. Nothing is
//! persisted; evicted results are gone.

use lru::LruCache;
use pdfproc_core::{AppError, ExtractionResult};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Clone)]
pub struct ResultStore {
    inner: Arc<Mutex<LruCache<Uuid, Arc<ExtractionResult>>>>,
    capacity: NonZeroUsize,
}

impl ResultStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
            capacity,
        }
    }

    /// Store a result under a fresh id.
    pub async fn insert(&self, result: ExtractionResult) -> (Uuid, Arc<ExtractionResult>) {
        let id = Uuid::new_v4();
        let result = Arc::new(result);
        let mut cache = self.inner.lock().await;
        if let Some((evicted, _)) = cache.push(id, result.clone()) {
            tracing::debug!(result_id = %evicted, "Evicted stored result");
        }
        (id, result)
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<ExtractionResult>> {
        self.inner.lock().await.get(id).cloned()
    }

    /// Like [`ResultStore::get`], but an unknown id is a not-found error.
    pub async fn require(&self, id: &Uuid) -> Result<Arc<ExtractionResult>, AppError> {
        self.get(id).await.ok_or_else(|| {
            AppError::NotFound(format!(
                "Result {} not found or expired; process the PDF again",
                id
            ))
        })
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfproc_core::ObjectReference;
    use serde_json::json;

    fn result(n: i64) -> ExtractionResult {
        ExtractionResult::from_body(
            ObjectReference::parse("Fuji_pdfFile.pdf").unwrap(),
            json!({ "n": n }),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = ResultStore::new(4);
        let (id, stored) = store.insert(result(1)).await;
        let fetched = store.get(&id).await.unwrap();
        assert!(Arc::ptr_eq(&stored, &fetched));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_evicts_least_recently_used() {
        let store = ResultStore::new(2);
        let (first, _) = store.insert(result(1)).await;
        let (second, _) = store.insert(result(2)).await;
        // Touch the first so the second becomes the eviction candidate.
        assert!(store.get(&first).await.is_some());
        let (third, _) = store.insert(result(3)).await;

        assert!(store.get(&first).await.is_some());
        assert!(store.get(&second).await.is_none());
        assert!(store.get(&third).await.is_some());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let store = ResultStore::new(1);
        let err = store.require(&Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        assert_eq!(ResultStore::new(0).capacity(), 1);
    }
}
