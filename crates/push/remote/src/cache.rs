//! Process-wide VAPID key cache.

use std::future::Future;

use push_core::VapidPublicKey;
use tokio::sync::OnceCell;

/// Holds the relay's VAPID public key once fetched.
///
/// The key is fetched at most once and never refreshed. Share one cache
/// through `Arc` to make it process-wide.
#[derive(Debug, Default)]
pub struct VapidKeyCache {
    key: OnceCell<VapidPublicKey>,
}

impl VapidKeyCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that starts out holding `key`.
    pub fn with_key(key: VapidPublicKey) -> Self {
        Self {
            key: OnceCell::new_with(Some(key)),
        }
    }

    /// The cached key, if fetched.
    pub fn get(&self) -> Option<&VapidPublicKey> {
        self.key.get()
    }

    /// Return the cached key or run `fetch` to fill the cache.
    ///
    /// Concurrent callers wait on the one fetch in flight. A failed fetch
    /// leaves the cache empty.
    pub async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<VapidPublicKey, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<VapidPublicKey, E>>,
    {
        self.key.get_or_try_init(fetch).await.cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_runs_once() {
        let cache = VapidKeyCache::new();

        let first: Result<_, ()> = cache
            .get_or_fetch(|| async { Ok(VapidPublicKey::new("k1")) })
            .await;
        let second: Result<_, ()> = cache
            .get_or_fetch(|| async { Ok(VapidPublicKey::new("k2")) })
            .await;

        assert_eq!(first.unwrap().as_str(), "k1");
        assert_eq!(second.unwrap().as_str(), "k1");
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache = VapidKeyCache::new();

        let failed = cache.get_or_fetch(|| async { Err("offline") }).await;
        assert!(failed.is_err());
        assert!(cache.get().is_none());

        let ok: Result<_, &str> = cache
            .get_or_fetch(|| async { Ok(VapidPublicKey::new("k")) })
            .await;
        assert!(ok.is_ok());
    }
}
