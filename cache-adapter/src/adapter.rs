use crate::interface::SimpleCache;
use crate::ports::StoreClient;
use crate::serializer::{JsonSerializer, Serializer};
use crate::validation::{collect_keys, validate_key};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{Result, Ttl};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache adapter over a remote key-value store.
///
/// Holds no cached state of its own: every call validates its arguments,
/// encodes or decodes values and passes straight through to the store.
#[derive(Clone)]
pub struct CacheAdapter<S = JsonSerializer>
where
    S: Serializer,
{
    store: Arc<dyn StoreClient>,
    serializer: S,
}

impl CacheAdapter<JsonSerializer> {
    pub fn new(store: Arc<dyn StoreClient>) -> Self {
        Self::with_serializer(store, JsonSerializer)
    }
}

impl<S: Serializer> CacheAdapter<S> {
    pub fn with_serializer(store: Arc<dyn StoreClient>, serializer: S) -> Self {
        Self { store, serializer }
    }

    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Read one key that has already been validated.
    async fn read<V: DeserializeOwned>(&self, key: &str, default: V) -> Result<V> {
        match self.store.get(key).await {
            Ok(Some(bytes)) => self.serializer.decode(&bytes),
            Ok(None) => Ok(default),
            Err(e) => {
                warn!("GET '{}' failed, returning default: {}", key, e);
                Ok(default)
            }
        }
    }

    /// SET, or SETEX when a TTL resolved to a second count.
    async fn write(&self, key: &str, bytes: &[u8], ttl_secs: Option<u64>) -> bool {
        let outcome = match ttl_secs {
            Some(secs) => self
                .store
                .set_with_expiry(key, bytes, secs)
                .await
                .map(|ack| ack.acknowledged()),
            None => self.store.set(key, bytes).await,
        };
        settle("SET", key, outcome)
    }

    /// DEL for a single key; only a removal count of exactly one is a success.
    async fn remove(&self, key: &str) -> bool {
        let outcome = self.store.delete(key).await.map(|count| count == 1);
        settle("DEL", key, outcome)
    }
}

/// Fold a store failure into a negative outcome.
fn settle(command: &str, key: &str, outcome: Result<bool>) -> bool {
    outcome.unwrap_or_else(|e| {
        warn!("{} '{}' failed: {}", command, key, e);
        false
    })
}

#[async_trait]
impl<S: Serializer> SimpleCache for CacheAdapter<S> {
    async fn get<V>(&self, key: &str, default: V) -> Result<V>
    where
        V: DeserializeOwned + Send,
    {
        validate_key(key)?;
        self.read(key, default).await
    }

    async fn set<V>(&self, key: &str, value: &V, ttl: Ttl) -> Result<bool>
    where
        V: Serialize + Sync + ?Sized,
    {
        validate_key(key)?;
        let bytes = self.serializer.encode(value)?;
        Ok(self.write(key, &bytes, ttl.resolve()).await)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.remove(key).await)
    }

    async fn has(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let outcome = self.store.exists(key).await.map(|count| count >= 1);
        Ok(settle("EXISTS", key, outcome))
    }

    async fn clear(&self) -> Result<bool> {
        Ok(settle("FLUSHDB", "*", self.store.flush_db().await))
    }

    async fn get_multiple<I, K, V>(&self, keys: I, default: V) -> Result<Vec<(String, V)>>
    where
        I: IntoIterator<Item = K> + Send,
        K: AsRef<str> + Send,
        V: DeserializeOwned + Clone + Send,
    {
        let keys = collect_keys(keys)?;

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let value = self.read(&key, default.clone()).await?;
            entries.push((key, value));
        }
        Ok(entries)
    }

    async fn set_multiple<I, K, V>(&self, values: I, ttl: Ttl) -> Result<bool>
    where
        I: IntoIterator<Item = (K, V)> + Send,
        K: AsRef<str> + Send,
        V: Serialize + Send,
    {
        let ttl_secs = ttl.resolve();

        let mut entries = Vec::new();
        for (key, value) in values {
            let key = key.as_ref();
            validate_key(key)?;
            entries.push((key.to_string(), self.serializer.encode(&value)?));
        }
        if entries.is_empty() {
            return Ok(true);
        }

        // Pre-check: each write must succeed on its own before the batch runs.
        // Writes made here are not rolled back when a later step fails.
        for (key, bytes) in &entries {
            if !self.write(key, bytes, ttl_secs).await {
                debug!("set_multiple aborted before commit at key '{}'", key);
                return Ok(false);
            }
        }

        let mut batch = self.store.begin_atomic_batch();
        for (key, bytes) in &entries {
            batch.set(key, bytes, ttl_secs);
        }
        let queued = batch.len();
        let committed = settle("EXEC", "set_multiple", batch.commit().await);
        debug!("set_multiple committed {} op(s): {}", queued, committed);
        Ok(committed)
    }

    async fn delete_multiple<I, K>(&self, keys: I) -> Result<bool>
    where
        I: IntoIterator<Item = K> + Send,
        K: AsRef<str> + Send,
    {
        let keys = collect_keys(keys)?;
        if keys.is_empty() {
            return Ok(true);
        }

        for key in &keys {
            if !self.remove(key).await {
                debug!("delete_multiple aborted before commit at key '{}'", key);
                return Ok(false);
            }
        }

        let mut batch = self.store.begin_atomic_batch();
        for key in &keys {
            batch.delete(key);
        }
        let queued = batch.len();
        let committed = settle("EXEC", "delete_multiple", batch.commit().await);
        debug!("delete_multiple committed {} op(s): {}", queued, committed);
        Ok(committed)
    }
}

impl<S: Serializer> std::fmt::Debug for CacheAdapter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAdapter")
            .field("store", &"<dyn StoreClient>")
            .field("serializer", &self.serializer.name())
            .finish()
    }
}
