use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{Result, Ttl};

/// The simple cache contract: single and bulk get/set/delete/has plus clear.
///
/// Any implementation is substitutable for another. Argument errors are
/// returned as `Err(Error::InvalidArgument)` before any backend access; backend
/// failures come back as `Ok(false)` (or the default, for reads).
#[async_trait]
pub trait SimpleCache: Send + Sync {
    /// Fetch `key`, or `default` when the key is absent. Use `Option<T>` as
    /// `V` for a null default. A stored value the serializer cannot decode
    /// is `Err(Error::Serialization)`, not the default.
    async fn get<V>(&self, key: &str, default: V) -> Result<V>
    where
        V: DeserializeOwned + Send;

    async fn set<V>(&self, key: &str, value: &V, ttl: Ttl) -> Result<bool>
    where
        V: Serialize + Sync + ?Sized;

    async fn delete(&self, key: &str) -> Result<bool>;

    async fn has(&self, key: &str) -> Result<bool>;

    async fn clear(&self) -> Result<bool>;

    /// One entry per input key, in input order. Not atomic. Fails as a whole
    /// on the first value that cannot be decoded.
    async fn get_multiple<I, K, V>(&self, keys: I, default: V) -> Result<Vec<(String, V)>>
    where
        I: IntoIterator<Item = K> + Send,
        K: AsRef<str> + Send,
        V: DeserializeOwned + Clone + Send;

    async fn set_multiple<I, K, V>(&self, values: I, ttl: Ttl) -> Result<bool>
    where
        I: IntoIterator<Item = (K, V)> + Send,
        K: AsRef<str> + Send,
        V: Serialize + Send;

    async fn delete_multiple<I, K>(&self, keys: I) -> Result<bool>
    where
        I: IntoIterator<Item = K> + Send,
        K: AsRef<str> + Send;
}
