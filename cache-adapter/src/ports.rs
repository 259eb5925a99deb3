#![deny(clippy::all)]

use async_trait::async_trait;
use shared::Result;

// Ports are the pluggable extension points for the store behind the adapter

/// Canonical acknowledgment of an expiring write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ack {
    /// The store's "OK" token
    Ok,
    /// Anything else the store answered with
    Other(String),
}

impl Ack {
    pub const OK_TOKEN: &'static str = "OK";

    /// Only the exact "OK" status is an acknowledgment. "true", "1" or a
    /// lower-cased "ok" are not.
    pub fn from_status(status: &str) -> Self {
        if status == Self::OK_TOKEN {
            Ack::Ok
        } else {
            Ack::Other(status.to_string())
        }
    }

    pub fn acknowledged(&self) -> bool {
        matches!(self, Ack::Ok)
    }
}

/// An operation queued inside an [`AtomicBatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOp {
    Set {
        key: String,
        value: Vec<u8>,
        ttl_secs: Option<u64>,
    },
    Delete {
        key: String,
    },
}

impl BatchOp {
    pub fn key(&self) -> &str {
        match self {
            BatchOp::Set { key, .. } | BatchOp::Delete { key } => key,
        }
    }
}

/// Port for the remote key-value store the adapter sits on.
///
/// Implementations report store and transport failures as `Err`; the adapter
/// folds those into a negative outcome.
#[async_trait]
pub trait StoreClient: Send + Sync + 'static {
    /// GET. `None` is the absence sentinel, distinct from an empty value.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Plain SET without expiry.
    async fn set(&self, key: &str, value: &[u8]) -> Result<bool>;

    /// SETEX. Zero seconds means the key expires immediately.
    async fn set_with_expiry(&self, key: &str, value: &[u8], ttl_secs: u64) -> Result<Ack>;

    /// DEL, returning how many keys were removed.
    async fn delete(&self, key: &str) -> Result<u64>;

    /// EXISTS, returning how many of the keys exist.
    async fn exists(&self, key: &str) -> Result<u64>;

    /// Flush the current logical database.
    async fn flush_db(&self) -> Result<bool>;

    /// Open a MULTI/EXEC style batch.
    fn begin_atomic_batch(&self) -> Box<dyn AtomicBatch>;
}

/// Queued writes applied as a single indivisible unit on commit.
#[async_trait]
pub trait AtomicBatch: Send {
    fn set(&mut self, key: &str, value: &[u8], ttl_secs: Option<u64>);

    fn delete(&mut self, key: &str);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply every queued op together. True only when the store reports each
    /// of them as successful. A DEL that removed nothing still executed.
    async fn commit(self: Box<Self>) -> Result<bool>;
}
