use async_trait::async_trait;
use cache_adapter::ports::{Ack, AtomicBatch, BatchOp, StoreClient};
use shared::Result;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Clone, Debug)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: Vec<u8>, ttl_secs: Option<u64>) -> Self {
        Self {
            value,
            // A TTL past what Instant can represent never expires
            expires_at: ttl_secs
                .and_then(|secs| Instant::now().checked_add(Duration::from_secs(secs))),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

type Entries = HashMap<String, Entry>;

/// In-process store with per-key expiry and an all-or-nothing batch.
///
/// A batch commit applies its ops under one write lock, so readers observe
/// either none or all of them.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<Entries>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) keys. Expired entries are swept as a side effect.
    pub async fn len(&self) -> usize {
        self.purge_expired().await;
        self.entries.read().await.len()
    }

    /// Drop every expired entry, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        let removed = before - entries.len();
        if removed > 0 {
            debug!("Purged {} expired key(s) from memory store", removed);
        }
        removed
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remaining lifetime of `key`, `None` when it has no expiry or is absent.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }
}

/// Remove `key` if it expired; true when a live entry remains.
fn prune(entries: &mut Entries, key: &str, now: Instant) -> bool {
    match entries.get(key) {
        Some(entry) if entry.is_live(now) => true,
        Some(_) => {
            entries.remove(key);
            false
        }
        None => false,
    }
}

fn apply(entries: &mut Entries, op: BatchOp) {
    match op {
        BatchOp::Set {
            key,
            value,
            ttl_secs,
        } => {
            entries.insert(key, Entry::new(value, ttl_secs));
        }
        BatchOp::Delete { key } => {
            entries.remove(&key);
        }
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                None => return Ok(None),
                Some(_) => {}
            }
        }

        // Expired: drop it so it stops counting against the map
        prune(&mut *self.entries.write().await, key, now);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<bool> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), Entry::new(value.to_vec(), None));
        Ok(true)
    }

    async fn set_with_expiry(&self, key: &str, value: &[u8], ttl_secs: u64) -> Result<Ack> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), Entry::new(value.to_vec(), Some(ttl_secs)));
        Ok(Ack::Ok)
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let removed = prune(&mut entries, key, now) && entries.remove(key).is_some();
        Ok(u64::from(removed))
    }

    async fn exists(&self, key: &str) -> Result<u64> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        Ok(u64::from(prune(&mut entries, key, now)))
    }

    async fn flush_db(&self) -> Result<bool> {
        let mut entries = self.entries.write().await;
        debug!("Flushing {} key(s) from memory store", entries.len());
        entries.clear();
        Ok(true)
    }

    fn begin_atomic_batch(&self) -> Box<dyn AtomicBatch> {
        Box::new(MemoryBatch {
            entries: self.entries.clone(),
            ops: Vec::new(),
        })
    }
}

impl Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &"<RwLock<HashMap>>")
            .finish()
    }
}

/// Ops queued against a [`MemoryStore`], applied together on commit.
pub struct MemoryBatch {
    entries: Arc<RwLock<Entries>>,
    ops: Vec<BatchOp>,
}

#[async_trait]
impl AtomicBatch for MemoryBatch {
    fn set(&mut self, key: &str, value: &[u8], ttl_secs: Option<u64>) {
        self.ops.push(BatchOp::Set {
            key: key.to_string(),
            value: value.to_vec(),
            ttl_secs,
        });
    }

    fn delete(&mut self, key: &str) {
        self.ops.push(BatchOp::Delete {
            key: key.to_string(),
        });
    }

    fn len(&self) -> usize {
        self.ops.len()
    }

    async fn commit(self: Box<Self>) -> Result<bool> {
        let MemoryBatch { entries, ops } = *self;
        let count = ops.len();

        let mut entries = entries.write().await;
        for op in ops {
            apply(&mut entries, op);
        }

        debug!("Committed batch of {} op(s)", count);
        Ok(true)
    }
}
