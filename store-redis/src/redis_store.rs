use crate::commands::{ack_from_reply, batch_pipeline, batch_succeeded, set_command};
use async_trait::async_trait;
use cache_adapter::ports::{Ack, AtomicBatch, BatchOp, StoreClient};
use redis::Value;
use redis::aio::MultiplexedConnection;
use shared::{Error, Result};
use tracing::{debug, info};

fn store_error(err: redis::RedisError) -> Error {
    debug!("Redis command failed: {}", err);
    Error::Store(err.to_string())
}

/// StoreClient backed by a Redis server.
#[derive(Clone)]
pub struct RedisStore {
    connection: MultiplexedConnection,
}

impl RedisStore {
    /// Connect to the server and database named by `url`, e.g. `redis://127.0.0.1:6379/0`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(store_error)?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(store_error)?;

        info!("Connected to redis at {}", url);
        Ok(Self { connection })
    }

    pub fn from_connection(connection: MultiplexedConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl StoreClient for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection.clone();
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<bool> {
        let mut conn = self.connection.clone();
        let reply: Value = set_command(key, value, None)
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(ack_from_reply(&reply).acknowledged())
    }

    async fn set_with_expiry(&self, key: &str, value: &[u8], ttl_secs: u64) -> Result<Ack> {
        let mut conn = self.connection.clone();
        let reply: Value = set_command(key, value, Some(ttl_secs))
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(ack_from_reply(&reply))
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        let mut conn = self.connection.clone();
        let removed: u64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(removed)
    }

    async fn exists(&self, key: &str) -> Result<u64> {
        let mut conn = self.connection.clone();
        let count: u64 = redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(count)
    }

    async fn flush_db(&self) -> Result<bool> {
        let mut conn = self.connection.clone();
        let reply: Value = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(ack_from_reply(&reply).acknowledged())
    }

    fn begin_atomic_batch(&self) -> Box<dyn AtomicBatch> {
        Box::new(RedisBatch {
            connection: self.connection.clone(),
            ops: Vec::new(),
        })
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("connection", &"<MultiplexedConnection>")
            .finish()
    }
}

/// Ops queued for a single MULTI/EXEC round trip.
pub struct RedisBatch {
    connection: MultiplexedConnection,
    ops: Vec<BatchOp>,
}

#[async_trait]
impl AtomicBatch for RedisBatch {
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
        let RedisBatch {
            mut connection,
            ops,
        } = *self;

        let replies: Vec<Value> = batch_pipeline(&ops)
            .query_async(&mut connection)
            .await
            .map_err(store_error)?;

        let succeeded = batch_succeeded(&ops, &replies);
        debug!("EXEC of {} op(s) succeeded: {}", ops.len(), succeeded);
        Ok(succeeded)
    }
}
