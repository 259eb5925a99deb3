//! A StoreClient that answers from a script and records every call.

use crate::ports::{Ack, AtomicBatch, BatchOp, StoreClient};
use async_trait::async_trait;
use shared::{Error, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Get(String),
    Set(String),
    SetWithExpiry(String, u64),
    Delete(String),
    Exists(String),
    FlushDb,
    BeginBatch,
    Commit(Vec<BatchOp>),
}

pub struct ScriptedStore {
    values: HashMap<String, Vec<u8>>,
    get_fails: bool,
    set_replies: Mutex<VecDeque<Result<bool>>>,
    expiry_ack: Ack,
    delete_replies: Mutex<VecDeque<Result<u64>>>,
    exists_count: u64,
    flush_reply: bool,
    commit_reply: Option<bool>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedStore {
    /// Every SET succeeds, SETEX answers "OK", DEL removes one key, commits succeed.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            get_fails: false,
            set_replies: Mutex::new(VecDeque::new()),
            expiry_ack: Ack::Ok,
            delete_replies: Mutex::new(VecDeque::new()),
            exists_count: 0,
            flush_reply: true,
            commit_reply: Some(true),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_value(mut self, key: &str, bytes: Vec<u8>) -> Self {
        self.values.insert(key.to_string(), bytes);
        self
    }

    pub fn with_failing_get(mut self) -> Self {
        self.get_fails = true;
        self
    }

    /// Replies handed out to SET and SETEX in order; once exhausted every write succeeds.
    pub fn with_set_replies(self, replies: Vec<Result<bool>>) -> Self {
        *self.set_replies.lock().unwrap() = replies.into();
        self
    }

    pub fn with_expiry_ack(mut self, ack: Ack) -> Self {
        self.expiry_ack = ack;
        self
    }

    /// Replies handed out to DEL in order; once exhausted every DEL removes one key.
    pub fn with_delete_replies(self, replies: Vec<Result<u64>>) -> Self {
        *self.delete_replies.lock().unwrap() = replies.into();
        self
    }

    pub fn with_exists_count(mut self, count: u64) -> Self {
        self.exists_count = count;
        self
    }

    pub fn with_flush_reply(mut self, reply: bool) -> Self {
        self.flush_reply = reply;
        self
    }

    /// `None` makes the commit itself error.
    pub fn with_commit_reply(mut self, reply: Option<bool>) -> Self {
        self.commit_reply = reply;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    pub fn batch_opened(&self) -> bool {
        self.count(|call| matches!(call, Call::BeginBatch)) > 0
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_set_reply(&self) -> Result<bool> {
        self.set_replies.lock().unwrap().pop_front().unwrap_or(Ok(true))
    }
}

#[async_trait]
impl StoreClient for ScriptedStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.record(Call::Get(key.to_string()));
        if self.get_fails {
            return Err(Error::Store("connection reset".to_string()));
        }
        Ok(self.values.get(key).cloned())
    }

    async fn set(&self, key: &str, _value: &[u8]) -> Result<bool> {
        self.record(Call::Set(key.to_string()));
        self.next_set_reply()
    }

    async fn set_with_expiry(&self, key: &str, _value: &[u8], ttl_secs: u64) -> Result<Ack> {
        self.record(Call::SetWithExpiry(key.to_string(), ttl_secs));
        match self.next_set_reply()? {
            true => Ok(self.expiry_ack.clone()),
            false => Ok(Ack::Other("ERR".to_string())),
        }
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        self.record(Call::Delete(key.to_string()));
        self.delete_replies.lock().unwrap().pop_front().unwrap_or(Ok(1))
    }

    async fn exists(&self, key: &str) -> Result<u64> {
        self.record(Call::Exists(key.to_string()));
        Ok(self.exists_count)
    }

    async fn flush_db(&self) -> Result<bool> {
        self.record(Call::FlushDb);
        Ok(self.flush_reply)
    }

    fn begin_atomic_batch(&self) -> Box<dyn AtomicBatch> {
        self.record(Call::BeginBatch);
        Box::new(ScriptedBatch {
            ops: Vec::new(),
            reply: self.commit_reply,
            calls: self.calls.clone(),
        })
    }
}

struct ScriptedBatch {
    ops: Vec<BatchOp>,
    reply: Option<bool>,
    calls: Arc<Mutex<Vec<Call>>>,
}

#[async_trait]
impl AtomicBatch for ScriptedBatch {
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
        self.calls.lock().unwrap().push(Call::Commit(self.ops.clone()));
        self.reply
            .ok_or_else(|| Error::Store("EXECABORT transaction discarded".to_string()))
    }
}
