pub mod commands;
pub mod redis_store;

pub use redis_store::{RedisBatch, RedisStore};
