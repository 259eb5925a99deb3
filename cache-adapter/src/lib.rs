pub mod adapter;
pub mod interface;
pub mod ports;
pub mod serializer;
pub mod validation;

#[cfg(test)]
mod scripted;

// Re-export commonly used types
pub use adapter::CacheAdapter;
pub use interface::SimpleCache;
pub use ports::{Ack, AtomicBatch, BatchOp, StoreClient};
pub use serializer::{JsonSerializer, Serializer};
pub use shared::{Error, Result, Ttl};
