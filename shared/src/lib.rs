// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Caller supplied a key, TTL or collection the cache contract does not accept.
    /// Always raised before the store is touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("serialization: {0}")]
    Serialization(String),
    /// Failure reported by a store client, transport errors included.
    #[error("store: {0}")]
    Store(String),
    #[error("config: {0}")]
    Config(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
pub mod ttl;

pub use ttl::Ttl;
