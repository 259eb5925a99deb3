use crate::{Error, Result, Ttl};
use tracing::warn;

/// Where cache values are stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Redis(String), // connection url
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerializerKind {
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub backend: Backend,
    pub serializer: SerializerKind,
    pub default_ttl: Ttl,
}

impl Config {
    const DEFAULT_REDIS_URL: &'static str = "redis://127.0.0.1:6379/0";

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source. `from_env` is the process
    /// environment flavour of this.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let redis_url =
            lookup("CACHE_REDIS_URL").unwrap_or_else(|| Self::DEFAULT_REDIS_URL.to_string());

        let backend = match lookup("CACHE_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => Backend::Memory,
            "redis" => Backend::Redis(redis_url),
            other => {
                return Err(Error::Config(format!(
                    "unknown CACHE_BACKEND '{}', expected 'memory' or 'redis'",
                    other
                )));
            }
        };

        let serializer = match lookup("CACHE_SERIALIZER")
            .unwrap_or_else(|| "json".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "json" => SerializerKind::Json,
            other => {
                return Err(Error::Config(format!(
                    "unknown CACHE_SERIALIZER '{}', expected 'json'",
                    other
                )));
            }
        };

        let default_ttl = match lookup("CACHE_DEFAULT_TTL") {
            Some(raw) => Ttl::parse(&raw).unwrap_or_else(|e| {
                warn!("Ignoring CACHE_DEFAULT_TTL '{}': {}", raw, e);
                Ttl::NoExpiry
            }),
            None => Ttl::NoExpiry,
        };

        Ok(Self {
            backend,
            serializer,
            default_ttl,
        })
    }
}

impl Backend {
    pub fn name(&self) -> &str {
        match self {
            Backend::Memory => "memory",
            Backend::Redis(..) => "redis",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.serializer, SerializerKind::Json);
        assert_eq!(config.default_ttl, Ttl::NoExpiry);
    }

    #[test]
    fn test_redis_backend_uses_url() {
        let config = Config::from_lookup(lookup(&[
            ("CACHE_BACKEND", "Redis"),
            ("CACHE_REDIS_URL", "redis://cache:6379/2"),
        ]))
        .unwrap();
        assert_eq!(config.backend, Backend::Redis("redis://cache:6379/2".to_string()));
        assert_eq!(config.backend.name(), "redis");
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        let err = Config::from_lookup(lookup(&[("CACHE_BACKEND", "memcached")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_serializer_is_an_error() {
        let err = Config::from_lookup(lookup(&[("CACHE_SERIALIZER", "xml")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_ttl() {
        let config = Config::from_lookup(lookup(&[("CACHE_DEFAULT_TTL", "10m")])).unwrap();
        assert_eq!(config.default_ttl.resolve(), Some(600));

        let config = Config::from_lookup(lookup(&[("CACHE_DEFAULT_TTL", "soon")])).unwrap();
        assert_eq!(config.default_ttl, Ttl::NoExpiry);
    }
}
