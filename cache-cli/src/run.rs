use crate::cli::Command;
use cache_adapter::{CacheAdapter, JsonSerializer, Serializer, SimpleCache, StoreClient};
use serde_json::Value;
use shared::config::{Backend, SerializerKind};
use shared::{Result, Ttl};
use std::sync::Arc;
use storage_engine::MemoryStore;
use store_redis::RedisStore;
use tracing::info;

pub async fn open_store(backend: &Backend) -> Result<Arc<dyn StoreClient>> {
    info!("Using {} backend", backend.name());
    match backend {
        Backend::Memory => Ok(Arc::new(MemoryStore::new())),
        Backend::Redis(url) => Ok(Arc::new(RedisStore::connect(url).await?)),
    }
}

pub fn build_cache(store: Arc<dyn StoreClient>, kind: SerializerKind) -> CacheAdapter {
    let cache = match kind {
        SerializerKind::Json => CacheAdapter::with_serializer(store, JsonSerializer),
    };
    info!("Using {} serializer", cache.serializer().name());
    cache
}

fn parse_value(raw: &str, json: bool) -> Result<Value> {
    if json {
        serde_json::from_str(raw).map_err(|e| shared::Error::invalid_argument(e.to_string()))
    } else {
        Ok(Value::String(raw.to_string()))
    }
}

fn parse_default(raw: Option<&str>, json: bool) -> Result<Value> {
    raw.map_or(Ok(Value::Null), |raw| parse_value(raw, json))
}

/// `--ttl` wins over the configured default.
fn resolve_ttl(raw: Option<&str>, default_ttl: Ttl) -> Result<Ttl> {
    raw.map_or(Ok(default_ttl), Ttl::parse)
}

/// Execute one command and render its outcome as a line of output.
pub async fn execute<C: SimpleCache>(
    cache: &C,
    command: Command,
    json: bool,
    default_ttl: Ttl,
) -> Result<String> {
    let output = match command {
        Command::Get { key, default } => {
            let default = parse_default(default.as_deref(), json)?;
            cache.get(&key, default).await?.to_string()
        }
        Command::Set { key, value, ttl } => {
            let ttl = resolve_ttl(ttl.as_deref(), default_ttl)?;
            let value = parse_value(&value, json)?;
            cache.set(&key, &value, ttl).await?.to_string()
        }
        Command::Delete { key } => cache.delete(&key).await?.to_string(),
        Command::Has { key } => cache.has(&key).await?.to_string(),
        Command::Clear => cache.clear().await?.to_string(),
        Command::GetMany { keys, default } => {
            let default = parse_default(default.as_deref(), json)?;
            cache
                .get_multiple(keys, default)
                .await?
                .into_iter()
                .map(|(key, value)| format!("{}\t{}", key, value))
                .collect::<Vec<_>>()
                .join("\n")
        }
        Command::SetMany { pairs, ttl } => {
            let ttl = resolve_ttl(ttl.as_deref(), default_ttl)?;
            let values = pairs
                .into_iter()
                .map(|(key, raw)| Ok((key, parse_value(&raw, json)?)))
                .collect::<Result<Vec<_>>>()?;
            cache.set_multiple(values, ttl).await?.to_string()
        }
        Command::DeleteMany { keys } => cache.delete_multiple(keys).await?.to_string(),
        Command::Shell => {
            return Err(shared::Error::invalid_argument(
                "shell cannot be nested inside a shell",
            ));
        }
    };
    Ok(output)
}
