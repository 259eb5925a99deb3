use shared::{Error, Result};

/// Guard applied to every key before the store is touched.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::invalid_argument("cache key must not be empty"));
    }
    Ok(())
}

/// Validate a whole key collection up front so a bad element rejects the call
/// before any of its siblings reach the store.
pub fn collect_keys<I, K>(keys: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    keys.into_iter()
        .enumerate()
        .map(|(idx, key)| {
            let key = key.as_ref();
            validate_key(key).map_err(|_| {
                Error::invalid_argument(format!("cache key at position {} must not be empty", idx))
            })?;
            Ok(key.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        assert!(validate_key("").unwrap_err().is_invalid_argument());
        assert!(validate_key("someKey").is_ok());
    }

    #[test]
    fn test_collect_keys_preserves_order() {
        let keys = collect_keys(["k2", "k1", "k3"]).unwrap();
        assert_eq!(keys, vec!["k2", "k1", "k3"]);
    }

    #[test]
    fn test_collect_keys_rejects_whole_collection() {
        let err = collect_keys(vec!["k1".to_string(), String::new()]).unwrap_err();
        assert!(err.to_string().contains("position 1"));
    }
}
