//! Key-value storage the library persists its state into.

use crate::error::Result;
use std::collections::HashMap;

/// Decks (`{ "decks": [...] }`).
pub const DATA_KEY: &str = "mindflash:data:v1";
/// Preferences (`{ "theme": ... }`).
pub const PREFS_KEY: &str = "mindflash:prefs:v1";
/// Review log (`{ "YYYY-MM-DD": count }`).
pub const REVIEW_LOG_KEY: &str = "mindflash:reviews:v1";

/// String keys to JSON string values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Store that lives only as long as the process. Used by tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(DATA_KEY).unwrap(), None);

        store.set(DATA_KEY, "{}").unwrap();
        store.set(DATA_KEY, r#"{"decks":[]}"#).unwrap();
        assert_eq!(store.get(DATA_KEY).unwrap().as_deref(), Some(r#"{"decks":[]}"#));
        assert_eq!(store.len(), 1);

        store.remove(DATA_KEY).unwrap();
        store.remove(DATA_KEY).unwrap();
        assert!(store.is_empty());
    }
}
