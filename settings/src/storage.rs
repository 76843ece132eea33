//! Storage backends and the registry that constructs them by name.
//!
//! Provider entries in the settings document name a factory through their
//! `class_path`. The [`DatabaseRegistry`] maps that string to a constructor
//! registered at startup; nothing is loaded dynamically.

use {
    crate::error::DatabaseError,
    parking_lot::RwLock,
    serde_json::{Map, Value},
    std::{collections::HashMap, fmt, sync::Arc},
};

/// Factory path of the built-in in-memory backend.
pub const MEMORY_DB_FACTORY: &str = "dbft_settings::storage::MemoryDb";
/// Factory path reserved for an on-disk LevelDB backend.
pub const LEVEL_DB_FACTORY: &str = "dbft_settings::storage::LevelDb";
/// Factory path reserved for a PostgreSQL backend.
pub const POSTGRES_DB_FACTORY: &str = "dbft_settings::storage::PostgresDb";

/// Minimal key/value contract a node needs from its storage engine.
pub trait Database: fmt::Debug + Send + Sync {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn put(&self, key: &[u8], value: &[u8]);

    fn delete(&self, key: &[u8]);

    fn contains(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

/// Volatile backend, used by default and in tests.
#[derive(Debug, Default)]
pub struct MemoryDb {
    entries: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Database for MemoryDb {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: &[u8], value: &[u8]) {
        self.entries.write().insert(key.to_vec(), value.to_vec());
    }

    fn delete(&self, key: &[u8]) {
        self.entries.write().remove(key);
    }

    fn contains(&self, key: &[u8]) -> bool {
        self.entries.read().contains_key(key)
    }
}

/// Builds a backend from a provider's `options`.
pub type DatabaseFactory =
    fn(&Map<String, Value>) -> Result<Arc<dyn Database>, DatabaseError>;

fn memory_db_factory(_options: &Map<String, Value>) -> Result<Arc<dyn Database>, DatabaseError> {
    Ok(Arc::new(MemoryDb::new()))
}

/// `class_path` → constructor table.
#[derive(Clone)]
pub struct DatabaseRegistry {
    factories: HashMap<String, DatabaseFactory>,
}

impl DatabaseRegistry {
    /// A registry with no factories at all.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register (or replace) the factory for `class_path`.
    pub fn register(&mut self, class_path: impl Into<String>, factory: DatabaseFactory) {
        self.factories.insert(class_path.into(), factory);
    }

    pub fn contains(&self, class_path: &str) -> bool {
        self.factories.contains_key(class_path)
    }

    pub fn create(
        &self,
        class_path: &str,
        options: &Map<String, Value>,
    ) -> Result<Arc<dyn Database>, DatabaseError> {
        let factory = self
            .factories
            .get(class_path)
            .ok_or_else(|| DatabaseError::UnknownFactory(class_path.to_string()))?;
        factory(options)
    }
}

impl Default for DatabaseRegistry {
    /// Only the in-memory backend is built in.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(MEMORY_DB_FACTORY, memory_db_factory);
        registry
    }
}

impl fmt::Debug for DatabaseRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<&String> = self.factories.keys().collect();
        paths.sort();
        f.debug_struct("DatabaseRegistry")
            .field("factories", &paths)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches};

    #[test]
    fn test_memory_db_basic_ops() {
        let db = MemoryDb::new();
        assert!(db.is_empty());
        db.put(b"k", b"v1");
        db.put(b"k", b"v2");
        assert_eq!(db.get(b"k"), Some(b"v2".to_vec()));
        assert!(db.contains(b"k"));
        assert_eq!(db.len(), 1);
        db.delete(b"k");
        assert!(!db.contains(b"k"));
        assert_eq!(db.get(b"k"), None);
    }

    #[test]
    fn test_default_registry_has_memory_only() {
        let registry = DatabaseRegistry::default();
        assert!(registry.contains(MEMORY_DB_FACTORY));
        assert!(!registry.contains(LEVEL_DB_FACTORY));
        assert!(!registry.contains(POSTGRES_DB_FACTORY));
        assert!(registry.create(MEMORY_DB_FACTORY, &Map::new()).is_ok());
    }

    #[test]
    fn test_unknown_factory() {
        let registry = DatabaseRegistry::default();
        assert_matches!(
            registry.create(LEVEL_DB_FACTORY, &Map::new()),
            Err(DatabaseError::UnknownFactory(path)) if path == LEVEL_DB_FACTORY
        );
    }

    #[test]
    fn test_register_custom_factory() {
        fn failing(options: &Map<String, Value>) -> Result<Arc<dyn Database>, DatabaseError> {
            Err(DatabaseError::Backend {
                class_path: "test::Failing".to_string(),
                reason: format!("{} options", options.len()),
            })
        }

        let mut registry = DatabaseRegistry::empty();
        registry.register("test::Failing", failing);
        assert_matches!(
            registry.create("test::Failing", &Map::new()),
            Err(DatabaseError::Backend { reason, .. }) if reason == "0 options"
        );
    }
}
