//! Shared, lock-protected settings holder.
//!
//! Readers (`network_magic`, `validators_count`, `standby_committee`,
//! `database`) may run concurrently from any number of message-processing
//! workers. Writers (`load`, `merge`, `reset_to_default`) and the one-time
//! population of the committee cache and database memo take the write lock,
//! and the caches are re-checked after the lock is acquired.

use {
    crate::{
        config::Settings,
        error::{DatabaseError, Result, SettingsError},
        storage::{Database, DatabaseFactory, DatabaseRegistry},
    },
    dbft_primitives::EcPoint,
    log::{debug, info, warn},
    parking_lot::RwLock,
    serde_json::Value,
    std::{
        path::Path,
        sync::{Arc, LazyLock},
    },
};

static SETTINGS: LazyLock<ConfigurationStore> = LazyLock::new(ConfigurationStore::default);

/// The process-wide settings, initialised with the compiled-in defaults.
///
/// Startup code should [`load`](ConfigurationStore::load) the node's settings
/// before any consensus traffic is processed.
pub fn settings() -> &'static ConfigurationStore {
    &SETTINGS
}

#[derive(Debug)]
struct State {
    settings: Settings,
    /// Decoded `network.standby_committee`. Survives `merge`; cleared by
    /// `load` and `reset_to_default`.
    standby_committee: Option<Arc<[EcPoint]>>,
    /// Backend injected by the embedder. Wins over the provider table.
    injected_db: Option<Arc<dyn Database>>,
    /// Backend built from the provider table on first use.
    resolved_db: Option<Arc<dyn Database>>,
}

impl State {
    fn new(settings: Settings) -> Self {
        Self {
            settings,
            standby_committee: None,
            injected_db: None,
            resolved_db: None,
        }
    }

    /// The answer to `try_database` when no factory has to run.
    fn known_database(&self) -> Option<Option<Arc<dyn Database>>> {
        if let Some(db) = &self.injected_db {
            return Some(Some(Arc::clone(db)));
        }
        if !self.settings.storage.use_default {
            return Some(None);
        }
        self.resolved_db.as_ref().map(|db| Some(Arc::clone(db)))
    }
}

/// Holder of the network, validator and storage settings.
#[derive(Debug)]
pub struct ConfigurationStore {
    state: RwLock<State>,
    registry: RwLock<DatabaseRegistry>,
}

impl Default for ConfigurationStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl ConfigurationStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: RwLock::new(State::new(settings)),
            registry: RwLock::new(DatabaseRegistry::default()),
        }
    }

    pub fn from_json(doc: Value) -> Result<Self> {
        Settings::from_json(doc).map(Self::new)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Settings::from_file(path).map(Self::new)
    }

    /// Replace every setting and drop the derived caches. An injected
    /// database is kept.
    pub fn load(&self, settings: Settings) {
        let mut state = self.state.write();
        state.settings = settings;
        state.standby_committee = None;
        state.resolved_db = None;
        info!(
            "settings loaded: magic={} validators_count={}",
            state.settings.network.magic, state.settings.network.validators_count
        );
    }

    /// Shallow-merge `partial` into the current settings.
    ///
    /// The committee cache is left alone; call
    /// [`reset_to_default`](Self::reset_to_default) or [`load`](Self::load)
    /// to recompute it. A memoized database is dropped so that storage
    /// changes take effect.
    pub fn merge(&self, partial: Value) -> Result<()> {
        let mut state = self.state.write();
        state.settings.merge(partial)?;
        state.resolved_db = None;
        Ok(())
    }

    /// Drop all state, including any injected database, and reinstate the
    /// compiled-in defaults. Registered database factories are kept.
    pub fn reset_to_default(&self) {
        *self.state.write() = State::new(Settings::default());
        info!("settings reset to defaults");
    }

    /// A copy of the current settings.
    pub fn snapshot(&self) -> Settings {
        self.state.read().settings.clone()
    }

    pub fn network_magic(&self) -> u32 {
        self.state.read().settings.network.magic
    }

    pub fn validators_count(&self) -> usize {
        self.state.read().settings.network.validators_count
    }

    /// The decoded standby committee, in rank order.
    ///
    /// Decoded on first call and cached; repeated calls return the same
    /// allocation until the cache is cleared.
    pub fn standby_committee(&self) -> Result<Arc<[EcPoint]>> {
        self.committee_and_count().map(|(committee, _)| committee)
    }

    /// The first `validators_count` members of the standby committee.
    pub fn standby_validators(&self) -> Result<Vec<EcPoint>> {
        let (committee, validators_count) = self.committee_and_count()?;
        committee
            .get(..validators_count)
            .map(<[EcPoint]>::to_vec)
            .ok_or(SettingsError::InsufficientCommittee {
                validators_count,
                committee_len: committee.len(),
            })
    }

    fn committee_and_count(&self) -> Result<(Arc<[EcPoint]>, usize)> {
        {
            let state = self.state.read();
            if let Some(committee) = &state.standby_committee {
                return Ok((
                    Arc::clone(committee),
                    state.settings.network.validators_count,
                ));
            }
        }

        let mut state = self.state.write();
        let committee = match &state.standby_committee {
            Some(committee) => Arc::clone(committee),
            None => {
                let decoded = decode_committee(&state.settings.network.standby_committee)?;
                debug!("decoded standby committee of {} keys", decoded.len());
                state.standby_committee = Some(Arc::clone(&decoded));
                decoded
            }
        };
        Ok((committee, state.settings.network.validators_count))
    }

    /// Inject a backend that takes precedence over the provider table.
    pub fn set_database(&self, db: Arc<dyn Database>) {
        self.state.write().injected_db = Some(db);
    }

    /// Make `class_path` resolvable from provider entries.
    pub fn register_database_factory(&self, class_path: impl Into<String>, factory: DatabaseFactory) {
        self.registry.write().register(class_path, factory);
    }

    /// Resolve the storage backend, reporting why resolution failed.
    ///
    /// Returns the injected backend if there is one, `Ok(None)` when
    /// `storage.use_default` is false, and otherwise builds the default
    /// provider through the registry. A successful build is memoized.
    pub fn try_database(&self) -> std::result::Result<Option<Arc<dyn Database>>, DatabaseError> {
        if let Some(known) = self.state.read().known_database() {
            return Ok(known);
        }

        let mut state = self.state.write();
        if let Some(known) = state.known_database() {
            return Ok(known);
        }

        let storage = &state.settings.storage;
        let provider = storage
            .providers
            .get(&storage.default_provider)
            .ok_or_else(|| DatabaseError::UnknownProvider(storage.default_provider.clone()))?;
        let db = self
            .registry
            .read()
            .create(&provider.class_path, &provider.options)?;
        info!(
            "storage provider '{}' resolved via {}",
            storage.default_provider, provider.class_path
        );
        state.resolved_db = Some(Arc::clone(&db));
        Ok(Some(db))
    }

    /// The storage backend, or `None` if there is none or it failed to
    /// resolve. The failure is logged; use [`try_database`](Self::try_database)
    /// to inspect it.
    pub fn database(&self) -> Option<Arc<dyn Database>> {
        self.try_database().unwrap_or_else(|err| {
            warn!("storage backend unavailable: {err}");
            None
        })
    }
}

fn decode_committee(keys: &[String]) -> Result<Arc<[EcPoint]>> {
    keys.iter()
        .enumerate()
        .map(|(index, key)| {
            EcPoint::from_hex(key).map_err(|source| SettingsError::InvalidCommitteeKey { index, source })
        })
        .collect::<Result<Vec<_>>>()
        .map(Arc::from)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            config::DEFAULT_STANDBY_COMMITTEE_KEY,
            storage::{MemoryDb, LEVEL_DB_FACTORY},
        },
        assert_matches::assert_matches,
        serde_json::{json, Map},
        std::thread,
    };

    const KEY_1: &str = "036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296";
    const KEY_2: &str = "037cf27b188d034f7e8a52380304b51ac3c08969e277f21b35a60b48fc47669978";
    const KEY_3: &str = "025ecbe4d1a6330a44c8f7ef951d4bf165e6c6b721efada985fb41661bc6e7fd6c";

    fn three_member_store(validators_count: usize) -> ConfigurationStore {
        ConfigurationStore::from_json(json!({
            "network": {
                "magic": 1,
                "validators_count": validators_count,
                "standby_committee": [KEY_1, KEY_2, KEY_3],
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_default_standby_validators() {
        let store = ConfigurationStore::default();
        assert_eq!(store.network_magic(), 5_195_086);
        assert_eq!(store.validators_count(), 1);
        let validators = store.standby_validators().unwrap();
        assert_eq!(validators.len(), 1);
        assert_eq!(validators[0].to_hex(), DEFAULT_STANDBY_COMMITTEE_KEY);
    }

    #[test]
    fn test_standby_validators_is_committee_prefix() {
        let store = three_member_store(2);
        let validators = store.standby_validators().unwrap();
        assert_eq!(
            validators.iter().map(EcPoint::to_hex).collect::<Vec<_>>(),
            vec![KEY_1, KEY_2]
        );
        assert_eq!(store.standby_committee().unwrap().len(), 3);
    }

    #[test]
    fn test_standby_validators_exceeding_committee() {
        let store = three_member_store(4);
        assert_matches!(
            store.standby_validators(),
            Err(SettingsError::InsufficientCommittee {
                validators_count: 4,
                committee_len: 3
            })
        );
    }

    #[test]
    fn test_committee_is_cached() {
        let store = three_member_store(3);
        let first = store.standby_committee().unwrap();
        let second = store.standby_committee().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_merge_keeps_committee_cache() {
        let store = three_member_store(3);
        let before = store.standby_committee().unwrap();
        store
            .merge(json!({ "network": { "validators_count": 1, "standby_committee": [KEY_3] } }))
            .unwrap();
        let after = store.standby_committee().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(store.validators_count(), 1);
        // Validators are drawn from the stale cache until it is reset.
        assert_eq!(store.standby_validators().unwrap()[0].to_hex(), KEY_1);
    }

    #[test]
    fn test_reset_recomputes_committee() {
        let store = three_member_store(3);
        assert_eq!(store.standby_committee().unwrap().len(), 3);
        store.reset_to_default();
        let committee = store.standby_committee().unwrap();
        assert_eq!(committee.len(), 1);
        assert_eq!(committee[0].to_hex(), DEFAULT_STANDBY_COMMITTEE_KEY);
        assert_eq!(store.snapshot(), Settings::default());
    }

    #[test]
    fn test_load_clears_committee_cache() {
        let store = three_member_store(3);
        assert_eq!(store.standby_committee().unwrap().len(), 3);
        store.load(Settings::default());
        assert_eq!(store.standby_committee().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_committee_key_is_not_cached() {
        let store = ConfigurationStore::from_json(json!({
            "network": { "standby_committee": [KEY_1, "02deadbeef"] }
        }))
        .unwrap();
        assert_matches!(
            store.standby_committee(),
            Err(SettingsError::InvalidCommitteeKey { index: 1, .. })
        );
        store.load(Settings::default());
        assert!(store.standby_committee().is_ok());
    }

    #[test]
    fn test_concurrent_committee_population() {
        let store = Arc::new(three_member_store(3));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.standby_committee().unwrap())
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for committee in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], committee));
        }
    }

    #[test]
    fn test_default_database_is_memory_and_memoized() {
        dbft_logger::setup();
        let store = ConfigurationStore::default();
        let first = store.database().unwrap();
        first.put(b"key", b"value");
        let second = store.database().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.get(b"key"), Some(b"value".to_vec()));
    }

    #[test]
    fn test_database_disabled() {
        let store = ConfigurationStore::default();
        store
            .merge(json!({ "storage": {
                "use_default": false,
                "default_provider": "memory",
                "providers": {
                    "memory": { "class_path": "dbft_settings::storage::MemoryDb" }
                }
            }}))
            .unwrap();
        assert!(store.database().is_none());
        assert_matches!(store.try_database(), Ok(None));
    }

    #[test]
    fn test_unregistered_provider_resolves_to_none() {
        let store = ConfigurationStore::default();
        let mut storage = store.snapshot().storage;
        storage.default_provider = "leveldb".to_string();
        store
            .merge(json!({ "storage": serde_json::to_value(&storage).unwrap() }))
            .unwrap();
        assert!(store.database().is_none());
        assert_matches!(
            store.try_database(),
            Err(DatabaseError::UnknownFactory(path)) if path == LEVEL_DB_FACTORY
        );
    }

    #[test]
    fn test_missing_provider_resolves_to_none() {
        let store = ConfigurationStore::default();
        store
            .merge(json!({ "storage": { "default_provider": "nowhere", "providers": {} } }))
            .unwrap();
        assert!(store.database().is_none());
        assert_matches!(
            store.try_database(),
            Err(DatabaseError::UnknownProvider(name)) if name == "nowhere"
        );
    }

    #[test]
    fn test_registered_factory_becomes_resolvable() {
        fn leveldb_stand_in(_: &Map<String, Value>) -> std::result::Result<Arc<dyn Database>, DatabaseError> {
            Ok(Arc::new(MemoryDb::new()))
        }

        let store = ConfigurationStore::default();
        store
            .merge(json!({ "storage": {
                "default_provider": "leveldb",
                "providers": { "leveldb": { "class_path": LEVEL_DB_FACTORY } }
            }}))
            .unwrap();
        assert!(store.database().is_none());
        store.register_database_factory(LEVEL_DB_FACTORY, leveldb_stand_in);
        assert!(store.database().is_some());
    }

    #[test]
    fn test_injected_database_wins() {
        let store = ConfigurationStore::default();
        store
            .merge(json!({ "storage": { "use_default": false } }))
            .unwrap();
        let injected: Arc<dyn Database> = Arc::new(MemoryDb::new());
        store.set_database(Arc::clone(&injected));
        assert!(Arc::ptr_eq(&store.database().unwrap(), &injected));

        store.reset_to_default();
        let resolved = store.database().unwrap();
        assert!(!Arc::ptr_eq(&resolved, &injected));
    }

    #[test]
    fn test_global_settings_defaults() {
        assert_eq!(settings().snapshot().network.magic, settings().network_magic());
    }
}
