//! Typed settings document.
//!
//! The on-disk form is JSON:
//!
//! ```json
//! {
//!   "network": {
//!     "magic": 5195086,
//!     "seedlist": [],
//!     "validators_count": 1,
//!     "standby_committee": ["02158c4a..."]
//!   },
//!   "storage": {
//!     "use_default": true,
//!     "default_provider": "memory",
//!     "providers": {
//!       "memory": { "class_path": "dbft_settings::storage::MemoryDb", "options": {} }
//!     }
//!   },
//!   "native_contract_activation": {}
//! }
//! ```
//!
//! Every section and field falls back to the compiled-in default when absent,
//! and camelCase spellings (`validatorsCount`, `classPath`, ...) are accepted.

use {
    crate::{
        error::{Result, SettingsError},
        storage::{LEVEL_DB_FACTORY, MEMORY_DB_FACTORY, POSTGRES_DB_FACTORY},
    },
    log::info,
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
    std::{collections::BTreeMap, fs, path::Path},
};

/// Network magic of the default network.
pub const DEFAULT_MAGIC: u32 = 5_195_086;

/// Sole member of the default standby committee.
pub const DEFAULT_STANDBY_COMMITTEE_KEY: &str =
    "02158c4a4810fa2a6a12f7d33d835680429e1a68ae61161c5b3fbc98c7f1f17765";

/// Network identity and validator parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Salts every consensus payload hash so messages cannot be replayed
    /// across networks.
    pub magic: u32,

    /// Peers contacted at startup, as `host:port` strings.
    pub seedlist: Vec<String>,

    /// Number of committee members that act as validators. The first
    /// `validators_count` entries of `standby_committee` are the validators.
    #[serde(alias = "validatorsCount")]
    pub validators_count: usize,

    /// Hex-encoded compressed secp256r1 keys, in rank order.
    #[serde(alias = "standbyCommittee")]
    pub standby_committee: Vec<String>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            magic: DEFAULT_MAGIC,
            seedlist: Vec::new(),
            validators_count: 1,
            standby_committee: vec![DEFAULT_STANDBY_COMMITTEE_KEY.to_string()],
        }
    }
}

/// One entry of the storage provider table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Key into the [`DatabaseRegistry`](crate::storage::DatabaseRegistry).
    #[serde(alias = "classPath")]
    pub class_path: String,

    /// Handed verbatim to the factory.
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl ProviderSettings {
    pub fn new(class_path: impl Into<String>, options: Map<String, Value>) -> Self {
        Self {
            class_path: class_path.into(),
            options,
        }
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// When false, no backend is resolved from the provider table.
    #[serde(alias = "useDefault")]
    pub use_default: bool,

    #[serde(alias = "defaultProvider")]
    pub default_provider: String,

    pub providers: BTreeMap<String, ProviderSettings>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let mut leveldb = Map::new();
        leveldb.insert("path".to_string(), Value::from("/tmp/dbft/"));

        let mut postgresql = Map::new();
        postgresql.insert("host".to_string(), Value::from("127.0.0.1"));
        postgresql.insert("port".to_string(), Value::from(5432));

        let providers = BTreeMap::from([
            (
                "memory".to_string(),
                ProviderSettings::new(MEMORY_DB_FACTORY, Map::new()),
            ),
            (
                "leveldb".to_string(),
                ProviderSettings::new(LEVEL_DB_FACTORY, leveldb),
            ),
            (
                "postgresql".to_string(),
                ProviderSettings::new(POSTGRES_DB_FACTORY, postgresql),
            ),
        ]);

        Self {
            use_default: true,
            default_provider: "memory".to_string(),
            providers,
        }
    }
}

/// The complete settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub network: NetworkSettings,
    pub storage: StorageSettings,

    /// Native contract name → block height at which it becomes active.
    #[serde(alias = "nativeContractActivation")]
    pub native_contract_activation: BTreeMap<String, u32>,
}

impl Settings {
    /// Build settings from an already-parsed document.
    ///
    /// Feeding back the output of [`Settings::to_json`] yields an equal value.
    pub fn from_json(doc: Value) -> Result<Self> {
        Ok(serde_json::from_value(doc)?)
    }

    /// Read and parse a JSON settings file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&content)?;
        info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Shallow update: each top-level key of `partial` replaces the whole
    /// section of the same name; sections not mentioned are left untouched.
    pub fn merge(&mut self, partial: Value) -> Result<()> {
        let Value::Object(partial) = partial else {
            return Err(SettingsError::NotAMapping);
        };
        let Value::Object(mut current) = self.to_json()? else {
            return Err(SettingsError::NotAMapping);
        };
        for (key, value) in partial {
            current.insert(canonical_section_name(&key).to_string(), value);
        }
        *self = Self::from_json(Value::Object(current))?;
        Ok(())
    }

    /// Consistency checks worth running once at startup.
    pub fn validate(&self) -> Result<()> {
        let validators_count = self.network.validators_count;
        if validators_count == 0 {
            return Err(SettingsError::InvalidValidatorsCount);
        }
        let committee_len = self.network.standby_committee.len();
        if validators_count > committee_len {
            return Err(SettingsError::InsufficientCommittee {
                validators_count,
                committee_len,
            });
        }
        Ok(())
    }
}

fn canonical_section_name(key: &str) -> &str {
    match key {
        "nativeContractActivation" => "native_contract_activation",
        other => other,
    }
}
