//! Error types for settings loading and storage resolution.

use {dbft_primitives::CodecError, std::path::PathBuf, thiserror::Error};

/// Errors raised while loading or interpreting settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid JSON or does not fit the schema.
    #[error("malformed settings document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A partial update was not a JSON object.
    #[error("settings update must be a JSON object")]
    NotAMapping,

    /// A standby committee entry is not a hex-encoded secp256r1 key.
    #[error("standby committee key {index} is invalid: {source}")]
    InvalidCommitteeKey {
        index: usize,
        #[source]
        source: CodecError,
    },

    /// More validators requested than committee members configured.
    #[error("validators_count {validators_count} exceeds standby committee size {committee_len}")]
    InsufficientCommittee {
        validators_count: usize,
        committee_len: usize,
    },

    #[error("validators_count must be at least 1")]
    InvalidValidatorsCount,
}

/// Reasons a storage backend could not be produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    /// `storage.default_provider` names an entry missing from `storage.providers`.
    #[error("storage provider '{0}' is not configured")]
    UnknownProvider(String),

    /// No factory is registered under the provider's `class_path`.
    #[error("no database factory registered for '{0}'")]
    UnknownFactory(String),

    /// The factory ran but rejected its options or failed to open the backend.
    #[error("database factory '{class_path}' failed: {reason}")]
    Backend { class_path: String, reason: String },
}

/// Convenience result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
