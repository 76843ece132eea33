//! Node settings and validator context.
//!
//! [`ConfigurationStore`] is the shared holder consulted by the consensus
//! codec for the network magic and validator count, by consensus logic for
//! the standby committee, and by startup code for the storage backend. A
//! process-wide instance is available through [`settings()`]; tests and
//! embedders can build their own.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`]  | Typed settings document, compiled-in defaults, validation |
//! | [`store`]   | `ConfigurationStore`: locking, committee cache, backend resolution |
//! | [`storage`] | `Database` trait, in-memory backend, factory registry |
//! | [`error`]   | Crate-wide error enums |

pub mod config;
pub mod error;
pub mod storage;
pub mod store;

pub use {
    config::{NetworkSettings, ProviderSettings, Settings, StorageSettings},
    error::{DatabaseError, Result, SettingsError},
    storage::{Database, DatabaseFactory, DatabaseRegistry, MemoryDb},
    store::{settings, ConfigurationStore},
};
