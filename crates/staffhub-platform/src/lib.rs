//! # StaffHub Platform
//!
//! Backends behind the [`DocumentStore`] trait (SQLite cache, Firestore REST),
//! the tenant read service that degrades to cached data, and the
//! root-to-tenant migration engine.

pub mod db;
pub mod firestore;
pub mod migration;
pub mod service;

pub use db::SqliteStore;
pub use firestore::FirestoreStore;
pub use migration::{MigrationOptions, MigrationSummary, Migrator};
pub use service::{DataSource, Sourced, StoreProbe, TenantService};

use staffhub_core::config::{BackendConfig, BackendKind};
use staffhub_core::error::Result;
use staffhub_core::traits::DocumentStore;
use std::sync::Arc;

/// Create the primary store from configuration.
pub fn create_store(config: &BackendConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.kind {
        BackendKind::Firestore => Ok(Arc::new(FirestoreStore::new(config)?)),
        BackendKind::Sqlite => Ok(Arc::new(SqliteStore::open(&config.sqlite_path)?)),
    }
}

/// Create the local cache store, if one is configured.
pub fn create_cache(config: &BackendConfig) -> Result<Option<Arc<dyn DocumentStore>>> {
    match &config.cache_path {
        Some(path) => Ok(Some(Arc::new(SqliteStore::open(path)?))),
        None => Ok(None),
    }
}
