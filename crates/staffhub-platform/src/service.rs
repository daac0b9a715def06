//! Tenant-scoped reads with graceful degradation.
//!
//! Network and permission failures stop here: the caller gets cached data (or
//! an empty result) tagged with where it came from, and the connectivity
//! monitor hears about the failure. Only internal errors propagate.

use async_trait::async_trait;
use serde::Serialize;
use staffhub_connectivity::{ConnectivityMonitor, ConnectivityProbe, ErrorClass, classify_error};
use staffhub_core::error::{Result, StaffHubError};
use staffhub_core::paths::{ResourceType, TENANTS_ROOT, TenantPaths, validate_document_id};
use staffhub_core::tenant::TenantId;
use staffhub_core::traits::DocumentStore;
use staffhub_core::types::{Document, WriteOp};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Primary,
    Cache,
    /// Neither the backend nor the cache could answer.
    Empty,
}

/// A value tagged with where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct Sourced<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    fn new(value: T, source: DataSource) -> Self {
        Self { value, source }
    }
}

pub struct TenantService {
    primary: Arc<dyn DocumentStore>,
    cache: Option<Arc<dyn DocumentStore>>,
    monitor: ConnectivityMonitor,
}

impl TenantService {
    pub fn new(
        primary: Arc<dyn DocumentStore>,
        cache: Option<Arc<dyn DocumentStore>>,
        monitor: ConnectivityMonitor,
    ) -> Self {
        Self { primary, cache, monitor }
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    /// All documents of a tenant collection.
    pub async fn list(&self, tenant: &TenantId, resource: ResourceType) -> Result<Sourced<Vec<Document>>> {
        let path = TenantPaths::new(tenant.clone()).collection(resource);

        if self.monitor.should_use_fallback() {
            tracing::debug!("Backend unavailable; serving {path} from cache");
            return Ok(self.cached_list(&path).await);
        }

        let result = self.primary.list_documents(&path).await;
        self.monitor.observe(&result);
        match result {
            Ok(docs) => {
                self.sync_collection(&path, &docs).await;
                Ok(Sourced::new(docs, DataSource::Primary))
            }
            Err(e) => {
                self.degrade(&path, e)?;
                Ok(self.cached_list(&path).await)
            }
        }
    }

    /// One tenant document.
    pub async fn get(&self, tenant: &TenantId, resource: ResourceType, id: &str) -> Result<Sourced<Option<Document>>> {
        validate_document_id(id)?;
        let path = TenantPaths::new(tenant.clone()).document(resource, id);

        if self.monitor.should_use_fallback() {
            return Ok(self.cached_get(&path).await);
        }

        let result = self.primary.get_document(&path).await;
        self.monitor.observe(&result);
        match result {
            Ok(doc) => {
                if let Some(d) = &doc {
                    self.write_through(vec![WriteOp::Set { path: d.path.clone(), data: d.data.clone() }]).await;
                }
                Ok(Sourced::new(doc, DataSource::Primary))
            }
            Err(e) => {
                self.degrade(&path, e)?;
                Ok(self.cached_get(&path).await)
            }
        }
    }

    /// Swallow network/permission errors, propagate the rest.
    fn degrade(&self, path: &str, error: StaffHubError) -> Result<()> {
        match classify_error(&error) {
            ErrorClass::Network => {
                tracing::warn!("Network error reading {path}, falling back: {error}");
                Ok(())
            }
            ErrorClass::PermissionDenied => {
                tracing::warn!("Permission denied reading {path}, falling back: {error}");
                Ok(())
            }
            ErrorClass::Internal => Err(error),
        }
    }

    async fn cached_list(&self, path: &str) -> Sourced<Vec<Document>> {
        let Some(cache) = &self.cache else {
            return Sourced::new(Vec::new(), DataSource::Empty);
        };
        match cache.list_documents(path).await {
            Ok(docs) => Sourced::new(docs, DataSource::Cache),
            Err(e) => {
                tracing::warn!("Cache read of {path} failed: {e}");
                Sourced::new(Vec::new(), DataSource::Empty)
            }
        }
    }

    async fn cached_get(&self, path: &str) -> Sourced<Option<Document>> {
        let Some(cache) = &self.cache else {
            return Sourced::new(None, DataSource::Empty);
        };
        match cache.get_document(path).await {
            Ok(doc) => Sourced::new(doc, DataSource::Cache),
            Err(e) => {
                tracing::warn!("Cache read of {path} failed: {e}");
                Sourced::new(None, DataSource::Empty)
            }
        }
    }

    /// Make the cached copy of a collection match a full primary listing:
    /// upsert what the primary returned, drop what it no longer has.
    async fn sync_collection(&self, path: &str, docs: &[Document]) {
        let Some(cache) = &self.cache else { return };
        let live: HashSet<&str> = docs.iter().map(|d| d.path.as_str()).collect();
        let stale: Vec<Document> = match cache.list_documents(path).await {
            Ok(cached) => cached.into_iter().filter(|d| !live.contains(d.path.as_str())).collect(),
            Err(e) => {
                tracing::warn!("Cache read of {path} failed: {e}");
                Vec::new()
            }
        };
        if !stale.is_empty() {
            tracing::debug!("Dropping {} stale cached documents under {path}", stale.len());
        }
        let writes = docs
            .iter()
            .map(|d| WriteOp::Set { path: d.path.clone(), data: d.data.clone() })
            .chain(stale.into_iter().map(|d| WriteOp::Delete { path: d.path }))
            .collect();
        self.write_through(writes).await;
    }

    async fn write_through(&self, writes: Vec<WriteOp>) {
        let Some(cache) = &self.cache else { return };
        if writes.is_empty() {
            return;
        }
        if let Err(e) = cache.commit_batch(writes).await {
            tracing::warn!("Cache write-through failed: {e}");
        }
    }
}

/// Probes reachability with a point read of a sentinel document.
pub struct StoreProbe {
    store: Arc<dyn DocumentStore>,
}

impl StoreProbe {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ConnectivityProbe for StoreProbe {
    async fn ping(&self) -> Result<()> {
        self.store
            .get_document(&format!("{TENANTS_ROOT}/__ping__"))
            .await
            .map(|_| ())
    }
}
