//! Root-to-tenant migration.
//!
//! Copies every document of the configured flat root collections (e.g.
//! `employees/e1`) to the tenant namespace (`tenants/{tenantId}/employees/e1`),
//! keeping document IDs. Collections are processed one after another; documents
//! are written in batches. A failing document is recorded and the run moves on.
//! Re-running overwrites the same target paths, so a rerun from scratch is the
//! recovery path for a partial run.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use staffhub_core::config::MAX_BATCH_SIZE;
use staffhub_core::error::{Result, StaffHubError};
use staffhub_core::paths::{TenantPaths, validate_document_id};
use staffhub_core::tenant::TenantId;
use staffhub_core::traits::DocumentStore;
use staffhub_core::types::{Document, Fields, WriteOp};
use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Field stamped on every migrated document.
pub const TENANT_FIELD: &str = "tenantId";
pub const MIGRATED_AT_FIELD: &str = "migratedAt";

/// Would-migrate entries listed per collection in the rendered report.
const REPORT_LIST_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct MigrationOptions {
    pub tenant_id: TenantId,
    pub dry_run: bool,
    pub batch_size: usize,
    pub collections: Vec<String>,
    pub force: bool,
}

impl MigrationOptions {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(StaffHubError::Migration(format!(
                "batch size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                self.batch_size
            )));
        }
        if self.collections.is_empty() {
            return Err(StaffHubError::Migration("no collections to migrate".into()));
        }
        for name in &self.collections {
            if name.is_empty() || name.contains('/') {
                return Err(StaffHubError::Migration(format!(
                    "{name:?} is not a root collection name"
                )));
            }
        }
        Ok(())
    }

    /// Confirmation is needed for real writes unless forced.
    pub fn needs_confirmation(&self) -> bool {
        !self.dry_run && !self.force
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Empty, `.`/`..`, or containing `/`: it would not name one document in the target collection.
    InvalidId,
    /// The document already names a different tenant.
    OtherTenant { tenant_id: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId => f.write_str("invalid document ID"),
            Self::OtherTenant { tenant_id } => write!(f, "belongs to tenant {tenant_id}"),
        }
    }
}

/// Tagged per-document result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Migrated,
    WouldMigrate,
    Skipped { reason: SkipReason },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    pub document_id: String,
    pub source_path: String,
    pub target_path: String,
    pub outcome: DocumentOutcome,
}

/// An error attributed to a collection, and to a document when known.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationError {
    pub document_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub name: String,
    pub target_path: String,
    pub processed: usize,
    pub migrated: usize,
    pub would_migrate: usize,
    pub skipped: usize,
    pub errors: Vec<MigrationError>,
    pub results: Vec<DocumentResult>,
}

impl CollectionReport {
    fn new(name: &str, target_path: String) -> Self {
        Self {
            name: name.to_string(),
            target_path,
            processed: 0,
            migrated: 0,
            would_migrate: 0,
            skipped: 0,
            errors: Vec::new(),
            results: Vec::new(),
        }
    }

    fn record(&mut self, result: DocumentResult) {
        match &result.outcome {
            DocumentOutcome::Migrated => self.migrated += 1,
            DocumentOutcome::WouldMigrate => self.would_migrate += 1,
            DocumentOutcome::Skipped { .. } => self.skipped += 1,
            DocumentOutcome::Failed { error } => self.errors.push(MigrationError {
                document_id: Some(result.document_id.clone()),
                message: error.clone(),
            }),
        }
        self.results.push(result);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationSummary {
    pub run_id: String,
    pub tenant_id: TenantId,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub collections: Vec<CollectionReport>,
}

impl MigrationSummary {
    pub fn total_processed(&self) -> usize {
        self.collections.iter().map(|c| c.processed).sum()
    }

    pub fn total_migrated(&self) -> usize {
        self.collections.iter().map(|c| c.migrated).sum()
    }

    pub fn total_would_migrate(&self) -> usize {
        self.collections.iter().map(|c| c.would_migrate).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.collections.iter().map(|c| c.skipped).sum()
    }

    pub fn total_errors(&self) -> usize {
        self.collections.iter().map(|c| c.errors.len()).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors() > 0
    }

    /// Human-readable report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mode = if self.dry_run { "DRY RUN" } else { "LIVE" };
        let _ = writeln!(out, "Migration {} [{mode}] -> tenant '{}'", self.run_id, self.tenant_id);
        let elapsed = self.finished_at - self.started_at;
        let _ = writeln!(out, "Duration: {} ms", elapsed.num_milliseconds());
        let _ = writeln!(out);

        for c in &self.collections {
            let _ = writeln!(
                out,
                "{} -> {}: processed {}, {} {}, skipped {}, errors {}",
                c.name,
                c.target_path,
                c.processed,
                if self.dry_run { "would migrate" } else { "migrated" },
                if self.dry_run { c.would_migrate } else { c.migrated },
                c.skipped,
                c.errors.len()
            );
            if self.dry_run {
                let planned = c.results.iter().filter(|r| r.outcome == DocumentOutcome::WouldMigrate);
                for r in planned.clone().take(REPORT_LIST_LIMIT) {
                    let _ = writeln!(out, "    would migrate {} -> {}", r.source_path, r.target_path);
                }
                let more = planned.count().saturating_sub(REPORT_LIST_LIMIT);
                if more > 0 {
                    let _ = writeln!(out, "    ... and {more} more");
                }
            }
            for r in &c.results {
                if let DocumentOutcome::Skipped { reason } = &r.outcome {
                    let _ = writeln!(out, "    skipped {}: {reason}", r.source_path);
                }
            }
            for e in &c.errors {
                match &e.document_id {
                    Some(id) => {
                        let _ = writeln!(out, "    error {id}: {}", e.message);
                    }
                    None => {
                        let _ = writeln!(out, "    error: {}", e.message);
                    }
                }
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Total: processed {}, migrated {}, would migrate {}, skipped {}, errors {}",
            self.total_processed(),
            self.total_migrated(),
            self.total_would_migrate(),
            self.total_skipped(),
            self.total_errors()
        );
        out
    }
}

enum Plan {
    Skip(SkipReason),
    Write { target: String, data: Fields },
}

struct PendingWrite {
    document_id: String,
    source_path: String,
    target_path: String,
    data: Fields,
}

/// Runs one migration.
pub struct Migrator {
    store: Arc<dyn DocumentStore>,
    options: MigrationOptions,
    paths: TenantPaths,
}

impl Migrator {
    pub fn new(store: Arc<dyn DocumentStore>, options: MigrationOptions) -> Result<Self> {
        options.validate()?;
        let paths = TenantPaths::new(options.tenant_id.clone());
        Ok(Self { store, options, paths })
    }

    pub fn options(&self) -> &MigrationOptions {
        &self.options
    }

    /// Human-readable description of what a run will do, for confirmation prompts.
    pub fn describe(&self) -> String {
        format!(
            "Copy {} collection(s) [{}] from the root into {} on '{}' in batches of {}",
            self.options.collections.len(),
            self.options.collections.join(", "),
            self.paths.root(),
            self.store.name(),
            self.options.batch_size
        )
    }

    pub async fn run(&self) -> MigrationSummary {
        let started_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let stamp = started_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        tracing::info!(
            "🚚 Migration {run_id} started: tenant={}, dry_run={}, batch_size={}",
            self.options.tenant_id, self.options.dry_run, self.options.batch_size
        );

        let mut collections = Vec::with_capacity(self.options.collections.len());
        for name in &self.options.collections {
            let report = self.migrate_collection(name, &stamp).await;
            tracing::info!(
                "Collection {name}: processed={}, migrated={}, would_migrate={}, skipped={}, errors={}",
                report.processed, report.migrated, report.would_migrate, report.skipped, report.errors.len()
            );
            collections.push(report);
        }

        let summary = MigrationSummary {
            run_id,
            tenant_id: self.options.tenant_id.clone(),
            dry_run: self.options.dry_run,
            started_at,
            finished_at: Utc::now(),
            collections,
        };
        tracing::info!(
            "Migration {} finished: processed={}, errors={}",
            summary.run_id, summary.total_processed(), summary.total_errors()
        );
        summary
    }

    async fn migrate_collection(&self, name: &str, stamp: &str) -> CollectionReport {
        let mut report = CollectionReport::new(name, self.paths.named_collection(name));

        let docs = match self.store.list_documents(name).await {
            Ok(docs) => docs,
            Err(e) => {
                tracing::error!("Failed to read collection {name}: {e}");
                report.errors.push(MigrationError {
                    document_id: None,
                    message: format!("read failed: {e}"),
                });
                return report;
            }
        };

        for chunk in docs.chunks(self.options.batch_size) {
            let mut pending = Vec::new();
            for doc in chunk {
                report.processed += 1;
                match self.plan(name, doc, stamp) {
                    Plan::Skip(reason) => {
                        tracing::debug!("Skipping {}: {reason}", doc.path);
                        report.record(DocumentResult {
                            document_id: doc.id.clone(),
                            source_path: doc.path.clone(),
                            target_path: String::new(),
                            outcome: DocumentOutcome::Skipped { reason },
                        });
                    }
                    Plan::Write { target, .. } if self.options.dry_run => {
                        report.record(DocumentResult {
                            document_id: doc.id.clone(),
                            source_path: doc.path.clone(),
                            target_path: target,
                            outcome: DocumentOutcome::WouldMigrate,
                        });
                    }
                    Plan::Write { target, data } => pending.push(PendingWrite {
                        document_id: doc.id.clone(),
                        source_path: doc.path.clone(),
                        target_path: target,
                        data,
                    }),
                }
            }
            if !pending.is_empty() {
                self.commit_chunk(pending, &mut report).await;
            }
        }
        report
    }

    fn plan(&self, collection: &str, doc: &Document, stamp: &str) -> Plan {
        if validate_document_id(&doc.id).is_err() {
            return Plan::Skip(SkipReason::InvalidId);
        }
        if let Some(owner) = doc.str_field(TENANT_FIELD) {
            if owner != self.options.tenant_id.as_str() {
                return Plan::Skip(SkipReason::OtherTenant { tenant_id: owner.to_string() });
            }
        }
        let mut data = doc.data.clone();
        data.insert(TENANT_FIELD.into(), Value::String(self.options.tenant_id.to_string()));
        data.insert(MIGRATED_AT_FIELD.into(), Value::String(stamp.to_string()));
        Plan::Write {
            target: format!("{}/{}", self.paths.named_collection(collection), doc.id),
            data,
        }
    }

    /// Commit a chunk as one batch; if the batch is rejected, write its
    /// documents one by one so the failure lands on the document that caused it.
    async fn commit_chunk(&self, pending: Vec<PendingWrite>, report: &mut CollectionReport) {
        let writes = pending
            .iter()
            .map(|p| WriteOp::Set { path: p.target_path.clone(), data: p.data.clone() })
            .collect();

        let batch_error = match self.store.commit_batch(writes).await {
            Ok(()) => {
                tracing::debug!("Committed batch of {} into {}", pending.len(), report.target_path);
                for p in pending {
                    report.record(p.into_result(DocumentOutcome::Migrated));
                }
                return;
            }
            Err(e) => e,
        };

        // A single-document batch already names its culprit.
        if pending.len() == 1 {
            for p in pending {
                tracing::warn!("Failed to migrate {}: {batch_error}", p.source_path);
                report.record(p.into_result(DocumentOutcome::Failed { error: batch_error.to_string() }));
            }
            return;
        }

        tracing::warn!(
            "Batch of {} for {} failed ({batch_error}); writing documents individually",
            pending.len(),
            report.name
        );
        for p in pending {
            let outcome = match self.store.set_document(&p.target_path, p.data.clone()).await {
                Ok(()) => DocumentOutcome::Migrated,
                Err(e) => {
                    tracing::warn!("Failed to migrate {}: {e}", p.source_path);
                    DocumentOutcome::Failed { error: e.to_string() }
                }
            };
            report.record(p.into_result(outcome));
        }
    }
}

impl PendingWrite {
    fn into_result(self, outcome: DocumentOutcome) -> DocumentResult {
        DocumentResult {
            document_id: self.document_id,
            source_path: self.source_path,
            target_path: self.target_path,
            outcome,
        }
    }
}

/// Ask the operator to confirm. Only `y` / `yes` proceeds.
pub fn confirm<R: BufRead, W: Write>(mut reader: R, mut writer: W, prompt: &str) -> Result<bool> {
    write!(writer, "{prompt} Type 'yes' to continue: ")?;
    writer.flush()?;
    let mut answer = String::new();
    reader.read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "yes" || answer == "y")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fields(v: serde_json::Value) -> Fields {
        v.as_object().cloned().unwrap()
    }

    /// In-memory store with injectable failures.
    #[derive(Default)]
    struct MockStore {
        docs: Mutex<BTreeMap<String, Fields>>,
        failing_ids: HashSet<String>,
        unreadable: HashSet<String>,
        writes: AtomicUsize,
        batches: AtomicUsize,
    }

    impl MockStore {
        fn with_docs(collection: &str, n: usize) -> Self {
            let store = Self::default();
            store.seed(collection, n);
            store
        }

        fn seed(&self, collection: &str, n: usize) {
            let mut docs = self.docs.lock().unwrap();
            for i in 0..n {
                docs.insert(format!("{collection}/d{i}"), fields(json!({"n": i})));
            }
        }

        fn fails(&self, path: &str) -> bool {
            self.failing_ids.iter().any(|id| path.ends_with(&format!("/{id}")))
        }

        fn count(&self, prefix: &str) -> usize {
            self.docs.lock().unwrap().keys().filter(|k| k.starts_with(prefix)).count()
        }
    }

    #[async_trait]
    impl DocumentStore for MockStore {
        fn name(&self) -> &str {
            "mock"
        }

        async fn get_document(&self, path: &str) -> Result<Option<Document>> {
            Ok(self.docs.lock().unwrap().get(path).map(|d| Document::new(path, d.clone())))
        }

        async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
            if self.unreadable.contains(collection) {
                return Err(StaffHubError::network("unavailable"));
            }
            let prefix = format!("{collection}/");
            Ok(self
                .docs
                .lock()
                .unwrap()
                .iter()
                .filter(|(k, _)| k.starts_with(&prefix) && !k[prefix.len()..].contains('/'))
                .map(|(k, v)| Document::new(k.clone(), v.clone()))
                .collect())
        }

        async fn set_document(&self, path: &str, data: Fields) -> Result<()> {
            if self.fails(path) {
                return Err(StaffHubError::backend(format!("write rejected: {path}")));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.docs.lock().unwrap().insert(path.to_string(), data);
            Ok(())
        }

        async fn delete_document(&self, path: &str) -> Result<()> {
            self.docs.lock().unwrap().remove(path);
            Ok(())
        }

        async fn commit_batch(&self, writes: Vec<WriteOp>) -> Result<()> {
            self.batches.fetch_add(1, Ordering::SeqCst);
            if writes.iter().any(|w| self.fails(w.path())) {
                return Err(StaffHubError::backend("batch rejected"));
            }
            for w in writes {
                if let WriteOp::Set { path, data } = w {
                    self.writes.fetch_add(1, Ordering::SeqCst);
                    self.docs.lock().unwrap().insert(path, data);
                }
            }
            Ok(())
        }
    }

    fn options(collections: &[&str], dry_run: bool, batch_size: usize) -> MigrationOptions {
        MigrationOptions {
            tenant_id: TenantId::parse("acme").unwrap(),
            dry_run,
            batch_size,
            collections: collections.iter().map(|s| s.to_string()).collect(),
            force: true,
        }
    }

    #[tokio::test]
    async fn test_dry_run_reports_and_writes_nothing() {
        let store = Arc::new(MockStore::with_docs("employees", 7));
        let migrator = Migrator::new(store.clone(), options(&["employees"], true, 3)).unwrap();
        let summary = migrator.run().await;

        assert_eq!(summary.total_processed(), 7);
        assert_eq!(summary.total_would_migrate(), 7);
        assert_eq!(summary.total_migrated(), 0);
        let would: Vec<_> = summary.collections[0]
            .results
            .iter()
            .filter(|r| r.outcome == DocumentOutcome::WouldMigrate)
            .collect();
        assert_eq!(would.len(), 7);
        assert_eq!(would[0].target_path, "tenants/acme/employees/d0");

        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert_eq!(store.batches.load(Ordering::SeqCst), 0);
        assert_eq!(store.count("tenants/"), 0);
        assert!(summary.render().contains("would migrate employees/d0 -> tenants/acme/employees/d0"));
    }

    #[tokio::test]
    async fn test_migrates_in_batches_preserving_ids() {
        let store = Arc::new(MockStore::with_docs("departments", 5));
        let migrator = Migrator::new(store.clone(), options(&["departments"], false, 2)).unwrap();
        let summary = migrator.run().await;

        assert_eq!(summary.total_migrated(), 5);
        assert!(!summary.has_errors());
        assert_eq!(store.batches.load(Ordering::SeqCst), 3);
        let doc = store.get_document("tenants/acme/departments/d3").await.unwrap().unwrap();
        assert_eq!(doc.data["n"], json!(3));
        assert_eq!(doc.str_field(TENANT_FIELD), Some("acme"));
        assert!(doc.str_field(MIGRATED_AT_FIELD).is_some());
        // Source documents are left in place.
        assert!(store.get_document("departments/d3").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_document_failure_does_not_halt_run() {
        let mut store = MockStore::default();
        store.failing_ids.insert("d1".into());
        store.seed("employees", 4);
        store.seed("jobs", 2);
        let store = Arc::new(store);

        let migrator = Migrator::new(store.clone(), options(&["employees", "jobs"], false, 10)).unwrap();
        let summary = migrator.run().await;

        let employees = &summary.collections[0];
        assert_eq!(employees.processed, 4);
        assert_eq!(employees.migrated, 3);
        assert_eq!(employees.errors.len(), 1);
        assert_eq!(employees.errors[0].document_id.as_deref(), Some("d1"));
        assert!(store.get_document("tenants/acme/employees/d2").await.unwrap().is_some());
        assert!(store.get_document("tenants/acme/employees/d1").await.unwrap().is_none());

        // d1 fails in jobs too, d0 still lands.
        let jobs = &summary.collections[1];
        assert_eq!(jobs.migrated, 1);
        assert_eq!(jobs.errors.len(), 1);
        assert_eq!(summary.total_errors(), 2);
        assert!(summary.render().contains("error d1"));
    }

    #[tokio::test]
    async fn test_unreadable_collection_recorded_and_skipped() {
        let mut store = MockStore::default();
        store.unreadable.insert("payroll".into());
        store.seed("employees", 2);
        let store = Arc::new(store);

        let migrator = Migrator::new(store.clone(), options(&["payroll", "employees"], false, 10)).unwrap();
        let summary = migrator.run().await;
        assert_eq!(summary.collections[0].errors.len(), 1);
        assert!(summary.collections[0].errors[0].document_id.is_none());
        assert_eq!(summary.collections[1].migrated, 2);
    }

    #[tokio::test]
    async fn test_skips_other_tenant_documents() {
        let store = Arc::new(MockStore::default());
        store.set_document("employees/mine", fields(json!({"tenantId": "acme"}))).await.unwrap();
        store.set_document("employees/theirs", fields(json!({"tenantId": "globex"}))).await.unwrap();
        store.set_document("employees/plain", fields(json!({"name": "Ada"}))).await.unwrap();

        let migrator = Migrator::new(store.clone(), options(&["employees"], false, 10)).unwrap();
        let summary = migrator.run().await;
        let report = &summary.collections[0];
        assert_eq!(report.migrated, 2);
        assert_eq!(report.skipped, 1);
        let skipped = report.results.iter().find(|r| r.document_id == "theirs").unwrap();
        assert_eq!(
            skipped.outcome,
            DocumentOutcome::Skipped { reason: SkipReason::OtherTenant { tenant_id: "globex".into() } }
        );
        assert!(store.get_document("tenants/acme/employees/theirs").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_skips_ids_that_escape_the_collection() {
        let store = Arc::new(MockStore::default());
        store.docs.lock().unwrap().insert("employees/..".into(), fields(json!({"name": "dots"})));
        store.set_document("employees/a#b", fields(json!({"name": "Hash"}))).await.unwrap();

        let migrator = Migrator::new(store.clone(), options(&["employees"], false, 10)).unwrap();
        let summary = migrator.run().await;
        let report = &summary.collections[0];
        assert_eq!(report.skipped, 1);
        assert_eq!(report.migrated, 1);
        let dots = report.results.iter().find(|r| r.document_id == "..").unwrap();
        assert_eq!(dots.outcome, DocumentOutcome::Skipped { reason: SkipReason::InvalidId });
        assert!(store.get_document("tenants/acme/employees/a#b").await.unwrap().is_some());
        assert_eq!(store.count("tenants/"), 1);
    }

    #[tokio::test]
    async fn test_rerun_overwrites_on_sqlite() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        for i in 0..3 {
            store.set_document(&format!("timesheets/t{i}"), fields(json!({"hours": 8}))).await.unwrap();
        }
        for _ in 0..2 {
            let migrator = Migrator::new(store.clone(), options(&["timesheets"], false, 2)).unwrap();
            let summary = migrator.run().await;
            assert_eq!(summary.total_migrated(), 3);
        }
        assert_eq!(store.count("tenants/acme/timesheets").unwrap(), 3);
        assert_eq!(store.count("timesheets").unwrap(), 3);
    }

    #[test]
    fn test_options_validation() {
        assert!(options(&["employees"], false, 1).validate().is_ok());
        assert!(options(&["employees"], false, 0).validate().is_err());
        assert!(options(&["employees"], false, MAX_BATCH_SIZE + 1).validate().is_err());
        assert!(options(&[], false, 10).validate().is_err());
        assert!(options(&["tenants/x/employees"], false, 10).validate().is_err());
        assert!(Migrator::new(Arc::new(MockStore::default()), options(&[], true, 10)).is_err());
    }

    #[test]
    fn test_needs_confirmation() {
        let mut opts = options(&["employees"], false, 10);
        assert!(!opts.needs_confirmation());
        opts.force = false;
        assert!(opts.needs_confirmation());
        opts.dry_run = true;
        assert!(!opts.needs_confirmation());
    }

    #[test]
    fn test_confirm_answers() {
        let mut out = Vec::new();
        assert!(confirm(&b"yes\n"[..], &mut out, "Proceed?").unwrap());
        assert!(String::from_utf8(out).unwrap().starts_with("Proceed?"));
        assert!(confirm(&b"Y\n"[..], Vec::new(), "Proceed?").unwrap());
        assert!(!confirm(&b"no\n"[..], Vec::new(), "Proceed?").unwrap());
        assert!(!confirm(&b""[..], Vec::new(), "Proceed?").unwrap());
    }
}
