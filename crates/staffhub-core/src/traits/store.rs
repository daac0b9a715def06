//! Document store trait: the only way StaffHub talks to the backend.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Document, Fields, WriteOp};

/// A hierarchical document database.
///
/// Paths are slash-separated and alternate collection / document segments, so
/// a collection path has an odd number of segments and a document path an even
/// number.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name, for logs.
    fn name(&self) -> &str;

    /// Fetch one document. `Ok(None)` if it does not exist.
    async fn get_document(&self, path: &str) -> Result<Option<Document>>;

    /// All documents directly inside a collection, ordered by ID.
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>>;

    /// Create or overwrite a document.
    async fn set_document(&self, path: &str, data: Fields) -> Result<()>;

    async fn delete_document(&self, path: &str) -> Result<()>;

    /// Apply all writes atomically: either every write lands or none does.
    async fn commit_batch(&self, writes: Vec<WriteOp>) -> Result<()>;
}

/// Number of segments in a slash-separated path.
pub fn segment_count(path: &str) -> usize {
    path.split('/').filter(|s| !s.is_empty()).count()
}

/// Every segment is non-empty and none is a `.` / `..` relative reference.
fn has_plain_segments(path: &str) -> bool {
    !path.is_empty() && path.split('/').all(|s| !s.is_empty() && s != "." && s != "..")
}

pub fn is_collection_path(path: &str) -> bool {
    has_plain_segments(path) && segment_count(path) % 2 == 1
}

pub fn is_document_path(path: &str) -> bool {
    has_plain_segments(path) && segment_count(path) % 2 == 0
}
