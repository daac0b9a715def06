//! Error types shared across the StaffHub workspace.

use thiserror::Error;

/// Convenience alias used by every StaffHub crate.
pub type Result<T> = std::result::Result<T, StaffHubError>;

#[derive(Debug, Error)]
pub enum StaffHubError {
    #[error("Invalid tenant ID: {0:?}")]
    InvalidTenantId(String),

    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    #[error("Invalid document ID: {0:?}")]
    InvalidDocumentId(String),

    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    /// Offline, timeouts, refused connections, 5xx and 429 responses.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StaffHubError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors that are expected to clear up on their own.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = StaffHubError::InvalidTenantId("a/b".into());
        assert_eq!(e.to_string(), "Invalid tenant ID: \"a/b\"");
        assert_eq!(StaffHubError::network("offline").to_string(), "Network error: offline");
    }

    #[test]
    fn test_transient() {
        assert!(StaffHubError::network("timeout").is_transient());
        assert!(!StaffHubError::PermissionDenied("nope".into()).is_transient());
        assert!(!StaffHubError::backend("boom").is_transient());
    }
}
