//! Tenant identifiers.
//!
//! Every business document lives under `tenants/{tenantId}/...`, so the tenant
//! ID is the one piece of user input that ends up inside a document path. It is
//! validated once, here, and carried around as a [`TenantId`] afterwards.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{Result, StaffHubError};

/// Longest tenant ID accepted.
pub const MAX_TENANT_ID_LEN: usize = 128;

static TENANT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid tenant ID regex"));

/// Returns true if `id` is usable as a tenant path segment.
pub fn validate_tenant_id(id: &str) -> bool {
    id.len() <= MAX_TENANT_ID_LEN && TENANT_ID_PATTERN.is_match(id)
}

/// Validated tenant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Parse and validate a tenant ID.
    pub fn parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if validate_tenant_id(&id) {
            Ok(Self(id))
        } else {
            Err(StaffHubError::InvalidTenantId(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TenantId {
    type Err = StaffHubError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TenantId {
    type Error = StaffHubError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        for id in ["acme", "ACME_01", "tenant-42", "a", "_", "x-y_z"] {
            assert!(validate_tenant_id(id), "{id} should be valid");
            assert_eq!(TenantId::parse(id).unwrap().as_str(), id);
        }
    }

    #[test]
    fn test_rejects_slash() {
        assert!(!validate_tenant_id("acme/evil"));
        assert!(!validate_tenant_id("/acme"));
        assert!(!validate_tenant_id("acme/"));
        let err = TenantId::parse("a/b").unwrap_err();
        assert!(matches!(err, StaffHubError::InvalidTenantId(ref s) if s == "a/b"));
    }

    #[test]
    fn test_rejects_other_garbage() {
        for id in ["", " ", "acme corp", "acme.io", "ac\nme", "ténant", "../x"] {
            assert!(!validate_tenant_id(id), "{id:?} should be invalid");
        }
        let long = "a".repeat(MAX_TENANT_ID_LEN + 1);
        assert!(!validate_tenant_id(&long));
        assert!(validate_tenant_id(&long[1..]));
    }

    #[test]
    fn test_serde_validates() {
        let id: TenantId = serde_json::from_str("\"acme\"").unwrap();
        assert_eq!(id.to_string(), "acme");
        assert!(serde_json::from_str::<TenantId>("\"a/b\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"acme\"");
    }
}
