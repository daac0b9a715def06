//! Backend error classification.
//!
//! - **Network**: offline, timeouts, refused connections, 5xx, 429. These feed
//!   the blocked-backend counter.
//! - **PermissionDenied**: auth/rules rejections. Degrade to empty results but
//!   never count against connectivity.
//! - **Internal**: everything else; propagates to the caller.

use serde::Serialize;
use staffhub_core::StaffHubError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Network,
    PermissionDenied,
    Internal,
}

const NETWORK_PATTERNS: &[&str] = &[
    "unavailable",
    "offline",
    "timed out",
    "timeout",
    "deadline exceeded",
    "connection reset",
    "connection refused",
    "failed to fetch",
    "network",
];

const PERMISSION_PATTERNS: &[&str] = &["permission", "unauthenticated", "unauthorized", "forbidden"];

pub fn classify_error(error: &StaffHubError) -> ErrorClass {
    match error {
        StaffHubError::Network(_) => ErrorClass::Network,
        StaffHubError::PermissionDenied(_) => ErrorClass::PermissionDenied,
        StaffHubError::Backend(msg) | StaffHubError::Storage(msg) => classify_message(msg),
        StaffHubError::Io(e) => match e.kind() {
            std::io::ErrorKind::TimedOut
            | std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::NotConnected => ErrorClass::Network,
            std::io::ErrorKind::PermissionDenied => ErrorClass::PermissionDenied,
            _ => ErrorClass::Internal,
        },
        _ => ErrorClass::Internal,
    }
}

/// Classify a free-form backend error message.
pub fn classify_message(message: &str) -> ErrorClass {
    let lower = message.to_ascii_lowercase();
    if PERMISSION_PATTERNS.iter().any(|p| lower.contains(p)) {
        ErrorClass::PermissionDenied
    } else if NETWORK_PATTERNS.iter().any(|p| lower.contains(p)) {
        ErrorClass::Network
    } else {
        ErrorClass::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_variants() {
        assert_eq!(classify_error(&StaffHubError::network("x")), ErrorClass::Network);
        assert_eq!(
            classify_error(&StaffHubError::PermissionDenied("rules".into())),
            ErrorClass::PermissionDenied
        );
        assert_eq!(classify_error(&StaffHubError::config("bad")), ErrorClass::Internal);
        assert_eq!(classify_error(&StaffHubError::NotFound("x".into())), ErrorClass::Internal);
    }

    #[test]
    fn test_backend_messages() {
        assert_eq!(classify_error(&StaffHubError::backend("Service UNAVAILABLE")), ErrorClass::Network);
        assert_eq!(classify_error(&StaffHubError::backend("client is offline")), ErrorClass::Network);
        assert_eq!(
            classify_error(&StaffHubError::backend("PERMISSION_DENIED: missing rules")),
            ErrorClass::PermissionDenied
        );
        assert_eq!(classify_error(&StaffHubError::backend("invalid argument")), ErrorClass::Internal);
    }

    #[test]
    fn test_io_kinds() {
        let timeout = std::io::Error::new(std::io::ErrorKind::TimedOut, "t");
        assert_eq!(classify_error(&StaffHubError::Io(timeout)), ErrorClass::Network);
        let other = std::io::Error::other("disk full");
        assert_eq!(classify_error(&StaffHubError::Io(other)), ErrorClass::Internal);
    }
}
