//! # StaffHub Core
//!
//! Shared building blocks for the StaffHub workspace: the error type,
//! configuration, tenant identifiers and the tenant path builder, document
//! types, and the [`DocumentStore`](traits::DocumentStore) seam every backend
//! implements.

pub mod config;
pub mod error;
pub mod paths;
pub mod tenant;
pub mod traits;
pub mod types;

pub use config::StaffHubConfig;
pub use error::{Result, StaffHubError};
pub use paths::{ResourceType, TenantPaths};
pub use tenant::TenantId;
pub use traits::DocumentStore;
pub use types::{Document, Fields, WriteOp};
