//! # StaffHub Connectivity
//!
//! Watches online/offline events and backend error patterns, decides when the
//! backend should be treated as blocked, and drives debounced reconnection
//! attempts. Nothing here ever turns a transient network error into a crash:
//! errors are classified, counted and surfaced as state plus a banner.

pub mod classify;
pub mod monitor;
pub mod tracker;

pub use classify::{ErrorClass, classify_error};
pub use monitor::{ConnectivityMonitor, ConnectivityProbe, ConnectivitySnapshot};
pub use tracker::{Banner, BannerLevel, ConnectionState, ConnectivityTracker};
