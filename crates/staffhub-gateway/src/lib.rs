//! # StaffHub Gateway
//! HTTP API exposing connectivity state and tenant-scoped document reads.

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start};
