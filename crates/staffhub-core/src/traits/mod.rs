//! Trait seams between StaffHub crates.

pub mod store;

pub use store::DocumentStore;
