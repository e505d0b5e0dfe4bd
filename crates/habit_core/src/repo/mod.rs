//! Persistence layer: slot backends and document codecs.
//!
//! # Responsibility
//! - Define the whole-document slot contract and its backends.
//! - Keep JSON encoding details out of the service layer.
//!
//! # Invariants
//! - Every write replaces the full document for its slot.
//! - Load paths degrade to defaults instead of returning errors.

pub mod file_slot_store;
pub mod habit_repo;
pub mod profile_repo;
pub mod slot_store;
pub mod sqlite_slot_store;
