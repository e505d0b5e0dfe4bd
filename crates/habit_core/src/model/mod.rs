//! Domain model for habits and the user profile.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own input parsing so callers never mutate state with unchecked values.
//!
//! # Invariants
//! - Every habit is identified by a stable `HabitId`.
//! - Deletion is a hard removal; there are no tombstones.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod habit;
pub mod profile;
