//! Core use-case services.
//!
//! # Responsibility
//! - Own in-memory state and orchestrate persistence behind use-case APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod habit_store;
mod persist_worker;
pub mod profile_store;
pub mod reminder_service;
pub mod statistics;
