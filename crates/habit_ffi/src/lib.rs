//! Flutter bridge for the habit core.

pub mod api;
