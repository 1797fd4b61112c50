//! # Banca REST
//!
//! Thin HTTP facade over the tiered resolution services: CRUD endpoints
//! for clients and cards, bulk import/export, and a server-sent-events
//! stream of lifecycle notifications.

pub mod controllers;
pub mod responses;
mod router;
mod state;

pub use router::*;
pub use state::*;
