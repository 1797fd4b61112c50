//! # Banca Service
//!
//! The tiered resolution core. Lookups consult, in order, an in-memory
//! eviction-aware cache, the local persistent store, and the authoritative
//! remote store, backfilling every tier that was bypassed. Writes go to the
//! remote store first, are mirrored into the local store best-effort, update
//! the cache, and publish a lifecycle event on the notification bus.

pub mod cache;
mod card_service;
mod client_service;
pub mod dto;
pub mod mappers;
pub mod notification;
pub mod storage;

pub mod r#impl;

pub use cache::{CacheSweeper, CardCache, ClientCache, ResolveCache, Sweep};
pub use card_service::CardService;
pub use client_service::ClientService;
pub use dto::*;
pub use notification::{NotificationBus, NotificationEvent, NotificationStream, NotificationType};
pub use r#impl::*;
