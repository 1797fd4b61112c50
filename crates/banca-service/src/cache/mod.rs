//! Eviction-aware caching for resolved entities.
//!
//! [`ResolveCache`] is a bounded, access-ordered map with a staleness
//! window; [`CacheSweeper`] drives the periodic background sweep that
//! removes entries whose last write is older than the window.

mod resolve_cache;
mod sweeper;

pub use resolve_cache::*;
pub use sweeper::*;

use banca_core::{BankCard, CardNumber, Client, ClientId};

/// Cache of resolved clients, keyed by the remote-assigned client id.
pub type ClientCache = ResolveCache<ClientId, Client>;

/// Cache of resolved bank cards, keyed by card number.
pub type CardCache = ResolveCache<CardNumber, BankCard>;
