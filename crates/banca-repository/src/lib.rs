//! # Banca Repository
//!
//! Local-store data access for Banca:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ClientRepository> / Arc<dyn BankCardRepository>
//! SqliteClientRepository / SqliteBankCardRepository   (SQLx / SQLite)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! SQLite
//! ```
//!
//! The local store mirrors the authoritative remote store. Read failures
//! here are treated by the service layer as a miss (fall through to the
//! remote tier); write failures during mirroring are logged, not fatal.

pub mod pool;
pub mod sqlite;
pub mod traits;

pub use pool::*;
pub use sqlite::*;
pub use traits::*;
