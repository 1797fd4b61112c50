//! # Banca Remote
//!
//! Client for the authoritative remote store. The remote store is the
//! source of truth: it assigns client identifiers on creation and its
//! failures are always surfaced to callers rather than recovered locally.
//!
//! Failures map onto the error taxonomy as follows: HTTP 404 becomes
//! `NotFound`, transport failures and timeouts become `RemoteUnavailable`
//! (retriable), and write rejections become `RemoteWriteFailed`.

mod dto;
mod http_client;
mod traits;

pub use dto::*;
pub use http_client::*;
pub use traits::*;
