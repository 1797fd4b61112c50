//! Result type aliases for Banca.

use crate::BancaError;

/// A specialized `Result` type for Banca operations.
pub type BancaResult<T> = Result<T, BancaError>;

/// A boxed future returning a `BancaResult`.
pub type BoxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = BancaResult<T>> + Send + 'a>>;
