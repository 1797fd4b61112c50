//! # Banca Server Library
//!
//! Dependency injection wiring and startup utilities for the Banca
//! backend: one explicitly constructed component graph per process.

pub mod di;
pub mod startup;
