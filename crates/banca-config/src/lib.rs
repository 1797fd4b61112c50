//! # Banca Config
//!
//! Layered configuration for the Banca backend: TOML files merged with
//! `BANCA_`-prefixed environment variables.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;
