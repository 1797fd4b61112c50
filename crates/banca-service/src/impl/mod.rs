//! Service implementations.

mod card_service_impl;
mod client_service_impl;

pub use card_service_impl::*;
pub use client_service_impl::*;
