//! Domain entities.

mod bank_card;
mod client;

pub use bank_card::*;
pub use client::*;
