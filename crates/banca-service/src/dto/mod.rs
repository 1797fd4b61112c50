//! Request and response DTOs for the service facade.

mod card_dto;
mod client_dto;

pub use card_dto::*;
pub use client_dto::*;
