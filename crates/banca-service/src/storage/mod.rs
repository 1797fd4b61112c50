//! Bulk file storage for clients.

pub mod json;
