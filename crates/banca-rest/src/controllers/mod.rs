//! REST controllers.

pub mod card_controller;
pub mod client_controller;
pub mod health_controller;
pub mod notification_controller;
