//! REST API controllers.

pub mod health_controller;
pub mod token_controller;
pub mod user_controller;

pub use health_controller::HealthResponse;
