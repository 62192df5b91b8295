//! HTTP middleware.

mod auth;
mod logging;

pub use auth::jwt_guard;
pub use logging::logging_middleware;
