//! # Registry Server Library
//!
//! Wires configuration, storage, caching and the HTTP router into a
//! runnable application.

pub mod app;
pub mod startup;

pub use app::Application;
