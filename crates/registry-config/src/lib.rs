//! # Registry Config
//!
//! Configuration management for the user registry.
//! Configuration is layered from TOML files, a `.env` file and
//! `REGISTRY__`-prefixed environment variables.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;
