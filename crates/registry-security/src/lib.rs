//! # Registry Security
//!
//! Bearer token issuance and verification for the user registry.

pub mod jwt;

pub use jwt::*;
