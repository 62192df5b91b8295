//! # Registry REST
//!
//! HTTP surface of the user registry: token issuance, the bearer-guarded
//! user routes, health probes and the OpenAPI document.

pub mod controllers;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
