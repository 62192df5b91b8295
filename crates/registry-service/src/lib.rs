//! # Registry Service
//!
//! The record store gateway and the read-through lookup cache in front of it.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod user_gateway;

pub use cache::*;
pub use dto::*;
pub use r#impl::UserGatewayImpl;
pub use user_gateway::*;
