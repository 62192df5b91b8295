//! # Registry Core
//!
//! Core types, error definitions and the user record model shared by every
//! layer of the user registry service.

pub mod error;
pub mod id;
pub mod result;
pub mod user;
pub mod validation;

pub use error::*;
pub use id::*;
pub use result::*;
pub use user::*;
pub use validation::*;
