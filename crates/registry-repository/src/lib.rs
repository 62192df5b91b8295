//! # Registry Repository
//!
//! Primary store access for user records.
//!
//! ```text
//! Gateway
//!   ↓  Arc<dyn UserStore>
//! MySqlUserStore ── DatabasePool (lazy, OnceCell) ── MySQL
//! InMemoryUserStore                                   (local runs, tests)
//! ```

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::InMemoryUserStore;
pub use mysql::*;
pub use pool::*;
pub use traits::*;
