//! Primary store trait.

use async_trait::async_trait;
use registry_core::{NewUser, RegistryResult, User, UserField, UserId, UserPatch};

/// Authoritative storage for user records.
///
/// Implementations enforce the four unique fields at the storage level once
/// [`ensure_indexes`](Self::ensure_indexes) has run; callers still check
/// uniqueness up front to report which field collided.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a record and returns it with its assigned identifier.
    async fn insert_one(&self, user: NewUser) -> RegistryResult<User>;

    /// Finds the record whose `field` equals `value` exactly.
    async fn find_one(&self, field: UserField, value: &str) -> RegistryResult<Option<User>>;

    /// Returns every record in insertion order.
    async fn find_all(&self) -> RegistryResult<Vec<User>>;

    /// Applies a partial update and returns the number of records whose
    /// stored values actually changed (0 or 1).
    async fn update_one(&self, id: UserId, patch: &UserPatch) -> RegistryResult<u64>;

    /// Removes a record and returns the number deleted (0 or 1).
    async fn delete_one(&self, id: UserId) -> RegistryResult<u64>;

    /// Declares the unique indexes. Safe to call repeatedly.
    async fn ensure_indexes(&self) -> RegistryResult<()>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> RegistryResult<()>;
}
