//! Record store gateway trait definition.

use crate::dto::CreateUserRequest;
use async_trait::async_trait;
use registry_core::{RegistryResult, User, UserField, UserId, UserPatch};

/// All reads and writes of user records.
///
/// Reads go through the lookup cache; writes go straight to the primary
/// store and leave cached entries in place until they expire.
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Creates a user after checking the four unique fields in order.
    async fn create(&self, request: CreateUserRequest) -> RegistryResult<User>;

    /// Finds the user whose `field` equals `value`.
    async fn find_by(&self, field: UserField, value: &str) -> RegistryResult<User>;

    /// Lists all users in storage order.
    async fn get_all(&self) -> RegistryResult<Vec<User>>;

    /// Applies a partial update. Returns whether a stored value changed.
    async fn update(&self, id: UserId, patch: UserPatch) -> RegistryResult<bool>;

    /// Deletes a user. Returns whether a record was removed.
    async fn delete(&self, id: UserId) -> RegistryResult<bool>;

    /// Finds a user by username.
    async fn find_by_user_name(&self, value: &str) -> RegistryResult<User> {
        self.find_by(UserField::UserName, value).await
    }

    /// Finds a user by account number.
    async fn find_by_account_number(&self, value: &str) -> RegistryResult<User> {
        self.find_by(UserField::AccountNumber, value).await
    }

    /// Finds a user by email address.
    async fn find_by_email_address(&self, value: &str) -> RegistryResult<User> {
        self.find_by(UserField::EmailAddress, value).await
    }

    /// Finds a user by identity number.
    async fn find_by_identity_number(&self, value: &str) -> RegistryResult<User> {
        self.find_by(UserField::IdentityNumber, value).await
    }
}
