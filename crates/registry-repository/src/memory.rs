//! Process-local user store.

use crate::UserStore;
use async_trait::async_trait;
use registry_core::{NewUser, RegistryError, RegistryResult, User, UserField, UserId, UserPatch};
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory user store.
///
/// Keeps records in insertion order and enforces the same unique fields a
/// database index would. Used for local runs (`database.url = "memory:"`)
/// and as a test double.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

/// The first field on which `candidate` collides with a record other than `skip`.
fn collision<'a>(
    users: &[User],
    skip: Option<UserId>,
    mut values: impl Iterator<Item = (UserField, &'a str)>,
) -> Option<UserField> {
    values.find_map(|(field, value)| {
        users
            .iter()
            .filter(|u| Some(u.id) != skip)
            .any(|u| field.value_of(u) == value)
            .then_some(field)
    })
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert_one(&self, user: NewUser) -> RegistryResult<User> {
        let mut users = self.users.write().await;
        let values = UserField::ALL.into_iter().map(|f| (f, user.value(f)));
        if let Some(field) = collision(&users, None, values) {
            return Err(RegistryError::conflict(field));
        }

        let user = user.with_id(UserId::new());
        debug!("Inserting user: {}", user.id);
        users.push(user.clone());
        Ok(user)
    }

    async fn find_one(&self, field: UserField, value: &str) -> RegistryResult<Option<User>> {
        debug!("Finding user by {}: {}", field.label(), value);
        let users = self.users.read().await;
        Ok(users.iter().find(|u| field.value_of(u) == value).cloned())
    }

    async fn find_all(&self) -> RegistryResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn update_one(&self, id: UserId, patch: &UserPatch) -> RegistryResult<u64> {
        let mut users = self.users.write().await;
        let Some(index) = users.iter().position(|u| u.id == id) else {
            return Ok(0);
        };
        if let Some(field) = collision(&users, Some(id), patch.assignments().into_iter()) {
            return Err(RegistryError::conflict(field));
        }

        debug!("Updating user: {}", id);
        Ok(u64::from(patch.apply(&mut users[index])))
    }

    async fn delete_one(&self, id: UserId) -> RegistryResult<u64> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok((before - users.len()) as u64)
    }

    async fn ensure_indexes(&self) -> RegistryResult<()> {
        debug!("In-memory store enforces unique fields on every write");
        Ok(())
    }

    async fn ping(&self) -> RegistryResult<()> {
        Ok(())
    }
}
