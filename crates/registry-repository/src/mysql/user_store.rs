//! MySQL user store implementation.

use crate::{DatabasePool, UserStore};
use async_trait::async_trait;
use registry_core::{NewUser, RegistryError, RegistryResult, User, UserField, UserId, UserPatch};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::{debug, info};

const SELECT_COLUMNS: &str =
    "SELECT id, user_name, account_number, email_address, identity_number FROM users";

/// MySQL user store.
#[derive(Clone)]
pub struct MySqlUserStore {
    pool: Arc<DatabasePool>,
}

impl MySqlUserStore {
    /// Creates a store over a (possibly not yet connected) pool.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: String, // CHAR(36)
    user_name: String,
    account_number: String,
    email_address: String,
    identity_number: String,
}

impl TryFrom<UserRow> for User {
    type Error = RegistryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = UserId::parse(&row.id)
            .map_err(|e| RegistryError::Internal(format!("Invalid UUID in database: {}", e)))?;

        Ok(User {
            id,
            user_name: row.user_name,
            account_number: row.account_number,
            email_address: row.email_address,
            identity_number: row.identity_number,
        })
    }
}

/// Builds the partial UPDATE for a patch.
///
/// The trailing predicate only matches when at least one column differs from
/// its new value, so `rows_affected` counts real modifications regardless of
/// the connection's found-rows setting.
fn update_statement(assignments: &[(UserField, &str)]) -> String {
    let set = assignments
        .iter()
        .map(|(field, _)| format!("{} = ?", field.column()))
        .collect::<Vec<_>>()
        .join(", ");
    let changed = assignments
        .iter()
        .map(|(field, _)| format!("NOT ({} <=> ?)", field.column()))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("UPDATE users SET {set} WHERE id = ? AND ({changed})")
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn insert_one(&self, user: NewUser) -> RegistryResult<User> {
        let user = user.with_id(UserId::new());
        debug!("Inserting user: {}", user.id);

        sqlx::query(
            r#"
            INSERT INTO users (id, user_name, account_number, email_address, identity_number)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.user_name)
        .bind(&user.account_number)
        .bind(&user.email_address)
        .bind(&user.identity_number)
        .execute(self.pool.get().await?)
        .await?;

        Ok(user)
    }

    async fn find_one(&self, field: UserField, value: &str) -> RegistryResult<Option<User>> {
        debug!("Finding user by {}: {}", field.label(), value);

        let sql = format!("{SELECT_COLUMNS} WHERE {} = ? LIMIT 1", field.column());
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(self.pool.get().await?)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_all(&self) -> RegistryResult<Vec<User>> {
        debug!("Finding all users");

        let sql = format!("{SELECT_COLUMNS} ORDER BY seq");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(self.pool.get().await?)
            .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_one(&self, id: UserId, patch: &UserPatch) -> RegistryResult<u64> {
        let assignments = patch.assignments();
        if assignments.is_empty() {
            return Ok(0);
        }
        debug!("Updating user: {}", id);

        let sql = update_statement(&assignments);
        let mut query = sqlx::query(&sql);
        for (_, value) in &assignments {
            query = query.bind(*value);
        }
        query = query.bind(id.to_string());
        for (_, value) in &assignments {
            query = query.bind(*value);
        }

        let result = query.execute(self.pool.get().await?).await?;
        Ok(result.rows_affected())
    }

    async fn delete_one(&self, id: UserId) -> RegistryResult<u64> {
        debug!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool.get().await?)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ensure_indexes(&self) -> RegistryResult<()> {
        info!("Ensuring unique indexes on users");
        self.pool.run_migrations().await
    }

    async fn ping(&self) -> RegistryResult<()> {
        self.pool.health_check().await
    }
}
