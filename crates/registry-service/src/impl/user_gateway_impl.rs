//! Record store gateway implementation.

use crate::cache::{cache_keys, LookupCache};
use crate::dto::CreateUserRequest;
use crate::user_gateway::UserGateway;
use async_trait::async_trait;
use registry_core::{
    NewUser, RegistryError, RegistryResult, User, UserField, UserId, UserPatch, ValidateExt,
};
use registry_repository::UserStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Gateway over a primary store and a lookup cache.
#[derive(Clone)]
pub struct UserGatewayImpl {
    store: Arc<dyn UserStore>,
    cache: LookupCache,
}

impl UserGatewayImpl {
    /// Creates a new gateway.
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>, cache: LookupCache) -> Self {
        Self { store, cache }
    }

    /// The first unique field `candidate` shares with a stored record.
    ///
    /// Queries the store directly; a cached snapshot could be stale.
    async fn first_conflict(&self, candidate: &NewUser) -> RegistryResult<Option<UserField>> {
        for field in UserField::ALL {
            if self
                .store
                .find_one(field, candidate.value(field))
                .await?
                .is_some()
            {
                return Ok(Some(field));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl UserGateway for UserGatewayImpl {
    async fn create(&self, request: CreateUserRequest) -> RegistryResult<User> {
        request.validate_request()?;
        let candidate = NewUser::from(request);
        debug!("Creating user: {}", candidate.user_name);

        if let Some(field) = self.first_conflict(&candidate).await? {
            info!("Rejected create, {} already registered", field.label());
            return Err(RegistryError::conflict(field));
        }

        let user = self.store.insert_one(candidate).await?;

        info!("User created: {}", user.id);
        Ok(user)
    }

    async fn find_by(&self, field: UserField, value: &str) -> RegistryResult<User> {
        debug!("Getting user by {}: {}", field.label(), value);

        let store = Arc::clone(&self.store);
        let owned = value.to_string();
        self.cache
            .get_cached(&cache_keys::user_by_value(value), move || async move {
                store.find_one(field, &owned).await
            })
            .await?
            .ok_or_else(|| RegistryError::not_found(field.label()))
    }

    async fn get_all(&self) -> RegistryResult<Vec<User>> {
        debug!("Listing all users");

        let store = Arc::clone(&self.store);
        self.cache
            .get_cached(cache_keys::ALL_USERS, move || async move { store.find_all().await })
            .await
    }

    async fn update(&self, id: UserId, patch: UserPatch) -> RegistryResult<bool> {
        if patch.is_empty() {
            return Err(RegistryError::validation(
                "At least one field must be provided for update.",
            ));
        }
        debug!("Updating user: {}", id);

        let modified = self.store.update_one(id, &patch).await? > 0;

        if modified {
            info!("User updated: {}", id);
        } else {
            debug!("Update matched no changes for user: {}", id);
        }
        Ok(modified)
    }

    async fn delete(&self, id: UserId) -> RegistryResult<bool> {
        debug!("Deleting user: {}", id);

        let deleted = self.store.delete_one(id).await? > 0;

        if deleted {
            info!("User deleted: {}", id);
        }
        Ok(deleted)
    }
}

impl std::fmt::Debug for UserGatewayImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserGatewayImpl")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheInterface, InMemoryCache};
    use mockall::{mock, predicate::eq};
    use registry_repository::InMemoryUserStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(3600);

    /// In-memory store that counts read calls.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryUserStore,
        find_one_calls: AtomicUsize,
        find_all_calls: AtomicUsize,
    }

    impl CountingStore {
        fn find_one_calls(&self) -> usize {
            self.find_one_calls.load(Ordering::SeqCst)
        }

        fn find_all_calls(&self) -> usize {
            self.find_all_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserStore for CountingStore {
        async fn insert_one(&self, user: NewUser) -> RegistryResult<User> {
            self.inner.insert_one(user).await
        }

        async fn find_one(&self, field: UserField, value: &str) -> RegistryResult<Option<User>> {
            self.find_one_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find_one(field, value).await
        }

        async fn find_all(&self) -> RegistryResult<Vec<User>> {
            self.find_all_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find_all().await
        }

        async fn update_one(&self, id: UserId, patch: &UserPatch) -> RegistryResult<u64> {
            self.inner.update_one(id, patch).await
        }

        async fn delete_one(&self, id: UserId) -> RegistryResult<u64> {
            self.inner.delete_one(id).await
        }

        async fn ensure_indexes(&self) -> RegistryResult<()> {
            self.inner.ensure_indexes().await
        }

        async fn ping(&self) -> RegistryResult<()> {
            self.inner.ping().await
        }
    }

    mock! {
        Store {}

        #[async_trait]
        impl UserStore for Store {
            async fn insert_one(&self, user: NewUser) -> RegistryResult<User>;
            async fn find_one(&self, field: UserField, value: &str) -> RegistryResult<Option<User>>;
            async fn find_all(&self) -> RegistryResult<Vec<User>>;
            async fn update_one(&self, id: UserId, patch: &UserPatch) -> RegistryResult<u64>;
            async fn delete_one(&self, id: UserId) -> RegistryResult<u64>;
            async fn ensure_indexes(&self) -> RegistryResult<()>;
            async fn ping(&self) -> RegistryResult<()>;
        }
    }

    struct Fixture {
        gateway: UserGatewayImpl,
        store: Arc<CountingStore>,
        cache: Arc<InMemoryCache>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(CountingStore::default());
        let cache = Arc::new(InMemoryCache::new());
        let gateway = UserGatewayImpl::new(store.clone(), LookupCache::new(cache.clone(), TTL));
        Fixture {
            gateway,
            store,
            cache,
        }
    }

    fn with_mock(store: MockStore) -> UserGatewayImpl {
        UserGatewayImpl::new(
            Arc::new(store),
            LookupCache::new(Arc::new(InMemoryCache::new()), TTL),
        )
    }

    fn request(name: &str, account: &str, email: &str, identity: &str) -> CreateUserRequest {
        CreateUserRequest {
            user_name: name.to_string(),
            account_number: account.to_string(),
            email_address: email.to_string(),
            identity_number: identity.to_string(),
        }
    }

    fn alice() -> CreateUserRequest {
        request("alice", "1", "a@x.com", "900")
    }

    #[tokio::test]
    async fn test_create_returns_record_with_id() {
        let fx = fixture();

        let user = fx.gateway.create(alice()).await.unwrap();

        assert_eq!(user.user_name, "alice");
        assert_eq!(user.account_number, "1");
        assert_eq!(user.email_address, "a@x.com");
        assert_eq!(user.identity_number, "900");
        assert_eq!(fx.store.inner.len().await, 1);
    }

    #[tokio::test]
    async fn test_created_user_is_found_by_each_field() {
        let fx = fixture();
        let user = fx.gateway.create(alice()).await.unwrap();

        assert_eq!(fx.gateway.find_by_user_name("alice").await.unwrap(), user);
        assert_eq!(fx.gateway.find_by_account_number("1").await.unwrap(), user);
        assert_eq!(fx.gateway.find_by_email_address("a@x.com").await.unwrap(), user);
        assert_eq!(fx.gateway.find_by_identity_number("900").await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_duplicate_user_name_is_rejected() {
        let fx = fixture();
        fx.gateway.create(alice()).await.unwrap();

        let err = fx
            .gateway
            .create(request("alice", "2", "b@x.com", "901"))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::Conflict { field: UserField::UserName }));
        assert_eq!(err.to_string(), "Username is already registered.");
        assert_eq!(fx.store.inner.len().await, 1);
    }

    #[tokio::test]
    async fn test_each_duplicate_field_is_named() {
        let cases = [
            (request("bob", "1", "b@x.com", "901"), UserField::AccountNumber),
            (request("bob", "2", "a@x.com", "901"), UserField::EmailAddress),
            (request("bob", "2", "b@x.com", "900"), UserField::IdentityNumber),
        ];

        for (candidate, expected) in cases {
            let fx = fixture();
            fx.gateway.create(alice()).await.unwrap();

            let err = fx.gateway.create(candidate).await.unwrap_err();
            assert!(
                matches!(err, RegistryError::Conflict { field } if field == expected),
                "expected conflict on {expected}, got {err:?}"
            );
            assert_eq!(fx.store.inner.len().await, 1);
        }
    }

    #[tokio::test]
    async fn test_uniqueness_checks_run_in_order_and_stop_at_first_conflict() {
        let existing = NewUser::new("carol", "3", "a@x.com", "900").with_id(UserId::new());
        let mut store = MockStore::new();
        let mut seq = mockall::Sequence::new();

        store
            .expect_find_one()
            .withf(|field, value| *field == UserField::UserName && value == "alice")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        store
            .expect_find_one()
            .withf(|field, value| *field == UserField::AccountNumber && value == "1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        store
            .expect_find_one()
            .withf(|field, value| *field == UserField::EmailAddress && value == "a@x.com")
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _| Ok(Some(existing.clone())));
        store.expect_insert_one().never();

        let err = with_mock(store).create(alice()).await.unwrap_err();
        assert!(matches!(err, RegistryError::Conflict { field: UserField::EmailAddress }));
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_store() {
        let mut store = MockStore::new();
        store.expect_find_one().never();
        store.expect_insert_one().never();

        let err = with_mock(store)
            .create(request("alice", "", "a@x.com", "900"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "accountNumber is required.");
    }

    #[tokio::test]
    async fn test_cache_hit_does_not_query_store() {
        let fx = fixture();
        fx.gateway.create(alice()).await.unwrap();
        let after_create = fx.store.find_one_calls();

        fx.gateway.find_by_user_name("alice").await.unwrap();
        fx.gateway.find_by_user_name("alice").await.unwrap();
        fx.gateway.find_by_user_name("alice").await.unwrap();

        assert_eq!(fx.store.find_one_calls(), after_create + 1);
        assert!(fx.cache.get_raw("alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_user_is_not_cached() {
        let fx = fixture();

        let err = fx.gateway.find_by_email_address("nobody@x.com").await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
        assert_eq!(
            err.to_string(),
            "User not found. The user with the given email address does not exist."
        );
        assert_eq!(fx.cache.get_raw("nobody@x.com").await.unwrap(), None);

        fx.gateway.find_by_email_address("nobody@x.com").await.unwrap_err();
        assert_eq!(fx.store.find_one_calls(), 2);
    }

    #[tokio::test]
    async fn test_lookup_keys_are_shared_across_fields() {
        let fx = fixture();
        let user = fx.gateway.create(request("900", "1", "a@x.com", "900")).await.unwrap();

        fx.gateway.find_by_user_name("900").await.unwrap();
        let calls = fx.store.find_one_calls();

        // served from the entry written by the username lookup
        assert_eq!(fx.gateway.find_by_identity_number("900").await.unwrap(), user);
        assert_eq!(fx.store.find_one_calls(), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_lookup_is_stale_after_update_until_ttl() {
        let fx = fixture();
        let user = fx.gateway.create(alice()).await.unwrap();
        fx.gateway.find_by_user_name("alice").await.unwrap();

        let patch = UserPatch {
            account_number: Some("2".to_string()),
            ..Default::default()
        };
        assert!(fx.gateway.update(user.id, patch).await.unwrap());

        let direct = fx
            .store
            .inner
            .find_one(UserField::UserName, "alice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(direct.account_number, "2");

        let cached = fx.gateway.find_by_user_name("alice").await.unwrap();
        assert_eq!(cached.account_number, "1");

        tokio::time::advance(TTL).await;

        let fresh = fx.gateway.find_by_user_name("alice").await.unwrap();
        assert_eq!(fresh.account_number, "2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_all_is_stale_within_ttl() {
        let fx = fixture();
        fx.gateway.create(alice()).await.unwrap();
        fx.gateway.create(request("bob", "2", "b@x.com", "901")).await.unwrap();

        let all = fx.gateway.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].user_name, "alice");
        assert_eq!(all[1].user_name, "bob");

        fx.gateway.create(request("carol", "3", "c@x.com", "902")).await.unwrap();
        assert_eq!(fx.gateway.get_all().await.unwrap().len(), 2);
        assert_eq!(fx.store.find_all_calls(), 1);

        tokio::time::advance(TTL).await;
        assert_eq!(fx.gateway.get_all().await.unwrap().len(), 3);
        assert_eq!(fx.store.find_all_calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_collection_is_not_cached() {
        let fx = fixture();
        assert!(fx.gateway.get_all().await.unwrap().is_empty());
        assert_eq!(fx.cache.get_raw(cache_keys::ALL_USERS).await.unwrap(), None);

        fx.gateway.create(alice()).await.unwrap();
        assert_eq!(fx.gateway.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_checks_store_not_cache() {
        let fx = fixture();
        let user = fx.gateway.create(alice()).await.unwrap();
        fx.gateway.find_by_user_name("alice").await.unwrap();
        assert!(fx.gateway.delete(user.id).await.unwrap());

        // the cached snapshot of the deleted record must not block a new one
        let again = fx.gateway.create(alice()).await.unwrap();
        assert_ne!(again.id, user.id);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let fx = fixture();
        let user = fx.gateway.create(alice()).await.unwrap();

        assert!(fx.gateway.delete(user.id).await.unwrap());
        assert!(!fx.gateway.delete(user.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_and_noop_share_false() {
        let fx = fixture();
        let user = fx.gateway.create(alice()).await.unwrap();

        let same = UserPatch {
            user_name: Some("alice".to_string()),
            ..Default::default()
        };
        assert!(!fx.gateway.update(user.id, same.clone()).await.unwrap());
        assert!(!fx.gateway.update(UserId::new(), same).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected() {
        let mut store = MockStore::new();
        store.expect_update_one().never();

        let err = with_mock(store)
            .update(UserId::new(), UserPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_does_not_precheck_uniqueness() {
        let id = UserId::new();
        let patch = UserPatch {
            email_address: Some("b@x.com".to_string()),
            ..Default::default()
        };

        let mut store = MockStore::new();
        store.expect_find_one().never();
        store
            .expect_update_one()
            .with(eq(id), eq(patch.clone()))
            .times(1)
            .returning(|_, _| Ok(1));

        assert!(with_mock(store).update(id, patch).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_internal() {
        let mut store = MockStore::new();
        store
            .expect_find_all()
            .times(1)
            .returning(|| Err(RegistryError::Database("connection lost".to_string())));

        let err = with_mock(store).get_all().await.unwrap_err();
        assert!(err.is_internal());
    }

    #[tokio::test]
    async fn test_unavailable_cache_does_not_fail_reads() {
        struct DownCache;

        #[async_trait]
        impl CacheInterface for DownCache {
            async fn get_raw(&self, _key: &str) -> RegistryResult<Option<String>> {
                Err(RegistryError::Cache("down".to_string()))
            }

            async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> RegistryResult<()> {
                Err(RegistryError::Cache("down".to_string()))
            }
        }

        let store = Arc::new(CountingStore::default());
        let gateway = UserGatewayImpl::new(store.clone(), LookupCache::new(Arc::new(DownCache), TTL));
        gateway.create(alice()).await.unwrap();

        assert_eq!(gateway.find_by_user_name("alice").await.unwrap().user_name, "alice");
        assert_eq!(gateway.get_all().await.unwrap().len(), 1);
    }
}
