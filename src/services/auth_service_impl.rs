//! [`AuthService`] over the [`BookingStore`] port.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::{BookingStore, Store, needs_rehash};
use crate::domain::BookingError;
use crate::models::User;
use crate::services::auth_service::AuthService;

pub struct StoreAuthService {
    store: Arc<dyn BookingStore>,
    /// Present when backed by SQLite; used to upgrade stale password hashes.
    db: Option<Store>,
    security: SecurityConfig,
}

impl StoreAuthService {
    #[must_use]
    pub fn new(store: Arc<dyn BookingStore>, db: Option<Store>, security: SecurityConfig) -> Self {
        Self {
            store,
            db,
            security,
        }
    }

    async fn migrate_hash(&self, id: i32, password: &str, password_hash: &str) {
        let Some(db) = &self.db else {
            return;
        };
        if !self.security.auto_migrate_password_hashes
            || !needs_rehash(password_hash, &self.security)
        {
            return;
        }

        match db.update_user_password(id, password, &self.security).await {
            Ok(()) => info!(user_id = id, "Password hash migrated to current parameters"),
            Err(e) => warn!(user_id = id, error = %e, "Failed to migrate password hash"),
        }
    }
}

#[async_trait]
impl AuthService for StoreAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<User, BookingError> {
        let (id, password_hash) = self.store.authenticate(email, password).await?;

        self.migrate_hash(id, password, &password_hash).await;

        self.store.get_user_by_id(id).await
    }

    async fn current_user(&self, id: i32) -> Result<User, BookingError> {
        self.store.get_user_by_id(id).await
    }

    async fn update_profile(&self, user: &User) -> Result<(), BookingError> {
        self.store.update_user(user).await?;
        info!(user_id = user.id, "User profile updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;

    fn fast_security() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
            auto_migrate_password_hashes: true,
        }
    }

    fn service() -> StoreAuthService {
        let store = InMemoryStore::new()
            .with_user("admin@example.com", "password", &fast_security())
            .unwrap();
        StoreAuthService::new(Arc::new(store), None, fast_security())
    }

    #[tokio::test]
    async fn test_login() {
        let auth = service();
        let user = auth.login("admin@example.com", "password").await.unwrap();
        assert!(user.is_admin());
        assert_eq!(auth.current_user(user.id).await.unwrap().email, user.email);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let auth = service();
        for (email, password) in [
            ("admin@example.com", "wrong"),
            ("nobody@example.com", "password"),
        ] {
            assert!(matches!(
                auth.login(email, password).await,
                Err(BookingError::InvalidCredentials)
            ));
        }
    }

    #[tokio::test]
    async fn test_update_profile() {
        let auth = service();
        let mut user = auth.login("admin@example.com", "password").await.unwrap();
        user.first_name = "Owner".to_string();
        auth.update_profile(&user).await.unwrap();
        assert_eq!(auth.current_user(user.id).await.unwrap().first_name, "Owner");
    }
}
