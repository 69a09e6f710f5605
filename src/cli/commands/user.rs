use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::forms::Form;
use crate::models::User;
use crate::services::{AuthService, StoreAuthService};

/// Profile fields to overwrite; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

pub async fn cmd_update_user(
    config: &Config,
    id: i32,
    changes: ProfileChanges,
) -> anyhow::Result<()> {
    if config.uses_memory_store() {
        anyhow::bail!("In-memory store keeps no users between runs");
    }

    let store = Store::new(&config.general.database_path).await?;
    let auth = StoreAuthService::new(
        Arc::new(store.clone()),
        Some(store),
        config.security.clone(),
    );

    let user = apply_profile_changes(&auth, id, changes).await?;
    println!(
        "✓ Updated user {}: {} {} <{}>",
        user.id, user.first_name, user.last_name, user.email
    );
    Ok(())
}

async fn apply_profile_changes(
    auth: &dyn AuthService,
    id: i32,
    changes: ProfileChanges,
) -> anyhow::Result<User> {
    let mut user = auth.current_user(id).await?;

    if let Some(first_name) = changes.first_name {
        user.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = changes.last_name {
        user.last_name = last_name.trim().to_string();
    }
    if let Some(email) = changes.email {
        user.email = email.trim().to_string();
    }

    let mut form = Form::from_pairs([
        ("first_name", user.first_name.as_str()),
        ("last_name", user.last_name.as_str()),
        ("email", user.email.as_str()),
    ]);
    form.required(&["first_name", "last_name", "email"])
        .is_email("email");
    if !form.valid() {
        let messages: Vec<String> = form
            .errors()
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
            .collect();
        anyhow::bail!("Invalid profile: {}", messages.join("; "));
    }

    auth.update_profile(&user).await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;
    use crate::db::InMemoryStore;

    fn auth() -> StoreAuthService {
        let security = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
            auto_migrate_password_hashes: false,
        };
        let store = InMemoryStore::new()
            .with_user("admin@example.com", "password", &security)
            .unwrap();
        StoreAuthService::new(Arc::new(store), None, security)
    }

    #[tokio::test]
    async fn test_apply_profile_changes() {
        let auth = auth();
        let id = auth.login("admin@example.com", "password").await.unwrap().id;

        let user = apply_profile_changes(
            &auth,
            id,
            ProfileChanges {
                first_name: Some(" Owner ".to_string()),
                email: Some("owner@here.com".to_string()),
                ..ProfileChanges::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(user.first_name, "Owner");

        let stored = auth.current_user(id).await.unwrap();
        assert_eq!(stored.first_name, "Owner");
        assert_eq!(stored.email, "owner@here.com");
        assert!(auth.login("owner@here.com", "password").await.is_ok());
    }

    #[tokio::test]
    async fn test_apply_profile_changes_rejects_bad_email() {
        let auth = auth();
        let id = auth.login("admin@example.com", "password").await.unwrap().id;

        let changes = ProfileChanges {
            email: Some("not-an-email".to_string()),
            ..ProfileChanges::default()
        };
        assert!(apply_profile_changes(&auth, id, changes).await.is_err());
        assert_eq!(auth.current_user(id).await.unwrap().email, "admin@example.com");

        assert!(
            apply_profile_changes(&auth, 999, ProfileChanges::default())
                .await
                .is_err()
        );
    }
}
