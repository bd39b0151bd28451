use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::UserRepository;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::User;

/// Accounts keyed by email
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(AppError::Conflict(
                "Email is already registered".to_string(),
            ));
        }
        users.insert(user.email.clone(), user.clone());
        Ok(user.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use crate::shared::test_helpers::user_with_role;

    #[tokio::test]
    async fn test_insert_then_find() {
        let repo = InMemoryUserRepository::new();
        let user = user_with_role("a@example.com", Role::User);

        repo.insert(&user).await.unwrap();

        let found = repo.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(repo.find_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.insert(&user_with_role("a@example.com", Role::User))
            .await
            .unwrap();

        let result = repo
            .insert(&user_with_role("a@example.com", Role::Admin))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
