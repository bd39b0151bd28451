//! Role-based authorization guards.
//!
//! The auth middleware resolves the caller identity; these extractors then
//! check the role before the handler runs.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for admin-only endpoints.
///
/// No identity on the request yields `Unauthorized`; a non-admin identity
/// yields `Forbidden`.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(admin): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        user.require_admin()?;

        Ok(RequireAdmin(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use axum::http::Request;
    use uuid::Uuid;

    fn parts_with(user: Option<AuthenticatedUser>) -> Parts {
        let (mut parts, _) = Request::new(()).into_parts();
        if let Some(user) = user {
            parts.extensions.insert(user);
        }
        parts
    }

    fn identity(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::now_v7(),
            email: "someone@example.com".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_admin_passes() {
        let mut parts = parts_with(Some(identity(Role::Admin)));
        let RequireAdmin(user) = RequireAdmin::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_user_role_is_forbidden() {
        let mut parts = parts_with(Some(identity(Role::User)));
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let mut parts = parts_with(None);
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
