use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, MeResponseDto, RegisterRequestDto,
};
use crate::features::auth::jwt::JwtService;
use crate::features::auth::model::{AuthenticatedUser, Role, User};
use crate::features::auth::password::PasswordHasher;
use crate::features::auth::repositories::UserRepository;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Service for account operations (register, login, admin seeding)
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: Arc<JwtService>, hasher: PasswordHasher) -> Self {
        Self { users, jwt, hasher }
    }

    /// Register a new account
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthUserDto> {
        let email = normalize_email(&dto.email);
        let role = dto.role.unwrap_or_default();

        if role == Role::Admin {
            // Self-assigned admin role is accepted; keep a trail of it
            tracing::warn!("Registration requested ADMIN role for {}", email);
        }

        let user = self.create_user(email, &dto.password, role).await?;
        tracing::info!("Registered user {} with role {}", user.id, user.role);

        Ok(user.into())
    }

    /// Verify credentials and issue an access token
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let email = normalize_email(&dto.email);

        let user = self.users.find_by_email(&email).await?;

        // Unknown emails still pay for a hash so both rejections take as long
        let hasher = self.hasher;
        let password = dto.password;
        let password_hash = user.as_ref().map(|u| u.password_hash.clone());
        let valid = tokio::task::spawn_blocking(move || match password_hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => hasher.verify_missing(&password),
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password check failed: {}", e)))?;

        let user = match user {
            Some(user) if valid => user,
            _ => {
                tracing::debug!("Rejected login for {}", email);
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        let token = self.jwt.issue(&user)?;
        tracing::info!("User {} logged in", user.id);

        Ok(AuthResponseDto {
            access_token: token.access_token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
            user: user.into(),
        })
    }

    /// Create the configured admin account unless the email already exists.
    /// Returns whether an account was created.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool> {
        let email = normalize_email(email);

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::debug!("Seed admin {} already exists", email);
            return Ok(false);
        }

        let user = match self.create_user(email, password, Role::Admin).await {
            Ok(user) => user,
            // Another instance seeded it first
            Err(AppError::Conflict(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        tracing::info!("Seeded admin account {}", user.id);

        Ok(true)
    }

    /// Identity of the caller (for /me endpoint)
    pub fn current_user(&self, user: AuthenticatedUser) -> MeResponseDto {
        user.into()
    }

    async fn create_user(&self, email: String, password: &str, role: Role) -> Result<User> {
        let hasher = self.hasher;
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = User {
            id: Uuid::now_v7(),
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        };

        self.users.insert(&user).await
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
