use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::auth::model::User;

mod memory;
mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

/// Credential store for accounts.
///
/// Implemented by PgUserRepository (postgres) and InMemoryUserRepository
/// (memory store and tests).
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account. Fails with `Conflict` when the email is taken.
    async fn insert(&self, user: &User) -> Result<User>;

    /// Look up an account by its (already lowercased) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}
