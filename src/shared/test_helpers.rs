//! Builders shared by the inline test modules.

use chrono::{DateTime, TimeDelta, Utc};
use fake::faker::address::en::StreetName;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::router::AppServices;
use crate::features::auth::model::{AuthenticatedUser, Role, User};
use crate::features::auth::repositories::InMemoryUserRepository;
use crate::features::auth::services::AuthService;
use crate::features::auth::{JwtService, PasswordHasher};
use crate::features::reports::models::{NewReport, Report, ReportStatus};
use crate::features::reports::repositories::InMemoryReportRepository;
use crate::features::reports::ReportService;
use crate::modules::storage::PhotoStorage;

pub const TEST_JWT_SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

/// Keeps hashing cheap in tests
pub const TEST_HASH_ITERATIONS: u32 = 10;

pub fn test_jwt_service() -> JwtService {
    JwtService::new(
        TEST_JWT_SECRET,
        "crimemap-test".to_string(),
        TimeDelta::hours(1),
        std::time::Duration::from_secs(0),
    )
}

pub fn user_with_role(email: &str, role: Role) -> User {
    User {
        id: Uuid::now_v7(),
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role,
        created_at: Utc::now(),
    }
}

pub fn admin_identity() -> AuthenticatedUser {
    AuthenticatedUser::from(&user_with_role("admin@example.com", Role::Admin))
}

pub fn user_identity() -> AuthenticatedUser {
    AuthenticatedUser::from(&user_with_role("user@example.com", Role::User))
}

/// Signed bearer token for a fresh account with the given role
pub fn token_for(role: Role) -> String {
    let email = match role {
        Role::Admin => "admin@example.com",
        Role::User => "user@example.com",
    };
    test_jwt_service()
        .issue(&user_with_role(email, role))
        .map(|t| t.access_token)
        .unwrap()
}

pub fn test_auth_service() -> AuthService {
    AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(test_jwt_service()),
        PasswordHasher::new(TEST_HASH_ITERATIONS),
    )
}

pub fn test_report_service() -> ReportService {
    ReportService::new(Arc::new(InMemoryReportRepository::new()))
}

/// Fresh upload directory under the system temp dir, removed on drop
pub struct TempUploadDir(PathBuf);

impl TempUploadDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("crimemap-test-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempUploadDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// All services over in-memory stores, photos under `upload_dir`
pub fn test_services(upload_dir: PathBuf, max_photo_size: usize) -> AppServices {
    AppServices::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryReportRepository::new()),
        Arc::new(test_jwt_service()),
        PasswordHasher::new(TEST_HASH_ITERATIONS),
        Arc::new(PhotoStorage::new(upload_dir)),
        max_photo_size,
    )
}

pub fn new_report(title: &str, category: &str) -> NewReport {
    NewReport {
        title: title.to_string(),
        description: Some(Sentence(3..8).fake()),
        category: category.to_string(),
        latitude: 40.71,
        longitude: -74.0,
        address: Some(StreetName().fake()),
        contact_info: None,
        photo_url: None,
    }
}

/// PENDING report created at `created_at`
pub fn report_at(created_at: DateTime<Utc>) -> Report {
    let title: String = Sentence(2..5).fake();
    Report {
        id: Uuid::now_v7(),
        title,
        description: None,
        category: "other".to_string(),
        latitude: 51.5,
        longitude: -0.12,
        address: None,
        contact_info: None,
        photo_url: None,
        status: ReportStatus::Pending,
        created_at,
        updated_at: created_at,
    }
}

pub fn report_in(category: &str) -> Report {
    Report {
        category: category.to_string(),
        ..report_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_upload_dir_is_removed_on_drop() {
        let dir = TempUploadDir::new();
        let path = dir.path().to_path_buf();
        std::fs::write(path.join("photo.jpg"), b"x").unwrap();
        assert!(path.is_dir());

        drop(dir);
        assert!(!path.exists());
    }
}
