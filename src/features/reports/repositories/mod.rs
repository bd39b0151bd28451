use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::reports::models::{Report, ReportCounts, ReportStatus};

mod memory;
mod postgres;

pub use memory::InMemoryReportRepository;
pub use postgres::PgReportRepository;

/// Persistence for reports. Listings are ordered newest first.
///
/// Implemented by PgReportRepository (postgres) and InMemoryReportRepository
/// (memory store and tests).
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn insert(&self, report: &Report) -> Result<Report>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>>;

    /// All reports, optionally restricted to one status, by `created_at` desc.
    async fn list(&self, status: Option<ReportStatus>) -> Result<Vec<Report>>;

    /// Returns `None` when no report has this id.
    async fn update_status(
        &self,
        id: Uuid,
        status: ReportStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Report>>;

    /// Returns whether a report was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Per-status counts from one consistent read.
    async fn counts(&self) -> Result<ReportCounts>;
}
