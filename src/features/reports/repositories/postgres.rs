use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::ReportRepository;
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{Report, ReportCounts, ReportStatus};

const REPORT_COLUMNS: &str = r#"
    id, title, description, category, latitude, longitude,
    address, contact_info, photo_url, status, created_at, updated_at
"#;

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn insert(&self, report: &Report) -> Result<Report> {
        let sql = format!(
            r#"
            INSERT INTO reports (
                id, title, description, category, latitude, longitude,
                address, contact_info, photo_url, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        sqlx::query_as::<_, Report>(&sql)
            .bind(report.id)
            .bind(&report.title)
            .bind(&report.description)
            .bind(&report.category)
            .bind(report.latitude)
            .bind(report.longitude)
            .bind(&report.address)
            .bind(&report.contact_info)
            .bind(&report.photo_url)
            .bind(report.status)
            .bind(report.created_at)
            .bind(report.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert report: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        let sql = format!("SELECT {} FROM reports WHERE id = $1", REPORT_COLUMNS);

        sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch report {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn list(&self, status: Option<ReportStatus>) -> Result<Vec<Report>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM reports
            WHERE ($1::report_status IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            "#,
            REPORT_COLUMNS
        );

        sqlx::query_as::<_, Report>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReportStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Report>> {
        let sql = format!(
            r#"
            UPDATE reports
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .bind(status)
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update status of report {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete report {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn counts(&self) -> Result<ReportCounts> {
        sqlx::query_as::<_, ReportCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'VERIFIED') AS verified,
                COUNT(*) FILTER (WHERE status = 'PENDING') AS pending,
                COUNT(*) FILTER (WHERE status = 'REJECTED') AS rejected
            FROM reports
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count reports: {:?}", e);
            AppError::Database(e)
        })
    }
}
