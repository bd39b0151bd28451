use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Moderation status matching the database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportStatus {
    Pending,
    Verified,
    Rejected,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "PENDING"),
            ReportStatus::Verified => write!(f, "VERIFIED"),
            ReportStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Database model for report
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub contact_info: Option<String>,
    pub photo_url: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Build a fresh PENDING record from validated input
    pub fn from_new(data: NewReport, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: data.title,
            description: data.description,
            category: data.category,
            latitude: data.latitude,
            longitude: data.longitude,
            address: data.address,
            contact_info: data.contact_info,
            photo_url: data.photo_url,
            status: ReportStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated data for creating a new report. There is no status field:
/// every report starts out PENDING.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub contact_info: Option<String>,
    pub photo_url: Option<String>,
}

/// Per-status counts taken in a single read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct ReportCounts {
    pub total: i64,
    pub verified: i64,
    pub pending: i64,
    pub rejected: i64,
}

impl ReportCounts {
    pub fn tally<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Self {
        reports
            .into_iter()
            .fold(Self::default(), |mut counts, report| {
                counts.total += 1;
                match report.status {
                    ReportStatus::Verified => counts.verified += 1,
                    ReportStatus::Pending => counts.pending += 1,
                    ReportStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }
}
