use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::analytics::filters::{DateRange, ReportFilter};
use crate::features::reports::models::{
    category_color, category_label, Report, ReportCounts, ReportStatus, KNOWN_CATEGORIES,
};

/// Report submission form for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct SubmitReportForm {
    #[schema(example = "Bike stolen")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "theft")]
    pub category: String,
    #[schema(example = "40.71")]
    pub latitude: String,
    #[schema(example = "-74.00")]
    pub longitude: String,
    pub address: Option<String>,
    pub contact_info: Option<String>,
    /// Optional photo (jpeg, png, gif, webp or heic)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photo: Option<String>,
}

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub contact_info: Option<String>,
    /// Relative URL of the stored photo, e.g. `/uploads/<name>.jpg`
    pub photo_url: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            category: r.category,
            latitude: r.latitude,
            longitude: r.longitude,
            address: r.address,
            contact_info: r.contact_info,
            photo_url: r.photo_url,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Filters for the public report listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportListQuery {
    /// Comma separated categories; empty means all
    #[param(example = "theft,vandalism")]
    pub categories: Option<String>,
    /// First calendar day to include (UTC)
    pub start_date: Option<NaiveDate>,
    /// Last calendar day to include (UTC), inclusive
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive text over title, description and address
    pub search: Option<String>,
    /// Page size (1-100), all matches when omitted
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ReportListQuery {
    pub fn to_filter(&self) -> ReportFilter {
        ReportFilter {
            categories: self
                .categories
                .as_deref()
                .map(|list| {
                    list.split(',')
                        .map(|c| c.trim().to_lowercase())
                        .filter(|c| !c.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            range: DateRange::from_dates(self.start_date, self.end_date),
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

/// Moderation listing filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminReportQuery {
    /// Only reports with this status
    pub status: Option<ReportStatus>,
}

/// Request DTO for changing a report's status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
}

/// Report counts per status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ReportStatsDto {
    pub total: i64,
    pub verified: i64,
    pub pending: i64,
    pub rejected: i64,
}

impl From<ReportCounts> for ReportStatsDto {
    fn from(c: ReportCounts) -> Self {
        Self {
            total: c.total,
            verified: c.verified,
            pending: c.pending,
            rejected: c.rejected,
        }
    }
}

/// Known category with its display label and marker colour
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    #[schema(example = "suspicious_activity")]
    pub value: String,
    #[schema(example = "SUSPICIOUS ACTIVITY")]
    pub label: String,
    #[schema(example = "#6b7280")]
    pub color: String,
}

impl CategoryDto {
    pub fn known() -> Vec<Self> {
        KNOWN_CATEGORIES
            .iter()
            .map(|(value, _)| Self {
                value: value.to_string(),
                label: category_label(value),
                color: category_color(value).to_string(),
            })
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteReportResponseDto {
    pub deleted: bool,
}
