use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::analytics::dtos::{AnalyticsQuery, AnalyticsSummaryDto};
use crate::features::analytics::services::AnalyticsService;
use crate::shared::types::ApiResponse;

/// Aggregated statistics over verified reports
#[utoipa::path(
    get,
    path = "/api/analytics/summary",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Analytics summary", body = ApiResponse<AnalyticsSummaryDto>),
        (status = 400, description = "Unknown range")
    ),
    tag = "analytics"
)]
pub async fn get_summary(
    State(service): State<Arc<AnalyticsService>>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ApiResponse<AnalyticsSummaryDto>>> {
    let summary = service.summary(query.range.unwrap_or_default()).await?;
    Ok(Json(ApiResponse::success(Some(summary.into()), None, None)))
}
