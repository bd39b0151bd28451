use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::reports::dtos::{
    AdminReportQuery, CategoryDto, DeleteReportResponseDto, ReportListQuery, ReportResponseDto,
    ReportStatsDto, SubmitReportForm, UpdateReportStatusDto,
};
use crate::features::reports::models::Report;
use crate::features::reports::services::{
    IntakeService, PhotoUpload, RawReportSubmission, ReportService,
};
use crate::shared::types::{ApiResponse, Meta};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub intake_service: Arc<IntakeService>,
}

/// Body limit overruns keep their 413; anything else is a malformed form
fn multipart_error(e: MultipartError, context: &str) -> AppError {
    debug!("{}: {}", context, e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{}: request body too large", context))
    } else {
        AppError::BadRequest(format!("{}: {}", context, e))
    }
}

fn to_dtos(reports: Vec<Report>) -> Vec<ReportResponseDto> {
    reports.into_iter().map(ReportResponseDto::from).collect()
}

/// Submit a new report
///
/// Accepts multipart/form-data with the report fields and an optional
/// `photo` file. The report is created as PENDING whatever the client sends.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body(
        content = SubmitReportForm,
        content_type = "multipart/form-data",
        description = "Report fields with an optional photo"
    ),
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid field, coordinate or photo"),
        (status = 413, description = "Photo too large")
    ),
    tag = "reports"
)]
pub async fn submit_report(
    State(state): State<ReportState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let mut raw = RawReportSubmission::default();
    let mut photo: Option<PhotoUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Failed to read multipart data"))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "photo" {
            let file_name = field.file_name().map(|s| s.to_string());
            let content_type = field.content_type().map(|s| s.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, "Failed to read photo data"))?;

            photo = Some(PhotoUpload {
                file_name,
                content_type,
                data: data.to_vec(),
            });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| multipart_error(e, &format!("Failed to read field '{}'", field_name)))?;
            raw.set_field(&field_name, text)?;
        }
    }

    let report = state.intake_service.submit(raw, photo).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted for review".to_string()),
            None,
        )),
    ))
}

/// List verified reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Verified reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let page = state
        .report_service
        .search_verified(&query.to_filter(), query.limit, query.offset)
        .await?;

    let total = page.total as i64;
    Ok(Json(ApiResponse::success(
        Some(to_dtos(page.reports)),
        None,
        Some(Meta { total }),
    )))
}

/// Get a report by ID
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// List the known report categories
#[utoipa::path(
    get,
    path = "/api/reports/categories",
    responses(
        (status = 200, description = "Known categories", body = ApiResponse<Vec<CategoryDto>>),
    ),
    tag = "reports"
)]
pub async fn list_categories() -> Json<ApiResponse<Vec<CategoryDto>>> {
    let categories = CategoryDto::known();
    let total = categories.len() as i64;
    Json(ApiResponse::success(Some(categories), None, Some(Meta { total })))
}

/// List all reports for moderation
#[utoipa::path(
    get,
    path = "/api/reports/admin/all",
    params(AdminReportQuery),
    responses(
        (status = 200, description = "All reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "reports-admin"
)]
pub async fn admin_list_reports(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<ReportState>,
    Query(query): Query<AdminReportQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = state.report_service.list_all(&admin, query.status).await?;
    let total = reports.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(to_dtos(reports)),
        None,
        Some(Meta { total }),
    )))
}

/// Report counts per status
#[utoipa::path(
    get,
    path = "/api/reports/admin/stats",
    responses(
        (status = 200, description = "Report statistics", body = ApiResponse<ReportStatsDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "reports-admin"
)]
pub async fn admin_report_stats(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<ReportStatsDto>>> {
    let counts = state.report_service.stats(&admin).await?;
    Ok(Json(ApiResponse::success(Some(counts.into()), None, None)))
}

/// Set a report's status
#[utoipa::path(
    patch,
    path = "/api/reports/admin/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports-admin"
)]
pub async fn update_report_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state
        .report_service
        .set_status(&admin, id, dto.status)
        .await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Permanently delete a report
#[utoipa::path(
    delete,
    path = "/api/reports/admin/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report deleted", body = ApiResponse<DeleteReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports-admin"
)]
pub async fn delete_report(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteReportResponseDto>>> {
    state.report_service.delete(&admin, id).await?;
    Ok(Json(ApiResponse::success(
        Some(DeleteReportResponseDto { deleted: true }),
        Some("Report deleted".to_string()),
        None,
    )))
}
