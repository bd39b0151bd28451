use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::analytics::{aggregation as analytics_aggregation, dtos as analytics_dtos};
use crate::features::analytics::handlers as analytics_handlers;
use crate::features::auth;
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_me,
        // Reports (public)
        reports_handlers::submit_report,
        reports_handlers::list_reports,
        reports_handlers::get_report,
        reports_handlers::list_categories,
        // Reports (admin)
        reports_handlers::admin_list_reports,
        reports_handlers::admin_report_stats,
        reports_handlers::update_report_status,
        reports_handlers::delete_report,
        // Analytics (public)
        analytics_handlers::get_summary,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            auth::dtos::MeResponseDto,
            auth::model::Role,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::AuthUserDto>,
            ApiResponse<auth::dtos::MeResponseDto>,
            // Reports
            reports_models::ReportStatus,
            reports_dtos::SubmitReportForm,
            reports_dtos::ReportResponseDto,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::ReportStatsDto,
            reports_dtos::CategoryDto,
            reports_dtos::DeleteReportResponseDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportStatsDto>,
            ApiResponse<Vec<reports_dtos::CategoryDto>>,
            ApiResponse<reports_dtos::DeleteReportResponseDto>,
            // Analytics
            analytics_aggregation::TimeWindow,
            analytics_dtos::AnalyticsSummaryDto,
            analytics_dtos::TimeSeriesPointDto,
            analytics_dtos::CategoryCountDto,
            ApiResponse<analytics_dtos::AnalyticsSummaryDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and token identity"),
        (name = "reports", description = "Report intake and the public verified view"),
        (name = "reports-admin", description = "Report moderation (admin only)"),
        (name = "analytics", description = "Aggregates over verified reports (public)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Crime Map API",
        version = "0.1.0",
        description = "Community crime reporting and moderation API",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/me",
            "/api/reports",
            "/api/reports/{id}",
            "/api/reports/categories",
            "/api/reports/admin/all",
            "/api/reports/admin/stats",
            "/api/reports/admin/{id}/status",
            "/api/reports/admin/{id}",
            "/api/analytics/summary",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }
}
