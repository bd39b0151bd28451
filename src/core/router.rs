use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::{AppConfig, SwaggerConfig, UploadConfig};
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::analytics::{routes as analytics_routes, AnalyticsService};
use crate::features::auth::repositories::UserRepository;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::services::AuthService;
use crate::features::auth::{JwtService, PasswordHasher};
use crate::features::reports::handlers::ReportState;
use crate::features::reports::repositories::ReportRepository;
use crate::features::reports::routes as reports_routes;
use crate::features::reports::{IntakeService, ReportService};
use crate::modules::storage::PhotoStorage;
use crate::shared::constants::UPLOADS_ROUTE;

/// Every service the HTTP layer talks to
#[derive(Clone)]
pub struct AppServices {
    pub jwt: Arc<JwtService>,
    pub auth: Arc<AuthService>,
    pub reports: Arc<ReportService>,
    pub intake: Arc<IntakeService>,
    pub analytics: Arc<AnalyticsService>,
}

impl AppServices {
    pub fn new(
        users: Arc<dyn UserRepository>,
        reports: Arc<dyn ReportRepository>,
        jwt: Arc<JwtService>,
        hasher: PasswordHasher,
        storage: Arc<PhotoStorage>,
        max_photo_size: usize,
    ) -> Self {
        let auth = Arc::new(AuthService::new(users, Arc::clone(&jwt), hasher));
        let report_service = Arc::new(ReportService::new(reports));
        let intake = Arc::new(IntakeService::new(
            Arc::clone(&report_service),
            storage,
            max_photo_size,
        ));
        let analytics = Arc::new(AnalyticsService::new(Arc::clone(&report_service)));

        Self {
            jwt,
            auth,
            reports: report_service,
            intake,
            analytics,
        }
    }
}

/// Simple health check endpoint (no auth required)
async fn health_check() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}

fn swagger_routes(config: &SwaggerConfig) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: config.title.clone(),
        version: config.version.clone(),
        description: config.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    if let Some(credentials) = config.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        swagger.layer(from_fn(middleware::basic_auth_middleware(Arc::new(
            credentials,
        ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        swagger
    }
}

/// Assemble the application router with its middleware stack
pub fn build_router(
    services: &AppServices,
    app: &AppConfig,
    upload: &UploadConfig,
    swagger: &SwaggerConfig,
) -> Router {
    let report_state = ReportState {
        report_service: Arc::clone(&services.reports),
        intake_service: Arc::clone(&services.intake),
    };

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&services.auth)))
        .merge(reports_routes::admin_routes(report_state.clone()))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&services.jwt),
            middleware::auth_middleware,
        ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(Arc::clone(&services.auth)))
        .merge(reports_routes::public_routes(
            report_state,
            upload.max_photo_size,
        ))
        .merge(analytics_routes::routes(Arc::clone(&services.analytics)))
        .route("/health", axum::routing::get(health_check))
        .nest_service(UPLOADS_ROUTE, ServeDir::new(&upload.dir));

    Router::new()
        .merge(swagger_routes(swagger))
        .merge(protected_routes)
        .merge(public_routes)
        .layer(DefaultBodyLimit::max(app.max_request_body_size))
        .layer(middleware::cors_layer(app.cors_allowed_origins.clone()))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
