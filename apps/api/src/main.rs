//! Shiftcheck API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use shiftcheck_application::{FormService, SequenceAllocator, StaffService, SubmissionService};
use shiftcheck_core::AppError;
use shiftcheck_infrastructure::{
    PostgresFormRepository, PostgresSequenceAllocator, PostgresStaffRepository,
    PostgresSubmissionRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let form_repository = Arc::new(PostgresFormRepository::new(pool.clone()));
    let staff_repository = Arc::new(PostgresStaffRepository::new(pool.clone()));
    let submission_repository = Arc::new(PostgresSubmissionRepository::new(pool.clone()));
    let sequence_allocator: Arc<dyn SequenceAllocator> =
        Arc::new(PostgresSequenceAllocator::new(pool.clone()));

    let app_state = AppState {
        form_service: FormService::new(form_repository),
        staff_service: StaffService::new(staff_repository),
        submission_service: SubmissionService::new(
            submission_repository,
            Some(sequence_allocator),
        ),
        admin_token: config.admin_token.clone(),
    };

    let admin_routes = Router::new()
        .route("/api/forms", get(handlers::forms::list_forms_handler))
        .route(
            "/api/forms/{form_id}",
            get(handlers::forms::get_form_handler)
                .put(handlers::forms::save_form_handler)
                .delete(handlers::forms::delete_form_handler),
        )
        .route(
            "/api/forms/{form_id}/preview",
            post(handlers::forms::preview_form_handler),
        )
        .route(
            "/api/staff",
            get(handlers::staff::list_staff_handler).post(handlers::staff::create_staff_handler),
        )
        .route(
            "/api/staff/import",
            post(handlers::staff::import_staff_handler),
        )
        .route(
            "/api/staff/{staff_id}",
            axum::routing::put(handlers::staff::update_staff_handler)
                .delete(handlers::staff::delete_staff_handler),
        )
        .route(
            "/api/submissions",
            get(handlers::submissions::query_submissions_handler),
        )
        .route(
            "/api/submissions/pair",
            get(handlers::submissions::list_by_pair_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_admin,
        ));

    // Runner routes carry no admin guard; authentication of shift staff is
    // a collaborator concern outside this service.
    let runner_routes = Router::new()
        .route(
            "/api/run/forms/{form_id}",
            get(handlers::forms::get_form_handler),
        )
        .route("/api/run/staff", get(handlers::staff::run_staff_handler))
        .route(
            "/api/run/forms/{form_id}/submissions",
            post(handlers::submissions::submit_handler),
        );

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&config.frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(admin_routes)
        .merge(runner_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "shiftcheck-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
