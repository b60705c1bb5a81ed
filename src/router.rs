// src/router.rs

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

/// Monta o router completo. As rotas de caserna ficam sob `/api/{tenant}`
/// e o extrator `TenantContext` resolve o slug em cada handler.
pub fn build_router(app_state: AppState) -> Router {
    // Ferramentas de rotação que não dependem de uma caserna
    let rotation_tools = Router::new()
        .route("/calendar", get(handlers::rotation::calendar))
        .route("/verify", post(handlers::rotation::verify));

    let tenant_routes = Router::new()
        .route(
            "/rotation/settings",
            get(handlers::rotation::get_settings).put(handlers::rotation::update_settings),
        )
        .route("/rotation/calendar", get(handlers::rotation::tenant_calendar))
        .route("/assignments/generate", post(handlers::assignments::generate))
        .route("/assignments/reconcile", post(handlers::assignments::reconcile))
        .route("/assignments/check", post(handlers::assignments::check))
        .route(
            "/personnel/{personnel_id}/weekly-hours",
            get(handlers::personnel::weekly_hours),
        )
        .route(
            "/personnel/{personnel_id}/availability/rotation",
            post(handlers::personnel::generate_availability),
        )
        .route("/import/personnel", post(handlers::imports::import_personnel))
        .route("/import/shift-types", post(handlers::imports::import_shift_types))
        .route("/import/assignments", post(handlers::imports::import_assignments));

    Router::new()
        .route("/api/health", get(handlers::health::health))
        .nest("/api/rotation", rotation_tools)
        .nest("/api/{tenant}", tenant_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
