// src/handlers/assignments.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::get_tenant_connection,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    scheduling::DateRange,
    services::scheduling_service::{AssignmentCheck, GenerationOutcome, ReconciliationOutcome},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RangeOperationPayload {
    #[schema(value_type = String, example = "2025-01-06")]
    pub start: NaiveDate,

    #[schema(value_type = String, example = "2025-02-02")]
    pub end: NaiveDate,

    // Calcula e devolve o relatório sem gravar nada
    #[serde(default)]
    #[schema(example = true)]
    pub dry_run: bool,
}

// POST /api/{tenant}/assignments/generate
#[utoipa::path(
    post,
    path = "/api/{tenant}/assignments/generate",
    tag = "Assignments",
    request_body = RangeOperationPayload,
    params(
        ("tenant" = String, Path, description = "Slug da caserna")
    ),
    responses(
        (status = 200, description = "Plano gerado (e gravado, fora do modo dry-run)", body = GenerationOutcome),
        (status = 400, description = "Intervalo inválido"),
        (status = 409, description = "Rotação ou tipo de garde padrão não configurado")
    )
)]
pub async fn generate(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<RangeOperationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let range = DateRange::new(payload.start, payload.end)
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = get_tenant_connection(&app_state, &tenant)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let outcome = app_state
        .scheduling_service
        .generate_assignments(&mut *conn, tenant.id, range, payload.dry_run)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(outcome)))
}

// POST /api/{tenant}/assignments/reconcile
#[utoipa::path(
    post,
    path = "/api/{tenant}/assignments/reconcile",
    tag = "Assignments",
    request_body = RangeOperationPayload,
    params(
        ("tenant" = String, Path, description = "Slug da caserna")
    ),
    responses(
        (status = 200, description = "Relatório da reconciliação", body = ReconciliationOutcome),
        (status = 400, description = "Intervalo inválido")
    )
)]
pub async fn reconcile(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<RangeOperationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let range = DateRange::new(payload.start, payload.end)
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = get_tenant_connection(&app_state, &tenant)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let outcome = app_state
        .scheduling_service
        .reconcile(&mut *conn, tenant.id, range, payload.dry_run)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(outcome)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckAssignmentPayload {
    pub personnel_id: Uuid,
    pub shift_type_id: Uuid,
    #[schema(value_type = String, example = "2025-01-20")]
    pub date: NaiveDate,
}

// POST /api/{tenant}/assignments/check
#[utoipa::path(
    post,
    path = "/api/{tenant}/assignments/check",
    tag = "Assignments",
    request_body = CheckAssignmentPayload,
    params(
        ("tenant" = String, Path, description = "Slug da caserna")
    ),
    responses(
        (status = 200, description = "Se a garde pode ser atribuída e, se não, o motivo", body = AssignmentCheck),
        (status = 404, description = "Bombeiro ou tipo de garde não encontrado")
    )
)]
pub async fn check(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<CheckAssignmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_tenant_connection(&app_state, &tenant)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let check = app_state
        .scheduling_service
        .check_assignment(
            &mut *conn,
            tenant.id,
            payload.personnel_id,
            payload.shift_type_id,
            payload.date,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(check)))
}
