// src/handlers/personnel.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::get_tenant_connection,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    scheduling::DateRange,
    services::{rotation_service::AvailabilityGeneration, scheduling_service::WeeklyHoursReport},
};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    #[param(value_type = String, example = "2025-01-06")]
    #[schema(value_type = String, example = "2025-01-06")]
    pub start: NaiveDate,
    #[param(value_type = String, example = "2025-02-02")]
    #[schema(value_type = String, example = "2025-02-02")]
    pub end: NaiveDate,
}

// GET /api/{tenant}/personnel/{personnel_id}/weekly-hours
#[utoipa::path(
    get,
    path = "/api/{tenant}/personnel/{personnel_id}/weekly-hours",
    tag = "Personnel",
    params(
        ("tenant" = String, Path, description = "Slug da caserna"),
        ("personnel_id" = Uuid, Path, description = "ID do bombeiro"),
        PeriodQuery
    ),
    responses(
        (status = 200, description = "Horas internas e externas por semana (segunda a domingo)", body = WeeklyHoursReport),
        (status = 404, description = "Bombeiro não encontrado")
    )
)]
pub async fn weekly_hours(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path((_tenant, personnel_id)): Path<(String, Uuid)>,
    Query(period): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = DateRange::new(period.start, period.end)
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = get_tenant_connection(&app_state, &tenant)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .scheduling_service
        .weekly_hours(&mut *conn, tenant.id, personnel_id, range)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}

// POST /api/{tenant}/personnel/{personnel_id}/availability/rotation
#[utoipa::path(
    post,
    path = "/api/{tenant}/personnel/{personnel_id}/availability/rotation",
    tag = "Personnel",
    request_body = PeriodQuery,
    params(
        ("tenant" = String, Path, description = "Slug da caserna"),
        ("personnel_id" = Uuid, Path, description = "ID do bombeiro")
    ),
    responses(
        (status = 201, description = "Disponibilidades regeneradas a partir da rotação", body = AvailabilityGeneration),
        (status = 404, description = "Bombeiro não encontrado"),
        (status = 409, description = "Rotação ainda não configurada"),
        (status = 422, description = "Bombeiro sem equipe de rotação")
    )
)]
pub async fn generate_availability(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path((_tenant, personnel_id)): Path<(String, Uuid)>,
    Json(period): Json<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = DateRange::new(period.start, period.end)
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = get_tenant_connection(&app_state, &tenant)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let generation = app_state
        .rotation_service
        .generate_availability(&mut *conn, tenant.id, personnel_id, range)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(generation)))
}
