// src/handlers/rotation.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::{
        db_utils::get_tenant_connection,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::rotation::{RotationSettings, RotationTeam},
    scheduling::{rotation::RotationDay, DateRange, RotationCycle, RotationPattern, RotationVerification},
};

// =============================================================================
//  1. FERRAMENTAS SEM TENANT (CALENDÁRIO E VERIFICAÇÃO)
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamCalendar {
    pub team: RotationTeam,
    #[schema(example = "2025-01-06")]
    pub cycle_start_date: NaiveDate,
    pub working_days: usize,
    pub days: Vec<RotationDay>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    /// Primeiro dia do ciclo de 28 dias
    #[param(value_type = String, example = "2025-01-06")]
    pub cycle_start: NaiveDate,
    #[param(value_type = String, example = "Jaune")]
    pub team: RotationTeam,
    #[param(value_type = String, example = "2025-01-01")]
    pub start: NaiveDate,
    #[param(value_type = String, example = "2025-01-31")]
    pub end: NaiveDate,
}

// GET /api/rotation/calendar
#[utoipa::path(
    get,
    path = "/api/rotation/calendar",
    tag = "Rotation",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Dias do intervalo com a posição no ciclo 10/14", body = TeamCalendar),
        (status = 400, description = "Intervalo inválido")
    )
)]
pub async fn calendar(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<CalendarQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = DateRange::new(query.start, query.end)
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    let cycle = RotationCycle::quebec(query.cycle_start);
    let days = cycle.calendar(query.team, range);

    Ok((
        StatusCode::OK,
        Json(TeamCalendar {
            team: query.team,
            cycle_start_date: query.cycle_start,
            working_days: days.iter().filter(|d| d.working).count(),
            days,
        }),
    ))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRotationPayload {
    #[schema(value_type = String, example = "2025-01-06")]
    pub cycle_start_date: NaiveDate,

    #[schema(example = "Jaune")]
    pub team: RotationTeam,

    // Ano civil inteiro; alternativa a start/end
    #[validate(range(min = 1, max = 9999, message = "out_of_range"))]
    #[schema(example = 2025)]
    pub year: Option<i32>,

    #[schema(value_type = Option<String>, example = "2025-01-01")]
    pub start: Option<NaiveDate>,

    #[schema(value_type = Option<String>, example = "2025-12-31")]
    pub end: Option<NaiveDate>,

    /// Valor que o chamador espera; uma divergência vira defeito no relatório
    #[schema(example = 104)]
    pub expected: Option<u32>,

    #[validate(range(min = 1, max = 366, message = "out_of_range"))]
    #[schema(example = 28)]
    pub cycle_length_days: Option<i32>,

    #[validate(length(min = 1, max = 366, message = "required"))]
    #[schema(example = json!([1, 2, 5, 6, 7, 8, 11, 12]))]
    pub working_days: Option<Vec<i32>>,
}

impl VerifyRotationPayload {
    /// O ano tem precedência; sem ano, `start` e `end` são obrigatórios.
    fn period(&self) -> Result<DateRange, AppError> {
        if let Some(year) = self.year {
            return Ok(DateRange::year(year)?);
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok(DateRange::new(start, end)?),
            _ => {
                let mut errors = ValidationErrors::new();
                errors.add("year", ValidationError::new("period_required").with_message("year_or_start_end".into()));
                Err(AppError::ValidationError(errors))
            }
        }
    }
}

// POST /api/rotation/verify
#[utoipa::path(
    post,
    path = "/api/rotation/verify",
    tag = "Rotation",
    request_body = VerifyRotationPayload,
    responses(
        (status = 200, description = "Contagem de dias trabalhados com os defeitos encontrados", body = RotationVerification),
        (status = 400, description = "Padrão ou intervalo inválido")
    )
)]
pub async fn verify(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<VerifyRotationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let range = payload
        .period()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    let pattern = RotationPattern::with_overrides(payload.cycle_length_days, payload.working_days.as_deref())
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    let cycle = RotationCycle::new(payload.cycle_start_date, pattern);
    let report = cycle.verify(payload.team, range, payload.expected);

    Ok((StatusCode::OK, Json(report)))
}

// =============================================================================
//  2. CONFIGURAÇÃO POR CASERNA
// =============================================================================

// GET /api/{tenant}/rotation/settings
#[utoipa::path(
    get,
    path = "/api/{tenant}/rotation/settings",
    tag = "Rotation",
    params(
        ("tenant" = String, Path, description = "Slug da caserna")
    ),
    responses(
        (status = 200, description = "Configuração da rotação", body = RotationSettings),
        (status = 404, description = "Caserna não encontrada"),
        (status = 409, description = "Rotação ainda não configurada")
    )
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_tenant_connection(&app_state, &tenant)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let settings = app_state
        .rotation_service
        .get_settings(&mut *conn, tenant.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(settings)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRotationSettingsPayload {
    #[schema(value_type = String, example = "2025-01-06")]
    pub cycle_start_date: NaiveDate,

    #[validate(range(min = 1, max = 366, message = "out_of_range"))]
    #[schema(example = 28)]
    pub cycle_length_days: Option<i32>,

    #[validate(length(min = 1, max = 366, message = "required"))]
    #[schema(example = json!([1, 2, 5, 6, 7, 8, 11, 12]))]
    pub working_days: Option<Vec<i32>>,

    // Tipo de garde usado pela geração automática
    pub default_shift_type_id: Option<Uuid>,
}

// PUT /api/{tenant}/rotation/settings
#[utoipa::path(
    put,
    path = "/api/{tenant}/rotation/settings",
    tag = "Rotation",
    request_body = UpdateRotationSettingsPayload,
    params(
        ("tenant" = String, Path, description = "Slug da caserna")
    ),
    responses(
        (status = 200, description = "Configuração gravada", body = RotationSettings),
        (status = 400, description = "Padrão inválido"),
        (status = 422, description = "Tipo de garde padrão inexistente")
    )
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<UpdateRotationSettingsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let pattern = RotationPattern::with_overrides(payload.cycle_length_days, payload.working_days.as_deref())
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = get_tenant_connection(&app_state, &tenant)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let settings = app_state
        .rotation_service
        .update_settings(
            &mut *conn,
            tenant.id,
            payload.cycle_start_date,
            &pattern,
            payload.default_shift_type_id,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(settings)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TenantCalendarQuery {
    #[param(value_type = String, example = "Rouge")]
    pub team: RotationTeam,
    #[param(value_type = String, example = "2025-01-01")]
    pub start: NaiveDate,
    #[param(value_type = String, example = "2025-01-31")]
    pub end: NaiveDate,
}

// GET /api/{tenant}/rotation/calendar
#[utoipa::path(
    get,
    path = "/api/{tenant}/rotation/calendar",
    tag = "Rotation",
    params(
        ("tenant" = String, Path, description = "Slug da caserna"),
        TenantCalendarQuery
    ),
    responses(
        (status = 200, description = "Calendário da equipe segundo a configuração da caserna", body = TeamCalendar),
        (status = 409, description = "Rotação ainda não configurada")
    )
)]
pub async fn tenant_calendar(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(query): Query<TenantCalendarQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = DateRange::new(query.start, query.end)
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = get_tenant_connection(&app_state, &tenant)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let cycle = app_state
        .rotation_service
        .cycle_for(&mut *conn, tenant.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    let days = cycle.calendar(query.team, range);

    Ok((
        StatusCode::OK,
        Json(TeamCalendar {
            team: query.team,
            cycle_start_date: cycle.start(),
            working_days: days.iter().filter(|d| d.working).count(),
            days,
        }),
    ))
}
