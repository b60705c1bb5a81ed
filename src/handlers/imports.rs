// src/handlers/imports.rs
//
// Importação dos documentos da base antiga. Um documento inválido rejeita o lote inteiro.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        db_utils::get_tenant_connection,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::{
        legacy::{LegacyAssignmentDocument, LegacyPersonnelDocument, LegacyShiftTypeDocument},
        personnel::Personnel,
        scheduling::{Assignment, ShiftType},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PersonnelImportPayload {
    #[validate(length(min = 1, max = 5000, message = "batch_size"))]
    pub documents: Vec<LegacyPersonnelDocument>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ShiftTypeImportPayload {
    #[validate(length(min = 1, max = 5000, message = "batch_size"))]
    pub documents: Vec<LegacyShiftTypeDocument>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignmentImportPayload {
    #[validate(length(min = 1, max = 5000, message = "batch_size"))]
    pub documents: Vec<LegacyAssignmentDocument>,
}

// POST /api/{tenant}/import/personnel
#[utoipa::path(
    post,
    path = "/api/{tenant}/import/personnel",
    tag = "Import",
    request_body = PersonnelImportPayload,
    params(
        ("tenant" = String, Path, description = "Slug da caserna")
    ),
    responses(
        (status = 201, description = "Bombeiros importados", body = Vec<Personnel>),
        (status = 400, description = "Documento inválido (equipe desconhecida, sem nome...)")
    )
)]
pub async fn import_personnel(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<PersonnelImportPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = get_tenant_connection(&app_state, &tenant)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let created = app_state
        .import_service
        .import_personnel(&mut *conn, tenant.id, payload.documents)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(created)))
}

// POST /api/{tenant}/import/shift-types
#[utoipa::path(
    post,
    path = "/api/{tenant}/import/shift-types",
    tag = "Import",
    request_body = ShiftTypeImportPayload,
    params(
        ("tenant" = String, Path, description = "Slug da caserna")
    ),
    responses(
        (status = 201, description = "Tipos de garde importados", body = Vec<ShiftType>),
        (status = 400, description = "Documento inválido (horário ou duração)")
    )
)]
pub async fn import_shift_types(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<ShiftTypeImportPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = get_tenant_connection(&app_state, &tenant)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let created = app_state
        .import_service
        .import_shift_types(&mut *conn, tenant.id, payload.documents)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(created)))
}

// POST /api/{tenant}/import/assignments
#[utoipa::path(
    post,
    path = "/api/{tenant}/import/assignments",
    tag = "Import",
    request_body = AssignmentImportPayload,
    params(
        ("tenant" = String, Path, description = "Slug da caserna")
    ),
    responses(
        (status = 201, description = "Assignações importadas", body = Vec<Assignment>),
        (status = 400, description = "Origem desconhecida"),
        (status = 422, description = "Bombeiro ou tipo de garde inexistente")
    )
)]
pub async fn import_assignments(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<AssignmentImportPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut conn = get_tenant_connection(&app_state, &tenant)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let created = app_state
        .import_service
        .import_assignments(&mut *conn, tenant.id, payload.documents)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn batch_size_is_bounded() {
        let empty: PersonnelImportPayload = serde_json::from_value(json!({ "documents": [] })).unwrap();
        let errors = empty.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("documents"));

        let one: PersonnelImportPayload =
            serde_json::from_value(json!({ "documents": [{ "nom": "Roy" }] })).unwrap();
        assert!(one.validate().is_ok());

        let document = json!({ "nom": "Jour", "heure_debut": "07:00", "duree_heures": 10 });
        let too_many: ShiftTypeImportPayload =
            serde_json::from_value(json!({ "documents": vec![document; 5001] })).unwrap();
        assert!(too_many.validate().is_err());
    }
}
