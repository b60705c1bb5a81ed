// src/middleware/tenancy.rs

use axum::extract::{FromRef, FromRequestParts, RawPathParams};
use axum::http::request::Parts;
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

// O nome do parâmetro de caminho com o slug da caserna: /api/{tenant}/...
pub const TENANT_PATH_PARAM: &str = "tenant";

// O extrator de tenant.
// Resolve o slug do caminho para o UUID que isola todos os dados de escala.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub id: Uuid,
    pub slug: String,
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    // Usamos ApiError como rejeição, pois ele já implementa IntoResponse
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        let slug = RawPathParams::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|params| {
                params
                    .iter()
                    .find(|(key, _)| *key == TENANT_PATH_PARAM)
                    .map(|(_, value)| value.to_string())
            })
            .ok_or_else(|| AppError::TenantMissing.to_api_error(&locale, &app_state.i18n_store))?;

        let tenant = app_state
            .tenant_repo
            .find_by_slug(&slug)
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?
            .ok_or_else(|| AppError::TenantNotFound(slug.clone()).to_api_error(&locale, &app_state.i18n_store))?;

        tracing::debug!(tenant_id = %tenant.id, slug = %tenant.slug, "tenant resolvido");

        Ok(TenantContext {
            id: tenant.id,
            slug: tenant.slug,
        })
    }
}
