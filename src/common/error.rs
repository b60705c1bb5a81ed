use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    scheduling::SchedulingError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Caserna não encontrada: {0}")]
    TenantNotFound(String),

    #[error("Caserna ausente no caminho")]
    TenantMissing,

    #[error("Bombeiro não encontrado: {0}")]
    PersonnelNotFound(Uuid),

    #[error("Tipo de garde não encontrado: {0}")]
    ShiftTypeNotFound(Uuid),

    #[error("Rotação não configurada")]
    RotationNotConfigured,

    #[error("Tipo de garde padrão não configurado")]
    DefaultShiftTypeMissing,

    #[error("Bombeiro sem equipe de rotação: {0}")]
    NoRotationTeam(Uuid),

    #[error("Referência inexistente no documento")]
    UnknownReference,

    #[error("Erro de escala: {0}")]
    Scheduling(#[from] SchedulingError),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

// O erro que sai para o cliente, já traduzido.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    /// Converte o erro interno na resposta traduzida para o idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();

        let (status, key, args): (StatusCode, &str, Vec<(&str, String)>) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                return ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: store.translate(lang, "errors.validation", &[]),
                    details: Some(Value::Object(details)),
                };
            }
            AppError::TenantNotFound(slug) => (StatusCode::NOT_FOUND, "errors.tenant_not_found", vec![("slug", slug)]),
            AppError::TenantMissing => (StatusCode::BAD_REQUEST, "errors.tenant_missing", vec![]),
            AppError::PersonnelNotFound(id) => {
                (StatusCode::NOT_FOUND, "errors.personnel_not_found", vec![("id", id.to_string())])
            }
            AppError::ShiftTypeNotFound(id) => {
                (StatusCode::NOT_FOUND, "errors.shift_type_not_found", vec![("id", id.to_string())])
            }
            AppError::RotationNotConfigured => (StatusCode::CONFLICT, "errors.rotation_not_configured", vec![]),
            AppError::DefaultShiftTypeMissing => (StatusCode::CONFLICT, "errors.default_shift_type_missing", vec![]),
            AppError::NoRotationTeam(id) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "errors.no_rotation_team", vec![("id", id.to_string())])
            }
            AppError::UnknownReference => (StatusCode::UNPROCESSABLE_ENTITY, "errors.unknown_reference", vec![]),
            AppError::Scheduling(err) => {
                let (key, args) = scheduling_message(err);
                (StatusCode::BAD_REQUEST, key, args)
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe a genérica.
            ref e => {
                tracing::error!(error = %e, "erro interno do servidor");
                (StatusCode::INTERNAL_SERVER_ERROR, "errors.internal", vec![])
            }
        };

        ApiError {
            status,
            error: store.translate(lang, key, &args),
            details: None,
        }
    }
}

fn scheduling_message(err: SchedulingError) -> (&'static str, Vec<(&'static str, String)>) {
    match err {
        SchedulingError::InvalidPattern(detail) => ("errors.invalid_pattern", vec![("detail", detail)]),
        SchedulingError::InvertedRange { start, end } => (
            "errors.inverted_range",
            vec![("start", start.to_string()), ("end", end.to_string())],
        ),
        SchedulingError::RangeTooLong { days, max } => (
            "errors.range_too_long",
            vec![("days", days.to_string()), ("max", max.to_string())],
        ),
        SchedulingError::DateOutOfBounds(date) => ("errors.date_out_of_bounds", vec![("date", date.to_string())]),
        SchedulingError::InvalidYear(year) => ("errors.invalid_year", vec![("year", year.to_string())]),
        SchedulingError::UnknownTeam(team) => ("errors.unknown_team", vec![("team", team)]),
        SchedulingError::UnknownOrigin(origin) => ("errors.unknown_origin", vec![("origin", origin)]),
        SchedulingError::InvalidDuration(hours) => ("errors.invalid_duration", vec![("hours", hours.to_string())]),
        SchedulingError::InvalidDocument(detail) => ("errors.invalid_document", vec![("detail", detail)]),
    }
}
