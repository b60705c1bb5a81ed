// src/models/personnel.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::rotation::RotationTeam;

// Um bombeiro (pompier) de uma caserna
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Personnel {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Sébastien Tremblay")]
    pub full_name: String,
    pub rotation_team: Option<RotationTeam>,
    // Teto individual; sem valor, vale o padrão configurado
    #[schema(example = 42.0)]
    pub max_weekly_hours: Option<Decimal>,
    pub accepts_external_shifts: bool,
    #[schema(example = json!(["pompier 1", "desincarceration"]))]
    pub competences: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPersonnel {
    pub full_name: String,
    pub rotation_team: Option<RotationTeam>,
    pub max_weekly_hours: Option<Decimal>,
    pub accepts_external_shifts: bool,
    pub competences: Vec<String>,
}
