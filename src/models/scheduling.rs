// src/models/scheduling.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

/// Garde interna (na caserna) ou externa (disponível em casa).
/// Só as horas internas contam para o teto semanal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "duty_category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutyCategory {
    Internal,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "assignment_origin", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentOrigin {
    Automatic,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "availability_source", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilitySource {
    Rotation,
    Declared,
}

// --- Tipos de Garde ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiftType {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Garde de jour")]
    pub name: String,
    #[schema(value_type = String, example = "07:00:00")]
    pub start_time: NaiveTime,
    #[schema(example = 10.0)]
    pub duration_hours: Decimal,
    pub category: DutyCategory,
    pub created_at: DateTime<Utc>,
}

/// Janela `[start, end)` de um turno concreto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ShiftWindow {
    pub fn overlaps(&self, other: &ShiftWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl ShiftType {
    pub fn duration_minutes(&self) -> i64 {
        (self.duration_hours * Decimal::from(60))
            .round()
            .to_i64()
            .unwrap_or(0)
    }

    /// Turnos noturnos atravessam a meia-noite e invadem o dia seguinte.
    pub fn window_on(&self, date: NaiveDate) -> ShiftWindow {
        let start = date.and_time(self.start_time);
        ShiftWindow {
            start,
            end: start + TimeDelta::minutes(self.duration_minutes()),
        }
    }

    pub fn is_internal(&self) -> bool {
        self.category == DutyCategory::Internal
    }
}

#[derive(Debug, Clone)]
pub struct NewShiftType {
    pub name: String,
    pub start_time: NaiveTime,
    pub duration_hours: Decimal,
    pub category: DutyCategory,
}

// --- Assignações ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub personnel_id: Uuid,
    pub shift_type_id: Uuid,
    #[schema(example = "2025-01-20")]
    pub date: NaiveDate,
    pub origin: AssignmentOrigin,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub personnel_id: Uuid,
    pub shift_type_id: Uuid,
    pub date: NaiveDate,
    pub origin: AssignmentOrigin,
}

// --- Disponibilidades ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub personnel_id: Uuid,
    pub date: NaiveDate,
    pub source: AvailabilitySource,
    pub created_at: DateTime<Utc>,
}
