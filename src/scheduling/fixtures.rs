// src/scheduling/fixtures.rs
//
// Construtores compartilhados pelos testes do motor de escala.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    personnel::Personnel,
    rotation::RotationTeam,
    scheduling::{Assignment, AssignmentOrigin, DutyCategory, ShiftType},
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn shift_type(name: &str, start_hour: u32, hours: i64, category: DutyCategory) -> ShiftType {
    ShiftType {
        id: Uuid::new_v4(),
        tenant_id: Uuid::nil(),
        name: name.to_string(),
        start_time: NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
        duration_hours: Decimal::from(hours),
        category,
        created_at: Utc::now(),
    }
}

pub fn personnel(team: Option<RotationTeam>, cap: Option<i64>, accepts_external: bool) -> Personnel {
    Personnel {
        id: Uuid::new_v4(),
        tenant_id: Uuid::nil(),
        full_name: "Sébastien Tremblay".to_string(),
        rotation_team: team,
        max_weekly_hours: cap.map(Decimal::from),
        accepts_external_shifts: accepts_external,
        competences: vec![],
        created_at: Utc::now(),
    }
}

/// `created_minute` ordena as assignações pela data de criação.
pub fn assignment(
    personnel_id: Uuid,
    shift: &ShiftType,
    on: NaiveDate,
    origin: AssignmentOrigin,
    created_minute: u32,
) -> Assignment {
    Assignment {
        id: Uuid::new_v4(),
        tenant_id: Uuid::nil(),
        personnel_id,
        shift_type_id: shift.id,
        date: on,
        origin,
        created_at: Utc.with_ymd_and_hms(2024, 12, 1, 8, created_minute, 0).unwrap(),
    }
}
