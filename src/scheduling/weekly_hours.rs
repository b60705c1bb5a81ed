// src/scheduling/weekly_hours.rs

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    personnel::Personnel,
    scheduling::{Assignment, DutyCategory, ShiftType},
};
use crate::scheduling::rotation::DateRange;

/// Segunda-feira da semana ISO que contém `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
        .unwrap_or(date)
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyHours {
    pub week_start: NaiveDate,
    pub internal_hours: Decimal,
    pub external_hours: Decimal,
    pub cap: Decimal,
    pub remaining: Decimal,
    pub exceeded: bool,
}

/// Motivo pelo qual uma garde não pode ser atribuída.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Violation {
    #[error("personnel does not accept external shifts")]
    ExternalShiftsRefused,

    #[error("weekly cap of {cap} hours exceeded for week of {week_start} ({would_be} hours)")]
    #[serde(rename_all = "camelCase")]
    WeeklyCapExceeded {
        week_start: NaiveDate,
        cap: Decimal,
        would_be: Decimal,
    },

    #[error("overlaps assignment {existing_assignment_id}")]
    #[serde(rename_all = "camelCase")]
    OverlappingAssignment { existing_assignment_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoursPolicy {
    default_cap: Decimal,
}

impl HoursPolicy {
    pub fn new(default_cap: Decimal) -> Self {
        Self { default_cap }
    }

    pub fn default_cap(&self) -> Decimal {
        self.default_cap
    }

    pub fn cap_for(&self, personnel: &Personnel) -> Decimal {
        personnel.max_weekly_hours.unwrap_or(self.default_cap)
    }

    /// Um resumo por semana tocada pelo intervalo, inclusive semanas vazias.
    /// As assignações devem cobrir as semanas inteiras (ver `weeks_covering`).
    pub fn summarize(
        &self,
        personnel: &Personnel,
        assignments: &[Assignment],
        shift_types: &HashMap<Uuid, ShiftType>,
        range: DateRange,
    ) -> Vec<WeeklyHours> {
        let cap = self.cap_for(personnel);

        let mut totals: HashMap<NaiveDate, (Decimal, Decimal)> = HashMap::new();
        for assignment in assignments.iter().filter(|a| a.personnel_id == personnel.id) {
            let Some(shift) = shift_types.get(&assignment.shift_type_id) else {
                tracing::warn!(
                    assignment_id = %assignment.id,
                    shift_type_id = %assignment.shift_type_id,
                    "assignment references unknown shift type, ignored in hour totals"
                );
                continue;
            };
            let entry = totals.entry(week_start(assignment.date)).or_default();
            match shift.category {
                DutyCategory::Internal => entry.0 += shift.duration_hours,
                DutyCategory::External => entry.1 += shift.duration_hours,
            }
        }

        let mut weeks = Vec::new();
        let mut current = week_start(range.start());
        while current <= range.end() {
            let (internal_hours, external_hours) = totals.get(&current).copied().unwrap_or_default();
            weeks.push(WeeklyHours {
                week_start: current,
                internal_hours,
                external_hours,
                cap,
                remaining: (cap - internal_hours).max(Decimal::ZERO),
                exceeded: internal_hours > cap,
            });
            let Some(next) = current.checked_add_days(Days::new(7)) else {
                break;
            };
            current = next;
        }
        weeks
    }

    /// Verifica se `shift` em `date` pode ser atribuída a `personnel`
    /// dado o que ele já tem em `existing`.
    pub fn check_assignment(
        &self,
        personnel: &Personnel,
        shift: &ShiftType,
        date: NaiveDate,
        existing: &[Assignment],
        shift_types: &HashMap<Uuid, ShiftType>,
    ) -> Result<(), Violation> {
        if shift.category == DutyCategory::External && !personnel.accepts_external_shifts {
            return Err(Violation::ExternalShiftsRefused);
        }

        let candidate = shift.window_on(date);
        let week = week_start(date);
        let mut internal_hours = Decimal::ZERO;

        for assignment in existing.iter().filter(|a| a.personnel_id == personnel.id) {
            let Some(other) = shift_types.get(&assignment.shift_type_id) else {
                continue;
            };
            if other.window_on(assignment.date).overlaps(&candidate) {
                return Err(Violation::OverlappingAssignment {
                    existing_assignment_id: assignment.id,
                });
            }
            if other.is_internal() && week_start(assignment.date) == week {
                internal_hours += other.duration_hours;
            }
        }

        if shift.is_internal() {
            let cap = self.cap_for(personnel);
            let would_be = internal_hours + shift.duration_hours;
            if would_be > cap {
                return Err(Violation::WeeklyCapExceeded {
                    week_start: week,
                    cap,
                    would_be,
                });
            }
        }

        Ok(())
    }
}

/// Intervalo alargado para semanas completas (segunda a domingo).
pub fn weeks_covering(range: DateRange) -> DateRange {
    let start = week_start(range.start());
    let end = week_start(range.end())
        .checked_add_days(Days::new(6))
        .unwrap_or(range.end());
    // Nas bordas do calendário suportado fica o intervalo original
    DateRange::new(start, end).unwrap_or(range)
}
