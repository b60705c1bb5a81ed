// src/scheduling/planner.rs
//
// Geração das assignações automáticas a partir da rotação: cada bombeiro com
// equipe recebe o tipo de garde padrão nos dias trabalhados da sua equipe.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    personnel::Personnel,
    scheduling::{Assignment, AssignmentOrigin, NewAssignment, ShiftType},
};
use crate::scheduling::{
    rotation::{DateRange, RotationCycle},
    weekly_hours::{HoursPolicy, Violation},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    AlreadyAssigned,
    ExternalShiftsRefused,
    WeeklyCapExceeded,
    OverlappingAssignment,
}

impl From<&Violation> for SkipReason {
    fn from(violation: &Violation) -> Self {
        match violation {
            Violation::ExternalShiftsRefused => SkipReason::ExternalShiftsRefused,
            Violation::WeeklyCapExceeded { .. } => SkipReason::WeeklyCapExceeded,
            Violation::OverlappingAssignment { .. } => SkipReason::OverlappingAssignment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlannedAssignment {
    pub personnel_id: Uuid,
    pub shift_type_id: Uuid,
    pub date: NaiveDate,
}

impl From<&PlannedAssignment> for NewAssignment {
    fn from(planned: &PlannedAssignment) -> Self {
        NewAssignment {
            personnel_id: planned.personnel_id,
            shift_type_id: planned.shift_type_id,
            date: planned.date,
            origin: AssignmentOrigin::Automatic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDay {
    pub personnel_id: Uuid,
    pub date: NaiveDate,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationPlan {
    pub planned: Vec<PlannedAssignment>,
    pub skipped: Vec<SkippedDay>,
}

pub struct RotationPlanner<'a> {
    cycle: &'a RotationCycle,
    policy: HoursPolicy,
}

impl<'a> RotationPlanner<'a> {
    pub fn new(cycle: &'a RotationCycle, policy: HoursPolicy) -> Self {
        Self { cycle, policy }
    }

    /// `existing` deve cobrir as semanas inteiras do intervalo para o teto semanal
    /// ser avaliado corretamente.
    pub fn plan(
        &self,
        personnel: &[Personnel],
        shift: &ShiftType,
        range: DateRange,
        existing: &[Assignment],
        shift_types: &HashMap<Uuid, ShiftType>,
    ) -> GenerationPlan {
        let mut known = shift_types.clone();
        known.insert(shift.id, shift.clone());

        let mut plan = GenerationPlan::default();

        for person in personnel {
            let Some(team) = person.rotation_team else {
                continue;
            };

            let mut held: Vec<Assignment> = existing
                .iter()
                .filter(|a| a.personnel_id == person.id)
                .cloned()
                .collect();

            for day in self.cycle.working_days(team, range) {
                if held.iter().any(|a| a.shift_type_id == shift.id && a.date == day) {
                    plan.skipped.push(SkippedDay {
                        personnel_id: person.id,
                        date: day,
                        reason: SkipReason::AlreadyAssigned,
                    });
                    continue;
                }

                if let Err(violation) = self.policy.check_assignment(person, shift, day, &held, &known) {
                    plan.skipped.push(SkippedDay {
                        personnel_id: person.id,
                        date: day,
                        reason: SkipReason::from(&violation),
                    });
                    continue;
                }

                // Entra no conjunto para que o teto acumule ao longo da semana.
                held.push(Assignment {
                    id: Uuid::new_v4(),
                    tenant_id: shift.tenant_id,
                    personnel_id: person.id,
                    shift_type_id: shift.id,
                    date: day,
                    origin: AssignmentOrigin::Automatic,
                    created_at: Utc::now(),
                });
                plan.planned.push(PlannedAssignment {
                    personnel_id: person.id,
                    shift_type_id: shift.id,
                    date: day,
                });
            }
        }

        plan
    }
}
