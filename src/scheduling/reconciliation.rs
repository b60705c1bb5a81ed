// src/scheduling/reconciliation.rs
//
// Reconciliação entre assignações automáticas e manuais do mesmo bombeiro.
// Regras, em ordem de prioridade (manual antes de automática, depois a mais antiga):
//   - duplicata exata (mesmo tipo, mesma data) -> fica uma só;
//   - sobreposição manual x automática -> a automática sai;
//   - sobreposição automática x automática -> a mais nova sai;
//   - sobreposição manual x manual -> conflito, as duas ficam.
// Com `reconcile_in`, só o que está datado no intervalo pode ser removido.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::scheduling::{Assignment, AssignmentOrigin, ShiftType};
use crate::scheduling::rotation::DateRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemovalReason {
    Duplicate,
    SupersededByManual,
    OverlapsOlderAutomatic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemovedAssignment {
    pub assignment_id: Uuid,
    pub personnel_id: Uuid,
    pub date: NaiveDate,
    pub reason: RemovalReason,
    pub kept_assignment_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentConflict {
    pub personnel_id: Uuid,
    pub first_assignment_id: Uuid,
    pub second_assignment_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub examined: usize,
    pub kept: Vec<Uuid>,
    pub removed: Vec<RemovedAssignment>,
    pub conflicts: Vec<AssignmentConflict>,
}

impl ReconciliationReport {
    pub fn removed_ids(&self) -> Vec<Uuid> {
        self.removed.iter().map(|r| r.assignment_id).collect()
    }
}

fn priority(a: &Assignment) -> (u8, chrono::DateTime<chrono::Utc>, Uuid) {
    let origin_rank = match a.origin {
        AssignmentOrigin::Manual => 0,
        AssignmentOrigin::Automatic => 1,
    };
    (origin_rank, a.created_at, a.id)
}

/// Reconcilia todas as assignações recebidas.
pub fn reconcile(assignments: &[Assignment], shift_types: &HashMap<Uuid, ShiftType>) -> ReconciliationReport {
    reconcile_scoped(assignments, shift_types, |_| true)
}

/// Só as assignações datadas dentro de `range` podem sair. As vizinhas servem
/// de contexto (turnos que cruzam a meia-noite) e nunca são removidas.
pub fn reconcile_in(
    range: DateRange,
    assignments: &[Assignment],
    shift_types: &HashMap<Uuid, ShiftType>,
) -> ReconciliationReport {
    reconcile_scoped(assignments, shift_types, |date| range.contains(date))
}

fn reconcile_scoped(
    assignments: &[Assignment],
    shift_types: &HashMap<Uuid, ShiftType>,
    in_scope: impl Fn(NaiveDate) -> bool,
) -> ReconciliationReport {
    let mut by_personnel: BTreeMap<Uuid, Vec<&Assignment>> = BTreeMap::new();
    for assignment in assignments {
        by_personnel.entry(assignment.personnel_id).or_default().push(assignment);
    }

    let mut report = ReconciliationReport {
        examined: assignments.iter().filter(|a| in_scope(a.date)).count(),
        ..Default::default()
    };

    for (personnel_id, mut group) in by_personnel {
        group.sort_by_key(|a| priority(a));

        let mut kept: Vec<&Assignment> = Vec::with_capacity(group.len());
        for candidate in group {
            let removable = in_scope(candidate.date);

            if let Some(twin) = kept
                .iter()
                .find(|k| k.shift_type_id == candidate.shift_type_id && k.date == candidate.date)
            {
                // Duplicata fora do intervalo: fica para a reconciliação do seu próprio período
                if removable {
                    report.removed.push(RemovedAssignment {
                        assignment_id: candidate.id,
                        personnel_id,
                        date: candidate.date,
                        reason: RemovalReason::Duplicate,
                        kept_assignment_id: twin.id,
                    });
                }
                continue;
            }

            let Some(window) = shift_types.get(&candidate.shift_type_id).map(|s| s.window_on(candidate.date))
            else {
                tracing::warn!(
                    assignment_id = %candidate.id,
                    shift_type_id = %candidate.shift_type_id,
                    "unknown shift type, only duplicate detection applied"
                );
                kept.push(candidate);
                continue;
            };

            // Em ordem de prioridade: o primeiro é o vencedor
            let overlapping: Vec<&Assignment> = kept
                .iter()
                .copied()
                .filter(|k| {
                    shift_types
                        .get(&k.shift_type_id)
                        .is_some_and(|s| s.window_on(k.date).overlaps(&window))
                })
                .collect();

            match (overlapping.first(), candidate.origin) {
                (None, _) => kept.push(candidate),
                (Some(winner), AssignmentOrigin::Automatic) => {
                    if removable {
                        let reason = match winner.origin {
                            AssignmentOrigin::Manual => RemovalReason::SupersededByManual,
                            AssignmentOrigin::Automatic => RemovalReason::OverlapsOlderAutomatic,
                        };
                        report.removed.push(RemovedAssignment {
                            assignment_id: candidate.id,
                            personnel_id,
                            date: candidate.date,
                            reason,
                            kept_assignment_id: winner.id,
                        });
                    }
                }
                // Manuais são processadas primeiro, logo todas as sobrepostas também são manuais.
                (Some(_), AssignmentOrigin::Manual) => {
                    for other in &overlapping {
                        if removable || in_scope(other.date) {
                            report.conflicts.push(AssignmentConflict {
                                personnel_id,
                                first_assignment_id: other.id,
                                second_assignment_id: candidate.id,
                                date: candidate.date,
                            });
                        }
                    }
                    kept.push(candidate);
                }
            }
        }

        report.kept.extend(kept.iter().filter(|k| in_scope(k.date)).map(|k| k.id));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scheduling::DutyCategory;
    use crate::scheduling::fixtures::{assignment, date, shift_type};

    fn types(shifts: &[&ShiftType]) -> HashMap<Uuid, ShiftType> {
        shifts.iter().map(|s| (s.id, (*s).clone())).collect()
    }

    #[test]
    fn manual_duplicate_wins_over_automatic() {
        let day = shift_type("jour", 7, 10, DutyCategory::Internal);
        let person = Uuid::new_v4();
        let auto = assignment(person, &day, date(2025, 1, 6), AssignmentOrigin::Automatic, 0);
        let manual = assignment(person, &day, date(2025, 1, 6), AssignmentOrigin::Manual, 5);

        let report = reconcile(&[auto.clone(), manual.clone()], &types(&[&day]));

        assert_eq!(report.examined, 2);
        assert_eq!(report.kept, vec![manual.id]);
        assert_eq!(report.removed.len(), 1);
        assert_eq!(report.removed[0].assignment_id, auto.id);
        assert_eq!(report.removed[0].reason, RemovalReason::Duplicate);
        assert_eq!(report.removed[0].kept_assignment_id, manual.id);
        assert!(report.conflicts.is_empty());
    }

    #[test]
    fn overlapping_automatic_is_superseded_by_manual() {
        let day = shift_type("jour", 7, 10, DutyCategory::Internal);
        let long_day = shift_type("jour long", 8, 12, DutyCategory::Internal);
        let person = Uuid::new_v4();
        let manual = assignment(person, &long_day, date(2025, 1, 6), AssignmentOrigin::Manual, 9);
        let auto = assignment(person, &day, date(2025, 1, 6), AssignmentOrigin::Automatic, 1);

        let report = reconcile(&[auto.clone(), manual.clone()], &types(&[&day, &long_day]));

        assert_eq!(report.kept, vec![manual.id]);
        assert_eq!(report.removed_ids(), vec![auto.id]);
        assert_eq!(report.removed[0].reason, RemovalReason::SupersededByManual);
    }

    #[test]
    fn newer_overlapping_automatic_is_dropped() {
        let night = shift_type("nuit", 17, 14, DutyCategory::Internal);
        let morning = shift_type("matin", 6, 8, DutyCategory::Internal);
        let person = Uuid::new_v4();
        let older = assignment(person, &night, date(2025, 1, 6), AssignmentOrigin::Automatic, 0);
        let newer = assignment(person, &morning, date(2025, 1, 7), AssignmentOrigin::Automatic, 3);

        let report = reconcile(&[newer.clone(), older.clone()], &types(&[&night, &morning]));

        assert_eq!(report.kept, vec![older.id]);
        assert_eq!(report.removed[0].assignment_id, newer.id);
        assert_eq!(report.removed[0].reason, RemovalReason::OverlapsOlderAutomatic);
    }

    #[test]
    fn two_manual_overlaps_are_reported_not_removed() {
        let day = shift_type("jour", 7, 10, DutyCategory::Internal);
        let evening = shift_type("soir", 12, 8, DutyCategory::Internal);
        let person = Uuid::new_v4();
        let first = assignment(person, &day, date(2025, 1, 6), AssignmentOrigin::Manual, 0);
        let second = assignment(person, &evening, date(2025, 1, 6), AssignmentOrigin::Manual, 1);

        let report = reconcile(&[second.clone(), first.clone()], &types(&[&day, &evening]));

        assert!(report.removed.is_empty());
        assert_eq!(report.kept, vec![first.id, second.id]);
        assert_eq!(
            report.conflicts,
            vec![AssignmentConflict {
                personnel_id: person,
                first_assignment_id: first.id,
                second_assignment_id: second.id,
                date: date(2025, 1, 6),
            }]
        );
    }

    #[test]
    fn tied_manual_duplicates_keep_the_smaller_id() {
        let day = shift_type("jour", 7, 10, DutyCategory::Internal);
        let person = Uuid::new_v4();
        let mut a = assignment(person, &day, date(2025, 1, 6), AssignmentOrigin::Manual, 4);
        let mut b = assignment(person, &day, date(2025, 1, 6), AssignmentOrigin::Manual, 4);
        a.id = Uuid::from_u128(1);
        b.id = Uuid::from_u128(2);

        let report = reconcile(&[b.clone(), a.clone()], &types(&[&day]));

        assert_eq!(report.kept, vec![a.id]);
        assert_eq!(report.removed.len(), 1);
        assert_eq!(report.removed[0].assignment_id, b.id);
        assert_eq!(report.removed[0].reason, RemovalReason::Duplicate);
        assert!(report.conflicts.is_empty());
    }

    #[test]
    fn manual_overlapping_two_manuals_reports_both_conflicts() {
        let night = shift_type("nuit", 17, 14, DutyCategory::Internal);
        let morning = shift_type("matin", 6, 4, DutyCategory::Internal);
        let long_day = shift_type("jour long", 5, 20, DutyCategory::Internal);
        let person = Uuid::new_v4();
        let previous_night = assignment(person, &night, date(2025, 1, 5), AssignmentOrigin::Manual, 0);
        let early = assignment(person, &morning, date(2025, 1, 6), AssignmentOrigin::Manual, 1);
        let late = assignment(person, &long_day, date(2025, 1, 6), AssignmentOrigin::Manual, 2);

        // A noite de 5/1 termina às 7h de 6/1 e cruza as duas manuais do dia 6
        let report = reconcile(
            &[late.clone(), early.clone(), previous_night.clone()],
            &types(&[&night, &morning, &long_day]),
        );

        assert!(report.removed.is_empty());
        let pairs: Vec<(Uuid, Uuid)> = report
            .conflicts
            .iter()
            .map(|c| (c.first_assignment_id, c.second_assignment_id))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (previous_night.id, early.id),
                (previous_night.id, late.id),
                (early.id, late.id),
            ]
        );
    }

    #[test]
    fn rows_outside_the_range_are_context_only() {
        let day = shift_type("jour", 7, 10, DutyCategory::Internal);
        let night = shift_type("nuit", 17, 14, DutyCategory::Internal);
        let morning = shift_type("matin", 6, 8, DutyCategory::Internal);
        let person = Uuid::new_v4();
        // Duplicatas inteiramente na véspera: fora do intervalo, ficam intactas
        let before_a = assignment(person, &day, date(2025, 1, 9), AssignmentOrigin::Automatic, 0);
        let before_b = assignment(person, &day, date(2025, 1, 9), AssignmentOrigin::Automatic, 1);
        // A noite do último dia invade uma manual do dia seguinte
        let last_night = assignment(person, &night, date(2025, 1, 20), AssignmentOrigin::Automatic, 2);
        let next_morning = assignment(person, &morning, date(2025, 1, 21), AssignmentOrigin::Manual, 3);

        let range = DateRange::new(date(2025, 1, 10), date(2025, 1, 20)).unwrap();
        let report = reconcile_in(
            range,
            &[before_a, before_b, last_night.clone(), next_morning.clone()],
            &types(&[&day, &night, &morning]),
        );

        assert_eq!(report.examined, 1);
        assert!(report.kept.is_empty());
        assert_eq!(
            report.removed,
            vec![RemovedAssignment {
                assignment_id: last_night.id,
                personnel_id: person,
                date: date(2025, 1, 20),
                reason: RemovalReason::SupersededByManual,
                kept_assignment_id: next_morning.id,
            }]
        );
    }

    #[test]
    fn different_people_never_conflict() {
        let day = shift_type("jour", 7, 10, DutyCategory::Internal);
        let a = assignment(Uuid::new_v4(), &day, date(2025, 1, 6), AssignmentOrigin::Automatic, 0);
        let b = assignment(Uuid::new_v4(), &day, date(2025, 1, 6), AssignmentOrigin::Automatic, 0);

        let report = reconcile(&[a, b], &types(&[&day]));
        assert_eq!(report.kept.len(), 2);
        assert!(report.removed.is_empty());
    }

    #[test]
    fn unknown_shift_type_still_deduplicates() {
        let ghost = shift_type("fantome", 7, 10, DutyCategory::Internal);
        let person = Uuid::new_v4();
        let a = assignment(person, &ghost, date(2025, 1, 6), AssignmentOrigin::Automatic, 0);
        let b = assignment(person, &ghost, date(2025, 1, 6), AssignmentOrigin::Automatic, 1);

        let report = reconcile(&[a.clone(), b.clone()], &HashMap::new());
        assert_eq!(report.kept, vec![a.id]);
        assert_eq!(report.removed_ids(), vec![b.id]);
    }
}
