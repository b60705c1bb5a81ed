// src/services/scheduling_service.rs

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{Acquire, Executor, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PersonnelRepository, RotationRepository, ShiftRepository},
    models::{
        rotation::RotationSettings,
        scheduling::{NewAssignment, ShiftType},
    },
    scheduling::{
        reconcile_in, weekly_hours::weeks_covering, DateRange, GenerationPlan, HoursPolicy,
        ReconciliationReport, RotationPlanner, Violation, WeeklyHours,
    },
};

// --- Respostas ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentCheck {
    pub allowed: bool,
    pub violation: Option<Violation>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyHoursReport {
    pub personnel_id: Uuid,
    pub cap: Decimal,
    pub weeks: Vec<WeeklyHours>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub dry_run: bool,
    pub shift_type_id: Uuid,
    pub created: usize,
    pub plan: GenerationPlan,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationOutcome {
    pub dry_run: bool,
    pub deleted: u64,
    pub report: ReconciliationReport,
}

/// A geração automática precisa de um tipo de garde padrão configurado.
fn default_shift_type(settings: &RotationSettings) -> Result<Uuid, AppError> {
    settings
        .default_shift_type_id
        .ok_or(AppError::DefaultShiftTypeMissing)
}

#[derive(Clone)]
pub struct SchedulingService {
    personnel_repo: PersonnelRepository,
    shift_repo: ShiftRepository,
    rotation_repo: RotationRepository,
    policy: HoursPolicy,
}

impl SchedulingService {
    pub fn new(
        personnel_repo: PersonnelRepository,
        shift_repo: ShiftRepository,
        rotation_repo: RotationRepository,
        policy: HoursPolicy,
    ) -> Self {
        Self {
            personnel_repo,
            shift_repo,
            rotation_repo,
            policy,
        }
    }

    async fn shift_type_map<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<HashMap<Uuid, ShiftType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let types = self.shift_repo.list_shift_types(executor, tenant_id).await?;
        Ok(types.into_iter().map(|t| (t.id, t)).collect())
    }

    // =========================================================================
    //  VERIFICAÇÃO DE UMA ASSIGNAÇÃO
    // =========================================================================

    /// Diz se a garde pode ser atribuída, sem gravar nada.
    pub async fn check_assignment<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        personnel_id: Uuid,
        shift_type_id: Uuid,
        date: NaiveDate,
    ) -> Result<AssignmentCheck, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let personnel = self
            .personnel_repo
            .find_by_id(&mut *tx, tenant_id, personnel_id)
            .await?
            .ok_or(AppError::PersonnelNotFound(personnel_id))?;
        let shift_types = self.shift_type_map(&mut *tx, tenant_id).await?;
        let shift = shift_types
            .get(&shift_type_id)
            .ok_or(AppError::ShiftTypeNotFound(shift_type_id))?;

        // A semana inteira para o teto, mais os vizinhos para turnos que cruzam a meia-noite
        let window = weeks_covering(DateRange::new(date, date)?)
            .extended_back(1)
            .extended_forward(1);
        let existing = self
            .shift_repo
            .list_assignments(&mut *tx, tenant_id, Some(personnel_id), window.start(), window.end())
            .await?;

        tx.commit().await?;

        let violation = self
            .policy
            .check_assignment(&personnel, shift, date, &existing, &shift_types)
            .err();

        Ok(AssignmentCheck {
            allowed: violation.is_none(),
            violation,
        })
    }

    // =========================================================================
    //  HORAS SEMANAIS
    // =========================================================================

    pub async fn weekly_hours<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        personnel_id: Uuid,
        range: DateRange,
    ) -> Result<WeeklyHoursReport, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let personnel = self
            .personnel_repo
            .find_by_id(&mut *tx, tenant_id, personnel_id)
            .await?
            .ok_or(AppError::PersonnelNotFound(personnel_id))?;
        let shift_types = self.shift_type_map(&mut *tx, tenant_id).await?;

        let weeks = weeks_covering(range);
        let assignments = self
            .shift_repo
            .list_assignments(&mut *tx, tenant_id, Some(personnel_id), weeks.start(), weeks.end())
            .await?;

        tx.commit().await?;

        Ok(WeeklyHoursReport {
            personnel_id,
            cap: self.policy.cap_for(&personnel),
            weeks: self.policy.summarize(&personnel, &assignments, &shift_types, range),
        })
    }

    // =========================================================================
    //  GERAÇÃO AUTOMÁTICA
    // =========================================================================

    /// Propõe o tipo de garde padrão nos dias trabalhados de cada equipe e grava
    /// o plano numa única transação. Com `dry_run` nada é gravado.
    pub async fn generate_assignments<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        range: DateRange,
        dry_run: bool,
    ) -> Result<GenerationOutcome, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let settings = self
            .rotation_repo
            .get_settings(&mut *tx, tenant_id)
            .await?
            .ok_or(AppError::RotationNotConfigured)?;
        let shift_type_id = default_shift_type(&settings)?;
        let cycle = settings.cycle()?;

        let shift_types = self.shift_type_map(&mut *tx, tenant_id).await?;
        let shift = shift_types
            .get(&shift_type_id)
            .ok_or(AppError::ShiftTypeNotFound(shift_type_id))?;

        let personnel = self.personnel_repo.list_on_rotation(&mut *tx, tenant_id).await?;

        let window = weeks_covering(range).extended_back(1).extended_forward(1);
        let existing = self
            .shift_repo
            .list_assignments(&mut *tx, tenant_id, None, window.start(), window.end())
            .await?;

        let plan = RotationPlanner::new(&cycle, self.policy).plan(&personnel, shift, range, &existing, &shift_types);

        if dry_run {
            tx.rollback().await?;
            return Ok(GenerationOutcome {
                dry_run,
                shift_type_id,
                created: 0,
                plan,
            });
        }

        for planned in &plan.planned {
            self.shift_repo
                .insert_assignment(&mut *tx, tenant_id, &NewAssignment::from(planned))
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            %tenant_id,
            start = %range.start(),
            end = %range.end(),
            created = plan.planned.len(),
            skipped = plan.skipped.len(),
            "assignações automáticas geradas"
        );

        Ok(GenerationOutcome {
            dry_run,
            shift_type_id,
            created: plan.planned.len(),
            plan,
        })
    }

    // =========================================================================
    //  RECONCILIAÇÃO
    // =========================================================================

    /// Carrega um dia a mais de cada lado para ver os turnos que cruzam a
    /// meia-noite, mas só apaga assignações datadas dentro de `range`.
    pub async fn reconcile<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        range: DateRange,
        dry_run: bool,
    ) -> Result<ReconciliationOutcome, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let shift_types = self.shift_type_map(&mut *tx, tenant_id).await?;
        let loaded = range.extended_back(1).extended_forward(1);
        let assignments = self
            .shift_repo
            .list_assignments(&mut *tx, tenant_id, None, loaded.start(), loaded.end())
            .await?;

        let report = reconcile_in(range, &assignments, &shift_types);

        for conflict in &report.conflicts {
            tracing::warn!(
                %tenant_id,
                personnel_id = %conflict.personnel_id,
                first = %conflict.first_assignment_id,
                second = %conflict.second_assignment_id,
                date = %conflict.date,
                "duas assignações manuais sobrepostas, mantidas"
            );
        }

        if dry_run {
            tx.rollback().await?;
            return Ok(ReconciliationOutcome {
                dry_run,
                deleted: 0,
                report,
            });
        }

        let deleted = self
            .shift_repo
            .delete_assignments(&mut *tx, tenant_id, &report.removed_ids())
            .await?;

        tx.commit().await?;

        tracing::info!(
            %tenant_id,
            examined = report.examined,
            deleted,
            conflicts = report.conflicts.len(),
            "reconciliação aplicada"
        );

        Ok(ReconciliationOutcome {
            dry_run,
            deleted,
            report,
        })
    }
}
