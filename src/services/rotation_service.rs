// src/services/rotation_service.rs

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{Acquire, Executor, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PersonnelRepository, RotationRepository},
    models::{
        rotation::{RotationSettings, RotationTeam},
        scheduling::Availability,
    },
    scheduling::{DateRange, RotationCycle, RotationPattern},
};

/// Resultado da regeneração das disponibilidades de um bombeiro.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityGeneration {
    pub personnel_id: Uuid,
    pub team: RotationTeam,
    // Linhas de origem ROTATION apagadas antes da nova geração
    pub replaced: u64,
    pub created: Vec<Availability>,
}

#[derive(Clone)]
pub struct RotationService {
    rotation_repo: RotationRepository,
    personnel_repo: PersonnelRepository,
}

impl RotationService {
    pub fn new(rotation_repo: RotationRepository, personnel_repo: PersonnelRepository) -> Self {
        Self {
            rotation_repo,
            personnel_repo,
        }
    }

    // --- CONFIGURAÇÃO ---

    pub async fn get_settings<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<RotationSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.rotation_repo
            .get_settings(executor, tenant_id)
            .await?
            .ok_or(AppError::RotationNotConfigured)
    }

    /// Valida o padrão antes de gravar: uma configuração inválida nunca chega ao banco.
    pub async fn update_settings<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        cycle_start_date: NaiveDate,
        pattern: &RotationPattern,
        default_shift_type_id: Option<Uuid>,
    ) -> Result<RotationSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cycle_length = i32::try_from(pattern.cycle_length())
            .map_err(|e| AppError::InternalServerError(e.into()))?;
        let working_days: Vec<i32> = pattern
            .working_days()
            .map(|d| d as i32)
            .collect();

        let settings = self
            .rotation_repo
            .upsert_settings(
                executor,
                tenant_id,
                cycle_start_date,
                cycle_length,
                &working_days,
                default_shift_type_id,
            )
            .await?;

        tracing::info!(
            %tenant_id,
            cycle_start = %settings.cycle_start_date,
            cycle_length = settings.cycle_length_days,
            "configuração da rotação atualizada"
        );

        Ok(settings)
    }

    pub async fn cycle_for<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<RotationCycle, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let settings = self.get_settings(executor, tenant_id).await?;
        Ok(settings.cycle()?)
    }

    // --- DISPONIBILIDADES ---

    /// Substitui as disponibilidades de origem rotação do bombeiro no intervalo
    /// pelos dias trabalhados da sua equipe. As declaradas não são tocadas.
    pub async fn generate_availability<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        personnel_id: Uuid,
        range: DateRange,
    ) -> Result<AvailabilityGeneration, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let personnel = self
            .personnel_repo
            .find_by_id(&mut *tx, tenant_id, personnel_id)
            .await?
            .ok_or(AppError::PersonnelNotFound(personnel_id))?;
        let team = personnel
            .rotation_team
            .ok_or(AppError::NoRotationTeam(personnel_id))?;

        let cycle = self.cycle_for(&mut *tx, tenant_id).await?;
        let dates = cycle.working_days(team, range);

        let replaced = self
            .rotation_repo
            .delete_rotation_availability(&mut *tx, tenant_id, personnel_id, range.start(), range.end())
            .await?;
        let created = self
            .rotation_repo
            .insert_rotation_availability(&mut *tx, tenant_id, personnel_id, &dates)
            .await?;

        tx.commit().await?;

        tracing::info!(
            %tenant_id,
            %personnel_id,
            %team,
            replaced,
            created = created.len(),
            "disponibilidades da rotação regeneradas"
        );

        Ok(AvailabilityGeneration {
            personnel_id,
            team,
            replaced,
            created,
        })
    }
}
