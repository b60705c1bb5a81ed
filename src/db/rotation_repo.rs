// src/db/rotation_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{rotation::RotationSettings, scheduling::Availability},
};

#[derive(Clone, Default)]
pub struct RotationRepository;

impl RotationRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  CONFIGURAÇÃO DA ROTAÇÃO
    // =========================================================================

    pub async fn get_settings<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Option<RotationSettings>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let settings = sqlx::query_as::<_, RotationSettings>(
            r#"
            SELECT tenant_id, cycle_start_date, cycle_length_days, working_days,
                   default_shift_type_id, updated_at
            FROM rotation_settings
            WHERE tenant_id = $1
            "#,
        )
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;

        Ok(settings)
    }

    /// Uma linha por tenant: cria ou substitui.
    pub async fn upsert_settings<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        cycle_start_date: NaiveDate,
        cycle_length_days: i32,
        working_days: &[i32],
        default_shift_type_id: Option<Uuid>,
    ) -> Result<RotationSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, RotationSettings>(
            r#"
            INSERT INTO rotation_settings (
                tenant_id, cycle_start_date, cycle_length_days, working_days, default_shift_type_id
            )
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (tenant_id) DO UPDATE SET
                cycle_start_date = EXCLUDED.cycle_start_date,
                cycle_length_days = EXCLUDED.cycle_length_days,
                working_days = EXCLUDED.working_days,
                default_shift_type_id = EXCLUDED.default_shift_type_id,
                updated_at = NOW()
            RETURNING tenant_id, cycle_start_date, cycle_length_days, working_days,
                      default_shift_type_id, updated_at
            "#,
        )
            .bind(tenant_id)
            .bind(cycle_start_date)
            .bind(cycle_length_days)
            .bind(working_days)
            .bind(default_shift_type_id)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                // default_shift_type_id de outro tenant ou inexistente
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::UnknownReference;
                    }
                }
                e.into()
            })
    }

    // =========================================================================
    //  DISPONIBILIDADES GERADAS PELA ROTAÇÃO
    // =========================================================================

    /// Apaga só as linhas de origem `ROTATION`; as declaradas ficam.
    pub async fn delete_rotation_availability<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        personnel_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            DELETE FROM availabilities
            WHERE tenant_id = $1
              AND personnel_id = $2
              AND source = 'ROTATION'
              AND date BETWEEN $3 AND $4
            "#,
        )
            .bind(tenant_id)
            .bind(personnel_id)
            .bind(start)
            .bind(end)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn insert_rotation_availability<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        personnel_id: Uuid,
        dates: &[NaiveDate],
    ) -> Result<Vec<Availability>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if dates.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, Availability>(
            r#"
            INSERT INTO availabilities (tenant_id, personnel_id, date, source)
            SELECT $1, $2, d, 'ROTATION'
            FROM UNNEST($3::date[]) AS d
            ON CONFLICT (personnel_id, date, source) DO NOTHING
            RETURNING id, tenant_id, personnel_id, date, source, created_at
            "#,
        )
            .bind(tenant_id)
            .bind(personnel_id)
            .bind(dates)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }
}
