// src/db/shift_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::scheduling::{Assignment, NewAssignment, NewShiftType, ShiftType},
};

#[derive(Clone, Default)]
pub struct ShiftRepository;

impl ShiftRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  TIPOS DE GARDE
    // =========================================================================

    pub async fn list_shift_types<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<ShiftType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let types = sqlx::query_as::<_, ShiftType>(
            r#"
            SELECT id, tenant_id, name, start_time, duration_hours, category, created_at
            FROM shift_types
            WHERE tenant_id = $1
            ORDER BY start_time ASC, name ASC
            "#,
        )
            .bind(tenant_id)
            .fetch_all(executor)
            .await?;

        Ok(types)
    }

    pub async fn insert_shift_type<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        new: &NewShiftType,
    ) -> Result<ShiftType, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shift = sqlx::query_as::<_, ShiftType>(
            r#"
            INSERT INTO shift_types (tenant_id, name, start_time, duration_hours, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, tenant_id, name, start_time, duration_hours, category, created_at
            "#,
        )
            .bind(tenant_id)
            .bind(&new.name)
            .bind(new.start_time)
            .bind(new.duration_hours)
            .bind(new.category)
            .fetch_one(executor)
            .await?;

        Ok(shift)
    }

    // =========================================================================
    //  ASSIGNAÇÕES
    // =========================================================================

    /// Assignações do tenant com data em `[start, end]`, de todos ou de um só bombeiro.
    pub async fn list_assignments<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        personnel_id: Option<Uuid>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Assignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT id, tenant_id, personnel_id, shift_type_id, date, origin, created_at
            FROM assignments
            WHERE tenant_id = $1
              AND ($2::uuid IS NULL OR personnel_id = $2)
              AND date BETWEEN $3 AND $4
            ORDER BY date ASC, created_at ASC
            "#,
        )
            .bind(tenant_id)
            .bind(personnel_id)
            .bind(start)
            .bind(end)
            .fetch_all(executor)
            .await?;

        Ok(assignments)
    }

    pub async fn insert_assignment<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        new: &NewAssignment,
    ) -> Result<Assignment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (tenant_id, personnel_id, shift_type_id, date, origin)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, tenant_id, personnel_id, shift_type_id, date, origin, created_at
            "#,
        )
            .bind(tenant_id)
            .bind(new.personnel_id)
            .bind(new.shift_type_id)
            .bind(new.date)
            .bind(new.origin)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                // Bombeiro ou tipo de garde inexistente
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::UnknownReference;
                    }
                }
                e.into()
            })
    }

    pub async fn delete_assignments<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        ids: &[Uuid],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM assignments WHERE tenant_id = $1 AND id = ANY($2)")
            .bind(tenant_id)
            .bind(ids)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
