// src/db/personnel_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::personnel::{NewPersonnel, Personnel},
};

const PERSONNEL_COLUMNS: &str = r#"
    id, tenant_id, full_name,
    rotation_team, max_weekly_hours, accepts_external_shifts,
    competences, created_at
"#;

// Sem pool própria: toda consulta roda na conexão RLS do tenant.
#[derive(Clone, Default)]
pub struct PersonnelRepository;

impl PersonnelRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        personnel_id: Uuid,
    ) -> Result<Option<Personnel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!("SELECT {PERSONNEL_COLUMNS} FROM personnel WHERE tenant_id = $1 AND id = $2");
        let personnel = sqlx::query_as::<_, Personnel>(&query)
            .bind(tenant_id)
            .bind(personnel_id)
            .fetch_optional(executor)
            .await?;

        Ok(personnel)
    }

    /// Só quem está numa equipe participa da geração automática.
    pub async fn list_on_rotation<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<Personnel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "SELECT {PERSONNEL_COLUMNS} FROM personnel \
             WHERE tenant_id = $1 AND rotation_team IS NOT NULL \
             ORDER BY full_name ASC"
        );
        let personnel = sqlx::query_as::<_, Personnel>(&query)
            .bind(tenant_id)
            .fetch_all(executor)
            .await?;

        Ok(personnel)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        new: &NewPersonnel,
    ) -> Result<Personnel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "INSERT INTO personnel ( \
                tenant_id, full_name, rotation_team, max_weekly_hours, \
                accepts_external_shifts, competences \
             ) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PERSONNEL_COLUMNS}"
        );
        let personnel = sqlx::query_as::<_, Personnel>(&query)
            .bind(tenant_id)
            .bind(&new.full_name)
            .bind(new.rotation_team)
            .bind(new.max_weekly_hours)
            .bind(new.accepts_external_shifts)
            .bind(&new.competences)
            .fetch_one(executor)
            .await?;

        Ok(personnel)
    }
}
