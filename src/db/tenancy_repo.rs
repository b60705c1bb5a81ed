// src/db/tenancy_repo.rs

use sqlx::PgPool;
use crate::{common::error::AppError, models::tenancy::Tenant};

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve o slug da rota. Roda fora do RLS: é o passo que descobre o tenant.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            "SELECT id, slug, name, created_at FROM tenants WHERE slug = $1",
        )
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tenant)
    }
}
