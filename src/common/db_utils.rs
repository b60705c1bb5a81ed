use crate::common::error::AppError;
use crate::config::AppState;
use crate::middleware::tenancy::TenantContext;

// ---
// Helper RLS: a "chave" do tenant no banco
// ---
/// Adquire uma conexão da pool e define `app.tenant_id` para as políticas RLS.
/// O valor é de sessão e é sobrescrito a cada aquisição.
pub(crate) async fn get_tenant_connection(
    app_state: &AppState,
    tenant_ctx: &TenantContext,
) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, AppError> {
    // O operador '?' converte automaticamente sqlx::Error -> AppError::DatabaseError
    let mut conn = app_state.db_pool.acquire().await?;

    sqlx::query("SELECT set_config('app.tenant_id', $1, false)")
        .bind(tenant_ctx.id.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(conn)
}
