// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{PersonnelRepository, RotationRepository, ShiftRepository, TenantRepository},
    scheduling::HoursPolicy,
    services::{ImportService, RotationService, SchedulingService},
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MAX_WEEKLY_HOURS: i64 = 48;

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    // Teto semanal de horas internas para quem não tem um teto próprio
    pub default_max_weekly_hours: Decimal,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {raw}"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let default_max_weekly_hours = match env::var("DEFAULT_MAX_WEEKLY_HOURS") {
            Ok(raw) => Decimal::from_str(&raw)
                .with_context(|| format!("DEFAULT_MAX_WEEKLY_HOURS inválido: {raw}"))?,
            Err(_) => Decimal::from(DEFAULT_MAX_WEEKLY_HOURS),
        };
        anyhow::ensure!(
            default_max_weekly_hours > Decimal::ZERO,
            "DEFAULT_MAX_WEEKLY_HOURS deve ser positivo"
        );

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            default_max_weekly_hours,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: Arc<I18nStore>,
    pub tenant_repo: TenantRepository,
    pub rotation_service: RotationService,
    pub scheduling_service: SchedulingService,
    pub import_service: ImportService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::with_pool(db_pool, settings)
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, settings: &Settings) -> anyhow::Result<Self> {
        let i18n_store = Arc::new(I18nStore::load_embedded()?);

        let tenant_repo = TenantRepository::new(db_pool.clone());
        let personnel_repo = PersonnelRepository::new();
        let shift_repo = ShiftRepository::new();
        let rotation_repo = RotationRepository::new();

        let policy = HoursPolicy::new(settings.default_max_weekly_hours);

        let rotation_service = RotationService::new(rotation_repo.clone(), personnel_repo.clone());
        let scheduling_service = SchedulingService::new(
            personnel_repo.clone(),
            shift_repo.clone(),
            rotation_repo,
            policy,
        );
        let import_service = ImportService::new(personnel_repo, shift_repo);

        Ok(Self {
            db_pool,
            i18n_store,
            tenant_repo,
            rotation_service,
            scheduling_service,
            import_service,
        })
    }
}
