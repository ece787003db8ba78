// src/config.rs

use crate::{
    common::i18n::I18nStore,
    db::{CatalogRepository, LedgerRepository, ReportRepository, TenantRepository},
    services::{CatalogService, LedgerService, ReportService, TenantService},
};
use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

// ---
// Configuração (variáveis de ambiente / .env)
// ---
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub host: String,
    pub port: u16,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválida ({}): {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        Ok(Self {
            database_url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 5)?,
            acquire_timeout: Duration::from_secs(env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 3)?),
            host: env_or("APP_HOST", "0.0.0.0".to_string())?,
            port: env_or("APP_PORT", 3000)?,
        })
    }
}

// O estado compartilhado por todos os handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: Arc<I18nStore>,
    pub tenancy_service: TenantService,
    pub catalog_service: CatalogService,
    pub ledger_service: LedgerService,
    pub report_service: ReportService,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool))
    }

    /// Monta o gráfico de dependências sobre uma pool já criada (usado nos testes).
    pub fn from_pool(db_pool: PgPool) -> Self {
        Self {
            db_pool,
            i18n_store: Arc::new(I18nStore::new()),
            tenancy_service: TenantService::new(TenantRepository::new()),
            catalog_service: CatalogService::new(CatalogRepository::new()),
            ledger_service: LedgerService::new(LedgerRepository::new()),
            report_service: ReportService::new(ReportRepository::new()),
        }
    }
}
