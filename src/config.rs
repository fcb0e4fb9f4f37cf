// src/config.rs

use crate::{common::culture::Culture, db::Store};
use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, str::FromStr, sync::Arc, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => anyhow::bail!("APP_ENV inválido: '{other}'"),
        }
    }
}

// Configuração lida do ambiente (e do .env, se existir)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub addr: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub culture: Culture,
    pub environment: Environment,
}

// Lê uma variável opcional e converte; ausente = default.
fn var_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{name} inválida ('{raw}'): {e}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        Ok(Self {
            database_url,
            addr: var_or("APP_ADDR", "0.0.0.0:3000".to_string())?,
            max_connections: var_or("DATABASE_MAX_CONNECTIONS", 5)?,
            acquire_timeout: Duration::from_secs(var_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 3)?),
            culture: var_or("APP_CULTURE", Culture::default())?,
            environment: var_or("APP_ENV", Environment::default())?,
        })
    }

    pub fn docs_enabled(&self) -> bool {
        self.environment == Environment::Development
    }
}

pub async fn connect_pool(config: &Config) -> anyhow::Result<PgPool> {
    let db_pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(db_pool)
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    // Usada para interpretar decimais vindos da rota
    pub culture: Culture,
    pub docs_enabled: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, culture: Culture, docs_enabled: bool) -> Self {
        Self {
            store,
            culture,
            docs_enabled,
        }
    }
}
