//! Configuration management for the visitor log server

use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for static assets
    pub public_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from defaults, files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config", env::vars().collect())
    }

    /// Load configuration from `config_dir` and an explicit set of variables
    pub fn load_from(config_dir: &str, vars: Map<String, String>) -> Result<Self, ConfigError> {
        let run_mode = vars
            .get("RUN_MODE")
            .cloned()
            .unwrap_or_else(|| "development".into());
        let server = ServerConfig::default();
        let database = DatabaseConfig::default();
        let logging = LoggingConfig::default();

        let config = Config::builder()
            .set_default("server.host", server.host)?
            .set_default("server.port", server.port)?
            .set_default("server.public_dir", server.public_dir)?
            .set_default("database.host", database.host)?
            .set_default("database.port", database.port)?
            .set_default("database.user", database.user)?
            .set_default("database.password", database.password)?
            .set_default("database.name", database.name)?
            .set_default("database.max_connections", database.max_connections)?
            .set_default("database.min_connections", database.min_connections)?
            .set_default("database.acquire_timeout_secs", database.acquire_timeout_secs)?
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", logging.format)?
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Layer on the environment-specific file
            .add_source(
                File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false),
            )
            // Add environment variables (with prefix VISITOR_LOG_), e.g. VISITOR_LOG_SERVER__PORT
            .add_source(
                Environment::with_prefix("VISITOR_LOG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            )
            // The usual Postgres variables win over everything else
            .set_override_option("database.host", vars.get("POSTGRES_HOST").cloned())?
            .set_override_option("database.port", vars.get("POSTGRES_PORT").cloned())?
            .set_override_option("database.user", vars.get("POSTGRES_USER").cloned())?
            .set_override_option("database.password", vars.get("POSTGRES_PASSWORD").cloned())?
            .set_override_option("database.name", vars.get("POSTGRES_DB").cloned())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            public_dir: "public".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5433,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            name: "postgres".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
