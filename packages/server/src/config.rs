use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Use TLS for the database connection.
    pub encrypt: bool,
    /// Accept the server certificate without verifying it.
    pub trust_server_certificate: bool,
    pub connect_timeout_secs: u64,
    pub max_connections: u32,
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    /// PostgreSQL connection URL derived from the connection parameters.
    pub fn url(&self) -> String {
        let sslmode = match (self.encrypt, self.trust_server_certificate) {
            (false, _) => "disable",
            (true, true) => "require",
            (true, false) => "verify-full",
        };
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            utf8_percent_encode(&self.user, NON_ALPHANUMERIC),
            utf8_percent_encode(&self.password, NON_ALPHANUMERIC),
            self.host,
            self.port,
            self.name,
            sslmode
        )
    }
}

/// Serving of the built front-end bundle in production.
#[derive(Debug, Deserialize, Clone)]
pub struct StaticAssetsConfig {
    pub enabled: bool,
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub static_assets: StaticAssetsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "")?
            .set_default("database.name", "sports_fest")?
            .set_default("database.encrypt", true)?
            .set_default("database.trust_server_certificate", false)?
            .set_default("database.connect_timeout_secs", 30)?
            .set_default("database.max_connections", 10)?
            .set_default("database.sqlx_logging", false)?
            .set_default("static_assets.enabled", false)?
            .set_default("static_assets.dir", "dist")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., FEST__DATABASE__PASSWORD)
            .add_source(Environment::with_prefix("FEST").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
