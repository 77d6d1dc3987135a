//! Handles settings for the application. Configuration is read from
//! `settings.toml` (or the file named by `EXPENSA_SETTINGS`) and from
//! `EXPENSA_*` environment variables, e.g. `EXPENSA_SERVER__PORT=8080`.
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [server]
//! bind = "127.0.0.1"
//! port = 3000
//! database = "memory"        # or { sqlite = "expensa.db" }
//! ```
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

const DEFAULT_SETTINGS_PATH: &str = "settings";
const SETTINGS_PATH_VAR: &str = "EXPENSA_SETTINGS";

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

impl Server {
    pub fn address(&self) -> String {
        let bind = self.bind.as_deref().unwrap_or("127.0.0.1");
        format!("{bind}:{}", self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path =
            std::env::var(SETTINGS_PATH_VAR).unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
        let builder = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("EXPENSA")
                    .prefix_separator("_")
                    .separator("__"),
            );
        Self::build(builder)
    }

    fn build(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .set_default("app.level", "info")?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        Settings::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn empty_file_uses_defaults() {
        let settings = parse("").unwrap();

        assert_eq!(settings.app.level, "info");
        assert!(settings.server.is_none());
    }

    #[test]
    fn server_with_sqlite_database() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            bind = "0.0.0.0"
            port = 8080
            database = { sqlite = "expensa.db" }
            "#,
        )
        .unwrap();

        let server = settings.server.unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(server.address(), "0.0.0.0:8080");
        assert_eq!(server.database, Database::Sqlite("expensa.db".to_string()));
        assert_eq!(server.database.url(), "sqlite:expensa.db?mode=rwc");
    }

    #[test]
    fn memory_database_and_default_bind() {
        let settings = parse(
            r#"
            [server]
            port = 3000
            database = "memory"
            "#,
        )
        .unwrap();

        let server = settings.server.unwrap();
        assert_eq!(server.database, Database::Memory);
        assert_eq!(server.address(), "127.0.0.1:3000");
    }

    #[test]
    fn server_without_port_is_rejected() {
        assert!(parse("[server]\ndatabase = \"memory\"").is_err());
    }
}
