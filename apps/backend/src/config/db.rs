use std::str::FromStr;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use super::{env_opt, env_or, env_parse, must_var};
use crate::db::trx_stack::TrxNesting;
use crate::error::AppError;

/// Database engine selected by `DB_KIND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbKind {
    MySql,
    Postgres,
    SqliteFile,
    SqliteMemory,
}

impl DbKind {
    pub fn from_env() -> Result<Self, AppError> {
        env_or("DB_KIND", "mysql").parse()
    }

    fn default_port(self) -> &'static str {
        match self {
            DbKind::MySql => "3306",
            DbKind::Postgres => "5432",
            DbKind::SqliteFile | DbKind::SqliteMemory => "",
        }
    }

    pub fn is_sqlite(self) -> bool {
        matches!(self, DbKind::SqliteFile | DbKind::SqliteMemory)
    }
}

impl FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DbKind::MySql),
            "postgres" | "postgresql" => Ok(DbKind::Postgres),
            "sqlite" | "sqlite-file" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "memory" => Ok(DbKind::SqliteMemory),
            other => Err(AppError::config(format!(
                "Unknown DB_KIND '{other}' (expected mysql, postgres, sqlite or sqlite-memory)"
            ))),
        }
    }
}

/// Builds a database URL from environment variables for the given engine.
///
/// Server engines read `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER` and
/// `DB_PASSWORD`; credentials are percent-encoded. `sqlite` reads `SQLITE_PATH`.
pub fn db_url(kind: DbKind) -> Result<String, AppError> {
    match kind {
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
        DbKind::SqliteFile => {
            let path = must_var("SQLITE_PATH")?;
            Ok(format!("sqlite://{path}?mode=rwc"))
        }
        DbKind::MySql | DbKind::Postgres => {
            let scheme = if kind == DbKind::MySql {
                "mysql"
            } else {
                "postgresql"
            };
            let host = env_or("DB_HOST", "localhost");
            let port = env_or("DB_PORT", kind.default_port());
            let name = must_var("DB_NAME")?;
            let user = must_var("DB_USER")?;
            let password = must_var("DB_PASSWORD")?;

            Ok(format!(
                "{scheme}://{}:{}@{host}:{port}/{name}",
                utf8_percent_encode(&user, NON_ALPHANUMERIC),
                utf8_percent_encode(&password, NON_ALPHANUMERIC),
            ))
        }
    }
}

/// Pool sizing and connect behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub connect_attempts: u32,
    pub retry_interval: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_millis(5000),
            connect_attempts: 3,
            retry_interval: Duration::from_millis(500),
        }
    }
}

impl PoolSettings {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let settings = Self {
            max_connections: env_parse("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_parse("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            acquire_timeout: Duration::from_millis(env_parse(
                "DB_ACQUIRE_TIMEOUT_MS",
                defaults.acquire_timeout.as_millis() as u64,
            )?),
            connect_attempts: env_parse("DB_CONNECT_ATTEMPTS", defaults.connect_attempts)?,
            retry_interval: defaults.retry_interval,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_connections == 0 {
            return Err(AppError::config("DB_MAX_CONNECTIONS must be at least 1"));
        }
        if self.min_connections > self.max_connections {
            return Err(AppError::config(format!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                self.min_connections, self.max_connections
            )));
        }
        if self.connect_attempts == 0 {
            return Err(AppError::config("DB_CONNECT_ATTEMPTS must be at least 1"));
        }
        Ok(())
    }
}

/// Nesting policy from `DB_TRX_NESTING` (default `independent`).
pub fn trx_nesting_from_env() -> Result<TrxNesting, AppError> {
    match env_opt("DB_TRX_NESTING") {
        None => Ok(TrxNesting::default()),
        Some(raw) => raw.parse(),
    }
}
