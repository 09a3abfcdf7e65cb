use super::{env_or, env_parse};
use crate::error::AppError;

/// Log output format for the process-wide subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT=pretty` selects human output; anything else is JSON.
    pub fn from_env() -> Self {
        match env_or("LOG_FORMAT", "json").to_ascii_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Reads `BACKEND_HOST` (default `0.0.0.0`) and `BACKEND_PORT` (default `3001`).
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            host: env_or("BACKEND_HOST", "0.0.0.0"),
            port: env_parse("BACKEND_PORT", 3001u16)?,
        })
    }
}
