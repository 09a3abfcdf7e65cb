//! Environment-driven configuration.

pub mod db;
pub mod server;

use std::env;
use std::str::FromStr;

use crate::error::AppError;
use crate::util::compare::not_empty;

/// Environment variable value, treating empty strings as unset.
pub(crate) fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| not_empty(v.trim()))
}

pub(crate) fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

/// Required environment variable or a config error naming it.
pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    env_opt(name)
        .ok_or_else(|| AppError::config(format!("Required environment variable '{name}' is not set")))
}

/// Parse an optional variable, falling back to `default` when unset.
pub(crate) fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env_opt(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("Environment variable '{name}' has an invalid value: '{raw}'"))),
    }
}
