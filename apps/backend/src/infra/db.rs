use std::future::Future;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::PoolSettings;
use crate::error::AppError;

/// Replace the password in a connection URL so it can be logged.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
        None => url.to_string(),
    }
}

/// Retry a connection attempt with fixed interval delays.
/// Returns the error of the last attempt once all attempts are used.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    settings: &PoolSettings,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let max_attempts = settings.connect_attempts.max(1);
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(attempts = attempt, "connection_retry=success");
                }
                return Ok(value);
            }
            Err(e) if attempt < max_attempts => {
                warn!(
                    attempt,
                    max_attempts,
                    interval_ms = settings.retry_interval.as_millis() as u64,
                    error = %e,
                    "connection_retry=failed"
                );
                tokio::time::sleep(settings.retry_interval).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Open a connection pool for `url` and verify it with a ping.
pub async fn connect_db(url: &str, settings: &PoolSettings) -> Result<DatabaseConnection, AppError> {
    settings.validate()?;

    let mut opts = ConnectOptions::new(url.to_string());
    opts.max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .sqlx_logging(false);

    let db = retry_connection(
        || {
            let opts = opts.clone();
            async move {
                let db = Database::connect(opts).await?;
                db.ping().await?;
                Ok(db)
            }
        },
        settings,
    )
    .await?;

    info!(
        url = %sanitize_db_url(url),
        backend = ?db.get_database_backend(),
        min = settings.min_connections,
        max = settings.max_connections,
        "pool=create"
    );
    Ok(db)
}
