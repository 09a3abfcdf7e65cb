#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod db;
pub mod error;
pub mod errors;
pub mod infra;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;
pub mod util;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use config::db::{db_url, DbKind, PoolSettings};
pub use db::query::{executor, raw, table, Executor, RawQuery, TableQuery, TableRef};
pub use db::trans;
pub use db::trx_stack::{TrxHandle, TrxNesting, TrxStack};
pub use error::AppError;
pub use errors::ErrorCode;
pub use infra::db::connect_db;
pub use infra::state::build_state;
pub use middleware::request_counter::RequestCounter;
pub use middleware::request_trace::RequestTrace;
pub use middleware::trx_scope::TrxScope;
pub use state::app_state::AppState;
pub use state::request_count::RequestCount;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
