pub mod query;
pub mod trans;
pub mod trx_stack;

use actix_web::{web, HttpRequest};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::state::app_state::AppState;

pub use query::{executor, raw, table, Executor, RawQuery, TableQuery, TableRef};
pub use trx_stack::{TrxHandle, TrxNesting, TrxStack};

/// Centralized helper to access the database connection from AppState.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state.db().ok_or_else(AppError::db_unavailable)
}

/// The application state registered with the app serving `req`.
pub fn state_from_req(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::internal("AppState not registered as app data"))
}
