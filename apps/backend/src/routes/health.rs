use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::db::query::{executor, raw};
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::util::date::now;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    db: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_error: Option<String>,
    requests: u64,
    time: String,
}

async fn health(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let (db, db_error) = match executor(Some(&req)) {
        Ok(exec) => match raw("SELECT 1", []).one(&exec).await {
            Ok(_) => ("ok", None),
            Err(e) => ("error", Some(e.to_string())),
        },
        Err(AppError::DbUnavailable) => ("unavailable", None),
        Err(e) => return Err(e),
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
        db,
        db_error,
        requests: state.requests.get(),
        time: now(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
