use actix_web::{web, App, HttpServer};
use trxscope::config::db::{trx_nesting_from_env, DbKind, PoolSettings};
use trxscope::config::server::{LogFormat, ServerConfig};
use trxscope::infra::state::build_state;
use trxscope::middleware::{RequestCounter, RequestTrace, TrxScope};
use trxscope::routes;
use trxscope::telemetry;
use trxscope::AppError;

async fn load_state() -> Result<(ServerConfig, trxscope::AppState), AppError> {
    let server = ServerConfig::from_env()?;
    let state = build_state()
        .with_db(DbKind::from_env()?)
        .with_pool(PoolSettings::from_env()?)
        .with_nesting(trx_nesting_from_env()?)
        .build()
        .await?;
    Ok((server, state))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing(LogFormat::from_env());

    let (server, app_state) = match load_state().await {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!(error = %e, "startup_failed");
            eprintln!("❌ Failed to start: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        host = %server.host,
        port = server.port,
        trx_nesting = ?app_state.trx_nesting,
        "server_starting"
    );

    let requests = app_state.requests.clone();
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(TrxScope)
            .wrap(RequestCounter::new(requests.clone()))
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
