use actix_web::web;

pub mod health;

/// Register application routes. Middleware is wired by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes);
}
