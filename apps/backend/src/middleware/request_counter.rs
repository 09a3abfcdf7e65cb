//! Per-request counter and "starter" log line.
//!
//! Every request bumps the process-wide [`RequestCount`] and logs one event
//! carrying the method, path and new count before being passed on unchanged.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use tracing::info;

use crate::state::request_count::RequestCount;

pub const STARTER_TAG: &str = "starter";

/// Share the counter with `AppState::requests` so the same value is visible
/// to handlers; each `HttpServer` worker clones this middleware.
#[derive(Clone, Default)]
pub struct RequestCounter {
    count: RequestCount,
}

impl RequestCounter {
    pub fn new(count: RequestCount) -> Self {
        Self { count }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestCounter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestCounterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestCounterMiddleware {
            service,
            count: self.count.clone(),
        }))
    }
}

pub struct RequestCounterMiddleware<S> {
    service: S,
    count: RequestCount,
}

impl<S, B> Service<ServiceRequest> for RequestCounterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let router_count = self.count.increment();
        info!(
            tag = STARTER_TAG,
            http.method = %req.method(),
            url.path = %req.path(),
            router_count,
            "starter"
        );

        self.service.call(req)
    }
}
