//! Gives each request its own [`TrxStack`] and cleans it up afterwards.
//!
//! Anything a handler left open (an early return, a `?` between `begin` and
//! `commit`) is rolled back once the response has been produced. Rollback
//! failures are logged; the response is returned as is.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;

use crate::db::trx_stack::TrxStack;

pub struct TrxScope;

impl<S, B> Transform<S, ServiceRequest> for TrxScope
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TrxScopeMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TrxScopeMiddleware { service }))
    }
}

pub struct TrxScopeMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TrxScopeMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let stack = TrxStack::new();
        req.extensions_mut().insert(stack.clone());

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await;
            stack.drain().await;
            res
        })
    }
}
