//! Request-level transaction operations.
//!
//! Thin wrappers that resolve the request's [`TrxStack`] and delegate to it.
//! Every operation takes the request as `Option<&HttpRequest>` and fails with
//! [`AppError::InvalidArgument`] when it is `None`.

use actix_web::HttpRequest;

use super::trx_stack::{TrxHandle, TrxStack};
use super::{require_db, state_from_req};
use crate::error::AppError;

fn require_req<'a>(req: Option<&'a HttpRequest>, op: &'static str) -> Result<&'a HttpRequest, AppError> {
    req.ok_or_else(|| AppError::invalid_argument(op))
}

/// Open a transaction and push it onto the request's stack, creating the
/// stack on first use.
pub async fn begin(req: Option<&HttpRequest>) -> Result<(), AppError> {
    let req = require_req(req, "trans.begin")?;
    let state = state_from_req(req)?;
    let db = require_db(&state)?;
    TrxStack::ensure(req).begin(db, state.trx_nesting).await?;
    Ok(())
}

/// Commit the innermost transaction. No-op when nothing is open.
pub async fn commit(req: Option<&HttpRequest>) -> Result<(), AppError> {
    let req = require_req(req, "trans.commit")?;
    match TrxStack::from_req(req) {
        Some(stack) => stack.commit().await,
        None => Ok(()),
    }
}

/// Commit every open transaction, innermost first.
pub async fn commit_all(req: Option<&HttpRequest>) -> Result<(), AppError> {
    let req = require_req(req, "trans.commit_all")?;
    match TrxStack::from_req(req) {
        Some(stack) => stack.commit_all().await,
        None => Ok(()),
    }
}

/// Roll back the innermost transaction. No-op when nothing is open.
pub async fn rollback(req: Option<&HttpRequest>) -> Result<(), AppError> {
    let req = require_req(req, "trans.rollback")?;
    match TrxStack::from_req(req) {
        Some(stack) => stack.rollback().await,
        None => Ok(()),
    }
}

/// Roll back every open transaction, innermost first.
pub async fn rollback_all(req: Option<&HttpRequest>) -> Result<(), AppError> {
    let req = require_req(req, "trans.rollback_all")?;
    match TrxStack::from_req(req) {
        Some(stack) => stack.rollback_all().await,
        None => Ok(()),
    }
}

/// The innermost open transaction of the request, if any.
pub fn get_trx(req: Option<&HttpRequest>) -> Result<Option<TrxHandle>, AppError> {
    let req = require_req(req, "trans.get_trx")?;
    Ok(TrxStack::from_req(req).and_then(|stack| stack.get_trx()))
}
