//! Task-local trace id for the request being handled.
//!
//! `RequestTrace` scopes every downstream future with the request's trace id
//! so error bodies and log lines can pick it up without threading the request
//! through every call.

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

pub const UNKNOWN_TRACE_ID: &str = "unknown";

/// Trace id of the current task, or `"unknown"` outside a request scope.
pub fn trace_id() -> String {
    current().unwrap_or_else(|| UNKNOWN_TRACE_ID.to_string())
}

pub fn current() -> Option<String> {
    TRACE_ID.try_with(|id| id.clone()).ok()
}

/// Run `future` with `trace_id` visible through [`trace_id`].
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
