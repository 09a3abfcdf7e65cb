//! Test support for the trxscope backend
//!
//! Logging bootstrap, captured JSON log output, throwaway SQLite databases and
//! problem-details assertions. Nothing here depends on backend types.

pub mod logging;
pub mod problem_details;
pub mod sqlite;
