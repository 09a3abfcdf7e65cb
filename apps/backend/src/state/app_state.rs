use sea_orm::DatabaseConnection;

use super::request_count::RequestCount;
use crate::db::trx_stack::TrxNesting;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Requests seen so far, shared with the counter middleware
    pub requests: RequestCount,
    /// What a nested `begin` opens
    pub trx_nesting: TrxNesting,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db: Some(db),
            requests: RequestCount::new(),
            trx_nesting: TrxNesting::default(),
        }
    }

    pub fn without_db() -> Self {
        Self {
            db: None,
            requests: RequestCount::new(),
            trx_nesting: TrxNesting::default(),
        }
    }

    pub fn with_nesting(mut self, nesting: TrxNesting) -> Self {
        self.trx_nesting = nesting;
        self
    }

    pub fn with_request_count(mut self, requests: RequestCount) -> Self {
        self.requests = requests;
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
