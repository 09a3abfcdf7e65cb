use crate::config::db::{db_url, DbKind, PoolSettings};
use crate::db::trx_stack::TrxNesting;
use crate::error::AppError;
use crate::infra::db::connect_db;
use crate::state::app_state::AppState;
use crate::state::request_count::RequestCount;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    db_kind: Option<DbKind>,
    db_url: Option<String>,
    pool: PoolSettings,
    nesting: TrxNesting,
    requests: Option<RequestCount>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            db_kind: None,
            db_url: None,
            pool: PoolSettings::default(),
            nesting: TrxNesting::default(),
            requests: None,
        }
    }

    /// Connect to the engine configured through the environment for `kind`.
    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    /// Connect to an explicit URL; takes precedence over `with_db`.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.db_url = Some(url.into());
        self
    }

    pub fn with_pool(mut self, pool: PoolSettings) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_nesting(mut self, nesting: TrxNesting) -> Self {
        self.nesting = nesting;
        self
    }

    pub fn with_request_count(mut self, requests: RequestCount) -> Self {
        self.requests = Some(requests);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let url = match (self.db_url, self.db_kind) {
            (Some(url), _) => Some(url),
            (None, Some(kind)) => Some(db_url(kind)?),
            (None, None) => None,
        };

        let state = match url {
            Some(url) => AppState::new(connect_db(&url, &self.pool).await?),
            None => AppState::without_db(),
        };

        let state = state.with_nesting(self.nesting);
        Ok(match self.requests {
            Some(requests) => state.with_request_count(requests),
            None => state,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
