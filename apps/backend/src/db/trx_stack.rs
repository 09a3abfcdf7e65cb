//! Per-request transaction stack.
//!
//! A `TrxStack` is owned by one request (it lives in the request's
//! extensions) and holds the transactions that request has opened, innermost
//! last. Every operation acts on the top entry only. Handles are shared with
//! the queries they were attached to, so completing a handle through the stack
//! is visible to every clone.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use parking_lot::Mutex;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, ExecResult, QueryResult,
    Statement, TransactionTrait,
};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use crate::error::AppError;

static NEXT_TRX_ID: AtomicU64 = AtomicU64::new(1);

/// What `begin` does when the stack already holds a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrxNesting {
    /// Open another top-level transaction on a fresh pooled connection. The
    /// stack only orders them; the database sees unrelated transactions.
    #[default]
    Independent,
    /// Open a savepoint inside the current top transaction.
    Savepoint,
}

impl FromStr for TrxNesting {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "independent" => Ok(TrxNesting::Independent),
            "savepoint" | "nested" => Ok(TrxNesting::Savepoint),
            other => Err(AppError::config(format!(
                "Unknown DB_TRX_NESTING '{other}' (expected independent or savepoint)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Commit,
    Rollback,
}

struct TrxInner {
    id: u64,
    depth: usize,
    backend: DbBackend,
    txn: AsyncMutex<Option<DatabaseTransaction>>,
}

/// A shared handle to one open (or completed) transaction.
///
/// Cloning is cheap; all clones see the same completion state.
#[derive(Clone)]
pub struct TrxHandle(Arc<TrxInner>);

impl TrxHandle {
    fn new(txn: DatabaseTransaction, backend: DbBackend, depth: usize) -> Self {
        Self(Arc::new(TrxInner {
            id: NEXT_TRX_ID.fetch_add(1, Ordering::Relaxed),
            depth,
            backend,
            txn: AsyncMutex::new(Some(txn)),
        }))
    }

    /// Process-unique id, for logs and identity checks.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Position in the stack at the time it was opened (0 = outermost).
    pub fn depth(&self) -> usize {
        self.0.depth
    }

    pub fn backend(&self) -> DbBackend {
        self.0.backend
    }

    pub fn same_as(&self, other: &TrxHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub async fn is_completed(&self) -> bool {
        self.0.txn.lock().await.is_none()
    }

    /// Commit unless already completed.
    pub async fn commit(&self) -> Result<(), AppError> {
        self.finish(Outcome::Commit).await
    }

    /// Roll back unless already completed.
    pub async fn rollback(&self) -> Result<(), AppError> {
        self.finish(Outcome::Rollback).await
    }

    // The completion check and the take happen under one lock, so a handle is
    // never completed twice even when clones race.
    async fn finish(&self, outcome: Outcome) -> Result<(), AppError> {
        let taken = self.0.txn.lock().await.take();
        let Some(txn) = taken else {
            debug!(trx_id = self.id(), ?outcome, "trx_already_completed");
            return Ok(());
        };

        match outcome {
            Outcome::Commit => txn.commit().await?,
            Outcome::Rollback => txn.rollback().await?,
        }
        debug!(trx_id = self.id(), depth = self.depth(), ?outcome, "trx_completed");
        Ok(())
    }

    pub async fn execute(&self, stmt: Statement) -> Result<ExecResult, AppError> {
        let guard = self.0.txn.lock().await;
        let txn = guard.as_ref().ok_or_else(|| AppError::trx_completed(self.id()))?;
        Ok(txn.execute(stmt).await?)
    }

    pub async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, AppError> {
        let guard = self.0.txn.lock().await;
        let txn = guard.as_ref().ok_or_else(|| AppError::trx_completed(self.id()))?;
        Ok(txn.query_all(stmt).await?)
    }

    pub async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, AppError> {
        let guard = self.0.txn.lock().await;
        let txn = guard.as_ref().ok_or_else(|| AppError::trx_completed(self.id()))?;
        Ok(txn.query_one(stmt).await?)
    }

    async fn begin_savepoint(&self) -> Result<DatabaseTransaction, AppError> {
        let guard = self.0.txn.lock().await;
        let txn = guard.as_ref().ok_or_else(|| AppError::trx_completed(self.id()))?;
        Ok(txn.begin().await?)
    }
}

impl fmt::Debug for TrxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrxHandle")
            .field("id", &self.id())
            .field("depth", &self.depth())
            .field("backend", &self.backend())
            .finish()
    }
}

/// LIFO of transaction handles belonging to a single request.
///
/// The lock is only held to push, pop or peek; it is never held across an
/// await.
#[derive(Clone, Default)]
pub struct TrxStack {
    entries: Arc<Mutex<Vec<TrxHandle>>>,
}

impl TrxStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stack attached to `req`, if one has been created.
    pub fn from_req(req: &HttpRequest) -> Option<TrxStack> {
        req.extensions().get::<TrxStack>().cloned()
    }

    /// The stack attached to `req`, creating and attaching an empty one first
    /// if needed.
    pub fn ensure(req: &HttpRequest) -> TrxStack {
        if let Some(stack) = Self::from_req(req) {
            return stack;
        }
        let stack = TrxStack::new();
        req.extensions_mut().insert(stack.clone());
        stack
    }

    /// Open a transaction and push it.
    ///
    /// With [`TrxNesting::Savepoint`] the new entry is a savepoint of the
    /// innermost entry that is still open; otherwise, or when every entry is
    /// already completed, a new transaction is started on `db`.
    pub async fn begin(
        &self,
        db: &DatabaseConnection,
        nesting: TrxNesting,
    ) -> Result<TrxHandle, AppError> {
        let nested = match nesting {
            TrxNesting::Savepoint => self.savepoint_of_open_entry().await?,
            TrxNesting::Independent => None,
        };
        let savepoint = nested.is_some();

        let txn = match nested {
            Some(txn) => txn,
            None => db.begin().await?,
        };

        let mut entries = self.entries.lock();
        let handle = TrxHandle::new(txn, db.get_database_backend(), entries.len());
        entries.push(handle.clone());
        debug!(
            trx_id = handle.id(),
            depth = handle.depth(),
            savepoint,
            "trx_begin"
        );
        Ok(handle)
    }

    /// Pop the top handle and commit it unless it is already completed.
    /// No-op on an empty stack.
    pub async fn commit(&self) -> Result<(), AppError> {
        match self.pop() {
            Some(handle) => handle.commit().await,
            None => Ok(()),
        }
    }

    /// Pop the top handle and roll it back unless it is already completed.
    /// No-op on an empty stack.
    pub async fn rollback(&self) -> Result<(), AppError> {
        match self.pop() {
            Some(handle) => handle.rollback().await,
            None => Ok(()),
        }
    }

    /// Commit every entry, most recently opened first.
    ///
    /// Stops at the first failure; entries below it stay on the stack.
    pub async fn commit_all(&self) -> Result<(), AppError> {
        while let Some(handle) = self.pop() {
            handle.commit().await?;
        }
        Ok(())
    }

    /// Roll back every entry, most recently opened first.
    ///
    /// Stops at the first failure; entries below it stay on the stack.
    pub async fn rollback_all(&self) -> Result<(), AppError> {
        while let Some(handle) = self.pop() {
            handle.rollback().await?;
        }
        Ok(())
    }

    /// The innermost open transaction, without removing it.
    pub fn get_trx(&self) -> Option<TrxHandle> {
        self.entries.lock().last().cloned()
    }

    pub fn depth(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Roll back whatever is left, logging instead of failing. Used when the
    /// request is over and nobody is left to receive an error.
    pub async fn drain(&self) {
        let leftover = self.depth();
        if leftover == 0 {
            return;
        }
        warn!(leftover, "trx_stack_not_empty_at_request_end");
        if let Err(e) = self.rollback_all().await {
            warn!(error = %e, remaining = self.depth(), "trx_stack_drain_failed");
            // Whatever is still stacked rolls back when its handle is dropped.
            self.entries.lock().clear();
        }
    }

    // Entries completed through a clone are skipped; with none left open the
    // caller starts a new top-level transaction.
    async fn savepoint_of_open_entry(&self) -> Result<Option<DatabaseTransaction>, AppError> {
        let entries: Vec<TrxHandle> = self.entries.lock().clone();
        for handle in entries.iter().rev() {
            match handle.begin_savepoint().await {
                Ok(txn) => return Ok(Some(txn)),
                Err(AppError::TrxCompleted { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    fn pop(&self) -> Option<TrxHandle> {
        self.entries.lock().pop()
    }
}

impl fmt::Debug for TrxStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrxStack")
            .field("depth", &self.depth())
            .finish()
    }
}
