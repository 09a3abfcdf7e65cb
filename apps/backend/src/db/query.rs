//! Table-scoped query construction bound to the request's transaction.
//!
//! [`table`] resolves the request's innermost open transaction at the time
//! of the call; queries built before a later `begin` keep running on the pool.

use actix_web::HttpRequest;
use sea_orm::sea_query::extension::mysql::{IndexHintScope, MySqlSelectStatementExt};
use sea_orm::sea_query::{
    Alias, DeleteStatement, InsertStatement, Query, SelectStatement, UpdateStatement,
};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, ExecResult, QueryResult, Statement,
    StatementBuilder, Value,
};

use super::trx_stack::{TrxHandle, TrxStack};
use super::{require_db, state_from_req};
use crate::error::AppError;

/// Where statements run: the pool, or an open transaction.
#[derive(Clone, Debug)]
pub enum Executor {
    Pool(DatabaseConnection),
    Trx(TrxHandle),
}

impl Executor {
    pub fn backend(&self) -> DbBackend {
        match self {
            Executor::Pool(db) => db.get_database_backend(),
            Executor::Trx(trx) => trx.backend(),
        }
    }

    pub fn trx(&self) -> Option<&TrxHandle> {
        match self {
            Executor::Trx(trx) => Some(trx),
            Executor::Pool(_) => None,
        }
    }

    pub async fn execute(&self, stmt: Statement) -> Result<ExecResult, AppError> {
        match self {
            Executor::Pool(db) => Ok(db.execute(stmt).await?),
            Executor::Trx(trx) => trx.execute(stmt).await,
        }
    }

    pub async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, AppError> {
        match self {
            Executor::Pool(db) => Ok(db.query_all(stmt).await?),
            Executor::Trx(trx) => trx.query_all(stmt).await,
        }
    }

    pub async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, AppError> {
        match self {
            Executor::Pool(db) => Ok(db.query_one(stmt).await?),
            Executor::Trx(trx) => trx.query_one(stmt).await,
        }
    }
}

/// A table target: name, optional alias, optional forced index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub table: String,
    pub alias: Option<String>,
    pub index: Option<String>,
}

impl TableRef {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            index: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// `SELECT ... FROM table [AS alias] [FORCE INDEX (index)]`.
    ///
    /// Index hints are only rendered for MySQL; other backends drop them.
    pub fn select(&self) -> SelectStatement {
        let mut stmt = Query::select();
        match &self.alias {
            Some(alias) => stmt.from_as(Alias::new(self.table.as_str()), Alias::new(alias.as_str())),
            None => stmt.from(Alias::new(self.table.as_str())),
        };
        if let Some(index) = &self.index {
            stmt.force_index(Alias::new(index.as_str()), IndexHintScope::All);
        }
        stmt
    }

    pub fn insert(&self) -> InsertStatement {
        Query::insert()
            .into_table(Alias::new(self.table.as_str()))
            .to_owned()
    }

    pub fn update(&self) -> UpdateStatement {
        Query::update()
            .table(Alias::new(self.table.as_str()))
            .to_owned()
    }

    pub fn delete(&self) -> DeleteStatement {
        Query::delete()
            .from_table(Alias::new(self.table.as_str()))
            .to_owned()
    }
}

/// A table target plus the executor it runs on.
#[derive(Clone, Debug)]
pub struct TableQuery {
    target: TableRef,
    executor: Executor,
}

impl TableQuery {
    pub fn new(target: TableRef, executor: Executor) -> Self {
        Self { target, executor }
    }

    pub fn target(&self) -> &TableRef {
        &self.target
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// The transaction this query is attached to, if any.
    pub fn trx(&self) -> Option<&TrxHandle> {
        self.executor.trx()
    }

    pub fn is_transacting(&self) -> bool {
        self.trx().is_some()
    }

    pub fn select(&self) -> SelectStatement {
        self.target.select()
    }

    pub fn insert(&self) -> InsertStatement {
        self.target.insert()
    }

    pub fn update(&self) -> UpdateStatement {
        self.target.update()
    }

    pub fn delete(&self) -> DeleteStatement {
        self.target.delete()
    }

    /// Render `stmt` for this executor's backend.
    pub fn build<S: StatementBuilder>(&self, stmt: &S) -> Statement {
        self.executor.backend().build(stmt)
    }

    pub async fn all<S: StatementBuilder>(&self, stmt: &S) -> Result<Vec<QueryResult>, AppError> {
        self.executor.query_all(self.build(stmt)).await
    }

    pub async fn one<S: StatementBuilder>(&self, stmt: &S) -> Result<Option<QueryResult>, AppError> {
        self.executor.query_one(self.build(stmt)).await
    }

    pub async fn exec<S: StatementBuilder>(&self, stmt: &S) -> Result<ExecResult, AppError> {
        self.executor.execute(self.build(stmt)).await
    }
}

/// A literal SQL fragment with bind values, passed through untouched.
///
/// Placeholders follow the driver: `?` for MySQL and SQLite, `$1..` for
/// Postgres.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuery {
    pub sql: String,
    pub values: Vec<Value>,
}

impl RawQuery {
    pub fn statement(&self, backend: DbBackend) -> Statement {
        Statement::from_sql_and_values(backend, self.sql.as_str(), self.values.clone())
    }

    pub async fn exec(&self, executor: &Executor) -> Result<ExecResult, AppError> {
        executor.execute(self.statement(executor.backend())).await
    }

    pub async fn all(&self, executor: &Executor) -> Result<Vec<QueryResult>, AppError> {
        executor.query_all(self.statement(executor.backend())).await
    }

    pub async fn one(&self, executor: &Executor) -> Result<Option<QueryResult>, AppError> {
        executor.query_one(self.statement(executor.backend())).await
    }
}

pub fn raw<I>(sql: impl Into<String>, values: I) -> RawQuery
where
    I: IntoIterator<Item = Value>,
{
    RawQuery {
        sql: sql.into(),
        values: values.into_iter().collect(),
    }
}

fn open_trx(req: &HttpRequest) -> Option<TrxHandle> {
    TrxStack::from_req(req).and_then(|stack| stack.get_trx())
}

/// The request's innermost open transaction, or the pool when none is open.
pub fn executor(req: Option<&HttpRequest>) -> Result<Executor, AppError> {
    let req = req.ok_or_else(|| AppError::invalid_argument("query.executor"))?;
    if let Some(trx) = open_trx(req) {
        return Ok(Executor::Trx(trx));
    }
    let state = state_from_req(req)?;
    Ok(Executor::Pool(require_db(&state)?.clone()))
}

/// A query handle on `table`, attached to the request's innermost open
/// transaction if there is one.
pub fn table(
    req: Option<&HttpRequest>,
    table: &str,
    alias: Option<&str>,
    index: Option<&str>,
) -> Result<TableQuery, AppError> {
    let req = req.ok_or_else(|| AppError::invalid_argument("query.table"))?;

    let mut target = TableRef::new(table);
    if let Some(alias) = alias {
        target = target.with_alias(alias);
    }
    if let Some(index) = index {
        target = target.with_index(index);
    }

    Ok(TableQuery::new(target, executor(Some(req))?))
}
