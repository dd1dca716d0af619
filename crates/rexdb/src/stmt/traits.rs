//! Trait definitions for statement builders.

use crate::client::GenericClient;
use crate::error::DbResult;
use crate::param::{Param, as_refs};
use crate::rebind::{BindType, rebind};
use crate::row::FromRow;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A rendered statement: SQL text plus its arguments, in placeholder order.
#[derive(Debug, Clone)]
pub struct BuiltStatement {
    pub sql: String,
    pub args: Vec<Param>,
}

impl BuiltStatement {
    pub fn new(sql: String, args: Vec<Param>) -> Self {
        Self { sql, args }
    }

    /// Get parameters as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        as_refs(&self.args)
    }

    fn log(&self) {
        tracing::debug!(target: "rexdb.sql", sql = %self.sql, args = ?self.args, "executing statement");
    }
}

/// Base trait for all statement builders.
///
/// Builders render themselves with neutral `?` placeholders; [`Statement::to_sql`]
/// validates, then rebinds for PostgreSQL (`$1, $2, ...`).
pub trait Statement: Sync {
    /// Reject builder states that cannot produce a well-formed statement.
    fn validate(&self) -> DbResult<()>;

    /// Render SQL with neutral placeholders and the matching arguments.
    fn render(&self) -> (String, Vec<Param>);

    /// Validate and render for PostgreSQL.
    fn to_sql(&self) -> DbResult<BuiltStatement> {
        self.to_sql_with(BindType::Dollar)
    }

    /// Validate and render using the placeholder syntax of `bind_type`.
    fn to_sql_with(&self, bind_type: BindType) -> DbResult<BuiltStatement> {
        self.validate()?;
        let (sql, args) = self.render();
        Ok(BuiltStatement::new(rebind(bind_type, &sql), args))
    }

    /// Execute and return all rows.
    fn query(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = DbResult<Vec<Row>>> + Send {
        async move {
            let built = self.to_sql()?;
            built.log();
            conn.query(&built.sql, &built.params_ref()).await
        }
    }

    /// Execute and return at most one row.
    fn query_opt(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = DbResult<Option<Row>>> + Send {
        async move {
            let built = self.to_sql()?;
            built.log();
            conn.query_opt(&built.sql, &built.params_ref()).await
        }
    }

    /// Execute and return the first row, or `NotFound`.
    fn query_one(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = DbResult<Row>> + Send {
        async move {
            let built = self.to_sql()?;
            built.log();
            conn.query_one(&built.sql, &built.params_ref()).await
        }
    }

    /// Execute and map all rows to `T`.
    fn fetch_all<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = DbResult<Vec<T>>> + Send {
        async move {
            let rows = self.query(conn).await?;
            rows.iter().map(T::from_row).collect()
        }
    }

    /// Execute and map at most one row to `T`.
    fn fetch_opt<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = DbResult<Option<T>>> + Send {
        async move {
            let row = self.query_opt(conn).await?;
            row.as_ref().map(T::from_row).transpose()
        }
    }

    /// Execute and map the first row to `T`.
    fn fetch_one<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = DbResult<T>> + Send {
        async move {
            let row = self.query_one(conn).await?;
            T::from_row(&row)
        }
    }

    /// Execute and return the affected row count.
    fn execute(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send {
        async move {
            let built = self.to_sql()?;
            built.log();
            conn.execute(&built.sql, &built.params_ref()).await
        }
    }
}
