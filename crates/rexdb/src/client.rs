//! The execution seam between rendered statements and a connection.

use crate::error::{DbError, DbResult};
use std::future::Future;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Anything that can run a parameterized statement: a plain connection or an
/// open transaction. Argument `i` binds to placeholder `$i`.
///
/// Driver errors are classified through [`DbError::from_db_error`].
pub trait GenericClient: Send + Sync {
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = DbResult<Vec<Row>>> + Send;

    /// Affected-row count.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = DbResult<u64>> + Send;

    /// The first row, or `None` when the statement returned nothing.
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = DbResult<Option<Row>>> + Send {
        async move { Ok(self.query(sql, params).await?.into_iter().next()) }
    }

    /// The first row; [`DbError::NotFound`] when there is none.
    fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = DbResult<Row>> + Send {
        async move {
            self.query_opt(sql, params)
                .await?
                .ok_or_else(|| DbError::not_found("statement returned no rows"))
        }
    }
}

macro_rules! forward_to_driver {
    ($ty:ty) => {
        impl GenericClient for $ty {
            async fn query(
                &self,
                sql: &str,
                params: &[&(dyn ToSql + Sync)],
            ) -> DbResult<Vec<Row>> {
                <$ty>::query(self, sql, params)
                    .await
                    .map_err(DbError::from_db_error)
            }

            async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<u64> {
                <$ty>::execute(self, sql, params)
                    .await
                    .map_err(DbError::from_db_error)
            }
        }
    };
}

forward_to_driver!(tokio_postgres::Client);
forward_to_driver!(tokio_postgres::Transaction<'_>);
