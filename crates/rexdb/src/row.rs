//! Row mapping traits and utilities

use crate::error::{DbError, DbResult};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// Trait for converting a database row into a Rust struct.
///
/// Implementations look columns up by name, so the column order of a
/// `SELECT` list or `RETURNING` list does not matter.
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> DbResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning DbError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> DbResult<T>
    where
        T: for<'a> FromSql<'a>;

    /// Get a column value if the column is present in the result set.
    fn try_get_opt_column<T>(&self, column: &str) -> DbResult<Option<T>>
    where
        T: for<'a> FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> DbResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| DbError::decode(column, e.to_string()))
    }

    fn try_get_opt_column<T>(&self, column: &str) -> DbResult<Option<T>>
    where
        T: for<'a> FromSql<'a>,
    {
        match self.columns().iter().position(|c| c.name() == column) {
            Some(idx) => self
                .try_get(idx)
                .map(Some)
                .map_err(|e| DbError::decode(column, e.to_string())),
            None => Ok(None),
        }
    }
}
