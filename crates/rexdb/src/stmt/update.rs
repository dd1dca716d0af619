//! UPDATE statement builder.

use crate::clause::Clause;
use crate::error::{DbError, DbResult};
use crate::param::Param;
use crate::stmt::traits::Statement;
use tokio_postgres::types::ToSql;

/// UPDATE statement builder.
///
/// SET arguments always come before WHERE arguments: the SET placeholders are
/// numbered first.
#[derive(Clone, Debug, Default)]
pub struct UpdateStatement {
    table: String,
    columns: Vec<String>,
    values: Vec<Param>,
    where_clause: Option<Clause>,
    returning: Option<String>,
}

impl UpdateStatement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn values(mut self, values: Vec<Param>) -> Self {
        self.values = values;
        self
    }

    /// Append one `column = value` pair.
    pub fn set<T: ToSql + Send + Sync + 'static>(mut self, column: impl Into<String>, value: T) -> Self {
        self.columns.push(column.into());
        self.values.push(Param::new(value));
        self
    }

    /// Set the WHERE clause, replacing any previous one.
    pub fn filter(mut self, clause: Clause) -> Self {
        self.where_clause = Some(clause);
        self
    }

    /// Set the RETURNING list. An empty list emits nothing.
    pub fn returning(mut self, columns: impl Into<String>) -> Self {
        self.returning = Some(columns.into());
        self
    }
}

impl Statement for UpdateStatement {
    fn validate(&self) -> DbResult<()> {
        if self.table.trim().is_empty() {
            return Err(DbError::validation("UPDATE requires a target table"));
        }
        if self.columns.is_empty() {
            return Err(DbError::validation("UPDATE requires at least one SET column"));
        }
        if self.columns.len() != self.values.len() {
            return Err(DbError::validation(format!(
                "UPDATE has {} column(s) but {} value(s)",
                self.columns.len(),
                self.values.len()
            )));
        }
        if let Some(clause) = &self.where_clause {
            clause.validate()?;
        }
        Ok(())
    }

    fn render(&self) -> (String, Vec<Param>) {
        let sets: Vec<String> = self.columns.iter().map(|c| format!("{} = ?", c)).collect();
        let mut sql = format!("UPDATE {} SET {}", self.table, sets.join(", "));
        let mut args = self.values.clone();

        if let Some(clause) = self.where_clause.as_ref().filter(|c| !c.is_empty()) {
            sql.push_str(" WHERE ");
            sql.push_str(clause.fragment());
            args.extend(clause.args().iter().cloned());
        }

        if let Some(returning) = self.returning.as_deref().filter(|r| !r.trim().is_empty()) {
            sql.push_str(" RETURNING ");
            sql.push_str(returning);
        }

        (sql, args)
    }
}
