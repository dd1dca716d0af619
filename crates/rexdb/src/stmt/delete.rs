//! DELETE statement builder.

use crate::clause::Clause;
use crate::error::{DbError, DbResult};
use crate::param::Param;
use crate::stmt::traits::Statement;

/// DELETE statement builder. Without a WHERE clause every row is deleted.
#[derive(Clone, Debug, Default)]
pub struct DeleteStatement {
    from: String,
    where_clause: Option<Clause>,
}

impl DeleteStatement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = table.into();
        self
    }

    /// Set the WHERE clause, replacing any previous one.
    pub fn filter(mut self, clause: Clause) -> Self {
        self.where_clause = Some(clause);
        self
    }
}

impl Statement for DeleteStatement {
    fn validate(&self) -> DbResult<()> {
        if self.from.trim().is_empty() {
            return Err(DbError::validation("DELETE requires a FROM table"));
        }
        if let Some(clause) = &self.where_clause {
            clause.validate()?;
        }
        Ok(())
    }

    fn render(&self) -> (String, Vec<Param>) {
        let mut sql = format!("DELETE FROM {}", self.from);
        let mut args = Vec::new();

        if let Some(clause) = self.where_clause.as_ref().filter(|c| !c.is_empty()) {
            sql.push_str(" WHERE ");
            sql.push_str(clause.fragment());
            args.extend(clause.args().iter().cloned());
        }

        (sql, args)
    }
}
