//! SELECT statement builder.

use crate::clause::Clause;
use crate::error::{DbError, DbResult};
use crate::param::Param;
use crate::stmt::traits::Statement;

/// SELECT statement builder.
///
/// Renders, in this fixed order:
/// `SELECT <cols> FROM <table> [WHERE ...] [ORDER BY ...] [LIMIT n] [OFFSET n]`.
/// Limit and offset are written as literals, never as parameters.
#[derive(Clone, Debug, Default)]
pub struct SelectStatement {
    selection: Vec<String>,
    from: String,
    where_clause: Option<Clause>,
    order: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection list.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = columns.into_iter().map(Into::into).collect();
        self
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

    /// Append an ordering term, e.g. `"posts.id DESC"`.
    pub fn order(mut self, term: impl Into<String>) -> Self {
        self.order.push(term.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub(crate) fn where_clause(&self) -> Option<&Clause> {
        self.where_clause.as_ref()
    }
}

impl Statement for SelectStatement {
    fn validate(&self) -> DbResult<()> {
        if self.from.trim().is_empty() {
            return Err(DbError::validation("SELECT requires a FROM table"));
        }
        if self.selection.is_empty() {
            return Err(DbError::validation("SELECT requires at least one column"));
        }
        if let Some(clause) = &self.where_clause {
            clause.validate()?;
        }
        Ok(())
    }

    fn render(&self) -> (String, Vec<Param>) {
        let mut sql = format!("SELECT {} FROM {}", self.selection.join(", "), self.from);
        let mut args = Vec::new();

        if let Some(clause) = self.where_clause.as_ref().filter(|c| !c.is_empty()) {
            sql.push_str(" WHERE ");
            sql.push_str(clause.fragment());
            args.extend(clause.args().iter().cloned());
        }

        if !self.order.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        (sql, args)
    }
}
