//! INSERT statement builder, including multi-row and upsert forms.

use crate::error::{DbError, DbResult};
use crate::param::Param;
use crate::stmt::traits::Statement;
use tokio_postgres::types::ToSql;

/// Conflict resolution action.
#[derive(Clone, Debug)]
pub enum ConflictAction {
    /// DO NOTHING
    DoNothing,
    /// DO UPDATE SET c = EXCLUDED.c for each listed column
    DoUpdate(Vec<String>),
}

#[derive(Clone, Debug)]
struct OnConflict {
    target: String,
    action: ConflictAction,
}

/// INSERT statement builder.
///
/// `values` are positionally aligned with `columns`; [`InsertStatement::row`]
/// adds further rows for a multi-row insert.
#[derive(Clone, Debug, Default)]
pub struct InsertStatement {
    into: String,
    columns: Vec<String>,
    rows: Vec<Vec<Param>>,
    on_conflict: Option<OnConflict>,
    returning: Option<String>,
}

impl InsertStatement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into(mut self, table: impl Into<String>) -> Self {
        self.into = table.into();
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

    /// Set the values of a single-row insert, replacing any rows added so far.
    pub fn values(mut self, values: Vec<Param>) -> Self {
        self.rows = vec![values];
        self
    }

    /// Append one value to the last row (starting a row if there is none).
    pub fn value<T: ToSql + Send + Sync + 'static>(mut self, value: T) -> Self {
        match self.rows.last_mut() {
            Some(row) => row.push(Param::new(value)),
            None => self.rows.push(vec![Param::new(value)]),
        }
        self
    }

    /// Append a row for a multi-row insert.
    pub fn row(mut self, values: Vec<Param>) -> Self {
        self.rows.push(values);
        self
    }

    /// `ON CONFLICT (<target>) DO NOTHING`
    pub fn on_conflict_do_nothing(mut self, target: impl Into<String>) -> Self {
        self.on_conflict = Some(OnConflict {
            target: target.into(),
            action: ConflictAction::DoNothing,
        });
        self
    }

    /// `ON CONFLICT (<target>) DO UPDATE SET c = EXCLUDED.c, ...`
    pub fn on_conflict_do_update<I, S>(mut self, target: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.on_conflict = Some(OnConflict {
            target: target.into(),
            action: ConflictAction::DoUpdate(columns.into_iter().map(Into::into).collect()),
        });
        self
    }

    /// Set the RETURNING list, e.g. `"id, title"`. An empty list emits nothing.
    pub fn returning(mut self, columns: impl Into<String>) -> Self {
        self.returning = Some(columns.into());
        self
    }
}

impl Statement for InsertStatement {
    fn validate(&self) -> DbResult<()> {
        if self.into.trim().is_empty() {
            return Err(DbError::validation("INSERT requires a target table"));
        }
        if self.columns.is_empty() {
            return Err(DbError::validation("INSERT requires at least one column"));
        }
        if self.rows.is_empty() {
            return Err(DbError::validation("INSERT requires at least one row of values"));
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(DbError::validation(format!(
                    "INSERT row {} has {} value(s) for {} column(s)",
                    i + 1,
                    row.len(),
                    self.columns.len()
                )));
            }
        }
        if let Some(OnConflict {
            target,
            action: ConflictAction::DoUpdate(columns),
        }) = &self.on_conflict
        {
            if target.trim().is_empty() || columns.is_empty() {
                return Err(DbError::validation(
                    "ON CONFLICT DO UPDATE requires a target and at least one column",
                ));
            }
        }
        Ok(())
    }

    fn render(&self) -> (String, Vec<Param>) {
        let mut args = Vec::new();
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                args.extend(row.iter().cloned());
                format!("({})", vec!["?"; row.len()].join(","))
            })
            .collect();

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.into,
            self.columns.join(","),
            rows.join(",")
        );

        if let Some(conflict) = &self.on_conflict {
            match &conflict.action {
                ConflictAction::DoNothing => {
                    sql.push_str(&format!(" ON CONFLICT ({}) DO NOTHING", conflict.target));
                }
                ConflictAction::DoUpdate(columns) => {
                    let sets: Vec<String> = columns
                        .iter()
                        .map(|c| format!("{} = EXCLUDED.{}", c, c))
                        .collect();
                    sql.push_str(&format!(
                        " ON CONFLICT ({}) DO UPDATE SET {}",
                        conflict.target,
                        sets.join(", ")
                    ));
                }
            }
        }

        if let Some(returning) = self.returning.as_deref().filter(|r| !r.trim().is_empty()) {
            sql.push_str(" RETURNING ");
            sql.push_str(returning);
        }

        (sql, args)
    }
}
