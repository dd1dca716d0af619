//! Statement builders.
//!
//! Each builder accumulates state through consuming setters and renders to a
//! [`BuiltStatement`] with `to_sql()`:
//!
//! ```ignore
//! use rexdb::stmt::{self, Statement};
//!
//! let built = stmt::select(["a", "b"])
//!     .from("t")
//!     .filter(col.eq(5))
//!     .limit(10)
//!     .to_sql()?;
//! // SELECT a, b FROM t WHERE t.col = $1 LIMIT 10
//!
//! stmt::insert_into("users")
//!     .columns(["name", "email"])
//!     .values(rexdb::params!["a", "a@x.com"])
//!     .returning("id")
//!     .fetch_one::<User>(&client)
//!     .await?;
//! ```
//!
//! Building is validated: a missing table, an empty SET list or a column/value
//! count mismatch is reported as [`DbError::Validation`](crate::DbError::Validation)
//! before anything is sent to the database.

mod delete;
mod insert;
mod select;
mod traits;
mod update;

pub use delete::DeleteStatement;
pub use insert::{ConflictAction, InsertStatement};
pub use select::SelectStatement;
pub use traits::{BuiltStatement, Statement};
pub use update::UpdateStatement;

/// Start a SELECT with the given selection list.
pub fn select<I, S>(columns: I) -> SelectStatement
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SelectStatement::new().select(columns)
}

/// Start an INSERT into `table`.
pub fn insert_into(table: &str) -> InsertStatement {
    InsertStatement::new().into(table)
}

/// Start an UPDATE of `table`.
pub fn update(table: &str) -> UpdateStatement {
    UpdateStatement::new().table(table)
}

/// Start a DELETE from `table`.
pub fn delete_from(table: &str) -> DeleteStatement {
    DeleteStatement::new().from(table)
}
