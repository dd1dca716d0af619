//! # rexdb
//!
//! A typed SQL statement builder and a thin per-table client for PostgreSQL.
//!
//! ## Features
//!
//! - **Typed columns**: `Table`/`Column<K>` descriptors build predicates whose
//!   argument type follows the column kind
//! - **Composable clauses**: `and`, `or`, `not` over `?`-placeholder fragments
//! - **Statement builders**: SELECT / INSERT (multi-row, upsert) / UPDATE / DELETE
//! - **Rebinding**: neutral `?` placeholders rewritten to `$1, $2, ...` (or
//!   `:argN`, `@pN`) in one pass at render time
//! - **Validated rendering**: malformed builders fail with `DbError::Validation`
//!   before reaching the database
//! - **Entity clients**: `posts` find/create/update/query operations over a
//!   `tokio_postgres` connection
//!
//! ## Statements
//!
//! ```ignore
//! use rexdb::{Table, stmt::{self, Statement}};
//!
//! let users = Table::new("users");
//! let id = users.int_column("id");
//!
//! let built = stmt::update("users")
//!     .set("name", "demo")
//!     .filter(id.eq(1))
//!     .to_sql()?;
//! assert_eq!(built.sql, "UPDATE users SET name = $1 WHERE users.id = $2");
//! ```
//!
//! ## Entity client
//!
//! ```ignore
//! let mut db = rexdb::Client::connect(&rexdb::Config::from_env()?).await?;
//! let post = db
//!     .posts()
//!     .create(rexdb::PostCreateInput {
//!         title: Some("Hello".into()),
//!         ..Default::default()
//!     })
//!     .await?;
//! ```

pub mod clause;
pub mod client;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod param;
pub mod rebind;
pub mod row;
pub mod schema;
pub mod stmt;
pub mod transaction;

pub use clause::{Clause, and, not, or};
pub use client::GenericClient;
pub use config::{Config, Environment};
pub use db::Client;
pub use entity::{Post, PostClient, PostCreateInput, PostQuery, PostSchema, PostUpdateInput, Schema};
pub use error::{ConstraintKind, DbError, DbResult};
pub use param::Param;
pub use rebind::{BindType, rebind};
pub use row::{FromRow, RowExt};
pub use schema::{
    BoolColumn, Column, ColumnKind, FloatColumn, IntColumn, JsonColumn, Kind, StringColumn, Table,
    TimeColumn,
};
pub use stmt::{
    BuiltStatement, DeleteStatement, InsertStatement, SelectStatement, Statement, UpdateStatement,
};

// Used by `transaction!`.
#[doc(hidden)]
pub use tracing as __tracing;
