//! Transaction helper macro.
//!
//! Entity writes run inside a transaction that commits when the body returns
//! `Ok` and rolls back otherwise:
//!
//! ```ignore
//! use rexdb::stmt::{self, Statement};
//!
//! let post = rexdb::transaction!(client, tx, {
//!     stmt::insert_into("posts")
//!         .columns(["title"])
//!         .values(rexdb::params!["hello"])
//!         .returning("id,title,content,created_at,updated_at")
//!         .fetch_one::<Post>(&tx)
//!         .await
//! })?;
//! ```

/// Runs the given block inside a database transaction.
///
/// - Begins a transaction via `$client.transaction().await`.
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)`.
///
/// The block must evaluate to `rexdb::DbResult<T>`.
#[macro_export]
macro_rules! transaction {
    ($client:expr, $tx:ident, $body:block) => {{
        let $tx = ($client)
            .transaction()
            .await
            .map_err($crate::DbError::from_db_error)?;

        let __rexdb_tx_body_result: $crate::DbResult<_> = async { $body }.await;
        match __rexdb_tx_body_result {
            Ok(value) => {
                $tx.commit()
                    .await
                    .map_err($crate::DbError::from_db_error)?;
                Ok(value)
            }
            Err(error) => {
                $crate::__tracing::debug!(target: "rexdb.sql", %error, "rolling back transaction");
                match $tx.rollback().await {
                    Ok(()) => Err(error),
                    Err(rollback_err) => Err($crate::DbError::Other(format!(
                        "{error} (rollback failed: {rollback_err})"
                    ))),
                }
            }
        }
    }};
}
