//! Connection owner and entry point to the entity clients.

use crate::config::Config;
use crate::entity::{PostClient, Schema};
use crate::error::{DbError, DbResult};
use tokio_postgres::NoTls;

/// A database connection together with the schema registry.
///
/// # Example
///
/// ```ignore
/// let mut db = rexdb::Client::connect(&rexdb::Config::from_env()?).await?;
/// let post = db.posts().find(1).await?;
/// ```
pub struct Client {
    conn: tokio_postgres::Client,
    schema: Schema,
}

impl Client {
    /// Wrap an established connection.
    pub fn new(conn: tokio_postgres::Client, schema: Schema) -> Self {
        Self { conn, schema }
    }

    /// Connect using `config` and drive the connection on the tokio runtime.
    pub async fn connect(config: &Config) -> DbResult<Self> {
        let conn_str = config.connection_string()?;
        let (conn, connection) = tokio_postgres::connect(&conn_str, NoTls)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(target: "rexdb", error = %e, "postgres connection error");
            }
        });

        tracing::debug!(target: "rexdb", environment = %config.environment, "connected");
        Ok(Self::new(conn, Schema::new()))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The underlying connection, for statements built by hand.
    pub fn conn(&self) -> &tokio_postgres::Client {
        &self.conn
    }

    pub fn posts(&mut self) -> PostClient<'_> {
        PostClient::new(&mut self.conn, &self.schema.posts)
    }
}
