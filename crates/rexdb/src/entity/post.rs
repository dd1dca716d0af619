//! Entity client for the `posts` table.

use crate::clause::Clause;
use crate::error::{DbError, DbResult};
use crate::param::{Param, as_refs};
use crate::row::{FromRow, RowExt};
use crate::schema::{IntColumn, StringColumn, Table, TimeColumn};
use crate::stmt::{self, InsertStatement, SelectStatement, Statement, UpdateStatement};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Descriptors for `posts`.
#[derive(Debug, Clone)]
pub struct PostSchema {
    pub table: Table,
    pub id: IntColumn,
    pub title: StringColumn,
    pub content: StringColumn,
    pub created_at: TimeColumn,
    pub updated_at: TimeColumn,
}

impl Default for PostSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl PostSchema {
    pub const TABLE: &'static str = "posts";

    /// Every column, in declaration order.
    pub const COLUMNS: [&'static str; 5] = ["id", "title", "content", "created_at", "updated_at"];

    pub fn new() -> Self {
        let table = Table::new(Self::TABLE);
        Self {
            id: table.int_column("id"),
            title: table.string_column("title"),
            content: table.string_column("content"),
            created_at: table.time_column("created_at"),
            updated_at: table.time_column("updated_at"),
            table,
        }
    }

    /// RETURNING list covering every column.
    pub fn returning(&self) -> String {
        Self::COLUMNS.join(",")
    }

    /// `SELECT posts.* FROM posts`
    pub fn select(&self) -> SelectStatement {
        stmt::select([self.table.all_columns()]).from(self.table.name())
    }

    /// Multi-row INSERT for `inputs`. Either every input carries an id or none does.
    pub fn insert_statement(
        &self,
        inputs: &[PostCreateInput],
        now: DateTime<Utc>,
    ) -> DbResult<InsertStatement> {
        let with_id = inputs.iter().filter(|i| i.id.is_some()).count();
        if with_id != 0 && with_id != inputs.len() {
            return Err(DbError::validation(
                "posts insert mixes inputs with and without an id",
            ));
        }

        let mut columns = Vec::with_capacity(Self::COLUMNS.len());
        if with_id > 0 {
            columns.push(self.id.name());
        }
        columns.extend([
            self.title.name(),
            self.content.name(),
            self.created_at.name(),
            self.updated_at.name(),
        ]);

        let mut statement = stmt::insert_into(self.table.name())
            .columns(columns)
            .returning(self.returning());

        for input in inputs {
            let mut row = Vec::with_capacity(Self::COLUMNS.len());
            if let Some(id) = input.id {
                row.push(Param::new(id));
            }
            row.push(Param::new(input.title.clone()));
            row.push(Param::new(input.content.clone()));
            row.push(Param::new(input.created_at.unwrap_or(now)));
            row.push(Param::new(input.updated_at.unwrap_or(now)));
            statement = statement.row(row);
        }

        Ok(statement)
    }

    /// INSERT ... ON CONFLICT (id) DO UPDATE for `inputs`, all of which need an id.
    pub fn upsert_statement(
        &self,
        inputs: &[PostCreateInput],
        now: DateTime<Utc>,
    ) -> DbResult<InsertStatement> {
        if inputs.iter().any(|i| i.id.is_none()) {
            return Err(DbError::validation("posts upsert requires an id on every input"));
        }
        Ok(self.insert_statement(inputs, now)?.on_conflict_do_update(
            self.id.name(),
            [self.title.name(), self.content.name(), self.updated_at.name()],
        ))
    }

    /// UPDATE of the fields set in `input`, always stamping `updated_at`.
    pub fn update_statement(&self, input: &PostUpdateInput, now: DateTime<Utc>) -> UpdateStatement {
        let mut statement = stmt::update(self.table.name());
        if let Some(title) = &input.title {
            statement = statement.set(self.title.name(), title.clone());
        }
        if let Some(content) = &input.content {
            statement = statement.set(self.content.name(), content.clone());
        }
        statement.set(self.updated_at.name(), input.updated_at.unwrap_or(now))
    }
}

/// A row of `posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow for Post {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_opt_column::<Option<String>>("title")?.flatten(),
            content: row.try_get_opt_column::<Option<String>>("content")?.flatten(),
            created_at: row.try_get_column("created_at")?,
            updated_at: row.try_get_column("updated_at")?,
        })
    }
}

/// Input for creating (or upserting) a post.
///
/// `created_at` and `updated_at` are stamped with the current time when left
/// `None`. A supplied value is written as given, which lets imports keep
/// their historical timestamps.
#[derive(Debug, Clone, Default)]
pub struct PostCreateInput {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields to change on existing posts; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PostUpdateInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Operations on `posts` over one connection.
pub struct PostClient<'a> {
    conn: &'a mut tokio_postgres::Client,
    schema: &'a PostSchema,
}

impl<'a> PostClient<'a> {
    pub fn new(conn: &'a mut tokio_postgres::Client, schema: &'a PostSchema) -> Self {
        Self { conn, schema }
    }

    /// Start a query over all posts.
    pub fn query(&self) -> PostQuery<'_> {
        PostQuery::new(&*self.conn, self.schema)
    }

    pub async fn find(&self, id: i64) -> DbResult<Option<Post>> {
        self.query().filter(self.schema.id.eq(id)).first().await
    }

    pub async fn create(&mut self, input: PostCreateInput) -> DbResult<Post> {
        let statement = self
            .schema
            .insert_statement(std::slice::from_ref(&input), Utc::now())?;
        statement.validate()?;

        crate::transaction!(self.conn, tx, { statement.fetch_one::<Post>(&tx).await })
    }

    /// Update post `id`; `NotFound` when it does not exist.
    pub async fn update(&mut self, id: i64, input: PostUpdateInput) -> DbResult<Post> {
        let statement = self
            .schema
            .update_statement(&input, Utc::now())
            .filter(self.schema.id.eq(id))
            .returning(self.schema.returning());
        statement.validate()?;

        crate::transaction!(self.conn, tx, {
            statement
                .fetch_opt::<Post>(&tx)
                .await?
                .ok_or_else(|| DbError::not_found(format!("post {id}")))
        })
    }

    /// Insert every input with one statement. Empty input is a no-op.
    pub async fn insert_all(&mut self, inputs: Vec<PostCreateInput>) -> DbResult<Vec<Post>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let statement = self.schema.insert_statement(&inputs, Utc::now())?;
        statement.validate()?;

        crate::transaction!(self.conn, tx, { statement.fetch_all::<Post>(&tx).await })
    }

    /// Insert or update one post by id.
    pub async fn upsert(&mut self, input: PostCreateInput) -> DbResult<Post> {
        let id = input.id;
        self.upsert_all(vec![input])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(format!("post {id:?}")))
    }

    /// Insert or update every input by id with one statement.
    pub async fn upsert_all(&mut self, inputs: Vec<PostCreateInput>) -> DbResult<Vec<Post>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let statement = self.schema.upsert_statement(&inputs, Utc::now())?;
        statement.validate()?;

        crate::transaction!(self.conn, tx, { statement.fetch_all::<Post>(&tx).await })
    }

    /// Delete post `id`, returning the number of rows removed.
    pub async fn delete(&self, id: i64) -> DbResult<u64> {
        stmt::delete_from(self.schema.table.name())
            .filter(self.schema.id.eq(id))
            .execute(&*self.conn)
            .await
    }

    /// Run hand-written SQL (`$n` placeholders) and decode the rows as posts.
    pub async fn raw_query(&self, sql: &str, args: &[Param]) -> DbResult<Vec<Post>> {
        tracing::debug!(target: "rexdb.sql", sql, args = ?args, "executing raw query");
        let rows = crate::client::GenericClient::query(&*self.conn, sql, &as_refs(args)).await?;
        rows.iter().map(Post::from_row).collect()
    }
}

/// A SELECT over `posts` that can also drive bulk UPDATE and DELETE.
pub struct PostQuery<'a> {
    conn: &'a tokio_postgres::Client,
    schema: &'a PostSchema,
    select: SelectStatement,
}

impl<'a> PostQuery<'a> {
    pub fn new(conn: &'a tokio_postgres::Client, schema: &'a PostSchema) -> Self {
        Self {
            conn,
            select: schema.select(),
            schema,
        }
    }

    /// Set the WHERE clause, replacing any previous one.
    pub fn filter(mut self, clause: Clause) -> Self {
        self.select = self.select.filter(clause);
        self
    }

    pub fn order(mut self, term: impl Into<String>) -> Self {
        self.select = self.select.order(term);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.select = self.select.limit(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.select = self.select.offset(offset);
        self
    }

    /// The SELECT this query will run.
    pub fn statement(&self) -> &SelectStatement {
        &self.select
    }

    pub async fn all(&self) -> DbResult<Vec<Post>> {
        self.select.fetch_all(self.conn).await
    }

    /// The first matching post, fetched with `LIMIT 1`.
    pub async fn first(self) -> DbResult<Option<Post>> {
        self.select.limit(1).fetch_opt(self.conn).await
    }

    /// The only matching post: `NotFound` when none match, `TooManyRows` when
    /// more than one does. Fetches at most two rows.
    pub async fn one(self) -> DbResult<Post> {
        let mut posts: Vec<Post> = self.select.limit(2).fetch_all(self.conn).await?;
        match posts.len() {
            0 => Err(DbError::not_found("post matching the query")),
            1 => posts
                .pop()
                .ok_or_else(|| DbError::not_found("post matching the query")),
            _ => Err(DbError::too_many_rows(1, posts.len())),
        }
    }

    /// Apply `input` to every post matching the filter. Order, limit and offset
    /// do not apply.
    pub async fn update_all(&self, input: PostUpdateInput) -> DbResult<u64> {
        let mut statement = self.schema.update_statement(&input, Utc::now());
        if let Some(clause) = self.select.where_clause() {
            statement = statement.filter(clause.clone());
        }
        statement.execute(self.conn).await
    }

    /// Delete every post matching the filter. Order, limit and offset do not apply.
    pub async fn delete_all(&self) -> DbResult<u64> {
        let mut statement = stmt::delete_from(self.schema.table.name());
        if let Some(clause) = self.select.where_clause() {
            statement = statement.filter(clause.clone());
        }
        statement.execute(self.conn).await
    }
}
