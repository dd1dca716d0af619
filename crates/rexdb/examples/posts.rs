//! Posts walkthrough for rexdb
//!
//! Run with: cargo run --example posts -p rexdb
//!
//! Connection settings come from `REX_ENV` (development by default) or, when
//! set, `DATABASE_URL` in a .env file or the environment.

use rexdb::{Client, Config, DbError, PostCreateInput, PostUpdateInput};

#[tokio::main]
async fn main() -> Result<(), DbError> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let mut db = Client::connect(&config).await?;

    db.conn()
        .batch_execute(
            "CREATE TABLE IF NOT EXISTS posts (
                id BIGSERIAL PRIMARY KEY,
                title TEXT,
                content TEXT,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            );
            DELETE FROM posts;",
        )
        .await
        .map_err(DbError::from_db_error)?;

    let post = db
        .posts()
        .create(PostCreateInput {
            title: Some("Hello".into()),
            content: Some("First post".into()),
            ..Default::default()
        })
        .await?;
    println!("created: {post:?}");

    let post = db
        .posts()
        .update(
            post.id,
            PostUpdateInput {
                title: Some("Hello, again".into()),
                ..Default::default()
            },
        )
        .await?;
    println!("updated: {post:?}");

    db.posts()
        .insert_all(
            ["second", "third"]
                .into_iter()
                .map(|title| PostCreateInput {
                    title: Some(title.into()),
                    ..Default::default()
                })
                .collect(),
        )
        .await?;

    let schema = db.schema().posts.clone();
    let latest = db
        .posts()
        .query()
        .order(schema.id.desc())
        .limit(2)
        .all()
        .await?;
    for post in &latest {
        println!("latest: #{} {:?}", post.id, post.title);
    }

    let removed = db.posts().delete(post.id).await?;
    println!("deleted {removed} row(s)");

    Ok(())
}
