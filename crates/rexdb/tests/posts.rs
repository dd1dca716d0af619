//! Round-trips through the posts entity client against a live database.
//!
//! Skipped unless `DATABASE_URL` is set. Each test works on a session-local
//! `TEMP` table named `posts`, so nothing persists.

use rexdb::schema::Table;
use rexdb::stmt::Statement;
use rexdb::{
    Client, ConstraintKind, DbError, DbResult, PostCreateInput, PostUpdateInput, Schema, params,
};
use tokio_postgres::NoTls;

async fn connect(test: &str) -> DbResult<Option<Client>> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            return Ok(None);
        }
    };

    let (conn, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .map_err(DbError::from_db_error)?;
    tokio::spawn(async move {
        let _ = connection.await;
    });

    conn.batch_execute(
        "CREATE TEMP TABLE posts (
            id BIGSERIAL PRIMARY KEY,
            title TEXT CONSTRAINT posts_title_allowed CHECK (title <> 'forbidden'),
            content TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )",
    )
    .await
    .map_err(DbError::from_db_error)?;

    Ok(Some(Client::new(conn, Schema::new())))
}

fn titled(title: &str) -> PostCreateInput {
    PostCreateInput {
        title: Some(title.to_string()),
        content: Some(format!("{title} body")),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_find_update_delete() -> DbResult<()> {
    let Some(mut db) = connect("create_find_update_delete").await? else {
        return Ok(());
    };

    let created = db.posts().create(titled("first")).await?;
    assert_eq!(created.title.as_deref(), Some("first"));
    assert_eq!(created.created_at, created.updated_at);

    let found = db.posts().find(created.id).await?;
    assert_eq!(found.as_ref(), Some(&created));

    let updated = db
        .posts()
        .update(
            created.id,
            PostUpdateInput {
                title: Some("renamed".into()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.title.as_deref(), Some("renamed"));
    assert_eq!(updated.content, created.content);
    assert!(updated.updated_at >= created.updated_at);

    assert_eq!(db.posts().delete(created.id).await?, 1);
    assert_eq!(db.posts().find(created.id).await?, None);
    Ok(())
}

#[tokio::test]
async fn update_missing_post_is_not_found() -> DbResult<()> {
    let Some(mut db) = connect("update_missing_post_is_not_found").await? else {
        return Ok(());
    };

    let err = db
        .posts()
        .update(424_242, PostUpdateInput::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn query_paginates_and_bulk_writes() -> DbResult<()> {
    let Some(mut db) = connect("query_paginates_and_bulk_writes").await? else {
        return Ok(());
    };

    let inserted = db
        .posts()
        .insert_all(vec![titled("a"), titled("b"), titled("c"), titled("d")])
        .await?;
    assert_eq!(inserted.len(), 4);
    assert!(db.posts().insert_all(Vec::new()).await?.is_empty());

    let schema = db.schema().posts.clone();
    let posts = db.posts();

    let page = posts
        .query()
        .order(schema.id.asc())
        .limit(2)
        .offset(1)
        .all()
        .await?;
    let titles: Vec<_> = page.iter().map(|p| p.title.clone().unwrap_or_default()).collect();
    assert_eq!(titles, ["b", "c"]);

    let first = posts
        .query()
        .filter(schema.title.eq("d"))
        .first()
        .await?
        .expect("post d exists");
    assert_eq!(first.title.as_deref(), Some("d"));

    let changed = posts
        .query()
        .filter(rexdb::or([schema.title.eq("a"), schema.title.eq("b")]))
        .update_all(PostUpdateInput {
            content: Some("bulk".into()),
            ..Default::default()
        })
        .await?;
    assert_eq!(changed, 2);

    let removed = posts
        .query()
        .filter(schema.content.eq("bulk"))
        .delete_all()
        .await?;
    assert_eq!(removed, 2);
    assert_eq!(posts.query().all().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn upsert_inserts_then_updates() -> DbResult<()> {
    let Some(mut db) = connect("upsert_inserts_then_updates").await? else {
        return Ok(());
    };

    let mut input = titled("v1");
    input.id = Some(900);
    let first = db.posts().upsert(input.clone()).await?;
    assert_eq!(first.id, 900);

    input.title = Some("v2".into());
    let second = db.posts().upsert(input).await?;
    assert_eq!(second.id, 900);
    assert_eq!(second.title.as_deref(), Some("v2"));
    assert_eq!(second.created_at, first.created_at);

    let err = db.posts().upsert(titled("no id")).await.unwrap_err();
    assert!(err.is_validation());
    Ok(())
}

#[tokio::test]
async fn raw_query_and_generic_statements() -> DbResult<()> {
    let Some(mut db) = connect("raw_query_and_generic_statements").await? else {
        return Ok(());
    };

    db.posts().create(titled("raw")).await?;

    let rows = db
        .posts()
        .raw_query("SELECT id, title, created_at, updated_at FROM posts WHERE title = $1", &params!["raw"])
        .await?;
    assert_eq!(rows.len(), 1);
    // `content` was not selected; name-based decoding leaves it empty.
    assert_eq!(rows[0].content, None);

    let posts = Table::new("posts");
    let title = posts.string_column("title");
    let count = rexdb::stmt::delete_from("posts")
        .filter(title.eq("raw"))
        .execute(db.conn())
        .await?;
    assert_eq!(count, 1);
    Ok(())
}

#[tokio::test]
async fn failed_batch_rolls_back_every_row() -> DbResult<()> {
    let Some(mut db) = connect("failed_batch_rolls_back_every_row").await? else {
        return Ok(());
    };

    let err = db
        .posts()
        .insert_all(vec![titled("fine"), titled("forbidden")])
        .await
        .unwrap_err();
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::Check));
    assert!(matches!(
        &err,
        DbError::Constraint { constraint, .. } if constraint == "posts_title_allowed"
    ));
    assert!(db.posts().query().all().await?.is_empty());

    let err = db.posts().create(titled("forbidden")).await.unwrap_err();
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::Check));
    assert!(db.posts().query().all().await?.is_empty());

    // The connection is usable again after the rollback.
    let post = db.posts().create(titled("after")).await?;
    assert_eq!(post.title.as_deref(), Some("after"));
    Ok(())
}

#[tokio::test]
async fn failed_update_keeps_the_row() -> DbResult<()> {
    let Some(mut db) = connect("failed_update_keeps_the_row").await? else {
        return Ok(());
    };

    let created = db.posts().create(titled("kept")).await?;
    let err = db
        .posts()
        .update(
            created.id,
            PostUpdateInput {
                title: Some("forbidden".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::Check));

    let found = db.posts().find(created.id).await?;
    assert_eq!(found, Some(created));
    Ok(())
}

#[tokio::test]
async fn one_requires_exactly_one_match() -> DbResult<()> {
    let Some(mut db) = connect("one_requires_exactly_one_match").await? else {
        return Ok(());
    };

    db.posts()
        .insert_all(vec![titled("solo"), titled("twin"), titled("twin")])
        .await?;
    let schema = db.schema().posts.clone();
    let posts = db.posts();

    let solo = posts.query().filter(schema.title.eq("solo")).one().await?;
    assert_eq!(solo.title.as_deref(), Some("solo"));

    let err = posts
        .query()
        .filter(schema.title.eq("twin"))
        .one()
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::TooManyRows { expected: 1, got: 2 }));

    let err = posts
        .query()
        .filter(schema.title.eq("missing"))
        .one()
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}
