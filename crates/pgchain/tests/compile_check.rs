//! Compile-only tests for the execution surface.
//!
//! These tests verify that key API surfaces compile correctly.
//! They do NOT execute against a database; they only check types and signatures.

#![allow(dead_code)]

use pgchain::tokio_postgres::{Client, Row};
use pgchain::{
    ChainResult, Database, FromRow, GenericClient, Page, RowExt, Statement, Values, chain,
    delete_from, insert_into, select, sql, update,
};

#[derive(Debug, Clone)]
struct Post {
    id: i64,
    author_id: i64,
    title: String,
}

impl FromRow for Post {
    fn from_row(row: &Row) -> ChainResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            author_id: row.try_get_field("authorId")?,
            title: row.try_get_column("title")?,
        })
    }
}

fn assert_send<T: Send>(_: &T) {}

// ── Compile checks ──────────────────────────────────────────────────────────

async fn select_terminals(client: &Client) -> ChainResult<()> {
    let q = select("id, author_id, title").from("posts");

    let _: Vec<Post> = q.list(client).await?;
    let _: Option<Post> = q.first(client).await?;
    let _: Post = q.find(client, None).await?;
    let _: Post = q.find(client, Some("post not found")).await?;
    let _: i64 = q.count(client).await?;
    let _: Page<Post> = q.page(client, 0, 20).await?;

    let _: Vec<Row> = q.query(client).await?;
    let _: Row = q.query_one(client).await?;
    let _: Option<Row> = q.query_opt(client).await?;
    let _: Vec<Post> = q.fetch_all(client).await?;
    let _: Post = q.fetch_one(client).await?;
    let _: Option<Post> = q.fetch_opt(client).await?;
    Ok(())
}

async fn mutation_terminals(client: &Client) -> ChainResult<()> {
    let _: u64 = insert_into("posts")
        .values(Values::new().set("title", "hello"))
        .execute(client)
        .await?;
    let _: Row = insert_into("posts")
        .values(Values::new().set("title", "hello"))
        .returning("id")
        .query_one(client)
        .await?;
    let _: u64 = update("posts")
        .set(Values::new().set("title", "bye"))
        .where_(sql!("id = " {1_i64}))
        .execute(client)
        .await?;
    let _: Vec<Post> = delete_from("posts")
        .where_(sql!("id = " {1_i64}))
        .returning("id, author_id, title")
        .fetch_all(client)
        .await?;
    Ok(())
}

async fn raw_chain_executes(client: &Client) -> ChainResult<()> {
    let c = chain::select("1").from("posts");
    let _: Vec<Row> = c.query(client).await?;
    Ok(())
}

async fn through_database(client: Client) -> ChainResult<()> {
    let db = Database::new(client);
    let _: Vec<Post> = select("*").from("posts").list(&db).await?;
    let _ = db.execute("SELECT 1", &[]).await?;
    Ok(())
}

async fn inside_transaction(client: &mut Client) -> ChainResult<()> {
    pgchain::transaction!(client, tx, {
        update("accounts")
            .set(sql!("balance = balance - " {10_i64}))
            .where_(sql!("id = " {1_i64}))
            .execute(&tx)
            .await?;
        Ok(())
    })
}

#[cfg(feature = "pool")]
async fn pooled(pool: &deadpool_postgres::Pool) -> ChainResult<()> {
    let mut client = pool.get().await?;
    let _: Vec<Post> = select("*").from("posts").list(&client).await?;

    pgchain::transaction!(client, tx, {
        let _: Vec<Post> = select("*").from("posts").list(&tx).await?;
        Ok(())
    })
}

fn generic_over_client<C: GenericClient>(conn: &C) -> impl std::future::Future + Send + '_ {
    async move { select("*").from("posts").query(conn).await }
}

#[test]
fn futures_are_send() {
    let _ = |client: &'static Client| {
        let q = select("*").from("posts").where_(sql!("id = " {1_i64}));
        let fut = q.query(client);
        assert_send(&fut);
    };
}

#[test]
fn rendering_needs_no_client() {
    let r = select("id").from("posts").where_(sql!("id = " {1_i64})).render();
    assert_eq!(r.sql, "SELECT id FROM \"posts\" WHERE (id = $1)");
    assert_eq!(r.params_ref().len(), 1);
}
