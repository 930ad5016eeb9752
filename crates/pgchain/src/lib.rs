//! # pgchain
//!
//! Composable, parameter-safe SQL for Postgres.
//!
//! ## Features
//!
//! - **SQL explicit**: callers write SQL text; values are always bound, never spliced
//! - **Composable**: sub-selects and `EXISTS (...)` nest anywhere, with one `$1..$n`
//!   numbering across the whole statement
//! - **Immutable builders**: every clause call returns a new value, so a partial
//!   query can be reused as a base
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient` is expected
//! - **Logged execution**: wrap a client in [`Database`] to trace every statement
//!
//! ## Chains
//!
//! The [`chain`] module is the low-level layer: keyword-tagged fragments appended in
//! the order they are written.
//!
//! ```ignore
//! use pgchain::{chain, sql};
//!
//! let sub = chain::select("1")
//!     .from("comments c")
//!     .where_(sql!("c.post_id = p.id AND c.author_id = " {author_id}));
//!
//! let r = chain::select("p.id, p.title")
//!     .from("posts p")
//!     .where_(sql!("p.status = " {"published"}))
//!     .and(chain::exists(sub))
//!     .render();
//! // SELECT p.id, p.title FROM posts p WHERE (p.status = $1)
//! //   AND (EXISTS (SELECT 1 FROM comments c WHERE (c.post_id = p.id AND c.author_id = $2)))
//! ```
//!
//! ## Statement builders
//!
//! Builders collect clauses in any order and render them in canonical SQL order.
//!
//! ```ignore
//! use pgchain::{Statement, Values, delete_from, insert_into, select, sql, update};
//!
//! // SELECT
//! let posts: Vec<Post> = select("id, title")
//!     .from("posts")
//!     .where_(Values::new().set("authorId", author_id))
//!     .order_by("created_at DESC")
//!     .limit(10)
//!     .fetch_all(&client)
//!     .await?;
//!
//! // INSERT
//! insert_into("posts")
//!     .values(Values::new().set("title", "Hello").set("authorId", author_id))
//!     .returning("id")
//!     .query_one(&client)
//!     .await?;
//!
//! // UPDATE
//! update("posts")
//!     .set(Values::new().set("title", "Hello again"))
//!     .where_(sql!("id = " {post_id}))
//!     .execute(&client)
//!     .await?;
//!
//! // DELETE
//! delete_from("posts")
//!     .where_(sql!("id = " {post_id}))
//!     .execute(&client)
//!     .await?;
//! ```

pub mod builder;
pub mod chain;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod ident;
pub mod param;
pub mod row;
pub mod transaction;

pub use builder::{
    ClauseInput, DeleteQueryBuilder, InsertQueryBuilder, OnConflict, Page, SelectQueryBuilder,
    Statement, UpdateQueryBuilder, Values, delete_from, insert_into, select, update,
};
pub use chain::{Chain, Clause, Fragment, IntoSlot, Keyword, Slot, Template, merge};
pub use client::GenericClient;
pub use config::{DatabaseConfig, LogConfig, LogLevel};
pub use database::Database;
pub use error::{ChainError, ChainResult};
pub use ident::{camel_case, quote_column, quote_ident, quote_table_name, snake_case};
pub use param::{Param, Rendered};
pub use row::{FromRow, RowExt};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_manager_config, create_pool_with_tls};

// Re-exported so callers can name driver types without a direct dependency
pub use tokio_postgres;
