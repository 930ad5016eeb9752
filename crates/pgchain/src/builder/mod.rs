//! Statement builders.
//!
//! Each builder is an immutable value holding one slot per clause. Clause
//! methods take `&self` and return a new builder, so a partially built query
//! can serve as the base for several variants:
//!
//! ```ignore
//! use pgchain::{select, sql, Values};
//!
//! let posts = select("id, title").from("posts");
//! let mine = posts.where_(Values::new().set("authorId", user_id));
//! let recent = posts.where_(sql!("created_at > " {since})).order_by("created_at DESC");
//! ```
//!
//! Rendering assembles a [`Chain`] in a fixed clause order and renders it in a
//! single pass, so placeholders are always numbered `$1..$n` left to right.
//!
//! ## Clause input
//!
//! Clause methods accept anything convertible to [`ClauseInput`]:
//!
//! - raw SQL text or a [`Template`] (`sql!("id = " {id})`)
//! - a [`Values`] mapping, expanded to one `"column" = $n` entry per key
//! - a [`Chain`] or another builder, embedded as a sub-statement

pub mod delete;
pub mod insert;
pub mod select;
pub mod traits;
pub mod update;
pub mod values;

pub use delete::DeleteQueryBuilder;
pub use insert::{InsertQueryBuilder, OnConflict};
pub use select::{Page, SelectQueryBuilder};
pub use traits::Statement;
pub use update::UpdateQueryBuilder;
pub use values::Values;

use crate::chain::{Chain, Keyword, Template};
use crate::ident::quote_table_name;

#[cfg(test)]
mod tests;

/// One clause argument: raw template, column mapping, or nested statement.
#[derive(Clone, Debug)]
pub enum ClauseInput {
    Template(Template),
    Values(Values),
    Chain(Chain),
}

impl ClauseInput {
    /// Normalize into WHERE/HAVING entries.
    ///
    /// A mapping yields one `"column" = $n` entry per rendered key. A nested
    /// statement is inlined; the predicate keyword supplies the parentheses.
    pub(crate) fn into_predicates(self) -> Vec<Template> {
        match self {
            ClauseInput::Template(t) => vec![t],
            ClauseInput::Values(v) => v.assignments(),
            ClauseInput::Chain(c) => vec![Template::empty().bind(c)],
        }
    }

    /// Normalize into list entries (columns, SET, ORDER BY, RETURNING).
    ///
    /// Same as [`into_predicates`](Self::into_predicates) except that a nested
    /// statement is wrapped in parentheses.
    pub(crate) fn into_expressions(self) -> Vec<Template> {
        match self {
            ClauseInput::Chain(c) => vec![Template::new("(").bind(c).push(")")],
            other => other.into_predicates(),
        }
    }
}

impl From<Template> for ClauseInput {
    fn from(t: Template) -> Self {
        ClauseInput::Template(t)
    }
}

impl From<&str> for ClauseInput {
    fn from(text: &str) -> Self {
        ClauseInput::Template(Template::new(text))
    }
}

impl From<String> for ClauseInput {
    fn from(text: String) -> Self {
        ClauseInput::Template(Template::new(text))
    }
}

impl From<Values> for ClauseInput {
    fn from(v: Values) -> Self {
        ClauseInput::Values(v)
    }
}

impl From<Chain> for ClauseInput {
    fn from(c: Chain) -> Self {
        ClauseInput::Chain(c)
    }
}

impl From<&Chain> for ClauseInput {
    fn from(c: &Chain) -> Self {
        ClauseInput::Chain(c.clone())
    }
}

impl From<SelectQueryBuilder> for ClauseInput {
    fn from(q: SelectQueryBuilder) -> Self {
        ClauseInput::Chain(q.to_chain())
    }
}

impl From<&SelectQueryBuilder> for ClauseInput {
    fn from(q: &SelectQueryBuilder) -> Self {
        ClauseInput::Chain(q.to_chain())
    }
}

// ==================== Entry points ====================

/// Start a SELECT with the given column list.
pub fn select(columns: impl Into<ClauseInput>) -> SelectQueryBuilder {
    SelectQueryBuilder::new().select(columns)
}

/// Start an INSERT into `table`.
pub fn insert_into(table: impl Into<Template>) -> InsertQueryBuilder {
    InsertQueryBuilder::new().insert_into(table)
}

/// Start an UPDATE of `table`.
pub fn update(table: impl Into<Template>) -> UpdateQueryBuilder {
    UpdateQueryBuilder::new().update(table)
}

/// Start a DELETE from `table`.
pub fn delete_from(table: impl Into<Template>) -> DeleteQueryBuilder {
    DeleteQueryBuilder::new().delete_from(table)
}

// ==================== Shared rendering ====================

/// A table template with bare names quoted.
///
/// Plain text goes through [`quote_table_name`]; a template with slots is
/// taken as written.
pub(crate) fn table_template(table: &Template) -> Template {
    match table.as_text() {
        Some(name) => Template::new(quote_table_name(name)),
        None => table.clone(),
    }
}

/// `first (p1) AND (p2) ...`, or the chain unchanged when there are none.
pub(crate) fn append_predicates(chain: Chain, first: Keyword, predicates: &[Template]) -> Chain {
    predicates
        .iter()
        .enumerate()
        .fold(chain, |chain, (i, p)| {
            let keyword = if i == 0 { first } else { Keyword::And };
            chain.append(keyword, p.clone())
        })
}
