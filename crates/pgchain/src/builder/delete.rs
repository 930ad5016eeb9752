use super::traits::Statement;
use super::{ClauseInput, append_predicates, table_template};
use crate::chain::{Chain, Keyword, Template, merge};
use crate::param::Rendered;

/// DELETE builder: DELETE FROM, WHERE/AND, RETURNING.
#[derive(Clone, Debug, Default)]
pub struct DeleteQueryBuilder {
    table: Option<Template>,
    predicates: Vec<Template>,
    returning: Vec<Template>,
}

impl DeleteQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(&self, f: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        f(&mut next);
        next
    }

    /// Apply `f` only when `condition` holds.
    pub fn when(&self, condition: bool, f: impl FnOnce(&Self) -> Self) -> Self {
        if condition { f(self) } else { self.clone() }
    }

    /// Set the target table. Bare names are quoted.
    pub fn delete_from(&self, table: impl Into<Template>) -> Self {
        let table = table.into();
        self.with(|q| q.table = Some(table))
    }

    /// Add WHERE predicates. All predicates are ANDed, each in parentheses.
    pub fn where_(&self, predicate: impl Into<ClauseInput>) -> Self {
        let entries = predicate.into().into_predicates();
        self.with(|q| q.predicates.extend(entries))
    }

    /// Same as [`where_`](Self::where_).
    pub fn and(&self, predicate: impl Into<ClauseInput>) -> Self {
        self.where_(predicate)
    }

    pub fn returning(&self, columns: impl Into<ClauseInput>) -> Self {
        let entries = columns.into().into_expressions();
        self.with(|q| q.returning.extend(entries))
    }

    pub fn to_chain(&self) -> Chain {
        let mut chain = Chain::new();
        if let Some(table) = &self.table {
            chain = chain.delete_from(table_template(table));
        }
        chain = append_predicates(chain, Keyword::Where, &self.predicates);
        if !self.returning.is_empty() {
            chain = chain.returning(merge(&self.returning, ", "));
        }
        chain
    }
}

impl Statement for DeleteQueryBuilder {
    fn render(&self) -> Rendered {
        self.to_chain().render()
    }
}
