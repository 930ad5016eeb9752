use super::traits::{Statement, first_or_not_found};
use super::{ClauseInput, append_predicates, table_template};
use crate::chain::{Chain, IntoSlot, Keyword, Slot, Template, merge};
use crate::client::GenericClient;
use crate::error::ChainResult;
use crate::param::Rendered;
use crate::row::{FromRow, RowExt};

const COUNT_COLUMN: &str = "COUNT(*)::int AS \"count\"";
const DEFAULT_FIND_MESSAGE: &str = "method find returned no results";

/// One page of results plus the unpaged total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub count: i64,
}

/// SELECT builder.
///
/// Clause order is fixed: SELECT, FROM, joins (declaration order), WHERE/AND,
/// GROUP BY, HAVING, ORDER BY, LIMIT, OFFSET.
#[derive(Clone, Debug, Default)]
pub struct SelectQueryBuilder {
    columns: Vec<Template>,
    from: Option<Template>,
    joins: Vec<(Keyword, Template)>,
    predicates: Vec<Template>,
    group_by: Vec<Template>,
    having: Vec<Template>,
    order_by: Vec<Template>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl SelectQueryBuilder {
    /// An empty SELECT; renders `SELECT *` until columns are added.
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

    /// Add to the select list. Repeated calls are joined with `, `.
    pub fn select(&self, columns: impl Into<ClauseInput>) -> Self {
        let entries = columns.into().into_expressions();
        self.with(|q| q.columns.extend(entries))
    }

    /// Set the FROM source. Bare names are quoted; a template with slots
    /// (e.g. a sub-select) is used as written.
    pub fn from(&self, table: impl Into<Template>) -> Self {
        let table = table.into();
        self.with(|q| q.from = Some(table))
    }

    /// `JOIN <table> ON <cond>`, written as one template.
    pub fn join(&self, clause: impl Into<Template>) -> Self {
        self.join_with(Keyword::Join, clause.into())
    }

    pub fn left_join(&self, clause: impl Into<Template>) -> Self {
        self.join_with(Keyword::LeftJoin, clause.into())
    }

    pub fn right_join(&self, clause: impl Into<Template>) -> Self {
        self.join_with(Keyword::RightJoin, clause.into())
    }

    pub fn full_join(&self, clause: impl Into<Template>) -> Self {
        self.join_with(Keyword::FullJoin, clause.into())
    }

    fn join_with(&self, keyword: Keyword, clause: Template) -> Self {
        self.with(|q| q.joins.push((keyword, clause)))
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

    pub fn group_by(&self, columns: impl Into<ClauseInput>) -> Self {
        let entries = columns.into().into_expressions();
        self.with(|q| q.group_by.extend(entries))
    }

    /// Add HAVING predicates, ANDed like WHERE.
    pub fn having(&self, predicate: impl Into<ClauseInput>) -> Self {
        let entries = predicate.into().into_predicates();
        self.with(|q| q.having.extend(entries))
    }

    /// Add ORDER BY expressions. A nested statement is wrapped in parentheses.
    pub fn order_by(&self, expr: impl Into<ClauseInput>) -> Self {
        let entries = expr.into().into_expressions();
        self.with(|q| q.order_by.extend(entries))
    }

    /// Set the LIMIT, bound as a parameter.
    pub fn limit(&self, limit: i64) -> Self {
        self.with(|q| q.limit = Some(limit))
    }

    pub fn clear_limit(&self) -> Self {
        self.with(|q| q.limit = None)
    }

    /// Set the OFFSET, bound as a parameter.
    pub fn offset(&self, offset: i64) -> Self {
        self.with(|q| q.offset = Some(offset))
    }

    pub fn clear_offset(&self) -> Self {
        self.with(|q| q.offset = None)
    }

    // ==================== Rendering ====================

    /// FROM, joins, WHERE, GROUP BY and HAVING after `SELECT <columns>`.
    fn base_chain(&self, columns: Template) -> Chain {
        let mut chain = Chain::new().select(columns);
        if let Some(from) = &self.from {
            chain = chain.from(table_template(from));
        }
        for (keyword, clause) in &self.joins {
            chain = chain.append(*keyword, clause.clone());
        }
        chain = append_predicates(chain, Keyword::Where, &self.predicates);
        if !self.group_by.is_empty() {
            chain = chain.group_by(merge(&self.group_by, ", "));
        }
        append_predicates(chain, Keyword::Having, &self.having)
    }

    /// The full statement as a chain, for embedding or further appends.
    pub fn to_chain(&self) -> Chain {
        let columns = if self.columns.is_empty() {
            Template::new("*")
        } else {
            merge(&self.columns, ", ")
        };
        let mut chain = self.base_chain(columns);
        if !self.order_by.is_empty() {
            chain = chain.order_by(merge(&self.order_by, ", "));
        }
        if let Some(limit) = self.limit {
            chain = chain.limit(Template::empty().bind(limit));
        }
        if let Some(offset) = self.offset {
            chain = chain.offset(Template::empty().bind(offset));
        }
        chain
    }

    /// The count variant: ORDER BY, LIMIT and OFFSET are dropped.
    ///
    /// A grouped query counts its groups:
    /// `SELECT COUNT(*)::int AS "count" FROM (SELECT 1 ... GROUP BY ...) AS t`.
    pub fn to_count_chain(&self) -> Chain {
        if self.group_by.is_empty() && self.having.is_empty() {
            self.base_chain(Template::new(COUNT_COLUMN))
        } else {
            Chain::new()
                .select(COUNT_COLUMN)
                .from(self.base_chain(Template::new("1")))
                .as_("t")
        }
    }

    pub fn render_count(&self) -> Rendered {
        self.to_count_chain().render()
    }

    // ==================== Execution ====================

    /// All rows mapped to `T`.
    pub async fn list<T: FromRow>(&self, conn: &impl GenericClient) -> ChainResult<Vec<T>> {
        self.fetch_all(conn).await
    }

    /// The first row (LIMIT 1), if any.
    pub async fn first<T: FromRow>(&self, conn: &impl GenericClient) -> ChainResult<Option<T>> {
        self.limit(1).fetch_opt(conn).await
    }

    /// The first row (LIMIT 1); zero rows is `NotFound` with `message`
    /// (default `"method find returned no results"`).
    pub async fn find<T: FromRow>(
        &self,
        conn: &impl GenericClient,
        message: Option<&str>,
    ) -> ChainResult<T> {
        let rows = self.limit(1).query(conn).await?;
        let row = first_or_not_found(rows, message.unwrap_or(DEFAULT_FIND_MESSAGE))?;
        T::from_row(&row)
    }

    /// Number of rows the query matches, ignoring ORDER BY/LIMIT/OFFSET.
    pub async fn count(&self, conn: &impl GenericClient) -> ChainResult<i64> {
        let rendered = self.render_count();
        let row = conn.query_one(&rendered.sql, &rendered.params_ref()).await?;
        let count: i32 = row.try_get_column("count")?;
        Ok(i64::from(count))
    }

    /// Rows of page `page_number` (zero-based) plus the total count.
    pub async fn page<T: FromRow>(
        &self,
        conn: &impl GenericClient,
        page_number: i64,
        page_size: i64,
    ) -> ChainResult<Page<T>> {
        let (limit, offset) = page_bounds(page_number, page_size);
        let rows = self.limit(limit).offset(offset).fetch_all(conn).await?;
        let count = self.count(conn).await?;
        Ok(Page { rows, count })
    }
}

/// `(limit, offset)` for a zero-based page.
pub(crate) fn page_bounds(page_number: i64, page_size: i64) -> (i64, i64) {
    (page_size, page_number.saturating_mul(page_size))
}

impl Statement for SelectQueryBuilder {
    fn render(&self) -> Rendered {
        self.to_chain().render()
    }
}

impl IntoSlot for SelectQueryBuilder {
    fn into_slot(self) -> Slot {
        Slot::Chain(self.to_chain())
    }
}

impl IntoSlot for &SelectQueryBuilder {
    fn into_slot(self) -> Slot {
        Slot::Chain(self.to_chain())
    }
}
