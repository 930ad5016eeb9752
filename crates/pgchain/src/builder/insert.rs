use super::traits::Statement;
use super::values::Values;
use super::{ClauseInput, table_template};
use crate::chain::{Chain, Fragment, Template, merge};
use crate::param::Rendered;

/// ON CONFLICT handling for INSERT.
#[derive(Clone, Debug)]
pub enum OnConflict {
    /// `ON CONFLICT <clause>`, written as given.
    Raw(Template),
    /// `ON CONFLICT [(<target>)] DO NOTHING`
    DoNothing(Option<Template>),
    /// `ON CONFLICT (<target>) DO UPDATE`, followed by the builder's SET.
    DoUpdate(Template),
}

impl OnConflict {
    fn to_template(&self) -> Template {
        match self {
            OnConflict::Raw(t) => t.clone(),
            OnConflict::DoNothing(None) => Template::new("DO NOTHING"),
            OnConflict::DoNothing(Some(target)) => parenthesized(target, " DO NOTHING"),
            OnConflict::DoUpdate(target) => parenthesized(target, " DO UPDATE"),
        }
    }
}

fn parenthesized(target: &Template, action: &str) -> Template {
    merge(
        &[Template::new("("), target.clone(), Template::new(format!("){action}"))],
        "",
    )
}

/// INSERT builder.
///
/// Renders INSERT INTO, the column list and VALUES, ON CONFLICT, SET,
/// RETURNING. SET is rendered only after [`OnConflict::DoUpdate`] or a raw
/// conflict clause; otherwise its entries are ignored.
#[derive(Clone, Debug, Default)]
pub struct InsertQueryBuilder {
    table: Option<Template>,
    values: Values,
    on_conflict: Option<OnConflict>,
    set: Vec<Template>,
    returning: Vec<Template>,
}

impl InsertQueryBuilder {
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
    pub fn insert_into(&self, table: impl Into<Template>) -> Self {
        let table = table.into();
        self.with(|q| q.table = Some(table))
    }

    /// Set the row to insert. Replaces any previous mapping.
    ///
    /// An empty mapping renders `DEFAULT VALUES`.
    pub fn values(&self, values: Values) -> Self {
        self.with(|q| q.values = values)
    }

    /// `ON CONFLICT <clause>` with caller-written SQL.
    pub fn on_conflict(&self, clause: impl Into<Template>) -> Self {
        self.on_conflict_with(OnConflict::Raw(clause.into()))
    }

    /// `ON CONFLICT [(target)] DO NOTHING`.
    pub fn on_conflict_do_nothing(&self, target: Option<Template>) -> Self {
        self.on_conflict_with(OnConflict::DoNothing(target))
    }

    /// `ON CONFLICT (target) DO UPDATE`; add assignments with [`set`](Self::set).
    pub fn on_conflict_do_update(&self, target: impl Into<Template>) -> Self {
        self.on_conflict_with(OnConflict::DoUpdate(target.into()))
    }

    pub fn on_conflict_with(&self, on_conflict: OnConflict) -> Self {
        self.with(|q| q.on_conflict = Some(on_conflict))
    }

    /// Add SET assignments for the conflict update.
    pub fn set(&self, assignments: impl Into<ClauseInput>) -> Self {
        let entries = assignments.into().into_expressions();
        self.with(|q| q.set.extend(entries))
    }

    /// Add RETURNING columns. Repeated calls are joined with `, `.
    pub fn returning(&self, columns: impl Into<ClauseInput>) -> Self {
        let entries = columns.into().into_expressions();
        self.with(|q| q.returning.extend(entries))
    }

    /// SET only follows a conflict clause that can update: `DoUpdate`, or a
    /// raw clause the caller wrote.
    fn accepts_set(&self) -> bool {
        matches!(
            self.on_conflict,
            Some(OnConflict::DoUpdate(_)) | Some(OnConflict::Raw(_))
        )
    }

    pub fn to_chain(&self) -> Chain {
        let mut chain = Chain::new();
        if let Some(table) = &self.table {
            chain = chain.insert_into(table_template(table));
        }
        chain = match self.values.insert_body() {
            Some(body) => chain.push(Fragment::new(body)),
            None => chain.push(Fragment::new("DEFAULT VALUES")),
        };
        if let Some(on_conflict) = &self.on_conflict {
            chain = chain.on_conflict(on_conflict.to_template());
        }
        if !self.set.is_empty() && self.accepts_set() {
            chain = chain.set(merge(&self.set, ", "));
        }
        if !self.returning.is_empty() {
            chain = chain.returning(merge(&self.returning, ", "));
        }
        chain
    }
}

impl Statement for InsertQueryBuilder {
    fn render(&self) -> Rendered {
        self.to_chain().render()
    }
}
