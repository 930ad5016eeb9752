//! A single rendered unit of a chain.

use crate::chain::Chain;
use crate::chain::template::Template;
use crate::param::Param;
use std::fmt::{self, Write};
use tokio_postgres::types::ToSql;

/// What sits between two literal pieces of a template.
#[derive(Clone, Debug)]
pub enum Slot {
    /// Bound as the next `$n` placeholder.
    Value(Param),
    /// Rendered inline, continuing the outer placeholder count.
    Chain(Chain),
}

/// Anything that can fill a template slot.
pub trait IntoSlot {
    fn into_slot(self) -> Slot;
}

impl<T: ToSql + Send + Sync + 'static> IntoSlot for T {
    fn into_slot(self) -> Slot {
        Slot::Value(Param::new(self))
    }
}

impl IntoSlot for Param {
    fn into_slot(self) -> Slot {
        Slot::Value(self)
    }
}

impl IntoSlot for Chain {
    fn into_slot(self) -> Slot {
        Slot::Chain(self)
    }
}

impl IntoSlot for &Chain {
    fn into_slot(self) -> Slot {
        Slot::Chain(self.clone())
    }
}

impl IntoSlot for Slot {
    fn into_slot(self) -> Slot {
        self
    }
}

/// Output buffer threaded through one render pass.
///
/// The next placeholder number is always `start + params.len() + 1`, so every
/// fragment and nested chain written into the same writer shares one counter.
pub(crate) struct Writer {
    start: usize,
    pub(crate) sql: String,
    pub(crate) params: Vec<Param>,
}

impl Writer {
    pub(crate) fn new(start: usize) -> Self {
        Self {
            start,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn bind(&mut self, param: &Param) {
        let idx = self.start + self.params.len() + 1;
        let _ = write!(&mut self.sql, "${idx}");
        self.params.push(param.clone());
    }
}

/// A template wrapped in optional prefix/suffix text.
///
/// Keyword text (`WHERE (`, `VALUES (` ... `)`) lives in the prefix/suffix so
/// the template only carries the caller's SQL.
#[derive(Clone, Debug)]
pub struct Fragment {
    template: Template,
    prefix: String,
    suffix: String,
}

impl Fragment {
    /// A fragment rendered exactly as its template.
    pub fn new(template: impl Into<Template>) -> Self {
        Self {
            template: template.into(),
            prefix: String::new(),
            suffix: String::new(),
        }
    }

    /// A fragment wrapped in `prefix` ... `suffix`.
    pub fn wrapped(
        template: impl Into<Template>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            template: template.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Render with placeholders numbered from `start + 1`.
    pub fn render(&self, start: usize) -> (String, Vec<Param>) {
        let mut w = Writer::new(start);
        self.write(&mut w);
        (w.sql, w.params)
    }

    pub(crate) fn write(&self, w: &mut Writer) {
        w.sql.push_str(&self.prefix);
        let slots = self.template.slots();
        for (i, piece) in self.template.pieces().iter().enumerate() {
            w.sql.push_str(piece);
            match slots.get(i) {
                Some(Slot::Value(param)) => w.bind(param),
                Some(Slot::Chain(chain)) => chain.write(w),
                None => {}
            }
        }
        w.sql.push_str(&self.suffix);
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0).0)
    }
}
