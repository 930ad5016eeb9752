//! Keyword-tagged fragment chains.
//!
//! A [`Chain`] is an immutable sequence of [`Fragment`]s. Every keyword method
//! returns a new chain with one more fragment; the receiver is untouched, so a
//! partially built chain can be reused as a base for several statements.
//!
//! Rendering walks the fragments once, left to right, with a single running
//! placeholder counter. Nested chains (sub-selects, `EXISTS (...)`) are written
//! into the same pass, so `$n` numbering stays strictly increasing at any depth.
//!
//! # Example
//!
//! ```ignore
//! use pgchain::chain::{exists, select};
//! use pgchain::sql;
//!
//! let recent = select("1")
//!     .from("comments c")
//!     .where_(sql!("c.post_id = p.id AND c.created_at > " {since}));
//!
//! let q = select("p.id, p.title")
//!     .from("posts p")
//!     .where_(sql!("p.status = " {"published"}))
//!     .and(exists(recent))
//!     .render();
//! // SELECT p.id, p.title FROM posts p WHERE (p.status = $1)
//! //   AND (EXISTS (SELECT 1 FROM comments c WHERE (c.post_id = p.id AND c.created_at > $2)))
//! ```

mod fragment;
mod keyword;
mod merge;
mod template;


pub use fragment::{Fragment, IntoSlot, Slot};
pub use keyword::Keyword;
pub use merge::merge;
pub use template::Template;

pub(crate) use fragment::Writer;

use crate::param::{Param, Rendered};
use std::fmt;

/// Input to a keyword method: raw template text or a nested chain.
#[derive(Clone, Debug)]
pub enum Clause {
    Template(Template),
    Chain(Chain),
}

impl From<Template> for Clause {
    fn from(t: Template) -> Self {
        Clause::Template(t)
    }
}

impl From<Chain> for Clause {
    fn from(c: Chain) -> Self {
        Clause::Chain(c)
    }
}

impl From<&Chain> for Clause {
    fn from(c: &Chain) -> Self {
        Clause::Chain(c.clone())
    }
}

impl From<&str> for Clause {
    fn from(text: &str) -> Self {
        Clause::Template(Template::new(text))
    }
}

impl From<String> for Clause {
    fn from(text: String) -> Self {
        Clause::Template(Template::new(text))
    }
}

/// An ordered, immutable sequence of keyword-tagged fragments.
#[derive(Clone, Debug, Default)]
pub struct Chain {
    fragments: Vec<Fragment>,
}

impl Chain {
    /// An empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain of exactly the given fragments.
    pub fn from_fragments(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// A chain with one untagged fragment.
    pub fn from_template(template: impl Into<Template>) -> Self {
        Self {
            fragments: vec![Fragment::new(template)],
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// A new chain with `fragment` appended.
    pub fn push(&self, fragment: Fragment) -> Chain {
        let mut fragments = Vec::with_capacity(self.fragments.len() + 1);
        fragments.extend(self.fragments.iter().cloned());
        fragments.push(fragment);
        Chain { fragments }
    }

    /// A new chain with all of `other`'s fragments after this chain's.
    ///
    /// The result renders as one statement; `other`'s placeholders continue
    /// from this chain's parameter count.
    pub fn concat(&self, other: &Chain) -> Chain {
        let mut fragments = self.fragments.clone();
        fragments.extend(other.fragments.iter().cloned());
        Chain { fragments }
    }

    /// Append a keyword-tagged clause.
    ///
    /// - nested chain: `KEYWORD (<chain>)`
    /// - template, predicate keyword (WHERE/AND/HAVING): `KEYWORD (<template>)`
    /// - template, any other keyword: `KEYWORD <template>`
    pub fn append(&self, keyword: Keyword, clause: impl Into<Clause>) -> Chain {
        let kw = keyword.as_str();
        let fragment = match clause.into() {
            Clause::Chain(chain) => {
                Fragment::wrapped(Template::empty().bind(chain), format!("{kw} ("), ")")
            }
            Clause::Template(t) if keyword.wraps_parens() => {
                Fragment::wrapped(t, format!("{kw} ("), ")")
            }
            Clause::Template(t) => Fragment::wrapped(t, format!("{kw} "), ""),
        };
        self.push(fragment)
    }

    /// Apply `f` only when `condition` holds; otherwise return this chain unchanged.
    pub fn when(&self, condition: bool, f: impl FnOnce(&Chain) -> Chain) -> Chain {
        if condition { f(self) } else { self.clone() }
    }

    // ==================== Keywords ====================

    pub fn select(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::Select, clause)
    }

    pub fn from(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::From, clause)
    }

    pub fn join(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::Join, clause)
    }

    pub fn left_join(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::LeftJoin, clause)
    }

    pub fn right_join(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::RightJoin, clause)
    }

    pub fn full_join(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::FullJoin, clause)
    }

    pub fn where_(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::Where, clause)
    }

    pub fn and(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::And, clause)
    }

    pub fn or(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::Or, clause)
    }

    pub fn group_by(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::GroupBy, clause)
    }

    pub fn having(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::Having, clause)
    }

    pub fn order_by(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::OrderBy, clause)
    }

    pub fn limit(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::Limit, clause)
    }

    pub fn offset(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::Offset, clause)
    }

    pub fn insert_into(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::InsertInto, clause)
    }

    pub fn on_conflict(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::OnConflict, clause)
    }

    pub fn set(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::Set, clause)
    }

    pub fn update(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::Update, clause)
    }

    pub fn delete_from(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::DeleteFrom, clause)
    }

    pub fn returning(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::Returning, clause)
    }

    pub fn as_(&self, clause: impl Into<Clause>) -> Chain {
        self.append(Keyword::As, clause)
    }

    /// `VALUES ($1, $2, ...)`, one placeholder per value.
    pub fn values(&self, values: impl IntoIterator<Item = Param>) -> Chain {
        self.push(Fragment::wrapped(comma_list(values), "VALUES (", ")"))
    }

    /// A bare `UNION` between two selects.
    pub fn union(&self) -> Chain {
        self.push(Fragment::new(Keyword::Union.as_str()))
    }

    // ==================== Rendering ====================

    /// Render with placeholders numbered from `$1`.
    pub fn render(&self) -> Rendered {
        self.render_from(0)
    }

    /// Render with placeholders numbered from `$start + 1`.
    pub fn render_from(&self, start: usize) -> Rendered {
        let mut w = Writer::new(start);
        self.write(&mut w);
        Rendered::new(w.sql, w.params)
    }

    pub(crate) fn write(&self, w: &mut Writer) {
        for (i, fragment) in self.fragments.iter().enumerate() {
            if i > 0 {
                w.sql.push(' ');
            }
            fragment.write(w);
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render().sql)
    }
}

/// `$1, $2, ...` over the given values.
fn comma_list(values: impl IntoIterator<Item = Param>) -> Template {
    let mut t = Template::empty();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            t = t.push(", ");
        }
        t = t.bind(value);
    }
    t
}

// ==================== Chain starters ====================

/// `SELECT <clause>`
pub fn select(clause: impl Into<Clause>) -> Chain {
    Chain::new().select(clause)
}

/// `INSERT INTO <clause>`
pub fn insert_into(clause: impl Into<Clause>) -> Chain {
    Chain::new().insert_into(clause)
}

/// `UPDATE <clause>`
pub fn update(clause: impl Into<Clause>) -> Chain {
    Chain::new().update(clause)
}

/// `DELETE FROM <clause>`
pub fn delete_from(clause: impl Into<Clause>) -> Chain {
    Chain::new().delete_from(clause)
}

/// `WITH RECURSIVE <clause>`
pub fn with_recursive(clause: impl Into<Clause>) -> Chain {
    Chain::new().append(Keyword::WithRecursive, clause)
}

/// `EXISTS (<subquery>)`
///
/// Use as a predicate: `.where_(exists(sub))` renders
/// `WHERE (EXISTS (SELECT ...))`.
pub fn exists(subquery: impl Into<Clause>) -> Chain {
    let body = match subquery.into() {
        Clause::Chain(chain) => Template::empty().bind(chain),
        Clause::Template(t) => t,
    };
    Chain::from_fragments(vec![Fragment::wrapped(
        body,
        format!("{} (", Keyword::Exists),
        ")",
    )])
}
