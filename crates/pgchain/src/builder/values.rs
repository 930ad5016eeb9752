//! Column/value mappings for object-shaped clause calls.

use crate::chain::Template;
use crate::ident::{quote_column, snake_case};
use crate::param::Param;
use tokio_postgres::types::ToSql;

/// An ordered column → value mapping.
///
/// Keys are written as given (`authorId`, `author_id`) and become quoted
/// snake_case columns when the mapping is rendered. An entry can be explicitly
/// unset; unset entries are dropped, so optional fields can be passed through
/// without branching:
///
/// ```ignore
/// let patch = Values::new()
///     .set("title", title)
///     .set_opt("status", status); // `None` leaves status out entirely
/// ```
#[derive(Clone, Debug, Default)]
pub struct Values {
    entries: Vec<(String, Option<Param>)>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to `key`. An `Option::None` value binds SQL NULL.
    ///
    /// Setting a column twice replaces the value but keeps the first position.
    /// Keys naming the same column (`authorId`, `author_id`) count as one.
    pub fn set<T>(self, key: &str, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.entry(key, Some(Param::new(value)))
    }

    /// Bind an already wrapped value.
    pub fn set_param(self, key: &str, value: Param) -> Self {
        self.entry(key, Some(value))
    }

    /// Bind `value` when it is `Some`, otherwise mark `key` as unset.
    pub fn set_opt<T>(self, key: &str, value: Option<T>) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.entry(key, value.map(Param::new))
    }

    /// Mark `key` as unset; it will not appear in the rendered SQL.
    pub fn unset(self, key: &str) -> Self {
        self.entry(key, None)
    }

    fn entry(mut self, key: &str, value: Option<Param>) -> Self {
        let column = snake_case(key);
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| snake_case(k) == column)
        {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key.to_string(), value)),
        }
        self
    }

    /// Entries that will be rendered, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// Number of entries that will be rendered.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True when every entry is unset (or there are none).
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// One `"column" = $n` template per rendered entry.
    pub(crate) fn assignments(&self) -> Vec<Template> {
        self.iter()
            .map(|(key, value)| {
                Template::new(format!("{} = ", quote_column(key))).bind(value.clone())
            })
            .collect()
    }

    /// `("a", "b") VALUES ($1, $2)` for INSERT, or `None` when nothing is set.
    pub(crate) fn insert_body(&self) -> Option<Template> {
        if self.is_empty() {
            return None;
        }
        let columns: Vec<String> = self.iter().map(|(key, _)| quote_column(key)).collect();
        let mut t = Template::new(format!("({}) VALUES (", columns.join(", ")));
        for (i, (_, value)) in self.iter().enumerate() {
            if i > 0 {
                t = t.push(", ");
            }
            t = t.bind(value.clone());
        }
        Some(t.push(")"))
    }
}

impl<K: AsRef<str>> FromIterator<(K, Param)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, Param)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Values::new(), |acc, (k, v)| acc.set_param(k.as_ref(), v))
    }
}
