//! Parameter storage using Arc for clone-friendly fragments and builders.

use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly bound value.
///
/// Fragments, chains and builders are immutable values that get cloned on
/// every clause call, so the payload is shared rather than copied.
#[derive(Clone)]
pub struct Param(pub(crate) Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Wrap any `ToSql` value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Borrow the value as the trait object `tokio-postgres` expects.
    pub fn as_to_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

// `ToSql: Debug`, so the bound value can describe itself.
impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// A rendered statement: SQL text with `$n` placeholders plus the values they bind.
///
/// `params[i - 1]` is the value bound to `$i`.
#[derive(Clone, Debug, Default)]
pub struct Rendered {
    pub sql: String,
    pub params: Vec<Param>,
}

impl Rendered {
    pub fn new(sql: String, params: Vec<Param>) -> Self {
        Self { sql, params }
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(Param::as_to_sql).collect()
    }

    /// Debug representation of each bound value, in placeholder order.
    pub fn params_debug(&self) -> Vec<String> {
        self.params.iter().map(|p| format!("{p:?}")).collect()
    }

    pub fn into_parts(self) -> (String, Vec<Param>) {
        (self.sql, self.params)
    }
}
