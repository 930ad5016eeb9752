//! Row mapping traits and utilities

use crate::error::{ChainError, ChainResult};
use crate::ident::{camel_case, snake_case};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// Trait for converting a database row into a Rust struct.
///
/// # Example
///
/// ```ignore
/// use pgchain::{FromRow, RowExt, ChainResult};
///
/// struct Post {
///     id: i64,
///     author_id: i64,
///     title: String,
/// }
///
/// impl FromRow for Post {
///     fn from_row(row: &tokio_postgres::Row) -> ChainResult<Self> {
///         Ok(Self {
///             id: row.try_get_column("id")?,
///             author_id: row.try_get_field("authorId")?,
///             title: row.try_get_column("title")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> ChainResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> ChainResult<Self> {
        Ok(row.clone())
    }
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning [`ChainError::Decode`] on failure
    fn try_get_column<T>(&self, column: &str) -> ChainResult<T>
    where
        T: for<'a> FromSql<'a>;

    /// Get a value by camelCase field name (`authorId` reads column `author_id`).
    fn try_get_field<T>(&self, field: &str) -> ChainResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get_column(&snake_case(field))
    }

    /// Column names of this row, camelCased, in column order.
    fn camel_columns(&self) -> Vec<String>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> ChainResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| ChainError::decode(column, e.to_string()))
    }

    fn camel_columns(&self) -> Vec<String> {
        self.columns().iter().map(|c| camel_case(c.name())).collect()
    }
}
