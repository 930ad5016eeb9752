use crate::chain::Chain;
use crate::client::GenericClient;
use crate::error::{ChainError, ChainResult};
use crate::param::Rendered;
use crate::row::FromRow;
use tokio_postgres::Row;

/// A renderable, executable statement.
///
/// Every method renders once and hands the exact `(sql, params)` pair to the
/// client. Driver errors come back unchanged as [`ChainError::Query`].
pub trait Statement: Sync {
    /// Render to SQL text and ordered parameters.
    fn render(&self) -> Rendered;

    /// Debug helper.
    fn to_sql(&self) -> String {
        self.render().sql
    }

    /// Execute and return all rows.
    fn query(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = ChainResult<Vec<Row>>> + Send {
        async move {
            let rendered = self.render();
            conn.query(&rendered.sql, &rendered.params_ref()).await
        }
    }

    /// Execute and return the first row; zero rows is [`ChainError::NotFound`].
    fn query_one(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = ChainResult<Row>> + Send {
        async move {
            let rendered = self.render();
            conn.query_one(&rendered.sql, &rendered.params_ref()).await
        }
    }

    /// Execute and return the first row, if any.
    fn query_opt(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = ChainResult<Option<Row>>> + Send {
        async move {
            let rendered = self.render();
            conn.query_opt(&rendered.sql, &rendered.params_ref()).await
        }
    }

    /// Execute and map all rows to `T`.
    fn fetch_all<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = ChainResult<Vec<T>>> + Send {
        async move {
            let rows = self.query(conn).await?;
            rows.iter().map(T::from_row).collect()
        }
    }

    /// Execute and map the first row to `T`.
    fn fetch_one<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = ChainResult<T>> + Send {
        async move {
            let row = self.query_one(conn).await?;
            T::from_row(&row)
        }
    }

    /// Execute and map the first row to `T`, if any.
    fn fetch_opt<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = ChainResult<Option<T>>> + Send {
        async move {
            let row = self.query_opt(conn).await?;
            row.as_ref().map(T::from_row).transpose()
        }
    }

    /// Execute and return the affected row count.
    fn execute(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = ChainResult<u64>> + Send {
        async move {
            let rendered = self.render();
            conn.execute(&rendered.sql, &rendered.params_ref()).await
        }
    }
}

impl Statement for Chain {
    fn render(&self) -> Rendered {
        Chain::render(self)
    }
}

/// The first element, or [`ChainError::NotFound`] with `message`.
pub(crate) fn first_or_not_found<T>(rows: Vec<T>, message: &str) -> ChainResult<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| ChainError::not_found(message))
}
