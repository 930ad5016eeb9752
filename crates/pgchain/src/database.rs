//! A logging wrapper around any [`GenericClient`].
//!
//! Every statement that goes through a [`Database`] is reported on the
//! `pgchain.sql` tracing target after it completes, with the SQL text
//! (optionally truncated), parameter count, elapsed time and either the row
//! count or the error.
//!
//! Enable via the crate feature: `pgchain = { features = ["tracing"] }`
//! (on by default). Without it the wrapper only forwards.

use crate::client::GenericClient;
use crate::config::LogConfig;
use crate::error::ChainResult;
use std::time::{Duration, Instant};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A client wrapper that logs each executed statement.
///
/// # Example
///
/// ```ignore
/// use pgchain::{Database, Statement, select, sql};
///
/// let db = Database::new(pool.get().await?);
/// let rows = select("id").from("posts").where_(sql!("id = " {1_i64})).query(&db).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database<C> {
    client: C,
    log: LogConfig,
}

impl<C: GenericClient> Database<C> {
    pub fn new(client: C) -> Self {
        Self::with_log_config(client, LogConfig::default())
    }

    pub fn with_log_config(client: C, log: LogConfig) -> Self {
        Self { client, log }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn log_config(&self) -> &LogConfig {
        &self.log
    }

    pub fn into_inner(self) -> C {
        self.client
    }

    fn report(
        &self,
        sql: &str,
        param_count: usize,
        elapsed: Duration,
        outcome: Result<u64, String>,
    ) {
        #[cfg(feature = "tracing")]
        {
            let Some(level) = self.log.level.as_tracing() else {
                return;
            };

            // Dispatch a tracing event at a runtime-determined level.
            macro_rules! emit_at_level {
                ($level:expr, $($field:tt)*) => {
                    match $level {
                        tracing::Level::ERROR => tracing::error!($($field)*),
                        tracing::Level::WARN  => tracing::warn!($($field)*),
                        tracing::Level::INFO  => tracing::info!($($field)*),
                        tracing::Level::DEBUG => tracing::debug!($($field)*),
                        tracing::Level::TRACE => tracing::trace!($($field)*),
                    }
                };
            }

            let sql = truncate_sql(sql, self.log.max_sql_length);
            let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
            match outcome {
                Ok(rows) => emit_at_level!(
                    level,
                    target: "pgchain.sql",
                    param_count,
                    elapsed_ms,
                    rows,
                    sql = %sql
                ),
                Err(error) => emit_at_level!(
                    level,
                    target: "pgchain.sql",
                    param_count,
                    elapsed_ms,
                    error = %error,
                    sql = %sql
                ),
            }
        }
        #[cfg(not(feature = "tracing"))]
        let _ = (sql, param_count, elapsed, outcome);
    }
}

impl<C: GenericClient> GenericClient for Database<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ChainResult<Vec<Row>> {
        let start = Instant::now();
        let result = self.client.query(sql, params).await;
        let outcome = match &result {
            Ok(rows) => Ok(rows.len() as u64),
            Err(e) => Err(e.to_string()),
        };
        self.report(sql, params.len(), start.elapsed(), outcome);
        result
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ChainResult<u64> {
        let start = Instant::now();
        let result = self.client.execute(sql, params).await;
        let outcome = match &result {
            Ok(n) => Ok(*n),
            Err(e) => Err(e.to_string()),
        };
        self.report(sql, params.len(), start.elapsed(), outcome);
        result
    }
}

/// `sql` cut to at most `max` bytes on a char boundary, with `...` appended
/// when something was cut.
pub(crate) fn truncate_sql(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.len() > max => {
            let mut end = max;
            while end > 0 && !sql.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &sql[..end])
        }
        _ => sql.to_string(),
    }
}
