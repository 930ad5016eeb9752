//! Transaction helper macro.
//!
//! Pass a transaction (`tokio_postgres::Transaction` or
//! `deadpool_postgres::Transaction`) anywhere a [`GenericClient`](crate::GenericClient)
//! is accepted; statements run inside it unchanged.
//!
//! # Example
//!
//! ```ignore
//! use pgchain::{ChainResult, Statement, Values, insert_into, sql, update};
//!
//! # async fn demo(client: &mut deadpool_postgres::Client) -> ChainResult<()> {
//! pgchain::transaction!(client, tx, {
//!     update("accounts")
//!         .set(sql!("balance = balance - " {100_i64}))
//!         .where_(sql!("id = " {1_i64}))
//!         .execute(&tx)
//!         .await?;
//!     insert_into("ledger")
//!         .values(Values::new().set("accountId", 1_i64).set("amount", -100_i64))
//!         .execute(&tx)
//!         .await?;
//!     Ok(())
//! })?;
//! # Ok(()) }
//! ```

/// Runs the given block inside a database transaction.
///
/// - Begins a transaction via `$client.transaction().await`.
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)` and returns the block's error.
///
/// The block must evaluate to `pgchain::ChainResult<T>`. A failed rollback is
/// reported as [`ChainError::Other`](crate::ChainError::Other) carrying both
/// errors.
#[macro_export]
macro_rules! transaction {
    ($client:expr, $tx:ident, $body:block) => {{
        let $tx = ($client)
            .transaction()
            .await
            .map_err($crate::ChainError::Query)?;

        let __pgchain_tx_body_result: $crate::ChainResult<_> = async { $body }.await;
        match __pgchain_tx_body_result {
            Ok(value) => {
                $tx.commit().await.map_err($crate::ChainError::Query)?;
                Ok(value)
            }
            Err(error) => match $tx.rollback().await {
                Ok(()) => Err(error),
                Err(rollback_err) => Err($crate::ChainError::Other(format!(
                    "{error} (rollback failed: {rollback_err})"
                ))),
            },
        }
    }};
}
