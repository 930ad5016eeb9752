//! Connection pool utilities

use crate::config::DatabaseConfig;
use crate::error::{ChainError, ChainResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, PoolBuilder, RecyclingMethod};
use tokio_postgres::NoTls;
use tokio_postgres::Socket;
use tokio_postgres::tls::{MakeTlsConnect, TlsConnect};

/// Create a `NoTls` pool from a [`DatabaseConfig`].
///
/// # Example
///
/// ```ignore
/// let config = pgchain::DatabaseConfig::from_env()?;
/// let pool = pgchain::create_pool(&config)?;
/// let client = pool.get().await?;
/// ```
pub fn create_pool(config: &DatabaseConfig) -> ChainResult<Pool> {
    create_pool_with_tls(config, NoTls)
}

/// Create a pool using a custom TLS connector.
pub fn create_pool_with_tls<T>(config: &DatabaseConfig, tls: T) -> ChainResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    let max_size = config.max_connections;
    create_pool_with_manager_config(&config.url, tls, default_manager_config(), |builder| {
        builder.max_size(max_size)
    })
}

/// Create a pool with injected `deadpool_postgres::ManagerConfig` and `PoolBuilder` tuning.
pub fn create_pool_with_manager_config<T>(
    database_url: &str,
    tls: T,
    manager_config: ManagerConfig,
    configure_pool: impl FnOnce(PoolBuilder) -> PoolBuilder,
) -> ChainResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| ChainError::Connection(e.to_string()))?;

    let mgr = Manager::from_config(pg_config, tls, manager_config);
    configure_pool(Pool::builder(mgr))
        .build()
        .map_err(|e| ChainError::Pool(e.to_string()))
}

fn default_manager_config() -> ManagerConfig {
    ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    }
}
