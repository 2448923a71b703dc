/// Database connection pool management
///
/// A thin wrapper over sqlx's `PgPoolOptions` that applies our defaults
/// and verifies connectivity before the pool is handed out.
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::db::pool::{create_pool, PoolConfig};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = create_pool(PoolConfig {
///     url: std::env::var("DATABASE_URL").unwrap(),
///     max_connections: 10,
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// Pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
        }
    }
}

/// Creates a PostgreSQL connection pool and health-checks it
pub async fn create_pool(config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        "Creating database connection pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.url)
        .await?;

    health_check(&pool).await?;

    info!("Database connection pool created");
    Ok(pool)
}

/// Verifies the database is reachable and responding
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_default() {
        let config = PoolConfig::default();
        assert_eq!(config.max_connections, 10);
        assert!(config.url.is_empty());
    }
}
