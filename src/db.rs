use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// How long a request waits for a free pooled connection before failing
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a connection pool against the given Postgres URL. Verifies connectivity up front so
/// the service refuses to start without a reachable database.
pub async fn connect_sqlx(db_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(db_url)
        .await
}

/// Builds a pool which does not open any connections until one is requested
#[cfg(test)]
pub fn connect_sqlx_lazy(db_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy(db_url)
}
