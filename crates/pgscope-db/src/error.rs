use std::time::Duration;

use thiserror::Error;

/// Why a connect attempt failed. The attempt is not retried; the
/// application keeps running disconnected.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("unable to open database connection: {0}")]
    Open(#[source] sqlx::Error),
    #[error("database connection test failed: {0}")]
    HealthCheck(#[source] sqlx::Error),
    #[error("database connection test timed out after {0:?}")]
    Timeout(Duration),
}

/// Why a query failed. Query errors never change connection state.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query failed: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("query timed out after {0:?}")]
    Timeout(Duration),
}
