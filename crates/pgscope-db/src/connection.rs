//! Connection lifecycle
//!
//! At most one live database handle exists per process. Replacing it always
//! closes the predecessor first, so two pools never coexist. The pool is
//! deliberately small: this is an inspection tool, not an application
//! server.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};

use pgscope_types::ConnectionProfile;

use crate::error::{ConnectError, QueryError};

/// Server-side connect timeout appended to the connection string, seconds
const CONNECT_TIMEOUT_SECS: u32 = 3;
const MAX_OPEN_CONNS: u32 = 10;
const MAX_LIFETIME: Duration = Duration::from_secs(5 * 60);
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(3);
const INFO_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// A live, health-checked connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open a pool for the profile and verify it with a bounded `SELECT 1`.
    /// On any failure the pool is closed before the error is returned.
    pub async fn connect(profile: &ConnectionProfile) -> Result<Self, ConnectError> {
        let dsn = format!(
            "{}&connect_timeout={}",
            profile.connection_string(),
            CONNECT_TIMEOUT_SECS
        );

        let pool = PgPoolOptions::new()
            .max_connections(MAX_OPEN_CONNS)
            .max_lifetime(MAX_LIFETIME)
            .idle_timeout(IDLE_TIMEOUT)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy(&dsn)
            .map_err(ConnectError::Open)?;

        let check = sqlx::query("SELECT 1").execute(&pool);
        match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, check).await {
            Ok(Ok(_)) => {
                info!(
                    host = %profile.host,
                    database = %profile.database,
                    "connected"
                );
                Ok(Self { pool })
            }
            Ok(Err(e)) => {
                pool.close().await;
                Err(ConnectError::HealthCheck(e))
            }
            Err(_) => {
                pool.close().await;
                Err(ConnectError::Timeout(HEALTH_CHECK_TIMEOUT))
            }
        }
    }

    #[cfg(test)]
    fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch_scalar(&self, sql: &str) -> Result<String, QueryError> {
        let fut = sqlx::query_scalar::<_, String>(sql).fetch_one(&self.pool);
        match tokio::time::timeout(INFO_QUERY_TIMEOUT, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(QueryError::Timeout(INFO_QUERY_TIMEOUT)),
        }
    }

    /// Server version string
    pub async fn version(&self) -> Result<String, QueryError> {
        self.fetch_scalar("SELECT version()").await
    }

    /// Name of the database this pool is connected to
    pub async fn current_database(&self) -> Result<String, QueryError> {
        self.fetch_scalar("SELECT current_database()").await
    }

    /// All non-template databases, ordered by name
    pub async fn databases(&self) -> Result<Vec<String>, QueryError> {
        let fut = sqlx::query_scalar::<_, String>(
            "SELECT datname FROM pg_database WHERE datistemplate = false ORDER BY datname",
        )
        .fetch_all(&self.pool);
        match tokio::time::timeout(INFO_QUERY_TIMEOUT, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(QueryError::Timeout(INFO_QUERY_TIMEOUT)),
        }
    }
}

/// Connection lifecycle state
#[derive(Clone, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected(Database),
    Failed(String),
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::Connected(_) => "Connected",
            Self::Failed(_) => "Failed",
        }
    }
}

/// Owns the one live connection and sequences replacements
#[derive(Default)]
pub struct ConnectionController {
    state: ConnectionState,
}

impl ConnectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn database(&self) -> Option<&Database> {
        match &self.state {
            ConnectionState::Connected(db) => Some(db),
            _ => None,
        }
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self.state, ConnectionState::Connecting)
    }

    /// Enter the connecting state. Returns the previous live handle, which
    /// the caller must close before opening the replacement.
    pub fn begin_connect(&mut self) -> Option<Database> {
        let previous = std::mem::replace(&mut self.state, ConnectionState::Connecting);
        match previous {
            ConnectionState::Connected(db) => Some(db),
            _ => None,
        }
    }

    /// Record the outcome of a connect attempt
    pub fn complete(&mut self, result: Result<Database, ConnectError>) {
        self.state = match result {
            Ok(db) => ConnectionState::Connected(db),
            Err(e) => {
                debug!("connect attempt failed: {e}");
                ConnectionState::Failed(e.to_string())
            }
        };
    }

    /// Drop back to disconnected, handing the live handle (if any) to the
    /// caller for closing
    pub fn disconnect(&mut self) -> Option<Database> {
        let previous = std::mem::replace(&mut self.state, ConnectionState::Disconnected);
        match previous {
            ConnectionState::Connected(db) => Some(db),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A lazily opened pool never touches the network until used, but its
    // maintenance tasks still need a runtime
    fn offline_database() -> Database {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://u:p@127.0.0.1:1/db")
            .unwrap();
        Database::from_pool(pool)
    }

    #[test]
    fn controller_starts_disconnected() {
        let controller = ConnectionController::new();
        assert!(controller.database().is_none());
        assert_eq!(controller.state().label(), "Disconnected");
    }

    #[tokio::test]
    async fn begin_connect_hands_back_previous_handle() {
        let mut controller = ConnectionController::new();
        assert!(controller.begin_connect().is_none());
        controller.complete(Ok(offline_database()));
        assert!(controller.database().is_some());

        let previous = controller.begin_connect();
        assert!(previous.is_some());
        assert!(controller.is_connecting());
        assert!(controller.database().is_none());
    }

    #[test]
    fn failed_attempt_keeps_reason_but_no_handle() {
        let mut controller = ConnectionController::new();
        controller.begin_connect();
        controller.complete(Err(ConnectError::Timeout(HEALTH_CHECK_TIMEOUT)));

        assert!(controller.database().is_none());
        match controller.state() {
            ConnectionState::Failed(reason) => assert!(reason.contains("timed out")),
            _ => panic!("expected failed state"),
        }
    }

    #[tokio::test]
    async fn disconnect_hands_back_the_handle() {
        let mut controller = ConnectionController::new();
        controller.begin_connect();
        controller.complete(Ok(offline_database()));

        assert!(controller.disconnect().is_some());
        assert!(controller.disconnect().is_none());
    }
}
