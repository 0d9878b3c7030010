//! Mode-to-query dispatch
//!
//! Each inspection mode maps to a fixed, parameter-free query and a fixed
//! header set. The tool's own backend is excluded from session listings via
//! pg_backend_pid().

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use pgscope_types::{QueryMode, TableData};

use crate::connection::Database;
use crate::error::QueryError;

const CANNED_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

pub const SESSION_HEADERS: [&str; 8] = [
    "PID",
    "User",
    "Database",
    "Client Address",
    "Application Name",
    "Start Time",
    "State",
    "Query",
];

pub const TABLE_STAT_HEADERS: [&str; 6] = [
    "Schema",
    "Table Name",
    "Total Size",
    "Table Size",
    "Index Size",
    "Total Rows",
];

const ALL_SESSIONS_SQL: &str = "\
SELECT pid, usename, datname, client_addr::text AS client_addr, application_name, \
       backend_start, state, query \
FROM pg_stat_activity \
WHERE pid <> pg_backend_pid() \
ORDER BY backend_start DESC";

const ACTIVE_SESSIONS_SQL: &str = "\
SELECT pid, usename, datname, client_addr::text AS client_addr, application_name, \
       backend_start, state, query \
FROM pg_stat_activity \
WHERE pid <> pg_backend_pid() AND state = 'active' \
ORDER BY backend_start DESC";

// A blocked session's ungranted lock row is joined back to the granted lock
// on the same transactionid held by a different backend
const BLOCKED_SESSIONS_SQL: &str = "\
SELECT blocked_activity.pid, \
       blocked_activity.usename, \
       blocked_activity.datname, \
       blocked_activity.client_addr::text AS client_addr, \
       blocked_activity.application_name, \
       blocked_activity.backend_start, \
       blocked_activity.state, \
       blocked_activity.query \
FROM pg_stat_activity blocked_activity \
JOIN pg_locks blocked_locks ON blocked_activity.pid = blocked_locks.pid \
JOIN pg_locks blocking_locks \
  ON blocked_locks.transactionid = blocking_locks.transactionid \
 AND blocked_locks.pid != blocking_locks.pid \
JOIN pg_stat_activity blocking_activity ON blocking_activity.pid = blocking_locks.pid \
WHERE NOT blocked_locks.granted \
ORDER BY blocked_activity.backend_start DESC";

const TABLE_STATS_SQL: &str = "\
SELECT n.nspname AS schema, \
       c.relname AS name, \
       pg_size_pretty(pg_total_relation_size(c.oid)) AS total_size, \
       pg_size_pretty(pg_relation_size(c.oid)) AS table_size, \
       pg_size_pretty(pg_indexes_size(c.oid)) AS index_size, \
       c.reltuples::bigint AS row_count \
FROM pg_class c \
LEFT JOIN pg_namespace n ON n.oid = c.relnamespace \
WHERE c.relkind = 'r' \
  AND n.nspname NOT IN ('pg_catalog', 'information_schema') \
ORDER BY pg_total_relation_size(c.oid) DESC \
LIMIT 100";

#[derive(FromRow)]
struct SessionRow {
    pid: i32,
    usename: Option<String>,
    datname: Option<String>,
    client_addr: Option<String>,
    application_name: Option<String>,
    backend_start: Option<DateTime<Utc>>,
    state: Option<String>,
    query: Option<String>,
}

#[derive(FromRow)]
struct TableStatRow {
    schema: Option<String>,
    name: String,
    total_size: String,
    table_size: String,
    index_size: String,
    row_count: i64,
}

fn format_start_time(start: Option<DateTime<Utc>>) -> String {
    start
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

impl SessionRow {
    fn into_cells(self) -> Vec<String> {
        vec![
            self.pid.to_string(),
            self.usename.unwrap_or_default(),
            self.datname.unwrap_or_default(),
            self.client_addr.unwrap_or_default(),
            self.application_name.unwrap_or_default(),
            format_start_time(self.backend_start),
            self.state.unwrap_or_default(),
            self.query.unwrap_or_default(),
        ]
    }
}

impl TableStatRow {
    fn into_cells(self) -> Vec<String> {
        vec![
            self.schema.unwrap_or_default(),
            self.name,
            self.total_size,
            self.table_size,
            self.index_size,
            self.row_count.to_string(),
        ]
    }
}

async fn bounded_fetch<T>(
    fut: impl Future<Output = Result<Vec<T>, sqlx::Error>>,
) -> Result<Vec<T>, QueryError> {
    match tokio::time::timeout(CANNED_QUERY_TIMEOUT, fut).await {
        Ok(rows) => Ok(rows?),
        Err(_) => Err(QueryError::Timeout(CANNED_QUERY_TIMEOUT)),
    }
}

async fn sessions(db: &Database, sql: &str) -> Result<TableData, QueryError> {
    let rows = bounded_fetch(sqlx::query_as::<_, SessionRow>(sql).fetch_all(db.pool())).await?;

    let mut table = TableData::new(SESSION_HEADERS.iter().map(|h| h.to_string()).collect());
    for row in rows {
        table.push_row(row.into_cells());
    }
    Ok(table)
}

async fn table_stats(db: &Database) -> Result<TableData, QueryError> {
    let rows = bounded_fetch(
        sqlx::query_as::<_, TableStatRow>(TABLE_STATS_SQL).fetch_all(db.pool()),
    )
    .await?;

    let mut table = TableData::new(TABLE_STAT_HEADERS.iter().map(|h| h.to_string()).collect());
    for row in rows {
        table.push_row(row.into_cells());
    }
    Ok(table)
}

/// Hint shown when the custom mode is selected before any SQL has been run
pub fn custom_hint() -> TableData {
    TableData::message(
        "Custom SQL".to_string(),
        vec![
            "Type a query and press Enter to execute it.".to_string(),
            "Sessions opened by this tool are read-only.".to_string(),
        ],
    )
}

/// Run the canned query for a mode and shape its result for display
pub async fn dispatch(db: &Database, mode: QueryMode) -> Result<TableData, QueryError> {
    match mode {
        QueryMode::All => sessions(db, ALL_SESSIONS_SQL).await,
        QueryMode::ActiveOnly => sessions(db, ACTIVE_SESSIONS_SQL).await,
        QueryMode::Blocked => sessions(db, BLOCKED_SESSIONS_SQL).await,
        QueryMode::TableStats => table_stats(db).await,
        QueryMode::Custom => Ok(custom_hint()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_queries_exclude_own_backend() {
        for sql in [ALL_SESSIONS_SQL, ACTIVE_SESSIONS_SQL] {
            assert!(sql.contains("pid <> pg_backend_pid()"));
            assert!(sql.contains("ORDER BY backend_start DESC"));
        }
    }

    #[test]
    fn only_active_mode_filters_on_state() {
        assert!(!ALL_SESSIONS_SQL.contains("state = 'active'"));
        assert!(ACTIVE_SESSIONS_SQL.contains("state = 'active'"));
    }

    #[test]
    fn blocked_query_matches_only_ungranted_locks() {
        assert!(BLOCKED_SESSIONS_SQL.contains("WHERE NOT blocked_locks.granted"));
        assert!(
            BLOCKED_SESSIONS_SQL
                .contains("blocked_locks.transactionid = blocking_locks.transactionid")
        );
        assert!(BLOCKED_SESSIONS_SQL.contains("blocked_locks.pid != blocking_locks.pid"));
    }

    #[test]
    fn table_stats_query_is_bounded_to_user_tables() {
        assert!(TABLE_STATS_SQL.contains("relkind = 'r'"));
        assert!(TABLE_STATS_SQL.contains("NOT IN ('pg_catalog', 'information_schema')"));
        assert!(TABLE_STATS_SQL.contains("LIMIT 100"));
    }

    #[test]
    fn session_cells_match_headers() {
        let row = SessionRow {
            pid: 42,
            usename: Some("app".into()),
            datname: None,
            client_addr: Some("10.0.0.9".into()),
            application_name: None,
            backend_start: None,
            state: Some("idle".into()),
            query: None,
        };
        let cells = row.into_cells();
        assert_eq!(cells.len(), SESSION_HEADERS.len());
        assert_eq!(cells[0], "42");
        // SQL NULLs in canned views render as empty cells
        assert_eq!(cells[2], "");
        assert_eq!(cells[5], "");
    }

    #[test]
    fn start_time_format() {
        let t = DateTime::parse_from_rfc3339("2024-03-01T09:30:05Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_start_time(Some(t)), "2024-03-01 09:30:05");
    }
}
