//! Generic projection for operator-written SQL
//!
//! The result shape is unknown ahead of time, so each column is bucketed
//! into one of a closed set of kinds by the driver's type name and rendered
//! by that kind's formatter. SQL NULL renders as the literal `NULL`,
//! distinguishable from a genuinely empty string.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use pgscope_types::TableData;

use crate::connection::Database;
use crate::error::QueryError;

const CUSTOM_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Rendering of SQL NULL in every mode
pub const NULL_LITERAL: &str = "NULL";

/// How a result column is formatted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Real,
    Boolean,
    Temporal,
    Other,
}

impl ColumnKind {
    /// Bucket a driver type name. Anything unrecognized lands in `Other`
    /// and is rendered from its raw bytes.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "VARCHAR" | "TEXT" | "CHAR" | "BPCHAR" | "NAME" => Self::Text,
            "INT2" | "INT4" | "INT8" => Self::Integer,
            "FLOAT4" | "FLOAT8" | "NUMERIC" => Self::Real,
            "BOOL" => Self::Boolean,
            "TIMESTAMP" | "TIMESTAMPTZ" | "DATE" | "TIME" => Self::Temporal,
            _ => Self::Other,
        }
    }
}

pub(crate) fn format_timestamp(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M:%S").to_string()
}

fn format_cell(row: &PgRow, idx: usize, type_name: &str) -> Result<String, QueryError> {
    let raw = row.try_get_raw(idx).map_err(QueryError::Sql)?;
    if raw.is_null() {
        return Ok(NULL_LITERAL.to_string());
    }

    let cell = match ColumnKind::from_type_name(type_name) {
        ColumnKind::Text => row.try_get::<String, _>(idx)?,
        ColumnKind::Integer => match type_name {
            "INT2" => row.try_get::<i16, _>(idx)?.to_string(),
            "INT4" => row.try_get::<i32, _>(idx)?.to_string(),
            _ => row.try_get::<i64, _>(idx)?.to_string(),
        },
        ColumnKind::Real => match type_name {
            "FLOAT4" => row.try_get::<f32, _>(idx)?.to_string(),
            "FLOAT8" => row.try_get::<f64, _>(idx)?.to_string(),
            _ => row.try_get::<Decimal, _>(idx)?.to_string(),
        },
        ColumnKind::Boolean => row.try_get::<bool, _>(idx)?.to_string(),
        ColumnKind::Temporal => match type_name {
            "TIMESTAMPTZ" => {
                format_timestamp(row.try_get::<DateTime<Utc>, _>(idx)?.naive_utc())
            }
            "TIMESTAMP" => format_timestamp(row.try_get::<NaiveDateTime, _>(idx)?),
            "DATE" => format_date(row.try_get::<NaiveDate, _>(idx)?),
            _ => format_time(row.try_get::<NaiveTime, _>(idx)?),
        },
        ColumnKind::Other => match raw.as_str() {
            Ok(s) => s.to_string(),
            Err(_) => raw
                .as_bytes()
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_default(),
        },
    };

    Ok(cell)
}

/// Execute arbitrary SQL and project the result into a display table.
/// Headers come from the result columns; an empty result yields an empty
/// table.
pub async fn run_custom(db: &Database, sql: &str) -> Result<TableData, QueryError> {
    let fut = sqlx::query(sql).fetch_all(db.pool());
    let rows = match tokio::time::timeout(CUSTOM_QUERY_TIMEOUT, fut).await {
        Ok(rows) => rows?,
        Err(_) => return Err(QueryError::Timeout(CUSTOM_QUERY_TIMEOUT)),
    };

    let Some(first) = rows.first() else {
        return Ok(TableData::default());
    };

    let columns = first.columns();
    let headers: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
    let type_names: Vec<String> = columns
        .iter()
        .map(|c| c.type_info().name().to_string())
        .collect();

    let mut table = TableData::new(headers);
    for row in &rows {
        let mut cells = Vec::with_capacity(type_names.len());
        for (idx, type_name) in type_names.iter().enumerate() {
            cells.push(format_cell(row, idx, type_name)?);
        }
        table.push_row(cells);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_name_bucketing() {
        assert_eq!(ColumnKind::from_type_name("VARCHAR"), ColumnKind::Text);
        assert_eq!(ColumnKind::from_type_name("NAME"), ColumnKind::Text);
        assert_eq!(ColumnKind::from_type_name("INT8"), ColumnKind::Integer);
        assert_eq!(ColumnKind::from_type_name("NUMERIC"), ColumnKind::Real);
        assert_eq!(ColumnKind::from_type_name("BOOL"), ColumnKind::Boolean);
        assert_eq!(ColumnKind::from_type_name("TIMESTAMPTZ"), ColumnKind::Temporal);
        assert_eq!(ColumnKind::from_type_name("JSONB"), ColumnKind::Other);
        assert_eq!(ColumnKind::from_type_name("INET"), ColumnKind::Other);
    }

    #[test]
    fn timestamp_formatting() {
        let t = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap();
        assert_eq!(format_timestamp(t), "2024-03-01 09:30:05");
    }

    #[test]
    fn date_and_time_formatting() {
        let d = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(format_date(d), "2024-12-31");

        let t = NaiveTime::from_hms_opt(23, 5, 1).unwrap();
        assert_eq!(format_time(t), "23:05:01");
    }

    #[test]
    fn null_literal_is_distinguishable_from_empty() {
        assert_ne!(NULL_LITERAL, "");
    }
}
