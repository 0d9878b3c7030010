//! PostgreSQL side of pgscope
//!
//! This crate owns the single-connection lifecycle, the canned inspection
//! queries (sessions, locks, table sizes), and the generic projection used
//! for operator-written SQL.

mod connection;
pub mod custom;
pub mod dispatch;
mod error;

pub use connection::{ConnectionController, ConnectionState, Database};
pub use error::{ConnectError, QueryError};
