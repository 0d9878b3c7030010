//! Shared types for pgscope
//!
//! This crate contains data structures used across multiple pgscope crates:
//! Kubernetes resource snapshots, query modes, tabular results, and the
//! persisted connection profile.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

pub mod profile;
pub mod store;

pub use profile::{APPLICATION_NAME, ConnectionProfile, ProfileValidationError};
pub use store::{ConfigError, ProfileStore};

// ============================================================================
// Kubernetes Resource Types
// ============================================================================

/// Namespace information
#[derive(Clone, Debug)]
pub struct NamespaceInfo {
    pub name: String,
    pub status: String,
}

impl NamespaceInfo {
    pub fn new(name: String, status: String) -> Self {
        Self { name, status }
    }
}

/// Pod information, including everything needed to locate a database
/// endpoint and its credentials without further API calls
#[derive(Clone, Debug)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub status: PodStatus,
    pub pod_ip: Option<String>,
    pub containers: Vec<ContainerInfo>,
    pub init_containers: Vec<ContainerInfo>,
    /// Secret names mounted as volumes
    pub volume_secrets: Vec<String>,
    /// Secret names referenced by imagePullSecrets
    pub image_pull_secrets: Vec<String>,
    pub created: Option<DateTime<Utc>>,
}

impl PodInfo {
    pub fn new(name: String, namespace: String) -> Self {
        Self {
            name,
            namespace,
            status: PodStatus::Unknown,
            pod_ip: None,
            containers: Vec::new(),
            init_containers: Vec::new(),
            volume_secrets: Vec::new(),
            image_pull_secrets: Vec::new(),
            created: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PodStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl From<&str> for PodStatus {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Running" => Self::Running,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl PodStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContainerInfo {
    pub name: String,
    pub image: String,
    pub ports: Vec<PortInfo>,
    pub env: Vec<EnvVarInfo>,
    /// Secret names pulled in wholesale via envFrom
    pub env_from_secrets: Vec<String>,
}

impl ContainerInfo {
    pub fn new(name: String) -> Self {
        Self {
            name,
            image: String::new(),
            ports: Vec::new(),
            env: Vec::new(),
            env_from_secrets: Vec::new(),
        }
    }
}

/// A container port declaration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortInfo {
    pub name: Option<String>,
    pub port: i32,
    pub protocol: String,
}

impl PortInfo {
    /// Display label, e.g. "pg: 5432/TCP" or "5432/TCP" for unnamed ports
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{}: {}/{}", name, self.port, self.protocol),
            None => format!("{}/{}", self.port, self.protocol),
        }
    }
}

/// A single environment variable declaration on a container
#[derive(Clone, Debug)]
pub struct EnvVarInfo {
    pub name: String,
    /// Literal value, if declared inline
    pub value: Option<String>,
    /// Secret reference, if declared via valueFrom.secretKeyRef
    pub secret_ref: Option<SecretKeyRef>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretKeyRef {
    pub secret: String,
    pub key: String,
}

/// Secret snapshot with decoded string data
#[derive(Clone, Debug)]
pub struct SecretInfo {
    pub name: String,
    pub namespace: String,
    pub kind: String,
    /// Decoded key/value pairs, ordered by key
    pub data: BTreeMap<String, String>,
    pub created: Option<DateTime<Utc>>,
}

impl SecretInfo {
    pub fn new(name: String, namespace: String) -> Self {
        Self {
            name,
            namespace,
            kind: String::new(),
            data: BTreeMap::new(),
            created: None,
        }
    }
}

// ============================================================================
// Query Types
// ============================================================================

/// The inspection surfaces the main view can show
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum QueryMode {
    #[default]
    All,
    ActiveOnly,
    Blocked,
    TableStats,
    Custom,
}

impl QueryMode {
    pub const ALL: [QueryMode; 5] = [
        Self::All,
        Self::ActiveOnly,
        Self::Blocked,
        Self::TableStats,
        Self::Custom,
    ];

    /// Display label for the mode tab
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All Sessions",
            Self::ActiveOnly => "Active Sessions",
            Self::Blocked => "Blocked Sessions",
            Self::TableStats => "Table Stats",
            Self::Custom => "Custom SQL",
        }
    }

    /// Digit key bound to this mode
    pub fn key(&self) -> char {
        match self {
            Self::All => '1',
            Self::ActiveOnly => '2',
            Self::Blocked => '3',
            Self::TableStats => '4',
            Self::Custom => '5',
        }
    }

    pub fn from_key(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == c)
    }
}

/// A generic tabular result ready for display
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a single-row table carrying an error message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            headers: vec!["Error".to_string()],
            rows: vec![vec![message.into()]],
        }
    }

    /// Build a single-column table of informational lines
    pub fn message(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            headers: vec![title.into()],
            rows: lines.into_iter().map(|l| vec![l]).collect(),
        }
    }

    /// Append a row, padding short rows with empty cells so every row
    /// matches the header count
    pub fn push_row(&mut self, mut row: Vec<String>) {
        while row.len() < self.headers.len() {
            row.push(String::new());
        }
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_label_with_name() {
        let port = PortInfo {
            name: Some("pg".to_string()),
            port: 5432,
            protocol: "TCP".to_string(),
        };
        assert_eq!(port.label(), "pg: 5432/TCP");
    }

    #[test]
    fn port_label_without_name() {
        let port = PortInfo {
            name: None,
            port: 5432,
            protocol: "TCP".to_string(),
        };
        assert_eq!(port.label(), "5432/TCP");
    }

    #[test]
    fn push_row_pads_short_rows() {
        let mut table = TableData::new(vec!["a".into(), "b".into(), "c".into()]);
        table.push_row(vec!["1".into()]);
        assert_eq!(table.rows[0], vec!["1", "", ""]);
    }

    #[test]
    fn error_table_shape() {
        let table = TableData::error("boom");
        assert_eq!(table.headers, vec!["Error"]);
        assert_eq!(table.rows, vec![vec!["boom".to_string()]]);
    }

    #[test]
    fn mode_keys_round_trip() {
        for mode in QueryMode::ALL {
            assert_eq!(QueryMode::from_key(mode.key()), Some(mode));
        }
        assert_eq!(QueryMode::from_key('6'), None);
    }
}
