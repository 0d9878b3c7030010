//! Kubernetes integration for pgscope
//!
//! This crate provides the cluster gateway (namespaces, pods, secrets), the
//! cascading topology selection state machine, and credential resolution
//! from pod environment and secrets.

mod client;
pub mod credentials;
pub mod topology;

pub use client::{KubeClient, KubeError, pod_secret_names};
pub use credentials::{Credentials, is_password_key, is_username_key, resolve_pod_credentials};
pub use topology::{PortListing, TopologyError, TopologySelection};

// Re-export types that are used in our public API
pub use pgscope_types::{
    ContainerInfo, EnvVarInfo, NamespaceInfo, PodInfo, PodStatus, PortInfo, SecretInfo,
    SecretKeyRef,
};
