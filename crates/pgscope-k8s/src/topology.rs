//! Cascading topology selection
//!
//! Tracks the operator's walk down the cluster hierarchy: namespace, pod,
//! container, port, secret, secret key. Selecting at one level invalidates
//! every dependent level below it so the UI can never show a pod from one
//! namespace next to secrets from another. Selections are held as indices
//! into the current snapshots; a stale index reads back as "nothing
//! selected".

use thiserror::Error;

use pgscope_types::{ContainerInfo, PodInfo, PortInfo, SecretInfo};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("selection index {0} is out of range")]
    IndexOutOfRange(usize),
    #[error("no pod is selected")]
    NoPodSelected,
    #[error("no container is selected")]
    NoContainerSelected,
    #[error("selected container exposes no ports")]
    NoExposedPorts,
    #[error("no secret is selected")]
    NoSecretSelected,
    #[error("secret has no key named {0:?}")]
    UnknownSecretKey(String),
}

/// What the port dropdown should show for the current selection
#[derive(Debug, PartialEq, Eq)]
pub enum PortListing<'a> {
    /// No container selected yet
    NoneSelected,
    /// Container selected but declares no ports
    NoExposedPorts,
    Exposed(&'a [PortInfo]),
}

/// The topology selection state machine
#[derive(Default)]
pub struct TopologySelection {
    namespace: Option<String>,
    pods: Vec<PodInfo>,
    pod_idx: Option<usize>,
    container_idx: Option<usize>,
    secrets: Vec<SecretInfo>,
    secret_idx: Option<usize>,
    secret_key: Option<String>,
}

impl TopologySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose a namespace. Everything below it is invalidated.
    pub fn select_namespace(&mut self, namespace: String) {
        self.namespace = Some(namespace);
        self.pods.clear();
        self.pod_idx = None;
        self.container_idx = None;
        self.secrets.clear();
        self.secret_idx = None;
        self.secret_key = None;
    }

    /// Install a fresh pod snapshot for the current namespace. Clears the
    /// pod and container selection; a snapshot of exactly one pod is
    /// selected automatically.
    pub fn set_pods(&mut self, pods: Vec<PodInfo>) {
        self.pods = pods;
        self.pod_idx = None;
        self.container_idx = None;
        if self.pods.len() == 1 {
            // Sole candidate, no choice to make
            let _ = self.select_pod(0);
        }
    }

    /// Choose a pod by index. The container selection is cleared and the
    /// first container auto-selected. Secrets and credentials entered by
    /// hand are deliberately left alone.
    pub fn select_pod(&mut self, idx: usize) -> Result<(), TopologyError> {
        if idx >= self.pods.len() {
            return Err(TopologyError::IndexOutOfRange(idx));
        }
        self.pod_idx = Some(idx);
        self.container_idx = if self.pods[idx].containers.is_empty() {
            None
        } else {
            Some(0)
        };
        Ok(())
    }

    /// Choose a container of the selected pod by index
    pub fn select_container(&mut self, idx: usize) -> Result<(), TopologyError> {
        let pod = self.selected_pod().ok_or(TopologyError::NoPodSelected)?;
        if idx >= pod.containers.len() {
            return Err(TopologyError::IndexOutOfRange(idx));
        }
        self.container_idx = Some(idx);
        Ok(())
    }

    /// Install a fresh secret snapshot. Clears the secret selection.
    pub fn set_secrets(&mut self, secrets: Vec<SecretInfo>) {
        self.secrets = secrets;
        self.secret_idx = None;
        self.secret_key = None;
    }

    /// Choose a secret by index; its first key is auto-selected
    pub fn select_secret(&mut self, idx: usize) -> Result<(), TopologyError> {
        if idx >= self.secrets.len() {
            return Err(TopologyError::IndexOutOfRange(idx));
        }
        self.secret_idx = Some(idx);
        self.secret_key = self.secrets[idx].data.keys().next().cloned();
        Ok(())
    }

    /// Choose a key of the selected secret
    pub fn select_secret_key(&mut self, key: &str) -> Result<(), TopologyError> {
        let secret = self
            .selected_secret()
            .ok_or(TopologyError::NoSecretSelected)?;
        if !secret.data.contains_key(key) {
            return Err(TopologyError::UnknownSecretKey(key.to_string()));
        }
        self.secret_key = Some(key.to_string());
        Ok(())
    }

    /// Forget everything
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn pods(&self) -> &[PodInfo] {
        &self.pods
    }

    pub fn selected_pod(&self) -> Option<&PodInfo> {
        self.pod_idx.and_then(|i| self.pods.get(i))
    }

    pub fn selected_container(&self) -> Option<&ContainerInfo> {
        let pod = self.selected_pod()?;
        self.container_idx.and_then(|i| pod.containers.get(i))
    }

    /// Host candidate derived from the selected pod
    pub fn host(&self) -> Option<&str> {
        self.selected_pod().and_then(|p| p.pod_ip.as_deref())
    }

    /// Ports of the selected container
    pub fn port_listing(&self) -> PortListing<'_> {
        match self.selected_container() {
            None => PortListing::NoneSelected,
            Some(container) if container.ports.is_empty() => PortListing::NoExposedPorts,
            Some(container) => PortListing::Exposed(&container.ports),
        }
    }

    /// First declared port of the selected container
    pub fn default_port(&self) -> Option<&PortInfo> {
        match self.port_listing() {
            PortListing::Exposed(ports) => ports.first(),
            _ => None,
        }
    }

    pub fn secrets(&self) -> &[SecretInfo] {
        &self.secrets
    }

    pub fn selected_secret(&self) -> Option<&SecretInfo> {
        self.secret_idx.and_then(|i| self.secrets.get(i))
    }

    pub fn selected_secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    /// The explicitly selected secret entry as (key, value)
    pub fn selected_secret_entry(&self) -> Option<(&str, &str)> {
        let secret = self.selected_secret()?;
        let key = self.secret_key.as_deref()?;
        let value = secret.data.get(key)?;
        Some((key, value))
    }

    /// Whether the walk has produced a usable endpoint: a pod, a container,
    /// and at least one exposed port. A profile built from an incomplete
    /// walk must not be saved.
    pub fn endpoint_complete(&self) -> Result<(), TopologyError> {
        if self.selected_pod().is_none() {
            return Err(TopologyError::NoPodSelected);
        }
        if self.selected_container().is_none() {
            return Err(TopologyError::NoContainerSelected);
        }
        if self.default_port().is_none() {
            return Err(TopologyError::NoExposedPorts);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgscope_types::PortInfo;

    fn pod(name: &str, containers: Vec<ContainerInfo>) -> PodInfo {
        let mut pod = PodInfo::new(name.to_string(), "prod".to_string());
        pod.pod_ip = Some("10.1.2.3".to_string());
        pod.containers = containers;
        pod
    }

    fn container_with_ports(name: &str, ports: Vec<PortInfo>) -> ContainerInfo {
        let mut container = ContainerInfo::new(name.to_string());
        container.ports = ports;
        container
    }

    fn secret(name: &str, entries: &[(&str, &str)]) -> SecretInfo {
        let mut secret = SecretInfo::new(name.to_string(), "prod".to_string());
        for (k, v) in entries {
            secret.data.insert((*k).to_string(), (*v).to_string());
        }
        secret
    }

    #[test]
    fn namespace_selection_clears_everything_below() {
        let mut topo = TopologySelection::new();
        topo.select_namespace("prod".into());
        topo.set_pods(vec![
            pod("pg-0", vec![ContainerInfo::new("postgres".into())]),
            pod("pg-1", vec![]),
        ]);
        topo.select_pod(0).unwrap();
        topo.set_secrets(vec![secret("creds", &[("password", "x")])]);
        topo.select_secret(0).unwrap();

        topo.select_namespace("staging".into());

        assert_eq!(topo.namespace(), Some("staging"));
        assert!(topo.pods().is_empty());
        assert!(topo.selected_pod().is_none());
        assert!(topo.selected_container().is_none());
        assert!(topo.secrets().is_empty());
        assert!(topo.selected_secret().is_none());
        assert!(topo.selected_secret_key().is_none());
    }

    #[test]
    fn multi_pod_snapshot_leaves_pod_unselected() {
        let mut topo = TopologySelection::new();
        topo.set_pods(vec![pod("pg-0", vec![]), pod("pg-1", vec![])]);
        assert!(topo.selected_pod().is_none());
    }

    #[test]
    fn sole_pod_is_auto_selected_with_first_container() {
        let mut topo = TopologySelection::new();
        topo.set_pods(vec![pod(
            "pg-0",
            vec![
                ContainerInfo::new("postgres".into()),
                ContainerInfo::new("sidecar".into()),
            ],
        )]);
        assert_eq!(topo.selected_pod().map(|p| p.name.as_str()), Some("pg-0"));
        assert_eq!(
            topo.selected_container().map(|c| c.name.as_str()),
            Some("postgres")
        );
    }

    #[test]
    fn pod_selection_resets_container_only() {
        let mut topo = TopologySelection::new();
        topo.set_pods(vec![
            pod(
                "pg-0",
                vec![
                    ContainerInfo::new("postgres".into()),
                    ContainerInfo::new("sidecar".into()),
                ],
            ),
            pod("pg-1", vec![ContainerInfo::new("other".into())]),
        ]);
        topo.select_pod(0).unwrap();
        topo.select_container(1).unwrap();
        topo.set_secrets(vec![secret("creds", &[("password", "x")])]);
        topo.select_secret(0).unwrap();

        topo.select_pod(1).unwrap();

        assert_eq!(
            topo.selected_container().map(|c| c.name.as_str()),
            Some("other")
        );
        // The secret snapshot belongs to the namespace, not the pod
        assert!(topo.selected_secret().is_some());
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        let mut topo = TopologySelection::new();
        topo.set_pods(vec![pod("pg-0", vec![]), pod("pg-1", vec![])]);
        assert_eq!(topo.select_pod(5), Err(TopologyError::IndexOutOfRange(5)));
        assert!(topo.selected_pod().is_none());
    }

    #[test]
    fn port_listing_states() {
        let mut topo = TopologySelection::new();
        assert_eq!(topo.port_listing(), PortListing::NoneSelected);

        topo.set_pods(vec![pod(
            "pg-0",
            vec![container_with_ports("postgres", vec![])],
        )]);
        assert_eq!(topo.port_listing(), PortListing::NoExposedPorts);

        let ports = vec![PortInfo {
            name: Some("pg".into()),
            port: 5432,
            protocol: "TCP".into(),
        }];
        topo.set_pods(vec![pod("pg-0", vec![container_with_ports("postgres", ports)])]);
        assert_eq!(topo.default_port().map(|p| p.port), Some(5432));
    }

    #[test]
    fn secret_selection_auto_picks_first_key() {
        let mut topo = TopologySelection::new();
        topo.set_secrets(vec![secret("creds", &[("username", "app"), ("password", "x")])]);
        topo.select_secret(0).unwrap();
        // BTreeMap order: "password" sorts before "username"
        assert_eq!(topo.selected_secret_key(), Some("password"));
        assert_eq!(topo.selected_secret_entry(), Some(("password", "x")));

        topo.select_secret_key("username").unwrap();
        assert_eq!(topo.selected_secret_entry(), Some(("username", "app")));

        assert_eq!(
            topo.select_secret_key("missing"),
            Err(TopologyError::UnknownSecretKey("missing".into()))
        );
    }

    #[test]
    fn endpoint_needs_pod_container_and_port() {
        let mut topo = TopologySelection::new();
        assert_eq!(topo.endpoint_complete(), Err(TopologyError::NoPodSelected));

        // A pod with no containers auto-selects but stays incomplete
        topo.set_pods(vec![pod("pg-0", vec![])]);
        assert_eq!(
            topo.endpoint_complete(),
            Err(TopologyError::NoContainerSelected)
        );

        topo.set_pods(vec![pod(
            "pg-0",
            vec![container_with_ports("postgres", vec![])],
        )]);
        assert_eq!(topo.endpoint_complete(), Err(TopologyError::NoExposedPorts));

        let ports = vec![PortInfo {
            name: None,
            port: 5432,
            protocol: "TCP".into(),
        }];
        topo.set_pods(vec![pod("pg-0", vec![container_with_ports("postgres", ports)])]);
        assert_eq!(topo.endpoint_complete(), Ok(()));
    }

    #[test]
    fn host_comes_from_selected_pod_ip() {
        let mut topo = TopologySelection::new();
        topo.set_pods(vec![pod("pg-0", vec![])]);
        assert_eq!(topo.host(), Some("10.1.2.3"));
    }
}
