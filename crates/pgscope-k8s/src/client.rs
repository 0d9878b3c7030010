//! Cluster gateway
//!
//! Thin wrapper over the Kubernetes API returning plain snapshots. Nothing
//! is cached; every call hits the cluster and is bounded by a deadline so a
//! slow apiserver can never wedge the UI.

use std::time::Duration;

use k8s_openapi::api::core::v1::{Container, Namespace, Pod, Secret};
use kube::Api;
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use thiserror::Error;
use tracing::debug;

use pgscope_types::{
    ContainerInfo, EnvVarInfo, NamespaceInfo, PodInfo, PodStatus, PortInfo, SecretInfo,
    SecretKeyRef,
};

/// Deadline applied to every apiserver call
const API_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum KubeError {
    #[error("failed to read kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),
    #[error("failed to build cluster client: {0}")]
    Client(#[source] kube::Error),
    #[error("failed to {what}: {source}")]
    Api {
        what: &'static str,
        #[source]
        source: kube::Error,
    },
    #[error("{what} timed out after {API_TIMEOUT:?}")]
    Timeout { what: &'static str },
}

/// Kubernetes client wrapper for the current kubeconfig context
pub struct KubeClient {
    client: kube::Client,
    context: String,
}

impl KubeClient {
    /// Connect using the current context of the local kubeconfig
    pub async fn connect() -> Result<Self, KubeError> {
        let kubeconfig = Kubeconfig::read()?;
        let context = kubeconfig.current_context.clone().unwrap_or_default();

        let config =
            kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
        let client = kube::Client::try_from(config).map_err(KubeError::Client)?;

        debug!(context, "connected to cluster");
        Ok(Self { client, context })
    }

    /// Name of the kubeconfig context this client talks to
    pub fn context(&self) -> &str {
        &self.context
    }

    async fn bounded<T>(
        what: &'static str,
        fut: impl Future<Output = Result<T, kube::Error>>,
    ) -> Result<T, KubeError> {
        match tokio::time::timeout(API_TIMEOUT, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(KubeError::Api { what, source }),
            Err(_) => Err(KubeError::Timeout { what }),
        }
    }

    /// Fetch all namespaces in the cluster
    pub async fn list_namespaces(&self) -> Result<Vec<NamespaceInfo>, KubeError> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let list =
            Self::bounded("list namespaces", namespaces.list(&ListParams::default())).await?;

        Ok(list
            .items
            .into_iter()
            .map(|ns| {
                let name = ns.metadata.name.unwrap_or_default();
                let status = ns
                    .status
                    .and_then(|s| s.phase)
                    .unwrap_or_else(|| "Unknown".to_string());
                NamespaceInfo::new(name, status)
            })
            .collect())
    }

    /// Fetch all pods in a namespace with their full container, port, env,
    /// and secret-reference detail
    pub async fn list_pods(&self, namespace: &str) -> Result<Vec<PodInfo>, KubeError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = Self::bounded("list pods", pods.list(&ListParams::default())).await?;

        Ok(list
            .items
            .into_iter()
            .map(|pod| Self::pod_to_info(pod, namespace))
            .collect())
    }

    /// Fetch a single pod by name
    pub async fn get_pod(&self, namespace: &str, name: &str) -> Result<PodInfo, KubeError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pod = Self::bounded("get pod", pods.get(name)).await?;
        Ok(Self::pod_to_info(pod, namespace))
    }

    /// Fetch all secrets in a namespace with decoded data
    pub async fn list_secrets(&self, namespace: &str) -> Result<Vec<SecretInfo>, KubeError> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let list = Self::bounded("list secrets", secrets.list(&ListParams::default())).await?;

        Ok(list
            .items
            .into_iter()
            .map(|secret| Self::secret_to_info(secret, namespace))
            .collect())
    }

    /// Fetch a single secret by name
    pub async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretInfo, KubeError> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = Self::bounded("get secret", secrets.get(name)).await?;
        Ok(Self::secret_to_info(secret, namespace))
    }

    fn pod_to_info(pod: Pod, namespace: &str) -> PodInfo {
        let name = pod.metadata.name.unwrap_or_default();
        let mut info = PodInfo::new(name, namespace.to_string());
        info.created = pod.metadata.creation_timestamp.map(|t| t.0);

        if let Some(spec) = pod.spec {
            info.containers = spec.containers.into_iter().map(Self::container_to_info).collect();
            info.init_containers = spec
                .init_containers
                .unwrap_or_default()
                .into_iter()
                .map(Self::container_to_info)
                .collect();
            info.volume_secrets = spec
                .volumes
                .unwrap_or_default()
                .into_iter()
                .filter_map(|v| v.secret.and_then(|s| s.secret_name))
                .collect();
            info.image_pull_secrets = spec
                .image_pull_secrets
                .unwrap_or_default()
                .into_iter()
                .map(|r| r.name)
                .collect();
        }

        if let Some(status) = pod.status {
            info.pod_ip = status.pod_ip;
            info.status = status
                .phase
                .as_deref()
                .map(PodStatus::from)
                .unwrap_or(PodStatus::Unknown);
        }

        info
    }

    fn container_to_info(container: Container) -> ContainerInfo {
        let mut info = ContainerInfo::new(container.name);
        info.image = container.image.unwrap_or_default();

        info.ports = container
            .ports
            .unwrap_or_default()
            .into_iter()
            .map(|p| PortInfo {
                name: p.name,
                port: p.container_port,
                protocol: p.protocol.unwrap_or_else(|| "TCP".to_string()),
            })
            .collect();

        info.env = container
            .env
            .unwrap_or_default()
            .into_iter()
            .map(|env| {
                let secret_ref = env
                    .value_from
                    .and_then(|vf| vf.secret_key_ref)
                    .map(|sk| SecretKeyRef {
                        secret: sk.name,
                        key: sk.key,
                    });
                EnvVarInfo {
                    name: env.name,
                    value: env.value,
                    secret_ref,
                }
            })
            .collect();

        info.env_from_secrets = container
            .env_from
            .unwrap_or_default()
            .into_iter()
            .filter_map(|ef| ef.secret_ref.map(|r| r.name))
            .collect();

        info
    }

    fn secret_to_info(secret: Secret, namespace: &str) -> SecretInfo {
        let name = secret.metadata.name.unwrap_or_default();
        let mut info = SecretInfo::new(name, namespace.to_string());
        info.kind = secret.type_.unwrap_or_default();
        info.created = secret.metadata.creation_timestamp.map(|t| t.0);

        // Secret payloads arrive base64-decoded as raw bytes; expose them as
        // text since credentials are what we are after
        info.data = secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, String::from_utf8_lossy(&value.0).into_owned()))
            .collect();

        info
    }
}

/// Names of every secret a pod references, in declaration order with
/// duplicates removed: volumes first, then container env and envFrom, then
/// init containers, then imagePullSecrets
pub fn pod_secret_names(pod: &PodInfo) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let push = |name: &str, names: &mut Vec<String>| {
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    };

    for name in &pod.volume_secrets {
        push(name, &mut names);
    }
    for container in pod.containers.iter().chain(pod.init_containers.iter()) {
        for env in &container.env {
            if let Some(secret_ref) = &env.secret_ref {
                push(&secret_ref.secret, &mut names);
            }
        }
        for name in &container.env_from_secrets {
            push(name, &mut names);
        }
    }
    for name in &pod.image_pull_secrets {
        push(name, &mut names);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    use k8s_openapi::api::core::v1::{
        ContainerPort, EnvFromSource, EnvVar, EnvVarSource, LocalObjectReference, PodSpec,
        SecretEnvSource, SecretKeySelector, SecretVolumeSource, Volume,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[test]
    fn container_secret_references_are_extracted() {
        let container = Container {
            name: "postgres".to_string(),
            env: Some(vec![EnvVar {
                name: "POSTGRES_PASSWORD".to_string(),
                value_from: Some(EnvVarSource {
                    secret_key_ref: Some(SecretKeySelector {
                        name: "creds".to_string(),
                        key: "password".to_string(),
                        optional: None,
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }]),
            env_from: Some(vec![EnvFromSource {
                secret_ref: Some(SecretEnvSource {
                    name: "bulk".to_string(),
                    optional: None,
                }),
                ..Default::default()
            }]),
            ports: Some(vec![ContainerPort {
                name: Some("pg".to_string()),
                container_port: 5432,
                ..Default::default()
            }]),
            ..Default::default()
        };

        let info = KubeClient::container_to_info(container);

        let secret_ref = info.env[0].secret_ref.as_ref().unwrap();
        assert_eq!(secret_ref.secret, "creds");
        assert_eq!(secret_ref.key, "password");
        assert_eq!(info.env_from_secrets, vec!["bulk"]);
        assert_eq!(info.ports[0].port, 5432);
        assert_eq!(info.ports[0].protocol, "TCP");
    }

    #[test]
    fn pod_volume_and_pull_secrets_are_extracted() {
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some("pg-0".to_string()),
                ..Default::default()
            },
            spec: Some(PodSpec {
                containers: vec![Container {
                    name: "postgres".to_string(),
                    ..Default::default()
                }],
                volumes: Some(vec![Volume {
                    name: "certs".to_string(),
                    secret: Some(SecretVolumeSource {
                        secret_name: Some("tls".to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                }]),
                image_pull_secrets: Some(vec![LocalObjectReference {
                    name: "registry".to_string(),
                }]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let info = KubeClient::pod_to_info(pod, "prod");

        assert_eq!(info.name, "pg-0");
        assert_eq!(info.volume_secrets, vec!["tls"]);
        assert_eq!(info.image_pull_secrets, vec!["registry"]);
        assert_eq!(info.containers.len(), 1);
    }

    #[test]
    fn pod_secret_names_dedup_preserves_order() {
        let mut pod = PodInfo::new("pg-0".into(), "prod".into());
        pod.volume_secrets = vec!["tls".into(), "creds".into()];
        pod.image_pull_secrets = vec!["registry".into(), "creds".into()];

        let mut container = ContainerInfo::new("postgres".into());
        container.env = vec![EnvVarInfo {
            name: "POSTGRES_PASSWORD".into(),
            value: None,
            secret_ref: Some(SecretKeyRef {
                secret: "creds".into(),
                key: "password".into(),
            }),
        }];
        container.env_from_secrets = vec!["extra".into()];
        pod.containers = vec![container];

        assert_eq!(pod_secret_names(&pod), vec!["tls", "creds", "extra", "registry"]);
    }
}
