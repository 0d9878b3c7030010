//! Credential resolution from pod environment and secrets
//!
//! Databases deployed to Kubernetes usually carry their credentials in the
//! pod spec, either inline, as single secret references, or as a bulk
//! envFrom import. The scan is deterministic: containers in declaration
//! order, env vars in declaration order, literal values and single secret
//! references first, bulk imports last. The first non-empty value wins for
//! each field and an empty resolution never erases an earlier one.

use pgscope_types::{PodInfo, SecretInfo};

/// Env var and secret key names treated as the username
pub const USERNAME_KEYS: [&str; 5] =
    ["username", "user", "POSTGRES_USER", "DB_USER", "DATABASE_USER"];

/// Env var and secret key names treated as the password
pub const PASSWORD_KEYS: [&str; 5] = [
    "password",
    "passwd",
    "POSTGRES_PASSWORD",
    "DB_PASSWORD",
    "DATABASE_PASSWORD",
];

/// Exact match against the username alias set
pub fn is_username_key(key: &str) -> bool {
    USERNAME_KEYS.contains(&key)
}

/// Exact match against the password alias set
pub fn is_password_key(key: &str) -> bool {
    PASSWORD_KEYS.contains(&key)
}

/// Credentials recovered from a pod, each side independently optional
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    fn fill_username(&mut self, value: &str) {
        if self.username.is_none() && !value.is_empty() {
            self.username = Some(value.to_string());
        }
    }

    fn fill_password(&mut self, value: &str) {
        if self.password.is_none() && !value.is_empty() {
            self.password = Some(value.to_string());
        }
    }

    pub fn is_complete(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Fill a side by alias classification of `key`
    fn fill_classified(&mut self, key: &str, value: &str) {
        if is_username_key(key) {
            self.fill_username(value);
        } else if is_password_key(key) {
            self.fill_password(value);
        }
    }
}

fn secret_value<'a>(secrets: &'a [SecretInfo], name: &str, key: &str) -> Option<&'a str> {
    secrets
        .iter()
        .find(|s| s.name == name)
        .and_then(|s| s.data.get(key))
        .map(String::as_str)
}

/// Scan a pod's containers for database credentials.
///
/// `secrets` is the secret snapshot of the pod's namespace; references to
/// secrets not present in it resolve to nothing.
pub fn resolve_pod_credentials(pod: &PodInfo, secrets: &[SecretInfo]) -> Credentials {
    let mut creds = Credentials::default();

    for container in &pod.containers {
        for env in &container.env {
            if let Some(value) = &env.value {
                creds.fill_classified(&env.name, value);
            }

            if let Some(secret_ref) = &env.secret_ref {
                if let Some(value) = secret_value(secrets, &secret_ref.secret, &secret_ref.key) {
                    // Either the env var name or the secret key may carry
                    // the meaningful alias
                    if is_username_key(&env.name) || is_username_key(&secret_ref.key) {
                        creds.fill_username(value);
                    } else if is_password_key(&env.name) || is_password_key(&secret_ref.key) {
                        creds.fill_password(value);
                    }
                }
            }
        }

        for secret_name in &container.env_from_secrets {
            if let Some(secret) = secrets.iter().find(|s| &s.name == secret_name) {
                for (key, value) in &secret.data {
                    creds.fill_classified(key, value);
                }
            }
        }
    }

    creds
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgscope_types::{ContainerInfo, EnvVarInfo, SecretKeyRef};

    fn env_literal(name: &str, value: &str) -> EnvVarInfo {
        EnvVarInfo {
            name: name.to_string(),
            value: Some(value.to_string()),
            secret_ref: None,
        }
    }

    fn env_secret(name: &str, secret: &str, key: &str) -> EnvVarInfo {
        EnvVarInfo {
            name: name.to_string(),
            value: None,
            secret_ref: Some(SecretKeyRef {
                secret: secret.to_string(),
                key: key.to_string(),
            }),
        }
    }

    fn pod_with_env(env: Vec<EnvVarInfo>) -> PodInfo {
        let mut container = ContainerInfo::new("postgres".to_string());
        container.env = env;
        let mut pod = PodInfo::new("pg-0".to_string(), "prod".to_string());
        pod.containers = vec![container];
        pod
    }

    fn secret(name: &str, entries: &[(&str, &str)]) -> SecretInfo {
        let mut secret = SecretInfo::new(name.to_string(), "prod".to_string());
        for (k, v) in entries {
            secret.data.insert((*k).to_string(), (*v).to_string());
        }
        secret
    }

    #[test]
    fn alias_classification_is_exact() {
        assert!(is_username_key("POSTGRES_USER"));
        assert!(is_username_key("user"));
        assert!(!is_username_key("postgres_user"));
        assert!(!is_username_key("USER"));
        assert!(is_password_key("passwd"));
        assert!(!is_password_key("Password"));
    }

    #[test]
    fn literal_env_values_resolve() {
        let pod = pod_with_env(vec![
            env_literal("POSTGRES_USER", "app"),
            env_literal("POSTGRES_PASSWORD", "hunter2"),
        ]);
        let creds = resolve_pod_credentials(&pod, &[]);
        assert_eq!(creds.username.as_deref(), Some("app"));
        assert_eq!(creds.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn first_non_empty_wins() {
        let pod = pod_with_env(vec![
            env_literal("DB_USER", "first"),
            env_literal("POSTGRES_USER", "second"),
        ]);
        let creds = resolve_pod_credentials(&pod, &[]);
        assert_eq!(creds.username.as_deref(), Some("first"));
    }

    #[test]
    fn empty_values_never_erase() {
        let pod = pod_with_env(vec![
            env_literal("DB_PASSWORD", ""),
            env_literal("POSTGRES_PASSWORD", "real"),
        ]);
        let creds = resolve_pod_credentials(&pod, &[]);
        assert_eq!(creds.password.as_deref(), Some("real"));
    }

    #[test]
    fn secret_ref_classified_by_env_name_or_key_name() {
        let secrets = vec![secret("creds", &[("opaque", "via-env-name"), ("password", "via-key")])];

        // Env name carries the alias, key does not
        let pod = pod_with_env(vec![env_secret("POSTGRES_PASSWORD", "creds", "opaque")]);
        let creds = resolve_pod_credentials(&pod, &secrets);
        assert_eq!(creds.password.as_deref(), Some("via-env-name"));

        // Key carries the alias, env name does not
        let pod = pod_with_env(vec![env_secret("PGCONF", "creds", "password")]);
        let creds = resolve_pod_credentials(&pod, &secrets);
        assert_eq!(creds.password.as_deref(), Some("via-key"));
    }

    #[test]
    fn missing_secret_resolves_to_nothing() {
        let pod = pod_with_env(vec![env_secret("POSTGRES_PASSWORD", "absent", "password")]);
        let creds = resolve_pod_credentials(&pod, &[]);
        assert_eq!(creds.password, None);
    }

    #[test]
    fn env_from_bulk_import_fills_remaining_fields() {
        let secrets = vec![secret("bulk", &[("username", "bulk-user"), ("password", "bulk-pass")])];
        let mut pod = pod_with_env(vec![env_literal("POSTGRES_USER", "explicit")]);
        pod.containers[0].env_from_secrets = vec!["bulk".to_string()];

        let creds = resolve_pod_credentials(&pod, &secrets);
        // Explicit env wins for the username; the bulk import only fills
        // the still-missing password
        assert_eq!(creds.username.as_deref(), Some("explicit"));
        assert_eq!(creds.password.as_deref(), Some("bulk-pass"));
    }

    #[test]
    fn containers_scanned_in_declaration_order() {
        let mut first = ContainerInfo::new("sidecar".to_string());
        first.env = vec![env_literal("DB_USER", "sidecar-user")];
        let mut second = ContainerInfo::new("postgres".to_string());
        second.env = vec![env_literal("POSTGRES_USER", "pg-user")];

        let mut pod = PodInfo::new("pg-0".to_string(), "prod".to_string());
        pod.containers = vec![first, second];

        let creds = resolve_pod_credentials(&pod, &[]);
        assert_eq!(creds.username.as_deref(), Some("sidecar-user"));
    }
}
