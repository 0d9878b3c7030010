//! Profile persistence
//!
//! The active profile lives in `~/.pgscope/config.json` as pretty-printed
//! JSON. A missing or unreadable file is not fatal: the caller falls back to
//! the built-in default profile and tries to persist it for next time.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::profile::{ConnectionProfile, ProfileValidationError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to determine home directory")]
    NoHomeDir,
    #[error("config file does not exist: {0}")]
    NotFound(PathBuf),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ProfileValidationError),
}

/// Handle to the on-disk profile
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Store at the default location under the user's home directory
    pub fn new() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self {
            path: home.join(".pgscope").join("config.json"),
        })
    }

    /// Store at an explicit path
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> Result<ConnectionProfile, ConfigError> {
        if !self.path.exists() {
            return Err(ConfigError::NotFound(self.path.clone()));
        }
        let data = fs::read_to_string(&self.path)?;
        let profile = serde_json::from_str(&data)?;
        Ok(profile)
    }

    /// Validate and persist a profile. Invalid profiles are never written.
    pub fn save(&self, profile: &ConnectionProfile) -> Result<(), ConfigError> {
        profile.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(profile)?;
        fs::write(&self.path, data)?;
        Ok(())
    }

    /// Load the saved profile, falling back to the built-in default when the
    /// file is missing or unreadable. The fallback is persisted best-effort
    /// so the next run starts from a file.
    pub fn load_or_default(&self) -> ConnectionProfile {
        match self.load() {
            Ok(profile) => profile,
            Err(e) => {
                warn!("using default connection profile: {e}");
                let profile = ConnectionProfile::default();
                if let Err(e) = self.save(&profile) {
                    warn!("failed to persist default profile: {e}");
                }
                profile
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("config.json"));
        (dir, store)
    }

    #[test]
    fn save_and_load_round_trip() {
        let (_dir, store) = temp_store();
        let mut profile = ConnectionProfile::default();
        profile.host = "10.0.0.5".into();
        profile.namespace = "prod".into();

        store.save(&profile).unwrap();
        assert_eq!(store.load().unwrap(), profile);
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.load(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn save_rejects_invalid_profile() {
        let (_dir, store) = temp_store();
        let mut profile = ConnectionProfile::default();
        profile.database = String::new();

        assert!(matches!(store.save(&profile), Err(ConfigError::Invalid(_))));
        assert!(!store.path().exists());
    }

    #[test]
    fn load_or_default_persists_the_fallback() {
        let (_dir, store) = temp_store();
        let profile = store.load_or_default();
        assert_eq!(profile, ConnectionProfile::default());
        assert_eq!(store.load().unwrap(), profile);
    }

    #[test]
    fn load_or_default_survives_corrupt_file() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        assert_eq!(store.load_or_default(), ConnectionProfile::default());
    }
}
