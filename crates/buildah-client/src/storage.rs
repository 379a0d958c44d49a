//! Storage environment probe
//!
//! Rootless buildah on CI runners usually needs `fuse-overlayfs` as the
//! overlay mount program. The probe looks for it once at startup and turns
//! the result into environment overrides for every later invocation.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const FUSE_OVERLAYFS: &str = "fuse-overlayfs";
pub const OVERLAY_DRIVER: &str = "overlay";

/// Environment overrides passed to every buildah invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageEnvironment {
    vars: BTreeMap<String, String>,
}

impl StorageEnvironment {
    /// Use `overlay` with the given helper as its mount program.
    pub fn overlay_with_mount_program(mount_program: &Path) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert("STORAGE_DRIVER".to_string(), OVERLAY_DRIVER.to_string());
        vars.insert(
            "STORAGE_OPTS".to_string(),
            format!("overlay.mount_program={}", mount_program.display()),
        );
        Self { vars }
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }
}

#[derive(Debug, Deserialize)]
struct StorageConf {
    storage: Option<StorageSection>,
}

#[derive(Debug, Deserialize)]
struct StorageSection {
    driver: Option<String>,
}

/// Read `storage.driver` from the contents of a containers `storage.conf`.
pub fn parse_storage_driver(contents: &str) -> Result<Option<String>, toml::de::Error> {
    let conf: StorageConf = toml::from_str(contents)?;
    Ok(conf
        .storage
        .and_then(|s| s.driver)
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty()))
}

/// Detects the overlay helper and the configured storage driver.
#[derive(Debug, Clone)]
pub struct StorageProbe {
    search_path: Option<OsString>,
    storage_conf_candidates: Vec<PathBuf>,
}

impl Default for StorageProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageProbe {
    /// Probe using `PATH` and the standard `storage.conf` locations.
    pub fn new() -> Self {
        let mut candidates = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("containers").join("storage.conf"));
        }
        candidates.push(PathBuf::from("/etc/containers/storage.conf"));

        Self {
            search_path: None,
            storage_conf_candidates: candidates,
        }
    }

    /// Search for the helper in `search_path` instead of `PATH`.
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    /// Replace the `storage.conf` locations, in priority order.
    pub fn with_storage_conf_candidates(mut self, candidates: Vec<PathBuf>) -> Self {
        self.storage_conf_candidates = candidates;
        self
    }

    /// Resolve the overrides. A missing helper yields an empty environment.
    ///
    /// An explicitly configured driver other than `overlay` is respected and
    /// also yields an empty environment.
    pub fn detect(&self) -> StorageEnvironment {
        let Some(helper) = self.find_helper() else {
            tracing::info!("{} not found, using the default storage options", FUSE_OVERLAYFS);
            return StorageEnvironment::default();
        };

        match self.configured_driver() {
            Some(driver) if driver != OVERLAY_DRIVER => {
                tracing::info!(
                    "Storage driver \"{}\" is configured, not overriding the mount program",
                    driver
                );
                StorageEnvironment::default()
            }
            _ => {
                tracing::info!(
                    "Found {} at {}, using the overlay storage driver",
                    FUSE_OVERLAYFS,
                    helper.display()
                );
                StorageEnvironment::overlay_with_mount_program(&helper)
            }
        }
    }

    fn find_helper(&self) -> Option<PathBuf> {
        let found = match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
                which::which_in(FUSE_OVERLAYFS, Some(paths), cwd)
            }
            None => which::which(FUSE_OVERLAYFS),
        };
        found.ok()
    }

    fn configured_driver(&self) -> Option<String> {
        let path = self.storage_conf_candidates.iter().find(|p| p.is_file())?;

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                return None;
            }
        };

        match parse_storage_driver(&contents) {
            Ok(driver) => {
                tracing::debug!("Storage driver from {}: {:?}", path.display(), driver);
                driver
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }
}
