//! Shared fixtures for store and CLI tests.

#![allow(dead_code)]

use std::path::PathBuf;

use kubeco::store::ConfigStore;
use tempfile::TempDir;

/// A throwaway home directory with its own kube state.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn kube_dir(&self) -> PathBuf {
        self.dir.path().join(".kube")
    }

    /// Open a fresh store, the way each CLI invocation would. Opening
    /// re-reads the link targets, so call this again after every
    /// operation that should see the updated state.
    pub fn store(&self) -> ConfigStore {
        ConfigStore::open(&self.kube_dir()).expect("open store")
    }

    pub fn config_path(&self, name: &str) -> PathBuf {
        self.kube_dir().join("co").join(name)
    }

    pub fn active_link(&self) -> PathBuf {
        self.kube_dir().join("config")
    }

    pub fn previous_link(&self) -> PathBuf {
        self.kube_dir().join("co").join("previous")
    }

    /// Target of the active link, if it exists.
    pub fn active_target(&self) -> Option<PathBuf> {
        std::fs::read_link(self.active_link()).ok()
    }

    /// Target of the previous link, if it exists.
    pub fn previous_target(&self) -> Option<PathBuf> {
        std::fs::read_link(self.previous_link()).ok()
    }
}
