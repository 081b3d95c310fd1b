//! The config-switching state machine.
//!
//! Layout on disk, all under one kube directory (normally `~/.kube`):
//!
//! ```text
//! ~/.kube/
//! ├── config        active link: a symlink at the path kubectl reads
//! ├── .co.lock      advisory lock file, see `lock.rs`
//! └── co/
//!     ├── <name>    one regular file per stored config (opaque bytes)
//!     ├── ...
//!     └── previous  symlink to the target that was active before the
//!                   most recent switch (one-step rollback)
//! ```
//!
//! At most one config is active at a time, defined purely by what the
//! active link points to. The `previous` entry exists once a switch has
//! happened; its target may since have been deleted, which is tolerated.
//!
//! A store is opened once per invocation. Opening resolves the current and
//! previous link targets into a snapshot and never mutates either link;
//! only [`ConfigStore::link`] and [`ConfigStore::delete`] do.

mod error;
mod lock;

pub use error::StoreError;

use std::fs::{self, DirBuilder, OpenOptions, Permissions};
use std::io;
use std::os::unix::fs::{symlink, DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use lock::StoreLock;

/// Directory under the kube dir holding the stored config files.
pub const STORE_DIR: &str = "co";
/// Reserved entry inside the storage directory, excluded from listings.
pub const PREVIOUS_LINK: &str = "previous";
/// The file kubectl reads by convention.
pub const ACTIVE_CONFIG: &str = "config";

const LOCK_FILE: &str = ".co.lock";

/// Outcome of [`ConfigStore::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new empty config file was created; it needs manual initialization
    /// before kubectl can use it.
    Created { path: PathBuf },
    /// An existing kubeconfig was copied into the store byte for byte.
    Copied { path: PathBuf },
}

/// Outcome of [`ConfigStore::link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The active link points at `target`.
    Switched { target: PathBuf },
    /// The resolved target file does not exist; nothing was touched.
    TargetMissing { target: PathBuf },
}

/// Owns the on-disk layout and performs the switch transitions.
pub struct ConfigStore {
    base_path: PathBuf,
    active_link: PathBuf,
    previous_link: PathBuf,
    lock_path: PathBuf,
    previous_target: Option<PathBuf>,
    current_target: Option<PathBuf>,
}

impl ConfigStore {
    /// Open the store rooted at `kube_dir`, creating the directory layout
    /// (0700) if missing.
    ///
    /// Resolves the previous link and, when the active path is a symlink,
    /// the active link into a snapshot. An absent or dangling previous
    /// link is recorded as empty, not an error. A plain file at the active
    /// path was put there by something else and leaves the snapshot empty.
    pub fn open(kube_dir: &Path) -> Result<Self, StoreError> {
        let base_path = kube_dir.join(STORE_DIR);
        let active_link = kube_dir.join(ACTIVE_CONFIG);
        let previous_link = base_path.join(PREVIOUS_LINK);
        let lock_path = kube_dir.join(LOCK_FILE);

        create_private_dir(kube_dir)?;
        create_private_dir(&base_path)?;

        let previous_target = read_link_target(&previous_link)?;

        let current_target = match fs::symlink_metadata(&active_link) {
            Ok(meta) if meta.file_type().is_symlink() => read_link_target(&active_link)?,
            Ok(_) => None,
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(StoreError::io("stat", &active_link, e)),
        };

        Ok(Self {
            base_path,
            active_link,
            previous_link,
            lock_path,
            previous_target,
            current_target,
        })
    }

    /// Path the active link lives at (`<kube_dir>/config`).
    pub fn active_link(&self) -> &Path {
        &self.active_link
    }

    /// Where a config with the given name is stored.
    pub fn config_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// Target of the active link at open time, if it was a symlink.
    pub fn current_target(&self) -> Option<&Path> {
        self.current_target.as_deref()
    }

    /// Target recorded by the last switch, if any.
    pub fn previous_target(&self) -> Option<&Path> {
        self.previous_target.as_deref()
    }

    /// Store a config under `name`.
    ///
    /// With a source path, copies that file byte for byte into the store,
    /// overwriting any config of the same name. Without one, creates an
    /// empty file. Either way the result is chmodded to 0600. Never
    /// touches the links; switching is a separate, explicit step.
    pub fn add(&self, name: &str, source: Option<&Path>) -> Result<AddOutcome, StoreError> {
        let dest = self.base_path.join(name);

        match source {
            None => {
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .mode(0o600)
                    .open(&dest)
                    .map_err(|e| StoreError::io("create", &dest, e))?;
                // The open mode only applies when the file is created;
                // tighten a pre-existing file as well.
                set_private(&dest)?;
                Ok(AddOutcome::Created { path: dest })
            }
            Some(src) => {
                let bytes = match fs::read(src) {
                    Ok(bytes) => bytes,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        return Err(StoreError::NotFound {
                            path: src.to_path_buf(),
                        })
                    }
                    Err(e) => return Err(StoreError::io("read", src, e)),
                };
                fs::write(&dest, bytes).map_err(|e| StoreError::io("write", &dest, e))?;
                set_private(&dest)?;
                Ok(AddOutcome::Copied { path: dest })
            }
        }
    }

    /// Names of all stored configs, sorted, with the reserved previous
    /// entry filtered out.
    ///
    /// Entries are reported whether or not they are regular files; a stray
    /// subdirectory shows up like any config.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StoreError::io("read directory", &self.base_path, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io("read directory", &self.base_path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name != PREVIOUS_LINK {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Repoint the active link.
    ///
    /// With a name, the target is that stored config; without one, the
    /// previous target recorded by the last switch. No name and no
    /// previous target is [`StoreError::NoTarget`].
    ///
    /// A target file that does not exist makes the whole call a no-op
    /// returning [`LinkOutcome::TargetMissing`]; tab completion and
    /// repeated invocations rely on that staying quiet.
    ///
    /// Otherwise: remove both links, symlink the target as the active
    /// link, and record the prior active target as the new previous link.
    /// If creating the previous link fails the new active link stays in
    /// place, but the error is still reported.
    pub fn link(&self, name: Option<&str>) -> Result<LinkOutcome, StoreError> {
        let _lock = StoreLock::acquire(&self.lock_path)?;
        self.relink(name)
    }

    /// Remove the config stored under `name`.
    ///
    /// The active link is rerouted to the previous target first; if there
    /// is nowhere safe to point it, the call aborts with the file still in
    /// place. A delete never leaves the active link dangling.
    pub fn delete(&self, name: &str) -> Result<PathBuf, StoreError> {
        let path = self.base_path.join(name);
        if !path.exists() {
            return Err(StoreError::NotFound { path });
        }

        let _lock = StoreLock::acquire(&self.lock_path)?;

        match self.relink(None)? {
            LinkOutcome::Switched { .. } => {}
            LinkOutcome::TargetMissing { target } => {
                // The fallback config has vanished. Harmless unless the
                // file being deleted is the active one, in which case
                // removing it would dangle the active link.
                if self.current_target.as_deref() == Some(path.as_path()) {
                    return Err(StoreError::NotFound { path: target });
                }
            }
        }

        fs::remove_file(&path).map_err(|e| StoreError::io("remove", &path, e))?;
        Ok(path)
    }

    fn relink(&self, name: Option<&str>) -> Result<LinkOutcome, StoreError> {
        let target = match name {
            Some(name) if !name.is_empty() => self.base_path.join(name),
            _ => match &self.previous_target {
                Some(previous) => previous.clone(),
                None => return Err(StoreError::NoTarget),
            },
        };

        // Checked before any cleanup: a no-op must not tear down the
        // existing links.
        if !target.exists() {
            return Ok(LinkOutcome::TargetMissing { target });
        }

        // Already active: re-linking would set the previous pointer to
        // the target itself and lose the rollback step.
        if self.current_target.as_deref() == Some(target.as_path()) {
            return Ok(LinkOutcome::Switched { target });
        }

        remove_if_present(&self.active_link)?;
        remove_if_present(&self.previous_link)?;

        symlink(&target, &self.active_link)
            .map_err(|e| StoreError::io("create symlink", &self.active_link, e))?;
        // kubectl warns when the config it reads is group or world
        // readable. set_permissions follows the link and tightens the
        // target file itself.
        set_private(&self.active_link)?;

        if let Some(prior) = &self.current_target {
            symlink(prior, &self.previous_link)
                .map_err(|e| StoreError::io("create symlink", &self.previous_link, e))?;
            tracing::debug!(previous = %prior.display(), "recorded previous config");
        }

        Ok(LinkOutcome::Switched { target })
    }
}

fn create_private_dir(path: &Path) -> Result<(), StoreError> {
    match DirBuilder::new().mode(0o700).create(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(StoreError::io("create directory", path, e)),
    }
}

fn read_link_target(path: &Path) -> Result<Option<PathBuf>, StoreError> {
    match fs::read_link(path) {
        Ok(target) => Ok(Some(target)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io("read link", path, e)),
    }
}

fn remove_if_present(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io("remove", path, e)),
    }
}

fn set_private(path: &Path) -> Result<(), StoreError> {
    fs::set_permissions(path, Permissions::from_mode(0o600))
        .map_err(|e| StoreError::io("chmod", path, e))
}
