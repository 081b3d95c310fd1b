use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`ConfigStore`](super::ConfigStore) operations.
///
/// The store never prints or logs a failure itself; every error is handed
/// back to the caller, who decides how to present it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A filesystem call failed for a reason other than the tolerated
    /// not-found cases.
    #[error("failed to {op} '{path}': {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A path that must exist (a delete target, an add source, or the
    /// fallback config a delete reroutes to) does not.
    #[error("'{path}' does not exist")]
    NotFound { path: PathBuf },

    /// A switch was requested without a config name and with no previous
    /// target recorded to fall back to.
    #[error("no config name given and no previous config recorded")]
    NoTarget,
}

impl StoreError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
