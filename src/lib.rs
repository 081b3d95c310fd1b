//! kubeco: switch between multiple kubeconfig files.
//!
//! kubectl reads `~/.kube/config` by convention. kubeco keeps any number
//! of named kubeconfig files under `~/.kube/co/` and points
//! `~/.kube/config` at the chosen one as a symlink, remembering the prior
//! target in `~/.kube/co/previous` for a one-step rollback. Config file
//! contents are never parsed; each stored config is an opaque byte blob.
//!
//! A `KUBECONFIG` environment variable set in the shell still takes
//! precedence for kubectl itself. kubeco neither reads nor honors it; it
//! only manages the symlink.
//!
//! Known limitation: invocations racing on the same store serialize their
//! link/delete transitions with an advisory lock, but each process
//! resolves the current and previous targets before taking the lock, so
//! concurrent runs can still act on stale state. Fine for a single-user
//! CLI; do not drive kubeco from concurrent automation.

pub mod cli;
pub mod completion;
pub mod config;
pub mod logging;
pub mod store;
