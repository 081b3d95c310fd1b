//! Command-line surface.
//!
//! Flags select the operation; positional arguments carry the config name
//! (and, for `--add`, an optional source path). Mutually exclusive flags
//! are rejected by clap before any store operation runs. An invocation
//! with no flags and no arguments switches back to the previous config.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

const AFTER_HELP: &str = "\
NOTE: If the KUBECONFIG environment variable is set it takes precedence
over the config file managed by this tool.

Examples:
  kubectl co --add ~/.kube/config new-config   add the current kubeconfig under the name 'new-config'
  kubectl co --add completely-new              add a plain new config file to be initialized afterwards
  kubectl co --list                            list all available configs
  kubectl co --delete new-config               delete the config named 'new-config'
  kubectl co new-config                        switch to 'new-config'
  kubectl co                                   switch back to the previous config
  kubectl co completion bash                   print the bash completion registration";

/// Switch between multiple kubeconfig files.
#[derive(Debug, Parser)]
#[command(name = "kubectl-co", version, after_help = AFTER_HELP)]
pub struct Cli {
    /// Add a new config, from a source path or as an empty file
    #[arg(short, long)]
    pub add: bool,

    /// Delete the config with the given name
    #[arg(short, long, conflicts_with = "add")]
    pub delete: bool,

    /// List all available config files
    #[arg(short, long, conflicts_with_all = ["add", "delete"])]
    pub list: bool,

    /// Print the path of the currently linked config
    #[arg(long, conflicts_with_all = ["add", "delete", "list"])]
    pub current: bool,

    /// Print the path the config was linked to before the last switch
    #[arg(long, conflicts_with_all = ["add", "delete", "list", "current"])]
    pub previous: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// [sourcePath] and/or config name, depending on the selected flag
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

/// A fully resolved invocation, handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add { source: Option<PathBuf>, name: String },
    Delete { name: String },
    List,
    Current,
    Previous,
    Switch { name: Option<String> },
    Completion { shell: String },
}

/// Flag and positional-argument combinations clap cannot rule out on its
/// own.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("--add takes the config name, optionally preceded by a source path")]
    AddArgs,

    #[error("--delete takes exactly one argument: the name of the config to delete")]
    DeleteArgs,

    #[error("{flag} takes no arguments")]
    NoArgs { flag: &'static str },

    #[error("expected at most one config name, got {got} arguments")]
    SwitchArgs { got: usize },

    #[error("usage: kubectl-co completion bash|zsh")]
    CompletionArgs,
}

impl Cli {
    /// Resolve flags and positionals into the single operation to run.
    pub fn action(&self) -> Result<Action, UsageError> {
        if self.args.first().map(String::as_str) == Some("completion") {
            return match self.args.as_slice() {
                [_, shell] => Ok(Action::Completion {
                    shell: shell.clone(),
                }),
                _ => Err(UsageError::CompletionArgs),
            };
        }

        if self.add {
            return match self.args.as_slice() {
                [name] => Ok(Action::Add {
                    source: None,
                    name: name.clone(),
                }),
                [source, name] => Ok(Action::Add {
                    source: Some(PathBuf::from(source)),
                    name: name.clone(),
                }),
                _ => Err(UsageError::AddArgs),
            };
        }

        if self.delete {
            return match self.args.as_slice() {
                [name] => Ok(Action::Delete { name: name.clone() }),
                _ => Err(UsageError::DeleteArgs),
            };
        }

        if self.list {
            return self.without_args("--list", Action::List);
        }
        if self.current {
            return self.without_args("--current", Action::Current);
        }
        if self.previous {
            return self.without_args("--previous", Action::Previous);
        }

        match self.args.as_slice() {
            [] => Ok(Action::Switch { name: None }),
            [name] => Ok(Action::Switch {
                name: Some(name.clone()),
            }),
            more => Err(UsageError::SwitchArgs { got: more.len() }),
        }
    }

    fn without_args(&self, flag: &'static str, action: Action) -> Result<Action, UsageError> {
        if self.args.is_empty() {
            Ok(action)
        } else {
            Err(UsageError::NoArgs { flag })
        }
    }
}
