//! `complete -C` style shell completion.
//!
//! The shell re-invokes the binary with `COMP_LINE`/`COMP_POINT` set and
//! expects candidate words on stdout, one per line. Flags are completed
//! when the current word starts with `-`; otherwise the stored config
//! names are offered. Any failure along the way produces no candidates,
//! never an error: completion must not break the prompt.

use crate::config::Settings;
use crate::store::ConfigStore;

const FLAGS: &[&str] = &[
    "--add",
    "--delete",
    "--list",
    "--current",
    "--previous",
    "--debug",
    "--help",
    "--version",
];

/// True when the shell invoked us to expand a completion request rather
/// than to run a command. An explicit `completion` subcommand wins over
/// stray completion variables in the environment.
pub fn is_completion_invocation() -> bool {
    if std::env::args().nth(1).as_deref() == Some("completion") {
        return false;
    }
    std::env::var_os("COMP_LINE").is_some() && std::env::var_os("COMP_POINT").is_some()
}

/// Print completion candidates for the current `COMP_LINE`/`COMP_POINT`.
pub fn handle_completion() {
    let Ok(line) = std::env::var("COMP_LINE") else {
        return;
    };

    let mut point = line.len();
    if let Ok(raw) = std::env::var("COMP_POINT") {
        if let Ok(parsed) = raw.parse::<usize>() {
            if parsed <= line.len() && line.is_char_boundary(parsed) {
                point = parsed;
            }
        }
    }

    let current = current_word(&line[..point]);

    if current.starts_with('-') {
        for flag in FLAGS {
            if flag.starts_with(current) {
                println!("{flag}");
            }
        }
        return;
    }

    let Ok(settings) = Settings::load() else {
        return;
    };
    let Ok(kube_dir) = settings.kube_dir() else {
        return;
    };
    let Ok(store) = ConfigStore::open(&kube_dir) else {
        return;
    };
    let Ok(names) = store.list() else {
        return;
    };
    for name in names {
        println!("{name}");
    }
}

/// Print the registration lines for the given shell. Returns false for
/// shells we do not support.
pub fn print_registration(shell: &str) -> bool {
    match shell {
        "bash" => {
            println!("complete -C kubectl-co kubectl-co");
            println!("complete -C kubectl-co kubectl");
            true
        }
        "zsh" => {
            println!("autoload -U +X bashcompinit && bashcompinit");
            println!("complete -C kubectl-co kubectl-co");
            println!("complete -C kubectl-co kubectl");
            true
        }
        _ => false,
    }
}

/// The word being completed: everything after the last whitespace, or
/// empty if the line ends in whitespace.
fn current_word(line: &str) -> &str {
    if line.is_empty() || line.ends_with([' ', '\t']) {
        return "";
    }
    line.rsplit([' ', '\t']).next().unwrap_or("")
}
