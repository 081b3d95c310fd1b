use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;

use kubeco::cli::{Action, Cli};
use kubeco::completion;
use kubeco::config::Settings;
use kubeco::logging;
use kubeco::store::{AddOutcome, ConfigStore, LinkOutcome};

fn main() {
    if completion::is_completion_invocation() {
        completion::handle_completion();
        return;
    }

    let cli = Cli::parse();
    logging::init(cli.debug);

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let action = cli.action()?;

    if let Action::Completion { shell } = &action {
        if !completion::print_registration(shell) {
            bail!("unsupported shell '{shell}', use 'bash' or 'zsh'");
        }
        return Ok(());
    }

    let settings = Settings::load().context("loading settings")?;
    let kube_dir = settings.kube_dir()?;
    let store = ConfigStore::open(&kube_dir)
        .with_context(|| format!("opening config store in {}", kube_dir.display()))?;

    match action {
        Action::Add { source, name } => match store.add(&name, source.as_deref())? {
            AddOutcome::Created { path } => println!(
                "Created new config file {}. You may need to initialize it.",
                path.display()
            ),
            AddOutcome::Copied { path } => println!("Added {}", path.display()),
        },
        Action::Delete { name } => {
            let path = store.delete(&name)?;
            println!("Deleted {}", path.display());
        }
        Action::List => print_list(&store)?,
        Action::Current => match store.current_target() {
            Some(target) => println!("{}", target.display()),
            None => bail!("no config is currently linked"),
        },
        Action::Previous => match store.previous_target() {
            Some(target) => println!("{}", target.display()),
            None => bail!("no previous config has been recorded"),
        },
        Action::Switch { name } => match store.link(name.as_deref())? {
            LinkOutcome::Switched { target } => println!(
                "Linked {} to {}",
                store.active_link().display(),
                target.display()
            ),
            LinkOutcome::TargetMissing { target } => {
                tracing::debug!(
                    target = %target.display(),
                    "switch target does not exist, nothing changed"
                );
            }
        },
        Action::Completion { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Print the stored config names, the active one marked and colored.
fn print_list(store: &ConfigStore) -> Result<()> {
    let active = store.current_target();
    for name in store.list()? {
        let path = store.config_path(&name);
        if active == Some(path.as_path()) {
            println!("{}", format!("{name} *").green().bold());
        } else {
            println!("{name}");
        }
    }
    Ok(())
}
