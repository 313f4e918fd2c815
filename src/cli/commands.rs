//! Command dispatch: one working document per invocation
//!
//! Each editing command loads the document, applies a single intent and
//! writes the new snapshot back.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{Intent, Session};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::tree_view::ToTermTree;
use crate::config::{global_config_path, Settings};
use crate::domain::Mode;
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;

/// Run the parsed command line. Returns the process exit code on success.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see --help".to_string(),
        ));
    };

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::New { file, mode, force } => {
            let mode = mode.map(Mode::from).unwrap_or(container.settings.default_mode);
            container.workspace().create(file, mode, *force)?;
            output::action("Created", &format!("{} ({} mode)", file.display(), mode));
            Ok(exitcode::OK)
        }
        Commands::Show { file, all } => show(&container, file, *all),
        Commands::Check { file } => check(&container, file),
        Commands::Add {
            file,
            parent,
            name,
            probability,
        } => add(&container, file, parent, name.as_deref(), *probability),
        Commands::Set {
            file,
            id,
            name,
            probability,
            lock,
            unlock,
        } => {
            let mut intents = Vec::new();
            if let Some(name) = name {
                intents.push(Intent::Rename {
                    id: id.clone(),
                    name: name.clone(),
                });
            }
            if let Some(probability) = probability {
                intents.push(Intent::Reweight {
                    id: id.clone(),
                    probability: validate_probability(*probability)?,
                });
            }
            if *lock || *unlock {
                intents.push(Intent::SetLocked {
                    id: id.clone(),
                    locked: *lock,
                });
            }
            if intents.is_empty() {
                return Err(CliError::InvalidArgs(
                    "nothing to set: use --name, --probability, --lock or --unlock".to_string(),
                ));
            }
            edit(&container, file, Some(id), intents)
        }
        Commands::Remove { file, id } => {
            if id == crate::domain::ROOT_ID {
                output::warning("the root cannot be removed");
                return Ok(exitcode::OK);
            }
            edit(&container, file, Some(id), vec![Intent::Remove { id: id.clone() }])
        }
        Commands::Toggle { file, id } => {
            edit(&container, file, Some(id), vec![Intent::Toggle { id: id.clone() }])
        }
        Commands::Normalize { file, id } => {
            edit(&container, file, Some(id), vec![Intent::Normalize { id: id.clone() }])
        }
        Commands::Mode { file, mode } => {
            edit(&container, file, None, vec![Intent::SwitchMode((*mode).into())])
        }
        Commands::Sort { file } => edit(&container, file, None, vec![Intent::Sort]),
        Commands::Export { file, output: out } => export(&container, file, out.as_deref()),
        Commands::Import { source, file } => {
            let session = container.workspace().import(source, file)?;
            output::action(
                "Imported",
                &format!(
                    "{} -> {} ({} nodes, {} mode)",
                    source.display(),
                    file.display(),
                    session.root().node_count(),
                    session.mode()
                ),
            );
            Ok(exitcode::OK)
        }
        Commands::Save { file, name } => {
            let session = container.workspace().load(file)?;
            let record = container.distributions().save(name, &session)?;
            output::success(&format!("Saved \"{}\" as {}", record.name, record.id));
            Ok(exitcode::OK)
        }
        Commands::List => list(&container),
        Commands::Load { id, file, force } => {
            let session = container.distributions().load(id)?;
            let workspace = container.workspace();
            if file.exists() && !force {
                return Err(CliError::InvalidArgs(format!(
                    "{} already exists (use --force to overwrite)",
                    file.display()
                )));
            }
            workspace.store(file, &session)?;
            output::action("Loaded", &format!("{} -> {}", id, file.display()));
            Ok(exitcode::OK)
        }
        Commands::Share { id } => {
            let url = container.distributions().share(id)?;
            output::info(&url);
            Ok(exitcode::OK)
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                output::info(&container.settings.to_toml()?);
                Ok(exitcode::OK)
            }
            ConfigCommands::Path => {
                match global_config_path() {
                    Some(path) => output::info(&path.display()),
                    None => output::warning("no configuration directory on this platform"),
                }
                Ok(exitcode::OK)
            }
        },
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(exitcode::OK)
        }
    }
}

fn validate_probability(value: f64) -> CliResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(CliError::InvalidArgs(format!(
            "probability must be a non-negative number, got {value}"
        )));
    }
    Ok(value)
}

/// Load, apply intents in order, store.
#[instrument(level = "debug", skip(container, intents))]
fn edit(
    container: &ServiceContainer,
    file: &Path,
    target: Option<&String>,
    intents: Vec<Intent>,
) -> CliResult<i32> {
    let workspace = container.workspace();
    let mut session = workspace.load(file)?;
    if let Some(id) = target {
        if session.find(id).is_none() {
            output::warning(&format!("no node with id {id}, document unchanged"));
            return Ok(exitcode::OK);
        }
    }
    for intent in intents {
        debug!("applying {:?}", intent);
        session.apply(intent);
    }
    workspace.store(file, &session)?;
    report(&session);
    Ok(exitcode::OK)
}

#[instrument(level = "debug", skip(container))]
fn add(
    container: &ServiceContainer,
    file: &Path,
    parent: &str,
    name: Option<&str>,
    probability: Option<f64>,
) -> CliResult<i32> {
    let workspace = container.workspace();
    let mut session = workspace.load(file)?;
    let Some(id) = session.apply(Intent::AddChild {
        parent_id: parent.to_string(),
    }) else {
        output::warning(&format!("no node with id {parent}, document unchanged"));
        return Ok(exitcode::OK);
    };
    if let Some(name) = name {
        session.apply(Intent::Rename {
            id: id.clone(),
            name: name.to_string(),
        });
    }
    if let Some(probability) = probability {
        session.apply(Intent::Reweight {
            id: id.clone(),
            probability: validate_probability(probability)?,
        });
    }
    workspace.store(file, &session)?;
    output::action("Added", &id);
    report(&session);
    Ok(exitcode::OK)
}

fn show(container: &ServiceContainer, file: &Path, all: bool) -> CliResult<i32> {
    let session = container.workspace().load(file)?;
    let (root, mode) = session.snapshot();
    output::header(&format!(
        "{} mode, {} nodes, depth {}",
        mode,
        root.node_count(),
        root.depth()
    ));
    output::info(&root.to_term_tree(mode, all));
    Ok(exitcode::OK)
}

fn check(container: &ServiceContainer, file: &Path) -> CliResult<i32> {
    let session = container.workspace().load(file)?;
    let violations = session.violations();
    if violations.is_empty() {
        output::success("All nodes are normalized");
        return Ok(exitcode::OK);
    }
    output::header(&format!("{} node(s) not normalized", violations.len()));
    for v in &violations {
        let mut line = format!(
            "{} [{}]: children sum to {:.3}, expected {:.3}",
            v.name, v.node_id, v.sum, v.target
        );
        if v.over_committed {
            line.push_str(" (locked children exceed target)");
        }
        output::failure(&line);
    }
    Ok(exitcode::NOT_NORMALIZED)
}

fn export(container: &ServiceContainer, file: &Path, out: Option<&Path>) -> CliResult<i32> {
    let workspace = container.workspace();
    let session = workspace.load(file)?;
    match out {
        Some(path) => {
            workspace.export(&session, path)?;
            output::action("Exported", &path.display());
        }
        None => output::info(&session.export_json()?),
    }
    Ok(exitcode::OK)
}

fn list(container: &ServiceContainer) -> CliResult<i32> {
    let service = container.distributions();
    let records = service.list()?;
    if records.is_empty() {
        output::info(&format!("No saved distributions for {}", service.user()));
        return Ok(exitcode::OK);
    }
    output::header(&format!("Saved distributions ({})", service.user()));
    for record in records {
        output::detail(&format!(
            "{}  {}  {}",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.name
        ));
    }
    Ok(exitcode::OK)
}

/// Warn about nodes left unnormalized by the last edit.
fn report(session: &Session) {
    let count = session.violations().len();
    if count > 0 {
        output::warning(&format!(
            "{count} node(s) not normalized, run `probtree normalize` to fix"
        ));
    }
}
