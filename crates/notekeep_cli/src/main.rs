//! Command-line host for notekeep.
//!
//! # Responsibility
//! - Load config, start logging and open the notebook.
//! - Pass the password gate, then run one list/edit/delete command.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use notekeep_core::{
    init_logging, BackendKind, CoreConfig, EditAction, EditResult, EditSession, LoggingConfig,
    Notebook, NotesList, SaveError,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "notekeep", version, about = "Password-gated personal notes")]
struct Cli {
    /// TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `data_dir` from the config.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Overrides `backend` from the config.
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendArg>,

    /// Gate password.
    #[arg(long, short = 'p', global = true, env = "NOTEKEEP_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Sqlite,
    Snapshot,
}

impl From<BackendArg> for BackendKind {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Sqlite => BackendKind::Sqlite,
            BackendArg::Snapshot => BackendKind::Snapshot,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List notes, most recently modified first.
    List,
    /// Print one note.
    Show { id: i64 },
    /// Create a note.
    New {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Replace the title and/or content of a note.
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note.
    Delete {
        id: i64,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// List notes whose title or content contains the query.
    Search { query: String },
    /// Print the number of stored notes.
    Count,
    /// Change the gate password.
    Passwd {
        #[arg(long)]
        new: String,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        log::error!("event=cli_run module=cli status=error error={err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    start_logging(&config);

    let mut notebook = Notebook::open(&config).context("failed to open notebook")?;
    let password = cli
        .password
        .as_deref()
        .ok_or_else(|| anyhow!("a password is required (--password or NOTEKEEP_PASSWORD)"))?;

    let command = match cli.command {
        Command::Passwd { new } => {
            notebook.gate_mut().change_password(password, &new)?;
            println!("password changed");
            return Ok(());
        }
        other => other,
    };

    let unlocked = notebook.unlock(password)?;
    let service = notebook.service_mut(unlocked);

    match command {
        Command::List => {
            let list = NotesList::load(service)?;
            print_list(&list);
        }
        Command::Search { query } => {
            let mut list = NotesList::default();
            list.filter(service, &query)?;
            print_list(&list);
        }
        Command::Show { id } => {
            let note = service
                .get_note(id)?
                .ok_or_else(|| anyhow!("Note not found"))?;
            println!("# {}\n\n{}", note.title, note.content);
        }
        Command::New { title, content } => {
            let mut session = EditSession::start(service, None)?;
            session.set_title(title);
            session.set_content(content);
            finish(session.save(service))?;
        }
        Command::Edit { id, title, content } => {
            let mut session =
                EditSession::start(service, Some(id)).map_err(|err| anyhow!(err.user_message()))?;
            if let Some(title) = title {
                session.set_title(title);
            }
            if let Some(content) = content {
                session.set_content(content);
            }
            finish(session.save(service))?;
        }
        Command::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete note {id} without --yes");
            }
            service.delete_note(id)?;
            println!("note deleted");
        }
        Command::Count => println!("{}", service.count_notes()?),
        Command::Passwd { .. } => {}
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig> {
    let base = match cli.config.as_deref() {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    let config = apply_overrides(base, cli);
    config.validate()?;
    Ok(config)
}

/// Command-line flags win over the config file.
fn apply_overrides(mut config: CoreConfig, cli: &Cli) -> CoreConfig {
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(backend) = cli.backend {
        config.backend = backend.into();
    }
    config
}

// Logging is best effort; notes stay usable without it.
fn start_logging(config: &CoreConfig) {
    let log_dir = absolute(&config.resolved_log_dir());
    if let Err(err) = init_logging(&LoggingConfig::new(config.log_level.clone(), log_dir)) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn finish(outcome: std::result::Result<EditResult, SaveError>) -> Result<()> {
    let result = outcome.map_err(|err| anyhow!(err.user_message()))?;
    let verb = match result.action {
        EditAction::Created => "created",
        EditAction::Updated => "updated",
    };
    println!("note {} {verb}: {}", result.note.id, result.note.title);
    Ok(())
}

fn print_list(list: &NotesList) {
    if list.is_empty() {
        println!("No notes yet");
        return;
    }
    for row in list.rows() {
        println!("[{}] {}  ({})", row.id, row.title, row.modified);
        if !row.preview.is_empty() {
            println!("    {}", row.preview);
        }
    }
}
