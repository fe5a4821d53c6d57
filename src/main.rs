//! Command-line driver for a translation root.

use std::fs::OpenOptions;
use std::io::{
    self,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use tracing_appender::non_blocking::WorkerGuard;
use translatehub::types::{
    ConflictStrategy,
    OpReport,
    Progress,
};
use translatehub::{
    HubError,
    TranslationManager,
};

#[derive(Debug, Parser)]
#[command(name = "translatehub")]
#[command(version)]
#[command(about = "Manage per-language JSON translation files")]
struct Cli {
    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    /// Root directory holding one sub-directory per language
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List languages
    Languages,
    /// List namespaces
    Namespaces,
    /// Show translation progress per language and namespace
    Stats,
    /// List keys without a translation
    Missing,
    /// Add missing keys to every language and the schema
    Sync,
    /// Search keys and values
    Search {
        query: String,
        #[arg(short, long)]
        case_sensitive: bool,
    },
    /// Create a language from the schema
    AddLanguage { code: String },
    /// Rename a language directory
    RenameLanguage { old: String, new: String },
    /// Delete a language directory
    DeleteLanguage { code: String },
    /// Create an empty namespace in every language
    AddNamespace { name: String },
    /// Rename a namespace in every language
    RenameNamespace { old: String, new: String },
    /// Delete a namespace from every language
    DeleteNamespace { name: String },
    /// Add a key to every language
    AddKey {
        namespace: String,
        key: String,
        /// Value for languages that do not have the key yet
        #[arg(short, long, default_value = "")]
        default: String,
    },
    /// Rename a key in every language
    RenameKey { namespace: String, old: String, new: String },
    /// Delete a key from every language
    DeleteKey { namespace: String, key: String },
    /// Move keys to another namespace
    MoveKeys {
        from: String,
        to: String,
        #[arg(required = true, value_delimiter = ',')]
        keys: Vec<String>,
        /// skip, replace or keep_both
        #[arg(short, long, default_value = "skip")]
        strategy: ConflictStrategy,
    },
    /// Write a ZIP archive of selected files
    Export {
        /// Languages to include (all when omitted)
        #[arg(short, long = "language", value_name = "CODE")]
        languages: Vec<String>,
        /// Namespaces to include (all when omitted)
        #[arg(short, long = "namespace", value_name = "NAME")]
        namespaces: Vec<String>,
        #[arg(long)]
        include_schema: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Hub(#[from] HubError),
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("{failed} file operation(s) failed")]
    Partial { failed: usize },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_file.as_deref());

    let mut out = io::stdout().lock();
    match run(cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "Command failed");
            ExitCode::FAILURE
        }
    }
}

/// Installs the global subscriber; the returned guard flushes the log file on drop.
fn init_logging(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    if let Some(path) = log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .init();
                return Some(guard);
            }
            Err(e) => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_writer(io::stderr)
                    .init();
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Failed to open log file; using stderr"
                );
                return None;
            }
        }
    }

    tracing_subscriber::fmt().with_env_filter(env_filter()).with_writer(io::stderr).init();
    None
}

fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let mut manager = TranslationManager::open(cli.root)?;

    match cli.command {
        Command::Languages => {
            for language in manager.languages() {
                writeln!(out, "{language}")?;
            }
        }
        Command::Namespaces => {
            for namespace in manager.namespaces() {
                writeln!(out, "{namespace}")?;
            }
        }
        Command::Stats => {
            for (language, per_namespace) in manager.all_progress() {
                let total = manager.language_progress(&language);
                writeln!(out, "{language}\t{}", format_progress(total))?;
                for (namespace, progress) in per_namespace {
                    writeln!(out, "  {namespace}\t{}", format_progress(progress))?;
                }
            }
        }
        Command::Missing => {
            for missing in manager.missing_translations() {
                writeln!(out, "{}\t{}\t{}", missing.language, missing.namespace, missing.key)?;
            }
        }
        Command::Sync => {
            let changes = manager.synchronize_keys();
            if changes.is_empty() {
                writeln!(out, "Already in sync")?;
            }
            for (namespace, count) in changes {
                writeln!(out, "{namespace}: {count} key(s) added")?;
            }
        }
        Command::Search { query, case_sensitive } => {
            for (language, per_namespace) in manager.search(&query, case_sensitive) {
                for (namespace, matches) in per_namespace {
                    for (key, value) in matches {
                        writeln!(out, "{language}\t{namespace}\t{key}\t{value}")?;
                    }
                }
            }
        }
        Command::AddLanguage { code } => report(out, &manager.create_language(&code)?)?,
        Command::RenameLanguage { old, new } => {
            manager.rename_language(&old, &new)?;
            writeln!(out, "Renamed {old} to {new}")?;
        }
        Command::DeleteLanguage { code } => {
            manager.delete_language(&code)?;
            writeln!(out, "Deleted {code}")?;
        }
        Command::AddNamespace { name } => report(out, &manager.create_namespace(&name)?)?,
        Command::RenameNamespace { old, new } => {
            report(out, &manager.rename_namespace(&old, &new)?)?;
        }
        Command::DeleteNamespace { name } => report(out, &manager.delete_namespace(&name)?)?,
        Command::AddKey { namespace, key, default } => {
            report(out, &manager.add_key(&namespace, &key, &default)?)?;
        }
        Command::RenameKey { namespace, old, new } => {
            report(out, &manager.rename_key(&namespace, &old, &new)?)?;
        }
        Command::DeleteKey { namespace, key } => {
            report(out, &manager.delete_key(&namespace, &key)?)?;
        }
        Command::MoveKeys { from, to, keys, strategy } => {
            let outcome = manager.move_keys(&from, &to, &keys, strategy)?;
            if !outcome.moved {
                writeln!(out, "Nothing moved")?;
            }
            report(out, &outcome.report)?;
        }
        Command::Export { languages, namespaces, include_schema, output } => {
            let languages = if languages.is_empty() { manager.languages() } else { languages };
            let namespaces = if namespaces.is_empty() { manager.namespaces() } else { namespaces };
            let path = manager.export(&languages, &namespaces, include_schema, output.as_deref())?;
            writeln!(out, "{}", path.display())?;
        }
    }
    Ok(())
}

fn format_progress(progress: Progress) -> String {
    progress.percent().map_or_else(
        || format!("{}/{}", progress.done, progress.total),
        |percent| format!("{}/{} ({percent}%)", progress.done, progress.total),
    )
}

/// Prints the outcome of a multi-file operation; failures make the command fail.
fn report(out: &mut impl Write, outcome: &OpReport) -> Result<(), CliError> {
    writeln!(out, "{} file(s) written", outcome.succeeded.len())?;
    for failure in &outcome.failed {
        writeln!(out, "failed: {} ({})", failure.file, failure.error)?;
    }
    if outcome.is_success() {
        Ok(())
    } else {
        Err(CliError::Partial { failed: outcome.failed.len() })
    }
}
