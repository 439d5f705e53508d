// crates/podium-cli/src/main.rs
// ============================================================================
// Module: Podium CLI Entry Point
// Description: Command dispatcher for the Podium server and store administration.
// Purpose: Provide one operator binary for serving, config checks, and store reads.
// Dependencies: clap, podium-config, podium-core, podium-server, podium-store-sqlite, serde, tokio
// ============================================================================

//! ## Overview
//! The Podium CLI starts the leaderboard HTTP server and offers offline
//! administration for the `SQLite` store. Structured command output goes to
//! stdout as JSON; errors go to stderr with a failure exit code. Store
//! commands open the database directly and never require a running server.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use podium_config::EnvOverrides;
use podium_config::LeaderboardStoreType;
use podium_config::PodiumConfig;
use podium_core::LeaderboardEntry;
use podium_core::LeaderboardStore;
use podium_server::PodiumServer;
use podium_store_sqlite::SqliteLeaderboardStore;
use podium_store_sqlite::SqliteStoreConfig;
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Entry count printed by `store top` when `--limit` is omitted.
const DEFAULT_STORE_TOP_LIMIT: usize = 10;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "podium", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Podium leaderboard HTTP server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Leaderboard store administration utilities.
    Store {
        /// Selected store subcommand.
        #[command(subcommand)]
        command: StoreCommand,
    },
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to podium.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a Podium configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to podium.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Leaderboard store subcommands.
#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// Print the top leaderboard entries.
    Top(StoreTopCommand),
    /// Print store performance counters.
    Stats(StoreStatsCommand),
}

/// Store location inputs for `SQLite`-backed store operations.
#[derive(Args, Debug, Clone)]
struct StoreLocationArgs {
    /// Optional config file path (defaults to podium.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Optional direct `SQLite` store path (overrides config).
    #[arg(long = "store-path", value_name = "PATH")]
    store_path: Option<PathBuf>,
}

/// Arguments for `store top`.
#[derive(Args, Debug)]
struct StoreTopCommand {
    /// Store location settings.
    #[command(flatten)]
    location: StoreLocationArgs,
    /// Number of entries to print.
    #[arg(long, value_name = "LIMIT", default_value_t = DEFAULT_STORE_TOP_LIMIT)]
    limit: usize,
}

/// Arguments for `store stats`.
#[derive(Args, Debug)]
struct StoreStatsCommand {
    /// Store location settings.
    #[command(flatten)]
    location: StoreLocationArgs,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("podium {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => command_config(command),
        Commands::Store {
            command,
        } => command_store(command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    init_tracing();
    let mut config = PodiumConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let overrides = EnvOverrides::from_env()
        .map_err(|err| CliError::new(format!("failed to read environment overrides: {err}")))?;
    config
        .apply_overrides(&overrides)
        .map_err(|err| CliError::new(format!("failed to apply environment overrides: {err}")))?;

    let server = tokio::task::spawn_blocking(move || PodiumServer::from_config(config))
        .await
        .map_err(|err| CliError::new(format!("server init failed: init join failed: {err}")))?
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;

    Ok(ExitCode::SUCCESS)
}

/// Installs the tracing subscriber used for server logs.
///
/// The filter honors `RUST_LOG` and falls back to `info`. A second install
/// attempt is ignored so the command stays usable under test harnesses.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
///
/// Environment overrides are applied before validation so the check covers
/// the configuration the `serve` command would actually run with.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let mut config = PodiumConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let overrides = EnvOverrides::from_env()
        .map_err(|err| CliError::new(format!("failed to read environment overrides: {err}")))?;
    config
        .apply_overrides(&overrides)
        .map_err(|err| CliError::new(format!("failed to apply environment overrides: {err}")))?;
    config.validate().map_err(|err| CliError::new(err.to_string()))?;
    write_stdout_line("configuration is valid")
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Store Commands
// ============================================================================

/// Dispatches store subcommands.
fn command_store(command: StoreCommand) -> CliResult<ExitCode> {
    match command {
        StoreCommand::Top(command) => command_store_top(&command),
        StoreCommand::Stats(command) => command_store_stats(&command),
    }
}

/// Executes `store top`.
fn command_store_top(command: &StoreTopCommand) -> CliResult<ExitCode> {
    let limit = parse_top_limit(command.limit)?;
    let store = open_sqlite_store(&command.location)?;
    let entries = store
        .top(limit)
        .map_err(|err| CliError::new(format!("failed to read leaderboard: {err}")))?;
    let rows = entries.into_iter().map(StoreTopRow::from_entry).collect::<CliResult<Vec<_>>>()?;
    let output = StoreTopOutput {
        entries: rows,
    };
    let text = serde_json::to_string_pretty(&output)
        .map_err(|err| CliError::new(format!("failed to serialize leaderboard: {err}")))?;
    write_stdout_line(&text).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `store stats`.
fn command_store_stats(command: &StoreStatsCommand) -> CliResult<ExitCode> {
    let store = open_sqlite_store(&command.location)?;
    let snapshot = store.perf_stats_snapshot();
    let text = serde_json::to_string_pretty(&snapshot)
        .map_err(|err| CliError::new(format!("failed to serialize store stats: {err}")))?;
    write_stdout_line(&text).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Validates the `--limit` flag for `store top`.
fn parse_top_limit(limit: usize) -> CliResult<usize> {
    if limit == 0 {
        return Err(CliError::new("--limit must be greater than zero".to_string()));
    }
    Ok(limit)
}

/// Resolves the `SQLite` store configuration for CLI administration.
///
/// Precedence for the database path: `--store-path`, then
/// `PODIUM_STORE_PATH`, then the config file, then the built-in default.
/// Tuning fields always come from the loaded config.
fn resolve_store_config(
    location: &StoreLocationArgs,
    overrides: &EnvOverrides,
) -> CliResult<SqliteStoreConfig> {
    let mut config = PodiumConfig::load(location.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    config
        .apply_overrides(overrides)
        .map_err(|err| CliError::new(format!("failed to apply environment overrides: {err}")))?;
    if config.store.store_type != LeaderboardStoreType::Sqlite {
        return Err(CliError::new("store commands require the sqlite store".to_string()));
    }
    if let Some(store_path) = &location.store_path {
        config.store.path = Some(store_path.clone());
    }
    config.store.validate().map_err(|err| CliError::new(err.to_string()))?;
    Ok(config.store.sqlite_config())
}

/// Opens the `SQLite` store for CLI administration.
fn open_sqlite_store(location: &StoreLocationArgs) -> CliResult<SqliteLeaderboardStore> {
    let overrides = EnvOverrides::from_env()
        .map_err(|err| CliError::new(format!("failed to read environment overrides: {err}")))?;
    let config = resolve_store_config(location, &overrides)?;
    SqliteLeaderboardStore::new(config)
        .map_err(|err| CliError::new(format!("failed to open store: {err}")))
}

/// Output for `store top`.
#[derive(Serialize)]
struct StoreTopOutput {
    /// Entries returned by the listing operation.
    entries: Vec<StoreTopRow>,
}

/// One leaderboard entry rendered for `store top`.
#[derive(Serialize)]
struct StoreTopRow {
    /// Store-assigned entry identifier.
    id: u64,
    /// Player name.
    name: String,
    /// Best recorded score.
    score: i64,
    /// Submission time in RFC 3339 UTC form.
    timestamp: String,
}

impl StoreTopRow {
    /// Renders a stored entry with a human-readable timestamp.
    fn from_entry(entry: LeaderboardEntry) -> CliResult<Self> {
        let timestamp = entry
            .submitted_at
            .to_rfc3339()
            .map_err(|err| CliError::new(format!("failed to render timestamp: {err}")))?;
        Ok(Self {
            id: entry.id.get(),
            name: entry.name.into_string(),
            score: entry.score,
            timestamp,
        })
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a write failure message for an output stream.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
