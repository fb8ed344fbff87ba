use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use todod::cli::todos::{self, Filter};
use todod::config::ServerConfig;
use todod::{rest, AppContext};

#[derive(Parser)]
#[command(
    name = "todod",
    about = "todod — in-memory todo-list daemon",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP API port
    #[arg(long, env = "TODOD_PORT", global = true)]
    port: Option<u16>,

    /// Path to a TOML config file
    #[arg(long, env = "TODOD_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Bind address for the HTTP server (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "TODOD_BIND")]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TODOD_LOG")]
    log: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "TODOD_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the daemon server (default when no subcommand given).
    ///
    /// Runs todod in the foreground.
    ///
    /// Examples:
    ///   todod serve
    ///   todod
    Serve,
    /// List tasks.
    ///
    /// Fetches the full list from the daemon and applies the filter
    /// locally.
    ///
    /// Examples:
    ///   todod list
    ///   todod list --filter active
    ///   todod list --json
    List {
        /// Show all, only active, or only completed tasks
        #[arg(long, value_enum, default_value = "all")]
        filter: Filter,
        /// Print the raw JSON records instead of the table
        #[arg(long)]
        json: bool,
    },
    /// Add a task.
    ///
    /// Examples:
    ///   todod add "buy milk"
    Add {
        /// Task text
        text: String,
    },
    /// Toggle a task's completion flag.
    ///
    /// Examples:
    ///   todod toggle 3
    Toggle {
        /// Task id
        id: i64,
    },
    /// Remove a task.
    ///
    /// Examples:
    ///   todod rm 3
    Rm {
        /// Task id
        id: i64,
    },
    /// Show daemon status.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::resolve(
        args.config.as_deref(),
        args.port,
        args.bind.clone(),
        args.log.clone(),
    )?;

    match args.command {
        None | Some(Command::Serve) => {
            run_server(config, args.log_file.as_deref()).await?;
        }
        Some(Command::List { filter, json }) => todos::cmd_list(config.port, filter, json).await?,
        Some(Command::Add { text }) => todos::cmd_add(config.port, text).await?,
        Some(Command::Toggle { id }) => todos::cmd_toggle(config.port, id).await?,
        Some(Command::Rm { id }) => todos::cmd_remove(config.port, id).await?,
        Some(Command::Status) => todos::cmd_status(config.port).await?,
    }

    Ok(())
}

async fn run_server(config: ServerConfig, log_file: Option<&std::path::Path>) -> Result<()> {
    let _guard = setup_logging(&config.log, log_file, &config.log_format);
    info!(version = env!("CARGO_PKG_VERSION"), "starting todod");

    let ctx = Arc::new(AppContext::new(config));
    ctx.bootstrap().await;
    rest::start_rest_server(ctx).await
}

/// Initialize the tracing subscriber.
/// If `log_file` is set, logs go to both stdout and a daily-rolling file.
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable compact format)
/// or `"json"` (structured JSON for log aggregators).
///
/// If the log directory cannot be created, falls back to stdout-only
/// logging with a warning; never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("todod.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "warn: could not create log directory '{}': {e}; falling back to stdout",
                dir.display()
            );
            if use_json {
                tracing_subscriber::fmt().json().with_env_filter(log_level).init();
            } else {
                tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
            }
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().compact())
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else if use_json {
        tracing_subscriber::fmt().json().with_env_filter(log_level).init();
        None
    } else {
        tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
        None
    }
}
