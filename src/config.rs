use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_PORT: u16 = 4320;
const DEFAULT_LOG: &str = "info";
const DEFAULT_LOG_FORMAT: &str = "pretty";

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

/// Optional overrides from a TOML config file.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    /// HTTP API port (default: 4320).
    port: Option<u16>,
    /// Bind address (default: "127.0.0.1"; use "0.0.0.0" for LAN access).
    bind_address: Option<String>,
    /// Log level filter string, e.g. "debug", "info,todod=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured for log aggregators).
    log_format: Option<String>,
    /// Seed the two welcome tasks into an empty store at startup (default: false).
    welcome_tasks: Option<bool>,
}

/// Resolved, immutable server configuration carried in the `AppContext`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub bind_address: String,
    pub log: String,
    pub log_format: String,
    pub welcome_tasks: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: default_bind_address(),
            log: DEFAULT_LOG.to_string(),
            log_format: DEFAULT_LOG_FORMAT.to_string(),
            welcome_tasks: false,
        }
    }
}

impl ServerConfig {
    /// Merge CLI/env overrides over the TOML file over built-in defaults.
    pub fn resolve(
        config_path: Option<&Path>,
        port: Option<u16>,
        bind_address: Option<String>,
        log: Option<String>,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("could not read config file {}", path.display()))?;
                toml::from_str::<TomlConfig>(&raw)
                    .with_context(|| format!("invalid TOML in {}", path.display()))?
            }
            None => TomlConfig::default(),
        };

        Ok(Self {
            port: port.or(file.port).unwrap_or(DEFAULT_PORT),
            bind_address: bind_address
                .or(file.bind_address)
                .unwrap_or_else(default_bind_address),
            log: log.or(file.log).unwrap_or_else(|| DEFAULT_LOG.to_string()),
            log_format: file
                .log_format
                .unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string()),
            welcome_tasks: file.welcome_tasks.unwrap_or(false),
        })
    }
}
