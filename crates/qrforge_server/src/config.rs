//! Command-line and environment configuration for `qrforge-server`.

use clap::Parser;
use qrforge_core::default_log_level;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime settings. Every flag falls back to a `QRFORGE_*` variable, which
/// may come from a `.env` file.
#[derive(Debug, Clone, Parser)]
#[command(name = "qrforge-server", version, about = "QR code generator web API")]
pub struct ServerConfig {
    /// SQLite database file; created and migrated on startup.
    #[arg(long, env = "QRFORGE_DATABASE_PATH", default_value = "qrforge.sqlite3")]
    pub database_path: PathBuf,

    /// Socket address the HTTP listener binds to.
    #[arg(long, env = "QRFORGE_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// `trace|debug|info|warn|error`; defaults by build profile.
    #[arg(long, env = "QRFORGE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Rolling log directory; relative paths resolve against the working dir.
    #[arg(long, env = "QRFORGE_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

impl ServerConfig {
    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or_else(|| default_log_level())
    }
}
