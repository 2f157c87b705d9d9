//! `qrforge-server` entry point.

use clap::Parser;
use log::{error, info, warn};
use qrforge_core::db::open_db;
use qrforge_core::init_logging;
use qrforge_server::{router, AppState, ServerConfig};
use std::error::Error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is normal; real environment variables still apply.
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error=\"{err}\"");
            eprintln!("qrforge-server: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn Error>> {
    init_logging(config.effective_log_level(), &config.log_dir)?;

    let conn = open_db(&config.database_path)?;
    info!(
        "event=db_open module=server status=ok path={}",
        config.database_path.display()
    );

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        "event=server_start module=server status=ok bind={}",
        listener.local_addr()?
    );

    axum::serve(listener, router(AppState::new(conn)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=shutdown_signal module=server status=error error=\"{err}\"");
        std::future::pending::<()>().await;
    }
}
