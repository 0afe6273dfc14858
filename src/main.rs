use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

use a11y_audit::browser::chromium::ChromiumSessions;
use a11y_audit::config::{AuditConfig, CliArgs, Command, ServeArgs};
use a11y_audit::scan::axe::AxeExecutor;
use a11y_audit::state::AppState;
use a11y_audit::{cli, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Initialize tracing; the guard flushes the file sink on exit
    let (file_writer, _log_guard) = match &args.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("--log-file must name a file"))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "a11y_audit=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_writer.map(|w| tracing_subscriber::fmt::layer().with_ansi(false).with_writer(w)))
        .init();

    match args.command {
        Some(Command::Report(report_args)) => cli::run_report(report_args).await,
        Some(Command::Serve(serve_args)) => serve(serve_args).await,
        None => serve(ServeArgs::default()).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    info!("Starting a11y-audit v{}", env!("CARGO_PKG_VERSION"));
    let config = AuditConfig::from_args(args);
    info!("{}", config.describe());

    let executor = AxeExecutor::from_config(&config)?;
    if !executor.has_engine() {
        warn!("No --axe-script given; every audit will fail with scan_failed");
    }
    let sessions = ChromiumSessions::new(&config);
    let addr = config.listen_addr();

    let state = Arc::new(AppState::new(
        config,
        Arc::new(sessions),
        Arc::new(executor),
    ));

    let router = server::build_router(state.clone());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Audit service listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(
        "Audit service shutting down ({} session(s) still active)",
        state.sessions().active_sessions()
    );

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
