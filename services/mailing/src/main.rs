use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sea_orm::Database;
use tokio::sync::watch;
use tracing::info;

use courier_core::config::Config as _;
use courier_core::tracing::init_tracing;

use courier_mailing::config::MailingConfig;
use courier_mailing::infra::smtp::SmtpMailTransport;
use courier_mailing::router::build_router;
use courier_mailing::scheduler::Scheduler;
use courier_mailing::state::AppState;
use courier_mailing::usecase::sweep::Sweeper as _;

#[derive(Parser)]
#[command(name = "mailing", about = "Courier mailing service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// HTTP API plus the periodic sweep scheduler (default).
    Serve,
    /// Run one sweep pass, print the report and exit.
    Sweep,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info,sqlx=warn,lettre=warn");
    let cli = Cli::parse();

    let config = MailingConfig::from_env().context("failed to load configuration")?;
    let sweep = config.sweep_settings()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    let transport = SmtpMailTransport::from_settings(&config.smtp_settings())
        .context("failed to build SMTP transport")?;

    let state = AppState {
        db,
        transport,
        sweep,
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, state).await,
        Command::Sweep => {
            let report = state.sweeper().sweep().await.context("sweep failed")?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn serve(config: &MailingConfig, state: AppState) -> anyhow::Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = Scheduler::new(state.sweeper(), config.sweep_interval());
    let scheduler = tokio::spawn(scheduler.run(shutdown_rx));

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.mailing_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("mailing service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await
        .context("server error")?;

    let _ = shutdown_tx.send(true);
    scheduler.await.context("sweep scheduler panicked")?;
    Ok(())
}
