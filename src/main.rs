//! account-sweeper - bulk cleanup of a messaging account
//!
//! Runs a cleanup over a pre-classified worklist and writes the reports.

#![allow(missing_docs)]

use account_sweeper::utils::logging::init_tracing;
use account_sweeper::{
    BatchRunner, CleanupSummary, Config, RemoteSession, RunContext, ScriptedSession, Worklist,
};
use anyhow::{Context, bail};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Leave groups and channels, erase histories, remove contacts, archive the rest
#[derive(Debug, Parser)]
#[command(name = "sweeper", version, about)]
struct Cli {
    /// YAML configuration file; defaults plus SWEEPER_* variables when absent
    #[arg(short, long, env = "SWEEPER_CONFIG")]
    config: Option<PathBuf>,

    /// Account name used in logs and report file names
    #[arg(short, long, env = "SWEEPER_ACCOUNT")]
    account: String,

    /// Worklist JSON: `{"entities": [...], "contacts": [...]}`
    #[arg(short, long)]
    worklist: PathBuf,

    /// Only count what would be done
    #[arg(long)]
    dry_run: bool,

    /// Run every phase against an in-memory session seeded from the worklist
    #[arg(long)]
    rehearse: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref(), cli.json_logs);

    match run(cli).await {
        Ok(summary) if summary.success => ExitCode::SUCCESS,
        Ok(summary) if summary.cancelled => ExitCode::from(130),
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<CleanupSummary> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path).await?,
        None => Config::default(),
    };
    config.apply_env_overrides()?;
    config.validate()?;

    let worklist = Worklist::from_file(&cli.worklist)
        .await
        .with_context(|| format!("loading worklist {}", cli.worklist.display()))?;

    let session: Arc<dyn RemoteSession> = if cli.rehearse {
        info!("Rehearsal: using an in-memory session");
        Arc::new(
            ScriptedSession::new()
                .with_dialogs(worklist.entities.clone())
                .with_contacts(worklist.contacts.clone().unwrap_or_default()),
        )
    } else if cli.dry_run {
        Arc::new(ScriptedSession::new())
    } else {
        bail!("no remote transport is linked into this binary; use --dry-run or --rehearse");
    };

    let ctx = Arc::new(RunContext::new(cli.account.as_str(), config.cleanup));
    let token = ctx.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight operations");
            token.cancel();
        }
    });

    let summary = BatchRunner::new(ctx, session)
        .run(&worklist, cli.dry_run)
        .await;

    if let Some(plan) = &summary.plan {
        println!("{}", serde_json::to_string_pretty(plan)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&summary.statistics)?);
        if let Some(path) = &summary.json_path {
            println!("JSON report: {}", path.display());
        }
        if let Some(path) = &summary.csv_path {
            println!("CSV report: {}", path.display());
        }
    }
    if let Some(message) = &summary.error {
        error!("Run aborted: {}", message);
    }

    Ok(summary)
}
