//! Binary entry point for the Lookout CLI.

use std::io::{self, Write};
use std::process;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use lookout::{
    Catalog, CatalogEntry, CatalogError, ImageSummary, MatchMode, Orchestrator, PollConfig,
    PollSettings, Poller, Resolution, ScalewayBackend, ScalewayBackendError, ScalewayConfig,
    ServerSnapshot, WaitError,
};

mod cli;

use cli::{Cli, ImageCommand, MatchCommand, WaitCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("backend error: {0}")]
    Backend(#[from] ScalewayBackendError),
    #[error("no entry matches '{query}'")]
    NotFound { query: String },
    #[error(transparent)]
    Wait(#[from] WaitError<ScalewayBackendError>),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli {
        Cli::Match(command) => match_command(&command),
        Cli::Image(command) => image_command(&command).await,
        Cli::Wait(command) => wait_command(&command).await,
    }
}

fn match_command(args: &MatchCommand) -> Result<(), CliError> {
    let catalog = Catalog::load(&Utf8PathBuf::from(args.catalog.as_str()))?;
    let mode = if args.exact {
        MatchMode::Exact
    } else {
        MatchMode::Substring
    };
    match catalog.resolve(mode, &args.query) {
        Resolution::Found(entry) => write_entry(io::stdout().lock(), entry)?,
        Resolution::NotFound => {
            return Err(CliError::NotFound {
                query: args.query.clone(),
            });
        }
    }
    Ok(())
}

async fn image_command(args: &ImageCommand) -> Result<(), CliError> {
    let orchestrator = build_orchestrator(None, None)?;
    match orchestrator.resolve_image(&args.label).await? {
        Resolution::Found(image) => write_image(io::stdout().lock(), &image)?,
        Resolution::NotFound => {
            return Err(CliError::NotFound {
                query: args.label.clone(),
            });
        }
    }
    Ok(())
}

async fn wait_command(args: &WaitCommand) -> Result<(), CliError> {
    let cancel = CancellationToken::new();
    let orchestrator = build_orchestrator(args.interval, args.timeout)?;
    let poller_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            poller_cancel.cancel();
        }
    });
    let orchestrator = orchestrator.with_cancellation(cancel);

    let handle = orchestrator.backend().handle(&args.server_id);
    let mut progress = io::stderr();
    write!(progress, "Waiting for {} to become {}", handle.id, args.target).ok();
    let result = orchestrator
        .wait_for_state(&handle, &args.target, |_| {
            write!(progress, ".").ok();
            progress.flush().ok();
        })
        .await;
    writeln!(progress).ok();

    let snapshot = result?;
    write_snapshot(io::stdout().lock(), &snapshot)?;
    Ok(())
}

fn build_orchestrator(
    interval: Option<u64>,
    timeout: Option<u64>,
) -> Result<Orchestrator<ScalewayBackend>, CliError> {
    let scaleway_config =
        ScalewayConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    let poll_config =
        PollConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    let settings = override_settings(&poll_config, interval, timeout)?;
    let poller = Poller::new(settings).map_err(|err| CliError::Config(err.to_string()))?;
    let backend = ScalewayBackend::new(scaleway_config)?;
    Ok(Orchestrator::new(backend, poller))
}

fn override_settings(
    config: &PollConfig,
    interval: Option<u64>,
    timeout: Option<u64>,
) -> Result<PollSettings, CliError> {
    let settings = PollSettings::new(
        Duration::from_secs(interval.unwrap_or(config.interval_secs)),
        Duration::from_secs(timeout.unwrap_or(config.timeout_secs)),
    );
    settings
        .validate()
        .map_err(|err| CliError::Config(err.to_string()))?;
    Ok(settings)
}

fn write_entry(mut out: impl Write, entry: &CatalogEntry) -> io::Result<()> {
    match &entry.id {
        Some(id) => writeln!(out, "{}\t{id}", entry.name),
        None => writeln!(out, "{}", entry.name),
    }
}

fn write_image(mut out: impl Write, image: &ImageSummary) -> io::Result<()> {
    writeln!(out, "{}\t{}", image.id, image.name)
}

fn write_snapshot(mut out: impl Write, snapshot: &ServerSnapshot) -> io::Result<()> {
    let address = snapshot.public_ip.as_deref().unwrap_or("-");
    writeln!(out, "{}\t{}\t{address}", snapshot.id, snapshot.state)
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
