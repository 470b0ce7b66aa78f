//! standup - Main entry point
//!
//! Loads configuration, picks a random track from the track list and runs one
//! stand-up transition against the desktop player. "Sitting down..." is
//! logged whatever the outcome.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use standup::config::Args;
use standup::notify::{DesktopNotifier, Notifier};
use standup::player::SpotifyClient;
use standup::tracks::TrackList;
use standup::{run_transition, RunConfig};
use standup_common::config::TomlConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let args = Args::parse();

    // The config file may set the log level, so read it before tracing starts
    let toml = TomlConfig::load_or_default(args.config.as_deref());
    let filter = args.log_filter(toml.as_ref().unwrap_or(&TomlConfig::default()));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Standing up!");

    let outcome = tokio::select! {
        result = stand_up(&args, toml) => result,
        _ = shutdown_signal() => Err(anyhow!("Interrupted")),
    };

    let code = match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    };

    info!("Sitting down...");
    code
}

async fn stand_up(args: &Args, toml: standup_common::Result<TomlConfig>) -> Result<()> {
    let toml = toml.context("Failed to load configuration")?;
    let config = RunConfig::from_sources(args, &toml).context("Invalid run configuration")?;

    let tracks_file = args.tracks_file(&toml);
    let tracks = TrackList::load(&tracks_file)
        .with_context(|| format!("Failed to load track list {}", tracks_file.display()))?;
    let track = tracks.choose_random()?.clone();
    info!(
        uri = %track.uri,
        "Picked track ({} in {})",
        tracks.len(),
        tracks_file.display()
    );

    let player = Arc::new(SpotifyClient::new(toml.player.application.clone()));
    let notifier = config
        .notification
        .is_some()
        .then(|| Arc::new(DesktopNotifier::new()) as Arc<dyn Notifier>);

    run_transition(player, config, &track, notifier)
        .await
        .context("Stand-up transition failed")
}

/// Ctrl+C / SIGTERM; pending forever if no handler can be installed
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping");
        },
        _ = terminate => {
            info!("Received terminate signal, stopping");
        },
    }
}
