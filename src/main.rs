//! Placeholder - placeholder image server.

mod adapters;
mod cassette;
mod cli;
mod config;
mod context;
mod error;
mod interpret;
mod params;
mod ports;
mod server;

use std::path::Path;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use crate::cli::Cli;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::PlaceholderError;
use crate::server::AppState;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), PlaceholderError> {
    // Load config, then let flags win
    let config_path = config::discover_config_path(cli.config.as_deref());
    let mut config = Config::load(&config_path).map_err(PlaceholderError::Config)?;
    cli.apply(&mut config);

    // Create context based on mode (live / recording / replaying)
    let replay_path = std::env::var("PLACEHOLDER_REPLAY").ok();
    let is_recording = std::env::var("PLACEHOLDER_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        log::info!("replaying renderer from {cassette_path}");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        log::info!("recording renderer interactions");
        let (ctx, session) = ServiceContext::recording(&config);
        (ctx, Some(session))
    } else {
        log::debug!(
            "rendering with {} (timeout {}s)",
            config.renderer_program(),
            config.renderer.timeout_secs
        );
        (ServiceContext::live(&config), None)
    };

    let listener = TcpListener::bind((config.server.listen.as_str(), config.server.port)).await?;
    log::info!("listening on http://{}", listener.local_addr()?);

    let state = Arc::new(AppState { renderer: ctx.renderer, strict: config.renderer.strict });
    server::serve(listener, state).await?;

    // Finish recording if active
    if let Some(session) = recording_session {
        match session.finish() {
            Ok((path, count)) => log::info!("cassette saved: {} ({count} renders)", path.display()),
            Err(e) => log::warn!("failed to save cassette: {e}"),
        }
    }

    Ok(())
}
