use chatterm::cli::Args;
use chatterm::error::ChattermError;
use chatterm::input::{InputMode, spawn_stdin_reader, submit_startup_name};
use chatterm::logger::initialize as LoggerInitialize;
use chatterm::terminal::TerminalPresenter;

use client_core::config::ClientConfig;
use client_core::presenter::Presenter;
use client_core::runtime::ChatRuntime;

use std::fs::create_dir_all;

use clap::Parser;
use log::{error, info};
use tokio::sync::mpsc::unbounded_channel;

#[tokio::main]
async fn main() -> Result<(), ChattermError> {
    let args = Args::parse();

    let log_dir = args.log_dir()?;
    create_dir_all(&log_dir)
        .map_err(|e| ChattermError::io(format!("Failed to create log directory {}", log_dir.display()), e))?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir)?;
    info!("chatterm starting");
    info!("Log directory: {}", log_dir.display());

    let config_dir = args.config_dir()?;
    let config = args.apply(ClientConfig::load(&config_dir).inspect_err(|e| {
        error!("Could not load config from {}: {e}", config_dir.display());
    })?);
    config.validate()?;

    let endpoint = config.endpoint();
    info!("Server endpoint: {endpoint}");

    let mode = InputMode::new();
    let mut presenter = TerminalPresenter::stdout(mode.clone());
    let (events_tx, events_rx) = unbounded_channel();

    match &args.name {
        Some(name) => {
            submit_startup_name(&events_tx, name);
        }
        None => presenter.prompt_name(),
    }
    presenter.repaint();
    spawn_stdin_reader(mode, events_tx);

    let mut runtime =
        ChatRuntime::new(endpoint, presenter).with_debug_frames(config.client.debug_frames);
    runtime.run(events_rx).await;

    info!("chatterm exiting");
    Ok(())
}
