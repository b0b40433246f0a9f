// AeroTech console entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the API client
// 4. Create mpsc channels and the application state
// 5. Spawn app logic task
// 6. Run the TUI until the user quits
// 7. Cleanup on exit

use std::sync::Arc;

use aerotech_api::ApiClient;
use aerotech_app::app;
use aerotech_core::config;
use aerotech_core::events::RefreshBus;
use aerotech_tui::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("AeroTech console starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: backend={}, console role={}",
        config.api.resolved_base_url(),
        config.console.role.as_ref().map_or("<select>", |r| r.as_str())
    );

    // 3. Build the API client
    let client = ApiClient::from_config(&config.api).context("failed to build API client")?;

    // 4. Create mpsc channels and the application state
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);
    let (app_state, refresh_rx) = app::AppState::new(config, Arc::new(client), RefreshBus::new());

    // 5. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, refresh_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. Run the TUI event loop (blocking until user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 7. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("AeroTech console shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("aerotech.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("aerotech=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
