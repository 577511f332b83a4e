// MindMBTI terminal client entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Restore a saved login, if any
// 4. Build the API client
// 5. Create mpsc channels
// 6. Spawn the orchestrator task
// 7. Run the TUI until the user quits
// 8. Cleanup on exit

use mindmbti_api::ApiClient;
use mindmbti_app::app;
use mindmbti_core::config;
use mindmbti_core::session::SessionContext;
use mindmbti_core::token_store::TokenStore;
use mindmbti_tui::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("MindMBTI starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(base_url = %config.api.base_url, "config loaded");

    let token_store = TokenStore::default_location().context("failed to locate token store")?;
    let token = match token_store.load() {
        Ok(token) => token,
        Err(e) => {
            warn!(path = %token_store.path().display(), error = %e, "ignoring unreadable token file");
            None
        }
    };
    if token.is_some() {
        info!("restored saved login");
    }

    let client = ApiClient::from_config(&config, SessionContext::with_token(token))
        .context("failed to build HTTP client")?;
    let base_url = client.base_url().to_string();

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (api_tx, api_rx) = mpsc::channel(256);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = app::AppState::new(client, token_store, &config.ui, api_tx);

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, api_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // Blocks until the user quits.
    if let Err(e) = tui::run(ui_rx, cmd_tx, base_url).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("MindMBTI shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("mindmbti.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("mindmbti_tui=info,mindmbti_app=info,mindmbti_api=info,mindmbti_core=info,warn")
        }))
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
