// League manager entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Copy default config files on first run, then load config
// 3. Open database and hydrate league state (snapshots or config seeds)
// 4. Create mpsc channels and the LLM client
// 5. Spawn the app logic task
// 6. Wait for Ctrl+C, then shut down cleanly

use league_manager::app;
use league_manager::config;
use league_manager::db;
use league_manager::llm;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("League manager starting up");

    // 2. Config: copies templates on first run, then loads and validates.
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} seed teams",
        config.league.name,
        config.league.teams.len()
    );

    // 3. Open database and hydrate state.
    let db = db::Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);

    let (store, gallery) =
        app::hydrate(&db, &config).context("failed to hydrate league state")?;
    info!(
        "League state ready: {} teams, {} pending requests, {} gallery photos",
        store.teams.len(),
        store.pending.len(),
        gallery.len()
    );

    // 4. Create mpsc channels (before AppState so llm_tx can be passed in).
    let (llm_tx, llm_rx) = mpsc::channel(256);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, mut ui_rx) = mpsc::channel(256);

    let llm_client = llm::client::LlmClient::from_config(&config);
    match &llm_client {
        llm::client::LlmClient::Active(_) => info!("LLM client initialized (API key configured)"),
        llm::client::LlmClient::Disabled => info!("LLM client disabled (no API key)"),
    }

    let app_state = app::AppState::new(config, store, gallery, db, llm_client, llm_tx);

    // 5. Spawn the app logic task.
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, llm_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // Drain UI updates; the frontend attaches through cmd_tx/ui_rx.
    let ui_handle = tokio::spawn(async move {
        while let Some(update) = ui_rx.recv().await {
            debug!("UI update: {:?}", update);
        }
    });

    info!("League manager ready");

    // 6. Block until Ctrl+C, then ask the loop to quit.
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received");
    let _ = cmd_tx.send(app::UserCommand::Quit).await;

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;
    ui_handle.abort();

    info!("League manager shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file so the terminal stays clean.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("hyleague.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("league_manager=info,warn")),
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
