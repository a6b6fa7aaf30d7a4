use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use food_collection::config::Config;
use food_collection::i18n;
use food_collection::routes::{self, Intent, IntentResponse};
use food_collection::services::auth::Session;
use food_collection::services::clock::SystemClock;
use food_collection::services::init;
use food_collection::services::store::RetentionStore;
use food_collection::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (reads .env as well)
    let config = Config::from_env()?;

    // Initialize tracing. Stdout carries responses, so logs go to stderr.
    let fmt_layer = if config.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "food_collection=debug".into()),
        )
        .with(fmt_layer)
        .init();

    tracing::info!(
        "Starting {}",
        i18n::tr(Some(&config.ui.default_lang), "app.name", None)
    );

    let backend = init::init_storage(&config).await?;
    let store = RetentionStore::init(backend, Arc::new(SystemClock), config.retention.window()).await;

    let app_state = Arc::new(AppState {
        store,
        config: config.clone(),
    });

    // Create shutdown notifier for background workers
    let (shutdown_tx, _shutdown_rx) = tokio::sync::broadcast::channel::<()>(1);
    let bg_handles = init::spawn_background_workers(app_state.clone(), shutdown_tx.clone());

    let intent_loop = serve_intents(app_state.clone());

    let signal_fut = async {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut term) => {
                    tokio::select! {
                        _ = ctrl_c => {},
                        _ = term.recv() => {},
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to bind SIGTERM, only Ctrl+C will stop the store: {}", e);
                    let _ = ctrl_c.await;
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
        }
    };

    tokio::select! {
        res = intent_loop => {
            if let Err(e) = res {
                tracing::error!("Intent loop failed: {}", e);
            } else {
                tracing::info!("Input closed");
            }
        }
        _ = signal_fut => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Notifying background workers");
    let _ = shutdown_tx.send(());

    let shutdown_wait = Duration::from_secs(15);
    tracing::info!(
        "Waiting up to {}s for background workers to exit",
        shutdown_wait.as_secs()
    );
    let bg_wait = async {
        for h in bg_handles {
            let _ = h.await;
        }
    };
    let _ = tokio::time::timeout(shutdown_wait, bg_wait).await;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Read one JSON intent per stdin line and write one JSON response per
/// stdout line. The session lives as long as the process.
async fn serve_intents(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut session: Option<Session> = None;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response: IntentResponse = match serde_json::from_str::<Intent>(line) {
            Ok(intent) => routes::dispatch(&state, &mut session, intent).await,
            Err(e) => routes::malformed(&state, session.clone(), &e.to_string()),
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    Ok(())
}
