use mimalloc::MiMalloc;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use patchwatch::config::CONFIG;
use patchwatch::coordinator::{self, CoordinatorArgs};
use patchwatch::db::PatchStore;
use patchwatch::notify::{LingrSink, NoopSink, NotificationSink};
use patchwatch::scrape::{HttpFetcher, SourceFetcher};
use patchwatch::server::router::{AppState, app_router};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &*CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        source_url = %cfg.source.url,
        source_format = ?cfg.source.format,
        interval_minutes = cfg.source.interval_minutes,
        notify_enabled = cfg.notify.enabled(),
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
    );

    let store = PatchStore::connect(&cfg.basic.database_url).await?;
    // DDL is idempotent; a failed attempt here is logged, not fatal.
    if let Err(e) = store.init_schema().await {
        warn!("Failed to initialize database schema: {e}");
    }

    let sink: Arc<dyn NotificationSink> = if cfg.notify.enabled() {
        Arc::new(LingrSink::new(cfg.notify.clone()))
    } else {
        info!("No bot secret configured; notifications disabled");
        Arc::new(NoopSink)
    };
    let fetcher: Arc<dyn SourceFetcher> = Arc::new(HttpFetcher::new(cfg.source.url.clone()));

    let handle = coordinator::spawn(CoordinatorArgs {
        store,
        fetcher,
        sink,
        format: cfg.source.format,
    })
    .await;

    coordinator::spawn_scrape_timer(
        handle.clone(),
        Duration::from_secs(cfg.source.interval_minutes * 60),
    );

    // Build axum router and serve
    let state = AppState::new(handle, cfg.source.url.as_str(), &cfg.source.feed_title);
    let app = app_router(state);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { /* ... */ },
        _ = terminate => { /* ... */ },
    }
}
