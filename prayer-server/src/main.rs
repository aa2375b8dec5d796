use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use prayer_server::aladhan::AladhanClient;
use prayer_server::cache::CachedAladhanClient;
use prayer_server::config::ServerConfig;
use prayer_server::monitor::Monitor;
use prayer_server::schedule::{Clock, SystemClock};
use prayer_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("prayer_server=info,tower_http=info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Create Aladhan client
    let client =
        AladhanClient::new(config.aladhan.clone()).expect("Failed to create Aladhan client");

    // Create cached client, shared by the web layer and the monitor
    let source = Arc::new(CachedAladhanClient::new(client, &config.cache));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let home = match config.home.clone() {
        Some(home) => {
            info!(?home, profile = %config.profile, "starting home prayer monitor");
            let (home_tx, home_rx) = watch::channel(home);
            let monitor = Monitor::new(
                source.clone(),
                home_rx,
                config.params,
                config.adjustments(),
                clock.clone(),
            );
            tokio::spawn(monitor.run());
            Some(Arc::new(home_tx))
        }
        None => None,
    };

    let addr = config.bind_addr;
    let mut state = AppState::with_clock(source, config, clock);
    if let Some(home) = home {
        state = state.with_home(home);
    }
    let app = create_router(state);

    info!(%addr, "prayer schedule server listening");
    info!(
        "endpoints: /health, /api/timings, /api/ramadan, /api/ramadan/day, /api/mosques, /api/home"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    info!("shutting down");
}
