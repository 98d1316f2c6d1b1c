use bpm_dashboard::{config::Config, routes, state::AppState};
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config_path =
        std::env::var("BPM_DASHBOARD_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let cfg = Config::load_or_default(&config_path)?;

    let state = Arc::new(AppState::from_config(&cfg)?);
    let app = routes::router(state);

    let port = std::env::var("PORT").ok();
    let addr = cfg.listen_addr(port.as_deref())?;
    info!(%addr, "Data server listening");

    let server = axum::Server::bind(&addr).serve(app.into_make_service());

    let graceful = server.with_graceful_shutdown(shutdown_signal());
    graceful.await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
