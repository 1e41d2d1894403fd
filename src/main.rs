use std::net::SocketAddr;
use streak_tracker::{router, AppState, ActivityStore, TrackerConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = TrackerConfig::from_env()?;
    info!(
        "tracking {} from {} ({} days, {} columns)",
        config.activity, config.window.start_date, config.window.day_count, config.layout.columns
    );

    let store = ActivityStore::new(config.data_path.clone());
    let data = store.load().await?;
    info!(
        "loaded {} records for {} from {}",
        data.activity_log(&config.activity).len(),
        config.activity,
        store.path().display()
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(AppState::new(config, store, data));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
