use std::net::SocketAddr;
use std::sync::Arc;

use food_waste_dashboard::config::AppConfig;
use food_waste_dashboard::db::PgStore;
use food_waste_dashboard::store::Store;
use food_waste_dashboard::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let config = AppConfig::load()?;
    log::info!("Loaded config: {:?}", config);

    let addr = SocketAddr::new(config.bind_address, config.port);

    let store = PgStore::new(config.connection_url());
    let probe = store.clone();
    match tokio::task::spawn_blocking(move || probe.ping()).await? {
        Ok(()) => log::info!("Database reachable"),
        // Sections report their own data errors, so keep serving.
        Err(e) => log::warn!("Database not reachable at startup: {}", e),
    }

    log::info!("Starting server on http://{}", addr);

    let state = AppState::new(config, Arc::new(store));
    let app = router(state);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app.into_make_service()).await?;

    Ok(())
}
