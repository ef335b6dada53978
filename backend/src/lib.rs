use std::sync::Arc;

use axum::routing::get;
use axum::Router;

pub mod catalog;
pub mod charts;
pub mod config;
pub mod db;
pub mod frame;
pub mod handlers;
pub mod html;
pub mod models;
pub mod page;
pub mod schema;
pub mod sections;
pub mod store;

use crate::sections::ChartSettings;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(config: config::AppConfig, store: Arc<dyn Store>) -> Self {
        Self { config, store }
    }

    pub fn chart_settings(&self) -> ChartSettings {
        ChartSettings {
            tally: self.config.claim_tally,
            window_days: self.config.chart_window_days,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/tables/:table", get(handlers::api_table))
        .route("/reports", get(handlers::api_reports))
        .route("/reports/:slug", get(handlers::api_report))
        .route("/charts/:slug", get(handlers::api_chart));

    Router::new()
        .route("/", get(handlers::view_tables))
        .route("/tables", get(handlers::view_tables))
        .route("/queries", get(handlers::run_queries))
        .route("/visualizations", get(handlers::visualizations))
        .route("/add", get(handlers::add_record))
        .route("/update", get(handlers::update_record))
        .route("/delete", get(handlers::delete_record))
        .route("/about", get(handlers::about))
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .with_state(state)
}
