use std::fmt::Display;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::Local;
use log::error;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::catalog::{self, Report};
use crate::charts::{self, Visualization};
use crate::frame::Frame;
use crate::html;
use crate::page::Page;
use crate::sections::{self, VisualizationRequest};
use crate::store::{DataError, TableName};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TableParams {
    pub table: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub report: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Evaluates a section on the blocking pool and renders it as HTML.
async fn render_section<F>(section: F) -> Response
where
    F: FnOnce() -> Page + Send + 'static,
{
    match tokio::task::spawn_blocking(section).await {
        Ok(page) => Html(html::render_page(&page)).into_response(),
        Err(e) => {
            error!("Section handler did not complete: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

pub async fn view_tables(
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> Response {
    render_section(move || sections::view_tables(state.store.as_ref(), params.table.as_deref()))
        .await
}

pub async fn run_queries(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Response {
    render_section(move || sections::run_queries(state.store.as_ref(), params.report.as_deref()))
        .await
}

pub async fn visualizations(
    State(state): State<AppState>,
    Query(request): Query<VisualizationRequest>,
) -> Response {
    let settings = state.chart_settings();
    render_section(move || {
        sections::visualizations(
            state.store.as_ref(),
            &request,
            settings,
            Local::now().date_naive(),
        )
    })
    .await
}

pub async fn add_record(Query(params): Query<TableParams>) -> Html<String> {
    Html(html::render_page(&sections::add_record(params.table.as_deref())))
}

pub async fn update_record() -> Html<String> {
    Html(html::render_page(&sections::update_record()))
}

pub async fn delete_record() -> Html<String> {
    Html(html::render_page(&sections::delete_record()))
}

pub async fn about() -> Html<String> {
    Html(html::render_page(&sections::about()))
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Display) -> ApiError {
    (status, Json(json!({ "error": message.to_string() })))
}

/// Runs one data access call on the blocking pool; data faults become 502.
async fn fetch<T, F>(call: F) -> Result<Json<T>, ApiError>
where
    F: FnOnce() -> Result<T, DataError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(Ok(value)) => Ok(Json(value)),
        Ok(Err(e)) => {
            error!("Data access failed: {}", e);
            Err(api_error(StatusCode::BAD_GATEWAY, e))
        }
        Err(e) => {
            error!("Data access did not complete: {}", e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e))
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Response {
    match fetch(move || state.store.ping()).await {
        Ok(_) => Json(json!({ "status": "ok" })).into_response(),
        Err((_, body)) => (StatusCode::SERVICE_UNAVAILABLE, body).into_response(),
    }
}

pub async fn api_table(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<Json<Frame>, ApiError> {
    let table: TableName = table
        .parse()
        .map_err(|e| api_error(StatusCode::NOT_FOUND, e))?;
    fetch(move || state.store.browse(table)).await
}

pub async fn api_reports() -> Json<&'static [Report]> {
    Json(catalog::reports())
}

pub async fn api_report(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Frame>, ApiError> {
    let report = catalog::find_by_slug(&slug)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("unknown report `{}`", slug)))?;
    fetch(move || state.store.run_report(report)).await
}

pub async fn api_chart(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<DateParams>,
) -> Result<Json<Value>, ApiError> {
    let viz = Visualization::from_slug(&slug).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            format!("unknown visualization `{}`", slug),
        )
    })?;
    let settings = state.chart_settings();
    let range = charts::range_for(
        viz,
        params.start.as_deref(),
        params.end.as_deref(),
        Local::now().date_naive(),
        settings.window_days,
    )
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    fetch(move || {
        let rendered = charts::render(state.store.as_ref(), viz, range, settings.tally)?;
        Ok(json!({
            "visualization": viz,
            "range": range,
            "figure": rendered.chart.to_plotly(),
            "chart": rendered.chart,
            "frame": rendered.frame,
        }))
    })
    .await
}
