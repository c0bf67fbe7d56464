mod api_docs;
mod config;
mod controllers;
mod csv_export;
mod errors;
mod models;
mod routes;
mod services;
mod shared_state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, response::Html, routing::get};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::config::{Config, SiteConfig};
use crate::models::forecast::ForecastResponse;
use crate::routes::forecast_routes::api_routes;
use crate::services::forecast_service::estimate_pv_production;
use crate::services::geocode_service::GeocodeService;
use crate::services::report::summarize;
use crate::services::weather_service::WeatherService;
use crate::shared_state::{AppState, SharedState};

/// Fetches weather and recomputes the forecast for one configured site.
async fn refresh_site(
    site: &SiteConfig,
    forecast_days: u8,
    weather: &WeatherService,
    state: &AppState,
) {
    let series = match weather
        .get_forecast(site.latitude, site.longitude, forecast_days)
        .await
    {
        Ok(series) => series,
        Err(e) => {
            error!(site = %site.id, "weather fetch failed: {e}");
            return;
        }
    };

    let panel = site.panel();
    let mounting = site.mounting.params();
    let power =
        match estimate_pv_production(&series, site.latitude, site.longitude, &panel, &mounting) {
        Ok(power) => power,
        Err(e) => {
            error!(site = %site.id, "estimation failed: {e}");
            return;
        }
    };
    let summary = match summarize(&power, site.latitude) {
        Ok(summary) => summary,
        Err(e) => {
            error!(site = %site.id, "summary failed: {e}");
            return;
        }
    };

    info!(
        site = %site.id,
        "forecast updated: {:.1} kWh total, peak {:.2} kW at {}",
        summary.total_energy_kwh, summary.peak_power_kw, summary.peak_time
    );

    state.set_forecast(
        &site.id,
        ForecastResponse {
            site_id: site.id.clone(),
            latitude: site.latitude,
            longitude: site.longitude,
            computed_at: Utc::now(),
            panel,
            summary,
            series: power,
        },
    );
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pv_forecast=info,tower_http=info".into()),
        )
        .init();

    // 1. Load configuration
    let config = match Config::load("config.json") {
        Ok(c) => c,
        Err(e) => {
            error!("failed to load config.json: {e}");
            return;
        }
    };
    info!("configuration loaded: {} sites", config.sites.len());

    // 2. HTTP collaborators + shared state
    let weather = match WeatherService::new() {
        Ok(w) => Arc::new(w),
        Err(e) => {
            error!("failed to build weather client: {e}");
            return;
        }
    };
    let geocode = match GeocodeService::new() {
        Ok(g) => Arc::new(g),
        Err(e) => {
            error!("failed to build geocode client: {e}");
            return;
        }
    };
    let state = AppState::new();

    // 3. Background refresh task per site
    let interval = Duration::from_secs(config.refresh_interval_secs);
    let forecast_days = config.forecast_days;
    for site in &config.sites {
        let site = site.clone();
        let weather = weather.clone();
        let state = state.clone();
        tokio::spawn(async move {
            loop {
                refresh_site(&site, forecast_days, &weather, &state).await;
                tokio::time::sleep(interval).await;
            }
        });
    }

    // 4. Axum HTTP server with API docs and the static map dashboard
    let shared = SharedState {
        config: config.clone(),
        app: state,
        weather,
        geocode,
    };
    let app = Router::new()
        .nest("/api", api_routes(shared))
        .route(
            "/scalar",
            get(|| async { Html(Scalar::new(ApiDoc::openapi()).to_html()) }),
        )
        .fallback_service(ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("API server listening on http://{addr}");
    info!("Scalar UI: http://{addr}/scalar");

    if let Err(e) = axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
    {
        error!("server error: {e}");
    }
}
