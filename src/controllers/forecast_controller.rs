use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::{Config, SiteConfig};
use crate::csv_export::{read_power_csv, read_weather_csv, write_power_csv, write_weather_csv};
use crate::errors::{EstimateError, check_coordinates};
use crate::models::forecast::{
    ForecastResponse, ForecastSummary, HealthStatus, PanelConfig, PlaceResponse, default_albedo,
    default_gamma_pdc,
};
use crate::models::weather::{WeatherSample, WeatherSeries};
use crate::services::cell_temperature::Mounting;
use crate::services::forecast_service::estimate_pv_production;
use crate::services::report::summarize;
use crate::shared_state::{AppState, SharedState};

/// Ad-hoc estimation parameters, typically from a map click. Giving both
/// `start_date` and `end_date` switches from the forecast API to the
/// historical archive.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EstimateQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Rated DC capacity in kW (default 1).
    pub capacity_kw: Option<f64>,
    /// Panel tilt in degrees (default 0 = horizontal).
    pub tilt_deg: Option<f64>,
    /// Panel azimuth in degrees from true north (default 180 = south).
    pub azimuth_deg: Option<f64>,
    /// Temperature power coefficient in 1/°C (default -0.004).
    pub gamma_pdc: Option<f64>,
    /// SAPM mounting configuration (default open_rack_glass_polymer).
    pub mounting: Option<Mounting>,
    /// First day of a historical range (YYYY-MM-DD); requires `end_date`.
    pub start_date: Option<NaiveDate>,
    /// Last day of a historical range (YYYY-MM-DD); requires `start_date`.
    pub end_date: Option<NaiveDate>,
}

/// Estimation parameters for a weather CSV upload (no fetch, no date range).
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EstimateCsvQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub capacity_kw: Option<f64>,
    pub tilt_deg: Option<f64>,
    pub azimuth_deg: Option<f64>,
    pub gamma_pdc: Option<f64>,
    pub mounting: Option<Mounting>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeatherQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// First day of a historical range (YYYY-MM-DD); requires `end_date`.
    pub start_date: Option<NaiveDate>,
    /// Last day of a historical range (YYYY-MM-DD); requires `start_date`.
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// Site latitude, needed for the tilt/azimuth recommendation.
    pub latitude: f64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GeocodeQuery {
    pub latitude: f64,
    pub longitude: f64,
}

fn estimate_error_response(e: &EstimateError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({"error": e.to_string()})),
    )
        .into_response()
}

fn panel_from(
    capacity_kw: Option<f64>,
    tilt_deg: Option<f64>,
    azimuth_deg: Option<f64>,
    gamma_pdc: Option<f64>,
) -> PanelConfig {
    PanelConfig {
        tilt_deg: tilt_deg.unwrap_or(0.0),
        azimuth_deg: azimuth_deg.unwrap_or(180.0),
        capacity_kw: capacity_kw.unwrap_or(1.0),
        gamma_pdc: gamma_pdc.unwrap_or_else(default_gamma_pdc),
        albedo: default_albedo(),
    }
}

/// Fetches hourly weather for a coordinate pair: the upcoming forecast by
/// default, the historical archive when a complete date range is given.
async fn fetch_weather(
    shared: &SharedState,
    latitude: f64,
    longitude: f64,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<WeatherSeries, Response> {
    let fetched = match (start_date, end_date) {
        (None, None) => {
            shared
                .weather
                .get_forecast(latitude, longitude, shared.config.forecast_days)
                .await
        }
        (Some(start), Some(end)) => {
            if start > end {
                return Err((
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(serde_json::json!({"error": "start_date must not be after end_date"})),
                )
                    .into_response());
            }
            shared
                .weather
                .get_archive(latitude, longitude, start, end)
                .await
        }
        _ => {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({
                    "error": "start_date and end_date must be given together"
                })),
            )
                .into_response());
        }
    };

    fetched.map_err(|e| {
        tracing::error!("weather fetch failed: {e}");
        (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response()
    })
}

/// Runs the estimation pipeline over a weather series and wraps the result
/// in the standard forecast response.
fn build_forecast(
    weather: &[WeatherSample],
    latitude: f64,
    longitude: f64,
    panel: PanelConfig,
    mounting: Mounting,
) -> Response {
    let series =
        match estimate_pv_production(weather, latitude, longitude, &panel, &mounting.params()) {
            Ok(series) => series,
            Err(e) => return estimate_error_response(&e),
        };
    let summary = match summarize(&series, latitude) {
        Ok(summary) => summary,
        Err(e) => return estimate_error_response(&e),
    };

    let response = ForecastResponse {
        site_id: format!("{latitude:.4},{longitude:.4}"),
        latitude,
        longitude,
        computed_at: Utc::now(),
        panel,
        summary,
        series,
    };
    (StatusCode::OK, Json(response)).into_response()
}

fn csv_attachment(filename: String, body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// GET /api/health
///
/// Service status and how many configured sites have a forecast ready.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
pub async fn health(State(shared): State<SharedState>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sites_total: shared.config.sites.len(),
        sites_ready: shared.app.ready_count(),
    })
}

/// GET /api/sites
///
/// Lists all configured PV sites with their location and panel setup.
#[utoipa::path(
    get,
    path = "/api/sites",
    responses(
        (status = 200, description = "Configured sites", body = Vec<SiteConfig>)
    )
)]
pub async fn list_sites(State(config): State<Config>) -> impl IntoResponse {
    Json(config.sites)
}

/// GET /api/sites/{id}/forecast
///
/// Latest background-computed forecast for a configured site, including the
/// full hourly power series and summary. Returns 404 until the first
/// refresh for the site has succeeded.
#[utoipa::path(
    get,
    path = "/api/sites/{id}/forecast",
    params(("id" = String, Path, description = "Site ID")),
    responses(
        (status = 200, description = "Latest site forecast", body = ForecastResponse),
        (status = 404, description = "Unknown site or forecast not ready yet")
    )
)]
pub async fn get_site_forecast(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.get_forecast(&id) {
        Some(forecast) => (StatusCode::OK, Json(forecast)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "no forecast for this site"})),
        )
            .into_response(),
    }
}

/// GET /api/sites/{id}/forecast.csv
///
/// Latest site forecast as a CSV download (`date,PV power [kW]`), reloadable
/// with the date column as the timestamp index.
#[utoipa::path(
    get,
    path = "/api/sites/{id}/forecast.csv",
    params(("id" = String, Path, description = "Site ID")),
    responses(
        (status = 200, description = "Power series CSV", body = String, content_type = "text/csv"),
        (status = 404, description = "Unknown site or forecast not ready yet")
    )
)]
pub async fn get_site_forecast_csv(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let Some(forecast) = state.get_forecast(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "no forecast for this site"})),
        )
            .into_response();
    };

    let mut buf = Vec::new();
    if let Err(e) = write_power_csv(&forecast.series, &mut buf) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response();
    }

    csv_attachment(format!("{id}_pv_power.csv"), buf)
}

/// GET /api/estimate
///
/// On-demand PV production estimate for arbitrary coordinates — the
/// endpoint behind a dashboard map click. Fetches hourly weather from
/// Open-Meteo (forecast, or archive when a date range is given) and runs
/// the full estimation pipeline.
#[utoipa::path(
    get,
    path = "/api/estimate",
    params(EstimateQuery),
    responses(
        (status = 200, description = "Computed forecast", body = ForecastResponse),
        (status = 422, description = "Out-of-range coordinates, panel geometry or date range"),
        (status = 502, description = "Weather API unavailable")
    )
)]
pub async fn estimate(
    Query(q): Query<EstimateQuery>,
    State(shared): State<SharedState>,
) -> impl IntoResponse {
    let weather =
        match fetch_weather(&shared, q.latitude, q.longitude, q.start_date, q.end_date).await {
            Ok(series) => series,
            Err(resp) => return resp,
        };

    let panel = panel_from(q.capacity_kw, q.tilt_deg, q.azimuth_deg, q.gamma_pdc);
    build_forecast(
        &weather,
        q.latitude,
        q.longitude,
        panel,
        q.mounting.unwrap_or_default(),
    )
}

/// POST /api/estimate/csv
///
/// Runs the estimation pipeline over an uploaded weather CSV (as produced
/// by `/api/weather.csv`) instead of fetching from Open-Meteo, so a saved
/// series can be re-estimated offline with different panel parameters.
#[utoipa::path(
    post,
    path = "/api/estimate/csv",
    params(EstimateCsvQuery),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Computed forecast", body = ForecastResponse),
        (status = 422, description = "Malformed CSV or out-of-range parameters")
    )
)]
pub async fn estimate_from_csv(
    Query(q): Query<EstimateCsvQuery>,
    body: String,
) -> impl IntoResponse {
    let weather = match read_weather_csv(body.as_bytes()) {
        Ok(series) => series,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response();
        }
    };

    let panel = panel_from(q.capacity_kw, q.tilt_deg, q.azimuth_deg, q.gamma_pdc);
    build_forecast(
        &weather,
        q.latitude,
        q.longitude,
        panel,
        q.mounting.unwrap_or_default(),
    )
}

/// GET /api/weather.csv
///
/// Hourly weather for a coordinate pair as a CSV download — the raw input
/// series behind an estimate, reloadable via `/api/estimate/csv`.
#[utoipa::path(
    get,
    path = "/api/weather.csv",
    params(WeatherQuery),
    responses(
        (status = 200, description = "Weather series CSV", body = String, content_type = "text/csv"),
        (status = 422, description = "Out-of-range coordinates or date range"),
        (status = 502, description = "Weather API unavailable")
    )
)]
pub async fn get_weather_csv(
    Query(q): Query<WeatherQuery>,
    State(shared): State<SharedState>,
) -> impl IntoResponse {
    if let Err(e) = check_coordinates(q.latitude, q.longitude) {
        return estimate_error_response(&e);
    }
    let weather =
        match fetch_weather(&shared, q.latitude, q.longitude, q.start_date, q.end_date).await {
            Ok(series) => series,
            Err(resp) => return resp,
        };

    let mut buf = Vec::new();
    if let Err(e) = write_weather_csv(&weather, &mut buf) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response();
    }

    csv_attachment(
        format!("weather_{:.4}_{:.4}.csv", q.latitude, q.longitude),
        buf,
    )
}

/// POST /api/power/summary
///
/// Recomputes summary statistics from an uploaded power CSV (as produced by
/// the forecast CSV downloads), so a saved series can be re-summarized
/// without re-fetching weather.
#[utoipa::path(
    post,
    path = "/api/power/summary",
    params(SummaryQuery),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Summary statistics", body = ForecastSummary),
        (status = 422, description = "Malformed or empty CSV")
    )
)]
pub async fn summarize_power_csv(
    Query(q): Query<SummaryQuery>,
    body: String,
) -> impl IntoResponse {
    let series = match read_power_csv(body.as_bytes()) {
        Ok(series) => series,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response();
        }
    };

    match summarize(&series, q.latitude) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => estimate_error_response(&e),
    }
}

/// GET /api/geocode
///
/// Nearest city and country for a coordinate pair (dashboard labels).
#[utoipa::path(
    get,
    path = "/api/geocode",
    params(GeocodeQuery),
    responses(
        (status = 200, description = "Nearest known place", body = PlaceResponse)
    )
)]
pub async fn geocode(
    Query(q): Query<GeocodeQuery>,
    State(shared): State<SharedState>,
) -> impl IntoResponse {
    Json(
        shared
            .geocode
            .find_nearest_place(q.latitude, q.longitude)
            .await,
    )
}
