use axum::{
    Router,
    routing::{get, post},
};

use crate::controllers::forecast_controller::{
    estimate, estimate_from_csv, geocode, get_site_forecast, get_site_forecast_csv,
    get_weather_csv, health, list_sites, summarize_power_csv,
};
use crate::shared_state::SharedState;

/// Build the `/api/*` sub-router.
/// Handlers extract `State<AppState>` and/or `State<Config>` via
/// `FromRef<SharedState>` — a single `.with_state(shared)` covers both.
pub fn api_routes(shared: SharedState) -> Router {
    Router::new()
        .route("/health",                   get(health))
        .route("/sites",                    get(list_sites))
        .route("/sites/{id}/forecast",      get(get_site_forecast))
        .route("/sites/{id}/forecast.csv",  get(get_site_forecast_csv))
        .route("/estimate",                 get(estimate))
        .route("/estimate/csv",             post(estimate_from_csv))
        .route("/weather.csv",              get(get_weather_csv))
        .route("/power/summary",            post(summarize_power_csv))
        .route("/geocode",                  get(geocode))
        .with_state(shared)
}
