use utoipa::OpenApi;

use crate::config;
use crate::controllers::forecast_controller;
use crate::models::forecast;
use crate::services::cell_temperature;

#[derive(OpenApi)]
#[openapi(
    paths(
        forecast_controller::health,
        forecast_controller::list_sites,
        forecast_controller::get_site_forecast,
        forecast_controller::get_site_forecast_csv,
        forecast_controller::estimate,
        forecast_controller::estimate_from_csv,
        forecast_controller::get_weather_csv,
        forecast_controller::summarize_power_csv,
        forecast_controller::geocode
    ),
    components(
        schemas(
            config::SiteConfig,
            cell_temperature::Mounting,
            forecast::PanelConfig,
            forecast::PowerPoint,
            forecast::ForecastSummary,
            forecast::ForecastResponse,
            forecast::PlaceResponse,
            forecast::HealthStatus
        )
    ),
    tags(
        (name = "pv-forecast", description = "PV production forecast API")
    )
)]
pub struct ApiDoc;
