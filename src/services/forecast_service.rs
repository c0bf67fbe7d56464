//! Estimation pipeline: weather series in, PV power series out.
//!
//! Data flows strictly forward — sun position, POA transposition, cell
//! temperature, DC power — with each stage producing a fresh value per
//! sample. NaN weather samples (nulls from the upstream API) propagate as
//! NaN power rather than being zero-filled.

use crate::errors::{EstimateError, check_coordinates, check_panel};
use crate::models::forecast::{PanelConfig, PowerPoint};
use crate::models::weather::WeatherSample;
use crate::services::cell_temperature::{MountingParams, cell_temperature};
use crate::services::irradiance::poa_irradiance;
use crate::services::pv_power::pvwatts_dc;
use crate::services::solar_position::sun_position;

/// Estimates hourly PV DC production for a site.
///
/// Inputs are validated before any computation: coordinates must be
/// physical, tilt 0–90, azimuth 0–360 and capacity positive. The returned
/// series shares the weather series' timestamp index sample for sample.
pub fn estimate_pv_production(
    weather: &[WeatherSample],
    latitude: f64,
    longitude: f64,
    panel: &PanelConfig,
    mounting: &MountingParams,
) -> Result<Vec<PowerPoint>, EstimateError> {
    check_coordinates(latitude, longitude)?;
    check_panel(panel.tilt_deg, panel.azimuth_deg, panel.capacity_kw)?;

    let mut series = Vec::with_capacity(weather.len());
    for sample in weather {
        let sun = sun_position(
            sample.time,
            latitude,
            longitude,
            Some(sample.temperature_2m).filter(|t| t.is_finite()),
        )?;

        let poa = poa_irradiance(
            &sun,
            panel.tilt_deg,
            panel.azimuth_deg,
            sample.dni,
            sample.dhi,
            sample.ghi,
            panel.albedo,
        );

        let cell_c = cell_temperature(
            poa.global,
            sample.temperature_2m,
            sample.wind_speed_10m,
            mounting,
        );

        series.push(PowerPoint {
            time: sample.time,
            power_kw: pvwatts_dc(poa.global, cell_c, panel.capacity_kw, panel.gamma_pdc),
        });
    }

    Ok(series)
}
