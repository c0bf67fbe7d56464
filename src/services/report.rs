//! Summary reporting and the tilt/azimuth rule of thumb.

use crate::errors::EstimateError;
use crate::models::forecast::{ForecastSummary, PowerPoint};

/// Rule-of-thumb best fixed-mount angles for a latitude.
///
/// Tilt ≈ |latitude| (capped at vertical); face south in the northern
/// hemisphere and at the equator, north in the southern. This approximates
/// the annual-yield optimum without running a full-year simulation grid.
pub fn best_pv_angles(latitude: f64) -> (f64, f64) {
    let tilt = latitude.abs().min(90.0);
    let azimuth = if latitude >= 0.0 { 180.0 } else { 0.0 };
    (tilt, azimuth)
}

/// Aggregates an hourly power series into summary statistics.
///
/// Samples are hourly, so summing kW values yields kWh directly. An empty
/// series is an explicit error — the per-day average would otherwise divide
/// by zero.
pub fn summarize(series: &[PowerPoint], latitude: f64) -> Result<ForecastSummary, EstimateError> {
    if series.is_empty() {
        return Err(EstimateError::EmptySeries);
    }

    let total_energy_kwh: f64 = series.iter().map(|p| p.power_kw).sum();
    let avg_energy_per_day_kwh = total_energy_kwh * 24.0 / series.len() as f64;

    let mut peak = &series[0];
    for p in &series[1..] {
        if p.power_kw > peak.power_kw {
            peak = p;
        }
    }

    let (recommended_tilt_deg, recommended_azimuth_deg) = best_pv_angles(latitude);

    Ok(ForecastSummary {
        total_energy_kwh,
        avg_energy_per_day_kwh,
        peak_power_kw: peak.power_kw,
        peak_time: peak.time,
        recommended_tilt_deg,
        recommended_azimuth_deg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn hourly_series(values: &[f64]) -> Vec<PowerPoint> {
        let start = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| PowerPoint {
                time: start + chrono::Duration::hours(i as i64),
                power_kw: v,
            })
            .collect()
    }

    #[test]
    fn equator_gets_flat_south_facing() {
        assert_eq!(best_pv_angles(0.0), (0.0, 180.0));
        // Tiny latitudes on either side split at zero.
        assert_eq!(best_pv_angles(0.01).1, 180.0);
        assert_eq!(best_pv_angles(-0.01).1, 0.0);
    }

    #[test]
    fn mid_latitudes_tilt_to_latitude() {
        assert_eq!(best_pv_angles(45.0), (45.0, 180.0));
        assert_eq!(best_pv_angles(-45.0), (45.0, 0.0));
    }

    #[test]
    fn out_of_physical_range_latitude_clamps_tilt() {
        let (tilt, _) = best_pv_angles(100.0);
        assert_eq!(tilt, 90.0);
    }

    #[test]
    fn constant_one_kw_day_sums_to_24_kwh() {
        let series = hourly_series(&[1.0; 24]);
        let s = summarize(&series, 45.0).unwrap();
        assert!((s.total_energy_kwh - 24.0).abs() < 1e-12);
        assert!((s.avg_energy_per_day_kwh - 24.0).abs() < 1e-12);
    }

    #[test]
    fn peak_reports_value_and_timestamp() {
        let series = hourly_series(&[0.0, 0.4, 2.5, 1.1]);
        let s = summarize(&series, 52.5).unwrap();
        assert_eq!(s.peak_power_kw, 2.5);
        assert_eq!(s.peak_time, series[2].time);
        assert_eq!(s.recommended_tilt_deg, 52.5);
        assert_eq!(s.recommended_azimuth_deg, 180.0);
    }

    #[test]
    fn empty_series_is_an_explicit_error() {
        assert_eq!(summarize(&[], 45.0), Err(EstimateError::EmptySeries));
    }
}
