//! Solar position resolver.
//!
//! Implements algorithm no. 3 from Grena, "Five new algorithms for the
//! computation of sun position from 2010 to 2110", Solar Energy 86 (2012),
//! pp. 1323–1337. Maximum error 0.01° within 2010–2110, which is on par with
//! the published tolerance of the full NREL SPA for PV purposes.
//!
//! Refraction near the horizon is corrected from ambient temperature when one
//! is supplied (cooler air bends light more, raising the apparent sun);
//! pressure is taken as the standard atmosphere.

use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::errors::{EstimateError, check_coordinates};

/// Standard sea-level pressure used for the refraction term (hPa).
const STANDARD_PRESSURE_HPA: f64 = 1013.25;

/// ΔT between terrestrial time and UT1 (seconds). Slowly drifting; a fixed
/// present-day value is accurate to well under the algorithm's own error.
const DELTA_T_SECONDS: f64 = 69.0;

/// Topocentric sun position for one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// Zenith angle in degrees: 0 = directly overhead, >90 = below horizon.
    pub zenith_deg: f64,
    /// Azimuth in degrees from true north, clockwise (0..360).
    pub azimuth_deg: f64,
}

impl SunPosition {
    pub fn is_sun_up(&self) -> bool {
        self.zenith_deg < 90.0
    }
}

/// Computes the apparent sun position for a timezone-aware instant.
///
/// * `time` — UTC instant (naive timestamps cannot reach this function)
/// * `latitude` / `longitude` — site coordinates in signed degrees
/// * `temperature_c` — ambient temperature for the refraction correction;
///   `None` skips the correction entirely
pub fn sun_position(
    time: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    temperature_c: Option<f64>,
) -> Result<SunPosition, EstimateError> {
    check_coordinates(latitude, longitude)?;

    // Days since 2000-01-01 12:00 TT, per the paper's compact calendar form.
    let t = days_since_j2000(time);
    let t_e = t + 1.1574e-5 * DELTA_T_SECONDS;
    let omega = 0.0172019715 * t_e;

    // Apparent ecliptic longitude of the sun.
    let lambda = -1.388803
        + 1.720279216e-2 * t_e
        + 3.3366e-2 * (omega - 0.06172).sin()
        + 3.53e-4 * (2.0 * omega - 0.1163).sin();

    // Obliquity of the ecliptic.
    let epsilon = 4.089567e-1 - 6.19e-9 * t_e;

    let s_lambda = lambda.sin();
    let c_lambda = lambda.cos();
    let s_epsilon = epsilon.sin();
    let c_epsilon = (1.0 - s_epsilon * s_epsilon).sqrt();

    // Right ascension, normalized to 0..2π.
    let mut alpha = (s_lambda * c_epsilon).atan2(c_lambda);
    if alpha < 0.0 {
        alpha += 2.0 * PI;
    }

    // Declination.
    let delta = (s_lambda * s_epsilon).asin();

    // Local hour angle, wrapped to -π..π.
    let mut h = 1.7528311 + 6.300388099 * t + longitude.to_radians() - alpha;
    h = ((h + PI) % (2.0 * PI)) - PI;
    if h < -PI {
        h += 2.0 * PI;
    }

    // Topocentric elevation and azimuth.
    let s_phi = latitude.to_radians().sin();
    let c_phi = (1.0 - s_phi * s_phi).sqrt();
    let s_delta = delta.sin();
    let c_delta = (1.0 - s_delta * s_delta).sqrt();

    let s_elev = s_phi * s_delta + c_phi * c_delta * h.cos();
    // Parallax-corrected elevation.
    let elev = s_elev.asin() - 4.26e-5 * (1.0 - s_elev * s_elev).sqrt();
    let gamma = h.sin().atan2(h.cos() * s_phi - s_delta * c_phi / c_delta);

    let refraction = match temperature_c {
        // Only meaningful above the horizon; the formula diverges below.
        Some(temp) if temp > -273.0 && elev > 0.0 => {
            (0.08422 * (STANDARD_PRESSURE_HPA / 1000.0))
                / ((273.0 + temp) * (elev + 0.003138 / (elev + 0.08919)).tan())
        }
        _ => 0.0,
    };

    let zenith = PI / 2.0 - elev - refraction;
    let azimuth = (gamma + PI).to_degrees().rem_euclid(360.0);

    Ok(SunPosition {
        zenith_deg: zenith.to_degrees(),
        azimuth_deg: azimuth,
    })
}

/// Days since 2000-01-01 12:00 TT from a UTC instant (integer-truncated
/// calendar form from the paper).
fn days_since_j2000(time: DateTime<Utc>) -> f64 {
    let mut month = time.month() as i32;
    let mut year = time.year();
    let day = time.day() as i32;
    let hour = f64::from(time.hour())
        + f64::from(time.minute()) / 60.0
        + f64::from(time.second()) / 3600.0;

    if month <= 2 {
        month += 12;
        year -= 1;
    }

    f64::from((365.25 * f64::from(year - 2000)) as i32)
        + f64::from((30.6001 * f64::from(month + 1)) as i32)
        - f64::from((0.01 * f64::from(year)) as i32)
        + f64::from(day)
        + 0.0416667 * hour
        - 21958.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn elevation_deg(pos: &SunPosition) -> f64 {
        90.0 - pos.zenith_deg
    }

    #[test]
    fn summer_noon_turin_is_high_and_southern() {
        // Solar noon in Turin on the June solstice is ~11:15 UTC.
        let t = Utc.with_ymd_and_hms(2025, 6, 21, 11, 15, 0).unwrap();
        let pos = sun_position(t, 45.07, 7.33, Some(25.0)).unwrap();
        assert!(
            elevation_deg(&pos) > 60.0,
            "summer noon elevation should exceed 60°, got {:.1}",
            elevation_deg(&pos)
        );
        assert!(
            (pos.azimuth_deg - 180.0).abs() < 20.0,
            "sun should be near due south at solar noon, got {:.1}°",
            pos.azimuth_deg
        );
    }

    #[test]
    fn winter_noon_is_much_lower() {
        let t = Utc.with_ymd_and_hms(2025, 12, 21, 11, 30, 0).unwrap();
        let pos = sun_position(t, 45.07, 7.33, Some(5.0)).unwrap();
        assert!(
            elevation_deg(&pos) > 15.0 && elevation_deg(&pos) < 30.0,
            "winter noon elevation should be 15–30°, got {:.1}",
            elevation_deg(&pos)
        );
    }

    #[test]
    fn midnight_sun_is_below_horizon() {
        let t = Utc.with_ymd_and_hms(2025, 6, 21, 23, 0, 0).unwrap();
        let pos = sun_position(t, 45.07, 7.33, None).unwrap();
        assert!(!pos.is_sun_up());
        assert!(pos.zenith_deg > 90.0);
    }

    #[test]
    fn southern_hemisphere_noon_sun_is_north() {
        // Melbourne, December solstice, local solar noon ~02:20 UTC.
        let t = Utc.with_ymd_and_hms(2025, 12, 21, 2, 20, 0).unwrap();
        let pos = sun_position(t, -37.81, 144.96, Some(22.0)).unwrap();
        assert!(pos.is_sun_up());
        assert!(
            pos.azimuth_deg < 60.0 || pos.azimuth_deg > 300.0,
            "southern-hemisphere summer noon sun should bear north, got {:.1}°",
            pos.azimuth_deg
        );
    }

    #[test]
    fn refraction_raises_the_sun_near_the_horizon() {
        // Pick an instant with the sun low over the horizon.
        let t = Utc.with_ymd_and_hms(2025, 6, 21, 4, 30, 0).unwrap();
        let without = sun_position(t, 45.07, 7.33, None).unwrap();
        let cold = sun_position(t, 45.07, 7.33, Some(-10.0)).unwrap();
        let warm = sun_position(t, 45.07, 7.33, Some(30.0)).unwrap();
        if without.is_sun_up() {
            assert!(cold.zenith_deg < without.zenith_deg);
            // Colder air refracts more strongly.
            assert!(cold.zenith_deg < warm.zenith_deg);
        }
    }

    #[test]
    fn invalid_coordinates_are_rejected() {
        let t = Utc.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap();
        assert!(sun_position(t, 95.0, 0.0, None).is_err());
        assert!(sun_position(t, 0.0, 185.0, None).is_err());
    }

    #[test]
    fn full_latitude_range_stays_in_bounds() {
        let t = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
        for lat in [-90.0, -60.0, -30.0, 0.0, 30.0, 60.0, 90.0] {
            let pos = sun_position(t, lat, 0.0, Some(15.0)).unwrap();
            assert!((0.0..=360.0).contains(&pos.azimuth_deg));
            assert!((0.0..=180.0).contains(&pos.zenith_deg));
        }
    }

    #[test]
    fn equinox_noon_elevation_matches_colatitude() {
        // At the March equinox the sun's declination is ~0, so solar-noon
        // elevation at longitude 0 is close to 90 - |latitude|.
        let t = Utc.with_ymd_and_hms(2025, 3, 20, 12, 7, 0).unwrap();
        let pos = sun_position(t, 45.0, 0.0, None).unwrap();
        assert!(
            (elevation_deg(&pos) - 45.0).abs() < 1.5,
            "equinox noon elevation at 45°N should be ~45°, got {:.2}",
            elevation_deg(&pos)
        );
    }
}
