//! Plane-of-array irradiance transposition.
//!
//! Projects the three measured irradiance components onto a tilted, oriented
//! panel surface. The sky-diffuse term uses the isotropic model — the
//! documented baseline here; an anisotropic model (Perez) would raise
//! fidelity slightly at the cost of a solar-geometry dependency in the
//! diffuse term.

use crate::models::forecast::PoaIrradiance;
use crate::services::solar_position::SunPosition;

/// Cosine of the angle of incidence between the sun vector and the panel
/// normal. Negative values mean the sun is behind the panel plane.
fn cos_incidence(sun: &SunPosition, tilt_deg: f64, azimuth_deg: f64) -> f64 {
    let zenith = sun.zenith_deg.to_radians();
    let tilt = tilt_deg.to_radians();
    let az_diff = (sun.azimuth_deg - azimuth_deg).to_radians();

    zenith.cos() * tilt.cos() + zenith.sin() * tilt.sin() * az_diff.cos()
}

/// Computes the POA irradiance breakdown for one sample.
///
/// * `sun` — solar position at the sample instant
/// * `tilt_deg` / `azimuth_deg` — panel orientation (validated upstream)
/// * `dni` / `dhi` / `ghi` — measured irradiance components (W/m²)
/// * `albedo` — ground reflectance for the reflected term
///
/// The beam term is forced to exactly 0 whenever the sun is at or below the
/// horizon, regardless of the incidence-cosine sign.
pub fn poa_irradiance(
    sun: &SunPosition,
    tilt_deg: f64,
    azimuth_deg: f64,
    dni: f64,
    dhi: f64,
    ghi: f64,
    albedo: f64,
) -> PoaIrradiance {
    let beam = if sun.is_sun_up() {
        dni * cos_incidence(sun, tilt_deg, azimuth_deg).max(0.0)
    } else {
        0.0
    };

    let tilt_cos = tilt_deg.to_radians().cos();
    let sky_diffuse = dhi * (1.0 + tilt_cos) / 2.0;
    let ground_reflected = ghi * albedo * (1.0 - tilt_cos) / 2.0;

    PoaIrradiance {
        beam,
        sky_diffuse,
        ground_reflected,
        global: beam + sky_diffuse + ground_reflected,
    }
}
