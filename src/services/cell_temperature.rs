//! Cell temperature estimator.
//!
//! Sandia Array Performance Model thermal stage (King et al. 2004): module
//! back-surface temperature decays exponentially with wind from an
//! irradiance-driven offset above ambient, and the cell sits an
//! irradiance-proportional gradient above the back surface.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mounting configuration selector for config files and query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Mounting {
    #[default]
    OpenRackGlassPolymer,
    CloseMountGlassGlass,
}

impl Mounting {
    pub fn params(self) -> MountingParams {
        match self {
            Self::OpenRackGlassPolymer => MountingParams::OPEN_RACK_GLASS_POLYMER,
            Self::CloseMountGlassGlass => MountingParams::CLOSE_MOUNT_GLASS_GLASS,
        }
    }
}

/// Empirical SAPM mounting constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountingParams {
    pub a: f64,
    pub b: f64,
    /// Cell-to-back-surface gradient at 1000 W/m² (°C).
    pub delta_t: f64,
}

impl MountingParams {
    /// Published constants for open-rack, glass/polymer modules — the
    /// default mounting configuration.
    pub const OPEN_RACK_GLASS_POLYMER: Self = Self {
        a: -3.56,
        b: -0.075,
        delta_t: 3.0,
    };

    /// Published constants for close-roof-mount, glass/glass modules.
    pub const CLOSE_MOUNT_GLASS_GLASS: Self = Self {
        a: -2.98,
        b: -0.0471,
        delta_t: 1.0,
    };
}

impl Default for MountingParams {
    fn default() -> Self {
        Self::OPEN_RACK_GLASS_POLYMER
    }
}

/// Estimates cell temperature (°C) from POA irradiance, ambient temperature
/// and wind speed at 10 m.
///
/// `T_module = poa * exp(a + b*wind) + T_ambient`
/// `T_cell   = T_module + poa/1000 * deltaT`
pub fn cell_temperature(
    poa_global: f64,
    ambient_c: f64,
    wind_speed_10m: f64,
    mounting: &MountingParams,
) -> f64 {
    let module = poa_global * (mounting.a + mounting.b * wind_speed_10m).exp() + ambient_c;
    module + poa_global / 1000.0 * mounting.delta_t
}
