use std::fmt;
use std::fmt::Formatter;

/// Errors from the pure estimation pipeline.
///
/// Out-of-range geometry is rejected up front rather than clamped, so a bad
/// tilt or azimuth can never produce a silently wrong production estimate.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimateError {
    /// Latitude outside -90..=90 degrees.
    InvalidLatitude(f64),
    /// Longitude outside -180..=180 degrees.
    InvalidLongitude(f64),
    /// Panel tilt outside 0..=90 degrees from horizontal.
    InvalidTilt(f64),
    /// Panel azimuth outside 0..=360 degrees from true north.
    InvalidAzimuth(f64),
    /// Rated DC capacity must be > 0 kW.
    InvalidCapacity(f64),
    /// Summary statistics are undefined for an empty power series.
    EmptySeries,
}

impl fmt::Display for EstimateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLatitude(v) => {
                write!(f, "latitude {v}° is outside -90..=90")
            }
            Self::InvalidLongitude(v) => {
                write!(f, "longitude {v}° is outside -180..=180")
            }
            Self::InvalidTilt(v) => {
                write!(f, "panel tilt {v}° is outside 0..=90")
            }
            Self::InvalidAzimuth(v) => {
                write!(f, "panel azimuth {v}° is outside 0..=360")
            }
            Self::InvalidCapacity(v) => {
                write!(f, "rated capacity {v} kW must be greater than 0")
            }
            Self::EmptySeries => {
                write!(f, "cannot summarize an empty power series")
            }
        }
    }
}

impl std::error::Error for EstimateError {}

/// Validates geographic coordinates.
pub fn check_coordinates(latitude: f64, longitude: f64) -> Result<(), EstimateError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(EstimateError::InvalidLatitude(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(EstimateError::InvalidLongitude(longitude));
    }
    Ok(())
}

/// Validates the panel configuration surface exposed to callers.
pub fn check_panel(tilt: f64, azimuth: f64, capacity_kw: f64) -> Result<(), EstimateError> {
    // RangeInclusive::contains is false for NaN, so NaN inputs are rejected too.
    if !(0.0..=90.0).contains(&tilt) {
        return Err(EstimateError::InvalidTilt(tilt));
    }
    if !(0.0..=360.0).contains(&azimuth) {
        return Err(EstimateError::InvalidAzimuth(azimuth));
    }
    if capacity_kw <= 0.0 || !capacity_kw.is_finite() {
        return Err(EstimateError::InvalidCapacity(capacity_kw));
    }
    Ok(())
}

/// Error from the weather / geocoding HTTP collaborators.
#[derive(Debug)]
pub struct FetchError(pub String);

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "FetchError: {}", self.0)
    }
}

impl std::error::Error for FetchError {}

impl From<&str> for FetchError {
    fn from(e: &str) -> Self {
        FetchError(e.to_string())
    }
}
impl From<String> for FetchError {
    fn from(e: String) -> Self {
        FetchError(e)
    }
}
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError(e.to_string())
    }
}
impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_at_the_poles_are_valid() {
        assert!(check_coordinates(90.0, 180.0).is_ok());
        assert!(check_coordinates(-90.0, -180.0).is_ok());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        assert_eq!(
            check_coordinates(95.0, 0.0),
            Err(EstimateError::InvalidLatitude(95.0))
        );
        assert_eq!(
            check_coordinates(0.0, 185.0),
            Err(EstimateError::InvalidLongitude(185.0))
        );
    }

    #[test]
    fn panel_geometry_is_rejected_not_clamped() {
        assert_eq!(
            check_panel(91.0, 180.0, 1.0),
            Err(EstimateError::InvalidTilt(91.0))
        );
        assert_eq!(
            check_panel(30.0, 361.0, 1.0),
            Err(EstimateError::InvalidAzimuth(361.0))
        );
        assert_eq!(
            check_panel(30.0, 180.0, 0.0),
            Err(EstimateError::InvalidCapacity(0.0))
        );
        assert!(check_panel(0.0, 0.0, 0.5).is_ok());
        assert!(check_panel(90.0, 360.0, 12.0).is_ok());
    }
}
