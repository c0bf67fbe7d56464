//! Reverse geocoding via Nominatim.
//!
//! Resolves a coordinate pair to the nearest city and country for display on
//! the dashboard. Lookup failures are soft: the caller gets placeholder
//! strings, never an error, since the estimate itself doesn't depend on it.

use std::time::Duration;

use reqwest::Client;

use crate::errors::FetchError;
use crate::models::forecast::PlaceResponse;
use crate::models::weather::ReverseGeocodeResponse;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Nominatim requires an identifying User-Agent for API access.
const USER_AGENT: &str = concat!("pv-forecast/", env!("CARGO_PKG_VERSION"));

pub struct GeocodeService {
    client: Client,
}

impl GeocodeService {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { client })
    }

    /// Finds the nearest city and country for a coordinate pair.
    pub async fn find_nearest_place(&self, latitude: f64, longitude: f64) -> PlaceResponse {
        match self.reverse(latitude, longitude).await {
            Ok(place) => place,
            Err(e) => {
                tracing::warn!("reverse geocoding failed: {e}");
                PlaceResponse {
                    city: "City not found".to_string(),
                    country: "Country not found".to_string(),
                }
            }
        }
    }

    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<PlaceResponse, FetchError> {
        let req = self
            .client
            .get(NOMINATIM_URL)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?;

        let status = req.status();
        if !status.is_success() {
            return Err(FetchError(format!("nominatim reverse: {status:?}")));
        }

        let body: ReverseGeocodeResponse = req.json().await?;
        let address = body.address.unwrap_or_default();

        // Smaller settlements report as town or village instead of city.
        let city = address
            .city
            .or(address.town)
            .or(address.village)
            .unwrap_or_else(|| "City not found".to_string());
        let country = address
            .country
            .unwrap_or_else(|| "Country not found".to_string());

        Ok(PlaceResponse { city, country })
    }
}
