//! Open-Meteo hourly weather retrieval.
//!
//! Fetches the hourly variables the estimation pipeline needs from the
//! forecast API (upcoming days) or the archive API (historical ranges).
//! Timestamps are requested as unix time so the series index is
//! timezone-aware; the API's default ISO 8601 strings are naive local time.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;

use crate::errors::FetchError;
use crate::models::weather::{HourlyBlock, HourlyWeatherResponse, WeatherSample, WeatherSeries};

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

const HOURLY_VARIABLES: &str = "temperature_2m,wind_speed_10m,direct_normal_irradiance,\
                                diffuse_radiation,shortwave_radiation";

/// Open-Meteo client.
pub struct WeatherService {
    client: Client,
}

impl WeatherService {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client })
    }

    /// Fetches the hourly forecast for the next `forecast_days` days.
    pub async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        forecast_days: u8,
    ) -> Result<WeatherSeries, FetchError> {
        let req = self
            .client
            .get(FORECAST_URL)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", HOURLY_VARIABLES.to_string()),
                ("timeformat", "unixtime".to_string()),
                ("forecast_days", forecast_days.to_string()),
            ])
            .send()
            .await?;

        let status = req.status();
        if !status.is_success() {
            return Err(FetchError(format!("open-meteo forecast: {status:?}")));
        }

        let body: HourlyWeatherResponse = req.json().await?;
        into_series(body.hourly)
    }

    /// Fetches historical hourly data for a closed date range.
    pub async fn get_archive(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<WeatherSeries, FetchError> {
        let req = self
            .client
            .get(ARCHIVE_URL)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", HOURLY_VARIABLES.to_string()),
                ("timeformat", "unixtime".to_string()),
                ("start_date", start_date.to_string()),
                ("end_date", end_date.to_string()),
            ])
            .send()
            .await?;

        let status = req.status();
        if !status.is_success() {
            return Err(FetchError(format!("open-meteo archive: {status:?}")));
        }

        let body: HourlyWeatherResponse = req.json().await?;
        into_series(body.hourly)
    }
}

/// Turns the wire-format parallel arrays into the aligned sample series.
///
/// Fails fast if a required column is absent or its length disagrees with
/// the timestamp index; nulls inside a present column become NaN.
pub fn into_series(hourly: HourlyBlock) -> Result<WeatherSeries, FetchError> {
    let n = hourly.time.len();

    let temperature = take_column("temperature_2m", hourly.temperature_2m, n)?;
    let wind = take_column("wind_speed_10m", hourly.wind_speed_10m, n)?;
    let dni = take_column("direct_normal_irradiance", hourly.direct_normal_irradiance, n)?;
    let dhi = take_column("diffuse_radiation", hourly.diffuse_radiation, n)?;
    let ghi = take_column("shortwave_radiation", hourly.shortwave_radiation, n)?;

    let mut series = Vec::with_capacity(n);
    for (i, &unix) in hourly.time.iter().enumerate() {
        let time = DateTime::<Utc>::from_timestamp(unix, 0)
            .ok_or_else(|| FetchError(format!("unrepresentable unix timestamp {unix}")))?;
        series.push(WeatherSample {
            time,
            temperature_2m: temperature[i],
            wind_speed_10m: wind[i],
            dni: dni[i],
            dhi: dhi[i],
            ghi: ghi[i],
        });
    }

    Ok(series)
}

fn take_column(
    name: &'static str,
    column: Option<Vec<Option<f64>>>,
    expected_len: usize,
) -> Result<Vec<f64>, FetchError> {
    let column = column.ok_or_else(|| FetchError(format!("hourly column '{name}' missing")))?;
    if column.len() != expected_len {
        return Err(FetchError(format!(
            "hourly column '{name}' has {} samples, timestamp index has {expected_len}",
            column.len()
        )));
    }
    Ok(column
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(n: usize) -> HourlyBlock {
        HourlyBlock {
            time: (0..n as i64).map(|i| 1_750_000_000 + i * 3600).collect(),
            temperature_2m: Some(vec![Some(15.0); n]),
            wind_speed_10m: Some(vec![Some(3.0); n]),
            direct_normal_irradiance: Some(vec![Some(500.0); n]),
            diffuse_radiation: Some(vec![Some(100.0); n]),
            shortwave_radiation: Some(vec![Some(400.0); n]),
        }
    }

    #[test]
    fn aligned_block_converts_sample_for_sample() {
        let series = into_series(block(4)).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series[0].ghi, 400.0);
        // Hourly spacing preserved.
        assert_eq!(
            (series[1].time - series[0].time).num_seconds(),
            3600
        );
    }

    #[test]
    fn missing_column_is_a_hard_error() {
        let mut b = block(4);
        b.wind_speed_10m = None;
        let err = into_series(b).unwrap_err();
        assert!(err.0.contains("wind_speed_10m"), "{err}");
    }

    #[test]
    fn misaligned_column_is_a_hard_error() {
        let mut b = block(4);
        b.diffuse_radiation = Some(vec![Some(100.0); 3]);
        let err = into_series(b).unwrap_err();
        assert!(err.0.contains("diffuse_radiation"), "{err}");
    }

    #[test]
    fn null_samples_become_nan_not_zero() {
        let mut b = block(2);
        b.shortwave_radiation = Some(vec![Some(400.0), None]);
        let series = into_series(b).unwrap();
        assert!(series[1].ghi.is_nan());
    }

    #[test]
    fn wire_format_parses() {
        let json = r#"{
            "hourly": {
                "time": [1750000000, 1750003600],
                "temperature_2m": [18.2, null],
                "wind_speed_10m": [2.5, 3.1],
                "direct_normal_irradiance": [610.0, 645.5],
                "diffuse_radiation": [95.0, 90.0],
                "shortwave_radiation": [520.0, 560.0]
            }
        }"#;
        let parsed: HourlyWeatherResponse = serde_json::from_str(json).unwrap();
        let series = into_series(parsed.hourly).unwrap();
        assert_eq!(series.len(), 2);
        assert!(series[1].temperature_2m.is_nan());
        assert_eq!(series[1].dni, 645.5);
    }
}
