//! CSV persistence for weather and power series.
//!
//! Both files carry a header row and a `date` column holding RFC 3339
//! timestamps, so a written series reloads with the same timezone-aware
//! index. Dates without a UTC offset are rejected on read — a naive
//! timestamp would silently shift every solar position computed from it.

use std::fmt;
use std::fmt::Formatter;
use std::io::{Read, Write};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::forecast::PowerPoint;
use crate::models::weather::{WeatherSample, WeatherSeries};

const WEATHER_HEADER: [&str; 6] = [
    "date",
    "temperature_2m",
    "wind_speed_10m",
    "dni",
    "dhi",
    "ghi",
];

/// Power column name, matching the series label the dashboard displays.
const POWER_COLUMN: &str = "PV power [kW]";

#[derive(Debug)]
pub struct CsvError(pub String);

impl fmt::Display for CsvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "CsvError: {}", self.0)
    }
}

impl std::error::Error for CsvError {}

impl From<csv::Error> for CsvError {
    fn from(e: csv::Error) -> Self {
        CsvError(e.to_string())
    }
}
impl From<std::io::Error> for CsvError {
    fn from(e: std::io::Error) -> Self {
        CsvError(e.to_string())
    }
}

// ─── Power series ────────────────────────────────────────────────────────────

/// Writes a power series as CSV to any writer.
pub fn write_power_csv(series: &[PowerPoint], writer: impl Write) -> Result<(), CsvError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(["date", POWER_COLUMN])?;
    for p in series {
        wtr.write_record(&[
            p.time.to_rfc3339_opts(SecondsFormat::Secs, true),
            format!("{:.6}", p.power_kw),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads a power series back, parsing `date` as the timestamp index.
pub fn read_power_csv(reader: impl Read) -> Result<Vec<PowerPoint>, CsvError> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
    check_header(rdr.headers()?, &["date", POWER_COLUMN])?;

    let mut series = Vec::new();
    for record in rdr.records() {
        let record = record?;
        series.push(PowerPoint {
            time: parse_date(record.get(0).unwrap_or_default())?,
            power_kw: parse_value(&record, 1)?,
        });
    }
    Ok(series)
}

// ─── Weather series ──────────────────────────────────────────────────────────

/// Writes a weather series as CSV to any writer.
pub fn write_weather_csv(series: &[WeatherSample], writer: impl Write) -> Result<(), CsvError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(WEATHER_HEADER)?;
    for s in series {
        wtr.write_record(&[
            s.time.to_rfc3339_opts(SecondsFormat::Secs, true),
            format!("{:.4}", s.temperature_2m),
            format!("{:.4}", s.wind_speed_10m),
            format!("{:.4}", s.dni),
            format!("{:.4}", s.dhi),
            format!("{:.4}", s.ghi),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads a weather series back, parsing `date` as the timestamp index.
pub fn read_weather_csv(reader: impl Read) -> Result<WeatherSeries, CsvError> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
    check_header(rdr.headers()?, &WEATHER_HEADER)?;

    let mut series = Vec::new();
    for record in rdr.records() {
        let record = record?;
        series.push(WeatherSample {
            time: parse_date(record.get(0).unwrap_or_default())?,
            temperature_2m: parse_value(&record, 1)?,
            wind_speed_10m: parse_value(&record, 2)?,
            dni: parse_value(&record, 3)?,
            dhi: parse_value(&record, 4)?,
            ghi: parse_value(&record, 5)?,
        });
    }
    Ok(series)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn check_header(headers: &csv::StringRecord, expected: &[&str]) -> Result<(), CsvError> {
    let actual: Vec<&str> = headers.iter().collect();
    if actual != expected {
        return Err(CsvError(format!(
            "unexpected header {actual:?}, expected {expected:?}"
        )));
    }
    Ok(())
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, CsvError> {
    // RFC 3339 always carries an offset; a bare local datetime fails here,
    // which is the documented rejection of timezone-naive indices.
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CsvError(format!("date '{raw}' is not a timezone-aware RFC 3339 timestamp: {e}")))
}

fn parse_value(record: &csv::StringRecord, index: usize) -> Result<f64, CsvError> {
    let raw = record
        .get(index)
        .ok_or_else(|| CsvError(format!("row is missing column {index}")))?;
    raw.parse::<f64>()
        .map_err(|e| CsvError(format!("value '{raw}' in column {index}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn power_series() -> Vec<PowerPoint> {
        let start = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        (0..24)
            .map(|i| PowerPoint {
                time: start + Duration::hours(i),
                power_kw: (i as f64 * 0.37).sin().abs() * 4.2,
            })
            .collect()
    }

    #[test]
    fn power_round_trip_preserves_values_and_order() {
        let series = power_series();
        let mut buf = Vec::new();
        write_power_csv(&series, &mut buf).unwrap();

        let reloaded = read_power_csv(buf.as_slice()).unwrap();
        assert_eq!(reloaded.len(), series.len());
        for (a, b) in series.iter().zip(&reloaded) {
            assert_eq!(a.time, b.time);
            assert!((a.power_kw - b.power_kw).abs() < 1e-6);
        }
    }

    #[test]
    fn weather_round_trip_preserves_all_columns() {
        let start = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let series: WeatherSeries = (0..6)
            .map(|i| WeatherSample {
                time: start + Duration::hours(i),
                temperature_2m: 15.0 + i as f64,
                wind_speed_10m: 2.5,
                dni: 600.0 - i as f64 * 10.0,
                dhi: 80.0,
                ghi: 450.0,
            })
            .collect();

        let mut buf = Vec::new();
        write_weather_csv(&series, &mut buf).unwrap();
        let reloaded = read_weather_csv(buf.as_slice()).unwrap();
        for (a, b) in series.iter().zip(&reloaded) {
            assert_eq!(a.time, b.time);
            assert!((a.dni - b.dni).abs() < 1e-4);
            assert!((a.temperature_2m - b.temperature_2m).abs() < 1e-4);
        }
    }

    #[test]
    fn header_row_is_first_line() {
        let mut buf = Vec::new();
        write_power_csv(&power_series(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next().unwrap(), "date,PV power [kW]");
    }

    #[test]
    fn naive_dates_are_rejected_on_read() {
        let csv = "date,PV power [kW]\n2025-07-01T12:00:00,1.0\n";
        let err = read_power_csv(csv.as_bytes()).unwrap_err();
        assert!(err.0.contains("timezone-aware"), "{err}");
    }

    #[test]
    fn wrong_header_is_rejected() {
        let csv = "date,power\n2025-07-01T12:00:00Z,1.0\n";
        assert!(read_power_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn deterministic_output() {
        let series = power_series();
        let mut a = Vec::new();
        let mut b = Vec::new();
        write_power_csv(&series, &mut a).unwrap();
        write_power_csv(&series, &mut b).unwrap();
        assert_eq!(a, b);
    }
}
