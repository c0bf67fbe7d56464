pub mod cell_temperature;
pub mod forecast_service;
pub mod geocode_service;
pub mod irradiance;
pub mod pv_power;
pub mod report;
pub mod solar_position;
pub mod weather_service;
