pub mod forecast;
pub mod weather;
