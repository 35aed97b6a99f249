mod geocoder;
mod timezone;

pub use geocoder::{GeocodeError, GeocodedLocation, Geocoder};
pub use timezone::{parse_time_of_day, resolve_zone, LocalWindow, ObserverZone};
