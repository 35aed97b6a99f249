use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ephemeris::EphemerisError;

// WGS-84
const WGS84_A_KM: f64 = 6378.137;
const WGS84_E2: f64 = 0.006_694_379_990_14;

/// Geodetic observer location, fixed for one computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self, EphemerisError> {
        Self::with_altitude(latitude_deg, longitude_deg, 0.0)
    }

    pub fn with_altitude(
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_m: f64,
    ) -> Result<Self, EphemerisError> {
        if !latitude_deg.is_finite() || !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(EphemerisError::InvalidObserver(format!(
                "latitude {} outside -90..90",
                latitude_deg
            )));
        }
        if !longitude_deg.is_finite() || !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(EphemerisError::InvalidObserver(format!(
                "longitude {} outside -180..180",
                longitude_deg
            )));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        })
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        [
            (n + alt_km) * cos_lat * lon.cos(),
            (n + alt_km) * cos_lat * lon.sin(),
            (n * (1.0 - WGS84_E2) + alt_km) * sin_lat,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(Observer::new(91.0, 0.0).is_err());
        assert!(Observer::new(0.0, -180.5).is_err());
        assert!(Observer::new(f64::NAN, 0.0).is_err());
        assert!(Observer::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn equator_prime_meridian_is_on_x_axis() {
        let pos = Observer::new(0.0, 0.0).unwrap().position_ecef_km();
        assert!((pos[0] - WGS84_A_KM).abs() < 1e-9);
        assert!(pos[1].abs() < 1e-9);
        assert!(pos[2].abs() < 1e-9);
    }
}
