use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::ephemeris::CardinalDirection;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One minute at which a satellite is above the observer's horizon.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VisibilitySample {
    pub satellite: String,
    pub norad_id: u32,
    pub timestamp: DateTime<Utc>,
    pub right_ascension_h: f64,
    pub declination_deg: f64,
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
    pub direction: CardinalDirection,
}

/// Display form of a [`VisibilitySample`].
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EphemerisRow {
    pub date_utc: String,
    pub satellite: String,
    pub right_ascension: String,
    pub declination: String,
    pub altitude: String,
    pub azimuth: String,
}

impl From<&VisibilitySample> for EphemerisRow {
    fn from(sample: &VisibilitySample) -> Self {
        EphemerisRow {
            date_utc: sample.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            satellite: sample.satellite.clone(),
            right_ascension: format_hours(sample.right_ascension_h),
            declination: format_degrees(sample.declination_deg),
            altitude: format!("{:.2}°", sample.altitude_deg),
            azimuth: format!("{:.2}° ({})", sample.azimuth_deg, sample.direction),
        }
    }
}

/// Result of one computation. No samples means nothing was visible, or the
/// satellite set could not be resolved; `diagnostics` tells which.
#[derive(Debug, Clone, Default)]
pub struct EphemerisTable {
    pub samples: Vec<VisibilitySample>,
    pub diagnostics: Vec<String>,
}

impl EphemerisTable {
    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            samples: Vec::new(),
            diagnostics: vec![diagnostic.into()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn rows(&self) -> Vec<EphemerisRow> {
        self.samples.iter().map(EphemerisRow::from).collect()
    }
}

/// `12h 34m 56.78s`
pub fn format_hours(hours: f64) -> String {
    let centis = (hours.rem_euclid(24.0) * 360_000.0).round() as i64 % (24 * 360_000);
    let h = centis / 360_000;
    let m = centis % 360_000 / 6_000;
    let s = (centis % 6_000) as f64 / 100.0;
    format!("{:02}h {:02}m {:05.2}s", h, m, s)
}

/// `+12deg 34' 56.7"`
pub fn format_degrees(degrees: f64) -> String {
    let sign = if degrees < 0.0 { '-' } else { '+' };
    let decis = (degrees.abs() * 36_000.0).round() as i64;
    let d = decis / 36_000;
    let m = decis % 36_000 / 600;
    let s = (decis % 600) as f64 / 10.0;
    format!("{}{:02}deg {:02}' {:04.1}\"", sign, d, m, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VisibilitySample {
        VisibilitySample {
            satellite: "ISS (ZARYA)".to_string(),
            norad_id: 25544,
            timestamp: "2024-03-01T10:15:00Z".parse().unwrap(),
            right_ascension_h: 12.5,
            declination_deg: -7.25,
            altitude_deg: 45.678,
            azimuth_deg: 44.0,
            direction: CardinalDirection::N,
        }
    }

    #[test]
    fn formats_row() {
        let row = EphemerisRow::from(&sample());
        assert_eq!(row.date_utc, "2024-03-01 10:15:00");
        assert_eq!(row.altitude, "45.68°");
        assert_eq!(row.azimuth, "44.00° (N)");
        assert_eq!(row.right_ascension, "12h 30m 00.00s");
        assert_eq!(row.declination, "-07deg 15' 00.0\"");
    }

    #[test]
    fn sexagesimal_rounding_carries() {
        assert_eq!(format_hours(1.999_999_9), "02h 00m 00.00s");
        assert_eq!(format_hours(23.999_999_9), "00h 00m 00.00s");
        assert_eq!(format_degrees(0.0), "+00deg 00' 00.0\"");
        assert_eq!(format_degrees(89.999_999_9), "+90deg 00' 00.0\"");
    }
}
