use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use crate::ephemeris::frames::{right_ascension_declination, teme_to_j2000};
use crate::ephemeris::{EphemerisError, Observer, Satellite};

/// Observer-relative position of a satellite at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Topocentric {
    /// J2000 right ascension, hours.
    pub right_ascension_h: f64,
    pub declination_deg: f64,
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
}

pub fn topocentric_position(
    observer: &Observer,
    satellite: &Satellite,
    timestamp: DateTime<Utc>,
) -> Result<Topocentric, EphemerisError> {
    let minutes = satellite
        .elements
        .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
        .map_err(|e| EphemerisError::Propagation(e.to_string()))?;

    let prediction = satellite.constants.propagate(minutes)?;

    let sidereal =
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()));

    let sta_ecef = observer.position_ecef_km();

    // RA/Dec from the line of sight, rotated from TEME to J2000.
    let sta_teme = ecef_to_teme_position(sta_ecef, sidereal);
    let los_teme = sub(prediction.position, sta_teme);
    let range_km = norm(los_teme);
    if range_km <= 0.0 {
        return Err(EphemerisError::Propagation(
            "satellite coincides with observer".to_string(),
        ));
    }
    let los_j2000 = teme_to_j2000(timestamp) * Vector3::from(los_teme);
    let (right_ascension_h, declination_deg) = right_ascension_declination(&los_j2000);

    // Alt/az from the line of sight in the observer's ENU frame.
    let sat_ecef = teme_to_ecef_position(prediction.position, sidereal);
    let dr = sub(sat_ecef, sta_ecef);
    let (east, north, up) = ecef_to_enu(dr, observer.lat_rad(), observer.lon_rad());
    let azimuth_deg = east.atan2(north).to_degrees().rem_euclid(360.0);
    let altitude_deg = (up / range_km).clamp(-1.0, 1.0).asin().to_degrees();

    Ok(Topocentric {
        right_ascension_h,
        declination_deg,
        altitude_deg,
        azimuth_deg,
        range_km,
    })
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_teme_position(pos_ecef: [f64; 3], gmst: f64) -> [f64; 3] {
    teme_to_ecef_position(pos_ecef, -gmst)
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn norm(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
