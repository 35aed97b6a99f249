//! TEME → J2000 rotation for right ascension and declination.
//!
//! SGP4 positions are in TEME (true equator, mean equinox of date). Star
//! charts use the J2000 mean equator and equinox, so the line of sight is
//! taken back through the equation of the equinoxes, nutation and precession.
//! Nutation uses the leading IAU 1980 terms, good to about 0.5".

use std::f64::consts::TAU;

use chrono::{DateTime, Utc};
use nalgebra::{Matrix3, Vector3};

const ASEC2RAD: f64 = std::f64::consts::PI / 648_000.0;
const J2000_JD: f64 = 2_451_545.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Mean obliquity at J2000.0, arcseconds.
const EPS0: f64 = 84_381.406;

/// Julian date of a UTC instant. TT-UTC is ignored.
pub fn julian_date(timestamp: DateTime<Utc>) -> f64 {
    UNIX_EPOCH_JD + timestamp.timestamp_millis() as f64 / 86_400_000.0
}

fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000_JD) / 36_525.0
}

/// Capitaine et al. (2003) precession: J2000 → mean equator and equinox of date.
pub fn precession(jd: f64) -> Matrix3<f64> {
    let t = centuries_since_j2000(jd);

    let psi_a = ((((-0.000_000_095_1 * t + 0.000_132_851) * t - 0.001_140_45) * t - 1.079_006_9)
        * t
        + 5_038.481_507)
        * t;
    let omega_a = ((((0.000_000_333_7 * t - 0.000_000_467) * t - 0.007_725_03) * t + 0.051_262_3)
        * t
        - 0.025_754)
        * t
        + EPS0;
    let chi_a = ((((-0.000_000_056_0 * t + 0.000_170_663) * t - 0.001_211_97) * t - 2.381_429_2)
        * t
        + 10.556_403)
        * t;

    // R3(chi_a) * R1(-omega_a) * R3(-psi_a) * R1(eps_0)
    let (sa, ca) = (EPS0 * ASEC2RAD).sin_cos();
    let (sb, cb) = (-psi_a * ASEC2RAD).sin_cos();
    let (sc, cc) = (-omega_a * ASEC2RAD).sin_cos();
    let (sd, cd) = (chi_a * ASEC2RAD).sin_cos();

    #[rustfmt::skip]
    let m = Matrix3::new(
        cd * cb - sb * sd * cc,
        cd * sb * ca + sd * cc * cb * ca - sa * sd * sc,
        cd * sb * sa + sd * cc * cb * sa + ca * sd * sc,

        -sd * cb - sb * cd * cc,
        -sd * sb * ca + cd * cc * cb * ca - sa * cd * sc,
        -sd * sb * sa + cd * cc * cb * sa + ca * cd * sc,

        sb * sc,
        -sc * cb * ca - sa * cc,
        -sc * cb * sa + cc * ca,
    );
    m
}

/// Mean obliquity of the ecliptic, radians.
pub fn mean_obliquity(jd: f64) -> f64 {
    let t = centuries_since_j2000(jd);
    let eps = ((((-0.000_000_043_4 * t - 0.000_000_576) * t + 0.002_003_40) * t - 0.000_183_1) * t
        - 46.836_769)
        * t
        + EPS0;
    eps * ASEC2RAD
}

/// Nutation in longitude and obliquity, radians.
pub fn nutation(jd: f64) -> (f64, f64) {
    let t = centuries_since_j2000(jd);
    let omega = (125.044_52 - 1_934.136_261 * t).to_radians();
    let sun = (280.466_5 + 36_000.769_8 * t).to_radians();
    let moon = (218.316_5 + 481_267.881_3 * t).to_radians();

    let d_psi = -17.20 * omega.sin() - 1.32 * (2.0 * sun).sin() - 0.23 * (2.0 * moon).sin()
        + 0.21 * (2.0 * omega).sin();
    let d_eps = 9.20 * omega.cos() + 0.57 * (2.0 * sun).cos() + 0.10 * (2.0 * moon).cos()
        - 0.09 * (2.0 * omega).cos();
    (d_psi * ASEC2RAD, d_eps * ASEC2RAD)
}

/// Mean of date → true of date.
pub fn nutation_matrix(mean_obliquity: f64, d_psi: f64, d_eps: f64) -> Matrix3<f64> {
    let (sobm, cobm) = mean_obliquity.sin_cos();
    let (sobt, cobt) = (mean_obliquity + d_eps).sin_cos();
    let (spsi, cpsi) = d_psi.sin_cos();

    #[rustfmt::skip]
    let n = Matrix3::new(
        cpsi,          -spsi * cobm,                      -spsi * sobm,
        spsi * cobt,    cpsi * cobm * cobt + sobm * sobt,  cpsi * sobm * cobt - cobm * sobt,
        spsi * sobt,    cpsi * cobm * sobt - sobm * cobt,  cpsi * sobm * sobt + cobm * cobt,
    );
    n
}

/// Frame rotation about z by `angle`.
fn rot_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Rotation taking TEME vectors at `timestamp` to the J2000 mean equator and
/// equinox. Frame bias (23 mas) is ignored.
pub fn teme_to_j2000(timestamp: DateTime<Utc>) -> Matrix3<f64> {
    let jd = julian_date(timestamp);
    let eps = mean_obliquity(jd);
    let (d_psi, d_eps) = nutation(jd);
    let equation_of_equinoxes = d_psi * eps.cos();

    // TEME x is the mean equinox; true-of-date RA is larger by EqEq.
    let teme_to_tod = rot_z(-equation_of_equinoxes);
    let tod_to_mod = nutation_matrix(eps, d_psi, d_eps).transpose();
    let mod_to_j2000 = precession(jd).transpose();
    mod_to_j2000 * tod_to_mod * teme_to_tod
}

/// Right ascension (hours, [0, 24)) and declination (degrees) of a direction.
pub fn right_ascension_declination(v: &Vector3<f64>) -> (f64, f64) {
    let r = v.norm();
    let ra = v.y.atan2(v.x).rem_euclid(TAU).to_degrees() / 15.0;
    let dec = (v.z / r).clamp(-1.0, 1.0).asin().to_degrees();
    (ra, dec)
}
