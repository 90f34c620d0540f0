//! Sidereal time: Earth Rotation Angle, GMST and local sidereal time.
//!
//! The rise/set searches convert the Sun's right ascension to an hour angle
//! through these. UT1 is taken equal to UTC; the sub-second difference is far
//! below the resolution any zman is displayed at.
//!
//! Sources:
//! - ERA: IERS Conventions 2010, Eq. 5.15.
//! - GMST polynomial: Capitaine et al. 2003, Table 2.

use std::f64::consts::{PI, TAU};

use chrono::{DateTime, Utc};

use crate::julian::{J2000_JD, jd_from_instant};

/// Arcseconds to radians.
const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);

/// Earth Rotation Angle at a UT Julian Date, radians in [0, 2π).
pub fn earth_rotation_angle_rad(jd_ut: f64) -> f64 {
    let du = jd_ut - J2000_JD;
    (TAU * (0.779_057_273_264_0 + 1.002_737_811_911_354_6 * du)).rem_euclid(TAU)
}

/// Greenwich Mean Sidereal Time at a UT Julian Date, radians in [0, 2π).
pub fn gmst_rad(jd_ut: f64) -> f64 {
    let t = (jd_ut - J2000_JD) / 36_525.0;
    // Horner form of the Capitaine et al. polynomial, arcseconds.
    let poly_arcsec = 0.014_506
        + t * (4612.156_534 + t * (1.391_581_7 + t * (-0.000_000_44 + t * (-0.000_029_956 - t * 0.000_000_036_8))));
    (earth_rotation_angle_rad(jd_ut) + poly_arcsec * ARCSEC_TO_RAD).rem_euclid(TAU)
}

/// Local sidereal time from GMST and east longitude, radians in [0, 2π).
pub fn local_sidereal_time_rad(gmst: f64, longitude_east_rad: f64) -> f64 {
    (gmst + longitude_east_rad).rem_euclid(TAU)
}

/// Greenwich sidereal time of an instant in hours [0, 24).
pub fn sidereal_time_hours(instant: DateTime<Utc>) -> f64 {
    gmst_rad(jd_from_instant(instant)) * 12.0 / PI
}
