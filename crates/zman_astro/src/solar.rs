//! Low-precision apparent solar coordinates.
//!
//! Geometric mean longitude and anomaly, equation of center, a one-term
//! nutation/aberration correction and the true obliquity. Accuracy is about
//! 0.01 deg in longitude for the current era, which keeps sunrise within a
//! few seconds of a full ephemeris.

use zman_time::julian_centuries_tt;

/// Mean Sun–Earth distance in kilometers.
pub const AU_KM: f64 = 149_597_870.7;

/// Solar semi-diameter at 1 AU in arcseconds.
pub const SUN_SEMIDIAMETER_1AU_ARCSEC: f64 = 959.63;

/// Apparent geocentric solar coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarCoordinates {
    /// Apparent ecliptic longitude in degrees, [0, 360).
    pub ecliptic_lon_deg: f64,
    /// Right ascension in radians, (-pi, pi].
    pub ra_rad: f64,
    /// Declination in radians.
    pub dec_rad: f64,
    /// Earth–Sun distance in AU.
    pub distance_au: f64,
}

impl SolarCoordinates {
    /// Apparent semi-diameter in degrees.
    pub fn semidiameter_deg(&self) -> f64 {
        SUN_SEMIDIAMETER_1AU_ARCSEC / self.distance_au / 3600.0
    }
}

/// Longitude of the Moon's ascending node in degrees, used for the
/// dominant nutation term.
pub(crate) fn node_longitude_deg(t: f64) -> f64 {
    125.04 - 1934.136 * t
}

/// True obliquity of the ecliptic in degrees.
pub(crate) fn true_obliquity_deg(t: f64) -> f64 {
    let mean = 23.0 + 26.0 / 60.0 + 21.448 / 3600.0
        - (46.8150 * t + 0.00059 * t * t - 0.001813 * t * t * t) / 3600.0;
    mean + 0.00256 * node_longitude_deg(t).to_radians().cos()
}

/// Convert ecliptic longitude/latitude (degrees) to (RA, Dec) in radians.
pub(crate) fn ecliptic_to_equatorial(lon_deg: f64, lat_deg: f64, obliquity_deg: f64) -> (f64, f64) {
    let (sl, cl) = lon_deg.to_radians().sin_cos();
    let (sb, cb) = lat_deg.to_radians().sin_cos();
    let (se, ce) = obliquity_deg.to_radians().sin_cos();
    let tb = sb / cb;
    let ra = (sl * ce - tb * se).atan2(cl);
    let dec = (sb * ce + cb * se * sl).clamp(-1.0, 1.0).asin();
    (ra, dec)
}

/// Apparent solar coordinates at a Julian Date (UT).
pub fn sun_coordinates(jd_ut: f64, delta_t_s: f64) -> SolarCoordinates {
    let t = julian_centuries_tt(jd_ut, delta_t_s);

    let l0 = 280.46646 + 36_000.76983 * t + 0.000_303_2 * t * t;
    let m = 357.52911 + 35_999.05029 * t - 0.000_153_7 * t * t;
    let e = 0.016_708_634 - 0.000_042_037 * t;

    let mr = m.to_radians();
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * mr.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * mr).sin()
        + 0.000_289 * (3.0 * mr).sin();

    let true_lon = l0 + c;
    let nu = (m + c).to_radians();
    let distance_au = 1.000_001_018 * (1.0 - e * e) / (1.0 + e * nu.cos());

    let omega = node_longitude_deg(t).to_radians();
    let apparent_lon = (true_lon - 0.00569 - 0.00478 * omega.sin()).rem_euclid(360.0);

    let (ra_rad, dec_rad) = ecliptic_to_equatorial(apparent_lon, 0.0, true_obliquity_deg(t));

    SolarCoordinates {
        ecliptic_lon_deg: apparent_lon,
        ra_rad,
        dec_rad,
        distance_au,
    }
}
