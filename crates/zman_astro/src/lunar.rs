//! Low-precision lunar coordinates and illumination.
//!
//! Truncated periodic series (six longitude terms, four latitude terms, five
//! parallax terms) giving about 0.3 deg in position. That is ample for
//! moonrise to the minute and for phase display.

use zman_time::julian_centuries_tt;

use crate::riseset_types::Illumination;
use crate::solar::{AU_KM, ecliptic_to_equatorial, sun_coordinates, true_obliquity_deg};

/// Equatorial Earth radius in kilometers.
const EARTH_EQ_RADIUS_KM: f64 = 6_378.14;

/// Geocentric lunar coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarCoordinates {
    /// Ecliptic longitude in degrees, [0, 360).
    pub ecliptic_lon_deg: f64,
    /// Ecliptic latitude in degrees.
    pub ecliptic_lat_deg: f64,
    /// Right ascension in radians.
    pub ra_rad: f64,
    /// Declination in radians.
    pub dec_rad: f64,
    /// Horizontal parallax in degrees.
    pub parallax_deg: f64,
    /// Earth–Moon distance in kilometers.
    pub distance_km: f64,
}

fn sin_d(x: f64) -> f64 {
    x.to_radians().sin()
}

fn cos_d(x: f64) -> f64 {
    x.to_radians().cos()
}

/// Lunar coordinates at a Julian Date (UT).
pub fn moon_coordinates(jd_ut: f64, delta_t_s: f64) -> LunarCoordinates {
    let t = julian_centuries_tt(jd_ut, delta_t_s);

    let lon = 218.32 + 481_267.881 * t
        + 6.29 * sin_d(135.0 + 477_198.87 * t)
        - 1.27 * sin_d(259.3 - 413_335.36 * t)
        + 0.66 * sin_d(235.7 + 890_534.22 * t)
        + 0.21 * sin_d(269.9 + 954_397.74 * t)
        - 0.19 * sin_d(357.5 + 35_999.05 * t)
        - 0.11 * sin_d(186.5 + 966_404.03 * t);

    let lat = 5.13 * sin_d(93.3 + 483_202.02 * t)
        + 0.28 * sin_d(228.2 + 960_400.89 * t)
        - 0.28 * sin_d(318.3 + 6_003.15 * t)
        - 0.17 * sin_d(217.6 - 407_332.21 * t);

    let parallax = 0.9508
        + 0.0518 * cos_d(135.0 + 477_198.87 * t)
        + 0.0095 * cos_d(259.3 - 413_335.36 * t)
        + 0.0078 * cos_d(235.7 + 890_534.22 * t)
        + 0.0028 * cos_d(269.9 + 954_397.74 * t);

    let lon = lon.rem_euclid(360.0);
    let (ra_rad, dec_rad) = ecliptic_to_equatorial(lon, lat, true_obliquity_deg(t));

    LunarCoordinates {
        ecliptic_lon_deg: lon,
        ecliptic_lat_deg: lat,
        ra_rad,
        dec_rad,
        parallax_deg: parallax,
        distance_km: EARTH_EQ_RADIUS_KM / parallax.to_radians().sin(),
    }
}

/// Illuminated fraction and phase of the Moon at a Julian Date (UT).
pub fn moon_illumination(jd_ut: f64, delta_t_s: f64) -> Illumination {
    let moon = moon_coordinates(jd_ut, delta_t_s);
    let sun = sun_coordinates(jd_ut, delta_t_s);
    let sun_km = sun.distance_au * AU_KM;

    let d_lon = moon.ecliptic_lon_deg - sun.ecliptic_lon_deg;
    let cos_psi = (cos_d(moon.ecliptic_lat_deg) * cos_d(d_lon)).clamp(-1.0, 1.0);
    let psi = cos_psi.acos();
    let phase_angle = (sun_km * psi.sin()).atan2(moon.distance_km - sun_km * cos_psi);

    Illumination {
        fraction: (1.0 + phase_angle.cos()) / 2.0,
        phase_angle_deg: phase_angle.to_degrees(),
        elongation_deg: d_lon.rem_euclid(360.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zman_time::UNIX_EPOCH_JD;

    fn jd(unix_s: i64) -> f64 {
        unix_s as f64 / 86_400.0 + UNIX_EPOCH_JD
    }

    #[test]
    fn meeus_example_position() {
        // 1992-04-12 0h TD: lambda 133.167, beta -3.229, delta 368409.7 km.
        let m = moon_coordinates(2_448_724.5, 0.0);
        assert!((m.ecliptic_lon_deg - 133.167).abs() < 0.5, "lon = {}", m.ecliptic_lon_deg);
        assert!((m.ecliptic_lat_deg - -3.229).abs() < 0.3, "lat = {}", m.ecliptic_lat_deg);
        assert!((m.distance_km - 368_409.7).abs() < 2_000.0, "dist = {}", m.distance_km);
    }

    #[test]
    fn full_moon_april_2024() {
        // 2024-04-23T23:49Z
        let ill = moon_illumination(jd(1_713_916_140), 69.0);
        assert!(ill.fraction > 0.99, "fraction = {}", ill.fraction);
        assert!((ill.elongation_deg - 180.0).abs() < 2.0);
    }

    #[test]
    fn new_moon_eclipse_april_2024() {
        // 2024-04-08T18:21Z
        let ill = moon_illumination(jd(1_712_600_460), 69.0);
        assert!(ill.fraction < 0.01, "fraction = {}", ill.fraction);
        assert!(ill.phase_angle_deg > 170.0);
    }

    #[test]
    fn first_quarter_is_half_lit_and_waxing() {
        // 2024-04-15T19:13Z
        let ill = moon_illumination(jd(1_713_208_380), 69.0);
        assert!((ill.fraction - 0.5).abs() < 0.03, "fraction = {}", ill.fraction);
        assert!(ill.is_waxing());
    }
}
