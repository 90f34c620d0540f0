//! Altitude of a body above the observer's horizon.

use zman_time::gmst_rad;

use crate::lunar::moon_coordinates;
use crate::riseset_types::{Body, GeoLocation, RiseSetConfig};
use crate::solar::sun_coordinates;

/// Geocentric altitude in degrees of a point at (RA, Dec) for an observer.
pub fn altitude_deg(ra_rad: f64, dec_rad: f64, location: &GeoLocation, jd_ut: f64) -> f64 {
    let hour_angle = gmst_rad(jd_ut) + location.longitude_rad() - ra_rad;
    let lat = location.latitude_rad();
    let sin_alt = lat.sin() * dec_rad.sin() + lat.cos() * dec_rad.cos() * hour_angle.cos();
    sin_alt.clamp(-1.0, 1.0).asin().to_degrees()
}

/// Geometric altitude of the body's center in degrees.
pub fn body_altitude_deg(
    body: Body,
    location: &GeoLocation,
    jd_ut: f64,
    config: &RiseSetConfig,
) -> f64 {
    match body {
        Body::Sun => {
            let s = sun_coordinates(jd_ut, config.delta_t_seconds);
            altitude_deg(s.ra_rad, s.dec_rad, location, jd_ut)
        }
        Body::Moon => {
            let m = moon_coordinates(jd_ut, config.delta_t_seconds);
            altitude_deg(m.ra_rad, m.dec_rad, location, jd_ut)
        }
    }
}

/// Geometric altitude of the body's center at the instant its upper limb
/// touches the apparent horizon.
///
/// Sun: `-(refraction + semidiameter) - dip`.
/// Moon: `0.7275 * parallax - refraction - dip`, which folds topocentric
/// parallax and the semidiameter into one term.
pub fn horizon_event_altitude_deg(
    body: Body,
    location: &GeoLocation,
    jd_ut: f64,
    config: &RiseSetConfig,
) -> f64 {
    let refraction = config.refraction_arcmin / 60.0;
    let dip = config.dip_deg(location.elevation_m);
    match body {
        Body::Sun => {
            let s = sun_coordinates(jd_ut, config.delta_t_seconds);
            -(refraction + s.semidiameter_deg()) - dip
        }
        Body::Moon => {
            let m = moon_coordinates(jd_ut, config.delta_t_seconds);
            0.7275 * m.parallax_deg - refraction - dip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zman_time::UNIX_EPOCH_JD;

    fn jerusalem() -> GeoLocation {
        GeoLocation::new(31.78, 35.22, 0.0).unwrap()
    }

    #[test]
    fn sun_high_at_jerusalem_noon() {
        // 2024-04-23T09:37Z is close to local apparent noon.
        let jd = 1_713_865_020.0 / 86_400.0 + UNIX_EPOCH_JD;
        let alt = body_altitude_deg(Body::Sun, &jerusalem(), jd, &RiseSetConfig::default());
        // 90 - 31.78 + 12.6 (declination)
        assert!((alt - 70.8).abs() < 0.5, "alt = {alt}");
    }

    #[test]
    fn sun_below_horizon_at_jerusalem_midnight() {
        let jd = 1_713_822_000.0 / 86_400.0 + UNIX_EPOCH_JD;
        let alt = body_altitude_deg(Body::Sun, &jerusalem(), jd, &RiseSetConfig::default());
        assert!(alt < -40.0, "alt = {alt}");
    }

    #[test]
    fn sun_horizon_altitude_about_fifty_arcmin() {
        let h0 = horizon_event_altitude_deg(Body::Sun, &jerusalem(), 2_460_424.0, &RiseSetConfig::default());
        assert!((h0 - -0.833).abs() < 0.01, "h0 = {h0}");
    }

    #[test]
    fn moon_horizon_altitude_positive() {
        let h0 = horizon_event_altitude_deg(Body::Moon, &jerusalem(), 2_460_424.0, &RiseSetConfig::default());
        // 0.7275 * (0.90..1.01) - 0.567
        assert!(h0 > 0.05 && h0 < 0.20, "h0 = {h0}");
    }

    #[test]
    fn dip_lowers_horizon() {
        let high = GeoLocation::new(31.78, 35.22, 800.0).unwrap();
        let cfg = RiseSetConfig {
            altitude_correction: true,
            ..RiseSetConfig::default()
        };
        let sea = horizon_event_altitude_deg(Body::Sun, &jerusalem(), 2_460_424.0, &cfg);
        let hill = horizon_event_altitude_deg(Body::Sun, &high, 2_460_424.0, &cfg);
        assert!(hill < sea - 0.8);
    }
}
