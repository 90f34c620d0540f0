//! The astronomical oracle seam.
//!
//! Everything above this crate asks astronomy questions through
//! [`AstronomicalOracle`], so a table-driven or remote oracle can stand in
//! for [`AnalyticOracle`] in tests and embedded builds.

use chrono::{DateTime, Utc};
use log::trace;
use zman_time::{instant_from_jd, jd_from_instant, sidereal_time_hours};

use crate::error::AstroError;
use crate::horizon::{body_altitude_deg, horizon_event_altitude_deg};
use crate::lunar::moon_illumination;
use crate::riseset_types::{Body, CrossingDirection, GeoLocation, Illumination, RiseSetConfig};
use crate::search::find_crossing;

/// Astronomy queries needed by the zmanim engine.
///
/// Searches return `Ok(None)` when no event of the requested kind exists
/// within `limit_days` of `start`. Positive limits search forward, negative
/// limits search backward and return the event nearest to `start`.
pub trait AstronomicalOracle {
    /// Upper-limb rise (`Rising`) or set (`Setting`) at the apparent horizon.
    fn rise_set_search(
        &self,
        body: Body,
        observer: &GeoLocation,
        direction: CrossingDirection,
        start: DateTime<Utc>,
        limit_days: f64,
    ) -> Result<Option<DateTime<Utc>>, AstroError>;

    /// Instant the body's center crosses a fixed geometric altitude.
    fn altitude_crossing_search(
        &self,
        body: Body,
        observer: &GeoLocation,
        direction: CrossingDirection,
        start: DateTime<Utc>,
        limit_days: f64,
        altitude_deg: f64,
    ) -> Result<Option<DateTime<Utc>>, AstroError>;

    /// Illuminated fraction and phase of a body.
    fn illumination(&self, body: Body, instant: DateTime<Utc>) -> Result<Illumination, AstroError>;

    /// Greenwich mean sidereal time in hours.
    fn sidereal_time_hours(&self, instant: DateTime<Utc>) -> Result<f64, AstroError>;
}

/// Oracle backed by the low-precision analytic series in this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalyticOracle {
    config: RiseSetConfig,
}

impl AnalyticOracle {
    /// Create an oracle with validated configuration.
    pub fn new(config: RiseSetConfig) -> Result<Self, AstroError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &RiseSetConfig {
        &self.config
    }

    fn to_instant(&self, jd: Option<f64>) -> Result<Option<DateTime<Utc>>, AstroError> {
        jd.map(instant_from_jd).transpose().map_err(AstroError::from)
    }
}

impl AstronomicalOracle for AnalyticOracle {
    fn rise_set_search(
        &self,
        body: Body,
        observer: &GeoLocation,
        direction: CrossingDirection,
        start: DateTime<Utc>,
        limit_days: f64,
    ) -> Result<Option<DateTime<Utc>>, AstroError> {
        let cfg = &self.config;
        let f = |jd: f64| {
            body_altitude_deg(body, observer, jd, cfg) - horizon_event_altitude_deg(body, observer, jd, cfg)
        };
        let jd = find_crossing(f, jd_from_instant(start), direction, limit_days, cfg);
        trace!("rise_set_search {body:?} {direction:?} from {start} ({limit_days} d): {jd:?}");
        self.to_instant(jd)
    }

    fn altitude_crossing_search(
        &self,
        body: Body,
        observer: &GeoLocation,
        direction: CrossingDirection,
        start: DateTime<Utc>,
        limit_days: f64,
        altitude_deg: f64,
    ) -> Result<Option<DateTime<Utc>>, AstroError> {
        if !altitude_deg.is_finite() {
            return Err(AstroError::InvalidConfig("altitude must be finite"));
        }
        let cfg = &self.config;
        let f = |jd: f64| body_altitude_deg(body, observer, jd, cfg) - altitude_deg;
        let jd = find_crossing(f, jd_from_instant(start), direction, limit_days, cfg);
        trace!("altitude_crossing_search {body:?} {direction:?} {altitude_deg} from {start}: {jd:?}");
        self.to_instant(jd)
    }

    fn illumination(&self, body: Body, instant: DateTime<Utc>) -> Result<Illumination, AstroError> {
        match body {
            Body::Sun => Ok(Illumination {
                fraction: 1.0,
                phase_angle_deg: 0.0,
                elongation_deg: 0.0,
            }),
            Body::Moon => Ok(moon_illumination(
                jd_from_instant(instant),
                self.config.delta_t_seconds,
            )),
        }
    }

    fn sidereal_time_hours(&self, instant: DateTime<Utc>) -> Result<f64, AstroError> {
        Ok(sidereal_time_hours(instant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rejects_invalid_config() {
        let cfg = RiseSetConfig {
            max_iterations: 0,
            ..RiseSetConfig::default()
        };
        assert!(AnalyticOracle::new(cfg).is_err());
    }

    #[test]
    fn sun_is_fully_lit() {
        let oracle = AnalyticOracle::default();
        let t = Utc.with_ymd_and_hms(2024, 4, 23, 12, 0, 0).unwrap();
        let ill = oracle.illumination(Body::Sun, t).unwrap();
        assert_eq!(ill.fraction, 1.0);
    }

    #[test]
    fn non_finite_altitude_rejected() {
        let oracle = AnalyticOracle::default();
        let loc = GeoLocation::new(31.78, 35.22, 0.0).unwrap();
        let t = Utc.with_ymd_and_hms(2024, 4, 23, 0, 0, 0).unwrap();
        let r = oracle.altitude_crossing_search(
            Body::Sun,
            &loc,
            CrossingDirection::Rising,
            t,
            1.0,
            f64::NAN,
        );
        assert!(r.is_err());
    }

    #[test]
    fn sidereal_matches_time_crate() {
        let oracle = AnalyticOracle::default();
        let t = Utc.with_ymd_and_hms(2024, 4, 23, 0, 0, 0).unwrap();
        let h = oracle.sidereal_time_hours(t).unwrap();
        assert!((h - 14.10).abs() < 0.01, "gmst = {h}");
    }
}
