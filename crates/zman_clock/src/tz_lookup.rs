//! IANA zone names for coordinates.
//!
//! Looked up once per location change; the session caches the result in
//! its [`TimeZoneContext`](zman_time::TimeZoneContext).
//! [`TzfZoneLookup`] answers from real zone boundaries; the nautical zone is
//! a last resort for points it cannot place.

use log::debug;
use tzf_rs::DefaultFinder;

use crate::geofence::Geofence;

pub trait TimezoneLookup {
    /// IANA zone for a point, or `None` when this lookup cannot tell.
    fn zone_for(&self, latitude_deg: f64, longitude_deg: f64) -> Option<String>;
}

/// First answer from `.0`, otherwise `.1`.
impl<A: TimezoneLookup, B: TimezoneLookup> TimezoneLookup for (A, B) {
    fn zone_for(&self, latitude_deg: f64, longitude_deg: f64) -> Option<String> {
        self.0
            .zone_for(latitude_deg, longitude_deg)
            .or_else(|| self.1.zone_for(latitude_deg, longitude_deg))
    }
}

/// Zone boundaries from the embedded timezone-boundary data of `tzf-rs`.
///
/// Building the finder decodes the embedded polygons, so build it once and
/// reuse it.
pub struct TzfZoneLookup {
    finder: DefaultFinder,
}

impl TzfZoneLookup {
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for TzfZoneLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneLookup for TzfZoneLookup {
    fn zone_for(&self, latitude_deg: f64, longitude_deg: f64) -> Option<String> {
        // tzf takes (longitude, latitude).
        let lon = zman_astro::normalize_longitude(longitude_deg);
        let name = self.finder.get_tz_name(lon, latitude_deg);
        if name.is_empty() {
            debug!("no zone boundary contains ({latitude_deg:.4}, {lon:.4})");
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// Always the same zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedZoneLookup(pub String);

impl TimezoneLookup for FixedZoneLookup {
    fn zone_for(&self, _: f64, _: f64) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Nautical zone from longitude alone, e.g. `Etc/GMT-2` at 35°E.
///
/// Ignores borders and DST; only a fallback behind [`TzfZoneLookup`].
/// The `Etc` names invert the sign: `Etc/GMT-2` is UTC+2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NauticalZoneLookup;

impl NauticalZoneLookup {
    /// Whole-hour UTC offset for a longitude, in [-12, 14].
    pub fn offset_hours(longitude_deg: f64) -> i32 {
        let lon = zman_astro::normalize_longitude(longitude_deg);
        ((lon / 15.0).round() as i32).clamp(-12, 14)
    }
}

impl TimezoneLookup for NauticalZoneLookup {
    fn zone_for(&self, _: f64, longitude_deg: f64) -> Option<String> {
        let name = match Self::offset_hours(longitude_deg) {
            0 => "Etc/GMT".to_string(),
            h if h > 0 => format!("Etc/GMT-{h}"),
            h => format!("Etc/GMT+{}", -h),
        };
        Some(name)
    }
}

/// A named zone inside a geofence, another lookup outside it.
#[derive(Debug, Clone)]
pub struct RegionZoneLookup<G, F> {
    pub fence: G,
    pub zone: String,
    pub fallback: F,
}

impl<G: Geofence, F: TimezoneLookup> TimezoneLookup for RegionZoneLookup<G, F> {
    fn zone_for(&self, latitude_deg: f64, longitude_deg: f64) -> Option<String> {
        if self.fence.point_in_region(latitude_deg, longitude_deg) {
            Some(self.zone.clone())
        } else {
            self.fallback.zone_for(latitude_deg, longitude_deg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geofence::IsraelGeofence;
    use zman_time::TimeZoneContext;

    #[test]
    fn nautical_names_parse() {
        let l = NauticalZoneLookup;
        assert_eq!(l.zone_for(31.78, 35.22).as_deref(), Some("Etc/GMT-2"));
        assert_eq!(l.zone_for(40.71, -74.01).as_deref(), Some("Etc/GMT+5"));
        assert_eq!(l.zone_for(51.48, 0.0).as_deref(), Some("Etc/GMT"));
        for lon in [-180.0, -97.5, 7.4, 172.5, 179.9] {
            let name = l.zone_for(0.0, lon).unwrap();
            assert!(TimeZoneContext::named(&name).is_ok(), "{name}");
        }
    }

    #[test]
    fn wrapped_longitude() {
        assert_eq!(NauticalZoneLookup::offset_hours(395.0), 2);
    }

    #[test]
    fn region_lookup_prefers_fence() {
        let l = RegionZoneLookup {
            fence: IsraelGeofence::default(),
            zone: "Asia/Jerusalem".to_string(),
            fallback: NauticalZoneLookup,
        };
        assert_eq!(l.zone_for(31.78, 35.22).as_deref(), Some("Asia/Jerusalem"));
        assert_eq!(l.zone_for(33.89, 35.50).as_deref(), Some("Etc/GMT-2"));
    }

    struct NoAnswer;

    impl TimezoneLookup for NoAnswer {
        fn zone_for(&self, _: f64, _: f64) -> Option<String> {
            None
        }
    }

    #[test]
    fn boundary_lookup_follows_political_zones() {
        let l = TzfZoneLookup::new();
        assert_eq!(l.zone_for(40.7128, -74.0060).as_deref(), Some("America/New_York"));
        assert_eq!(l.zone_for(40.4168, -3.7038).as_deref(), Some("Europe/Madrid"));
        assert_eq!(l.zone_for(35.6762, 139.6503).as_deref(), Some("Asia/Tokyo"));
    }

    #[test]
    fn boundary_zone_keeps_dst_and_civil_day() {
        use chrono::{NaiveDate, TimeZone, Utc};

        let l = TzfZoneLookup::new();
        let t = Utc.with_ymd_and_hms(2024, 7, 4, 4, 30, 0).unwrap();
        let nyc = TimeZoneContext::named(&l.zone_for(40.7128, -74.0060).unwrap()).unwrap();
        assert_eq!(nyc.civil_date(t), NaiveDate::from_ymd_opt(2024, 7, 4).unwrap());
        assert_eq!(nyc.utc_offset_seconds(t), -4 * 3600);
        let madrid = TimeZoneContext::named(&l.zone_for(40.4168, -3.7038).unwrap()).unwrap();
        assert_eq!(madrid.utc_offset_seconds(t), 2 * 3600);
    }

    #[test]
    fn pair_falls_back_in_order() {
        let fixed = FixedZoneLookup("Europe/London".into());
        assert_eq!((NoAnswer, NauticalZoneLookup).zone_for(31.78, 35.22).as_deref(), Some("Etc/GMT-2"));
        assert_eq!((fixed.clone(), NauticalZoneLookup).zone_for(31.78, 35.22).as_deref(), Some("Europe/London"));
        assert_eq!((NoAnswer, NoAnswer).zone_for(0.0, 0.0), None);
    }

    #[test]
    fn fixed_lookup() {
        let l = FixedZoneLookup("America/New_York".into());
        assert_eq!(l.zone_for(0.0, 0.0).as_deref(), Some("America/New_York"));
    }
}
