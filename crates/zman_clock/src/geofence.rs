//! Region membership for selecting the Israel or diaspora holiday rules.

use serde::{Deserialize, Serialize};

/// Point-in-region test.
pub trait Geofence {
    fn point_in_region(&self, latitude_deg: f64, longitude_deg: f64) -> bool;
}

/// A closed ring of (longitude, latitude) vertices in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonFence {
    vertices: Vec<(f64, f64)>,
}

impl PolygonFence {
    pub fn new(vertices: Vec<(f64, f64)>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }
}

impl Geofence for PolygonFence {
    /// Even-odd ray cast toward +longitude. Points on an edge may fall either
    /// way.
    fn point_in_region(&self, latitude_deg: f64, longitude_deg: f64) -> bool {
        let (x, y) = (longitude_deg, latitude_deg);
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.vertices[i];
            let (xj, yj) = self.vertices[j];
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Coarse outline of the Land of Israel as used for holiday rules.
const ISRAEL_OUTLINE: [(f64, f64); 18] = [
    (35.10, 33.09),
    (35.50, 33.10),
    (35.62, 33.27),
    (35.82, 33.33),
    (35.90, 32.95),
    (35.65, 32.68),
    (35.57, 32.40),
    (35.55, 31.75),
    (35.40, 31.10),
    (35.15, 30.60),
    (34.98, 29.50),
    (34.88, 29.49),
    (34.25, 31.22),
    (34.48, 31.59),
    (34.72, 32.00),
    (34.85, 32.50),
    (34.95, 32.83),
    (35.08, 32.92),
];

/// Israel geofence.
#[derive(Debug, Clone, PartialEq)]
pub struct IsraelGeofence {
    fence: PolygonFence,
}

impl Default for IsraelGeofence {
    fn default() -> Self {
        Self {
            fence: PolygonFence::new(ISRAEL_OUTLINE.to_vec()),
        }
    }
}

impl Geofence for IsraelGeofence {
    fn point_in_region(&self, latitude_deg: f64, longitude_deg: f64) -> bool {
        self.fence.point_in_region(latitude_deg, longitude_deg)
    }
}

/// Fixed answer, for tests and explicit overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantFence(pub bool);

impl Geofence for ConstantFence {
    fn point_in_region(&self, _: f64, _: f64) -> bool {
        self.0
    }
}
