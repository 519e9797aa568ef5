//! Circular footprints, point-in-ring tests and great-circle distances.

use core::f64::consts::TAU;

use crate::projection::{LonLat, ProjectedPoint};

/// Segments per quarter circle when approximating a buffer.
pub const QUADRANT_SEGMENTS: u32 = 16;

/// Mean Earth radius (m) used for great-circle distances.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Build the closed ring approximating a circle of `radius_m` around
/// `center`.
///
/// The ring has `4 * QUADRANT_SEGMENTS + 1` vertices, starting due east
/// and running counter-clockwise; the last vertex repeats the first.
pub fn circle_ring(center: ProjectedPoint, radius_m: f64) -> Vec<ProjectedPoint> {
    let segments = 4 * QUADRANT_SEGMENTS;
    let mut ring: Vec<ProjectedPoint> = (0..segments)
        .map(|i| {
            let angle = TAU * f64::from(i) / f64::from(segments);
            let (sin, cos) = angle.sin_cos();
            ProjectedPoint {
                easting: center.easting + radius_m * cos,
                northing: center.northing + radius_m * sin,
            }
        })
        .collect();
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}

/// Even-odd ray casting test of `point` against a closed ring.
///
/// Points exactly on an edge may land on either side; a degenerate ring
/// (zero area) contains nothing.
pub fn ring_contains(ring: &[LonLat], point: LonLat) -> bool {
    let mut inside = false;
    for edge in ring.windows(2) {
        let [a, b] = edge else { continue };
        if (a.lat > point.lat) != (b.lat > point.lat) {
            let crossing = (b.lon - a.lon) * (point.lat - a.lat) / (b.lat - a.lat) + a.lon;
            if point.lon < crossing {
                inside = !inside;
            }
        }
    }
    inside
}

/// Axis-aligned geographic bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

impl GeoBounds {
    /// Bounds of a set of vertices, `None` if empty or any vertex is not finite.
    pub fn of(vertices: &[LonLat]) -> Option<Self> {
        let first = vertices.first()?;
        let mut bounds = Self {
            west: first.lon,
            south: first.lat,
            east: first.lon,
            north: first.lat,
        };
        for v in vertices {
            if !v.is_finite() {
                return None;
            }
            bounds.west = bounds.west.min(v.lon);
            bounds.east = bounds.east.max(v.lon);
            bounds.south = bounds.south.min(v.lat);
            bounds.north = bounds.north.max(v.lat);
        }
        Some(bounds)
    }

    /// The same bounds moved east by `degrees`.
    #[must_use]
    pub const fn shifted(self, degrees: f64) -> Self {
        Self {
            west: self.west + degrees,
            east: self.east + degrees,
            ..self
        }
    }
}

/// Haversine distance between two vertices, in meters.
pub fn haversine_distance_m(a: LonLat, b: LonLat) -> f64 {
    let phi_a = a.lat.to_radians();
    let phi_b = b.lat.to_radians();
    let half_dphi = (phi_b - phi_a) / 2.0;
    let half_dlambda = (b.lon - a.lon).to_radians() / 2.0;
    let h = half_dphi.sin().powi(2) + phi_a.cos() * phi_b.cos() * half_dlambda.sin().powi(2);
    2.0 * EARTH_MEAN_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Latitude band and longitude reach of a disk on the sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapExtent {
    /// Southern edge, no lower than -90.
    pub south: f64,
    /// Northern edge, no higher than 90.
    pub north: f64,
    /// Longitude half-width in degrees; `None` when the disk encloses a pole.
    pub half_span: Option<f64>,
}

impl CapExtent {
    /// Extent of the disk of `radius_m` around `center`.
    pub fn around(center: LonLat, radius_m: f64) -> Self {
        let delta = (radius_m / EARTH_MEAN_RADIUS_M).to_degrees();
        let north = center.lat + delta;
        let south = center.lat - delta;
        let half_span = if north >= 90.0 || south <= -90.0 {
            None
        } else {
            let ratio = delta.to_radians().sin() / center.lat.to_radians().cos();
            Some(ratio.clamp(0.0, 1.0).asin().to_degrees())
        };
        Self {
            south: south.max(-90.0),
            north: north.min(90.0),
            half_span,
        }
    }

    /// True when every longitude is reached.
    pub const fn encloses_pole(&self) -> bool {
        self.half_span.is_none()
    }

    /// Bounds around `center_lon`, spanning all longitudes for a polar disk.
    pub fn bounds(&self, center_lon: f64) -> GeoBounds {
        let (west, east) = self
            .half_span
            .map_or((-180.0, 180.0), |half| (center_lon - half, center_lon + half));
        GeoBounds {
            west,
            south: self.south,
            east,
            north: self.north,
        }
    }
}
