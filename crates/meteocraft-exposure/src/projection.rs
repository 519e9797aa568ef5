//! Universal Transverse Mercator on the WGS84 ellipsoid.
//!
//! Series expansions after Snyder, *Map Projections: A Working Manual*
//! (USGS PP 1395), pp. 61-64. Accurate to well under a meter inside a
//! zone, which is far below the raster resolution.

use meteocraft_types::GeoPoint;

/// WGS84 semi-major axis (m).
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 flattening.
const FLATTENING: f64 = 1.0 / 298.257_223_563;

/// First eccentricity squared.
const E2: f64 = FLATTENING * (2.0 - FLATTENING);

/// Second eccentricity squared.
const EP2: f64 = E2 / (1.0 - E2);

/// Central meridian scale factor.
const K0: f64 = 0.9996;

const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Zone width in degrees.
const ZONE_WIDTH_DEG: f64 = 6.0;

/// A geographic vertex in degrees.
///
/// Unlike [`GeoPoint`] this is not range-checked: ring vertices produced
/// by the inverse projection may fall slightly past the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LonLat {
    /// True when both coordinates are finite.
    pub const fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<&GeoPoint> for LonLat {
    fn from(point: &GeoPoint) -> Self {
        Self {
            lon: point.lon(),
            lat: point.lat(),
        }
    }
}

/// A point in a UTM zone, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// Easting including the 500 km false easting.
    pub easting: f64,
    /// Northing including the 10 000 km false northing in the south.
    pub northing: f64,
}

/// A UTM zone (1-60) and hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtmZone {
    number: u8,
    north: bool,
}

impl UtmZone {
    /// The zone containing `point`, hemisphere by the sign of its latitude.
    ///
    /// Longitude 180 belongs to zone 60. The Norway/Svalbard exceptions are
    /// not applied.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn for_point(point: &GeoPoint) -> Self {
        let raw = ((point.lon() + 180.0) / ZONE_WIDTH_DEG).floor() + 1.0;
        let number = raw.clamp(1.0, 60.0) as u8;
        Self {
            number,
            north: point.lat() >= 0.0,
        }
    }

    /// EPSG code of this zone (`326xx` north, `327xx` south).
    pub fn epsg(self) -> u32 {
        let base = if self.north { 32_600 } else { 32_700 };
        base + u32::from(self.number)
    }

    /// Central meridian in degrees.
    pub fn central_meridian(self) -> f64 {
        f64::from(self.number) * ZONE_WIDTH_DEG - 183.0
    }

    /// Geographic to projected.
    pub fn forward(self, point: LonLat) -> ProjectedPoint {
        let phi = point.lat.to_radians();
        let delta_lambda = (point.lon - self.central_meridian()).to_radians();

        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();

        let n = SEMI_MAJOR_AXIS / (1.0 - E2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = EP2 * cos_phi * cos_phi;
        let a = cos_phi * delta_lambda;
        let m = meridian_arc(phi);

        let easting = K0
            * n
            * (a + (1.0 - t + c) * a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * EP2) * a.powi(5) / 120.0)
            + FALSE_EASTING;

        let mut northing = K0
            * (m + n
                * tan_phi
                * (a * a / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * EP2) * a.powi(6) / 720.0));
        if !self.north {
            northing += FALSE_NORTHING_SOUTH;
        }

        ProjectedPoint { easting, northing }
    }

    /// Projected to geographic.
    pub fn inverse(self, point: ProjectedPoint) -> LonLat {
        let x = point.easting - FALSE_EASTING;
        let y = if self.north {
            point.northing
        } else {
            point.northing - FALSE_NORTHING_SOUTH
        };

        let e4 = E2 * E2;
        let e6 = e4 * E2;
        let mu = y / K0 / (SEMI_MAJOR_AXIS * (1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

        let root = (1.0 - E2).sqrt();
        let e1 = (1.0 - root) / (1.0 + root);
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let (sin_phi1, cos_phi1) = phi1.sin_cos();
        let tan_phi1 = phi1.tan();
        let c1 = EP2 * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        let w = 1.0 - E2 * sin_phi1 * sin_phi1;
        let n1 = SEMI_MAJOR_AXIS / w.sqrt();
        let r1 = SEMI_MAJOR_AXIS * (1.0 - E2) / w.powf(1.5);
        let d = x / (n1 * K0);

        let phi = phi1
            - (n1 * tan_phi1 / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * EP2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * EP2 - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);

        let delta_lambda = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * EP2 + 24.0 * t1 * t1) * d.powi(5)
                / 120.0)
            / cos_phi1;

        LonLat {
            lon: self.central_meridian() + delta_lambda.to_degrees(),
            lat: phi.to_degrees(),
        }
    }
}

impl core::fmt::Display for UtmZone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let hemisphere = if self.north { 'N' } else { 'S' };
        write!(f, "{}{hemisphere}", self.number)
    }
}

/// Distance along the meridian from the equator to latitude `phi` (radians).
fn meridian_arc(phi: f64) -> f64 {
    let e4 = E2 * E2;
    let e6 = e4 * E2;
    SEMI_MAJOR_AXIS
        * ((1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * E2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}
