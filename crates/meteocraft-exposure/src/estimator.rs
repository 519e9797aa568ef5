//! Population exposure inside the thermal footprint of an impact.

use meteocraft_types::{ExposureResult, GeoPoint};

use crate::error::ExposureError;
use crate::footprint::{CapExtent, GeoBounds, circle_ring, haversine_distance_m, ring_contains};
use crate::projection::{LonLat, UtmZone};
use crate::raster::{GridWindow, PopulationRaster};

/// Widest longitude half-span, in degrees, for which cells are tested
/// against the projected ring. Wider footprints, and any footprint around
/// a pole, are selected by great-circle distance.
const MAX_RING_HALF_SPAN_DEG: f64 = 9.0;

/// Most cells requested from the raster in one read.
const READ_SLAB_CELLS: usize = 1 << 22;

/// Longitude offsets at which a footprint is matched against the raster,
/// so disks crossing the antimeridian pick up cells on both sides.
const WRAP_SHIFTS: [f64; 3] = [0.0, -360.0, 360.0];

/// Polar footprints already span every longitude.
const NO_SHIFT: [f64; 1] = [0.0];

/// Footprint radius in meters: half the thermal radius.
pub fn footprint_radius_m(thermal_radius_km: f64) -> f64 {
    thermal_radius_km / 2.0 * 1000.0
}

/// How raster cells are tested for membership in the footprint.
#[derive(Debug)]
enum Selection {
    /// UTM circle brought back to degrees.
    Ring(Vec<LonLat>),
    /// Great-circle distance from the impact point.
    Cap { center: LonLat, radius_m: f64 },
}

impl Selection {
    /// True when the cell centered at `cell` is inside, where the raster
    /// longitude is the footprint longitude plus `shift`.
    fn contains(&self, cell: LonLat, shift: f64) -> bool {
        match self {
            Self::Ring(ring) => ring_contains(
                ring,
                LonLat {
                    lon: cell.lon - shift,
                    lat: cell.lat,
                },
            ),
            Self::Cap { center, radius_m } => haversine_distance_m(*center, cell) <= *radius_m,
        }
    }
}

/// Running sum over the cells selected by the footprint.
#[derive(Debug, Default)]
struct Tally {
    total: f64,
    cells_counted: u64,
    cells_inside: u64,
}

impl Tally {
    fn inside(&mut self, value: f64, missing: bool) {
        self.cells_inside = self.cells_inside.saturating_add(1);
        if !missing {
            self.total += value;
            self.cells_counted = self.cells_counted.saturating_add(1);
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn finish(&self, footprint_radius_m: f64) -> ExposureResult {
        ExposureResult {
            population_total: self.total.round().max(0.0) as u64,
            cells_counted: self.cells_counted,
            footprint_radius_m: footprint_radius_m.round().max(0.0) as u64,
        }
    }
}

/// Add the cells of `window` that `selection` keeps, reading in slabs.
fn tally_window(
    raster: &dyn PopulationRaster,
    window: GridWindow,
    selection: &Selection,
    shift: f64,
    tally: &mut Tally,
) -> Result<(), ExposureError> {
    let info = raster.info();
    for slab in window.row_slabs(READ_SLAB_CELLS) {
        let values = raster.read_window(slab)?;
        for (index, value) in values.into_iter().enumerate() {
            let (row, col) = slab.cell_at(index);
            if selection.contains(info.transform.cell_center(row, col), shift) {
                tally.inside(value, info.is_missing(value));
            }
        }
    }
    Ok(())
}

/// Sum the population inside a disk of half the thermal radius around
/// `center`.
///
/// The disk is built in the UTM zone of the impact, brought back to
/// degrees, and every raster cell whose center falls inside it is
/// counted. Disks around a pole, or too wide for the zone, use the
/// great-circle distance to the impact point instead. Disks crossing the
/// antimeridian count the cells on both sides. No-data cells are skipped.
/// A footprint that selects no cell center counts the single cell under
/// the impact point instead. A footprint outside the raster yields zero.
///
/// # Errors
///
/// Returns [`ExposureError::InvalidRadius`] for a negative or non-finite
/// radius, and [`ExposureError::Raster`] if the raster cannot be read.
pub fn estimate_exposure(
    raster: &dyn PopulationRaster,
    center: &GeoPoint,
    thermal_radius_km: f64,
) -> Result<ExposureResult, ExposureError> {
    if !thermal_radius_km.is_finite() || thermal_radius_km < 0.0 {
        return Err(ExposureError::InvalidRadius(thermal_radius_km));
    }

    let radius_m = footprint_radius_m(thermal_radius_km);
    let zone = UtmZone::for_point(center);
    let center_geo = LonLat::from(center);
    let extent = CapExtent::around(center_geo, radius_m);

    let (selection, bounds) = match extent.half_span {
        Some(half_span) if half_span <= MAX_RING_HALF_SPAN_DEG => {
            let center_m = zone.forward(center_geo);
            let ring: Vec<LonLat> = circle_ring(center_m, radius_m)
                .into_iter()
                .map(|vertex| zone.inverse(vertex))
                .collect();
            let bounds = GeoBounds::of(&ring);
            (Selection::Ring(ring), bounds)
        }
        _ => (
            Selection::Cap {
                center: center_geo,
                radius_m,
            },
            Some(extent.bounds(center_geo.lon)),
        ),
    };
    let shifts: &[f64] = if extent.encloses_pole() {
        &NO_SHIFT
    } else {
        &WRAP_SHIFTS
    };

    tracing::debug!(
        %center,
        %zone,
        epsg = zone.epsg(),
        radius_m,
        half_span = ?extent.half_span,
        by_distance = matches!(selection, Selection::Cap { .. }),
        "Selecting footprint cells"
    );

    let info = raster.info();
    let mut tally = Tally::default();

    if let Some(bounds) = bounds {
        for &shift in shifts {
            if let Some(window) = info.window_for(&bounds.shifted(shift)) {
                tracing::debug!(
                    shift,
                    rows = window.rows,
                    cols = window.cols,
                    "Clipping population raster"
                );
                tally_window(raster, window, &selection, shift, &mut tally)?;
            }
        }
    }

    if tally.cells_inside == 0 {
        if let Some((row, col)) = info.cell_containing(center_geo) {
            let values = raster.read_window(GridWindow::single(row, col))?;
            if let Some(&value) = values.first() {
                tally.inside(value, info.is_missing(value));
            }
        }
    }

    Ok(tally.finish(radius_m))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_precision_loss
)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::RasterError;
    use crate::footprint::EARTH_MEAN_RADIUS_M;
    use crate::raster::{GeoTransform, InMemoryRaster, MAX_WINDOW_CELLS, RasterInfo};

    const NODATA: f64 = -9999.0;

    /// 200x200 grid of 0.01 degree cells covering lon/lat [-1, 1].
    fn grid_info() -> RasterInfo {
        RasterInfo {
            width: 200,
            height: 200,
            transform: GeoTransform {
                origin_lon: -1.0,
                origin_lat: 1.0,
                cell_width: 0.01,
                cell_height: 0.01,
            },
            nodata: Some(NODATA),
        }
    }

    fn uniform(value: f64) -> Vec<f64> {
        vec![value; 200 * 200]
    }

    fn raster(values: Vec<f64>) -> InMemoryRaster {
        InMemoryRaster::new(grid_info(), values).unwrap()
    }

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn zero_radius_counts_the_center_cell() {
        // (0.005, 0.005) sits in row 99, column 100.
        let mut values = uniform(5.0);
        values[99 * 200 + 100] = 42.0;
        let raster = raster(values);

        let result = estimate_exposure(&raster, &point(0.005, 0.005), 0.0).unwrap();
        assert_eq!(result.population_total, 42);
        assert_eq!(result.cells_counted, 1);
        assert_eq!(result.footprint_radius_m, 0);
    }

    #[test]
    fn zero_radius_over_nodata_is_zero() {
        let mut values = uniform(5.0);
        values[99 * 200 + 100] = NODATA;
        let raster = raster(values);

        let result = estimate_exposure(&raster, &point(0.005, 0.005), 0.0).unwrap();
        assert_eq!(result.population_total, 0);
        assert_eq!(result.cells_counted, 0);
    }

    #[test]
    fn outside_extent_is_zero() {
        let raster = raster(uniform(5.0));
        let result = estimate_exposure(&raster, &point(45.0, 60.0), 20.0).unwrap();
        assert_eq!(
            result,
            ExposureResult {
                population_total: 0,
                cells_counted: 0,
                footprint_radius_m: 10_000,
            }
        );
    }

    #[test]
    fn disk_sum_matches_area() {
        // A 5 km disk covers ~78.5 km^2; cells near the equator are
        // ~1.113 km x 1.106 km, so roughly 64 cells.
        let raster = raster(uniform(1.0));
        let result = estimate_exposure(&raster, &point(0.0, 0.0), 10.0).unwrap();
        assert_eq!(result.footprint_radius_m, 5000);
        assert!(
            (56..=72).contains(&result.population_total),
            "got {}",
            result.population_total
        );
        assert_eq!(result.population_total, result.cells_counted);
    }

    #[test]
    fn nodata_cells_are_excluded() {
        let full = estimate_exposure(&raster(uniform(2.0)), &point(0.0, 0.0), 10.0).unwrap();

        // Cell (99, 99) holds the point (-0.005, 0.005), well inside the disk.
        let mut values = uniform(2.0);
        values[99 * 200 + 99] = NODATA;
        let holed = estimate_exposure(&raster(values), &point(0.0, 0.0), 10.0).unwrap();

        assert_eq!(holed.cells_counted + 1, full.cells_counted);
        assert_eq!(holed.population_total + 2, full.population_total);
    }

    #[test]
    fn partially_outside_extent_counts_overlap() {
        // Centered on the eastern edge: about half the disk overlaps.
        let raster = raster(uniform(1.0));
        let inside = estimate_exposure(&raster, &point(0.0, 0.0), 10.0).unwrap();
        let edge = estimate_exposure(&raster, &point(0.0, 1.0), 10.0).unwrap();
        assert!(edge.population_total > 0);
        assert!(edge.population_total < inside.population_total);
    }

    #[test]
    fn rounds_fractional_densities() {
        let raster = raster(uniform(0.6));
        let result = estimate_exposure(&raster, &point(0.005, 0.005), 0.0).unwrap();
        assert_eq!(result.population_total, 1);
    }

    #[test]
    fn rejects_invalid_radius() {
        let raster = raster(uniform(1.0));
        assert!(matches!(
            estimate_exposure(&raster, &point(0.0, 0.0), -1.0),
            Err(ExposureError::InvalidRadius(_))
        ));
        assert!(matches!(
            estimate_exposure(&raster, &point(0.0, 0.0), f64::NAN),
            Err(ExposureError::InvalidRadius(_))
        ));
    }

    #[test]
    fn identical_inputs_identical_results() {
        let raster = raster(uniform(3.0));
        let a = estimate_exposure(&raster, &point(0.3, -0.2), 6.0).unwrap();
        let b = estimate_exposure(&raster, &point(0.3, -0.2), 6.0).unwrap();
        assert_eq!(a, b);
    }

    /// A global 30 arc-second grid of ones that records its largest read.
    struct GlobalOnes {
        info: RasterInfo,
        largest_read: AtomicUsize,
        cells_read: AtomicUsize,
    }

    impl GlobalOnes {
        fn new() -> Self {
            Self {
                info: RasterInfo {
                    width: 43_200,
                    height: 21_600,
                    transform: GeoTransform {
                        origin_lon: -180.0,
                        origin_lat: 90.0,
                        cell_width: 1.0 / 120.0,
                        cell_height: 1.0 / 120.0,
                    },
                    nodata: Some(NODATA),
                },
                largest_read: AtomicUsize::new(0),
                cells_read: AtomicUsize::new(0),
            }
        }
    }

    impl PopulationRaster for GlobalOnes {
        fn info(&self) -> &RasterInfo {
            &self.info
        }

        fn read_window(&self, window: GridWindow) -> Result<Vec<f64>, RasterError> {
            self.info.check_window(window)?;
            self.largest_read.fetch_max(window.len(), Ordering::Relaxed);
            self.cells_read.fetch_add(window.len(), Ordering::Relaxed);
            Ok(vec![1.0; window.len()])
        }
    }

    /// 1 degree cells over every longitude, latitudes `[north - 10, north]`.
    fn polar_cap_raster(north: f64) -> InMemoryRaster {
        let info = RasterInfo {
            width: 360,
            height: 10,
            transform: GeoTransform {
                origin_lon: -180.0,
                origin_lat: north,
                cell_width: 1.0,
                cell_height: 1.0,
            },
            nodata: Some(NODATA),
        };
        InMemoryRaster::new(info, vec![1.0; 3600]).unwrap()
    }

    #[test]
    fn north_pole_counts_every_longitude() {
        // 200 km reaches the 89.5 and 88.5 rows (55.6 and 166.8 km away)
        // but not 87.5 (278 km).
        let raster = polar_cap_raster(90.0);
        let result = estimate_exposure(&raster, &point(90.0, 0.0), 400.0).unwrap();
        assert_eq!(result.population_total, 720);
        assert_eq!(result.cells_counted, 720);
    }

    #[test]
    fn south_pole_counts_every_longitude() {
        let raster = polar_cap_raster(-80.0);
        let result = estimate_exposure(&raster, &point(-90.0, 45.0), 400.0).unwrap();
        assert_eq!(result.population_total, 720);
    }

    #[test]
    fn pole_reads_stay_bounded() {
        // The fallback thermal radius puts the footprint edge 0.4266
        // degrees from the pole: rows whose centers lie within it are
        // 51 full circles of 43 200 cells.
        let raster = GlobalOnes::new();
        for lat in [90.0, -90.0] {
            let result = estimate_exposure(&raster, &point(lat, 0.0), 94.868_329_805_051_37).unwrap();
            assert_eq!(result.population_total, 51 * 43_200, "lat {lat}");
        }
        assert!(raster.largest_read.load(Ordering::Relaxed) <= READ_SLAB_CELLS);
    }

    #[test]
    fn footprint_enclosing_the_pole_from_lat_89() {
        let raster = GlobalOnes::new();
        let result = estimate_exposure(&raster, &point(89.0, 10.0), 440.908_153_700_972_1).unwrap();

        // Only the band between 87.0 and 90 degrees is read.
        let cells_read = raster.cells_read.load(Ordering::Relaxed);
        assert!(cells_read < 400 * 43_200, "read {cells_read} cells");
        assert!(raster.largest_read.load(Ordering::Relaxed) <= READ_SLAB_CELLS);
        assert!(READ_SLAB_CELLS <= MAX_WINDOW_CELLS);

        assert!(result.population_total > 0);
        assert!(result.population_total < u64::try_from(cells_read).unwrap());
        assert_eq!(result.population_total, result.cells_counted);
    }

    #[test]
    fn wide_high_latitude_footprint_uses_distance() {
        // At 85N a 220 km disk spans about 23 degrees of longitude each way.
        let raster = GlobalOnes::new();
        let result = estimate_exposure(&raster, &point(85.0, 0.0), 440.908_153_700_972_1).unwrap();

        // Cells near 85N are about 0.081 km by 0.926 km. They shrink
        // toward the pole, so the count runs a few percent over.
        let disk_km2 = core::f64::consts::PI * 220.454_f64.powi(2);
        let earth_km = EARTH_MEAN_RADIUS_M / 1000.0;
        let cell_km2 = (1.0 / 120.0_f64).to_radians().powi(2)
            * earth_km.powi(2)
            * 85.0_f64.to_radians().cos();
        let expected = disk_km2 / cell_km2;
        let got = result.population_total as f64;
        assert!((got / expected - 1.0).abs() < 0.1, "got {got}, expected about {expected}");
    }

    /// 0.1 degree cells over every longitude, latitudes `[-1, 1]`.
    fn equatorial_belt() -> InMemoryRaster {
        let info = RasterInfo {
            width: 3600,
            height: 20,
            transform: GeoTransform {
                origin_lon: -180.0,
                origin_lat: 1.0,
                cell_width: 0.1,
                cell_height: 0.1,
            },
            nodata: Some(NODATA),
        };
        InMemoryRaster::new(info, vec![1.0; 72_000]).unwrap()
    }

    #[test]
    fn footprint_wraps_across_the_antimeridian() {
        let raster = equatorial_belt();
        let inland = estimate_exposure(&raster, &point(0.0, 0.0), 100.0).unwrap();
        let east_edge = estimate_exposure(&raster, &point(0.0, 180.0), 100.0).unwrap();
        let west_edge = estimate_exposure(&raster, &point(0.0, -180.0), 100.0).unwrap();

        assert!(inland.population_total > 50);
        assert!(inland.population_total.abs_diff(east_edge.population_total) <= 2);
        assert!(inland.population_total.abs_diff(west_edge.population_total) <= 2);
    }
}
