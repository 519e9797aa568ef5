//! Georeferenced grids and the read-only raster seam.
//!
//! Rasters are north-up, in geographic degrees, with row 0 along the
//! northern edge. Values are returned as `f64` regardless of the stored
//! sample type.

use crate::error::RasterError;
use crate::footprint::GeoBounds;
use crate::projection::LonLat;

/// Relative tolerance for matching the declared no-data value.
///
/// GDAL writes the no-data value as decimal text while `Float32` rasters
/// store its single-precision rounding, so an exact comparison misses.
const NODATA_TOLERANCE: f64 = 1e-6;

/// Largest window a single read may request.
pub const MAX_WINDOW_CELLS: usize = 1 << 24;

/// Affine mapping from grid indices to degrees (no rotation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// Longitude of the western edge of column 0.
    pub origin_lon: f64,
    /// Latitude of the northern edge of row 0.
    pub origin_lat: f64,
    /// Cell width in degrees.
    pub cell_width: f64,
    /// Cell height in degrees (positive; rows run south).
    pub cell_height: f64,
}

impl GeoTransform {
    /// Fractional column of a longitude.
    pub fn column_of(&self, lon: f64) -> f64 {
        (lon - self.origin_lon) / self.cell_width
    }

    /// Fractional row of a latitude.
    pub fn row_of(&self, lat: f64) -> f64 {
        (self.origin_lat - lat) / self.cell_height
    }

    /// Center of a cell.
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_center(&self, row: usize, col: usize) -> LonLat {
        LonLat {
            lon: self.origin_lon + (col as f64 + 0.5) * self.cell_width,
            lat: self.origin_lat - (row as f64 + 0.5) * self.cell_height,
        }
    }
}

/// A rectangular block of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridWindow {
    /// First row.
    pub row: usize,
    /// First column.
    pub col: usize,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

impl GridWindow {
    /// A window of exactly one cell.
    pub const fn single(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            rows: 1,
            cols: 1,
        }
    }

    /// Number of cells.
    pub const fn len(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// True when the window has no cells.
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Grid coordinates of the `index`-th cell in row-major order.
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn cell_at(&self, index: usize) -> (usize, usize) {
        if self.cols == 0 {
            return (self.row, self.col);
        }
        (self.row + index / self.cols, self.col + index % self.cols)
    }

    /// Split into consecutive full-width bands of at most `max_cells`
    /// cells (at least one row each).
    #[allow(clippy::arithmetic_side_effects)]
    pub fn row_slabs(self, max_cells: usize) -> impl Iterator<Item = Self> {
        let rows_per_slab = (max_cells / self.cols.max(1)).max(1);
        (0..self.rows).step_by(rows_per_slab).map(move |offset| Self {
            row: self.row + offset,
            rows: rows_per_slab.min(self.rows - offset),
            ..self
        })
    }
}

/// Dimensions, georeferencing and no-data value of a raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterInfo {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Index-to-degree mapping.
    pub transform: GeoTransform,
    /// Value marking cells without a measurement.
    pub nodata: Option<f64>,
}

impl RasterInfo {
    /// True when a value must be excluded from sums.
    pub fn is_missing(&self, value: f64) -> bool {
        if !value.is_finite() {
            return true;
        }
        self.nodata.is_some_and(|nodata| {
            (value - nodata).abs() <= nodata.abs().max(1.0) * NODATA_TOLERANCE
        })
    }

    /// Cells touched by `bounds`, clamped to the raster extent.
    ///
    /// Returns `None` when the bounds fall entirely outside the raster.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn window_for(&self, bounds: &GeoBounds) -> Option<GridWindow> {
        let width = self.width as f64;
        let height = self.height as f64;

        let col_start = self.transform.column_of(bounds.west).floor().clamp(0.0, width);
        let col_end = self.transform.column_of(bounds.east).ceil().clamp(0.0, width);
        let row_start = self.transform.row_of(bounds.north).floor().clamp(0.0, height);
        let row_end = self.transform.row_of(bounds.south).ceil().clamp(0.0, height);

        if col_end <= col_start || row_end <= row_start {
            return None;
        }

        Some(GridWindow {
            row: row_start as usize,
            col: col_start as usize,
            rows: (row_end - row_start) as usize,
            cols: (col_end - col_start) as usize,
        })
    }

    /// The cell containing `point`, if it lies inside the raster.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn cell_containing(&self, point: LonLat) -> Option<(usize, usize)> {
        let col = self.transform.column_of(point.lon).floor();
        let row = self.transform.row_of(point.lat).floor();
        let inside = (0.0..self.width as f64).contains(&col) && (0.0..self.height as f64).contains(&row);
        inside.then(|| (row as usize, col as usize))
    }

    /// Check that `window` lies inside the raster and is small enough to
    /// read at once.
    pub fn check_window(&self, window: GridWindow) -> Result<(), RasterError> {
        let fits = window
            .row
            .checked_add(window.rows)
            .is_some_and(|end| end <= self.height)
            && window
                .col
                .checked_add(window.cols)
                .is_some_and(|end| end <= self.width);
        if !fits {
            return Err(RasterError::WindowOutOfBounds {
                row: window.row,
                col: window.col,
                rows: window.rows,
                cols: window.cols,
            });
        }
        if window.len() > MAX_WINDOW_CELLS {
            return Err(RasterError::WindowTooLarge {
                cells: window.len(),
                limit: MAX_WINDOW_CELLS,
            });
        }
        Ok(())
    }
}

/// A read-only population raster shared across requests.
///
/// Implementations must be safe to read from several threads; the data
/// itself is never modified.
pub trait PopulationRaster: Send + Sync {
    /// Dimensions and georeferencing.
    fn info(&self) -> &RasterInfo;

    /// Read a window as row-major values (`window.rows * window.cols`).
    fn read_window(&self, window: GridWindow) -> Result<Vec<f64>, RasterError>;
}

/// A raster held entirely in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryRaster {
    info: RasterInfo,
    values: Vec<f64>,
}

impl InMemoryRaster {
    /// Wrap row-major `values` of a `info.width x info.height` grid.
    pub fn new(info: RasterInfo, values: Vec<f64>) -> Result<Self, RasterError> {
        let expected = info.width.saturating_mul(info.height);
        if values.len() != expected {
            return Err(RasterError::Shape {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { info, values })
    }
}

impl PopulationRaster for InMemoryRaster {
    fn info(&self) -> &RasterInfo {
        &self.info
    }

    #[allow(clippy::arithmetic_side_effects)]
    fn read_window(&self, window: GridWindow) -> Result<Vec<f64>, RasterError> {
        self.info.check_window(window)?;
        let mut out = Vec::with_capacity(window.len());
        for row in window.row..window.row + window.rows {
            let start = row * self.info.width + window.col;
            let slice = self
                .values
                .get(start..start + window.cols)
                .ok_or(RasterError::WindowOutOfBounds {
                    row: window.row,
                    col: window.col,
                    rows: window.rows,
                    cols: window.cols,
                })?;
            out.extend_from_slice(slice);
        }
        Ok(out)
    }
}
