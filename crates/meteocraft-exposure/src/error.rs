//! Error types for the `meteocraft-exposure` crate.

/// Errors raised while opening or reading a population raster.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// The raster file could not be opened or read.
    #[error("raster I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The TIFF decoder rejected the file.
    #[error("TIFF decode error: {source}")]
    Tiff {
        /// The underlying decoder error.
        #[from]
        source: tiff::TiffError,
    },

    /// A required GeoTIFF georeferencing tag is absent.
    #[error("raster is missing georeferencing tag {0}")]
    MissingGeoreference(&'static str),

    /// The raster layout or sample format is not supported.
    #[error("unsupported raster: {0}")]
    Unsupported(String),

    /// An in-memory grid does not match its declared dimensions.
    #[error("raster has {actual} values, expected {expected}")]
    Shape {
        /// `width * height`.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// A window extends past the raster edge.
    #[error("window {rows}x{cols} at ({row}, {col}) is outside the raster")]
    WindowOutOfBounds {
        /// First row.
        row: usize,
        /// First column.
        col: usize,
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// A window holds more cells than a single read may allocate.
    #[error("window of {cells} cells exceeds the {limit} cell read limit")]
    WindowTooLarge {
        /// Cells requested.
        cells: usize,
        /// Largest allowed read.
        limit: usize,
    },

    /// The shared decoder lock was poisoned by a panicking reader.
    #[error("raster lock poisoned: {0}")]
    Poisoned(String),
}

/// Errors raised by [`estimate_exposure`](crate::estimate_exposure).
#[derive(Debug, thiserror::Error)]
pub enum ExposureError {
    /// The footprint radius is negative or not finite.
    #[error("invalid footprint radius: {0} km")]
    InvalidRadius(f64),

    /// Reading the raster failed.
    #[error(transparent)]
    Raster(#[from] RasterError),
}
