//! Population raster access and impact footprint exposure.
//!
//! The exposure of an impact is the population living inside a disk around
//! the impact point. The disk is built in meters (UTM), brought back to
//! geographic coordinates, and used to clip a population-density raster.
//!
//! # Modules
//!
//! - [`error`] -- [`ExposureError`] and [`RasterError`].
//! - [`projection`] -- WGS84 Universal Transverse Mercator forward/inverse.
//! - [`footprint`] -- Circular buffer rings, point-in-ring tests, bounds,
//!   great-circle distances.
//! - [`raster`] -- Grid georeferencing, the [`PopulationRaster`] trait and
//!   an in-memory implementation.
//! - [`geotiff`] -- [`GeoTiffRaster`], a windowed GeoTIFF reader.
//! - [`estimator`] -- [`estimate_exposure`], the clip-and-sum step.
//!
//! [`PopulationRaster`]: raster::PopulationRaster
//! [`GeoTiffRaster`]: geotiff::GeoTiffRaster

pub mod error;
pub mod estimator;
pub mod footprint;
pub mod geotiff;
pub mod projection;
pub mod raster;

pub use error::{ExposureError, RasterError};
pub use estimator::{estimate_exposure, footprint_radius_m};
pub use geotiff::GeoTiffRaster;
pub use projection::{LonLat, ProjectedPoint, UtmZone};
pub use raster::{GeoTransform, GridWindow, InMemoryRaster, PopulationRaster, RasterInfo};
