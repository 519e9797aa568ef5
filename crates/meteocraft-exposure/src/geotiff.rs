//! Windowed reads from a single-band GeoTIFF.
//!
//! Georeferencing comes from `ModelPixelScaleTag` and `ModelTiepointTag`
//! (rotation-free, `PixelIsArea` rasters as written by GDAL) and the
//! no-data value from GDAL's `GDAL_NODATA` ASCII tag. Only the strips or
//! tiles overlapping a requested window are decoded, so a global 30
//! arc-second grid never has to fit in memory.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

use crate::error::RasterError;
use crate::raster::{GeoTransform, GridWindow, PopulationRaster, RasterInfo};

const MODEL_PIXEL_SCALE: u16 = 33_550;
const MODEL_TIEPOINT: u16 = 33_922;
const GDAL_NODATA: u16 = 42_113;

/// Strip or tile geometry of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChunkLayout {
    chunk_width: usize,
    chunk_height: usize,
    chunks_across: usize,
}

/// A GeoTIFF population raster opened once and shared read-only.
///
/// The TIFF decoder keeps a file cursor, so reads are serialized behind a
/// mutex. Nothing is ever written back.
pub struct GeoTiffRaster {
    path: PathBuf,
    info: RasterInfo,
    layout: ChunkLayout,
    decoder: Mutex<Decoder<BufReader<File>>>,
}

impl core::fmt::Debug for GeoTiffRaster {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GeoTiffRaster")
            .field("path", &self.path)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl GeoTiffRaster {
    /// Open `path` and read its georeferencing.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not a TIFF, has more than one
    /// sample per pixel, or lacks the pixel-scale/tiepoint tags.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RasterError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let mut decoder = Decoder::new(BufReader::new(file))?;

        match decoder.colortype()? {
            ColorType::Gray(_) => {}
            other => {
                return Err(RasterError::Unsupported(format!(
                    "expected a single-band raster, found {other:?}"
                )));
            }
        }

        let (width, height) = decoder.dimensions()?;
        let width = usize::try_from(width)
            .map_err(|e| RasterError::Unsupported(format!("width does not fit: {e}")))?;
        let height = usize::try_from(height)
            .map_err(|e| RasterError::Unsupported(format!("height does not fit: {e}")))?;

        let scale = f64_tag(&mut decoder, MODEL_PIXEL_SCALE, "ModelPixelScaleTag")?;
        let tiepoint = f64_tag(&mut decoder, MODEL_TIEPOINT, "ModelTiepointTag")?;
        let transform = transform_from_tags(&scale, &tiepoint)?;
        let nodata = nodata_tag(&mut decoder)?;

        let (chunk_width, chunk_height) = decoder.chunk_dimensions();
        let chunk_width = usize::try_from(chunk_width)
            .map_err(|e| RasterError::Unsupported(format!("chunk width does not fit: {e}")))?;
        let chunk_height = usize::try_from(chunk_height)
            .map_err(|e| RasterError::Unsupported(format!("chunk height does not fit: {e}")))?;
        if chunk_width == 0 || chunk_height == 0 {
            return Err(RasterError::Unsupported(String::from("zero-sized strips or tiles")));
        }
        let layout = ChunkLayout {
            chunk_width,
            chunk_height,
            chunks_across: width.div_ceil(chunk_width),
        };

        let info = RasterInfo {
            width,
            height,
            transform,
            nodata,
        };

        tracing::info!(
            path = %path.display(),
            width,
            height,
            cell_width = transform.cell_width,
            cell_height = transform.cell_height,
            nodata = ?nodata,
            chunk_width,
            chunk_height,
            "Population raster opened"
        );

        Ok(Self {
            path,
            info,
            layout,
            decoder: Mutex::new(decoder),
        })
    }
}

impl PopulationRaster for GeoTiffRaster {
    fn info(&self) -> &RasterInfo {
        &self.info
    }

    #[allow(clippy::arithmetic_side_effects)]
    fn read_window(&self, window: GridWindow) -> Result<Vec<f64>, RasterError> {
        self.info.check_window(window)?;
        let mut out = vec![f64::NAN; window.len()];
        if window.is_empty() {
            return Ok(out);
        }

        let layout = self.layout;
        let last_row = window.row + window.rows - 1;
        let last_col = window.col + window.cols - 1;

        let mut decoder = self
            .decoder
            .lock()
            .map_err(|e| RasterError::Poisoned(e.to_string()))?;

        for chunk_row in window.row / layout.chunk_height..=last_row / layout.chunk_height {
            for chunk_col in window.col / layout.chunk_width..=last_col / layout.chunk_width {
                let index = chunk_row * layout.chunks_across + chunk_col;
                let index = u32::try_from(index)
                    .map_err(|e| RasterError::Unsupported(format!("chunk index: {e}")))?;
                let samples = samples_to_f64(decoder.read_chunk(index)?)?;

                // Edge strips and tiles are decoded cropped to the image.
                let (data_width, _) = decoder.chunk_data_dimensions(index);
                let stride = usize::try_from(data_width).map_err(|e| {
                    RasterError::Unsupported(format!("chunk width does not fit: {e}"))
                })?;

                let chunk_top = chunk_row * layout.chunk_height;
                let chunk_left = chunk_col * layout.chunk_width;
                let rows = window.row.max(chunk_top)..=last_row.min(chunk_top + layout.chunk_height - 1);
                for row in rows {
                    let cols = window.col.max(chunk_left)..=last_col.min(chunk_left + layout.chunk_width - 1);
                    for col in cols {
                        let src = (row - chunk_top) * stride + (col - chunk_left);
                        let dst = (row - window.row) * window.cols + (col - window.col);
                        if let (Some(value), Some(slot)) = (samples.get(src), out.get_mut(dst)) {
                            *slot = *value;
                        }
                    }
                }
            }
        }

        Ok(out)
    }
}

/// Read a numeric tag as `f64` values.
fn f64_tag(
    decoder: &mut Decoder<BufReader<File>>,
    code: u16,
    name: &'static str,
) -> Result<Vec<f64>, RasterError> {
    match decoder.find_tag(Tag::from_u16_exhaustive(code))? {
        Some(value) => Ok(value.into_f64_vec()?),
        None => Err(RasterError::MissingGeoreference(name)),
    }
}

/// Read `GDAL_NODATA`, ignoring it when absent or not numeric.
fn nodata_tag(decoder: &mut Decoder<BufReader<File>>) -> Result<Option<f64>, RasterError> {
    let Some(value) = decoder.find_tag(Tag::from_u16_exhaustive(GDAL_NODATA))? else {
        return Ok(None);
    };
    let text = value.into_string()?;
    let parsed = text.trim_matches(|c: char| c == '\0' || c.is_whitespace()).parse::<f64>();
    match parsed {
        Ok(nodata) => Ok(Some(nodata)),
        Err(e) => {
            tracing::warn!(value = %text, error = %e, "Ignoring non-numeric GDAL_NODATA");
            Ok(None)
        }
    }
}

/// Build the grid transform from `[sx, sy, sz]` and `[i, j, k, x, y, z]`.
fn transform_from_tags(scale: &[f64], tiepoint: &[f64]) -> Result<GeoTransform, RasterError> {
    let (Some(&sx), Some(&sy)) = (scale.first(), scale.get(1)) else {
        return Err(RasterError::MissingGeoreference("ModelPixelScaleTag"));
    };
    let [i, j, _k, x, y, ..] = tiepoint else {
        return Err(RasterError::MissingGeoreference("ModelTiepointTag"));
    };
    if !(sx > 0.0 && sy > 0.0) {
        return Err(RasterError::Unsupported(format!(
            "non-positive pixel scale ({sx}, {sy})"
        )));
    }
    Ok(GeoTransform {
        origin_lon: x - i * sx,
        origin_lat: y + j * sy,
        cell_width: sx,
        cell_height: sy,
    })
}

/// Widen any supported sample type to `f64`.
#[allow(clippy::cast_precision_loss)]
fn samples_to_f64(result: DecodingResult) -> Result<Vec<f64>, RasterError> {
    let values = match result {
        DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|s| s as f64).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|s| s as f64).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
        #[allow(unreachable_patterns)]
        _ => {
            return Err(RasterError::Unsupported(String::from(
                "unsupported sample format",
            )));
        }
    };
    Ok(values)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use tiff::encoder::{TiffEncoder, colortype};

    use super::*;

    /// Write a 4x3 `Float32` GeoTIFF at (10E, 20N) with 0.5 degree cells,
    /// values 0..12 except a no-data cell at row 1, col 1.
    fn write_fixture(path: &Path, with_georeference: bool) {
        let mut data: Vec<f32> = (0_u8..12).map(f32::from).collect();
        if let Some(cell) = data.get_mut(5) {
            *cell = -9999.0;
        }

        let file = File::create(path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        let mut image = encoder.new_image::<colortype::Gray32Float>(4, 3).unwrap();
        image.rows_per_strip(2).unwrap();
        if with_georeference {
            image
                .encoder()
                .write_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE), &[0.5_f64, 0.5, 0.0][..])
                .unwrap();
            image
                .encoder()
                .write_tag(
                    Tag::from_u16_exhaustive(MODEL_TIEPOINT),
                    &[0.0_f64, 0.0, 0.0, 10.0, 20.0, 0.0][..],
                )
                .unwrap();
        }
        image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(GDAL_NODATA), "-9999")
            .unwrap();
        image.write_data(&data).unwrap();
    }

    #[test]
    fn reads_georeferencing_and_nodata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("density.tif");
        write_fixture(&path, true);

        let raster = GeoTiffRaster::open(&path).unwrap();
        let info = raster.info();
        assert_eq!(info.width, 4);
        assert_eq!(info.height, 3);
        assert_eq!(info.transform.origin_lon, 10.0);
        assert_eq!(info.transform.origin_lat, 20.0);
        assert_eq!(info.transform.cell_width, 0.5);
        assert_eq!(info.nodata, Some(-9999.0));
    }

    #[test]
    fn window_spans_strips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("density.tif");
        write_fixture(&path, true);
        let raster = GeoTiffRaster::open(&path).unwrap();

        let window = GridWindow {
            row: 1,
            col: 1,
            rows: 2,
            cols: 3,
        };
        let values = raster.read_window(window).unwrap();
        assert_eq!(values, vec![-9999.0, 6.0, 7.0, 9.0, 10.0, 11.0]);
        assert!(raster.info().is_missing(values[0]));

        let all = raster
            .read_window(GridWindow {
                row: 0,
                col: 0,
                rows: 3,
                cols: 4,
            })
            .unwrap();
        assert_eq!(all.len(), 12);
        assert_eq!(all[11], 11.0);

        // The last strip holds a single row.
        let corner = raster.read_window(GridWindow::single(2, 3)).unwrap();
        assert_eq!(corner, vec![11.0]);
    }

    #[test]
    fn missing_georeference_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.tif");
        write_fixture(&path, false);

        let err = GeoTiffRaster::open(&path).unwrap_err();
        assert!(matches!(err, RasterError::MissingGeoreference(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GeoTiffRaster::open("/nonexistent/density.tif").unwrap_err();
        assert!(matches!(err, RasterError::Io { .. }));
    }

    #[test]
    fn tags_to_transform() {
        let t = transform_from_tags(&[0.25, 0.25, 0.0], &[2.0, 4.0, 0.0, -180.0, 90.0, 0.0]).unwrap();
        assert_eq!(t.origin_lon, -180.5);
        assert_eq!(t.origin_lat, 91.0);
        assert!(transform_from_tags(&[0.25], &[0.0; 6]).is_err());
        assert!(transform_from_tags(&[0.25, 0.25], &[0.0; 3]).is_err());
        assert!(transform_from_tags(&[0.0, 0.25], &[0.0; 6]).is_err());
    }
}
