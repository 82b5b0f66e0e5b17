//! Height-map decoding into a grid of height samples.
//!
//! Grid column `c` sits at world `x = c`; grid row `r` sits at world
//! `z = (height - 1) - r`. Row 0 is the top row of the image, so world +Z
//! grows with a bitmap's native bottom-up row order.

use std::path::Path;

use glam::Vec3;
use vista_config::{HeightMapFormat, TerrainConfig};

use crate::error::{TerrainError, try_alloc};

/// One grid point of the height field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightSample {
    /// World position; `y` is already divided by the height scale.
    pub position: Vec3,
    /// Smoothed vertex normal, zero until [`crate::synthesize_normals`] runs.
    pub normal: Vec3,
    /// RGB tint in `0.0..=1.0`.
    pub color: Vec3,
}

/// A `width × height` row-major grid of [`HeightSample`]s.
///
/// Lives only for the duration of terrain construction;
/// [`crate::build_mesh`] consumes it.
#[derive(Clone, Debug)]
pub struct HeightField {
    width: u32,
    height: u32,
    samples: Vec<HeightSample>,
}

/// Reject grids the mesh builder cannot split evenly into quads.
///
/// Both dimensions must be odd and at least 3.
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), TerrainError> {
    for (name, value) in [("width", width), ("height", height)] {
        if value < 3 {
            return Err(TerrainError::Config(format!(
                "terrain {name} must be at least 3 samples, got {value}"
            )));
        }
        if value % 2 == 0 {
            return Err(TerrainError::Config(format!(
                "terrain {name} must be odd, got {value}"
            )));
        }
    }
    Ok(())
}

fn validate_height_scale(height_scale: f32) -> Result<(), TerrainError> {
    if !height_scale.is_finite() || height_scale <= 0.0 {
        return Err(TerrainError::Config(format!(
            "height scale must be a positive number, got {height_scale}"
        )));
    }
    Ok(())
}

impl HeightField {
    /// Build a grid from undivided height samples in row-major order.
    ///
    /// Every sample starts with a zero normal and a white tint.
    pub fn from_raw_heights(
        width: u32,
        height: u32,
        raw: &[f32],
        height_scale: f32,
    ) -> Result<Self, TerrainError> {
        validate_dimensions(width, height)?;
        validate_height_scale(height_scale)?;

        let count = width as usize * height as usize;
        if raw.len() != count {
            return Err(TerrainError::format(
                "height samples",
                format!("expected {count} samples, got {}", raw.len()),
            ));
        }

        let mut samples = try_alloc(count, "height field")?;
        let top = (height - 1) as f32;
        samples.extend(raw.iter().enumerate().map(|(i, &value)| {
            let col = (i % width as usize) as f32;
            let row = (i / width as usize) as f32;
            HeightSample {
                position: Vec3::new(col, value / height_scale, top - row),
                normal: Vec3::ZERO,
                color: Vec3::ONE,
            }
        }));

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Load heights and tint as described by `config`.
    pub fn load(config: &TerrainConfig) -> Result<Self, TerrainError> {
        let mut field = match config.height_map_format {
            HeightMapFormat::Bitmap => Self::load_bitmap(
                &config.height_map,
                config.width,
                config.height,
                config.height_scale,
            )?,
            HeightMapFormat::Raw16 => Self::load_raw16(
                &config.height_map,
                config.width,
                config.height,
                config.height_scale,
            )?,
        };
        field.load_color_map(&config.color_map)?;
        Ok(field)
    }

    /// Decode a grayscale bitmap. Only the red channel is read.
    pub fn load_bitmap(
        path: &Path,
        width: u32,
        height: u32,
        height_scale: f32,
    ) -> Result<Self, TerrainError> {
        validate_dimensions(width, height)?;
        validate_height_scale(height_scale)?;

        let image = open_matching(path, width, height)?.into_rgb8();
        let mut raw = try_alloc(width as usize * height as usize, "height bitmap")?;
        raw.extend(image.pixels().map(|p| f32::from(p[0])));

        log::debug!("Decoded {width}x{height} height bitmap {}", path.display());
        Self::from_raw_heights(width, height, &raw, height_scale)
    }

    /// Decode a headerless little-endian 16-bit RAW height map.
    pub fn load_raw16(
        path: &Path,
        width: u32,
        height: u32,
        height_scale: f32,
    ) -> Result<Self, TerrainError> {
        validate_dimensions(width, height)?;
        validate_height_scale(height_scale)?;

        let bytes = std::fs::read(path).map_err(|source| TerrainError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let count = width as usize * height as usize;
        let expected = count * 2;
        if bytes.len() < expected {
            return Err(TerrainError::format(
                path.display().to_string(),
                format!("short read: {} of {expected} bytes", bytes.len()),
            ));
        }

        let mut raw = try_alloc(count, "raw height map")?;
        raw.extend(
            bytes[..expected]
                .chunks_exact(2)
                .map(|pair| f32::from(u16::from_le_bytes([pair[0], pair[1]]))),
        );

        log::debug!("Decoded {width}x{height} RAW16 height map {}", path.display());
        Self::from_raw_heights(width, height, &raw, height_scale)
    }

    /// Replace every sample's tint with the RGB bitmap at `path`.
    pub fn load_color_map(&mut self, path: &Path) -> Result<(), TerrainError> {
        let image = open_matching(path, self.width, self.height)?.into_rgb8();
        for (sample, pixel) in self.samples.iter_mut().zip(image.pixels()) {
            sample.color = Vec3::new(
                f32::from(pixel[0]),
                f32::from(pixel[1]),
                f32::from(pixel[2]),
            ) / 255.0;
        }
        log::debug!("Applied color map {}", path.display());
        Ok(())
    }

    /// Replace every sample's tint. `colors` is row-major, one per sample.
    pub fn set_colors(&mut self, colors: &[Vec3]) -> Result<(), TerrainError> {
        if colors.len() != self.samples.len() {
            return Err(TerrainError::format(
                "color samples",
                format!("expected {} colors, got {}", self.samples.len(), colors.len()),
            ));
        }
        for (sample, &color) in self.samples.iter_mut().zip(colors) {
            sample.color = color;
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major index of grid point `(col, row)`.
    pub fn index(&self, col: u32, row: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    /// The sample at `(col, row)`.
    ///
    /// # Panics
    ///
    /// Panics if `col >= width` or `row >= height`.
    pub fn sample(&self, col: u32, row: u32) -> &HeightSample {
        &self.samples[self.index(col, row)]
    }

    pub fn samples(&self) -> &[HeightSample] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [HeightSample] {
        &mut self.samples
    }
}

/// Open an image and require it to be exactly `width × height`.
fn open_matching(path: &Path, width: u32, height: u32) -> Result<image::DynamicImage, TerrainError> {
    let image = image::open(path).map_err(|e| TerrainError::from_image(path, e))?;
    if image.width() != width || image.height() != height {
        return Err(TerrainError::format(
            path.display().to_string(),
            format!(
                "image is {}x{} but the terrain is {width}x{height}",
                image.width(),
                image.height()
            ),
        ));
    }
    Ok(image)
}
