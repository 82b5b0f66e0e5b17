//! Per-face and smoothed per-vertex normals over a [`HeightField`].

use glam::Vec3;

use crate::error::{TerrainError, try_alloc};
use crate::heightfield::HeightField;

/// One normal per quad, row-major over `(height - 1) × (width - 1)`.
///
/// Each quad's normal comes from its upper-left, lower-left and
/// lower-right grid points. Flat ground yields `+Y`.
pub fn face_normals(field: &HeightField) -> Result<Vec<Vec3>, TerrainError> {
    let quads_x = field.width() - 1;
    let quads_z = field.height() - 1;
    let mut normals = try_alloc(quads_x as usize * quads_z as usize, "face normals")?;

    for row in 0..quads_z {
        for col in 0..quads_x {
            let ul = field.sample(col, row).position;
            let bl = field.sample(col, row + 1).position;
            let br = field.sample(col + 1, row + 1).position;
            normals.push((bl - ul).cross(ul - br).normalize_or_zero());
        }
    }
    Ok(normals)
}

/// Fill every sample's normal with the normalized sum of the face normals
/// of the up to four quads that touch it.
pub fn synthesize_normals(field: &mut HeightField) -> Result<(), TerrainError> {
    let faces = face_normals(field)?;
    let quads_x = i64::from(field.width()) - 1;
    let quads_z = i64::from(field.height()) - 1;
    let width = field.width();

    let face_at = |col: i64, row: i64| -> Vec3 {
        if col < 0 || row < 0 || col >= quads_x || row >= quads_z {
            Vec3::ZERO
        } else {
            faces[(row * quads_x + col) as usize]
        }
    };

    for (i, sample) in field.samples_mut().iter_mut().enumerate() {
        let col = (i % width as usize) as i64;
        let row = (i / width as usize) as i64;
        let sum = face_at(col - 1, row - 1)
            + face_at(col, row - 1)
            + face_at(col - 1, row)
            + face_at(col, row);
        sample.normal = sum.normalize_or_zero();
    }
    Ok(())
}
