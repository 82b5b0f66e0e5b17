//! The assembled terrain: cells plus a height query.

use glam::Vec3;
use vista_config::TerrainConfig;
use vista_math::triangle_height_at;

use crate::cell::{TerrainCell, cell_grid_dims, partition_cells};
use crate::error::TerrainError;
use crate::heightfield::{HeightField, validate_dimensions};
use crate::mesh::build_mesh;

/// A fully built, read-only terrain.
///
/// Only the cells survive construction. The height grid and the flat mesh
/// are consumed along the way.
#[derive(Debug)]
pub struct Terrain {
    width: u32,
    height: u32,
    cell_size: u32,
    cells_x: u32,
    cells_z: u32,
    cells: Vec<TerrainCell>,
}

impl Terrain {
    /// Load the configured height and color maps and build every cell.
    pub fn build(config: &TerrainConfig) -> Result<Self, TerrainError> {
        validate_dimensions(config.width, config.height)?;
        cell_grid_dims(config.width, config.height, config.cell_size)?;

        log::info!(
            "Loading {}x{} terrain from {}",
            config.width,
            config.height,
            config.height_map.display()
        );
        let field = HeightField::load(config)?;
        Self::from_height_field(field, config.cell_size)
    }

    /// Build from an already decoded height field.
    pub fn from_height_field(field: HeightField, cell_size: u32) -> Result<Self, TerrainError> {
        let (width, height) = (field.width(), field.height());
        let (cells_x, cells_z) = cell_grid_dims(width, height, cell_size)?;

        let mesh = build_mesh(field)?;
        let vertex_count = mesh.vertices().len();
        let cells = partition_cells(mesh, cell_size)?;

        log::info!(
            "Terrain ready: {width}x{height} samples, {vertex_count} vertices, {} cells",
            cells.len()
        );
        Ok(Self {
            width,
            height,
            cell_size,
            cells_x,
            cells_z,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Cell grid dimensions `(cells_x, cells_z)`.
    pub fn cell_dims(&self) -> (u32, u32) {
        (self.cells_x, self.cells_z)
    }

    /// All cells, row-major by `(cz, cx)`.
    pub fn cells(&self) -> &[TerrainCell] {
        &self.cells
    }

    pub fn cell(&self, cx: u32, cz: u32) -> Option<&TerrainCell> {
        if cx >= self.cells_x || cz >= self.cells_z {
            return None;
        }
        self.cells.get((cz * self.cells_x + cx) as usize)
    }

    /// Total vertices across all cells.
    pub fn vertex_count(&self) -> u64 {
        self.cells.iter().map(|c| u64::from(c.vertex_count())).sum()
    }

    /// World-space centre of the terrain footprint at ground level.
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.width - 1) as f32 * 0.5,
            0.0,
            (self.height - 1) as f32 * 0.5,
        )
    }

    /// Terrain surface height at world `(x, z)`, or `None` off the terrain.
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        let cell = self.cells.iter().find(|c| c.bounds.contains_xz(x, z))?;
        cell.vertices.chunks_exact(3).find_map(|tri| {
            triangle_height_at(
                Vec3::from(tri[0].position),
                Vec3::from(tri[1].position),
                Vec3::from(tri[2].position),
                x,
                z,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sloped(width: u32, height: u32, slope: f32) -> HeightField {
        let raw: Vec<f32> = (0..height)
            .flat_map(|_| (0..width).map(move |col| col as f32 * slope))
            .collect();
        HeightField::from_raw_heights(width, height, &raw, 1.0).unwrap()
    }

    #[test]
    fn test_cell_lookup() {
        let terrain = Terrain::from_height_field(sloped(9, 9, 0.0), 5).unwrap();
        assert_eq!(terrain.cell_dims(), (2, 2));
        assert_eq!(terrain.cells().len(), 4);
        assert_eq!(terrain.cell(1, 0).unwrap().coord, (1, 0));
        assert!(terrain.cell(2, 0).is_none());
        assert_eq!(terrain.vertex_count(), 8 * 8 * 6);
    }

    #[test]
    fn test_invalid_cell_size_rejected() {
        let err = Terrain::from_height_field(sloped(9, 9, 0.0), 11).unwrap_err();
        assert!(matches!(err, TerrainError::Config(_)));
    }

    #[test]
    fn test_height_on_slope() {
        let terrain = Terrain::from_height_field(sloped(9, 9, 0.5), 5).unwrap();
        for (x, z) in [(0.25, 0.25), (3.7, 6.1), (8.0, 8.0), (4.0, 4.0), (0.0, 0.0)] {
            let y = terrain.height_at(x, z).unwrap();
            assert!((y - x * 0.5).abs() < 1e-4, "({x}, {z}) -> {y}");
        }
    }

    #[test]
    fn test_height_off_terrain() {
        let terrain = Terrain::from_height_field(sloped(5, 5, 0.0), 3).unwrap();
        assert!(terrain.height_at(-0.5, 2.0).is_none());
        assert!(terrain.height_at(2.0, 4.5).is_none());
    }

    #[test]
    fn test_height_inside_peak() {
        let mut raw = vec![0.0; 9];
        raw[4] = 4.0;
        let field = HeightField::from_raw_heights(3, 3, &raw, 1.0).unwrap();
        let terrain = Terrain::from_height_field(field, 3).unwrap();
        assert!((terrain.height_at(1.0, 1.0).unwrap() - 4.0).abs() < 1e-4);
        let halfway = terrain.height_at(0.5, 1.0).unwrap();
        assert!((halfway - 2.0).abs() < 1e-4, "got {halfway}");
    }
}
