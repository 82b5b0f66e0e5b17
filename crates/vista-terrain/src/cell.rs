//! Fixed-size terrain cells cut from the flat mesh.
//!
//! Cells are the unit of visibility culling. Each one owns a copy of its
//! slice of the mesh, an axis-aligned bounding box over those vertices and a
//! wireframe box for debug drawing.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use vista_math::Aabb;

use crate::error::{TerrainError, try_alloc};
use crate::mesh::{TerrainMesh, TerrainVertex};

/// Tint of the debug bounding-box lines.
pub const CELL_LINE_COLOR: [f32; 3] = [1.0, 0.5, 0.0];

/// Corner index pairs of the 12 box edges, bottom ring, top ring, uprights.
const EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// A position + color vertex for line-list drawing.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Wireframe of a cell's bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellLineBox {
    pub corners: [Vec3; 8],
}

impl CellLineBox {
    pub fn from_bounds(bounds: &Aabb) -> Self {
        Self {
            corners: bounds.corners(),
        }
    }

    /// The 12 edges as pairs of indices into [`Self::corners`].
    pub fn edges(&self) -> &'static [[usize; 2]; 12] {
        &EDGES
    }

    /// Two vertices per edge, ready for a line-list draw.
    pub fn line_vertices(&self) -> [LineVertex; 24] {
        let mut out = [LineVertex::default(); 24];
        for (pair, [a, b]) in out.chunks_exact_mut(2).zip(EDGES) {
            pair[0] = LineVertex {
                position: self.corners[a].to_array(),
                color: CELL_LINE_COLOR,
            };
            pair[1] = LineVertex {
                position: self.corners[b].to_array(),
                color: CELL_LINE_COLOR,
            };
        }
        out
    }
}

/// One rectangular partition of the terrain.
#[derive(Clone, Debug)]
pub struct TerrainCell {
    /// Cell grid coordinate `(cx, cz)`.
    pub coord: (u32, u32),
    pub name: String,
    pub vertices: Vec<TerrainVertex>,
    /// Local identity indices, `0..vertices.len()`.
    pub indices: Vec<u32>,
    pub bounds: Aabb,
    pub center: Vec3,
    pub line_box: CellLineBox,
}

impl TerrainCell {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Raw vertex bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

fn validate_cell_size(width: u32, height: u32, cell_size: u32) -> Result<(), TerrainError> {
    if cell_size <= 1 {
        return Err(TerrainError::Config(format!(
            "cell size must be greater than 1, got {cell_size}"
        )));
    }
    if cell_size > width || cell_size > height {
        return Err(TerrainError::Config(format!(
            "cell size {cell_size} exceeds the {width}x{height} terrain"
        )));
    }
    Ok(())
}

/// Number of cells along X and Z for a `width × height` grid.
///
/// Neighbouring cells share their boundary samples, so each cell spans
/// `cell_size - 1` quads. A trailing partial span gets its own cell.
pub fn cell_grid_dims(width: u32, height: u32, cell_size: u32) -> Result<(u32, u32), TerrainError> {
    validate_cell_size(width, height, cell_size)?;
    let span = cell_size - 1;
    Ok(((width - 1).div_ceil(span), (height - 1).div_ceil(span)))
}

/// Split the flat mesh into cells, row-major by `(cz, cx)`.
///
/// Consumes the mesh; only the per-cell copies remain afterwards.
pub fn partition_cells(mesh: TerrainMesh, cell_size: u32) -> Result<Vec<TerrainCell>, TerrainError> {
    let (cells_x, cells_z) = cell_grid_dims(mesh.width, mesh.height, cell_size)?;
    let span = cell_size - 1;
    let quads_x = mesh.width - 1;
    let quads_z = mesh.height - 1;

    let mut cells = try_alloc(cells_x as usize * cells_z as usize, "terrain cells")?;
    for cz in 0..cells_z {
        let z0 = cz * span;
        let z1 = (z0 + span).min(quads_z);
        for cx in 0..cells_x {
            let x0 = cx * span;
            let x1 = (x0 + span).min(quads_x);
            let count = (z1 - z0) as usize * (x1 - x0) as usize * 6;

            let mut vertices = try_alloc(count, "cell vertices")?;
            for row in z0..z1 {
                let start = (row * quads_x + x0) as usize * 6;
                let end = (row * quads_x + x1) as usize * 6;
                vertices.extend_from_slice(&mesh.vertices[start..end]);
            }

            let mut indices = try_alloc(count, "cell indices")?;
            indices.extend(0..count as u32);

            let bounds = Aabb::from_points(vertices.iter().map(|v| Vec3::from(v.position)))
                .ok_or_else(|| TerrainError::Config(format!("cell ({cx}, {cz}) is empty")))?;

            cells.push(TerrainCell {
                coord: (cx, cz),
                name: format!("terrain_cell_{cx}_{cz}"),
                vertices,
                indices,
                bounds,
                center: bounds.center(),
                line_box: CellLineBox::from_bounds(&bounds),
            });
        }
    }

    log::debug!(
        "Partitioned {}x{} mesh into {cells_x}x{cells_z} cells of {cell_size} samples",
        mesh.width,
        mesh.height
    );
    Ok(cells)
}
