//! Triangle-list terrain mesh and its interleaved vertex format.
//!
//! ## Vertex Packing
//!
//! | Location | Offset | Components | Field    |
//! |----------|--------|------------|----------|
//! | 0        | 0      | 3 × f32    | position |
//! | 1        | 12     | 2 × f32    | uv       |
//! | 2        | 20     | 3 × f32    | normal   |
//! | 3        | 32     | 3 × f32    | color    |

use std::mem;

use bytemuck::{Pod, Zeroable};

use crate::error::{TerrainError, try_alloc};
use crate::heightfield::{HeightField, HeightSample, validate_dimensions};
use crate::normals::synthesize_normals;

/// One interleaved terrain vertex, ready to be uploaded as-is.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// Location, byte offset and float count of one vertex attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub offset: usize,
    pub components: usize,
}

/// Attribute table covering every byte of [`TerrainVertex`].
pub const TERRAIN_VERTEX_ATTRIBUTES: [VertexAttribute; 4] = [
    VertexAttribute {
        location: 0,
        offset: mem::offset_of!(TerrainVertex, position),
        components: 3,
    },
    VertexAttribute {
        location: 1,
        offset: mem::offset_of!(TerrainVertex, uv),
        components: 2,
    },
    VertexAttribute {
        location: 2,
        offset: mem::offset_of!(TerrainVertex, normal),
        components: 3,
    },
    VertexAttribute {
        location: 3,
        offset: mem::offset_of!(TerrainVertex, color),
        components: 3,
    },
];

const _: () = assert!(mem::size_of::<TerrainVertex>() == 44);
const _: () = assert!(TERRAIN_VERTEX_ATTRIBUTES[0].offset == 0);
const _: () = assert!(TERRAIN_VERTEX_ATTRIBUTES[1].offset == 12);
const _: () = assert!(TERRAIN_VERTEX_ATTRIBUTES[2].offset == 20);
const _: () = assert!(TERRAIN_VERTEX_ATTRIBUTES[3].offset == 32);
const _: () = assert!(
    TERRAIN_VERTEX_ATTRIBUTES[3].offset + 3 * mem::size_of::<f32>()
        == mem::size_of::<TerrainVertex>(),
    "last attribute must end at the vertex stride"
);

impl TerrainVertex {
    fn from_sample(sample: &HeightSample, uv: [f32; 2]) -> Self {
        Self {
            position: sample.position.to_array(),
            uv,
            normal: sample.normal.to_array(),
            color: sample.color.to_array(),
        }
    }
}

/// Number of vertices in the triangle list for a `width × height` grid.
///
/// Six per quad, two triangles without sharing.
pub fn mesh_vertex_count(width: u32, height: u32) -> Result<u32, TerrainError> {
    let quads = u64::from(width.saturating_sub(1)) * u64::from(height.saturating_sub(1));
    quads
        .checked_mul(6)
        .and_then(|count| u32::try_from(count).ok())
        .ok_or_else(|| {
            TerrainError::Config(format!(
                "{width}x{height} terrain exceeds the 32-bit vertex index range"
            ))
        })
}

/// The full-resolution terrain as a flat triangle list.
///
/// Quads are stored row-major, six vertices each, so quad `(row, col)`
/// starts at vertex `(row * (width - 1) + col) * 6`.
#[derive(Clone, Debug)]
pub struct TerrainMesh {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) vertices: Vec<TerrainVertex>,
    pub(crate) indices: Vec<u32>,
}

impl TerrainMesh {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

/// Turn a height field into a triangle list, computing normals first.
///
/// Each quad emits upper-left, upper-right, lower-left, then lower-left,
/// upper-right, lower-right. Indices are the identity sequence.
pub fn build_mesh(mut field: HeightField) -> Result<TerrainMesh, TerrainError> {
    let (width, height) = (field.width(), field.height());
    validate_dimensions(width, height)?;
    let count = mesh_vertex_count(width, height)?;

    synthesize_normals(&mut field)?;

    let mut vertices = try_alloc(count as usize, "terrain vertices")?;
    for row in 0..height - 1 {
        for col in 0..width - 1 {
            let ul = TerrainVertex::from_sample(field.sample(col, row), [0.0, 0.0]);
            let ur = TerrainVertex::from_sample(field.sample(col + 1, row), [1.0, 0.0]);
            let bl = TerrainVertex::from_sample(field.sample(col, row + 1), [0.0, 1.0]);
            let br = TerrainVertex::from_sample(field.sample(col + 1, row + 1), [1.0, 1.0]);
            vertices.extend_from_slice(&[ul, ur, bl, bl, ur, br]);
        }
    }

    let mut indices = try_alloc(count as usize, "terrain indices")?;
    indices.extend(0..count);

    log::debug!("Built {width}x{height} terrain mesh with {count} vertices");
    Ok(TerrainMesh {
        width,
        height,
        vertices,
        indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: u32, height: u32) -> HeightField {
        let raw: Vec<f32> = (0..width * height).map(|i| i as f32).collect();
        HeightField::from_raw_heights(width, height, &raw, 1.0).unwrap()
    }

    #[test]
    fn test_vertex_count() {
        assert_eq!(mesh_vertex_count(3, 3).unwrap(), 24);
        assert_eq!(mesh_vertex_count(129, 129).unwrap(), 128 * 128 * 6);
        assert!(mesh_vertex_count(u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn test_mesh_sizes_and_identity_indices() {
        let mesh = build_mesh(ramp(5, 3)).unwrap();
        assert_eq!(mesh.vertices().len(), 4 * 2 * 6);
        assert_eq!(mesh.indices().len(), mesh.vertices().len());
        for (i, &idx) in mesh.indices().iter().enumerate() {
            assert_eq!(idx as usize, i);
        }
    }

    #[test]
    fn test_quad_winding_and_uvs() {
        let field = ramp(3, 3);
        let ul = field.sample(0, 0).position.to_array();
        let ur = field.sample(1, 0).position.to_array();
        let bl = field.sample(0, 1).position.to_array();
        let br = field.sample(1, 1).position.to_array();

        let mesh = build_mesh(field).unwrap();
        let quad = &mesh.vertices()[..6];
        let positions: Vec<_> = quad.iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![ul, ur, bl, bl, ur, br]);

        let uvs: Vec<_> = quad.iter().map(|v| v.uv).collect();
        assert_eq!(
            uvs,
            vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]
        );
    }

    #[test]
    fn test_second_row_offset() {
        let field = ramp(5, 5);
        let expected = field.sample(0, 1).position.to_array();
        let mesh = build_mesh(field).unwrap();
        // Quad (row 1, col 0) starts after one row of four quads.
        assert_eq!(mesh.vertices()[4 * 6].position, expected);
    }

    #[test]
    fn test_vertices_are_pod_bytes() {
        let mesh = build_mesh(ramp(3, 3)).unwrap();
        let bytes: &[u8] = bytemuck::cast_slice(mesh.vertices());
        assert_eq!(bytes.len(), 24 * 44);
    }

    #[test]
    fn test_flat_mesh_normals_up() {
        let field = HeightField::from_raw_heights(3, 3, &[4.0; 9], 2.0).unwrap();
        let mesh = build_mesh(field).unwrap();
        for v in mesh.vertices() {
            assert!((glam::Vec3::from(v.normal) - glam::Vec3::Y).length() < 1e-6);
            assert_eq!(v.position[1], 2.0);
        }
    }
}
