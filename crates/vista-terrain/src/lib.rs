//! Height-map terrain: bitmap/RAW decoding, smooth normals, a flat
//! non-indexed triangle mesh, and its partition into fixed-size culling cells.
//!
//! Construction is a one-way pipeline. Each stage consumes the previous
//! stage's buffer, so nothing built earlier survives by accident:
//!
//! [`HeightField`] → [`synthesize_normals`] → [`build_mesh`] → [`partition_cells`]
//!
//! [`Terrain`] drives the whole pipeline and answers height queries.

mod cell;
mod error;
mod heightfield;
mod mesh;
mod normals;
mod terrain;

pub use cell::{CELL_LINE_COLOR, CellLineBox, LineVertex, TerrainCell, cell_grid_dims, partition_cells};
pub use error::TerrainError;
pub use heightfield::{HeightField, HeightSample, validate_dimensions};
pub use mesh::{
    TERRAIN_VERTEX_ATTRIBUTES, TerrainMesh, TerrainVertex, VertexAttribute, build_mesh,
    mesh_vertex_count,
};
pub use normals::{face_normals, synthesize_normals};
pub use terrain::Terrain;
