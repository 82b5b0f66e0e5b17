//! f32 geometric primitives shared by terrain construction and visibility culling.

mod aabb;
mod triangle;

pub use aabb::Aabb;
pub use triangle::{EDGE_TOLERANCE, triangle_height_at};
