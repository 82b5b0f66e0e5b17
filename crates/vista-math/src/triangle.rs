//! Vertical height solve against a single triangle.

use glam::Vec3;

/// How far outside an edge a point may sit and still count as inside.
pub const EDGE_TOLERANCE: f32 = 0.001;

/// Triangles whose normal has a smaller vertical component than this are
/// treated as vertical walls and never yield a height.
const MIN_NORMAL_Y: f32 = 1e-4;

/// Height of the triangle `(v0, v1, v2)` directly above or below `(x, z)`.
///
/// Casts a vertical line through `(x, z)`, intersects it with the
/// triangle's plane and keeps the hit only if it lies within all three
/// edges. Works for either winding.
pub fn triangle_height_at(v0: Vec3, v1: Vec3, v2: Vec3, x: f32, z: f32) -> Option<f32> {
    let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
    if normal.y.abs() < MIN_NORMAL_Y {
        return None;
    }

    // Plane: normal . p + d = 0
    let d = -normal.dot(v0);
    let y = -(normal.x * x + normal.z * z + d) / normal.y;
    let hit = Vec3::new(x, y, z);

    let inside = [(v0, v1), (v1, v2), (v2, v0)].iter().all(|&(a, b)| {
        let edge_normal = (b - a).cross(normal);
        edge_normal.dot(hit - a) <= EDGE_TOLERANCE
    });

    inside.then_some(y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_triangle_returns_its_height() {
        let v0 = Vec3::new(0.0, 2.0, 1.0);
        let v1 = Vec3::new(1.0, 2.0, 1.0);
        let v2 = Vec3::new(0.0, 2.0, 0.0);
        let h = triangle_height_at(v0, v1, v2, 0.25, 0.5).unwrap();
        assert!((h - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_sloped_triangle_interpolates() {
        // y = 3x
        let v0 = Vec3::new(0.0, 0.0, 1.0);
        let v1 = Vec3::new(1.0, 3.0, 1.0);
        let v2 = Vec3::new(0.0, 0.0, 0.0);
        let h = triangle_height_at(v0, v1, v2, 0.5, 0.75).unwrap();
        assert!((h - 1.5).abs() < 1e-5, "got {h}");
    }

    #[test]
    fn test_point_outside_triangle_misses() {
        let v0 = Vec3::new(0.0, 0.0, 1.0);
        let v1 = Vec3::new(1.0, 0.0, 1.0);
        let v2 = Vec3::new(0.0, 0.0, 0.0);
        // Other half of the unit quad.
        assert!(triangle_height_at(v0, v1, v2, 0.9, 0.1).is_none());
        assert!(triangle_height_at(v0, v1, v2, 0.5, 1.5).is_none());
    }

    #[test]
    fn test_winding_does_not_matter() {
        let v0 = Vec3::new(0.0, 1.0, 0.0);
        let v1 = Vec3::new(1.0, 1.0, 1.0);
        let v2 = Vec3::new(1.0, 1.0, 0.0);
        assert!(triangle_height_at(v0, v1, v2, 0.75, 0.25).is_some());
        assert!(triangle_height_at(v0, v2, v1, 0.75, 0.25).is_some());
    }

    #[test]
    fn test_vertical_triangle_is_skipped() {
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(1.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 1.0, 0.0);
        assert!(triangle_height_at(v0, v1, v2, 0.2, 0.0).is_none());
    }
}
