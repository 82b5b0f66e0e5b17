//! View frustum extraction and visibility tests.
//!
//! Planes are pulled straight out of the combined view-projection matrix
//! (Gribb/Hartmann). Each is stored as `Vec4(a, b, c, d)` with `(a, b, c)` a
//! unit normal pointing into the frustum, so `dot(n, p) + d` is the signed
//! distance of `p` from the plane. A volume is culled as soon as it lies
//! entirely on the negative side of any single plane.

use glam::{Mat4, Vec3, Vec4};
use vista_math::Aabb;

/// Plane indices into the frustum planes array.
const NEAR: usize = 0;
const FAR: usize = 1;
const LEFT: usize = 2;
const RIGHT: usize = 3;
const TOP: usize = 4;
const BOTTOM: usize = 5;

/// Six inward-facing planes: near, far, left, right, top, bottom.
#[derive(Clone, Debug)]
pub struct Frustum {
    planes: [Vec4; 6],
    degenerate: bool,
}

impl Default for Frustum {
    /// A degenerate frustum that culls everything until first extraction.
    fn default() -> Self {
        Self {
            planes: [Vec4::ZERO; 6],
            degenerate: true,
        }
    }
}

impl Frustum {
    /// Build a frustum from the camera's projection and view matrices.
    ///
    /// `screen_depth` replaces the projection's far distance, so culling
    /// can reach a different distance than the depth buffer does.
    pub fn extract(projection: &Mat4, view: &Mat4, screen_depth: f32) -> Self {
        let mut frustum = Self::default();
        frustum.update(projection, view, screen_depth);
        frustum
    }

    /// Re-extract in place. Called once per frame.
    pub fn update(&mut self, projection: &Mat4, view: &Mat4, screen_depth: f32) {
        let mut proj = *projection;

        // Rebuild the depth mapping so the far plane lands at `screen_depth`
        // while the near distance implied by the projection is kept.
        let z_min = -proj.w_axis.z / proj.z_axis.z;
        let r = screen_depth / (screen_depth - z_min);
        proj.z_axis.z = r;
        proj.w_axis.z = -r * z_min;

        let m = proj * *view;
        let rows = [m.row(0), m.row(1), m.row(2), m.row(3)];

        self.planes[NEAR] = rows[3] + rows[2];
        self.planes[FAR] = rows[3] - rows[2];
        self.planes[LEFT] = rows[3] + rows[0];
        self.planes[RIGHT] = rows[3] - rows[0];
        self.planes[TOP] = rows[3] - rows[1];
        self.planes[BOTTOM] = rows[3] + rows[1];

        self.degenerate = false;
        for plane in &mut self.planes {
            let len = plane.truncate().length();
            let usable = len > 0.0 && len.is_finite();
            if usable {
                *plane /= len;
            }
            if !usable || !plane.is_finite() {
                self.degenerate = true;
            }
        }
    }

    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    /// True when any plane has a zero or non-finite normal, typically from a
    /// collapsed projection. Every test then reports "culled".
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    #[inline]
    fn distance(plane: &Vec4, p: Vec3) -> f32 {
        plane.truncate().dot(p) + plane.w
    }

    pub fn check_point(&self, p: Vec3) -> bool {
        !self.degenerate && self.planes.iter().all(|plane| Self::distance(plane, p) >= 0.0)
    }

    /// Sphere test; the sphere survives while its centre is within `radius`
    /// behind every plane.
    pub fn check_sphere(&self, center: Vec3, radius: f32) -> bool {
        !self.degenerate
            && self
                .planes
                .iter()
                .all(|plane| Self::distance(plane, center) >= -radius)
    }

    /// Axis-aligned cube with the given half-size.
    pub fn check_cube(&self, center: Vec3, half_size: f32) -> bool {
        self.check_box(center, Vec3::splat(half_size))
    }

    /// Axis-aligned box from its centre and half-extents.
    pub fn check_box(&self, center: Vec3, half_extents: Vec3) -> bool {
        self.check_aabb(&Aabb::from_center_half_extents(center, half_extents))
    }

    /// Conservative box test: culled only if all eight corners sit behind
    /// one plane. Boxes straddling a frustum corner may pass.
    pub fn check_aabb(&self, aabb: &Aabb) -> bool {
        if self.degenerate {
            return false;
        }
        let corners = aabb.corners();
        self.planes.iter().all(|plane| {
            corners
                .iter()
                .any(|&corner| Self::distance(plane, corner) >= 0.0)
        })
    }
}
