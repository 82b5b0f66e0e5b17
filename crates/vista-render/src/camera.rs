//! Camera producing left-handed view and `[0, 1]`-depth projection matrices.

use glam::{Mat4, Quat, Vec3};

/// A free-flying perspective camera. Looks down `+Z` at identity rotation.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip distance (positive).
    pub near: f32,
    /// Far clip distance, the screen depth (> near).
    pub far: f32,
}

impl Camera {
    /// Build a camera from configured clip settings. The aspect ratio keeps
    /// its default until [`Camera::set_aspect_ratio`] is called.
    pub fn new(fov_y_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y: fov_y_degrees.to_radians(),
            near,
            far,
            ..Self::default()
        }
    }

    /// Point the camera using yaw (about +Y) and pitch (positive looks up),
    /// both in radians.
    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        self.rotation = Quat::from_rotation_y(yaw) * Quat::from_rotation_x(-pitch);
    }

    /// Turn the camera to face `target`. No-op if `target` is the position.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        let yaw = dir.x.atan2(dir.z);
        let pitch = dir.y.clamp(-1.0, 1.0).asin();
        self.set_yaw_pitch(yaw, pitch);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_lh(self.position, self.forward(), self.up())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov_y, self.aspect_ratio, self.near, self.far)
    }

    /// Combined `projection * view`.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = width / height;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: std::f32::consts::FRAC_PI_4,
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}
