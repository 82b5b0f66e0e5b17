//! Scripted camera orbit over the terrain.

use std::f32::consts::TAU;

use glam::Vec3;
use vista_render::Camera;
use vista_terrain::Terrain;

/// Height kept between the camera and the ground below it.
const CLEARANCE: f32 = 25.0;

/// A circular path around the terrain centre, one lap over `frames` frames.
#[derive(Clone, Debug)]
pub struct Orbit {
    center: Vec3,
    radius: f32,
    frames: u32,
}

impl Orbit {
    pub fn around(terrain: &Terrain, frames: u32) -> Self {
        let extent = terrain.width().max(terrain.height()) as f32;
        Self {
            center: terrain.center(),
            radius: extent * 0.35,
            frames: frames.max(1),
        }
    }

    /// Move `camera` to its pose for `frame`, staying above the ground.
    pub fn place(&self, camera: &mut Camera, terrain: &Terrain, frame: u32) {
        let angle = (frame % self.frames) as f32 / self.frames as f32 * TAU;
        let x = self.center.x + self.radius * angle.cos();
        let z = self.center.z + self.radius * angle.sin();
        let ground = terrain.height_at(x, z).unwrap_or(0.0);

        camera.position = Vec3::new(x, ground + CLEARANCE, z);
        camera.look_at(self.center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_terrain::HeightField;

    fn hill() -> Terrain {
        let size = 33u32;
        let raw: Vec<f32> = (0..size * size)
            .map(|i| {
                let (col, row) = ((i % size) as f32 - 16.0, (i / size) as f32 - 16.0);
                (200.0 - (col * col + row * row)).max(0.0)
            })
            .collect();
        let field = HeightField::from_raw_heights(size, size, &raw, 10.0).unwrap();
        Terrain::from_height_field(field, 17).unwrap()
    }

    #[test]
    fn test_camera_stays_above_ground() {
        let terrain = hill();
        let orbit = Orbit::around(&terrain, 24);
        let mut camera = Camera::default();
        for frame in 0..24 {
            orbit.place(&mut camera, &terrain, frame);
            let ground = terrain
                .height_at(camera.position.x, camera.position.z)
                .unwrap();
            assert!((camera.position.y - ground - CLEARANCE).abs() < 1e-4);
        }
    }

    #[test]
    fn test_camera_faces_center() {
        let terrain = hill();
        let orbit = Orbit::around(&terrain, 8);
        let mut camera = Camera::default();
        orbit.place(&mut camera, &terrain, 3);
        let to_center = (terrain.center() - camera.position).normalize();
        assert!((camera.forward() - to_center).length() < 1e-4);
    }

    #[test]
    fn test_lap_wraps() {
        let terrain = hill();
        let orbit = Orbit::around(&terrain, 10);
        let (mut a, mut b) = (Camera::default(), Camera::default());
        orbit.place(&mut a, &terrain, 2);
        orbit.place(&mut b, &terrain, 12);
        assert!((a.position - b.position).length() < 1e-4);
    }
}
