use glam::{Mat4, Vec3};

use crate::scene::InputState;
use winit::keyboard::KeyCode;

/// Free-flying camera, moved by polling key state once per frame.
///
/// Orientation is Euler angles in degrees. The view matrix is built the
/// classic way: rotate by pitch and yaw, then translate by the negated
/// position.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Movement speed in world units per second.
    pub const SPEED: f32 = 20.0;

    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_z(self.roll.to_radians())
            * Mat4::from_rotation_x(self.pitch.to_radians())
            * Mat4::from_rotation_y(self.yaw.to_radians())
            * Mat4::from_translation(-self.position)
    }

    pub fn proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians, aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.proj(aspect) * self.view()
    }

    /// Poll the key state and move: W/S along -Z/+Z, A/D along X, Q/E down
    /// and up. Deltas scale with the frame time.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        let step = Self::SPEED * dt;
        if input.is_down(KeyCode::KeyW) {
            self.position.z -= step;
        }
        if input.is_down(KeyCode::KeyS) {
            self.position.z += step;
        }
        if input.is_down(KeyCode::KeyD) {
            self.position.x += step;
        }
        if input.is_down(KeyCode::KeyA) {
            self.position.x -= step;
        }
        if input.is_down(KeyCode::KeyE) {
            self.position.y += step;
        }
        if input.is_down(KeyCode::KeyQ) {
            self.position.y -= step;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 0.0),
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            fov_y_radians: 70f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_proj_is_invertible() {
        let cam = Camera::default();
        let vp = cam.view_proj(16.0 / 9.0);
        let id = vp * vp.inverse();
        assert!(id.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn unrotated_view_is_a_pure_translation() {
        let cam = Camera {
            position: Vec3::new(3.0, 5.0, -2.0),
            ..Camera::default()
        };
        let expected = Mat4::from_translation(-cam.position);
        assert!(cam.view().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn yaw_rotates_the_world_around_the_eye() {
        let cam = Camera {
            position: Vec3::ZERO,
            yaw: 90.0,
            ..Camera::default()
        };
        // With the camera yawed 90 degrees, a point on -X ends up straight
        // ahead (on -Z in view space).
        let p = cam.view().transform_point3(Vec3::new(-1.0, 0.0, 0.0));
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn keys_move_the_camera() {
        let mut input = InputState::default();
        input.press(KeyCode::KeyW);
        input.press(KeyCode::KeyD);

        let mut cam = Camera {
            position: Vec3::ZERO,
            ..Camera::default()
        };
        cam.update(&input, 0.5);

        assert_eq!(cam.position.z, -Camera::SPEED * 0.5);
        assert_eq!(cam.position.x, Camera::SPEED * 0.5);
        assert_eq!(cam.position.y, 0.0);
    }

    #[test]
    fn no_keys_means_no_motion() {
        let input = InputState::default();
        let mut cam = Camera::default();
        let before = cam.position;
        cam.update(&input, 1.0);
        assert_eq!(cam.position, before);
    }
}
