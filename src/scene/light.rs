use glam::Vec3;

/// The sun: a single positional light, constant within a frame but free to
/// move between frames.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
}

impl Light {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }
}
