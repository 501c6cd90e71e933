use glam::{Mat4, Vec3};

use crate::asset::{Handle, Mesh};
use crate::renderer::{Material, Vertex};

/// Side length of one terrain tile in world units.
pub const TILE_SIZE: f32 = 800.0;
/// Vertices along each edge of the tile grid.
pub const VERTEX_COUNT: usize = 128;

/// One flat ground tile, placed on the XZ grid.
///
/// Tiles share their grid mesh through a handle, so several tiles drawn
/// with the same material differ only in the transform uniform.
#[derive(Debug, Clone, Copy)]
pub struct Terrain {
    pub grid_x: i32,
    pub grid_z: i32,
    pub mesh: Handle<Mesh>,
    pub material: Handle<Material>,
}

impl Terrain {
    pub fn new(grid_x: i32, grid_z: i32, mesh: Handle<Mesh>, material: Handle<Material>) -> Self {
        Self {
            grid_x,
            grid_z,
            mesh,
            material,
        }
    }

    pub fn world_x(&self) -> f32 {
        self.grid_x as f32 * TILE_SIZE
    }

    pub fn world_z(&self) -> f32 {
        self.grid_z as f32 * TILE_SIZE
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.world_x(), 0.0, self.world_z()))
    }
}

/// Build the shared tile grid: `VERTEX_COUNT`² vertices at y = 0 with +Y
/// normals, UVs spanning [0, 1] across the tile, two triangles per cell.
pub fn grid_vertices() -> (Vec<Vertex>, Vec<u32>) {
    let n = VERTEX_COUNT;
    let mut vertices = Vec::with_capacity(n * n);

    for i in 0..n {
        for j in 0..n {
            let u = j as f32 / (n - 1) as f32;
            let v = i as f32 / (n - 1) as f32;
            vertices.push(Vertex {
                position: [u * TILE_SIZE, 0.0, v * TILE_SIZE],
                uv: [u, v],
                normal: [0.0, 1.0, 0.0],
            });
        }
    }

    let mut indices = Vec::with_capacity(6 * (n - 1) * (n - 1));
    for gz in 0..n - 1 {
        for gx in 0..n - 1 {
            let top_left = (gz * n + gx) as u32;
            let top_right = top_left + 1;
            let bottom_left = ((gz + 1) * n + gx) as u32;
            let bottom_right = bottom_left + 1;

            indices.extend_from_slice(&[top_left, bottom_left, top_right]);
            indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
        }
    }

    (vertices, indices)
}

pub fn generate_mesh(device: &wgpu::Device) -> Mesh {
    let (vertices, indices) = grid_vertices();
    Mesh::new(device, &vertices, Some(&indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_expected_vertex_and_index_counts() {
        let (vertices, indices) = grid_vertices();
        assert_eq!(vertices.len(), VERTEX_COUNT * VERTEX_COUNT);
        assert_eq!(indices.len(), 6 * (VERTEX_COUNT - 1) * (VERTEX_COUNT - 1));
    }

    #[test]
    fn grid_is_flat_with_up_normals() {
        let (vertices, _) = grid_vertices();
        assert!(vertices.iter().all(|v| v.position[1] == 0.0));
        assert!(vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn grid_uvs_and_positions_span_the_tile() {
        let (vertices, _) = grid_vertices();
        for v in &vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
            assert!((0.0..=TILE_SIZE).contains(&v.position[0]));
            assert!((0.0..=TILE_SIZE).contains(&v.position[2]));
        }
        let last = vertices.last().unwrap();
        assert_eq!(last.uv, [1.0, 1.0]);
        assert_eq!(last.position, [TILE_SIZE, 0.0, TILE_SIZE]);
    }

    #[test]
    fn indices_stay_in_bounds() {
        let (vertices, indices) = grid_vertices();
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn tiles_are_placed_on_the_grid() {
        let terrain = Terrain::new(
            -1,
            1,
            crate::asset::Handle::new(0),
            crate::asset::Handle::new(0),
        );
        assert_eq!(terrain.world_x(), -TILE_SIZE);
        assert_eq!(terrain.world_z(), TILE_SIZE);

        let origin = terrain.transform().transform_point3(glam::Vec3::ZERO);
        assert_eq!(origin, glam::Vec3::new(-TILE_SIZE, 0.0, TILE_SIZE));
    }
}
