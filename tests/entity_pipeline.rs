//! CPU mirror of the transform and lighting chain in `shaders/entity.wgsl`,
//! run against the same matrices the renderer uploads.

use glam::{Mat4, Vec2, Vec3, Vec4};

use wgpu_terra::asset::Handle;
use wgpu_terra::renderer::TexturedModel;
use wgpu_terra::scene::{Camera, Entity};

const EPSILON: f32 = 1e-4;
const AMBIENT_FLOOR: f32 = 0.2;

#[derive(Clone, Copy)]
struct VertexInput {
    pos: Vec3,
    normal: Vec3,
    uv: Vec2,
}

#[derive(Clone, Copy, Debug)]
struct VertexOutput {
    clip_position: Vec4,
    world_normal: Vec3,
    to_light: Vec3,
    to_camera: Vec3,
}

fn run_vertex_shader(
    input: VertexInput,
    model: Mat4,
    view_proj: Mat4,
    camera_pos: Vec3,
    light_pos: Vec3,
) -> VertexOutput {
    let world_position4 = model * input.pos.extend(1.0);
    let world_position = world_position4.truncate();

    let _ = input.uv;

    VertexOutput {
        clip_position: view_proj * world_position4,
        world_normal: (model * input.normal.extend(0.0)).truncate(),
        to_light: light_pos - world_position,
        to_camera: camera_pos - world_position,
    }
}

fn run_lighting(
    out: VertexOutput,
    sun_color: Vec3,
    shine_damper: f32,
    reflectivity: f32,
) -> (Vec3, Vec3) {
    let unit_normal = out.world_normal.normalize();
    let unit_light = out.to_light.normalize();

    let brightness = unit_normal.dot(unit_light).max(AMBIENT_FLOOR);
    let diffuse = brightness * sun_color;

    let unit_camera = out.to_camera.normalize();
    let reflected = reflect(-unit_light, unit_normal);
    let specular_factor = reflected.dot(unit_camera).max(0.0).powf(shine_damper);
    let specular = specular_factor * reflectivity * sun_color;

    (diffuse, specular)
}

fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

fn test_model() -> TexturedModel {
    TexturedModel::new(Handle::new(0), Handle::new(0))
}

#[test]
fn entity_in_front_of_the_camera_lands_inside_the_frustum() {
    let camera = Camera {
        position: Vec3::new(0.0, 5.0, 0.0),
        ..Camera::default()
    };
    let view_proj = camera.view_proj(16.0 / 9.0);

    let entity = Entity::new(test_model(), Vec3::new(0.0, 0.0, -25.0), Vec3::ZERO, 1.0);
    let input = VertexInput {
        pos: Vec3::ZERO,
        normal: Vec3::Y,
        uv: Vec2::ZERO,
    };

    let out = run_vertex_shader(
        input,
        entity.transform_matrix(),
        view_proj,
        camera.position,
        Vec3::new(200.0, 200.0, 100.0),
    );

    assert!(out.clip_position.w > 0.0);
    let ndc = out.clip_position.truncate() / out.clip_position.w;
    assert!(ndc.x.abs() <= 1.0 + EPSILON);
    assert!(ndc.y.abs() <= 1.0 + EPSILON);
    assert!(ndc.z >= -EPSILON && ndc.z <= 1.0 + EPSILON);
}

#[test]
fn rotation_carries_the_normal_along() {
    let entity = Entity::new(test_model(), Vec3::ZERO, Vec3::new(0.0, 90.0, 0.0), 1.0);
    let input = VertexInput {
        pos: Vec3::ZERO,
        normal: Vec3::X,
        uv: Vec2::ZERO,
    };

    let out = run_vertex_shader(
        input,
        entity.transform_matrix(),
        Mat4::IDENTITY,
        Vec3::ZERO,
        Vec3::ZERO,
    );

    assert!(out.world_normal.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
}

#[test]
fn surface_facing_the_sun_reaches_full_brightness() {
    let out = VertexOutput {
        clip_position: Vec4::ZERO,
        world_normal: Vec3::Y,
        to_light: Vec3::new(0.0, 10.0, 0.0),
        to_camera: Vec3::new(0.0, 5.0, 5.0),
    };

    let (diffuse, _) = run_lighting(out, Vec3::ONE, 1.0, 0.0);
    assert!(diffuse.abs_diff_eq(Vec3::ONE, EPSILON));
}

#[test]
fn surface_facing_away_clamps_to_the_ambient_floor() {
    let out = VertexOutput {
        clip_position: Vec4::ZERO,
        world_normal: Vec3::NEG_Y,
        to_light: Vec3::new(0.0, 10.0, 0.0),
        to_camera: Vec3::new(0.0, 5.0, 5.0),
    };

    let (diffuse, _) = run_lighting(out, Vec3::ONE, 1.0, 0.0);
    assert!(diffuse.abs_diff_eq(Vec3::splat(AMBIENT_FLOOR), EPSILON));
}

#[test]
fn matte_materials_have_no_specular_term() {
    let out = VertexOutput {
        clip_position: Vec4::ZERO,
        world_normal: Vec3::Y,
        to_light: Vec3::new(3.0, 10.0, -2.0),
        to_camera: Vec3::new(-3.0, 10.0, 2.0),
    };

    // Default material constants: shine damper 1, reflectivity 0.
    let (_, specular) = run_lighting(out, Vec3::ONE, 1.0, 0.0);
    assert!(specular.abs_diff_eq(Vec3::ZERO, EPSILON));
}

#[test]
fn specular_peaks_on_the_mirror_direction() {
    // Light comes straight down; the camera sits on the exact reflection
    // path (straight up), so the highlight is maximal there.
    let aligned = VertexOutput {
        clip_position: Vec4::ZERO,
        world_normal: Vec3::Y,
        to_light: Vec3::new(0.0, 10.0, 0.0),
        to_camera: Vec3::new(0.0, 8.0, 0.0),
    };
    let off_axis = VertexOutput {
        to_camera: Vec3::new(8.0, 2.0, 0.0),
        ..aligned
    };

    let (_, peak) = run_lighting(aligned, Vec3::ONE, 10.0, 1.0);
    let (_, off) = run_lighting(off_axis, Vec3::ONE, 10.0, 1.0);

    assert!(peak.abs_diff_eq(Vec3::ONE, EPSILON));
    assert!(off.x < peak.x);
}

#[test]
fn higher_shine_damper_tightens_the_highlight() {
    let out = VertexOutput {
        clip_position: Vec4::ZERO,
        world_normal: Vec3::Y,
        to_light: Vec3::new(0.0, 10.0, 0.0),
        to_camera: Vec3::new(4.0, 8.0, 0.0),
    };

    let (_, soft) = run_lighting(out, Vec3::ONE, 1.0, 1.0);
    let (_, tight) = run_lighting(out, Vec3::ONE, 20.0, 1.0);

    assert!(tight.x < soft.x);
}
