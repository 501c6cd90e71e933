use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::asset::{Assets, Handle, Mesh};
use crate::renderer::uniforms::MaterialUniform;
use crate::renderer::Texture;

/// Surface description shared across entities: a texture plus the specular
/// response constants from the lighting model.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    pub texture: Handle<Texture>,
    pub shine_damper: f32,
    pub reflectivity: f32,
}

impl Material {
    /// A matte material: full shine damping, no reflectivity.
    pub fn new(texture: Handle<Texture>) -> Self {
        Self {
            texture,
            shine_damper: 1.0,
            reflectivity: 0.0,
        }
    }

    pub fn with_shine(mut self, shine_damper: f32, reflectivity: f32) -> Self {
        self.shine_damper = shine_damper;
        self.reflectivity = reflectivity;
        self
    }
}

/// The batching key: geometry paired with the material it is drawn with.
///
/// Equality is handle identity, not value equality. Two entities group
/// together exactly when they name the same mesh and material slots, so a
/// group shares all of its GPU state by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TexturedModel {
    pub mesh: Handle<Mesh>,
    pub material: Handle<Material>,
}

impl TexturedModel {
    pub fn new(mesh: Handle<Mesh>, material: Handle<Material>) -> Self {
        Self { mesh, material }
    }
}

/// Lazily built, cached bind groups for materials.
///
/// A material's bind group (texture view, sampler, specular constants) is
/// created the first time the material is drawn and reused afterwards, so a
/// group bind costs one `set_bind_group` on every frame after the first.
pub(crate) struct MaterialBinder {
    layout: wgpu::BindGroupLayout,
    cache: HashMap<Handle<Material>, wgpu::BindGroup>,
}

impl MaterialBinder {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("MaterialBindLayout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<MaterialUniform>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        Self {
            layout,
            cache: HashMap::new(),
        }
    }

    pub(crate) fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Fetch (or build) the bind group for a material handle. Returns `None`
    /// when the handle or its texture does not resolve, in which case the
    /// caller skips the draw.
    pub(crate) fn bind_group(
        &mut self,
        device: &wgpu::Device,
        assets: &Assets,
        handle: Handle<Material>,
    ) -> Option<&wgpu::BindGroup> {
        if !self.cache.contains_key(&handle) {
            let material = assets.materials.get(handle)?;
            let texture = assets.textures.get(material.texture)?;

            let uniform = MaterialUniform::new(material.shine_damper, material.reflectivity);
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("MaterialBuffer"),
                contents: bytemuck::bytes_of(&uniform),
                usage: wgpu::BufferUsages::UNIFORM,
            });

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("MaterialBindGroup"),
                layout: &self.layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&texture.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: buffer.as_entire_binding(),
                    },
                ],
            });

            self.cache.insert(handle, bind_group);
        }

        self.cache.get(&handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_defaults_are_matte() {
        let material = Material::new(Handle::new(0));
        assert_eq!(material.shine_damper, 1.0);
        assert_eq!(material.reflectivity, 0.0);
    }

    #[test]
    fn textured_model_equality_is_handle_based() {
        let a = TexturedModel::new(Handle::new(0), Handle::new(0));
        let b = TexturedModel::new(Handle::new(0), Handle::new(0));
        let c = TexturedModel::new(Handle::new(1), Handle::new(0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
