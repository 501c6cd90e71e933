use std::borrow::Cow;
use std::path::Path;

/// Declarative shader stage pair: a WGSL source with its entry points.
///
/// Replaces runtime uniform-name lookup with fixed binding indices agreed
/// between the WGSL and the bind group layouts; a missing binding is a
/// validation error at module/pipeline creation, which is fatal — shader
/// source is build-time content, not user input.
pub struct ShaderDesc {
    pub label: &'static str,
    pub wgsl: Cow<'static, str>,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
}

impl ShaderDesc {
    pub fn entity() -> Self {
        Self {
            label: "EntityShader",
            wgsl: Cow::Borrowed(include_str!("../shaders/entity.wgsl")),
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
        }
    }

    pub fn terrain() -> Self {
        Self {
            label: "TerrainShader",
            wgsl: Cow::Borrowed(include_str!("../shaders/terrain.wgsl")),
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
        }
    }

    /// Load a WGSL file from disk, for shaders supplied alongside assets.
    pub fn from_path(label: &'static str, path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let wgsl = crate::io::load_string(path.as_ref())?;
        Ok(Self {
            label,
            wgsl: Cow::Owned(wgsl),
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
        })
    }

    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(self.wgsl.as_ref())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_shaders_declare_their_entry_points() {
        for desc in [ShaderDesc::entity(), ShaderDesc::terrain()] {
            assert!(desc.wgsl.contains(desc.vertex_entry), "{}", desc.label);
            assert!(desc.wgsl.contains(desc.fragment_entry), "{}", desc.label);
        }
    }

    #[test]
    fn builtin_shaders_use_the_shared_bind_group_order() {
        // group 0 = frame globals, group 1 = per-draw transform,
        // group 2 = material. The pipeline layouts rely on this order.
        for desc in [ShaderDesc::entity(), ShaderDesc::terrain()] {
            for group in ["@group(0)", "@group(1)", "@group(2)"] {
                assert!(desc.wgsl.contains(group), "{} missing {}", desc.label, group);
            }
        }
    }
}
