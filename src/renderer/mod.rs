pub mod batch;
pub(crate) mod buffers;
pub(crate) mod context;
pub mod depth;
pub mod material;
pub mod pipeline_builder;
pub mod plan;
#[allow(clippy::module_inception)]
pub mod renderer;
pub mod shader;
pub mod texture;
pub mod uniforms;
pub mod vertex;

pub use batch::{EntityData, RenderBatcher};
pub use depth::Depth;
pub use material::{Material, TexturedModel};
pub use plan::FramePlan;
pub use renderer::Renderer;
pub use shader::ShaderDesc;
pub use texture::Texture;
pub use uniforms::{CameraUniform, EntityUniform, LightUniform, MaterialUniform};
pub use vertex::Vertex;
