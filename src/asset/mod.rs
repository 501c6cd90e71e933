pub mod handle;
pub mod mesh;
pub mod obj;
pub mod registry;

pub use handle::Handle;
pub use mesh::Mesh;
pub use obj::load_obj;
pub use registry::AssetRegistry;

use crate::renderer::{Material, Texture};

/// Owner of every GPU asset the renderer can reference by handle.
///
/// There is exactly one `Assets` value per application; it is the sole
/// owner and sole mutator of the handle space. Dropping it releases every
/// buffer and texture it ever allocated.
pub struct Assets {
    pub meshes: AssetRegistry<Mesh>,
    pub textures: AssetRegistry<Texture>,
    pub materials: AssetRegistry<Material>,
}

impl Assets {
    pub fn new() -> Self {
        Self {
            meshes: AssetRegistry::new(),
            textures: AssetRegistry::new(),
            materials: AssetRegistry::new(),
        }
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self::new()
    }
}
