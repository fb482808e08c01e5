pub mod mesh;
pub mod soup;
pub mod texture;
pub mod vertex;

pub use mesh::{GpuTbnVertex, GpuVertex, IndexWidth, IndexedMesh};
pub use soup::TriangleSoup;
pub use texture::{ColorSpace, Texture, TextureVariants};
pub use vertex::{AsVertex, TbnVertex, Vertex};
