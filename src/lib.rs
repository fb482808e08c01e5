pub mod config;
pub mod error;
pub mod indexing;
pub mod ingestion;
pub mod pipeline;
pub mod scene;
pub mod types;

pub use config::{IndexerConfig, IndexingConfig};
pub use error::{IndexerError, Result};
pub use indexing::{Policy, TbnIndexer, VertexIndexer};
pub use pipeline::Pipeline;
pub use types::{IndexWidth, IndexedMesh, TbnVertex, TriangleSoup, Vertex};
