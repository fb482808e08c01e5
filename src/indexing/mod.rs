pub mod indexer;
pub mod policy;
pub mod tangents;
pub mod tbn;

pub use indexer::VertexIndexer;
pub use policy::{DEFAULT_TOLERANCE, ExactMatch, NearMatch, Policy, VertexKey, VertexLookup};
pub use tangents::compute_tangent_basis;
pub use tbn::TbnIndexer;
