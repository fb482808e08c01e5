use tracing::debug;

use crate::config::IndexingConfig;
use crate::error::Result;
use crate::types::{IndexWidth, IndexedMesh, TbnVertex, TriangleSoup};

use super::indexer::index_corners;
use super::policy::{DEFAULT_TOLERANCE, NearMatch};

/// Indexer for tangent-space soups.
///
/// Identity is decided by [`NearMatch`] over position/uv/normal only. Each
/// matched corner adds its tangent and bitangent to the emitted vertex; the
/// sums are left unnormalized (see [`IndexedMesh::normalize_tangents`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TbnIndexer {
    pub tolerance: f32,
    pub index_width: IndexWidth,
}

impl Default for TbnIndexer {
    fn default() -> Self {
        Self::new(IndexWidth::default())
    }
}

impl TbnIndexer {
    pub fn new(index_width: IndexWidth) -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            index_width,
        }
    }

    pub fn from_config(config: &IndexingConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            index_width: config.index_width,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn index(&self, soup: &TriangleSoup<TbnVertex>) -> Result<IndexedMesh<TbnVertex>> {
        let mesh = index_corners(
            soup.corners(),
            &mut NearMatch::new(self.tolerance),
            self.index_width,
            |emitted, corner| {
                emitted.tangent += corner.tangent;
                emitted.bitangent += corner.bitangent;
            },
        )?;

        debug!(
            corners = soup.len(),
            unique = mesh.vertex_count(),
            width = %self.index_width,
            "Indexed tangent-space soup"
        );

        Ok(mesh)
    }
}
