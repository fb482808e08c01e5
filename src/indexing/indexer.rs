use tracing::debug;

use crate::config::IndexingConfig;
use crate::error::{IndexerError, Result};
use crate::types::{AsVertex, IndexWidth, IndexedMesh, TriangleSoup, Vertex};

use super::policy::{DEFAULT_TOLERANCE, ExactMatch, NearMatch, Policy, VertexLookup};

/// Converts a triangle soup into an indexed mesh under one equality policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexIndexer {
    pub policy: Policy,
    pub tolerance: f32,
    pub index_width: IndexWidth,
}

impl Default for VertexIndexer {
    fn default() -> Self {
        Self::new(Policy::default(), IndexWidth::default())
    }
}

impl VertexIndexer {
    pub fn new(policy: Policy, index_width: IndexWidth) -> Self {
        Self {
            policy,
            tolerance: DEFAULT_TOLERANCE,
            index_width,
        }
    }

    pub fn from_config(config: &IndexingConfig) -> Self {
        Self {
            policy: config.policy,
            tolerance: config.tolerance,
            index_width: config.index_width,
        }
    }

    /// Only consulted by [`Policy::Near`].
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Deduplicate `soup`, keeping vertices in first-occurrence order.
    pub fn index(&self, soup: &TriangleSoup) -> Result<IndexedMesh> {
        let mesh = match self.policy {
            Policy::Near => index_corners(
                soup.corners(),
                &mut NearMatch::new(self.tolerance),
                self.index_width,
                |_, _| {},
            )?,
            Policy::Exact => index_corners(
                soup.corners(),
                &mut ExactMatch::new(),
                self.index_width,
                |_, _| {},
            )?,
        };

        debug!(
            policy = %self.policy,
            corners = soup.len(),
            unique = mesh.vertex_count(),
            width = %self.index_width,
            "Indexed triangle soup"
        );

        Ok(mesh)
    }
}

/// Shared dedup loop. `merge` runs on the emitted vertex each time a later
/// corner matches it.
pub(crate) fn index_corners<V, L, M>(
    corners: &[V],
    lookup: &mut L,
    index_width: IndexWidth,
    merge: M,
) -> Result<IndexedMesh<V>>
where
    V: AsVertex + Copy,
    L: VertexLookup,
    M: FnMut(&mut V, &V),
{
    index_corners_with_limit(corners, lookup, index_width, index_width.max_vertices(), merge)
}

pub(crate) fn index_corners_with_limit<V, L, M>(
    corners: &[V],
    lookup: &mut L,
    index_width: IndexWidth,
    limit: usize,
    mut merge: M,
) -> Result<IndexedMesh<V>>
where
    V: AsVertex + Copy,
    L: VertexLookup,
    M: FnMut(&mut V, &V),
{
    let mut vertices: Vec<V> = Vec::new();
    let mut indices: Vec<u32> = Vec::with_capacity(corners.len());

    for corner in corners {
        let key: &Vertex = corner.as_vertex();

        if let Some(found) = lookup.find(key, &vertices) {
            merge(&mut vertices[found as usize], corner);
            indices.push(found);
            continue;
        }

        if vertices.len() >= limit {
            return Err(IndexerError::IndexOverflow {
                attempted: vertices.len() + 1,
                limit,
            });
        }
        let index = u32::try_from(vertices.len()).map_err(|_| IndexerError::IndexOverflow {
            attempted: vertices.len() + 1,
            limit,
        })?;

        vertices.push(*corner);
        lookup.register(key, index);
        indices.push(index);
    }

    Ok(IndexedMesh {
        vertices,
        indices,
        index_width,
    })
}
