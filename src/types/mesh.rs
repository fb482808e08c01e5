use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::Serialize;

use crate::error::{IndexerError, Result};

use super::{AsVertex, TbnVertex, Vertex};

/// Width of the index type a mesh is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IndexWidth {
    #[default]
    #[value(name = "u16")]
    U16,
    #[value(name = "u32")]
    U32,
}

impl IndexWidth {
    pub fn bits(self) -> u32 {
        match self {
            IndexWidth::U16 => 16,
            IndexWidth::U32 => 32,
        }
    }

    /// Largest vertex count addressable by this width (`2^W`).
    pub fn max_vertices(self) -> usize {
        usize::try_from(1u64 << self.bits()).unwrap_or(usize::MAX)
    }

    /// Fail with `IndexOverflow` if `vertex_count` vertices cannot be addressed.
    pub fn check(self, vertex_count: usize) -> Result<()> {
        let limit = self.max_vertices();
        if vertex_count > limit {
            return Err(IndexerError::IndexOverflow {
                attempted: vertex_count,
                limit,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for IndexWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexWidth::U16 => write!(f, "u16"),
            IndexWidth::U32 => write!(f, "u32"),
        }
    }
}

/// Interleaved vertex layout for a single VBO upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

/// Interleaved layout including the accumulated tangent basis.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuTbnVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

/// Deduplicated vertex buffer plus the index buffer that rebuilds the soup.
///
/// Indices are kept as `u32` regardless of `index_width`; the width records
/// the limit the mesh was checked against and selects the narrowing used by
/// [`IndexedMesh::index_bytes`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedMesh<V = Vertex> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
    pub index_width: IndexWidth,
}

impl<V> Default for IndexedMesh<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            index_width: IndexWidth::default(),
        }
    }
}

impl<V> IndexedMesh<V> {
    /// Number of unique vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles (indices / 3).
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh contains no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Indices narrowed to 16 bits for a `GL_UNSIGNED_SHORT` draw.
    pub fn indices_u16(&self) -> Result<Vec<u16>> {
        IndexWidth::U16.check(self.vertex_count())?;
        self.indices
            .iter()
            .map(|&i| {
                u16::try_from(i).map_err(|_| IndexerError::IndexOverflow {
                    attempted: i as usize + 1,
                    limit: IndexWidth::U16.max_vertices(),
                })
            })
            .collect()
    }

    /// Raw index buffer bytes in the mesh's declared width.
    pub fn index_bytes(&self) -> Result<Vec<u8>> {
        match self.index_width {
            IndexWidth::U16 => {
                let narrowed = self.indices_u16()?;
                Ok(bytemuck::cast_slice(&narrowed).to_vec())
            }
            IndexWidth::U32 => Ok(bytemuck::cast_slice(&self.indices).to_vec()),
        }
    }
}

impl<V: AsVertex> IndexedMesh<V> {
    /// Flat positions: [x, y, z, x, y, z, ...]
    pub fn positions(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.as_vertex().position.to_array())
            .collect()
    }

    /// Flat UVs: [u, v, u, v, ...]
    pub fn uvs(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.as_vertex().uv.to_array())
            .collect()
    }

    /// Flat normals: [nx, ny, nz, ...]
    pub fn normals(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.as_vertex().normal.to_array())
            .collect()
    }

    pub fn interleaved(&self) -> Vec<GpuVertex> {
        self.vertices
            .iter()
            .map(|v| {
                let v = v.as_vertex();
                GpuVertex {
                    position: v.position.to_array(),
                    uv: v.uv.to_array(),
                    normal: v.normal.to_array(),
                }
            })
            .collect()
    }

    /// Axis-aligned bounds of the vertex positions, `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(|v| v.as_vertex().position);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

impl IndexedMesh<TbnVertex> {
    /// Flat accumulated tangents: [tx, ty, tz, ...]
    pub fn tangents(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.tangent.to_array())
            .collect()
    }

    /// Flat accumulated bitangents: [bx, by, bz, ...]
    pub fn bitangents(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.bitangent.to_array())
            .collect()
    }

    /// Consumer-side normalization of the accumulated sums.
    ///
    /// Zero-length sums stay zero.
    pub fn normalize_tangents(mut self) -> Self {
        for v in &mut self.vertices {
            v.tangent = v.tangent.normalize_or_zero();
            v.bitangent = v.bitangent.normalize_or_zero();
        }
        self
    }

    pub fn interleaved_tbn(&self) -> Vec<GpuTbnVertex> {
        self.vertices
            .iter()
            .map(|v| GpuTbnVertex {
                position: v.vertex.position.to_array(),
                uv: v.vertex.uv.to_array(),
                normal: v.vertex.normal.to_array(),
                tangent: v.tangent.to_array(),
                bitangent: v.bitangent.to_array(),
            })
            .collect()
    }
}
