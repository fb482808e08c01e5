use crate::error::{IndexerError, Result};

use super::Vertex;

/// Flat per-corner attribute list, three corners per triangle.
///
/// Winding order is whatever the source produced; nothing here reorders
/// corners.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleSoup<V = Vertex> {
    corners: Vec<V>,
}

impl<V> TriangleSoup<V> {
    /// Wrap a corner list, rejecting lengths that do not form whole triangles.
    pub fn new(corners: Vec<V>) -> Result<Self> {
        if corners.len() % 3 != 0 {
            return Err(IndexerError::Input(format!(
                "Triangle soup length {} is not a multiple of 3",
                corners.len()
            )));
        }
        Ok(Self { corners })
    }

    /// Number of corners.
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.corners.len() / 3
    }

    pub fn corners(&self) -> &[V] {
        &self.corners
    }

    /// Iterate triangles as three-corner slices.
    pub fn triangles(&self) -> impl Iterator<Item = &[V]> {
        self.corners.chunks_exact(3)
    }

    pub fn into_corners(self) -> Vec<V> {
        self.corners
    }
}

impl<V> Default for TriangleSoup<V> {
    fn default() -> Self {
        Self {
            corners: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_partial_triangle() {
        let err = TriangleSoup::new(vec![Vertex::default(); 4]).unwrap_err();
        assert!(matches!(err, IndexerError::Input(_)));
        assert!(err.to_string().contains("multiple of 3"));
    }

    #[test]
    fn empty_soup_is_valid() {
        let soup: TriangleSoup = TriangleSoup::new(Vec::new()).unwrap();
        assert!(soup.is_empty());
        assert_eq!(soup.triangle_count(), 0);
        assert_eq!(soup.triangles().count(), 0);
    }

    #[test]
    fn triangles_are_consecutive_triples() {
        let corners: Vec<Vertex> = (0..6)
            .map(|i| Vertex {
                position: glam::Vec3::splat(i as f32),
                ..Default::default()
            })
            .collect();
        let soup = TriangleSoup::new(corners).unwrap();

        assert_eq!(soup.len(), 6);
        assert_eq!(soup.triangle_count(), 2);
        let second: Vec<f32> = soup
            .triangles()
            .nth(1)
            .unwrap()
            .iter()
            .map(|v| v.position.x)
            .collect();
        assert_eq!(second, vec![3.0, 4.0, 5.0]);
    }
}
