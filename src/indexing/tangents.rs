use glam::Vec3;

use crate::error::Result;
use crate::types::{TbnVertex, TriangleSoup, Vertex};

/// Per-triangle tangent and bitangent, copied to all three corners.
///
/// Triangles whose UV mapping is degenerate (zero determinant) get zero
/// vectors so they contribute nothing once the TBN indexer sums corners.
pub fn compute_tangent_basis(soup: &TriangleSoup) -> Result<TriangleSoup<TbnVertex>> {
    let mut corners = Vec::with_capacity(soup.len());

    for tri in soup.triangles() {
        let (tangent, bitangent) = triangle_basis(&tri[0], &tri[1], &tri[2]);
        corners.extend(tri.iter().map(|&v| TbnVertex::new(v, tangent, bitangent)));
    }

    TriangleSoup::new(corners)
}

fn triangle_basis(v0: &Vertex, v1: &Vertex, v2: &Vertex) -> (Vec3, Vec3) {
    let e1 = v1.position - v0.position;
    let e2 = v2.position - v0.position;
    let d1 = v1.uv - v0.uv;
    let d2 = v2.uv - v0.uv;

    let det = d1.x * d2.y - d1.y * d2.x;
    if det == 0.0 || !det.is_finite() {
        return (Vec3::ZERO, Vec3::ZERO);
    }
    let r = 1.0 / det;

    let tangent = (e1 * d2.y - e2 * d1.y) * r;
    let bitangent = (e2 * d1.x - e1 * d2.x) * r;
    (tangent, bitangent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn corner(p: [f32; 3], uv: [f32; 2]) -> Vertex {
        Vertex::new(Vec3::from_array(p), Vec2::from_array(uv), Vec3::Z)
    }

    #[test]
    fn axis_aligned_mapping_yields_unit_axes() {
        let soup = TriangleSoup::new(vec![
            corner([0.0, 0.0, 0.0], [0.0, 0.0]),
            corner([1.0, 0.0, 0.0], [1.0, 0.0]),
            corner([0.0, 1.0, 0.0], [0.0, 1.0]),
        ])
        .unwrap();

        let tbn = compute_tangent_basis(&soup).unwrap();
        assert_eq!(tbn.len(), 3);
        for c in tbn.corners() {
            assert_relative_eq!(c.tangent.x, 1.0);
            assert_relative_eq!(c.tangent.y, 0.0);
            assert_relative_eq!(c.bitangent.y, 1.0);
            assert_relative_eq!(c.bitangent.x, 0.0);
        }
        assert_eq!(tbn.corners()[1].vertex, soup.corners()[1]);
    }

    #[test]
    fn scaled_uvs_scale_inversely() {
        // Stretching UVs by 2 halves the tangent length.
        let soup = TriangleSoup::new(vec![
            corner([0.0, 0.0, 0.0], [0.0, 0.0]),
            corner([1.0, 0.0, 0.0], [2.0, 0.0]),
            corner([0.0, 1.0, 0.0], [0.0, 2.0]),
        ])
        .unwrap();

        let tbn = compute_tangent_basis(&soup).unwrap();
        assert_relative_eq!(tbn.corners()[0].tangent.x, 0.5);
        assert_relative_eq!(tbn.corners()[0].bitangent.y, 0.5);
    }

    #[test]
    fn degenerate_uvs_give_zero_basis() {
        let soup = TriangleSoup::new(vec![
            corner([0.0, 0.0, 0.0], [0.5, 0.5]),
            corner([1.0, 0.0, 0.0], [0.5, 0.5]),
            corner([0.0, 1.0, 0.0], [0.5, 0.5]),
        ])
        .unwrap();

        let tbn = compute_tangent_basis(&soup).unwrap();
        assert!(tbn.corners().iter().all(|c| c.tangent == Vec3::ZERO));
        assert!(tbn.corners().iter().all(|c| c.bitangent == Vec3::ZERO));
    }
}
