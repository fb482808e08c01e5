use glam::{Vec2, Vec3};

/// One triangle corner: the attribute tuple the indexer deduplicates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }

    /// All matched scalars in comparison order: position, uv, normal.
    pub fn scalars(&self) -> [f32; 8] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.uv.x,
            self.uv.y,
            self.normal.x,
            self.normal.y,
            self.normal.z,
        ]
    }
}

/// A corner extended with tangent-space vectors.
///
/// Tangent and bitangent never take part in vertex identity; only the
/// embedded [`Vertex`] does.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TbnVertex {
    pub vertex: Vertex,
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

impl TbnVertex {
    pub fn new(vertex: Vertex, tangent: Vec3, bitangent: Vec3) -> Self {
        Self {
            vertex,
            tangent,
            bitangent,
        }
    }
}

/// Access to the identity-bearing attributes of a corner.
pub trait AsVertex {
    fn as_vertex(&self) -> &Vertex;
}

impl AsVertex for Vertex {
    fn as_vertex(&self) -> &Vertex {
        self
    }
}

impl AsVertex for TbnVertex {
    fn as_vertex(&self) -> &Vertex {
        &self.vertex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_follow_position_uv_normal_order() {
        let v = Vertex::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec2::new(4.0, 5.0),
            Vec3::new(6.0, 7.0, 8.0),
        );
        assert_eq!(v.scalars(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn tbn_vertex_exposes_base_attributes() {
        let base = Vertex::new(Vec3::X, Vec2::Y, Vec3::Z);
        let tbn = TbnVertex::new(base, Vec3::ONE, Vec3::NEG_ONE);
        assert_eq!(*tbn.as_vertex(), base);
        assert_eq!(*base.as_vertex(), base);
    }
}
