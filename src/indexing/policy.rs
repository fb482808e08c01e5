use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{AsVertex, Vertex};

/// Per-scalar tolerance used by [`NearMatch`] unless configured otherwise.
pub const DEFAULT_TOLERANCE: f32 = 0.01;

/// Which notion of vertex identity the indexer applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Per-scalar `|a - b| < ε`, linear scan over emitted vertices.
    #[value(name = "near")]
    Near,
    /// Bit-for-bit identity through an ordered lookup.
    #[default]
    #[value(name = "exact")]
    Exact,
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Policy::Near => write!(f, "near"),
            Policy::Exact => write!(f, "exact"),
        }
    }
}

/// Strategy for finding an already-emitted vertex equal to a candidate.
///
/// `find` must return the first-emitted match so that the resulting vertex
/// order depends only on input order.
pub trait VertexLookup {
    fn find<V: AsVertex>(&self, candidate: &Vertex, emitted: &[V]) -> Option<u32>;

    /// Record that `vertex` now lives at `index` in the output buffer.
    fn register(&mut self, vertex: &Vertex, index: u32);
}

/// Tolerance-based equality, applied independently to every scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearMatch {
    pub epsilon: f32,
}

impl NearMatch {
    pub fn new(epsilon: f32) -> Self {
        Self { epsilon }
    }

    pub fn is_near(&self, a: f32, b: f32) -> bool {
        (a - b).abs() < self.epsilon
    }

    pub fn matches(&self, a: &Vertex, b: &Vertex) -> bool {
        a.scalars()
            .iter()
            .zip(b.scalars())
            .all(|(&x, y)| self.is_near(x, y))
    }
}

impl Default for NearMatch {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl VertexLookup for NearMatch {
    fn find<V: AsVertex>(&self, candidate: &Vertex, emitted: &[V]) -> Option<u32> {
        emitted
            .iter()
            .position(|v| self.matches(candidate, v.as_vertex()))
            .and_then(|i| u32::try_from(i).ok())
    }

    // Scanning needs no auxiliary state.
    fn register(&mut self, _vertex: &Vertex, _index: u32) {}
}

/// Exact equality backed by a `BTreeMap` keyed on [`VertexKey`].
#[derive(Debug, Clone, Default)]
pub struct ExactMatch {
    lookup: BTreeMap<VertexKey, u32>,
}

impl ExactMatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(a: &Vertex, b: &Vertex) -> bool {
        VertexKey::new(a) == VertexKey::new(b)
    }

    /// Number of registered vertices.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

impl VertexLookup for ExactMatch {
    fn find<V: AsVertex>(&self, candidate: &Vertex, _emitted: &[V]) -> Option<u32> {
        self.lookup.get(&VertexKey::new(candidate)).copied()
    }

    fn register(&mut self, vertex: &Vertex, index: u32) {
        // Keep the first index if a caller registers a duplicate.
        self.lookup.entry(VertexKey::new(vertex)).or_insert(index);
    }
}

/// Lexicographic key over position, uv, normal using [`f32::total_cmp`].
///
/// Two keys compare equal exactly when every scalar has the same bit
/// pattern, so `-0.0` and `0.0` are distinct and a NaN only equals a NaN
/// with identical payload.
#[derive(Debug, Clone, Copy)]
pub struct VertexKey([f32; 8]);

impl VertexKey {
    pub fn new(vertex: &Vertex) -> Self {
        Self(vertex.scalars())
    }
}

impl Ord for VertexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .iter()
            .zip(other.0)
            .map(|(a, b)| a.total_cmp(&b))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

// Every comparison goes through `Ord` so `total_cmp` decides all of them.

impl PartialOrd for VertexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VertexKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VertexKey {}
