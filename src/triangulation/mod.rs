// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 the cdt2d authors
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

pub mod carving;
pub mod constraints;
pub mod insertion;
pub mod verify;

use ahash::AHashMap;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use thiserror::Error;

use crate::geometry::Edge;
use crate::mesh::{TriInd, TriMesh, Triangle, VertInd};

pub use verify::{TopologyViolation, verify_topology};

/// Order in which a batch of vertices is processed. Stored indices always
/// follow the order the caller provided; this only affects processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertexInsertionOrder {
    /// Deterministic and reproducible, at the cost of worst-case walks on
    /// adversarial input orders.
    #[default]
    AsProvided,
    /// Expected O(n log n) total work by shuffling the processing order.
    Randomized,
}

/// What to do when an inserted constraint crosses an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntersectingEdgesStrategy {
    /// Keep the pre-existing constraint and stop enforcing the new edge past
    /// the conflict; the attempt is still recorded in the registry.
    #[default]
    Ignore,
    /// Split both constraints at their geometric intersection point.
    Resolve,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriangulationError {
    #[error("coordinate of vertex {index} is NaN or infinite")]
    NonFiniteCoordinate { index: usize },
    #[error("vertex {index} exactly coincides with an existing vertex")]
    DuplicateVertex { index: usize },
    #[error("vertex {index} lies outside the bounding geometry of the first batch")]
    OutsideBoundingGeometry { index: usize },
    #[error("edge references vertex {index} but only {num_vertices} vertices exist")]
    VertexIndexOutOfRange { index: usize, num_vertices: usize },
    #[error("edge from vertex {vertex} to itself has zero length")]
    ZeroLengthEdge { vertex: usize },
    #[error("operation requires the super-triangle, which was already erased")]
    SuperTriangleErased,
    #[error("constraint edge {edge:?} could not be enforced without degenerating the mesh")]
    DegenerateCavity { edge: Edge },
}

/// A constrained Delaunay triangulation under incremental construction.
///
/// Callers insert vertices, then insert or conform constraint edges, then
/// carve: `erase_super_triangle`, `erase_outer_triangles` or
/// `erase_outer_triangles_and_holes`. Carving compacts the triangle array
/// and shifts vertex indices down by the three synthetic super-triangle
/// vertices, so indices held across a carving call are invalid; afterwards
/// no further insertion is possible.
#[derive(Debug, Clone)]
pub struct Triangulation {
    pub(crate) mesh: TriMesh,
    pub(crate) order: VertexInsertionOrder,
    pub(crate) strategy: IntersectingEdgesStrategy,
    pub(crate) min_dist_to_constraint: f64,
    pub(crate) finalized: bool,
    pub(crate) last_inserted: VertInd,
    pub(crate) rng: SmallRng,
    /// Coordinate bits of every vertex, for exact-duplicate detection.
    pub(crate) dedup: AHashMap<(u64, u64), VertInd>,
}

impl Default for Triangulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Triangulation {
    pub fn new() -> Self {
        Self::with_config(
            VertexInsertionOrder::default(),
            IntersectingEdgesStrategy::default(),
            0.0,
        )
    }

    /// `min_distance_to_constraint_edge` is the snapping threshold used when
    /// an intersection point falls next to an existing constraint endpoint.
    pub fn with_config(
        order: VertexInsertionOrder,
        strategy: IntersectingEdgesStrategy,
        min_distance_to_constraint_edge: f64,
    ) -> Self {
        Triangulation {
            mesh: TriMesh::new(),
            order,
            strategy,
            min_dist_to_constraint: min_distance_to_constraint_edge,
            finalized: false,
            last_inserted: 0,
            rng: SmallRng::seed_from_u64(0x5eed_cd71),
            dedup: AHashMap::new(),
        }
    }

    /// Vertex sequence; while the super-triangle is present the first three
    /// entries are its synthetic corners.
    #[inline]
    pub fn vertices(&self) -> &[crate::geometry::Point2] {
        &self.mesh.vertices
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.mesh.triangles
    }

    #[inline]
    pub fn fixed_edges(&self) -> &ahash::AHashSet<Edge> {
        &self.mesh.fixed_edges
    }

    /// One incident triangle per vertex.
    #[inline]
    pub fn vertex_triangles(&self) -> &[TriInd] {
        &self.mesh.vert_tris
    }

    #[inline]
    pub fn overlap_counts(&self) -> &AHashMap<Edge, u32> {
        &self.mesh.overlap_count
    }

    #[inline]
    pub fn piece_to_originals(&self) -> &AHashMap<Edge, crate::mesh::OriginalEdges> {
        &self.mesh.piece_to_originals
    }

    /// Whether the super-triangle has been carved away.
    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Runs the topology verifier against the current mesh.
    pub fn verify_topology(&self) -> Vec<TopologyViolation> {
        let super_present = !self.finalized && !self.mesh.vertices.is_empty();
        verify::verify_topology(&self.mesh, super_present)
    }
}
