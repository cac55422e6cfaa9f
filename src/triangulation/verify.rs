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

//! Structural verification of a mesh: adjacency symmetry, winding,
//! vertex-to-triangle index validity, constraint presence, and the local
//! Delaunay property of unconstrained edges. Violations are returned as
//! data rather than panicking, so callers can assert on them in tests or
//! log them in production.

use ahash::AHashSet;
use thiserror::Error;

use crate::geometry::Edge;
use crate::kernel::{Orientation, in_circle, orient2d};
use crate::mesh::{
    N_SUPER_TRIANGLE_VERTICES, NO_NEIGHBOR, TriInd, TriMesh, VertInd, ccw, cw,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyViolation {
    #[error("triangle {tri} lists neighbor {neighbor}, which does not point back across the shared edge")]
    AsymmetricNeighbor { tri: TriInd, neighbor: TriInd },
    #[error("triangle {tri} is collinear or wound clockwise")]
    DegenerateTriangle { tri: TriInd },
    #[error("vertex {vertex} maps to a triangle that does not contain it")]
    BadVertexTriangle { vertex: VertInd },
    #[error("fixed edge {edge:?} is not an edge of any triangle")]
    MissingFixedEdge { edge: Edge },
    #[error("unconstrained edge between triangles {tri} and {neighbor} is not locally Delaunay")]
    DelaunayViolation { tri: TriInd, neighbor: TriInd },
}

/// Checks every structural invariant of `mesh` and collects the violations.
///
/// With `super_present`, vertices below the synthetic-corner count are
/// treated as points at infinity: quads touching them are excluded from the
/// Delaunay check, and every vertex must map to an incident triangle. After
/// finalization a vertex orphaned by carving may map to no triangle.
pub fn verify_topology(mesh: &TriMesh, super_present: bool) -> Vec<TopologyViolation> {
    let mut out = Vec::new();
    let is_super = |v: VertInd| super_present && v < N_SUPER_TRIANGLE_VERTICES;

    let mut mesh_edges: AHashSet<Edge> = AHashSet::new();
    for (t, tri) in mesh.triangles.iter().enumerate() {
        if mesh.is_removed(t) {
            continue;
        }
        for s in 0..3 {
            let a = tri.vertices[ccw(s)];
            let b = tri.vertices[cw(s)];
            mesh_edges.insert(Edge::new(a, b));

            let n = tri.neighbors[s];
            if n == NO_NEIGHBOR {
                continue;
            }
            let symmetric = n < mesh.triangles.len()
                && !mesh.is_removed(n)
                && mesh.triangles[n]
                    .neighbor_slot(t)
                    .is_some_and(|slot| {
                        let opo = &mesh.triangles[n];
                        Edge::new(opo.vertices[ccw(slot)], opo.vertices[cw(slot)])
                            == Edge::new(a, b)
                    });
            if !symmetric {
                out.push(TopologyViolation::AsymmetricNeighbor { tri: t, neighbor: n });
            }
        }

        let [v0, v1, v2] = tri.vertices;
        if orient2d(&mesh.vertices[v0], &mesh.vertices[v1], &mesh.vertices[v2])
            != Orientation::Left
        {
            out.push(TopologyViolation::DegenerateTriangle { tri: t });
        }
    }

    for (v, &vt) in mesh.vert_tris.iter().enumerate() {
        if vt == NO_NEIGHBOR {
            // Orphaned vertices are legal once carving has finalized the
            // mesh; before that every vertex has incident triangles.
            if super_present {
                out.push(TopologyViolation::BadVertexTriangle { vertex: v });
            }
            continue;
        }
        if vt >= mesh.triangles.len()
            || mesh.is_removed(vt)
            || !mesh.triangles[vt].contains_vertex(v)
        {
            out.push(TopologyViolation::BadVertexTriangle { vertex: v });
        }
    }

    for &e in &mesh.fixed_edges {
        if !mesh_edges.contains(&e) {
            out.push(TopologyViolation::MissingFixedEdge { edge: e });
        }
    }

    for (t, tri) in mesh.triangles.iter().enumerate() {
        if mesh.is_removed(t) {
            continue;
        }
        for s in 0..3 {
            let n = tri.neighbors[s];
            // Each interior edge once.
            if n == NO_NEIGHBOR || n >= mesh.triangles.len() || mesh.is_removed(n) || t > n {
                continue;
            }
            let v = tri.vertices[s];
            let a = tri.vertices[ccw(s)];
            let b = tri.vertices[cw(s)];
            if mesh.fixed_edges.contains(&Edge::new(a, b)) {
                continue;
            }
            let Some(slot) = mesh.triangles[n].neighbor_slot(t) else {
                continue;
            };
            let c = mesh.triangles[n].vertices[slot];
            if is_super(v) || is_super(a) || is_super(b) || is_super(c) {
                continue;
            }
            if in_circle(
                &mesh.vertices[v],
                &mesh.vertices[a],
                &mesh.vertices[b],
                &mesh.vertices[c],
            ) {
                out.push(TopologyViolation::DelaunayViolation { tri: t, neighbor: n });
            }
        }
    }

    out
}
