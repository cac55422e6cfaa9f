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

/// Dense index into the vertex array.
pub type VertInd = usize;
/// Dense index into the triangle array.
pub type TriInd = usize;

/// Sentinel for a missing vertex reference.
pub const NO_VERTEX: VertInd = usize::MAX;
/// Sentinel for a missing neighbor across a boundary edge.
pub const NO_NEIGHBOR: TriInd = usize::MAX;

/// Number of synthetic bounding-triangle vertices occupying indices 0..3
/// until the mesh is finalized.
pub const N_SUPER_TRIANGLE_VERTICES: usize = 3;

#[inline]
pub fn ccw(i: usize) -> usize {
    (i + 1) % 3
}

#[inline]
pub fn cw(i: usize) -> usize {
    (i + 2) % 3
}

/// A triangle over vertex indices in counter-clockwise winding.
/// `neighbors[i]` is the triangle across the edge opposite `vertices[i]`,
/// i.e. the directed boundary edge (vertices[ccw(i)], vertices[cw(i)]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub vertices: [VertInd; 3],
    pub neighbors: [TriInd; 3],
}

impl Triangle {
    #[inline]
    pub fn new(vertices: [VertInd; 3], neighbors: [TriInd; 3]) -> Self {
        Triangle {
            vertices,
            neighbors,
        }
    }

    #[inline]
    pub fn contains_vertex(&self, v: VertInd) -> bool {
        self.vertices.contains(&v)
    }

    /// Slot of vertex `v`; the triangle must contain it.
    #[inline]
    pub fn vertex_slot(&self, v: VertInd) -> usize {
        debug_assert!(self.contains_vertex(v));
        if self.vertices[0] == v {
            0
        } else if self.vertices[1] == v {
            1
        } else {
            2
        }
    }

    /// Slot of neighbor `t`, or `None` when the triangles are not adjacent.
    #[inline]
    pub fn neighbor_slot(&self, t: TriInd) -> Option<usize> {
        self.neighbors.iter().position(|&n| n == t)
    }

    /// Slot of the vertex opposite the undirected edge (a, b).
    #[inline]
    pub fn edge_slot(&self, a: VertInd, b: VertInd) -> usize {
        debug_assert!(self.contains_vertex(a) && self.contains_vertex(b));
        let i = self.vertex_slot(a);
        if self.vertices[ccw(i)] == b { cw(i) } else { ccw(i) }
    }
}

/// Where a query point landed during the point-location walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLocation {
    Inside(TriInd),
    /// On the interior of the edge opposite the given slot of the triangle.
    OnEdge(TriInd, usize),
    OnVertex(VertInd),
}
