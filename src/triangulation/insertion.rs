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

//! Incremental vertex insertion: point location by a remembering stochastic
//! walk, cavity construction, and Lawson flipping driven by an explicit
//! work stack.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::geometry::{Edge, Point2};
use crate::kernel::{Orientation, in_circle, orient2d};
use crate::mesh::{
    N_SUPER_TRIANGLE_VERTICES, NO_NEIGHBOR, TriInd, Triangle, VertInd, VertexLocation, ccw, cw,
};
use crate::triangulation::{Triangulation, TriangulationError, VertexInsertionOrder};

impl Triangulation {
    /// Inserts a batch of vertices. The whole batch is validated before any
    /// mutation: non-finite coordinates, exact duplicates (against the mesh
    /// and within the batch) and points outside the bounding geometry are
    /// rejected with the mesh left untouched. The first batch determines the
    /// super-triangle.
    pub fn insert_vertices(&mut self, points: &[Point2]) -> Result<(), TriangulationError> {
        if self.finalized {
            return Err(TriangulationError::SuperTriangleErased);
        }
        if points.is_empty() {
            return Ok(());
        }
        for (i, p) in points.iter().enumerate() {
            if !p.is_finite() {
                return Err(TriangulationError::NonFiniteCoordinate { index: i });
            }
        }
        let corners = if self.mesh.vertices.is_empty() {
            Some(super_corners(points))
        } else {
            None
        };
        for (i, p) in points.iter().enumerate() {
            let inside = match &corners {
                Some(c) => point_in_triangle(c, p),
                None => self.point_in_super(p),
            };
            if !inside {
                return Err(TriangulationError::OutsideBoundingGeometry { index: i });
            }
        }
        let mut batch_keys = ahash::AHashSet::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            let key = p.key();
            if self.dedup.contains_key(&key) || !batch_keys.insert(key) {
                return Err(TriangulationError::DuplicateVertex { index: i });
            }
        }

        if let Some([c0, c1, c2]) = corners {
            self.mesh.add_vertex(c0, 0);
            self.mesh.add_vertex(c1, 0);
            self.mesh.add_vertex(c2, 0);
            self.mesh
                .add_triangle(Triangle::new([0, 1, 2], [NO_NEIGHBOR; 3]));
        }
        let base = self.mesh.vertices.len();
        for p in points {
            let v = self.mesh.add_vertex(*p, NO_NEIGHBOR);
            self.dedup.insert(p.key(), v);
        }

        let mut order: Vec<usize> = (0..points.len()).collect();
        if self.order == VertexInsertionOrder::Randomized {
            order.shuffle(&mut self.rng);
        }
        for &i in &order {
            self.wire_vertex(base + i)?;
            self.last_inserted = base + i;
        }
        Ok(())
    }

    /// Strict containment in the super-triangle; points on its boundary are
    /// rejected so the walk never has to leave the mesh.
    pub(crate) fn point_in_super(&self, p: &Point2) -> bool {
        let c = [
            self.mesh.vertices[0],
            self.mesh.vertices[1],
            self.mesh.vertices[2],
        ];
        point_in_triangle(&c, p)
    }

    /// Remembering stochastic walk from the most recently inserted vertex's
    /// triangle toward `p`. The random scan order of the three edges breaks
    /// cycles that a fixed order could fall into mid-operation.
    pub(crate) fn locate(&mut self, p: &Point2) -> Result<VertexLocation, TriangulationError> {
        let mut t = self.mesh.vert_tris[self.last_inserted];
        debug_assert!(t != NO_NEIGHBOR);
        loop {
            let tri = self.mesh.triangles[t];
            let k = self.rng.random_range(0..3usize);
            let mut moved = false;
            for j in 0..3 {
                let i = (k + j) % 3;
                let a = self.mesh.vertices[tri.vertices[ccw(i)]];
                let b = self.mesh.vertices[tri.vertices[cw(i)]];
                if orient2d(&a, &b, p) == Orientation::Right {
                    let n = tri.neighbors[i];
                    if n == NO_NEIGHBOR {
                        // Walk ran off the mesh: the point is outside the
                        // bounding geometry despite the up-front check.
                        return Err(TriangulationError::OutsideBoundingGeometry {
                            index: self.mesh.vertices.len(),
                        });
                    }
                    t = n;
                    moved = true;
                    break;
                }
            }
            if !moved {
                for i in 0..3 {
                    let v = tri.vertices[i];
                    if self.mesh.vertices[v] == *p {
                        return Ok(VertexLocation::OnVertex(v));
                    }
                }
                for i in 0..3 {
                    let a = self.mesh.vertices[tri.vertices[ccw(i)]];
                    let b = self.mesh.vertices[tri.vertices[cw(i)]];
                    if orient2d(&a, &b, p) == Orientation::Collinear {
                        return Ok(VertexLocation::OnEdge(t, i));
                    }
                }
                return Ok(VertexLocation::Inside(t));
            }
        }
    }

    /// Connects the already-appended vertex `v` into the triangulation and
    /// restores the Delaunay property around it.
    pub(crate) fn wire_vertex(&mut self, v: VertInd) -> Result<(), TriangulationError> {
        let p = self.mesh.vertices[v];
        match self.locate(&p)? {
            VertexLocation::OnVertex(w) => {
                // Duplicates are screened out bit-exactly before insertion.
                debug_assert!(w == v, "unscreened duplicate vertex");
                Err(TriangulationError::DuplicateVertex { index: v })
            }
            VertexLocation::Inside(t) => {
                let tris = self.mesh.split_triangle_at(t, v);
                self.restore_delaunay(v, &tris);
                Ok(())
            }
            VertexLocation::OnEdge(t, slot) => {
                let tri = self.mesh.triangles[t];
                let t_opo = tri.neighbors[slot];
                if t_opo == NO_NEIGHBOR {
                    return Err(TriangulationError::OutsideBoundingGeometry { index: v });
                }
                let edge = Edge::new(tri.vertices[ccw(slot)], tri.vertices[cw(slot)]);
                let tris = self.mesh.split_edge_at(t, t_opo, v);
                if self.mesh.fixed_edges.contains(&edge) {
                    self.mesh.split_fixed_edge(edge, v);
                }
                self.restore_delaunay(v, &tris);
                Ok(())
            }
        }
    }

    /// Inserts a Steiner point, reusing an existing vertex when the point
    /// coincides with one exactly.
    pub(crate) fn insert_steiner(&mut self, p: Point2) -> Result<VertInd, TriangulationError> {
        if let Some(&v) = self.dedup.get(&p.key()) {
            return Ok(v);
        }
        let v = self.mesh.add_vertex(p, NO_NEIGHBOR);
        self.dedup.insert(p.key(), v);
        self.wire_vertex(v)?;
        self.last_inserted = v;
        Ok(v)
    }

    /// Lawson flipping: for each triangle on the stack, test the edge
    /// opposite `v` and flip it when the Delaunay condition is violated,
    /// pushing the two triangles produced by the flip. Constrained edges are
    /// never flipped, so the loop terminates once every non-fixed edge
    /// around `v` is locally Delaunay.
    pub(crate) fn restore_delaunay(&mut self, v: VertInd, seed: &[TriInd]) {
        let mut stack: Vec<TriInd> = seed.to_vec();
        while let Some(t) = stack.pop() {
            let tri = self.mesh.triangles[t];
            let i = tri.vertex_slot(v);
            let t_opo = tri.neighbors[i];
            if t_opo == NO_NEIGHBOR {
                continue;
            }
            let a = tri.vertices[ccw(i)];
            let b = tri.vertices[cw(i)];
            let c = self.mesh.opposed_vertex(t_opo, t);
            if self.flip_needed(v, c, a, b) {
                self.mesh.flip_edge(t, t_opo);
                stack.push(t);
                stack.push(t_opo);
            }
        }
    }

    /// Whether the edge (a, b), shared between the triangle holding `v` and
    /// the one holding `c`, must be flipped to (v, c).
    ///
    /// While the super-triangle is present its corners behave as points at
    /// infinity: any circumcircle through one degenerates to a half-plane,
    /// so the in-circle test is replaced by same-side orientation tests
    /// against the line through the two ordinary circle points.
    fn flip_needed(&self, v: VertInd, c: VertInd, a: VertInd, b: VertInd) -> bool {
        if self.mesh.fixed_edges.contains(&Edge::new(a, b)) {
            return false;
        }
        let is_super =
            |i: VertInd| -> bool { !self.finalized && i < N_SUPER_TRIANGLE_VERTICES };
        let pv = self.mesh.vertices[v];
        let pc = self.mesh.vertices[c];
        let pa = self.mesh.vertices[a];
        let pb = self.mesh.vertices[b];

        if is_super(c) && !is_super(a) && !is_super(b) {
            // Candidate edge (v, c) reaches infinity while (a, b) is real;
            // v and c are on opposite sides of (a, b), so the half-plane
            // through c never contains v.
            return false;
        }
        if is_super(a) {
            return same_side(&pa, &pv, &pc, &pb);
        }
        if is_super(b) {
            return same_side(&pb, &pv, &pc, &pa);
        }
        in_circle(&pv, &pa, &pb, &pc)
    }
}

/// Both `p` and `q` strictly on the same side of the line (l1, l2).
fn same_side(p: &Point2, q: &Point2, l1: &Point2, l2: &Point2) -> bool {
    let sp = orient2d(l1, l2, p);
    sp != Orientation::Collinear && sp == orient2d(l1, l2, q)
}

/// `p` strictly inside the CCW triangle with corners `c`.
fn point_in_triangle(c: &[Point2; 3], p: &Point2) -> bool {
    orient2d(&c[0], &c[1], p) == Orientation::Left
        && orient2d(&c[1], &c[2], p) == Orientation::Left
        && orient2d(&c[2], &c[0], p) == Orientation::Left
}

/// Corners of the synthetic bounding triangle for a first batch: an
/// equilateral triangle whose inscribed circle is orders of magnitude larger
/// than the batch extents, so ordinary inputs land strictly interior. The
/// center and radius are computed without intermediate overflow and the
/// radius is clamped to keep the corners finite, so a batch too large to
/// enclose fails the containment check instead of producing non-finite
/// coordinates.
fn super_corners(points: &[Point2]) -> [Point2; 3] {
    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    let cx = min.x * 0.5 + max.x * 0.5;
    let cy = min.y * 0.5 + max.y * 0.5;
    let half = (max.x * 0.5 - min.x * 0.5).max(max.y * 0.5 - min.y * 0.5);
    let headroom = (f64::MAX - cx.abs()).min(f64::MAX - cy.abs()) * 0.5;
    let r = (half * 131_072.0).max(65_536.0).min(headroom).max(1.0);
    let shift = r * 3f64.sqrt() * 0.5;
    [
        Point2::new(cx - shift, cy - r * 0.5),
        Point2::new(cx + shift, cy - r * 0.5),
        Point2::new(cx, cy + r),
    ]
}
