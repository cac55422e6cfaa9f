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

//! Constraint-edge enforcement. `insert_edges` carves the channel of
//! triangles a segment crosses and retriangulates the two pseudo-polygons it
//! leaves behind; `conform_to_edges` carves the same way, always resolving
//! crossings with existing constraints, and falls back to midpoint Steiner
//! refinement for a piece whose channel cannot be carved. Both share the
//! departure search, the crossing march, and intersection resolution.

use ahash::{AHashMap, AHashSet};
use smallvec::smallvec;

use crate::geometry::{Edge, Point2, segment_intersection};
use crate::kernel::{Orientation, between_collinear, in_circle, orient2d};
use crate::mesh::{
    N_SUPER_TRIANGLE_VERTICES, NO_NEIGHBOR, OriginalEdges, TriInd, Triangle, VertInd, ccw, cw,
};
use crate::triangulation::{IntersectingEdgesStrategy, Triangulation, TriangulationError};

/// How the segment (a, b) leaves vertex `a`.
enum Departure {
    /// (a, b) is already an edge of the mesh.
    Existing,
    /// The segment passes exactly through another vertex first.
    OnVertex(VertInd),
    /// The segment crosses the edge of `t` opposite `a`, with `vl` on its
    /// left and `vr` on its right.
    Crossing { t: TriInd, vl: VertInd, vr: VertInd },
}

type EdgeTask = (VertInd, VertInd, OriginalEdges);

impl Triangulation {
    /// Forces each edge into the triangulation. Crossings with existing
    /// constraints are handled per the configured strategy; the whole batch
    /// is validated before any mutation.
    pub fn insert_edges(&mut self, edges: &[(usize, usize)]) -> Result<(), TriangulationError> {
        let pairs = self.prepare_edges(edges)?;
        let resolve = self.strategy == IntersectingEdgesStrategy::Resolve;
        for (a, b) in pairs {
            self.insert_edge(a, b, resolve)?;
        }
        self.mesh.compact_dummies();
        Ok(())
    }

    /// Like `insert_edges`, but crossings are always resolved and sub-edges
    /// that cannot be realized directly are refined with midpoint Steiner
    /// vertices, so on return every constraint is an uninterrupted chain of
    /// fixed mesh edges and no two constraints cross.
    pub fn conform_to_edges(&mut self, edges: &[(usize, usize)]) -> Result<(), TriangulationError> {
        let pairs = self.prepare_edges(edges)?;
        for (a, b) in pairs {
            self.conform_edge(a, b)?;
        }
        self.mesh.compact_dummies();
        Ok(())
    }

    /// Validates a constraint batch and maps caller indices to internal ones
    /// (offset past the super-triangle vertices).
    fn prepare_edges(
        &self,
        edges: &[(usize, usize)],
    ) -> Result<Vec<(VertInd, VertInd)>, TriangulationError> {
        if self.finalized {
            return Err(TriangulationError::SuperTriangleErased);
        }
        let num_vertices = self
            .mesh
            .vertices
            .len()
            .saturating_sub(N_SUPER_TRIANGLE_VERTICES);
        let mut out = Vec::with_capacity(edges.len());
        for &(a, b) in edges {
            for index in [a, b] {
                if index >= num_vertices {
                    return Err(TriangulationError::VertexIndexOutOfRange {
                        index,
                        num_vertices,
                    });
                }
            }
            if a == b {
                return Err(TriangulationError::ZeroLengthEdge { vertex: a });
            }
            out.push((
                a + N_SUPER_TRIANGLE_VERTICES,
                b + N_SUPER_TRIANGLE_VERTICES,
            ));
        }
        Ok(out)
    }

    fn insert_edge(
        &mut self,
        a: VertInd,
        b: VertInd,
        resolve: bool,
    ) -> Result<(), TriangulationError> {
        let mut tasks: Vec<EdgeTask> = vec![(a, b, smallvec![Edge::new(a, b)])];
        while let Some((v1, v2, orig)) = tasks.pop() {
            if v1 == v2 {
                continue;
            }
            match self.find_departure(v1, v2)? {
                Departure::Existing => {
                    self.mesh.fix_edge_with_originals(Edge::new(v1, v2), &orig);
                }
                Departure::OnVertex(c) => {
                    self.mesh.fix_edge_with_originals(Edge::new(v1, c), &orig);
                    tasks.push((c, v2, orig));
                }
                Departure::Crossing { t, vl, vr } => {
                    self.march_segment(v1, v2, t, vl, vr, orig, resolve, &mut tasks)?;
                }
            }
        }
        Ok(())
    }

    fn conform_edge(&mut self, a: VertInd, b: VertInd) -> Result<(), TriangulationError> {
        let mut tasks: Vec<EdgeTask> = vec![(a, b, smallvec![Edge::new(a, b)])];
        while let Some((v1, v2, orig)) = tasks.pop() {
            if v1 == v2 {
                continue;
            }
            match self.find_departure(v1, v2)? {
                Departure::Existing => {
                    self.mesh.fix_edge_with_originals(Edge::new(v1, v2), &orig);
                }
                Departure::OnVertex(c) => {
                    self.mesh.fix_edge_with_originals(Edge::new(v1, c), &orig);
                    tasks.push((c, v2, orig));
                }
                Departure::Crossing { t, vl, vr } => {
                    match self.march_segment(v1, v2, t, vl, vr, orig.clone(), true, &mut tasks)
                    {
                        Ok(()) => {}
                        Err(TriangulationError::DegenerateCavity { .. }) => {
                            // The channel could not be carved; refine with a
                            // midpoint Steiner vertex and conform both halves.
                            let p1 = self.mesh.vertices[v1];
                            let p2 = self.mesh.vertices[v2];
                            let m = Point2::midpoint(&p1, &p2);
                            let mid = self.insert_steiner(m)?;
                            if mid == v1 || mid == v2 {
                                return Err(TriangulationError::DegenerateCavity {
                                    edge: Edge::new(v1, v2),
                                });
                            }
                            tasks.push((v1, mid, orig.clone()));
                            tasks.push((mid, v2, orig));
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }
        Ok(())
    }

    /// Walks the triangle fan around `v1` to find how the segment toward
    /// `v2` departs: an existing edge, a vertex exactly on the segment, or
    /// the first crossed edge.
    fn find_departure(&self, v1: VertInd, v2: VertInd) -> Result<Departure, TriangulationError> {
        let p1 = self.mesh.vertices[v1];
        let p2 = self.mesh.vertices[v2];
        if self.mesh.has_edge(v1, v2) {
            return Ok(Departure::Existing);
        }
        for &t in &self.mesh.triangles_around(v1) {
            let tri = &self.mesh.triangles[t];
            let i = tri.vertex_slot(v1);
            let w1 = tri.vertices[ccw(i)];
            let w2 = tri.vertices[cw(i)];
            let q1 = self.mesh.vertices[w1];
            let q2 = self.mesh.vertices[w2];
            let o1 = orient2d(&p1, &p2, &q1);
            let o2 = orient2d(&p1, &p2, &q2);
            if o1 == Orientation::Collinear && between_collinear(&p1, &p2, &q1) {
                return Ok(Departure::OnVertex(w1));
            }
            if o2 == Orientation::Collinear && between_collinear(&p1, &p2, &q2) {
                return Ok(Departure::OnVertex(w2));
            }
            if o1 == Orientation::Right && o2 == Orientation::Left {
                return Ok(Departure::Crossing { t, vl: w2, vr: w1 });
            }
        }
        Err(TriangulationError::DegenerateCavity {
            edge: Edge::new(v1, v2),
        })
    }

    /// Marches from `v1` toward `v2` collecting the channel of crossed
    /// triangles and the two pseudo-polygon chains, then carves the channel
    /// and retriangulates both sides with the constraint edge exposed.
    /// Encountering a fixed edge either records the attempt and stops
    /// (`resolve == false`) or splits both constraints at the intersection.
    #[allow(clippy::too_many_arguments)]
    fn march_segment(
        &mut self,
        v1: VertInd,
        v2: VertInd,
        t0: TriInd,
        vl0: VertInd,
        vr0: VertInd,
        orig: OriginalEdges,
        resolve: bool,
        tasks: &mut Vec<EdgeTask>,
    ) -> Result<(), TriangulationError> {
        let p1 = self.mesh.vertices[v1];
        let p2 = self.mesh.vertices[v2];
        let mut intersected: Vec<TriInd> = vec![t0];
        let mut poly_left: Vec<VertInd> = vec![v1, vl0];
        let mut poly_right: Vec<VertInd> = vec![v1, vr0];
        let (mut t, mut vl, mut vr) = (t0, vl0, vr0);

        let end;
        loop {
            let crossed = Edge::new(vl, vr);
            if self.mesh.fixed_edges.contains(&crossed) {
                if !resolve {
                    // Keep the pre-existing constraint; remember that the
                    // attempted edge ran into it.
                    let mut list = self.mesh.originals_of(crossed);
                    for &o in &orig {
                        if !list.contains(&o) {
                            list.push(o);
                        }
                    }
                    self.mesh.piece_to_originals.insert(crossed, list);
                    return Ok(());
                }
                let x = self.resolve_crossing(v1, v2, t, vl, vr)?;
                tasks.push((v1, x, orig.clone()));
                tasks.push((x, v2, orig));
                return Ok(());
            }
            let t_next = self.mesh.neighbor_across(t, vl, vr);
            if t_next == NO_NEIGHBOR {
                return Err(TriangulationError::DegenerateCavity {
                    edge: Edge::new(v1, v2),
                });
            }
            let w = self.mesh.opposed_vertex(t_next, t);
            intersected.push(t_next);
            if w == v2 {
                poly_left.push(w);
                poly_right.push(w);
                end = w;
                break;
            }
            match orient2d(&p1, &p2, &self.mesh.vertices[w]) {
                Orientation::Collinear => {
                    // The segment passes exactly through w; finish this
                    // piece there and continue from it.
                    poly_left.push(w);
                    poly_right.push(w);
                    end = w;
                    break;
                }
                Orientation::Left => {
                    poly_left.push(w);
                    t = t_next;
                    vl = w;
                }
                Orientation::Right => {
                    poly_right.push(w);
                    t = t_next;
                    vr = w;
                }
            }
        }

        self.carve_and_retriangulate(v1, end, &intersected, &poly_left, &poly_right)?;
        self.mesh.fix_edge_with_originals(Edge::new(v1, end), &orig);
        if end != v2 {
            tasks.push((end, v2, orig));
        }
        Ok(())
    }

    /// Splits the fixed edge (vl, vr) of triangle `t` at its intersection
    /// with segment (v1, v2), returning the vertex the constraints now meet
    /// at. The point snaps to an existing endpoint closer than the
    /// configured minimum distance, or to a bit-identical existing vertex.
    fn resolve_crossing(
        &mut self,
        v1: VertInd,
        v2: VertInd,
        t: TriInd,
        vl: VertInd,
        vr: VertInd,
    ) -> Result<VertInd, TriangulationError> {
        let p1 = self.mesh.vertices[v1];
        let p2 = self.mesh.vertices[v2];
        let pl = self.mesh.vertices[vl];
        let pr = self.mesh.vertices[vr];
        let x = segment_intersection(&p1, &p2, &pl, &pr).ok_or(
            TriangulationError::DegenerateCavity {
                edge: Edge::new(v1, v2),
            },
        )?;
        if self.min_dist_to_constraint > 0.0 {
            if x.distance_to(&pl) < self.min_dist_to_constraint {
                return Ok(vl);
            }
            if x.distance_to(&pr) < self.min_dist_to_constraint {
                return Ok(vr);
            }
        }
        if let Some(&v) = self.dedup.get(&x.key()) {
            return Ok(v);
        }
        let t_opo = self.mesh.neighbor_across(t, vl, vr);
        let v = self.mesh.add_vertex(x, NO_NEIGHBOR);
        self.dedup.insert(x.key(), v);
        let tris = self.mesh.split_edge_at(t, t_opo, v);
        self.mesh.split_fixed_edge(Edge::new(vl, vr), v);
        self.restore_delaunay(v, &tris);
        self.last_inserted = v;
        Ok(v)
    }

    /// Deletes the crossed channel and retriangulates the two pseudo-polygon
    /// chains on either side of the new constraint edge (a, b), rewiring
    /// adjacency to the untouched triangles bordering the channel.
    fn carve_and_retriangulate(
        &mut self,
        a: VertInd,
        b: VertInd,
        intersected: &[TriInd],
        poly_left: &[VertInd],
        poly_right: &[VertInd],
    ) -> Result<(), TriangulationError> {
        let cavity: AHashSet<TriInd> = intersected.iter().copied().collect();
        let mut border: AHashMap<Edge, TriInd> = AHashMap::new();
        for &ti in intersected {
            let tri = self.mesh.triangles[ti];
            for s in 0..3 {
                let n = tri.neighbors[s];
                if n == NO_NEIGHBOR || !cavity.contains(&n) {
                    border.insert(
                        Edge::new(tri.vertices[ccw(s)], tri.vertices[cw(s)]),
                        n,
                    );
                }
            }
        }
        self.mesh.remove_triangles(intersected);

        let mut new_tris: Vec<TriInd> = Vec::with_capacity(intersected.len());
        self.triangulate_pseudopolygon(a, b, &poly_left[1..poly_left.len() - 1], &mut new_tris);
        let mut right: Vec<VertInd> = poly_right[1..poly_right.len() - 1].to_vec();
        right.reverse();
        self.triangulate_pseudopolygon(b, a, &right, &mut new_tris);

        let mut directed: AHashMap<(VertInd, VertInd), (TriInd, usize)> = AHashMap::new();
        for &nt in &new_tris {
            let tri = self.mesh.triangles[nt];
            for s in 0..3 {
                directed.insert((tri.vertices[ccw(s)], tri.vertices[cw(s)]), (nt, s));
            }
        }
        for (&(u, w), &(nt, s)) in &directed {
            if let Some(&(mt, _)) = directed.get(&(w, u)) {
                self.mesh.triangles[nt].neighbors[s] = mt;
            } else {
                let o = *border.get(&Edge::new(u, w)).ok_or(
                    TriangulationError::DegenerateCavity {
                        edge: Edge::new(a, b),
                    },
                )?;
                self.mesh.triangles[nt].neighbors[s] = o;
                if o != NO_NEIGHBOR {
                    self.mesh.set_neighbor_across(o, u, w, nt);
                }
            }
        }
        for &nt in &new_tris {
            let tri = self.mesh.triangles[nt];
            for &v in &tri.vertices {
                self.mesh.vert_tris[v] = nt;
            }
        }
        Ok(())
    }

    /// Triangulates the chain `pts`, all strictly left of the directed edge
    /// (a, b) and ordered from `a` to `b`, against that edge: the classic
    /// pseudo-polygon retriangulation, picking for each sub-edge the chain
    /// vertex whose circumcircle is empty of the others. Runs on an explicit
    /// stack to bound recursion on long channels.
    fn triangulate_pseudopolygon(
        &mut self,
        a: VertInd,
        b: VertInd,
        pts: &[VertInd],
        out: &mut Vec<TriInd>,
    ) {
        let mut stack: Vec<(VertInd, VertInd, usize, usize)> = vec![(a, b, 0, pts.len())];
        while let Some((va, vb, lo, hi)) = stack.pop() {
            if lo >= hi {
                continue;
            }
            let pa = self.mesh.vertices[va];
            let pb = self.mesh.vertices[vb];
            let mut best = lo;
            for j in lo + 1..hi {
                let pc = self.mesh.vertices[pts[best]];
                if in_circle(&pa, &pb, &pc, &self.mesh.vertices[pts[j]]) {
                    best = j;
                }
            }
            let c = pts[best];
            let nt = self
                .mesh
                .add_triangle(Triangle::new([va, vb, c], [NO_NEIGHBOR; 3]));
            out.push(nt);
            stack.push((va, c, lo, best));
            stack.push((c, vb, best + 1, hi));
        }
    }
}
