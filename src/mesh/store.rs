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

//! The mesh store: vertex and triangle arrays with adjacency, the
//! vertex-to-incident-triangle index, and the constrained-edge registry.
//! All structural edits (flips, splits, cavity removal) are applied here so
//! that adjacency symmetry and the incident-triangle index stay consistent;
//! deciding *when* to apply them is the insertion and constraint engines'
//! job.

use ahash::{AHashMap, AHashSet};
use smallvec::{SmallVec, smallvec};

use crate::geometry::{Edge, Point2};
use crate::mesh::basic_types::{
    N_SUPER_TRIANGLE_VERTICES, NO_NEIGHBOR, NO_VERTEX, TriInd, Triangle, VertInd, ccw, cw,
};

/// Set of original constraint edges a piece edge was derived from.
pub type OriginalEdges = SmallVec<[Edge; 2]>;

#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    pub vertices: Vec<Point2>,
    pub triangles: Vec<Triangle>,
    /// One incident triangle per vertex, enough to seed walks around it.
    pub vert_tris: Vec<TriInd>,
    /// Edges that the triangulation is forced to contain.
    pub fixed_edges: AHashSet<Edge>,
    /// How many original input edges collapsed onto each fixed edge (>= 1).
    pub overlap_count: AHashMap<Edge, u32>,
    /// For edges produced by splitting, the original edges they derive from.
    pub piece_to_originals: AHashMap<Edge, OriginalEdges>,
    /// Recycled triangle slots awaiting compaction.
    dummies: Vec<TriInd>,
}

impl TriMesh {
    pub fn new() -> Self {
        TriMesh::default()
    }

    pub fn add_vertex(&mut self, p: Point2, tri: TriInd) -> VertInd {
        let v = self.vertices.len();
        self.vertices.push(p);
        self.vert_tris.push(tri);
        v
    }

    /// Appends a triangle, reusing a recycled slot when one is available.
    pub fn add_triangle(&mut self, t: Triangle) -> TriInd {
        match self.dummies.pop() {
            Some(i) => {
                self.triangles[i] = t;
                i
            }
            None => {
                let i = self.triangles.len();
                self.triangles.push(t);
                i
            }
        }
    }

    /// Marks triangles as removed; their slots are recycled by
    /// `add_triangle` and finally dropped by `compact_dummies`.
    pub fn remove_triangles(&mut self, tris: &[TriInd]) {
        for &t in tris {
            self.triangles[t] = Triangle::new([NO_VERTEX; 3], [NO_NEIGHBOR; 3]);
            self.dummies.push(t);
        }
    }

    #[inline]
    pub fn is_removed(&self, t: TriInd) -> bool {
        self.triangles[t].vertices[0] == NO_VERTEX
    }

    /// Drops recycled slots and renumbers surviving triangles. No adjacency
    /// link or incident-triangle entry may reference a recycled slot when
    /// this is called.
    pub fn compact_dummies(&mut self) {
        if self.dummies.is_empty() {
            return;
        }
        let mut map = vec![NO_NEIGHBOR; self.triangles.len()];
        let mut kept = Vec::with_capacity(self.triangles.len() - self.dummies.len());
        for (i, t) in self.triangles.iter().enumerate() {
            if t.vertices[0] != NO_VERTEX {
                map[i] = kept.len();
                kept.push(*t);
            }
        }
        for t in &mut kept {
            for n in &mut t.neighbors {
                if *n != NO_NEIGHBOR {
                    *n = map[*n];
                }
            }
        }
        for vt in &mut self.vert_tris {
            if *vt != NO_NEIGHBOR {
                *vt = map[*vt];
            }
        }
        self.triangles = kept;
        self.dummies.clear();
    }

    /// Neighbor of `t` across the undirected edge (a, b).
    #[inline]
    pub fn neighbor_across(&self, t: TriInd, a: VertInd, b: VertInd) -> TriInd {
        let tri = &self.triangles[t];
        tri.neighbors[tri.edge_slot(a, b)]
    }

    /// Points `t`'s slot across edge (a, b) at `n`.
    #[inline]
    pub fn set_neighbor_across(&mut self, t: TriInd, a: VertInd, b: VertInd, n: TriInd) {
        let slot = self.triangles[t].edge_slot(a, b);
        self.triangles[t].neighbors[slot] = n;
    }

    /// Re-targets the adjacency slot of `t` that pointed at `old` to `new`.
    #[inline]
    pub fn change_neighbor(&mut self, t: TriInd, old: TriInd, new: TriInd) {
        if t == NO_NEIGHBOR {
            return;
        }
        if let Some(slot) = self.triangles[t].neighbor_slot(old) {
            self.triangles[t].neighbors[slot] = new;
        }
    }

    /// Vertex of `t_opo` opposite its shared edge with `t`.
    #[inline]
    pub fn opposed_vertex(&self, t_opo: TriInd, t: TriInd) -> VertInd {
        let tri = &self.triangles[t_opo];
        let slot = tri
            .neighbor_slot(t)
            .expect("opposed_vertex of non-adjacent triangles");
        tri.vertices[slot]
    }

    /// All triangles incident to `v`, walking the fan in both directions so
    /// boundary vertices are covered too.
    pub fn triangles_around(&self, v: VertInd) -> SmallVec<[TriInd; 16]> {
        let start = self.vert_tris[v];
        debug_assert!(start != NO_NEIGHBOR);
        let mut out: SmallVec<[TriInd; 16]> = smallvec![start];
        let mut t = start;
        loop {
            let tri = &self.triangles[t];
            let next = tri.neighbors[ccw(tri.vertex_slot(v))];
            if next == start {
                return out;
            }
            if next == NO_NEIGHBOR {
                break;
            }
            out.push(next);
            t = next;
        }
        t = start;
        loop {
            let tri = &self.triangles[t];
            let prev = tri.neighbors[cw(tri.vertex_slot(v))];
            if prev == NO_NEIGHBOR {
                return out;
            }
            out.push(prev);
            t = prev;
        }
    }

    /// Whether (a, b) is an edge of some triangle incident to `a`.
    pub fn has_edge(&self, a: VertInd, b: VertInd) -> bool {
        self.triangles_around(a)
            .iter()
            .any(|&t| self.triangles[t].contains_vertex(b))
    }

    /// Flips the edge shared by `t` and `t_opo`. With `v` the vertex of `t`
    /// opposite the shared edge and `c` its counterpart in `t_opo`, the edge
    /// is replaced by (v, c); both output triangles contain `v`.
    pub fn flip_edge(&mut self, t: TriInd, t_opo: TriInd) {
        let tri = self.triangles[t];
        let i = tri
            .neighbor_slot(t_opo)
            .expect("flip_edge of non-adjacent triangles");
        let v = tri.vertices[i];
        let a = tri.vertices[ccw(i)];
        let b = tri.vertices[cw(i)];

        let opo = self.triangles[t_opo];
        let j = opo.neighbor_slot(t).expect("asymmetric adjacency");
        let c = opo.vertices[j];

        let n_outer_ac = opo.neighbors[ccw(j)]; // across (a, c), opposite b
        let n_outer_cb = opo.neighbors[cw(j)]; // across (c, b), opposite a
        let n_outer_va = tri.neighbors[cw(i)]; // across (v, a), opposite b
        let n_outer_vb = tri.neighbors[ccw(i)]; // across (v, b), opposite a

        self.triangles[t] = Triangle::new([v, a, c], [n_outer_ac, t_opo, n_outer_va]);
        self.triangles[t_opo] = Triangle::new([v, c, b], [n_outer_cb, n_outer_vb, t]);

        self.change_neighbor(n_outer_ac, t_opo, t);
        self.change_neighbor(n_outer_vb, t, t_opo);

        self.vert_tris[v] = t;
        self.vert_tris[a] = t;
        self.vert_tris[c] = t_opo;
        self.vert_tris[b] = t_opo;
    }

    /// Splits triangle `t` into three at interior vertex `v`; returns the
    /// three resulting triangles (the slot of `t` is reused).
    pub fn split_triangle_at(&mut self, t: TriInd, v: VertInd) -> [TriInd; 3] {
        let tri = self.triangles[t];
        let [v0, v1, v2] = tri.vertices;
        let [n0, n1, n2] = tri.neighbors;

        let t1 = self.add_triangle(Triangle::new([v, v2, v0], [n1, NO_NEIGHBOR, t]));
        let t2 = self.add_triangle(Triangle::new([v, v0, v1], [n2, t, t1]));
        self.triangles[t1].neighbors[1] = t2;
        self.triangles[t] = Triangle::new([v, v1, v2], [n0, t1, t2]);

        self.change_neighbor(n1, t, t1);
        self.change_neighbor(n2, t, t2);

        self.vert_tris[v] = t;
        self.vert_tris[v0] = t1;
        self.vert_tris[v1] = t2;
        self.vert_tris[v2] = t;
        [t, t1, t2]
    }

    /// Splits the edge shared by `t` and `t_opo` at vertex `v`, producing
    /// four triangles. The caller is responsible for registry updates when
    /// the split edge was fixed.
    pub fn split_edge_at(&mut self, t: TriInd, t_opo: TriInd, v: VertInd) -> [TriInd; 4] {
        let tri = self.triangles[t];
        let i = tri
            .neighbor_slot(t_opo)
            .expect("split_edge_at of non-adjacent triangles");
        let p = tri.vertices[i];
        let a = tri.vertices[ccw(i)];
        let b = tri.vertices[cw(i)];

        let opo = self.triangles[t_opo];
        let j = opo.neighbor_slot(t).expect("asymmetric adjacency");
        let q = opo.vertices[j];

        let n_a = tri.neighbors[ccw(i)]; // across (p, b), opposite a
        let n_b = tri.neighbors[cw(i)]; // across (p, a), opposite b
        let m_a = opo.neighbors[cw(j)]; // across (q, b), opposite a
        let m_b = opo.neighbors[ccw(j)]; // across (a, q), opposite b

        let t1 = self.add_triangle(Triangle::new([p, v, b], [t_opo, n_a, t]));
        let t2 = self.add_triangle(Triangle::new([q, v, a], [t, m_b, t_opo]));
        self.triangles[t] = Triangle::new([p, a, v], [t2, t1, n_b]);
        self.triangles[t_opo] = Triangle::new([q, b, v], [t1, t2, m_a]);

        self.change_neighbor(n_a, t, t1);
        self.change_neighbor(m_b, t_opo, t2);

        self.vert_tris[v] = t;
        self.vert_tris[p] = t;
        self.vert_tris[a] = t;
        self.vert_tris[b] = t1;
        self.vert_tris[q] = t_opo;
        [t, t1, t_opo, t2]
    }

    /// Marks `e` as a constraint with itself as origin.
    pub fn fix_edge(&mut self, e: Edge) {
        self.fix_edge_with_originals(e, &[e]);
    }

    /// Marks `e` as a constraint derived from `originals`. Re-fixing an
    /// already fixed edge bumps its overlap count by one.
    pub fn fix_edge_with_originals(&mut self, e: Edge, originals: &[Edge]) {
        if self.fixed_edges.insert(e) {
            self.overlap_count.insert(e, 1);
        } else {
            *self.overlap_count.entry(e).or_insert(1) += 1;
        }
        if originals.len() != 1 || originals[0] != e {
            let list = self.piece_to_originals.entry(e).or_default();
            for &o in originals {
                if !list.contains(&o) {
                    list.push(o);
                }
            }
        }
    }

    /// Originals behind a piece edge, falling back to the edge itself.
    pub fn originals_of(&self, e: Edge) -> OriginalEdges {
        self.piece_to_originals
            .get(&e)
            .cloned()
            .unwrap_or_else(|| smallvec![e])
    }

    /// Finalizes a carving pass: drops removed triangle slots, renumbers the
    /// survivors, and rebuilds the incident-triangle index. With
    /// `strip_super` the three synthetic vertices are deleted and every
    /// vertex reference shifts down accordingly, including the keys and
    /// origin sets of the constraint registry. Registry entries whose edge
    /// no longer appears in any surviving triangle are dropped.
    pub fn finalize_carve(&mut self, strip_super: bool) {
        let offset = if strip_super {
            N_SUPER_TRIANGLE_VERTICES
        } else {
            0
        };

        let mut map = vec![NO_NEIGHBOR; self.triangles.len()];
        let mut kept: Vec<Triangle> = Vec::new();
        for (i, t) in self.triangles.iter().enumerate() {
            if t.vertices[0] != NO_VERTEX {
                map[i] = kept.len();
                kept.push(*t);
            }
        }
        for t in &mut kept {
            for v in &mut t.vertices {
                *v -= offset;
            }
            for n in &mut t.neighbors {
                if *n != NO_NEIGHBOR {
                    *n = map[*n];
                }
            }
        }
        self.triangles = kept;
        self.dummies.clear();
        if strip_super {
            self.vertices.drain(0..offset);
        }

        self.vert_tris = vec![NO_NEIGHBOR; self.vertices.len()];
        let mut surviving: AHashSet<Edge> = AHashSet::new();
        for (i, t) in self.triangles.iter().enumerate() {
            for s in 0..3 {
                self.vert_tris[t.vertices[s]] = i;
                surviving.insert(Edge::new(t.vertices[ccw(s)], t.vertices[cw(s)]));
            }
        }

        let shift = |e: Edge| e.map(|v| v - offset);
        self.fixed_edges = std::mem::take(&mut self.fixed_edges)
            .into_iter()
            .map(shift)
            .filter(|e| surviving.contains(e))
            .collect();
        self.overlap_count = std::mem::take(&mut self.overlap_count)
            .into_iter()
            .map(|(e, c)| (shift(e), c))
            .filter(|(e, _)| surviving.contains(e))
            .collect();
        self.piece_to_originals = std::mem::take(&mut self.piece_to_originals)
            .into_iter()
            .map(|(e, originals)| (shift(e), originals.iter().map(|&o| shift(o)).collect()))
            .filter(|(e, _)| surviving.contains(e))
            .collect();
    }

    /// Replaces fixed edge `e` by the two pieces meeting at `v`, carrying
    /// over its overlap count and origin set.
    pub fn split_fixed_edge(&mut self, e: Edge, v: VertInd) {
        debug_assert!(self.fixed_edges.contains(&e));
        let originals = self.originals_of(e);
        let count = self.overlap_count.remove(&e).unwrap_or(1);
        self.fixed_edges.remove(&e);
        self.piece_to_originals.remove(&e);

        for half in [Edge::new(e.v1(), v), Edge::new(v, e.v2())] {
            self.fixed_edges.insert(half);
            self.overlap_count.insert(half, count);
            self.piece_to_originals.insert(half, originals.clone());
        }
    }
}
