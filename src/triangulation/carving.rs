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

//! Boundary carving: removing the synthetic super-triangle, flood-filling
//! away everything outside the constrained boundary, and peeling hole
//! interiors by constraint-crossing depth.

use std::collections::VecDeque;

use ahash::AHashSet;

use crate::geometry::Edge;
use crate::mesh::{N_SUPER_TRIANGLE_VERTICES, NO_NEIGHBOR, TriInd, ccw, cw};
use crate::triangulation::{Triangulation, TriangulationError};

impl Triangulation {
    /// Removes every triangle touching a super-triangle corner and strips
    /// the three synthetic vertices, leaving the full Delaunay triangulation
    /// of the input (convex hull boundary). Finalizes the mesh: vertex
    /// indices shift down by three and no further insertion is possible.
    pub fn erase_super_triangle(&mut self) -> Result<(), TriangulationError> {
        if self.finalized {
            return Err(TriangulationError::SuperTriangleErased);
        }
        if self.mesh.vertices.is_empty() {
            self.finalized = true;
            return Ok(());
        }
        let to_remove: Vec<TriInd> = (0..self.mesh.triangles.len())
            .filter(|&t| {
                self.mesh.triangles[t]
                    .vertices
                    .iter()
                    .any(|&v| v < N_SUPER_TRIANGLE_VERTICES)
            })
            .collect();
        self.mesh.remove_triangles(&to_remove);
        self.finish_carve();
        Ok(())
    }

    /// Removes everything reachable from outside the constrained boundary
    /// without crossing a fixed edge, the super-triangle included. Without
    /// any constraints the whole mesh is outside and is removed. Calling
    /// again after finalization re-floods from exposed non-fixed boundary
    /// edges, so a second call is a no-op.
    pub fn erase_outer_triangles(&mut self) -> Result<(), TriangulationError> {
        if !self.finalized {
            if self.mesh.vertices.is_empty() {
                self.finalized = true;
                return Ok(());
            }
            let outer = self.flood_outer(&[self.mesh.vert_tris[0]]);
            self.mesh.remove_triangles(&outer);
            self.finish_carve();
        } else {
            let seeds = self.exposed_seeds();
            if seeds.is_empty() {
                return Ok(());
            }
            let outer = self.flood_outer(&seeds);
            self.mesh.remove_triangles(&outer);
            self.mesh.finalize_carve(false);
        }
        Ok(())
    }

    /// Like `erase_outer_triangles`, but additionally removes hole
    /// interiors: regions are ranked by how many constraint edges separate
    /// them from the outside, and every even-depth region (outside, holes,
    /// islands' holes, ...) is removed.
    pub fn erase_outer_triangles_and_holes(&mut self) -> Result<(), TriangulationError> {
        if !self.finalized {
            if self.mesh.vertices.is_empty() {
                self.finalized = true;
                return Ok(());
            }
            let depths = self.triangle_depths(&[self.mesh.vert_tris[0]]);
            self.remove_even_depths(&depths);
            self.finish_carve();
        } else {
            let seeds = self.exposed_seeds();
            if seeds.is_empty() {
                return Ok(());
            }
            let depths = self.triangle_depths(&seeds);
            self.remove_even_depths(&depths);
            self.mesh.finalize_carve(false);
        }
        Ok(())
    }

    fn finish_carve(&mut self) {
        self.mesh.finalize_carve(true);
        self.finalized = true;
        self.last_inserted = 0;
        self.dedup.clear();
    }

    /// Triangles with an unconstrained boundary edge; the outside seeds of
    /// an already finalized mesh.
    fn exposed_seeds(&self) -> Vec<TriInd> {
        (0..self.mesh.triangles.len())
            .filter(|&t| {
                let tri = &self.mesh.triangles[t];
                (0..3).any(|s| {
                    tri.neighbors[s] == NO_NEIGHBOR
                        && !self.mesh.fixed_edges.contains(&Edge::new(
                            tri.vertices[ccw(s)],
                            tri.vertices[cw(s)],
                        ))
                })
            })
            .collect()
    }

    /// Flood fill from `seeds` stopping at fixed edges.
    fn flood_outer(&self, seeds: &[TriInd]) -> Vec<TriInd> {
        let mut visited: AHashSet<TriInd> = seeds.iter().copied().collect();
        let mut queue: Vec<TriInd> = seeds.to_vec();
        let mut out = Vec::new();
        while let Some(t) = queue.pop() {
            out.push(t);
            let tri = self.mesh.triangles[t];
            for s in 0..3 {
                let n = tri.neighbors[s];
                if n == NO_NEIGHBOR || visited.contains(&n) {
                    continue;
                }
                let e = Edge::new(tri.vertices[ccw(s)], tri.vertices[cw(s)]);
                if self.mesh.fixed_edges.contains(&e) {
                    continue;
                }
                visited.insert(n);
                queue.push(n);
            }
        }
        out
    }

    /// Per-triangle constraint-crossing depth from the outside, by 0-1
    /// breadth-first search: free edges cost nothing, fixed edges cost one.
    /// Unreachable slots stay at `usize::MAX`.
    fn triangle_depths(&self, seeds: &[TriInd]) -> Vec<usize> {
        let mut depth = vec![usize::MAX; self.mesh.triangles.len()];
        let mut deque: VecDeque<TriInd> = VecDeque::new();
        for &s in seeds {
            depth[s] = 0;
            deque.push_back(s);
        }
        while let Some(t) = deque.pop_front() {
            let d = depth[t];
            let tri = self.mesh.triangles[t];
            for s in 0..3 {
                let n = tri.neighbors[s];
                if n == NO_NEIGHBOR {
                    continue;
                }
                let e = Edge::new(tri.vertices[ccw(s)], tri.vertices[cw(s)]);
                let fixed = self.mesh.fixed_edges.contains(&e);
                let nd = d + usize::from(fixed);
                if nd < depth[n] {
                    depth[n] = nd;
                    if fixed {
                        deque.push_back(n);
                    } else {
                        deque.push_front(n);
                    }
                }
            }
        }
        depth
    }

    fn remove_even_depths(&mut self, depths: &[usize]) {
        let to_remove: Vec<TriInd> = depths
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d != usize::MAX && d % 2 == 0)
            .map(|(t, _)| t)
            .collect();
        self.mesh.remove_triangles(&to_remove);
    }
}
