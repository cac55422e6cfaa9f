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

use cdt2d::{NO_NEIGHBOR, Point2, Triangulation, TriangulationError};

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2> {
    vec![
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ]
}

fn boundary(offset: usize) -> Vec<(usize, usize)> {
    (0..4).map(|i| (offset + i, offset + (i + 1) % 4)).collect()
}

fn centroid(t: &Triangulation, tri: usize) -> Point2 {
    let [a, b, c] = t.triangles()[tri].vertices;
    let (pa, pb, pc) = (t.vertices()[a], t.vertices()[b], t.vertices()[c]);
    Point2::new((pa.x + pb.x + pc.x) / 3.0, (pa.y + pb.y + pc.y) / 3.0)
}

#[test]
fn test_erase_super_keeps_hull() {
    let mut t = Triangulation::new();
    t.insert_vertices(&square(0.0, 0.0, 1.0, 1.0)).unwrap();
    t.erase_super_triangle().unwrap();

    assert_eq!(t.vertices().len(), 4);
    assert_eq!(t.triangles().len(), 2);
    assert!(t.is_finalized());
    assert!(t.verify_topology().is_empty());
}

#[test]
fn test_erase_super_twice_fails() {
    let mut t = Triangulation::new();
    t.insert_vertices(&square(0.0, 0.0, 1.0, 1.0)).unwrap();
    t.erase_super_triangle().unwrap();
    assert_eq!(
        t.erase_super_triangle().unwrap_err(),
        TriangulationError::SuperTriangleErased
    );
}

#[test]
fn test_erase_outer_is_idempotent() {
    let mut t = Triangulation::new();
    t.insert_vertices(&square(0.0, 0.0, 1.0, 1.0)).unwrap();
    t.insert_edges(&boundary(0)).unwrap();
    t.erase_outer_triangles().unwrap();

    assert_eq!(t.vertices().len(), 4);
    assert_eq!(t.triangles().len(), 2);
    assert_eq!(t.fixed_edges().len(), 4);
    assert!(t.verify_topology().is_empty());

    // Everything outside is already gone; fixed boundary stops the flood.
    t.erase_outer_triangles().unwrap();
    assert_eq!(t.triangles().len(), 2);
    assert!(t.verify_topology().is_empty());
}

#[test]
fn test_erase_outer_without_constraints_removes_all() {
    let mut t = Triangulation::new();
    t.insert_vertices(&square(0.0, 0.0, 1.0, 1.0)).unwrap();
    t.erase_outer_triangles().unwrap();

    assert!(t.triangles().is_empty());
    assert_eq!(t.vertices().len(), 4);
    assert!(t.vertex_triangles().iter().all(|&vt| vt == NO_NEIGHBOR));
    assert!(t.verify_topology().is_empty());
}

#[test]
fn test_erase_outer_keeps_hole_interior() {
    let mut t = Triangulation::new();
    let mut pts = square(0.0, 0.0, 10.0, 10.0);
    pts.extend(square(4.0, 4.0, 6.0, 6.0));
    t.insert_vertices(&pts).unwrap();
    t.insert_edges(&boundary(0)).unwrap();
    t.insert_edges(&boundary(4)).unwrap();
    t.erase_outer_triangles().unwrap();

    // Annulus plus the two triangles inside the inner square.
    assert_eq!(t.triangles().len(), 10);
    assert!(t.verify_topology().is_empty());
}

#[test]
fn test_erase_outer_and_holes() {
    let mut t = Triangulation::new();
    let mut pts = square(0.0, 0.0, 10.0, 10.0);
    pts.extend(square(4.0, 4.0, 6.0, 6.0));
    t.insert_vertices(&pts).unwrap();
    t.insert_edges(&boundary(0)).unwrap();
    t.insert_edges(&boundary(4)).unwrap();
    t.erase_outer_triangles_and_holes().unwrap();

    assert_eq!(t.vertices().len(), 8);
    assert_eq!(t.triangles().len(), 8);
    for i in 0..t.triangles().len() {
        let c = centroid(&t, i);
        assert!(c.x >= 0.0 && c.x <= 10.0 && c.y >= 0.0 && c.y <= 10.0);
        let in_hole = c.x > 4.0 && c.x < 6.0 && c.y > 4.0 && c.y < 6.0;
        assert!(!in_hole, "triangle {i} lies inside the hole");
    }
    assert_eq!(t.fixed_edges().len(), 8);
    assert!(t.verify_topology().is_empty());

    // A second pass finds no exposed unconstrained boundary.
    t.erase_outer_triangles_and_holes().unwrap();
    assert_eq!(t.triangles().len(), 8);
}

#[test]
fn test_carving_empty_triangulation() {
    let mut t = Triangulation::new();
    t.erase_super_triangle().unwrap();
    assert!(t.is_finalized());
    assert!(t.triangles().is_empty());

    let mut t = Triangulation::new();
    t.erase_outer_triangles().unwrap();
    assert!(t.is_finalized());
}
