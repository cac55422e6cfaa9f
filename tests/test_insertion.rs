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

use cdt2d::{
    IntersectingEdgesStrategy, Point2, Triangulation, TriangulationError, VertexInsertionOrder,
};

fn has_edge(t: &Triangulation, a: usize, b: usize) -> bool {
    t.triangles()
        .iter()
        .any(|tri| tri.vertices.contains(&a) && tri.vertices.contains(&b))
}

fn square() -> Vec<Point2> {
    vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ]
}

#[test]
fn test_insert_square() {
    let mut t = Triangulation::new();
    t.insert_vertices(&square()).unwrap();

    // Three synthetic corners plus the four inputs.
    assert_eq!(t.vertices().len(), 7);
    // Four interior points triangulating the bounding triangle.
    assert_eq!(t.triangles().len(), 9);
    assert!(t.verify_topology().is_empty());
}

#[test]
fn test_insert_empty_batch() {
    let mut t = Triangulation::new();
    t.insert_vertices(&[]).unwrap();
    assert!(t.vertices().is_empty());
    assert!(t.triangles().is_empty());
}

#[test]
fn test_insert_on_existing_edge_splits_it() {
    let mut t = Triangulation::new();
    t.insert_vertices(&[
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 2.0),
    ])
    .unwrap();
    // Internally the inputs are vertices 3, 4, 5.
    assert!(has_edge(&t, 3, 5));

    // Exactly on the segment between vertices 3 and 5.
    t.insert_vertices(&[Point2::new(1.0, 1.0)]).unwrap();
    assert_eq!(t.vertices().len(), 7);
    assert!(has_edge(&t, 3, 6));
    assert!(has_edge(&t, 6, 5));
    assert!(!has_edge(&t, 3, 5));
    assert!(t.verify_topology().is_empty());
}

#[test]
fn test_duplicate_vertex_rejected_without_mutation() {
    let mut t = Triangulation::new();
    t.insert_vertices(&square()).unwrap();
    let before = t.triangles().to_vec();

    let err = t
        .insert_vertices(&[Point2::new(0.5, 0.5), Point2::new(1.0, 1.0)])
        .unwrap_err();
    assert_eq!(err, TriangulationError::DuplicateVertex { index: 1 });
    assert_eq!(t.vertices().len(), 7);
    assert_eq!(t.triangles(), &before[..]);
}

#[test]
fn test_duplicate_within_batch_rejected() {
    let mut t = Triangulation::new();
    let err = t
        .insert_vertices(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 0.0),
        ])
        .unwrap_err();
    assert_eq!(err, TriangulationError::DuplicateVertex { index: 2 });
    assert!(t.vertices().is_empty());
}

#[test]
fn test_non_finite_coordinate_rejected() {
    let mut t = Triangulation::new();
    let err = t
        .insert_vertices(&[Point2::new(0.0, 0.0), Point2::new(f64::NAN, 1.0)])
        .unwrap_err();
    assert_eq!(err, TriangulationError::NonFiniteCoordinate { index: 1 });
    assert!(t.vertices().is_empty());

    let err = t
        .insert_vertices(&[Point2::new(f64::INFINITY, 0.0)])
        .unwrap_err();
    assert_eq!(err, TriangulationError::NonFiniteCoordinate { index: 0 });
}

#[test]
fn test_second_batch_outside_bounding_triangle_rejected() {
    let mut t = Triangulation::new();
    t.insert_vertices(&square()).unwrap();
    let err = t
        .insert_vertices(&[Point2::new(1.0e9, 0.0)])
        .unwrap_err();
    assert_eq!(err, TriangulationError::OutsideBoundingGeometry { index: 0 });
    assert_eq!(t.vertices().len(), 7);
}

#[test]
fn test_near_range_limit_batch_rejected_without_mutation() {
    // Extents this close to the f64 range cannot be enclosed by a finite
    // bounding triangle; the batch is rejected up front instead of the
    // synthetic corners overflowing into the predicates.
    let big = 1.0e308;
    let mut t = Triangulation::new();
    let err = t
        .insert_vertices(&[
            Point2::new(0.0, 0.0),
            Point2::new(big, 0.0),
            Point2::new(big, big),
            Point2::new(0.0, big),
        ])
        .unwrap_err();
    assert!(matches!(
        err,
        TriangulationError::OutsideBoundingGeometry { .. }
    ));
    assert!(t.vertices().is_empty());
    assert!(t.triangles().is_empty());
}

#[test]
fn test_second_batch_inside_is_fine() {
    let mut t = Triangulation::new();
    t.insert_vertices(&square()).unwrap();
    t.insert_vertices(&[Point2::new(0.25, 0.25)]).unwrap();
    assert_eq!(t.vertices().len(), 8);
    assert!(t.verify_topology().is_empty());
}

#[test]
fn test_insert_after_carving_fails() {
    let mut t = Triangulation::new();
    t.insert_vertices(&square()).unwrap();
    t.erase_super_triangle().unwrap();
    let err = t.insert_vertices(&[Point2::new(0.5, 0.5)]).unwrap_err();
    assert_eq!(err, TriangulationError::SuperTriangleErased);
}

#[test]
fn test_randomized_order_preserves_indices() {
    let mut pts = Vec::new();
    for i in 0..6 {
        for j in 0..6 {
            pts.push(Point2::new(
                i as f64 + 0.013 * j as f64,
                j as f64 + 0.007 * (i * i) as f64,
            ));
        }
    }

    let mut t = Triangulation::with_config(
        VertexInsertionOrder::Randomized,
        IntersectingEdgesStrategy::Ignore,
        0.0,
    );
    t.insert_vertices(&pts).unwrap();
    assert!(t.verify_topology().is_empty());

    // Stored order follows the caller regardless of processing order.
    for (i, p) in pts.iter().enumerate() {
        assert_eq!(t.vertices()[3 + i], *p);
    }

    t.erase_super_triangle().unwrap();
    assert!(t.verify_topology().is_empty());
    for (i, p) in pts.iter().enumerate() {
        assert_eq!(t.vertices()[i], *p);
    }
}
