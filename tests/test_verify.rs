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

use cdt2d::{Edge, NO_NEIGHBOR, Point2, TopologyViolation, TriMesh, Triangle, verify_topology};

/// Two well-formed triangles sharing the diagonal (0, 2) of a unit square.
fn square_mesh() -> TriMesh {
    let mut mesh = TriMesh::new();
    mesh.vertices = vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ];
    mesh.triangles = vec![
        Triangle::new([0, 1, 2], [NO_NEIGHBOR, 1, NO_NEIGHBOR]),
        Triangle::new([0, 2, 3], [NO_NEIGHBOR, NO_NEIGHBOR, 0]),
    ];
    mesh.vert_tris = vec![0, 0, 0, 1];
    mesh
}

#[test]
fn test_valid_mesh_has_no_violations() {
    assert!(verify_topology(&square_mesh(), false).is_empty());
}

#[test]
fn test_asymmetric_neighbor() {
    let mut mesh = square_mesh();
    mesh.triangles[1].neighbors[2] = NO_NEIGHBOR;
    let violations = verify_topology(&mesh, false);
    assert!(violations.contains(&TopologyViolation::AsymmetricNeighbor { tri: 0, neighbor: 1 }));
}

#[test]
fn test_neighbor_sharing_no_edge() {
    let mut mesh = square_mesh();
    // Both point at each other, but across unrelated edges.
    mesh.triangles[0].neighbors = [1, NO_NEIGHBOR, NO_NEIGHBOR];
    mesh.triangles[1].neighbors = [NO_NEIGHBOR, 0, NO_NEIGHBOR];
    let violations = verify_topology(&mesh, false);
    assert!(violations.contains(&TopologyViolation::AsymmetricNeighbor { tri: 0, neighbor: 1 }));
}

#[test]
fn test_clockwise_triangle() {
    let mut mesh = square_mesh();
    mesh.triangles[0].vertices = [0, 2, 1];
    let violations = verify_topology(&mesh, false);
    assert!(violations.contains(&TopologyViolation::DegenerateTriangle { tri: 0 }));
}

#[test]
fn test_collinear_triangle() {
    let mut mesh = square_mesh();
    mesh.vertices[1] = Point2::new(0.5, 0.5);
    let violations = verify_topology(&mesh, false);
    assert!(violations.contains(&TopologyViolation::DegenerateTriangle { tri: 0 }));
}

#[test]
fn test_bad_vertex_triangle_index() {
    let mut mesh = square_mesh();
    mesh.vert_tris[3] = 0;
    let violations = verify_topology(&mesh, false);
    assert_eq!(
        violations,
        vec![TopologyViolation::BadVertexTriangle { vertex: 3 }]
    );
}

#[test]
fn test_orphan_vertex_only_legal_after_finalization() {
    let mut mesh = square_mesh();
    mesh.vertices.push(Point2::new(0.25, 0.25));
    mesh.vert_tris.push(NO_NEIGHBOR);
    assert!(verify_topology(&mesh, false).is_empty());
    assert!(
        verify_topology(&mesh, true)
            .contains(&TopologyViolation::BadVertexTriangle { vertex: 4 })
    );
}

#[test]
fn test_missing_fixed_edge() {
    let mut mesh = square_mesh();
    mesh.fixed_edges.insert(Edge::new(1, 3));
    let violations = verify_topology(&mesh, false);
    assert_eq!(
        violations,
        vec![TopologyViolation::MissingFixedEdge { edge: Edge::new(1, 3) }]
    );
}

fn bad_quad_mesh() -> TriMesh {
    // Vertex 3 lies inside the circumcircle of triangle 0, so the shared
    // diagonal (0, 2) is not locally Delaunay.
    let mut mesh = TriMesh::new();
    mesh.vertices = vec![
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 2.0),
        Point2::new(0.1, 1.9),
    ];
    mesh.triangles = vec![
        Triangle::new([0, 1, 2], [NO_NEIGHBOR, 1, NO_NEIGHBOR]),
        Triangle::new([0, 2, 3], [NO_NEIGHBOR, NO_NEIGHBOR, 0]),
    ];
    mesh.vert_tris = vec![0, 0, 0, 1];
    mesh
}

#[test]
fn test_delaunay_violation() {
    let mesh = bad_quad_mesh();
    let violations = verify_topology(&mesh, false);
    assert_eq!(
        violations,
        vec![TopologyViolation::DelaunayViolation { tri: 0, neighbor: 1 }]
    );
}

#[test]
fn test_fixed_edge_exempt_from_delaunay() {
    let mut mesh = bad_quad_mesh();
    mesh.fixed_edges.insert(Edge::new(0, 2));
    assert!(verify_topology(&mesh, false).is_empty());
}

#[test]
fn test_super_quad_exempt_from_delaunay() {
    // With synthetic corners present, quads touching vertices 0..3 are
    // excluded from the in-circle check.
    let violations = verify_topology(&bad_quad_mesh(), true);
    assert!(
        !violations
            .iter()
            .any(|v| matches!(v, TopologyViolation::DelaunayViolation { .. }))
    );
}

#[test]
fn test_cocircular_quad_is_fine() {
    assert!(verify_topology(&square_mesh(), false).is_empty());
}
