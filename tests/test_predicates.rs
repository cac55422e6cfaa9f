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

use cdt2d::geometry::segment_intersection;
use cdt2d::kernel::{Orientation, between_collinear, in_circle, orient2d};
use cdt2d::{Edge, Point2};

#[test]
fn test_orientation_basic() {
    let a = Point2::new(0.0, 0.0);
    let b = Point2::new(1.0, 0.0);
    assert_eq!(orient2d(&a, &b, &Point2::new(0.5, 1.0)), Orientation::Left);
    assert_eq!(orient2d(&a, &b, &Point2::new(0.5, -1.0)), Orientation::Right);
    assert_eq!(orient2d(&a, &b, &Point2::new(2.0, 0.0)), Orientation::Collinear);
}

#[test]
fn test_orientation_exact_on_large_coordinates() {
    // The determinant terms dwarf f64 precision; only the exact fallback
    // can tell these three points are collinear.
    let v = 1.0e17;
    let a = Point2::new(0.0, 0.0);
    let b = Point2::new(v, v);
    let c = Point2::new(2.0 * v, 2.0 * v);
    assert_eq!(orient2d(&a, &b, &c), Orientation::Collinear);
    assert_eq!(
        orient2d(&a, &b, &Point2::new(2.0 * v, 2.0 * v + 4.0)),
        Orientation::Left
    );
}

#[test]
fn test_in_circle_strict() {
    let a = Point2::new(0.0, 0.0);
    let b = Point2::new(1.0, 0.0);
    let c = Point2::new(1.0, 1.0);
    assert!(in_circle(&a, &b, &c, &Point2::new(0.9, 0.5)));
    assert!(!in_circle(&a, &b, &c, &Point2::new(2.0, 2.0)));
    // The fourth corner of the unit square is exactly cocircular.
    assert!(!in_circle(&a, &b, &c, &Point2::new(0.0, 1.0)));
}

#[test]
fn test_between_collinear_excludes_endpoints() {
    let a = Point2::new(0.0, 0.0);
    let b = Point2::new(4.0, 4.0);
    assert!(between_collinear(&a, &b, &Point2::new(1.0, 1.0)));
    assert!(!between_collinear(&a, &b, &a));
    assert!(!between_collinear(&a, &b, &b));
    assert!(!between_collinear(&a, &b, &Point2::new(5.0, 5.0)));
}

#[test]
fn test_segment_intersection_crossing() {
    let x = segment_intersection(
        &Point2::new(0.0, 0.0),
        &Point2::new(2.0, 2.0),
        &Point2::new(2.0, 0.0),
        &Point2::new(0.0, 2.0),
    );
    assert_eq!(x, Some(Point2::new(1.0, 1.0)));
}

#[test]
fn test_segment_intersection_parallel() {
    let x = segment_intersection(
        &Point2::new(0.0, 0.0),
        &Point2::new(1.0, 0.0),
        &Point2::new(0.0, 1.0),
        &Point2::new(1.0, 1.0),
    );
    assert_eq!(x, None);
}

#[test]
fn test_edge_is_canonical() {
    assert_eq!(Edge::new(5, 2), Edge::new(2, 5));
    assert_eq!(Edge::new(5, 2).v1(), 2);
    assert_eq!(Edge::new(5, 2).v2(), 5);
    assert!(Edge::new(5, 2).has(5));
    assert!(!Edge::new(5, 2).has(3));
    assert_eq!(Edge::new(5, 2).map(|v| v + 1), Edge::new(3, 6));
}
