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

//! Orientation and in-circle tests. Each predicate evaluates the determinant
//! in double precision first and accepts the result when its magnitude clears
//! a static error bound; otherwise the sign is recomputed exactly in rational
//! arithmetic. Wrong signs on nearly-degenerate inputs are the dominant
//! source of broken triangulation topology, so no caller bypasses this path.

use std::cmp::Ordering;

use crate::geometry::point_2::Point2;
use crate::kernel::exact;

// Half-ulp of 1.0; the static filter constants follow Shewchuk's bounds for
// the A-stage estimates.
const EPS: f64 = f64::EPSILON * 0.5;
const CCW_ERR_BOUND: f64 = (3.0 + 16.0 * EPS) * EPS;
const ICC_ERR_BOUND: f64 = (10.0 + 96.0 * EPS) * EPS;

/// Placement of point `c` relative to the directed line a -> b.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Counter-clockwise turn.
    Left,
    /// Clockwise turn.
    Right,
    Collinear,
}

/// Orientation of `c` against the directed line a -> b, exact for all
/// finite inputs.
pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> Orientation {
    let detleft = (a.x - c.x) * (b.y - c.y);
    let detright = (a.y - c.y) * (b.x - c.x);
    let det = detleft - detright;

    let detsum = detleft.abs() + detright.abs();
    if det.abs() > CCW_ERR_BOUND * detsum {
        return if det > 0.0 {
            Orientation::Left
        } else {
            Orientation::Right
        };
    }

    match exact::orient2d_sign(a, b, c) {
        Ordering::Greater => Orientation::Left,
        Ordering::Less => Orientation::Right,
        Ordering::Equal => Orientation::Collinear,
    }
}

/// Whether `d` lies strictly inside the circle through `a`, `b`, `c`.
/// The triplet (a, b, c) must wind counter-clockwise; points on the circle
/// are reported as outside.
pub fn in_circle(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
    let adx = a.x - d.x;
    let ady = a.y - d.y;
    let bdx = b.x - d.x;
    let bdy = b.y - d.y;
    let cdx = c.x - d.x;
    let cdy = c.y - d.y;

    let bdxcdy = bdx * cdy;
    let cdxbdy = cdx * bdy;
    let alift = adx * adx + ady * ady;

    let cdxady = cdx * ady;
    let adxcdy = adx * cdy;
    let blift = bdx * bdx + bdy * bdy;

    let adxbdy = adx * bdy;
    let bdxady = bdx * ady;
    let clift = cdx * cdx + cdy * cdy;

    let det = alift * (bdxcdy - cdxbdy) + blift * (cdxady - adxcdy) + clift * (adxbdy - bdxady);

    let permanent = (bdxcdy.abs() + cdxbdy.abs()) * alift
        + (cdxady.abs() + adxcdy.abs()) * blift
        + (adxbdy.abs() + bdxady.abs()) * clift;
    if det.abs() > ICC_ERR_BOUND * permanent {
        return det > 0.0;
    }

    exact::incircle_sign(a, b, c, d) == Ordering::Greater
}

/// Whether `p`, already known to be collinear with segment (a, b), lies
/// strictly between its endpoints. Compares along the dominant axis so
/// vertical segments are handled the same as horizontal ones.
pub fn between_collinear(a: &Point2, b: &Point2, p: &Point2) -> bool {
    if (b.x - a.x).abs() >= (b.y - a.y).abs() {
        if a.x < b.x {
            a.x < p.x && p.x < b.x
        } else {
            b.x < p.x && p.x < a.x
        }
    } else if a.y < b.y {
        a.y < p.y && p.y < b.y
    } else {
        b.y < p.y && p.y < a.y
    }
}
