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

//! Exact-sign fallbacks for the geometric predicates. Every f64 converts to
//! a rational without loss, so the determinant signs computed here are exact.

use std::cmp::Ordering;

use rug::Rational;

use crate::geometry::point_2::Point2;

// Inputs are validated finite at the API boundary; a non-finite coordinate
// reaching the exact path is a bug, and treating it as 0 would silently
// corrupt the sign. Fail loudly instead.
#[inline]
fn rat(x: f64) -> Rational {
    Rational::from_f64(x).expect("non-finite coordinate in exact predicate")
}

/// Exact sign of the 2x2 orientation determinant:
/// `Greater` for counter-clockwise, `Less` for clockwise, `Equal` collinear.
pub fn orient2d_sign(a: &Point2, b: &Point2, c: &Point2) -> Ordering {
    let acx = rat(a.x) - rat(c.x);
    let acy = rat(a.y) - rat(c.y);
    let bcx = rat(b.x) - rat(c.x);
    let bcy = rat(b.y) - rat(c.y);
    let det = acx * bcy - acy * bcx;
    det.cmp0()
}

/// Exact sign of the in-circle determinant for the circle through (a, b, c)
/// and query point d. Positive when (a, b, c) is counter-clockwise and d is
/// strictly inside the circle.
pub fn incircle_sign(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> Ordering {
    let adx = rat(a.x) - rat(d.x);
    let ady = rat(a.y) - rat(d.y);
    let bdx = rat(b.x) - rat(d.x);
    let bdy = rat(b.y) - rat(d.y);
    let cdx = rat(c.x) - rat(d.x);
    let cdy = rat(c.y) - rat(d.y);

    let alift = Rational::from(&adx * &adx) + Rational::from(&ady * &ady);
    let blift = Rational::from(&bdx * &bdx) + Rational::from(&bdy * &bdy);
    let clift = Rational::from(&cdx * &cdx) + Rational::from(&cdy * &cdy);

    let ab = Rational::from(&adx * &bdy) - Rational::from(&ady * &bdx);
    let bc = Rational::from(&bdx * &cdy) - Rational::from(&bdy * &cdx);
    let ca = Rational::from(&cdx * &ady) - Rational::from(&cdy * &adx);

    let det = alift * bc + blift * ca + clift * ab;
    det.cmp0()
}
