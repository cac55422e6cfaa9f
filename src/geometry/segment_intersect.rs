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

use rug::Rational;

use crate::geometry::point_2::Point2;

// Inputs are validated finite at the API boundary; a non-finite coordinate
// reaching the exact path is a bug, and treating it as 0 would silently
// corrupt the intersection. Fail loudly instead.
#[inline]
fn rat(x: f64) -> Rational {
    Rational::from_f64(x).expect("non-finite coordinate in exact intersection")
}

/// Intersection position of the lines carrying segments (p1, p2) and
/// (p3, p4), computed in exact rational arithmetic and rounded once to f64.
/// Returns `None` for parallel or degenerate segments.
///
/// Callers have already established via orientation tests that the segments
/// properly cross, so the line intersection is the segment intersection.
pub fn segment_intersection(p1: &Point2, p2: &Point2, p3: &Point2, p4: &Point2) -> Option<Point2> {
    let (x1, y1) = (rat(p1.x), rat(p1.y));
    let (x2, y2) = (rat(p2.x), rat(p2.y));
    let (x3, y3) = (rat(p3.x), rat(p3.y));
    let (x4, y4) = (rat(p4.x), rat(p4.y));

    let dx12 = Rational::from(&x2 - &x1);
    let dy12 = Rational::from(&y2 - &y1);
    let dx34 = Rational::from(&x4 - &x3);
    let dy34 = Rational::from(&y4 - &y3);

    let denom = Rational::from(&dx12 * &dy34) - Rational::from(&dy12 * &dx34);
    if denom == 0 {
        return None;
    }

    let dx13 = Rational::from(&x3 - &x1);
    let dy13 = Rational::from(&y3 - &y1);
    let t = (Rational::from(&dx13 * &dy34) - Rational::from(&dy13 * &dx34)) / denom;

    let x = x1 + Rational::from(&t * &dx12);
    let y = y1 + Rational::from(&t * &dy12);
    Some(Point2::new(x.to_f64(), y.to_f64()))
}
