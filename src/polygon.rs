// Copyright (c) 2024-2026 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! The `polygon` module contains the `PolygonArea` type for calculating the
//! perimeter and area of a polygon whose edges are geodesics on the surface
//! of an ellipsoid.
//!
//! Vertices are accumulated one at a time so that very large polygons, e.g.
//! continent outlines with millions of vertices, can be measured without
//! storing them. The area is accumulated with compensated summation and the
//! count of Equator crossings disambiguates polygons encircling a pole.

#![allow(clippy::float_cmp)]
#![allow(clippy::suboptimal_flops)]

use crate::geodesic::{ang_diff, ang_normalize, calculate_geodesic_inverse, two_sum, Caps};
use crate::geodesic_line::GeodesicLine;
use crate::Ellipsoid;
use angle_sc::Degrees;
use icao_units::si::Metres;

/// An accumulator for a sum of `f64` values using Neumaier's variant of
/// Kahan summation; the error of each addition is captured in a second
/// word, effectively doubling the working precision.
#[derive(Clone, Debug, Default, PartialEq)]
struct Accumulator {
    /// The sum.
    s: f64,
    /// The correction term.
    t: f64,
}

impl Accumulator {
    /// Add a value to the accumulator.
    fn add(&mut self, y: f64) {
        // absorb the old correction term first
        let (y, u) = two_sum(y, self.t);
        (self.s, self.t) = two_sum(y, self.s);
        if self.s == 0.0 {
            // the sum is exactly zero, so start afresh from the error term
            self.s = u;
        } else {
            self.t += u;
        }
    }

    /// The accumulated sum.
    const fn sum(&self) -> f64 {
        self.s
    }

    /// The accumulated sum with an extra value added, without changing the
    /// state of the accumulator.
    fn sum_with(&self, y: f64) -> f64 {
        let mut a = self.clone();
        a.add(y);
        a.sum()
    }

    /// Reduce the accumulated sum to the remainder on division by `y`.
    fn remainder(&mut self, y: f64) {
        self.s = libm::remainder(self.s, y);
        self.add(0.0);
    }

    /// Negate the accumulated sum, preserving the correction term.
    fn negate(&mut self) {
        self.s = -self.s;
        self.t = -self.t;
    }

    /// Reset the accumulator to zero.
    fn clear(&mut self) {
        self.s = 0.0;
        self.t = 0.0;
    }
}

/// Count the Equator crossing direction of an edge in the East-going sense:
/// 1 for a crossing of the prime meridian Eastwards, -1 Westwards, 0
/// otherwise.
fn transit(lon1: f64, lon2: f64) -> i32 {
    let (lon12, _) = ang_diff(lon1, lon2);
    let lon1 = ang_normalize(lon1);
    let lon2 = ang_normalize(lon2);
    if lon12 > 0.0 && ((lon1 < 0.0 && lon2 >= 0.0) || (lon1 > 0.0 && lon2 == 0.0)) {
        1
    } else if lon12 < 0.0 && lon1 >= 0.0 && lon2 < 0.0 {
        -1
    } else {
        0
    }
}

/// The prime meridian crossing count for unrolled longitudes, used when
/// edges are added by azimuth and distance and may wrap many times.
fn transit_direct(lon1: f64, lon2: f64) -> i32 {
    let lon1 = libm::remainder(lon1, 720.0);
    let lon2 = libm::remainder(lon2, 720.0);
    i32::from(lon2 <= 0.0 && lon2 > -360.0) - i32::from(lon1 <= 0.0 && lon1 > -360.0)
}

/// The result of a polygon computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolygonResult {
    /// The perimeter of the polygon, or the length of the polyline.
    pub perimeter: Metres,
    /// The area of the polygon in square metres; NaN for a polyline.
    pub area: f64,
    /// The number of vertices.
    pub num: usize,
}

/// Accumulates the perimeter and area of a polygon whose edges are
/// geodesics on the surface of an `Ellipsoid`.
///
/// Vertices are added with `add_point` or, after the first vertex, with
/// `add_edge`; `compute` closes the polygon back to the first vertex
/// without disturbing the accumulated state, so more vertices may be added
/// afterwards.
///
/// In polyline mode only the length is accumulated and the area is NaN.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonArea<'a> {
    /// A reference to the underlying `Ellipsoid`.
    ellipsoid: &'a Ellipsoid,
    /// Whether to measure the length of a polyline instead of a polygon.
    polyline: bool,
    /// The area of the full ellipsoid, square metres.
    area0: f64,
    /// The quantities required from each edge.
    mask: Caps,
    /// The number of vertices added so far.
    num: usize,
    /// The number of prime meridian crossings.
    crossings: i32,
    perimetersum: Accumulator,
    areasum: Accumulator,
    /// The first vertex.
    lat0: Degrees,
    lon0: Degrees,
    /// The most recent vertex.
    lat1: Degrees,
    lon1: Degrees,
}

impl<'a> PolygonArea<'a> {
    /// Construct an empty `PolygonArea`.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    /// * `polyline` - whether to measure the length of an open polyline
    ///   instead of the perimeter and area of a closed polygon.
    #[must_use]
    pub fn new(ellipsoid: &'a Ellipsoid, polyline: bool) -> Self {
        Self {
            ellipsoid,
            polyline,
            area0: 4.0 * core::f64::consts::PI * ellipsoid.c2(),
            mask: Caps::LATITUDE
                | Caps::LONGITUDE
                | Caps::DISTANCE
                | if polyline {
                    Caps::NONE
                } else {
                    Caps::AREA | Caps::LONG_UNROLL
                },
            num: 0,
            crossings: 0,
            perimetersum: Accumulator::default(),
            areasum: Accumulator::default(),
            lat0: Degrees(f64::NAN),
            lon0: Degrees(f64::NAN),
            lat1: Degrees(f64::NAN),
            lon1: Degrees(f64::NAN),
        }
    }

    /// Accessor for the number of vertices added so far.
    #[must_use]
    pub const fn num(&self) -> usize {
        self.num
    }

    /// Accessor for whether this is measuring a polyline.
    #[must_use]
    pub const fn polyline(&self) -> bool {
        self.polyline
    }

    /// Reset the accumulated state, keeping the ellipsoid and mode.
    pub fn clear(&mut self) {
        self.num = 0;
        self.crossings = 0;
        self.perimetersum.clear();
        self.areasum.clear();
        self.lat0 = Degrees(f64::NAN);
        self.lon0 = Degrees(f64::NAN);
        self.lat1 = Degrees(f64::NAN);
        self.lon1 = Degrees(f64::NAN);
    }

    /// Add a vertex to the polygon or polyline.
    /// * `lat`, `lon` - the geodetic coordinates of the vertex.
    pub fn add_point(&mut self, lat: Degrees, lon: Degrees) {
        if self.num == 0 {
            self.lat0 = lat;
            self.lon0 = lon;
        } else {
            let r = calculate_geodesic_inverse(
                self.lat1.0,
                self.lon1.0,
                lat.0,
                lon.0,
                self.mask,
                self.ellipsoid,
            );
            self.perimetersum.add(r.s12);
            if !self.polyline {
                self.areasum.add(r.area);
                self.crossings += transit(self.lon1.0, lon.0);
            }
        }
        self.lat1 = lat;
        self.lon1 = lon;
        self.num += 1;
    }

    /// Add an edge to the polygon or polyline by solving the direct
    /// geodesic problem from the most recent vertex.
    ///
    /// Ignored until a first vertex has been added with `add_point`.
    /// * `azi` - the azimuth of the edge at the current vertex.
    /// * `s` - the length of the edge, may be negative.
    pub fn add_edge(&mut self, azi: Degrees, s: Metres) {
        if self.num == 0 {
            return;
        }
        let line = GeodesicLine::new(
            self.ellipsoid,
            self.lat1,
            self.lon1,
            azi,
            self.mask | Caps::DISTANCE_IN,
        );
        let r = line.position(s, self.mask | Caps::LONG_UNROLL);
        self.perimetersum.add(s.0);
        if !self.polyline {
            self.areasum.add(r.area);
            self.crossings += transit_direct(self.lon1.0, r.lon2.0);
        }
        // keep the unrolled longitude for the crossing count
        self.lat1 = r.lat2;
        self.lon1 = r.lon2;
        self.num += 1;
    }

    /// Calculate the perimeter and area of the polygon, closing it from
    /// the most recent vertex back to the first.
    ///
    /// The accumulated state is not disturbed, so more vertices may be
    /// added after calling this function.
    ///
    /// A polygon with fewer than 2 vertices reports a perimeter and area
    /// of zero; a polyline always reports a `NaN` area.
    /// * `reverse` - if true, clockwise traversal counts as a positive
    ///   area instead of counter-clockwise.
    /// * `sign` - if true, return a signed area in
    ///   (-area0/2, area0/2], otherwise the area of the enclosed polygon
    ///   in [0, area0), where area0 is the area of the full ellipsoid.
    #[must_use]
    pub fn compute(&self, reverse: bool, sign: bool) -> PolygonResult {
        if self.num < 2 {
            return PolygonResult {
                perimeter: Metres(0.0),
                area: if self.polyline { f64::NAN } else { 0.0 },
                num: self.num,
            };
        }

        if self.polyline {
            return PolygonResult {
                perimeter: Metres(self.perimetersum.sum()),
                area: f64::NAN,
                num: self.num,
            };
        }

        // close the polygon back to the first vertex
        let r = calculate_geodesic_inverse(
            self.lat1.0,
            self.lon1.0,
            self.lat0.0,
            self.lon0.0,
            self.mask,
            self.ellipsoid,
        );
        let perimeter = self.perimetersum.sum_with(r.s12);

        let mut areasum = self.areasum.clone();
        areasum.add(r.area);
        let crossings = self.crossings + transit(self.lon1.0, self.lon0.0);

        PolygonResult {
            perimeter: Metres(perimeter),
            area: self.reduce_area(areasum, crossings, reverse, sign),
            num: self.num,
        }
    }

    /// Reduce an accumulated area to the requested canonical range.
    fn reduce_area(&self, mut areasum: Accumulator, crossings: i32, reverse: bool, sign: bool) -> f64 {
        let area0 = self.area0;
        areasum.remainder(area0);
        if crossings & 1 != 0 {
            // an odd number of meridian crossings: the polygon encircles
            // a pole, add half the ellipsoid area with the matching sign
            areasum.add((if areasum.sum() < 0.0 { 1.0 } else { -1.0 }) * area0 / 2.0);
        }
        // the area is accumulated in the clockwise sense
        if !reverse {
            areasum.negate();
        }
        let area = areasum.sum();
        if sign {
            // put the area in (-area0/2, area0/2]
            if area > area0 / 2.0 {
                area - area0
            } else if area <= -area0 / 2.0 {
                area + area0
            } else {
                area
            }
        } else {
            // put the area in [0, area0)
            if area >= area0 {
                area - area0
            } else if area < 0.0 {
                area + area0
            } else {
                area
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ellipsoid;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_accumulator() {
        let mut acc = Accumulator::default();
        // sum many values that cancel in pairs exactly
        for _ in 0..1000 {
            acc.add(1e100);
            acc.add(1.0);
            acc.add(-1e100);
        }
        assert_eq!(1000.0, acc.sum());
        assert_eq!(1001.0, acc.sum_with(1.0));
        assert_eq!(1000.0, acc.sum());

        acc.remainder(300.0);
        assert_eq!(100.0, acc.sum());

        acc.clear();
        assert_eq!(0.0, acc.sum());
    }

    #[test]
    fn test_transit() {
        assert_eq!(1, transit(-1.0, 1.0));
        assert_eq!(-1, transit(1.0, -1.0));
        assert_eq!(0, transit(10.0, 20.0));
        // crossing the antimeridian is not a prime meridian crossing
        assert_eq!(0, transit(179.0, -179.0));

        // only the parity of the crossing count is significant
        assert_eq!(-1, transit_direct(-1.0, 1.0));
        assert_eq!(-1, transit_direct(361.0, 359.0));
        assert_eq!(0, transit_direct(10.0, 20.0));
        assert_eq!(1, transit_direct(350.0, 370.0));
    }

    #[test]
    fn test_polygon_around_north_pole() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();
        let mut polygon = PolygonArea::new(&wgs84_ellipsoid, false);
        polygon.add_point(Degrees(89.0), Degrees(0.0));
        polygon.add_point(Degrees(89.0), Degrees(90.0));
        polygon.add_point(Degrees(89.0), Degrees(180.0));
        polygon.add_point(Degrees(89.0), Degrees(270.0));

        let result = polygon.compute(false, true);
        assert_eq!(4, result.num);
        assert!(is_within_tolerance(631_819.8745, result.perimeter.0, 1e-4));
        assert!(is_within_tolerance(24_952_305_678.0, result.area, 1.0));
    }

    #[test]
    fn test_polygon_around_south_pole() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();
        let mut polygon = PolygonArea::new(&wgs84_ellipsoid, false);
        polygon.add_point(Degrees(-89.0), Degrees(0.0));
        polygon.add_point(Degrees(-89.0), Degrees(90.0));
        polygon.add_point(Degrees(-89.0), Degrees(180.0));
        polygon.add_point(Degrees(-89.0), Degrees(270.0));

        let result = polygon.compute(false, true);
        assert!(is_within_tolerance(631_819.8745, result.perimeter.0, 1e-4));
        assert!(is_within_tolerance(-24_952_305_678.0, result.area, 1.0));

        // with reverse, the traversal sense is flipped
        let result = polygon.compute(true, true);
        assert!(is_within_tolerance(24_952_305_678.0, result.area, 1.0));

        // unsigned, the enclosed area is returned
        let result = polygon.compute(false, false);
        assert!(result.area > 0.0);
    }

    #[test]
    fn test_polygon_too_few_vertices() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();
        let mut polygon = PolygonArea::new(&wgs84_ellipsoid, false);

        let result = polygon.compute(false, true);
        assert_eq!(0, result.num);
        assert_eq!(Metres(0.0), result.perimeter);
        assert_eq!(0.0, result.area);

        polygon.add_point(Degrees(45.0), Degrees(0.0));
        let result = polygon.compute(false, true);
        assert_eq!(1, result.num);
        assert_eq!(Metres(0.0), result.perimeter);
        assert_eq!(0.0, result.area);
    }

    #[test]
    fn test_polyline_length() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();
        let mut polyline = PolygonArea::new(&wgs84_ellipsoid, true);
        assert!(polyline.polyline());

        polyline.add_point(Degrees(0.0), Degrees(0.0));
        polyline.add_point(Degrees(0.0), Degrees(1.0));
        polyline.add_point(Degrees(1.0), Degrees(1.0));

        let result = polyline.compute(false, true);
        assert_eq!(3, result.num);
        // a degree of longitude then a degree of latitude, not closed
        assert!(is_within_tolerance(221_949.0, result.perimeter.0, 1.0));
        assert!(result.area.is_nan());
    }

    #[test]
    fn test_add_edge_matches_add_point() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();

        let mut by_points = PolygonArea::new(&wgs84_ellipsoid, false);
        by_points.add_point(Degrees(10.0), Degrees(10.0));
        by_points.add_point(Degrees(10.0), Degrees(11.0));
        by_points.add_point(Degrees(11.0), Degrees(11.0));
        let expected = by_points.compute(false, true);

        // trace the same triangle by azimuth and distance
        let mut by_edges = PolygonArea::new(&wgs84_ellipsoid, false);
        by_edges.add_point(Degrees(10.0), Degrees(10.0));

        let leg1 = wgs84_ellipsoid.inverse(
            Degrees(10.0),
            Degrees(10.0),
            Degrees(10.0),
            Degrees(11.0),
            Caps::STANDARD,
        );
        by_edges.add_edge(leg1.azi1, leg1.s12);
        let leg2 = wgs84_ellipsoid.inverse(
            Degrees(10.0),
            Degrees(11.0),
            Degrees(11.0),
            Degrees(11.0),
            Caps::STANDARD,
        );
        by_edges.add_edge(leg2.azi1, leg2.s12);
        let result = by_edges.compute(false, true);

        assert_eq!(expected.num, result.num);
        assert!(is_within_tolerance(
            expected.perimeter.0,
            result.perimeter.0,
            1e-6
        ));
        assert!(is_within_tolerance(expected.area, result.area, 1.0));
    }

    #[test]
    fn test_clear() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();
        let mut polygon = PolygonArea::new(&wgs84_ellipsoid, false);
        polygon.add_point(Degrees(89.0), Degrees(0.0));
        polygon.add_point(Degrees(89.0), Degrees(90.0));
        polygon.add_point(Degrees(89.0), Degrees(180.0));
        polygon.clear();

        assert_eq!(0, polygon.num());
        let result = polygon.compute(false, true);
        assert_eq!(Metres(0.0), result.perimeter);
        assert_eq!(0.0, result.area);
    }
}
