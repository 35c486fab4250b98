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

//! ellipsoid-geodesic
//!
//! [![License](https://img.shields.io/badge/License-MIT-blue)](https://opensource.org/license/mit/)
//!
//! A library for solving geodesic problems on an ellipsoid of revolution,
//! such as the [WGS-84](https://www.icao.int/NACC/Documents/Meetings/2014/ECARAIM/REF08-Doc9674.pdf)
//! ellipsoid used by satellite navigation.
//!
//! The shortest path between two points on the surface of an ellipsoid is a
//! [geodesic segment](https://en.wikipedia.org/wiki/Geodesics_on_an_ellipsoid).
//! It is the equivalent of a straight line segment in planar geometry or a
//! [great circle arc](https://en.wikipedia.org/wiki/Great_circle) on the
//! surface of a sphere.
//!
//! The library solves:
//!
//! - the *direct* problem: the destination and azimuth after travelling a
//!   distance along a geodesic from a start point at a given azimuth;
//! - the *inverse* problem: the length and azimuths of the geodesic
//!   segment between two positions;
//! - positions along a geodesic line, set up once and queried repeatedly;
//! - the perimeter and area of a polygon whose edges are geodesics.
//!
//! ## Design
//!
//! The library is based on Charles Karney's
//! [GeographicLib](https://geographiclib.sourceforge.io/) library, see
//! CFF Karney, [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf).
//!
//! Geodesic segments are modelled as great circle arcs on the surface of an
//! auxiliary sphere; distances, longitudes and areas on the ellipsoid are
//! recovered from the sphere by series expansions in the ellipsoid shape
//! parameters, summed by Clenshaw summation.
//!
//! The `Ellipsoid` class represents an ellipsoid of revolution.
//! The static `WGS84_ELLIPSOID` represents the WGS-84 `Ellipsoid` with the
//! primary parameters from Tab. 3-1 of the
//! [ICAO WGS-84 Implementation Manual](https://www.icao.int/NACC/Documents/Meetings/2014/ECARAIM/REF08-Doc9674.pdf).
//!
//! Each calculated quantity is selected by a `Caps` bit mask, so that e.g.
//! an application that only requires distances does not pay for areas.
//!
//! The library depends upon the following crates:
//!
//! - [angle-sc](https://crates.io/crates/angle-sc) - to define `Angle`,
//!   `Degrees` and `Radians` and perform trigonometric calculations;
//! - [icao_units](https://crates.io/crates/icao-units) - to define `Metres` and
//!   `NauticalMiles` and perform conversions between them.

pub mod ellipsoid;
pub mod geodesic;
pub mod geodesic_line;
pub mod polygon;

pub use angle_sc::{Angle, Degrees, Radians, Validate};
pub use icao_units::non_si::NauticalMiles;
pub use icao_units::si::Metres;

pub use crate::geodesic::{Caps, GeodesicResult};
pub use crate::geodesic_line::GeodesicLine;
pub use crate::polygon::{PolygonArea, PolygonResult};

use angle_sc::trig;
use once_cell::sync::Lazy;
use thiserror::Error;

/// The error type for an invalid `Ellipsoid` definition.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum EllipsoidError {
    /// The Semimajor axis must be a finite, positive value.
    #[error("the Semimajor axis is not finite and positive: {0}")]
    InvalidMajorAxis(f64),
    /// The magnitude of the flattening ratio must be less than one, so
    /// that the Semiminor axis is a finite, positive value.
    #[error("the magnitude of the flattening ratio is not less than one: {0}")]
    InvalidFlattening(f64),
}

/// The parameters of an `Ellipsoid`.
///
/// The series coefficients that only depend upon the shape of the
/// ellipsoid are evaluated once, on construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    /// The Semimajor axis of the ellipsoid.
    a: Metres,
    /// The flattening of the ellipsoid, a ratio.
    f: f64,

    /// The Semiminor axis of the ellipsoid.
    b: Metres,
    /// One minus the flattening ratio.
    one_minus_f: f64,
    /// The reciprocal of one minus the flattening ratio.
    recip_one_minus_f: f64,
    /// The square of the Eccentricity of the ellipsoid.
    e_2: f64,
    /// The square of the second Eccentricity of the ellipsoid.
    ep_2: f64,
    /// The third flattening of the ellipsoid.
    n: f64,
    /// The square of the authalic radius of the ellipsoid.
    c2: f64,

    /// The A3 series `coefficients` of the ellipsoid.
    a3: [f64; 6],
    /// The C3x series `coefficients` of the ellipsoid.
    c3x: [f64; 15],
    /// The C4x series `coefficients` of the ellipsoid.
    c4x: [f64; 21],
}

impl Ellipsoid {
    /// Construct an `Ellipsoid` from valid parameters.
    fn calculate(a: Metres, f: f64) -> Self {
        let b = ellipsoid::calculate_minor_axis(a, f);
        let one_minus_f = 1.0 - f;
        let e_2 = ellipsoid::calculate_sq_eccentricity(f);
        let n = ellipsoid::calculate_3rd_flattening(f);
        Self {
            a,
            f,
            b,
            one_minus_f,
            recip_one_minus_f: 1.0 / one_minus_f,
            e_2,
            ep_2: ellipsoid::calculate_sq_2nd_eccentricity(f),
            n,
            c2: ellipsoid::calculate_sq_authalic_radius(a, b, e_2),
            a3: ellipsoid::coefficients::evaluate_coeffs_a3(n),
            c3x: ellipsoid::coefficients::evaluate_coeffs_c3x(n),
            c4x: ellipsoid::coefficients::evaluate_coeffs_c4x(n),
        }
    }

    /// Constructor.
    /// * `a` - the Semimajor axis of the `Ellipsoid`.
    /// * `f` - the flattening of the `Ellipsoid`, a ratio; negative for a
    ///   prolate ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns an `EllipsoidError` if `a` is not finite and positive, or
    /// if the magnitude of `f` is not less than one.
    pub fn new(a: Metres, f: f64) -> Result<Self, EllipsoidError> {
        if !(a.0.is_finite() && 0.0 < a.0) {
            return Err(EllipsoidError::InvalidMajorAxis(a.0));
        }
        if !(f.is_finite() && libm::fabs(f) < 1.0) {
            return Err(EllipsoidError::InvalidFlattening(f));
        }

        Ok(Self::calculate(a, f))
    }

    /// Construct an `Ellipsoid` with the WGS-84 parameters.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::calculate(ellipsoid::wgs84::A, ellipsoid::wgs84::F)
    }

    /// The Semimajor axis of the ellipsoid.
    #[must_use]
    pub const fn a(&self) -> Metres {
        self.a
    }

    /// The flattening of the ellipsoid, a ratio.
    #[must_use]
    pub const fn f(&self) -> f64 {
        self.f
    }

    /// The Semiminor axis of the ellipsoid.
    #[must_use]
    pub const fn b(&self) -> Metres {
        self.b
    }

    /// One minus the flattening ratio.
    #[must_use]
    pub const fn one_minus_f(&self) -> f64 {
        self.one_minus_f
    }

    /// The reciprocal of one minus the flattening ratio.
    #[must_use]
    pub const fn recip_one_minus_f(&self) -> f64 {
        self.recip_one_minus_f
    }

    /// The square of the Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn e_2(&self) -> f64 {
        self.e_2
    }

    /// The square of the second Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn ep_2(&self) -> f64 {
        self.ep_2
    }

    /// The third flattening of the ellipsoid.
    #[must_use]
    pub const fn n(&self) -> f64 {
        self.n
    }

    /// The square of the authalic radius of the ellipsoid: the radius of
    /// the sphere with the same surface area.
    #[must_use]
    pub const fn c2(&self) -> f64 {
        self.c2
    }

    /// The total area of the ellipsoid in square metres.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        4.0 * core::f64::consts::PI * self.c2
    }

    /// The C3x series `coefficients` of the ellipsoid.
    #[must_use]
    pub const fn c3x(&self) -> [f64; 15] {
        self.c3x
    }

    /// The C4x series `coefficients` of the ellipsoid.
    #[must_use]
    pub const fn c4x(&self) -> [f64; 21] {
        self.c4x
    }

    /// Calculate epsilon, the variable used in series expansions.
    /// Note: epsilon is positive and small.
    /// * `clairaut` - Clairaut's constant.
    #[must_use]
    pub fn calculate_epsilon(&self, clairaut: trig::UnitNegRange) -> f64 {
        ellipsoid::calculate_epsilon(clairaut, self.ep_2)
    }

    /// Calculate a3f from the A3 series `coefficients` of the ellipsoid.
    /// * `eps` - epsilon
    #[must_use]
    pub fn calculate_a3f(&self, eps: f64) -> f64 {
        ellipsoid::coefficients::evaluate_polynomial(&self.a3, eps)
    }

    /// Calculate the coefficients `C3[l]` in the Fourier expansion of `C3`.
    /// * `eps` - epsilon
    #[must_use]
    pub fn calculate_c3y(&self, eps: f64) -> [f64; 6] {
        ellipsoid::coefficients::evaluate_coeffs_c3y(&self.c3x, eps)
    }

    /// Solve the *inverse* geodesic problem: calculate the geodesic
    /// segment between a pair of positions on the ellipsoid.
    ///
    /// The solution is accurate to round-off for all pairs of points,
    /// including nearly antipodal ones.
    /// * `lat1`, `lon1` - the start position in geodetic coordinates.
    /// * `lat2`, `lon2` - the finish position in geodetic coordinates.
    /// * `outmask` - the quantities to calculate.
    ///
    /// returns a `GeodesicResult` with the quantities selected by
    /// `outmask`; the arc length `a12` is always calculated.
    ///
    /// # Examples
    /// ```
    /// use ellipsoid_geodesic::{Caps, Degrees, NauticalMiles, WGS84_ELLIPSOID};
    ///
    /// let result = WGS84_ELLIPSOID.inverse(
    ///     Degrees(42.0), Degrees(29.0),   // Istanbul
    ///     Degrees(39.0), Degrees(-77.0),  // Washington
    ///     Caps::STANDARD,
    /// );
    ///
    /// println!("Istanbul-Washington initial azimuth: {:?}", result.azi1.0);
    /// println!("Istanbul-Washington distance: {:?}", NauticalMiles::from(result.s12));
    /// ```
    #[must_use]
    pub fn inverse(
        &self,
        lat1: Degrees,
        lon1: Degrees,
        lat2: Degrees,
        lon2: Degrees,
        outmask: Caps,
    ) -> GeodesicResult {
        let solution =
            geodesic::calculate_geodesic_inverse(lat1.0, lon1.0, lat2.0, lon2.0, outmask, self);

        let outmask = outmask & Caps::OUT_ALL;
        let mut result = GeodesicResult {
            a12: Degrees(solution.a12),
            ..GeodesicResult::default()
        };
        if outmask.outputs(Caps::LATITUDE) {
            result.lat1 = Degrees(geodesic::lat_fix(lat1.0));
            result.lat2 = Degrees(geodesic::lat_fix(lat2.0));
        }
        if outmask.outputs(Caps::LONGITUDE) {
            result.lon1 = lon1;
            result.lon2 = lon2;
        }
        if outmask.outputs(Caps::AZIMUTH) {
            result.azi1 = Degrees(geodesic::atan2d(solution.salp1, solution.calp1));
            result.azi2 = Degrees(geodesic::atan2d(solution.salp2, solution.calp2));
        }
        if outmask.outputs(Caps::DISTANCE) {
            result.s12 = Metres(solution.s12);
        }
        if outmask.outputs(Caps::REDUCED_LENGTH) {
            result.m12 = Metres(solution.m12);
        }
        if outmask.outputs(Caps::GEODESIC_SCALE) {
            result.big_m12 = solution.big_m12;
            result.big_m21 = solution.big_m21;
        }
        if outmask.outputs(Caps::AREA) {
            result.area = solution.area;
        }
        result
    }

    /// Solve the *direct* geodesic problem: calculate the position and
    /// azimuth after travelling a distance along the geodesic from a
    /// position at a given azimuth.
    /// * `lat1`, `lon1` - the start position in geodetic coordinates.
    /// * `azi1` - the azimuth at the start position.
    /// * `s12` - the distance to travel, may be negative.
    /// * `outmask` - the quantities to calculate.
    ///
    /// # Examples
    /// ```
    /// use ellipsoid_geodesic::{Caps, Degrees, Metres, WGS84_ELLIPSOID};
    ///
    /// let result = WGS84_ELLIPSOID.direct(
    ///     Degrees(40.0), Degrees(-75.0), Degrees(30.0),
    ///     Metres(10_000_000.0),
    ///     Caps::STANDARD,
    /// );
    ///
    /// println!("destination: {:?}, {:?}", result.lat2.0, result.lon2.0);
    /// ```
    #[must_use]
    pub fn direct(
        &self,
        lat1: Degrees,
        lon1: Degrees,
        azi1: Degrees,
        s12: Metres,
        outmask: Caps,
    ) -> GeodesicResult {
        GeodesicLine::new(self, lat1, lon1, azi1, outmask | Caps::DISTANCE_IN)
            .position(s12, outmask)
    }

    /// Solve the *direct* geodesic problem in terms of the arc length on
    /// the auxiliary sphere.
    /// * `lat1`, `lon1` - the start position in geodetic coordinates.
    /// * `azi1` - the azimuth at the start position.
    /// * `a12` - the arc length to travel in degrees, may be negative.
    /// * `outmask` - the quantities to calculate.
    #[must_use]
    pub fn direct_arc(
        &self,
        lat1: Degrees,
        lon1: Degrees,
        azi1: Degrees,
        a12: Degrees,
        outmask: Caps,
    ) -> GeodesicResult {
        GeodesicLine::new(self, lat1, lon1, azi1, outmask).position_arc(a12, outmask)
    }

    /// Construct a `GeodesicLine` through a position at a given azimuth.
    /// * `lat1`, `lon1` - the start position in geodetic coordinates.
    /// * `azi1` - the azimuth at the start position.
    /// * `caps` - the capabilities of the line.
    #[must_use]
    pub fn line(&self, lat1: Degrees, lon1: Degrees, azi1: Degrees, caps: Caps) -> GeodesicLine {
        GeodesicLine::new(self, lat1, lon1, azi1, caps)
    }

    /// Construct a `GeodesicLine` from the solution of a direct problem,
    /// with the reference point 3 at distance `s12` from the start point.
    /// * `lat1`, `lon1` - the start position in geodetic coordinates.
    /// * `azi1` - the azimuth at the start position.
    /// * `s12` - the distance to the second point.
    /// * `caps` - the capabilities of the line.
    #[must_use]
    pub fn direct_line(
        &self,
        lat1: Degrees,
        lon1: Degrees,
        azi1: Degrees,
        s12: Metres,
        caps: Caps,
    ) -> GeodesicLine {
        let mut line = GeodesicLine::new(self, lat1, lon1, azi1, caps | Caps::DISTANCE_IN);
        line.set_distance(s12);
        line
    }

    /// Construct a `GeodesicLine` from the solution of an inverse problem,
    /// with the reference point 3 at the second position.
    ///
    /// Positions along the geodesic segment between the two positions can
    /// then be queried, e.g. at fractions of the arc length `a13`.
    /// * `lat1`, `lon1` - the start position in geodetic coordinates.
    /// * `lat2`, `lon2` - the finish position in geodetic coordinates.
    /// * `caps` - the capabilities of the line.
    #[must_use]
    pub fn inverse_line(
        &self,
        lat1: Degrees,
        lon1: Degrees,
        lat2: Degrees,
        lon2: Degrees,
        caps: Caps,
    ) -> GeodesicLine {
        let solution =
            geodesic::calculate_geodesic_inverse(lat1.0, lon1.0, lat2.0, lon2.0, Caps::NONE, self);
        let azi1 = Degrees(geodesic::atan2d(solution.salp1, solution.calp1));
        let mut line = GeodesicLine::from_azimuth_sin_cos(
            self,
            Degrees(geodesic::lat_fix(lat1.0)),
            lon1,
            azi1,
            solution.salp1,
            solution.calp1,
            caps | Caps::DISTANCE,
        );
        line.set_arc(Degrees(solution.a12));
        line
    }
}

/// A static instance of the WGS-84 `Ellipsoid`.
pub static WGS84_ELLIPSOID: Lazy<Ellipsoid> = Lazy::new(Ellipsoid::wgs84);
