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

//! The `geodesic_line` module contains the `GeodesicLine` type: a geodesic
//! through a point at a given azimuth, set up once so that positions along
//! it can be queried repeatedly.
//!
//! The series coefficients for the quantities selected by the capability
//! mask are evaluated in the constructor; each position query is then a
//! Clenshaw summation per selected quantity, see CFF Karney,
//! [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf).

#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::too_many_lines)]

use crate::ellipsoid::coefficients::{
    cos_series, evaluate_a1, evaluate_a2, evaluate_coeffs_c1, evaluate_coeffs_c1p,
    evaluate_coeffs_c2, evaluate_coeffs_c4y, sin_series,
};
use crate::geodesic::{
    ang_normalize, ang_round, atan2d, lat_fix, norm, sincosd, Caps, GeodesicResult, TINY,
};
use crate::Ellipsoid;
use angle_sc::Degrees;
use icao_units::si::Metres;

/// A geodesic line: a geodesic through a point at a given azimuth.
///
/// The line stores the geometry of its start point on the auxiliary sphere
/// together with the series coefficients required by its capability mask,
/// so that `position` and `position_arc` only evaluate the series sums.
/// Quantities not selected at construction are reported as NaN and are
/// never computed lazily.
#[derive(Clone, Debug, PartialEq)]
pub struct GeodesicLine<'a> {
    /// A reference to the underlying `Ellipsoid`.
    ellipsoid: &'a Ellipsoid,
    /// The latitude of the start point.
    lat1: Degrees,
    /// The longitude of the start point.
    lon1: Degrees,
    /// The azimuth at the start point.
    azi1: Degrees,
    /// The capabilities of the line.
    caps: Caps,

    salp1: f64,
    calp1: f64,
    /// Clairaut's constant, the sine of the equatorial azimuth.
    salp0: f64,
    calp0: f64,
    /// sin/cos of the arc distance from the Northward Equator crossing.
    ssig1: f64,
    csig1: f64,
    /// sin/cos of the longitude from the Equator crossing on the sphere.
    somg1: f64,
    comg1: f64,
    dn1: f64,
    k2: f64,

    a1m1: f64,
    c1a: [f64; 7],
    b11: f64,
    stau1: f64,
    ctau1: f64,
    c1pa: [f64; 6],
    a2m1: f64,
    c2a: [f64; 7],
    b21: f64,
    c3a: [f64; 6],
    a3c: f64,
    b31: f64,
    c4a: [f64; 6],
    a4: f64,
    b41: f64,

    /// The distance to the reference point 3.
    s13: Metres,
    /// The arc length to the reference point 3.
    a13: Degrees,
}

impl<'a> GeodesicLine<'a> {
    /// Construct a `GeodesicLine` through a point at a given azimuth.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    /// * `lat1`, `lon1` - the geodetic coordinates of the start point.
    /// * `azi1` - the azimuth at the start point.
    /// * `caps` - the capabilities of the line.
    #[must_use]
    pub fn new(ellipsoid: &'a Ellipsoid, lat1: Degrees, lon1: Degrees, azi1: Degrees, caps: Caps) -> Self {
        let azi1 = Degrees(ang_normalize(azi1.0));
        // guard against underflow of the sine and cosine of the azimuth
        let (salp1, calp1) = sincosd(ang_round(azi1.0));
        Self::from_azimuth_sin_cos(ellipsoid, lat1, lon1, azi1, salp1, calp1, caps)
    }

    /// Construct a `GeodesicLine` with the sine and cosine of the azimuth
    /// already known, e.g. from the solution of an inverse problem.
    #[must_use]
    pub(crate) fn from_azimuth_sin_cos(
        ellipsoid: &'a Ellipsoid,
        lat1: Degrees,
        lon1: Degrees,
        azi1: Degrees,
        salp1: f64,
        calp1: f64,
        caps: Caps,
    ) -> Self {
        // latitude, azimuth and unrolled longitude are always available
        let caps = caps | Caps::LATITUDE | Caps::AZIMUTH | Caps::LONG_UNROLL;

        let f = ellipsoid.f();
        let f1 = ellipsoid.one_minus_f();
        let e_2 = ellipsoid.e_2();
        let ep_2 = ellipsoid.ep_2();

        let lat1 = Degrees(lat_fix(lat1.0));
        let (mut sbet1, mut cbet1) = sincosd(ang_round(lat1.0));
        sbet1 *= f1;
        norm(&mut sbet1, &mut cbet1);
        cbet1 = f64::max(TINY, cbet1);
        let dn1 = libm::sqrt(1.0 + ep_2 * sbet1 * sbet1);

        // Clairaut's constant and the cosine of the equatorial azimuth
        let salp0 = salp1 * cbet1;
        let calp0 = libm::hypot(calp1, salp1 * sbet1);

        let mut ssig1 = sbet1;
        let somg1 = salp0 * sbet1;
        let mut csig1 = if sbet1 != 0.0 || calp1 != 0.0 {
            cbet1 * calp1
        } else {
            1.0
        };
        let comg1 = csig1;
        norm(&mut ssig1, &mut csig1);

        let k2 = calp0 * calp0 * ep_2;
        let eps = k2 / (2.0 * (1.0 + libm::sqrt(1.0 + k2)) + k2);

        let mut a1m1 = 0.0;
        let mut c1a = [0.0; 7];
        let mut b11 = 0.0;
        let mut stau1 = 0.0;
        let mut ctau1 = 0.0;
        if caps.intersects(Caps::CAP_C1) {
            a1m1 = evaluate_a1(eps);
            c1a = evaluate_coeffs_c1(eps);
            b11 = sin_series(&c1a, ssig1, csig1);
            let s = libm::sin(b11);
            let c = libm::cos(b11);
            // tau1 = sigma1 + b11
            stau1 = ssig1 * c + csig1 * s;
            ctau1 = csig1 * c - ssig1 * s;
        }

        let mut c1pa = [0.0; 6];
        if caps.intersects(Caps::CAP_C1P) {
            c1pa = evaluate_coeffs_c1p(eps);
        }

        let mut a2m1 = 0.0;
        let mut c2a = [0.0; 7];
        let mut b21 = 0.0;
        if caps.intersects(Caps::CAP_C2) {
            a2m1 = evaluate_a2(eps);
            c2a = evaluate_coeffs_c2(eps);
            b21 = sin_series(&c2a, ssig1, csig1);
        }

        let mut c3a = [0.0; 6];
        let mut a3c = 0.0;
        let mut b31 = 0.0;
        if caps.intersects(Caps::CAP_C3) {
            c3a = ellipsoid.calculate_c3y(eps);
            a3c = -f * salp0 * ellipsoid.calculate_a3f(eps);
            b31 = sin_series(&c3a, ssig1, csig1);
        }

        let mut c4a = [0.0; 6];
        let mut a4 = 0.0;
        let mut b41 = 0.0;
        if caps.intersects(Caps::CAP_C4) {
            c4a = evaluate_coeffs_c4y(&ellipsoid.c4x(), eps);
            // the area scale factor, Karney Eq. 60
            a4 = ellipsoid.a().0 * ellipsoid.a().0 * calp0 * salp0 * e_2;
            b41 = cos_series(&c4a, ssig1, csig1);
        }

        Self {
            ellipsoid,
            lat1,
            lon1,
            azi1,
            caps,
            salp1,
            calp1,
            salp0,
            calp0,
            ssig1,
            csig1,
            somg1,
            comg1,
            dn1,
            k2,
            a1m1,
            c1a,
            b11,
            stau1,
            ctau1,
            c1pa,
            a2m1,
            c2a,
            b21,
            c3a,
            a3c,
            b31,
            c4a,
            a4,
            b41,
            s13: Metres(f64::NAN),
            a13: Degrees(f64::NAN),
        }
    }

    /// Accessor for the latitude of the start point.
    #[must_use]
    pub const fn lat1(&self) -> Degrees {
        self.lat1
    }

    /// Accessor for the longitude of the start point.
    #[must_use]
    pub const fn lon1(&self) -> Degrees {
        self.lon1
    }

    /// Accessor for the azimuth at the start point.
    #[must_use]
    pub const fn azi1(&self) -> Degrees {
        self.azi1
    }

    /// Accessor for the capabilities of the line.
    #[must_use]
    pub const fn caps(&self) -> Caps {
        self.caps
    }

    /// Accessor for the reference to the underlying `Ellipsoid`.
    #[must_use]
    pub const fn ellipsoid(&self) -> &Ellipsoid {
        self.ellipsoid
    }

    /// Accessor for the distance to the reference point 3.
    #[must_use]
    pub const fn s13(&self) -> Metres {
        self.s13
    }

    /// Accessor for the arc length to the reference point 3.
    #[must_use]
    pub const fn a13(&self) -> Degrees {
        self.a13
    }

    /// Set the reference point 3 at a distance from the start point.
    pub(crate) fn set_distance(&mut self, s13: Metres) {
        self.s13 = s13;
        self.a13 = self.gen_position(false, s13.0, Caps::NONE).a12;
    }

    /// Set the reference point 3 at an arc length from the start point.
    pub(crate) fn set_arc(&mut self, a13: Degrees) {
        self.a13 = a13;
        self.s13 = self.gen_position(true, a13.0, Caps::DISTANCE).s12;
    }

    /// Calculate the position at the given distance along the line.
    /// * `s12` - the distance from the start point, may be negative.
    /// * `outmask` - the quantities to calculate; quantities not in the
    ///   capabilities of the line are reported as NaN.
    #[must_use]
    pub fn position(&self, s12: Metres, outmask: Caps) -> GeodesicResult {
        self.gen_position(false, s12.0, outmask)
    }

    /// Calculate the position at the given arc length along the line.
    /// * `a12` - the arc length on the auxiliary sphere from the start
    ///   point, may be negative.
    /// * `outmask` - the quantities to calculate.
    #[must_use]
    pub fn position_arc(&self, a12: Degrees, outmask: Caps) -> GeodesicResult {
        self.gen_position(true, a12.0, outmask)
    }

    /// The general position calculation, CFF Karney Eqs. 5 to 26.
    /// * `arcmode` - whether `s12_a12` is an arc length in degrees,
    ///   otherwise it is a distance in metres.
    #[must_use]
    pub(crate) fn gen_position(&self, arcmode: bool, s12_a12: f64, outmask: Caps) -> GeodesicResult {
        let mut result = GeodesicResult::default();
        let outmask = outmask & self.caps & (Caps::OUT_ALL | Caps::LONG_UNROLL);
        if !(arcmode || self.caps.outputs(Caps::DISTANCE_IN)) {
            // impossible to calculate sigma from a distance
            return result;
        }

        let b = self.ellipsoid.b().0;
        let f = self.ellipsoid.f();
        let f1 = self.ellipsoid.one_minus_f();

        let sig12;
        let mut ssig12;
        let mut csig12;
        let mut b12 = 0.0;
        if arcmode {
            sig12 = s12_a12.to_radians();
            (ssig12, csig12) = sincosd(s12_a12);
        } else {
            // solve for sigma12 from the distance via the tau variable,
            // Karney Eq. 20
            let tau12 = s12_a12 / (b * (1.0 + self.a1m1));
            let s = libm::sin(tau12);
            let c = libm::cos(tau12);
            b12 = -sin_series(
                &self.c1pa,
                self.stau1 * c + self.ctau1 * s,
                self.ctau1 * c - self.stau1 * s,
            );
            let mut sigma = tau12 - (b12 - self.b11);
            ssig12 = libm::sin(sigma);
            csig12 = libm::cos(sigma);
            if libm::fabs(f) > 0.01 {
                // the reverted series is only accurate to O(f^2), add a
                // Newton correction step for very eccentric ellipsoids
                let ssig2 = self.ssig1 * csig12 + self.csig1 * ssig12;
                b12 = sin_series(
                    &self.c1a,
                    ssig2,
                    self.csig1 * csig12 - self.ssig1 * ssig12,
                );
                let serr = (1.0 + self.a1m1) * (sigma + (b12 - self.b11)) - s12_a12 / b;
                sigma -= serr / libm::sqrt(1.0 + self.k2 * ssig2 * ssig2);
                ssig12 = libm::sin(sigma);
                csig12 = libm::cos(sigma);
                // b12 is recalculated from sigma below
            }
            sig12 = sigma;
        }

        let mut ssig2 = self.ssig1 * csig12 + self.csig1 * ssig12;
        let mut csig2 = self.csig1 * csig12 - self.ssig1 * ssig12;
        let dn2 = libm::sqrt(1.0 + self.k2 * ssig2 * ssig2);

        let mut ab1 = 0.0;
        if outmask.outputs(Caps::DISTANCE)
            || outmask.outputs(Caps::REDUCED_LENGTH)
            || outmask.outputs(Caps::GEODESIC_SCALE)
        {
            if arcmode || libm::fabs(f) > 0.01 {
                b12 = sin_series(&self.c1a, ssig2, csig2);
            }
            ab1 = (1.0 + self.a1m1) * (b12 - self.b11);
        }

        // the parametric latitude and azimuth of the second point
        let sbet2 = self.calp0 * ssig2;
        let mut cbet2 = libm::hypot(self.salp0, self.calp0 * csig2);
        if cbet2 == 0.0 {
            // at a pole of a meridional geodesic
            cbet2 = TINY;
            csig2 = TINY;
        }
        let salp2 = self.salp0;
        let calp2 = self.calp0 * csig2;

        if outmask.outputs(Caps::DISTANCE) {
            result.s12 = Metres(if arcmode {
                b * ((1.0 + self.a1m1) * sig12 + ab1)
            } else {
                s12_a12
            });
        }

        if outmask.outputs(Caps::LONGITUDE) {
            let somg2 = self.salp0 * ssig2;
            let comg2 = csig2;
            // east-going or west-going
            let e = libm::copysign(1.0, self.salp0);
            let omg12 = if outmask.intersects(Caps::LONG_UNROLL) {
                e * (sig12 - (libm::atan2(ssig2, csig2) - libm::atan2(self.ssig1, self.csig1))
                    + (libm::atan2(e * somg2, comg2) - libm::atan2(e * self.somg1, self.comg1)))
            } else {
                libm::atan2(
                    somg2 * self.comg1 - comg2 * self.somg1,
                    comg2 * self.comg1 + somg2 * self.somg1,
                )
            };
            let lam12 = omg12
                + self.a3c * (sig12 + (sin_series(&self.c3a, ssig2, csig2) - self.b31));
            let lon12 = lam12.to_degrees();
            result.lon2 = Degrees(if outmask.intersects(Caps::LONG_UNROLL) {
                self.lon1.0 + lon12
            } else {
                ang_normalize(ang_normalize(self.lon1.0) + ang_normalize(lon12))
            });
            result.lon1 = self.lon1;
        }

        if outmask.outputs(Caps::LATITUDE) {
            result.lat2 = Degrees(atan2d(sbet2, f1 * cbet2));
            result.lat1 = self.lat1;
        }

        if outmask.outputs(Caps::AZIMUTH) {
            result.azi2 = Degrees(atan2d(salp2, calp2));
            result.azi1 = self.azi1;
        }

        if outmask.outputs(Caps::REDUCED_LENGTH) || outmask.outputs(Caps::GEODESIC_SCALE) {
            let b22 = sin_series(&self.c2a, ssig2, csig2);
            let ab2 = (1.0 + self.a2m1) * (b22 - self.b21);
            let j12 = (self.a1m1 - self.a2m1) * sig12 + (ab1 - ab2);
            if outmask.outputs(Caps::REDUCED_LENGTH) {
                // The cancellation of the terms dn1*(csig1*ssig2) and
                // dn2*(ssig1*csig2) is not significant
                result.m12 = Metres(
                    b * ((dn2 * (self.csig1 * ssig2) - self.dn1 * (self.ssig1 * csig2))
                        - self.csig1 * csig2 * j12),
                );
            }
            if outmask.outputs(Caps::GEODESIC_SCALE) {
                let t =
                    self.k2 * (ssig2 - self.ssig1) * (ssig2 + self.ssig1) / (self.dn1 + dn2);
                result.big_m12 = csig12 + (t * ssig2 - csig2 * j12) * self.ssig1 / self.dn1;
                result.big_m21 = csig12 - (t * self.ssig1 - self.csig1 * j12) * ssig2 / dn2;
            }
        }

        if outmask.outputs(Caps::AREA) {
            let b42 = cos_series(&self.c4a, ssig2, csig2);
            let salp12;
            let calp12;
            if self.calp0 == 0.0 || self.salp0 == 0.0 {
                // alp12 = alp2 - alp1, used in the atan2 directly as the
                // geodesic is meridional or equatorial
                salp12 = salp2 * self.calp1 - calp2 * self.salp1;
                calp12 = calp2 * self.calp1 + salp2 * self.salp1;
            } else {
                // tan(alp) = tan(alp0) * sec(sig)
                // |alp12| < 90 when the geodesic is not meridional, so the
                // formula below avoids cancellation for small sig12
                salp12 = self.calp0
                    * self.salp0
                    * (if csig12 <= 0.0 {
                        self.csig1 * (1.0 - csig12) + ssig12 * self.ssig1
                    } else {
                        ssig12 * (self.csig1 * ssig12 / (1.0 + csig12) + self.ssig1)
                    });
                calp12 = self.salp0 * self.salp0 + self.calp0 * self.calp0 * self.csig1 * csig2;
            }
            result.area =
                self.ellipsoid.c2() * libm::atan2(salp12, calp12) + self.a4 * (b42 - self.b41);
        }

        result.a12 = Degrees(if arcmode { s12_a12 } else { sig12.to_degrees() });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ellipsoid;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_direct_karney_example() {
        // the direct problem example from CFF Karney,
        // Algorithms for geodesics, Table 2:
        // lat1 40.0, azi1 30.0, s12 10,000,000m
        let wgs84_ellipsoid = Ellipsoid::wgs84();
        let line = GeodesicLine::new(
            &wgs84_ellipsoid,
            Degrees(40.0),
            Degrees(0.0),
            Degrees(30.0),
            Caps::STANDARD | Caps::DISTANCE_IN,
        );
        let result = line.position(Metres(10_000_000.0), Caps::STANDARD);

        assert!(is_within_tolerance(41.79331020506, result.lat2.0, 1e-11));
        assert!(is_within_tolerance(137.84490004377, result.lon2.0, 1e-11));
        assert!(is_within_tolerance(149.09016931807, result.azi2.0, 1e-11));
    }

    #[test]
    fn test_direct_north_to_pole() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();
        let line = GeodesicLine::new(
            &wgs84_ellipsoid,
            Degrees(0.0),
            Degrees(0.0),
            Degrees(0.0),
            Caps::ALL,
        );

        // quarter meridian arc on the auxiliary sphere ends at the pole
        let result = line.position_arc(Degrees(90.0), Caps::STANDARD);
        assert!(is_within_tolerance(90.0, result.lat2.0, 1e-9));
        assert_eq!(90.0, result.a12.0);
    }

    #[test]
    fn test_direct_equatorial() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();
        let line = GeodesicLine::new(
            &wgs84_ellipsoid,
            Degrees(0.0),
            Degrees(0.0),
            Degrees(90.0),
            Caps::STANDARD | Caps::DISTANCE_IN,
        );

        // an eastbound geodesic remains on the equator
        let result = line.position(Metres(1_000_000.0), Caps::STANDARD);
        // on the Equator the distance is the Semimajor axis times the
        // longitude difference in radians
        assert!(result.lat2.0.abs() < 1e-12);
        assert!(is_within_tolerance(
            (1_000_000.0 / wgs84_ellipsoid.a().0).to_degrees(),
            result.lon2.0,
            1e-9
        ));
        assert!(is_within_tolerance(90.0, result.azi2.0, 1e-12));
    }

    #[test]
    fn test_direct_negative_distance() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();
        let line = GeodesicLine::new(
            &wgs84_ellipsoid,
            Degrees(40.0),
            Degrees(0.0),
            Degrees(30.0),
            Caps::STANDARD | Caps::DISTANCE_IN,
        );

        // a negative distance runs the line backwards
        let result = line.position(Metres(-10_000.0), Caps::STANDARD);
        assert!(result.lat2.0 < 40.0);
        assert!(result.a12.0 < 0.0);
    }

    #[test]
    fn test_long_unroll() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();
        let line = GeodesicLine::new(
            &wgs84_ellipsoid,
            Degrees(0.0),
            Degrees(170.0),
            Degrees(90.0),
            Caps::STANDARD | Caps::DISTANCE_IN,
        );

        // on the Equator an arc of sigma advances the longitude by
        // sigma * (1 - f); 30 degrees East of 170E crosses the antimeridian
        let arc = Degrees(30.0 / (1.0 - wgs84_ellipsoid.f()));
        let wrapped = line.position_arc(arc, Caps::STANDARD);
        let unrolled = line.position_arc(arc, Caps::STANDARD | Caps::LONG_UNROLL);

        assert!(is_within_tolerance(-160.0, wrapped.lon2.0, 1e-9));
        assert!(is_within_tolerance(200.0, unrolled.lon2.0, 1e-9));
    }

    #[test]
    fn test_position_without_distance_in() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();
        let line = GeodesicLine::new(
            &wgs84_ellipsoid,
            Degrees(40.0),
            Degrees(0.0),
            Degrees(30.0),
            Caps::STANDARD,
        );

        // a line without DISTANCE_IN cannot calculate a position from a
        // distance
        let result = line.position(Metres(10_000.0), Caps::STANDARD);
        assert!(result.lat2.0.is_nan());
        assert!(result.a12.0.is_nan());

        // but an arc length position is always available
        let result = line.position_arc(Degrees(1.0), Caps::LATITUDE);
        assert!(!result.lat2.0.is_nan());
    }

    #[test]
    fn test_caps_restrict_outputs() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();
        let line = GeodesicLine::new(
            &wgs84_ellipsoid,
            Degrees(40.0),
            Degrees(0.0),
            Degrees(30.0),
            Caps::LATITUDE | Caps::DISTANCE_IN,
        );

        let result = line.position(Metres(10_000.0), Caps::ALL);
        assert!(!result.lat2.0.is_nan());
        // longitude and area were not in the construction mask
        assert!(result.lon2.0.is_nan());
        assert!(result.area.is_nan());
    }
}
