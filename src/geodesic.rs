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

//! The geodesic module contains the solver for the inverse geodesic problem:
//! the azimuths, length and other properties of the geodesic between two
//! points on the surface of an ellipsoid.
//!
//! It uses the method given by CFF Karney in
//! [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf):
//! the problem is transferred to the auxiliary sphere and Newton's method is
//! used to find the initial azimuth which matches the required longitude
//! difference, falling back to bisection of a bracketing interval whenever a
//! Newton step leaves it.

#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::too_many_lines)]

use crate::ellipsoid::coefficients::{
    cos_series, evaluate_a1, evaluate_a2, evaluate_coeffs_c1, evaluate_coeffs_c2,
    evaluate_coeffs_c4y, sin_series,
};
use crate::Ellipsoid;
use angle_sc::{trig, Angle, Degrees};
use icao_units::si::Metres;

/// The square root of the minimum positive f64, used in place of zero
/// denominators and azimuth components.
pub(crate) const TINY: f64 = 1.491_668_146_240_041_3e-154;

/// The convergence tolerance for Newton's method.
const TOL0: f64 = f64::EPSILON;
/// The tolerance on the astroid y parameter.
const TOL1: f64 = 200.0 * TOL0;
/// The tolerance for declaring the bracketing interval converged.
const TOLB: f64 = TOL0;

/// The maximum number of Newton iterations to attempt.
const MAXIT1: u32 = 20;
/// The maximum number of iterations including bisection steps.
const MAXIT2: u32 = MAXIT1 + f64::MANTISSA_DIGITS + 10;

/// A bit mask selecting the quantities that a geodesic calculation computes.
///
/// Each output flag also carries the series capabilities required to compute
/// it, so that a `GeodesicLine` caches exactly the coefficient tables its
/// mask requires. Quantities not selected are reported as NaN.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Caps(u32);

impl Caps {
    pub(crate) const CAP_C1: Self = Self(1 << 0);
    pub(crate) const CAP_C1P: Self = Self(1 << 1);
    pub(crate) const CAP_C2: Self = Self(1 << 2);
    pub(crate) const CAP_C3: Self = Self(1 << 3);
    pub(crate) const CAP_C4: Self = Self(1 << 4);
    pub(crate) const CAP_ALL: Self = Self(0x1F);
    pub(crate) const OUT_ALL: Self = Self(0x7F80);

    /// No output quantities.
    pub const NONE: Self = Self(0);
    /// The latitude of the second point.
    pub const LATITUDE: Self = Self(1 << 7);
    /// The longitude of the second point.
    pub const LONGITUDE: Self = Self(1 << 8 | Self::CAP_C3.0);
    /// The azimuths at both points.
    pub const AZIMUTH: Self = Self(1 << 9);
    /// The distance between the points.
    pub const DISTANCE: Self = Self(1 << 10 | Self::CAP_C1.0);
    /// Accept distance (rather than arc length) as the input parameter of
    /// a position calculation.
    pub const DISTANCE_IN: Self = Self(1 << 11 | Self::CAP_C1.0 | Self::CAP_C1P.0);
    /// The reduced length of the geodesic.
    pub const REDUCED_LENGTH: Self = Self(1 << 12 | Self::CAP_C1.0 | Self::CAP_C2.0);
    /// The geodesic scales M12 and M21.
    pub const GEODESIC_SCALE: Self = Self(1 << 13 | Self::CAP_C1.0 | Self::CAP_C2.0);
    /// The area under the geodesic.
    pub const AREA: Self = Self(1 << 14 | Self::CAP_C4.0);
    /// Unroll the longitude instead of wrapping it to [-180°, 180°).
    pub const LONG_UNROLL: Self = Self(1 << 15);

    /// Latitude, longitude, azimuths and distance.
    pub const STANDARD: Self = Self(
        Self::LATITUDE.0 | Self::LONGITUDE.0 | Self::AZIMUTH.0 | Self::DISTANCE.0,
    );
    /// All output quantities.
    pub const ALL: Self = Self(Self::OUT_ALL.0 | Self::CAP_ALL.0);

    /// Whether all the bits of `other` are set in this mask.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Whether any of the bits of `other` are set in this mask.
    #[must_use]
    pub(crate) const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Whether the output flag of `other` is set in this mask,
    /// ignoring the series capability bits.
    #[must_use]
    pub(crate) const fn outputs(self, other: Self) -> bool {
        (self.0 & other.0 & Self::OUT_ALL.0) != 0
    }
}

impl core::ops::BitOr for Caps {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for Caps {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl core::ops::BitAnd for Caps {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// The quantities describing a geodesic between two points.
///
/// Every field defaults to NaN; a calculation only writes the fields that
/// its capability mask selects, except `a12` which is always computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeodesicResult {
    /// The latitude of the first point.
    pub lat1: Degrees,
    /// The longitude of the first point.
    pub lon1: Degrees,
    /// The azimuth at the first point, clockwise from North.
    pub azi1: Degrees,
    /// The latitude of the second point.
    pub lat2: Degrees,
    /// The longitude of the second point.
    pub lon2: Degrees,
    /// The azimuth at the second point, clockwise from North.
    pub azi2: Degrees,
    /// The distance between the points.
    pub s12: Metres,
    /// The arc length between the points on the auxiliary sphere.
    pub a12: Degrees,
    /// The reduced length of the geodesic.
    pub m12: Metres,
    /// The geodesic scale of the second point relative to the first.
    pub big_m12: f64,
    /// The geodesic scale of the first point relative to the second.
    pub big_m21: f64,
    /// The area in square metres between the geodesic and the equator.
    pub area: f64,
}

impl Default for GeodesicResult {
    fn default() -> Self {
        Self {
            lat1: Degrees(f64::NAN),
            lon1: Degrees(f64::NAN),
            azi1: Degrees(f64::NAN),
            lat2: Degrees(f64::NAN),
            lon2: Degrees(f64::NAN),
            azi2: Degrees(f64::NAN),
            s12: Metres(f64::NAN),
            a12: Degrees(f64::NAN),
            m12: Metres(f64::NAN),
            big_m12: f64::NAN,
            big_m21: f64::NAN,
            area: f64::NAN,
        }
    }
}

/// The error free sum of two numbers, see Knuth TAOCP vol 2.
///
/// returns the round off free pair (`u + v`, residual).
#[must_use]
pub(crate) fn two_sum(u: f64, v: f64) -> (f64, f64) {
    let s = u + v;
    let up = s - v;
    let vpp = s - up;
    let up = up - u;
    let vpp = vpp - v;
    // the residual is zero when s is zero, preserving the sign of zero
    let t = if s == 0.0 { s } else { 0.0 - (up + vpp) };
    (s, t)
}

/// Normalise a degrees value to the range [-180°, 180°].
#[must_use]
pub(crate) fn ang_normalize(degrees: f64) -> f64 {
    let x = libm::remainder(degrees, 360.0);
    if x == -180.0 {
        180.0
    } else {
        x
    }
}

/// The exact difference `y - x` of two angles in degrees reduced to
/// [-180°, 180°], together with the residual of the reduction.
#[must_use]
pub(crate) fn ang_diff(x: f64, y: f64) -> (f64, f64) {
    let (d, t) = two_sum(libm::remainder(-x, 360.0), libm::remainder(y, 360.0));
    let d = ang_normalize(d);
    // -180 and 180 are equivalent, choose the sign which makes the
    // residual reduction exact
    two_sum(if d == 180.0 && t > 0.0 { -180.0 } else { d }, t)
}

/// Round a degrees value, converting underflowed values near multiples of
/// 90° to exact multiples so that directions such as due East stay exact.
#[must_use]
pub(crate) fn ang_round(x: f64) -> f64 {
    // 1/16 is representable exactly and 90/16 degrees is well above the
    // largest angle for which the rounding matters
    const Z: f64 = 1.0 / 16.0;
    if x == 0.0 {
        x
    } else {
        let y = libm::fabs(x);
        let y = if y < Z { Z - (Z - y) } else { y };
        libm::copysign(y, x)
    }
}

/// Replace latitudes outside [-90°, 90°] with NaN.
#[must_use]
pub(crate) fn lat_fix(x: f64) -> f64 {
    if libm::fabs(x) > 90.0 {
        f64::NAN
    } else {
        x
    }
}

/// The sine and cosine of an angle in degrees, exact for multiples of 90°.
#[must_use]
pub(crate) fn sincosd(degrees: f64) -> (f64, f64) {
    if degrees.is_finite() {
        let angle = Angle::from(Degrees(degrees));
        (angle.sin().0, angle.cos().0)
    } else {
        (f64::NAN, f64::NAN)
    }
}

/// The sine and cosine of an angle in degrees plus a small correction `t`.
#[must_use]
pub(crate) fn sincosde(degrees: f64, t: f64) -> (f64, f64) {
    if degrees.is_finite() {
        let angle = Angle::from(Degrees(degrees)) + Angle::from(Degrees(t));
        (angle.sin().0, angle.cos().0)
    } else {
        (f64::NAN, f64::NAN)
    }
}

/// The angle in degrees of the vector (`x`, `y`), exact for the
/// cardinal directions.
#[must_use]
pub(crate) fn atan2d(y: f64, x: f64) -> f64 {
    let mut x = x;
    let mut y = y;
    let mut q = 0;
    if libm::fabs(y) > libm::fabs(x) {
        core::mem::swap(&mut x, &mut y);
        q = 2;
    }
    if x < 0.0 {
        x = -x;
        q += 1;
    }
    let angle = libm::atan2(y, x).to_degrees();
    match q {
        1 => libm::copysign(180.0, y) - angle,
        2 => 90.0 - angle,
        3 => angle - 90.0,
        _ => angle,
    }
}

/// Normalise a sine and cosine pair to a point on the unit circle.
pub(crate) fn norm(x: &mut f64, y: &mut f64) {
    let h = libm::hypot(*x, *y);
    *x /= h;
    *y /= h;
}

/// Estimate omega12 by solving the astroid problem.
/// Solve k^4+2*k^3-(x^2+y^2-1)*k^2-2*y^2*k-y^2 = 0 for positive root k.
/// * `x`, `y` - astroid parameters, see Karney section 7.
///
/// returns the solution to the astroid problem.
#[must_use]
pub(crate) fn calculate_astroid(x: f64, y: f64) -> f64 {
    let p = x * x;
    let q = y * y;
    let r = (p + q - 1.0) / 6.0;

    // y = 0 with |x| <= 1
    // for y small, positive root is k = abs(y)/sqrt(1-x^2)
    if (q <= 0.0) && (r <= 0.0) {
        0.0
    } else {
        let s = p * q / 4.0;
        let r2 = r * r;
        let r3 = r * r2;
        let mut u = r;

        // The discriminant of the quadratic equation for T3.
        // This is zero on the evolute curve p^(1/3)+q^(1/3) = 1
        let discriminant = s * (s + 2.0 * r3);
        if 0.0 <= discriminant {
            let mut t3 = s + r3;
            // Pick the sign on the sqrt to maximize abs(T3), to minimise loss
            // of precision due to cancellation.
            t3 += if t3 < 0.0 {
                -libm::sqrt(discriminant)
            } else {
                libm::sqrt(discriminant)
            };
            let t = libm::cbrt(t3);
            u += if t == 0.0 { 0.0 } else { t + r2 / t };
        } else {
            // T is complex, but the way u is defined the result is real.
            let angle = libm::atan2(libm::sqrt(-discriminant), -(s + r3));
            // There are three possible cube roots.  We choose the root which
            // avoids cancellation.  Note: discriminant < 0 implies that r < 0.
            u += 2.0 * r * libm::cos(angle / 3.0);
        }

        let v = libm::sqrt(u * u + q); // guaranteed positive
        let uv = if u < 0.0 { q / (v - u) } else { u + v }; // u+v, guaranteed positive
        let w = (uv - q) / (2.0 * v); // positive?

        // Rearrange expression for k to avoid loss of accuracy due to subtraction.
        // Division by 0 not possible because uv > 0, w >= 0.
        uv / (libm::sqrt(uv + w * w) + w) // guaranteed positive
    }
}

/// The integral quantities of a section of a geodesic:
/// the distance, reduced length and geodesic scales, all relative to the
/// Semiminor axis.
#[derive(Clone, Copy)]
pub(crate) struct SectionLengths {
    /// distance / b
    pub s12b: f64,
    /// (reduced length) / b
    pub m12b: f64,
    /// the coefficient of the linear term of the reduced length
    pub m0: f64,
    /// geodesic scale of point 2 relative to point 1
    pub big_m12: f64,
    /// geodesic scale of point 1 relative to point 2
    pub big_m21: f64,
}

/// Calculate the length integrals between two points on a geodesic from
/// their great circle arc distances `sigma1` and `sigma2` from the Northward
/// Equator crossing.
/// CFF Karney, Eqs. 38 to 40.
#[must_use]
pub(crate) fn calculate_lengths(
    eps: f64,
    sigma12: f64,
    ssig1: f64,
    csig1: f64,
    dn1: f64,
    ssig2: f64,
    csig2: f64,
    dn2: f64,
    cbet1: f64,
    cbet2: f64,
    outmask: Caps,
    ep_2: f64,
) -> SectionLengths {
    let mut result = SectionLengths {
        s12b: f64::NAN,
        m12b: f64::NAN,
        m0: f64::NAN,
        big_m12: f64::NAN,
        big_m21: f64::NAN,
    };

    let distance = outmask.outputs(Caps::DISTANCE);
    let lengths = outmask.outputs(Caps::REDUCED_LENGTH) || outmask.outputs(Caps::GEODESIC_SCALE);

    let mut a1 = 0.0;
    let mut a2 = 0.0;
    let mut m0x = 0.0;
    let mut j12 = 0.0;
    if distance || lengths {
        a1 = 1.0 + evaluate_a1(eps);
    }
    if lengths {
        a2 = 1.0 + evaluate_a2(eps);
        m0x = a1 - a2;
    }

    if distance {
        let c1a = evaluate_coeffs_c1(eps);
        let b1 = sin_series(&c1a, ssig2, csig2) - sin_series(&c1a, ssig1, csig1);
        result.s12b = a1 * (sigma12 + b1);
        if lengths {
            let c2a = evaluate_coeffs_c2(eps);
            let b2 = sin_series(&c2a, ssig2, csig2) - sin_series(&c2a, ssig1, csig1);
            j12 = m0x * sigma12 + (a1 * b1 - a2 * b2);
        }
    } else if lengths {
        // fold the C1 and C2 series together for the J12 integral
        let c1a = evaluate_coeffs_c1(eps);
        let mut c2a = evaluate_coeffs_c2(eps);
        for i in 1..c2a.len() {
            c2a[i] = a1 * c1a[i] - a2 * c2a[i];
        }
        j12 = m0x * sigma12 + (sin_series(&c2a, ssig2, csig2) - sin_series(&c2a, ssig1, csig1));
    }
    result.m0 = m0x;

    if outmask.outputs(Caps::REDUCED_LENGTH) {
        // The cancellation of the terms dn1*(csig1*ssig2) and
        // dn2*(ssig1*csig2) is not significant
        result.m12b = dn2 * (csig1 * ssig2) - dn1 * (ssig1 * csig2) - csig1 * csig2 * j12;
    }
    if outmask.outputs(Caps::GEODESIC_SCALE) {
        let csig12 = csig1 * csig2 + ssig1 * ssig2;
        let t = ep_2 * (cbet1 - cbet2) * (cbet1 + cbet2) / (dn1 + dn2);
        result.big_m12 = csig12 + (t * ssig2 - csig2 * j12) * ssig1 / dn1;
        result.big_m21 = csig12 - (t * ssig1 - csig1 * j12) * ssig2 / dn2;
    }

    result
}

/// The starting guess for Newton's method produced by
/// `calculate_inverse_start`.
struct InverseStart {
    /// the arc length, non-negative when the starting guess is exact
    sig12: f64,
    /// sine of the initial azimuth
    salp1: f64,
    /// cosine of the initial azimuth
    calp1: f64,
    /// sine of the final azimuth, only set for really short lines
    salp2: f64,
    /// cosine of the final azimuth, only set for really short lines
    calp2: f64,
    /// the mean value of sqrt(1 + ep_2 * sin(beta)^2) for short lines
    dnm: f64,
}

/// Estimate the initial azimuth on the auxiliary sphere.
///
/// For short lines the great circle azimuth is used directly; for nearly
/// antipodal points the astroid problem is solved, see Karney section 7.
/// A non-negative `sig12` is returned when the azimuth estimate is exact
/// enough to skip Newton's method.
#[must_use]
fn calculate_inverse_start(
    sbet1: f64,
    cbet1: f64,
    dn1: f64,
    sbet2: f64,
    cbet2: f64,
    dn2: f64,
    lam12: f64,
    slam12: f64,
    clam12: f64,
    ellipsoid: &Ellipsoid,
) -> InverseStart {
    let f = ellipsoid.f();
    let f1 = ellipsoid.one_minus_f();
    let ep_2 = ellipsoid.ep_2();
    let n = ellipsoid.n();

    let tol2 = libm::sqrt(TOL0);
    let xthresh = 1000.0 * tol2;
    let etol2 =
        0.1 * tol2 / libm::sqrt(f64::max(0.001, libm::fabs(f)) * f64::min(1.0, 1.0 - f / 2.0) / 2.0);

    let mut result = InverseStart {
        sig12: -1.0,
        salp1: f64::NAN,
        calp1: f64::NAN,
        salp2: f64::NAN,
        calp2: f64::NAN,
        dnm: f64::NAN,
    };

    let sbet12 = sbet2 * cbet1 - cbet2 * sbet1;
    let cbet12 = cbet2 * cbet1 + sbet2 * sbet1;
    let sbet12a = sbet2 * cbet1 + cbet2 * sbet1;

    let shortline = cbet12 >= 0.0 && sbet12 < 0.5 && cbet2 * lam12 < 0.5;
    let (mut somg12, mut comg12) = if shortline {
        let mut sbetm2 = (sbet1 + sbet2) * (sbet1 + sbet2);
        sbetm2 /= sbetm2 + (cbet1 + cbet2) * (cbet1 + cbet2);
        result.dnm = libm::sqrt(1.0 + ep_2 * sbetm2);
        let omg12 = lam12 / (f1 * result.dnm);
        (libm::sin(omg12), libm::cos(omg12))
    } else {
        (slam12, clam12)
    };

    result.salp1 = cbet2 * somg12;
    result.calp1 = if comg12 >= 0.0 {
        sbet12 + cbet2 * sbet1 * somg12 * somg12 / (1.0 + comg12)
    } else {
        sbet12a - cbet2 * sbet1 * somg12 * somg12 / (1.0 - comg12)
    };

    let ssig12 = libm::hypot(result.salp1, result.calp1);
    let csig12 = sbet1 * sbet2 + cbet1 * cbet2 * comg12;

    if shortline && ssig12 < etol2 {
        // really short lines, the great circle azimuths are exact enough
        result.salp2 = cbet1 * somg12;
        result.calp2 = sbet12
            - cbet1
                * sbet2
                * (if comg12 >= 0.0 {
                    somg12 * somg12 / (1.0 + comg12)
                } else {
                    1.0 - comg12
                });
        norm(&mut result.salp2, &mut result.calp2);
        result.sig12 = libm::atan2(ssig12, csig12);
    } else if libm::fabs(n) > 0.1
        || csig12 >= 0.0
        || ssig12 >= 6.0 * libm::fabs(n) * core::f64::consts::PI * cbet1 * cbet1
    {
        // the great circle azimuth estimate is good enough for Newton's method
    } else {
        // nearly antipodal, solve the astroid problem
        let lam12x = libm::atan2(-slam12, -clam12);
        let x;
        let y;
        let lamscale;
        let betscale;
        if f >= 0.0 {
            // at the antipodal seed cos(alpha0) is approximately sin(beta1)
            let eps = ellipsoid.calculate_epsilon(trig::UnitNegRange(cbet1));
            lamscale = f * cbet1 * ellipsoid.calculate_a3f(eps) * core::f64::consts::PI;
            betscale = lamscale * cbet1;
            x = lam12x / lamscale;
            y = sbet12a / betscale;
        } else {
            // a prolate ellipsoid
            let cbet12a = cbet2 * cbet1 - sbet2 * sbet1;
            let bet12a = libm::atan2(sbet12a, cbet12a);
            let lengths = calculate_lengths(
                n,
                core::f64::consts::PI + bet12a,
                sbet1,
                -cbet1,
                dn1,
                sbet2,
                cbet2,
                dn2,
                cbet1,
                cbet2,
                Caps::REDUCED_LENGTH,
                ep_2,
            );
            x = -1.0 + lengths.m12b / (cbet1 * cbet2 * lengths.m0 * core::f64::consts::PI);
            betscale = if x < -0.01 {
                sbet12a / x
            } else {
                -f * cbet1 * cbet1 * core::f64::consts::PI
            };
            lamscale = betscale / cbet1;
            y = lam12x / lamscale;
        }

        if y > -TOL1 && x > -1.0 - xthresh {
            // strip near cut, the geodesic runs close to the azimuth limit
            if f >= 0.0 {
                result.salp1 = f64::min(1.0, -x);
                result.calp1 = -libm::sqrt(1.0 - result.salp1 * result.salp1);
            } else {
                result.calp1 = f64::max(if x > -TOL1 { 0.0 } else { -1.0 }, x);
                result.salp1 = libm::sqrt(1.0 - result.calp1 * result.calp1);
            }
        } else {
            let k = calculate_astroid(x, y);
            let omg12a = lamscale
                * if f >= 0.0 {
                    -x * k / (1.0 + k)
                } else {
                    -y * (1.0 + k) / k
                };
            somg12 = libm::sin(omg12a);
            comg12 = -libm::cos(omg12a);
            result.salp1 = cbet2 * somg12;
            result.calp1 = sbet12a - cbet2 * sbet1 * somg12 * somg12 / (1.0 - comg12);
        }
    }

    // sanity check on the estimate, otherwise Newton's method starts due East
    if result.salp1 > 0.0 {
        norm(&mut result.salp1, &mut result.calp1);
    } else {
        result.salp1 = 1.0;
        result.calp1 = 0.0;
    }

    result
}

/// The longitude residual of a trial initial azimuth and the state of the
/// geodesic it defines, produced by `calculate_lambda12`.
struct Lambda12 {
    /// the longitude difference residual, lambda12(alpha1) - lambda12
    v: f64,
    salp2: f64,
    calp2: f64,
    sig12: f64,
    ssig1: f64,
    csig1: f64,
    ssig2: f64,
    csig2: f64,
    eps: f64,
    /// the difference between the sphere and ellipsoid longitudes
    domg12: f64,
    /// the derivative of lambda12 with respect to alpha1
    dv: f64,
}

/// Calculate the longitude difference residual for the trial initial
/// azimuth (`salp1`, `calp1`), and its derivative when `diffp` is set.
/// CFF Karney, Eqs. 102 to 106.
#[must_use]
fn calculate_lambda12(
    sbet1: f64,
    cbet1: f64,
    dn1: f64,
    sbet2: f64,
    cbet2: f64,
    dn2: f64,
    salp1: f64,
    calp1: f64,
    slam120: f64,
    clam120: f64,
    diffp: bool,
    ellipsoid: &Ellipsoid,
) -> Lambda12 {
    let f = ellipsoid.f();
    let f1 = ellipsoid.one_minus_f();
    let ep_2 = ellipsoid.ep_2();

    // break the degeneracy of an equatorial line running due West
    let calp1 = if sbet1 == 0.0 && calp1 == 0.0 {
        -TINY
    } else {
        calp1
    };

    // Clairaut's constant and the cosine of the equatorial azimuth
    let salp0 = salp1 * cbet1;
    let calp0 = libm::hypot(calp1, salp1 * sbet1);

    let mut ssig1 = sbet1;
    let somg1 = salp0 * sbet1;
    let mut csig1 = calp1 * cbet1;
    let comg1 = csig1;
    norm(&mut ssig1, &mut csig1);

    // the end azimuth from Clairaut's relation, avoiding cancellation
    let salp2 = if cbet2 != cbet1 { salp0 / cbet2 } else { salp1 };
    let calp2 = if cbet2 != cbet1 || libm::fabs(sbet2) != -sbet1 {
        libm::sqrt(
            (calp1 * cbet1) * (calp1 * cbet1)
                + if cbet1 < -sbet1 {
                    (cbet2 - cbet1) * (cbet1 + cbet2)
                } else {
                    (sbet1 - sbet2) * (sbet1 + sbet2)
                },
        ) / cbet2
    } else {
        libm::fabs(calp1)
    };

    let mut ssig2 = sbet2;
    let somg2 = salp0 * sbet2;
    let mut csig2 = calp2 * cbet2;
    let comg2 = csig2;
    norm(&mut ssig2, &mut csig2);

    let sig12 = libm::atan2(
        f64::max(0.0, csig1 * ssig2 - ssig1 * csig2),
        csig1 * csig2 + ssig1 * ssig2,
    );

    let somg12 = f64::max(0.0, comg1 * somg2 - somg1 * comg2);
    let comg12 = comg1 * comg2 + somg1 * somg2;

    // eta is the spherical longitude difference minus the target difference
    let eta = libm::atan2(
        somg12 * clam120 - comg12 * slam120,
        comg12 * clam120 + somg12 * slam120,
    );

    let k2 = calp0 * calp0 * ep_2;
    let eps = k2 / (2.0 * (1.0 + libm::sqrt(1.0 + k2)) + k2);
    let c3a = ellipsoid.calculate_c3y(eps);
    let b312 = sin_series(&c3a, ssig2, csig2) - sin_series(&c3a, ssig1, csig1);
    let domg12 = -f * ellipsoid.calculate_a3f(eps) * salp0 * (sig12 + b312);
    let v = eta + domg12;

    let dv = if diffp {
        if calp2 == 0.0 {
            -2.0 * f1 * dn1 / sbet1
        } else {
            let lengths = calculate_lengths(
                eps,
                sig12,
                ssig1,
                csig1,
                dn1,
                ssig2,
                csig2,
                dn2,
                cbet1,
                cbet2,
                Caps::REDUCED_LENGTH,
                ep_2,
            );
            lengths.m12b * f1 / (calp2 * cbet2)
        }
    } else {
        f64::NAN
    };

    Lambda12 {
        v,
        salp2,
        calp2,
        sig12,
        ssig1,
        csig1,
        ssig2,
        csig2,
        eps,
        domg12,
        dv,
    }
}

/// The solution of the inverse geodesic problem in canonical form:
/// the integral quantities plus the sines and cosines of the azimuths at
/// both points.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InverseSolution {
    pub a12: f64,
    pub s12: f64,
    pub m12: f64,
    pub big_m12: f64,
    pub big_m21: f64,
    pub area: f64,
    pub salp1: f64,
    pub calp1: f64,
    pub salp2: f64,
    pub calp2: f64,
}

impl Default for InverseSolution {
    fn default() -> Self {
        Self {
            a12: f64::NAN,
            s12: f64::NAN,
            m12: f64::NAN,
            big_m12: f64::NAN,
            big_m21: f64::NAN,
            area: f64::NAN,
            salp1: f64::NAN,
            calp1: f64::NAN,
            salp2: f64::NAN,
            calp2: f64::NAN,
        }
    }
}

/// Solve the inverse geodesic problem between two points in geodetic
/// coordinates, in degrees.
///
/// The problem is canonicalised so that the first point lies South of the
/// Equator, further from it than the second point, with a non-negative
/// longitude difference; the signs are restored on the way out.
/// The solver never fails: if Newton's method does not converge, the best
/// iterate of the bracketed bisection is used.
#[must_use]
pub(crate) fn calculate_geodesic_inverse(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
    outmask: Caps,
    ellipsoid: &Ellipsoid,
) -> InverseSolution {
    let mut result = InverseSolution::default();
    if !(lat1 + lon1 + lat2 + lon2).is_finite() {
        return result;
    }

    let a = ellipsoid.a().0;
    let b = ellipsoid.b().0;
    let f = ellipsoid.f();
    let f1 = ellipsoid.one_minus_f();
    let e_2 = ellipsoid.e_2();
    let ep_2 = ellipsoid.ep_2();

    let outmask = outmask & Caps::OUT_ALL;

    let (lon12, lon12s) = ang_diff(lon1, lon2);
    let mut lonsign = if lon12 >= 0.0 { 1.0 } else { -1.0 };
    let lon12 = lonsign * lon12;
    let lon12s = lonsign * lon12s;
    let lam12 = lon12.to_radians();
    // calculate sin and cos of the longitude difference, accurately even
    // when lon12 is close to 180 degrees
    let (slam12, clam12) = sincosde(lon12, lon12s);

    let mut lat1 = ang_round(lat_fix(lat1));
    let mut lat2 = ang_round(lat_fix(lat2));

    // canonicalise: start at the latitude furthest from the Equator
    let swapp = if libm::fabs(lat1) < libm::fabs(lat2) || lat2.is_nan() {
        -1.0
    } else {
        1.0
    };
    if swapp < 0.0 {
        lonsign = -lonsign;
        core::mem::swap(&mut lat1, &mut lat2);
    }
    // canonicalise: start South of the Equator
    let latsign = if lat1 < 0.0 { 1.0 } else { -1.0 };
    let lat1 = lat1 * latsign;
    let lat2 = lat2 * latsign;

    let (mut sbet1, mut cbet1) = sincosd(lat1);
    sbet1 *= f1;
    norm(&mut sbet1, &mut cbet1);
    cbet1 = f64::max(TINY, cbet1);

    let (mut sbet2, mut cbet2) = sincosd(lat2);
    sbet2 *= f1;
    norm(&mut sbet2, &mut cbet2);
    cbet2 = f64::max(TINY, cbet2);

    // When the points are at the same latitude make the parametric
    // latitudes match exactly, so that equal geodetic latitudes map to a
    // single sigma on the auxiliary sphere.
    if cbet1 < -sbet1 {
        if cbet2 == cbet1 {
            sbet2 = libm::copysign(sbet1, sbet2);
        }
    } else if libm::fabs(sbet2) == -sbet1 {
        cbet2 = cbet1;
    }

    let dn1 = libm::sqrt(1.0 + ep_2 * sbet1 * sbet1);
    let dn2 = libm::sqrt(1.0 + ep_2 * sbet2 * sbet2);

    let mut a12 = f64::NAN;
    let mut sig12 = f64::NAN;
    let mut s12x = f64::NAN;
    let mut m12x = f64::NAN;
    let mut big_m12 = f64::NAN;
    let mut big_m21 = f64::NAN;
    let mut salp1 = f64::NAN;
    let mut calp1 = f64::NAN;
    let mut salp2 = f64::NAN;
    let mut calp2 = f64::NAN;

    let mut somg12 = 2.0;
    let mut comg12 = 0.0;
    let mut omg12 = 0.0;

    let mut meridian = lat1 == -90.0 || slam12 == 0.0;
    if meridian {
        // the geodesic runs along a meridian on the auxiliary sphere
        calp1 = clam12;
        salp1 = slam12;
        calp2 = 1.0;
        salp2 = 0.0;

        let ssig1 = sbet1;
        let csig1 = calp1 * cbet1;
        let ssig2 = sbet2;
        let csig2 = calp2 * cbet2;

        sig12 = libm::atan2(
            f64::max(0.0, csig1 * ssig2 - ssig1 * csig2),
            csig1 * csig2 + ssig1 * ssig2,
        );
        // on a meridian calp0 = 1 and eps reduces to the third flattening
        let lengths = calculate_lengths(
            ellipsoid.n(),
            sig12,
            ssig1,
            csig1,
            dn1,
            ssig2,
            csig2,
            dn2,
            cbet1,
            cbet2,
            outmask | Caps::DISTANCE | Caps::REDUCED_LENGTH,
            ep_2,
        );
        s12x = lengths.s12b;
        m12x = lengths.m12b;
        big_m12 = lengths.big_m12;
        big_m21 = lengths.big_m21;

        if sig12 < 1.0 || m12x >= 0.0 {
            if sig12 < 3.0 * TINY || (sig12 < TOL0 && (s12x < 0.0 || m12x < 0.0)) {
                // coincident points
                sig12 = 0.0;
                m12x = 0.0;
                s12x = 0.0;
            }
            m12x *= b;
            s12x *= b;
            a12 = sig12.to_degrees();
        } else {
            // m12 < 0, the shortest path passes beside the pole on a
            // prolate ellipsoid, treat as a general geodesic
            meridian = false;
        }
    }

    if !meridian && sbet1 == 0.0 && (f <= 0.0 || lon12s >= f * 180.0) {
        // the geodesic runs along the Equator
        calp1 = 0.0;
        calp2 = 0.0;
        salp1 = 1.0;
        salp2 = 1.0;
        s12x = a * lam12;
        sig12 = lam12 / f1;
        omg12 = sig12;
        m12x = b * libm::sin(sig12);
        if outmask.outputs(Caps::GEODESIC_SCALE) {
            big_m12 = libm::cos(sig12);
            big_m21 = big_m12;
        }
        a12 = lon12 / f1;
    } else if !meridian {
        let start = calculate_inverse_start(
            sbet1, cbet1, dn1, sbet2, cbet2, dn2, lam12, slam12, clam12, ellipsoid,
        );
        sig12 = start.sig12;
        salp1 = start.salp1;
        calp1 = start.calp1;
        salp2 = start.salp2;
        calp2 = start.calp2;

        if sig12 >= 0.0 {
            // a short line, the starting guess is the solution
            let dnm = start.dnm;
            s12x = sig12 * b * dnm;
            m12x = dnm * dnm * b * libm::sin(sig12 / dnm);
            if outmask.outputs(Caps::GEODESIC_SCALE) {
                big_m12 = libm::cos(sig12 / dnm);
                big_m21 = big_m12;
            }
            a12 = sig12.to_degrees();
            omg12 = lam12 / (f1 * dnm);
        } else {
            // Newton's method on the longitude difference residual,
            // maintaining a bracketing interval [(salp1a, calp1a),
            // (salp1b, calp1b)] and bisecting it whenever a Newton step
            // fails to improve the estimate
            let mut tripn = false;
            let mut tripb = false;
            let mut salp1a = TINY;
            let mut calp1a = 1.0;
            let mut salp1b = TINY;
            let mut calp1b = -1.0;

            let mut ssig1 = f64::NAN;
            let mut csig1 = f64::NAN;
            let mut ssig2 = f64::NAN;
            let mut csig2 = f64::NAN;
            let mut eps = f64::NAN;
            let mut domg12 = f64::NAN;
            sig12 = f64::NAN;

            for numit in 0..MAXIT2 {
                let trial = calculate_lambda12(
                    sbet1,
                    cbet1,
                    dn1,
                    sbet2,
                    cbet2,
                    dn2,
                    salp1,
                    calp1,
                    slam12,
                    clam12,
                    numit < MAXIT1,
                    ellipsoid,
                );
                let v = trial.v;
                salp2 = trial.salp2;
                calp2 = trial.calp2;
                sig12 = trial.sig12;
                ssig1 = trial.ssig1;
                csig1 = trial.csig1;
                ssig2 = trial.ssig2;
                csig2 = trial.csig2;
                eps = trial.eps;
                domg12 = trial.domg12;

                let threshold = if tripn { 8.0 * TOL0 } else { TOL0 };
                if tripb || !(libm::fabs(v) >= threshold) {
                    break;
                }
                // maintain the bracket on salp1/calp1
                if v > 0.0 && (numit > MAXIT1 || calp1 / salp1 > calp1b / salp1b) {
                    salp1b = salp1;
                    calp1b = calp1;
                } else if v < 0.0 && (numit > MAXIT1 || calp1 / salp1 < calp1a / salp1a) {
                    salp1a = salp1;
                    calp1a = calp1;
                }

                if numit < MAXIT1 && trial.dv > 0.0 {
                    let dalp1 = -v / trial.dv;
                    let sdalp1 = libm::sin(dalp1);
                    let cdalp1 = libm::cos(dalp1);
                    let nsalp1 = salp1 * cdalp1 + calp1 * sdalp1;
                    if nsalp1 > 0.0 && libm::fabs(dalp1) < core::f64::consts::PI {
                        calp1 = calp1 * cdalp1 - salp1 * sdalp1;
                        salp1 = nsalp1;
                        norm(&mut salp1, &mut calp1);
                        // once v is small, a couple more iterations suffice
                        tripn = libm::fabs(v) <= 16.0 * TOL0;
                        continue;
                    }
                }
                // the Newton step failed or ran out of budget, bisect
                salp1 = (salp1a + salp1b) / 2.0;
                calp1 = (calp1a + calp1b) / 2.0;
                norm(&mut salp1, &mut calp1);
                tripn = false;
                tripb = libm::fabs(salp1a - salp1) + (calp1a - calp1) < TOLB
                    || libm::fabs(salp1 - salp1b) + (calp1 - calp1b) < TOLB;
            }

            let lengths = calculate_lengths(
                eps,
                sig12,
                ssig1,
                csig1,
                dn1,
                ssig2,
                csig2,
                dn2,
                cbet1,
                cbet2,
                outmask | Caps::DISTANCE,
                ep_2,
            );
            s12x = lengths.s12b;
            m12x = lengths.m12b;
            big_m12 = lengths.big_m12;
            big_m21 = lengths.big_m21;

            m12x *= b;
            s12x *= b;
            a12 = sig12.to_degrees();

            if outmask.outputs(Caps::AREA) {
                // rotate the longitude difference back onto the sphere
                let sdomg12 = libm::sin(domg12);
                let cdomg12 = libm::cos(domg12);
                somg12 = slam12 * cdomg12 - clam12 * sdomg12;
                comg12 = clam12 * cdomg12 + slam12 * sdomg12;
            }
        }
    }

    if outmask.outputs(Caps::DISTANCE) {
        result.s12 = s12x;
    }
    if outmask.outputs(Caps::REDUCED_LENGTH) {
        result.m12 = m12x;
    }
    if outmask.outputs(Caps::GEODESIC_SCALE) {
        result.big_m12 = big_m12;
        result.big_m21 = big_m21;
    }

    if outmask.outputs(Caps::AREA) {
        // Clairaut's constant and the cosine of the equatorial azimuth
        let salp0 = salp1 * cbet1;
        let calp0 = libm::hypot(calp1, salp1 * sbet1);
        let mut s12_area;
        if calp0 != 0.0 && salp0 != 0.0 {
            let mut ssig1 = sbet1;
            let mut csig1 = calp1 * cbet1;
            let mut ssig2 = sbet2;
            let mut csig2 = calp2 * cbet2;
            let k2 = calp0 * calp0 * ep_2;
            let eps = k2 / (2.0 * (1.0 + libm::sqrt(1.0 + k2)) + k2);
            // the area scale factor, Karney Eq. 60
            let a4 = a * a * calp0 * salp0 * e_2;
            norm(&mut ssig1, &mut csig1);
            norm(&mut ssig2, &mut csig2);
            let c4a = evaluate_coeffs_c4y(&ellipsoid.c4x(), eps);
            let b41 = cos_series(&c4a, ssig1, csig1);
            let b42 = cos_series(&c4a, ssig2, csig2);
            s12_area = a4 * (b42 - b41);
        } else {
            s12_area = 0.0;
        }

        if !meridian && somg12 == 2.0 {
            somg12 = libm::sin(omg12);
            comg12 = libm::cos(omg12);
        }

        let alp12;
        if !meridian && comg12 > -0.7071 && sbet2 - sbet1 < 1.75 {
            // geodesic runs through the neighbourhood of the start point;
            // use the spherical excess formula with care taken over
            // cancellation, Karney Eq. 63
            let domg12 = 1.0 + comg12;
            let dbet1 = 1.0 + cbet1;
            let dbet2 = 1.0 + cbet2;
            alp12 = 2.0
                * libm::atan2(
                    somg12 * (sbet1 * dbet2 + sbet2 * dbet1),
                    domg12 * (sbet1 * sbet2 + dbet1 * dbet2),
                );
        } else {
            let mut salp12 = salp2 * calp1 - calp2 * salp1;
            let mut calp12 = calp2 * calp1 + salp2 * salp1;
            // for a meridional geodesic alp12 = 0 or 180; the check on
            // salp12 resolves the 180 case consistently
            if salp12 == 0.0 && calp12 < 0.0 {
                salp12 = TINY * calp1;
                calp12 = -1.0;
            }
            alp12 = libm::atan2(salp12, calp12);
        }
        s12_area += ellipsoid.c2() * alp12;
        s12_area *= swapp * lonsign * latsign;
        // squash a negative zero
        result.area = s12_area + 0.0;
    }

    // restore the canonicalisation swaps and signs
    if swapp < 0.0 {
        core::mem::swap(&mut salp1, &mut salp2);
        core::mem::swap(&mut calp1, &mut calp2);
        if outmask.outputs(Caps::GEODESIC_SCALE) {
            core::mem::swap(&mut result.big_m12, &mut result.big_m21);
        }
    }
    result.salp1 = salp1 * swapp * lonsign;
    result.calp1 = calp1 * swapp * latsign;
    result.salp2 = salp2 * swapp * lonsign;
    result.calp2 = calp2 * swapp * latsign;

    result.a12 = a12;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ellipsoid;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_two_sum() {
        let (s, t) = two_sum(1.0, 1e-17);
        assert_eq!(1.0, s);
        assert_eq!(1e-17, t);

        let (s, t) = two_sum(-1.0, 1.0);
        assert_eq!(0.0, s);
        assert_eq!(0.0, t);
    }

    #[test]
    fn test_ang_normalize() {
        assert_eq!(0.0, ang_normalize(0.0));
        assert_eq!(180.0, ang_normalize(180.0));
        assert_eq!(180.0, ang_normalize(-180.0));
        assert_eq!(-90.0, ang_normalize(270.0));
        assert_eq!(0.0, ang_normalize(720.0));
    }

    #[test]
    fn test_ang_diff() {
        let (d, _t) = ang_diff(30.0, 40.0);
        assert_eq!(10.0, d);

        let (d, _t) = ang_diff(170.0, -170.0);
        assert_eq!(20.0, d);

        let (d, _t) = ang_diff(-170.0, 170.0);
        assert_eq!(-20.0, d);
    }

    #[test]
    fn test_ang_round() {
        assert_eq!(0.0, ang_round(0.0));
        assert_eq!(1.0 / 32.0, ang_round(1.0 / 32.0));
        assert_eq!(0.0, ang_round(1e-18));
        assert_eq!(90.0, ang_round(90.0));
    }

    #[test]
    fn test_lat_fix() {
        assert_eq!(45.0, lat_fix(45.0));
        assert_eq!(-90.0, lat_fix(-90.0));
        assert!(lat_fix(90.5).is_nan());
        assert!(lat_fix(-91.0).is_nan());
    }

    #[test]
    fn test_sincosd() {
        let (s, c) = sincosd(0.0);
        assert_eq!(0.0, s);
        assert_eq!(1.0, c);

        let (s, c) = sincosd(90.0);
        assert_eq!(1.0, s);
        assert_eq!(0.0, c);

        let (s, c) = sincosd(-90.0);
        assert_eq!(-1.0, s);
        assert_eq!(0.0, c);

        let (s, c) = sincosd(f64::NAN);
        assert!(s.is_nan());
        assert!(c.is_nan());
    }

    #[test]
    fn test_atan2d() {
        assert_eq!(0.0, atan2d(0.0, 1.0));
        assert_eq!(90.0, atan2d(1.0, 0.0));
        assert_eq!(-90.0, atan2d(-1.0, 0.0));
        assert_eq!(180.0, atan2d(0.0, -1.0));
        assert_eq!(45.0, atan2d(1.0, 1.0));
    }

    #[test]
    fn test_caps() {
        assert!(Caps::STANDARD.contains(Caps::LATITUDE));
        assert!(Caps::STANDARD.contains(Caps::DISTANCE));
        assert!(!Caps::STANDARD.contains(Caps::AREA));
        assert!(Caps::ALL.contains(Caps::STANDARD));

        assert!(Caps::DISTANCE.intersects(Caps::CAP_C1));
        assert!(Caps::AREA.intersects(Caps::CAP_C4));

        // the output test ignores the shared series capability bits
        assert!(!Caps::REDUCED_LENGTH.outputs(Caps::DISTANCE));
        assert!(Caps::REDUCED_LENGTH.outputs(Caps::REDUCED_LENGTH));
    }

    #[test]
    fn test_geodesic_result_default() {
        let result = GeodesicResult::default();
        assert!(result.lat2.0.is_nan());
        assert!(result.s12.0.is_nan());
        assert!(result.a12.0.is_nan());
        assert!(result.area.is_nan());
    }

    #[test]
    fn test_calculate_astroid() {
        assert_eq!(0.0, calculate_astroid(0.0, 0.0));
        assert_eq!(0.0, calculate_astroid(1.0, 0.0));

        // 0.0, 0.0 to 0.5, 179.5
        assert_eq!(
            0.91583665308532092,
            calculate_astroid(-0.82852367684428574, -0.82576675584253256)
        );
        // 0.0, 0.0 to 1.0, 179.0
        assert_eq!(
            1.9858096632693705,
            calculate_astroid(-1.6572357126833825, -1.6518470456464789)
        );
        // -30.0, 0.0 to 30.0, 179.0
        assert_eq!(
            0.9121190093974804,
            calculate_astroid(-1.9121190093974805, 0.0)
        );
        // -30.0, 0.0 to 30.5, 179.5
        assert_eq!(
            1.2324261949931818,
            calculate_astroid(-0.96091919533424308, -1.1124132048023443)
        );
    }

    #[test]
    fn test_inverse_meridian() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();

        // Northbound geodesic along a meridian
        let result = calculate_geodesic_inverse(
            -70.0,
            40.0,
            80.0,
            40.0,
            Caps::STANDARD,
            &wgs84_ellipsoid,
        );
        assert_eq!(0.0, atan2d(result.salp1, result.calp1));
        // the arc length on the auxiliary sphere
        assert!(is_within_tolerance(
            2.6163378712682306,
            result.a12.to_radians(),
            1e-12
        ));

        // Southbound geodesic along a meridian
        let result = calculate_geodesic_inverse(
            80.0,
            40.0,
            -70.0,
            40.0,
            Caps::STANDARD,
            &wgs84_ellipsoid,
        );
        assert_eq!(180.0, atan2d(result.salp1, result.calp1));
    }

    #[test]
    fn test_inverse_equator() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();

        // Eastbound geodesic along the equator
        let result =
            calculate_geodesic_inverse(0.0, -40.0, 0.0, 50.0, Caps::STANDARD, &wgs84_ellipsoid);
        assert_eq!(90.0, atan2d(result.salp1, result.calp1));
        assert_eq!(90.0, atan2d(result.salp2, result.calp2));

        // Westbound geodesic along the equator
        let result =
            calculate_geodesic_inverse(0.0, 50.0, 0.0, -40.0, Caps::STANDARD, &wgs84_ellipsoid);
        assert_eq!(-90.0, atan2d(result.salp1, result.calp1));
    }

    #[test]
    fn test_inverse_coincident() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();

        let result =
            calculate_geodesic_inverse(45.0, 45.0, 45.0, 45.0, Caps::STANDARD, &wgs84_ellipsoid);
        assert_eq!(0.0, result.s12);
        assert_eq!(0.0, result.a12);
    }

    #[test]
    fn test_inverse_normal() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();

        // GeodTest.dat line 2874
        let result = calculate_geodesic_inverse(
            5.421025561218,
            0.0,
            3.027329237478900117,
            109.666857465735641205,
            Caps::STANDARD | Caps::REDUCED_LENGTH | Caps::AREA,
            &wgs84_ellipsoid,
        );
        assert!(is_within_tolerance(
            84.846843174846,
            atan2d(result.salp1, result.calp1),
            1e-9
        ));
        assert!(is_within_tolerance(
            96.826992198613537236,
            atan2d(result.salp2, result.calp2),
            1e-9
        ));
        assert!(is_within_tolerance(12161089.9991805, result.s12, 1e-8));
        assert!(is_within_tolerance(
            109.607910081857488806,
            result.a12,
            1e-11
        ));
        assert!(is_within_tolerance(5988906.6319258056178, result.m12, 1e-6));
        assert!(is_within_tolerance(
            8449589948776.249238,
            result.area,
            1e2
        ));
    }

    #[test]
    fn test_inverse_nearly_antipodal() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();

        // GeodTest.dat line 100001
        let result = calculate_geodesic_inverse(
            8.226828747671,
            0.0,
            -8.516119211674268968,
            178.688979582629224039,
            Caps::STANDARD,
            &wgs84_ellipsoid,
        );
        assert!(is_within_tolerance(
            111.1269645725,
            atan2d(result.salp1, result.calp1),
            1e-9
        ));
        assert!(is_within_tolerance(19886305.6710041, result.s12, 1e-8));

        // GeodTest.dat line 100017
        let result = calculate_geodesic_inverse(
            0.322440123063,
            0.0,
            -0.367465171996537868,
            179.160624688175359763,
            Caps::STANDARD,
            &wgs84_ellipsoid,
        );
        assert!(is_within_tolerance(
            100.319048368176,
            atan2d(result.salp1, result.calp1),
            1e-9
        ));
        assert!(is_within_tolerance(19943611.6727803, result.s12, 1e-8));
    }

    #[test]
    fn test_inverse_nan_propagation() {
        let wgs84_ellipsoid = Ellipsoid::wgs84();

        let result =
            calculate_geodesic_inverse(0.0, 0.0, 1.0, f64::NAN, Caps::STANDARD, &wgs84_ellipsoid);
        assert!(result.s12.is_nan());
        assert!(result.a12.is_nan());
        assert!(result.salp1.is_nan());

        let result =
            calculate_geodesic_inverse(f64::NAN, 0.0, 1.0, 2.0, Caps::STANDARD, &wgs84_ellipsoid);
        assert!(result.s12.is_nan());
        assert!(result.a12.is_nan());
    }
}
