//! Small numeric helpers shared by the segment types.

use crate::scalar::Scalar;
use crate::Vector;
use arrayvec::ArrayVec;

#[inline]
pub fn min_max<S: Scalar>(a: S, b: S) -> (S, S) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Signed angle from `a` to `b`, in radians, in the range `]-PI, PI]`.
///
/// The sign follows the usual convention: positive when rotating from the x axis
/// towards the y axis.
#[inline]
pub fn directed_angle<S: Scalar>(a: Vector<S>, b: Vector<S>) -> S {
    S::atan2(a.cross(b), a.dot(b))
}

/// Real roots of `a * x² + b * x + c`, sorted in increasing order.
///
/// Degrades to the linear case when `a` is negligible compared to the other coefficients.
/// The threshold is relative, so tiny curves keep their extrema. Returns nothing for a
/// constant polynomial.
pub fn quadratic_polynomial_roots<S: Scalar>(a: S, b: S, c: S) -> ArrayVec<S, 2> {
    let mut result = ArrayVec::new();

    let scale = S::max(S::max(S::abs(a), S::abs(b)), S::abs(c));
    if scale == S::ZERO {
        return result;
    }
    let epsilon = S::EPSILON * scale;

    if S::abs(a) < epsilon {
        if S::abs(b) >= epsilon {
            result.push(-c / b);
        }
        return result;
    }

    let discriminant = b * b - S::FOUR * a * c;

    if discriminant < S::ZERO {
        return result;
    }

    if discriminant == S::ZERO {
        result.push(-b / (S::TWO * a));
        return result;
    }

    // Avoids the cancellation of the textbook formula when b² >> 4ac.
    let sqrt_discriminant = discriminant.sqrt();
    let q = if b >= S::ZERO {
        -S::HALF * (b + sqrt_discriminant)
    } else {
        -S::HALF * (b - sqrt_discriminant)
    };

    let (r0, r1) = min_max(q / a, c / q);
    result.push(r0);
    result.push(r1);

    result
}

#[test]
fn quadratic_roots() {
    fn assert_approx_eq(a: ArrayVec<f64, 2>, b: &[f64], epsilon: f64) {
        assert_eq!(a.len(), b.len(), "{a:?} != {b:?}");
        for i in 0..a.len() {
            assert!((a[i] - b[i]).abs() <= epsilon, "{a:?} != {b:?}");
        }
    }

    // (x - 1)(x - 3)
    assert_approx_eq(quadratic_polynomial_roots(1.0, -4.0, 3.0), &[1.0, 3.0], 1e-12);
    // (x - 2)²
    assert_approx_eq(quadratic_polynomial_roots(1.0, -4.0, 4.0), &[2.0], 1e-12);
    // No real root.
    assert_approx_eq(quadratic_polynomial_roots(1.0, 0.0, 1.0), &[], 0.0);
    // Linear.
    assert_approx_eq(quadratic_polynomial_roots(0.0, 2.0, -1.0), &[0.5], 1e-12);
    // Constant.
    assert_approx_eq(quadratic_polynomial_roots(0.0, 0.0, 1.0), &[], 0.0);
    assert_approx_eq(quadratic_polynomial_roots(0.0, 0.0, 0.0), &[], 0.0);
    // Tiny coefficients, (x - 0.25)(x - 0.5) scaled down.
    let k = 1e-12;
    assert_approx_eq(
        quadratic_polynomial_roots(k, -0.75 * k, 0.125 * k),
        &[0.25, 0.5],
        1e-9,
    );
}

#[test]
fn directed_angles() {
    use crate::vector;
    use core::f64::consts::{FRAC_PI_2, PI};

    let x = vector(1.0f64, 0.0);
    let y = vector(0.0f64, 1.0);
    assert!((directed_angle(x, y) - FRAC_PI_2).abs() < 1e-12);
    assert!((directed_angle(y, x) + FRAC_PI_2).abs() < 1e-12);
    assert!((directed_angle(x, -x) - PI).abs() < 1e-12);
    assert!(directed_angle(x, x).abs() < 1e-12);
}
