use crate::scalar::Scalar;
use crate::utils::{min_max, quadratic_polynomial_roots};
use crate::{point, Box2D, Point, QuadraticBezierSegment, Transform};
use arrayvec::ArrayVec;

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl1: Point<S>,
    pub ctrl2: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> CubicBezierSegment<S> {
    /// Number of evenly spaced samples used to seed the closest point search.
    pub const LOOKUP_SAMPLES: u32 = 32;
    /// Number of bisection steps refining the best sample of the closest point search.
    pub const REFINEMENT_STEPS: u32 = 24;
    /// Maximum subdivision depth of `approximate_length`.
    pub const MAX_LENGTH_DEPTH: u32 = 16;

    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;

        self.from * one_t3
            + self.ctrl1.to_vector() * S::THREE * one_t2 * t
            + self.ctrl2.to_vector() * S::THREE * one_t * t2
            + self.to.to_vector() * t3
    }

    /// Split this curve into two sub-curves using de Casteljau's construction.
    pub fn split(&self, t: S) -> (CubicBezierSegment<S>, CubicBezierSegment<S>) {
        let ctrl1a = self.from.lerp(self.ctrl1, t);
        let ctrl2a = self.ctrl1.lerp(self.ctrl2, t);
        let ctrl3a = self.ctrl2.lerp(self.to, t);
        let ctrl1aa = ctrl1a.lerp(ctrl2a, t);
        let ctrl2aa = ctrl2a.lerp(ctrl3a, t);
        let split_point = ctrl1aa.lerp(ctrl2aa, t);

        (
            CubicBezierSegment {
                from: self.from,
                ctrl1: ctrl1a,
                ctrl2: ctrl1aa,
                to: split_point,
            },
            CubicBezierSegment {
                from: split_point,
                ctrl1: ctrl2aa,
                ctrl2: ctrl3a,
                to: self.to,
            },
        )
    }

    /// Swap the beginning and the end of the segment.
    pub fn flip(&self) -> Self {
        CubicBezierSegment {
            from: self.to,
            ctrl1: self.ctrl2,
            ctrl2: self.ctrl1,
            to: self.from,
        }
    }

    /// The quadratic bézier curve that this cubic was elevated from.
    ///
    /// Exact for curves produced by `QuadraticBezierSegment::to_cubic`, a best effort
    /// approximation otherwise.
    pub fn to_quadratic(&self) -> QuadraticBezierSegment<S> {
        let ctrl = (self.ctrl1.to_vector() + self.ctrl2.to_vector()) * S::THREE
            - self.from.to_vector()
            - self.to.to_vector();

        QuadraticBezierSegment {
            from: self.from,
            ctrl: (ctrl / S::FOUR).to_point(),
            to: self.to,
        }
    }

    /// Applies the transform to this curve and returns the results.
    #[inline]
    pub fn transformed(&self, transform: &Transform<S>) -> Self {
        CubicBezierSegment {
            from: transform.transform_point(self.from),
            ctrl1: transform.transform_point(self.ctrl1),
            ctrl2: transform.transform_point(self.ctrl2),
            to: transform.transform_point(self.to),
        }
    }

    /// Compute the length of the segment, within `tolerance` of the exact value.
    ///
    /// The curve is subdivided until the length of each piece's control polygon is
    /// within tolerance of its chord. Each piece then contributes the average of both
    /// lengths, which is Gravesen's estimate for cubic curves.
    pub fn approximate_length(&self, tolerance: S) -> S {
        debug_assert!(tolerance > S::ZERO);

        let mut length = S::ZERO;
        let mut stack: ArrayVec<(CubicBezierSegment<S>, S, u32), 24> = ArrayVec::new();
        stack.push((*self, tolerance, 0));

        while let Some((curve, tolerance, depth)) = stack.pop() {
            let chord = (curve.to - curve.from).length();
            let polygon = (curve.ctrl1 - curve.from).length()
                + (curve.ctrl2 - curve.ctrl1).length()
                + (curve.to - curve.ctrl2).length();

            if polygon - chord <= tolerance || depth >= Self::MAX_LENGTH_DEPTH {
                length += (chord + polygon) * S::HALF;
                continue;
            }

            let (a, b) = curve.split(S::HALF);
            let tolerance = tolerance * S::HALF;
            stack.push((b, tolerance, depth + 1));
            stack.push((a, tolerance, depth + 1));
        }

        length
    }

    /// Returns the parameter of the point of the curve closest to `pos`.
    ///
    /// The curve is first sampled at `LOOKUP_SAMPLES` evenly spaced parameters, then the best
    /// sample is refined by sampling on both sides with a step halving at each iteration.
    /// When two samples are equally close, the one with the smallest parameter wins.
    pub fn closest_point(&self, pos: Point<S>) -> S {
        let samples = S::value(Self::LOOKUP_SAMPLES as f32);

        let mut best_t = S::ZERO;
        let mut best_sq_dist = (self.from - pos).square_length();
        for i in 1..=Self::LOOKUP_SAMPLES {
            let t = S::value(i as f32) / samples;
            let sq_dist = (self.sample(t) - pos).square_length();
            if sq_dist < best_sq_dist {
                best_sq_dist = sq_dist;
                best_t = t;
            }
        }

        let mut step = S::ONE / samples;
        for _ in 0..Self::REFINEMENT_STEPS {
            step = step * S::HALF;
            for &t in &[best_t - step, best_t + step] {
                if t < S::ZERO || t > S::ONE {
                    continue;
                }
                let sq_dist = (self.sample(t) - pos).square_length();
                if sq_dist < best_sq_dist {
                    best_sq_dist = sq_dist;
                    best_t = t;
                }
            }
        }

        best_t
    }

    /// Invokes the callback with the parameter of each local extremum of a
    /// one-dimensional cubic, in increasing order.
    fn for_each_local_extremum<F>(p0: S, p1: S, p2: S, p3: S, cb: &mut F)
    where
        F: FnMut(S),
    {
        // The derivative is the second degree polynomial a * t² + b * t + c.
        let a = S::THREE * (p3 + S::THREE * (p1 - p2) - p0);
        let b = S::SIX * (p2 - S::TWO * p1 + p0);
        let c = S::THREE * (p1 - p0);

        for t in quadratic_polynomial_roots(a, b, c) {
            if t > S::ZERO && t < S::ONE {
                cb(t);
            }
        }
    }

    /// Invokes the callback at each local x extremum, if any.
    ///
    /// This returns the advancements along the curve, not the actual x position.
    pub fn for_each_local_x_extremum_t<F>(&self, cb: &mut F)
    where
        F: FnMut(S),
    {
        Self::for_each_local_extremum(self.from.x, self.ctrl1.x, self.ctrl2.x, self.to.x, cb)
    }

    /// Invokes the callback at each local y extremum, if any.
    ///
    /// This returns the advancements along the curve, not the actual y position.
    pub fn for_each_local_y_extremum_t<F>(&self, cb: &mut F)
    where
        F: FnMut(S),
    {
        Self::for_each_local_extremum(self.from.y, self.ctrl1.y, self.ctrl2.y, self.to.y, cb)
    }

    /// Returns the smallest range of x that contains this curve.
    pub fn bounding_range_x(&self) -> (S, S) {
        let (mut min, mut max) = min_max(self.from.x, self.to.x);
        self.for_each_local_x_extremum_t(&mut |t| {
            let x = self.sample(t).x;
            min = S::min(min, x);
            max = S::max(max, x);
        });

        (min, max)
    }

    /// Returns the smallest range of y that contains this curve.
    pub fn bounding_range_y(&self) -> (S, S) {
        let (mut min, mut max) = min_max(self.from.y, self.to.y);
        self.for_each_local_y_extremum_t(&mut |t| {
            let y = self.sample(t).y;
            min = S::min(min, y);
            max = S::max(max, y);
        });

        (min, max)
    }

    /// Returns the smallest rectangle that contains the curve.
    #[inline]
    pub fn bounding_box(&self) -> Box2D<S> {
        let (min_x, max_x) = self.bounding_range_x();
        let (min_y, max_y) = self.bounding_range_y();

        Box2D {
            min: point(min_x, min_y),
            max: point(max_x, max_y),
        }
    }
}

#[cfg(test)]
use crate::LineSegment;

#[test]
fn split_matches_sample() {
    let c = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(1.0, 3.0),
        ctrl2: point(4.0, -2.0),
        to: point(5.0, 1.0),
    };

    for &t in &[0.1, 0.25, 0.5, 0.9] {
        let (a, b) = c.split(t);
        assert_eq!(a.from, c.from);
        assert_eq!(b.to, c.to);
        assert_eq!(a.to, b.from);
        assert!((a.to - c.sample(t)).length() < 1e-12);
        // The halves follow the original curve.
        assert!((a.sample(0.5) - c.sample(t * 0.5)).length() < 1e-12);
        assert!((b.sample(0.5) - c.sample(t + (1.0 - t) * 0.5)).length() < 1e-12);
    }
}

#[test]
fn flip_reverses_traversal() {
    let c = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(1.0, 3.0),
        ctrl2: point(4.0, -2.0),
        to: point(5.0, 1.0),
    };
    let f = c.flip();
    for &t in &[0.0, 0.3, 0.6, 1.0] {
        assert!((f.sample(t) - c.sample(1.0 - t)).length() < 1e-12);
    }
    assert_eq!(f.flip(), c);
}

#[test]
fn length_of_straight_cubic() {
    let c = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(3.0, 4.0),
    }
    .to_cubic();

    assert!((c.approximate_length(0.01) - 5.0).abs() < 1e-4);
}

#[test]
fn length_of_quarter_circle() {
    // Standard cubic approximation of a quarter of the unit circle.
    let k = 0.5522847498;
    let c = CubicBezierSegment {
        from: point(1.0f64, 0.0),
        ctrl1: point(1.0, k),
        ctrl2: point(k, 1.0),
        to: point(0.0, 1.0),
    };

    let expected = core::f64::consts::FRAC_PI_2;
    assert!((c.approximate_length(1e-6) - expected).abs() < 1e-3);
}

#[test]
fn split_preserves_length() {
    let c = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(10.0, 30.0),
        ctrl2: point(40.0, -20.0),
        to: point(50.0, 10.0),
    };

    let total = c.approximate_length(1e-6);
    for &t in &[0.1, 0.37, 0.5, 0.8] {
        let (a, b) = c.split(t);
        let sum = a.approximate_length(1e-6) + b.approximate_length(1e-6);
        assert!((sum - total).abs() < 1e-4, "{sum} != {total}");
    }
}

#[test]
fn bounding_box() {
    let a = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(0.0, 1.0),
        ctrl2: point(1.0, 1.0),
        to: point(1.0, 0.0),
    };

    let b = a.bounding_box();
    assert!((b.min.x - 0.0).abs() < 1e-6);
    assert!((b.min.y - 0.0).abs() < 1e-6);
    assert!((b.max.x - 1.0).abs() < 1e-6);
    assert!((b.max.y - 0.75).abs() < 1e-6);
}

#[test]
fn closest_point_on_straight_cubic() {
    let c = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
    }
    .to_cubic();

    let t = c.closest_point(point(5.0, -5.0));
    assert!((t - 0.5).abs() < 1e-4);
    assert!((c.sample(t) - point(5.0, 0.0)).length() < 1e-3);

    // Beyond the end points, the closest point is the end point.
    assert_eq!(c.closest_point(point(-5.0, 1.0)), 0.0);
    assert_eq!(c.closest_point(point(15.0, 1.0)), 1.0);
}

#[test]
fn closest_point_on_curve() {
    let c = CubicBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl1: point(0.0, 10.0),
        ctrl2: point(10.0, 10.0),
        to: point(10.0, 0.0),
    };

    // The curve is symmetric and peaks at (5, 7.5).
    let t = c.closest_point(point(5.0, 20.0));
    assert!((t - 0.5).abs() < 1e-6);
    assert!(((c.sample(t) - point(5.0, 20.0)).length() - 12.5).abs() < 1e-6);
}
