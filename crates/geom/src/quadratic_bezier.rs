use crate::scalar::Scalar;
use crate::{CubicBezierSegment, Point, Transform};

/// A 2d curve segment defined by three points: the beginning of the segment, a control
/// point and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)² * from + 2 * (1 - t) * t * ctrl + t² * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct QuadraticBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> QuadraticBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;

        self.from * one_t2 + self.ctrl.to_vector() * S::TWO * one_t * t + self.to.to_vector() * t2
    }

    /// Split this curve into two sub-curves.
    pub fn split(&self, t: S) -> (QuadraticBezierSegment<S>, QuadraticBezierSegment<S>) {
        let ctrl1 = self.from.lerp(self.ctrl, t);
        let ctrl2 = self.ctrl.lerp(self.to, t);
        let split_point = ctrl1.lerp(ctrl2, t);

        (
            QuadraticBezierSegment {
                from: self.from,
                ctrl: ctrl1,
                to: split_point,
            },
            QuadraticBezierSegment {
                from: split_point,
                ctrl: ctrl2,
                to: self.to,
            },
        )
    }

    /// Swap the beginning and the end of the segment.
    pub fn flip(&self) -> Self {
        QuadraticBezierSegment {
            from: self.to,
            ctrl: self.ctrl,
            to: self.from,
        }
    }

    /// Elevate this curve to a third order bézier.
    ///
    /// The conversion is exact and keeps the parameterization.
    pub fn to_cubic(&self) -> CubicBezierSegment<S> {
        CubicBezierSegment {
            from: self.from,
            ctrl1: (self.from + self.ctrl.to_vector() * S::TWO) / S::THREE,
            ctrl2: (self.to + self.ctrl.to_vector() * S::TWO) / S::THREE,
            to: self.to,
        }
    }

    /// Applies the transform to this curve and returns the results.
    #[inline]
    pub fn transformed(&self, transform: &Transform<S>) -> Self {
        QuadraticBezierSegment {
            from: transform.transform_point(self.from),
            ctrl: transform.transform_point(self.ctrl),
            to: transform.transform_point(self.to),
        }
    }
}

#[cfg(test)]
use crate::point;

#[test]
fn elevation_is_exact() {
    let quad = QuadraticBezierSegment {
        from: point(0.0f64, 0.0),
        ctrl: point(5.0, 10.0),
        to: point(10.0, 0.0),
    };
    let cubic = quad.to_cubic();
    for i in 0..=16 {
        let t = i as f64 / 16.0;
        assert!((quad.sample(t) - cubic.sample(t)).length() < 1e-12);
    }

    let back = cubic.to_quadratic();
    assert!((back.ctrl - quad.ctrl).length() < 1e-12);
}

#[test]
fn split_halves_meet() {
    let quad = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(1.0, 2.0),
        to: point(4.0, 0.0),
    };
    let (a, b) = quad.split(0.3);
    assert_eq!(a.from, quad.from);
    assert_eq!(b.to, quad.to);
    assert_eq!(a.to, b.from);
    assert!((a.to - quad.sample(0.3)).length() < 1e-5);
}
