use crate::scalar::Scalar;
use crate::{CubicBezierSegment, Point, Transform, Vector};

/// A linear segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment<S> {
    pub from: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> LineSegment<S> {
    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        self.from.lerp(self.to, t)
    }

    /// Returns the vector between this segment's `from` and `to` points.
    #[inline]
    pub fn to_vector(&self) -> Vector<S> {
        self.to - self.from
    }

    /// Returns the length of the segment.
    #[inline]
    pub fn length(&self) -> S {
        self.to_vector().length()
    }

    /// Split this segment into two sub-segments.
    #[inline]
    pub fn split(&self, t: S) -> (Self, Self) {
        let split_point = self.sample(t);

        (
            LineSegment {
                from: self.from,
                to: split_point,
            },
            LineSegment {
                from: split_point,
                to: self.to,
            },
        )
    }

    /// Swap the beginning and the end of the segment.
    #[inline]
    pub fn flip(&self) -> Self {
        LineSegment {
            from: self.to,
            to: self.from,
        }
    }

    /// Applies the transform to this segment and returns the results.
    #[inline]
    pub fn transformed(&self, transform: &Transform<S>) -> Self {
        LineSegment {
            from: transform.transform_point(self.from),
            to: transform.transform_point(self.to),
        }
    }

    /// A cubic bézier curve with the same geometry and parameterization.
    ///
    /// The control points are placed at a third and two thirds of the segment so that
    /// sampling both curves at the same `t` gives the same point.
    #[inline]
    pub fn to_cubic(&self) -> CubicBezierSegment<S> {
        let third = S::ONE / S::THREE;
        CubicBezierSegment {
            from: self.from,
            ctrl1: self.from.lerp(self.to, third),
            ctrl2: self.from.lerp(self.to, S::ONE - third),
            to: self.to,
        }
    }
}

#[cfg(test)]
use crate::point;

#[test]
fn split() {
    let l = LineSegment {
        from: point(10.0f32, 0.0),
        to: point(10.0, 10.0),
    };
    let (a, b) = l.split(0.5);
    assert_eq!(a.from, point(10.0, 0.0));
    assert_eq!(a.to, point(10.0, 5.0));
    assert_eq!(b.from, point(10.0, 5.0));
    assert_eq!(b.to, point(10.0, 10.0));
    assert_eq!(a.length() + b.length(), l.length());
}

#[test]
fn to_cubic_keeps_parameterization() {
    let l = LineSegment {
        from: point(0.0f64, 0.0),
        to: point(9.0, 3.0),
    };
    let c = l.to_cubic();
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        assert!((l.sample(t) - c.sample(t)).length() < 1e-12);
    }
}
