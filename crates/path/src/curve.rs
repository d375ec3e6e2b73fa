//! Cubic bézier representation of draw commands.
//!
//! Each draw command of a path gets a [`CurveWrapper`] holding zero or more cubic bézier
//! curves with the same geometry:
//!
//! - `Move`: none,
//! - `Line` and `Close`: one straight cubic, with the same parameterization as the line,
//! - `Quadratic`: the degree-elevated curve,
//! - `Cubic`: the curve itself,
//! - `Arc`: none if it starts where it ends, one straight cubic if a radius is zero and
//!   one cubic per quarter turn otherwise.
//!
//! Wrappers refer to their command by index. They are rebuilt whenever the path changes
//! and must not be kept across mutations.

use crate::geom::{CubicBezierSegment, LineSegment};
use crate::math::Point;

/// Tolerance used when measuring curve lengths.
pub const LENGTH_TOLERANCE: f32 = 1e-3;

/// The point of a path closest to a query point.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Projection {
    pub sub_path: usize,
    pub command: usize,
    pub point: Point,
    /// Parameter of `point` along the command, between 0 and 1.
    pub t: f32,
    pub distance: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CurveWrapper {
    sub_path: usize,
    command: usize,
    beziers: Vec<CubicBezierSegment<f32>>,
    length: f32,
}

impl CurveWrapper {
    /// A wrapper without geometry.
    pub fn empty(sub_path: usize, command: usize) -> Self {
        CurveWrapper {
            sub_path,
            command,
            beziers: Vec::new(),
            length: 0.0,
        }
    }

    /// A wrapper for a straight segment. Its length is exact.
    pub fn line(sub_path: usize, command: usize, line: LineSegment<f32>) -> Self {
        CurveWrapper {
            sub_path,
            command,
            beziers: vec![line.to_cubic()],
            length: line.length(),
        }
    }

    pub fn with_beziers(
        sub_path: usize,
        command: usize,
        beziers: Vec<CubicBezierSegment<f32>>,
    ) -> Self {
        let length = beziers
            .iter()
            .map(|bezier| bezier.approximate_length(LENGTH_TOLERANCE))
            .sum();

        CurveWrapper {
            sub_path,
            command,
            beziers,
            length,
        }
    }

    #[inline]
    pub fn sub_path_index(&self) -> usize {
        self.sub_path
    }

    #[inline]
    pub fn command_index(&self) -> usize {
        self.command
    }

    #[inline]
    pub fn beziers(&self) -> &[CubicBezierSegment<f32>] {
        &self.beziers
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.beziers.is_empty()
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Closest point of this wrapper's geometry to `position`.
    ///
    /// When the command is made of several curves, `t` is expressed over the whole
    /// command: curve `i` out of `n` covers `[i / n, (i + 1) / n]`. On ties the first
    /// curve wins. Returns `None` if the wrapper has no geometry.
    pub fn project(&self, position: Point) -> Option<Projection> {
        let count = self.beziers.len() as f32;
        let mut best: Option<Projection> = None;
        for (i, bezier) in self.beziers.iter().enumerate() {
            let t = bezier.closest_point(position);
            let point = bezier.sample(t);
            let distance = (point - position).length();
            if best.map_or(true, |best| distance < best.distance) {
                best = Some(Projection {
                    sub_path: self.sub_path,
                    command: self.command,
                    point,
                    t: (i as f32 + t) / count,
                    distance,
                });
            }
        }

        best
    }

    /// Splits the wrapper's curve at `t` using de Casteljau's construction.
    ///
    /// Returns `None` unless the wrapper holds exactly one curve.
    pub fn split(
        &self,
        t: f32,
    ) -> Option<(CubicBezierSegment<f32>, CubicBezierSegment<f32>)> {
        match self.beziers[..] {
            [bezier] => Some(bezier.split(t)),
            _ => None,
        }
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn line_wrapper() {
    let wrapper = CurveWrapper::line(
        0,
        1,
        LineSegment {
            from: point(0.0, 0.0),
            to: point(10.0, 0.0),
        },
    );

    assert_eq!(wrapper.length(), 10.0);
    assert_eq!(wrapper.beziers().len(), 1);

    let projection = wrapper.project(point(5.0, -5.0)).unwrap();
    assert_eq!((projection.sub_path, projection.command), (0, 1));
    assert!((projection.point - point(5.0, 0.0)).length() < 1e-3);
    assert!((projection.distance - 5.0).abs() < 1e-3);
    assert!((projection.t - 0.5).abs() < 1e-3);

    let (a, b) = wrapper.split(0.25).unwrap();
    assert_eq!(a.from, point(0.0, 0.0));
    assert_eq!(b.to, point(10.0, 0.0));
    assert!((a.to - point(2.5, 0.0)).length() < 1e-5);
}

#[test]
fn empty_wrapper() {
    let wrapper = CurveWrapper::empty(0, 0);
    assert!(wrapper.is_empty());
    assert_eq!(wrapper.length(), 0.0);
    assert_eq!(wrapper.project(point(1.0, 1.0)), None);
    assert_eq!(wrapper.split(0.5), None);
}

#[test]
fn multi_curve_projection() {
    let first = LineSegment {
        from: point(0.0, 0.0),
        to: point(10.0, 0.0),
    };
    let second = LineSegment {
        from: point(10.0, 0.0),
        to: point(10.0, 10.0),
    };
    let wrapper = CurveWrapper::with_beziers(2, 3, vec![first.to_cubic(), second.to_cubic()]);

    assert!((wrapper.length() - 20.0).abs() < 1e-3);

    // Halfway along the second curve is three quarters along the whole command.
    let projection = wrapper.project(point(12.0, 5.0)).unwrap();
    assert!((projection.t - 0.75).abs() < 1e-3);
    assert!((projection.distance - 2.0).abs() < 1e-3);

    // Equidistant from both curves: the first one wins.
    let projection = wrapper.project(point(10.0, 0.0)).unwrap();
    assert!((projection.t - 0.5).abs() < 1e-3);
    assert_eq!(projection.distance, 0.0);

    assert_eq!(wrapper.split(0.5), None);
}
