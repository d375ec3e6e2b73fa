//! Elliptic arc related maths and tools.
//!
//! Arcs come in two flavors:
//!
//! - [`SvgArc`], the endpoint parameterization used by the SVG path syntax,
//! - [`Arc`], the center parameterization, convenient to sample and to convert into
//!   cubic bézier curves.

use crate::scalar::{cast, Float, Scalar};
use crate::utils::directed_angle;
use crate::{vector, Angle, CubicBezierSegment, LineSegment, Point, Rotation, Transform, Vector};

/// An elliptic arc curve segment using the SVG's end-point notation.
///
/// See section 9.3.8 of the SVG specification.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SvgArc<S> {
    pub from: Point<S>,
    pub to: Point<S>,
    pub radii: Vector<S>,
    pub x_rotation: Angle<S>,
    pub flags: ArcFlags,
}

/// An elliptic arc curve segment using the center parameterization.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Arc<S> {
    pub center: Point<S>,
    pub radii: Vector<S>,
    pub start_angle: Angle<S>,
    pub sweep_angle: Angle<S>,
    pub x_rotation: Angle<S>,
}

/// Flag parameters for arcs as described by the SVG specification.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ArcFlags {
    pub large_arc: bool,
    pub sweep: bool,
}

impl<S: Scalar> Arc<S> {
    /// Converts from the SVG endpoint parameterization.
    ///
    /// Radii too small to join both end points are scaled up as described in the
    /// "out-of-range parameters" section of the SVG implementation notes.
    ///
    /// The result is meaningless if `arc.is_straight_line()` or `arc.is_degenerate_point()`.
    pub fn from_svg_arc(arc: &SvgArc<S>) -> Arc<S> {
        debug_assert!(!arc.from.x.is_nan());
        debug_assert!(!arc.from.y.is_nan());
        debug_assert!(!arc.to.x.is_nan());
        debug_assert!(!arc.to.y.is_nan());
        debug_assert!(!arc.radii.x.is_nan());
        debug_assert!(!arc.radii.y.is_nan());
        debug_assert!(!arc.x_rotation.get().is_nan());

        let mut rx = S::abs(arc.radii.x);
        let mut ry = S::abs(arc.radii.y);

        let xr = arc.x_rotation.get() % (S::TWO * S::PI());
        let (sin_phi, cos_phi) = Float::sin_cos(xr);
        let hd_x = (arc.from.x - arc.to.x) * S::HALF;
        let hd_y = (arc.from.y - arc.to.y) * S::HALF;
        let hs_x = (arc.from.x + arc.to.x) * S::HALF;
        let hs_y = (arc.from.y + arc.to.y) * S::HALF;

        // F6.5.1
        let p = vector(
            cos_phi * hd_x + sin_phi * hd_y,
            -sin_phi * hd_x + cos_phi * hd_y,
        );

        // F6.6.2
        let lambda = (p.x * p.x) / (rx * rx) + (p.y * p.y) / (ry * ry);
        if lambda > S::ONE {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let rxry = rx * ry;
        let rxpy = rx * p.y;
        let rypx = ry * p.x;
        let sum_of_sq = rxpy * rxpy + rypx * rypx;

        debug_assert!(sum_of_sq != S::ZERO);

        // F6.5.2
        let sign_coe = if arc.flags.large_arc == arc.flags.sweep {
            -S::ONE
        } else {
            S::ONE
        };
        let coe = sign_coe * S::max((rxry * rxry - sum_of_sq) / sum_of_sq, S::ZERO).sqrt();
        let transformed_cx = coe * rxpy / ry;
        let transformed_cy = -coe * rypx / rx;

        // F6.5.3
        let center = Point::new(
            cos_phi * transformed_cx - sin_phi * transformed_cy + hs_x,
            sin_phi * transformed_cx + cos_phi * transformed_cy + hs_y,
        );

        // F6.5.5 and F6.5.6
        let a = vector((p.x - transformed_cx) / rx, (p.y - transformed_cy) / ry);
        let b = vector((-p.x - transformed_cx) / rx, (-p.y - transformed_cy) / ry);

        let start_angle = Angle::radians(directed_angle(vector(S::ONE, S::ZERO), a));

        let mut sweep_angle = directed_angle(a, b);
        if arc.flags.sweep && sweep_angle < S::ZERO {
            sweep_angle += S::TWO * S::PI();
        } else if !arc.flags.sweep && sweep_angle > S::ZERO {
            sweep_angle -= S::TWO * S::PI();
        }

        Arc {
            center,
            radii: vector(rx, ry),
            start_angle,
            sweep_angle: Angle::radians(sweep_angle),
            x_rotation: arc.x_rotation,
        }
    }

    /// Sample the curve at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        self.center + self.sample_ellipse(self.get_angle(t))
    }

    /// Sample the curve's angle at t (expecting t between 0 and 1).
    #[inline]
    pub fn get_angle(&self, t: S) -> Angle<S> {
        self.start_angle + Angle::radians(self.sweep_angle.get() * t)
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        self.sample(S::ZERO)
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        self.sample(S::ONE)
    }

    /// Number of cubic bézier curves `for_each_cubic_bezier` produces.
    ///
    /// Each curve spans at most a quarter turn.
    pub fn num_cubics(&self) -> u32 {
        let sweep = S::abs(self.sweep_angle.get()).min(S::TWO * S::PI());
        // The epsilon keeps exact quarter turns from being split in two because of
        // rounding errors.
        let n = ((sweep / S::FRAC_PI_2()) - S::EPSILON).ceil();
        cast::<S, u32>(n).unwrap_or(1).max(1)
    }

    /// Approximates the arc with a sequence of cubic bézier curves.
    pub fn for_each_cubic_bezier<F>(&self, cb: &mut F)
    where
        F: FnMut(&CubicBezierSegment<S>),
    {
        let count = self.num_cubics();
        let sweep = self.sweep_angle.get().max(-S::TWO * S::PI()).min(S::TWO * S::PI());
        let step = sweep / S::value(count as f32);

        // Length of the tangents, relative to the derivative of the ellipse with
        // respect to its angle.
        let kappa = S::FOUR / S::THREE * Float::tan(step / S::FOUR);

        let mut from = self.from();
        let mut a1 = self.start_angle;
        for i in 0..count {
            let a2 = self.start_angle + Angle::radians(step * S::value((i + 1) as f32));
            let to = self.center + self.sample_ellipse(a2);

            cb(&CubicBezierSegment {
                from,
                ctrl1: from + self.tangent_at_angle(a1) * kappa,
                ctrl2: to - self.tangent_at_angle(a2) * kappa,
                to,
            });

            from = to;
            a1 = a2;
        }
    }

    // Offset from the center at a given angle.
    #[inline]
    fn sample_ellipse(&self, angle: Angle<S>) -> Vector<S> {
        let (sin, cos) = Float::sin_cos(angle.get());
        Rotation::new(self.x_rotation).transform_vector(vector(self.radii.x * cos, self.radii.y * sin))
    }

    // Derivative of the ellipse with respect to the angle.
    #[inline]
    fn tangent_at_angle(&self, angle: Angle<S>) -> Vector<S> {
        let (sin, cos) = Float::sin_cos(angle.get());
        Rotation::new(self.x_rotation).transform_vector(vector(-self.radii.x * sin, self.radii.y * cos))
    }
}

impl<S: Scalar> SvgArc<S> {
    /// Converts to the center parameterization.
    #[inline]
    pub fn to_arc(&self) -> Arc<S> {
        Arc::from_svg_arc(self)
    }

    /// In SVG, an arc with a zero radius is rendered as a straight line.
    pub fn is_straight_line(&self) -> bool {
        self.radii.x == S::ZERO || self.radii.y == S::ZERO
    }

    /// An arc which starts and ends at the same position is not rendered at all.
    pub fn is_degenerate_point(&self) -> bool {
        self.from == self.to
    }

    /// Swap the direction of the arc.
    ///
    /// The end points are exchanged and the sweep flag toggled so that the same part of the
    /// same ellipse is drawn.
    pub fn flip(&self) -> Self {
        SvgArc {
            from: self.to,
            to: self.from,
            radii: self.radii,
            x_rotation: self.x_rotation,
            flags: ArcFlags {
                large_arc: self.flags.large_arc,
                sweep: !self.flags.sweep,
            },
        }
    }

    /// Approximates the arc with a sequence of cubic bézier curves.
    ///
    /// The first curve starts exactly at `self.from` and the last one ends exactly at
    /// `self.to`.
    pub fn for_each_cubic_bezier<F>(&self, cb: &mut F)
    where
        F: FnMut(&CubicBezierSegment<S>),
    {
        let arc = self.to_arc();
        let count = arc.num_cubics();
        let mut i = 0;
        arc.for_each_cubic_bezier(&mut |curve| {
            let mut curve = *curve;
            if i == 0 {
                curve.from = self.from;
            }
            i += 1;
            if i == count {
                curve.to = self.to;
            }
            cb(&curve);
        });
    }

    /// Applies an affine transform to the arc.
    ///
    /// The ellipse is mapped through the linear part of the transform and its principal
    /// axes are recovered to produce the new radii and x rotation. Transforms that mirror
    /// the plane also toggle the sweep flag.
    pub fn transformed(&self, transform: &Transform<S>) -> Self {
        let from = transform.transform_point(self.from);
        let to = transform.transform_point(self.to);

        let (m0, m1) = (transform.m11, transform.m12);
        let (m2, m3) = (transform.m21, transform.m22);

        let (s, c) = Float::sin_cos(self.x_rotation.get());
        let (rx, ry) = (self.radii.x, self.radii.y);

        // Columns of the linear map sending the unit circle to the transformed ellipse.
        let ma0 = rx * (m0 * c + m2 * s);
        let ma1 = rx * (m1 * c + m3 * s);
        let ma2 = ry * (-m0 * s + m2 * c);
        let ma3 = ry * (-m1 * s + m3 * c);

        // Diagonal of ma * transpose(ma).
        let j = ma0 * ma0 + ma2 * ma2;
        let k = ma1 * ma1 + ma3 * ma3;
        let jk = (j + k) * S::HALF;

        let d = ((ma0 - ma3) * (ma0 - ma3) + (ma2 + ma1) * (ma2 + ma1))
            * ((ma0 + ma3) * (ma0 + ma3) + (ma2 - ma1) * (ma2 - ma1));

        let (radii, x_rotation) = if d < S::EPSILON * jk {
            // The image is a circle.
            let r = jk.sqrt();
            (vector(r, r), Angle::radians(S::ZERO))
        } else {
            let l = ma0 * ma1 + ma2 * ma3;
            let d = d.sqrt();
            let l1 = jk + d * S::HALF;
            let l2 = jk - d * S::HALF;

            let mut angle = if S::abs(l) < S::EPSILON && S::abs(l1 - k) < S::EPSILON {
                S::FRAC_PI_2()
            } else if S::abs(l) > S::abs(l1 - k) {
                Float::atan((l1 - j) / l)
            } else {
                Float::atan(l / (l1 - k))
            };

            if angle >= S::ZERO {
                (vector(l1.sqrt(), S::max(l2, S::ZERO).sqrt()), Angle::radians(angle))
            } else {
                angle += S::FRAC_PI_2();
                (vector(S::max(l2, S::ZERO).sqrt(), l1.sqrt()), Angle::radians(angle))
            }
        };

        let mirrored = transform.determinant() < S::ZERO;

        SvgArc {
            from,
            to,
            radii,
            x_rotation,
            flags: ArcFlags {
                large_arc: self.flags.large_arc,
                sweep: self.flags.sweep != mirrored,
            },
        }
    }
}

/// Converts an arc into cubic bézier curves, handling the degenerate cases.
///
/// - An arc ending where it starts produces no curve.
/// - An arc with a zero radius produces a single straight cubic curve.
/// - Otherwise, the arc is split into pieces of at most a quarter turn.
pub fn arc_to_cubic_beziers<S, F>(arc: &SvgArc<S>, cb: &mut F)
where
    S: Scalar,
    F: FnMut(&CubicBezierSegment<S>),
{
    if arc.is_degenerate_point() {
        return;
    }

    if arc.is_straight_line() {
        let line = LineSegment {
            from: arc.from,
            to: arc.to,
        };
        cb(&line.to_cubic());
        return;
    }

    arc.for_each_cubic_bezier(cb);
}

#[cfg(test)]
use crate::point;
#[cfg(test)]
use std::vec::Vec;

#[cfg(test)]
fn approx_eq(a: Point<f64>, b: Point<f64>) -> bool {
    (a - b).length() < 1e-6
}

#[cfg(test)]
fn cubics(arc: &SvgArc<f64>) -> Vec<CubicBezierSegment<f64>> {
    let mut result = Vec::new();
    arc_to_cubic_beziers(arc, &mut |c| result.push(*c));
    result
}

#[test]
fn quarter_circle() {
    let arc = SvgArc {
        from: point(1.0f64, 0.0),
        to: point(0.0, 1.0),
        radii: vector(1.0, 1.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    };

    let center = arc.to_arc();
    assert!(approx_eq(center.center, point(0.0, 0.0)));
    assert!((center.sweep_angle.get() - core::f64::consts::FRAC_PI_2).abs() < 1e-9);

    let curves = cubics(&arc);
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].from, arc.from);
    assert_eq!(curves[0].to, arc.to);

    // The standard circle approximation.
    let k = 0.5522847498;
    assert!(approx_eq(curves[0].ctrl1, point(1.0, k)));
    assert!(approx_eq(curves[0].ctrl2, point(k, 1.0)));

    // The approximation stays within a tiny distance of the circle.
    for i in 0..=8 {
        let p = curves[0].sample(i as f64 / 8.0);
        assert!((p.to_vector().length() - 1.0).abs() < 3e-4);
    }
}

#[test]
fn half_circles() {
    let sweep = SvgArc {
        from: point(0.0f64, 0.0),
        to: point(2.0, 0.0),
        radii: vector(1.0, 1.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    };

    let arc = sweep.to_arc();
    assert!(approx_eq(arc.center, point(1.0, 0.0)));
    let curves = cubics(&sweep);
    assert_eq!(curves.len(), 2);
    assert!(approx_eq(curves[0].to, curves[1].from));
    // With y pointing down, a positive sweep from (0, 0) to (2, 0) goes through (1, -1).
    assert!(approx_eq(curves[0].to, point(1.0, -1.0)));

    let curves = cubics(&sweep.flip());
    assert_eq!(curves.len(), 2);
    assert!(approx_eq(curves[0].to, point(1.0, -1.0)));
    assert_eq!(curves[1].to, point(0.0, 0.0));

    let other_side = SvgArc {
        flags: ArcFlags {
            large_arc: false,
            sweep: false,
        },
        ..sweep
    };
    let curves = cubics(&other_side);
    assert!(approx_eq(curves[0].to, point(1.0, 1.0)));
}

#[test]
fn large_arc() {
    let arc = SvgArc {
        from: point(1.0f64, 0.0),
        to: point(0.0, 1.0),
        radii: vector(1.0, 1.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags {
            large_arc: true,
            sweep: false,
        },
    };

    let center = arc.to_arc();
    assert!(approx_eq(center.center, point(0.0, 0.0)));
    assert!((center.sweep_angle.get() + 1.5 * core::f64::consts::PI).abs() < 1e-9);

    let curves = cubics(&arc);
    assert_eq!(curves.len(), 3);
    assert_eq!(curves[2].to, arc.to);
    assert!(approx_eq(curves[0].to, point(0.0, -1.0)));
    assert!(approx_eq(curves[1].to, point(-1.0, 0.0)));
}

#[test]
fn radii_too_small_are_scaled_up() {
    let arc = SvgArc {
        from: point(0.0f64, 0.0),
        to: point(4.0, 0.0),
        radii: vector(1.0, 1.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags::default(),
    };

    let center = arc.to_arc();
    assert!(approx_eq(center.center, point(2.0, 0.0)));
    assert!((center.radii.x - 2.0).abs() < 1e-9);
    assert!((center.radii.y - 2.0).abs() < 1e-9);
    assert!(approx_eq(center.to(), arc.to));
}

#[test]
fn degenerate_arcs() {
    let point_arc = SvgArc {
        from: point(3.0f64, 3.0),
        to: point(3.0, 3.0),
        radii: vector(1.0, 1.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags::default(),
    };
    assert!(cubics(&point_arc).is_empty());

    let line_arc = SvgArc {
        from: point(0.0f64, 0.0),
        to: point(6.0, 8.0),
        radii: vector(0.0, 5.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags::default(),
    };
    let curves = cubics(&line_arc);
    assert_eq!(curves.len(), 1);
    let line = LineSegment {
        from: line_arc.from,
        to: line_arc.to,
    };
    for i in 0..=4 {
        let t = i as f64 / 4.0;
        assert!(approx_eq(curves[0].sample(t), line.sample(t)));
    }
    assert!((curves[0].approximate_length(1e-6) - 10.0).abs() < 1e-6);

    // Only a radius of exactly zero makes a straight line.
    let tiny = SvgArc {
        from: point(0.0f32, 0.0),
        to: point(2e-5, 0.0),
        radii: vector(1e-5, 1e-5),
        x_rotation: Angle::zero(),
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    };
    assert!(!tiny.is_straight_line());
    let mut curves = Vec::new();
    arc_to_cubic_beziers(&tiny, &mut |c| curves.push(*c));
    assert_eq!(curves.len(), 2);
    assert!((curves[0].to - point(1e-5, -1e-5)).length() < 1e-9);
}

#[test]
fn transformed_arc_matches_transformed_curve() {
    let arc = SvgArc {
        from: point(10.0f64, 0.0),
        to: point(0.0, 5.0),
        radii: vector(10.0, 5.0),
        x_rotation: Angle::degrees(0.0),
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    };

    let transforms = [
        Transform::translation(3.0, -2.0),
        Transform::scale(2.0, 1.0),
        Transform::rotation(Angle::degrees(30.0)).then_scale(1.0, 3.0),
        Transform::scale(-1.0, 1.0).then_translate(vector(5.0, 5.0)),
    ];

    for transform in &transforms {
        let expected = arc.to_arc().sample(0.5);
        let expected = transform.transform_point(expected);
        let transformed = arc.transformed(transform);
        let actual = transformed.to_arc().sample(0.5);
        assert!(approx_eq(actual, expected), "{actual:?} != {expected:?}");
        assert!(approx_eq(transformed.to_arc().to(), transformed.to));
    }

    let mirrored = arc.transformed(&Transform::scale(-1.0, 1.0));
    assert!(!mirrored.flags.sweep);
}
