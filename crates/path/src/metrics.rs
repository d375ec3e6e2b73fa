use crate::command::{DrawCommand, SubPath};
use crate::curve::CurveWrapper;
use crate::geom::{arc_to_cubic_beziers, LineSegment};
use crate::math::{Point, Rect};

/// Properties derived from a sequence of sub-paths.
#[derive(Clone, Debug, PartialEq)]
pub struct Metrics {
    /// Total length of all sub-paths.
    pub length: f32,
    /// Union of the bounds of all sub-paths. Empty if nothing was drawn or moved to.
    pub bounds: Rect,
    /// One wrapper per command, with the same shape as the sub-paths.
    pub curves: Vec<Vec<CurveWrapper>>,
}

impl Default for Metrics {
    fn default() -> Self {
        Metrics {
            length: 0.0,
            bounds: Rect::empty(),
            curves: Vec::new(),
        }
    }
}

/// Walks all commands once, in order, and computes their length, bounds and curve
/// wrappers.
///
/// Curves extend the bounds by the corners of their exact bounding boxes. A close command
/// draws from the current position back to the position of the last move and only
/// contributes geometry if there is such a move in its sub-path.
pub fn compute_metrics(sub_paths: &[SubPath]) -> Metrics {
    let mut length = 0.0;
    let mut bounds = Rect::empty();
    let mut curves = Vec::with_capacity(sub_paths.len());

    let mut current = Point::origin();
    for (i, sub_path) in sub_paths.iter().enumerate() {
        let mut first: Option<Point> = None;
        let mut wrappers = Vec::with_capacity(sub_path.len());
        for (j, cmd) in sub_path.iter().enumerate() {
            let wrapper = match cmd {
                DrawCommand::Move { to, .. } => {
                    first = Some(*to);
                    bounds.expand_to_include(*to);
                    CurveWrapper::empty(i, j)
                }
                DrawCommand::Line(segment) => CurveWrapper::line(i, j, *segment),
                DrawCommand::Quadratic(segment) => {
                    CurveWrapper::with_beziers(i, j, vec![segment.to_cubic()])
                }
                DrawCommand::Cubic(segment) => CurveWrapper::with_beziers(i, j, vec![*segment]),
                DrawCommand::Arc(arc) if arc.is_straight_line() && !arc.is_degenerate_point() => {
                    CurveWrapper::line(
                        i,
                        j,
                        LineSegment {
                            from: arc.from,
                            to: arc.to,
                        },
                    )
                }
                DrawCommand::Arc(arc) => {
                    let mut beziers = Vec::new();
                    arc_to_cubic_beziers(arc, &mut |bezier| beziers.push(*bezier));
                    CurveWrapper::with_beziers(i, j, beziers)
                }
                DrawCommand::Close { .. } => match first.take() {
                    Some(first) => CurveWrapper::line(
                        i,
                        j,
                        LineSegment {
                            from: current,
                            to: first,
                        },
                    ),
                    None => CurveWrapper::empty(i, j),
                },
            };

            for bezier in wrapper.beziers() {
                bounds.include_box(&bezier.bounding_box());
            }
            length += wrapper.length();

            match cmd {
                DrawCommand::Close { .. } => {
                    if let Some(bezier) = wrapper.beziers().first() {
                        current = bezier.to;
                    }
                }
                _ => {
                    current = cmd.to();
                }
            }

            wrappers.push(wrapper);
        }

        curves.push(wrappers);
    }

    Metrics {
        length,
        bounds,
        curves,
    }
}

#[cfg(test)]
use crate::parser::parse;

#[test]
fn closed_triangle() {
    let metrics = compute_metrics(&parse("M0,0 L10,0 L10,10 Z").unwrap());

    assert!((metrics.length - (20.0 + 200f32.sqrt())).abs() < 1e-3);
    assert_eq!(metrics.bounds, Rect::new(0.0, 0.0, 10.0, 10.0));

    assert_eq!(metrics.curves.len(), 1);
    let wrappers = &metrics.curves[0];
    assert_eq!(wrappers.len(), 4);
    assert!(wrappers[0].is_empty());
    assert_eq!(wrappers[1].beziers().len(), 1);
    assert_eq!(wrappers[3].beziers()[0].from, Point::new(10.0, 10.0));
    assert_eq!(wrappers[3].beziers()[0].to, Point::new(0.0, 0.0));
    for (j, wrapper) in wrappers.iter().enumerate() {
        assert_eq!(wrapper.sub_path_index(), 0);
        assert_eq!(wrapper.command_index(), j);
    }
}

#[test]
fn curve_bounds_include_extrema() {
    let metrics = compute_metrics(&parse("M 0 0 Q 5 10 10 0").unwrap());
    assert_eq!(metrics.bounds.left, 0.0);
    assert_eq!(metrics.bounds.right, 10.0);
    assert!((metrics.bounds.bottom - 5.0).abs() < 1e-4);
    assert_eq!(metrics.bounds.top, 0.0);
}

#[test]
fn shape_matches_commands() {
    let sub_paths = parse("M 0 0 L 1 1 A 1 1 0 0 1 3 1 Z M 5 5 C 6 6 7 6 8 5 L 9 9").unwrap();
    let metrics = compute_metrics(&sub_paths);
    assert_eq!(metrics.curves.len(), sub_paths.len());
    for (sub_path, wrappers) in sub_paths.iter().zip(metrics.curves.iter()) {
        assert_eq!(sub_path.len(), wrappers.len());
    }
}

#[test]
fn degenerate_arcs() {
    // Same start and end: no geometry.
    let metrics = compute_metrics(&parse("M 1 1 A 5 5 0 0 1 1 1").unwrap());
    assert!(metrics.curves[0][1].is_empty());
    assert_eq!(metrics.length, 0.0);

    // Zero radius: a straight line.
    let metrics = compute_metrics(&parse("M 0 0 A 0 5 0 0 1 3 4").unwrap());
    assert_eq!(metrics.curves[0][1].beziers().len(), 1);
    assert_eq!(metrics.length, 5.0);
    assert_eq!(metrics.bounds, Rect::new(0.0, 0.0, 3.0, 4.0));
}

#[test]
fn half_circle_arc() {
    let metrics = compute_metrics(&parse("M 0 0 A 5 5 0 0 1 10 0").unwrap());
    assert_eq!(metrics.curves[0][1].beziers().len(), 2);
    assert!((metrics.length - 5.0 * std::f32::consts::PI).abs() < 1e-2);
    assert!((metrics.bounds.top + 5.0).abs() < 1e-3);
    assert!((metrics.bounds.bottom).abs() < 1e-3);
}

#[test]
fn close_without_move() {
    let sub_paths = vec![SubPath::new(vec![
        DrawCommand::Line(LineSegment {
            from: Point::new(0.0, 0.0),
            to: Point::new(3.0, 4.0),
        }),
        DrawCommand::Close {
            from: Point::new(3.0, 4.0),
            to: Point::new(0.0, 0.0),
        },
    ])];

    let metrics = compute_metrics(&sub_paths);
    assert!(metrics.curves[0][1].is_empty());
    assert_eq!(metrics.length, 5.0);
}

#[test]
fn recompute_is_idempotent() {
    let sub_paths = parse("M 0 0 C 1 2 3 4 5 0 A 2 3 10 1 0 9 9 Z M 3 3 L 4 4").unwrap();
    assert_eq!(compute_metrics(&sub_paths), compute_metrics(&sub_paths));
}

#[test]
fn empty_path() {
    let metrics = compute_metrics(&[]);
    assert_eq!(metrics.length, 0.0);
    assert!(metrics.bounds.is_empty());
    assert!(metrics.curves.is_empty());
}
