use crate::command::{link_sub_paths, DrawCommand, SubPath};
use crate::curve::{CurveWrapper, Projection};
use crate::error::PathError;
use crate::geom::LineSegment;
use crate::interpolate::{check_compatibility, interpolate};
use crate::math::{Point, Rect, Transform};
use crate::metrics::{compute_metrics, Metrics};
use crate::parser::parse;
use crate::serializer::serialize;

use log::{debug, trace};

use std::fmt;
use std::str::FromStr;

/// An editable path along with its derived properties.
///
/// The length, bounds and curve wrappers are recomputed at the end of every mutating
/// operation. Operations that fail return an error before touching the path.
#[derive(Clone, Debug)]
pub struct PathData {
    path_string: String,
    sub_paths: Vec<SubPath>,
    metrics: Metrics,
}

impl Default for PathData {
    fn default() -> Self {
        PathData::new()
    }
}

impl PathData {
    /// An empty path.
    pub fn new() -> Self {
        PathData {
            path_string: String::new(),
            sub_paths: Vec::new(),
            metrics: Metrics::default(),
        }
    }

    /// Parses a path string.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        Ok(Self::from_sub_paths(parse(text)?))
    }

    pub fn from_sub_paths(sub_paths: Vec<SubPath>) -> Self {
        let mut path = PathData::new();
        path.sub_paths = sub_paths;
        path.recompute();

        path
    }

    /// The path in the SVG path syntax, using absolute commands only.
    #[inline]
    pub fn path_string(&self) -> &str {
        &self.path_string
    }

    #[inline]
    pub fn sub_paths(&self) -> &[SubPath] {
        &self.sub_paths
    }

    /// Total length of the path.
    #[inline]
    pub fn length(&self) -> f32 {
        self.metrics.length
    }

    /// Bounds of the path. Empty if the path has no command.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.metrics.bounds
    }

    /// The curve wrappers, one per command.
    #[inline]
    pub fn curves(&self) -> &[Vec<CurveWrapper>] {
        &self.metrics.curves
    }

    pub fn curve(&self, sub_path: usize, command: usize) -> Option<&CurveWrapper> {
        self.metrics.curves.get(sub_path)?.get(command)
    }

    pub fn command(&self, sub_path: usize, command: usize) -> Option<&DrawCommand> {
        self.sub_paths.get(sub_path)?.get(command)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sub_paths.is_empty()
    }

    /// Whether `self` and `other` have the same structure and can be interpolated.
    pub fn can_morph_with(&self, other: &PathData) -> bool {
        check_compatibility(&self.sub_paths, &other.sub_paths).is_ok()
    }

    /// Replaces the path with a parsed path string.
    pub fn set_path_string(&mut self, text: &str) -> Result<(), PathError> {
        let sub_paths = parse(text).map_err(|err| {
            debug!("rejected path string: {}", err);
            err
        })?;
        self.set_sub_paths(sub_paths);

        Ok(())
    }

    pub fn set_sub_paths(&mut self, sub_paths: Vec<SubPath>) {
        self.sub_paths = sub_paths;
        self.recompute();
    }

    /// Rebuilds the path string, length, bounds and curve wrappers from the commands.
    ///
    /// Mutating operations call this automatically.
    pub fn recompute(&mut self) {
        self.metrics = compute_metrics(&self.sub_paths);
        self.path_string = serialize(&self.sub_paths);

        trace!(
            "recomputed path: {} sub-paths, {} commands, length {}, bounds {:?}",
            self.sub_paths.len(),
            self.sub_paths.iter().map(SubPath::len).sum::<usize>(),
            self.metrics.length,
            self.metrics.bounds,
        );
    }

    /// The point of the path closest to `position`.
    ///
    /// If several commands are at the same distance the first one wins. Returns `None` if
    /// the path has no drawn geometry.
    pub fn project(&self, position: Point) -> Option<Projection> {
        let mut best: Option<Projection> = None;
        for wrapper in self.metrics.curves.iter().flatten() {
            if let Some(projection) = wrapper.project(position) {
                if best.map_or(true, |best| projection.distance < best.distance) {
                    best = Some(projection);
                }
            }
        }

        best
    }

    /// Applies the transforms, in order, to every command.
    pub fn transform(&mut self, transforms: &[Transform]) {
        let transform = transforms
            .iter()
            .fold(Transform::identity(), |acc, t| acc.then(t));

        for sub_path in &mut self.sub_paths {
            *sub_path = sub_path.transformed(&transform);
        }
        self.recompute();
    }

    /// Reverses the direction of every sub-path.
    pub fn reverse(&mut self) {
        for sub_path in &mut self.sub_paths {
            *sub_path = sub_path.reversed();
        }
        link_sub_paths(&mut self.sub_paths);
        self.recompute();
    }

    /// Makes the second drawing command of each closed sub-path its first one.
    pub fn shift_forward(&mut self) {
        for sub_path in &mut self.sub_paths {
            *sub_path = sub_path.shifted_forward();
        }
        self.recompute();
    }

    /// Makes the last drawing command of each closed sub-path its first one.
    pub fn shift_back(&mut self) {
        for sub_path in &mut self.sub_paths {
            *sub_path = sub_path.shifted_back();
        }
        self.recompute();
    }

    /// Splits a command in two at `t`.
    ///
    /// Lines become two lines, a close command becomes a line followed by a close command
    /// and bézier curves become two curves of the same degree. Arcs and moves cannot be
    /// split.
    pub fn split(&mut self, sub_path: usize, command: usize, t: f32) -> Result<(), PathError> {
        if !(0.0..=1.0).contains(&t) {
            debug!("rejected split parameter {}", t);
            return Err(PathError::InvalidParameter(t));
        }

        let (cmd, wrapper) = match (self.command(sub_path, command), self.curve(sub_path, command)) {
            (Some(cmd), Some(wrapper)) => (*cmd, wrapper),
            _ => {
                debug!("rejected split of command {} in sub-path {}", command, sub_path);
                return Err(PathError::InvalidIndex { sub_path, command });
            }
        };

        let unsupported = PathError::UnsupportedOperation {
            operation: "split",
            kind: cmd.kind(),
        };

        let replacement = match cmd {
            DrawCommand::Line(segment) => {
                let (a, b) = segment.split(t);
                [DrawCommand::Line(a), DrawCommand::Line(b)]
            }
            DrawCommand::Close { .. } => {
                let bezier = match wrapper.beziers() {
                    [bezier] => *bezier,
                    _ => {
                        debug!("rejected split of a close command without geometry");
                        return Err(unsupported);
                    }
                };
                let (a, b) = LineSegment {
                    from: bezier.from,
                    to: bezier.to,
                }
                .split(t);
                [
                    DrawCommand::Line(a),
                    DrawCommand::Close {
                        from: b.from,
                        to: b.to,
                    },
                ]
            }
            DrawCommand::Quadratic(..) | DrawCommand::Cubic(..) => {
                let (a, b) = wrapper.split(t).ok_or_else(|| unsupported.clone())?;
                if let DrawCommand::Quadratic(..) = cmd {
                    [
                        DrawCommand::Quadratic(a.to_quadratic()),
                        DrawCommand::Quadratic(b.to_quadratic()),
                    ]
                } else {
                    [DrawCommand::Cubic(a), DrawCommand::Cubic(b)]
                }
            }
            DrawCommand::Move { .. } | DrawCommand::Arc(..) => {
                debug!("rejected split of a {} command", cmd.kind());
                return Err(unsupported);
            }
        };

        self.sub_paths[sub_path].replace(command, &replacement);
        self.recompute();

        Ok(())
    }

    /// Replaces the path with the interpolation of `start` and `end` at `fraction`.
    ///
    /// Fails without modifying `self` if the two paths do not have the same structure.
    pub fn interpolate(
        &mut self,
        start: &PathData,
        end: &PathData,
        fraction: f32,
    ) -> Result<(), PathError> {
        let sub_paths = interpolate(&start.sub_paths, &end.sub_paths, fraction).map_err(|err| {
            debug!("rejected interpolation: {}", err);
            err
        })?;
        self.set_sub_paths(sub_paths);

        Ok(())
    }
}

impl FromStr for PathData {
    type Err = PathError;

    fn from_str(text: &str) -> Result<Self, PathError> {
        PathData::parse(text)
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.path_string)
    }
}

#[cfg(test)]
use crate::command::CommandKind;
#[cfg(test)]
use crate::math::{point, vector, Angle};
#[cfg(test)]
use crate::parser::ParseError;

#[cfg(test)]
fn approx_eq(a: Point, b: Point) -> bool {
    (a - b).length() < 1e-3
}

#[test]
fn closed_triangle_metrics() {
    let path = PathData::parse("M0,0 L10,0 L10,10 Z").unwrap();

    assert_eq!(path.sub_paths().len(), 1);
    let kinds: Vec<CommandKind> = path.sub_paths()[0].kinds().collect();
    assert_eq!(
        kinds,
        vec![
            CommandKind::Move,
            CommandKind::Line,
            CommandKind::Line,
            CommandKind::Close
        ]
    );
    assert!(path.sub_paths()[0].is_closed());
    assert!((path.length() - 34.142).abs() < 1e-3);
    assert_eq!(path.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(path.path_string(), "M 0 0 L 10 0 L 10 10 Z");
}

#[test]
fn project_onto_line() {
    let path = PathData::parse("M0,0 L10,0 L10,10 Z").unwrap();

    let projection = path.project(point(5.0, -5.0)).unwrap();
    assert_eq!(projection.sub_path, 0);
    assert_eq!(projection.command, 1);
    assert!(approx_eq(projection.point, point(5.0, 0.0)));
    assert!((projection.distance - 5.0).abs() < 1e-3);

    // On a vertex shared by two commands, the first one wins.
    let projection = path.project(point(12.0, -2.0)).unwrap();
    assert_eq!(projection.command, 1);
    assert!(approx_eq(projection.point, point(10.0, 0.0)));
}

#[test]
fn project_onto_curves() {
    // A half circle made of two cubics, the junction reports the middle of the command.
    let path = PathData::parse("M 0 0 A 5 5 0 0 1 10 0").unwrap();
    let projection = path.project(point(5.0, -10.0)).unwrap();
    assert_eq!(projection.command, 1);
    assert!(approx_eq(projection.point, point(5.0, -5.0)));
    assert!((projection.distance - 5.0).abs() < 1e-2);
    assert!((projection.t - 0.5).abs() < 1e-2);

    let path = PathData::parse("M 0 0 Q 5 10 10 0").unwrap();
    let projection = path.project(point(5.0, 10.0)).unwrap();
    assert_eq!(projection.command, 1);
    assert!(approx_eq(projection.point, point(5.0, 5.0)));
    assert!((projection.distance - 5.0).abs() < 1e-2);
    assert!((projection.t - 0.5).abs() < 1e-2);

    let path = PathData::parse("M 0 0 C 0 10 10 10 10 0 L 10 -5").unwrap();
    let projection = path.project(point(5.0, 20.0)).unwrap();
    assert_eq!(projection.command, 1);
    assert!(approx_eq(projection.point, point(5.0, 7.5)));
    assert!((projection.distance - 12.5).abs() < 1e-2);

    let projection = path.project(point(12.0, -4.0)).unwrap();
    assert_eq!(projection.command, 2);
    assert!(approx_eq(projection.point, point(10.0, -4.0)));
}

#[test]
fn project_without_geometry() {
    assert_eq!(PathData::new().project(point(0.0, 0.0)), None);
    let path = PathData::parse("M 3 3").unwrap();
    assert_eq!(path.project(point(0.0, 0.0)), None);
    assert_eq!(path.bounds(), Rect::new(3.0, 3.0, 3.0, 3.0));
}

#[test]
fn split_line() {
    let mut path = PathData::parse("M0,0 L10,0 L10,10 Z").unwrap();
    let length = path.length();

    path.split(0, 2, 0.5).unwrap();

    let commands = path.sub_paths()[0].commands();
    assert_eq!(commands.len(), 5);
    assert_eq!(
        commands[2],
        DrawCommand::Line(LineSegment {
            from: point(10.0, 0.0),
            to: point(10.0, 5.0)
        })
    );
    assert_eq!(
        commands[3],
        DrawCommand::Line(LineSegment {
            from: point(10.0, 5.0),
            to: point(10.0, 10.0)
        })
    );
    assert!((path.length() - length).abs() < 1e-3);
    assert_eq!(path.curves()[0].len(), 5);
}

#[test]
fn split_close() {
    let mut path = PathData::parse("M0,0 L10,0 L10,10 Z").unwrap();
    path.split(0, 3, 0.5).unwrap();

    let commands = path.sub_paths()[0].commands();
    assert_eq!(commands.len(), 5);
    assert_eq!(commands[3].kind(), CommandKind::Line);
    assert_eq!(commands[3].to(), point(5.0, 5.0));
    assert_eq!(
        commands[4],
        DrawCommand::Close {
            from: point(5.0, 5.0),
            to: point(0.0, 0.0)
        }
    );
    assert!((path.length() - 34.142).abs() < 1e-3);
}

#[test]
fn split_curves() {
    for input in &["M 0 0 Q 5 10 10 0", "M 0 0 C 0 10 10 10 10 0"] {
        let mut path = PathData::parse(input).unwrap();
        let kind = path.sub_paths()[0][1].kind();
        let length = path.length();
        for &t in &[0.1, 0.5, 0.8] {
            let mut split = path.clone();
            split.split(0, 1, t).unwrap();
            let commands = split.sub_paths()[0].commands();
            assert_eq!(commands.len(), 3);
            assert_eq!(commands[1].kind(), kind);
            assert_eq!(commands[2].kind(), kind);
            assert_eq!(commands[1].to(), commands[2].from());
            assert_eq!(commands[2].to(), point(10.0, 0.0));
            assert!((split.length() - length).abs() < 1e-2);
        }
        path.split(0, 1, 1.0).unwrap();
    }
}

#[test]
fn split_errors() {
    let mut path = PathData::parse("M 0 0 A 5 5 0 0 1 10 0 L 20 0").unwrap();
    let before = path.clone();

    assert_eq!(
        path.split(0, 1, 0.5),
        Err(PathError::UnsupportedOperation {
            operation: "split",
            kind: CommandKind::Arc
        })
    );
    assert_eq!(
        path.split(0, 0, 0.5),
        Err(PathError::UnsupportedOperation {
            operation: "split",
            kind: CommandKind::Move
        })
    );
    assert_eq!(
        path.split(0, 3, 0.5),
        Err(PathError::InvalidIndex {
            sub_path: 0,
            command: 3
        })
    );
    assert_eq!(
        path.split(1, 0, 0.5),
        Err(PathError::InvalidIndex {
            sub_path: 1,
            command: 0
        })
    );
    assert_eq!(path.split(0, 2, 1.5), Err(PathError::InvalidParameter(1.5)));

    assert_eq!(path.sub_paths(), before.sub_paths());
    assert_eq!(path.path_string(), before.path_string());
}

#[test]
fn reverse_twice() {
    let input = "M 0 0 L 10 0 Q 15 5 10 10 C 5 15 0 15 0 10 Z M 20 20 A 5 5 0 0 1 30 20 L 40 20";
    let mut path = PathData::parse(input).unwrap();
    let original = path.clone();

    path.reverse();
    assert_eq!(path.path_string(), "M 0 10 C 0 15 5 15 10 10 Q 15 5 10 0 L 0 0 Z M 40 20 L 30 20 A 5 5 0 0 0 20 20");
    assert!((path.length() - original.length()).abs() < 1e-2);
    let (a, b) = (path.bounds(), original.bounds());
    assert!((a.left - b.left).abs() < 1e-3 && (a.right - b.right).abs() < 1e-3);
    assert!((a.top - b.top).abs() < 1e-3 && (a.bottom - b.bottom).abs() < 1e-3);

    path.reverse();
    assert_eq!(path.sub_paths(), original.sub_paths());
}

#[test]
fn shift_forward_and_back() {
    let original = PathData::parse("M0,0 L10,0 L10,10 Z").unwrap();
    let mut path = original.clone();
    let length = path.length();

    path.shift_forward();
    assert_eq!(path.path_string(), "M 10 0 L 10 10 L 0 0 Z");
    assert!((path.length() - length).abs() < 1e-3);

    path.shift_back();
    assert_eq!(path.sub_paths(), original.sub_paths());
    assert_eq!(path.path_string(), original.path_string());

    path.shift_back();
    path.shift_forward();
    assert_eq!(path.sub_paths(), original.sub_paths());

    // Open sub-paths are not affected.
    let mut open = PathData::parse("M 0 0 L 1 0 L 1 1").unwrap();
    open.shift_forward();
    assert_eq!(open.path_string(), "M 0 0 L 1 0 L 1 1");
}

#[test]
fn shift_keeps_morph_partners_compatible() {
    let mut start = PathData::parse("M0,0 L10,0 L10,10 Z").unwrap();
    let end = PathData::parse("M0,0 L0,10 L10,10 Z").unwrap();

    start.shift_forward();
    assert!(start.can_morph_with(&end));

    let mut path = PathData::new();
    path.interpolate(&start, &end, 0.5).unwrap();
    assert_eq!(path.path_string(), "M 5 0 L 5 10 L 5 5 Z");

    start.shift_back();
    start.shift_back();
    assert!(start.can_morph_with(&end));
}

#[test]
fn transform() {
    let mut path = PathData::parse("M0,0 L10,0 L10,10 Z").unwrap();
    path.transform(&[
        Transform::scale(2.0, 2.0),
        Transform::translation(1.0, -1.0),
    ]);

    assert_eq!(path.path_string(), "M 1 -1 L 21 -1 L 21 19 Z");
    assert_eq!(path.bounds(), Rect::new(1.0, -1.0, 21.0, 19.0));
    assert!((path.length() - 2.0 * 34.142).abs() < 1e-2);

    let mut arc = PathData::parse("M 0 0 A 5 5 0 0 1 10 0").unwrap();
    let length = arc.length();
    arc.transform(&[Transform::rotation(Angle::degrees(90.0))]);
    assert!((arc.length() - length).abs() < 1e-2);
    assert!(approx_eq(arc.sub_paths()[0][1].to(), point(0.0, 10.0)));

    arc.transform(&[Transform::scale(-1.0, 1.0)]);
    match arc.sub_paths()[0][1] {
        DrawCommand::Arc(svg_arc) => assert!(!svg_arc.flags.sweep),
        ref other => panic!("unexpected command {:?}", other),
    }

    let mut stretched = PathData::parse("M 0 0 A 5 5 0 0 1 10 0").unwrap();
    stretched.transform(&[Transform::scale(1.0, 2.0)]);
    match stretched.sub_paths()[0][1] {
        DrawCommand::Arc(svg_arc) => {
            // The same ellipse may be described with swapped radii and a quarter turn.
            let radii = vector(
                svg_arc.radii.x.min(svg_arc.radii.y),
                svg_arc.radii.x.max(svg_arc.radii.y),
            );
            assert!((radii - vector(5.0, 10.0)).length() < 1e-3);
        }
        ref other => panic!("unexpected command {:?}", other),
    }
    assert!((stretched.bounds().top + 10.0).abs() < 1e-2);
}

#[test]
fn morph() {
    let start = PathData::parse("M0,0 L0,0").unwrap();
    let end = PathData::parse("M0,0 L10,10").unwrap();
    assert!(start.can_morph_with(&end));

    let mut path = PathData::new();
    path.interpolate(&start, &end, 0.5).unwrap();
    assert_eq!(path.sub_paths()[0][1].to(), point(5.0, 5.0));
    assert!((path.length() - 50f32.sqrt()).abs() < 1e-3);

    path.interpolate(&start, &end, 0.0).unwrap();
    assert_eq!(path.sub_paths(), start.sub_paths());
    path.interpolate(&start, &end, 1.0).unwrap();
    assert_eq!(path.sub_paths(), end.sub_paths());
}

#[test]
fn morph_incompatible() {
    let start = PathData::parse("M 0 0 L 1 1 L 2 2").unwrap();
    let end = PathData::parse("M 0 0 L 1 1").unwrap();
    assert!(!start.can_morph_with(&end));

    let mut path = PathData::parse("M 5 5 L 6 6").unwrap();
    let before = path.path_string().to_string();
    let result = path.interpolate(&start, &end, 0.5);
    assert!(matches!(result, Err(PathError::IncompatibleShapes { .. })));
    assert_eq!(path.path_string(), before);
}

#[test]
fn parse_errors() {
    let mut path = PathData::parse("M 0 0 L 1 1").unwrap();
    let result = path.set_path_string("M 0 0 L 1 1 X");
    assert_eq!(
        result,
        Err(PathError::Parse(ParseError::Command {
            command: 'X',
            line: 0,
            column: 12,
        }))
    );
    assert_eq!(path.path_string(), "M 0 0 L 1 1");

    assert!("M 0 0 L".parse::<PathData>().is_err());
    let parsed: PathData = "M 0 0 L 3 4".parse().unwrap();
    assert_eq!(parsed.length(), 5.0);
    assert_eq!(parsed.to_string(), "M 0 0 L 3 4");
}

#[test]
fn recompute_idempotence() {
    let mut path = PathData::parse("M 0 0 C 1 2 3 4 5 0 A 2 3 10 1 0 9 9 Z").unwrap();
    let length = path.length();
    let bounds = path.bounds();
    let curves = path.curves().to_vec();

    path.recompute();
    assert_eq!(path.length(), length);
    assert_eq!(path.bounds(), bounds);
    assert_eq!(path.curves(), &curves[..]);
}
