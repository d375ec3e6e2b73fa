//! The command model: draw commands grouped into sub-paths.
//!
//! All positions are absolute. Relative commands and shorthands (`H`, `V`, `S`, `T`) are
//! resolved by the parser, so a [`DrawCommand`] always carries every point it needs.

use crate::geom::{CubicBezierSegment, LineSegment, QuadraticBezierSegment, SvgArc};
use crate::math::{Angle, Point, Transform};

use std::fmt;
use std::ops::Index;
use std::slice;

/// One segment instruction of a path.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum DrawCommand {
    /// Starts a new contour at `to`. `from` is the position the pen was at before moving.
    Move { from: Point, to: Point },
    Line(LineSegment<f32>),
    Quadratic(QuadraticBezierSegment<f32>),
    Cubic(CubicBezierSegment<f32>),
    Arc(SvgArc<f32>),
    /// Draws back to the beginning of the contour. `to` is the position of the last `Move`.
    Close { from: Point, to: Point },
}

/// The variant of a [`DrawCommand`], without its data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum CommandKind {
    Move,
    Line,
    Quadratic,
    Cubic,
    Arc,
    Close,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CommandKind::Move => "move",
            CommandKind::Line => "line",
            CommandKind::Quadratic => "quadratic bézier",
            CommandKind::Cubic => "cubic bézier",
            CommandKind::Arc => "elliptic arc",
            CommandKind::Close => "close",
        };

        f.write_str(name)
    }
}

impl DrawCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            DrawCommand::Move { .. } => CommandKind::Move,
            DrawCommand::Line(..) => CommandKind::Line,
            DrawCommand::Quadratic(..) => CommandKind::Quadratic,
            DrawCommand::Cubic(..) => CommandKind::Cubic,
            DrawCommand::Arc(..) => CommandKind::Arc,
            DrawCommand::Close { .. } => CommandKind::Close,
        }
    }

    /// Position of the pen before the command.
    pub fn from(&self) -> Point {
        match self {
            DrawCommand::Move { from, .. } | DrawCommand::Close { from, .. } => *from,
            DrawCommand::Line(segment) => segment.from,
            DrawCommand::Quadratic(segment) => segment.from,
            DrawCommand::Cubic(segment) => segment.from,
            DrawCommand::Arc(arc) => arc.from,
        }
    }

    /// Position of the pen after the command.
    pub fn to(&self) -> Point {
        match self {
            DrawCommand::Move { to, .. } | DrawCommand::Close { to, .. } => *to,
            DrawCommand::Line(segment) => segment.to,
            DrawCommand::Quadratic(segment) => segment.to,
            DrawCommand::Cubic(segment) => segment.to,
            DrawCommand::Arc(arc) => arc.to,
        }
    }

    #[inline]
    pub fn is_move(&self) -> bool {
        matches!(self, DrawCommand::Move { .. })
    }

    #[inline]
    pub fn is_close(&self) -> bool {
        matches!(self, DrawCommand::Close { .. })
    }

    /// The same geometry, traversed in the opposite direction.
    pub fn flip(&self) -> Self {
        match self {
            DrawCommand::Move { from, to } => DrawCommand::Move {
                from: *to,
                to: *from,
            },
            DrawCommand::Line(segment) => DrawCommand::Line(segment.flip()),
            DrawCommand::Quadratic(segment) => DrawCommand::Quadratic(segment.flip()),
            DrawCommand::Cubic(segment) => DrawCommand::Cubic(segment.flip()),
            DrawCommand::Arc(arc) => DrawCommand::Arc(arc.flip()),
            DrawCommand::Close { from, to } => DrawCommand::Close {
                from: *to,
                to: *from,
            },
        }
    }

    /// Applies the transform to every point of the command.
    pub fn transformed(&self, transform: &Transform) -> Self {
        match self {
            DrawCommand::Move { from, to } => DrawCommand::Move {
                from: transform.transform_point(*from),
                to: transform.transform_point(*to),
            },
            DrawCommand::Line(segment) => DrawCommand::Line(segment.transformed(transform)),
            DrawCommand::Quadratic(segment) => {
                DrawCommand::Quadratic(segment.transformed(transform))
            }
            DrawCommand::Cubic(segment) => DrawCommand::Cubic(segment.transformed(transform)),
            DrawCommand::Arc(arc) => DrawCommand::Arc(arc.transformed(transform)),
            DrawCommand::Close { from, to } => DrawCommand::Close {
                from: transform.transform_point(*from),
                to: transform.transform_point(*to),
            },
        }
    }

    /// Linear interpolation between two commands of the same kind.
    ///
    /// Arc radii and rotations are interpolated too, arc flags are taken from `self`.
    /// Returns `None` if the commands are of different kinds.
    pub fn lerp(&self, other: &Self, t: f32) -> Option<Self> {
        let cmd = match (self, other) {
            (DrawCommand::Move { from: f0, to: t0 }, DrawCommand::Move { from: f1, to: t1 }) => {
                DrawCommand::Move {
                    from: f0.lerp(*f1, t),
                    to: t0.lerp(*t1, t),
                }
            }
            (DrawCommand::Line(a), DrawCommand::Line(b)) => DrawCommand::Line(LineSegment {
                from: a.from.lerp(b.from, t),
                to: a.to.lerp(b.to, t),
            }),
            (DrawCommand::Quadratic(a), DrawCommand::Quadratic(b)) => {
                DrawCommand::Quadratic(QuadraticBezierSegment {
                    from: a.from.lerp(b.from, t),
                    ctrl: a.ctrl.lerp(b.ctrl, t),
                    to: a.to.lerp(b.to, t),
                })
            }
            (DrawCommand::Cubic(a), DrawCommand::Cubic(b)) => {
                DrawCommand::Cubic(CubicBezierSegment {
                    from: a.from.lerp(b.from, t),
                    ctrl1: a.ctrl1.lerp(b.ctrl1, t),
                    ctrl2: a.ctrl2.lerp(b.ctrl2, t),
                    to: a.to.lerp(b.to, t),
                })
            }
            (DrawCommand::Arc(a), DrawCommand::Arc(b)) => {
                let rotation = a.x_rotation.get() + (b.x_rotation.get() - a.x_rotation.get()) * t;
                DrawCommand::Arc(SvgArc {
                    from: a.from.lerp(b.from, t),
                    to: a.to.lerp(b.to, t),
                    radii: a.radii.lerp(b.radii, t),
                    x_rotation: Angle::radians(rotation),
                    flags: a.flags,
                })
            }
            (DrawCommand::Close { from: f0, to: t0 }, DrawCommand::Close { from: f1, to: t1 }) => {
                DrawCommand::Close {
                    from: f0.lerp(*f1, t),
                    to: t0.lerp(*t1, t),
                }
            }
            _ => {
                return None;
            }
        };

        Some(cmd)
    }
}

/// One contiguous contour: an ordered list of draw commands.
///
/// A sub-path normally starts with a `Move`. It is closed if its last command is a
/// `Close`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SubPath {
    commands: Vec<DrawCommand>,
}

impl SubPath {
    pub fn new(commands: Vec<DrawCommand>) -> Self {
        SubPath { commands }
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[inline]
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&DrawCommand> {
        self.commands.get(index)
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<DrawCommand> {
        self.commands.iter()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.last().map_or(false, DrawCommand::is_close)
    }

    /// Position of the pen at the end of the sub-path.
    pub fn end(&self) -> Option<Point> {
        self.commands.last().map(DrawCommand::to)
    }

    /// The kinds of all commands, in order.
    pub fn kinds(&self) -> impl Iterator<Item = CommandKind> + '_ {
        self.commands.iter().map(DrawCommand::kind)
    }

    pub(crate) fn replace(&mut self, index: usize, replacement: &[DrawCommand]) {
        self.commands
            .splice(index..index + 1, replacement.iter().cloned());
    }

    // Splits the commands into the leading move, the drawing commands and the trailing close.
    fn parts(&self) -> (Option<DrawCommand>, &[DrawCommand], Option<DrawCommand>) {
        let mut drawing = &self.commands[..];
        let mut head = None;
        let mut tail = None;
        if let Some((first, rest)) = drawing.split_first() {
            if first.is_move() {
                head = Some(*first);
                drawing = rest;
            }
        }
        if let Some((last, rest)) = drawing.split_last() {
            if last.is_close() {
                tail = Some(*last);
                drawing = rest;
            }
        }

        (head, drawing, tail)
    }

    /// The same contour, traversed in the opposite direction.
    ///
    /// An open sub-path `[Move(a0), c1..cn]` becomes `[Move(an), flip(cn)..flip(c1)]`. A
    /// closed one keeps its close command last and starts where its last drawing command
    /// ended, so reversing twice gives back the original commands.
    pub fn reversed(&self) -> SubPath {
        let (head, drawing, tail) = self.parts();

        let start = match (head, drawing.first(), tail) {
            (Some(cmd), _, _) => cmd.to(),
            (None, Some(cmd), _) => cmd.from(),
            (None, None, Some(cmd)) => cmd.from(),
            (None, None, None) => return self.clone(),
        };
        let end = drawing.last().map_or(start, DrawCommand::to);

        let mut commands = Vec::with_capacity(self.commands.len());
        commands.push(DrawCommand::Move {
            from: head.map_or(end, |cmd| cmd.from()),
            to: end,
        });
        commands.extend(drawing.iter().rev().map(DrawCommand::flip));
        if tail.is_some() {
            commands.push(DrawCommand::Close {
                from: start,
                to: end,
            });
        }

        SubPath { commands }
    }

    /// Rotates a closed sub-path so that it starts where its first drawing command ended.
    ///
    /// The drawn shape and the number of commands are unchanged: when the closing edge has
    /// a length, it becomes an explicit line and the first drawing command, if it is a line,
    /// becomes the new closing edge. If that command is a curve, the closing edge can't take
    /// its place and one extra line is added. Open sub-paths and sub-paths with fewer than
    /// two drawing commands are returned unchanged.
    pub fn shifted_forward(&self) -> SubPath {
        self.shifted(true)
    }

    /// The inverse of [`SubPath::shifted_forward`]: the sub-path starts where its last
    /// drawing command began.
    pub fn shifted_back(&self) -> SubPath {
        self.shifted(false)
    }

    fn shifted(&self, forward: bool) -> SubPath {
        let (head, drawing, tail) = self.parts();
        let head = match (head, tail) {
            (Some(head), Some(_)) if drawing.len() >= 2 => head,
            _ => return self.clone(),
        };

        let start = head.to();
        let end = drawing[drawing.len() - 1].to();
        let closing = DrawCommand::Line(LineSegment {
            from: end,
            to: start,
        });

        let mut drawing = drawing.to_vec();
        match (end == start, forward) {
            (true, true) => drawing.rotate_left(1),
            (true, false) => drawing.rotate_right(1),
            (false, true) => {
                if drawing[0].kind() == CommandKind::Line {
                    drawing.remove(0);
                    drawing.push(closing);
                } else {
                    drawing.push(closing);
                    drawing.rotate_left(1);
                }
            }
            (false, false) => {
                if drawing[drawing.len() - 1].kind() == CommandKind::Line {
                    drawing.pop();
                    drawing.insert(0, closing);
                } else {
                    drawing.push(closing);
                    drawing.rotate_right(1);
                }
            }
        }

        // The closing edge goes from the last drawn point back to the new start.
        let start = drawing[0].from();
        let end = drawing[drawing.len() - 1].to();
        let mut commands = Vec::with_capacity(drawing.len() + 2);
        commands.push(DrawCommand::Move {
            from: head.from(),
            to: start,
        });
        commands.extend(drawing);
        commands.push(DrawCommand::Close {
            from: end,
            to: start,
        });

        SubPath { commands }
    }

    /// Applies the transform to every command.
    pub fn transformed(&self, transform: &Transform) -> SubPath {
        SubPath {
            commands: self
                .commands
                .iter()
                .map(|cmd| cmd.transformed(transform))
                .collect(),
        }
    }
}

impl From<Vec<DrawCommand>> for SubPath {
    fn from(commands: Vec<DrawCommand>) -> Self {
        SubPath::new(commands)
    }
}

impl Index<usize> for SubPath {
    type Output = DrawCommand;
    fn index(&self, index: usize) -> &DrawCommand {
        &self.commands[index]
    }
}

impl<'l> IntoIterator for &'l SubPath {
    type Item = &'l DrawCommand;
    type IntoIter = slice::Iter<'l, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// Sets the `from` position of each sub-path's leading `Move` to where the previous
/// sub-path ended.
pub(crate) fn link_sub_paths(sub_paths: &mut [SubPath]) {
    let mut pen = Point::origin();
    for sub_path in sub_paths {
        if let Some(DrawCommand::Move { from, .. }) = sub_path.commands.first_mut() {
            *from = pen;
        }
        if let Some(end) = sub_path.end() {
            pen = end;
        }
    }
}

#[cfg(test)]
use crate::math::{point, vector};
#[cfg(test)]
use crate::geom::ArcFlags;

#[cfg(test)]
fn line(from: Point, to: Point) -> DrawCommand {
    DrawCommand::Line(LineSegment { from, to })
}

#[cfg(test)]
fn triangle() -> SubPath {
    SubPath::new(vec![
        DrawCommand::Move {
            from: point(0.0, 0.0),
            to: point(0.0, 0.0),
        },
        line(point(0.0, 0.0), point(10.0, 0.0)),
        line(point(10.0, 0.0), point(10.0, 10.0)),
        DrawCommand::Close {
            from: point(10.0, 10.0),
            to: point(0.0, 0.0),
        },
    ])
}

#[test]
fn reverse_open_sub_path() {
    let sub_path = SubPath::new(vec![
        DrawCommand::Move {
            from: point(0.0, 0.0),
            to: point(1.0, 1.0),
        },
        line(point(1.0, 1.0), point(5.0, 1.0)),
        DrawCommand::Quadratic(QuadraticBezierSegment {
            from: point(5.0, 1.0),
            ctrl: point(6.0, 3.0),
            to: point(8.0, 1.0),
        }),
    ]);

    let reversed = sub_path.reversed();
    assert!(!reversed.is_closed());
    assert_eq!(
        reversed[0],
        DrawCommand::Move {
            from: point(0.0, 0.0),
            to: point(8.0, 1.0)
        }
    );
    assert_eq!(reversed[1].kind(), CommandKind::Quadratic);
    assert_eq!(reversed[1].to(), point(5.0, 1.0));
    assert_eq!(reversed[2], line(point(5.0, 1.0), point(1.0, 1.0)));

    assert_eq!(reversed.reversed(), sub_path);
}

#[test]
fn reverse_closed_sub_path() {
    let sub_path = triangle();
    let reversed = sub_path.reversed();

    assert_eq!(
        reversed.commands(),
        &[
            DrawCommand::Move {
                from: point(0.0, 0.0),
                to: point(10.0, 10.0)
            },
            line(point(10.0, 10.0), point(10.0, 0.0)),
            line(point(10.0, 0.0), point(0.0, 0.0)),
            DrawCommand::Close {
                from: point(0.0, 0.0),
                to: point(10.0, 10.0)
            },
        ][..]
    );

    assert_eq!(reversed.reversed(), sub_path);
}

#[test]
fn reverse_arc_toggles_sweep() {
    let arc = SvgArc {
        from: point(0.0, 0.0),
        to: point(2.0, 0.0),
        radii: vector(1.0, 1.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    };
    let sub_path = SubPath::new(vec![
        DrawCommand::Move {
            from: point(0.0, 0.0),
            to: point(0.0, 0.0),
        },
        DrawCommand::Arc(arc),
    ]);

    match sub_path.reversed()[1] {
        DrawCommand::Arc(reversed) => {
            assert_eq!(reversed.from, arc.to);
            assert_eq!(reversed.to, arc.from);
            assert!(!reversed.flags.sweep);
        }
        ref other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn shift_closed_sub_path() {
    let shifted = triangle().shifted_forward();

    // The closing edge becomes a line and the first line becomes the closing edge.
    assert_eq!(
        shifted.commands(),
        &[
            DrawCommand::Move {
                from: point(0.0, 0.0),
                to: point(10.0, 0.0)
            },
            line(point(10.0, 0.0), point(10.0, 10.0)),
            line(point(10.0, 10.0), point(0.0, 0.0)),
            DrawCommand::Close {
                from: point(0.0, 0.0),
                to: point(10.0, 0.0)
            },
        ][..]
    );

    assert_eq!(shifted.shifted_back(), triangle());
    assert_eq!(triangle().shifted_back().shifted_forward(), triangle());

    // Three steps go all the way around the triangle.
    let mut cycle = triangle();
    for _ in 0..3 {
        cycle = cycle.shifted_forward();
        assert_eq!(cycle.len(), 4);
    }
    assert_eq!(cycle, triangle());
}

#[test]
fn shift_explicitly_closed_sub_path() {
    // The last line already returns to the start, the close command has no length.
    let sub_path = SubPath::new(vec![
        DrawCommand::Move {
            from: point(0.0, 0.0),
            to: point(0.0, 0.0),
        },
        line(point(0.0, 0.0), point(10.0, 0.0)),
        DrawCommand::Quadratic(QuadraticBezierSegment {
            from: point(10.0, 0.0),
            ctrl: point(10.0, 10.0),
            to: point(0.0, 10.0),
        }),
        line(point(0.0, 10.0), point(0.0, 0.0)),
        DrawCommand::Close {
            from: point(0.0, 0.0),
            to: point(0.0, 0.0),
        },
    ]);

    let shifted = sub_path.shifted_forward();
    assert_eq!(shifted.len(), 5);
    assert_eq!(shifted[0].to(), point(10.0, 0.0));
    assert_eq!(shifted[1].kind(), CommandKind::Quadratic);
    assert_eq!(shifted[3], line(point(0.0, 0.0), point(10.0, 0.0)));
    assert_eq!(
        shifted[4],
        DrawCommand::Close {
            from: point(10.0, 0.0),
            to: point(10.0, 0.0)
        }
    );
    assert_eq!(shifted.shifted_back(), sub_path);
    assert_eq!(sub_path.shifted_back().shifted_forward(), sub_path);
}

#[test]
fn shift_curve_out_of_the_first_place() {
    let sub_path = SubPath::new(vec![
        DrawCommand::Move {
            from: point(0.0, 0.0),
            to: point(0.0, 0.0),
        },
        DrawCommand::Quadratic(QuadraticBezierSegment {
            from: point(0.0, 0.0),
            ctrl: point(5.0, -5.0),
            to: point(10.0, 0.0),
        }),
        line(point(10.0, 0.0), point(10.0, 10.0)),
        DrawCommand::Close {
            from: point(10.0, 10.0),
            to: point(0.0, 0.0),
        },
    ]);

    // A curve can't become the closing edge, so the closing edge is kept as a line.
    let shifted = sub_path.shifted_forward();
    assert_eq!(shifted.len(), 5);
    assert_eq!(shifted[0].to(), point(10.0, 0.0));
    assert_eq!(shifted[1], line(point(10.0, 0.0), point(10.0, 10.0)));
    assert_eq!(shifted[2], line(point(10.0, 10.0), point(0.0, 0.0)));
    assert_eq!(shifted[3].kind(), CommandKind::Quadratic);
    assert_eq!(shifted[4].from(), shifted[4].to());
}

#[test]
fn shift_open_sub_path_is_noop() {
    let sub_path = SubPath::new(vec![
        DrawCommand::Move {
            from: point(0.0, 0.0),
            to: point(0.0, 0.0),
        },
        line(point(0.0, 0.0), point(1.0, 0.0)),
        line(point(1.0, 0.0), point(1.0, 1.0)),
    ]);

    assert_eq!(sub_path.shifted_forward(), sub_path);
    assert_eq!(sub_path.shifted_back(), sub_path);
}

#[test]
fn lerp_commands() {
    let a = line(point(0.0, 0.0), point(0.0, 0.0));
    let b = line(point(0.0, 0.0), point(10.0, 10.0));
    assert_eq!(a.lerp(&b, 0.5), Some(line(point(0.0, 0.0), point(5.0, 5.0))));

    let close = DrawCommand::Close {
        from: point(0.0, 0.0),
        to: point(0.0, 0.0),
    };
    assert_eq!(a.lerp(&close, 0.5), None);
}

#[test]
fn link_moves() {
    let mut sub_paths = vec![triangle().reversed(), triangle()];
    link_sub_paths(&mut sub_paths);
    assert_eq!(sub_paths[0][0].from(), point(0.0, 0.0));
    // The first sub-path ends with a close command drawing back to (10, 10).
    assert_eq!(sub_paths[1][0].from(), point(10.0, 10.0));
}
