//! A parser for the SVG path syntax.
//!
//! The output is a sequence of [`SubPath`]s made of absolute [`DrawCommand`]s.

use crate::command::{DrawCommand, SubPath};
use crate::geom::{ArcFlags, CubicBezierSegment, LineSegment, QuadraticBezierSegment, SvgArc};
use crate::math::{point, vector, Angle, Point};

use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error("Line {line} Column {column}: Expected number, got {src:?}.")]
    Number { src: String, line: i32, column: i32 },
    #[error("Line {line} Column {column}: Expected flag (0/1), got {src:?}.")]
    Flag { src: char, line: i32, column: i32 },
    #[error("Line {line} Column {column}: Invalid command {command:?}.")]
    Command {
        command: char,
        line: i32,
        column: i32,
    },
    #[error("Line {line} Column {column}: Expected move-to command, got {command:?}.")]
    MissingMoveTo {
        command: char,
        line: i32,
        column: i32,
    },
}

impl ParseError {
    /// Line and column of the offending token.
    pub fn position(&self) -> (i32, i32) {
        match self {
            ParseError::Number { line, column, .. }
            | ParseError::Flag { line, column, .. }
            | ParseError::Command { line, column, .. }
            | ParseError::MissingMoveTo { line, column, .. } => (*line, *column),
        }
    }
}

// A buffered iterator of characters keeping track of line and column.
pub struct Source<Iter> {
    src: Iter,
    current: char,
    line: i32,
    col: i32,
    finished: bool,
}

impl<Iter: Iterator<Item = char>> Source<Iter> {
    pub fn new<IntoIter>(src: IntoIter) -> Self
    where
        IntoIter: IntoIterator<IntoIter = Iter>,
    {
        let mut src = src.into_iter();

        let (current, finished) = match src.next() {
            Some(c) => (c, false),
            None => (' ', true),
        };

        let line = if current == '\n' { 1 } else { 0 };

        Source {
            current,
            finished,
            src,
            line,
            col: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.finished && (self.current.is_whitespace() || self.current == ',') {
            self.advance_one();
        }
    }

    fn advance_one(&mut self) {
        if self.finished {
            return;
        }
        match self.src.next() {
            Some('\n') => {
                self.current = '\n';
                self.line += 1;
                self.col = -1;
            }
            Some(c) => {
                self.current = c;
                self.col += 1;
            }
            None => {
                // Errors at the end of the input point one past the last character.
                self.current = '~';
                self.col += 1;
                self.finished = true;
            }
        }
    }
}

/// Parses a path string into sub-paths.
///
/// An empty or whitespace-only string produces no sub-path.
pub fn parse(text: &str) -> Result<Vec<SubPath>, ParseError> {
    let mut parser = PathParser::new();
    parser.parse(&mut Source::new(text.chars()))
}

fn is_command(c: char) -> bool {
    matches!(
        c.to_ascii_uppercase(),
        'M' | 'L' | 'H' | 'V' | 'Q' | 'T' | 'C' | 'S' | 'A' | 'Z'
    )
}

/// A context object for parsing the SVG path syntax.
///
/// It keeps its scratch buffer between calls so that parsing several strings does not
/// allocate more than necessary.
#[derive(Debug, Default)]
pub struct PathParser {
    float_buffer: String,
    current_position: Point,
    sub_paths: Vec<SubPath>,
    commands: Vec<DrawCommand>,
}

impl PathParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse<Iter>(&mut self, src: &mut Source<Iter>) -> Result<Vec<SubPath>, ParseError>
    where
        Iter: Iterator<Item = char>,
    {
        self.sub_paths.clear();
        self.commands.clear();

        let res = self.parse_path(src);
        self.end_sub_path();

        let sub_paths = std::mem::take(&mut self.sub_paths);
        res.map(|()| sub_paths)
    }

    fn end_sub_path(&mut self) {
        if !self.commands.is_empty() {
            let commands = std::mem::take(&mut self.commands);
            self.sub_paths.push(SubPath::new(commands));
        }
    }

    fn parse_path(&mut self, src: &mut Source<impl Iterator<Item = char>>) -> Result<(), ParseError> {
        // If a relative moveto (m) appears as the first element of the path, then it is
        // treated as a pair of absolute coordinates.
        self.current_position = point(0.0, 0.0);
        let mut first_position = point(0.0, 0.0);

        let mut need_start = true;
        let mut closed = false;
        let mut prev_cubic_ctrl = None;
        let mut prev_quadratic_ctrl = None;
        let mut implicit_cmd = 'M';

        src.skip_whitespace();

        while !src.finished {
            let mut cmd = src.current;
            let cmd_line = src.line;
            let cmd_col = src.col;

            if cmd.is_ascii_alphabetic() {
                src.advance_one();
            } else {
                cmd = implicit_cmd;
            }

            if need_start && cmd != 'm' && cmd != 'M' {
                return Err(ParseError::MissingMoveTo {
                    command: cmd,
                    line: cmd_line,
                    column: cmd_col,
                });
            }

            // Drawing after a close command starts a new sub-path where the closed one began.
            if closed && cmd != 'm' && cmd != 'M' && is_command(cmd) {
                self.end_sub_path();
                self.commands.push(DrawCommand::Move {
                    from: first_position,
                    to: first_position,
                });
            }
            closed = false;

            let is_relative = cmd.is_lowercase();
            let from = self.current_position;

            match cmd {
                'l' | 'L' => {
                    let to = self.parse_endpoint(is_relative, src)?;
                    self.push_line(from, to);
                }
                'h' | 'H' => {
                    let mut x = self.parse_number(src)?;
                    if is_relative {
                        x += from.x;
                    }
                    let to = point(x, from.y);
                    self.current_position = to;
                    self.push_line(from, to);
                }
                'v' | 'V' => {
                    let mut y = self.parse_number(src)?;
                    if is_relative {
                        y += from.y;
                    }
                    let to = point(from.x, y);
                    self.current_position = to;
                    self.push_line(from, to);
                }
                'q' | 'Q' => {
                    let ctrl = self.parse_point(is_relative, src)?;
                    let to = self.parse_endpoint(is_relative, src)?;
                    prev_quadratic_ctrl = Some(ctrl);
                    self.push_quadratic(from, ctrl, to);
                }
                't' | 'T' => {
                    let ctrl = self.get_smooth_ctrl(prev_quadratic_ctrl);
                    let to = self.parse_endpoint(is_relative, src)?;
                    prev_quadratic_ctrl = Some(ctrl);
                    self.push_quadratic(from, ctrl, to);
                }
                'c' | 'C' => {
                    let ctrl1 = self.parse_point(is_relative, src)?;
                    let ctrl2 = self.parse_point(is_relative, src)?;
                    let to = self.parse_endpoint(is_relative, src)?;
                    prev_cubic_ctrl = Some(ctrl2);
                    self.push_cubic(from, ctrl1, ctrl2, to);
                }
                's' | 'S' => {
                    let ctrl1 = self.get_smooth_ctrl(prev_cubic_ctrl);
                    let ctrl2 = self.parse_point(is_relative, src)?;
                    let to = self.parse_endpoint(is_relative, src)?;
                    prev_cubic_ctrl = Some(ctrl2);
                    self.push_cubic(from, ctrl1, ctrl2, to);
                }
                'a' | 'A' => {
                    let rx = self.parse_number(src)?;
                    let ry = self.parse_number(src)?;
                    let x_rotation = self.parse_number(src)?;
                    let large_arc = self.parse_flag(src)?;
                    let sweep = self.parse_flag(src)?;
                    let to = self.parse_endpoint(is_relative, src)?;
                    self.commands.push(DrawCommand::Arc(SvgArc {
                        from,
                        to,
                        radii: vector(rx, ry),
                        x_rotation: Angle::degrees(x_rotation),
                        flags: ArcFlags { large_arc, sweep },
                    }));
                }
                'm' | 'M' => {
                    self.end_sub_path();

                    let to = self.parse_endpoint(is_relative, src)?;
                    first_position = to;
                    self.commands.push(DrawCommand::Move { from, to });
                    need_start = false;
                }
                'z' | 'Z' => {
                    self.commands.push(DrawCommand::Close {
                        from,
                        to: first_position,
                    });
                    self.current_position = first_position;
                    closed = true;
                }
                _ => {
                    return Err(ParseError::Command {
                        command: cmd,
                        line: cmd_line,
                        column: cmd_col,
                    });
                }
            }

            match cmd {
                'c' | 'C' | 's' | 'S' => {
                    prev_quadratic_ctrl = None;
                }
                'q' | 'Q' | 't' | 'T' => {
                    prev_cubic_ctrl = None;
                }
                _ => {
                    prev_cubic_ctrl = None;
                    prev_quadratic_ctrl = None;
                }
            }

            implicit_cmd = match cmd {
                'm' => 'l',
                'M' => 'L',
                'z' => 'm',
                'Z' => 'M',
                c => c,
            };

            src.skip_whitespace();
        }

        Ok(())
    }

    fn push_line(&mut self, from: Point, to: Point) {
        self.commands
            .push(DrawCommand::Line(LineSegment { from, to }));
    }

    fn push_quadratic(&mut self, from: Point, ctrl: Point, to: Point) {
        self.commands
            .push(DrawCommand::Quadratic(QuadraticBezierSegment { from, ctrl, to }));
    }

    fn push_cubic(&mut self, from: Point, ctrl1: Point, ctrl2: Point, to: Point) {
        self.commands.push(DrawCommand::Cubic(CubicBezierSegment {
            from,
            ctrl1,
            ctrl2,
            to,
        }));
    }

    fn get_smooth_ctrl(&self, prev_ctrl: Option<Point>) -> Point {
        if let Some(prev_ctrl) = prev_ctrl {
            self.current_position + (self.current_position - prev_ctrl)
        } else {
            self.current_position
        }
    }

    fn parse_endpoint(
        &mut self,
        is_relative: bool,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<Point, ParseError> {
        let position = self.parse_point(is_relative, src)?;
        self.current_position = position;

        Ok(position)
    }

    fn parse_point(
        &mut self,
        is_relative: bool,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<Point, ParseError> {
        let mut x = self.parse_number(src)?;
        let mut y = self.parse_number(src)?;

        if is_relative {
            x += self.current_position.x;
            y += self.current_position.y;
        }

        Ok(point(x, y))
    }

    fn parse_number(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<f32, ParseError> {
        self.float_buffer.clear();

        src.skip_whitespace();

        let line = src.line;
        let column = src.col;

        if src.current == '-' || src.current == '+' {
            self.float_buffer.push(src.current);
            src.advance_one();
        }

        while src.current.is_ascii_digit() {
            self.float_buffer.push(src.current);
            src.advance_one();
        }

        if src.current == '.' {
            self.float_buffer.push('.');
            src.advance_one();

            while src.current.is_ascii_digit() {
                self.float_buffer.push(src.current);
                src.advance_one();
            }
        }

        if src.current == 'e' || src.current == 'E' {
            self.float_buffer.push(src.current);
            src.advance_one();

            if src.current == '-' || src.current == '+' {
                self.float_buffer.push(src.current);
                src.advance_one();
            }

            while src.current.is_ascii_digit() {
                self.float_buffer.push(src.current);
                src.advance_one();
            }
        }

        match self.float_buffer.parse::<f32>() {
            Ok(val) => Ok(val),
            Err(_) => {
                if self.float_buffer.is_empty() && !src.finished {
                    self.float_buffer.push(src.current);
                }
                Err(ParseError::Number {
                    src: std::mem::take(&mut self.float_buffer),
                    line,
                    column,
                })
            }
        }
    }

    fn parse_flag(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<bool, ParseError> {
        src.skip_whitespace();
        match src.current {
            '1' if !src.finished => {
                src.advance_one();
                Ok(true)
            }
            '0' if !src.finished => {
                src.advance_one();
                Ok(false)
            }
            _ => Err(ParseError::Flag {
                src: src.current,
                line: src.line,
                column: src.col,
            }),
        }
    }
}

#[cfg(test)]
fn line(from: Point, to: Point) -> DrawCommand {
    DrawCommand::Line(LineSegment { from, to })
}

#[test]
fn empty() {
    assert_eq!(parse(""), Ok(Vec::new()));
    assert_eq!(parse(" \n "), Ok(Vec::new()));
}

#[test]
fn simple_square() {
    let sub_paths = parse("M 0 0 L 1 0 L 1 1 L 0 1 Z").unwrap();
    assert_eq!(sub_paths.len(), 1);
    let commands = sub_paths[0].commands();
    assert_eq!(commands.len(), 5);
    assert_eq!(
        commands[0],
        DrawCommand::Move {
            from: point(0.0, 0.0),
            to: point(0.0, 0.0)
        }
    );
    assert_eq!(commands[1], line(point(0.0, 0.0), point(1.0, 0.0)));
    assert_eq!(commands[3], line(point(1.0, 1.0), point(0.0, 1.0)));
    assert_eq!(
        commands[4],
        DrawCommand::Close {
            from: point(0.0, 1.0),
            to: point(0.0, 0.0)
        }
    );
}

#[test]
fn commas_and_implicit_commands() {
    let sub_paths = parse("M0,0 10,0 10,10z").unwrap();
    let commands = sub_paths[0].commands();
    assert_eq!(commands.len(), 4);
    assert_eq!(commands[1], line(point(0.0, 0.0), point(10.0, 0.0)));
    assert_eq!(commands[2], line(point(10.0, 0.0), point(10.0, 10.0)));
    assert!(commands[3].is_close());
}

#[test]
fn relative_commands() {
    let sub_paths = parse("m 1 1 l 2 0 h 1 v 3 q 1 1 2 0 c 0 1 1 1 1 0 z m 1 1 l 1 1").unwrap();
    assert_eq!(sub_paths.len(), 2);

    let commands = sub_paths[0].commands();
    assert_eq!(commands[0].to(), point(1.0, 1.0));
    assert_eq!(commands[1], line(point(1.0, 1.0), point(3.0, 1.0)));
    assert_eq!(commands[2], line(point(3.0, 1.0), point(4.0, 1.0)));
    assert_eq!(commands[3], line(point(4.0, 1.0), point(4.0, 4.0)));
    assert_eq!(
        commands[4],
        DrawCommand::Quadratic(QuadraticBezierSegment {
            from: point(4.0, 4.0),
            ctrl: point(5.0, 5.0),
            to: point(6.0, 4.0),
        })
    );
    assert_eq!(
        commands[5],
        DrawCommand::Cubic(CubicBezierSegment {
            from: point(6.0, 4.0),
            ctrl1: point(6.0, 5.0),
            ctrl2: point(7.0, 5.0),
            to: point(7.0, 4.0),
        })
    );

    // After a close command, relative positions are resolved against the start of the
    // closed sub-path.
    let commands = sub_paths[1].commands();
    assert_eq!(
        commands[0],
        DrawCommand::Move {
            from: point(1.0, 1.0),
            to: point(2.0, 2.0)
        }
    );
    assert_eq!(commands[1], line(point(2.0, 2.0), point(3.0, 3.0)));
}

#[test]
fn smooth_curves() {
    let sub_paths = parse("M 0 0 Q 1 1 2 0 T 4 0 C 5 1 6 1 7 0 S 9 -1 10 0 S 11 1 12 0").unwrap();
    let commands = sub_paths[0].commands();
    match commands[2] {
        DrawCommand::Quadratic(q) => assert_eq!(q.ctrl, point(3.0, -1.0)),
        ref other => panic!("unexpected command {:?}", other),
    }
    match commands[4] {
        DrawCommand::Cubic(c) => {
            assert_eq!(c.from, point(7.0, 0.0));
            assert_eq!(c.ctrl1, point(8.0, -1.0));
            assert_eq!(c.ctrl2, point(9.0, -1.0));
        }
        ref other => panic!("unexpected command {:?}", other),
    }
    match commands[5] {
        DrawCommand::Cubic(c) => assert_eq!(c.ctrl1, point(11.0, 1.0)),
        ref other => panic!("unexpected command {:?}", other),
    }

    // Without a previous curve of the same family, the control point is the current
    // position.
    let sub_paths = parse("M 0 0 L 1 0 T 2 0").unwrap();
    match sub_paths[0][2] {
        DrawCommand::Quadratic(q) => assert_eq!(q.ctrl, point(1.0, 0.0)),
        ref other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn arcs() {
    let sub_paths = parse("M 0 0 A 5 4 30 1 0 10 0 a5,5 0 0110,0").unwrap();
    let commands = sub_paths[0].commands();
    match commands[1] {
        DrawCommand::Arc(arc) => {
            assert_eq!(arc.from, point(0.0, 0.0));
            assert_eq!(arc.to, point(10.0, 0.0));
            assert_eq!(arc.radii, vector(5.0, 4.0));
            assert!((arc.x_rotation.to_degrees() - 30.0).abs() < 1e-4);
            assert_eq!(
                arc.flags,
                ArcFlags {
                    large_arc: true,
                    sweep: false
                }
            );
        }
        ref other => panic!("unexpected command {:?}", other),
    }
    match commands[2] {
        DrawCommand::Arc(arc) => {
            assert_eq!(arc.from, point(10.0, 0.0));
            assert_eq!(arc.to, point(20.0, 0.0));
            assert_eq!(
                arc.flags,
                ArcFlags {
                    large_arc: false,
                    sweep: true
                }
            );
        }
        ref other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn numbers() {
    let sub_paths = parse("M0.6.5L-1e1-2E-1L+3.-.5").unwrap();
    let commands = sub_paths[0].commands();
    assert_eq!(commands[0].to(), point(0.6, 0.5));
    assert_eq!(commands[1].to(), point(-10.0, -0.2));
    assert_eq!(commands[2].to(), point(3.0, -0.5));
}

#[test]
fn drawing_after_close() {
    let sub_paths = parse("M 0 0 L 10 0 L 10 10 Z L 5 5").unwrap();
    assert_eq!(sub_paths.len(), 2);
    assert!(sub_paths[0].is_closed());
    assert_eq!(
        sub_paths[1].commands(),
        &[
            DrawCommand::Move {
                from: point(0.0, 0.0),
                to: point(0.0, 0.0)
            },
            DrawCommand::Line(LineSegment {
                from: point(0.0, 0.0),
                to: point(5.0, 5.0)
            }),
        ][..]
    );

    let sub_paths = parse("M 1 1 L 10 0 Z Z").unwrap();
    assert_eq!(sub_paths.len(), 2);
    assert_eq!(
        sub_paths[1].commands(),
        &[
            DrawCommand::Move {
                from: point(1.0, 1.0),
                to: point(1.0, 1.0)
            },
            DrawCommand::Close {
                from: point(1.0, 1.0),
                to: point(1.0, 1.0)
            },
        ][..]
    );

    // Relative commands resolve against the start of the closed sub-path.
    let sub_paths = parse("M2 3 h10 v10 z l 5 5").unwrap();
    assert_eq!(sub_paths.len(), 2);
    assert_eq!(sub_paths[1][0].to(), point(2.0, 3.0));
    assert_eq!(sub_paths[1][1].to(), point(7.0, 8.0));

    // A move right after a close does not add an extra sub-path.
    let sub_paths = parse("M 0 0 L 1 0 Z M 5 5 L 6 6").unwrap();
    assert_eq!(sub_paths.len(), 2);
    assert_eq!(sub_paths[1][0].to(), point(5.0, 5.0));
}

#[test]
fn errors() {
    assert_eq!(
        parse("M 0 0 L 1"),
        Err(ParseError::Number {
            src: String::new(),
            line: 0,
            column: 9,
        })
    );

    assert_eq!(
        parse("M 0 0 L 1 x"),
        Err(ParseError::Number {
            src: "x".to_string(),
            line: 0,
            column: 10,
        })
    );

    assert_eq!(
        parse("M 0 0\nK 1 1"),
        Err(ParseError::Command {
            command: 'K',
            line: 1,
            column: 0,
        })
    );

    assert_eq!(
        parse("L 1 1"),
        Err(ParseError::MissingMoveTo {
            command: 'L',
            line: 0,
            column: 0,
        })
    );


    assert_eq!(
        parse("M 0 0 A 1 1 0 2 0 1 1"),
        Err(ParseError::Flag {
            src: '2',
            line: 0,
            column: 14,
        })
    );

    let err = parse("M 0 0 L 1 x").unwrap_err();
    assert_eq!(err.position(), (0, 10));
}
