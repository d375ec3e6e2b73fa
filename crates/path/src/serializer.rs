//! Writes sub-paths back into the SVG path syntax.
//!
//! The output only uses absolute `M`, `L`, `Q`, `C`, `A` and `Z` commands, with a single
//! space between tokens. Numbers are printed in their shortest form that parses back to
//! the same value.

use crate::command::{DrawCommand, SubPath};
use crate::math::Angle;

use std::fmt;

/// Arc rotations are written with at most this many decimal digits, in degrees.
pub const ROTATION_DECIMALS: i32 = 4;

// Rotations are stored in radians. Converting back to degrees in f32 would turn a 30
// into 29.999998, so the conversion happens in f64 and is rounded.
fn rotation_degrees(angle: Angle) -> f64 {
    let scale = 10f64.powi(ROTATION_DECIMALS);
    let degrees = (angle.get() as f64).to_degrees();
    let rounded = (degrees * scale).round() / scale;

    // Avoids printing "-0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Builds a `String` representation of a sequence of sub-paths.
#[derive(Debug, Default)]
pub struct PathSerializer {
    path: String,
}

impl PathSerializer {
    pub fn new() -> Self {
        PathSerializer {
            path: String::new(),
        }
    }

    pub fn command(&mut self, cmd: &DrawCommand) {
        if !self.path.is_empty() {
            self.path.push(' ');
        }
        self.path += &cmd.to_string();
    }

    pub fn sub_path(&mut self, sub_path: &SubPath) {
        for cmd in sub_path {
            self.command(cmd);
        }
    }

    pub fn build(self) -> String {
        self.path
    }
}

/// Serializes the sub-paths into a path string.
pub fn serialize(sub_paths: &[SubPath]) -> String {
    let mut serializer = PathSerializer::new();
    for sub_path in sub_paths {
        serializer.sub_path(sub_path);
    }

    serializer.build()
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DrawCommand::Move { to, .. } => write!(f, "M {} {}", to.x, to.y),
            DrawCommand::Line(segment) => write!(f, "L {} {}", segment.to.x, segment.to.y),
            DrawCommand::Quadratic(segment) => write!(
                f,
                "Q {} {} {} {}",
                segment.ctrl.x, segment.ctrl.y, segment.to.x, segment.to.y
            ),
            DrawCommand::Cubic(segment) => write!(
                f,
                "C {} {} {} {} {} {}",
                segment.ctrl1.x,
                segment.ctrl1.y,
                segment.ctrl2.x,
                segment.ctrl2.y,
                segment.to.x,
                segment.to.y
            ),
            DrawCommand::Arc(arc) => write!(
                f,
                "A {} {} {} {} {} {} {}",
                arc.radii.x,
                arc.radii.y,
                rotation_degrees(arc.x_rotation),
                arc.flags.large_arc as u8,
                arc.flags.sweep as u8,
                arc.to.x,
                arc.to.y
            ),
            DrawCommand::Close { .. } => f.write_str("Z"),
        }
    }
}

impl fmt::Display for SubPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, cmd) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", cmd)?;
        }

        Ok(())
    }
}

#[cfg(test)]
use crate::parser::parse;

#[test]
fn serialize_square() {
    let sub_paths = parse("M0,0 L10,0 L10,10 Z").unwrap();
    assert_eq!(serialize(&sub_paths), "M 0 0 L 10 0 L 10 10 Z");
    assert_eq!(sub_paths[0].to_string(), "M 0 0 L 10 0 L 10 10 Z");
}

#[test]
fn shorthands_are_expanded() {
    let sub_paths = parse("m1 1h2v2 q1 1 2 0 t2 0 s1 1 2 0 z m 1 1 a 2 2 0 1 1 4 0").unwrap();
    assert_eq!(
        serialize(&sub_paths),
        "M 1 1 L 3 1 L 3 3 Q 4 4 5 3 Q 6 2 7 3 C 7 3 8 4 9 3 Z M 2 2 A 2 2 0 1 1 6 2"
    );
}

#[test]
fn round_trip() {
    let inputs = [
        "M 0 0 L 10 0 L 10 10 Z",
        "M 1.5 -2.25 Q 3 4 5 6 C 7 8 9 10 11 12 A 5 5 0 1 0 20 20 Z M 30 30 L 40 40",
        "M 0 0 C 0.1 0.2 0.3 0.4 0.5 0.6",
    ];

    for input in &inputs {
        let sub_paths = parse(input).unwrap();
        let string = serialize(&sub_paths);
        assert_eq!(&string, input);
        assert_eq!(parse(&string).unwrap(), sub_paths);
    }
}

#[test]
fn arc_rotations_keep_their_degrees() {
    let input = "M 0 0 A 5 4 30 0 1 10 0 A 2 3 -45.5 1 0 0 7 A 3 3 12.3456 0 0 1 1 A 3 3 170 0 0 2 2";
    let sub_paths = parse(input).unwrap();
    assert_eq!(serialize(&sub_paths), input);
    assert_eq!(parse(&serialize(&sub_paths)).unwrap(), sub_paths);
}
