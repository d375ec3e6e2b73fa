use shapeshifter::math::{Point, Transform};
use shapeshifter::{PathData, PathError};

use std::fmt::Write;

pub enum Operation {
    Info,
    Normalize,
    Project { position: Point },
    Split { sub_path: usize, command: usize, t: f32 },
    Reverse,
    Shift { back: bool },
    Morph { to: PathData, fraction: f32 },
    Transform { transforms: Vec<Transform> },
}

pub struct PathCmd {
    pub path: PathData,
    pub operation: Operation,
}

/// Runs the operation and returns the text to print.
pub fn execute(cmd: PathCmd) -> Result<String, PathError> {
    let PathCmd {
        mut path,
        operation,
    } = cmd;

    let mut output = String::new();
    match operation {
        Operation::Info => {
            let bounds = path.bounds();
            let num_commands: usize = path.sub_paths().iter().map(|sp| sp.len()).sum();
            let _ = writeln!(output, "length: {}", path.length());
            if bounds.is_empty() {
                let _ = writeln!(output, "bounds: empty");
            } else {
                let _ = writeln!(
                    output,
                    "bounds: {} {} {} {}",
                    bounds.left, bounds.top, bounds.right, bounds.bottom
                );
            }
            let _ = writeln!(output, "sub-paths: {}", path.sub_paths().len());
            let _ = writeln!(output, "commands: {}", num_commands);
            return Ok(output);
        }
        Operation::Normalize => {}
        Operation::Project { position } => {
            match path.project(position) {
                Some(p) => {
                    let _ = writeln!(
                        output,
                        "sub-path: {}\ncommand: {}\npoint: {} {}\nt: {}\ndistance: {}",
                        p.sub_path, p.command, p.point.x, p.point.y, p.t, p.distance
                    );
                }
                None => {
                    let _ = writeln!(output, "no geometry");
                }
            }
            return Ok(output);
        }
        Operation::Split {
            sub_path,
            command,
            t,
        } => {
            path.split(sub_path, command, t)?;
        }
        Operation::Reverse => {
            path.reverse();
        }
        Operation::Shift { back } => {
            if back {
                path.shift_back();
            } else {
                path.shift_forward();
            }
        }
        Operation::Morph { to, fraction } => {
            let start = path.clone();
            path.interpolate(&start, &to, fraction)?;
        }
        Operation::Transform { transforms } => {
            path.transform(&transforms);
        }
    }

    let _ = writeln!(output, "{}", path);

    Ok(output)
}

#[cfg(test)]
use shapeshifter::math::point;

#[cfg(test)]
fn run(path: &str, operation: Operation) -> Result<String, PathError> {
    execute(PathCmd {
        path: PathData::parse(path).unwrap(),
        operation,
    })
}

#[test]
fn info() {
    let output = run("M0,0 L10,0 L10,10 Z", Operation::Info).unwrap();
    assert!(output.starts_with("length: 34.14"));
    assert!(output.contains("bounds: 0 0 10 10\n"));
    assert!(output.contains("sub-paths: 1\n"));
    assert!(output.contains("commands: 4\n"));

    let output = run("", Operation::Info).unwrap();
    assert!(output.contains("bounds: empty\n"));
}

#[test]
fn editing_operations() {
    assert_eq!(
        run("m0,0 h10 v10 z", Operation::Normalize).unwrap(),
        "M 0 0 L 10 0 L 10 10 Z\n"
    );
    assert_eq!(
        run("M 0 0 L 10 0", Operation::Reverse).unwrap(),
        "M 10 0 L 0 0\n"
    );
    assert_eq!(
        run(
            "M0,0 L10,0 L10,10 Z",
            Operation::Split {
                sub_path: 0,
                command: 2,
                t: 0.5
            }
        )
        .unwrap(),
        "M 0 0 L 10 0 L 10 5 L 10 10 Z\n"
    );
    assert_eq!(
        run(
            "M0,0 L10,0 L10,10 Z",
            Operation::Shift { back: false }
        )
        .unwrap(),
        "M 10 0 L 10 10 L 0 0 Z\n"
    );
    assert_eq!(
        run(
            "M 0 0 L 0 0",
            Operation::Morph {
                to: PathData::parse("M 0 0 L 10 10").unwrap(),
                fraction: 0.5
            }
        )
        .unwrap(),
        "M 0 0 L 5 5\n"
    );
    assert_eq!(
        run(
            "M 0 0 L 1 1",
            Operation::Transform {
                transforms: vec![Transform::translation(1.0, 2.0)]
            }
        )
        .unwrap(),
        "M 1 2 L 2 3\n"
    );
}

#[test]
fn project() {
    let output = run(
        "M0,0 L10,0 L10,10 Z",
        Operation::Project {
            position: point(5.0, -5.0),
        },
    )
    .unwrap();
    assert!(output.starts_with("sub-path: 0\ncommand: 1\n"));

    let output = run(
        "M 1 1",
        Operation::Project {
            position: point(5.0, -5.0),
        },
    )
    .unwrap();
    assert_eq!(output, "no geometry\n");
}

#[test]
fn errors() {
    let result = run(
        "M 0 0 A 5 5 0 0 1 10 0",
        Operation::Split {
            sub_path: 0,
            command: 1,
            t: 0.5,
        },
    );
    assert!(result.is_err());

    let result = run(
        "M 0 0 L 1 1",
        Operation::Morph {
            to: PathData::parse("M 0 0").unwrap(),
            fraction: 0.5,
        },
    );
    assert!(result.is_err());
}
