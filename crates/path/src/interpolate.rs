//! Blending between two paths of the same structure, for morphing animations.

use crate::command::SubPath;
use crate::error::PathError;

/// Checks that two paths can be interpolated.
///
/// They must have the same number of sub-paths and each pair of sub-paths must have the
/// same sequence of command kinds. The error names the first mismatch.
pub fn check_compatibility(start: &[SubPath], end: &[SubPath]) -> Result<(), PathError> {
    for (i, (a, b)) in start.iter().zip(end.iter()).enumerate() {
        for (j, (ka, kb)) in a.kinds().zip(b.kinds()).enumerate() {
            if ka != kb {
                return Err(PathError::IncompatibleShapes {
                    sub_path: i,
                    command: Some(j),
                });
            }
        }

        if a.len() != b.len() {
            return Err(PathError::IncompatibleShapes {
                sub_path: i,
                command: None,
            });
        }
    }

    if start.len() != end.len() {
        return Err(PathError::IncompatibleShapes {
            sub_path: start.len().min(end.len()),
            command: None,
        });
    }

    Ok(())
}

/// Interpolates every point of two compatible paths.
///
/// A fraction of 0 gives `start` and 1 gives `end`. Arc radii and rotations are
/// interpolated too, arc flags are taken from `start`. The fraction is not clamped.
pub fn interpolate(
    start: &[SubPath],
    end: &[SubPath],
    fraction: f32,
) -> Result<Vec<SubPath>, PathError> {
    check_compatibility(start, end)?;

    let mut sub_paths = Vec::with_capacity(start.len());
    for (i, (a, b)) in start.iter().zip(end.iter()).enumerate() {
        let mut commands = Vec::with_capacity(a.len());
        for (j, (ca, cb)) in a.iter().zip(b.iter()).enumerate() {
            let cmd = ca
                .lerp(cb, fraction)
                .ok_or(PathError::IncompatibleShapes {
                    sub_path: i,
                    command: Some(j),
                })?;
            commands.push(cmd);
        }
        sub_paths.push(SubPath::new(commands));
    }

    Ok(sub_paths)
}

#[cfg(test)]
use crate::command::DrawCommand;
#[cfg(test)]
use crate::math::point;
#[cfg(test)]
use crate::parser::parse;

#[test]
fn line_to_line() {
    let start = parse("M0,0 L0,0").unwrap();
    let end = parse("M0,0 L10,10").unwrap();

    let result = interpolate(&start, &end, 0.5).unwrap();
    assert_eq!(result[0][1].to(), point(5.0, 5.0));

    assert_eq!(interpolate(&start, &end, 0.0).unwrap(), start);
    assert_eq!(interpolate(&start, &end, 1.0).unwrap(), end);
}

#[test]
fn boundaries() {
    let start = parse("M 0 0 C 1 2 3 4 5 6 A 5 5 30 0 1 10 10 Q 1 2 3 4 Z M 1 1 L 2 2").unwrap();
    let end = parse("M 9 9 C 8 7 6 5 4 3 A 2 3 60 1 0 0 1 Q 4 3 2 1 Z M 5 5 L 6 6").unwrap();

    assert_eq!(interpolate(&start, &end, 0.0).unwrap(), start);

    let result = interpolate(&start, &end, 1.0).unwrap();
    for (a, b) in result.iter().zip(end.iter()) {
        for (ca, cb) in a.iter().zip(b.iter()) {
            match (ca, cb) {
                (DrawCommand::Arc(a), DrawCommand::Arc(b)) => {
                    assert_eq!(a.from, b.from);
                    assert_eq!(a.to, b.to);
                    assert_eq!(a.radii, b.radii);
                    assert!((a.x_rotation.get() - b.x_rotation.get()).abs() < 1e-6);
                    // Flags are not interpolated.
                    assert!(!a.flags.large_arc);
                    assert!(a.flags.sweep);
                }
                _ => assert_eq!(ca, cb),
            }
        }
    }
}

#[test]
fn arc_parameters() {
    let start = parse("M 0 0 A 2 4 0 0 1 10 0").unwrap();
    let end = parse("M 0 0 A 4 8 90 1 0 10 0").unwrap();

    let result = interpolate(&start, &end, 0.5).unwrap();
    match result[0][1] {
        DrawCommand::Arc(arc) => {
            assert_eq!(arc.radii.x, 3.0);
            assert_eq!(arc.radii.y, 6.0);
            assert!((arc.x_rotation.to_degrees() - 45.0).abs() < 1e-4);
            assert!(!arc.flags.large_arc);
            assert!(arc.flags.sweep);
        }
        ref other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn incompatible_shapes() {
    let start = parse("M 0 0 L 1 1 L 2 2").unwrap();

    let end = parse("M 0 0 L 1 1").unwrap();
    assert_eq!(
        interpolate(&start, &end, 0.5),
        Err(PathError::IncompatibleShapes {
            sub_path: 0,
            command: None
        })
    );

    let end = parse("M 0 0 Q 1 1 2 2 L 3 3").unwrap();
    assert_eq!(
        interpolate(&start, &end, 0.5),
        Err(PathError::IncompatibleShapes {
            sub_path: 0,
            command: Some(1)
        })
    );

    let end = parse("M 0 0 L 1 1 L 2 2 M 3 3").unwrap();
    assert_eq!(
        check_compatibility(&start, &end),
        Err(PathError::IncompatibleShapes {
            sub_path: 1,
            command: None
        })
    );
}
