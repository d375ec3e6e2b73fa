use crate::command::CommandKind;
use crate::parser::ParseError;

use thiserror::Error;

/// Errors returned by the operations of `PathData`.
///
/// A failing operation leaves the path untouched.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum PathError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Unsupported operation: cannot {operation} {kind} commands.")]
    UnsupportedOperation {
        operation: &'static str,
        kind: CommandKind,
    },
    #[error(
        "Incompatible shapes: sub-path {sub_path}{}.",
        .command.map(|i| format!(" command {}", i)).unwrap_or_default()
    )]
    IncompatibleShapes {
        sub_path: usize,
        /// `None` when the number of sub-paths or of commands differ.
        command: Option<usize>,
    },
    #[error("No command at index {command} of sub-path {sub_path}.")]
    InvalidIndex { sub_path: usize, command: usize },
    #[error("Invalid parameter {0}, expected a value between 0 and 1.")]
    InvalidParameter(f32),
}

#[test]
fn messages() {
    let err = PathError::IncompatibleShapes {
        sub_path: 1,
        command: Some(3),
    };
    assert_eq!(
        err.to_string(),
        "Incompatible shapes: sub-path 1 command 3."
    );

    let err = PathError::IncompatibleShapes {
        sub_path: 2,
        command: None,
    };
    assert_eq!(err.to_string(), "Incompatible shapes: sub-path 2.");

    let err = PathError::UnsupportedOperation {
        operation: "split",
        kind: CommandKind::Arc,
    };
    assert_eq!(err.to_string(), "Unsupported operation: cannot split elliptic arc commands.");
}
