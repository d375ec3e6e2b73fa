#![deny(bare_trait_objects)]

//! Parsing, measuring, editing and morphing vector paths.
//!
//! # Crates
//!
//! This meta-crate (`shapeshifter`) reexports the following sub-crates for convenience:
//!
//! * **shapeshifter_path** - The path command model, the SVG path syntax parser and
//!   serializer, derived metrics, projection, splitting, reversal and interpolation.
//! * **shapeshifter_geom** - 2d utilities for lines, quadratic and cubic bézier curves,
//!   elliptic arcs and bounding rectangles.
//!
//! Each `shapeshifter_<name>` crate is reexported as a `<name>` module in `shapeshifter`.
//! For example:
//!
//! ```ignore
//! extern crate shapeshifter_path;
//! use shapeshifter_path::PathData;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! extern crate shapeshifter;
//! use shapeshifter::path::PathData;
//! ```
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! # Examples
//!
//! ```
//! # extern crate shapeshifter;
//! use shapeshifter::PathData;
//!
//! # fn main() {
//! let start = PathData::parse("M 0 0 L 0 0").unwrap();
//! let end = PathData::parse("M 0 0 L 10 10").unwrap();
//!
//! let mut frame = PathData::new();
//! frame.interpolate(&start, &end, 0.5).unwrap();
//! assert_eq!(frame.path_string(), "M 0 0 L 5 5");
//! # }
//! ```

pub extern crate shapeshifter_geom;
pub extern crate shapeshifter_path;

pub use shapeshifter_geom as geom;
pub use shapeshifter_path as path;

pub use path::math;
pub use path::{DrawCommand, PathData, PathError, Projection, SubPath};
