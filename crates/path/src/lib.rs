#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]

//! Editable vector paths with derived geometric properties.
//!
//! This crate is reexported in the `shapeshifter` crate.
//!
//! A [`PathData`] is built from a path string using the SVG `d` attribute syntax. It keeps
//! the parsed [`SubPath`]s along with their total length, their bounds and one
//! [`CurveWrapper`] per [`DrawCommand`]. The wrappers hold the cubic bézier representation
//! of each command and are what projections and splits operate on.
//!
//! Every mutation (setting a new path string, transforming, reversing, shifting, splitting
//! or interpolating) rebuilds the derived data before returning, so the properties a caller
//! reads always match the commands.
//!
//! # Examples
//!
//! ```
//! # extern crate shapeshifter_path;
//! # fn main() {
//! use shapeshifter_path::PathData;
//! use shapeshifter_path::math::point;
//!
//! let mut path = PathData::parse("M0,0 L10,0 L10,10 Z").unwrap();
//! assert!((path.length() - 34.142).abs() < 1e-3);
//!
//! let projection = path.project(point(5.0, -5.0)).unwrap();
//! assert_eq!((projection.sub_path, projection.command), (0, 1));
//!
//! path.split(0, 2, 0.5).unwrap();
//! assert_eq!(path.sub_paths()[0].len(), 5);
//! # }
//! ```

pub use shapeshifter_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod command;
pub mod curve;
mod error;
pub mod interpolate;
mod metrics;
pub mod parser;
mod path_data;
pub mod serializer;

#[doc(inline)]
pub use crate::command::{CommandKind, DrawCommand, SubPath};
#[doc(inline)]
pub use crate::curve::{CurveWrapper, Projection};
pub use crate::error::PathError;
pub use crate::geom::ArcFlags;
pub use crate::metrics::{compute_metrics, Metrics};
#[doc(inline)]
pub use crate::parser::ParseError;
#[doc(inline)]
pub use crate::path_data::PathData;

pub mod math {
    //! f32 version of the shapeshifter_geom types used everywhere.

    use crate::geom::euclid;

    /// Alias for ```euclid::default::Point2D<f32>```.
    pub type Point = euclid::default::Point2D<f32>;

    /// Alias for ```euclid::default::Vector2D<f32>```.
    pub type Vector = euclid::default::Vector2D<f32>;

    /// Alias for ```euclid::default::Box2D<f32>```.
    pub type Box2D = euclid::default::Box2D<f32>;

    /// Alias for ```euclid::default::Transform2D<f32>```
    pub type Transform = euclid::default::Transform2D<f32>;

    /// Alias for ```euclid::default::Rotation2D<f32>```
    pub type Rotation = euclid::default::Rotation2D<f32>;

    /// An angle in radians (f32).
    pub type Angle = euclid::Angle<f32>;

    /// Bounds of a path, see `shapeshifter_geom::Rect`.
    pub type Rect = crate::geom::Rect<f32>;

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }
}
