//! Cubic bezier path geometry toolkit.
//!
//! Main features:
//!  - Polynomial root solving, cubic evaluation, subdivision and intersection
//!  - Arc length estimation and inversion
//!  - Cubic super-path model built from SVG path data
//!  - Affine transforms and bounding boxes
//!
#![deny(warnings)]

mod curve;
mod ellipse;
mod error;
mod geometry;
mod length;
mod superpath;
mod svg;
mod utils;

pub use curve::{Cubic, CubicCoeffs, Intersections, Line, cubic_extrema};
pub use ellipse::{EllipArc, EllipArcCubicIter};
pub use error::Error;
pub use geometry::{
    BBox, EPSILON, EPSILON_SQRT, PI, Point, Scalar, Transform, compose, scalar_fmt,
};
pub use length::{
    ArcLength, ArcLengthMethod, DEFAULT_TOLERANCE, GRAVESEN_MAX_DEPTH, MAX_BISECTIONS,
    SIMPSON_MAX_INTERVALS, gravesen_length, param_at_length, simpson, simpson_length,
};
pub use superpath::{Node, SuperPath};
pub use svg::{PathCmd, PathNormalizer, format_path, normalize_commands, parse_path};
pub use utils::{Array, ArrayIter, Roots, cubic_solve, quadratic_solve};
use utils::clamp;
