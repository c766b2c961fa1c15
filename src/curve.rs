//! Cubic bezier segments and everything you need to evaluate them
use crate::{
    ArcLength, ArrayIter, BBox, EPSILON, EPSILON_SQRT, Point, Roots, Scalar, Transform,
    cubic_solve, length, quadratic_solve,
};
use std::fmt;

/// Points at which a line crosses a cubic segment
pub type Intersections = ArrayIter<[Option<Point>; 3]>;

/// Accept parameter values that are within rounding error of the `[0, 1]` interval
fn unit_param(t: Scalar) -> Option<Scalar> {
    if (-EPSILON_SQRT..=1.0 + EPSILON_SQRT).contains(&t) {
        Some(t.clamp(0.0, 1.0))
    } else {
        None
    }
}

// -----------------------------------------------------------------------------
// Line
// -----------------------------------------------------------------------------

/// Line segment
#[derive(Clone, Copy, PartialEq)]
pub struct Line(pub [Point; 2]);

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Line([p0, p1]) = self;
        write!(f, "Line {:?} {:?}", p0, p1)
    }
}

impl Line {
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self([p0.into(), p1.into()])
    }

    /// Start and end points of the line
    pub fn points(&self) -> [Point; 2] {
        self.0
    }

    pub fn start(&self) -> Point {
        self.0[0]
    }

    pub fn end(&self) -> Point {
        self.0[1]
    }

    /// Length of the line
    pub fn length(&self) -> Scalar {
        let Self([p0, p1]) = self;
        p0.dist(*p1)
    }

    pub fn at(&self, t: Scalar) -> Point {
        let Self([p0, p1]) = self;
        p0.lerp(*p1, t)
    }

    pub fn transform(&self, tr: Transform) -> Self {
        let Line([p0, p1]) = self;
        Self([tr.apply(*p0), tr.apply(*p1)])
    }
}

// -----------------------------------------------------------------------------
// Power basis
// -----------------------------------------------------------------------------

/// Cubic curve in the power basis form
///
/// `curve(t) = a * t^3 + b * t^2 + c * t + d`, evaluated independently for `x` and `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCoeffs {
    pub a: Point,
    pub b: Point,
    pub c: Point,
    pub d: Point,
}

impl CubicCoeffs {
    /// Coefficients as `(ax, ay, bx, by, cx, cy, x0, y0)` tuple
    pub fn to_tuple(&self) -> (Scalar, Scalar, Scalar, Scalar, Scalar, Scalar, Scalar, Scalar) {
        let Self { a, b, c, d } = *self;
        (a.x(), a.y(), b.x(), b.y(), c.x(), c.y(), d.x(), d.y())
    }

    /// Evaluate curve at `t`
    pub fn at(&self, t: Scalar) -> Point {
        let Self { a, b, c, d } = *self;
        t * (t * (t * a + b) + c) + d
    }

    /// First derivative at `t`
    pub fn deriv(&self, t: Scalar) -> Point {
        let Self { a, b, c, .. } = *self;
        t * (3.0 * t * a + 2.0 * b) + c
    }

    /// Second derivative at `t`
    pub fn deriv2(&self, t: Scalar) -> Point {
        6.0 * t * self.a + 2.0 * self.b
    }

    /// Third derivative (constant)
    pub fn deriv3(&self) -> Point {
        6.0 * self.a
    }

    /// Length of the first derivative, integrated to get arc length
    pub fn speed(&self, t: Scalar) -> Scalar {
        self.deriv(t).length()
    }
}

// -----------------------------------------------------------------------------
// Cubic bezier curve
// -----------------------------------------------------------------------------

/// Cubic bezier curve
///
/// Polynimial form:
/// `(1 - t) ^ 3 * p0 + 3 * (1 - t) ^ 2 * t * p1 + 3 * (1 - t) * t ^ 2 * p2 + t ^ 3 * p3`
#[derive(Clone, Copy, PartialEq)]
pub struct Cubic(pub [Point; 4]);

impl fmt::Debug for Cubic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Cubic([p0, p1, p2, p3]) = self;
        write!(f, "Cubic {:?} {:?} {:?} {:?}", p0, p1, p2, p3)
    }
}

impl Cubic {
    pub fn new(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> Self {
        Self([p0.into(), p1.into(), p2.into(), p3.into()])
    }

    /// Straight segment with handles colocated with anchors
    pub fn from_line(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        let p0 = p0.into();
        let p1 = p1.into();
        Self([p0, p0, p1, p1])
    }

    /// Degree elevation of the quadratic curve
    pub fn from_quad(p0: impl Into<Point>, p1: impl Into<Point>, p2: impl Into<Point>) -> Self {
        let (p0, p1, p2) = (p0.into(), p1.into(), p2.into());
        Self([
            p0,
            (1.0 / 3.0) * p0 + (2.0 / 3.0) * p1,
            (2.0 / 3.0) * p1 + (1.0 / 3.0) * p2,
            p2,
        ])
    }

    pub fn points(&self) -> [Point; 4] {
        self.0
    }

    pub fn start(&self) -> Point {
        self.0[0]
    }

    pub fn end(&self) -> Point {
        self.0[3]
    }

    /// Convert to the power basis
    pub fn parameterize(&self) -> CubicCoeffs {
        let Self([p0, p1, p2, p3]) = *self;
        let c = 3.0 * (p1 - p0);
        let b = 3.0 * (p2 - p1) - c;
        let a = p3 - p0 - c - b;
        CubicCoeffs { a, b, c, d: p0 }
    }

    /// Evaluate curve at parameter value `t` in (0.0..=1.0)
    pub fn at(&self, t: Scalar) -> Point {
        self.parameterize().at(t)
    }

    /// Derivative of the curve at `t`, `[curve'(t)_x, curve'(t)_y]`
    pub fn slope_at(&self, t: Scalar) -> Point {
        self.parameterize().deriv(t)
    }

    /// Tangent direction at `t`
    ///
    /// Unlike `slope_at` falls back to higher derivatives when the first one vanishes,
    /// which happens at the ends of segments with handles colocated with anchors.
    /// Returns `None` only if segment is collapsed into a single point.
    pub fn tangent_at(&self, t: Scalar) -> Option<Point> {
        let coeffs = self.parameterize();
        [coeffs.deriv(t), coeffs.deriv2(t), coeffs.deriv3()]
            .into_iter()
            .find(|deriv| !deriv.is_close_to(Point::default()))
    }

    /// Parameter values at which the tangent is parallel to `direction`
    ///
    /// Zero `direction` has no parallel tangent, empty result is returned.
    pub fn t_at_slope(&self, direction: impl Into<Point>) -> Roots {
        let Point([dx, dy]) = direction.into();
        let CubicCoeffs { a, b, c, .. } = self.parameterize();
        let (qa, qb, qc) = if dx != 0.0 {
            let slope = dy / dx;
            (
                3.0 * a.y() - 3.0 * a.x() * slope,
                2.0 * b.y() - 2.0 * b.x() * slope,
                c.y() - c.x() * slope,
            )
        } else if dy != 0.0 {
            let slope = dx / dy;
            (
                3.0 * a.x() - 3.0 * a.y() * slope,
                2.0 * b.x() - 2.0 * b.y() * slope,
                c.x() - c.y() * slope,
            )
        } else {
            return Roots::new();
        };
        let mut result = Roots::new();
        let mut prev = None;
        for t in quadratic_solve(qa, qb, qc).filter_map(unit_param) {
            // double root is reported once
            if prev != Some(t) {
                result.push(t);
            }
            prev = Some(t);
        }
        result
    }

    /// Points where infinite line passing through `line` points crosses the segment
    ///
    /// Degenerate (zero length) line produces no intersections.
    pub fn line_intersect(&self, line: Line) -> Intersections {
        let mut result = Intersections::new();
        let Line([Point([lx0, ly0]), Point([lx1, ly1])]) = line;
        let (dx, dy) = (lx1 - lx0, ly1 - ly0);
        // implicit line form: coef_y * (y - ly0) - coef_x * (x - lx0) = 0
        let (coef_y, coef_x) = if dy != 0.0 {
            (dx / dy, 1.0)
        } else if dx != 0.0 {
            (1.0, dy / dx)
        } else {
            return result;
        };
        let coeffs = self.parameterize();
        let CubicCoeffs { a, b, c, d } = coeffs;
        let roots = cubic_solve(
            coef_y * a.y() - coef_x * a.x(),
            coef_y * b.y() - coef_x * b.x(),
            coef_y * c.y() - coef_x * c.x(),
            coef_y * (d.y() - ly0) - coef_x * (d.x() - lx0),
        );
        result.extend(roots.filter_map(unit_param).map(|t| coeffs.at(t)));
        result
    }

    /// Split the curve at `0.5`
    pub fn split(&self) -> (Self, Self) {
        self.split_at(0.5)
    }

    /// Split the curve at prameter value `t` using de Casteljau construction
    pub fn split_at(&self, t: Scalar) -> (Self, Self) {
        let Self([p0, p1, p2, p3]) = *self;
        let m1 = p0.lerp(p1, t);
        let m2 = p1.lerp(p2, t);
        let m3 = p2.lerp(p3, t);
        let m4 = m1.lerp(m2, t);
        let m5 = m2.lerp(m3, t);
        let m = m4.lerp(m5, t);
        (Self([p0, m1, m4, m]), Self([m, m5, m3, p3]))
    }

    /// Create subcurve specified starting at parameter value `a` and ending at value `b`
    pub fn cut(&self, a: Scalar, b: Scalar) -> Self {
        if b.abs() < EPSILON {
            let p = self.start();
            return Self([p, p, p, p]);
        }
        let (head, _) = self.split_at(b);
        let (_, tail) = head.split_at(a / b);
        tail
    }

    /// Extend provided `init` bounding box with the exact bounding box of the curve
    pub fn bbox(&self, init: Option<BBox>) -> BBox {
        let Self([p0, p1, p2, p3]) = *self;
        let (x_min, x_max) = cubic_extrema(p0.x(), p1.x(), p2.x(), p3.x());
        let (y_min, y_max) = cubic_extrema(p0.y(), p1.y(), p2.y(), p3.y());
        BBox::new(Point::new(x_min, y_min), Point::new(x_max, y_max)).union_opt(init)
    }

    /// Extend provided `init` bounding box with all control points of the curve
    ///
    /// Over-estimates the exact bounding box since handles may lie outside of the curve.
    pub fn rough_bbox(&self, init: Option<BBox>) -> BBox {
        let Self([p0, p1, p2, p3]) = *self;
        BBox::new(p0, p3).union_opt(init).extend(p1).extend(p2)
    }

    /// Apply affine transformation to the curve
    pub fn transform(&self, tr: Transform) -> Self {
        let Cubic([p0, p1, p2, p3]) = self;
        Self([tr.apply(*p0), tr.apply(*p1), tr.apply(*p2), tr.apply(*p3)])
    }

    /// Identical curve but directed from end to start, instead of start to end.
    pub fn reverse(&self) -> Self {
        let Self([p0, p1, p2, p3]) = *self;
        Self([p3, p2, p1, p0])
    }

    /// Arc length of the curve
    pub fn length(&self, config: &ArcLength) -> Scalar {
        config.measure(*self)
    }

    /// Parameter value at which arc length from the start is `fraction` of the total
    pub fn param_at_length(&self, fraction: Scalar, tolerance: Scalar) -> Scalar {
        length::param_at_length(*self, fraction, tolerance)
    }
}

/// Minimum and maximum values of a one-dimensional cubic bezier with control values `v{0..3}`
///
/// Extrema are found by solving `curve'(t) = 0`, straight segments (all control value
/// differences are zero) fall back to the end points.
pub fn cubic_extrema(v0: Scalar, v1: Scalar, v2: Scalar, v3: Scalar) -> (Scalar, Scalar) {
    let mut min = v0.min(v3);
    let mut max = v0.max(v3);
    let d1 = v1 - v0;
    let d2 = v2 - v1;
    let d3 = v3 - v2;
    // curve'(t) / 3 = (d1 - 2 * d2 + d3) * t^2 + 2 * (d2 - d1) * t + d1
    for t in quadratic_solve(d1 - 2.0 * d2 + d3, 2.0 * (d2 - d1), d1) {
        if t > 0.0 && t < 1.0 {
            let t_1 = 1.0 - t;
            let value = t_1 * t_1 * t_1 * v0
                + 3.0 * t * t_1 * t_1 * v1
                + 3.0 * t * t * t_1 * v2
                + t * t * t * v3;
            min = min.min(value);
            max = max.max(value);
        }
    }
    (min, max)
}
