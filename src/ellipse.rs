use crate::{Cubic, EPSILON, PI, Point, Scalar, Transform};
use std::fmt;

/// Elliptical Arc
#[derive(Clone, Copy, PartialEq)]
pub struct EllipArc {
    /// center of the ellipse
    center: Point,
    /// radius along x-axis before the rotation
    rx: Scalar,
    /// radius along y-axis before the rotation
    ry: Scalar,
    /// rotation in radians
    phi: Scalar,
    /// angular start
    eta: Scalar,
    /// angular size
    eta_delta: Scalar,
}

impl fmt::Debug for EllipArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Arc center:{:?} radius:{:?} phi:{:.3?} eta:{:.3?} eta_delta:{:.3?}",
            self.center,
            Point([self.rx, self.ry]),
            self.phi,
            self.eta,
            self.eta_delta
        )
    }
}

impl EllipArc {
    /// Convert arc from SVG endpoint arguments to center parameterization
    ///
    /// Follows [arc implementation notes](https://www.w3.org/TR/SVG/implnote.html#ArcImplementationNotes),
    /// radii that are too small to span `src` and `dst` are scaled up. Returns `None` if
    /// either radius is zero or end points coincide, such arcs are drawn as straight lines.
    pub fn new_param(
        src: Point,
        dst: Point,
        rx: Scalar,
        ry: Scalar,
        x_axis_rot: Scalar,
        large_flag: bool,
        sweep_flag: bool,
    ) -> Option<Self> {
        let rx = rx.abs();
        let ry = ry.abs();
        if rx < EPSILON || ry < EPSILON || src.is_close_to(dst) {
            return None;
        }
        let phi = x_axis_rot * PI / 180.0;

        // Eq 5.1
        let Point([x1, y1]) = Transform::new_rotate(-phi).apply(0.5 * (src - dst));
        // scale radii
        let s = (x1 / rx).powi(2) + (y1 / ry).powi(2);
        let (rx, ry) = if s > 1.0 {
            let s = s.sqrt();
            (rx * s, ry * s)
        } else {
            (rx, ry)
        };
        // Eq 5.2
        let sq = ((rx * ry).powi(2) / ((rx * y1).powi(2) + (ry * x1).powi(2)) - 1.0)
            .max(0.0)
            .sqrt();
        let sq = if large_flag == sweep_flag { -sq } else { sq };
        let center = sq * Point([rx * y1 / ry, -ry * x1 / rx]);
        let Point([cx, cy]) = center;
        // Eq 5.3 convert center to initial coordinates
        let center = Transform::new_rotate(phi).apply(center) + 0.5 * (dst + src);
        // Eq 5.5-6
        let v0 = Point([1.0, 0.0]);
        let v1 = Point([(x1 - cx) / rx, (y1 - cy) / ry]);
        let v2 = Point([(-x1 - cx) / rx, (-y1 - cy) / ry]);
        let eta = v0.angle_between(v1)?;
        // angle covered when parameter changes from 0 to 1
        let eta_delta = v1.angle_between(v2)?.rem_euclid(2.0 * PI);
        let eta_delta = if !sweep_flag && eta_delta > 0.0 {
            eta_delta - 2.0 * PI
        } else if sweep_flag && eta_delta < 0.0 {
            eta_delta + 2.0 * PI
        } else {
            eta_delta
        };

        Some(Self {
            center,
            rx,
            ry,
            phi,
            eta,
            eta_delta,
        })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Radii after scaling
    pub fn radii(&self) -> Point {
        Point([self.rx, self.ry])
    }

    /// Signed angle swept by the arc
    pub fn sweep_angle(&self) -> Scalar {
        self.eta_delta
    }

    pub fn at(&self, t: Scalar) -> Point {
        let (angle_sin, angle_cos) = (self.eta + t * self.eta_delta).sin_cos();
        let point = Point([self.rx * angle_cos, self.ry * angle_sin]);
        Transform::new_rotate(self.phi).apply(point) + self.center
    }

    pub fn start(&self) -> Point {
        self.at(0.0)
    }

    pub fn end(&self) -> Point {
        self.at(1.0)
    }

    /// Convert elliptic arc to an iterator over cubic segments
    pub fn to_cubics(&self) -> EllipArcCubicIter {
        EllipArcCubicIter::new(*self)
    }
}

/// Approximate arc with a sequence of cubic bezier curves
///
/// Arc is split into sectors of at most `pi / 2`, each sector from `eta_1` to `eta_2`
/// is replaced with
///     P0 = A(eta_1)
///     P1 = P0 + alpha * A'(eta_1)
///     P2 = P3 - alpha * A'(eta_2)
///     P3 = A(eta_2)
/// where
///     A - arc parametrized by angle
///     A' - derivative of arc parametrized by angle
///     alpha = 4 / 3 * tan((eta_2 - eta_1) / 4)
pub struct EllipArcCubicIter {
    arc: EllipArc,
    phi_tr: Transform,
    segment_delta: Scalar,
    segment_index: usize,
    segment_count: usize,
}

impl EllipArcCubicIter {
    fn new(arc: EllipArc) -> Self {
        let phi_tr = Transform::new_rotate(arc.phi);
        let segment_max_angle = PI / 2.0;
        let segment_count = (arc.eta_delta.abs() / segment_max_angle).ceil().max(1.0);
        let segment_delta = arc.eta_delta / segment_count;
        Self {
            arc,
            phi_tr,
            segment_delta,
            segment_index: 0,
            segment_count: segment_count as usize,
        }
    }

    fn at(&self, angle: Scalar) -> (Point, Point) {
        let (sin, cos) = angle.sin_cos();
        let at = self
            .phi_tr
            .apply(Point([self.arc.rx * cos, self.arc.ry * sin]))
            + self.arc.center;
        let at_deriv = self
            .phi_tr
            .apply_vector(Point([-self.arc.rx * sin, self.arc.ry * cos]));
        (at, at_deriv)
    }
}

impl Iterator for EllipArcCubicIter {
    type Item = Cubic;

    fn next(&mut self) -> Option<Self::Item> {
        if self.segment_index >= self.segment_count {
            return None;
        }
        let eta_1 = self.arc.eta + self.segment_delta * self.segment_index as Scalar;
        let eta_2 = eta_1 + self.segment_delta;
        self.segment_index += 1;

        let alpha = 4.0 / 3.0 * (self.segment_delta / 4.0).tan();
        let (p0, d0) = self.at(eta_1);
        let (p3, d3) = self.at(eta_2);
        let p1 = p0 + alpha * d0;
        let p2 = p3 - alpha * d3;
        Some(Cubic([p0, p1, p2, p3]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.segment_count - self.segment_index;
        (size, Some(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_ellip_arc() {
        let src = Point::new(0.0, 0.0);
        let dst = Point::new(10.0, 0.0);
        let arc = EllipArc::new_param(src, dst, 5.0, 5.0, 0.0, false, true).unwrap();
        assert!(arc.start().dist(src) < 1e-9);
        assert!(arc.end().dist(dst) < 1e-9);
        assert!(arc.center().dist(Point::new(5.0, 0.0)) < 1e-9);
        assert_approx_eq!(arc.sweep_angle().abs(), PI, 1e-9);

        let cubics: Vec<_> = arc.to_cubics().collect();
        assert_eq!(cubics.len(), 2);
        assert!(cubics[0].start().dist(src) < 1e-9);
        assert!(cubics[1].end().dist(dst) < 1e-9);
        assert!(cubics[0].end().dist(cubics[1].start()) < 1e-9);
        // points of approximation stay close to the circle
        for cubic in cubics {
            for i in 0..=16 {
                let p = cubic.at(i as Scalar / 16.0);
                assert_approx_eq!(p.dist(arc.center()), 5.0, 0.01);
            }
        }
    }

    #[test]
    fn test_ellip_arc_scaled_radii() {
        // radii are too small and must be scaled to reach destination
        let src = Point::new(0.0, 0.0);
        let dst = Point::new(10.0, 0.0);
        let arc = EllipArc::new_param(src, dst, 1.0, 1.0, 0.0, false, false).unwrap();
        assert_approx_eq!(arc.radii().x(), 5.0, 1e-9);
        assert!(arc.end().dist(dst) < 1e-9);

        // rotated ellipse, large arc
        let dst = Point::new(3.0, 4.0);
        let arc = EllipArc::new_param(src, dst, 6.0, 3.0, 30.0, true, true).unwrap();
        assert!(arc.sweep_angle() > PI);
        assert_eq!(arc.to_cubics().count(), 4);
        let last = arc.to_cubics().last().unwrap();
        assert!(last.end().dist(dst) < 1e-9);
    }

    #[test]
    fn test_ellip_arc_degenerate() {
        let src = Point::new(1.0, 1.0);
        assert!(EllipArc::new_param(src, src, 5.0, 5.0, 0.0, false, false).is_none());
        let dst = Point::new(3.0, 1.0);
        assert!(EllipArc::new_param(src, dst, 0.0, 5.0, 0.0, false, false).is_none());
        assert!(EllipArc::new_param(src, dst, 5.0, 0.0, 0.0, false, false).is_none());
    }
}
