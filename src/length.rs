//! Arc length estimation and inversion for cubic segments
use crate::{Cubic, Scalar, clamp};

/// Default absolute error of arc length estimates
pub const DEFAULT_TOLERANCE: Scalar = 0.001;
/// Upper bound on the number of Simpson intervals
pub const SIMPSON_MAX_INTERVALS: usize = 4096;
/// Upper bound on the recursion depth of Gravesen subdivision
pub const GRAVESEN_MAX_DEPTH: usize = 24;
/// Upper bound on the number of bisection steps when inverting arc length
pub const MAX_BISECTIONS: usize = 64;

/// Arc length estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ArcLengthMethod {
    /// Adaptive Simpson integration of the speed function
    #[default]
    Simpson,
    /// Gravesen control polygon and chord averaging with subdivision
    Gravesen,
}

/// Arc length estimation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ArcLength {
    /// Estimator to use
    pub method: ArcLengthMethod,
    /// Absolute error of the estimate
    pub tolerance: Scalar,
    /// Maximum number of intervals used by Simpson integration
    pub max_intervals: usize,
    /// Maximum subdivision depth used by Gravesen estimator
    pub max_depth: usize,
}

impl Default for ArcLength {
    fn default() -> Self {
        Self {
            method: ArcLengthMethod::default(),
            tolerance: DEFAULT_TOLERANCE,
            max_intervals: SIMPSON_MAX_INTERVALS,
            max_depth: GRAVESEN_MAX_DEPTH,
        }
    }
}

impl ArcLength {
    pub fn simpson(tolerance: Scalar) -> Self {
        Self {
            method: ArcLengthMethod::Simpson,
            tolerance,
            ..Default::default()
        }
    }

    pub fn gravesen(tolerance: Scalar) -> Self {
        Self {
            method: ArcLengthMethod::Gravesen,
            tolerance,
            ..Default::default()
        }
    }

    /// Estimate arc length of the cubic segment
    pub fn measure(&self, cubic: Cubic) -> Scalar {
        match self.method {
            ArcLengthMethod::Simpson => {
                simpson_length(cubic, 0.0, 1.0, self.tolerance, self.max_intervals)
            }
            ArcLengthMethod::Gravesen => gravesen_length(cubic, self.tolerance, self.max_depth),
        }
    }
}

/// Integrate `f` over `[a, b]` with composite Simpson rule
///
/// Number of intervals is doubled until two consecutive estimates differ by
/// no more than `tolerance` or `max_intervals` is reached.
pub fn simpson<F>(f: F, a: Scalar, b: Scalar, max_intervals: usize, tolerance: Scalar) -> Scalar
where
    F: Fn(Scalar) -> Scalar,
{
    let mut intervals = 2;
    let mut multiplier = (b - a) / 6.0;
    let end_sum = f(a) + f(b);
    let mut step = (b - a) / 2.0;
    // sum of values at even (shared) and odd (newly added) nodes
    let mut even_sum = 0.0;
    let mut odd_sum = f(a + step);
    let mut estimate = multiplier * (end_sum + 2.0 * even_sum + 4.0 * odd_sum);
    let mut prev_estimate = 2.0 * estimate;
    while intervals < max_intervals && (estimate - prev_estimate).abs() > tolerance {
        intervals *= 2;
        multiplier /= 2.0;
        step /= 2.0;
        even_sum += odd_sum;
        odd_sum = (1..intervals)
            .step_by(2)
            .map(|index| f(a + index as Scalar * step))
            .sum();
        prev_estimate = estimate;
        estimate = multiplier * (end_sum + 2.0 * even_sum + 4.0 * odd_sum);
    }
    if intervals >= max_intervals && (estimate - prev_estimate).abs() > tolerance {
        tracing::debug!(
            intervals,
            error = (estimate - prev_estimate).abs(),
            "simpson integration reached maximum number of intervals"
        );
    }
    estimate
}

/// Arc length of the cubic segment between parameter values `a` and `b`
pub fn simpson_length(
    cubic: Cubic,
    a: Scalar,
    b: Scalar,
    tolerance: Scalar,
    max_intervals: usize,
) -> Scalar {
    let coeffs = cubic.parameterize();
    simpson(|t| coeffs.speed(t), a, b, max_intervals, tolerance)
}

/// Arc length of the cubic segment estimated by Gravesen method
///
/// Length of a segment lies between its chord and the length of its control polygon,
/// segment is subdivided until the difference is within `tolerance` and the average is
/// used as an estimate. Subdivision stops at `max_depth` accepting current estimate.
pub fn gravesen_length(cubic: Cubic, tolerance: Scalar, max_depth: usize) -> Scalar {
    let mut length = 0.0;
    let mut capped = 0usize;
    let mut stack = vec![(cubic, 0)];
    while let Some((cubic, depth)) = stack.pop() {
        let Cubic([p0, p1, p2, p3]) = cubic;
        let polygon = p0.dist(p1) + p1.dist(p2) + p2.dist(p3);
        let chord = p0.dist(p3);
        if polygon - chord > tolerance {
            if depth < max_depth {
                let (c0, c1) = cubic.split();
                stack.push((c1, depth + 1));
                stack.push((c0, depth + 1));
                continue;
            }
            capped += 1;
        }
        length += (polygon + chord) / 2.0;
    }
    if capped > 0 {
        tracing::debug!(
            capped,
            max_depth,
            "gravesen arc length reached maximum depth"
        );
    }
    length
}

/// Find parameter value `t` such that arc length from the start of the segment to `t`
/// is `fraction` of the total length of the segment
///
/// `fraction` is clamped to `[0, 1]`. Parameter is found by bisection on Simpson arc
/// length estimates, it is accurate up to `tolerance` in length units.
pub fn param_at_length(cubic: Cubic, fraction: Scalar, tolerance: Scalar) -> Scalar {
    let fraction = clamp(fraction, 0.0, 1.0);
    let coeffs = cubic.parameterize();
    let speed = |t: Scalar| coeffs.speed(t);
    let total = simpson(speed, 0.0, 1.0, SIMPSON_MAX_INTERVALS, tolerance);
    let target = fraction * total;

    let mut t = 1.0;
    let mut step = 1.0;
    let mut diff = total - target;
    let mut bisections = 0;
    while diff.abs() > tolerance {
        if bisections == MAX_BISECTIONS {
            tracing::debug!(
                fraction,
                t,
                error = diff.abs(),
                "arc length inversion reached maximum number of bisections"
            );
            break;
        }
        bisections += 1;
        step /= 2.0;
        if diff < 0.0 {
            t += step;
        } else {
            t -= step;
        }
        diff = simpson(speed, 0.0, t, SIMPSON_MAX_INTERVALS, tolerance) - target;
    }
    t
}
