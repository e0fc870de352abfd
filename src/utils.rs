//! Numeric helpers shared by the mapper and the overlay.

pub mod safe_cast;

/// Piecewise-linear interpolation of `x` from `from` onto `to`.
///
/// Inputs outside `from` are clamped to its ends, so the result always lies
/// between `to.0` and `to.1`. A degenerate `from` range yields `to.0`.
#[must_use]
pub fn interp(x: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let (x0, x1) = from;
    let span = x1 - x0;
    if span == 0.0 || !span.is_finite() {
        return to.0;
    }
    let t = ((x - x0) / span).clamp(0.0, 1.0);
    if t.is_nan() {
        return to.0;
    }
    lerp(t, to.0, to.1)
}

/// Linear blend from `start` at `t = 0` to `end` at `t = 1`.
///
/// Exact at both ends and monotonic in `t`.
#[must_use]
pub fn lerp(t: f64, start: f64, end: f64) -> f64 {
    if t >= 1.0 {
        end
    } else {
        start + t * (end - start)
    }
}
