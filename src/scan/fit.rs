//! Model-fit quality scoring for candidate sample windows.
//!
//! Real measured sequences are approximately quadratic or approximately
//! exponential in index. A window is scored by decoding it as typed values,
//! normalising, and fitting both a quadratic and a log-linear model; the
//! better of the two mean squared errors is the window's fit error. The
//! scaling step makes the acceptance threshold regime-independent.

use crate::scan::sample_type::{Endianness, TypeInfo};
use crate::scan::MAX_VALUE;

/// Mean squared errors below this are round-off, not lack of fit.
const FIT_NOISE_FLOOR: f64 = 1e-9;

/// Fit error of a window of concatenated sample words.
///
/// Windows shorter than four samples return 0: the smoothness predicate has
/// already vetted them and no meaningful fit exists. Any non-finite value
/// produced along the way folds to [`MAX_VALUE`].
pub(crate) fn fit_error(window: &[u8], endian: Endianness, info: &TypeInfo) -> f64 {
    let count = window.len() / info.width;
    if count < 4 {
        return 0.0;
    }

    let mut y: Vec<f64> = window
        .chunks_exact(info.width)
        .take(count)
        .map(|word| info.decode_f64(word, endian))
        .collect();
    if y.iter().any(|v| !v.is_finite()) {
        return MAX_VALUE;
    }

    // Translate negatives above zero, then scale the peak to 100.
    let min = y.iter().copied().fold(f64::INFINITY, f64::min);
    if min < 0.0 {
        for v in &mut y {
            *v += min * -1.1;
        }
    }
    let max = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= 0.0 {
        return MAX_VALUE;
    }
    for v in &mut y {
        *v *= 100.0 / max;
    }

    let log_y: Vec<f64> = y.iter().map(|v| v.ln()).collect();

    let err_poly = match quadratic_fit(&y) {
        Some(coeffs) => mean_squared_residual(&y, |x| {
            coeffs[0] * x * x + coeffs[1] * x + coeffs[2]
        }),
        None => MAX_VALUE,
    };

    let err_log = match linear_fit(&log_y) {
        Some(coeffs) => mean_squared_residual(&log_y, |x| coeffs[0] * x + coeffs[1]),
        None => MAX_VALUE,
    };

    let err_poly = finite_or_max(err_poly);
    let err_log = finite_or_max(err_log);
    let error = err_log.min(err_poly).max(0.0);
    // Residuals at double-precision noise level are exact fits; clamping
    // them keeps seed ranking independent of solver round-off.
    if error < FIT_NOISE_FLOOR {
        0.0
    } else {
        error
    }
}

fn finite_or_max(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        MAX_VALUE
    }
}

/// Mean squared residual of `y` against a model over `x = 1..=n`.
fn mean_squared_residual(y: &[f64], model: impl Fn(f64) -> f64) -> f64 {
    let n = y.len() as f64;
    let sum: f64 = y
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let residual = v - model((i + 1) as f64);
            residual * residual
        })
        .sum();
    sum / n
}

/// Least-squares quadratic coefficients `[a, b, c]` for `y` over `x = 1..=n`.
///
/// Windows never exceed a handful of samples, so the normal equations are
/// solved directly with Cramer's rule.
fn quadratic_fit(y: &[f64]) -> Option<[f64; 3]> {
    let n = y.len() as f64;
    let (mut s1, mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0, 0.0);
    let (mut sy, mut sxy, mut sx2y) = (0.0, 0.0, 0.0);
    for (i, &v) in y.iter().enumerate() {
        let x = (i + 1) as f64;
        let x2 = x * x;
        s1 += x;
        s2 += x2;
        s3 += x2 * x;
        s4 += x2 * x2;
        sy += v;
        sxy += x * v;
        sx2y += x2 * v;
    }

    let det = det3(s4, s3, s2, s3, s2, s1, s2, s1, n);
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let a = det3(sx2y, s3, s2, sxy, s2, s1, sy, s1, n) / det;
    let b = det3(s4, sx2y, s2, s3, sxy, s1, s2, sy, n) / det;
    let c = det3(s4, s3, sx2y, s3, s2, sxy, s2, s1, sy) / det;

    let coeffs = [a, b, c];
    coeffs.iter().all(|v| v.is_finite()).then_some(coeffs)
}

/// Least-squares line `[slope, intercept]` for `y` over `x = 1..=n`.
fn linear_fit(y: &[f64]) -> Option<[f64; 2]> {
    let n = y.len() as f64;
    let (mut sx, mut sx2, mut sy, mut sxy) = (0.0, 0.0, 0.0, 0.0);
    for (i, &v) in y.iter().enumerate() {
        let x = (i + 1) as f64;
        sx += x;
        sx2 += x * x;
        sy += v;
        sxy += x * v;
    }

    let det = n * sx2 - sx * sx;
    if det == 0.0 {
        return None;
    }
    let slope = (n * sxy - sx * sy) / det;
    let intercept = (sy - slope * sx) / n;

    let coeffs = [slope, intercept];
    coeffs.iter().all(|v| v.is_finite()).then_some(coeffs)
}

#[rustfmt::skip]
fn det3(
    a: f64, b: f64, c: f64,
    d: f64, e: f64, f: f64,
    g: f64, h: f64, i: f64,
) -> f64 {
    a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
}
