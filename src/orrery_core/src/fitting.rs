//! # Fitting
//! Bounded root finding used by the orbital solvers.
// BSD 3-Clause License
//
// Copyright (c) 2026, Orrery Contributors
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

/// Maximum number of iterations before a solver gives up.
const MAX_ITERATIONS: usize = 100;

/// Derivative magnitudes below this are treated as zero.
const DERIVATIVE_FLOOR: f64 = f64::EPSILON * 1000.0;

/// Error type for fitting operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConvergenceError {
    /// Maximum number of iterations reached without convergence.
    #[error("Maximum number of iterations reached without convergence")]
    Iterations,

    /// Non-finite value encountered during evaluation.
    #[error("Non-finite value encountered during evaluation")]
    NonFinite,

    /// Zero derivative encountered during evaluation.
    #[error("Zero derivative encountered during evaluation")]
    ZeroDerivative,
}

/// Result type for fitting operations.
pub type FittingResult<T> = Result<T, ConvergenceError>;

/// Solve for a root using the Newton-Raphson method.
///
/// This accepts two functions, the first being a single input function for
/// which the root is desired. The second function being the derivative of the
/// first with respect to the input variable. Iteration stops as soon as the
/// residual magnitude drops below `atol`.
///
/// ```
///     use orrery_core::fitting::newton_raphson;
///     let f = |x: f64| x * x - 1.0;
///     let d = |x: f64| 2.0 * x;
///     let root = newton_raphson(f, d, 0.5, 1e-10).unwrap();
///     assert!((root - 1.0).abs() < 1e-10);
/// ```
///
/// # Errors
///
/// [`ConvergenceError`] may be returned in the following cases:
///     - Any function evaluation returns a non-finite value.
///     - Derivative is zero away from the root.
///     - Failed to converge within 100 iterations.
#[inline(always)]
pub fn newton_raphson(
    func: impl Fn(f64) -> f64,
    der: impl Fn(f64) -> f64,
    start: f64,
    atol: f64,
) -> FittingResult<f64> {
    let mut x = start;

    // a zero derivative at the starting guess stalls the first step, nudge off it
    if der(x).abs() < DERIVATIVE_FLOOR {
        x += 0.1;
    }

    for _ in 0..MAX_ITERATIONS {
        let f_eval = func(x);
        if !f_eval.is_finite() {
            return Err(ConvergenceError::NonFinite);
        }
        if f_eval.abs() < atol {
            return Ok(x);
        }

        let d_eval = der(x);
        if !d_eval.is_finite() {
            return Err(ConvergenceError::NonFinite);
        }
        if d_eval.abs() < DERIVATIVE_FLOOR {
            return Err(ConvergenceError::ZeroDerivative);
        }

        x -= f_eval / d_eval;
    }
    Err(ConvergenceError::Iterations)
}
