//! Template plan precomputation for ZNCC.

use crate::template::Template;
use crate::util::{MatchFailure, SymScanError, SymScanResult};

/// Zero-mean template buffer and its variance, computed once per template.
#[derive(Clone, Debug)]
pub struct TemplatePlan {
    width: usize,
    height: usize,
    var_t: f64,
    t_prime: Vec<f64>,
}

impl TemplatePlan {
    /// Builds a plan from a template mask.
    ///
    /// Fails with a `Match` error when the mask is flat, because the
    /// correlation coefficient is undefined for a zero-variance template.
    pub fn from_template(tpl: &Template) -> SymScanResult<Self> {
        let view = tpl.mask().view();
        let width = view.width();
        let height = view.height();
        let count = width
            .checked_mul(height)
            .ok_or(SymScanError::InvalidDimensions { width, height })?;

        let sum: f64 = view.rows().flatten().map(|&v| f64::from(v)).sum();
        let mean = sum / count as f64;

        let mut t_prime = Vec::with_capacity(count);
        let mut var_t = 0.0f64;
        for &value in view.rows().flatten() {
            let d = f64::from(value) - mean;
            var_t += d * d;
            t_prime.push(d);
        }

        if var_t <= 1e-8 {
            return Err(SymScanError::Match {
                template: tpl.id(),
                reason: MatchFailure::DegenerateTemplate,
            });
        }

        Ok(Self {
            width,
            height,
            var_t,
            t_prime,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sum of squared deviations from the mean.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }

    /// Zero-mean template values in row-major order.
    ///
    /// Kept in `f64` so that an exact copy of the template scores 1.
    pub fn t_prime(&self) -> &[f64] {
        &self.t_prime
    }
}
