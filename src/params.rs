//! Validated search and sampling configuration.

use crate::error::ConfigError;

/// Largest supported element count.
///
/// The universe holds all `n!` permutations; 11! is just under 40 million,
/// the last size that fits in ordinary memory. Larger `n` is rejected as a
/// [`ConfigError::ElementCountTooLarge`].
pub const MAX_ELEMENTS: usize = 11;

/// Parameters of one search: element count `n` and target regularity `r`.
///
/// A complete `r`-regular family has `n * r` members, `r` starting with each
/// value. `r` may exceed the bucket size `(n-1)!`; the exact search then
/// finds nothing, which is a legitimate zero and not a configuration error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SearchParams {
    n: usize,
    regularity: usize,
}

impl SearchParams {
    /// Validates and creates search parameters.
    pub fn new(n: usize, regularity: usize) -> Result<Self, ConfigError> {
        if n == 0 {
            return Err(ConfigError::ElementCountZero);
        }
        if n > MAX_ELEMENTS {
            return Err(ConfigError::ElementCountTooLarge { n, max: MAX_ELEMENTS });
        }
        Ok(SearchParams { n, regularity })
    }

    /// Number of elements being permuted.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Target regularity `r`.
    pub fn regularity(&self) -> usize {
        self.regularity
    }

    /// Number of members in a complete family, `n * r`.
    pub fn family_len(&self) -> usize {
        self.n * self.regularity
    }
}

/// Per-depth sampling denominators for the probabilistic estimator.
///
/// At depth `d`, each feasible branch survives the thinning with probability
/// `1 / denominator(d)`. Denominator 1 keeps every branch, so
/// [`uniform(n, 1)`][SamplingPlan::uniform] reproduces the exact count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingPlan {
    denominators: Vec<u64>,
}

impl SamplingPlan {
    /// Validates and creates a plan: one denominator per depth `0..n`, each
    /// at least 1.
    pub fn new(n: usize, denominators: Vec<u64>) -> Result<Self, ConfigError> {
        if denominators.len() != n {
            return Err(ConfigError::PlanLengthMismatch { expected: n, actual: denominators.len() });
        }
        if let Some(depth) = denominators.iter().position(|&d| d == 0) {
            return Err(ConfigError::ZeroDenominator { depth });
        }
        Ok(SamplingPlan { denominators })
    }

    /// A plan with the same denominator at every depth.
    pub fn uniform(n: usize, denominator: u64) -> Result<Self, ConfigError> {
        Self::new(n, vec![denominator; n])
    }

    /// Number of depths covered.
    pub fn len(&self) -> usize {
        self.denominators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.denominators.is_empty()
    }

    /// Denominator at the given depth.
    pub fn denominator(&self, depth: usize) -> u64 {
        self.denominators[depth]
    }

    pub fn denominators(&self) -> &[u64] {
        &self.denominators
    }
}
