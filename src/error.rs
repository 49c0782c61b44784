use thiserror::Error;

/// Errors for invalid search or sampling configuration.
///
/// All of these are detected synchronously, before any search work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("element count must be at least 1")]
    ElementCountZero,

    #[error("element count {n} exceeds the supported maximum {max}")]
    ElementCountTooLarge { n: usize, max: usize },

    #[error("sampling plan has {actual} denominators, expected {expected} (one per depth)")]
    PlanLengthMismatch { expected: usize, actual: usize },

    #[error("sampling denominator at depth {depth} must be at least 1")]
    ZeroDenominator { depth: usize },
}

/// Errors reported by a probabilistic estimation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Some depth kept no branch at all, so the inverse-probability weight
    /// is undefined for this run. The tallies show how far the run got.
    #[error("sampling starved at depth(s) {starved:?}: no branch kept (reached = {reached:?}, kept = {kept:?})")]
    Starved {
        starved: Vec<usize>,
        reached: Vec<u64>,
        kept: Vec<u64>,
    },
}
