//! # regfam-rs: Regular Permutation Families in Rust
//!
//! **`regfam-rs`** counts **r-regular families of permutations**: selections
//! of `n * r` permutations of `[0, n)`, `r` starting with each value, such
//! that across the family every value lands at every position exactly `r`
//! times.
//!
//! ## How it works
//!
//! The universe of all `n!` permutations is generated once and grouped into
//! `n` buckets by first element. The search picks an `r`-combination from
//! each bucket in turn, while an `n x n` **occupancy table** counts where
//! values land and prunes every selection that pushes a cell past `r`. A
//! selection that survives all `n` buckets is a complete regular family.
//!
//! Because the universe grows as `n!`, the exact engine hits a wall quickly.
//! The probabilistic engine walks the same tree but keeps each surviving
//! branch only with probability `1/d` (a per-depth denominator you choose),
//! then multiplies the surviving leaf count back up by the observed
//! `reached/kept` ratios. The reweighting is exact rational arithmetic, and
//! a run whose thinning kills every branch at some depth reports starvation
//! instead of a bogus number.
//!
//! ## Basic Usage
//!
//! ```rust
//! use regfam_rs::params::{SamplingPlan, SearchParams};
//! use regfam_rs::search::FamilySearch;
//!
//! // 1. Validate the configuration.
//! let params = SearchParams::new(4, 1).unwrap();
//!
//! // 2. Build the universe (the expensive part) once.
//! let search = FamilySearch::new(params);
//!
//! // 3. Count exactly, or enumerate lazily.
//! let exact = search.count_all();
//! assert_eq!(exact, 24u32.into());
//! let first = search.families().next().unwrap();
//! assert!(first.is_regular(1));
//!
//! // 4. Or estimate: the all-ones plan keeps everything, so the
//! //    estimate is exact.
//! let plan = SamplingPlan::uniform(4, 1).unwrap();
//! let estimate = search.estimate(&plan, &mut rand::thread_rng()).unwrap();
//! assert_eq!(estimate.count(), &exact);
//! ```
//!
//! ## Core Components
//!
//! - **[`perm`]**: The [`Perm`][crate::perm::Perm] value type and the
//!   bucketed [`Universe`][crate::perm::Universe].
//! - **[`occupancy`]**: The pruning table with exact apply-and-undo.
//! - **[`search`]**: The [`FamilySearch`][crate::search::FamilySearch]
//!   manager, exact counting, and lazy enumeration of
//!   [`Family`][crate::family::Family] values.
//! - **[`estimate`]**: The randomized estimator and its
//!   [`Estimate`][crate::estimate::Estimate] report.
//! - **[`params`]** / **[`error`]**: Validated configuration and the error
//!   taxonomy.

pub mod error;
pub mod estimate;
pub mod family;
pub mod occupancy;
pub mod params;
pub mod perm;
pub mod search;
