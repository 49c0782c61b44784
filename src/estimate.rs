//! Randomized estimation of the family count.
//!
//! The estimator runs the same pruned traversal as the exact engine, but at
//! every depth it keeps a surviving combination only with probability
//! `1 / denominator`, then reweights the surviving leaf count by the inverse
//! keep ratios. The reweighting is computed in exact rational arithmetic and
//! rounded once at the end.

use log::debug;
use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use rand::Rng;

use itertools::Itertools;

use crate::error::{ConfigError, EstimateError};
use crate::occupancy::Occupancy;
use crate::params::SamplingPlan;
use crate::perm::Perm;
use crate::search::FamilySearch;

impl FamilySearch {
    /// Estimates the number of complete regular families from one thinned
    /// traversal.
    ///
    /// At depth `d`, every combination that survives the occupancy prune
    /// counts as *reached*; a uniform draw in `[1, plan.denominator(d)]`
    /// then decides whether it is *kept* and descended into. The estimate is
    ///
    /// ```text
    /// leaves * Π_d reached[d] / kept[d]
    /// ```
    ///
    /// rounded to the nearest integer. With the all-ones plan every reached
    /// branch is kept and the result equals [`count_all`][FamilySearch::count_all]
    /// exactly.
    ///
    /// A depth that keeps no branch at all leaves the weight undefined; the
    /// run then fails with [`EstimateError::Starved`] carrying the full
    /// tallies. This includes configurations where no family exists, so the
    /// exact engine is the authority for legitimate zeros.
    ///
    /// The caller provides the randomness; a seeded generator makes the run
    /// reproducible.
    pub fn estimate(&self, plan: &SamplingPlan, rng: &mut impl Rng) -> Result<Estimate, EstimateError> {
        let n = self.params().n();
        if plan.len() != n {
            return Err(ConfigError::PlanLengthMismatch { expected: n, actual: plan.len() }.into());
        }
        debug!(
            "estimate(n = {}, r = {}, plan = {:?})",
            n,
            self.params().regularity(),
            plan.denominators()
        );

        let mut trial = Trial::new(n);
        let mut occupancy = Occupancy::new(n, self.params().regularity());
        self._estimate(0, plan, rng, &mut occupancy, &mut trial);
        trial.finish()
    }

    fn _estimate(
        &self,
        depth: usize,
        plan: &SamplingPlan,
        rng: &mut impl Rng,
        occupancy: &mut Occupancy,
        trial: &mut Trial,
    ) {
        if depth == self.params().n() {
            trial.leaves += 1;
            return;
        }

        let bucket = self.universe().starting_with(depth as u8);
        for combo in bucket.iter().combinations(self.params().regularity()) {
            match trial.offer(depth, plan, rng, occupancy, &combo) {
                BranchFate::Followed => {
                    self._estimate(depth + 1, plan, rng, occupancy, trial);
                    occupancy.unplace_all(&combo);
                }
                BranchFate::Pruned | BranchFate::Skipped => {}
            }
        }
    }
}

/// What became of one combination offered to the sampler.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum BranchFate {
    /// The occupancy table rejected it; no coin was flipped.
    Pruned,
    /// Feasible, but the thinning coin abandoned it.
    Skipped,
    /// Feasible and kept; the traversal descends into it.
    Followed,
}

/// Tallies of one estimation run.
struct Trial {
    reached: Vec<u64>,
    kept: Vec<u64>,
    leaves: u64,
}

impl Trial {
    fn new(n: usize) -> Self {
        Trial { reached: vec![0; n], kept: vec![0; n], leaves: 0 }
    }

    /// Offers one combination at `depth`: prune on occupancy first, then
    /// flip the thinning coin. The placement stays applied only for a
    /// followed branch; the caller undoes it after descending.
    fn offer(
        &mut self,
        depth: usize,
        plan: &SamplingPlan,
        rng: &mut impl Rng,
        occupancy: &mut Occupancy,
        combo: &[&Perm],
    ) -> BranchFate {
        if !occupancy.place_all(combo) {
            return BranchFate::Pruned;
        }
        self.reached[depth] += 1;

        // One uniform draw in [1, d]; the branch survives only on a 1.
        // The draw happens even at d = 1, where it cannot fail.
        if rng.gen_range(1..=plan.denominator(depth)) != 1 {
            occupancy.unplace_all(combo);
            return BranchFate::Skipped;
        }

        self.kept[depth] += 1;
        BranchFate::Followed
    }

    fn finish(self) -> Result<Estimate, EstimateError> {
        let starved: Vec<usize> = self
            .kept
            .iter()
            .enumerate()
            .filter(|&(_, &kept)| kept == 0)
            .map(|(depth, _)| depth)
            .collect();
        if !starved.is_empty() {
            debug!("starved at depths {:?} (reached = {:?})", starved, self.reached);
            return Err(EstimateError::Starved { starved, reached: self.reached, kept: self.kept });
        }

        // kept[n - 1] > 0 means some branch reached the leaf depth.
        assert!(self.leaves > 0, "No starvation implies at least one leaf");

        let mut numer = BigUint::from(self.leaves);
        let mut denom = BigUint::from(1u32);
        for (&reached, &kept) in self.reached.iter().zip(&self.kept) {
            numer *= reached;
            denom *= kept;
        }
        let weight = BigRational::new(BigInt::from(numer), BigInt::from(denom));
        debug!("leaves = {}, weight = {}", self.leaves, weight);
        let count = weight
            .round()
            .to_integer()
            .to_biguint()
            .expect("reweighted count is non-negative");

        Ok(Estimate { count, leaves: self.leaves, reached: self.reached, kept: self.kept })
    }
}

/// The outcome of one estimation run: the reweighted count plus the raw
/// tallies behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Estimate {
    count: BigUint,
    leaves: u64,
    reached: Vec<u64>,
    kept: Vec<u64>,
}

impl Estimate {
    /// The estimated number of regular families, rounded to the nearest
    /// integer. Never zero: a run without starvation has at least one leaf.
    pub fn count(&self) -> &BigUint {
        &self.count
    }

    /// Number of complete families the thinned traversal visited.
    pub fn leaves(&self) -> u64 {
        self.leaves
    }

    /// Feasible branches seen per depth, before thinning.
    pub fn reached(&self) -> &[u64] {
        &self.reached
    }

    /// Branches kept per depth, after thinning.
    pub fn kept(&self) -> &[u64] {
        &self.kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SearchParams;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use test_log::test;

    fn search(n: usize, r: usize) -> FamilySearch {
        FamilySearch::new(SearchParams::new(n, r).unwrap())
    }

    #[test]
    fn test_identity_plan_matches_exact_count() {
        for (n, r) in [(3, 1), (3, 2), (4, 1)] {
            let search = search(n, r);
            let plan = SamplingPlan::uniform(n, 1).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(7);

            let estimate = search.estimate(&plan, &mut rng).unwrap();
            println!("n = {}, r = {}: estimate = {}", n, r, estimate.count());

            assert_eq!(estimate.count(), &search.count_all());
            assert_eq!(estimate.reached(), estimate.kept());
            assert_eq!(BigUint::from(estimate.leaves()), search.count_all());
        }
    }

    #[test]
    fn test_identity_plan_is_rng_independent() {
        let search = search(4, 1);
        let plan = SamplingPlan::uniform(4, 1).unwrap();

        let a = search.estimate(&plan, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
        let b = search.estimate(&plan, &mut rand::thread_rng()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.count(), &BigUint::from(24u32));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let search = search(4, 1);
        let plan = SamplingPlan::uniform(4, 2).unwrap();

        let a = search.estimate(&plan, &mut ChaCha8Rng::seed_from_u64(42));
        let b = search.estimate(&plan, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_starves_when_nothing_is_feasible() {
        // Buckets for n = 3 hold 2 permutations, so r = 3 offers nothing.
        let search = search(3, 3);
        let plan = SamplingPlan::uniform(3, 1).unwrap();

        let err = search.estimate(&plan, &mut rand::thread_rng()).unwrap_err();
        assert_eq!(
            err,
            EstimateError::Starved {
                starved: vec![0, 1, 2],
                reached: vec![0, 0, 0],
                kept: vec![0, 0, 0],
            }
        );
    }

    #[test]
    fn test_starves_under_extreme_thinning() {
        let search = search(3, 1);
        let plan = SamplingPlan::uniform(3, u64::MAX).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        match search.estimate(&plan, &mut rng).unwrap_err() {
            EstimateError::Starved { starved, reached, kept } => {
                // Both depth-0 combinations were reached; the coin killed them.
                assert_eq!(starved, vec![0, 1, 2]);
                assert_eq!(reached, vec![2, 0, 0]);
                assert_eq!(kept, vec![0, 0, 0]);
            }
            other => panic!("expected starvation, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_plan_length_is_a_config_error() {
        let search = search(3, 1);
        let plan = SamplingPlan::uniform(4, 1).unwrap();

        let err = search.estimate(&plan, &mut rand::thread_rng()).unwrap_err();
        assert_eq!(
            err,
            EstimateError::Config(ConfigError::PlanLengthMismatch { expected: 3, actual: 4 })
        );
    }

    #[test]
    fn test_estimate_is_positive_when_it_succeeds() {
        let search = search(4, 1);
        let plan = SamplingPlan::new(4, vec![2, 1, 1, 1]).unwrap();

        let mut successes = 0;
        for seed in 0..10 {
            match search.estimate(&plan, &mut ChaCha8Rng::seed_from_u64(seed)) {
                Ok(estimate) => {
                    successes += 1;
                    assert!(estimate.count() > &BigUint::ZERO);
                    assert!(estimate.leaves() > 0);
                }
                Err(EstimateError::Starved { starved, .. }) => {
                    assert_eq!(starved, vec![0, 1, 2, 3]);
                }
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }
        // With 6 feasible depth-0 branches each kept with probability 1/2,
        // ten seeds starving every time would be astonishing.
        assert!(successes > 0);
    }

    #[test]
    fn test_offer_reports_all_three_fates() {
        let a = Perm::new(vec![0, 1]);
        let b = Perm::new(vec![1, 0]);
        let mut occupancy = Occupancy::new(2, 1);
        let mut trial = Trial::new(2);
        let keep = SamplingPlan::uniform(2, 1).unwrap();
        let thin = SamplingPlan::uniform(2, u64::MAX).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert_eq!(trial.offer(0, &keep, &mut rng, &mut occupancy, &[&a]), BranchFate::Followed);
        assert_eq!(trial.reached, vec![1, 0]);
        assert_eq!(trial.kept, vec![1, 0]);

        // `a` is already placed, so a second copy overflows the table.
        assert_eq!(trial.offer(1, &keep, &mut rng, &mut occupancy, &[&a]), BranchFate::Pruned);
        assert_eq!(trial.reached, vec![1, 0]);

        assert_eq!(trial.offer(1, &thin, &mut rng, &mut occupancy, &[&b]), BranchFate::Skipped);
        assert_eq!(trial.reached, vec![1, 1]);
        assert_eq!(trial.kept, vec![1, 0]);

        // A skipped offer leaves no trace; the followed one is still placed.
        assert_eq!(occupancy.get(0, 0), 1);
        assert_eq!(occupancy.get(0, 1), 0);
    }

    #[test]
    fn test_starved_depths_with_partial_progress() {
        // Thin only the last depth to starvation.
        let search = search(3, 1);
        let plan = SamplingPlan::new(3, vec![1, 1, u64::MAX]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        match search.estimate(&plan, &mut rng).unwrap_err() {
            EstimateError::Starved { starved, reached, kept } => {
                assert_eq!(starved, vec![2]);
                assert!(reached[0] > 0 && kept[0] > 0);
                assert!(reached[2] > 0, "the traversal reached the last depth");
                assert_eq!(kept[2], 0);
            }
            other => panic!("expected starvation, got {:?}", other),
        }
    }
}
