//! The search manager and the exact backtracking engine.
//!
//! [`FamilySearch`] owns the validated parameters and the permutation
//! universe, both read-only once built. The exact engine walks the search
//! tree depth by depth: depth `d` picks an `r`-combination from the bucket
//! of permutations starting with `d`, the occupancy table prunes every
//! combination that would push a cell past `r`, and a path that survives all
//! `n` depths is a complete regular family.
//!
//! Two exact entry points share this traversal:
//! [`count_all`][FamilySearch::count_all] folds the tree into a number
//! without materializing anything, and [`families`][FamilySearch::families]
//! streams the actual families lazily so enumeration can be abandoned
//! between items. The randomized third engine lives in the
//! [`estimate`][crate::estimate] module.

use itertools::structs::Combinations;
use itertools::Itertools;
use log::debug;
use num_bigint::BigUint;

use crate::family::Family;
use crate::occupancy::Occupancy;
use crate::params::SearchParams;
use crate::perm::{Perm, Universe};

/// The search manager.
///
/// Construction builds the full universe for `params.n()`, which is the
/// expensive part; afterwards every engine run borrows it immutably.
#[derive(Debug)]
pub struct FamilySearch {
    params: SearchParams,
    universe: Universe,
}

impl FamilySearch {
    /// Builds the universe for `params` and readies the engines.
    pub fn new(params: SearchParams) -> Self {
        debug!("FamilySearch::new(n = {}, r = {})", params.n(), params.regularity());
        let universe = Universe::new(params.n());
        FamilySearch { params, universe }
    }

    pub fn params(&self) -> SearchParams {
        self.params
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }
}

impl FamilySearch {
    /// Counts all complete regular families exactly.
    ///
    /// Runs the full pruned backtracking search to completion. An impossible
    /// configuration (for instance a regularity larger than the bucket size)
    /// produces 0, which is an answer rather than an error.
    pub fn count_all(&self) -> BigUint {
        debug!("count_all(n = {}, r = {})", self.params.n(), self.params.regularity());
        let mut occupancy = Occupancy::new(self.params.n(), self.params.regularity());
        self._count_all(0, &mut occupancy)
    }

    fn _count_all(&self, depth: usize, occupancy: &mut Occupancy) -> BigUint {
        if depth == self.params.n() {
            // Every extension kept the table feasible, and n * r placed
            // permutations force saturation, so this leaf is complete.
            return BigUint::from(1u32);
        }

        let mut total = BigUint::ZERO;
        let bucket = self.universe.starting_with(depth as u8);
        for combo in bucket.iter().combinations(self.params.regularity()) {
            if occupancy.place_all(&combo) {
                total += self._count_all(depth + 1, occupancy);
                occupancy.unplace_all(&combo);
            }
        }
        total
    }

    /// Returns a lazy iterator over every complete regular family.
    ///
    /// Families come out in depth-first search order, one at a time, so the
    /// enumeration can be abandoned by dropping the iterator. The traversal
    /// prunes exactly like [`count_all`][FamilySearch::count_all], and
    /// `families().count()` equals the exact count.
    ///
    /// # Examples
    ///
    /// ```
    /// use regfam_rs::params::SearchParams;
    /// use regfam_rs::search::FamilySearch;
    ///
    /// let search = FamilySearch::new(SearchParams::new(3, 1).unwrap());
    /// let families: Vec<_> = search.families().collect();
    /// assert_eq!(families.len(), 2);
    /// for family in &families {
    ///     assert!(family.is_regular(1));
    /// }
    /// ```
    pub fn families(&self) -> Families<'_> {
        debug!("families(n = {}, r = {})", self.params.n(), self.params.regularity());
        Families::new(self)
    }
}

/// The stream of not-yet-tried `r`-combinations of one bucket.
type BucketCombos<'a> = Combinations<std::slice::Iter<'a, Perm>>;

/// An iterator over complete regular families.
///
/// Created by [`FamilySearch::families()`]. See its documentation for
/// details.
///
/// # Implementation Notes
///
/// Depth-first traversal with backtracking. `stack[d]` streams the untried
/// combinations at depth `d`; `chosen` holds the placed members for every
/// depth below the top of the stack, so yielding a family only clones the
/// current path. The occupancy delta of each placement is undone exactly
/// when the traversal retreats past it.
pub struct Families<'a> {
    search: &'a FamilySearch,
    /// One combination stream per open depth; the top one is being drained.
    stack: Vec<BucketCombos<'a>>,
    /// Members placed for depths `0..stack.len() - 1`, in selection order.
    chosen: Vec<&'a Perm>,
    occupancy: Occupancy,
}

impl<'a> Families<'a> {
    pub fn new(search: &'a FamilySearch) -> Self {
        let params = search.params();
        let mut families = Families {
            search,
            stack: Vec::with_capacity(params.n()),
            chosen: Vec::with_capacity(params.family_len()),
            occupancy: Occupancy::new(params.n(), params.regularity()),
        };
        let first = families.combos_at(0);
        families.stack.push(first);
        families
    }

    fn combos_at(&self, depth: usize) -> BucketCombos<'a> {
        let bucket = self.search.universe.starting_with(depth as u8);
        bucket.iter().combinations(self.search.params.regularity())
    }
}

impl Iterator for Families<'_> {
    type Item = Family;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.search.params.n();
        let r = self.search.params.regularity();

        loop {
            // The top of the stack is the depth currently being tried.
            let depth = self.stack.len().checked_sub(1)?;
            match self.stack[depth].next() {
                Some(combo) => {
                    if !self.occupancy.place_all(&combo) {
                        // Infeasible, try the next combination at this depth.
                        continue;
                    }
                    if depth + 1 == n {
                        // Complete family: assemble it, then undo the last
                        // placement and keep draining this depth.
                        let mut perms: Vec<Perm> = Vec::with_capacity(n * r);
                        perms.extend(self.chosen.iter().map(|&perm| perm.clone()));
                        perms.extend(combo.iter().map(|&perm| perm.clone()));
                        self.occupancy.unplace_all(&combo);
                        return Some(Family::new(n, perms));
                    }
                    // Accepted: descend into the next bucket.
                    let deeper = self.combos_at(depth + 1);
                    self.chosen.extend(combo);
                    self.stack.push(deeper);
                }
                None => {
                    // Exhausted this depth: backtrack.
                    self.stack.pop();
                    if !self.stack.is_empty() {
                        let keep = self.chosen.len() - r;
                        self.occupancy.unplace_all(&self.chosen[keep..]);
                        self.chosen.truncate(keep);
                    }
                }
            }
        }
    }
}
