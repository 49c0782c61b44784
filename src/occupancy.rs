//! The position/value occupancy table that prunes the search.

use crate::perm::Perm;

/// An `n x n` table counting, per (position, value) cell, how many selected
/// permutations place `value` at `position`.
///
/// A selection can still grow into an `r`-regular family only while no cell
/// exceeds `r`; a complete family saturates every cell at exactly `r`.
/// Cells are stored row-major in a flat vector (`pos * n + value`).
///
/// The table is maintained by apply-and-undo along a single search path:
/// [`place_all`][Occupancy::place_all] either records a whole batch or leaves
/// the table untouched, and [`unplace_all`][Occupancy::unplace_all] reverts
/// it exactly. Sibling branches therefore never observe a partial delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    n: usize,
    regularity: usize,
    cells: Vec<usize>,
}

impl Occupancy {
    /// Creates an empty table for permutations of `n` elements and the given
    /// target regularity.
    pub fn new(n: usize, regularity: usize) -> Self {
        assert!(n >= 1, "Occupancy needs at least one element");
        Occupancy { n, regularity, cells: vec![0; n * n] }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn regularity(&self) -> usize {
        self.regularity
    }

    /// Count of placed permutations putting `value` at `pos`.
    pub fn get(&self, pos: usize, value: u8) -> usize {
        self.cells[pos * self.n + value as usize]
    }

    /// Records one permutation, position by position.
    ///
    /// Stops at the first cell that would exceed the regularity, rolls the
    /// partial delta back, and returns `false`; on `true` the whole
    /// permutation is recorded.
    pub fn place(&mut self, perm: &Perm) -> bool {
        debug_assert_eq!(perm.len(), self.n);
        for pos in 0..self.n {
            let cell = pos * self.n + perm[pos] as usize;
            if self.cells[cell] == self.regularity {
                for undo in 0..pos {
                    self.cells[undo * self.n + perm[undo] as usize] -= 1;
                }
                return false;
            }
            self.cells[cell] += 1;
        }
        true
    }

    /// Removes one previously placed permutation.
    pub fn unplace(&mut self, perm: &Perm) {
        debug_assert_eq!(perm.len(), self.n);
        for pos in 0..self.n {
            let cell = pos * self.n + perm[pos] as usize;
            assert!(self.cells[cell] > 0, "Unplacing a permutation that was never placed");
            self.cells[cell] -= 1;
        }
    }

    /// Records a whole batch, all or nothing: on the first infeasible member
    /// everything placed so far is removed again and the call returns `false`.
    pub fn place_all(&mut self, batch: &[&Perm]) -> bool {
        for (placed, perm) in batch.iter().enumerate() {
            if !self.place(perm) {
                for undone in batch[..placed].iter().rev() {
                    self.unplace(undone);
                }
                return false;
            }
        }
        true
    }

    /// Removes a previously placed batch.
    pub fn unplace_all(&mut self, batch: &[&Perm]) {
        for perm in batch.iter().rev() {
            self.unplace(perm);
        }
    }

    /// True when every cell holds exactly the regularity count, i.e. the
    /// placed selection is a complete regular family.
    pub fn is_saturated(&self) -> bool {
        self.cells.iter().all(|&count| count == self.regularity)
    }
}

/// From-scratch audit: can `perms` still grow into an `r`-regular family of
/// permutations of `n` elements? Equivalently, does no occupancy cell exceed
/// `r` once every permutation is tabulated?
pub fn is_regular_feasible(perms: &[Perm], n: usize, regularity: usize) -> bool {
    let mut table = Occupancy::new(n, regularity);
    perms.iter().all(|perm| table.place(perm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_place_and_unplace() {
        let mut table = Occupancy::new(3, 1);
        let perm = Perm::new(vec![0, 1, 2]);

        assert!(table.place(&perm));
        assert_eq!(table.get(0, 0), 1);
        assert_eq!(table.get(1, 1), 1);
        assert_eq!(table.get(2, 2), 1);
        assert_eq!(table.get(0, 1), 0);

        table.unplace(&perm);
        assert_eq!(table, Occupancy::new(3, 1));
    }

    #[test]
    fn test_place_rejects_overflow_and_rolls_back() {
        let mut table = Occupancy::new(3, 1);
        assert!(table.place(&Perm::new(vec![0, 1, 2])));

        // Shares value 2 at position 2 with the placed permutation.
        let clash = Perm::new(vec![1, 0, 2]);
        let before = table.clone();
        assert!(!table.place(&clash));
        assert_eq!(table, before, "failed placement must leave no trace");
    }

    #[test]
    fn test_place_all_is_all_or_nothing() {
        let mut table = Occupancy::new(3, 1);
        let a = Perm::new(vec![0, 1, 2]);
        let b = Perm::new(vec![1, 2, 0]);
        let clash = Perm::new(vec![2, 1, 0]); // value 1 at position 1, like `a`

        let before = table.clone();
        assert!(!table.place_all(&[&a, &b, &clash]));
        assert_eq!(table, before);

        assert!(table.place_all(&[&a, &b]));
        assert_eq!(table.get(0, 0), 1);
        assert_eq!(table.get(0, 1), 1);

        table.unplace_all(&[&a, &b]);
        assert_eq!(table, before);
    }

    #[test]
    fn test_saturation() {
        let mut table = Occupancy::new(3, 1);
        let a = Perm::new(vec![0, 1, 2]);
        let b = Perm::new(vec![1, 2, 0]);
        let c = Perm::new(vec![2, 0, 1]);

        assert!(table.place_all(&[&a, &b]));
        assert!(!table.is_saturated());
        assert!(table.place(&c));
        assert!(table.is_saturated());
    }

    #[test]
    fn test_feasibility_audit() {
        let a = Perm::new(vec![0, 1, 2]);
        let b = Perm::new(vec![1, 2, 0]);
        let clash = Perm::new(vec![2, 1, 0]);

        assert!(is_regular_feasible(&[a.clone(), b.clone()], 3, 1));
        assert!(!is_regular_feasible(&[a.clone(), b.clone(), clash.clone()], 3, 1));

        // The same selection is fine at regularity 2.
        assert!(is_regular_feasible(&[a.clone(), b.clone(), clash.clone()], 3, 2));

        // Infeasible selections stay infeasible under extension.
        let more = Perm::new(vec![2, 0, 1]);
        assert!(!is_regular_feasible(&[a, b, clash, more], 3, 1));
    }

    #[test]
    fn test_regularity_zero_accepts_nothing() {
        let mut table = Occupancy::new(3, 0);
        assert!(table.is_saturated(), "the empty table is 0-regular");
        assert!(!table.place(&Perm::new(vec![0, 1, 2])));
        assert!(table.is_saturated());
    }
}
