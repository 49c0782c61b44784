//! Permutations and the bucketed universe they are drawn from.
//!
//! The universe holds all `n!` permutations of `[0, n)`, grouped into `n`
//! buckets by first element. Every bucket has exactly `(n-1)!` members.
//! The search engines select `r` permutations from each bucket in turn,
//! which is what makes a complete family `r`-regular "for free" in its
//! first position.

use std::fmt;
use std::ops::Index;

use itertools::Itertools;
use log::debug;

/// A permutation of `[0, n)`, stored by value.
///
/// `perm[pos]` is the element placed at position `pos`.
///
/// # Invariants
///
/// - Every value in `0..n` appears exactly once.
/// - Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Perm {
    values: Box<[u8]>,
}

impl Perm {
    /// Creates a permutation from its value sequence.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty or is not a permutation of `0..values.len()`.
    pub fn new(values: Vec<u8>) -> Self {
        let n = values.len();
        assert!(n >= 1, "Permutation must have at least one element");
        let mut seen = vec![false; n];
        for &v in &values {
            assert!((v as usize) < n, "Value {} is out of range for n = {}", v, n);
            assert!(!seen[v as usize], "Value {} appears twice", v);
            seen[v as usize] = true;
        }
        Perm { values: values.into_boxed_slice() }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// The element placed at position 0. Universe buckets are keyed by this.
    pub fn first(&self) -> u8 {
        self.values[0]
    }

    /// The full value sequence.
    pub fn values(&self) -> &[u8] {
        &self.values
    }
}

impl Index<usize> for Perm {
    type Output = u8;

    fn index(&self, pos: usize) -> &u8 {
        &self.values[pos]
    }
}

impl fmt::Display for Perm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (pos, v) in self.values.iter().enumerate() {
            if pos > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}

/// All `n!` permutations of `[0, n)`, grouped by first element.
///
/// Built once per search and read-only afterwards. Generation is
/// deterministic, so two universes for the same `n` are identical.
#[derive(Debug)]
pub struct Universe {
    n: usize,
    buckets: Vec<Vec<Perm>>,
}

impl Universe {
    /// Generates the full universe for `n` elements.
    ///
    /// This is the `O(n * n!)` wall that motivates the probabilistic
    /// estimator; see [`MAX_ELEMENTS`][crate::params::MAX_ELEMENTS] for the
    /// supported range.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0` or `n > MAX_ELEMENTS`. Use
    /// [`SearchParams`][crate::params::SearchParams] for validated
    /// construction.
    pub fn new(n: usize) -> Self {
        assert!(n >= 1, "Universe needs at least one element");
        assert!(n <= crate::params::MAX_ELEMENTS, "Universe for n = {} does not fit in memory", n);
        debug!("Universe::new(n = {})", n);

        let mut buckets: Vec<Vec<Perm>> = vec![Vec::new(); n];
        for values in (0..n as u8).permutations(n) {
            let perm = Perm::new(values);
            buckets[perm.first() as usize].push(perm);
        }

        let expected: usize = (1..n).product();
        for (value, bucket) in buckets.iter().enumerate() {
            assert_eq!(bucket.len(), expected, "Bucket {} has the wrong size", value);
        }

        Universe { n, buckets }
    }

    /// Number of elements being permuted.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of permutations in each bucket, `(n-1)!`.
    pub fn bucket_len(&self) -> usize {
        self.buckets[0].len()
    }

    /// Total number of permutations, `n!`.
    pub fn len(&self) -> usize {
        self.n * self.bucket_len()
    }

    /// All permutations whose first element is `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value >= n`.
    pub fn starting_with(&self, value: u8) -> &[Perm] {
        &self.buckets[value as usize]
    }
}
