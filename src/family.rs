use std::fmt;

use crate::occupancy::Occupancy;
use crate::perm::Perm;

/// An ordered selection of permutations, possibly a complete regular family.
///
/// The search engines produce families bucket by bucket, so the members at
/// indices `d * r .. (d + 1) * r` all start with value `d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    n: usize,
    perms: Vec<Perm>,
}

impl Family {
    /// Creates a family from its members.
    ///
    /// # Panics
    ///
    /// Panics if some member is not a permutation of `n` elements.
    pub fn new(n: usize, perms: Vec<Perm>) -> Self {
        for perm in &perms {
            assert_eq!(perm.len(), n, "Family member {} has the wrong length", perm);
        }
        Family { n, perms }
    }

    /// The family with no members. The only 0-regular family at any `n`.
    pub fn empty(n: usize) -> Self {
        Family { n, perms: Vec::new() }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.perms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perms.is_empty()
    }

    /// The members, in selection order.
    pub fn perms(&self) -> &[Perm] {
        &self.perms
    }

    /// True iff this is a complete `regularity`-regular family:
    /// `n * regularity` members and every occupancy cell at exactly
    /// `regularity`.
    pub fn is_regular(&self, regularity: usize) -> bool {
        if self.perms.len() != self.n * regularity {
            return false;
        }
        let mut table = Occupancy::new(self.n, regularity);
        self.perms.iter().all(|perm| table.place(perm)) && table.is_saturated()
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, perm) in self.perms.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", perm)?;
        }
        write!(f, "}}")
    }
}
