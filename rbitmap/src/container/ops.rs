//! Pairwise container algebra.
//!
//! Each operation matches on the pair of encodings and picks a merge strategy for
//! it; results are always returned in their canonical encoding. Both operands are
//! assumed to share the same high-order key.

use super::{array, run, Bitset, Container, Interval};

/// A binary set operation, as applied key by key when merging two bitmaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SetOp {
    And,
    Or,
    Xor,
    AndNot,
}

impl SetOp {
    /// Whether a key present only in the left operand survives unchanged.
    #[inline]
    pub(crate) fn keeps_left(self) -> bool {
        !matches!(self, SetOp::And)
    }

    /// Whether a key present only in the right operand survives unchanged.
    #[inline]
    pub(crate) fn keeps_right(self) -> bool {
        matches!(self, SetOp::Or | SetOp::Xor)
    }

    /// Cardinality of the result given both operand cardinalities and their overlap.
    #[inline]
    pub(crate) fn result_len(self, left: u64, right: u64, overlap: u64) -> u64 {
        match self {
            SetOp::And => overlap,
            SetOp::Or => left + right - overlap,
            SetOp::Xor => left + right - 2 * overlap,
            SetOp::AndNot => left - overlap,
        }
    }
}

impl Container {
    pub(crate) fn apply(&self, op: SetOp, other: &Container) -> Container {
        match op {
            SetOp::And => self.intersect(other),
            SetOp::Or => self.union(other),
            SetOp::Xor => self.symmetric_difference(other),
            SetOp::AndNot => self.difference(other),
        }
    }

    pub(crate) fn union(&self, other: &Container) -> Container {
        use Container::{Array, Bitset as Dense, Run};

        let result = match (self, other) {
            (Array(a), Array(b)) => Array(array::union(a, b)),
            (Dense(a), Dense(b)) => {
                let mut out = a.clone();
                out.combine(b, |x, y| x | y);
                Dense(out)
            }
            (Dense(a), Array(b)) | (Array(b), Dense(a)) => {
                let mut out = a.clone();
                for &value in b {
                    out.insert(value);
                }
                Dense(out)
            }
            (Dense(a), Run(b)) | (Run(b), Dense(a)) => {
                let mut out = a.clone();
                for interval in b {
                    out.set_range(interval.start, interval.end);
                }
                Dense(out)
            }
            (Run(a), Run(b)) => Run(run::merge(a, b, |x, y| x || y)),
            (Run(a), Array(b)) | (Array(b), Run(a)) => {
                Run(run::merge(a, &Interval::coalesce(b.iter().copied()), |x, y| x || y))
            }
        };
        result.optimize()
    }

    pub(crate) fn intersect(&self, other: &Container) -> Container {
        use Container::{Array, Bitset as Dense, Run};

        let result = match (self, other) {
            (Array(a), Array(b)) => Array(array::intersect(a, b)),
            (Array(a), Dense(b)) | (Dense(b), Array(a)) => {
                Array(a.iter().copied().filter(|&v| b.contains(v)).collect())
            }
            (Array(a), Run(b)) | (Run(b), Array(a)) => {
                Array(a.iter().copied().filter(|&v| run::contains(b, v)).collect())
            }
            (Dense(a), Dense(b)) => {
                let mut out = a.clone();
                out.combine(b, |x, y| x & y);
                Dense(out)
            }
            (Dense(a), Run(b)) | (Run(b), Dense(a)) => {
                let mut out = a.clone();
                out.combine(&Bitset::from_intervals(b), |x, y| x & y);
                Dense(out)
            }
            (Run(a), Run(b)) => Run(run::merge(a, b, |x, y| x && y)),
        };
        result.optimize()
    }

    pub(crate) fn difference(&self, other: &Container) -> Container {
        use Container::{Array, Bitset as Dense, Run};

        let result = match (self, other) {
            (Array(a), Array(b)) => Array(array::difference(a, b)),
            (Array(a), Dense(b)) => Array(a.iter().copied().filter(|&v| !b.contains(v)).collect()),
            (Array(a), Run(b)) => {
                Array(a.iter().copied().filter(|&v| !run::contains(b, v)).collect())
            }
            (Dense(a), Array(b)) => {
                let mut out = a.clone();
                for &value in b {
                    out.remove(value);
                }
                Dense(out)
            }
            (Dense(a), Dense(b)) => {
                let mut out = a.clone();
                out.combine(b, |x, y| x & !y);
                Dense(out)
            }
            (Dense(a), Run(b)) => {
                let mut out = a.clone();
                for interval in b {
                    out.clear_range(interval.start, interval.end);
                }
                Dense(out)
            }
            (Run(a), Dense(b)) => {
                let mut out = Bitset::from_intervals(a);
                out.combine(b, |x, y| x & !y);
                Dense(out)
            }
            (Run(a), Array(b)) => {
                Run(run::merge(a, &Interval::coalesce(b.iter().copied()), |x, y| x && !y))
            }
            (Run(a), Run(b)) => Run(run::merge(a, b, |x, y| x && !y)),
        };
        result.optimize()
    }

    pub(crate) fn symmetric_difference(&self, other: &Container) -> Container {
        use Container::{Array, Bitset as Dense, Run};

        let result = match (self, other) {
            (Array(a), Array(b)) => Array(array::symmetric_difference(a, b)),
            (Dense(a), Dense(b)) => {
                let mut out = a.clone();
                out.combine(b, |x, y| x ^ y);
                Dense(out)
            }
            (Dense(a), Array(b)) | (Array(b), Dense(a)) => {
                let mut out = a.clone();
                for &value in b {
                    out.flip(value);
                }
                Dense(out)
            }
            (Dense(a), Run(b)) | (Run(b), Dense(a)) => {
                let mut out = a.clone();
                for interval in b {
                    out.flip_range(interval.start, interval.end);
                }
                Dense(out)
            }
            (Run(a), Run(b)) => Run(run::merge(a, b, |x, y| x != y)),
            (Run(a), Array(b)) | (Array(b), Run(a)) => {
                Run(run::merge(a, &Interval::coalesce(b.iter().copied()), |x, y| x != y))
            }
        };
        result.optimize()
    }

    /// Cardinality of the intersection, without building it.
    pub(crate) fn intersect_len(&self, other: &Container) -> u32 {
        use Container::{Array, Bitset as Dense, Run};

        match (self, other) {
            (Array(a), Array(b)) => array::intersect_len(a, b),
            (Array(a), Dense(b)) | (Dense(b), Array(a)) => {
                a.iter().filter(|&&v| b.contains(v)).count() as u32
            }
            (Array(a), Run(b)) | (Run(b), Array(a)) => {
                a.iter().filter(|&&v| run::contains(b, v)).count() as u32
            }
            (Dense(a), Dense(b)) => a.combined_len(b, |x, y| x & y),
            (Dense(a), Run(b)) | (Run(b), Dense(a)) => b
                .iter()
                .map(|interval| a.count_range(interval.start, interval.end))
                .sum(),
            (Run(a), Run(b)) => run::overlap_len(a, b),
        }
    }
}
