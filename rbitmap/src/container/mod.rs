//! The storage unit of a bitmap: every member sharing one high-order key.
//!
//! A container holds 16-bit low values in one of three encodings. Which one is
//! used is decided by [`Kind::canonical`] from the container's content alone, so
//! two containers holding the same values always serialize identically.

use std::borrow::Cow;
use std::fmt;
use std::mem;

mod array;
mod bitset;
mod ops;
mod run;

pub(crate) use self::array::is_strictly_sorted;
pub(crate) use self::bitset::{Bitset, BITSET_WORDS};
pub(crate) use self::ops::SetOp;
pub(crate) use self::run::Interval;

/// Largest cardinality stored as a sorted array.
pub(crate) const ARRAY_MAX_LEN: usize = 4096;

/// Size of a bitset payload in bytes.
pub(crate) const BITSET_BYTES: usize = BITSET_WORDS * 8;

/// A run container with this many intervals is never smaller than a bitset.
pub(crate) const MAX_RUNS: usize = BITSET_BYTES / 4;

/// The encoding of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Kind {
    /// Sorted list of low values.
    Array,
    /// One bit per possible low value.
    Bitset,
    /// Sorted list of inclusive ranges.
    Run,
}

impl Kind {
    /// The smallest encoding for `len` values forming `runs` maximal runs.
    ///
    /// Ties favour array over run, and array over bitset.
    pub(crate) fn canonical(len: u32, runs: usize) -> Kind {
        let array_bytes = 2 * len as usize;
        let run_bytes = 4 * runs;
        if run_bytes < array_bytes.min(BITSET_BYTES) {
            Kind::Run
        } else if len as usize <= ARRAY_MAX_LEN {
            Kind::Array
        } else {
            Kind::Bitset
        }
    }
}

#[derive(Clone)]
pub(crate) enum Container {
    Array(Vec<u16>),
    Bitset(Bitset),
    Run(Vec<Interval>),
}

impl Container {
    pub(crate) fn new() -> Self {
        Container::Array(Vec::new())
    }

    /// Every low value in `start..=end`.
    pub(crate) fn from_range(start: u16, end: u16) -> Self {
        Container::Run(vec![Interval::new(start, end)])
    }

    #[inline]
    pub(crate) fn kind(&self) -> Kind {
        match self {
            Container::Array(_) => Kind::Array,
            Container::Bitset(_) => Kind::Bitset,
            Container::Run(_) => Kind::Run,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> u32 {
        match self {
            Container::Array(values) => values.len() as u32,
            Container::Bitset(bitset) => bitset.len(),
            Container::Run(intervals) => run::cardinality(intervals),
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Container::Array(values) => values.is_empty(),
            Container::Bitset(bitset) => bitset.len() == 0,
            Container::Run(intervals) => intervals.is_empty(),
        }
    }

    pub(crate) fn count_runs(&self) -> usize {
        match self {
            Container::Array(values) => run::count_runs(values),
            Container::Bitset(bitset) => bitset.count_runs(),
            Container::Run(intervals) => intervals.len(),
        }
    }

    #[inline]
    pub(crate) fn contains(&self, value: u16) -> bool {
        match self {
            Container::Array(values) => values.binary_search(&value).is_ok(),
            Container::Bitset(bitset) => bitset.contains(value),
            Container::Run(intervals) => run::contains(intervals, value),
        }
    }

    /// Returns true if the value was not already present.
    pub(crate) fn insert(&mut self, value: u16) -> bool {
        match self {
            Container::Array(values) => match values.binary_search(&value) {
                Ok(_) => false,
                Err(pos) => {
                    if values.len() < ARRAY_MAX_LEN {
                        values.insert(pos, value);
                    } else {
                        let mut bitset = Bitset::from_values(values);
                        bitset.insert(value);
                        *self = Container::Bitset(bitset);
                    }
                    true
                }
            },
            Container::Bitset(bitset) => bitset.insert(value),
            Container::Run(intervals) => {
                let added = run::insert(intervals, value);
                if intervals.len() >= MAX_RUNS {
                    self.optimize_in_place();
                }
                added
            }
        }
    }

    /// Returns true if the value was present.
    pub(crate) fn remove(&mut self, value: u16) -> bool {
        match self {
            Container::Array(values) => match values.binary_search(&value) {
                Ok(pos) => {
                    values.remove(pos);
                    true
                }
                Err(_) => false,
            },
            Container::Bitset(bitset) => {
                let removed = bitset.remove(value);
                if removed && bitset.len() as usize <= ARRAY_MAX_LEN {
                    *self = Container::Array(bitset.to_values());
                }
                removed
            }
            Container::Run(intervals) => {
                let removed = run::remove(intervals, value);
                if intervals.len() >= MAX_RUNS {
                    self.optimize_in_place();
                }
                removed
            }
        }
    }

    /// Removes every value in `start..=end`.
    pub(crate) fn remove_range(&mut self, start: u16, end: u16) {
        *self = self.difference(&Container::from_range(start, end));
    }

    pub(crate) fn minimum(&self) -> Option<u16> {
        match self {
            Container::Array(values) => values.first().copied(),
            Container::Bitset(bitset) => bitset.minimum(),
            Container::Run(intervals) => intervals.first().map(|interval| interval.start),
        }
    }

    pub(crate) fn maximum(&self) -> Option<u16> {
        match self {
            Container::Array(values) => values.last().copied(),
            Container::Bitset(bitset) => bitset.maximum(),
            Container::Run(intervals) => intervals.last().map(|interval| interval.end),
        }
    }

    pub(crate) fn iter(&self) -> Iter<'_> {
        match self {
            Container::Array(values) => Iter::Array(values.iter()),
            Container::Bitset(bitset) => Iter::Bitset(bitset.iter()),
            Container::Run(intervals) => Iter::Run {
                intervals: intervals.iter(),
                next: 1,
                end: 0,
            },
        }
    }

    pub(crate) fn to_values(&self) -> Vec<u16> {
        match self {
            Container::Array(values) => values.clone(),
            Container::Bitset(bitset) => bitset.to_values(),
            Container::Run(_) => self.iter().collect(),
        }
    }

    pub(crate) fn to_bitset(&self) -> Bitset {
        match self {
            Container::Array(values) => Bitset::from_values(values),
            Container::Bitset(bitset) => bitset.clone(),
            Container::Run(intervals) => Bitset::from_intervals(intervals),
        }
    }

    pub(crate) fn to_intervals(&self) -> Vec<Interval> {
        match self {
            Container::Array(values) => Interval::coalesce(values.iter().copied()),
            Container::Bitset(bitset) => bitset.to_intervals(),
            Container::Run(intervals) => intervals.clone(),
        }
    }

    pub(crate) fn canonical_kind(&self) -> Kind {
        Kind::canonical(self.len(), self.count_runs())
    }

    pub(crate) fn into_kind(self, kind: Kind) -> Container {
        match (self, kind) {
            (same @ Container::Array(_), Kind::Array)
            | (same @ Container::Bitset(_), Kind::Bitset)
            | (same @ Container::Run(_), Kind::Run) => same,
            (other, Kind::Array) => Container::Array(other.to_values()),
            (other, Kind::Bitset) => Container::Bitset(other.to_bitset()),
            (other, Kind::Run) => Container::Run(other.to_intervals()),
        }
    }

    /// Re-encodes the container in its canonical kind.
    pub(crate) fn optimize(self) -> Container {
        let kind = self.canonical_kind();
        self.into_kind(kind)
    }

    pub(crate) fn optimize_in_place(&mut self) {
        let container = mem::replace(self, Container::new());
        *self = container.optimize();
    }

    /// The container in its canonical kind, converting only when needed.
    pub(crate) fn canonical(&self) -> Cow<'_, Container> {
        let kind = self.canonical_kind();
        if kind == self.kind() {
            return Cow::Borrowed(self);
        }
        Cow::Owned(match kind {
            Kind::Array => Container::Array(self.to_values()),
            Kind::Bitset => Container::Bitset(self.to_bitset()),
            Kind::Run => Container::Run(self.to_intervals()),
        })
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Container::Array(a), Container::Array(b)) => a == b,
            (Container::Bitset(a), Container::Bitset(b)) => a == b,
            // intervals are always kept maximal, so equal sets have equal lists
            (Container::Run(a), Container::Run(b)) => a == b,
            _ => self.len() == other.len() && self.iter().eq(other.iter()),
        }
    }
}

impl Eq for Container {}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind(), self.len())
    }
}

/// Ascending iterator over the low values of a container.
#[derive(Clone)]
pub(crate) enum Iter<'a> {
    Array(std::slice::Iter<'a, u16>),
    Bitset(bitset::Iter<'a>),
    Run {
        intervals: std::slice::Iter<'a, Interval>,
        next: u32,
        end: u32,
    },
}

impl Iterator for Iter<'_> {
    type Item = u16;

    #[inline]
    fn next(&mut self) -> Option<u16> {
        match self {
            Iter::Array(values) => values.next().copied(),
            Iter::Bitset(bits) => bits.next(),
            Iter::Run {
                intervals,
                next,
                end,
            } => {
                if *next > *end {
                    let interval = intervals.next()?;
                    *next = u32::from(interval.start);
                    *end = u32::from(interval.end);
                }
                let value = *next as u16;
                *next += 1;
                Some(value)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Iter::Array(values) => values.size_hint(),
            _ => (0, Some(1 << 16)),
        }
    }
}
