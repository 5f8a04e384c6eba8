use super::run::Interval;

/// Number of 64-bit words covering the full 16-bit range.
pub(crate) const BITSET_WORDS: usize = 1024;

/// A dense container: one bit per possible low value, with a cached population count.
#[derive(Clone)]
pub(crate) struct Bitset {
    words: Box<[u64; BITSET_WORDS]>,
    len: u32,
}

impl Bitset {
    pub(crate) fn new() -> Self {
        Bitset {
            words: Box::new([0; BITSET_WORDS]),
            len: 0,
        }
    }

    /// Takes ownership of raw words, recomputing the cached cardinality.
    pub(crate) fn from_words(words: Box<[u64; BITSET_WORDS]>) -> Self {
        let len = words.iter().map(|w| w.count_ones()).sum();
        Bitset { words, len }
    }

    pub(crate) fn from_values(values: &[u16]) -> Self {
        let mut bitset = Bitset::new();
        for &value in values {
            bitset.insert(value);
        }
        bitset
    }

    pub(crate) fn from_intervals(intervals: &[Interval]) -> Self {
        let mut bitset = Bitset::new();
        for interval in intervals {
            bitset.set_range(interval.start, interval.end);
        }
        bitset
    }

    #[inline]
    pub(crate) fn words(&self) -> &[u64; BITSET_WORDS] {
        &self.words
    }

    #[inline]
    pub(crate) fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub(crate) fn contains(&self, value: u16) -> bool {
        let (word, bit) = locate(value);
        self.words[word] & bit != 0
    }

    /// Returns true if the value was not already present.
    #[inline]
    pub(crate) fn insert(&mut self, value: u16) -> bool {
        let (word, bit) = locate(value);
        let added = self.words[word] & bit == 0;
        self.words[word] |= bit;
        self.len += u32::from(added);
        added
    }

    /// Returns true if the value was present.
    #[inline]
    pub(crate) fn remove(&mut self, value: u16) -> bool {
        let (word, bit) = locate(value);
        let removed = self.words[word] & bit != 0;
        self.words[word] &= !bit;
        self.len -= u32::from(removed);
        removed
    }

    #[inline]
    pub(crate) fn flip(&mut self, value: u16) {
        let (word, bit) = locate(value);
        self.words[word] ^= bit;
        if self.words[word] & bit != 0 {
            self.len += 1;
        } else {
            self.len -= 1;
        }
    }

    /// Sets every bit in `start..=end`.
    pub(crate) fn set_range(&mut self, start: u16, end: u16) {
        self.update_range(start, end, |word, mask| word | mask);
    }

    /// Clears every bit in `start..=end`.
    pub(crate) fn clear_range(&mut self, start: u16, end: u16) {
        self.update_range(start, end, |word, mask| word & !mask);
    }

    /// Toggles every bit in `start..=end`.
    pub(crate) fn flip_range(&mut self, start: u16, end: u16) {
        self.update_range(start, end, |word, mask| word ^ mask);
    }

    fn update_range(&mut self, start: u16, end: u16, f: impl Fn(u64, u64) -> u64) {
        debug_assert!(start <= end);
        let first = usize::from(start) / 64;
        let last = usize::from(end) / 64;
        for index in first..=last {
            let lo = if index == first { u32::from(start) % 64 } else { 0 };
            let hi = if index == last { u32::from(end) % 64 } else { 63 };
            let mask = range_mask(lo, hi);
            let before = self.words[index];
            let after = f(before, mask);
            self.words[index] = after;
            self.len = self.len + after.count_ones() - before.count_ones();
        }
    }

    /// Number of set bits in `start..=end`.
    pub(crate) fn count_range(&self, start: u16, end: u16) -> u32 {
        let first = usize::from(start) / 64;
        let last = usize::from(end) / 64;
        (first..=last)
            .map(|index| {
                let lo = if index == first { u32::from(start) % 64 } else { 0 };
                let hi = if index == last { u32::from(end) % 64 } else { 63 };
                (self.words[index] & range_mask(lo, hi)).count_ones()
            })
            .sum()
    }

    /// Number of maximal runs of consecutive set bits.
    pub(crate) fn count_runs(&self) -> usize {
        let mut runs = 0;
        let mut carry = 0u64;
        for &word in self.words.iter() {
            // a run starts at every set bit whose predecessor is clear
            let starts = word & !((word << 1) | carry);
            runs += starts.count_ones() as usize;
            carry = word >> 63;
        }
        runs
    }

    pub(crate) fn minimum(&self) -> Option<u16> {
        self.words
            .iter()
            .position(|&w| w != 0)
            .map(|index| (index * 64) as u16 + self.words[index].trailing_zeros() as u16)
    }

    pub(crate) fn maximum(&self) -> Option<u16> {
        self.words
            .iter()
            .rposition(|&w| w != 0)
            .map(|index| (index * 64) as u16 + 63 - self.words[index].leading_zeros() as u16)
    }

    /// Combines `other` into `self` word by word.
    pub(crate) fn combine(&mut self, other: &Bitset, f: impl Fn(u64, u64) -> u64) {
        let mut len = 0;
        for (word, &rhs) in self.words.iter_mut().zip(other.words.iter()) {
            *word = f(*word, rhs);
            len += word.count_ones();
        }
        self.len = len;
    }

    /// Population count of `f` applied word by word, without storing the result.
    pub(crate) fn combined_len(&self, other: &Bitset, f: impl Fn(u64, u64) -> u64) -> u32 {
        self.words
            .iter()
            .zip(other.words.iter())
            .map(|(&lhs, &rhs)| f(lhs, rhs).count_ones())
            .sum()
    }

    pub(crate) fn to_values(&self) -> Vec<u16> {
        let mut values = Vec::with_capacity(self.len as usize);
        values.extend(self.iter());
        values
    }

    pub(crate) fn to_intervals(&self) -> Vec<Interval> {
        Interval::coalesce(self.iter())
    }

    pub(crate) fn iter(&self) -> Iter<'_> {
        Iter {
            words: &self.words,
            index: 0,
            word: self.words[0],
        }
    }
}

impl PartialEq for Bitset {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.words[..] == other.words[..]
    }
}

impl Eq for Bitset {}

#[inline]
fn locate(value: u16) -> (usize, u64) {
    (usize::from(value) / 64, 1u64 << (value % 64))
}

/// Mask with bits `lo..=hi` set, both in `0..64`.
#[inline]
fn range_mask(lo: u32, hi: u32) -> u64 {
    debug_assert!(lo <= hi && hi < 64);
    (u64::MAX >> (63 - hi)) & (u64::MAX << lo)
}

/// Ascending iterator over the set bits of a [`Bitset`].
#[derive(Clone)]
pub(crate) struct Iter<'a> {
    words: &'a [u64; BITSET_WORDS],
    index: usize,
    word: u64,
}

impl Iterator for Iter<'_> {
    type Item = u16;

    #[inline]
    fn next(&mut self) -> Option<u16> {
        while self.word == 0 {
            self.index += 1;
            if self.index >= BITSET_WORDS {
                return None;
            }
            self.word = self.words[self.index];
        }
        let bit = self.word.trailing_zeros();
        self.word &= self.word - 1;
        Some((self.index * 64) as u16 + bit as u16)
    }
}
