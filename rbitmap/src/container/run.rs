use std::cmp::Ordering;

/// An inclusive range of low values `start..=end` inside a run container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Interval {
    pub(crate) start: u16,
    pub(crate) end: u16,
}

impl Interval {
    #[inline]
    pub(crate) const fn new(start: u16, end: u16) -> Self {
        Interval { start, end }
    }

    #[inline]
    pub(crate) fn len(&self) -> u32 {
        u32::from(self.end) - u32::from(self.start) + 1
    }

    /// Collapses an ascending, duplicate-free sequence of values into maximal intervals.
    pub(crate) fn coalesce(values: impl IntoIterator<Item = u16>) -> Vec<Interval> {
        let mut intervals: Vec<Interval> = Vec::new();
        for value in values {
            match intervals.last_mut() {
                Some(last) if u32::from(last.end) + 1 == u32::from(value) => last.end = value,
                _ => intervals.push(Interval::new(value, value)),
            }
        }
        intervals
    }
}

/// Number of maximal runs in an ascending, duplicate-free slice.
pub(crate) fn count_runs(values: &[u16]) -> usize {
    if values.is_empty() {
        return 0;
    }
    1 + values
        .windows(2)
        .filter(|pair| pair[1] != pair[0].wrapping_add(1))
        .count()
}

pub(crate) fn cardinality(intervals: &[Interval]) -> u32 {
    intervals.iter().map(Interval::len).sum()
}

fn search(intervals: &[Interval], value: u16) -> Result<usize, usize> {
    intervals.binary_search_by(|interval| {
        if value < interval.start {
            Ordering::Greater
        } else if value > interval.end {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    })
}

#[inline]
pub(crate) fn contains(intervals: &[Interval], value: u16) -> bool {
    search(intervals, value).is_ok()
}

/// Returns true if the value was not already covered.
pub(crate) fn insert(intervals: &mut Vec<Interval>, value: u16) -> bool {
    let pos = match search(intervals, value) {
        Ok(_) => return false,
        Err(pos) => pos,
    };

    let extends_prev = pos > 0 && u32::from(intervals[pos - 1].end) + 1 == u32::from(value);
    let extends_next = pos < intervals.len() && u32::from(value) + 1 == u32::from(intervals[pos].start);

    match (extends_prev, extends_next) {
        (true, true) => {
            intervals[pos - 1].end = intervals[pos].end;
            intervals.remove(pos);
        }
        (true, false) => intervals[pos - 1].end = value,
        (false, true) => intervals[pos].start = value,
        (false, false) => intervals.insert(pos, Interval::new(value, value)),
    }
    true
}

/// Returns true if the value was covered.
pub(crate) fn remove(intervals: &mut Vec<Interval>, value: u16) -> bool {
    let pos = match search(intervals, value) {
        Ok(pos) => pos,
        Err(_) => return false,
    };

    let Interval { start, end } = intervals[pos];
    if start == end {
        intervals.remove(pos);
    } else if value == start {
        intervals[pos].start = value + 1;
    } else if value == end {
        intervals[pos].end = value - 1;
    } else {
        intervals[pos].end = value - 1;
        intervals.insert(pos + 1, Interval::new(value + 1, end));
    }
    true
}

/// Cardinality of the intersection of two interval lists.
pub(crate) fn overlap_len(a: &[Interval], b: &[Interval]) -> u32 {
    let (mut i, mut j, mut total) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        let lo = a[i].start.max(b[j].start);
        let hi = a[i].end.min(b[j].end);
        if lo <= hi {
            total += u32::from(hi) - u32::from(lo) + 1;
        }
        if a[i].end < b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    total
}

/// Cursor over one interval list answering membership for non-decreasing probes.
struct Membership<'a> {
    intervals: &'a [Interval],
    index: usize,
}

impl Membership<'_> {
    fn covers(&mut self, point: u32) -> bool {
        while self.index < self.intervals.len() && u32::from(self.intervals[self.index].end) < point
        {
            self.index += 1;
        }
        self.index < self.intervals.len() && u32::from(self.intervals[self.index].start) <= point
    }
}

/// Combines two interval lists pointwise: a value is kept when `keep(in_a, in_b)` holds.
///
/// Works on the elementary segments delimited by every interval boundary, so the
/// cost is linear in the number of intervals rather than in the number of values.
pub(crate) fn merge(a: &[Interval], b: &[Interval], keep: impl Fn(bool, bool) -> bool) -> Vec<Interval> {
    let mut points: Vec<u32> = Vec::with_capacity(2 * (a.len() + b.len()));
    for interval in a.iter().chain(b) {
        points.push(u32::from(interval.start));
        points.push(u32::from(interval.end) + 1);
    }
    points.sort_unstable();
    points.dedup();

    let mut in_a = Membership { intervals: a, index: 0 };
    let mut in_b = Membership { intervals: b, index: 0 };
    let mut out: Vec<Interval> = Vec::new();

    for segment in points.windows(2) {
        let (lo, hi) = (segment[0], segment[1] - 1);
        if !keep(in_a.covers(lo), in_b.covers(lo)) {
            continue;
        }
        // segments are below 0x1_0000 by construction
        let (lo, hi) = (lo as u16, hi as u16);
        match out.last_mut() {
            Some(last) if u32::from(last.end) + 1 == u32::from(lo) => last.end = hi,
            _ => out.push(Interval::new(lo, hi)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(pairs: &[(u16, u16)]) -> Vec<Interval> {
        pairs.iter().map(|&(s, e)| Interval::new(s, e)).collect()
    }

    #[test]
    fn insert_merges_neighbours() {
        let mut runs = iv(&[(1, 3), (5, 7)]);
        assert!(insert(&mut runs, 4));
        assert_eq!(runs, iv(&[(1, 7)]));
        assert!(!insert(&mut runs, 4));
        assert!(insert(&mut runs, 9));
        assert!(insert(&mut runs, 0));
        assert_eq!(runs, iv(&[(0, 7), (9, 9)]));
    }

    #[test]
    fn remove_splits() {
        let mut runs = iv(&[(0, 10)]);
        assert!(remove(&mut runs, 5));
        assert_eq!(runs, iv(&[(0, 4), (6, 10)]));
        assert!(remove(&mut runs, 0));
        assert!(remove(&mut runs, 10));
        assert!(!remove(&mut runs, 10));
        assert_eq!(runs, iv(&[(1, 4), (6, 9)]));
    }

    #[test]
    fn merge_ops() {
        let a = iv(&[(0, 10), (20, 30)]);
        let b = iv(&[(5, 25), (65530, 65535)]);
        assert_eq!(merge(&a, &b, |x, y| x && y), iv(&[(5, 10), (20, 25)]));
        assert_eq!(merge(&a, &b, |x, y| x || y), iv(&[(0, 30), (65530, 65535)]));
        assert_eq!(merge(&a, &b, |x, y| x && !y), iv(&[(0, 4), (26, 30)]));
        assert_eq!(
            merge(&a, &b, |x, y| x != y),
            iv(&[(0, 4), (11, 19), (26, 30), (65530, 65535)])
        );
        assert_eq!(overlap_len(&a, &b), 12);
    }

    #[test]
    fn runs_in_sorted_values() {
        assert_eq!(count_runs(&[]), 0);
        assert_eq!(count_runs(&[1, 2, 3, 7, 9, 10, 65535]), 4);
        assert_eq!(Interval::coalesce([1, 2, 3, 7]), iv(&[(1, 3), (7, 7)]));
    }
}
