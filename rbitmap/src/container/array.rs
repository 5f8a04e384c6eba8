//! Merge algorithms over ascending, duplicate-free `u16` slices.

use std::cmp::Ordering;

pub(crate) fn union(a: &[u16], b: &[u16]) -> Vec<u16> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

pub(crate) fn intersect(a: &[u16], b: &[u16]) -> Vec<u16> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

pub(crate) fn intersect_len(a: &[u16], b: &[u16]) -> u32 {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }
    count
}

pub(crate) fn difference(a: &[u16], b: &[u16]) -> Vec<u16> {
    let mut out = Vec::with_capacity(a.len());
    let mut j = 0;
    for &value in a {
        while j < b.len() && b[j] < value {
            j += 1;
        }
        if j == b.len() || b[j] != value {
            out.push(value);
        }
    }
    out
}

pub(crate) fn symmetric_difference(a: &[u16], b: &[u16]) -> Vec<u16> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// True if the slice is strictly ascending.
pub(crate) fn is_strictly_sorted(values: &[u16]) -> bool {
    values.windows(2).all(|pair| pair[0] < pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges() {
        let a = [1, 2, 3, 4];
        let b = [2, 6, 7, 8];
        assert_eq!(union(&a, &b), [1, 2, 3, 4, 6, 7, 8]);
        assert_eq!(intersect(&a, &b), [2]);
        assert_eq!(intersect_len(&a, &b), 1);
        assert_eq!(difference(&a, &b), [1, 3, 4]);
        assert_eq!(difference(&b, &a), [6, 7, 8]);
        assert_eq!(symmetric_difference(&a, &b), [1, 3, 4, 6, 7, 8]);
    }

    #[test]
    fn sortedness() {
        assert!(is_strictly_sorted(&[]));
        assert!(is_strictly_sorted(&[0, 1, 65535]));
        assert!(!is_strictly_sorted(&[1, 1]));
        assert!(!is_strictly_sorted(&[2, 1]));
    }
}
