use std::borrow::Cow;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Bound, RangeBounds};

use crate::container::{Container, Kind, SetOp};
use crate::Value;

use super::{BitmapIterator, RoaringBitmap, Statistics};

impl<V: Value> RoaringBitmap<V> {
    /// Creates a new bitmap (initially empty)
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap = Bitmap::new();
    ///
    /// assert!(bitmap.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        RoaringBitmap {
            keys: Vec::new(),
            containers: Vec::new(),
            marker: PhantomData,
        }
    }

    /// Same as [`RoaringBitmap::new`].
    #[inline]
    pub fn create() -> Self {
        Self::new()
    }

    /// Creates a new bitmap from a slice of integers. Duplicates collapse.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap64;
    ///
    /// let bitmap = Bitmap64::of(&[7, 3, 3, u64::MAX]);
    ///
    /// assert_eq!(bitmap.cardinality(), 3);
    /// assert_eq!(bitmap.to_vec(), [3, 7, u64::MAX]);
    /// ```
    pub fn of(elements: &[V]) -> Self {
        let mut sorted = elements.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        Self::from_sorted(sorted)
    }

    /// Builds a bitmap from strictly ascending values.
    pub(super) fn from_sorted(values: impl IntoIterator<Item = V>) -> Self {
        let mut bitmap = Self::new();
        let mut current: Option<(V::Key, Vec<u16>)> = None;
        for value in values {
            let (key, low) = value.split();
            if let Some((current_key, lows)) = current.as_mut() {
                if *current_key == key {
                    lows.push(low);
                    continue;
                }
            }
            if let Some((done_key, lows)) = current.replace((key, vec![low])) {
                bitmap.push(done_key, Container::Array(lows).optimize());
            }
        }
        if let Some((key, lows)) = current {
            bitmap.push(key, Container::Array(lows).optimize());
        }
        bitmap
    }

    /// Appends a container after every existing key, skipping it if empty.
    pub(super) fn push(&mut self, key: V::Key, container: Container) {
        debug_assert!(self.keys.last().map_or(true, |&last| last < key));
        if !container.is_empty() {
            self.keys.push(key);
            self.containers.push(container);
        }
    }

    fn retain_non_empty(&mut self) {
        let keys = mem::take(&mut self.keys);
        let containers = mem::take(&mut self.containers);
        for (key, container) in keys.into_iter().zip(containers) {
            self.push(key, container);
        }
    }

    /// Add the integer element to the bitmap
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap = Bitmap::new();
    /// assert!(bitmap.is_empty());
    /// bitmap.add(1);
    /// assert!(!bitmap.is_empty());
    /// ```
    #[inline]
    pub fn add(&mut self, element: V) {
        self.add_checked(element);
    }

    /// Add the integer element to the bitmap. Returns true if the value was
    /// added, false if the value was already in the bitmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap = Bitmap::new();
    /// assert!(bitmap.add_checked(1));
    /// assert!(!bitmap.add_checked(1));
    /// ```
    pub fn add_checked(&mut self, element: V) -> bool {
        let (key, low) = element.split();
        match self.keys.binary_search(&key) {
            Ok(index) => self.containers[index].insert(low),
            Err(index) => {
                self.keys.insert(index, key);
                self.containers.insert(index, Container::Array(vec![low]));
                true
            }
        }
    }

    /// Add every element of the slice to the bitmap
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap = Bitmap::new();
    /// bitmap.add_many(&[1, 2, 3]);
    ///
    /// assert!(bitmap.contains(1));
    /// assert!(bitmap.contains(2));
    /// assert!(bitmap.contains(3));
    /// ```
    pub fn add_many(&mut self, elements: &[V]) {
        let other = Self::of(elements);
        self.or_inplace(&other);
    }

    /// Add all values in range
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap1 = Bitmap::new();
    /// bitmap1.add_range(1..3);
    ///
    /// assert!(bitmap1.contains(1));
    /// assert!(bitmap1.contains(2));
    /// assert!(!bitmap1.contains(3));
    ///
    /// let mut bitmap2 = Bitmap::new();
    /// bitmap2.add_range(3..1);
    /// assert!(bitmap2.is_empty());
    ///
    /// let mut bitmap3 = Bitmap::new();
    /// bitmap3.add_range(..=2);
    /// bitmap3.add_range(u32::MAX..=u32::MAX);
    /// assert!(bitmap3.contains(0));
    /// assert!(bitmap3.contains(u32::MAX));
    /// assert_eq!(bitmap3.cardinality(), 4);
    /// ```
    pub fn add_range<R: RangeBounds<V>>(&mut self, range: R) {
        let (start, end) = match range_to_inclusive(range) {
            Some(bounds) => bounds,
            None => return,
        };
        let mut span = Self::new();
        for (key, lo, hi) in key_spans(start, end) {
            span.push(key, Container::from_range(lo, hi).optimize());
        }
        self.or_inplace(&span);
    }

    /// Remove all values in range
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap = Bitmap::new();
    /// bitmap.add_range(1..4);
    ///
    /// bitmap.remove_range(1..3);
    ///
    /// assert!(!bitmap.contains(1));
    /// assert!(!bitmap.contains(2));
    /// assert!(bitmap.contains(3));
    /// ```
    pub fn remove_range<R: RangeBounds<V>>(&mut self, range: R) {
        let (start, end) = match range_to_inclusive(range) {
            Some(bounds) => bounds,
            None => return,
        };
        let (first_key, first_low) = start.split();
        let (last_key, last_low) = end.split();
        let from = self.keys.partition_point(|&key| key < first_key);
        let to = self.keys.partition_point(|&key| key <= last_key);
        for index in from..to {
            let key = self.keys[index];
            let lo = if key == first_key { first_low } else { 0 };
            let hi = if key == last_key { last_low } else { u16::MAX };
            self.containers[index].remove_range(lo, hi);
        }
        self.retain_non_empty();
    }

    /// Empties the bitmap
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap = Bitmap::of(&[1, 2, 3]);
    /// bitmap.clear();
    ///
    /// assert!(bitmap.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.keys.clear();
        self.containers.clear();
    }

    /// Remove the integer element from the bitmap
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap = Bitmap::new();
    /// bitmap.add(1);
    /// bitmap.remove(1);
    ///
    /// assert!(bitmap.is_empty());
    /// ```
    #[inline]
    pub fn remove(&mut self, element: V) {
        self.remove_checked(element);
    }

    /// Remove the integer element from the bitmap. Returns true if the value
    /// was removed, false if the value was not in the bitmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap = Bitmap::new();
    /// bitmap.add(1);
    /// assert!(bitmap.remove_checked(1));
    /// assert!(!bitmap.remove_checked(1));
    /// ```
    pub fn remove_checked(&mut self, element: V) -> bool {
        let (key, low) = element.split();
        let index = match self.keys.binary_search(&key) {
            Ok(index) => index,
            Err(_) => return false,
        };
        let removed = self.containers[index].remove(low);
        if self.containers[index].is_empty() {
            self.keys.remove(index);
            self.containers.remove(index);
        }
        removed
    }

    /// Contains returns true if the integer element is contained in the bitmap
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap = Bitmap::new();
    /// bitmap.add(1);
    ///
    /// assert!(bitmap.contains(1));
    /// assert!(!bitmap.contains(2));
    /// ```
    #[inline]
    pub fn contains(&self, element: V) -> bool {
        let (key, low) = element.split();
        match self.keys.binary_search(&key) {
            Ok(index) => self.containers[index].contains(low),
            Err(_) => false,
        }
    }

    /// Returns the number of integers contained in the bitmap
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap = Bitmap::new();
    /// bitmap.add(1);
    ///
    /// assert_eq!(bitmap.cardinality(), 1);
    ///
    /// bitmap.add(2);
    ///
    /// assert_eq!(bitmap.cardinality(), 2);
    /// ```
    #[inline]
    pub fn cardinality(&self) -> u64 {
        self.containers.iter().map(|c| u64::from(c.len())).sum()
    }

    /// Returns true if the Bitmap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the smallest value in the set, or `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap = Bitmap::of(&[120, 1000]);
    /// assert_eq!(bitmap.minimum(), Some(120));
    /// assert_eq!(Bitmap::new().minimum(), None);
    /// ```
    pub fn minimum(&self) -> Option<V> {
        let key = *self.keys.first()?;
        let low = self.containers.first()?.minimum()?;
        Some(V::join(key, low))
    }

    /// Returns the greatest value in the set, or `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap = Bitmap::of(&[120, 1000]);
    /// assert_eq!(bitmap.maximum(), Some(1000));
    /// ```
    pub fn maximum(&self) -> Option<V> {
        let key = *self.keys.last()?;
        let low = self.containers.last()?.maximum()?;
        Some(V::join(key, low))
    }

    /// Return true if all the elements of Self are in &other.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap1: Bitmap = (5..10).collect();
    /// let bitmap2: Bitmap = (5..8).collect();
    /// let bitmap3: Bitmap = (5..10).collect();
    /// let bitmap4: Bitmap = (9..11).collect();
    ///
    /// assert!(bitmap2.is_subset(&bitmap1));
    /// assert!(bitmap3.is_subset(&bitmap1));
    /// assert!(!bitmap4.is_subset(&bitmap1));
    /// ```
    pub fn is_subset(&self, other: &Self) -> bool {
        self.keys
            .iter()
            .zip(&self.containers)
            .all(|(key, container)| match other.keys.binary_search(key) {
                Ok(index) => container.intersect_len(&other.containers[index]) == container.len(),
                Err(_) => false,
            })
    }

    /// Returns a vector containing all of the integers stored in the Bitmap
    /// in sorted order.
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap = Bitmap::of(&[25, 15]);
    ///
    /// assert_eq!(bitmap.to_vec(), [15, 25]);
    /// ```
    pub fn to_vec(&self) -> Vec<V> {
        let mut values = Vec::with_capacity(self.cardinality() as usize);
        values.extend(self.iter());
        values
    }

    /// Returns an iterator over each value stored in the bitmap, in ascending order.
    #[inline]
    pub fn iter(&self) -> BitmapIterator<'_, V> {
        BitmapIterator::new(self)
    }

    /// Computes the intersection between two bitmaps and returns the result
    /// as a new bitmap
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap1 = Bitmap::of(&[1, 2, 3, 4]);
    /// let bitmap2 = Bitmap::of(&[2, 6, 7, 8]);
    ///
    /// let bitmap3 = bitmap1.and(&bitmap2);
    ///
    /// assert_eq!(bitmap3.to_vec(), [2]);
    /// ```
    #[inline]
    pub fn and(&self, other: &Self) -> Self {
        Self::merge(self.borrowed(), other, SetOp::And)
    }

    /// Computes the intersection between two bitmaps and stores the result
    /// in the current bitmap
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap1 = Bitmap::of(&[15]);
    /// let bitmap2 = Bitmap::of(&[25]);
    /// let mut bitmap3 = Bitmap::of(&[15]);
    /// let bitmap4 = Bitmap::of(&[15, 25]);
    ///
    /// bitmap1.and_inplace(&bitmap2);
    /// assert_eq!(bitmap1.cardinality(), 0);
    ///
    /// bitmap3.and_inplace(&bitmap4);
    /// assert_eq!(bitmap3.cardinality(), 1);
    /// ```
    #[inline]
    pub fn and_inplace(&mut self, other: &Self) {
        self.merge_inplace(other, SetOp::And);
    }

    /// Computes the union between two bitmaps and returns the result
    /// as a new bitmap
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap1 = Bitmap::of(&[1, 2, 3, 4]);
    /// let bitmap2 = Bitmap::of(&[2, 6, 7, 8]);
    ///
    /// assert_eq!(bitmap1.or(&bitmap2).cardinality(), 7);
    /// ```
    #[inline]
    pub fn or(&self, other: &Self) -> Self {
        Self::merge(self.borrowed(), other, SetOp::Or)
    }

    /// Computes the union between two bitmaps and stores the result in
    /// the current bitmap.
    #[inline]
    pub fn or_inplace(&mut self, other: &Self) {
        self.merge_inplace(other, SetOp::Or);
    }

    /// Computes the union between many bitmaps quickly, as opposed to having
    /// to call or repeatedly.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap1 = Bitmap::of(&[15]);
    /// let bitmap2 = Bitmap::of(&[25]);
    /// let bitmap3 = Bitmap::of(&[35]);
    ///
    /// let bitmap4 = Bitmap::fast_or(&[&bitmap1, &bitmap2, &bitmap3]);
    ///
    /// assert_eq!(bitmap4.to_vec(), [15, 25, 35]);
    /// assert!(Bitmap::fast_or(&[]).is_empty());
    /// ```
    pub fn fast_or(bitmaps: &[&Self]) -> Self {
        let mut result = Self::new();
        for bitmap in bitmaps {
            result.or_inplace(bitmap);
        }
        result
    }

    /// Computes the intersection of many bitmaps, stopping as soon as the
    /// running result is empty. The intersection of no bitmaps is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap1 = Bitmap::of(&[1, 2, 3, 4]);
    /// let bitmap2 = Bitmap::of(&[4]);
    /// let bitmap3 = Bitmap::of(&[4, 7]);
    ///
    /// let bitmap4 = Bitmap::fast_and(&[&bitmap1, &bitmap2, &bitmap3]);
    ///
    /// assert_eq!(bitmap4.to_vec(), [4]);
    /// assert!(Bitmap::fast_and(&[]).is_empty());
    /// ```
    pub fn fast_and(bitmaps: &[&Self]) -> Self {
        let (first, rest) = match bitmaps.split_first() {
            Some(split) => split,
            None => return Self::new(),
        };
        let mut result = (*first).clone();
        for bitmap in rest {
            if result.is_empty() {
                break;
            }
            result.and_inplace(bitmap);
        }
        result
    }

    /// Computes the symmetric difference (xor) between two bitmaps
    /// and returns a new bitmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap1 = Bitmap::of(&[15, 25]);
    /// let bitmap2 = Bitmap::of(&[25, 35]);
    ///
    /// assert_eq!(bitmap1.xor(&bitmap2).to_vec(), [15, 35]);
    /// ```
    #[inline]
    pub fn xor(&self, other: &Self) -> Self {
        Self::merge(self.borrowed(), other, SetOp::Xor)
    }

    /// Inplace version of xor, stores result in the current bitmap.
    #[inline]
    pub fn xor_inplace(&mut self, other: &Self) {
        self.merge_inplace(other, SetOp::Xor);
    }

    /// Computes the difference between two bitmaps and returns the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap1 = Bitmap::of(&[1, 2, 3, 4]);
    /// let bitmap2 = Bitmap::of(&[2, 6, 7, 8]);
    ///
    /// assert_eq!(bitmap1.andnot(&bitmap2).to_vec(), [1, 3, 4]);
    /// assert_eq!(bitmap2.andnot(&bitmap1).to_vec(), [6, 7, 8]);
    /// ```
    #[inline]
    pub fn andnot(&self, other: &Self) -> Self {
        Self::merge(self.borrowed(), other, SetOp::AndNot)
    }

    /// Computes the difference between two bitmaps and stores the result
    /// in the current bitmap.
    #[inline]
    pub fn andnot_inplace(&mut self, other: &Self) {
        self.merge_inplace(other, SetOp::AndNot);
    }

    fn borrowed(&self) -> impl Iterator<Item = (V::Key, Cow<'_, Container>)> {
        self.keys
            .iter()
            .copied()
            .zip(self.containers.iter().map(Cow::Borrowed))
    }

    fn merge_inplace(&mut self, other: &Self, op: SetOp) {
        let keys = mem::take(&mut self.keys);
        let containers = mem::take(&mut self.containers);
        let owned = keys.into_iter().zip(containers.into_iter().map(Cow::Owned));
        *self = Self::merge(owned, other, op);
    }

    /// Walks both key lists in ascending order, combining containers whose keys
    /// match and copying the rest through according to `op`.
    fn merge<'a>(
        left: impl Iterator<Item = (V::Key, Cow<'a, Container>)>,
        right: &Self,
        op: SetOp,
    ) -> Self {
        let mut result = Self::new();
        let mut left = left.peekable();
        let mut right = right.keys.iter().copied().zip(&right.containers).peekable();

        loop {
            let order = match (left.peek(), right.peek()) {
                (Some((l, _)), Some((r, _))) => l.cmp(r),
                (Some(_), None) if op.keeps_left() => Ordering::Less,
                (None, Some(_)) if op.keeps_right() => Ordering::Greater,
                _ => break,
            };
            match order {
                Ordering::Less => {
                    if let Some((key, container)) = left.next() {
                        if op.keeps_left() {
                            result.push(key, container.into_owned());
                        }
                    }
                }
                Ordering::Greater => {
                    if let Some((key, container)) = right.next() {
                        if op.keeps_right() {
                            result.push(key, container.clone());
                        }
                    }
                }
                Ordering::Equal => {
                    if let (Some((key, a)), Some((_, b))) = (left.next(), right.next()) {
                        result.push(key, a.apply(op, b));
                    }
                }
            }
        }
        result
    }

    /// Computes the intersection between two bitmaps and returns the result's
    /// cardinality without materializing it.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap1 = Bitmap::of(&[1, 2, 3, 4]);
    /// let bitmap2 = Bitmap::of(&[2, 6, 7, 8]);
    ///
    /// assert_eq!(bitmap1.and_cardinality(&bitmap2), 1);
    /// assert_eq!(bitmap1.or_cardinality(&bitmap2), 7);
    /// assert_eq!(bitmap1.xor_cardinality(&bitmap2), 6);
    /// assert_eq!(bitmap1.andnot_cardinality(&bitmap2), 3);
    /// ```
    pub fn and_cardinality(&self, other: &Self) -> u64 {
        let (mut i, mut j, mut total) = (0, 0, 0u64);
        while i < self.keys.len() && j < other.keys.len() {
            match self.keys[i].cmp(&other.keys[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    total += u64::from(self.containers[i].intersect_len(&other.containers[j]));
                    i += 1;
                    j += 1;
                }
            }
        }
        total
    }

    /// Computes the union between two bitmaps and returns the cardinality of
    /// the result.
    pub fn or_cardinality(&self, other: &Self) -> u64 {
        self.derived_cardinality(other, SetOp::Or)
    }

    /// Computes the symmetric difference (xor) between two bitmaps and returns
    /// the cardinality of the result.
    pub fn xor_cardinality(&self, other: &Self) -> u64 {
        self.derived_cardinality(other, SetOp::Xor)
    }

    /// Computes the difference between two bitmaps and returns the
    /// cardinality of the result.
    pub fn andnot_cardinality(&self, other: &Self) -> u64 {
        self.derived_cardinality(other, SetOp::AndNot)
    }

    fn derived_cardinality(&self, other: &Self, op: SetOp) -> u64 {
        op.result_len(
            self.cardinality(),
            other.cardinality(),
            self.and_cardinality(other),
        )
    }

    /// Re-encodes every container in its smallest encoding. Returns true if
    /// the result has at least one run container.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap = Bitmap::new();
    /// for i in 1..100 {
    ///     bitmap.add(i);
    /// }
    /// assert_eq!(bitmap.statistics().n_array_containers, 1);
    ///
    /// assert!(bitmap.run_optimize());
    /// assert_eq!(bitmap.statistics().n_run_containers, 1);
    /// ```
    pub fn run_optimize(&mut self) -> bool {
        let mut has_run = false;
        for container in &mut self.containers {
            container.optimize_in_place();
            has_run |= container.kind() == Kind::Run;
        }
        has_run
    }

    /// Returns statistics about the composition of a bitmap.
    ///
    /// Container counts describe the encodings currently held in memory;
    /// `n_bytes` is the size of the serialized form, which always uses the
    /// smallest encoding.
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap = Bitmap::new();
    /// for i in 1..100 {
    ///     bitmap.add(i);
    /// }
    ///
    /// let statistics = bitmap.statistics();
    ///
    /// assert_eq!(statistics.n_containers, 1);
    /// assert_eq!(statistics.n_array_containers, 1);
    /// assert_eq!(statistics.n_run_containers, 0);
    /// assert_eq!(statistics.n_bitset_containers, 0);
    /// assert_eq!(statistics.n_values_array_containers, 99);
    /// assert_eq!(statistics.n_bytes, 21);
    /// assert_eq!(statistics.min_value, Some(1));
    /// assert_eq!(statistics.max_value, Some(99));
    /// assert_eq!(statistics.cardinality, 99);
    /// ```
    pub fn statistics(&self) -> Statistics {
        let mut statistics = Statistics {
            n_containers: self.containers.len() as u32,
            n_bytes: self.get_serialized_size_in_bytes(),
            cardinality: self.cardinality(),
            min_value: self.minimum().map(V::to_u64),
            max_value: self.maximum().map(V::to_u64),
            ..Statistics::default()
        };
        for container in &self.containers {
            let len = u64::from(container.len());
            match container.kind() {
                Kind::Array => {
                    statistics.n_array_containers += 1;
                    statistics.n_values_array_containers += len;
                }
                Kind::Bitset => {
                    statistics.n_bitset_containers += 1;
                    statistics.n_values_bitset_containers += len;
                }
                Kind::Run => {
                    statistics.n_run_containers += 1;
                    statistics.n_values_run_containers += len;
                }
            }
        }
        statistics
    }
}

/// Splits `start..=end` into one `(key, lo, hi)` low range per container key.
fn key_spans<V: Value>(start: V, end: V) -> impl Iterator<Item = (V::Key, u16, u16)> {
    let (first_key, first_low) = start.split();
    let (last_key, last_low) = end.split();
    let first = V::key_to_u64(first_key);
    let last = V::key_to_u64(last_key);
    (first..=last).filter_map(move |raw| {
        let lo = if raw == first { first_low } else { 0 };
        let hi = if raw == last { last_low } else { u16::MAX };
        V::key_from_u64(raw).map(|key| (key, lo, hi))
    })
}

/// Returns `None` for an empty range.
fn range_to_inclusive<V: Value, R: RangeBounds<V>>(range: R) -> Option<(V, V)> {
    let start = match range.start_bound() {
        Bound::Included(&i) => i.to_u64(),
        Bound::Excluded(&i) => i.to_u64().checked_add(1)?,
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&i) => i.to_u64(),
        Bound::Excluded(&i) => i.to_u64().checked_sub(1)?,
        Bound::Unbounded => V::MAX.to_u64(),
    };
    if start > end {
        return None;
    }
    Some((V::from_u64(start)?, V::from_u64(end)?))
}
