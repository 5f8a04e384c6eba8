use std::iter::{FromIterator, IntoIterator};
use std::slice;

use crate::container::{self, Container};
use crate::Value;

use super::RoaringBitmap;

/// Ascending iterator over the members of a bitmap.
#[derive(Clone)]
pub struct BitmapIterator<'a, V: Value> {
    keys: slice::Iter<'a, V::Key>,
    containers: slice::Iter<'a, Container>,
    current: Option<(V::Key, container::Iter<'a>)>,
}

impl<'a, V: Value> BitmapIterator<'a, V> {
    pub(super) fn new(bitmap: &'a RoaringBitmap<V>) -> Self {
        BitmapIterator {
            keys: bitmap.keys.iter(),
            containers: bitmap.containers.iter(),
            current: None,
        }
    }
}

impl<V: Value> Iterator for BitmapIterator<'_, V> {
    type Item = V;

    #[inline]
    fn next(&mut self) -> Option<V> {
        loop {
            if let Some((key, values)) = &mut self.current {
                if let Some(low) = values.next() {
                    return Some(V::join(*key, low));
                }
            }
            let key = *self.keys.next()?;
            let container = self.containers.next()?;
            self.current = Some((key, container.iter()));
        }
    }
}

impl<'a, V: Value> IntoIterator for &'a RoaringBitmap<V> {
    type Item = V;
    type IntoIter = BitmapIterator<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: Value> FromIterator<V> for RoaringBitmap<V> {
    /// Convenience method for creating bitmap from an iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap: Bitmap = (1..3).collect();
    ///
    /// assert!(!bitmap.is_empty());
    /// assert!(bitmap.contains(1));
    /// assert!(bitmap.contains(2));
    /// assert_eq!(bitmap.cardinality(), 2);
    /// ```
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut values: Vec<V> = iter.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        RoaringBitmap::from_sorted(values)
    }
}

impl<V: Value> Extend<V> for RoaringBitmap<V> {
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap = Bitmap::of(&[1]);
    /// bitmap.extend([3, 2, 1]);
    ///
    /// assert_eq!(bitmap.to_vec(), [1, 2, 3]);
    /// ```
    fn extend<T: IntoIterator<Item = V>>(&mut self, iter: T) {
        let values: Vec<V> = iter.into_iter().collect();
        self.add_many(&values);
    }
}
