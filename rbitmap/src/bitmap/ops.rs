use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Sub, SubAssign};

use crate::Value;

use super::RoaringBitmap;

impl<V: Value> fmt::Debug for RoaringBitmap<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.minimum(), self.maximum()) {
            (Some(min), Some(max)) if self.cardinality() >= 32 => write!(
                f,
                "{}<{:?} values between {:?} and {:?}>",
                V::TYPE_NAME,
                self.cardinality(),
                min,
                max
            ),
            _ => write!(f, "{}<{:?}>", V::TYPE_NAME, self.to_vec()),
        }
    }
}

impl<V: Value> Default for RoaringBitmap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Value> Clone for RoaringBitmap<V> {
    /// Create a copy of a Bitmap
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut bitmap1 = Bitmap::new();
    /// bitmap1.add(11);
    ///
    /// let bitmap2 = bitmap1.clone();
    ///
    /// assert_eq!(bitmap1, bitmap2);
    /// ```
    #[inline]
    fn clone(&self) -> Self {
        RoaringBitmap {
            keys: self.keys.clone(),
            containers: self.containers.clone(),
            marker: self.marker,
        }
    }
}

impl<V: Value> PartialEq for RoaringBitmap<V> {
    /// Set equality: container encodings are not compared.
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let mut added = Bitmap::new();
    /// for i in 0..100 {
    ///     added.add(i);
    /// }
    /// let ranged: Bitmap = (0..100).collect();
    ///
    /// assert_eq!(added, ranged);
    /// ```
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.containers == other.containers
    }
}

impl<V: Value> Eq for RoaringBitmap<V> {}

macro_rules! impl_binop {
    (impl $trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident => $op:ident, $op_inplace:ident) => {
        impl<V: Value> $trait for RoaringBitmap<V> {
            type Output = RoaringBitmap<V>;

            #[inline]
            fn $method(mut self, other: RoaringBitmap<V>) -> RoaringBitmap<V> {
                self.$op_inplace(&other);
                self
            }
        }

        impl<'a, V: Value> $trait<&'a RoaringBitmap<V>> for RoaringBitmap<V> {
            type Output = RoaringBitmap<V>;

            #[inline]
            fn $method(mut self, other: &'a RoaringBitmap<V>) -> RoaringBitmap<V> {
                self.$op_inplace(other);
                self
            }
        }

        impl<'a, 'b, V: Value> $trait<&'a RoaringBitmap<V>> for &'b RoaringBitmap<V> {
            type Output = RoaringBitmap<V>;

            #[inline]
            fn $method(self, other: &'a RoaringBitmap<V>) -> RoaringBitmap<V> {
                self.$op(other)
            }
        }

        impl<V: Value> $assign_trait for RoaringBitmap<V> {
            #[inline]
            fn $assign_method(&mut self, other: RoaringBitmap<V>) {
                self.$op_inplace(&other);
            }
        }

        impl<'a, V: Value> $assign_trait<&'a RoaringBitmap<V>> for RoaringBitmap<V> {
            #[inline]
            fn $assign_method(&mut self, other: &'a RoaringBitmap<V>) {
                self.$op_inplace(other);
            }
        }
    };
}

impl_binop!(impl BitAnd, bitand, BitAndAssign, bitand_assign => and, and_inplace);
impl_binop!(impl BitOr, bitor, BitOrAssign, bitor_assign => or, or_inplace);
impl_binop!(impl BitXor, bitxor, BitXorAssign, bitxor_assign => xor, xor_inplace);
impl_binop!(impl Sub, sub, SubAssign, sub_assign => andnot, andnot_inplace);
