//! Member widths a bitmap can be instantiated over.
//!
//! A member is split into a high-order key, which selects a container, and a
//! 16-bit low half stored inside that container. Only the split differs between
//! widths; every container and merge algorithm is shared.

use std::fmt;

mod sealed {
    pub trait Sealed {}

    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// An unsigned integer type that can be stored in a [`RoaringBitmap`](crate::RoaringBitmap).
///
/// Implemented for `u32` and `u64` only.
pub trait Value: sealed::Sealed + Copy + Ord + fmt::Debug + Send + Sync + 'static {
    /// The high-order part of a member: every bit above the low 16.
    type Key: Copy + Ord + fmt::Debug + Send + Sync + 'static;

    /// Member width in bits, also used as the width tag of the blob format.
    const BITS: u8;

    /// Number of bytes a key occupies in the blob format.
    const KEY_BYTES: usize;

    /// Name used by the `Debug` output of bitmaps of this width.
    const TYPE_NAME: &'static str;

    /// The largest member.
    const MAX: Self;

    /// Largest key a member of this width can produce.
    const MAX_KEY: u64;

    /// Splits a member into its key and low 16 bits.
    fn split(self) -> (Self::Key, u16);

    /// Inverse of [`Value::split`].
    fn join(key: Self::Key, low: u16) -> Self;

    fn key_to_u64(key: Self::Key) -> u64;

    /// Returns `None` if `key` is above [`Value::MAX_KEY`].
    fn key_from_u64(key: u64) -> Option<Self::Key>;

    fn to_u64(self) -> u64;

    /// Returns `None` if `value` does not fit this width.
    fn from_u64(value: u64) -> Option<Self>;
}

impl Value for u32 {
    type Key = u16;

    const BITS: u8 = 32;
    const KEY_BYTES: usize = 2;
    const TYPE_NAME: &'static str = "Bitmap";
    const MAX: Self = u32::MAX;
    const MAX_KEY: u64 = u16::MAX as u64;

    #[inline]
    fn split(self) -> (u16, u16) {
        ((self >> 16) as u16, self as u16)
    }

    #[inline]
    fn join(key: u16, low: u16) -> u32 {
        (u32::from(key) << 16) | u32::from(low)
    }

    #[inline]
    fn key_to_u64(key: u16) -> u64 {
        u64::from(key)
    }

    #[inline]
    fn key_from_u64(key: u64) -> Option<u16> {
        u16::try_from(key).ok()
    }

    #[inline]
    fn to_u64(self) -> u64 {
        u64::from(self)
    }

    #[inline]
    fn from_u64(value: u64) -> Option<u32> {
        u32::try_from(value).ok()
    }
}

impl Value for u64 {
    type Key = u64;

    const BITS: u8 = 64;
    const KEY_BYTES: usize = 8;
    const TYPE_NAME: &'static str = "Bitmap64";
    const MAX: Self = u64::MAX;
    const MAX_KEY: u64 = u64::MAX >> 16;

    #[inline]
    fn split(self) -> (u64, u16) {
        (self >> 16, self as u16)
    }

    #[inline]
    fn join(key: u64, low: u16) -> u64 {
        (key << 16) | u64::from(low)
    }

    #[inline]
    fn key_to_u64(key: u64) -> u64 {
        key
    }

    #[inline]
    fn key_from_u64(key: u64) -> Option<u64> {
        (key <= Self::MAX_KEY).then_some(key)
    }

    #[inline]
    fn to_u64(self) -> u64 {
        self
    }

    #[inline]
    fn from_u64(value: u64) -> Option<u64> {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Value;

    #[test]
    fn split_join_32() {
        for v in [0u32, 1, 0xFFFF, 0x1_0000, 0xDEAD_BEEF, u32::MAX] {
            let (key, low) = v.split();
            assert_eq!(u32::join(key, low), v);
        }
        assert_eq!(0x0001_0002u32.split(), (1, 2));
    }

    #[test]
    fn split_join_64() {
        for v in [0u64, 1, 0xFFFF, 1 << 32, u64::MAX - 1, u64::MAX] {
            let (key, low) = v.split();
            assert_eq!(u64::join(key, low), v);
            assert!(key <= u64::MAX_KEY);
        }
        assert_eq!(u64::key_from_u64(u64::MAX_KEY + 1), None);
    }
}
