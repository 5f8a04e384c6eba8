//! Compressed bitmaps over unsigned integers.
//!
//! A [`RoaringBitmap`] splits each member into a high-order key and a 16-bit low
//! half. Members sharing a key live in one container, and containers are kept in
//! ascending key order with no empty container ever stored.
//!
//! # Example
//!
//! ```rust
//! use rbitmap::Bitmap;
//!
//! let mut rb1 = Bitmap::new();
//! rb1.add(1);
//! rb1.add(2);
//! rb1.add(3);
//! rb1.add(4);
//! rb1.add(5);
//! rb1.add(100);
//! rb1.add(1000);
//! rb1.run_optimize();
//!
//! let mut rb2 = Bitmap::new();
//! rb2.add(3);
//! rb2.add(4);
//! rb2.add(1000);
//!
//! let mut rb3 = Bitmap::new();
//!
//! assert_eq!(rb1.cardinality(), 7);
//! assert!(rb1.contains(3));
//!
//! rb1.and_inplace(&rb2);
//! rb3.add(5);
//! rb3.or_inplace(&rb1);
//!
//! let rb4 = Bitmap::fast_or(&[&rb1, &rb2, &rb3]);
//!
//! assert_eq!(rb3.to_vec(), [3, 4, 5, 1000]);
//! assert_eq!(rb4, rb3);
//! println!("{:?}", rb4);
//! ```

use std::marker::PhantomData;

use crate::container::Container;
use crate::Value;

/// A compressed set of `V` values.
///
/// Use the [`Bitmap`](crate::Bitmap) and [`Bitmap64`](crate::Bitmap64) aliases
/// rather than naming the width directly.
pub struct RoaringBitmap<V: Value> {
    keys: Vec<V::Key>,
    containers: Vec<Container>,
    marker: PhantomData<V>,
}

/// Detailed statistics on the composition of a bitmap
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub n_containers: u32,
    pub n_array_containers: u32,
    pub n_run_containers: u32,
    pub n_bitset_containers: u32,
    pub n_values_array_containers: u64,
    pub n_values_run_containers: u64,
    pub n_values_bitset_containers: u64,
    /// Size of [`RoaringBitmap::serialize`] output.
    pub n_bytes: usize,
    pub cardinality: u64,
    pub min_value: Option<u64>,
    pub max_value: Option<u64>,
}

mod imp;
mod iter;
mod ops;
mod serialization;

pub use self::iter::BitmapIterator;
