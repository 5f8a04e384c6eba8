//! Roaring bitmaps over 32-bit and 64-bit unsigned integers.
//!
//! Both widths share one implementation, [`RoaringBitmap`], and differ only in
//! how a member is split into a container key and a 16-bit low half. Bitmaps
//! serialize to a self-describing blob that records the width, so a blob
//! written by one width is never accepted by the other.
//!
//! ```rust
//! use rbitmap::{Bitmap, Bitmap64};
//!
//! let a = Bitmap::of(&[1, 2, 3, 4]);
//! let b = Bitmap::of(&[2, 6, 7, 8]);
//!
//! assert_eq!((&a & &b).to_vec(), [2]);
//! assert_eq!(a.or_cardinality(&b), 7);
//!
//! let blob = a.serialize();
//! assert_eq!(Bitmap::try_deserialize(&blob).unwrap(), a);
//! assert!(Bitmap64::try_deserialize(&blob).is_err());
//! ```

pub mod bitmap;
mod container;
mod error;
mod value;

pub use bitmap::{BitmapIterator, RoaringBitmap, Statistics};
pub use error::FormatError;
pub use value::Value;

/// A compressed bitmap of `u32` members
pub type Bitmap = RoaringBitmap<u32>;

/// A compressed bitmap of `u64` members
pub type Bitmap64 = RoaringBitmap<u64>;
