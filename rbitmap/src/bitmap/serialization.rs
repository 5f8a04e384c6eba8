//! The blob format.
//!
//! ```text
//! magic    "RB"
//! width    u8        32 or 64
//! version  u8        1
//! count    u64       number of containers
//! count times, keys strictly ascending:
//!   key    u16 (width 32) or u64 (width 64, below 2^48)
//!   kind   u8        0 = array, 1 = bitset, 2 = run
//!   array  u16 n in 1..=4096, then n strictly ascending u16 values
//!   bitset 1024 u64 words, at least one bit set
//!   run    u16 r >= 1, then r pairs of (start, length - 1) u16 values
//! ```
//!
//! Every integer is little-endian. The encoder always writes the smallest
//! encoding of each container, so equal sets produce identical bytes.

use std::io::{self, Cursor, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::trace;

use crate::container::{
    is_strictly_sorted, Bitset, Container, Interval, Kind, ARRAY_MAX_LEN, BITSET_BYTES, BITSET_WORDS,
};
use crate::{FormatError, Value};

use super::RoaringBitmap;

const MAGIC: [u8; 2] = *b"RB";
const VERSION: u8 = 1;
const HEADER_BYTES: usize = MAGIC.len() + 1 + 1 + 8;

const KIND_ARRAY: u8 = 0;
const KIND_BITSET: u8 = 1;
const KIND_RUN: u8 = 2;

impl<V: Value> RoaringBitmap<V> {
    /// Computes the serialized size in bytes of the Bitmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::{Bitmap, Bitmap64};
    ///
    /// assert_eq!(Bitmap::new().get_serialized_size_in_bytes(), 12);
    /// // one array container holding two values
    /// assert_eq!(Bitmap::of(&[1, 5]).get_serialized_size_in_bytes(), 12 + 2 + 1 + 2 + 4);
    /// assert_eq!(Bitmap64::of(&[1, 5]).get_serialized_size_in_bytes(), 12 + 8 + 1 + 2 + 4);
    /// ```
    pub fn get_serialized_size_in_bytes(&self) -> usize {
        self.containers.iter().fold(HEADER_BYTES, |size, container| {
            let kind = container.canonical_kind();
            size + V::KEY_BYTES + 1 + payload_size(kind, container)
        })
    }

    /// Serializes a bitmap to a slice of bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let original_bitmap: Bitmap = (1..5).collect();
    ///
    /// let serialized_buffer = original_bitmap.serialize();
    ///
    /// let deserialized_bitmap = Bitmap::try_deserialize(&serialized_buffer).unwrap();
    ///
    /// assert_eq!(original_bitmap, deserialized_bitmap);
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let mut dst = Vec::new();
        self.serialize_into(&mut dst);
        dst
    }

    /// Serializes a bitmap, appending to `dst`, and returns the written bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap;
    ///
    /// let bitmap = Bitmap::of(&[1, 2, 3]);
    /// let mut data = b"prefix".to_vec();
    ///
    /// let written = bitmap.serialize_into(&mut data).to_vec();
    /// assert_eq!(written, bitmap.serialize());
    /// assert!(data.starts_with(b"prefix"));
    /// ```
    pub fn serialize_into<'a>(&self, dst: &'a mut Vec<u8>) -> &'a [u8] {
        let start = dst.len();
        let size = self.get_serialized_size_in_bytes();
        dst.reserve(size);

        let written = self.write_into(dst);
        debug_assert!(written.is_ok(), "writing into a Vec failed");
        debug_assert_eq!(dst.len() - start, size);

        &dst[start..]
    }

    /// Writes the serialized bitmap to `writer`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::Bitmap64;
    ///
    /// let bitmap = Bitmap64::of(&[1, 1 << 40]);
    /// let mut buffer = std::io::Cursor::new(Vec::new());
    ///
    /// bitmap.write_into(&mut buffer).unwrap();
    /// assert_eq!(buffer.into_inner(), bitmap.serialize());
    /// ```
    pub fn write_into<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&MAGIC)?;
        writer.write_u8(V::BITS)?;
        writer.write_u8(VERSION)?;
        writer.write_u64::<LittleEndian>(self.containers.len() as u64)?;

        for (&key, container) in self.keys.iter().zip(&self.containers) {
            let key = V::key_to_u64(key);
            if V::KEY_BYTES == 2 {
                writer.write_u16::<LittleEndian>(key as u16)?;
            } else {
                writer.write_u64::<LittleEndian>(key)?;
            }
            match &*container.canonical() {
                Container::Array(values) => {
                    writer.write_u8(KIND_ARRAY)?;
                    writer.write_u16::<LittleEndian>(values.len() as u16)?;
                    for &value in values {
                        writer.write_u16::<LittleEndian>(value)?;
                    }
                }
                Container::Bitset(bitset) => {
                    writer.write_u8(KIND_BITSET)?;
                    for &word in bitset.words().iter() {
                        writer.write_u64::<LittleEndian>(word)?;
                    }
                }
                Container::Run(intervals) => {
                    writer.write_u8(KIND_RUN)?;
                    writer.write_u16::<LittleEndian>(intervals.len() as u16)?;
                    for interval in intervals {
                        writer.write_u16::<LittleEndian>(interval.start)?;
                        writer.write_u16::<LittleEndian>(interval.end - interval.start)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Given a serialized bitmap as slice of bytes returns a bitmap instance.
    ///
    /// Every structural invariant is checked; a buffer written for the other
    /// width is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbitmap::{Bitmap, Bitmap64, FormatError};
    ///
    /// let original_bitmap: Bitmap = (1..5).collect();
    /// let serialized_buffer = original_bitmap.serialize();
    ///
    /// let deserialized_bitmap = Bitmap::try_deserialize(&serialized_buffer);
    /// assert_eq!(original_bitmap, deserialized_bitmap.unwrap());
    ///
    /// assert_eq!(Bitmap::try_deserialize(&[3]), Err(FormatError::Truncated));
    /// assert_eq!(
    ///     Bitmap64::try_deserialize(&serialized_buffer),
    ///     Err(FormatError::WidthMismatch { expected: 64, found: 32 })
    /// );
    /// ```
    pub fn try_deserialize(buffer: &[u8]) -> Result<Self, FormatError> {
        decode(buffer).map_err(|err| {
            trace!(
                "rejected {} blob of {} bytes: {}",
                V::TYPE_NAME,
                buffer.len(),
                err
            );
            err
        })
    }
}

fn payload_size(kind: Kind, container: &Container) -> usize {
    match kind {
        Kind::Array => 2 + 2 * container.len() as usize,
        Kind::Bitset => BITSET_BYTES,
        Kind::Run => 2 + 4 * container.count_runs(),
    }
}

fn decode<V: Value>(buffer: &[u8]) -> Result<RoaringBitmap<V>, FormatError> {
    let mut cursor = Cursor::new(buffer);

    let mut magic = [0; 2];
    magic[0] = cursor.read_u8()?;
    magic[1] = cursor.read_u8()?;
    if magic != MAGIC {
        return Err(FormatError::BadMagic);
    }
    let width = cursor.read_u8()?;
    if width != V::BITS {
        return Err(FormatError::WidthMismatch {
            expected: V::BITS,
            found: width,
        });
    }
    let version = cursor.read_u8()?;
    if version != VERSION {
        return Err(FormatError::UnsupportedVersion(version));
    }
    let count = cursor.read_u64::<LittleEndian>()?;

    let mut bitmap = RoaringBitmap::<V>::new();
    // smallest container: key, kind, one array value
    let smallest = V::KEY_BYTES + 1 + 4;
    let capacity = (count as usize).min(buffer.len() / smallest);
    bitmap.keys.reserve(capacity);
    bitmap.containers.reserve(capacity);

    for _ in 0..count {
        let raw_key = if V::KEY_BYTES == 2 {
            u64::from(cursor.read_u16::<LittleEndian>()?)
        } else {
            cursor.read_u64::<LittleEndian>()?
        };
        let key = V::key_from_u64(raw_key).ok_or(FormatError::KeyOutOfRange(raw_key))?;
        if bitmap.keys.last().map_or(false, |&last| last >= key) {
            return Err(FormatError::UnsortedKeys);
        }

        let container = match cursor.read_u8()? {
            KIND_ARRAY => read_array(&mut cursor)?,
            KIND_BITSET => read_bitset(&mut cursor)?,
            KIND_RUN => read_runs(&mut cursor)?,
            other => return Err(FormatError::InvalidContainerKind(other)),
        };
        bitmap.keys.push(key);
        bitmap.containers.push(container.optimize());
    }

    let trailing = buffer.len() - cursor.position() as usize;
    if trailing != 0 {
        return Err(FormatError::TrailingBytes(trailing));
    }
    Ok(bitmap)
}

fn read_array(cursor: &mut Cursor<&[u8]>) -> Result<Container, FormatError> {
    let len = usize::from(cursor.read_u16::<LittleEndian>()?);
    if len == 0 {
        return Err(FormatError::EmptyContainer);
    }
    if len > ARRAY_MAX_LEN {
        return Err(FormatError::InvalidContainer("array holds more than 4096 values"));
    }
    let mut values = vec![0; len];
    cursor.read_u16_into::<LittleEndian>(&mut values)?;
    if !is_strictly_sorted(&values) {
        return Err(FormatError::InvalidContainer("array values are not strictly ascending"));
    }
    Ok(Container::Array(values))
}

fn read_bitset(cursor: &mut Cursor<&[u8]>) -> Result<Container, FormatError> {
    let mut words = Box::new([0u64; BITSET_WORDS]);
    cursor.read_u64_into::<LittleEndian>(&mut words[..])?;
    let bitset = Bitset::from_words(words);
    if bitset.len() == 0 {
        return Err(FormatError::EmptyContainer);
    }
    Ok(Container::Bitset(bitset))
}

fn read_runs(cursor: &mut Cursor<&[u8]>) -> Result<Container, FormatError> {
    let count = usize::from(cursor.read_u16::<LittleEndian>()?);
    if count == 0 {
        return Err(FormatError::EmptyContainer);
    }
    let mut intervals: Vec<Interval> = Vec::with_capacity(count);
    for _ in 0..count {
        let start = cursor.read_u16::<LittleEndian>()?;
        let length = cursor.read_u16::<LittleEndian>()?;
        let end = start
            .checked_add(length)
            .ok_or(FormatError::InvalidContainer("run extends past 65535"))?;
        if let Some(last) = intervals.last() {
            if u32::from(start) <= u32::from(last.end) + 1 {
                return Err(FormatError::InvalidContainer(
                    "runs overlap, touch or are out of order",
                ));
            }
        }
        intervals.push(Interval::new(start, end));
    }
    Ok(Container::Run(intervals))
}
