use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use libfuzzer_sys::arbitrary::{self, Arbitrary, Unstructured};
use rbitmap::Bitmap;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Num(pub u32);

pub const MAX_NUM: u32 = 0x1_0000 * 4;

impl<'a> Arbitrary<'a> for Num {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self(u.int_in_range(0..=(MAX_NUM - 1))?))
    }
}

#[derive(Arbitrary, Debug)]
pub enum MutableBitmapOperation {
    Add(Num),
    AddChecked(Num),
    AddMany(Vec<Num>),
    AddRange(RangeInclusive<Num>),
    RemoveRange(RangeInclusive<Num>),
    Clear,
    Remove(Num),
    RemoveChecked(Num),
    RunOptimize,
    // Dense enough to need a bitset
    MakeBitmap { key: u16 },
    MakeRange { key: u16 },
}

#[derive(Arbitrary, Debug)]
pub enum ReadBitmapOp {
    Contains(Num),
    Cardinality,
    ToVec,
    GetSerializedSizeInBytes,
    IsEmpty,
    Minimum,
    Maximum,
    Statistics,
    Clone,
    Debug,
}

#[derive(Arbitrary, Debug)]
pub enum BitmapCompOperation {
    Eq,
    IsSubset,
    And,
    Or,
    Xor,
    AndNot,
}

fn make_bitmap_range(key: u16) -> Option<RangeInclusive<u32>> {
    (u32::from(key) < MAX_NUM / 0x1_0000).then(|| {
        let start = u32::from(key) * 0x1_0000;
        start..=start + 9 * 1024
    })
}

fn make_range(key: u16) -> Option<RangeInclusive<u32>> {
    (u32::from(key) < MAX_NUM / 0x1_0000).then(|| {
        let start = u32::from(key) * 0x1_0000;
        start..=start + 0xFFFF
    })
}

impl MutableBitmapOperation {
    pub fn on_roaring(&self, b: &mut Bitmap) {
        match *self {
            MutableBitmapOperation::Add(i) => {
                b.add(i.0);
            }
            MutableBitmapOperation::AddChecked(i) => {
                b.add_checked(i.0);
            }
            MutableBitmapOperation::AddMany(ref items) => {
                let items: Vec<u32> = items.iter().map(|i| i.0).collect();
                b.add_many(&items);
            }
            MutableBitmapOperation::AddRange(ref r) => {
                b.add_range(r.start().0..=r.end().0);
            }
            MutableBitmapOperation::RemoveRange(ref r) => {
                b.remove_range(r.start().0..=r.end().0);
            }
            MutableBitmapOperation::Clear => {
                b.clear();
            }
            MutableBitmapOperation::Remove(i) => {
                b.remove(i.0);
            }
            MutableBitmapOperation::RemoveChecked(i) => {
                b.remove_checked(i.0);
            }
            MutableBitmapOperation::RunOptimize => {
                b.run_optimize();
            }
            MutableBitmapOperation::MakeBitmap { key } => {
                if let Some(range) = make_bitmap_range(key) {
                    for i in range.step_by(2) {
                        b.add(i);
                    }
                }
            }
            MutableBitmapOperation::MakeRange { key } => {
                if let Some(range) = make_range(key) {
                    b.add_range(range);
                }
            }
        }
    }

    pub fn on_model(&self, m: &mut BTreeSet<u32>) {
        match *self {
            MutableBitmapOperation::Add(i) | MutableBitmapOperation::AddChecked(i) => {
                m.insert(i.0);
            }
            MutableBitmapOperation::AddMany(ref items) => {
                m.extend(items.iter().map(|i| i.0));
            }
            MutableBitmapOperation::AddRange(ref r) => {
                m.extend(r.start().0..=r.end().0);
            }
            MutableBitmapOperation::RemoveRange(ref r) => {
                m.retain(|i| !(r.start().0..=r.end().0).contains(i));
            }
            MutableBitmapOperation::Clear => {
                m.clear();
            }
            MutableBitmapOperation::Remove(i) | MutableBitmapOperation::RemoveChecked(i) => {
                m.remove(&i.0);
            }
            MutableBitmapOperation::RunOptimize => {}
            MutableBitmapOperation::MakeBitmap { key } => {
                if let Some(range) = make_bitmap_range(key) {
                    m.extend(range.step_by(2));
                }
            }
            MutableBitmapOperation::MakeRange { key } => {
                if let Some(range) = make_range(key) {
                    m.extend(range);
                }
            }
        }
    }
}

impl BitmapCompOperation {
    pub fn on_roaring(&self, lhs: &mut Bitmap, rhs: &Bitmap) {
        match *self {
            BitmapCompOperation::Eq => {
                let _ = lhs == rhs;
            }
            BitmapCompOperation::IsSubset => {
                assert_eq!(lhs.is_subset(rhs), lhs.and_cardinality(rhs) == lhs.cardinality());
            }
            BitmapCompOperation::And => {
                assert_eq!(lhs.and(rhs).cardinality(), lhs.and_cardinality(rhs));
                lhs.and_inplace(rhs);
            }
            BitmapCompOperation::Or => {
                assert_eq!(lhs.or(rhs).cardinality(), lhs.or_cardinality(rhs));
                lhs.or_inplace(rhs);
            }
            BitmapCompOperation::Xor => {
                assert_eq!(lhs.xor(rhs).cardinality(), lhs.xor_cardinality(rhs));
                lhs.xor_inplace(rhs);
            }
            BitmapCompOperation::AndNot => {
                assert_eq!(lhs.andnot(rhs).cardinality(), lhs.andnot_cardinality(rhs));
                lhs.andnot_inplace(rhs);
            }
        }
    }

    pub fn on_model(&self, lhs: &mut BTreeSet<u32>, rhs: &BTreeSet<u32>) {
        match *self {
            BitmapCompOperation::Eq | BitmapCompOperation::IsSubset => {}
            BitmapCompOperation::And => {
                *lhs = &*lhs & rhs;
            }
            BitmapCompOperation::Or => {
                *lhs = &*lhs | rhs;
            }
            BitmapCompOperation::Xor => {
                *lhs = &*lhs ^ rhs;
            }
            BitmapCompOperation::AndNot => {
                *lhs = &*lhs - rhs;
            }
        }
    }
}

impl ReadBitmapOp {
    pub fn on_both(&self, b: &Bitmap, m: &BTreeSet<u32>) {
        match *self {
            ReadBitmapOp::Contains(i) => {
                assert_eq!(m.contains(&i.0), b.contains(i.0));
            }
            ReadBitmapOp::Cardinality => {
                assert_eq!(m.len() as u64, b.cardinality());
            }
            ReadBitmapOp::ToVec => {
                assert!(b.to_vec().into_iter().eq(m.iter().copied()));
            }
            ReadBitmapOp::GetSerializedSizeInBytes => {
                assert_eq!(b.get_serialized_size_in_bytes(), b.serialize().len());
            }
            ReadBitmapOp::IsEmpty => {
                assert_eq!(m.is_empty(), b.is_empty());
            }
            ReadBitmapOp::Minimum => {
                assert_eq!(m.first().copied(), b.minimum());
            }
            ReadBitmapOp::Maximum => {
                assert_eq!(m.last().copied(), b.maximum());
            }
            ReadBitmapOp::Statistics => {
                let statistics = b.statistics();
                assert_eq!(statistics.cardinality, b.cardinality());
            }
            ReadBitmapOp::Clone => {
                assert_eq!(&b.clone(), b);
            }
            ReadBitmapOp::Debug => {
                use std::io::Write;
                write!(std::io::sink(), "{:?}", b).unwrap();
            }
        }
    }
}
