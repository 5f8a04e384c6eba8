use std::u32;

use proptest::prelude::*;
use rbitmap::{Bitmap, FormatError};

// borrowed and adapted from https://github.com/Nemo157/roaring-rs/blob/5089f180ca7e17db25f5c58023f4460d973e747f/tests/lib.rs#L7-L37
#[test]
fn smoke1() {
    let mut bitmap = Bitmap::create();
    assert_eq!(bitmap.cardinality(), 0);
    assert!(bitmap.is_empty());
    bitmap.remove(0);
    assert_eq!(bitmap.cardinality(), 0);
    assert!(bitmap.is_empty());
    bitmap.add(1);
    assert!(bitmap.contains(1));
    assert_eq!(bitmap.cardinality(), 1);
    assert!(!bitmap.is_empty());
    bitmap.add(u32::MAX - 2);
    assert!(bitmap.contains(u32::MAX - 2));
    assert_eq!(bitmap.cardinality(), 2);
    bitmap.add(u32::MAX);
    assert!(bitmap.contains(u32::MAX));
    assert_eq!(bitmap.cardinality(), 3);
    bitmap.add(2);
    assert!(bitmap.contains(2));
    assert_eq!(bitmap.cardinality(), 4);
    bitmap.remove(2);
    assert!(!bitmap.contains(2));
    assert_eq!(bitmap.cardinality(), 3);
    assert!(!bitmap.contains(0));
    assert!(bitmap.contains(1));
    assert!(!bitmap.contains(100));
    assert!(bitmap.contains(u32::MAX - 2));
    assert!(!bitmap.contains(u32::MAX - 1));
    assert!(bitmap.contains(u32::MAX));
    bitmap.clear();
    assert_eq!(bitmap.cardinality(), 0);
    assert!(bitmap.is_empty());
}

// borrowed and adapted from https://github.com/RoaringBitmap/gocroaring/blob/4a2fc02f79b1c36b904301e7d052f7f0017b6973/gocroaring_test.go#L24-L64
#[test]
fn smoke2() {
    let mut rb1 = Bitmap::create();
    rb1.add(1);
    rb1.add(2);
    rb1.add(3);
    rb1.add(4);
    rb1.add(5);
    rb1.add(100);
    rb1.add(1000);
    rb1.run_optimize();

    let mut rb2 = Bitmap::create();
    rb2.add(3);
    rb2.add(4);
    rb2.add(1000);
    rb2.run_optimize();

    let mut rb3 = Bitmap::create();

    assert_eq!(rb1.cardinality(), 7);
    assert!(rb1.contains(3));

    rb1.and_inplace(&rb2);
    rb3.add(5);
    rb3.or_inplace(&rb1);

    let rb4 = Bitmap::fast_or(&[&rb1, &rb2, &rb3]);
    assert_eq!(rb4.to_vec(), [3, 4, 5, 1000]);

    rb1.and_inplace(&rb2);
    assert_eq!(rb1.to_vec(), [3, 4, 1000]);

    rb3.add(5);
    rb3.or_inplace(&rb1);
    assert_eq!(rb3, rb4);
}

#[test]
fn scenarios() {
    assert_eq!(Bitmap::of(&[1, 2, 3, 7]).cardinality(), 4);

    let mut bitmap = Bitmap::of(&[1, 2, 3, 4]);
    bitmap.add(4);
    assert_eq!(bitmap.cardinality(), 4);

    let a = Bitmap::of(&[1, 2, 3, 4]);
    let b = Bitmap::of(&[2, 6, 7, 8]);
    assert_eq!(a.and(&b).to_vec(), [2]);
    assert_eq!(a.or(&b).cardinality(), 7);
    assert_eq!(a.xor(&b).cardinality(), 6);
    assert_eq!(a.andnot(&b).to_vec(), [1, 3, 4]);

    let rows = [
        Bitmap::of(&[1, 2, 3, 4]),
        Bitmap::of(&[4]),
        Bitmap::of(&[4, 7]),
    ];
    let rows: Vec<&Bitmap> = rows.iter().collect();
    assert_eq!(Bitmap::fast_and(&rows).to_vec(), [4]);
    assert_eq!(Bitmap::fast_or(&rows).to_vec(), [1, 2, 3, 4, 7]);
}

#[test]
fn ranges_span_containers() {
    let mut bitmap = Bitmap::new();
    bitmap.add_range(65_000..=200_000);
    assert_eq!(bitmap.cardinality(), 135_001);
    assert_eq!(bitmap.minimum(), Some(65_000));
    assert_eq!(bitmap.maximum(), Some(200_000));
    assert_eq!(bitmap.statistics().n_containers, 4);

    bitmap.remove_range(65_536..131_072);
    assert_eq!(bitmap.cardinality(), 135_001 - 65_536);
    assert_eq!(bitmap.statistics().n_containers, 3);
    assert!(!bitmap.contains(100_000));
    assert!(bitmap.contains(65_535));
    assert!(bitmap.contains(131_072));

    bitmap.remove_range(..);
    assert!(bitmap.is_empty());

    bitmap.add_range(u32::MAX - 1..);
    assert_eq!(bitmap.to_vec(), [u32::MAX - 1, u32::MAX]);
}

#[test]
fn full_container_is_one_run() {
    let mut bitmap = Bitmap::new();
    bitmap.add_range(0..=0xFFFF);
    let statistics = bitmap.statistics();
    assert_eq!(statistics.n_run_containers, 1);
    assert_eq!(statistics.n_bytes, 12 + 2 + 1 + 2 + 4);

    bitmap.remove(0x8000);
    assert_eq!(bitmap.cardinality(), 0xFFFF);
    let restored = Bitmap::try_deserialize(&bitmap.serialize()).unwrap();
    assert_eq!(restored, bitmap);
    assert!(!restored.contains(0x8000));
}

#[test]
fn decoding_garbage_fails() {
    assert_eq!(Bitmap::try_deserialize(b""), Err(FormatError::Truncated));
    assert_eq!(Bitmap::try_deserialize(b"not a bitmap"), Err(FormatError::BadMagic));
}

fn values() -> impl Strategy<Value = Vec<u32>> {
    prop_oneof![
        prop::collection::vec(proptest::num::u32::ANY, 0..2000),
        prop::collection::vec(0u32..200_000, 0..6000),
        (0u32..300_000, 1u32..150_000, prop::collection::vec(0u32..500_000, 0..100)).prop_map(
            |(start, len, mut noise)| {
                noise.extend(start..start + len);
                noise
            }
        ),
    ]
}

fn oracle(values: &[u32]) -> roaring::RoaringBitmap {
    values.iter().copied().collect()
}

proptest! {
    #[test]
    fn bitmap_cardinality_roundtrip(
        indices in prop::collection::vec(proptest::num::u32::ANY, 1..3000)
    ) {
        let original = Bitmap::of(&indices);
        let mut a = indices;
        a.sort_unstable();
        a.dedup();
        prop_assert_eq!(a.len(), original.cardinality() as usize);
        prop_assert_eq!(a, original.to_vec());
    }

    #[test]
    fn set_operations_match_oracle(a in values(), b in values()) {
        let (x, y) = (Bitmap::of(&a), Bitmap::of(&b));
        let (ox, oy) = (oracle(&a), oracle(&b));

        prop_assert!(x.and(&y).iter().eq((&ox & &oy).iter()));
        prop_assert!(x.or(&y).iter().eq((&ox | &oy).iter()));
        prop_assert!(x.xor(&y).iter().eq((&ox ^ &oy).iter()));
        prop_assert!(x.andnot(&y).iter().eq((&ox - &oy).iter()));

        prop_assert_eq!(x.and_cardinality(&y), ox.intersection_len(&oy));
        prop_assert_eq!(x.or_cardinality(&y), ox.union_len(&oy));
        prop_assert_eq!(x.xor_cardinality(&y), ox.symmetric_difference_len(&oy));
        prop_assert_eq!(x.andnot_cardinality(&y), ox.difference_len(&oy));
        prop_assert_eq!(x.is_subset(&y), ox.is_subset(&oy));
    }

    #[test]
    fn inplace_matches_allocating(a in values(), b in values()) {
        let (x, y) = (Bitmap::of(&a), Bitmap::of(&b));

        let mut z = x.clone();
        z.and_inplace(&y);
        prop_assert_eq!(&z, &x.and(&y));

        let mut z = x.clone();
        z.or_inplace(&y);
        prop_assert_eq!(&z, &x.or(&y));

        let mut z = x.clone();
        z.xor_inplace(&y);
        prop_assert_eq!(&z, &x.xor(&y));

        let mut z = x.clone();
        z.andnot_inplace(&y);
        prop_assert_eq!(&z, &x.andnot(&y));
    }

    #[test]
    fn inclusion_exclusion(a in values(), b in values()) {
        let (x, y) = (Bitmap::of(&a), Bitmap::of(&b));
        prop_assert_eq!(
            x.and(&y).cardinality(),
            x.cardinality() + y.cardinality() - x.or(&y).cardinality()
        );
    }

    #[test]
    fn operations_commute_and_associate(a in values(), b in values(), c in values()) {
        let (x, y, z) = (Bitmap::of(&a), Bitmap::of(&b), Bitmap::of(&c));

        prop_assert_eq!(x.and(&y), y.and(&x));
        prop_assert_eq!(x.or(&y), y.or(&x));
        prop_assert_eq!(x.xor(&y), y.xor(&x));

        prop_assert_eq!(x.and(&y).and(&z), x.and(&y.and(&z)));
        prop_assert_eq!(x.or(&y).or(&z), x.or(&y.or(&z)));
        prop_assert_eq!(x.xor(&y).xor(&z), x.xor(&y.xor(&z)));
    }

    #[test]
    fn andnot_partitions_union(a in values(), b in values()) {
        let (x, y) = (Bitmap::of(&a), Bitmap::of(&b));
        let left = x.andnot(&y);
        let both = x.and(&y);
        let right = y.andnot(&x);

        prop_assert!(left.and(&both).is_empty());
        prop_assert!(left.and(&right).is_empty());
        prop_assert!(both.and(&right).is_empty());
        prop_assert_eq!(Bitmap::fast_or(&[&left, &both, &right]), x.or(&y));
    }

    #[test]
    fn test_bitmap_serialization_roundtrip(indices in values()) {
        let original = Bitmap::of(&indices);

        let buffer = original.serialize();
        prop_assert_eq!(buffer.len(), original.get_serialized_size_in_bytes());

        let deserialized = Bitmap::try_deserialize(&buffer).unwrap();

        prop_assert_eq!(&original, &deserialized);
        prop_assert_eq!(buffer, deserialized.serialize());
    }

    #[test]
    fn serialization_ignores_history(indices in values(), removed in values()) {
        let mut incremental = Bitmap::new();
        for &i in &indices {
            incremental.add(i);
        }
        for &i in &removed {
            incremental.remove(i);
        }
        let direct = Bitmap::of(&indices).andnot(&Bitmap::of(&removed));

        prop_assert_eq!(incremental.serialize(), direct.serialize());
    }

    #[test]
    fn add_and_remove_are_idempotent(indices in values(), value in proptest::num::u32::ANY) {
        let mut bitmap = Bitmap::of(&indices);

        bitmap.add(value);
        let once = bitmap.clone();
        prop_assert!(!bitmap.add_checked(value));
        prop_assert_eq!(&bitmap, &once);

        bitmap.remove(value);
        let once = bitmap.clone();
        prop_assert!(!bitmap.remove_checked(value));
        prop_assert_eq!(&bitmap, &once);
        prop_assert!(!bitmap.contains(value));
    }
}
