use std::collections::BTreeSet;

use proptest::prelude::*;
use rbitmap::{Bitmap64, FormatError};

fn expected_bitmap() -> Bitmap64 {
    let mut bitmap = Bitmap64::new();

    for i in 0..2u64 {
        let base = i << 32;
        // Range container
        bitmap.add_range(base | 0x0_0000..=base | 0x0_9000);
        bitmap.add_range(base | 0x0_A000..=base | 0x1_0000);
        // Array container
        bitmap.add(base | 0x2_0000);
        bitmap.add(base | 0x2_0005);
        // Bitmap container
        for j in (0..0x1_0000).step_by(2) {
            bitmap.add(base | 0x80000 + j);
        }
    }
    bitmap
}

#[test]
fn mixed_containers_roundtrip() {
    let bitmap = expected_bitmap();
    let statistics = bitmap.statistics();
    assert_eq!(statistics.n_containers, 8);
    assert_eq!(statistics.n_bitset_containers, 2);

    let buffer = bitmap.serialize();
    let restored = Bitmap64::try_deserialize(&buffer).unwrap();
    assert_eq!(restored, bitmap);
    assert!(restored.iter().eq(bitmap.iter()));
}

#[test]
fn extreme_values() {
    let mut bitmap = Bitmap64::of(&[0, u64::from(u32::MAX) + 1, u64::MAX - 1, u64::MAX]);
    assert_eq!(bitmap.cardinality(), 4);
    assert_eq!(bitmap.minimum(), Some(0));
    assert_eq!(bitmap.maximum(), Some(u64::MAX));

    bitmap.remove_range(u64::MAX - 1..);
    assert_eq!(bitmap.to_vec(), [0, 1u64 << 32]);

    bitmap.add_range(u64::MAX - 10..=u64::MAX);
    assert_eq!(bitmap.cardinality(), 13);
    let restored = Bitmap64::try_deserialize(&bitmap.serialize()).unwrap();
    assert_eq!(restored, bitmap);
}

#[test]
fn scenarios() {
    let a = Bitmap64::of(&[1, 2, 3, 4]);
    let b = Bitmap64::of(&[2, 6, 7, 8]);
    assert_eq!(Bitmap64::of(&[1, 2, 3, 7]).cardinality(), 4);
    assert_eq!(a.and_cardinality(&b), 1);
    assert_eq!(a.or_cardinality(&b), 7);
    assert_eq!(a.xor_cardinality(&b), 6);
    assert_eq!(a.andnot(&b).to_vec(), [1, 3, 4]);
}

#[test]
fn narrow_blob_is_rejected() {
    let narrow = rbitmap::Bitmap::of(&[1]).serialize();
    assert_eq!(
        Bitmap64::try_deserialize(&narrow),
        Err(FormatError::WidthMismatch {
            expected: 64,
            found: 32
        })
    );
}

fn values() -> impl Strategy<Value = Vec<u64>> {
    prop_oneof![
        prop::collection::vec(proptest::num::u64::ANY, 0..2000),
        prop::collection::vec(0u64..(1 << 20), 0..3000),
        (proptest::num::u64::ANY, 1u64..100_000).prop_map(|(start, len)| {
            let start = start.min(u64::MAX - len);
            (start..start + len).collect()
        }),
    ]
}

fn model(values: &[u64]) -> BTreeSet<u64> {
    values.iter().copied().collect()
}

proptest! {
    #[test]
    fn bitmap64_cardinality_roundtrip(indices in values()) {
        let original = Bitmap64::of(&indices);
        let expected: Vec<u64> = model(&indices).into_iter().collect();
        prop_assert_eq!(expected.len() as u64, original.cardinality());
        prop_assert_eq!(expected, original.to_vec());
    }

    #[test]
    fn set_operations_match_model(a in values(), b in values()) {
        let (x, y) = (Bitmap64::of(&a), Bitmap64::of(&b));
        let (mx, my) = (model(&a), model(&b));

        prop_assert!(x.and(&y).iter().eq(mx.intersection(&my).copied()));
        prop_assert!(x.or(&y).iter().eq(mx.union(&my).copied()));
        prop_assert!(x.xor(&y).iter().eq(mx.symmetric_difference(&my).copied()));
        prop_assert!(x.andnot(&y).iter().eq(mx.difference(&my).copied()));
        prop_assert_eq!(
            x.and(&y).cardinality(),
            x.cardinality() + y.cardinality() - x.or(&y).cardinality()
        );
    }

    #[test]
    fn test_bitmap64_serialization_roundtrip(indices in values()) {
        let original = Bitmap64::of(&indices);

        let buffer = original.serialize();
        let deserialized = Bitmap64::try_deserialize(&buffer).unwrap();

        prop_assert_eq!(&original, &deserialized);
        prop_assert!(rbitmap::Bitmap::try_deserialize(&buffer).is_err());
    }

    #[test]
    fn operations_commute_and_associate(a in values(), b in values(), c in values()) {
        let (x, y, z) = (Bitmap64::of(&a), Bitmap64::of(&b), Bitmap64::of(&c));

        prop_assert_eq!(x.and(&y), y.and(&x));
        prop_assert_eq!(x.or(&y), y.or(&x));
        prop_assert_eq!(x.xor(&y), y.xor(&x));

        prop_assert_eq!(x.and(&y).and(&z), x.and(&y.and(&z)));
        prop_assert_eq!(x.or(&y).or(&z), x.or(&y.or(&z)));
        prop_assert_eq!(x.xor(&y).xor(&z), x.xor(&y.xor(&z)));
    }

    #[test]
    fn add_and_remove_are_idempotent(indices in values(), value in proptest::num::u64::ANY) {
        let mut bitmap = Bitmap64::of(&indices);

        bitmap.add(value);
        let once = bitmap.clone();
        prop_assert!(!bitmap.add_checked(value));
        prop_assert_eq!(&bitmap, &once);
        prop_assert_eq!(bitmap.serialize(), once.serialize());

        bitmap.remove(value);
        let once = bitmap.clone();
        prop_assert!(!bitmap.remove_checked(value));
        prop_assert_eq!(&bitmap, &once);
        prop_assert!(!bitmap.contains(value));
    }
}
