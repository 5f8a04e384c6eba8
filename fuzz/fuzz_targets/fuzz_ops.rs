#![no_main]

use std::collections::BTreeSet;

use crate::arbitrary_ops::*;
use libfuzzer_sys::arbitrary;
use libfuzzer_sys::arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rbitmap::Bitmap;

mod arbitrary_ops;

fuzz_target!(|input: FuzzInput| {
    let mut lhs = Bitmap::create();
    let mut rhs = Bitmap::create();

    let mut lhs_check = BTreeSet::new();
    let mut rhs_check = BTreeSet::new();

    for op in &input.lhs_ops {
        op.on_roaring(&mut lhs);
        op.on_model(&mut lhs_check);
        check_equal(&lhs, &lhs_check);
    }
    for op in &input.rhs_ops {
        op.on_roaring(&mut rhs);
        op.on_model(&mut rhs_check);
        check_equal(&rhs, &rhs_check);
    }

    for op in &input.comp_ops {
        op.on_roaring(&mut lhs, &rhs);
        op.on_model(&mut lhs_check, &rhs_check);
        check_equal(&lhs, &lhs_check);
    }

    for op in &input.view_ops {
        op.on_both(&rhs, &rhs_check);
        op.on_both(&lhs, &lhs_check);
    }

    check_serialized(&lhs);
    check_serialized(&rhs);
});

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    lhs_ops: Vec<MutableBitmapOperation>,
    rhs_ops: Vec<MutableBitmapOperation>,
    comp_ops: Vec<BitmapCompOperation>,
    view_ops: Vec<ReadBitmapOp>,
}

fn check_serialized(b: &Bitmap) {
    let data = b.serialize();
    let restored = Bitmap::try_deserialize(&data).unwrap();
    assert_eq!(&restored, b);
    // The encoding depends only on the members
    assert_eq!(restored.serialize(), data);
    assert_eq!(Bitmap::of(&b.to_vec()).serialize(), data);
}

fn check_equal(b: &Bitmap, m: &BTreeSet<u32>) {
    assert!(b.iter().eq(m.iter().copied()), "{b:?}");
}
