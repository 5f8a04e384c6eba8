#![no_main]

use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use rbitmap::{RoaringBitmap, Value};

fn check_bitmap<V: Value + From<u16>>(input: &[u8]) {
    let Ok(mut bitmap) = RoaringBitmap::<V>::try_deserialize(input) else {
        return;
    };
    // Anything accepted must be re-encoded canonically and decode to the same set
    let data = bitmap.serialize();
    assert_eq!(
        RoaringBitmap::<V>::try_deserialize(&data).as_ref(),
        Ok(&bitmap),
        "Roundtrip mismatch in {}",
        std::any::type_name::<V>()
    );
    assert!(bitmap.iter().zip(bitmap.iter().skip(1)).all(|(a, b)| a < b));

    let start_cardinality = bitmap.cardinality();
    let mut new_cardinality = start_cardinality;
    for i in 100..1000u16 {
        let i = V::from(i);
        if !bitmap.contains(i) {
            bitmap.add(i);
            new_cardinality += 1;
        }
    }
    assert_eq!(
        new_cardinality,
        bitmap.cardinality(),
        "Cardinality mismatch in {}",
        std::any::type_name::<V>()
    );
}

#[derive(Arbitrary, Debug)]
enum BitmapType {
    Width32,
    Width64,
}

fuzz_target!(|input: (BitmapType, &[u8])| {
    let (ty, input) = input;
    match ty {
        BitmapType::Width32 => check_bitmap::<u32>(input),
        BitmapType::Width64 => check_bitmap::<u64>(input),
    }
});
