use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rbitmap::{Bitmap, Bitmap64};
use roaring::{RoaringBitmap, RoaringTreemap};

/// Two inputs holding one array, one bitset and one run container each.
fn mixed_members() -> (Vec<u32>, Vec<u32>) {
    let left = (0..10_000)
        .chain((65_536..200_000).step_by(3))
        .chain([300_000, 300_500])
        .collect();
    let right = (5_000..70_000)
        .chain((100_000..140_000).step_by(2))
        .chain([300_500])
        .collect();
    (left, right)
}

/// Members spread over several 48-bit keys.
fn wide_members(offset: u64) -> Vec<u64> {
    (0..4u64)
        .flat_map(|high| {
            let base = (high << 40) + offset;
            (base..base + 50_000).chain((base + 200_000..base + 400_000).step_by(7))
        })
        .collect()
}

fn mixed_binops(c: &mut Criterion) {
    let (left, right) = mixed_members();
    let ours = (Bitmap::of(&left), Bitmap::of(&right));
    let theirs: (RoaringBitmap, RoaringBitmap) = (
        left.iter().copied().collect(),
        right.iter().copied().collect(),
    );

    let mut group = c.benchmark_group("mixed_binops");
    macro_rules! versus {
        ($label:literal, $ours:expr, $theirs:expr) => {
            group.bench_function(BenchmarkId::new("rbitmap", $label), |b| {
                b.iter(|| $ours(black_box(&ours.0), black_box(&ours.1)))
            });
            group.bench_function(BenchmarkId::new("roaring-rs", $label), |b| {
                b.iter(|| $theirs(black_box(&theirs.0), black_box(&theirs.1)))
            });
        };
    }

    versus!(
        "and",
        |x: &Bitmap, y: &Bitmap| x.and(y),
        |x: &RoaringBitmap, y: &RoaringBitmap| x & y
    );
    versus!(
        "or",
        |x: &Bitmap, y: &Bitmap| x.or(y),
        |x: &RoaringBitmap, y: &RoaringBitmap| x | y
    );
    versus!(
        "xor",
        |x: &Bitmap, y: &Bitmap| x.xor(y),
        |x: &RoaringBitmap, y: &RoaringBitmap| x ^ y
    );
    versus!(
        "andnot",
        |x: &Bitmap, y: &Bitmap| x.andnot(y),
        |x: &RoaringBitmap, y: &RoaringBitmap| x - y
    );
    group.finish();
}

fn cardinalities(c: &mut Criterion) {
    let (left, right) = mixed_members();
    let (x, y) = (Bitmap::of(&left), Bitmap::of(&right));
    let ox: RoaringBitmap = left.iter().copied().collect();
    let oy: RoaringBitmap = right.iter().copied().collect();

    let mut group = c.benchmark_group("cardinalities");
    group.bench_function(BenchmarkId::new("rbitmap", "and"), |b| {
        b.iter(|| x.and_cardinality(&y))
    });
    group.bench_function(BenchmarkId::new("roaring-rs", "and"), |b| {
        b.iter(|| ox.intersection_len(&oy))
    });
    group.bench_function(BenchmarkId::new("rbitmap", "or"), |b| {
        b.iter(|| x.or_cardinality(&y))
    });
    group.bench_function(BenchmarkId::new("roaring-rs", "or"), |b| {
        b.iter(|| ox.union_len(&oy))
    });
    group.bench_function(BenchmarkId::new("rbitmap", "xor"), |b| {
        b.iter(|| x.xor_cardinality(&y))
    });
    group.bench_function(BenchmarkId::new("roaring-rs", "xor"), |b| {
        b.iter(|| ox.symmetric_difference_len(&oy))
    });
    group.bench_function(BenchmarkId::new("rbitmap", "andnot"), |b| {
        b.iter(|| x.andnot_cardinality(&y))
    });
    group.bench_function(BenchmarkId::new("roaring-rs", "andnot"), |b| {
        b.iter(|| ox.difference_len(&oy))
    });
    group.finish();
}

fn wide(c: &mut Criterion) {
    let (left, right) = (wide_members(0), wide_members(25_000));
    let mut group = c.benchmark_group("wide");

    group.bench_function(BenchmarkId::new("rbitmap", "build"), |b| {
        b.iter(|| Bitmap64::of(black_box(&left)))
    });
    group.bench_function(BenchmarkId::new("roaring-rs", "build"), |b| {
        b.iter(|| black_box(&left).iter().copied().collect::<RoaringTreemap>())
    });

    let (x, y) = (Bitmap64::of(&left), Bitmap64::of(&right));
    let ox: RoaringTreemap = left.iter().copied().collect();
    let oy: RoaringTreemap = right.iter().copied().collect();

    group.bench_function(BenchmarkId::new("rbitmap", "or"), |b| b.iter(|| x.or(&y)));
    group.bench_function(BenchmarkId::new("roaring-rs", "or"), |b| b.iter(|| &ox | &oy));
    group.bench_function(BenchmarkId::new("rbitmap", "and_inplace"), |b| {
        b.iter_batched(|| x.clone(), |mut z| z.and_inplace(&y), BatchSize::SmallInput)
    });
    group.bench_function(BenchmarkId::new("roaring-rs", "and_inplace"), |b| {
        b.iter_batched(|| ox.clone(), |mut z| z &= &oy, BatchSize::SmallInput)
    });

    let probes: Vec<u64> = left.iter().step_by(97).map(|v| v + 3).collect();
    group.bench_function(BenchmarkId::new("rbitmap", "contains"), |b| {
        b.iter(|| probes.iter().filter(|&&v| x.contains(v)).count())
    });
    group.bench_function(BenchmarkId::new("roaring-rs", "contains"), |b| {
        b.iter(|| probes.iter().filter(|&&v| ox.contains(v)).count())
    });
    group.finish();
}

fn codec(c: &mut Criterion) {
    let shapes: [(&str, Vec<u32>); 2] = [
        // long runs with short gaps
        (
            "runs",
            (0..64u32)
                .flat_map(|i| i * 20_000..i * 20_000 + 15_000)
                .collect(),
        ),
        // every other value: bitset containers
        ("bitsets", (0..1_000_000).step_by(2).collect()),
    ];

    let mut group = c.benchmark_group("codec");
    for (shape, members) in &shapes {
        let ours = Bitmap::of(members);
        let theirs: RoaringBitmap = members.iter().copied().collect();
        let our_blob = ours.serialize();
        let mut their_blob = Vec::with_capacity(theirs.serialized_size());
        theirs.serialize_into(&mut their_blob).unwrap();

        group.bench_function(BenchmarkId::new("rbitmap/encode", shape), |b| {
            b.iter(|| ours.serialize())
        });
        group.bench_function(BenchmarkId::new("roaring-rs/encode", shape), |b| {
            b.iter(|| {
                let mut out = Vec::with_capacity(theirs.serialized_size());
                theirs.serialize_into(&mut out).map(|()| out)
            })
        });
        group.bench_function(BenchmarkId::new("rbitmap/decode", shape), |b| {
            b.iter(|| Bitmap::try_deserialize(black_box(&our_blob)))
        });
        group.bench_function(BenchmarkId::new("roaring-rs/decode", shape), |b| {
            b.iter(|| RoaringBitmap::deserialize_from(black_box(&their_blob[..])))
        });
    }
    group.finish();
}

criterion_group!(benches, mixed_binops, cardinalities, wide, codec);
criterion_main!(benches);
