use criterion::{black_box, criterion_group, criterion_main, Criterion};

use terncode_core::encode::{encode_cgfe, encode_dirpe, encode_srge, prefix, PORT_BITS};

const RANGES: [(u16, u16); 4] = [(1000, 2000), (1, 65534), (123, 147), (1024, 65535)];

fn bench_encoders(c: &mut Criterion) {
    let mut group = c.benchmark_group("port_range_encoding");
    group.bench_function("prefix", |b| {
        b.iter(|| {
            for (lo, hi) in RANGES {
                black_box(prefix::encode(black_box(lo), black_box(hi), PORT_BITS));
            }
        })
    });
    group.bench_function("srge", |b| {
        b.iter(|| {
            for (lo, hi) in RANGES {
                black_box(encode_srge(black_box(lo), black_box(hi)));
            }
        })
    });
    group.bench_function("dirpe_c2", |b| {
        b.iter(|| {
            for (lo, hi) in RANGES {
                black_box(encode_dirpe(black_box(lo), black_box(hi), 2));
            }
        })
    });
    group.bench_function("cgfe_c2", |b| {
        b.iter(|| {
            for (lo, hi) in RANGES {
                black_box(encode_cgfe(black_box(lo), black_box(hi), 2));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_encoders);
criterion_main!(benches);
