use criterion::{Criterion, criterion_group, criterion_main};
use rotor::channel;

fn bench_single_element(c: &mut Criterion) {
    let (mut tx, mut rx) = channel::<u64>(1 << 10);

    c.bench_function("spsc_push_pop_roundtrip", |b| {
        b.iter(|| {
            tx.push(1).unwrap();
            rx.pop().unwrap()
        })
    });
}

fn bench_batch(c: &mut Criterion) {
    for batch in [16usize, 256, 4096] {
        let (mut tx, mut rx) = channel::<u64>(1 << 13);
        let src = vec![7u64; batch];
        let mut dst = vec![0u64; batch];

        c.bench_function(&format!("spsc_batch_roundtrip_{batch}"), |b| {
            b.iter(|| {
                let written = tx.push_slice(&src);
                let read = rx.pop_slice(&mut dst);
                assert_eq!(written, read);
                read
            })
        });
    }
}

criterion_group!(benches, bench_single_element, bench_batch);
criterion_main!(benches);
