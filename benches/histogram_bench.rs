//! Benchmarks for byte-histogram
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn benchmark_counter_record(c: &mut Criterion) {
    use byte_histogram::histogram::Counter;

    let data: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
    let mut group = c.benchmark_group("counter");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("record_64k", |b| {
        b.iter(|| {
            let mut counter = Counter::new();
            counter.record(black_box(&data));
            black_box(counter);
        })
    });
    group.finish();
}

fn benchmark_merge_and_render(c: &mut Criterion) {
    use byte_histogram::histogram::{merge, normalize, render, Counter};

    let counters: Vec<Counter> = (0..16u64)
        .map(|w| (0..=255u8).map(|b| (b, w * 31 + b as u64)).collect())
        .collect();

    c.bench_function("merge_16_workers", |b| {
        b.iter(|| black_box(merge(black_box(&counters))))
    });

    let global = merge(&counters);
    c.bench_function("normalize_render_256", |b| {
        b.iter(|| {
            let normalized = normalize(black_box(&global));
            black_box(render(&global, &normalized));
        })
    });
}

fn benchmark_queue_operations(c: &mut Criterion) {
    use byte_histogram::pipeline::{Chunk, ChunkQueue};

    c.bench_function("queue_send_recv", |b| {
        let queue = ChunkQueue::new(10000);
        let receiver = queue.receiver();
        let (sender, _spare) = queue.into_parts();

        b.iter(|| {
            sender.send(Chunk::new(0, vec![0u8; 1024])).unwrap();
            let received = receiver.try_recv().unwrap();
            black_box(received);
        })
    });
}

criterion_group!(
    benches,
    benchmark_counter_record,
    benchmark_merge_and_render,
    benchmark_queue_operations
);
criterion_main!(benches);
