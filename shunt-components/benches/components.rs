// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

/// Benchmark basic component usage.
use criterion::{Criterion, criterion_group, criterion_main};
use shunt_components::executor::Executor;
use shunt_components::processors::FixedTimeProcessor;
use shunt_components::queue::Queue;
use shunt_engine::histogram::Histogram;
use shunt_engine::time::SimContext;
use shunt_engine::traits::Stage;
use shunt_track::entity::toplevel;

fn histogram_add_and_query(c: &mut Criterion) {
    let mut hist = Histogram::new(&[1, 10, 100, 1_000, 10_000]).unwrap();

    c.bench_function("histogram_add_and_query", |b| {
        let mut value = 0;
        b.iter(|| {
            value = (value + 7) % 20_000;
            hist.add_duration(value);
            hist.percentile(90).unwrap()
        });
    });
}

fn queue_push_pop(c: &mut Criterion) {
    let top = toplevel("bench");
    let mut ctx = SimContext::new(0);
    let mut queue = Queue::new(&top, "queue", 0, &mut ctx).unwrap();

    c.bench_function("queue_push_pop", |b| {
        b.iter(|| {
            let event = ctx.issue_event();
            queue.push_event(&mut ctx, event).unwrap();
            queue.pop_event(&ctx).unwrap()
        });
    });
}

fn executor_fill_tick_drain(c: &mut Criterion) {
    let top = toplevel("bench");
    let mut ctx = SimContext::new(0);
    let mut exec = Executor::new(&top, "exec", 8, FixedTimeProcessor::new(1.0)).unwrap();

    c.bench_function("executor_fill_tick_drain", |b| {
        b.iter(|| {
            while exec.is_ready_to_push_event() {
                let event = ctx.issue_event();
                exec.push_event(&mut ctx, event).unwrap();
            }
            ctx.advance(1.0);
            exec.tick(&ctx, 1.0);
            while exec.is_ready_to_pop_event() {
                exec.pop_event(&ctx).unwrap();
            }
        });
    });
}

criterion_group!(
    benches,
    histogram_add_and_query,
    queue_push_pop,
    executor_fill_tick_drain
);
criterion_main!(benches);
