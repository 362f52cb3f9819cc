// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use approx::assert_relative_eq;
use shunt_components::processors::PercentileTable;
use shunt_engine::test_helpers::{TEST_SEED, start_test};
use shunt_models::closed_pipeline::ClosedPipeline;

#[test]
fn single_worker_loop_reaches_one_lap_per_service_time() {
    let (top, _ctx) = start_test(file!());
    let mut pipeline = ClosedPipeline::new(&top, "pipeline", TEST_SEED).unwrap();
    pipeline.add_queue("input", 1).unwrap();
    pipeline.add_fixed_time_executor("disk", 1, 10.0).unwrap();

    // Tick 1 only moves the seed event into the processor.
    pipeline.tick(10.0).unwrap();
    assert_eq!(pipeline.completed_events(), 0);

    // Tick 2 collects it, records the lap and recycles a fresh event, which
    // enters the processor in the same tick. From here on every tick
    // completes one lap.
    pipeline.tick(10.0).unwrap();
    assert_eq!(pipeline.completed_events(), 1);

    for _ in 2..1_000 {
        pipeline.tick(10.0).unwrap();
    }
    assert_eq!(pipeline.completed_events(), 999);

    // 999 laps in 10,000µs of simulated time.
    assert_relative_eq!(pipeline.events_per_second(), 99_900.0);

    // Steady-state laps take the 10µs service time, which lands in the
    // bucket bounded by 20µs.
    assert_eq!(pipeline.latency_percentile(50).unwrap(), 20);
}

#[test]
fn population_is_invariant_across_ticks() {
    let (top, _ctx) = start_test(file!());
    let mut pipeline = ClosedPipeline::new(&top, "pipeline", TEST_SEED).unwrap();
    pipeline.add_queue("input", 8).unwrap();
    pipeline.add_fixed_time_executor("disk", 2, 7.0).unwrap();
    pipeline.add_queue("submit", 0).unwrap();
    let table = PercentileTable::new(vec![(50.0, 3.0), (90.0, 9.0), (100.0, 30.0)]).unwrap();
    pipeline.add_percentile_time_executor("nvme", 3, table).unwrap();
    pipeline.add_flush_controller("ack").unwrap();

    assert_eq!(pipeline.population(), 8);
    for _ in 0..500 {
        pipeline.tick(1.0).unwrap();
        assert_eq!(pipeline.population(), 8, "the closed loop leaked an event");
    }
    assert!(pipeline.completed_events() > 0);
}

#[test]
fn instant_stages_forward_within_one_tick() {
    let (top, _ctx) = start_test(file!());
    let mut pipeline = ClosedPipeline::new(&top, "pipeline", TEST_SEED).unwrap();
    pipeline.add_queue("input", 1).unwrap();
    pipeline.add_fixed_time_executor("disk", 1, 10.0).unwrap();
    pipeline.add_queue("submit", 0).unwrap();
    pipeline.add_flush_controller("ack").unwrap();

    // Tick 1: the seed event enters the disk stage.
    pipeline.tick(10.0).unwrap();
    assert_eq!(pipeline.completed_events(), 0);

    // Tick 2: the disk finishes. The first propagation pass moves the event
    // into the submit queue; the second pass lets that instant stage pass
    // it straight on into the flush barrier within the same tick.
    pipeline.tick(10.0).unwrap();
    assert_eq!(pipeline.completed_events(), 0);
    let stats = pipeline.stage_stats().unwrap();
    assert_eq!(stats[2].occupancy, 0, "the submit queue should be drained");
    assert_eq!(stats[3].occupancy, 1, "the flush barrier should hold the event");

    // Tick 3: the tail drains and the lap is complete.
    pipeline.tick(10.0).unwrap();
    assert_eq!(pipeline.completed_events(), 1);
}

#[test]
fn identical_seeds_give_identical_runs() {
    let (top, _ctx) = start_test(file!());

    let mut runs = Vec::new();
    for run in 0..2 {
        let mut pipeline =
            ClosedPipeline::new(&top, &format!("pipeline{run}"), 1234).unwrap();
        pipeline.add_queue("input", 4).unwrap();
        let table = PercentileTable::new(vec![(50.0, 2.0), (100.0, 20.0)]).unwrap();
        pipeline.add_percentile_time_executor("nvme", 2, table).unwrap();

        for _ in 0..2_000 {
            pipeline.tick(1.0).unwrap();
        }
        runs.push((
            pipeline.completed_events(),
            pipeline.latency_percentile(90).unwrap(),
        ));
    }

    assert_eq!(runs[0], runs[1]);
}

#[test]
fn the_first_stage_must_be_a_queue() {
    let (top, _ctx) = start_test(file!());

    let mut pipeline = ClosedPipeline::new(&top, "pipeline", TEST_SEED).unwrap();
    assert!(pipeline.add_fixed_time_executor("disk", 1, 10.0).is_err());
    assert!(pipeline.add_flush_controller("ack").is_err());

    pipeline.add_queue("input", 1).unwrap();
    assert!(pipeline.add_fixed_time_executor("disk", 1, 10.0).is_ok());
}

#[test]
fn degenerate_pipelines_cannot_tick() {
    let (top, _ctx) = start_test(file!());

    let mut pipeline = ClosedPipeline::new(&top, "pipeline", TEST_SEED).unwrap();
    assert!(pipeline.tick(1.0).is_err());

    // A single queue draining into itself would spin forever.
    pipeline.add_queue("input", 1).unwrap();
    assert!(pipeline.tick(1.0).is_err());

    pipeline.add_fixed_time_executor("disk", 1, 10.0).unwrap();
    assert!(pipeline.tick(1.0).is_ok());
}

#[test]
fn executors_need_at_least_one_processor() {
    let (top, _ctx) = start_test(file!());

    let mut pipeline = ClosedPipeline::new(&top, "pipeline", TEST_SEED).unwrap();
    pipeline.add_queue("input", 1).unwrap();
    assert!(pipeline.add_fixed_time_executor("disk", 0, 10.0).is_err());
}
