// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use approx::assert_relative_eq;
use shunt_components::executor::Executor;
use shunt_components::processors::{FixedTimeProcessor, PercentileTable, PercentileTimeProcessor};
use shunt_engine::test_helpers::start_test;
use shunt_engine::time::SimContext;
use shunt_engine::traits::Stage;

#[test]
fn fixed_time_completion() {
    let (top, mut ctx) = start_test(file!());
    let mut exec = Executor::new(&top, "disk", 1, FixedTimeProcessor::new(10.0)).unwrap();

    let event = ctx.issue_event();
    assert!(exec.is_ready_to_push_event());
    exec.push_event(&mut ctx, event).unwrap();
    assert!(!exec.is_ready_to_push_event());

    // Half way through the service time nothing is ready.
    ctx.advance(5.0);
    exec.tick(&ctx, 5.0);
    assert!(!exec.is_ready_to_pop_event());

    ctx.advance(5.0);
    exec.tick(&ctx, 5.0);
    assert!(exec.is_ready_to_pop_event());

    let event = exec.pop_event(&ctx).unwrap();
    assert_relative_eq!(event.stage_duration_us(&ctx), 10.0);
    assert!(exec.is_ready_to_push_event());
    assert_eq!(exec.occupancy(), 0);
}

#[test]
fn the_pool_size_bounds_occupancy() {
    let (top, mut ctx) = start_test(file!());
    let mut exec = Executor::new(&top, "disk", 2, FixedTimeProcessor::new(10.0)).unwrap();

    for _ in 0..2 {
        let event = ctx.issue_event();
        exec.push_event(&mut ctx, event).unwrap();
    }

    assert_eq!(exec.occupancy(), 2);
    assert_eq!(exec.capacity(), Some(2));
    assert!(!exec.is_ready_to_push_event());

    // A third push breaks the check-before-act contract.
    let event = ctx.issue_event();
    assert!(exec.push_event(&mut ctx, event).is_err());
    assert_eq!(exec.occupancy(), 2);
}

#[test]
fn popping_with_nothing_ready_is_an_error() {
    let (top, mut ctx) = start_test(file!());
    let mut exec = Executor::new(&top, "disk", 1, FixedTimeProcessor::new(10.0)).unwrap();

    assert!(exec.pop_event(&ctx).is_err());

    let event = ctx.issue_event();
    exec.push_event(&mut ctx, event).unwrap();
    ctx.advance(1.0);
    exec.tick(&ctx, 1.0);

    // Still working: nothing to collect yet.
    assert!(exec.pop_event(&ctx).is_err());
}

#[test]
fn an_empty_pool_is_rejected() {
    let (top, _ctx) = start_test(file!());
    assert!(Executor::new(&top, "disk", 0, FixedTimeProcessor::new(10.0)).is_err());
}

#[test]
fn percentile_tables_map_draws_to_discrete_values() {
    let table = PercentileTable::new(vec![(50.0, 5.0), (90.0, 20.0), (100.0, 40.0)]).unwrap();

    // First breakpoint strictly greater than the draw wins.
    assert_relative_eq!(table.value_for(0.0), 5.0);
    assert_relative_eq!(table.value_for(49.9), 5.0);
    assert_relative_eq!(table.value_for(50.0), 20.0);
    assert_relative_eq!(table.value_for(89.9), 20.0);
    assert_relative_eq!(table.value_for(99.9), 40.0);

    // With no breakpoint above the draw the last entry applies.
    let short = PercentileTable::new(vec![(10.0, 1.0), (20.0, 2.0)]).unwrap();
    assert_relative_eq!(short.value_for(75.0), 2.0);
}

#[test]
fn bad_percentile_tables_are_rejected() {
    assert!(PercentileTable::new(vec![]).is_err());
    assert!(PercentileTable::new(vec![(50.0, 5.0), (50.0, 6.0)]).is_err());
    assert!(PercentileTable::new(vec![(90.0, 5.0), (50.0, 6.0)]).is_err());
    assert!(PercentileTable::new(vec![(101.0, 5.0)]).is_err());
    assert!(PercentileTable::new(vec![(-1.0, 5.0)]).is_err());
}

/// Run one event through a single-processor percentile executor and return
/// the observed service time in whole microseconds.
fn one_lap(exec: &mut Executor<PercentileTimeProcessor>, ctx: &mut SimContext) -> u64 {
    let event = ctx.issue_event();
    exec.push_event(ctx, event).unwrap();

    let mut elapsed = 0;
    loop {
        ctx.advance(1.0);
        exec.tick(ctx, 1.0);
        elapsed += 1;
        if exec.is_ready_to_pop_event() {
            exec.pop_event(ctx).unwrap();
            return elapsed;
        }
        assert!(elapsed < 1_000, "percentile service time never completed");
    }
}

#[test]
fn percentile_service_times_are_always_configured_values() {
    let (top, mut ctx) = start_test(file!());
    let table = PercentileTable::new(vec![(50.0, 5.0), (90.0, 20.0), (100.0, 40.0)]).unwrap();
    let mut exec = Executor::new(&top, "nvme", 1, PercentileTimeProcessor::new(table)).unwrap();

    let mut seen = std::collections::BTreeSet::new();
    for _ in 0..200 {
        seen.insert(one_lap(&mut exec, &mut ctx));
    }

    for service_time in &seen {
        assert!(
            [5, 20, 40].contains(service_time),
            "observed a service time of {service_time}µs that is not in the table"
        );
    }
    // 200 draws make missing any of the three steps vanishingly unlikely.
    assert_eq!(seen.len(), 3);
}

#[test]
fn percentile_sampling_is_deterministic_per_seed() {
    let (top, _ctx) = start_test(file!());
    let table = PercentileTable::new(vec![(50.0, 5.0), (90.0, 20.0), (100.0, 40.0)]).unwrap();

    let mut runs = Vec::new();
    for run in 0..2 {
        let mut ctx = SimContext::new(99);
        let mut exec = Executor::new(
            &top,
            &format!("nvme{run}"),
            1,
            PercentileTimeProcessor::new(table.clone()),
        )
        .unwrap();

        let samples: Vec<u64> = (0..50).map(|_| one_lap(&mut exec, &mut ctx)).collect();
        runs.push(samples);
    }

    assert_eq!(runs[0], runs[1]);
}
