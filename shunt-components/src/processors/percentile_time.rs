// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A processor that samples its service time from a discretized empirical
//! distribution.
//!
//! The distribution is a step function: an ordered table of
//! (percentile breakpoint, service time) pairs. Starting work draws a
//! uniform value `r` in `[0, 100)` and adopts the service time of the first
//! breakpoint strictly greater than `r`, falling back to the last entry.
//! Service times are therefore always one of the configured discrete
//! values; this approximates a measured latency distribution without any
//! claim to continuity.

use itertools::Itertools;

use shunt_engine::event::Event;
use shunt_engine::sim_error;
use shunt_engine::time::SimContext;
use shunt_engine::types::SimResult;

use super::{Processor, ProcessorCore};

/// An ordered table mapping cumulative-probability breakpoints to discrete
/// service times in microseconds.
#[derive(Clone, Debug)]
pub struct PercentileTable {
    entries: Vec<(f64, f64)>,
}

impl PercentileTable {
    /// Create a table from (breakpoint, service time) pairs.
    ///
    /// The table must be non-empty with strictly ascending breakpoints in
    /// `[0, 100]`; anything else is a configuration error.
    pub fn new(entries: Vec<(f64, f64)>) -> SimResult<Self> {
        if entries.is_empty() {
            sim_error!("percentile table must not be empty");
        }
        for &(breakpoint, _) in &entries {
            if !(0.0..=100.0).contains(&breakpoint) {
                sim_error!(format!(
                    "percentile breakpoint {breakpoint} is outside [0, 100]"
                ));
            }
        }
        if !entries.iter().tuple_windows().all(|(a, b)| a.0 < b.0) {
            sim_error!("percentile breakpoints must be ascending");
        }
        Ok(Self { entries })
    }

    /// The conventional eight-point shape used for storage devices:
    /// p10 through p100.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn standard(
        p10_us: f64,
        p50_us: f64,
        p90_us: f64,
        p99_us: f64,
        p999_us: f64,
        p9999_us: f64,
        p99999_us: f64,
        p100_us: f64,
    ) -> Self {
        Self {
            entries: vec![
                (10.0, p10_us),
                (50.0, p50_us),
                (90.0, p90_us),
                (99.0, p99_us),
                (99.9, p999_us),
                (99.99, p9999_us),
                (99.999, p99999_us),
                (100.0, p100_us),
            ],
        }
    }

    /// The service time adopted for a draw of `r`.
    #[must_use]
    pub fn value_for(&self, r: f64) -> f64 {
        for &(breakpoint, value) in &self.entries {
            if breakpoint > r {
                return value;
            }
        }
        self.entries[self.entries.len() - 1].1
    }
}

/// Serves each event in a time sampled from a [`PercentileTable`].
#[derive(Clone, Debug)]
pub struct PercentileTimeProcessor {
    table: PercentileTable,
    service_time_us: f64,
    core: ProcessorCore,
}

impl PercentileTimeProcessor {
    /// Create a processor drawing service times from `table`.
    #[must_use]
    pub fn new(table: PercentileTable) -> Self {
        Self {
            table,
            service_time_us: 0.0,
            core: ProcessorCore::default(),
        }
    }
}

impl Processor for PercentileTimeProcessor {
    fn tick(&mut self, ctx: &SimContext) {
        self.core.finish_if_elapsed(ctx.now_us(), self.service_time_us);
    }

    fn start_work(&mut self, ctx: &mut SimContext, event: Event) {
        self.service_time_us = self.table.value_for(ctx.sample_percent());
        self.core.start(ctx.now_us(), event);
    }

    fn is_busy(&self) -> bool {
        self.core.is_busy()
    }

    fn is_event_ready(&self) -> bool {
        self.core.is_event_ready()
    }

    fn take_event(&mut self) -> Option<Event> {
        self.core.take()
    }
}
