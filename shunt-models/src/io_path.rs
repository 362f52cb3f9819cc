// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A closed-loop model of a storage I/O path.
//!
//! The chain models a write request's life: it waits in a submission queue,
//! is picked up by a single-worker disk controller, crosses a transport hop
//! and lands on a many-worker backend device with an empirically measured
//! latency distribution:
//!
//! ```text
//!  input -> pdisk -> submit -> smb -> nvme [-> ack]
//! ```
//!
//! The optional `ack` tail is a flush barrier for backends that must
//! acknowledge in submission order even when device completions reorder.

use std::rc::Rc;

use shunt_components::processors::PercentileTable;
use shunt_engine::time::{SEC, USEC};
use shunt_engine::types::SimResult;
use shunt_track::entity::Entity;

use crate::closed_pipeline::ClosedPipeline;

/// Knobs for the I/O path model. The defaults reproduce the reference
/// workload: 16 outstanding requests against a 10µs controller, a 5µs
/// transport hop and a 128-worker backend.
#[derive(Clone, Debug)]
pub struct IoPathConfig {
    /// Events seeded into the input queue (the outstanding-request window).
    pub input_depth: usize,
    /// Disk controller service time in microseconds.
    pub pdisk_service_us: f64,
    /// Transport hop service time in microseconds.
    pub smb_service_us: f64,
    /// Backend device worker count.
    pub nvme_workers: usize,
    /// Append a flush barrier so completions acknowledge in order.
    pub ack_in_order: bool,
    /// Seed for the model's random source.
    pub seed: u64,
}

impl Default for IoPathConfig {
    fn default() -> Self {
        Self {
            input_depth: 16,
            pdisk_service_us: 10.0 * USEC,
            smb_service_us: 5.0 * USEC,
            nvme_workers: 128,
            ack_in_order: false,
            seed: 0,
        }
    }
}

/// The backend device's measured latency steps.
#[must_use]
pub fn nvme_percentiles() -> PercentileTable {
    PercentileTable::standard(
        10.0 * USEC,
        20.0 * USEC,
        70.0 * USEC,
        100.0 * USEC,
        200.0 * USEC,
        300.0 * USEC,
        500.0 * USEC,
        SEC,
    )
}

/// Build the I/O path pipeline described by `config`.
pub fn build_io_path(parent: &Rc<Entity>, config: &IoPathConfig) -> SimResult<ClosedPipeline> {
    let mut pipeline = ClosedPipeline::new(parent, "iopath", config.seed)?;

    pipeline.add_queue("input", config.input_depth)?;
    pipeline.add_fixed_time_executor("pdisk", 1, config.pdisk_service_us)?;
    pipeline.add_queue("submit", 0)?;
    pipeline.add_fixed_time_executor("smb", 1, config.smb_service_us)?;
    pipeline.add_percentile_time_executor("nvme", config.nvme_workers, nvme_percentiles())?;
    if config.ack_in_order {
        pipeline.add_flush_controller("ack")?;
    }

    Ok(pipeline)
}
