// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Simulate a closed-loop storage I/O path.
//!
//! The simulation keeps a fixed window of requests circulating through
//! ```text
//!  input -> pdisk -> submit -> smb -> nvme [-> ack]
//! ```
//! and reports throughput, end-to-end latency percentiles and per-stage
//! occupancy while it runs.
//!
//! # Examples
//!
//! Running a basic simulation:
//! ```text
//! cargo run --bin sim-iopath --release -- --progress
//! ```
//!
//! # Impact of the outstanding-request window
//!
//! The single 10µs disk controller caps the loop at 100K events/s. With the
//! default 16 requests outstanding the controller saturates and the input
//! queue holds the backlog; shrink the window to see the loop go
//! latency-bound instead:
//! ```text
//! cargo run --bin sim-iopath --release -- --input-depth 2 --stdout
//! ```
//!
//! # In-order acknowledgement
//!
//! The 128-worker backend completes out of order. Add a flush barrier to
//! model a log that must acknowledge in submission order and watch the p99
//! latency pick up the reordering stalls:
//! ```text
//! cargo run --bin sim-iopath --release -- --ack-in-order --stdout
//! ```

use clap::Parser;
use indicatif::ProgressBar;
use shunt_engine::time::SEC;
use shunt_engine::types::SimResult;
use shunt_models::closed_pipeline::{ClosedPipeline, StageStats};
use shunt_models::format_count;
use shunt_models::io_path::{IoPathConfig, build_io_path};
use shunt_track::entity::toplevel;
use shunt_track::info;
use shunt_track::logger::init_stdout;

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Closed-loop storage I/O path evaluation application")]
struct Cli {
    /// Enable logging to the console.
    #[arg(long, default_value = "false")]
    stdout: bool,

    /// Level of log message to display.
    #[arg(long, default_value = "Info")]
    stdout_level: log::Level,

    /// Number of ticks to simulate.
    #[arg(long, default_value = "10000000")]
    ticks: u64,

    /// Simulated time per tick, in microseconds.
    #[arg(long, default_value = "1.0")]
    tick_us: f64,

    /// Simulated time between statistics reports, in microseconds.
    #[arg(long, default_value = "800000")]
    report_every_us: f64,

    /// Seed for the random source; identical seeds give identical runs.
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Number of requests kept outstanding in the loop.
    #[arg(long, default_value = "16")]
    input_depth: usize,

    /// Worker count of the backend device.
    #[arg(long, default_value = "128")]
    nvme_workers: usize,

    /// Acknowledge completions in submission order.
    #[arg(long, default_value = "false")]
    ack_in_order: bool,

    /// Show a progress bar for the tick count.
    #[arg(long, default_value = "false")]
    progress: bool,
}

fn stage_line(stage: &StageStats) -> String {
    match (stage.capacity, stage.wait_p90_us) {
        (Some(capacity), _) => format!("{}: {}/{}", stage.name, stage.occupancy, capacity),
        (None, Some(wait_p90_us)) => format!(
            "{}: {} waiting, p90 {}us",
            stage.name,
            format_count(stage.occupancy as u64),
            wait_p90_us
        ),
        (None, None) => format!("{}: {}", stage.name, stage.occupancy),
    }
}

fn report(pipeline: &ClosedPipeline) -> SimResult {
    let entity = pipeline.entity();

    info!(entity ; "time {:.2}s, completed {}, rate {}/s",
        pipeline.now_us() / SEC,
        format_count(pipeline.completed_events()),
        format_count(pipeline.events_per_second() as u64));
    info!(entity ; "latency p10 {}us, p50 {}us, p90 {}us, p99 {}us, p100 {}us",
        pipeline.latency_percentile(10)?,
        pipeline.latency_percentile(50)?,
        pipeline.latency_percentile(90)?,
        pipeline.latency_percentile(99)?,
        pipeline.latency_percentile(100)?);
    for stage in pipeline.stage_stats()? {
        info!(entity ; "  {}", stage_line(&stage));
    }
    Ok(())
}

fn main() -> SimResult {
    let cli = Cli::parse();

    if cli.stdout {
        init_stdout(cli.stdout_level);
    }

    let top = toplevel("top");
    let config = IoPathConfig {
        input_depth: cli.input_depth,
        nvme_workers: cli.nvme_workers,
        ack_in_order: cli.ack_in_order,
        seed: cli.seed,
        ..Default::default()
    };
    let mut pipeline = build_io_path(&top, &config)?;

    let bar = if cli.progress {
        ProgressBar::new(cli.ticks)
    } else {
        ProgressBar::hidden()
    };

    let mut next_report_us = cli.report_every_us;
    for tick in 0..cli.ticks {
        pipeline.tick(cli.tick_us)?;

        if pipeline.now_us() >= next_report_us {
            report(&pipeline)?;
            next_report_us += cli.report_every_us;
        }
        if tick % 65_536 == 0 {
            bar.set_position(tick);
        }
    }
    bar.finish_and_clear();

    println!(
        "time passed: {:.2} s, completed: {}, rate: {}/s",
        pipeline.now_us() / SEC,
        format_count(pipeline.completed_events()),
        format_count(pipeline.events_per_second() as u64)
    );
    println!(
        "latency p10: {}us, p50: {}us, p90: {}us, p99: {}us, p100: {}us",
        pipeline.latency_percentile(10)?,
        pipeline.latency_percentile(50)?,
        pipeline.latency_percentile(90)?,
        pipeline.latency_percentile(99)?,
        pipeline.latency_percentile(100)?
    );
    for stage in pipeline.stage_stats()? {
        println!("  {}", stage_line(&stage));
    }

    Ok(())
}
